//! JPEG fixture generation
//!
//! Builds marker streams byte by byte. Only the segments the extractor cares
//! about carry realistic content; scan data is random bytes with every `0xFF`
//! stuffed, the way an encoder emits it.

use oxmeta_core::{FrameKind, ICC_PROFILE_IDENTIFIER, Marker};
use rand::prelude::*;

/// Largest payload an APP2 segment can carry after the ICC chunk header
pub const MAX_ICC_CHUNK: usize = u16::MAX as usize - 2 - ICC_PROFILE_IDENTIFIER.len() - 2;

/// Incrementally assembled JPEG byte stream
#[derive(Debug, Clone)]
pub struct JpegBuilder {
    bytes: Vec<u8>,
}

impl Default for JpegBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl JpegBuilder {
    /// Start a stream with SOI
    pub fn new() -> Self {
        Self {
            bytes: vec![0xFF, Marker::StartOfImage.code()],
        }
    }

    /// Start without SOI
    pub fn empty() -> Self {
        Self { bytes: Vec::new() }
    }

    /// Append raw bytes
    pub fn raw(mut self, bytes: &[u8]) -> Self {
        self.bytes.extend_from_slice(bytes);
        self
    }

    /// Append a length-framed segment
    pub fn segment(mut self, code: u8, payload: &[u8]) -> Self {
        assert!(payload.len() + 2 <= u16::MAX as usize, "payload too large for one segment");
        self.bytes.extend_from_slice(&[0xFF, code]);
        self.bytes.extend_from_slice(&((payload.len() + 2) as u16).to_be_bytes());
        self.bytes.extend_from_slice(payload);
        self
    }

    /// Append a JFIF APP0 segment
    pub fn jfif(self) -> Self {
        self.segment(
            Marker::App(0).code(),
            &[b'J', b'F', b'I', b'F', 0, 1, 2, 0, 0, 1, 0, 1, 0, 0],
        )
    }

    /// Append an Exif APP1 segment wrapping `tiff`
    pub fn exif(self, tiff: &[u8]) -> Self {
        let mut payload = b"Exif\0\0".to_vec();
        payload.extend_from_slice(tiff);
        self.segment(Marker::App(1).code(), &payload)
    }

    /// Append one ICC profile chunk segment
    pub fn icc_chunk(self, index: u8, count: u8, data: &[u8]) -> Self {
        let mut payload = ICC_PROFILE_IDENTIFIER.to_vec();
        payload.push(index);
        payload.push(count);
        payload.extend_from_slice(data);
        self.segment(Marker::ICC_PROFILE.code(), &payload)
    }

    /// Append `profile` split into `chunks` segments, in index order
    pub fn icc_profile(self, profile: &[u8], chunks: usize) -> Self {
        let parts = split_profile(profile, chunks);
        let count = parts.len() as u8;
        parts
            .iter()
            .enumerate()
            .fold(self, |b, (i, part)| b.icc_chunk(i as u8 + 1, count, part))
    }

    /// Append a quantization table segment
    pub fn dqt(self) -> Self {
        let mut payload = vec![0u8];
        payload.extend(1..=64u8);
        self.segment(0xDB, &payload)
    }

    /// Append a three-component frame header
    pub fn frame(self, kind: FrameKind, bits: u8, width: u16, height: u16) -> Self {
        let mut payload = vec![bits];
        payload.extend_from_slice(&height.to_be_bytes());
        payload.extend_from_slice(&width.to_be_bytes());
        payload.push(3);
        for id in 1..=3u8 {
            payload.extend_from_slice(&[id, if id == 1 { 0x22 } else { 0x11 }, (id > 1) as u8]);
        }
        self.segment(Marker::StartOfFrame(kind).code(), &payload)
    }

    /// Append SOS followed by entropy-coded bytes
    pub fn scan(self, entropy: &[u8]) -> Self {
        self.segment(
            Marker::StartOfScan.code(),
            &[3, 1, 0x00, 2, 0x11, 3, 0x11, 0, 0x3F, 0],
        )
        .raw(entropy)
    }

    /// Append EOI and finish
    pub fn finish(mut self) -> Vec<u8> {
        self.bytes.extend_from_slice(&[0xFF, Marker::EndOfImage.code()]);
        self.bytes
    }

    /// Finish without EOI
    pub fn build(self) -> Vec<u8> {
        self.bytes
    }
}

/// Split `profile` into `chunks` nearly equal parts
///
/// Every part is non-empty unless the profile is shorter than `chunks`.
pub fn split_profile(profile: &[u8], chunks: usize) -> Vec<Vec<u8>> {
    assert!((1..=255).contains(&chunks), "ICC chunk count must be 1..=255");
    let base = profile.len() / chunks;
    let extra = profile.len() % chunks;
    let mut parts = Vec::with_capacity(chunks);
    let mut start = 0;
    for i in 0..chunks {
        let len = base + usize::from(i < extra);
        parts.push(profile[start..start + len].to_vec());
        start += len;
    }
    parts
}

/// Random bytes
pub fn random_bytes<R: Rng>(rng: &mut R, len: usize) -> Vec<u8> {
    let mut out = vec![0u8; len];
    rng.fill_bytes(&mut out);
    out
}

/// Random entropy-coded data with `0xFF` bytes stuffed
pub fn entropy_data<R: Rng>(rng: &mut R, len: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(len + len / 128);
    for _ in 0..len {
        let byte: u8 = rng.r#gen();
        out.push(byte);
        if byte == 0xFF {
            out.push(0x00);
        }
    }
    out
}

/// Profile-like bytes of a given length, distinct per seed
pub fn synthetic_profile(seed: u64, len: usize) -> Vec<u8> {
    let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(seed);
    random_bytes(&mut rng, len)
}
