//! Stream Forker
//!
//! Extraction reads only a prefix of the source, but a decoder that runs
//! afterwards needs the whole stream. [`load`] records every byte the
//! extractor pulls from the source and hands back a [`ReplayReader`] that
//! yields those bytes first and then continues with the untouched remainder
//! of the source.
//!
//! ```no_run
//! use std::fs::File;
//! use std::io::Read;
//!
//! let file = File::open("photo.jpg")?;
//! let (metadata, mut stream) = oxmeta_core::load(file);
//! if let Ok(md) = metadata {
//!     println!("{}x{}, profile: {}", md.pixel_width, md.pixel_height, md.has_profile());
//! }
//!
//! // The full file, as if nothing had been read yet
//! let mut jpeg = Vec::new();
//! stream.read_to_end(&mut jpeg)?;
//! # Ok::<(), std::io::Error>(())
//! ```

use std::io::{self, BufRead, BufReader, Read};

use tracing::debug;

use crate::Result;
use crate::extract::{ExtractOptions, extract_metadata_with_options};
use crate::metadata::Metadata;

/// Reader that copies everything it reads into a buffer
#[derive(Debug)]
struct TeeReader<R> {
    source: R,
    captured: Vec<u8>,
}

impl<R: Read> TeeReader<R> {
    fn new(source: R) -> Self {
        Self {
            source,
            captured: Vec::new(),
        }
    }

    fn into_parts(self) -> (Vec<u8>, R) {
        (self.captured, self.source)
    }
}

impl<R: Read> Read for TeeReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.source.read(buf)?;
        self.captured.extend_from_slice(&buf[..n]);
        Ok(n)
    }
}

/// Replays captured bytes, then continues reading from the source
///
/// Reading a `ReplayReader` to the end yields exactly the bytes the original
/// source would have yielded had it never been touched.
#[derive(Debug)]
pub struct ReplayReader<R> {
    replay: Vec<u8>,
    pos: usize,
    captured_len: usize,
    source: R,
}

impl<R> ReplayReader<R> {
    /// Chain `replay` in front of `source`
    pub fn new(replay: Vec<u8>, source: R) -> Self {
        let captured_len = replay.len();
        Self {
            replay,
            pos: 0,
            captured_len,
            source,
        }
    }

    /// Number of bytes that were captured during extraction
    pub fn buffered_len(&self) -> usize {
        self.captured_len
    }

    /// Captured bytes not yet read back
    pub fn replay_remaining(&self) -> usize {
        self.replay.len() - self.pos
    }

    /// Split into the unread replay bytes and the source
    pub fn into_parts(mut self) -> (Vec<u8>, R) {
        let rest = self.replay.split_off(self.pos);
        (rest, self.source)
    }

    fn advance(&mut self, amt: usize) {
        self.pos += amt;
        if self.pos >= self.replay.len() {
            // Replay phase is over; release the buffer
            self.replay = Vec::new();
            self.pos = 0;
        }
    }
}

impl<R: Read> Read for ReplayReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.replay_remaining() == 0 {
            return self.source.read(buf);
        }
        let pending = &self.replay[self.pos..];
        let n = pending.len().min(buf.len());
        buf[..n].copy_from_slice(&pending[..n]);
        self.advance(n);
        Ok(n)
    }
}

impl<R: BufRead> BufRead for ReplayReader<R> {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        if self.replay_remaining() == 0 {
            return self.source.fill_buf();
        }
        Ok(&self.replay[self.pos..])
    }

    fn consume(&mut self, amt: usize) {
        if self.replay_remaining() == 0 {
            self.source.consume(amt);
        } else {
            self.advance(amt.min(self.replay_remaining()));
        }
    }
}

/// Extract metadata from `source` with default options
///
/// Only as much of the stream is consumed as necessary. The returned reader
/// replays the consumed bytes followed by the rest of `source`, so it can be
/// handed to a full decoder. It is returned whether or not extraction
/// succeeded.
pub fn load<R: Read>(source: R) -> (Result<Metadata>, ReplayReader<R>) {
    load_with_options(source, ExtractOptions::default())
}

/// Extract metadata from `source` and fork the stream
pub fn load_with_options<R: Read>(
    source: R,
    options: ExtractOptions,
) -> (Result<Metadata>, ReplayReader<R>) {
    let mut tee = TeeReader::new(source);
    let result = {
        let buffered = BufReader::with_capacity(options.read_buffer_capacity.max(1), &mut tee);
        extract_metadata_with_options(buffered, options)
    };

    let (captured, source) = tee.into_parts();
    debug!(captured = captured.len(), ok = result.is_ok(), "forked source stream");
    (result, ReplayReader::new(captured, source))
}
