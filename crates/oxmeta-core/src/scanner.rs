//! Marker Scanner
//!
//! Splits a raw JPEG byte stream into framed segments. A segment is a `0xFF`
//! sync byte, optional `0xFF` fill bytes, a marker code and, for all markers
//! except the standalone ones, a big-endian `u16` length that counts itself
//! followed by `length - 2` payload bytes.

use std::io::{self, Read};

use tracing::trace;

use crate::marker::{MARKER_SYNC, Marker};
use crate::segment::Segment;
use crate::{Error, Result};

/// Size of the length field that precedes every non-standalone payload
const LENGTH_FIELD_SIZE: usize = 2;

/// Reads one framed segment at a time from a byte source
#[derive(Debug)]
pub struct MarkerScanner<R> {
    reader: R,
    offset: u64,
}

impl<R: Read> MarkerScanner<R> {
    /// Create a scanner positioned at the start of a marker
    pub fn new(reader: R) -> Self {
        Self { reader, offset: 0 }
    }

    /// Number of bytes consumed from the underlying reader so far
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Give back the underlying reader
    pub fn into_inner(self) -> R {
        self.reader
    }

    /// Read the next segment
    ///
    /// Returns `Ok(None)` when the stream ends cleanly on a segment boundary.
    /// Ending anywhere inside a segment is a [`Error::MalformedSegment`].
    pub fn next_segment(&mut self) -> Result<Option<Segment>> {
        let start = self.offset;

        let Some(sync) = self.read_byte()? else {
            return Ok(None);
        };
        if sync != MARKER_SYNC {
            return Err(Error::malformed(format!(
                "expected marker sync byte at offset {}, found 0x{:02X}",
                start, sync
            )));
        }

        let code = loop {
            match self.read_byte()? {
                Some(MARKER_SYNC) => continue,
                Some(code) => break code,
                None => {
                    return Err(Error::malformed(format!(
                        "stream ended inside marker at offset {}",
                        start
                    )));
                }
            }
        };
        if code == 0x00 {
            return Err(Error::malformed(format!(
                "stuffed byte outside entropy-coded data at offset {}",
                start
            )));
        }

        let marker = Marker::from_code(code);
        if marker.is_standalone() {
            trace!(%marker, offset = start, "standalone marker");
            return Ok(Some(Segment::new(marker, Vec::new())));
        }

        let mut length = [0u8; LENGTH_FIELD_SIZE];
        self.fill(&mut length, marker, "length")?;
        let length = u16::from_be_bytes(length) as usize;
        let Some(payload_len) = length.checked_sub(LENGTH_FIELD_SIZE) else {
            return Err(Error::malformed(format!(
                "{} segment at offset {} declares length {}",
                marker, start, length
            )));
        };

        let mut payload = vec![0u8; payload_len];
        self.fill(&mut payload, marker, "payload")?;

        trace!(%marker, offset = start, len = payload_len, "segment");
        Ok(Some(Segment::new(marker, payload)))
    }

    fn read_byte(&mut self) -> Result<Option<u8>> {
        let mut byte = [0u8; 1];
        loop {
            match self.reader.read(&mut byte) {
                Ok(0) => return Ok(None),
                Ok(_) => {
                    self.offset += 1;
                    return Ok(Some(byte[0]));
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }

    fn fill(&mut self, buf: &mut [u8], marker: Marker, what: &str) -> Result<()> {
        match self.reader.read_exact(buf) {
            Ok(()) => {
                self.offset += buf.len() as u64;
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Err(Error::malformed(format!(
                "stream ended inside {} {}",
                marker, what
            ))),
            Err(e) => Err(e.into()),
        }
    }
}
