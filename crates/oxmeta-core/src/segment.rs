//! Segments and the sequential segment reader

use std::io::Read;

use crate::Result;
use crate::marker::Marker;
use crate::scanner::MarkerScanner;

/// A marker together with the payload bytes framed by its length field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// Role of this segment
    pub marker: Marker,
    /// Payload, excluding the length field
    pub payload: Vec<u8>,
}

impl Segment {
    /// Create a segment
    pub fn new(marker: Marker, payload: Vec<u8>) -> Self {
        Self { marker, payload }
    }

    /// Payload length in bytes
    pub fn len(&self) -> usize {
        self.payload.len()
    }

    /// Whether the payload is empty
    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }
}

/// Pulls segments one after another from a [`MarkerScanner`]
#[derive(Debug)]
pub struct SegmentReader<R> {
    scanner: MarkerScanner<R>,
}

impl<R: Read> SegmentReader<R> {
    /// Create a reader over a byte source positioned at a marker
    pub fn new(reader: R) -> Self {
        Self {
            scanner: MarkerScanner::new(reader),
        }
    }

    /// Next segment, or `Ok(None)` at the end of the stream
    pub fn read_segment(&mut self) -> Result<Option<Segment>> {
        self.scanner.next_segment()
    }

    /// Bytes consumed from the source so far
    pub fn offset(&self) -> u64 {
        self.scanner.offset()
    }

    /// Give back the underlying reader
    pub fn into_inner(self) -> R {
        self.scanner.into_inner()
    }
}

impl<R: Read> Iterator for SegmentReader<R> {
    type Item = Result<Segment>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_segment().transpose()
    }
}
