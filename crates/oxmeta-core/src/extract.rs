//! Metadata Extractor
//!
//! Drives a [`SegmentReader`] until the frame header and, if present, every
//! chunk of the embedded ICC profile have been seen.
//!
//! # Profile chunks
//!
//! An ICC profile larger than one APP2 segment is split into chunks. Each
//! APP2 payload starts with `"ICC_PROFILE\0"`, a 1-based chunk index and the
//! total chunk count, followed by the chunk bytes. Chunks may appear in any
//! order; the profile is their concatenation by index.
//!
//! # Termination
//!
//! - SOS or EOI ends the scan. So does the end of the stream.
//! - Once the frame header is known and the profile is either complete or was
//!   never started, the scan stops early (see [`ExtractOptions::early_exit`]).
//! - Without a frame header the result is [`Error::IncompleteMetadata`].
//! - A profile still missing chunks at termination is dropped, the rest of
//!   the metadata is returned.

use std::io::Read;

use tracing::{debug, warn};

use crate::marker::Marker;
use crate::metadata::Metadata;
use crate::segment::{Segment, SegmentReader};
use crate::{Error, Result};

/// Identifier at the start of every ICC profile APP2 payload
pub const ICC_PROFILE_IDENTIFIER: &[u8; 12] = b"ICC_PROFILE\0";

/// Identifier plus chunk index and chunk count
const ICC_CHUNK_HEADER_SIZE: usize = ICC_PROFILE_IDENTIFIER.len() + 2;

/// Sample precision (1) + height (2) + width (2)
const FRAME_HEADER_SIZE: usize = 5;

/// Default read-ahead between the source and the scanner
pub const DEFAULT_READ_BUFFER_CAPACITY: usize = 8 * 1024;

/// Options for metadata extraction
#[derive(Debug, Clone, Copy)]
pub struct ExtractOptions {
    /// Stop as soon as the frame header is known and the profile is complete
    /// or absent. When disabled, scanning runs to SOS/EOI so profile segments
    /// placed after the frame header are still collected.
    pub early_exit: bool,
    /// Capacity of the read-ahead buffer used by [`crate::load`]
    pub read_buffer_capacity: usize,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            early_exit: true,
            read_buffer_capacity: DEFAULT_READ_BUFFER_CAPACITY,
        }
    }
}

/// Fixed-size table of profile chunks, indexed from 1
#[derive(Debug, Clone)]
pub struct ChunkTable {
    slots: Box<[Option<Vec<u8>>]>,
    filled: usize,
}

impl ChunkTable {
    /// Allocate a table for `count` chunks
    pub fn new(count: u8) -> Self {
        Self {
            slots: vec![None; count as usize].into_boxed_slice(),
            filled: 0,
        }
    }

    /// Declared chunk count
    pub fn count(&self) -> usize {
        self.slots.len()
    }

    /// Number of slots filled so far
    pub fn filled(&self) -> usize {
        self.filled
    }

    /// Whether every slot is filled
    pub fn is_complete(&self) -> bool {
        self.filled == self.slots.len()
    }

    /// Store chunk `index` of a segment that declared `count` chunks
    pub fn insert(&mut self, count: u8, index: u8, data: Vec<u8>) -> Result<()> {
        if count as usize != self.slots.len() {
            return Err(Error::InconsistentProfileChunks {
                expected: self.slots.len(),
                actual: count as usize,
            });
        }

        let slot = index
            .checked_sub(1)
            .and_then(|i| self.slots.get_mut(i as usize))
            .ok_or(Error::InvalidChunkIndex {
                index,
                count: count as usize,
            })?;
        if slot.is_some() {
            return Err(Error::DuplicateChunk(index));
        }

        *slot = Some(data);
        self.filled += 1;
        Ok(())
    }

    /// Concatenate the chunks in index order, `None` if any is missing
    pub fn assemble(self) -> Option<Vec<u8>> {
        if !self.is_complete() {
            return None;
        }
        let total = self.slots.iter().flatten().map(Vec::len).sum();
        let mut profile = Vec::with_capacity(total);
        for chunk in self.slots.iter().flatten() {
            profile.extend_from_slice(chunk);
        }
        Some(profile)
    }
}

/// What the scan loop does after a segment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Transition {
    Continue,
    Stop,
}

/// State machine extracting [`Metadata`] from a segment stream
#[derive(Debug)]
pub struct MetadataExtractor<R> {
    segments: SegmentReader<R>,
    options: ExtractOptions,
    metadata: Metadata,
    frame_found: bool,
    chunks: Option<ChunkTable>,
}

impl<R: Read> MetadataExtractor<R> {
    /// Create an extractor reading from `reader`
    pub fn new(reader: R, options: ExtractOptions) -> Self {
        Self {
            segments: SegmentReader::new(reader),
            options,
            metadata: Metadata::default(),
            frame_found: false,
            chunks: None,
        }
    }

    /// Scan segments until done and produce the metadata
    pub fn run(mut self) -> Result<Metadata> {
        while let Some(segment) = self.segments.read_segment()? {
            if self.step(segment)? == Transition::Stop {
                break;
            }
        }
        self.finish()
    }

    fn step(&mut self, segment: Segment) -> Result<Transition> {
        match segment.marker {
            Marker::StartOfFrame(kind) => {
                let header = segment.payload.get(..FRAME_HEADER_SIZE).ok_or_else(|| {
                    Error::InternalFault(format!(
                        "{} payload has {} bytes, frame header needs {}",
                        segment.marker,
                        segment.len(),
                        FRAME_HEADER_SIZE
                    ))
                })?;
                self.metadata.bits_per_component = header[0];
                self.metadata.pixel_height = u16::from_be_bytes([header[1], header[2]]) as u32;
                self.metadata.pixel_width = u16::from_be_bytes([header[3], header[4]]) as u32;
                self.frame_found = true;
                debug!(
                    ?kind,
                    width = self.metadata.pixel_width,
                    height = self.metadata.pixel_height,
                    bits = self.metadata.bits_per_component,
                    "frame header"
                );
            }
            Marker::StartOfScan | Marker::EndOfImage => {
                debug!(marker = %segment.marker, "end of header segments");
                return Ok(Transition::Stop);
            }
            Marker::App(2) => self.profile_chunk(segment.payload)?,
            Marker::StartOfImage
            | Marker::Restart(_)
            | Marker::Temporary
            | Marker::App(_)
            | Marker::Other(_) => {}
        }

        if self.options.early_exit && self.all_extracted() {
            debug!(offset = self.segments.offset(), "all metadata extracted");
            return Ok(Transition::Stop);
        }
        Ok(Transition::Continue)
    }

    fn profile_chunk(&mut self, mut payload: Vec<u8>) -> Result<()> {
        if payload.len() < ICC_CHUNK_HEADER_SIZE {
            warn!(len = payload.len(), "APP2 segment too short for ICC profile chunk");
            return Ok(());
        }
        if !payload.starts_with(ICC_PROFILE_IDENTIFIER) {
            warn!("APP2 segment without ICC profile identifier");
            return Ok(());
        }

        let index = payload[ICC_PROFILE_IDENTIFIER.len()];
        let count = payload[ICC_PROFILE_IDENTIFIER.len() + 1];
        let data = payload.split_off(ICC_CHUNK_HEADER_SIZE);

        let table = self.chunks.get_or_insert_with(|| ChunkTable::new(count));
        table.insert(count, index, data)?;
        debug!(index, count, filled = table.filled(), "ICC profile chunk");
        Ok(())
    }

    fn all_extracted(&self) -> bool {
        self.frame_found && self.chunks.as_ref().is_none_or(ChunkTable::is_complete)
    }

    fn finish(mut self) -> Result<Metadata> {
        let consumed = self.segments.offset();
        if !self.frame_found {
            debug!(consumed, "no frame header found");
            return Err(Error::IncompleteMetadata);
        }

        if let Some(table) = self.chunks {
            if !table.is_complete() {
                warn!(
                    filled = table.filled(),
                    count = table.count(),
                    "incomplete ICC profile ignored"
                );
            }
            self.metadata.profile_data = table.assemble();
        }

        debug!(consumed, profile = self.metadata.has_profile(), "metadata extracted");
        Ok(self.metadata)
    }
}

/// Extract metadata from `reader` with default options
///
/// Consumes only as much of `reader` as needed. Use [`crate::load`] to get
/// the consumed bytes back.
pub fn extract_metadata<R: Read>(reader: R) -> Result<Metadata> {
    extract_metadata_with_options(reader, ExtractOptions::default())
}

/// Extract metadata from `reader`
pub fn extract_metadata_with_options<R: Read>(
    reader: R,
    options: ExtractOptions,
) -> Result<Metadata> {
    MetadataExtractor::new(reader, options).run()
}
