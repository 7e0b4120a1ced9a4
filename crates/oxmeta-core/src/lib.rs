//! # oxmeta - streaming JPEG metadata extraction
//!
//! Reads the frame dimensions, sample precision and embedded ICC profile from
//! the head of a JPEG stream without decoding, or even buffering, the image.
//!
//! ## Pipeline
//!
//! - [`scanner::MarkerScanner`] frames raw bytes into marker segments
//! - [`segment::SegmentReader`] pulls those segments one at a time
//! - [`extract::MetadataExtractor`] interprets them and reassembles the
//!   (possibly multi-chunk) ICC profile
//! - [`fork`] records the consumed prefix so the caller can still read the
//!   complete stream afterwards
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::io::Read;
//!
//! let file = std::fs::File::open("photo.jpg").unwrap();
//! let (metadata, mut stream) = oxmeta_core::load(file);
//!
//! let metadata = metadata.unwrap();
//! println!(
//!     "{}x{} @ {} bits",
//!     metadata.pixel_width, metadata.pixel_height, metadata.bits_per_component
//! );
//!
//! if let Some(profile) = metadata.color_profile().unwrap() {
//!     println!("embedded profile: {:?}", profile.description());
//! }
//!
//! // Hand the complete, untouched stream to a decoder
//! let mut jpeg = Vec::new();
//! stream.read_to_end(&mut jpeg).unwrap();
//! ```
//!
//! Logging goes through `tracing`; install a subscriber to see segment-level
//! `trace!` and extraction `debug!` events.

pub mod error;
pub mod extract;
pub mod fork;
pub mod marker;
pub mod metadata;
pub mod profile;
pub mod scanner;
pub mod segment;

pub use error::{Error, Result};
pub use extract::{
    ChunkTable, ExtractOptions, ICC_PROFILE_IDENTIFIER, MetadataExtractor, extract_metadata,
    extract_metadata_with_options,
};
pub use fork::{ReplayReader, load, load_with_options};
pub use marker::{FrameKind, Marker};
pub use metadata::Metadata;
pub use profile::EmbeddedProfile;
pub use segment::{Segment, SegmentReader};

pub use moxcms::{DataColorSpace, ProfileClass};

/// Version of oxmeta
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
