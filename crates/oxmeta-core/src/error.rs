//! Error types for oxmeta

use thiserror::Error;

/// Result type for oxmeta operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while extracting image metadata
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Marker/length framing violation (bad sync byte, truncated length or payload)
    #[error("Malformed segment: {0}")]
    MalformedSegment(String),

    /// Two ICC profile segments declared different total chunk counts
    #[error("Inconsistent ICC profile chunk count: expected {expected}, got {actual}")]
    InconsistentProfileChunks { expected: usize, actual: usize },

    /// ICC profile chunk index outside `1..=count`
    #[error("Invalid ICC profile chunk index {index} (chunk count {count})")]
    InvalidChunkIndex { index: u8, count: usize },

    /// ICC profile chunk index seen twice
    #[error("Duplicated ICC profile chunk {0}")]
    DuplicateChunk(u8),

    /// The stream ended before a frame header was found
    #[error("Incomplete metadata: no start-of-frame segment found")]
    IncompleteMetadata,

    /// Unanticipated fault while scanning segments
    #[error("Internal fault while extracting image metadata: {0}")]
    InternalFault(String),

    /// Embedded profile bytes were rejected by the color management engine
    #[error("Profile parse error: {0}")]
    ProfileParse(String),

    /// I/O error from the source stream
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Shorthand for a framing violation
    pub(crate) fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedSegment(msg.into())
    }

    /// Whether this error came from the source stream rather than its contents
    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io(_))
    }
}
