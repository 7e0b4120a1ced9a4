//! Extracted image metadata

use crate::Result;
use crate::profile::EmbeddedProfile;

/// Structural metadata read from the head of an image stream
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Metadata {
    /// Sample precision from the frame header
    pub bits_per_component: u8,
    /// Samples per line
    pub pixel_width: u32,
    /// Number of lines
    pub pixel_height: u32,
    /// Reassembled ICC profile, present only if every chunk was found
    pub profile_data: Option<Vec<u8>>,
}

impl Metadata {
    /// Whether a complete embedded profile was found
    pub fn has_profile(&self) -> bool {
        self.profile_data.is_some()
    }

    /// Hand the embedded profile to the color management engine
    ///
    /// Returns `Ok(None)` when the image carries no complete profile.
    pub fn color_profile(&self) -> Result<Option<EmbeddedProfile>> {
        self.profile_data
            .clone()
            .map(EmbeddedProfile::from_bytes)
            .transpose()
    }
}
