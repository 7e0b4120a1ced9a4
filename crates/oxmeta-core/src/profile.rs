//! Hand-off of extracted ICC profiles to color management
//!
//! The extractor never looks inside the profile it reassembles. This module is
//! the boundary where those raw bytes are given to moxcms, wrapped so callers
//! get a stable API surface.

use moxcms::{DataColorSpace, ProfileClass};

use crate::{Error, Result};

/// ICC profile embedded in an image
///
/// Keeps the original bytes next to the parsed `moxcms::ColorProfile` so the
/// profile can be re-embedded or passed to another CMS unchanged.
#[derive(Debug, Clone)]
pub struct EmbeddedProfile {
    inner: moxcms::ColorProfile,
    data: Vec<u8>,
}

impl EmbeddedProfile {
    /// Parse raw ICC data
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let inner = moxcms::ColorProfile::new_from_slice(&data)
            .map_err(|e| Error::ProfileParse(format!("{:?}", e)))?;
        Ok(Self { inner, data })
    }

    /// Get the profile's data color space
    pub fn color_space(&self) -> DataColorSpace {
        self.inner.color_space
    }

    /// Get the profile connection space (PCS)
    pub fn pcs(&self) -> DataColorSpace {
        self.inner.pcs
    }

    /// Get the profile class
    pub fn profile_class(&self) -> ProfileClass {
        self.inner.profile_class
    }

    /// Check if this is a matrix-shaper profile
    pub fn is_matrix_shaper(&self) -> bool {
        self.inner.is_matrix_shaper()
    }

    /// Get description text if available
    pub fn description(&self) -> Option<String> {
        self.inner.description.as_ref().map(|text| match text {
            moxcms::ProfileText::PlainString(s) => s.clone(),
            moxcms::ProfileText::Localizable(locs) => {
                locs.first().map(|l| l.value.clone()).unwrap_or_default()
            }
            moxcms::ProfileText::Description(desc) => desc.ascii_string.clone(),
        })
    }

    /// Raw profile bytes as found in the image
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Access the inner moxcms profile
    pub fn inner(&self) -> &moxcms::ColorProfile {
        &self.inner
    }

    /// Take back the raw bytes
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }
}

impl AsRef<moxcms::ColorProfile> for EmbeddedProfile {
    fn as_ref(&self) -> &moxcms::ColorProfile {
        &self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reject_small_profile() {
        let err = EmbeddedProfile::from_bytes(vec![0u8; 64]).unwrap_err();
        assert!(matches!(err, Error::ProfileParse(_)));
    }

    #[test]
    fn test_reject_garbage() {
        let garbage: Vec<u8> = (0..512u32).map(|i| (i * 31 % 251) as u8).collect();
        assert!(EmbeddedProfile::from_bytes(garbage).is_err());
    }
}
