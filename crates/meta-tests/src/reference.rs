//! Reference profiles and CMS acceptance checks
//!
//! Profiles are serialized by lcms2 so the bytes are real, well-formed ICC
//! data. After extraction the same bytes are handed to every reference CMS.

use std::fmt;

use anyhow::Context;
use lcms2::{CIExyY, CIExyYTRIPLE, Profile, ToneCurve};

/// Reference CMS implementation for comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceCms {
    /// lcms2 - industry standard
    Lcms2,
    /// moxcms - pure Rust, also used by oxmeta's profile hand-off
    Moxcms,
    /// qcms - Firefox's CMS
    Qcms,
}

impl ReferenceCms {
    /// All reference implementations
    pub const ALL: [Self; 3] = [Self::Lcms2, Self::Moxcms, Self::Qcms];
}

impl fmt::Display for ReferenceCms {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReferenceCms::Lcms2 => write!(f, "lcms2"),
            ReferenceCms::Moxcms => write!(f, "moxcms"),
            ReferenceCms::Qcms => write!(f, "qcms"),
        }
    }
}

/// Whether `cms` parses `data` as an ICC profile
pub fn accepted_by(cms: ReferenceCms, data: &[u8]) -> bool {
    match cms {
        ReferenceCms::Lcms2 => Profile::new_icc(data).is_ok(),
        ReferenceCms::Moxcms => moxcms::ColorProfile::new_from_slice(data).is_ok(),
        ReferenceCms::Qcms => qcms::Profile::new_from_slice(data, false).is_some(),
    }
}

/// sRGB profile as serialized by lcms2
pub fn srgb_icc() -> anyhow::Result<Vec<u8>> {
    Profile::new_srgb()
        .icc()
        .context("lcms2 sRGB serialization")
}

/// Adobe RGB (1998)-like profile: D65, gamma 2.2, wide green primary
pub fn adobe_rgb_icc() -> anyhow::Result<Vec<u8>> {
    let white = CIExyY {
        x: 0.3127,
        y: 0.3290,
        Y: 1.0,
    };
    let primaries = CIExyYTRIPLE {
        Red: CIExyY {
            x: 0.64,
            y: 0.33,
            Y: 1.0,
        },
        Green: CIExyY {
            x: 0.21,
            y: 0.71,
            Y: 1.0,
        },
        Blue: CIExyY {
            x: 0.15,
            y: 0.06,
            Y: 1.0,
        },
    };
    let gamma = ToneCurve::new(563.0 / 256.0);
    let curves = [&gamma, &gamma, &gamma];

    let profile = Profile::new_rgb(&white, &primaries, &curves).context("lcms2 RGB profile")?;
    profile.icc().context("lcms2 RGB serialization")
}

/// Gray profile with the given gamma, D50 white
pub fn gray_icc(gamma: f64) -> anyhow::Result<Vec<u8>> {
    let d50 = CIExyY {
        x: 0.3457,
        y: 0.3585,
        Y: 1.0,
    };
    let curve = ToneCurve::new(gamma);
    let profile = Profile::new_gray(&d50, &curve).context("lcms2 gray profile")?;
    profile.icc().context("lcms2 gray serialization")
}

/// Named reference profiles used across tests
pub fn reference_profiles() -> anyhow::Result<Vec<(&'static str, Vec<u8>)>> {
    Ok(vec![
        ("sRGB", srgb_icc()?),
        ("AdobeRGB-like", adobe_rgb_icc()?),
        ("Gray 1.8", gray_icc(1.8)?),
    ])
}
