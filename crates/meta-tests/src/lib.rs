//! # meta-tests
//!
//! Fixture-driven and cross-CMS testing for oxmeta.
//!
//! This crate provides:
//! - A JPEG fixture builder for marker-level test streams
//! - Reference ICC profiles serialized by lcms2
//! - Acceptance checks handing extracted profiles to moxcms, lcms2 and qcms
//! - Readers that misbehave on purpose (short reads, interrupts, failures)
//!
//! ## Test Categories
//!
//! 1. **Extraction properties**: frame header fields, chunk ordering, error kinds
//! 2. **Replay round-trip**: the forked stream equals the original input
//! 3. **Profile parity**: extracted profiles are byte-identical and accepted
//!    by every reference CMS
//! 4. **Parallel extraction**: independent calls share no state

pub mod fixtures;
pub mod readers;
pub mod reference;

pub use fixtures::{JpegBuilder, split_profile};
pub use reference::{ReferenceCms, accepted_by};
