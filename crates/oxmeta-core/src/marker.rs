//! JPEG marker codes
//!
//! Every segment in a JPEG stream starts with a `0xFF` sync byte followed by a
//! one-byte marker code. Only the markers the extractor acts on get their own
//! variant; everything else is carried through as [`Marker::Other`].

/// Sync byte preceding every marker code
pub const MARKER_SYNC: u8 = 0xFF;

/// Frame encoding announced by a start-of-frame marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameKind {
    /// SOF0, baseline DCT
    Baseline,
    /// SOF2, progressive DCT
    Progressive,
}

/// Role of a segment in the marker stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Marker {
    /// SOI (0xD8)
    StartOfImage,
    /// SOF0 / SOF2, carries sample precision and dimensions
    StartOfFrame(FrameKind),
    /// SOS (0xDA), entropy-coded data follows
    StartOfScan,
    /// EOI (0xD9)
    EndOfImage,
    /// RSTn (0xD0..=0xD7)
    Restart(u8),
    /// TEM (0x01)
    Temporary,
    /// APPn (0xE0..=0xEF)
    App(u8),
    /// Any other marker; payload is skipped
    Other(u8),
}

impl Marker {
    /// APP2 carries embedded ICC profile chunks
    pub const ICC_PROFILE: Self = Self::App(2);

    /// Classify a raw marker code
    pub fn from_code(code: u8) -> Self {
        match code {
            0xD8 => Self::StartOfImage,
            0xC0 => Self::StartOfFrame(FrameKind::Baseline),
            0xC2 => Self::StartOfFrame(FrameKind::Progressive),
            0xDA => Self::StartOfScan,
            0xD9 => Self::EndOfImage,
            0xD0..=0xD7 => Self::Restart(code - 0xD0),
            0x01 => Self::Temporary,
            0xE0..=0xEF => Self::App(code - 0xE0),
            _ => Self::Other(code),
        }
    }

    /// Raw marker code
    pub fn code(self) -> u8 {
        match self {
            Self::StartOfImage => 0xD8,
            Self::StartOfFrame(FrameKind::Baseline) => 0xC0,
            Self::StartOfFrame(FrameKind::Progressive) => 0xC2,
            Self::StartOfScan => 0xDA,
            Self::EndOfImage => 0xD9,
            Self::Restart(n) => 0xD0 + (n & 0x07),
            Self::Temporary => 0x01,
            Self::App(n) => 0xE0 + (n & 0x0F),
            Self::Other(code) => code,
        }
    }

    /// Standalone markers have no length field and no payload
    pub fn is_standalone(self) -> bool {
        matches!(
            self,
            Self::StartOfImage | Self::EndOfImage | Self::Restart(_) | Self::Temporary
        )
    }
}

impl std::fmt::Display for Marker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StartOfImage => write!(f, "SOI"),
            Self::StartOfFrame(FrameKind::Baseline) => write!(f, "SOF0"),
            Self::StartOfFrame(FrameKind::Progressive) => write!(f, "SOF2"),
            Self::StartOfScan => write!(f, "SOS"),
            Self::EndOfImage => write!(f, "EOI"),
            Self::Restart(n) => write!(f, "RST{}", n),
            Self::Temporary => write!(f, "TEM"),
            Self::App(n) => write!(f, "APP{}", n),
            Self::Other(code) => write!(f, "0x{:02X}", code),
        }
    }
}
