use alloc::string::String;
use enough::StopReason;

use crate::cool::CompressionKind;

/// Errors from COOL decoding and encoding.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum CoolError {
    #[error("input truncated: need {needed} bytes, got {actual}")]
    TruncatedInput { needed: usize, actual: usize },

    #[error("bad magic bytes {found:02x?}, expected \"CO\"")]
    BadMagic { found: [u8; 2] },

    #[error("inconsistent header sizes: {0}")]
    SizeInconsistency(String),

    #[error("unsupported compression code {0}")]
    UnsupportedCompression(u32),

    #[error("invalid header: {0}")]
    InvalidHeader(String),

    #[error("invalid dimensions: {width}x{height}")]
    DimensionError { width: i64, height: i64 },

    #[error("insufficient pixel data: need {needed} bytes, got {actual}")]
    InsufficientPixelData { needed: usize, actual: usize },

    #[error("run overruns row {row}: {end} pixels into a {width}-pixel row")]
    RowOverrun { row: u32, end: usize, width: u32 },

    #[error("row {row} ended after {filled} of {width} pixels")]
    RowUnderrun { row: u32, filled: usize, width: u32 },

    #[error("allocation of {0} bytes failed")]
    AllocationFailure(usize),

    #[error("buffer too small: need {needed} bytes, got {actual}")]
    BufferTooSmall { needed: usize, actual: usize },

    #[error("pixel layout mismatch: expected {expected:?}, got {actual:?}")]
    LayoutMismatch {
        expected: crate::PixelLayout,
        actual: crate::PixelLayout,
    },

    #[error("{0:?} is decode-only")]
    EncodeUnsupported(CompressionKind),

    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    #[error("operation cancelled")]
    Cancelled(StopReason),
}

impl CoolError {
    /// Whether this error was raised while reading the header, before any
    /// pixel buffer was touched.
    pub fn is_header_error(&self) -> bool {
        matches!(
            self,
            Self::TruncatedInput { .. }
                | Self::BadMagic { .. }
                | Self::SizeInconsistency(_)
                | Self::UnsupportedCompression(_)
                | Self::InvalidHeader(_)
                | Self::DimensionError { .. }
        )
    }
}

impl From<StopReason> for CoolError {
    fn from(r: StopReason) -> Self {
        CoolError::Cancelled(r)
    }
}
