use alloc::vec::Vec;
use enough::Stop;

use crate::cool::{self, CompressionKind};
use crate::error::CoolError;
use crate::limits::Limits;
use crate::pixel::{Orientation, PixelLayout, PixelSlice};

/// Encode builder.
///
/// ```no_run
/// use zencool::{CompressionKind, EncodeRequest, Orientation, PixelLayout, Unstoppable};
///
/// let pixels = vec![0u8; 16 * 16 * 2]; // native-endian RGB565
/// let bytes = EncodeRequest::new(CompressionKind::NibbleRle16)
///     .with_orientation(Orientation::TopDown)
///     .encode(&pixels, 16, 16, PixelLayout::Rgb565, Unstoppable)?;
/// # Ok::<(), zencool::CoolError>(())
/// ```
#[derive(Clone, Debug)]
pub struct EncodeRequest<'a> {
    compression: CompressionKind,
    orientation: Orientation,
    limits: Option<&'a Limits>,
}

impl<'a> EncodeRequest<'a> {
    /// Encode with `compression`, bottom-up rows.
    pub fn new(compression: CompressionKind) -> Self {
        Self {
            compression,
            orientation: Orientation::BottomUp,
            limits: None,
        }
    }

    /// Stored row order; top-down writes a negative height.
    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn with_limits(mut self, limits: &'a Limits) -> Self {
        self.limits = Some(limits);
        self
    }

    /// Encode tightly packed rows, top row first.
    pub fn encode(
        &self,
        pixels: &[u8],
        width: u32,
        height: u32,
        layout: PixelLayout,
        stop: impl Stop,
    ) -> Result<Vec<u8>, CoolError> {
        let src = PixelSlice::packed(pixels, width, height, layout)?;
        self.encode_slice(&src, stop)
    }

    /// Encode strided rows.
    pub fn encode_slice(
        &self,
        src: &PixelSlice<'_>,
        stop: impl Stop,
    ) -> Result<Vec<u8>, CoolError> {
        cool::encode(src, self.orientation, self.compression, self.limits, &stop)
    }
}
