use crate::cool::{CompressionKind, ImageHeader};
use crate::pixel::{Orientation, PixelLayout};

/// Image metadata available from the header alone.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
    pub orientation: Orientation,
    pub compression: CompressionKind,
    /// Layout the pixels decode to.
    pub layout: PixelLayout,
}

impl ImageInfo {
    /// Probe a COOL file's header.
    pub fn from_bytes(data: &[u8]) -> Result<Self, crate::CoolError> {
        crate::cool::probe(data)
    }

    pub(crate) fn from_header(header: &ImageHeader) -> Self {
        Self {
            width: header.width(),
            height: header.rows(),
            orientation: header.orientation(),
            compression: header.compression,
            layout: header.compression.output_layout(),
        }
    }

    /// Bytes of a tightly packed decoded buffer.
    pub fn output_bytes(&self) -> usize {
        self.width as usize * self.height as usize * self.layout.bytes_per_pixel()
    }
}
