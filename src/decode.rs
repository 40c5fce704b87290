use alloc::vec::Vec;
use enough::Stop;

use crate::cool::{self, CompressionKind, RunLengthEngine};
use crate::diagnostics::Diagnostic;
use crate::error::CoolError;
use crate::info::ImageInfo;
use crate::limits::Limits;
use crate::pixel::{Orientation, PixelLayout, PixelSlice};
use crate::rle::ByteRle;

/// Decoded image: tightly packed rows, top row first.
#[derive(Clone, Debug)]
pub struct DecodedImage {
    pixels: Vec<u8>,
    pub width: u32,
    pub height: u32,
    /// Byte distance between row starts.
    pub stride: usize,
    /// How the file stored its rows.
    pub orientation: Orientation,
    pub layout: PixelLayout,
    pub compression: CompressionKind,
    /// Recoverable issues met while decoding.
    pub diagnostics: Vec<Diagnostic>,
}

impl DecodedImage {
    pub(crate) fn new(
        pixels: Vec<u8>,
        stride: usize,
        info: ImageInfo,
        diagnostics: Vec<Diagnostic>,
    ) -> Self {
        Self {
            pixels,
            width: info.width,
            height: info.height,
            stride,
            orientation: info.orientation,
            layout: info.layout,
            compression: info.compression,
            diagnostics,
        }
    }

    /// Access the pixel data.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Take ownership of the pixel data.
    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    /// Pixel bytes of row `y` (0 is the top).
    pub fn row(&self, y: u32) -> Option<&[u8]> {
        self.as_slice().row(y)
    }

    /// RGB565 value at `(x, y)`, or `None` for 8-bit images and out of range.
    pub fn rgb565_at(&self, x: u32, y: u32) -> Option<u16> {
        if self.layout != PixelLayout::Rgb565 || x >= self.width {
            return None;
        }
        let row = self.row(y)?;
        let off = x as usize * 2;
        Some(u16::from_ne_bytes([row[off], row[off + 1]]))
    }

    /// Borrow as an encoder input.
    ///
    /// The view is not re-validated; rows that no longer fit the buffer after
    /// the public fields were changed read as missing.
    pub fn as_slice(&self) -> PixelSlice<'_> {
        PixelSlice::from_parts(&self.pixels, self.width, self.height, self.stride, self.layout)
    }

    /// [`as_slice`](Self::as_slice), checked against the pixel buffer.
    #[cfg(feature = "imgref")]
    fn checked_slice(&self) -> Result<PixelSlice<'_>, CoolError> {
        if self.width == 0 || self.height == 0 {
            return Err(CoolError::DimensionError {
                width: i64::from(self.width),
                height: i64::from(self.height),
            });
        }
        PixelSlice::new(&self.pixels, self.width, self.height, self.stride, self.layout)
    }

    pub fn info(&self) -> ImageInfo {
        ImageInfo {
            width: self.width,
            height: self.height,
            orientation: self.orientation,
            compression: self.compression,
            layout: self.layout,
        }
    }

    /// Zero-copy view of 8-bit pixels as an [`imgref::ImgRef`].
    ///
    /// Returns [`CoolError::LayoutMismatch`] for RGB565 images.
    #[cfg(feature = "imgref")]
    pub fn as_imgref_u8(&self) -> Result<imgref::ImgRef<'_, u8>, CoolError> {
        if self.layout != PixelLayout::Gray8 {
            return Err(CoolError::LayoutMismatch {
                expected: PixelLayout::Gray8,
                actual: self.layout,
            });
        }
        self.checked_slice()?;
        Ok(imgref::ImgRef::new_stride(
            &self.pixels,
            self.width as usize,
            self.height as usize,
            self.stride,
        ))
    }

    /// RGB565 pixels as an [`imgref::ImgVec`].
    ///
    /// Returns [`CoolError::LayoutMismatch`] for 8-bit images.
    #[cfg(feature = "imgref")]
    pub fn to_imgvec_u16(&self) -> Result<imgref::ImgVec<u16>, CoolError> {
        if self.layout != PixelLayout::Rgb565 {
            return Err(CoolError::LayoutMismatch {
                expected: PixelLayout::Rgb565,
                actual: self.layout,
            });
        }
        let src = self.checked_slice()?;
        let mut out = Vec::with_capacity(self.width as usize * self.height as usize);
        for y in 0..self.height {
            out.extend(src.row_u16(y)?);
        }
        Ok(imgref::ImgVec::new(
            out,
            self.width as usize,
            self.height as usize,
        ))
    }
}

/// Result of decoding into a caller-supplied buffer.
#[derive(Clone, Debug)]
pub struct DecodeReport {
    pub info: ImageInfo,
    pub diagnostics: Vec<Diagnostic>,
}

/// Decode builder.
///
/// ```no_run
/// use zencool::{DecodeRequest, Limits, Unstoppable};
///
/// let data: &[u8] = &[]; // COOL file bytes
/// let limits = Limits { max_pixels: Some(1 << 24), ..Default::default() };
/// let image = DecodeRequest::new(data).with_limits(&limits).decode(Unstoppable)?;
/// println!("{}x{} {:?}", image.width, image.height, image.compression);
/// # Ok::<(), zencool::CoolError>(())
/// ```
pub struct DecodeRequest<'a> {
    data: &'a [u8],
    limits: Option<&'a Limits>,
    engine: &'a dyn RunLengthEngine,
}

impl<'a> DecodeRequest<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            limits: None,
            engine: &ByteRle,
        }
    }

    pub fn with_limits(mut self, limits: &'a Limits) -> Self {
        self.limits = Some(limits);
        self
    }

    /// Replace the default [`ByteRle`] engine for the byte-RLE variants.
    pub fn with_rle_engine(mut self, engine: &'a dyn RunLengthEngine) -> Self {
        self.engine = engine;
        self
    }

    /// Header metadata only.
    pub fn probe(&self) -> Result<ImageInfo, CoolError> {
        cool::probe(self.data)
    }

    /// Decode into a new buffer.
    pub fn decode(self, stop: impl Stop) -> Result<DecodedImage, CoolError> {
        cool::decode(self.data, self.limits, self.engine, &stop)
    }

    /// Decode into `buf`, rows `stride` bytes apart, top row first.
    ///
    /// `buf` is only written after the header and geometry validate. On a
    /// pixel-data error its contents are unspecified.
    pub fn decode_into(
        self,
        buf: &mut [u8],
        stride: usize,
        stop: impl Stop,
    ) -> Result<DecodeReport, CoolError> {
        cool::decode_into(self.data, buf, stride, self.limits, self.engine, &stop)
    }
}
