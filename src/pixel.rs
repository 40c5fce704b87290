use core::fmt;

use crate::error::CoolError;

/// Pixel memory layout of decoded output.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PixelLayout {
    /// Single channel, 8 bits per pixel. Uncompressed8 samples and the
    /// byte-RLE variants' expanded indices.
    Gray8,
    /// 16-bit 5-6-5 RGB, native endian.
    Rgb565,
}

impl PixelLayout {
    /// Bytes per pixel for this layout.
    pub fn bytes_per_pixel(&self) -> usize {
        match self {
            Self::Gray8 => 1,
            Self::Rgb565 => 2,
        }
    }
}

/// Which scan line the stored pixel data starts with.
///
/// Derived from the sign of the header height. The decoded buffer itself is
/// always top row first; orientation records how the file stored it and is
/// what the encoder writes back.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Orientation {
    /// Negative height: the first stored line is the top of the image.
    TopDown,
    /// Positive height: the first stored line is the bottom of the image.
    #[default]
    BottomUp,
}

impl Orientation {
    /// Orientation selected by a header height value.
    pub fn from_height(height: i32) -> Self {
        if height < 0 {
            Self::TopDown
        } else {
            Self::BottomUp
        }
    }

    /// Buffer row that receives stored scan line `line` of `rows`.
    #[inline]
    pub(crate) fn buffer_row(self, line: u32, rows: u32) -> u32 {
        match self {
            Self::TopDown => line,
            Self::BottomUp => rows - 1 - line,
        }
    }
}

/// Mutable, caller-owned view of pixel rows.
///
/// Rows are `stride` bytes apart; only the first `width * bytes_per_pixel`
/// bytes of each row are written.
pub struct PixelBufferMut<'a> {
    data: &'a mut [u8],
    width: u32,
    rows: u32,
    stride: usize,
    layout: PixelLayout,
}

impl<'a> PixelBufferMut<'a> {
    /// Wrap a caller buffer.
    ///
    /// Fails with [`CoolError::BufferTooSmall`] if `stride` is shorter than a
    /// packed row or `data` cannot hold `rows` rows.
    pub fn new(
        data: &'a mut [u8],
        width: u32,
        rows: u32,
        stride: usize,
        layout: PixelLayout,
    ) -> Result<Self, CoolError> {
        let min_stride = (width as usize)
            .checked_mul(layout.bytes_per_pixel())
            .ok_or(CoolError::DimensionError {
                width: i64::from(width),
                height: i64::from(rows),
            })?;
        if stride < min_stride {
            return Err(CoolError::BufferTooSmall {
                needed: min_stride,
                actual: stride,
            });
        }
        let needed = required_bytes(rows, stride, min_stride).ok_or(CoolError::DimensionError {
            width: i64::from(width),
            height: i64::from(rows),
        })?;
        if data.len() < needed {
            return Err(CoolError::BufferTooSmall {
                needed,
                actual: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            rows,
            stride,
            layout,
        })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn rows(&self) -> u32 {
        self.rows
    }

    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }

    #[inline]
    pub fn layout(&self) -> PixelLayout {
        self.layout
    }

    /// Packed byte length of one row.
    #[inline]
    pub fn row_bytes(&self) -> usize {
        self.width as usize * self.layout.bytes_per_pixel()
    }

    /// Pixel bytes for row `y`, or `None` past the last row.
    pub fn row(&self, y: u32) -> Option<&[u8]> {
        if y >= self.rows {
            return None;
        }
        let start = y as usize * self.stride;
        self.data.get(start..start + self.row_bytes())
    }

    /// Mutable pixel bytes for row `y`, or `None` past the last row.
    pub fn row_mut(&mut self, y: u32) -> Option<&mut [u8]> {
        if y >= self.rows {
            return None;
        }
        let start = y as usize * self.stride;
        let len = self.row_bytes();
        self.data.get_mut(start..start + len)
    }

    /// Like [`row_mut`](Self::row_mut), failing with `BufferTooSmall`.
    pub(crate) fn row_mut_checked(&mut self, y: u32) -> Result<&mut [u8], CoolError> {
        let needed = (y as usize + 1).saturating_mul(self.stride);
        let actual = self.data.len();
        self.row_mut(y)
            .ok_or(CoolError::BufferTooSmall { needed, actual })
    }

    /// Zero every row (padding between rows is left alone).
    pub fn zero(&mut self) {
        let len = self.row_bytes();
        for y in 0..self.rows as usize {
            let start = y * self.stride;
            self.data[start..start + len].fill(0);
        }
    }
}

impl fmt::Debug for PixelBufferMut<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PixelBufferMut({}x{}, stride {}, {:?})",
            self.width, self.rows, self.stride, self.layout
        )
    }
}

/// Borrowed pixel rows to encode.
#[derive(Clone, Copy)]
pub struct PixelSlice<'a> {
    data: &'a [u8],
    width: u32,
    rows: u32,
    stride: usize,
    layout: PixelLayout,
}

impl<'a> PixelSlice<'a> {
    /// Wrap pixel rows `stride` bytes apart.
    ///
    /// `Rgb565` samples are native-endian `u16`s.
    pub fn new(
        data: &'a [u8],
        width: u32,
        rows: u32,
        stride: usize,
        layout: PixelLayout,
    ) -> Result<Self, CoolError> {
        let min_stride = (width as usize)
            .checked_mul(layout.bytes_per_pixel())
            .ok_or(CoolError::DimensionError {
                width: i64::from(width),
                height: i64::from(rows),
            })?;
        if stride < min_stride {
            return Err(CoolError::BufferTooSmall {
                needed: min_stride,
                actual: stride,
            });
        }
        let needed = required_bytes(rows, stride, min_stride).ok_or(CoolError::DimensionError {
            width: i64::from(width),
            height: i64::from(rows),
        })?;
        if data.len() < needed {
            return Err(CoolError::BufferTooSmall {
                needed,
                actual: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            rows,
            stride,
            layout,
        })
    }

    /// Unvalidated view; rows that fall outside `data` read as `None`.
    pub(crate) fn from_parts(
        data: &'a [u8],
        width: u32,
        rows: u32,
        stride: usize,
        layout: PixelLayout,
    ) -> Self {
        Self {
            data,
            width,
            rows,
            stride,
            layout,
        }
    }

    /// Tightly packed rows.
    pub fn packed(
        data: &'a [u8],
        width: u32,
        rows: u32,
        layout: PixelLayout,
    ) -> Result<Self, CoolError> {
        let stride = (width as usize).saturating_mul(layout.bytes_per_pixel());
        Self::new(data, width, rows, stride, layout)
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn rows(&self) -> u32 {
        self.rows
    }

    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }

    #[inline]
    pub fn layout(&self) -> PixelLayout {
        self.layout
    }

    /// Pixel bytes for row `y`, or `None` past the last row.
    pub fn row(&self, y: u32) -> Option<&'a [u8]> {
        if y >= self.rows {
            return None;
        }
        let start = (y as usize).checked_mul(self.stride)?;
        let len = (self.width as usize).checked_mul(self.layout.bytes_per_pixel())?;
        self.data.get(start..start.checked_add(len)?)
    }

    pub(crate) fn row_checked(&self, y: u32) -> Result<&'a [u8], CoolError> {
        self.row(y).ok_or(CoolError::BufferTooSmall {
            needed: (y as usize + 1).saturating_mul(self.stride),
            actual: self.data.len(),
        })
    }

    /// Row `y` as `Rgb565` samples.
    pub(crate) fn row_u16(&self, y: u32) -> Result<impl Iterator<Item = u16> + 'a, CoolError> {
        Ok(self
            .row_checked(y)?
            .chunks_exact(2)
            .map(|p| u16::from_ne_bytes([p[0], p[1]])))
    }
}

impl fmt::Debug for PixelSlice<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PixelSlice({}x{}, stride {}, {:?})",
            self.width, self.rows, self.stride, self.layout
        )
    }
}

/// Bytes needed for `rows` rows where the last row need not carry padding.
pub(crate) fn required_bytes(rows: u32, stride: usize, row_bytes: usize) -> Option<usize> {
    if rows == 0 {
        return Some(0);
    }
    stride
        .checked_mul(rows as usize - 1)?
        .checked_add(row_bytes)
}
