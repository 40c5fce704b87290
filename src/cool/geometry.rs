//! Row stride, padding and scan-line orientation.

use super::header::{CompressionKind, ImageHeader};
use super::nibble;
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::error::CoolError;
use crate::pixel::{Orientation, PixelLayout};

/// Stored length of one row of pixel data.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum RowLength {
    /// Every row occupies this many bytes.
    Fixed(usize),
    /// Rows are self-terminating token or byte streams.
    Variable,
}

/// Layout of pixel rows for one image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct RowGeometry {
    pub width: u32,
    pub rows: u32,
    pub orientation: Orientation,
    pub layout: PixelLayout,
    pub row_length: RowLength,
}

/// `ceil(width * bits / 8)`.
pub(crate) fn packed_row_bytes(width: u32, bits_per_pixel: u16) -> Option<usize> {
    (width as usize)
        .checked_mul(usize::from(bits_per_pixel))
        .map(|bits| bits.div_ceil(8))
}

/// Packed row length rounded up to a multiple of 4.
pub(crate) fn padded_row_bytes(width: u32, bits_per_pixel: u16) -> Option<usize> {
    packed_row_bytes(width, bits_per_pixel)?
        .checked_add(3)
        .map(|n| n & !3)
}

impl RowGeometry {
    /// Derive geometry for `header` given `available` bytes of pixel data.
    pub(crate) fn new(
        header: &ImageHeader,
        available: usize,
        diag: &mut Diagnostics,
    ) -> Result<Self, CoolError> {
        let width = header.width();
        let rows = header.rows();
        let too_large = || CoolError::DimensionError {
            width: i64::from(header.width),
            height: i64::from(header.height),
        };
        let kind = header.compression;

        let row_length = if kind.is_fixed_width() {
            let padded = padded_row_bytes(width, header.bits_per_pixel).ok_or_else(too_large)?;
            let packed = packed_row_bytes(width, header.bits_per_pixel).ok_or_else(too_large)?;
            let padded_total = padded.checked_mul(rows as usize).ok_or_else(too_large)?;
            if padded_total <= available {
                RowLength::Fixed(padded)
            } else {
                let packed_total = packed.checked_mul(rows as usize).ok_or_else(too_large)?;
                if packed_total > available {
                    return Err(CoolError::InsufficientPixelData {
                        needed: packed_total,
                        actual: available,
                    });
                }
                diag.push(Diagnostic::AlignmentAssumption {
                    padded_row_bytes: padded,
                    unpadded_row_bytes: packed,
                });
                RowLength::Fixed(packed)
            }
        } else {
            // NibbleRle16 rows carry every pixel; byte-RLE streams may skip.
            if kind == CompressionKind::NibbleRle16 {
                let needed = nibble::min_row_len(width)
                    .checked_mul(rows as usize)
                    .ok_or_else(too_large)?;
                if needed > available {
                    return Err(CoolError::InsufficientPixelData {
                        needed,
                        actual: available,
                    });
                }
            }
            RowLength::Variable
        };

        let geometry = Self {
            width,
            rows,
            orientation: header.orientation(),
            layout: kind.output_layout(),
            row_length,
        };
        log::debug!("COOL geometry: {geometry:?}");
        Ok(geometry)
    }

    /// Buffer row receiving stored line `line`.
    #[inline]
    pub(crate) fn buffer_row(&self, line: u32) -> u32 {
        self.orientation.buffer_row(line, self.rows)
    }

    /// Packed length of one decoded row.
    pub(crate) fn out_row_bytes(&self) -> usize {
        self.width as usize * self.layout.bytes_per_pixel()
    }

    /// Bytes needed for a tightly packed decoded image.
    pub(crate) fn out_bytes(&self) -> Option<usize> {
        self.out_row_bytes().checked_mul(self.rows as usize)
    }
}
