//! NibbleRle16: 16-bit run tokens of 4-bit-per-channel color.
//!
//! A token holds red in bits 15-12, green in 11-8, blue in 7-4 and a repeat
//! count in 3-0. Each row is a token stream closed by `0x0000` and padded to
//! a 4-byte boundary. Decoded pixels are RGB565 with the channel bits below
//! the stored nibble cleared.

use alloc::vec::Vec;
use core::iter::Peekable;
use enough::Stop;

use super::geometry::RowGeometry;
use crate::cursor::Cursor;
use crate::error::CoolError;
use crate::pixel::{Orientation, PixelBufferMut, PixelSlice};

/// RGB565 bits that survive the 4-bit quantization.
pub const QUANT_MASK: u16 = 0xF79E;

/// Longest run one token can describe.
///
/// The count field is 4 bits and read literally, so 15 is the largest value
/// that decodes back to the same length.
pub const MAX_RUN: u16 = 15;

const END_OF_ROW: u16 = 0x0000;
const COUNT_MASK: u16 = 0x000F;

/// Expand a token's color to RGB565.
#[inline]
pub fn widen(token: u16) -> u16 {
    (token & 0xF000) | ((token & 0x0F00) >> 1) | ((token & 0x00F0) >> 3)
}

/// Pack the quantized color of `pixel` with a repeat count.
#[inline]
pub fn narrow(pixel: u16, run: u16) -> u16 {
    debug_assert!((1..=MAX_RUN).contains(&run));
    (pixel & 0xF000) | ((pixel & 0x0780) << 1) | ((pixel & 0x001E) << 3) | (run & COUNT_MASK)
}

/// Decode one token stream per row into `dst`.
pub(crate) fn decode(
    payload: &[u8],
    geometry: &RowGeometry,
    dst: &mut PixelBufferMut<'_>,
    stop: &dyn Stop,
) -> Result<(), CoolError> {
    let width = geometry.width as usize;
    let mut c = Cursor::payload(payload);

    for line in 0..geometry.rows {
        if line % 16 == 0 {
            stop.check()?;
        }
        let row_start = c.position();
        let out = dst.row_mut_checked(geometry.buffer_row(line))?;
        let mut filled = 0usize;

        loop {
            let token = c.read_u16_le()?;
            if token == END_OF_ROW {
                break;
            }
            let end = filled + usize::from(token & COUNT_MASK);
            if end > width {
                return Err(CoolError::RowOverrun {
                    row: line,
                    end,
                    width: geometry.width,
                });
            }
            let px = widen(token).to_ne_bytes();
            for o in out[filled * 2..end * 2].chunks_exact_mut(2) {
                o.copy_from_slice(&px);
            }
            filled = end;
        }

        if filled < width {
            return Err(CoolError::RowUnderrun {
                row: line,
                filled,
                width: geometry.width,
            });
        }
        if (c.position() - row_start) % 4 != 0 {
            c.skip(2)?;
        }
        log::trace!("COOL nibble row {line}: {} bytes", c.position() - row_start);
    }
    Ok(())
}

/// Runs of pixels equal under [`QUANT_MASK`], at most [`MAX_RUN`] long.
struct Runs<I: Iterator<Item = u16>> {
    pixels: Peekable<I>,
}

impl<I: Iterator<Item = u16>> Runs<I> {
    fn new(pixels: I) -> Self {
        Self {
            pixels: pixels.peekable(),
        }
    }
}

impl<I: Iterator<Item = u16>> Iterator for Runs<I> {
    type Item = (u16, u16);

    fn next(&mut self) -> Option<(u16, u16)> {
        let first = self.pixels.next()?;
        let key = first & QUANT_MASK;
        let mut len = 1;
        while len < MAX_RUN
            && self
                .pixels
                .next_if(|&p| p & QUANT_MASK == key)
                .is_some()
        {
            len += 1;
        }
        Some((first, len))
    }
}

/// Bytes for a row of `runs` tokens plus the end marker, 4-byte aligned.
fn row_len(runs: usize) -> usize {
    ((runs + 1) * 2).next_multiple_of(4)
}

/// Smallest encoding of a `width`-pixel row: every token a full run.
pub(crate) fn min_row_len(width: u32) -> usize {
    row_len((width as usize).div_ceil(usize::from(MAX_RUN)))
}

/// Encoded payload length for `src`.
pub(crate) fn encoded_len(src: &PixelSlice<'_>) -> Result<usize, CoolError> {
    let mut total = 0usize;
    for y in 0..src.rows() {
        total += row_len(Runs::new(src.row_u16(y)?).count());
    }
    Ok(total)
}

/// Append the token streams of `src` in `orientation` order.
pub(crate) fn encode(
    src: &PixelSlice<'_>,
    orientation: Orientation,
    out: &mut Vec<u8>,
    stop: &dyn Stop,
) -> Result<(), CoolError> {
    let rows = src.rows();
    for line in 0..rows {
        if line % 16 == 0 {
            stop.check()?;
        }
        let row_start = out.len();
        for (pixel, run) in Runs::new(src.row_u16(orientation.buffer_row(line, rows))?) {
            out.extend_from_slice(&narrow(pixel, run).to_le_bytes());
        }
        out.extend_from_slice(&END_OF_ROW.to_le_bytes());
        let written = out.len() - row_start;
        out.extend(core::iter::repeat_n(0u8, written.next_multiple_of(4) - written));
    }
    Ok(())
}
