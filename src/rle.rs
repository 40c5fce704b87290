//! Default engine for the byte-oriented run-length variants.
//!
//! The stream is a sequence of two-byte commands. A nonzero first byte is an
//! encoded run: that many pixels taken from the second byte (for 4-bit
//! streams, alternating its high and low nibble). A zero first byte is an
//! escape selected by the second byte:
//!
//! - `0`: end of line
//! - `1`: end of bitmap
//! - `2`: delta, the next two bytes move right and forward by that many
//!   pixels and lines
//! - `n >= 3`: absolute run of `n` literal pixels, padded to a 16-bit
//!   boundary
//!
//! Lines are written in stream order. Input that ends without an end of
//! bitmap marker, or a delta that leaves the image, ends decoding; whatever
//! was not written stays zero.

use enough::Stop;

use crate::cool::{RleDepth, RleTarget, RunLengthEngine};
use crate::cursor::Cursor;
use crate::error::CoolError;

const ESCAPE: u8 = 0;
const END_OF_LINE: u8 = 0;
const END_OF_BITMAP: u8 = 1;
const DELTA: u8 = 2;

/// Bounds-checked byte RLE decoder for 4- and 8-bit streams.
#[derive(Clone, Copy, Debug, Default)]
pub struct ByteRle;

impl RunLengthEngine for ByteRle {
    fn decode_into(
        &self,
        target: &mut RleTarget<'_, '_>,
        depth: RleDepth,
        data: &[u8],
        stop: &dyn Stop,
    ) -> Result<(), CoolError> {
        let width = target.width();
        let lines = target.lines();
        let mut c = Cursor::payload(data);
        let mut line = 0u32;
        let mut pos = 0usize;
        let mut check_counter = 0u32;

        while line < lines && !c.eof() {
            check_counter += 1;
            if check_counter % 1024 == 0 {
                stop.check()?;
            }

            let count = c.read_u8()?;
            let value = c.read_u8()?;

            if count != ESCAPE {
                let end = checked_end(pos, usize::from(count), line, width)?;
                let row = row_of(target, line)?;
                match depth {
                    RleDepth::Eight => row[pos..end].fill(value),
                    RleDepth::Four => {
                        for (i, px) in row[pos..end].iter_mut().enumerate() {
                            *px = if i % 2 == 0 { value >> 4 } else { value & 0x0F };
                        }
                    }
                }
                pos = end;
                continue;
            }

            match value {
                END_OF_LINE => {
                    line += 1;
                    pos = 0;
                }
                END_OF_BITMAP => return Ok(()),
                DELTA => {
                    let dx = c.read_u8()?;
                    let dy = c.read_u8()?;
                    pos += usize::from(dx);
                    line = line.saturating_add(u32::from(dy));
                }
                literal => {
                    let n = usize::from(literal);
                    let end = checked_end(pos, n, line, width)?;
                    let data_len = match depth {
                        RleDepth::Eight => n,
                        RleDepth::Four => n.div_ceil(2),
                    };
                    let src = c.read_bytes(data_len)?;
                    let row = row_of(target, line)?;
                    match depth {
                        RleDepth::Eight => row[pos..end].copy_from_slice(src),
                        RleDepth::Four => {
                            for (i, px) in row[pos..end].iter_mut().enumerate() {
                                let byte = src[i / 2];
                                *px = if i % 2 == 0 { byte >> 4 } else { byte & 0x0F };
                            }
                        }
                    }
                    pos = end;
                    if data_len % 2 == 1 {
                        // Final padding byte may be absent at the very end.
                        let _ = c.skip(1);
                    }
                }
            }
        }
        Ok(())
    }
}

fn checked_end(pos: usize, n: usize, line: u32, width: u32) -> Result<usize, CoolError> {
    let end = pos + n;
    if end > width as usize {
        return Err(CoolError::RowOverrun {
            row: line,
            end,
            width,
        });
    }
    Ok(end)
}

fn row_of<'t>(target: &'t mut RleTarget<'_, '_>, line: u32) -> Result<&'t mut [u8], CoolError> {
    let width = target.width();
    target.line_mut(line).ok_or(CoolError::RowOverrun {
        row: line,
        end: 0,
        width,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pixel::{Orientation, PixelBufferMut, PixelLayout};
    use alloc::vec;
    use alloc::vec::Vec;
    use enough::Unstoppable;

    fn run(depth: RleDepth, width: u32, lines: u32, data: &[u8]) -> Result<Vec<u8>, CoolError> {
        let mut out = vec![0u8; (width * lines) as usize];
        let mut buf =
            PixelBufferMut::new(&mut out, width, lines, width as usize, PixelLayout::Gray8)?;
        let mut target = RleTarget::new(&mut buf, Orientation::TopDown);
        ByteRle.decode_into(&mut target, depth, data, &Unstoppable)?;
        Ok(out)
    }

    #[test]
    fn eight_bit_runs_and_lines() {
        let data = [3, 7, 0, 0, 1, 9, 2, 4, 0, 1];
        assert_eq!(run(RleDepth::Eight, 3, 2, &data).unwrap(), [7, 7, 7, 9, 4, 4]);
    }

    #[test]
    fn eight_bit_absolute_run_is_word_aligned() {
        // Three literals, one padding byte, then a run of one.
        let data = [0, 3, 1, 2, 3, 0xFF, 1, 5, 0, 1];
        assert_eq!(run(RleDepth::Eight, 4, 1, &data).unwrap(), [1, 2, 3, 5]);
    }

    #[test]
    fn four_bit_runs_alternate_nibbles() {
        let data = [5, 0x12, 0, 1];
        assert_eq!(run(RleDepth::Four, 5, 1, &data).unwrap(), [1, 2, 1, 2, 1]);
    }

    #[test]
    fn four_bit_absolute_run() {
        // Three nibbles in two bytes: even length, no padding.
        let data = [0, 3, 0xAB, 0xC0, 1, 0x0F, 0, 1];
        assert_eq!(run(RleDepth::Four, 4, 1, &data).unwrap(), [0xA, 0xB, 0xC, 0]);
    }

    #[test]
    fn delta_skips_pixels_and_lines() {
        let data = [0, 2, 1, 1, 1, 8, 0, 1];
        assert_eq!(run(RleDepth::Eight, 2, 2, &data).unwrap(), [0, 0, 0, 8]);
    }

    #[test]
    fn missing_end_marker_leaves_zeros() {
        let data = [2, 6];
        assert_eq!(run(RleDepth::Eight, 2, 2, &data).unwrap(), [6, 6, 0, 0]);
    }

    #[test]
    fn run_past_line_end_is_an_overrun() {
        let data = [3, 1];
        assert!(matches!(
            run(RleDepth::Eight, 2, 1, &data),
            Err(CoolError::RowOverrun { row: 0, end: 3, .. })
        ));
    }

    #[test]
    fn truncated_literal_run() {
        let data = [0, 4, 1, 2];
        assert!(matches!(
            run(RleDepth::Eight, 4, 1, &data),
            Err(CoolError::InsufficientPixelData { .. })
        ));
    }
}
