//! Uncompressed8 and Bitfield16: rows copied verbatim.
//!
//! Bitfield16 samples are little-endian on disk and native-endian in memory.
//! The channel masks are not consulted; samples are always RGB565.

use alloc::vec::Vec;
use enough::Stop;

use super::geometry::{RowGeometry, padded_row_bytes};
use crate::error::CoolError;
use crate::pixel::{Orientation, PixelBufferMut, PixelLayout, PixelSlice};

/// Copy `geometry.rows` stored rows of `src_row_bytes` each into `dst`.
pub(crate) fn decode(
    payload: &[u8],
    geometry: &RowGeometry,
    src_row_bytes: usize,
    dst: &mut PixelBufferMut<'_>,
    stop: &dyn Stop,
) -> Result<(), CoolError> {
    let row_len = geometry.out_row_bytes();
    for line in 0..geometry.rows {
        if line % 16 == 0 {
            stop.check()?;
        }
        let start = line as usize * src_row_bytes;
        let src = payload
            .get(start..start + row_len)
            .ok_or(CoolError::InsufficientPixelData {
                needed: start + row_len,
                actual: payload.len(),
            })?;
        let out = dst.row_mut_checked(geometry.buffer_row(line))?;
        match geometry.layout {
            PixelLayout::Gray8 => out.copy_from_slice(src),
            PixelLayout::Rgb565 => {
                for (o, s) in out.chunks_exact_mut(2).zip(src.chunks_exact(2)) {
                    o.copy_from_slice(&u16::from_le_bytes([s[0], s[1]]).to_ne_bytes());
                }
            }
        }
    }
    Ok(())
}

/// Encoded payload length for `src`.
pub(crate) fn encoded_len(src: &PixelSlice<'_>) -> Option<usize> {
    let bits = (src.layout().bytes_per_pixel() * 8) as u16;
    padded_row_bytes(src.width(), bits)?.checked_mul(src.rows() as usize)
}

/// Append padded rows of `src` in `orientation` order.
pub(crate) fn encode(
    src: &PixelSlice<'_>,
    orientation: Orientation,
    out: &mut Vec<u8>,
    stop: &dyn Stop,
) -> Result<(), CoolError> {
    let rows = src.rows();
    let row_len = src.width() as usize * src.layout().bytes_per_pixel();
    let pad = row_len.next_multiple_of(4) - row_len;
    for line in 0..rows {
        if line % 16 == 0 {
            stop.check()?;
        }
        let row = src.row_checked(orientation.buffer_row(line, rows))?;
        match src.layout() {
            PixelLayout::Gray8 => out.extend_from_slice(row),
            PixelLayout::Rgb565 => {
                for p in row.chunks_exact(2) {
                    out.extend_from_slice(&u16::from_ne_bytes([p[0], p[1]]).to_le_bytes());
                }
            }
        }
        out.extend(core::iter::repeat_n(0u8, pad));
    }
    Ok(())
}
