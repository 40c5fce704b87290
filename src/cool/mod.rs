//! COOL format: header, row geometry and the per-variant pixel codecs.
//!
//! Use [`crate::DecodeRequest`] / [`crate::EncodeRequest`] or the top-level
//! [`crate::decode`] / [`crate::encode`].

mod delegated;
mod geometry;
mod header;
mod nibble;
mod uncompressed;

pub use delegated::{RleDepth, RleTarget, RunLengthEngine};
pub use header::{CompressionKind, ImageHeader, RGB565_MASKS};
pub use nibble::{MAX_RUN, QUANT_MASK};

use alloc::vec::Vec;
use enough::Stop;

use crate::decode::{DecodeReport, DecodedImage};
use crate::diagnostics::Diagnostics;
use crate::error::CoolError;
use crate::info::ImageInfo;
use crate::limits::{Limits, check_limits};
use crate::pixel::{Orientation, PixelBufferMut, PixelSlice};
use geometry::{RowGeometry, RowLength};

/// Parse the header and geometry without touching pixel data.
pub(crate) fn probe(data: &[u8]) -> Result<ImageInfo, CoolError> {
    let mut diag = Diagnostics::new();
    let header = ImageHeader::parse_with(data, &mut diag)?;
    Ok(ImageInfo::from_header(&header))
}

struct Prepared<'a> {
    header: ImageHeader,
    geometry: RowGeometry,
    payload: &'a [u8],
    diag: Diagnostics,
}

fn prepare<'a>(data: &'a [u8], limits: Option<&Limits>) -> Result<Prepared<'a>, CoolError> {
    let mut diag = Diagnostics::new();
    let header = ImageHeader::parse_with(data, &mut diag)?;
    let payload = header.payload(data);
    let geometry = RowGeometry::new(&header, payload.len(), &mut diag)?;
    let out_bytes = geometry.out_bytes().ok_or(CoolError::DimensionError {
        width: i64::from(header.width),
        height: i64::from(header.height),
    })?;
    check_limits(limits, geometry.width, geometry.rows, out_bytes)?;
    Ok(Prepared {
        header,
        geometry,
        payload,
        diag,
    })
}

/// Run the pixel codec selected by the header.
fn fill(
    prepared: &Prepared<'_>,
    dst: &mut PixelBufferMut<'_>,
    engine: &dyn RunLengthEngine,
    stop: &dyn Stop,
) -> Result<(), CoolError> {
    let Prepared {
        header,
        geometry,
        payload,
        ..
    } = prepared;
    match (header.compression, geometry.row_length) {
        (
            CompressionKind::Uncompressed8 | CompressionKind::Bitfield16,
            RowLength::Fixed(src_row_bytes),
        ) => uncompressed::decode(payload, geometry, src_row_bytes, dst, stop),
        (CompressionKind::Uncompressed8 | CompressionKind::Bitfield16, RowLength::Variable) => {
            Err(CoolError::SizeInconsistency(
                "fixed-width variant without a row length".into(),
            ))
        }
        (CompressionKind::NibbleRle16, _) => nibble::decode(payload, geometry, dst, stop),
        (kind @ (CompressionKind::ByteRle4 | CompressionKind::ByteRle8), _) => {
            delegated::decode(kind, payload, geometry, dst, engine, stop)
        }
    }
}

/// Decode into a caller buffer with rows `stride` bytes apart.
pub(crate) fn decode_into(
    data: &[u8],
    buf: &mut [u8],
    stride: usize,
    limits: Option<&Limits>,
    engine: &dyn RunLengthEngine,
    stop: &dyn Stop,
) -> Result<DecodeReport, CoolError> {
    let prepared = prepare(data, limits)?;
    let g = prepared.geometry;
    let mut dst = PixelBufferMut::new(buf, g.width, g.rows, stride, g.layout)?;
    stop.check()?;
    fill(&prepared, &mut dst, engine, stop)?;
    Ok(DecodeReport {
        info: ImageInfo::from_header(&prepared.header),
        diagnostics: prepared.diag.into_vec(),
    })
}

/// Decode into a newly allocated, tightly packed buffer.
pub(crate) fn decode(
    data: &[u8],
    limits: Option<&Limits>,
    engine: &dyn RunLengthEngine,
    stop: &dyn Stop,
) -> Result<DecodedImage, CoolError> {
    let prepared = prepare(data, limits)?;
    let g = prepared.geometry;
    let stride = g.out_row_bytes();
    let mut pixels = try_alloc_zeroed(stride * g.rows as usize)?;
    stop.check()?;
    {
        let mut dst = PixelBufferMut::new(&mut pixels, g.width, g.rows, stride, g.layout)?;
        fill(&prepared, &mut dst, engine, stop)?;
    }
    Ok(DecodedImage::new(
        pixels,
        stride,
        ImageInfo::from_header(&prepared.header),
        prepared.diag.into_vec(),
    ))
}

/// Encode `src` as `kind`, header first.
pub(crate) fn encode(
    src: &PixelSlice<'_>,
    orientation: Orientation,
    kind: CompressionKind,
    limits: Option<&Limits>,
    stop: &dyn Stop,
) -> Result<Vec<u8>, CoolError> {
    let dims_err = || CoolError::DimensionError {
        width: i64::from(src.width()),
        height: i64::from(src.rows()),
    };
    if src.width() == 0 || src.rows() == 0 {
        return Err(dims_err());
    }
    if src.layout() != kind.output_layout() {
        return Err(CoolError::LayoutMismatch {
            expected: kind.output_layout(),
            actual: src.layout(),
        });
    }
    if let Some(limits) = limits {
        limits.check(src.width(), src.rows())?;
    }
    stop.check()?;

    let payload_len = match kind {
        CompressionKind::Uncompressed8 | CompressionKind::Bitfield16 => {
            uncompressed::encoded_len(src).ok_or_else(dims_err)?
        }
        CompressionKind::NibbleRle16 => nibble::encoded_len(src)?,
        CompressionKind::ByteRle4 | CompressionKind::ByteRle8 => {
            return Err(CoolError::EncodeUnsupported(kind));
        }
    };
    let header = ImageHeader::for_image(src.width(), src.rows(), orientation, kind, payload_len)?;
    let total = header.file_size as usize;
    if let Some(limits) = limits {
        limits.check_memory(total)?;
    }

    let mut out = Vec::new();
    out.try_reserve_exact(total)
        .map_err(|_| CoolError::AllocationFailure(total))?;
    header.write(&mut out);
    match kind {
        CompressionKind::Uncompressed8 | CompressionKind::Bitfield16 => {
            uncompressed::encode(src, orientation, &mut out, stop)?;
        }
        CompressionKind::NibbleRle16 => nibble::encode(src, orientation, &mut out, stop)?,
        CompressionKind::ByteRle4 | CompressionKind::ByteRle8 => {
            return Err(CoolError::EncodeUnsupported(kind));
        }
    }
    debug_assert_eq!(out.len(), total);
    log::debug!(
        "COOL encoded {}x{} {kind:?}: {total} bytes",
        src.width(),
        src.rows()
    );
    Ok(out)
}

/// Zeroed buffer of `len` bytes, or `AllocationFailure`.
///
/// The reservation is released again before `vec!` requests zeroed memory,
/// which the allocator can hand out without touching each page.
fn try_alloc_zeroed(len: usize) -> Result<Vec<u8>, CoolError> {
    let mut reservation = Vec::<u8>::new();
    reservation
        .try_reserve_exact(len)
        .map_err(|_| CoolError::AllocationFailure(len))?;
    drop(reservation);
    Ok(alloc::vec![0u8; len])
}
