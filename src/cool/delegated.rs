//! ByteRle4 / ByteRle8: decoding handed to a [`RunLengthEngine`].
//!
//! The adapter does no byte-level work. It zeroes the destination (engines
//! may skip regions), resolves orientation, and passes the engine the
//! payload and the stream's bit depth.

use enough::Stop;

use super::geometry::RowGeometry;
use super::header::CompressionKind;
use crate::error::CoolError;
use crate::pixel::{Orientation, PixelBufferMut};

/// Bits per pixel of a byte run-length stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RleDepth {
    /// Two pixels per data byte, high nibble first.
    Four,
    /// One pixel per data byte.
    Eight,
}

impl RleDepth {
    pub const fn bits(self) -> u8 {
        match self {
            Self::Four => 4,
            Self::Eight => 8,
        }
    }
}

/// A byte-oriented run-length decoder.
///
/// Engines write lines in stream order, starting at line 0 and moving
/// forward; the [`RleTarget`] maps each stream line onto the right buffer
/// row. Output is one byte per pixel. Regions the stream skips are left as
/// they are (zeroed by the caller).
pub trait RunLengthEngine {
    fn decode_into(
        &self,
        target: &mut RleTarget<'_, '_>,
        depth: RleDepth,
        data: &[u8],
        stop: &dyn Stop,
    ) -> Result<(), CoolError>;
}

impl<E: RunLengthEngine + ?Sized> RunLengthEngine for &E {
    fn decode_into(
        &self,
        target: &mut RleTarget<'_, '_>,
        depth: RleDepth,
        data: &[u8],
        stop: &dyn Stop,
    ) -> Result<(), CoolError> {
        (**self).decode_into(target, depth, data, stop)
    }
}

/// Destination rows addressed in stream order.
pub struct RleTarget<'a, 'b> {
    buf: &'a mut PixelBufferMut<'b>,
    orientation: Orientation,
}

impl<'a, 'b> RleTarget<'a, 'b> {
    pub fn new(buf: &'a mut PixelBufferMut<'b>, orientation: Orientation) -> Self {
        Self { buf, orientation }
    }

    /// Pixels per line.
    pub fn width(&self) -> u32 {
        self.buf.width()
    }

    /// Number of lines.
    pub fn lines(&self) -> u32 {
        self.buf.rows()
    }

    /// Bytes of stream line `line`, or `None` past the last line.
    pub fn line_mut(&mut self, line: u32) -> Option<&mut [u8]> {
        let rows = self.buf.rows();
        if line >= rows {
            return None;
        }
        let y = self.orientation.buffer_row(line, rows);
        self.buf.row_mut(y)
    }
}

/// Zero `dst` and let `engine` decode `payload` into it.
pub(crate) fn decode(
    kind: CompressionKind,
    payload: &[u8],
    geometry: &RowGeometry,
    dst: &mut PixelBufferMut<'_>,
    engine: &dyn RunLengthEngine,
    stop: &dyn Stop,
) -> Result<(), CoolError> {
    let depth = match kind {
        CompressionKind::ByteRle4 => RleDepth::Four,
        CompressionKind::ByteRle8 => RleDepth::Eight,
        CompressionKind::Uncompressed8
        | CompressionKind::Bitfield16
        | CompressionKind::NibbleRle16 => {
            return Err(CoolError::UnsupportedCompression(kind.code()));
        }
    };
    dst.zero();
    stop.check()?;
    log::debug!(
        "COOL delegating {} bytes of {}-bit RLE, {:?}",
        payload.len(),
        depth.bits(),
        geometry.orientation
    );
    let mut target = RleTarget::new(dst, geometry.orientation);
    engine.decode_into(&mut target, depth, payload, stop)
}
