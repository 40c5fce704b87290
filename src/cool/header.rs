//! COOL header: 14-byte file header, 16-byte info header, optional masks.

use alloc::vec::Vec;

use crate::cursor::Cursor;
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::error::CoolError;
use crate::pixel::{Orientation, PixelLayout};

pub(crate) const MAGIC: [u8; 2] = *b"CO";
/// magic + file size + header offset + info header size.
pub(crate) const FILE_HEADER_LEN: u32 = 14;
/// width + height + planes + bit depth + compression.
pub(crate) const INFO_FIXED_LEN: u32 = 16;
pub(crate) const MASKS_LEN: u32 = 12;

/// Red, green, blue masks written for Bitfield16.
pub const RGB565_MASKS: [u32; 3] = [0xF800, 0x07E0, 0x001F];

/// Pixel compression scheme of a COOL file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CompressionKind {
    /// 8 bits per pixel, stored verbatim.
    Uncompressed8,
    /// 16 bits per pixel RGB565, stored verbatim little-endian.
    Bitfield16,
    /// 16-bit tokens of 4-bit RGB plus a 4-bit repeat count.
    NibbleRle16,
    /// Byte-oriented run-length stream of 4-bit indices.
    ByteRle4,
    /// Byte-oriented run-length stream of 8-bit indices.
    ByteRle8,
}

impl CompressionKind {
    /// Wire value of the compression field.
    pub const fn code(self) -> u32 {
        match self {
            Self::Uncompressed8 => 0,
            Self::ByteRle8 => 1,
            Self::ByteRle4 => 2,
            Self::Bitfield16 => 3,
            Self::NibbleRle16 => 4,
        }
    }

    pub const fn from_code(code: u32) -> Option<Self> {
        match code {
            0 => Some(Self::Uncompressed8),
            1 => Some(Self::ByteRle8),
            2 => Some(Self::ByteRle4),
            3 => Some(Self::Bitfield16),
            4 => Some(Self::NibbleRle16),
            _ => None,
        }
    }

    /// Header bit depth this variant is stored with.
    pub const fn bits_per_pixel(self) -> u16 {
        match self {
            Self::Uncompressed8 | Self::ByteRle4 | Self::ByteRle8 => 8,
            Self::Bitfield16 | Self::NibbleRle16 => 16,
        }
    }

    /// Layout of the decoded pixels.
    pub const fn output_layout(self) -> PixelLayout {
        match self {
            Self::Uncompressed8 | Self::ByteRle4 | Self::ByteRle8 => PixelLayout::Gray8,
            Self::Bitfield16 | Self::NibbleRle16 => PixelLayout::Rgb565,
        }
    }

    /// Decoded by an injected byte run-length engine.
    pub const fn is_delegated(self) -> bool {
        matches!(self, Self::ByteRle4 | Self::ByteRle8)
    }

    /// Rows are a fixed number of bytes.
    pub const fn is_fixed_width(self) -> bool {
        matches!(self, Self::Uncompressed8 | Self::Bitfield16)
    }
}

/// Parsed COOL header.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageHeader {
    pub file_size: u32,
    pub header_offset: u32,
    pub info_header_size: u32,
    pub width: i32,
    pub height: i32,
    pub color_planes: u16,
    pub bits_per_pixel: u16,
    pub compression: CompressionKind,
    /// Red, green, blue masks; Bitfield16 only.
    pub channel_masks: Option<[u32; 3]>,
}

impl ImageHeader {
    /// Parse and validate a header, dropping any diagnostics.
    pub fn parse(data: &[u8]) -> Result<Self, CoolError> {
        Self::parse_with(data, &mut Diagnostics::new())
    }

    pub(crate) fn parse_with(data: &[u8], diag: &mut Diagnostics) -> Result<Self, CoolError> {
        let available = data.len();
        // A wrong signature is reported as such however short the input.
        if available >= 2 && data[..2] != MAGIC {
            return Err(CoolError::BadMagic {
                found: [data[0], data[1]],
            });
        }
        if available < FILE_HEADER_LEN as usize {
            return Err(CoolError::TruncatedInput {
                needed: FILE_HEADER_LEN as usize,
                actual: available,
            });
        }

        let mut c = Cursor::header(data);
        c.skip(MAGIC.len())?;
        let mut file_size = c.read_u32_le()?;
        let header_offset = c.read_u32_le()?;
        let info_header_size = c.read_u32_le()?;

        let info_end = u64::from(info_header_size) + u64::from(FILE_HEADER_LEN);
        if info_end > u64::from(header_offset) {
            return Err(CoolError::SizeInconsistency(alloc::format!(
                "info header of {info_header_size} bytes overlaps pixel data at {header_offset}"
            )));
        }

        let available_u32 = u32::try_from(available).unwrap_or(u32::MAX);
        if u64::from(file_size) == u64::from(FILE_HEADER_LEN) || u64::from(file_size) == info_end {
            let repaired = available_u32 - 2;
            diag.push(Diagnostic::FileSizeRepaired {
                declared: file_size,
                repaired,
            });
            file_size = repaired;
        } else if file_size > available_u32 {
            diag.push(Diagnostic::FileSizeClamped {
                declared: file_size,
                available: available_u32,
            });
            file_size = available_u32;
        }
        if file_size <= header_offset {
            return Err(CoolError::SizeInconsistency(alloc::format!(
                "file size {file_size} leaves no pixel data after offset {header_offset}"
            )));
        }
        if info_header_size < INFO_FIXED_LEN {
            return Err(CoolError::SizeInconsistency(alloc::format!(
                "info header of {info_header_size} bytes is shorter than {INFO_FIXED_LEN}"
            )));
        }

        let width = c.read_i32_le()?;
        let height = c.read_i32_le()?;
        let color_planes = c.read_u16_le()?;
        let bits_per_pixel = c.read_u16_le()?;
        let code = c.read_u32_le()?;
        let compression =
            CompressionKind::from_code(code).ok_or(CoolError::UnsupportedCompression(code))?;

        if color_planes != 1 {
            return Err(CoolError::InvalidHeader(alloc::format!(
                "color planes is {color_planes}, expected 1"
            )));
        }
        if bits_per_pixel != compression.bits_per_pixel() {
            return Err(CoolError::InvalidHeader(alloc::format!(
                "{compression:?} needs {} bits per pixel, header says {bits_per_pixel}",
                compression.bits_per_pixel()
            )));
        }
        if width <= 0 || height == 0 {
            return Err(CoolError::DimensionError {
                width: i64::from(width),
                height: i64::from(height),
            });
        }

        let channel_masks = match compression {
            CompressionKind::Bitfield16 => {
                if info_header_size < INFO_FIXED_LEN + MASKS_LEN {
                    return Err(CoolError::SizeInconsistency(alloc::format!(
                        "info header of {info_header_size} bytes has no room for channel masks"
                    )));
                }
                Some([c.read_u32_le()?, c.read_u32_le()?, c.read_u32_le()?])
            }
            CompressionKind::Uncompressed8
            | CompressionKind::NibbleRle16
            | CompressionKind::ByteRle4
            | CompressionKind::ByteRle8 => None,
        };

        log::debug!(
            "COOL header: {width}x{height} {compression:?}, pixels at {header_offset}..{file_size}"
        );

        Ok(Self {
            file_size,
            header_offset,
            info_header_size,
            width,
            height,
            color_planes,
            bits_per_pixel,
            compression,
            channel_masks,
        })
    }

    /// Header describing an encoded image of `payload_len` pixel bytes.
    pub fn for_image(
        width: u32,
        height: u32,
        orientation: Orientation,
        compression: CompressionKind,
        payload_len: usize,
    ) -> Result<Self, CoolError> {
        let dims_err = || CoolError::DimensionError {
            width: i64::from(width),
            height: i64::from(height),
        };
        let w = i32::try_from(width).map_err(|_| dims_err())?;
        let h = i32::try_from(height).map_err(|_| dims_err())?;
        if w == 0 || h == 0 {
            return Err(dims_err());
        }

        let (info_header_size, channel_masks) = match compression {
            CompressionKind::Bitfield16 => (INFO_FIXED_LEN + MASKS_LEN, Some(RGB565_MASKS)),
            CompressionKind::Uncompressed8
            | CompressionKind::NibbleRle16
            | CompressionKind::ByteRle4
            | CompressionKind::ByteRle8 => (INFO_FIXED_LEN, None),
        };
        let header_offset = FILE_HEADER_LEN + info_header_size;
        let file_size = u32::try_from(payload_len)
            .ok()
            .and_then(|n| n.checked_add(header_offset))
            .ok_or_else(|| {
                CoolError::SizeInconsistency(alloc::format!(
                    "{payload_len} bytes of pixel data exceed the 32-bit file size field"
                ))
            })?;

        Ok(Self {
            file_size,
            header_offset,
            info_header_size,
            width: w,
            height: match orientation {
                Orientation::BottomUp => h,
                Orientation::TopDown => -h,
            },
            color_planes: 1,
            bits_per_pixel: compression.bits_per_pixel(),
            compression,
            channel_masks,
        })
    }

    /// Append the header; zero-fills up to `header_offset`.
    pub fn write(&self, out: &mut Vec<u8>) {
        let start = out.len();
        out.extend_from_slice(&MAGIC);
        out.extend_from_slice(&self.file_size.to_le_bytes());
        out.extend_from_slice(&self.header_offset.to_le_bytes());
        out.extend_from_slice(&self.info_header_size.to_le_bytes());
        out.extend_from_slice(&self.width.to_le_bytes());
        out.extend_from_slice(&self.height.to_le_bytes());
        out.extend_from_slice(&self.color_planes.to_le_bytes());
        out.extend_from_slice(&self.bits_per_pixel.to_le_bytes());
        out.extend_from_slice(&self.compression.code().to_le_bytes());
        if let Some(masks) = self.channel_masks {
            for mask in masks {
                out.extend_from_slice(&mask.to_le_bytes());
            }
        }
        let written = out.len() - start;
        let pad = (self.header_offset as usize).saturating_sub(written);
        out.extend(core::iter::repeat_n(0u8, pad));
    }

    pub fn orientation(&self) -> Orientation {
        Orientation::from_height(self.height)
    }

    /// Image width in pixels. Validated positive by [`parse`](Self::parse).
    pub fn width(&self) -> u32 {
        self.width.unsigned_abs()
    }

    /// Row count, `|height|`.
    pub fn rows(&self) -> u32 {
        self.height.unsigned_abs()
    }

    /// Pixel data region within the input.
    pub(crate) fn payload<'a>(&self, data: &'a [u8]) -> &'a [u8] {
        let start = (self.header_offset as usize).min(data.len());
        let end = (self.file_size as usize).clamp(start, data.len());
        &data[start..end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn encoded(h: &ImageHeader, payload: usize) -> Vec<u8> {
        let mut out = Vec::new();
        h.write(&mut out);
        out.resize(out.len() + payload, 0);
        out
    }

    /// 2x2 bottom-up Uncompressed8 with 8 bytes of pixel data.
    fn gray_2x2() -> ImageHeader {
        ImageHeader::for_image(2, 2, Orientation::BottomUp, CompressionKind::Uncompressed8, 8)
            .unwrap()
    }

    #[test]
    fn roundtrip_every_kind() {
        for kind in [
            CompressionKind::Uncompressed8,
            CompressionKind::Bitfield16,
            CompressionKind::NibbleRle16,
            CompressionKind::ByteRle4,
            CompressionKind::ByteRle8,
        ] {
            for orientation in [Orientation::TopDown, Orientation::BottomUp] {
                let h = ImageHeader::for_image(7, 3, orientation, kind, 40).unwrap();
                let data = encoded(&h, 40);
                assert_eq!(data.len(), h.file_size as usize);
                assert_eq!(ImageHeader::parse(&data).unwrap(), h);
            }
        }
    }

    #[test]
    fn bitfield_header_carries_masks() {
        let h = ImageHeader::for_image(1, 1, Orientation::BottomUp, CompressionKind::Bitfield16, 4)
            .unwrap();
        assert_eq!(h.header_offset, 42);
        let data = encoded(&h, 4);
        assert_eq!(&data[30..34], &0xF800u32.to_le_bytes());
        assert_eq!(&data[38..42], &0x001Fu32.to_le_bytes());
    }

    #[test]
    fn compression_codes_are_closed() {
        for code in 0..5 {
            assert_eq!(CompressionKind::from_code(code).unwrap().code(), code);
        }
        assert!(CompressionKind::from_code(5).is_none());
    }

    #[test]
    fn short_input_is_truncated() {
        assert!(matches!(
            ImageHeader::parse(b"CO\x10\x00"),
            Err(CoolError::TruncatedInput {
                needed: 14,
                actual: 4
            })
        ));
        assert!(matches!(
            ImageHeader::parse(&[]),
            Err(CoolError::TruncatedInput { .. })
        ));
    }

    #[test]
    fn bad_magic() {
        let mut data = vec![0u8; 64];
        data[0] = b'B';
        data[1] = b'M';
        assert!(matches!(
            ImageHeader::parse(&data),
            Err(CoolError::BadMagic { found: [b'B', b'M'] })
        ));
    }

    #[test]
    fn info_header_overlapping_pixels() {
        let h = gray_2x2();
        let mut data = encoded(&h, 8);
        data[10..14].copy_from_slice(&40u32.to_le_bytes());
        assert!(matches!(
            ImageHeader::parse(&data),
            Err(CoolError::SizeInconsistency(_))
        ));
    }

    #[test]
    fn header_only_file_size_is_repaired() {
        let h = gray_2x2();
        for declared in [14u32, 30] {
            let mut data = encoded(&h, 8);
            data[2..6].copy_from_slice(&declared.to_le_bytes());
            let mut diag = Diagnostics::new();
            let parsed = ImageHeader::parse_with(&data, &mut diag).unwrap();
            assert_eq!(parsed.file_size, data.len() as u32 - 2);
            assert_eq!(
                diag.into_vec(),
                vec![Diagnostic::FileSizeRepaired {
                    declared,
                    repaired: data.len() as u32 - 2
                }]
            );
        }
    }

    #[test]
    fn oversized_file_size_is_clamped() {
        let h = gray_2x2();
        let mut data = encoded(&h, 8);
        data[2..6].copy_from_slice(&1000u32.to_le_bytes());
        let mut diag = Diagnostics::new();
        let parsed = ImageHeader::parse_with(&data, &mut diag).unwrap();
        assert_eq!(parsed.file_size, data.len() as u32);
        assert!(matches!(
            diag.into_vec()[..],
            [Diagnostic::FileSizeClamped { declared: 1000, .. }]
        ));
    }

    #[test]
    fn file_size_must_pass_offset() {
        let h = gray_2x2();
        let mut data = encoded(&h, 8);
        data[2..6].copy_from_slice(&29u32.to_le_bytes());
        assert!(matches!(
            ImageHeader::parse(&data),
            Err(CoolError::SizeInconsistency(_))
        ));
    }

    #[test]
    fn unknown_compression() {
        let h = gray_2x2();
        let mut data = encoded(&h, 8);
        data[26..30].copy_from_slice(&9u32.to_le_bytes());
        assert!(matches!(
            ImageHeader::parse(&data),
            Err(CoolError::UnsupportedCompression(9))
        ));
    }

    #[test]
    fn planes_and_depth_are_checked() {
        let h = gray_2x2();
        let mut data = encoded(&h, 8);
        data[22..24].copy_from_slice(&2u16.to_le_bytes());
        assert!(matches!(
            ImageHeader::parse(&data),
            Err(CoolError::InvalidHeader(_))
        ));

        let mut data = encoded(&h, 8);
        data[24..26].copy_from_slice(&16u16.to_le_bytes());
        assert!(matches!(
            ImageHeader::parse(&data),
            Err(CoolError::InvalidHeader(_))
        ));
    }

    #[test]
    fn zero_and_negative_dimensions() {
        let h = gray_2x2();
        for (offset, value) in [(14usize, 0i32), (14, -3), (18, 0)] {
            let mut data = encoded(&h, 8);
            data[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
            assert!(matches!(
                ImageHeader::parse(&data),
                Err(CoolError::DimensionError { .. })
            ));
        }
    }

    #[test]
    fn height_sign_selects_orientation() {
        let h =
            ImageHeader::for_image(3, 5, Orientation::TopDown, CompressionKind::Uncompressed8, 20)
                .unwrap();
        assert_eq!(h.height, -5);
        let parsed = ImageHeader::parse(&encoded(&h, 20)).unwrap();
        assert_eq!(parsed.orientation(), Orientation::TopDown);
        assert_eq!(parsed.rows(), 5);
    }
}
