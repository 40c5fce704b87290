//! Test corpus: patterns, sizes, hand-built files and malformed input.

use enough::Unstoppable;
use zencool::*;

fn checkerboard(w: usize, h: usize) -> Vec<u8> {
    let mut pixels = vec![0u8; w * h];
    for y in 0..h {
        for x in 0..w {
            pixels[y * w + x] = if (x + y) % 2 == 0 { 220 } else { 10 };
        }
    }
    pixels
}

fn noise_rgb565(w: usize, h: usize) -> Vec<u16> {
    let mut state: u32 = 0xDEAD_BEEF;
    (0..w * h)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            state as u16
        })
        .collect()
}

fn gradient_rgb565(w: usize, h: usize) -> Vec<u16> {
    let mut pixels = Vec::with_capacity(w * h);
    for y in 0..h {
        for x in 0..w {
            let r = (x * 31 / w.max(1)) as u16;
            let g = (y * 63 / h.max(1)) as u16;
            pixels.push((r << 11) | (g << 5) | 0x0010);
        }
    }
    pixels
}

fn to_bytes(pixels: &[u16]) -> Vec<u8> {
    pixels.iter().flat_map(|p| p.to_ne_bytes()).collect()
}

/// Header followed by `payload`, as written by a conforming encoder.
fn raw_file(kind: CompressionKind, width: u32, height: i32, payload: &[u8]) -> Vec<u8> {
    let orientation = if height < 0 {
        Orientation::TopDown
    } else {
        Orientation::BottomUp
    };
    let header =
        ImageHeader::for_image(width, height.unsigned_abs(), orientation, kind, payload.len())
            .unwrap();
    let mut out = Vec::new();
    header.write(&mut out);
    out.extend_from_slice(payload);
    out
}

fn set_u32(data: &mut [u8], at: usize, value: u32) {
    data[at..at + 4].copy_from_slice(&value.to_le_bytes());
}

// ── Round-trips over sizes ───────────────────────────────────────────

#[test]
fn uncompressed8_odd_widths() {
    for (w, h) in [(1, 1), (3, 5), (5, 3), (7, 7), (33, 2)] {
        let pixels = checkerboard(w, h);
        for orientation in [Orientation::BottomUp, Orientation::TopDown] {
            let encoded = EncodeRequest::new(CompressionKind::Uncompressed8)
                .with_orientation(orientation)
                .encode(&pixels, w as u32, h as u32, PixelLayout::Gray8, Unstoppable)
                .unwrap();
            let row_bytes = (w + 3) & !3;
            assert_eq!(encoded.len(), 30 + row_bytes * h, "{w}x{h}");

            let decoded = decode(&encoded, Unstoppable).unwrap();
            assert_eq!(decoded.pixels(), &pixels[..], "{w}x{h} {orientation:?}");
            assert_eq!(decoded.orientation, orientation);
        }
    }
}

#[test]
fn bitfield16_noise_lossless() {
    for (w, h) in [(1, 1), (2, 3), (9, 4), (64, 17)] {
        let pixels = to_bytes(&noise_rgb565(w, h));
        let encoded = EncodeRequest::new(CompressionKind::Bitfield16)
            .encode(&pixels, w as u32, h as u32, PixelLayout::Rgb565, Unstoppable)
            .unwrap();
        let decoded = decode(&encoded, Unstoppable).unwrap();
        assert_eq!(decoded.pixels(), &pixels[..], "{w}x{h}");
    }
}

#[test]
fn nibble_rle_gradient_and_noise() {
    for src in [gradient_rgb565(40, 12), noise_rgb565(40, 12)] {
        let pixels = to_bytes(&src);
        for orientation in [Orientation::BottomUp, Orientation::TopDown] {
            let encoded = EncodeRequest::new(CompressionKind::NibbleRle16)
                .with_orientation(orientation)
                .encode(&pixels, 40, 12, PixelLayout::Rgb565, Unstoppable)
                .unwrap();
            let decoded = decode(&encoded, Unstoppable).unwrap();
            let expected: Vec<u16> = src.iter().map(|p| p & QUANT_MASK).collect();
            assert_eq!(decoded.pixels(), &to_bytes(&expected)[..]);

            // Quantized output is a fixed point.
            let again = encode(&decoded, CompressionKind::NibbleRle16, Unstoppable).unwrap();
            assert_eq!(again, encoded);
        }
    }
}

#[test]
fn nibble_rle_flat_image_compresses() {
    let pixels = to_bytes(&vec![0x8410u16; 100 * 10]);
    let encoded = EncodeRequest::new(CompressionKind::NibbleRle16)
        .encode(&pixels, 100, 10, PixelLayout::Rgb565, Unstoppable)
        .unwrap();
    // 7 tokens of <= 15 pixels plus the end marker per row, padded to 16 bytes.
    assert_eq!(encoded.len(), 30 + 16 * 10);
}

// ── Hand-built byte-RLE files ────────────────────────────────────────

#[test]
fn byte_rle8_runs_and_literals() {
    // Line 0: run of 3 x 7, line end. Line 1: literal [1, 2, 3] + pad, end of bitmap.
    let payload = [3, 7, 0, 0, 0, 3, 1, 2, 3, 0, 0, 1];
    let data = raw_file(CompressionKind::ByteRle8, 3, -2, &payload);
    let decoded = decode(&data, Unstoppable).unwrap();
    assert_eq!(decoded.layout, PixelLayout::Gray8);
    assert_eq!(decoded.pixels(), &[7, 7, 7, 1, 2, 3]);
}

#[test]
fn byte_rle8_bottom_up_fills_from_bottom() {
    let payload = [2, 1, 0, 0, 2, 2, 0, 1];
    let data = raw_file(CompressionKind::ByteRle8, 2, 2, &payload);
    let decoded = decode(&data, Unstoppable).unwrap();
    assert_eq!(decoded.pixels(), &[2, 2, 1, 1]);
}

#[test]
fn byte_rle4_alternating_nibbles() {
    // Run of 4 alternating 0xA/0xB, then end of bitmap.
    let data = raw_file(CompressionKind::ByteRle4, 4, -1, &[4, 0xAB, 0, 1]);
    let decoded = decode(&data, Unstoppable).unwrap();
    assert_eq!(decoded.pixels(), &[0xA, 0xB, 0xA, 0xB]);
}

#[test]
fn byte_rle_missing_end_leaves_zeros() {
    let data = raw_file(CompressionKind::ByteRle8, 4, -2, &[2, 9]);
    let decoded = decode(&data, Unstoppable).unwrap();
    assert_eq!(decoded.pixels(), &[9, 9, 0, 0, 0, 0, 0, 0]);
}

#[test]
fn byte_rle_cannot_be_encoded() {
    let err = EncodeRequest::new(CompressionKind::ByteRle8)
        .encode(&[0u8; 4], 2, 2, PixelLayout::Gray8, Unstoppable)
        .unwrap_err();
    assert!(matches!(err, CoolError::EncodeUnsupported(CompressionKind::ByteRle8)));
}

// ── Repairs and diagnostics ──────────────────────────────────────────

#[test]
fn header_only_file_size_is_repaired() {
    let mut data = raw_file(CompressionKind::Uncompressed8, 2, 1, &[5, 6, 0, 0]);
    set_u32(&mut data, 2, 30);
    let decoded = decode(&data, Unstoppable).unwrap();
    assert_eq!(decoded.pixels(), &[5, 6]);
    assert_eq!(
        decoded.diagnostics[0],
        Diagnostic::FileSizeRepaired {
            declared: 30,
            repaired: 32,
        }
    );
}

#[test]
fn oversized_file_size_is_clamped() {
    let mut data = raw_file(CompressionKind::Uncompressed8, 1, 1, &[9, 0, 0, 0]);
    set_u32(&mut data, 2, 1000);
    let decoded = decode(&data, Unstoppable).unwrap();
    assert_eq!(decoded.pixels(), &[9]);
    assert_eq!(
        decoded.diagnostics,
        vec![Diagnostic::FileSizeClamped {
            declared: 1000,
            available: 34,
        }]
    );
}

#[test]
fn unpadded_rows_are_accepted() {
    // Three rows of 3 bytes with no padding.
    let data = raw_file(
        CompressionKind::Uncompressed8,
        3,
        -3,
        &[1, 2, 3, 4, 5, 6, 7, 8, 9],
    );
    let decoded = decode(&data, Unstoppable).unwrap();
    assert_eq!(decoded.pixels(), &[1, 2, 3, 4, 5, 6, 7, 8, 9]);
    assert_eq!(
        decoded.diagnostics,
        vec![Diagnostic::AlignmentAssumption {
            padded_row_bytes: 4,
            unpadded_row_bytes: 3,
        }]
    );
}

// ── Malformed input ──────────────────────────────────────────────────

#[test]
fn bad_magic() {
    let mut data = b"XX".to_vec();
    data.extend_from_slice(&[0u8; 40]);
    assert!(matches!(
        decode(&data, Unstoppable),
        Err(CoolError::BadMagic { found: [b'X', b'X'] })
    ));
    // Wrong signature wins over truncation.
    assert!(matches!(
        decode(b"XX", Unstoppable),
        Err(CoolError::BadMagic { .. })
    ));
}

#[test]
fn truncated_header() {
    for len in [0, 1, 2, 13] {
        let data = raw_file(CompressionKind::Uncompressed8, 1, 1, &[0; 4]);
        let err = decode(&data[..len], Unstoppable).unwrap_err();
        assert!(
            matches!(err, CoolError::TruncatedInput { .. }),
            "len {len}: {err:?}"
        );
        assert!(err.is_header_error());
    }
}

#[test]
fn unknown_compression() {
    let mut data = raw_file(CompressionKind::Uncompressed8, 1, 1, &[0; 4]);
    set_u32(&mut data, 30 - 4, 9);
    assert!(matches!(
        decode(&data, Unstoppable),
        Err(CoolError::UnsupportedCompression(9))
    ));
}

#[test]
fn wrong_bits_per_pixel() {
    let mut data = raw_file(CompressionKind::Bitfield16, 1, 1, &[0; 4]);
    data[24..26].copy_from_slice(&8u16.to_le_bytes());
    assert!(matches!(
        decode(&data, Unstoppable),
        Err(CoolError::InvalidHeader(_))
    ));
}

#[test]
fn zero_dimensions() {
    let mut data = raw_file(CompressionKind::Uncompressed8, 1, 1, &[0; 4]);
    set_u32(&mut data, 18, 0);
    assert!(matches!(
        decode(&data, Unstoppable),
        Err(CoolError::DimensionError { height: 0, .. })
    ));
}

#[test]
fn not_enough_pixel_data() {
    let data = raw_file(CompressionKind::Bitfield16, 4, 4, &[0; 10]);
    assert!(matches!(
        decode(&data, Unstoppable),
        Err(CoolError::InsufficientPixelData { .. })
    ));
}

#[test]
fn nibble_rle_row_overrun() {
    // Width 2, one token of 3 pixels.
    let token = (0xF000u16 | 3).to_le_bytes();
    let data = raw_file(
        CompressionKind::NibbleRle16,
        2,
        -1,
        &[token[0], token[1], 0, 0],
    );
    assert!(matches!(
        decode(&data, Unstoppable),
        Err(CoolError::RowOverrun { row: 0, .. })
    ));
}

#[test]
fn nibble_rle_truncated_stream() {
    let token = (0xF000u16 | 2).to_le_bytes();
    let data = raw_file(CompressionKind::NibbleRle16, 2, -2, &[token[0], token[1], 0, 0]);
    assert!(matches!(
        decode(&data, Unstoppable),
        Err(CoolError::InsufficientPixelData { .. })
    ));
}

#[test]
fn nibble_rle_huge_dimensions_tiny_file() {
    // One token and an end marker claiming a 16384x16384 image.
    let token = (0xF000u16 | 1).to_le_bytes();
    let data = raw_file(
        CompressionKind::NibbleRle16,
        16384,
        -16384,
        &[token[0], token[1], 0, 0],
    );
    assert_eq!(data.len(), 34);
    match decode(&data, Unstoppable).unwrap_err() {
        CoolError::InsufficientPixelData { needed, actual } => {
            assert_eq!(actual, 4);
            assert!(needed > 16384 * 2);
        }
        other => panic!("expected InsufficientPixelData, got {other:?}"),
    }
}

#[test]
fn byte_rle_huge_dimensions_tiny_file() {
    // Sparse byte-RLE streams are accepted; only the end-of-bitmap marker here.
    let data = raw_file(CompressionKind::ByteRle8, 512, -512, &[0, 1]);
    let decoded = decode(&data, Unstoppable).unwrap();
    assert_eq!(decoded.pixels().len(), 512 * 512);
    assert!(decoded.pixels().iter().all(|&p| p == 0));
}

#[test]
fn every_prefix_fails_cleanly() {
    let pixels = to_bytes(&gradient_rgb565(5, 3));
    let encoded = EncodeRequest::new(CompressionKind::NibbleRle16)
        .encode(&pixels, 5, 3, PixelLayout::Rgb565, Unstoppable)
        .unwrap();
    for len in 0..encoded.len() {
        // Must return, never panic.
        let _ = decode(&encoded[..len], Unstoppable);
    }
}
