#![no_main]
use libfuzzer_sys::fuzz_target;
use zencool::*;

fuzz_target!(|data: &[u8]| {
    let limits = Limits {
        max_pixels: Some(1 << 20),
        ..Default::default()
    };
    let Ok(decoded) = DecodeRequest::new(data)
        .with_limits(&limits)
        .decode(enough::Unstoppable)
    else {
        return;
    };

    // Byte-RLE variants are decode-only; re-encode 8-bit output uncompressed
    let compression = match decoded.compression {
        CompressionKind::ByteRle4 | CompressionKind::ByteRle8 => CompressionKind::Uncompressed8,
        other => other,
    };

    let Ok(reencoded) = encode(&decoded, compression, enough::Unstoppable) else {
        panic!("decoded image failed to re-encode");
    };
    let Ok(decoded2) = decode(&reencoded, enough::Unstoppable) else {
        panic!("re-encoded data failed to decode");
    };

    assert_eq!(decoded.pixels(), decoded2.pixels(), "roundtrip pixel mismatch");
    assert_eq!(decoded.width, decoded2.width);
    assert_eq!(decoded.height, decoded2.height);
    assert_eq!(decoded.orientation, decoded2.orientation);
});
