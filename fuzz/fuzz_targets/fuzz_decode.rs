#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Header probe and full decode must never panic
    let _ = zencool::probe(data);
    let _ = zencool::decode(data, enough::Unstoppable);

    // Caller buffer with a padded stride
    if let Ok(info) = zencool::probe(data) {
        let stride = info.width as usize * info.layout.bytes_per_pixel() + 3;
        let Some(len) = stride.checked_mul(info.height as usize) else {
            return;
        };
        if len > 1 << 22 {
            return;
        }
        let mut buf = vec![0u8; len];
        let _ = zencool::DecodeRequest::new(data).decode_into(
            &mut buf,
            stride,
            enough::Unstoppable,
        );
    }
});
