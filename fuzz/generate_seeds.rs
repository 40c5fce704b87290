#!/usr/bin/env -S cargo +nightly -Zscript
//! Generate seed corpus files for fuzzing.
//! Run: cargo +nightly -Zscript fuzz/generate_seeds.rs

fn header(out: &mut Vec<u8>, width: i32, height: i32, bpp: u16, compression: u32, masks: bool) {
    let info: u32 = if masks { 28 } else { 16 };
    out.extend_from_slice(b"CO");
    out.extend_from_slice(&0u32.to_le_bytes()); // file size, patched below
    out.extend_from_slice(&(14 + info).to_le_bytes());
    out.extend_from_slice(&info.to_le_bytes());
    out.extend_from_slice(&width.to_le_bytes());
    out.extend_from_slice(&height.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes());
    out.extend_from_slice(&bpp.to_le_bytes());
    out.extend_from_slice(&compression.to_le_bytes());
    if masks {
        for m in [0xF800u32, 0x07E0, 0x001F] {
            out.extend_from_slice(&m.to_le_bytes());
        }
    }
}

fn finish(mut out: Vec<u8>) -> Vec<u8> {
    let len = out.len() as u32;
    out[2..6].copy_from_slice(&len.to_le_bytes());
    out
}

fn main() {
    use std::fs;
    let dir = "fuzz/corpus/fuzz_decode";
    fs::create_dir_all(dir).unwrap();

    // Uncompressed8 1x1
    let mut f = Vec::new();
    header(&mut f, 1, 1, 8, 0, false);
    f.extend_from_slice(&[0x7F, 0, 0, 0]);
    fs::write(format!("{dir}/gray_1x1.cool"), finish(f)).unwrap();

    // Bitfield16 2x2 top-down
    let mut f = Vec::new();
    header(&mut f, 2, -2, 16, 3, true);
    for p in [0xF800u16, 0x07E0, 0x001F, 0xFFFF] {
        f.extend_from_slice(&p.to_le_bytes());
    }
    fs::write(format!("{dir}/rgb565_2x2.cool"), finish(f)).unwrap();

    // NibbleRle16 4x1: one run of 4, end marker
    let mut f = Vec::new();
    header(&mut f, 4, 1, 16, 4, false);
    f.extend_from_slice(&(0xF0F4u16).to_le_bytes());
    f.extend_from_slice(&[0, 0]);
    fs::write(format!("{dir}/nibble_4x1.cool"), finish(f)).unwrap();

    // ByteRle8 3x2 and ByteRle4 4x1
    let mut f = Vec::new();
    header(&mut f, 3, 2, 8, 1, false);
    f.extend_from_slice(&[3, 7, 0, 0, 0, 3, 1, 2, 3, 0, 0, 1]);
    fs::write(format!("{dir}/rle8_3x2.cool"), finish(f)).unwrap();

    let mut f = Vec::new();
    header(&mut f, 4, 1, 8, 2, false);
    f.extend_from_slice(&[4, 0xAB, 0, 1]);
    fs::write(format!("{dir}/rle4_4x1.cool"), finish(f)).unwrap();

    // Truncated/malformed seeds for edge coverage
    fs::write(format!("{dir}/empty.bin"), b"").unwrap();
    fs::write(format!("{dir}/just_magic.bin"), b"CO").unwrap();
    fs::write(format!("{dir}/bad_magic.bin"), b"XX\x00\x00").unwrap();
    let mut f = Vec::new();
    header(&mut f, 1, 1, 8, 0, false);
    f[2..6].copy_from_slice(&30u32.to_le_bytes());
    f.extend_from_slice(&[1, 2, 3, 4]);
    fs::write(format!("{dir}/header_only_size.cool"), f).unwrap();

    println!("Generated seed corpus in {dir}/");
}
