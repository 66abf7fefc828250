#!/usr/bin/env -S cargo +nightly -Zscript
//! Generate seed corpus files for fuzzing.
//! Run: cargo +nightly -Zscript fuzz/generate_seeds.rs

fn bmp_1bit(width: i32, height: i32, pixels: &[u8]) -> Vec<u8> {
    let mut bmp = vec![0u8; 62]; // 54 header + 2-entry color table
    bmp[0] = b'B'; bmp[1] = b'M';
    bmp[2..6].copy_from_slice(&((62 + pixels.len()) as u32).to_le_bytes()); // file size
    bmp[10..14].copy_from_slice(&62u32.to_le_bytes()); // data offset
    bmp[14..18].copy_from_slice(&40u32.to_le_bytes()); // DIB header size
    bmp[18..22].copy_from_slice(&width.to_le_bytes());
    bmp[22..26].copy_from_slice(&height.to_le_bytes());
    bmp[26..28].copy_from_slice(&1u16.to_le_bytes()); // planes
    bmp[28..30].copy_from_slice(&1u16.to_le_bytes()); // bpp
    bmp[58..62].copy_from_slice(&[0xff, 0xff, 0xff, 0x00]); // white
    bmp.extend_from_slice(pixels);
    bmp
}

fn main() {
    use std::fs;
    let dir = "fuzz/corpus/fuzz_decode";
    fs::create_dir_all(dir).unwrap();

    // 2x2 bottom-up diagonal
    fs::write(format!("{dir}/bmp_2x2.bmp"), bmp_1bit(2, 2, &[0x40, 0, 0, 0, 0x80, 0, 0, 0])).unwrap();

    // 13x2 top-down, exercises row padding
    fs::write(format!("{dir}/bmp_13x2_topdown.bmp"), bmp_1bit(13, -2, &[0xaa, 0xa8, 0, 0, 0x55, 0x50, 0, 0])).unwrap();

    // 4-bit header (rejected)
    let mut four = bmp_1bit(2, 2, &[0; 8]);
    four[28] = 4;
    fs::write(format!("{dir}/bmp_4bit.bmp"), four).unwrap();

    // Truncated/malformed seeds for edge coverage
    fs::write(format!("{dir}/empty.bin"), b"").unwrap();
    fs::write(format!("{dir}/bm_short.bin"), b"BM\x00\x00").unwrap();
    fs::write(format!("{dir}/bmp_truncated.bin"), &bmp_1bit(8, 4, &[0xff, 0, 0, 0])).unwrap();

    println!("Generated seed corpus in {dir}/");
}
