#!/usr/bin/env -S cargo +nightly -Zscript
//! Generate seed corpus files for fuzzing.
//! Run: cargo +nightly -Zscript fuzz/generate_seeds.rs

fn header(image_type: u8, map: Option<(u16, u8)>, w: u16, h: u16, bpp: u8, desc: u8) -> Vec<u8> {
    let mut v = vec![0u8; 18];
    v[2] = image_type;
    if let Some((len, entry)) = map {
        v[1] = 1;
        v[5..7].copy_from_slice(&len.to_le_bytes());
        v[7] = entry;
    }
    v[12..14].copy_from_slice(&w.to_le_bytes());
    v[14..16].copy_from_slice(&h.to_le_bytes());
    v[16] = bpp;
    v[17] = desc;
    v
}

fn main() {
    use std::fs;
    let dir = "fuzz/corpus/fuzz_decode";
    fs::create_dir_all(dir).unwrap();

    // True-color 2x2, 24-bit, top-left origin
    let mut tc = header(2, None, 2, 2, 24, 0x20);
    tc.extend_from_slice(b"\xff\x00\x00\x00\xff\x00\x00\x00\xff\x80\x80\x80");
    fs::write(format!("{dir}/truecolor_2x2.tga"), tc).unwrap();

    // RLE true-color 4x1, 32-bit with 8 alpha bits: run of 3 then 1 literal
    let mut rle = header(10, None, 4, 1, 32, 0x08);
    rle.extend_from_slice(b"\x82\x10\x20\x30\xff\x00\x01\x02\x03\x80");
    fs::write(format!("{dir}/rle_truecolor_4x1.tga"), rle).unwrap();

    // Greyscale 3x2 with a 4-byte image ID
    let mut grey = header(3, None, 3, 2, 8, 0);
    grey[0] = 4;
    grey.extend_from_slice(b"seed\x00\x40\x80\xc0\xff\x64");
    fs::write(format!("{dir}/grey_3x2_id.tga"), grey).unwrap();

    // RLE greyscale 130x1: max run then short literal
    let mut rle_grey = header(11, None, 130, 1, 8, 0);
    rle_grey.extend_from_slice(b"\xff\x07\x01\x08\x09");
    fs::write(format!("{dir}/rle_grey_130x1.tga"), rle_grey).unwrap();

    // Color-mapped 2x2, 4 x 24-bit entries
    let mut mapped = header(1, Some((4, 24)), 2, 2, 8, 0);
    mapped.extend_from_slice(b"\x00\x00\x00\x10\x20\x30\x40\x50\x60\x70\x80\x90");
    mapped.extend_from_slice(b"\x03\x02\x01\x00");
    fs::write(format!("{dir}/mapped_2x2.tga"), mapped).unwrap();

    // RLE color-mapped 5x1, 16-bit entries
    let mut rle_mapped = header(9, Some((2, 16)), 5, 1, 8, 0);
    rle_mapped.extend_from_slice(b"\x1f\x7c\xe0\x03");
    rle_mapped.extend_from_slice(b"\x83\x01\x00\x00");
    fs::write(format!("{dir}/rle_mapped_5x1.tga"), rle_mapped).unwrap();

    // True-color with an ignored 15-bit palette
    let mut skipped = header(2, Some((3, 15)), 1, 1, 24, 0);
    skipped.extend_from_slice(&[0u8; 6]);
    skipped.extend_from_slice(b"\x01\x02\x03");
    fs::write(format!("{dir}/truecolor_skipped_map.tga"), skipped).unwrap();

    // Truncated/malformed seeds for edge coverage
    fs::write(format!("{dir}/empty.bin"), b"").unwrap();
    fs::write(format!("{dir}/short_header.bin"), &header(2, None, 1, 1, 24, 0)[..10]).unwrap();
    fs::write(format!("{dir}/mapped_no_map.bin"), header(1, None, 1, 1, 8, 0)).unwrap();
    fs::write(format!("{dir}/odd_depth.bin"), header(2, None, 1, 1, 17, 0)).unwrap();
    let mut overrun = header(11, None, 2, 1, 8, 0);
    overrun.extend_from_slice(b"\x85\x00");
    fs::write(format!("{dir}/rle_overrun.bin"), overrun).unwrap();

    println!("Generated seed corpus in {dir}/");
}
