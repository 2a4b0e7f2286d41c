//! Test corpus: roundtrips over patterns, sizes and depths, plus malformed input.

use enough::Unstoppable;
use zentga::*;

fn checkerboard(w: usize, h: usize, bpp: usize) -> Vec<u8> {
    let mut pixels = vec![0u8; w * h * bpp];
    for y in 0..h {
        for x in 0..w {
            let off = (y * w + x) * bpp;
            if (x + y) % 2 == 0 {
                for c in 0..bpp {
                    pixels[off + c] = 200 + (c as u8 * 20) % 50;
                }
            } else {
                for c in 0..bpp {
                    pixels[off + c] = 10 + (c as u8 * 30) % 90;
                }
            }
        }
    }
    pixels
}

fn noise_pattern(w: usize, h: usize, bpp: usize) -> Vec<u8> {
    let mut pixels = vec![0u8; w * h * bpp];
    let mut state: u32 = 0xDEAD_BEEF;
    for p in pixels.iter_mut() {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        *p = state as u8;
    }
    pixels
}

/// Horizontal stripes of identical pixels, the RLE best case.
fn stripes(w: usize, h: usize, bpp: usize) -> Vec<u8> {
    let mut pixels = vec![0u8; w * h * bpp];
    for (i, px) in pixels.chunks_exact_mut(bpp).enumerate() {
        px.fill((i / w / 3) as u8 * 40);
    }
    pixels
}

fn tga(header: TgaHeader, body: &[u8]) -> Vec<u8> {
    let mut v = header.to_bytes().to_vec();
    v.extend_from_slice(body);
    v
}

fn all_options() -> impl Iterator<Item = TgaOptions> {
    (0..4u8).flat_map(|flip| {
        [TgaOptions::empty(), TgaOptions::RLE]
            .into_iter()
            .map(move |rle| TgaOptions::from_bits_truncate(flip << 1) | rle)
    })
}

// ── Roundtrips ───────────────────────────────────────────────────────

#[test]
fn pattern_grid_roundtrip() {
    let patterns: [(&str, fn(usize, usize, usize) -> Vec<u8>); 3] = [
        ("checkerboard", checkerboard),
        ("noise", noise_pattern),
        ("stripes", stripes),
    ];
    let sizes = [(1, 1), (1, 7), (7, 1), (3, 3), (17, 9), (130, 3)];
    let depths = [
        (8, ColorModel::Greyscale),
        (16, ColorModel::Rgb),
        (24, ColorModel::Rgb),
        (32, ColorModel::Rgb),
    ];

    for (name, pattern) in patterns {
        for (w, h) in sizes {
            for (bits, model) in depths {
                let pixels = pattern(w, h, bits / 8);
                let image =
                    TgaImage::new(pixels.clone(), w as u32, h as u32, bits as u32, model).unwrap();
                for options in all_options() {
                    let encoded = encode_tga(&image, options).unwrap();
                    let decoded = decode_tga(&encoded, options).unwrap();
                    assert_eq!(
                        decoded.pixels(),
                        &pixels[..],
                        "{name} {w}x{h} {bits}bpp {options:?}"
                    );
                }
            }
        }
    }
}

#[test]
fn rle_shrinks_flat_images() {
    let pixels = stripes(64, 32, 3);
    let image = TgaImage::new(pixels, 64, 32, 24, ColorModel::Rgb).unwrap();
    let raw = encode_tga(&image, TgaOptions::empty()).unwrap();
    let rle = encode_tga(&image, TgaOptions::RLE).unwrap();
    assert_eq!(raw.len(), 18 + 64 * 32 * 3);
    assert!(rle.len() * 10 < raw.len(), "{} vs {}", rle.len(), raw.len());
}

#[test]
fn noise_rle_packets_stay_bounded() {
    let pixels = noise_pattern(300, 2, 1);
    let image = TgaImage::new(pixels, 300, 2, 8, ColorModel::Greyscale).unwrap();
    let rle = encode_tga(&image, TgaOptions::RLE).unwrap();
    let mut pos = 18;
    let mut total = 0;
    while pos < rle.len() {
        let h = rle[pos];
        let n = usize::from(h & 0x7F) + 1;
        assert!(n <= 128);
        total += n;
        pos += 1 + if h & 0x80 != 0 { 1 } else { n };
    }
    assert_eq!(total, 600);
}

// ── Malformed input ──────────────────────────────────────────────────

#[test]
fn color_mapped_without_map_is_invalid() {
    let h = TgaHeader {
        image_type: 1,
        image: ImageSpec {
            width: 1,
            height: 1,
            bits_per_pixel: 8,
            ..ImageSpec::default()
        },
        ..TgaHeader::default()
    };
    let err = decode_tga(&tga(h, &[0]), TgaOptions::empty()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidData);
}

#[test]
fn odd_depth_is_unsupported() {
    let h = TgaHeader {
        image_type: 2,
        image: ImageSpec {
            width: 1,
            height: 1,
            bits_per_pixel: 17,
            ..ImageSpec::default()
        },
        ..TgaHeader::default()
    };
    let err = decode_tga(&tga(h, &[0; 3]), TgaOptions::empty()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedPixelDepth);
}

#[test]
fn unknown_image_type_is_invalid() {
    for code in [0u8, 4, 8, 12, 32, 255] {
        let h = TgaHeader {
            image_type: code,
            ..TgaHeader::default()
        };
        let err = decode_tga(&tga(h, &[]), TgaOptions::empty()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidData, "type {code}");
    }
}

#[test]
fn unusable_palette_layouts() {
    let mut h = TgaHeader {
        image_type: 1,
        color_map_type: 1,
        color_map: ColorMapSpec {
            first_entry_index: 0,
            length: 2,
            entry_size: 32,
        },
        image: ImageSpec {
            width: 1,
            height: 1,
            bits_per_pixel: 8,
            ..ImageSpec::default()
        },
        ..TgaHeader::default()
    };
    let err = decode_tga(&tga(h, &[0; 9]), TgaOptions::empty()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedPixelDepth);

    h.color_map.entry_size = 24;
    h.image.bits_per_pixel = 32;
    let err = decode_tga(&tga(h, &[0; 10]), TgaOptions::empty()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedPixelDepth);
}

#[test]
fn out_of_range_index_is_invalid() {
    let h = TgaHeader {
        image_type: 9,
        color_map_type: 1,
        color_map: ColorMapSpec {
            first_entry_index: 0,
            length: 2,
            entry_size: 8,
        },
        image: ImageSpec {
            width: 4,
            height: 1,
            bits_per_pixel: 8,
            ..ImageSpec::default()
        },
        ..TgaHeader::default()
    };
    let err = decode_tga(&tga(h, &[5, 6, 0x83, 2]), TgaOptions::empty()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidData);

    // Indices pass through untouched when the palette is not applied.
    let img = decode_tga(&tga(h, &[5, 6, 0x83, 2]), TgaOptions::RETURN_COLOR_MAP).unwrap();
    assert_eq!(img.pixels(), &[2, 2, 2, 2]);
}

#[test]
fn rle_overrun_is_invalid() {
    let h = TgaHeader {
        image_type: 11,
        image: ImageSpec {
            width: 2,
            height: 2,
            bits_per_pixel: 8,
            ..ImageSpec::default()
        },
        ..TgaHeader::default()
    };
    let err = decode_tga(&tga(h, &[0x81, 1, 0x82, 2]), TgaOptions::empty()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidData);
}

#[test]
fn truncation_never_succeeds() {
    let map = ColorMap::new((0..48).collect(), 16, 24).unwrap();
    let indices: Vec<u8> = (0..13 * 5).map(|i| (i / 7 % 16) as u8).collect();
    let images = [
        TgaImage::new(noise_pattern(9, 5, 3), 9, 5, 24, ColorModel::Rgb).unwrap(),
        TgaImage::new(stripes(9, 5, 1), 9, 5, 8, ColorModel::Greyscale).unwrap(),
        TgaImage::new(stripes(9, 5, 1).iter().map(|&v| v % 16).collect(), 9, 5, 8, ColorModel::Rgb)
            .unwrap()
            .with_color_map(map),
    ];
    for image in &images {
        for options in [TgaOptions::empty(), TgaOptions::RLE] {
            let encoded = encode_tga(image, options).unwrap();
            assert!(decode_tga(&encoded, TgaOptions::empty()).is_ok());
            for n in 0..encoded.len() {
                let err = decode_tga(&encoded[..n], TgaOptions::empty()).unwrap_err();
                assert_eq!(err.kind(), ErrorKind::Io, "cut at {n} of {}", encoded.len());
            }
        }
    }
}

#[test]
fn trailing_bytes_are_ignored() {
    let image = TgaImage::new(vec![1, 2, 3, 4], 2, 2, 8, ColorModel::Greyscale).unwrap();
    let mut encoded = encode_tga(&image, TgaOptions::empty()).unwrap();
    encoded.extend_from_slice(b"TRUEVISION-XFILE.\0");
    assert_eq!(decode_tga(&encoded, TgaOptions::empty()).unwrap(), image);
}

// ── Limits and providers ─────────────────────────────────────────────

#[test]
fn limits_reject_large_images() {
    let image = TgaImage::new(vec![0; 40 * 30], 40, 30, 8, ColorModel::Greyscale).unwrap();
    let encoded = encode_tga(&image, TgaOptions::empty()).unwrap();

    let narrow = Limits {
        max_width: Some(32),
        ..Limits::default()
    };
    let err = DecodeRequest::new()
        .with_limits(&narrow)
        .decode(&encoded, Unstoppable)
        .unwrap_err();
    assert!(matches!(err, TgaError::LimitExceeded(_)));
    assert_eq!(err.kind(), ErrorKind::AllocationFailed);

    let roomy = Limits {
        max_width: Some(40),
        max_height: Some(30),
        max_pixels: Some(1200),
        max_memory_bytes: Some(1200),
    };
    assert!(
        DecodeRequest::new()
            .with_limits(&roomy)
            .decode(&encoded, Unstoppable)
            .is_ok()
    );
}

#[test]
fn refusing_provider_fails_allocation() {
    struct Refuse;
    impl MemoryProvider for Refuse {
        fn allocate(&mut self, _: u32, _: u32, _: u32, _: BufferPurpose) -> Option<Vec<u8>> {
            None
        }
    }

    let image = TgaImage::new(vec![0; 4], 2, 2, 8, ColorModel::Greyscale).unwrap();
    let encoded = encode_tga(&image, TgaOptions::empty()).unwrap();
    let err = DecodeRequest::new()
        .with_memory_provider(&mut Refuse)
        .decode(&encoded, Unstoppable)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AllocationFailed);
}

#[test]
fn provider_sees_every_request() {
    #[derive(Default)]
    struct Recording {
        requests: Vec<(u32, u32, u32, BufferPurpose)>,
    }
    impl MemoryProvider for Recording {
        fn allocate(
            &mut self,
            bits_per_pixel: u32,
            width: u32,
            height: u32,
            purpose: BufferPurpose,
        ) -> Option<Vec<u8>> {
            self.requests.push((bits_per_pixel, width, height, purpose));
            Some(vec![0; buffer_len(bits_per_pixel, width, height)?])
        }
    }

    let map = ColorMap::new(vec![0; 6], 3, 16).unwrap();
    let image = TgaImage::new(vec![0, 1, 2, 1, 0, 2], 3, 2, 8, ColorModel::Rgb)
        .unwrap()
        .with_color_map(map);
    let encoded = encode_tga(&image, TgaOptions::RLE).unwrap();

    let mut provider = Recording::default();
    DecodeRequest::new()
        .with_memory_provider(&mut provider)
        .decode(&encoded, Unstoppable)
        .unwrap();
    assert_eq!(
        provider.requests,
        [
            (16, 3, 1, BufferPurpose::TransientPalette),
            (16, 3, 2, BufferPurpose::ImageData),
        ]
    );

    let mut provider = Recording::default();
    DecodeRequest::new()
        .with_options(TgaOptions::RETURN_COLOR_MAP)
        .with_memory_provider(&mut provider)
        .decode(&encoded, Unstoppable)
        .unwrap();
    assert_eq!(
        provider.requests,
        [
            (16, 3, 1, BufferPurpose::PersistentPalette),
            (8, 3, 2, BufferPurpose::ImageData),
        ]
    );
}

#[test]
fn caller_buffer_matches_owned_decode() {
    let map = ColorMap::new((0..48).collect(), 16, 24).unwrap();
    let indices: Vec<u8> = (0..13 * 5).map(|i| (i / 7 % 16) as u8).collect();
    let image = TgaImage::new(indices, 13, 5, 8, ColorModel::Rgb)
        .unwrap()
        .with_color_map(map);
    // One reusable staging buffer, sized for the largest decode.
    let mut staging = vec![0u8; 13 * 5 * 3 + 7];
    for options in all_options() {
        let encoded = encode_tga(&image, options).unwrap();
        for extra in [TgaOptions::empty(), TgaOptions::RETURN_COLOR_MAP] {
            let owned = decode_tga(&encoded, options | extra).unwrap();
            let into = DecodeRequest::new()
                .with_options(options | extra)
                .decode_into(&encoded, &mut staging, Unstoppable)
                .unwrap();
            assert_eq!(&staging[..into.len], owned.pixels(), "{options:?} {extra:?}");
            assert_eq!(into.info.bits_per_pixel, owned.bits_per_pixel);
            assert_eq!(into.color_map, owned.color_map);
        }
    }
}

#[test]
fn default_provider_is_reusable() {
    let map = ColorMap::new((0..24).collect(), 8, 24).unwrap();
    let image = TgaImage::new(vec![3; 16], 4, 4, 8, ColorModel::Rgb)
        .unwrap()
        .with_color_map(map);
    let encoded = encode_tga(&image, TgaOptions::empty()).unwrap();

    let mut provider = DefaultMemoryProvider::new();
    for _ in 0..3 {
        let img = DecodeRequest::new()
            .with_memory_provider(&mut provider)
            .decode(&encoded, Unstoppable)
            .unwrap();
        assert!(img.pixels().chunks(3).all(|px| px == [9, 10, 11]));
    }
}

// ── std streams and files ────────────────────────────────────────────

#[cfg(feature = "std")]
#[test]
fn reader_and_writer_adapters() {
    let image = TgaImage::new(checkerboard(5, 4, 3), 5, 4, 24, ColorModel::Rgb).unwrap();
    let mut buf = Vec::new();
    encode_tga_writer(&mut buf, &image, TgaOptions::RLE).unwrap();
    assert_eq!(buf, encode_tga(&image, TgaOptions::RLE).unwrap());

    let decoded = decode_tga_reader(std::io::Cursor::new(&buf), TgaOptions::empty()).unwrap();
    assert_eq!(decoded, image);

    // A palette on a true-color image is read past and discarded.
    let mut h = TgaHeader::from_bytes(buf[..18].try_into().unwrap());
    h.color_map_type = 1;
    h.color_map = ColorMapSpec {
        first_entry_index: 0,
        length: 4,
        entry_size: 15,
    };
    let with_map = tga(h, &[&[0u8; 8][..], &buf[18..]].concat());
    let decoded = decode_tga_reader(std::io::Cursor::new(with_map), TgaOptions::empty()).unwrap();
    assert_eq!(decoded.pixels(), image.pixels());
}

#[cfg(feature = "std")]
#[test]
fn reader_truncation_is_io() {
    let image = TgaImage::new(noise_pattern(4, 4, 4), 4, 4, 32, ColorModel::Rgb).unwrap();
    let buf = encode_tga(&image, TgaOptions::empty()).unwrap();
    let err = decode_tga_reader(std::io::Cursor::new(&buf[..40]), TgaOptions::empty()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);
}

#[cfg(feature = "std")]
#[test]
fn reader_skips_past_end_are_io() {
    // Empty image whose 10-byte image ID is cut short after 3 bytes.
    let mut h = TgaHeader {
        image_type: 2,
        id_length: 10,
        ..TgaHeader::default()
    };
    h.image.bits_per_pixel = 24;
    let data = tga(h, b"abc");
    let err = decode_tga(&data, TgaOptions::empty()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);
    let err = decode_tga_reader(std::io::Cursor::new(&data), TgaOptions::empty()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);

    // Ignored palette of a true-color image that ends inside the palette.
    let mut h = TgaHeader {
        image_type: 2,
        color_map_type: 1,
        ..TgaHeader::default()
    };
    h.image = ImageSpec {
        width: 1,
        height: 1,
        bits_per_pixel: 24,
        ..ImageSpec::default()
    };
    h.color_map = ColorMapSpec {
        first_entry_index: 0,
        length: 4,
        entry_size: 24,
    };
    let data = tga(h, &[0; 5]);
    let err = decode_tga_reader(std::io::Cursor::new(&data), TgaOptions::empty()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);
}

#[cfg(feature = "std")]
#[test]
fn file_roundtrip() {
    let path = std::env::temp_dir().join(format!("zentga-corpus-{}.tga", std::process::id()));
    let image = TgaImage::new(noise_pattern(6, 6, 1), 6, 6, 8, ColorModel::Greyscale)
        .unwrap()
        .with_origin(ImageOrigin::TopLeft);
    encode_tga_file(&path, &image, TgaOptions::RLE).unwrap();
    let decoded = decode_tga_file(&path, TgaOptions::empty());
    let _ = std::fs::remove_file(&path);
    assert_eq!(decoded.unwrap(), image);
}

#[cfg(feature = "std")]
#[test]
fn missing_file_cannot_open() {
    let path = std::env::temp_dir().join("zentga-corpus-missing/none.tga");
    let err = decode_tga_file(&path, TgaOptions::empty()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::CannotOpen);

    let image = TgaImage::new(vec![0], 1, 1, 8, ColorModel::Greyscale).unwrap();
    let err = encode_tga_file(&path, &image, TgaOptions::empty()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::CannotOpen);
}
