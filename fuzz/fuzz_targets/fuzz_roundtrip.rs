#![no_main]
use libfuzzer_sys::fuzz_target;
use zentga::*;

fuzz_target!(|data: &[u8]| {
    let limits = Limits {
        max_memory_bytes: Some(64 * 1024 * 1024),
        ..Limits::default()
    };
    // Keep palettes attached so mapped images re-encode as mapped
    let Ok(decoded) = DecodeRequest::new()
        .with_options(TgaOptions::RETURN_COLOR_MAP)
        .with_limits(&limits)
        .decode(data, enough::Unstoppable)
    else {
        return;
    };

    // Zero-sized or unknown-model images are not encodable
    for options in [TgaOptions::empty(), TgaOptions::RLE | TgaOptions::FLIP_VERTICALLY] {
        let Ok(reencoded) = encode_tga(&decoded, options) else {
            return;
        };
        let Ok(decoded2) = decode_tga(&reencoded, options | TgaOptions::RETURN_COLOR_MAP) else {
            panic!("re-encoded data failed to decode");
        };
        assert_eq!(decoded, decoded2, "roundtrip mismatch with {options:?}");
    }
});
