#![no_main]
use libfuzzer_sys::fuzz_target;
use zentga::*;

fuzz_target!(|data: &[u8]| {
    let limits = Limits {
        max_memory_bytes: Some(64 * 1024 * 1024),
        ..Limits::default()
    };

    // Every option combination must decode or fail cleanly, never panic
    for bits in 0..8u8 {
        let options = TgaOptions::from_bits_truncate(bits);
        let _ = DecodeRequest::new()
            .with_options(options)
            .with_limits(&limits)
            .decode(data, enough::Unstoppable);
    }

    let _ = TgaInfo::from_bytes(data);
});
