#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Header parse and full decode must never panic
    let _ = zenmono::BitmapHeader::parse(data);

    let limits = zenmono::Limits {
        max_pixels: Some(1 << 22),
        ..Default::default()
    };
    if let Ok(bitmap) = zenmono::decode_bmp_with_limits(data, &limits, enough::Unstoppable) {
        assert_eq!(bitmap.rows().count(), bitmap.height());
        assert!(bitmap.rows().flatten().all(|&b| b <= 1));
    }
});
