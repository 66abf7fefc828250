#![no_main]
use libfuzzer_sys::fuzz_target;
use zenmono::{DisplayGeometry, DisplayTarget, Limits, RenderRequest};

struct NullEpd {
    geometry: DisplayGeometry,
}

impl DisplayTarget for NullEpd {
    type Error = core::convert::Infallible;

    fn geometry(&self) -> DisplayGeometry {
        self.geometry
    }

    fn clear(&mut self, _fill: u8) -> Result<(), Self::Error> {
        Ok(())
    }

    fn present_partial(&mut self, buffer: &[u8]) -> Result<(), Self::Error> {
        assert_eq!(Ok(buffer.len()), self.geometry.buffer_len().map_err(|_| ()));
        Ok(())
    }
}

fuzz_target!(|input: (u8, u8, bool, &[u8])| {
    let (w, h, invert, data) = input;
    let mut epd = NullEpd {
        geometry: DisplayGeometry {
            width: u32::from(w),
            height: u32::from(h),
        },
    };
    let limits = Limits {
        max_pixels: Some(1 << 22),
        ..Default::default()
    };
    // Any input, including zero-sized geometry, must not panic
    let _ = RenderRequest::new(data)
        .invert(invert)
        .with_limits(&limits)
        .render(&mut epd, enough::Unstoppable);
});
