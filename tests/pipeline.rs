//! End-to-end tests: decode → orient → rasterize → present on a mock display.

use std::sync::atomic::{AtomicUsize, Ordering};

use enough::{Stop, StopReason, Unstoppable};
use zenmono::*;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Records every call the renderer makes.
#[derive(Default)]
struct MockEpd {
    width: u32,
    height: u32,
    cleared: Vec<u8>,
    presented: Vec<Vec<u8>>,
    fail_clear: bool,
}

impl MockEpd {
    fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }
}

impl DisplayTarget for MockEpd {
    type Error = String;

    fn geometry(&self) -> DisplayGeometry {
        DisplayGeometry {
            width: self.width,
            height: self.height,
        }
    }

    fn clear(&mut self, fill: u8) -> Result<(), String> {
        if self.fail_clear {
            return Err("SPI busy timeout".into());
        }
        self.cleared.push(fill);
        Ok(())
    }

    fn present_partial(&mut self, buffer: &[u8]) -> Result<(), String> {
        self.presented.push(buffer.to_vec());
        Ok(())
    }
}

/// 1-bit BMP from rows as stored in the file (first = first in file).
fn bmp_stored(stored: &[&[u8]], height_sign: i32) -> Vec<u8> {
    let width = stored[0].len();
    let stride = width.div_ceil(32) * 4;
    let mut bmp = vec![0u8; 62];
    bmp[0] = b'B';
    bmp[1] = b'M';
    bmp[10..14].copy_from_slice(&62u32.to_le_bytes());
    bmp[14..18].copy_from_slice(&40u32.to_le_bytes());
    bmp[18..22].copy_from_slice(&(width as i32).to_le_bytes());
    bmp[22..26].copy_from_slice(&(height_sign * stored.len() as i32).to_le_bytes());
    bmp[26..28].copy_from_slice(&1u16.to_le_bytes());
    bmp[28..30].copy_from_slice(&1u16.to_le_bytes());
    for row in stored {
        let mut bytes = vec![0u8; stride];
        for (x, &bit) in row.iter().enumerate() {
            bytes[x / 8] |= bit << (7 - x % 8);
        }
        bmp.extend_from_slice(&bytes);
    }
    bmp
}

fn geom(width: u32, height: u32) -> DisplayGeometry {
    DisplayGeometry::new(width, height).unwrap()
}

#[test]
fn two_by_two_bottom_up_on_square_display() {
    init_tracing();
    // Stored bottom-up: file row 0 is the bottom of the image.
    let data = bmp_stored(&[&[0, 1], &[1, 0]], 1);
    let mut epd = MockEpd::new(4, 4);

    render_bmp_to_display(&mut epd, &data, false).unwrap();

    // Decoded top-down: [[1,0],[0,1]]. Square image on a non-portrait
    // display rotates clockwise to [[0,1],[1,0]], then each pixel becomes
    // a 2x2 block, packed left-aligned into one byte per 4-pixel row.
    assert_eq!(epd.cleared, [DEFAULT_CLEAR_VALUE]);
    assert_eq!(epd.presented, [vec![0x30, 0x30, 0xC0, 0xC0]]);
}

#[test]
fn scaling_expands_each_pixel_to_a_block() {
    let bitmap = Bitmap::from_rows(&[[1u8, 0], [0, 1]]).unwrap();
    let fb = rasterize(&bitmap, geom(4, 4), false, Unstoppable).unwrap();
    assert_eq!(fb.as_bytes(), &[0xC0, 0xC0, 0x30, 0x30]);
    for (x, y, expected) in [(0, 0, 1), (1, 1, 1), (3, 0, 0), (0, 3, 0), (3, 3, 1)] {
        assert_eq!(fb.get(x, y), Some(expected), "({x}, {y})");
    }
}

#[test]
fn rotation_moves_top_left_to_top_right() {
    let bitmap = Bitmap::from_rows(&[[1u8, 0, 0], [0, 0, 0]]).unwrap();
    let (w, h) = (bitmap.width(), bitmap.height());
    let rotated = bitmap.rotate_cw();
    assert_eq!((rotated.width(), rotated.height()), (h, w));
    assert_eq!(rotated.get(h - 1, 0), Some(1));
}

#[test]
fn alternating_row_packs_to_0xaa() {
    let row: Vec<u8> = (0..16).map(|x| ((x + 1) % 2) as u8).collect();
    let bitmap = Bitmap::from_rows(&[row]).unwrap();
    let fb = rasterize(&bitmap, geom(16, 1), false, Unstoppable).unwrap();
    assert_eq!(fb.as_bytes(), &[0xAA, 0xAA]);
}

#[test]
fn partial_final_byte_does_not_touch_next_row() {
    let bitmap = Bitmap::from_rows(&[[1u8; 12], [1u8; 12]]).unwrap();
    let fb = rasterize(&bitmap, geom(12, 2), false, Unstoppable).unwrap();
    assert_eq!(fb.as_bytes(), &[0xFF, 0xF0, 0xFF, 0xF0]);
}

#[test]
fn invert_turns_blank_image_into_all_ones() {
    let data = bmp_stored(&[&[0; 8], &[0; 8]], -1);
    let mut epd = MockEpd::new(16, 8);
    RenderRequest::new(&data)
        .invert(true)
        .render(&mut epd, Unstoppable)
        .unwrap();
    assert_eq!(epd.presented.len(), 1);
    assert_eq!(epd.presented[0].len(), 16 * 8 / 8);
    assert!(epd.presented[0].iter().all(|&b| b == 0xFF));
}

#[test]
fn landscape_image_is_rotated_for_portrait_panel() {
    init_tracing();
    // 4 wide, 2 tall, only top-left set.
    let data = bmp_stored(&[&[1, 0, 0, 0], &[0, 0, 0, 0]], -1);
    let frame = RenderRequest::new(&data)
        .rasterize(geom(8, 16), Unstoppable)
        .unwrap();
    assert_eq!(frame.as_bytes().len(), 16);
    // After rotation the set pixel is the top-right of a 2x4 image, which
    // covers the right half of the top quarter of the display.
    for y in 0..4 {
        assert_eq!(frame.row(y as usize), &[0x0F], "row {y}");
    }
    for y in 4..16 {
        assert_eq!(frame.row(y), &[0x00], "row {y}");
    }
}

#[test]
fn never_policy_stretches_unrotated() {
    let data = bmp_stored(&[&[1, 0, 0, 0], &[0, 0, 0, 0]], -1);
    let frame = RenderRequest::new(&data)
        .rotation(RotationPolicy::Never)
        .rasterize(geom(8, 16), Unstoppable)
        .unwrap();
    for y in 0..8 {
        assert_eq!(frame.row(y), &[0xC0]);
    }
    for y in 8..16 {
        assert_eq!(frame.row(y), &[0x00]);
    }
}

#[test]
fn production_panel_buffer_size() {
    let rows: Vec<Vec<u8>> = (0..50)
        .map(|y| (0..200).map(|x| ((x / 10 + y / 10) % 2) as u8).collect())
        .collect();
    let stored: Vec<&[u8]> = rows.iter().map(Vec::as_slice).collect();
    let data = bmp_stored(&stored, -1);
    let mut epd = MockEpd::new(128, 256);
    render_bmp_to_display(&mut epd, &data, false).unwrap();
    assert_eq!(epd.presented[0].len(), 128 * 256 / 8);
}

#[test]
fn custom_clear_value_is_sent_first() {
    let data = bmp_stored(&[&[1, 0], &[0, 1]], 1);
    let mut epd = MockEpd::new(8, 8);
    RenderRequest::new(&data)
        .clear_value(0x00)
        .render(&mut epd, Unstoppable)
        .unwrap();
    assert_eq!(epd.cleared, [0x00]);
}

// ── Failures ─────────────────────────────────────────────────────────

#[test]
fn bad_file_never_reaches_display() {
    init_tracing();
    let mut data = bmp_stored(&[&[1, 0], &[0, 1]], 1);
    data[28..30].copy_from_slice(&24u16.to_le_bytes());
    let mut epd = MockEpd::new(8, 8);

    let err = render_bmp_to_display(&mut epd, &data, false).unwrap_err();
    assert!(err.is_decode());
    assert!(!err.is_driver());
    assert!(epd.cleared.is_empty());
    assert!(epd.presented.is_empty());
}

#[test]
fn driver_failure_is_distinguished() {
    let data = bmp_stored(&[&[1, 0], &[0, 1]], 1);
    let mut epd = MockEpd::new(8, 8);
    epd.fail_clear = true;

    let err = render_bmp_to_display(&mut epd, &data, false).unwrap_err();
    assert!(err.is_driver());
    assert!(matches!(&err, RenderError::Driver(msg) if msg == "SPI busy timeout"));
    assert!(epd.presented.is_empty());
}

#[test]
fn zero_sized_display_is_rejected() {
    let data = bmp_stored(&[&[1, 0], &[0, 1]], 1);
    let mut epd = MockEpd::new(0, 8);
    let err = render_bmp_to_display(&mut epd, &data, false).unwrap_err();
    assert!(matches!(
        err,
        RenderError::Decode(DecodeError::InvalidGeometry { width: 0, height: 8 })
    ));
}

#[test]
fn framebuffer_limit_applies_to_render() {
    let data = bmp_stored(&[&[1, 0], &[0, 1]], 1);
    let limits = Limits {
        max_memory_bytes: Some(64),
        ..Default::default()
    };
    let mut epd = MockEpd::new(128, 256);
    let err = RenderRequest::new(&data)
        .with_limits(&limits)
        .render(&mut epd, Unstoppable)
        .unwrap_err();
    assert!(matches!(err, RenderError::Decode(DecodeError::LimitExceeded(_))));
}

// ── Cancellation ─────────────────────────────────────────────────────

/// Lets `allowed` checks through, then reports cancellation.
struct CancelAfter {
    allowed: AtomicUsize,
}

impl CancelAfter {
    fn new(allowed: usize) -> Self {
        Self {
            allowed: AtomicUsize::new(allowed),
        }
    }
}

impl Stop for CancelAfter {
    fn check(&self) -> Result<(), StopReason> {
        let left = self.allowed.load(Ordering::Relaxed);
        if left == 0 {
            return Err(StopReason::Cancelled);
        }
        self.allowed.store(left - 1, Ordering::Relaxed);
        Ok(())
    }
}

#[test]
fn cancelled_decode() {
    let data = bmp_stored(&[&[1, 0], &[0, 1]], 1);
    assert!(matches!(
        decode_bmp(&data, CancelAfter::new(0)),
        Err(DecodeError::Cancelled(_))
    ));
}

#[test]
fn cancelled_rasterize() {
    let bitmap = Bitmap::from_rows(&[[1u8], [0]]).unwrap();
    assert!(matches!(
        rasterize(&bitmap, geom(8, 8), false, CancelAfter::new(0)),
        Err(DecodeError::Cancelled(_))
    ));
}

#[test]
fn cancelled_render_sends_nothing() {
    let data = bmp_stored(&[&[1, 0], &[0, 1]], 1);
    // 0: during decode; 2: decode finishes, rasterize is cancelled.
    for allowed in [0, 2] {
        let mut epd = MockEpd::new(8, 8);
        let err = RenderRequest::new(&data)
            .render(&mut epd, CancelAfter::new(allowed))
            .unwrap_err();
        assert!(
            matches!(err, RenderError::Decode(DecodeError::Cancelled(_))),
            "allowed={allowed}"
        );
        assert!(err.is_decode());
        assert!(epd.cleared.is_empty());
        assert!(epd.presented.is_empty());
    }
}

#[test]
fn enough_checks_let_render_finish() {
    let data = bmp_stored(&[&[1, 0], &[0, 1]], 1);
    let mut epd = MockEpd::new(8, 8);
    RenderRequest::new(&data)
        .render(&mut epd, CancelAfter::new(3))
        .unwrap();
    assert_eq!(epd.presented.len(), 1);
}

#[cfg(feature = "std")]
#[test]
fn render_from_file_path() {
    let data = bmp_stored(&[&[1, 0], &[0, 1]], 1);
    let path = std::env::temp_dir().join(format!("zenmono-{}.bmp", std::process::id()));
    std::fs::write(&path, &data).unwrap();

    let mut epd = MockEpd::new(4, 4);
    let result = render_bmp_file(&mut epd, &path, false);
    std::fs::remove_file(&path).unwrap();
    result.unwrap();
    assert_eq!(epd.presented.len(), 1);

    let missing = render_bmp_file(&mut epd, "/nonexistent/zenmono.bmp", false).unwrap_err();
    assert!(matches!(missing, RenderError::Io(_)));
}
