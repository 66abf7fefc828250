//! Orientation normalization ahead of scaling.

use tracing::debug;

use crate::bitmap::Bitmap;
use crate::display::DisplayGeometry;

/// Whether to let the renderer rotate images.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RotationPolicy {
    /// Rotate 90° clockwise when [`needs_rotation`] says so.
    #[default]
    Auto,
    /// Always stretch the image as stored.
    Never,
}

/// Rotation rule for an image of `width`x`height` on `display`.
///
/// Rotates when a landscape image meets a portrait display, and when a
/// non-landscape image (portrait or square) meets a non-portrait display.
/// Square images on a square or landscape display are therefore rotated.
pub fn needs_rotation(width: usize, height: usize, display: DisplayGeometry) -> bool {
    let display_is_portrait = display.is_portrait();
    let image_is_landscape = width > height;
    (image_is_landscape && display_is_portrait) || (!image_is_landscape && !display_is_portrait)
}

/// Apply `policy` and return the bitmap to rasterize.
pub fn normalize(bitmap: Bitmap, display: DisplayGeometry, policy: RotationPolicy) -> Bitmap {
    if policy == RotationPolicy::Never
        || !needs_rotation(bitmap.width(), bitmap.height(), display)
    {
        return bitmap;
    }
    let rotated = bitmap.rotate_cw();
    debug!(
        width = rotated.width(),
        height = rotated.height(),
        "Auto-rotated image 90 degrees to fit display"
    );
    rotated
}
