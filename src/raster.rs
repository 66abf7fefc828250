//! Nearest-neighbor resampling into a packed 1-bit framebuffer.

use enough::Stop;
use tracing::debug;

use crate::bitmap::Bitmap;
use crate::display::{DisplayGeometry, FrameBuffer};
use crate::error::DecodeError;
use crate::limits::Limits;

/// Source index for destination index `dst` when `src_len` pixels are
/// stretched over `dst_len`.
///
/// Equal to `floor(dst / (dst_len / src_len))`, computed in integers so
/// exact block boundaries never land one pixel early, then clamped.
fn source_index(dst: usize, src_len: usize, dst_len: usize) -> usize {
    let idx = (dst as u64 * src_len as u64 / dst_len as u64) as usize;
    idx.min(src_len - 1)
}

/// Pack one destination row. `bit_at(x)` yields the 0/1 value for display
/// column `x`.
fn pack_row(out: &mut [u8], width: usize, invert: bool, bit_at: impl Fn(usize) -> u8) {
    let mut byte_index = 0;
    let mut byte_value = 0u8;
    let mut bit_count = 0;
    for x in 0..width {
        let mut bit = bit_at(x);
        if invert {
            bit ^= 1;
        }
        byte_value = (byte_value << 1) | bit;
        bit_count += 1;
        if bit_count == 8 {
            out[byte_index] = byte_value;
            byte_index += 1;
            byte_value = 0;
            bit_count = 0;
        }
    }
    // Unused low bits of a partial byte stay zero.
    if bit_count > 0 {
        out[byte_index] = byte_value << (8 - bit_count);
    }
}

/// Stretch `bitmap` to exactly fill `geometry` and pack it.
///
/// Each axis is scaled independently, so aspect ratio is not preserved.
/// With `invert`, every output bit is flipped.
pub(crate) fn rasterize_into(
    bitmap: &Bitmap,
    geometry: DisplayGeometry,
    invert: bool,
    limits: Option<&Limits>,
    stop: &dyn Stop,
) -> Result<FrameBuffer, DecodeError> {
    if geometry.width == 0 || geometry.height == 0 {
        return Err(DecodeError::InvalidGeometry {
            width: geometry.width,
            height: geometry.height,
        });
    }
    let buffer_len = geometry.buffer_len()?;
    if let Some(limits) = limits {
        limits.check_memory(buffer_len)?;
    }
    let disp_w = geometry.width as usize;
    let disp_h = geometry.height as usize;
    let mut fb = FrameBuffer::zeroed(geometry)?;

    for disp_y in 0..disp_h {
        if disp_y % 16 == 0 {
            stop.check()?;
        }
        let src_row = bitmap.row(source_index(disp_y, bitmap.height(), disp_h));
        pack_row(fb.row_mut(disp_y), disp_w, invert, |disp_x| {
            src_row[source_index(disp_x, bitmap.width(), disp_w)]
        });
    }

    debug!(
        src_width = bitmap.width(),
        src_height = bitmap.height(),
        width = geometry.width,
        height = geometry.height,
        invert,
        "Rasterized bitmap to display"
    );
    Ok(fb)
}
