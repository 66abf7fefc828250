//! BMP row layout and bit expansion utilities.
//!
//! The 1-bit expansion loop is forked from zune-bmp 0.5.2 by Caleb Etemesi
//! (MIT/Apache-2.0/Zlib), narrowed to 0/1 output.

/// Bytes of pixel data in one 1-bit row: `ceil(width / 8)`.
pub(crate) fn packed_row_bytes(width: usize) -> usize {
    width.div_ceil(8)
}

/// Bytes one 1-bit row occupies in the file, padded to a 4-byte boundary:
/// `ceil(width / 32) * 4`.
pub(crate) fn row_stride(width: usize) -> usize {
    width.div_ceil(32) * 4
}

/// Expand packed 1-bit pixels to one 0/1 byte per pixel, MSB first.
///
/// `out.len()` decides how many pixels are written; trailing bits of the
/// last input byte beyond it are dropped.
pub(crate) fn expand_bits(input: &[u8], out: &mut [u8]) {
    let mut in_iter = input.iter();
    let mut out_iter = out.chunks_exact_mut(8);

    (&mut out_iter)
        .zip(&mut in_iter)
        .for_each(|(out_vals, in_val)| {
            for (pos, out_val) in out_vals.iter_mut().enumerate() {
                *out_val = (in_val >> (7 - pos)) & 0x01;
            }
        });

    if let Some(in_val) = in_iter.next() {
        let remainder_iter = out_iter.into_remainder().iter_mut();
        remainder_iter.enumerate().for_each(|(pos, out_val)| {
            *out_val = (in_val >> (7 - pos)) & 0x01;
        });
    }
}
