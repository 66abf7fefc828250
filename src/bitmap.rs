use alloc::vec;
use alloc::vec::Vec;

/// A decoded 1-bit image.
///
/// One byte per pixel holding `0` or `1`, row-major, with row 0 always the
/// topmost visual row no matter how the source file stored its rows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bitmap {
    width: usize,
    height: usize,
    bits: Vec<u8>,
}

impl Bitmap {
    /// All-zero bitmap of the given size.
    pub(crate) fn zeroed(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            bits: vec![0u8; width * height],
        }
    }

    /// Build a bitmap from explicit rows of bits.
    ///
    /// Returns `None` if the rows are ragged, empty, or contain values other
    /// than 0 and 1.
    pub fn from_rows<R: AsRef<[u8]>>(rows: &[R]) -> Option<Self> {
        let height = rows.len();
        let width = rows.first()?.as_ref().len();
        if width == 0 {
            return None;
        }
        let mut bits = Vec::with_capacity(width * height);
        for row in rows {
            let row = row.as_ref();
            if row.len() != width || row.iter().any(|&b| b > 1) {
                return None;
            }
            bits.extend_from_slice(row);
        }
        Some(Self {
            width,
            height,
            bits,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Bits of row `y` (0 = top).
    ///
    /// # Panics
    /// If `y >= height`.
    pub fn row(&self, y: usize) -> &[u8] {
        &self.bits[y * self.width..(y + 1) * self.width]
    }

    pub(crate) fn row_mut(&mut self, y: usize) -> &mut [u8] {
        &mut self.bits[y * self.width..(y + 1) * self.width]
    }

    /// Iterate rows top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        self.bits.chunks_exact(self.width)
    }

    /// Pixel at column `x`, row `y`, or `None` if out of bounds.
    pub fn get(&self, x: usize, y: usize) -> Option<u8> {
        if x < self.width && y < self.height {
            Some(self.bits[y * self.width + x])
        } else {
            None
        }
    }

    /// Rotate 90° clockwise.
    ///
    /// Row `x` of the result is column `x` of `self` read bottom to top, so
    /// the result is `height` wide and `width` tall.
    pub fn rotate_cw(&self) -> Bitmap {
        let mut out = Bitmap::zeroed(self.height, self.width);
        for x in 0..self.width {
            let dst = out.row_mut(x);
            for (i, src_y) in (0..self.height).rev().enumerate() {
                dst[i] = self.bits[src_y * self.width + x];
            }
        }
        out
    }

    /// Reverse row order in place (bottom-up storage → top-down).
    pub(crate) fn flip_vertical(&mut self) {
        let width = self.width;
        let height = self.height;
        for y in 0..height / 2 {
            let (top, bottom) = self.bits.split_at_mut((height - 1 - y) * width);
            top[y * width..(y + 1) * width].swap_with_slice(&mut bottom[..width]);
        }
    }
}
