use alloc::vec;
use alloc::vec::Vec;

use crate::error::DecodeError;

/// Fixed resolution of a display, in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DisplayGeometry {
    pub width: u32,
    pub height: u32,
}

impl DisplayGeometry {
    /// Returns [`DecodeError::InvalidGeometry`] if either side is zero.
    pub fn new(width: u32, height: u32) -> Result<Self, DecodeError> {
        if width == 0 || height == 0 {
            return Err(DecodeError::InvalidGeometry { width, height });
        }
        Ok(Self { width, height })
    }

    pub fn is_portrait(&self) -> bool {
        self.height > self.width
    }

    /// Bytes per packed framebuffer row.
    pub fn stride(&self) -> usize {
        (self.width as usize).div_ceil(8)
    }

    /// Total packed framebuffer size in bytes.
    ///
    /// Returns [`DecodeError::DimensionsTooLarge`] if it overflows `usize`.
    pub fn buffer_len(&self) -> Result<usize, DecodeError> {
        self.stride()
            .checked_mul(self.height as usize)
            .ok_or(DecodeError::DimensionsTooLarge {
                width: self.width,
                height: self.height,
            })
    }
}

/// Packed 1-bit framebuffer: row-major, 8 pixels per byte, bit 7 leftmost.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameBuffer {
    geometry: DisplayGeometry,
    data: Vec<u8>,
}

impl FrameBuffer {
    pub(crate) fn zeroed(geometry: DisplayGeometry) -> Result<Self, DecodeError> {
        Ok(Self {
            geometry,
            data: vec![0u8; geometry.buffer_len()?],
        })
    }

    pub fn geometry(&self) -> DisplayGeometry {
        self.geometry
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }

    /// Packed bytes of display row `y`.
    ///
    /// # Panics
    /// If `y >= height`.
    pub fn row(&self, y: usize) -> &[u8] {
        let stride = self.geometry.stride();
        &self.data[y * stride..(y + 1) * stride]
    }

    pub(crate) fn row_mut(&mut self, y: usize) -> &mut [u8] {
        let stride = self.geometry.stride();
        &mut self.data[y * stride..(y + 1) * stride]
    }

    /// Pixel at display column `x`, row `y`, or `None` if out of bounds.
    pub fn get(&self, x: u32, y: u32) -> Option<u8> {
        if x >= self.geometry.width || y >= self.geometry.height {
            return None;
        }
        let byte = self.data[y as usize * self.geometry.stride() + x as usize / 8];
        Some((byte >> (7 - x % 8)) & 1)
    }
}

/// A display the renderer can draw to.
///
/// Implemented by the driver layer (SPI e-paper panels and the like) or by a
/// test double. The renderer only reads the geometry, clears, and presents.
pub trait DisplayTarget {
    type Error: core::fmt::Debug + core::fmt::Display;

    fn geometry(&self) -> DisplayGeometry;

    /// Fill the whole panel with `fill` (e.g. `0xFF` for white).
    fn clear(&mut self, fill: u8) -> Result<(), Self::Error>;

    /// Send a packed framebuffer of `geometry().buffer_len()` bytes and run a
    /// partial refresh.
    fn present_partial(&mut self, buffer: &[u8]) -> Result<(), Self::Error>;
}

impl<T: DisplayTarget + ?Sized> DisplayTarget for &mut T {
    type Error = T::Error;

    fn geometry(&self) -> DisplayGeometry {
        (**self).geometry()
    }

    fn clear(&mut self, fill: u8) -> Result<(), Self::Error> {
        (**self).clear(fill)
    }

    fn present_partial(&mut self, buffer: &[u8]) -> Result<(), Self::Error> {
        (**self).present_partial(buffer)
    }
}
