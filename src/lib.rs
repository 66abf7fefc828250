//! # zenmono
//!
//! 1-bit BMP decoder and packed framebuffer rasterizer for monochrome
//! (e-paper) displays.
//!
//! ## Pipeline
//!
//! 1. **Decode** — validate the BMP headers and unpack 1-bit rows into a
//!    [`Bitmap`] whose row 0 is always the top of the image.
//! 2. **Orient** — rotate 90° clockwise when the image and display
//!    orientations disagree (see [`orient::needs_rotation`]).
//! 3. **Rasterize** — nearest-neighbor stretch to the display resolution and
//!    pack 8 pixels per byte, MSB first, optionally inverted.
//! 4. **Present** — [`DisplayTarget::clear`] then
//!    [`DisplayTarget::present_partial`].
//!
//! ## Non-Goals
//!
//! - Color, palette-mapped, or multi-bit BMPs (rejected with
//!   [`DecodeError::UnsupportedFormat`])
//! - RLE or bitfield compression
//! - BMP encoding
//! - Filtered or aspect-preserving scaling
//!
//! ## Usage
//!
//! ```no_run
//! use zenmono::{DisplayGeometry, DisplayTarget, RenderRequest, Unstoppable};
//!
//! struct Epd213;
//!
//! impl DisplayTarget for Epd213 {
//!     type Error = core::convert::Infallible;
//!     fn geometry(&self) -> DisplayGeometry {
//!         DisplayGeometry { width: 128, height: 250 }
//!     }
//!     fn clear(&mut self, _fill: u8) -> Result<(), Self::Error> { Ok(()) }
//!     fn present_partial(&mut self, _buf: &[u8]) -> Result<(), Self::Error> { Ok(()) }
//! }
//!
//! let data: &[u8] = &[]; // your BMP bytes
//!
//! // Read the header without decoding
//! let header = zenmono::BitmapHeader::parse(data)?;
//! println!("{}x{} top_down={}", header.pixel_width(), header.pixel_height(), header.is_top_down());
//!
//! // Decode, rotate, scale, and present
//! let mut epd = Epd213;
//! if let Err(e) = RenderRequest::new(data).invert(false).render(&mut epd, Unstoppable) {
//!     if e.is_driver() {
//!         // display is unusable
//!     }
//! }
//! # Ok::<(), zenmono::DecodeError>(())
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

mod bitmap;
mod bmp;
mod display;
mod error;
mod limits;
pub mod orient;
mod raster;
mod render;

// Re-exports
pub use bitmap::Bitmap;
pub use bmp::BitmapHeader;
pub use display::{DisplayGeometry, DisplayTarget, FrameBuffer};
pub use enough::{Stop, Unstoppable};
pub use error::{DecodeError, RenderError};
pub use limits::Limits;
pub use orient::RotationPolicy;
pub use render::{
    DEFAULT_CLEAR_VALUE, RenderRequest, decode_bmp, decode_bmp_with_limits, rasterize,
    render_bmp_to_display,
};

#[cfg(feature = "std")]
pub use render::render_bmp_file;
