//! 1-bit BMP decoder (internal).
//!
//! Use top-level [`crate::decode_bmp`] or [`crate::BitmapHeader::parse`].

mod decode;
mod utils;

pub use decode::BitmapHeader;

use crate::bitmap::Bitmap;
use crate::error::DecodeError;
use crate::limits::Limits;
use enough::Stop;

/// Decode BMP data into a top-down bitmap.
pub(crate) fn decode(
    data: &[u8],
    limits: Option<&Limits>,
    stop: &dyn Stop,
) -> Result<Bitmap, DecodeError> {
    decode::decode_bitmap(data, limits, stop)
}
