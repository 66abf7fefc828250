//! 1-bit uncompressed BMP decoder.
//!
//! Cursor handling forked from zune-bmp 0.5.2 by Caleb Etemesi
//! (MIT/Apache-2.0/Zlib), cut down to the single format this crate accepts.

use enough::Stop;
use tracing::debug;

use super::utils::{expand_bits, packed_row_bytes, row_stride};
use crate::bitmap::Bitmap;
use crate::error::DecodeError;
use crate::limits::Limits;

/// BITMAPFILEHEADER size.
const FILE_HEADER_LEN: usize = 14;
/// BITMAPINFOHEADER size, the smallest DIB header we read.
const DIB_HEADER_LEN: usize = 40;

// ── Cursor for reading from &[u8] ───────────────────────────────────

struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    /// Seeking past the end is allowed; later reads see zero bytes available.
    fn set_position(&mut self, pos: usize) {
        self.pos = pos;
    }

    /// Skip up to `n` bytes, stopping at EOF.
    fn skip_lenient(&mut self, n: usize) {
        self.pos = self.pos.saturating_add(n.min(self.remaining()));
    }

    /// Take up to `n` bytes; the returned slice is shorter at EOF.
    fn take(&mut self, n: usize) -> &'a [u8] {
        let n = n.min(self.remaining());
        let start = self.pos.min(self.data.len());
        self.pos = start + n;
        &self.data[start..start + n]
    }
}

fn u16_le(b: &[u8], at: usize) -> u16 {
    u16::from_le_bytes([b[at], b[at + 1]])
}

fn u32_le(b: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([b[at], b[at + 1], b[at + 2], b[at + 3]])
}

fn i32_le(b: &[u8], at: usize) -> i32 {
    i32::from_le_bytes([b[at], b[at + 1], b[at + 2], b[at + 3]])
}

// ── Parsed BMP header ───────────────────────────────────────────────

/// Header fields of an accepted BMP file.
///
/// Only exists for 1-bit, uncompressed files with non-zero dimensions;
/// anything else fails in [`BitmapHeader::parse`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BitmapHeader {
    /// Signed width as stored. Always positive once parsed.
    pub width: i32,
    /// Signed height as stored. Negative means rows are stored top-down,
    /// positive means bottom-up.
    pub height: i32,
    pub bits_per_pixel: u16,
    pub compression: u32,
    /// Absolute file offset of the first pixel row.
    pub pixel_data_offset: u32,
}

impl BitmapHeader {
    /// Parse and validate the file header and DIB header.
    ///
    /// Checks run in file order so the first problem found is reported:
    /// signature, DIB length, bit depth and compression, then dimensions.
    pub fn parse(data: &[u8]) -> Result<Self, DecodeError> {
        if data.len() < FILE_HEADER_LEN || &data[0..2] != b"BM" {
            return Err(DecodeError::InvalidFormat("not a BMP file".into()));
        }
        let pixel_data_offset = u32_le(data, 10);

        let dib = data
            .get(FILE_HEADER_LEN..FILE_HEADER_LEN + DIB_HEADER_LEN)
            .ok_or_else(|| DecodeError::InvalidFormat("DIB header shorter than 40 bytes".into()))?;

        let width = i32_le(dib, 4);
        let height = i32_le(dib, 8);
        let bits_per_pixel = u16_le(dib, 14);
        let compression = u32_le(dib, 16);

        if bits_per_pixel != 1 || compression != 0 {
            return Err(DecodeError::UnsupportedFormat {
                bits_per_pixel,
                compression,
            });
        }
        if width <= 0 {
            return Err(DecodeError::InvalidFormat(alloc::format!(
                "BMP width is {width}"
            )));
        }
        if height == 0 {
            return Err(DecodeError::InvalidFormat("BMP height is zero".into()));
        }

        Ok(Self {
            width,
            height,
            bits_per_pixel,
            compression,
            pixel_data_offset,
        })
    }

    /// Whether rows are stored top row first.
    pub fn is_top_down(&self) -> bool {
        self.height < 0
    }

    /// Image width in pixels.
    pub fn pixel_width(&self) -> u32 {
        self.width.unsigned_abs()
    }

    /// Image height in pixels, regardless of row order.
    pub fn pixel_height(&self) -> u32 {
        self.height.unsigned_abs()
    }
}

// ── Full decode ─────────────────────────────────────────────────────

/// Decode a 1-bit BMP into a top-down [`Bitmap`].
pub(crate) fn decode_bitmap(
    data: &[u8],
    limits: Option<&Limits>,
    stop: &dyn Stop,
) -> Result<Bitmap, DecodeError> {
    let header = BitmapHeader::parse(data)?;
    let width = header.pixel_width();
    let height = header.pixel_height();
    debug!(
        width,
        height,
        top_down = header.is_top_down(),
        "BMP header parsed"
    );

    let pixel_count = (width as usize)
        .checked_mul(height as usize)
        .ok_or(DecodeError::DimensionsTooLarge { width, height })?;
    if let Some(limits) = limits {
        limits.check(width, height)?;
        limits.check_memory(pixel_count)?;
    }
    stop.check()?;

    let mut dec = BmpDecoderState::new(data, header);
    dec.decode_rows(stop)
}

// ── Internal decoder state ──────────────────────────────────────────

struct BmpDecoderState<'a> {
    bytes: Cursor<'a>,
    width: usize,
    height: usize,
    flip_vertically: bool,
    offset: usize,
}

impl<'a> BmpDecoderState<'a> {
    fn new(data: &'a [u8], header: BitmapHeader) -> Self {
        Self {
            bytes: Cursor::new(data),
            width: header.pixel_width() as usize,
            height: header.pixel_height() as usize,
            flip_vertically: !header.is_top_down(),
            offset: header.pixel_data_offset as usize,
        }
    }

    fn decode_rows(&mut self, stop: &dyn Stop) -> Result<Bitmap, DecodeError> {
        // The DIB header may be larger than 40 bytes and a color table may
        // follow it; the declared offset is authoritative.
        self.bytes.set_position(self.offset);

        let needed = packed_row_bytes(self.width);
        let stride = row_stride(self.width);

        // Find the first short row before allocating anything. Padding
        // after the final row may be missing.
        let available = self.bytes.remaining();
        let full_rows = match available.checked_sub(needed) {
            Some(rest) => rest / stride + 1,
            None => 0,
        };
        if full_rows < self.height {
            return Err(DecodeError::TruncatedFile {
                row: full_rows,
                needed,
                available: available.saturating_sub(full_rows * stride).min(needed),
            });
        }

        let mut out = Bitmap::zeroed(self.width, self.height);
        for row in 0..self.height {
            if row % 16 == 0 {
                stop.check()?;
            }
            let packed = self.bytes.take(needed);
            self.bytes.skip_lenient(stride - needed);
            expand_bits(packed, out.row_mut(row));
        }

        if self.flip_vertically {
            out.flip_vertical();
        }
        Ok(out)
    }
}
