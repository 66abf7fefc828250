use alloc::boxed::Box;
use alloc::string::String;
use enough::StopReason;

/// Errors from BMP decoding and framebuffer rasterization.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum DecodeError {
    #[error("invalid BMP: {0}")]
    InvalidFormat(String),

    #[error("unsupported BMP: {bits_per_pixel} bits per pixel, compression {compression} (only 1-bit uncompressed is supported)")]
    UnsupportedFormat { bits_per_pixel: u16, compression: u32 },

    #[error("unexpected end of file in pixel row {row}: need {needed} bytes, got {available}")]
    TruncatedFile {
        row: usize,
        needed: usize,
        available: usize,
    },

    #[error("dimensions too large: {width}x{height}")]
    DimensionsTooLarge { width: u32, height: u32 },

    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    #[error("invalid display geometry: {width}x{height}")]
    InvalidGeometry { width: u32, height: u32 },

    #[error("operation cancelled")]
    Cancelled(StopReason),
}

impl From<StopReason> for DecodeError {
    fn from(r: StopReason) -> Self {
        DecodeError::Cancelled(r)
    }
}

/// Errors from a full render: either the file could not be turned into a
/// framebuffer, or the display rejected it.
///
/// `E` is the [`DisplayTarget::Error`](crate::DisplayTarget::Error) of the
/// target being drawn to.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum RenderError<E> {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("display driver error: {0}")]
    Driver(E),

    /// Reading the source failed before decoding began.
    #[error("I/O error: {0}")]
    Io(#[source] Box<dyn core::error::Error + Send + Sync + 'static>),
}

impl<E> RenderError<E> {
    /// The file was bad; retrying with a different file may succeed.
    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Decode(_))
    }

    /// The display failed; it should be treated as unusable.
    pub fn is_driver(&self) -> bool {
        matches!(self, Self::Driver(_))
    }
}
