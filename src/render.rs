use enough::Stop;
use tracing::warn;

use crate::bitmap::Bitmap;
use crate::display::{DisplayGeometry, DisplayTarget, FrameBuffer};
use crate::error::{DecodeError, RenderError};
use crate::limits::Limits;
use crate::orient::{self, RotationPolicy};

/// Fill value used to clear the panel before presenting (white on most
/// e-paper panels).
pub const DEFAULT_CLEAR_VALUE: u8 = 0xFF;

/// Builder for decoding a BMP and drawing it to a display.
///
/// ```no_run
/// use zenmono::{DisplayTarget, RenderRequest, Unstoppable};
///
/// # fn draw<D: DisplayTarget>(epd: &mut D, data: &[u8]) -> Result<(), zenmono::RenderError<D::Error>> {
/// RenderRequest::new(data).invert(true).render(epd, Unstoppable)?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct RenderRequest<'a> {
    data: &'a [u8],
    invert: bool,
    clear_value: u8,
    rotation: RotationPolicy,
    limits: Option<&'a Limits>,
}

impl<'a> RenderRequest<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            invert: false,
            clear_value: DEFAULT_CLEAR_VALUE,
            rotation: RotationPolicy::Auto,
            limits: None,
        }
    }

    /// Flip every output bit.
    pub fn invert(mut self, invert: bool) -> Self {
        self.invert = invert;
        self
    }

    /// Value passed to [`DisplayTarget::clear`] before presenting.
    pub fn clear_value(mut self, fill: u8) -> Self {
        self.clear_value = fill;
        self
    }

    pub fn rotation(mut self, policy: RotationPolicy) -> Self {
        self.rotation = policy;
        self
    }

    pub fn with_limits(mut self, limits: &'a Limits) -> Self {
        self.limits = Some(limits);
        self
    }

    /// Decode, orient, and pack for `geometry` without touching a display.
    pub fn rasterize(
        &self,
        geometry: DisplayGeometry,
        stop: impl Stop,
    ) -> Result<FrameBuffer, DecodeError> {
        self.rasterize_with(geometry, &stop)
    }

    fn rasterize_with(
        &self,
        geometry: DisplayGeometry,
        stop: &dyn Stop,
    ) -> Result<FrameBuffer, DecodeError> {
        let bitmap = crate::bmp::decode(self.data, self.limits, stop)?;
        let bitmap = orient::normalize(bitmap, geometry, self.rotation);
        crate::raster::rasterize_into(&bitmap, geometry, self.invert, self.limits, stop)
    }

    /// Rasterize for `target`, then clear it and present the framebuffer.
    ///
    /// Nothing is sent to the display unless the whole file decodes.
    pub fn render<D: DisplayTarget>(
        &self,
        mut target: D,
        stop: impl Stop,
    ) -> Result<(), RenderError<D::Error>> {
        let result = self.render_inner(&mut target, &stop);
        if let Err(err) = &result {
            warn!(error = %err, "Error displaying BMP");
        }
        result
    }

    fn render_inner<D: DisplayTarget>(
        &self,
        target: &mut D,
        stop: &dyn Stop,
    ) -> Result<(), RenderError<D::Error>> {
        let frame = self.rasterize_with(target.geometry(), stop)?;
        target
            .clear(self.clear_value)
            .map_err(RenderError::Driver)?;
        target
            .present_partial(frame.as_bytes())
            .map_err(RenderError::Driver)?;
        Ok(())
    }
}

/// Decode a 1-bit BMP into a top-down [`Bitmap`].
pub fn decode_bmp(data: &[u8], stop: impl Stop) -> Result<Bitmap, DecodeError> {
    crate::bmp::decode(data, None, &stop)
}

/// Decode a 1-bit BMP with resource limits.
pub fn decode_bmp_with_limits(
    data: &[u8],
    limits: &Limits,
    stop: impl Stop,
) -> Result<Bitmap, DecodeError> {
    crate::bmp::decode(data, Some(limits), &stop)
}

/// Stretch `bitmap` over `geometry` and pack it, 1 bit per pixel, MSB first.
///
/// No rotation is applied; see [`crate::orient::normalize`].
pub fn rasterize(
    bitmap: &Bitmap,
    geometry: DisplayGeometry,
    invert: bool,
    stop: impl Stop,
) -> Result<FrameBuffer, DecodeError> {
    crate::raster::rasterize_into(bitmap, geometry, invert, None, &stop)
}

/// Decode `data`, auto-rotate, scale, and present it on `target`.
pub fn render_bmp_to_display<D: DisplayTarget>(
    target: D,
    data: &[u8],
    invert: bool,
) -> Result<(), RenderError<D::Error>> {
    RenderRequest::new(data)
        .invert(invert)
        .render(target, enough::Unstoppable)
}

/// Read the BMP at `path` and present it on `target`.
///
/// The file is read fully and closed before decoding starts.
#[cfg(feature = "std")]
pub fn render_bmp_file<D: DisplayTarget>(
    target: D,
    path: impl AsRef<std::path::Path>,
    invert: bool,
) -> Result<(), RenderError<D::Error>> {
    let path = path.as_ref();
    let data = std::fs::read(path).map_err(|err| {
        warn!(path = %path.display(), error = %err, "Error opening BMP");
        RenderError::Io(Box::new(err))
    })?;
    render_bmp_to_display(target, &data, invert)
}
