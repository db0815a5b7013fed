//! Cairo-based rasterization of stroke and marker overlays.
//!
//! Each primitive is rendered alone onto a fresh, fully transparent surface
//! covering only the primitive's bounding box. The resulting [`Overlay`] is
//! then composited onto the canvas by [`Raster::composite`](super::Raster::composite).

use super::color::Color;
use super::raster::unpremultiply;
use crate::util::Rect;
use thiserror::Error;

/// Failure while rasterizing an overlay.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("cairo error: {0}")]
    Cairo(#[from] cairo::Error),

    #[error("overlay surface still borrowed: {0}")]
    Borrow(#[from] cairo::BorrowError),
}

/// Straight-alpha RGBA pixels for one rendered primitive, positioned in canvas space.
#[derive(Debug, Clone)]
pub struct Overlay {
    region: Rect,
    pixels: Vec<u8>,
}

impl Overlay {
    /// Canvas-space rectangle covered by the overlay.
    pub fn region(&self) -> Rect {
        self.region
    }

    /// Pixel at overlay-local coordinates.
    pub fn pixel(&self, x: i32, y: i32) -> Color {
        let i = (y as usize * self.region.width as usize + x as usize) * 4;
        Color::new(
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        )
    }
}

/// Renders `paint` onto a transparent surface covering `region` (canvas coordinates).
///
/// The context handed to `paint` is translated so callers draw in canvas space.
pub fn rasterize<F>(region: Rect, paint: F) -> Result<Overlay, RenderError>
where
    F: FnOnce(&cairo::Context) -> Result<(), cairo::Error>,
{
    let mut surface =
        cairo::ImageSurface::create(cairo::Format::ARgb32, region.width, region.height)?;
    {
        let ctx = cairo::Context::new(&surface)?;
        ctx.translate(-region.x as f64, -region.y as f64);
        paint(&ctx)?;
    }
    surface.flush();

    let stride = surface.stride() as usize;
    let data = surface.data()?;
    let width = region.width as usize;
    let mut pixels = Vec::with_capacity(width * region.height as usize * 4);
    for y in 0..region.height as usize {
        for x in 0..width {
            let at = y * stride + x * 4;
            let word = u32::from_ne_bytes([data[at], data[at + 1], data[at + 2], data[at + 3]]);
            let color = unpremultiply(word);
            pixels.extend_from_slice(&[color.r, color.g, color.b, color.a]);
        }
    }

    Ok(Overlay { region, pixels })
}

/// Render a straight line with round caps.
pub fn render_line(
    ctx: &cairo::Context,
    start: (i32, i32),
    end: (i32, i32),
    color: Color,
    width: f64,
) -> Result<(), cairo::Error> {
    let (r, g, b, a) = color.to_cairo_rgba();
    ctx.set_source_rgba(r, g, b, a);
    ctx.set_line_width(width);
    ctx.set_line_cap(cairo::LineCap::Round);

    ctx.move_to(start.0 as f64, start.1 as f64);
    ctx.line_to(end.0 as f64, end.1 as f64);
    ctx.stroke()
}

/// Render a filled circle inscribed in `[(cx - radius, cy - radius), (cx + radius, cy + radius)]`.
pub fn render_disc(
    ctx: &cairo::Context,
    cx: i32,
    cy: i32,
    radius: u32,
    color: Color,
) -> Result<(), cairo::Error> {
    if radius == 0 {
        return Ok(());
    }

    let (r, g, b, a) = color.to_cairo_rgba();
    ctx.set_source_rgba(r, g, b, a);
    ctx.arc(
        cx as f64,
        cy as f64,
        radius as f64,
        0.0,
        2.0 * std::f64::consts::PI,
    );
    ctx.fill()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_overlay_is_opaque_on_the_stroke_and_clear_elsewhere() {
        let region = Rect::new(0, 0, 20, 20).unwrap();
        let overlay = rasterize(region, |ctx| {
            render_line(ctx, (2, 10), (18, 10), Color::new(255, 0, 0, 255), 4.0)
        })
        .unwrap();

        assert_eq!(overlay.pixel(10, 10), Color::new(255, 0, 0, 255));
        assert_eq!(overlay.pixel(10, 2).a, 0);
    }

    #[test]
    fn overlay_respects_region_origin() {
        let region = Rect::new(100, 50, 30, 30).unwrap();
        let overlay = rasterize(region, |ctx| {
            render_disc(ctx, 115, 65, 10, Color::new(0, 255, 0, 100))
        })
        .unwrap();

        assert_eq!(overlay.region(), region);
        assert_eq!(overlay.pixel(15, 15), Color::new(0, 255, 0, 100));
        assert_eq!(overlay.pixel(0, 0).a, 0);
    }
}
