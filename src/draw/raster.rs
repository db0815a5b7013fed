//! Owned RGBA pixel buffer and the source-over blend.
//!
//! Pixels are stored row-major as straight (non-premultiplied) RGBA8. Cairo is
//! only used at the edges: to rasterize stroke overlays and to encode/decode
//! PNG files.

use super::color::{Color, TRANSPARENT};
use super::render::Overlay;
use crate::util::Rect;
use std::io::{Read, Write};

/// Pixel buffer owned by the compositor.
#[derive(Clone, PartialEq, Eq)]
pub struct Raster {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl std::fmt::Debug for Raster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Raster")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

/// Composites `src` over `dst` with straight-alpha Porter-Duff "over".
///
/// `out_a = sa + da * (1 - sa)` and each channel is
/// `(s * sa + d * da * (1 - sa)) / out_a`, rounded to nearest. Against an
/// opaque destination this reduces to `s * sa + d * (1 - sa)`.
pub fn blend_over(src: Color, dst: Color) -> Color {
    if src.a == 255 {
        return src;
    }
    if src.a == 0 {
        return dst;
    }

    let sa = src.a as u32;
    let dst_weight = dst.a as u32 * (255 - sa);
    // out_a scaled by 255^2
    let total = sa * 255 + dst_weight;
    if total == 0 {
        return TRANSPARENT;
    }

    let channel = |s: u8, d: u8| -> u8 {
        ((s as u32 * sa * 255 + d as u32 * dst_weight + total / 2) / total) as u8
    };

    Color {
        r: channel(src.r, dst.r),
        g: channel(src.g, dst.g),
        b: channel(src.b, dst.b),
        a: ((total + 127) / 255) as u8,
    }
}

impl Raster {
    /// Creates a raster filled with a single color.
    pub fn new(width: u32, height: u32, fill: Color) -> Self {
        let len = width as usize * height as usize;
        let mut pixels = Vec::with_capacity(len * 4);
        for _ in 0..len {
            pixels.extend_from_slice(&[fill.r, fill.g, fill.b, fill.a]);
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA bytes, row-major.
    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    fn offset(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return None;
        }
        Some((y as usize * self.width as usize + x as usize) * 4)
    }

    /// Reads a single pixel; `None` outside the raster.
    pub fn pixel(&self, x: i32, y: i32) -> Option<Color> {
        self.offset(x, y).map(|i| {
            Color::new(
                self.pixels[i],
                self.pixels[i + 1],
                self.pixels[i + 2],
                self.pixels[i + 3],
            )
        })
    }

    fn put(&mut self, index: usize, color: Color) {
        self.pixels[index..index + 4].copy_from_slice(&[color.r, color.g, color.b, color.a]);
    }

    fn bounds(&self) -> Option<Rect> {
        Rect::new(0, 0, self.width as i32, self.height as i32)
    }

    /// Overwrites every pixel of `rect` with `color` (no blending).
    pub fn fill_rect(&mut self, rect: Rect, color: Color) {
        let Some(clip) = self.bounds().and_then(|b| b.intersect(&rect)) else {
            return;
        };
        for y in clip.y..clip.max_y() {
            for x in clip.x..clip.max_x() {
                if let Some(i) = self.offset(x, y) {
                    self.put(i, color);
                }
            }
        }
    }

    /// Paints an inner border `thickness` pixels wide along the edges of `rect`.
    pub fn outline_rect(&mut self, rect: Rect, color: Color, thickness: u32) {
        let t = (thickness as i32).min(rect.width).min(rect.height);
        if t <= 0 {
            return;
        }
        let edges = [
            Rect::new(rect.x, rect.y, rect.width, t),
            Rect::new(rect.x, rect.max_y() - t, rect.width, t),
            Rect::new(rect.x, rect.y, t, rect.height),
            Rect::new(rect.max_x() - t, rect.y, t, rect.height),
        ];
        for edge in edges.into_iter().flatten() {
            self.fill_rect(edge, color);
        }
    }

    /// Composites an overlay onto this raster using [`blend_over`].
    ///
    /// Only the overlay's region is visited; everything outside it is
    /// transparent by construction and would leave the canvas unchanged.
    pub fn composite(&mut self, overlay: &Overlay) {
        let region = overlay.region();
        let Some(clip) = self.bounds().and_then(|b| b.intersect(&region)) else {
            return;
        };
        for y in clip.y..clip.max_y() {
            for x in clip.x..clip.max_x() {
                let src = overlay.pixel(x - region.x, y - region.y);
                if src.a == 0 {
                    continue;
                }
                if let Some(i) = self.offset(x, y) {
                    let dst = Color::new(
                        self.pixels[i],
                        self.pixels[i + 1],
                        self.pixels[i + 2],
                        self.pixels[i + 3],
                    );
                    self.put(i, blend_over(src, dst));
                }
            }
        }
    }

    /// Encodes the raster as PNG.
    pub fn write_png<W: Write>(&self, writer: &mut W) -> Result<(), cairo::IoError> {
        let mut surface = cairo::ImageSurface::create(
            cairo::Format::ARgb32,
            self.width as i32,
            self.height as i32,
        )?;
        let stride = surface.stride() as usize;
        {
            let mut data = surface
                .data()
                .map_err(|_| cairo::IoError::Cairo(cairo::Error::SurfaceFinished))?;
            for y in 0..self.height as usize {
                for x in 0..self.width as usize {
                    let src = (y * self.width as usize + x) * 4;
                    let [r, g, b, a] = [
                        self.pixels[src],
                        self.pixels[src + 1],
                        self.pixels[src + 2],
                        self.pixels[src + 3],
                    ];
                    let word = premultiply(r, g, b, a);
                    let dst = y * stride + x * 4;
                    data[dst..dst + 4].copy_from_slice(&word.to_ne_bytes());
                }
            }
        }
        surface.mark_dirty();
        surface.write_to_png(writer)
    }

    /// Decodes a PNG into a raster.
    pub fn read_png<R: Read>(reader: &mut R) -> Result<Self, cairo::IoError> {
        let mut surface = cairo::ImageSurface::create_from_png(reader)?;
        let width = surface.width().max(0) as u32;
        let height = surface.height().max(0) as u32;
        let format = surface.format();
        let stride = surface.stride() as usize;
        let data = surface
            .data()
            .map_err(|_| cairo::IoError::Cairo(cairo::Error::SurfaceFinished))?;

        let mut raster = Raster::new(width, height, TRANSPARENT);
        for y in 0..height as usize {
            for x in 0..width as usize {
                let at = y * stride + x * 4;
                let word = u32::from_ne_bytes([data[at], data[at + 1], data[at + 2], data[at + 3]]);
                let color = match format {
                    cairo::Format::Rgb24 => unpremultiply(word | 0xff00_0000),
                    _ => unpremultiply(word),
                };
                let i = (y * width as usize + x) * 4;
                raster.put(i, color);
            }
        }
        Ok(raster)
    }
}

/// Packs a straight-alpha pixel into Cairo's premultiplied ARGB32 word.
pub(crate) fn premultiply(r: u8, g: u8, b: u8, a: u8) -> u32 {
    let mul = |c: u8| (c as u32 * a as u32 + 127) / 255;
    (a as u32) << 24 | mul(r) << 16 | mul(g) << 8 | mul(b)
}

/// Unpacks a premultiplied ARGB32 word into a straight-alpha color.
pub(crate) fn unpremultiply(word: u32) -> Color {
    let a = (word >> 24) & 0xff;
    if a == 0 {
        return TRANSPARENT;
    }
    let div = |c: u32| ((c * 255 + a / 2) / a).min(255) as u8;
    Color::new(
        div((word >> 16) & 0xff),
        div((word >> 8) & 0xff),
        div(word & 0xff),
        a as u8,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::color::{BLACK, WHITE};

    #[test]
    fn opaque_source_replaces_destination() {
        let stroke = Color::new(12, 200, 99, 255);
        assert_eq!(blend_over(stroke, Color::new(40, 40, 40, 255)), stroke);
    }

    #[test]
    fn half_alpha_averages_against_opaque_background() {
        let out = blend_over(WHITE.with_alpha(128), BLACK);
        assert_eq!(out, Color::new(128, 128, 128, 255));

        let out = blend_over(Color::new(200, 200, 200, 128), Color::new(100, 100, 100, 255));
        assert_eq!(out, Color::new(150, 150, 150, 255));
    }

    #[test]
    fn transparent_source_keeps_destination() {
        let dst = Color::new(1, 2, 3, 4);
        assert_eq!(blend_over(TRANSPARENT, dst), dst);
        assert_eq!(blend_over(TRANSPARENT, TRANSPARENT), TRANSPARENT);
    }

    #[test]
    fn over_transparent_destination_keeps_source_color() {
        let src = Color::new(255, 0, 0, 100);
        assert_eq!(blend_over(src, TRANSPARENT), src);
    }

    #[test]
    fn outline_draws_only_edges() {
        let mut raster = Raster::new(10, 10, BLACK);
        raster.outline_rect(Rect::new(0, 0, 10, 10).unwrap(), WHITE, 1);
        assert_eq!(raster.pixel(0, 0), Some(WHITE));
        assert_eq!(raster.pixel(9, 5), Some(WHITE));
        assert_eq!(raster.pixel(5, 9), Some(WHITE));
        assert_eq!(raster.pixel(5, 5), Some(BLACK));
        assert_eq!(raster.pixel(10, 5), None);
    }

    #[test]
    fn premultiply_round_trips_opaque_pixels() {
        let word = premultiply(10, 20, 30, 255);
        assert_eq!(unpremultiply(word), Color::new(10, 20, 30, 255));
        assert_eq!(unpremultiply(premultiply(255, 255, 255, 128)), WHITE.with_alpha(128));
    }

    #[test]
    fn png_round_trip_preserves_opaque_pixels() {
        let mut raster = Raster::new(4, 3, BLACK);
        raster.fill_rect(Rect::new(1, 1, 2, 1).unwrap(), Color::new(200, 100, 50, 255));

        let mut encoded = Vec::new();
        raster.write_png(&mut encoded).unwrap();
        assert_eq!(&encoded[0..8], &[137, 80, 78, 71, 13, 10, 26, 10]);

        let decoded = Raster::read_png(&mut encoded.as_slice()).unwrap();
        assert_eq!(decoded, raster);
    }
}
