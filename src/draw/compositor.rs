//! Thread-safe canvas that owns the session raster.

use super::color::Color;
use super::raster::Raster;
use super::render::{self, Overlay, RenderError};
use crate::layout::{BackgroundStyle, Position, SessionContext, background};
use crate::output::{self, SaveError};
use crate::util::Rect;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

/// Receiver of stroke and marker draw requests.
///
/// Implemented by [`Compositor`]; tests substitute a recorder.
pub trait DrawTarget: Send + Sync {
    /// Draw a segment between two raw pointer positions.
    fn line(&self, start: Position, end: Position, color: Color, width: u32);

    /// Draw a filled marker centred on a raw pointer position.
    fn ellipse(&self, center: Position, color: Color, radius: u32);
}

/// Owns the canvas raster and serializes every mutation behind one lock.
///
/// Primitives are rendered alone onto a transparent overlay, then the overlay
/// is composited over the canvas. Coordinates passed in are raw pointer
/// positions; the session offset is applied here.
pub struct Compositor {
    context: SessionContext,
    style: BackgroundStyle,
    raster: Mutex<Raster>,
}

impl Compositor {
    /// Creates a compositor whose canvas starts as the desktop map background.
    pub fn new(context: SessionContext, style: BackgroundStyle) -> Self {
        let raster = Self::fresh_background(&context, &style);
        log::info!(
            "Canvas {}x{} (origin {:?}), primary offset ({}, {})",
            context.geometry.width,
            context.geometry.height,
            context.geometry.origin,
            context.offset.dx,
            context.offset.dy
        );
        Self {
            context,
            style,
            raster: Mutex::new(raster),
        }
    }

    fn fresh_background(context: &SessionContext, style: &BackgroundStyle) -> Raster {
        background(&context.monitors, &context.bounds, context.axis, style)
    }

    fn lock(&self) -> MutexGuard<'_, Raster> {
        self.raster
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Restricts `rect` to the canvas.
    fn clip(&self, rect: Rect) -> Option<Rect> {
        let geometry = &self.context.geometry;
        rect.clip_to(geometry.width as i32, geometry.height as i32)
    }

    fn apply(&self, overlay: Result<Option<Overlay>, RenderError>, what: &str) {
        match overlay {
            Ok(Some(overlay)) => self.lock().composite(&overlay),
            Ok(None) => {}
            Err(err) => log::warn!("Skipping {}: {}", what, err),
        }
    }

    /// Draws a stroke segment between two raw pointer positions.
    pub fn line(&self, start: Position, end: Position, color: Color, width: u32) {
        let start = self.context.to_canvas(start);
        let end = self.context.to_canvas(end);
        let width = width.max(1) as f64;

        let overlay = Rect::around_segment(start, end, width / 2.0)
            .and_then(|rect| self.clip(rect))
            .map(|region| {
                render::rasterize(region, |ctx| render::render_line(ctx, start, end, color, width))
            })
            .transpose();
        self.apply(overlay, "stroke");
    }

    /// Draws a filled circle of `radius` centred on the raw position `(x, y)`.
    pub fn ellipse(&self, x: i32, y: i32, color: Color, radius: u32) {
        let (cx, cy) = self.context.to_canvas(Position::new(x, y));

        let overlay = Rect::around_segment((cx, cy), (cx, cy), radius as f64)
            .and_then(|rect| self.clip(rect))
            .map(|region| render::rasterize(region, |ctx| render::render_disc(ctx, cx, cy, radius, color)))
            .transpose();
        self.apply(overlay, "marker");
    }

    /// Copy of the current canvas.
    pub fn snapshot(&self) -> Raster {
        self.lock().clone()
    }

    /// Restores the background computed for this session's layout.
    pub fn reset(&self) {
        *self.lock() = Self::fresh_background(&self.context, &self.style);
    }

    /// Writes the canvas to `<dir>/mouse_track-<timestamp>.png`.
    ///
    /// With `clean` set the canvas is reset, but only once the file has been
    /// written; a failed save leaves the canvas untouched. The raster stays
    /// locked for the whole call so no draw can slip in between write and reset.
    pub fn save(&self, dir: &Path, create_dir: bool, clean: bool) -> Result<PathBuf, SaveError> {
        let mut raster = self.lock();
        let path = output::save_png(&raster, dir, create_dir)?;
        if clean {
            *raster = Self::fresh_background(&self.context, &self.style);
        }
        log::info!("Track image saved: {}", path.display());
        Ok(path)
    }
}

impl DrawTarget for Compositor {
    fn line(&self, start: Position, end: Position, color: Color, width: u32) {
        Compositor::line(self, start, end, color, width);
    }

    fn ellipse(&self, center: Position, color: Color, radius: u32) {
        Compositor::ellipse(self, center.x, center.y, color, radius);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::color::{BLACK, WHITE};
    use crate::layout::{Monitor, VerticalAxis};
    use std::sync::Arc;
    use std::thread;
    use tempfile::TempDir;

    fn compositor(monitors: Vec<Monitor>) -> Compositor {
        let context = SessionContext::new(monitors, VerticalAxis::TopDown).unwrap();
        Compositor::new(context, BackgroundStyle::default())
    }

    fn single() -> Compositor {
        compositor(vec![Monitor::new(0, 0, 100, 80, true)])
    }

    #[test]
    fn starts_as_background() {
        let comp = single();
        let snap = comp.snapshot();
        assert_eq!((snap.width(), snap.height()), (100, 80));
        assert_eq!(snap.pixel(50, 40), Some(BLACK));
        assert_eq!(snap.pixel(0, 0), Some(BackgroundStyle::default().border));
    }

    #[test]
    fn opaque_stroke_pixel_equals_stroke_color() {
        let comp = single();
        let red = Color::new(255, 0, 0, 255);
        comp.line(Position::new(10, 40), Position::new(90, 40), red, 6);
        assert_eq!(comp.snapshot().pixel(50, 40), Some(red));
    }

    #[test]
    fn half_transparent_stroke_averages_with_background() {
        let comp = single();
        comp.line(Position::new(10, 40), Position::new(90, 40), WHITE.with_alpha(128), 6);
        assert_eq!(comp.snapshot().pixel(50, 40), Some(Color::new(128, 128, 128, 255)));
        // untouched away from the stroke
        assert_eq!(comp.snapshot().pixel(50, 10), Some(BLACK));
    }

    #[test]
    fn overlapping_strokes_accumulate() {
        let comp = single();
        let faint = WHITE.with_alpha(128);
        comp.line(Position::new(10, 40), Position::new(90, 40), faint, 6);
        comp.line(Position::new(50, 10), Position::new(50, 70), faint, 6);
        // 128, then round((255 * 128 + 128 * 127) / 255) = 192
        assert_eq!(comp.snapshot().pixel(50, 40), Some(Color::new(192, 192, 192, 255)));
    }

    #[test]
    fn offset_is_applied_to_raw_positions() {
        let comp = compositor(vec![
            Monitor::new(-100, 0, 100, 80, false),
            Monitor::new(0, 0, 100, 80, true),
        ]);
        let green = Color::new(0, 255, 0, 255);
        comp.ellipse(20, 40, green, 10);

        let snap = comp.snapshot();
        assert_eq!(snap.pixel(120, 40), Some(green));
        assert_eq!(snap.pixel(20, 40), Some(BLACK));
        // outside the radius
        assert_eq!(snap.pixel(120, 55), Some(BLACK));
    }

    #[test]
    fn strokes_off_canvas_are_ignored() {
        let comp = single();
        let before = comp.snapshot();
        comp.line(Position::new(500, 500), Position::new(600, 600), WHITE, 3);
        comp.ellipse(-300, -300, WHITE, 10);
        assert_eq!(comp.snapshot(), before);
    }

    #[test]
    fn reset_restores_same_background() {
        let comp = single();
        let fresh = comp.snapshot();
        comp.line(Position::new(0, 0), Position::new(99, 79), WHITE, 4);
        assert_ne!(comp.snapshot(), fresh);
        comp.reset();
        assert_eq!(comp.snapshot(), fresh);
    }

    #[test]
    fn save_with_clean_resets_after_write() {
        let temp = TempDir::new().unwrap();
        let comp = single();
        let fresh = comp.snapshot();
        comp.line(Position::new(10, 10), Position::new(90, 70), WHITE, 4);
        let drawn = comp.snapshot();

        let path = comp.save(temp.path(), true, true).unwrap();
        let mut file = std::fs::File::open(&path).unwrap();
        assert_eq!(Raster::read_png(&mut file).unwrap(), drawn);
        assert_eq!(comp.snapshot(), fresh);
    }

    #[test]
    fn failed_save_keeps_raster() {
        let temp = TempDir::new().unwrap();
        let comp = single();
        comp.line(Position::new(10, 10), Position::new(90, 70), WHITE, 4);
        let drawn = comp.snapshot();

        let err = comp.save(&temp.path().join("missing"), false, true).unwrap_err();
        assert!(matches!(err, SaveError::OutputDirectoryMissing(_)));
        assert_eq!(comp.snapshot(), drawn);
    }

    #[test]
    fn concurrent_draws_are_serialized() {
        let comp = Arc::new(single());
        let faint = WHITE.with_alpha(128);
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let comp = Arc::clone(&comp);
                thread::spawn(move || {
                    for _ in 0..5 {
                        comp.ellipse(50, 40, faint, 5);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let mut expected = BLACK;
        for _ in 0..20 {
            expected = crate::draw::blend_over(faint, expected);
        }
        assert_eq!(comp.snapshot().pixel(50, 40), Some(expected));
    }
}
