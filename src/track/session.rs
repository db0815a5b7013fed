//! Session lifecycle: start, feed events, stop, save.

use super::markers::{DEFAULT_MARKER_RADIUS, MarkerPalette, MarkerSink};
use super::pipeline::{DEFAULT_RENDER_INTERVAL, StrokePipeline};
use super::settings::LiveSettings;
use crate::draw::{Compositor, DrawTarget};
use crate::input::{MouseButton, PointerEvent};
use crate::layout::{BackgroundStyle, LayoutError, Monitor, SessionContext, VerticalAxis};
use crate::output::SaveError;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Errors reported by the session controller.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("a tracking session is already running")]
    AlreadyRunning,

    #[error("no tracking session has been started")]
    NotRunning,

    #[error("invalid monitor layout: {0}")]
    Layout(#[from] LayoutError),

    #[error("failed to start render thread: {0}")]
    Spawn(#[source] std::io::Error),

    #[error(transparent)]
    Save(#[from] SaveError),
}

/// Fixed per-tracker drawing options.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub background: BackgroundStyle,
    pub palette: MarkerPalette,
    pub marker_radius: u32,
    pub render_interval: Duration,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            background: BackgroundStyle::default(),
            palette: MarkerPalette::default(),
            marker_radius: DEFAULT_MARKER_RADIUS,
            render_interval: DEFAULT_RENDER_INTERVAL,
        }
    }
}

/// One live session: a fresh canvas, one stroke queue and one render thread.
pub struct Session {
    compositor: Arc<Compositor>,
    pipeline: StrokePipeline,
    markers: MarkerSink,
}

impl Session {
    /// Computes the layout and spawns the render thread.
    pub fn start(
        monitors: Vec<Monitor>,
        axis: VerticalAxis,
        settings: Arc<LiveSettings>,
        options: &SessionOptions,
    ) -> Result<Self, SessionError> {
        let context = SessionContext::new(monitors, axis)?;
        let compositor = Arc::new(Compositor::new(context, options.background));
        Self::resume(compositor, settings, options)
    }

    /// Spawns a render thread drawing onto an existing canvas.
    pub fn resume(
        compositor: Arc<Compositor>,
        settings: Arc<LiveSettings>,
        options: &SessionOptions,
    ) -> Result<Self, SessionError> {
        let target: Arc<dyn DrawTarget> = compositor.clone();

        let pipeline =
            StrokePipeline::spawn(Arc::clone(&target), Arc::clone(&settings), options.render_interval)
                .map_err(SessionError::Spawn)?;
        let markers = MarkerSink::new(target, settings, options.palette, options.marker_radius);

        Ok(Self {
            compositor,
            pipeline,
            markers,
        })
    }

    pub fn compositor(&self) -> &Arc<Compositor> {
        &self.compositor
    }

    pub fn on_move(&self, x: i32, y: i32) {
        self.pipeline.on_move(x, y);
    }

    pub fn on_click(&self, x: i32, y: i32, button: MouseButton, pressed: bool) -> bool {
        self.markers.on_click(x, y, button, pressed)
    }

    /// Stops the render thread after it drained the queue and hands back the canvas.
    pub fn stop(mut self) -> Arc<Compositor> {
        let drawn = self.pipeline.stop();
        log::info!("Tracking stopped ({} segments drawn)", drawn);
        Arc::clone(&self.compositor)
    }
}

/// Controller driving sessions over the lifetime of the program.
///
/// Owns the shared [`LiveSettings`] so toggles and knobs survive between
/// sessions, and keeps the last stopped canvas around for saving.
pub struct Tracker {
    monitors: Vec<Monitor>,
    axis: VerticalAxis,
    settings: Arc<LiveSettings>,
    options: SessionOptions,
    active: Option<Session>,
    last: Option<Arc<Compositor>>,
    /// Canvas saved without cleaning; the next session keeps drawing on it.
    retained: Option<Arc<Compositor>>,
}

impl Tracker {
    pub fn new(
        monitors: Vec<Monitor>,
        axis: VerticalAxis,
        settings: Arc<LiveSettings>,
        options: SessionOptions,
    ) -> Self {
        Self {
            monitors,
            axis,
            settings,
            options,
            active: None,
            last: None,
            retained: None,
        }
    }

    pub fn settings(&self) -> &Arc<LiveSettings> {
        &self.settings
    }

    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    /// Canvas of the running session, or of the last stopped one.
    pub fn compositor(&self) -> Option<&Arc<Compositor>> {
        self.active
            .as_ref()
            .map(Session::compositor)
            .or(self.last.as_ref())
    }

    /// Starts a session.
    ///
    /// The canvas of the previous session is discarded, unless it was saved
    /// with `clean` unset: then the new session continues on that canvas.
    pub fn start(&mut self) -> Result<(), SessionError> {
        if self.active.is_some() {
            return Err(SessionError::AlreadyRunning);
        }

        let session = match self.retained.take() {
            Some(compositor) => {
                log::debug!("Continuing on the retained canvas");
                Session::resume(compositor, Arc::clone(&self.settings), &self.options)?
            }
            None => Session::start(
                self.monitors.clone(),
                self.axis,
                Arc::clone(&self.settings),
                &self.options,
            )?,
        };
        self.last = None;
        self.active = Some(session);
        log::info!("Tracking started on {} monitor(s)", self.monitors.len());
        Ok(())
    }

    /// Stops the running session; returns once its render thread has exited.
    pub fn stop(&mut self) -> Result<(), SessionError> {
        let session = self.active.take().ok_or(SessionError::NotRunning)?;
        self.last = Some(session.stop());
        Ok(())
    }

    pub fn on_move(&self, x: i32, y: i32) {
        if let Some(session) = &self.active {
            session.on_move(x, y);
        }
    }

    pub fn on_click(&self, x: i32, y: i32, button: MouseButton, pressed: bool) -> bool {
        self.active
            .as_ref()
            .is_some_and(|session| session.on_click(x, y, button, pressed))
    }

    /// Dispatches a pointer event to the matching callback.
    pub fn handle(&self, event: PointerEvent) {
        match event {
            PointerEvent::Move { x, y } => self.on_move(x, y),
            PointerEvent::Click {
                x,
                y,
                button,
                pressed,
            } => {
                self.on_click(x, y, button, pressed);
            }
        }
    }

    /// Saves the canvas. A running session is stopped first so no queued
    /// motion is missing from the file.
    pub fn save(&mut self, dir: &Path, create_dir: bool, clean: bool) -> Result<PathBuf, SessionError> {
        if self.active.is_some() {
            self.stop()?;
        }
        let compositor = self.last.as_ref().ok_or(SessionError::NotRunning)?;
        let path = compositor.save(dir, create_dir, clean)?;
        self.retained = (!clean).then(|| Arc::clone(compositor));
        Ok(path)
    }
}
