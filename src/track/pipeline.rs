//! Producer/consumer pipeline turning motion samples into stroke segments.
//!
//! The capture context only appends to a queue; a dedicated render thread
//! drains it in batches and draws one segment per pair of consecutive
//! samples. The queue lock guards queue state only. Raster access is
//! serialized separately inside the [`DrawTarget`].

use super::settings::LiveSettings;
use crate::draw::{DrawTarget, color::WHITE};
use crate::layout::Position;
use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Pause between render batches; caps the consumer's CPU use.
pub const DEFAULT_RENDER_INTERVAL: Duration = Duration::from_millis(10);

#[derive(Debug, Default)]
struct Queue {
    positions: VecDeque<Position>,
    stopping: bool,
}

#[derive(Debug, Default)]
struct Shared {
    queue: Mutex<Queue>,
    ready: Condvar,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Queue> {
        self.queue
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Queue plus render thread for one session.
pub struct StrokePipeline {
    shared: Arc<Shared>,
    settings: Arc<LiveSettings>,
    render_thread: Option<JoinHandle<usize>>,
    segments_drawn: usize,
}

impl StrokePipeline {
    /// Spawns the render thread.
    pub fn spawn(
        target: Arc<dyn DrawTarget>,
        settings: Arc<LiveSettings>,
        interval: Duration,
    ) -> io::Result<Self> {
        let shared = Arc::new(Shared::default());

        let thread_shared = Arc::clone(&shared);
        let thread_settings = Arc::clone(&settings);
        let render_thread = thread::Builder::new()
            .name("stroke-render".into())
            .spawn(move || render_loop(&thread_shared, target.as_ref(), &thread_settings, interval))?;

        log::debug!("Stroke render thread started");
        Ok(Self {
            shared,
            settings,
            render_thread: Some(render_thread),
            segments_drawn: 0,
        })
    }

    /// Pointer-move callback, invoked on the capture context.
    ///
    /// Dropped when move recording is off, when the pipeline is stopping, or
    /// when the sample repeats the last enqueued position.
    pub fn on_move(&self, x: i32, y: i32) {
        if !self.settings.move_enabled() {
            return;
        }

        let position = Position::new(x, y);
        {
            let mut queue = self.shared.lock();
            if queue.stopping || queue.positions.back() == Some(&position) {
                return;
            }
            queue.positions.push_back(position);
        }
        self.shared.ready.notify_one();
    }

    /// Number of positions waiting to be drawn (the trailing sample included).
    pub fn pending(&self) -> usize {
        self.shared.lock().positions.len()
    }

    pub fn is_running(&self) -> bool {
        self.render_thread.is_some()
    }

    /// Signals the render thread, waits for it to drain the queue and exit.
    ///
    /// Returns the number of segments drawn over the pipeline's lifetime.
    /// Calling it again is a no-op.
    pub fn stop(&mut self) -> usize {
        let Some(handle) = self.render_thread.take() else {
            return self.segments_drawn;
        };

        self.shared.lock().stopping = true;
        self.shared.ready.notify_all();

        match handle.join() {
            Ok(drawn) => self.segments_drawn = drawn,
            Err(_) => log::error!("Stroke render thread panicked"),
        }
        log::debug!(
            "Stroke render thread stopped after {} segments",
            self.segments_drawn
        );
        self.segments_drawn
    }
}

impl Drop for StrokePipeline {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Consumer loop, run on the render thread until a stop is requested.
fn render_loop(
    shared: &Shared,
    target: &dyn DrawTarget,
    settings: &LiveSettings,
    interval: Duration,
) -> usize {
    let mut drawn = 0;

    loop {
        let (batch, stopping) = {
            let mut queue = shared.lock();
            while queue.positions.len() < 2 && !queue.stopping {
                queue = shared
                    .ready
                    .wait(queue)
                    .unwrap_or_else(|poisoned| poisoned.into_inner());
            }
            (take_batch(&mut queue.positions), queue.stopping)
        };

        if batch.len() > 1 {
            log::trace!("Drawing {} segments", batch.len() - 1);
        }
        for pair in batch.windows(2) {
            let color = WHITE.with_alpha(settings.stroke_alpha());
            target.line(pair[0], pair[1], color, settings.width());
            drawn += 1;
        }

        if stopping {
            return drawn;
        }
        thread::sleep(interval);
    }
}

/// Pops every queued position except the newest and returns them followed by
/// a copy of the newest, so consecutive batches stay connected.
fn take_batch(positions: &mut VecDeque<Position>) -> Vec<Position> {
    if positions.len() < 2 {
        return Vec::new();
    }
    let keep_from = positions.len() - 1;
    let mut batch: Vec<Position> = positions.drain(..keep_from).collect();
    batch.extend(positions.front().copied());
    batch
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_keeps_trailing_sample_queued() {
        let mut positions: VecDeque<Position> =
            [(0, 0), (1, 1), (2, 2)].into_iter().map(Position::from).collect();
        let batch = take_batch(&mut positions);
        assert_eq!(
            batch,
            vec![Position::new(0, 0), Position::new(1, 1), Position::new(2, 2)]
        );
        assert_eq!(positions.len(), 1);
        assert_eq!(positions.front(), Some(&Position::new(2, 2)));
    }

    #[test]
    fn single_sample_makes_no_batch() {
        let mut positions: VecDeque<Position> = [Position::new(4, 4)].into_iter().collect();
        assert!(take_batch(&mut positions).is_empty());
        assert_eq!(positions.len(), 1);
    }
}
