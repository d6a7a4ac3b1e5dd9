//! Locked playback core shared between the command thread and the ticker.
//!
//! [`PlaybackCore`] holds the frame range state together with the
//! collaborators it drives. [`Shared`] wraps it in a mutex next to the
//! generation counter that invalidates superseded tickers.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use super::snapshot::{PlaybackSnapshot, SnapshotWriter};
use super::state::{
    Direction, FrameRangeState, PlaybackStatus, ReplayMode, DEFAULT_FPS,
};
use crate::error::FrameSelectError;
use crate::host::{FrameHost, FrameSource, Interpolator};

/// Frame range state plus the collaborators it reads from and drives.
pub(crate) struct PlaybackCore {
    pub(crate) state: FrameRangeState,
    pub(crate) source: Arc<dyn FrameSource>,
    pub(crate) interpolator: Arc<dyn Interpolator>,
    pub(crate) host: Arc<dyn FrameHost>,
    publisher: SnapshotWriter,
}

impl PlaybackCore {
    pub(crate) fn new(
        source: Arc<dyn FrameSource>,
        interpolator: Arc<dyn Interpolator>,
        host: Arc<dyn FrameHost>,
        publisher: SnapshotWriter,
    ) -> Self {
        Self {
            state: FrameRangeState::default(),
            source,
            interpolator,
            host,
            publisher,
        }
    }

    /// Frames in the sequence: the movie length, or the model count.
    pub(crate) fn frame_count(&self) -> usize {
        match &self.state.movie_frames {
            Some(map) => map.len(),
            None => self.source.frame_count(),
        }
    }

    /// Push the current state to the renderer's snapshot reader.
    pub(crate) fn publish(&mut self, generation: u64) {
        let snapshot = PlaybackSnapshot::capture(&self.state, generation);
        self.publisher.write(snapshot);
    }

    // -- Range ---------------------------------------------------------

    /// Set the inclusive range, clamped into the sequence, and rewind.
    ///
    /// `None` for `first` means frame 0; `None` for `last` means the final
    /// frame. Sequences of one frame or fewer collapse to `[0, 0]`.
    pub(crate) fn set_range(
        &mut self,
        first: Option<usize>,
        last: Option<usize>,
    ) {
        let frame_count = self.frame_count();
        let max_frame = frame_count.saturating_sub(1);
        let (first, last) = if frame_count <= 1 {
            (0, 0)
        } else {
            (
                first.unwrap_or(0).min(max_frame),
                last.unwrap_or(max_frame).min(max_frame),
            )
        };
        self.state.first_frame = first;
        self.state.last_frame = last;
        self.state.frame_step = (last as isize - first as isize).signum();
        self.state.morph_position = first as f32;
        self.rewind();
    }

    /// Jump to the start of the range in the base direction and reset the
    /// bounce direction.
    pub(crate) fn rewind(&mut self) {
        let frame = match self.state.base_direction {
            Direction::Forward => self.state.first_frame,
            Direction::Backward => self.state.last_frame,
        };
        self.set_frame(frame);
        self.state.current_direction = Direction::Forward;
    }

    /// Jump to the end of the range in the base direction.
    pub(crate) fn set_animation_last(&mut self) {
        let frame = match self.state.base_direction {
            Direction::Forward => self.state.last_frame,
            Direction::Backward => self.state.first_frame,
        };
        self.set_frame(frame);
    }

    /// Re-derive the range after the source reported a new frame count.
    pub(crate) fn reset_pointers(&mut self) {
        let frame_count = self.frame_count();
        let step = isize::from(frame_count > 1);
        self.state.initialize_pointers(step, frame_count);
        if self
            .state
            .background_model
            .is_some_and(|m| m >= self.source.frame_count())
        {
            self.state.background_model = None;
        }
        self.state.morph_position = 0.0;
        self.state.current_direction = Direction::Forward;
        self.set_frame(0);
    }

    /// Back to a fresh session: no movie, no morphing, frame 0, default
    /// rate and replay policy.
    pub(crate) fn clear(&mut self) {
        self.state.movie_frames = None;
        self.state.morph_count = 0;
        self.state.morph_position = 0.0;
        self.state.background_model = None;
        self.state.initialize_pointers(0, self.frame_count());
        self.set_frame(0);
        self.state.current_direction = Direction::Forward;
        self.state.base_direction = Direction::Forward;
        self.state.fps = DEFAULT_FPS;
        self.state.replay_mode = ReplayMode::Once;
        self.state.set_boundary_delays(0.0, 0.0);
    }

    // -- Frame selection -----------------------------------------------

    /// Select a frame ordinal, clamped into the sequence.
    ///
    /// The frame pointer is updated even if the host fails to apply the
    /// selection. A movie entry that names no loaded model keeps the
    /// previous model on screen.
    pub(crate) fn set_frame(&mut self, ordinal: usize) {
        let frame_count = self.frame_count();
        if frame_count == 0 {
            self.state.current_frame = None;
            self.select_model(None);
            return;
        }
        let ordinal = ordinal.min(frame_count - 1);
        self.state.current_frame = Some(ordinal);
        let model = self.resolve_model(self.state.model_for_frame(ordinal));
        if model.is_none() {
            log::warn!(
                "movie frame {ordinal} names no loaded model; keeping model {:?}",
                self.state.current_model,
            );
            let _ = self.refresh_visible();
            return;
        }
        self.select_model(model);
    }

    /// Drop the single-frame selection and show the whole range.
    pub(crate) fn clear_frame_selection(&mut self) {
        self.state.current_frame = None;
        self.select_model(None);
    }

    /// Point the host at `model` and refresh the visible set. Selecting
    /// nothing also drops the background frame.
    fn select_model(&mut self, model: Option<usize>) {
        let model = self.resolve_model(model);
        self.state.current_model = model;
        if let Err(e) = self.host.select_frame(model) {
            log_select_failure(&e);
        }
        if model.is_none() {
            self.state.background_model = None;
        }
        let _ = self.refresh_visible();
    }

    /// Bound `model` by the loaded model count. A single loaded model
    /// always resolves to itself.
    fn resolve_model(&self, model: Option<usize>) -> Option<usize> {
        let model_count = self.source.frame_count();
        if model_count == 1 {
            Some(0)
        } else {
            model.filter(|&m| m < model_count)
        }
    }

    /// Keep `model` visible regardless of the current selection. Out of
    /// range clears it.
    pub(crate) fn set_background_frame(&mut self, model: Option<usize>) {
        let model_count = self.source.frame_count();
        self.state.background_model = model.filter(|&m| m < model_count);
        let _ = self.refresh_visible();
    }

    // -- Movie / morph -------------------------------------------------

    /// Enable movie indirection over `frames` (one-based model numbers),
    /// or disable it for `None` / an empty map.
    ///
    /// An out-of-range `start` falls back to the first movie frame. Always
    /// turns morphing off and clears the background frame.
    pub(crate) fn set_movie(&mut self, frames: Option<Vec<usize>>, start: usize) {
        self.state.morph_count = 0;
        self.state.background_model = None;
        match frames.filter(|map| !map.is_empty()) {
            Some(map) => {
                let start = if start >= map.len() { 0 } else { start };
                self.state.movie_frames = Some(map);
                let frame_count = self.frame_count();
                self.state
                    .initialize_pointers(isize::from(frame_count > 1), frame_count);
                self.set_frame(start);
            }
            None => {
                self.state.movie_frames = None;
                let frame_count = self.frame_count();
                self.state
                    .initialize_pointers(isize::from(frame_count > 1), frame_count);
                self.set_frame(self.state.current_model.unwrap_or(0));
            }
        }
        self.state.morph_position =
            self.state.current_frame.map_or(0.0, |f| f as f32);
    }

    /// Number of interpolated frames between models. Movies never morph.
    pub(crate) fn set_morph_count(&mut self, count: u32) {
        let count = if self.state.is_movie() { 0 } else { count };
        if count == 0 || self.state.morph_count == 0 {
            self.state.morph_position =
                self.state.current_frame.map_or(0.0, |f| f as f32);
        }
        self.state.morph_count = count;
    }

    // -- Queries -------------------------------------------------------

    /// Whether the current position is ordinal `frame`; morph-aware.
    pub(crate) fn current_frame_is(&self, frame: usize) -> bool {
        if self.state.morph_count == 0 {
            self.state.current_frame == Some(frame)
        } else {
            (self.state.morph_position - frame as f32).abs()
                < super::morph::MORPH_TOLERANCE
        }
    }

    /// Whether the renderer last painted the current frame.
    pub(crate) fn is_at_last_frame(&self) -> bool {
        if self.state.is_movie() {
            self.state.last_painted_frame == self.state.current_frame
        } else {
            self.state.last_painted_model == self.state.current_model
        }
    }

    /// Record what the renderer just painted.
    pub(crate) fn repaint_done(&mut self) {
        self.state.last_painted_frame = self.state.current_frame;
        self.state.last_painted_model = self.state.current_model;
    }

    /// Wall time for one pass over the range, in seconds.
    pub(crate) fn estimated_runtime_seconds(&self) -> f32 {
        let frame_count = self.frame_count();
        let (first, last) = (self.state.first_frame, self.state.last_frame);
        if first == last || first >= frame_count || last >= frame_count {
            return 0.0;
        }
        let (lo, hi) = self.state.range_bounds();
        let mut secs = (hi - lo) as f32 / self.state.fps.max(1) as f32
            + self.state.first_frame_delay_ms as f32 / 1000.0
            + self.state.last_frame_delay_ms as f32 / 1000.0;
        for frame in lo..=hi {
            if let Some(model) = self.state.model_for_frame(frame) {
                secs += self.source.frame_delay_ms(model) as f32 / 1000.0;
            }
        }
        secs
    }

    /// How long the ticker holds the current frame before stepping.
    ///
    /// The frame interval from fps, or longer if the frame carries a
    /// boundary hold (first/last of the range) or a per-model delay.
    pub(crate) fn hold_duration(&self) -> Duration {
        let interval_ms = 1000 / self.state.fps.max(1);
        let boundary_ms = if self.current_frame_is(self.state.first_frame) {
            self.state.first_frame_delay_ms
        } else if self.current_frame_is(self.state.last_frame) {
            self.state.last_frame_delay_ms
        } else {
            0
        };
        let hold_ms = if boundary_ms > 0 {
            boundary_ms
        } else {
            self.state
                .current_model
                .map_or(0, |m| self.source.frame_delay_ms(m))
        };
        Duration::from_millis(u64::from(interval_ms.max(hold_ms)))
    }

    /// Mark playback finished and tell the host, once.
    pub(crate) fn finish_playback(&mut self) {
        self.state.status = PlaybackStatus::Stopped;
        self.host.notify_frame_changed();
    }
}

fn log_select_failure(err: &FrameSelectError) {
    match err {
        FrameSelectError::ModelUnavailable(_) => {
            log::debug!("frame selection skipped: {err}");
        }
        FrameSelectError::Host(_) => {
            log::warn!("ignoring frame selection failure: {err}");
        }
    }
}

/// Outcome of one ticker advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Tick {
    /// Moved to the next frame.
    Advanced,
    /// Reached the end under the replay mode; playback is now stopped.
    Finished,
    /// A newer generation owns the controller; nothing was touched.
    Superseded,
}

/// The core behind a mutex, plus the live ticker generation.
///
/// The generation only changes while the core lock is held, so a ticker
/// that checks it under the lock can never act on a stale session.
pub(crate) struct Shared {
    core: Mutex<PlaybackCore>,
    generation: AtomicU64,
}

impl Shared {
    pub(crate) fn new(core: PlaybackCore) -> Self {
        Self {
            core: Mutex::new(core),
            generation: AtomicU64::new(0),
        }
    }

    fn lock(&self) -> MutexGuard<'_, PlaybackCore> {
        self.core.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Run a read-only query against the core.
    pub(crate) fn read<R>(&self, f: impl FnOnce(&PlaybackCore) -> R) -> R {
        f(&self.lock())
    }

    /// Mutate the core and publish the resulting snapshot.
    pub(crate) fn update<R>(&self, f: impl FnOnce(&mut PlaybackCore) -> R) -> R {
        let mut core = self.lock();
        let result = f(&mut core);
        core.publish(self.generation());
        result
    }

    /// Invalidate the running ticker (if any) and apply `f`.
    ///
    /// Returns the new generation.
    pub(crate) fn bump_generation<R>(
        &self,
        f: impl FnOnce(&mut PlaybackCore) -> R,
    ) -> (u64, R) {
        let mut core = self.lock();
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        let result = f(&mut core);
        core.publish(generation);
        (generation, result)
    }

    /// Hold time for the current frame, or `None` if `generation` is stale.
    pub(crate) fn hold_for(&self, generation: u64) -> Option<Duration> {
        let core = self.lock();
        (self.generation() == generation).then(|| core.hold_duration())
    }

    /// Step forward once on behalf of ticker `generation`.
    pub(crate) fn advance(&self, generation: u64) -> Tick {
        let mut core = self.lock();
        if self.generation() != generation {
            return Tick::Superseded;
        }
        let direction = core.state.base_direction.sign();
        if core.step(direction) {
            core.publish(generation);
            return Tick::Advanced;
        }
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        core.finish_playback();
        core.publish(generation);
        Tick::Finished
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::super::test_support::Fixture;

    fn hold_ms(fx: &Fixture) -> u128 {
        fx.read(|core| core.hold_duration().as_millis())
    }

    #[test]
    fn hold_is_the_frame_interval_in_mid_range() {
        let fx = Fixture::new(5);
        fx.update(|core| {
            core.set_range(None, None);
            core.state.fps = 4;
            core.state.set_boundary_delays(2.0, 3.0);
            core.set_frame(2);
        });
        assert_eq!(hold_ms(&fx), 250);
    }

    #[test]
    fn boundary_frames_use_their_own_hold() {
        let fx = Fixture::new(5);
        fx.update(|core| {
            core.set_range(None, None);
            core.state.fps = 4;
            core.state.set_boundary_delays(2.0, 3.0);
        });
        assert_eq!(hold_ms(&fx), 2000);
        fx.update(|core| core.set_frame(4));
        assert_eq!(hold_ms(&fx), 3000);
    }

    #[test]
    fn short_boundary_hold_never_undercuts_the_interval() {
        let fx = Fixture::new(5);
        fx.update(|core| {
            core.set_range(None, None);
            core.state.fps = 2;
            core.state.set_boundary_delays(0.1, 0.0);
        });
        assert_eq!(hold_ms(&fx), 500);
    }

    #[test]
    fn long_model_delay_extends_the_hold() {
        let fx = Fixture::new(5);
        fx.source.set_delay(2, 1200);
        fx.source.set_delay(3, 50);
        fx.update(|core| {
            core.set_range(None, None);
            core.state.fps = 10;
            core.set_frame(2);
        });
        assert_eq!(
            fx.read(|core| core.hold_duration()),
            Duration::from_millis(1200)
        );
        fx.update(|core| core.set_frame(3));
        assert_eq!(hold_ms(&fx), 100);
    }

    #[test]
    fn movie_start_out_of_range_falls_back_to_first_frame() {
        let fx = Fixture::new(6);
        fx.update(|core| core.set_movie(Some(vec![6, 4, 2]), 7));
        fx.read(|core| {
            assert_eq!(core.state.current_frame, Some(0));
            assert_eq!(core.state.current_model, Some(5));
            assert_eq!(core.frame_count(), 3);
        });
    }

    #[test]
    fn movie_clears_background_and_morphing() {
        let fx = Fixture::new(6);
        fx.update(|core| {
            core.set_range(None, None);
            core.set_morph_count(3);
            core.set_background_frame(Some(1));
            core.set_movie(Some(vec![6, 4, 2]), 1);
        });
        fx.read(|core| {
            assert!(core.state.is_movie());
            assert_eq!(core.state.morph_count, 0);
            assert_eq!(core.state.background_model, None);
            assert_eq!(core.state.current_model, Some(3));
        });
        // Morphing stays off while the movie is active.
        fx.update(|core| core.set_morph_count(2));
        assert_eq!(fx.read(|core| core.state.morph_count), 0);
    }

    #[test]
    fn empty_or_missing_map_leaves_movie_mode() {
        let fx = Fixture::new(6);
        fx.update(|core| core.set_movie(Some(vec![2, 1]), 0));
        assert_eq!(fx.read(super::PlaybackCore::frame_count), 2);

        fx.update(|core| {
            core.set_background_frame(Some(4));
            core.set_movie(Some(Vec::new()), 0);
        });
        fx.read(|core| {
            assert!(!core.state.is_movie());
            assert_eq!(core.frame_count(), 6);
            assert_eq!(core.state.background_model, None);
            assert_eq!((core.state.first_frame, core.state.last_frame), (0, 5));
        });

        fx.update(|core| core.set_movie(Some(vec![3]), 0));
        fx.update(|core| core.set_movie(None, 0));
        assert!(!fx.read(|core| core.state.is_movie()));
    }

    #[test]
    fn unresolved_movie_entry_keeps_the_previous_model() {
        let fx = Fixture::new(3);
        fx.update(|core| core.set_movie(Some(vec![2, 0, 1]), 0));
        assert_eq!(fx.read(|core| core.state.current_model), Some(1));
        let selections = fx.host.selections().len();

        assert!(fx.update(|core| core.step(1)));
        fx.read(|core| {
            assert_eq!(core.state.current_frame, Some(1));
            assert_eq!(core.state.current_model, Some(1));
        });
        assert_eq!(fx.host.selections().len(), selections);
        let visible: Vec<usize> =
            fx.update(|core| core.refresh_visible().iter().copied().collect());
        assert_eq!(visible, vec![1]);

        assert!(fx.update(|core| core.step(1)));
        assert_eq!(fx.read(|core| core.state.current_model), Some(0));
        assert_eq!(fx.host.selections().last(), Some(&Some(0)));
    }
}
