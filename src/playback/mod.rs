//! Frame playback: which model is current, and when it changes.
//!
//! [`PlaybackController`] owns the frame range state and a background
//! ticker thread that advances it. Commands run synchronously on the caller's
//! thread; the ticker only ever steps under the same lock, and only while
//! its generation is the live one. Stopping, pausing and restarting cancel
//! and join the previous ticker before returning, so two tickers never
//! drive one controller.
//!
//! # Module layout
//!
//! - `state`: the frame range state and its enums
//! - [`morph`]: fractional-frame arithmetic
//! - `stepping`: the transition function behind [`PlaybackController::step`]
//! - `queries`: read-only accessors on the controller
//! - `visibility`: the visible-model projection
//! - `ticker`: the background cadence loop
//! - `command`: [`PlaybackCommand`], the serializable command vocabulary
//! - `snapshot`: lock-free [`PlaybackSnapshot`] hand-off to the renderer

mod command;
mod core;
pub mod morph;
mod queries;
mod snapshot;
mod state;
mod stepping;
mod ticker;
mod visibility;

#[cfg(test)]
pub(crate) mod test_support;

use std::sync::Arc;

pub use command::PlaybackCommand;
pub use snapshot::{PlaybackSnapshot, SnapshotReader};
pub use state::{Direction, PlaybackStatus, ReplayMode, DEFAULT_FPS};

use self::core::{PlaybackCore, Shared};
use self::ticker::Ticker;
use crate::host::{FrameHost, FrameSource, Interpolator};
use crate::options::Options;

/// The animation/playback controller for one viewer session.
///
/// Pass it explicitly to whatever issues commands and to the renderer
/// (through [`take_snapshot_reader`](Self::take_snapshot_reader)); there is
/// no global instance.
pub struct PlaybackController {
    shared: Arc<Shared>,
    ticker: Option<Ticker>,
    snapshot_reader: Option<SnapshotReader>,
}

impl PlaybackController {
    /// Controller over the given collaborators, at frame 0 with the range
    /// spanning every frame the source reports.
    #[must_use]
    pub fn new(
        source: Arc<dyn FrameSource>,
        interpolator: Arc<dyn Interpolator>,
        host: Arc<dyn FrameHost>,
    ) -> Self {
        let (writer, reader) = snapshot::snapshot_channel();
        let core = PlaybackCore::new(source, interpolator, host, writer);
        let controller = Self {
            shared: Arc::new(Shared::new(core)),
            ticker: None,
            snapshot_reader: Some(reader),
        };
        controller.shared.update(|core| {
            core.clear();
            core.reset_pointers();
        });
        controller
    }

    /// Hand the lock-free snapshot reader to the render thread. Only the
    /// first call returns it.
    pub fn take_snapshot_reader(&mut self) -> Option<SnapshotReader> {
        self.snapshot_reader.take()
    }

    // -- Playback lifecycle --------------------------------------------

    /// Start or stop playback.
    ///
    /// Starting with no frames, or on a headless host, stops instead.
    /// Starting with no frame selected (or no range) first resets the
    /// range to every frame. Stopping cancels the ticker and notifies the
    /// host once.
    pub fn set_playing(&mut self, on: bool) {
        if on == self.is_playing() {
            return;
        }
        if !on {
            self.stop_ticker(false);
            return;
        }
        let refused = self.shared.read(|core| {
            core.frame_count() == 0 || core.host.is_headless()
        });
        if refused {
            log::debug!("playback refused: no frames or no surface");
            self.stop_ticker(false);
            return;
        }
        self.shared.update(|core| {
            if core.state.current_frame.is_none() || core.state.frame_step == 0
            {
                core.set_range(None, None);
            }
        });
        self.resume();
    }

    /// Resume playback from the current frame without resetting the range.
    ///
    /// Sequences of one frame or fewer cannot play and stay stopped.
    pub fn resume(&mut self) {
        let playable = self.shared.update(|core| {
            if core.state.current_frame.is_none() {
                let (first, last) =
                    (core.state.first_frame, core.state.last_frame);
                core.set_range(Some(first), Some(last));
            }
            if core.frame_count() <= 1 {
                core.state.status = PlaybackStatus::Stopped;
                return false;
            }
            true
        });
        if playable {
            self.start_ticker();
        }
    }

    /// Stop the ticker but keep the current frame and morph position.
    pub fn pause(&mut self) {
        self.stop_ticker(true);
    }

    /// Flip the current direction; starts playback if stopped.
    pub fn reverse(&mut self) {
        self.shared.update(|core| {
            core.state.current_direction =
                core.state.current_direction.flipped();
        });
        if !self.is_playing() {
            self.set_playing(true);
        }
    }

    /// Spawn a ticker for a new generation unless a live one is running.
    fn start_ticker(&mut self) {
        let running = self.is_playing()
            && self.ticker.as_ref().is_some_and(|t| !t.is_finished());
        if running {
            return;
        }
        if let Some(mut old) = self.ticker.take() {
            old.cancel();
        }
        let (generation, fps) = self.shared.bump_generation(|core| {
            core.state.status = PlaybackStatus::Playing;
            core.state.fps
        });
        match Ticker::spawn(Arc::clone(&self.shared), generation, fps) {
            Ok(ticker) => {
                log::debug!("playback started (generation {generation})");
                self.ticker = Some(ticker);
            }
            Err(e) => {
                log::error!("{e}; playback stays stopped");
                let _ = self.shared.bump_generation(|core| {
                    core.state.status = PlaybackStatus::Stopped;
                });
            }
        }
    }

    /// Invalidate and join the ticker, then settle the status.
    ///
    /// Pausing only marks the controller paused if it was playing. The
    /// host is told the frame changed, except when pausing an already idle
    /// controller.
    fn stop_ticker(&mut self, paused: bool) {
        let (_, was_playing) = self.shared.bump_generation(|core| {
            let was_playing = core.state.status == PlaybackStatus::Playing;
            if !paused {
                core.state.status = PlaybackStatus::Stopped;
            } else if was_playing {
                core.state.status = PlaybackStatus::Paused;
            }
            was_playing
        });
        if let Some(mut ticker) = self.ticker.take() {
            ticker.cancel();
        }
        if was_playing || !paused {
            self.shared.read(|core| core.host.notify_frame_changed());
        }
    }

    // -- Range and mode ------------------------------------------------

    /// Set the inclusive frame range and rewind.
    ///
    /// `None` means "from the first frame" / "to the last frame"; both
    /// bounds are clamped into the sequence.
    pub fn set_range(&mut self, first: Option<usize>, last: Option<usize>) {
        self.shared.update(|core| core.set_range(first, last));
    }

    /// Jump to the start of the range in the requested direction.
    pub fn rewind(&mut self) {
        self.shared.update(PlaybackCore::rewind);
    }

    /// Jump to the end of the range in the requested direction.
    pub fn set_animation_last(&mut self) {
        self.shared.update(PlaybackCore::set_animation_last);
    }

    /// Set the replay policy and the first/last frame holds (seconds;
    /// negative means none).
    pub fn set_mode(
        &mut self,
        mode: ReplayMode,
        first_delay_secs: f32,
        last_delay_secs: f32,
    ) {
        self.shared.update(|core| {
            core.state.replay_mode = mode;
            core.state
                .set_boundary_delays(first_delay_secs, last_delay_secs);
        });
    }

    /// Frames per second; clamped to at least 1.
    pub fn set_fps(&mut self, fps: u32) {
        self.shared.update(|core| core.state.fps = fps.max(1));
    }

    /// The user-requested playback direction.
    pub fn set_direction(&mut self, direction: Direction) {
        self.shared.update(|core| core.state.base_direction = direction);
    }

    /// Interpolated frames between models (0 disables morphing).
    pub fn set_morph_count(&mut self, count: u32) {
        self.shared.update(|core| core.set_morph_count(count));
    }

    /// Play through `frames` (one-based model numbers) starting at
    /// `start`, or leave movie mode with `None` / an empty map.
    pub fn set_movie(&mut self, frames: Option<Vec<usize>>, start: usize) {
        self.shared.update(|core| core.set_movie(frames, start));
    }

    // -- Frame selection -----------------------------------------------

    /// Select a frame ordinal (clamped into the sequence).
    pub fn set_frame(&mut self, ordinal: usize) {
        self.shared.update(|core| core.set_frame(ordinal));
    }

    /// Stop playback and show every frame in the range.
    pub fn clear_frame_selection(&mut self) {
        self.stop_ticker(false);
        self.shared.update(PlaybackCore::clear_frame_selection);
    }

    /// Keep `model` drawn regardless of the selection; `None` clears it.
    pub fn set_background_frame(&mut self, model: Option<usize>) {
        self.shared.update(|core| core.set_background_frame(model));
    }

    /// One step in `direction` (`+1` / `-1`) relative to the current
    /// bounce direction. `false` if the replay mode allows no movement.
    pub fn step(&mut self, direction: isize) -> bool {
        self.shared.update(|core| core.step(direction))
    }

    /// Step once in the requested direction.
    pub fn step_next(&mut self) -> bool {
        self.shared
            .update(|core| core.step(core.state.base_direction.sign()))
    }

    /// Step once against the requested direction.
    pub fn step_previous(&mut self) -> bool {
        self.shared
            .update(|core| core.step(-core.state.base_direction.sign()))
    }

    /// Recompute and return the visible model indices.
    pub fn compute_visible_frames(&mut self) -> Vec<usize> {
        self.shared
            .update(|core| core.refresh_visible().iter().copied().collect())
    }

    /// Record that the renderer painted the current frame.
    pub fn repaint_done(&mut self) {
        self.shared.update(PlaybackCore::repaint_done);
    }

    // -- Session -------------------------------------------------------

    /// Re-derive the range after the model set changed size.
    pub fn models_changed(&mut self) {
        self.stop_ticker(false);
        self.shared.update(PlaybackCore::reset_pointers);
    }

    /// Reset to a fresh session.
    pub fn clear(&mut self) {
        self.stop_ticker(false);
        self.shared.update(PlaybackCore::clear);
    }

    /// Apply rate, replay, direction and morph settings.
    pub fn apply_options(&mut self, options: &Options) {
        let playback = &options.playback;
        self.set_fps(playback.fps);
        self.set_mode(
            playback.replay_mode,
            playback.first_frame_delay,
            playback.last_frame_delay,
        );
        self.set_direction(playback.direction);
        self.set_morph_count(options.morph.morph_count);
    }
}

impl Drop for PlaybackController {
    fn drop(&mut self) {
        if let Some(mut ticker) = self.ticker.take() {
            let _ = self.shared.bump_generation(|_| {});
            ticker.cancel();
        }
    }
}

impl std::fmt::Debug for PlaybackController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaybackController")
            .field("status", &self.status())
            .field("current_frame", &self.current_frame())
            .field("generation", &self.shared.generation())
            .finish_non_exhaustive()
    }
}
