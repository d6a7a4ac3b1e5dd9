//! Read-only accessors on [`PlaybackController`].

use super::core::PlaybackCore;
use super::state::{Direction, PlaybackStatus, ReplayMode};
use super::PlaybackController;
use crate::options::{MorphOptions, Options, PlaybackOptions};

impl PlaybackController {
    fn read<R>(&self, f: impl FnOnce(&PlaybackCore) -> R) -> R {
        self.shared.read(f)
    }

    /// Selected frame ordinal, `None` while the whole range is shown.
    #[must_use]
    pub fn current_frame(&self) -> Option<usize> {
        self.read(|core| core.state.current_frame)
    }

    /// Model index the current frame resolved to.
    #[must_use]
    pub fn current_model(&self) -> Option<usize> {
        self.read(|core| core.state.current_model)
    }

    /// Ticker lifecycle.
    #[must_use]
    pub fn status(&self) -> PlaybackStatus {
        self.read(|core| core.state.status)
    }

    /// Whether a ticker is advancing frames.
    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.status() == PlaybackStatus::Playing
    }

    /// Whether playback was paused and can resume in place.
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.status() == PlaybackStatus::Paused
    }

    /// Inclusive `(first, last)` ordinals; `first > last` for descending
    /// ranges.
    #[must_use]
    pub fn frame_range(&self) -> (usize, usize) {
        self.read(|core| (core.state.first_frame, core.state.last_frame))
    }

    /// Sign of `last - first`; 0 when the range is a single frame.
    #[must_use]
    pub fn frame_step(&self) -> isize {
        self.read(|core| core.state.frame_step)
    }

    /// Policy at the range boundary.
    #[must_use]
    pub fn replay_mode(&self) -> ReplayMode {
        self.read(|core| core.state.replay_mode)
    }

    /// The user-requested direction.
    #[must_use]
    pub fn direction(&self) -> Direction {
        self.read(|core| core.state.base_direction)
    }

    /// The internal bounce direction.
    #[must_use]
    pub fn current_direction(&self) -> Direction {
        self.read(|core| core.state.current_direction)
    }

    /// Frames per second.
    #[must_use]
    pub fn fps(&self) -> u32 {
        self.read(|core| core.state.fps)
    }

    /// Interpolated frames between models; 0 when not morphing.
    #[must_use]
    pub fn morph_count(&self) -> u32 {
        self.read(|core| core.state.morph_count)
    }

    /// Fractional frame position, `None` unless morphing.
    #[must_use]
    pub fn morph_position(&self) -> Option<f32> {
        self.read(|core| {
            (core.state.morph_count > 0).then_some(core.state.morph_position)
        })
    }

    /// Whether frame ordinals go through a movie map.
    #[must_use]
    pub fn is_movie(&self) -> bool {
        self.read(|core| core.state.is_movie())
    }

    /// Model kept visible regardless of the selection.
    #[must_use]
    pub fn background_frame(&self) -> Option<usize> {
        self.read(|core| core.state.background_model)
    }

    /// Frames in the sequence: movie length, or the source's model count.
    #[must_use]
    pub fn frame_count(&self) -> usize {
        self.read(PlaybackCore::frame_count)
    }

    /// Visible models as of the last state change, ascending.
    #[must_use]
    pub fn visible_frames(&self) -> Vec<usize> {
        self.read(|core| core.state.visible_models.iter().copied().collect())
    }

    /// Live ticker generation. Every start, stop and pause bumps it.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.shared.generation()
    }

    /// Whether the renderer has painted the current frame since it last
    /// changed.
    #[must_use]
    pub fn is_at_last_frame(&self) -> bool {
        self.read(PlaybackCore::is_at_last_frame)
    }

    /// Whether the current position is ordinal `frame`. While morphing
    /// this compares the fractional position.
    #[must_use]
    pub fn current_frame_is(&self, frame: usize) -> bool {
        self.read(|core| core.current_frame_is(frame))
    }

    /// Wall-clock seconds for one pass over the range, including rate,
    /// boundary holds and per-model delays. 0 for a single-frame range.
    #[must_use]
    pub fn estimated_runtime_seconds(&self) -> f32 {
        self.read(PlaybackCore::estimated_runtime_seconds)
    }

    /// Current settings in their persisted form.
    #[must_use]
    pub fn options(&self) -> Options {
        self.read(|core| {
            let state = &core.state;
            Options {
                playback: PlaybackOptions {
                    fps: state.fps,
                    replay_mode: state.replay_mode,
                    first_frame_delay: state.first_frame_delay_ms as f32
                        / 1000.0,
                    last_frame_delay: state.last_frame_delay_ms as f32
                        / 1000.0,
                    direction: state.base_direction,
                },
                morph: MorphOptions {
                    morph_count: state.morph_count,
                },
            }
        })
    }
}
