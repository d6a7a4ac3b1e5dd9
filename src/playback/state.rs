//! Frame range state owned by the playback controller.
//!
//! Pure data: range bounds, step sign, replay policy, direction, timing and
//! morph configuration, movie indirection. Only the controller mutates it.

use std::collections::BTreeSet;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Policy applied when stepping would leave the frame range.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum ReplayMode {
    /// Stop at the boundary.
    #[default]
    Once,
    /// Jump back to the start of the range.
    Loop,
    /// Bounce and run the range in the opposite direction.
    Palindrome,
}

/// Playback direction.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Toward increasing frame ordinals.
    #[default]
    Forward,
    /// Toward decreasing frame ordinals.
    Backward,
}

impl Direction {
    /// `+1` or `-1`.
    #[must_use]
    pub fn sign(self) -> isize {
        match self {
            Self::Forward => 1,
            Self::Backward => -1,
        }
    }

    /// The opposite direction.
    #[must_use]
    pub fn flipped(self) -> Self {
        match self {
            Self::Forward => Self::Backward,
            Self::Backward => Self::Forward,
        }
    }
}

/// Ticker lifecycle as seen by callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlaybackStatus {
    /// No ticker; the frame pointer stays where it is.
    #[default]
    Stopped,
    /// A ticker is advancing frames.
    Playing,
    /// Stopped by [`pause`](super::PlaybackController::pause); resumable
    /// from the same frame and morph position.
    Paused,
}

/// Default playback rate.
pub const DEFAULT_FPS: u32 = 10;

/// Complete frame/range state of one playback session.
#[derive(Debug, Clone)]
pub(crate) struct FrameRangeState {
    /// Selected frame ordinal, or `None` in range display mode.
    pub(crate) current_frame: Option<usize>,
    /// Model index the current ordinal resolved to.
    pub(crate) current_model: Option<usize>,
    /// Inclusive first ordinal of the range.
    pub(crate) first_frame: usize,
    /// Inclusive last ordinal of the range.
    pub(crate) last_frame: usize,
    /// Sign of `last - first`; 0 means no range.
    pub(crate) frame_step: isize,
    pub(crate) replay_mode: ReplayMode,
    /// User-requested direction.
    pub(crate) base_direction: Direction,
    /// Internal direction, flipped only by palindrome bouncing and
    /// [`reverse`](super::PlaybackController::reverse).
    pub(crate) current_direction: Direction,
    pub(crate) fps: u32,
    pub(crate) first_frame_delay_ms: u32,
    pub(crate) last_frame_delay_ms: u32,
    pub(crate) morph_count: u32,
    /// Fractional frame, meaningful only while `morph_count > 0`.
    pub(crate) morph_position: f32,
    /// One-based model numbers, indexed by frame ordinal.
    pub(crate) movie_frames: Option<Vec<usize>>,
    /// Model shown regardless of the current selection.
    pub(crate) background_model: Option<usize>,
    pub(crate) status: PlaybackStatus,
    pub(crate) last_painted_frame: Option<usize>,
    pub(crate) last_painted_model: Option<usize>,
    /// Model indices the renderer should draw.
    pub(crate) visible_models: BTreeSet<usize>,
}

impl Default for FrameRangeState {
    fn default() -> Self {
        Self {
            current_frame: Some(0),
            current_model: Some(0),
            first_frame: 0,
            last_frame: 0,
            frame_step: 0,
            replay_mode: ReplayMode::Once,
            base_direction: Direction::Forward,
            current_direction: Direction::Forward,
            fps: DEFAULT_FPS,
            first_frame_delay_ms: 0,
            last_frame_delay_ms: 0,
            morph_count: 0,
            morph_position: 0.0,
            movie_frames: None,
            background_model: None,
            status: PlaybackStatus::Stopped,
            last_painted_frame: None,
            last_painted_model: None,
            visible_models: BTreeSet::new(),
        }
    }
}

impl FrameRangeState {
    /// Whether frame ordinals go through the movie map.
    pub(crate) fn is_movie(&self) -> bool {
        self.movie_frames.is_some()
    }

    /// Resolve a frame ordinal to a model index.
    ///
    /// Movie maps hold one-based model numbers; a zero or missing entry
    /// resolves to `None`.
    pub(crate) fn model_for_frame(&self, ordinal: usize) -> Option<usize> {
        match &self.movie_frames {
            Some(map) => map.get(ordinal).and_then(|m| m.checked_sub(1)),
            None => Some(ordinal),
        }
    }

    /// `(min, max)` of the range bounds.
    pub(crate) fn range_bounds(&self) -> (usize, usize) {
        (
            self.first_frame.min(self.last_frame),
            self.first_frame.max(self.last_frame),
        )
    }

    /// Reset the range pointers: `[0, frame_count - 1]` with the given
    /// step, or `[0, 0]` when `frame_step` is 0.
    pub(crate) fn initialize_pointers(
        &mut self,
        frame_step: isize,
        frame_count: usize,
    ) {
        self.first_frame = 0;
        self.last_frame = if frame_step == 0 {
            0
        } else {
            frame_count.saturating_sub(1)
        };
        self.frame_step = frame_step;
    }

    /// Store boundary delays from seconds, clamping negatives to zero.
    pub(crate) fn set_boundary_delays(
        &mut self,
        first_delay_secs: f32,
        last_delay_secs: f32,
    ) {
        self.first_frame_delay_ms = secs_to_ms(first_delay_secs);
        self.last_frame_delay_ms = secs_to_ms(last_delay_secs);
    }
}

fn secs_to_ms(secs: f32) -> u32 {
    if secs > 0.0 {
        (secs * 1000.0) as u32
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn movie_map_is_one_based() {
        let state = FrameRangeState {
            movie_frames: Some(vec![3, 1, 0]),
            ..FrameRangeState::default()
        };
        assert_eq!(state.model_for_frame(0), Some(2));
        assert_eq!(state.model_for_frame(1), Some(0));
        assert_eq!(state.model_for_frame(2), None);
        assert_eq!(state.model_for_frame(3), None);
    }

    #[test]
    fn plain_ordinals_resolve_directly() {
        let state = FrameRangeState::default();
        assert!(!state.is_movie());
        assert_eq!(state.model_for_frame(7), Some(7));
    }

    #[test]
    fn negative_delays_clamp_to_zero() {
        let mut state = FrameRangeState::default();
        state.set_boundary_delays(-2.0, 1.25);
        assert_eq!(state.first_frame_delay_ms, 0);
        assert_eq!(state.last_frame_delay_ms, 1250);
    }

    #[test]
    fn zero_step_collapses_range() {
        let mut state = FrameRangeState::default();
        state.initialize_pointers(0, 8);
        assert_eq!((state.first_frame, state.last_frame), (0, 0));
        state.initialize_pointers(1, 8);
        assert_eq!((state.first_frame, state.last_frame), (0, 7));
        assert_eq!(state.range_bounds(), (0, 7));
    }

    #[test]
    fn direction_sign_and_flip() {
        assert_eq!(Direction::Forward.sign(), 1);
        assert_eq!(Direction::Forward.flipped(), Direction::Backward);
        assert_eq!(Direction::Backward.flipped().sign(), 1);
    }
}
