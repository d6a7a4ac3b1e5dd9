//! Lock-free hand-off of playback state to the render thread.
//!
//! Every state change writes a [`PlaybackSnapshot`] into a triple buffer;
//! the renderer reads the latest one without touching the controller lock.

use super::state::{Direction, FrameRangeState, PlaybackStatus};

/// What the renderer needs to draw the current playback frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaybackSnapshot {
    /// Ticker lifecycle.
    pub status: PlaybackStatus,
    /// Selected frame ordinal, `None` in range display mode.
    pub current_frame: Option<usize>,
    /// Model the selected ordinal resolved to.
    pub current_model: Option<usize>,
    /// Fractional position while morphing.
    pub morph_position: Option<f32>,
    /// Models to draw, ascending.
    pub visible_models: Vec<usize>,
    /// Inclusive range bounds.
    pub range: (usize, usize),
    /// Direction playback is currently moving through the range, combining
    /// the requested direction with any palindrome bounce.
    pub direction: Direction,
    /// Ticker generation at the time of the write.
    pub generation: u64,
}

impl PlaybackSnapshot {
    pub(crate) fn capture(state: &FrameRangeState, generation: u64) -> Self {
        let direction = if state.base_direction == state.current_direction {
            Direction::Forward
        } else {
            Direction::Backward
        };
        Self {
            status: state.status,
            current_frame: state.current_frame,
            current_model: state.current_model,
            morph_position: (state.morph_count > 0)
                .then_some(state.morph_position),
            visible_models: state.visible_models.iter().copied().collect(),
            range: (state.first_frame, state.last_frame),
            direction,
            generation,
        }
    }
}

/// Producer side, owned by the controller core.
pub(crate) struct SnapshotWriter(triple_buffer::Input<PlaybackSnapshot>);

impl SnapshotWriter {
    pub(crate) fn write(&mut self, snapshot: PlaybackSnapshot) {
        self.0.write(snapshot);
    }
}

/// Consumer side, handed to the render thread.
pub struct SnapshotReader(triple_buffer::Output<PlaybackSnapshot>);

impl SnapshotReader {
    /// Whether a snapshot newer than the last [`latest`](Self::latest)
    /// call is waiting.
    #[must_use]
    pub fn has_update(&self) -> bool {
        self.0.updated()
    }

    /// The most recently published snapshot.
    pub fn latest(&mut self) -> &PlaybackSnapshot {
        self.0.read()
    }
}

impl std::fmt::Debug for SnapshotReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnapshotReader")
            .field("has_update", &self.has_update())
            .finish()
    }
}

pub(crate) fn snapshot_channel() -> (SnapshotWriter, SnapshotReader) {
    let (input, output) =
        triple_buffer::triple_buffer(&PlaybackSnapshot::default());
    (SnapshotWriter(input), SnapshotReader(output))
}
