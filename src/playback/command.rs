//! Serializable playback commands.
//!
//! Lets a scripting layer, a UI bridge or a config file drive the
//! controller with plain data. Commands serialize as JSON objects tagged by
//! `"command"`, e.g. `{"command": "set_range", "first": 2, "last": null}`.

use serde::{Deserialize, Serialize};

use super::state::{Direction, ReplayMode};
use super::PlaybackController;

/// A single playback command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum PlaybackCommand {
    /// Start playback.
    Play,
    /// Stop playback.
    Stop,
    /// Stop, keeping the frame and morph position.
    Pause,
    /// Continue from the current frame.
    Resume,
    /// Flip direction, starting playback if stopped.
    Reverse,
    /// Back to the start of the range.
    Rewind,
    /// One step in the requested direction.
    Next,
    /// One step against the requested direction.
    Previous,
    /// Jump to the end of the range.
    Last,
    /// Set the inclusive range; `null` bounds mean "all the way".
    SetRange {
        /// First ordinal.
        first: Option<usize>,
        /// Last ordinal.
        last: Option<usize>,
    },
    /// Replay policy plus boundary holds in seconds.
    SetMode {
        /// Replay policy.
        mode: ReplayMode,
        /// Hold on the first frame.
        #[serde(default)]
        first_delay: f32,
        /// Hold on the last frame.
        #[serde(default)]
        last_delay: f32,
    },
    /// Frames per second.
    SetFps {
        /// Rate; 0 is treated as 1.
        fps: u32,
    },
    /// Requested direction.
    SetDirection {
        /// New direction.
        direction: Direction,
    },
    /// Interpolated frames between models.
    SetMorphCount {
        /// 0 disables morphing.
        count: u32,
    },
    /// Enter or leave movie mode.
    SetMovie {
        /// One-based model numbers; `null` or empty leaves movie mode.
        frames: Option<Vec<usize>>,
        /// Starting ordinal.
        #[serde(default)]
        start: usize,
    },
    /// Select one frame.
    SetFrame {
        /// Frame ordinal.
        frame: usize,
    },
    /// Show the whole range instead of one frame.
    ClearFrameSelection,
    /// Keep a model visible regardless of the selection.
    SetBackgroundFrame {
        /// Model index; `null` clears it.
        model: Option<usize>,
    },
    /// Reset to a fresh session.
    Clear,
}

impl PlaybackController {
    /// Apply one command.
    pub fn execute(&mut self, command: PlaybackCommand) {
        log::trace!("playback command: {command:?}");
        match command {
            PlaybackCommand::Play => self.set_playing(true),
            PlaybackCommand::Stop => self.set_playing(false),
            PlaybackCommand::Pause => self.pause(),
            PlaybackCommand::Resume => self.resume(),
            PlaybackCommand::Reverse => self.reverse(),
            PlaybackCommand::Rewind => self.rewind(),
            PlaybackCommand::Next => {
                let _ = self.step_next();
            }
            PlaybackCommand::Previous => {
                let _ = self.step_previous();
            }
            PlaybackCommand::Last => self.set_animation_last(),
            PlaybackCommand::SetRange { first, last } => {
                self.set_range(first, last);
            }
            PlaybackCommand::SetMode {
                mode,
                first_delay,
                last_delay,
            } => self.set_mode(mode, first_delay, last_delay),
            PlaybackCommand::SetFps { fps } => self.set_fps(fps),
            PlaybackCommand::SetDirection { direction } => {
                self.set_direction(direction);
            }
            PlaybackCommand::SetMorphCount { count } => {
                self.set_morph_count(count);
            }
            PlaybackCommand::SetMovie { frames, start } => {
                self.set_movie(frames, start);
            }
            PlaybackCommand::SetFrame { frame } => self.set_frame(frame),
            PlaybackCommand::ClearFrameSelection => {
                self.clear_frame_selection();
            }
            PlaybackCommand::SetBackgroundFrame { model } => {
                self.set_background_frame(model);
            }
            PlaybackCommand::Clear => self.clear(),
        }
    }
}
