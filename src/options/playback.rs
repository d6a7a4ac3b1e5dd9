use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::playback::{Direction, ReplayMode, DEFAULT_FPS};

/// Frame rate, replay policy and boundary holds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Playback", inline)]
#[serde(default)]
pub struct PlaybackOptions {
    /// Frames advanced per second.
    #[schemars(title = "Frames per Second", range(min = 1, max = 120))]
    pub fps: u32,
    /// What happens when playback reaches the end of the range.
    #[schemars(title = "Replay Mode")]
    pub replay_mode: ReplayMode,
    /// Extra hold on the first frame of the range, in seconds.
    #[schemars(title = "First Frame Hold", range(min = 0.0, max = 10.0), extend("step" = 0.1))]
    pub first_frame_delay: f32,
    /// Extra hold on the last frame of the range, in seconds.
    #[schemars(title = "Last Frame Hold", range(min = 0.0, max = 10.0), extend("step" = 0.1))]
    pub last_frame_delay: f32,
    /// Requested playback direction.
    #[schemars(title = "Direction")]
    pub direction: Direction,
}

impl Default for PlaybackOptions {
    fn default() -> Self {
        Self {
            fps: DEFAULT_FPS,
            replay_mode: ReplayMode::Once,
            first_frame_delay: 0.0,
            last_frame_delay: 0.0,
            direction: Direction::Forward,
        }
    }
}
