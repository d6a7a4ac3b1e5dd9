use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Interpolated in-between frames.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default, JsonSchema,
)]
#[schemars(title = "Morph", inline)]
#[serde(default)]
pub struct MorphOptions {
    /// Interpolated frames inserted between each pair of models (0 = off).
    #[schemars(title = "Morph Frames", range(min = 0, max = 50))]
    pub morph_count: u32,
}
