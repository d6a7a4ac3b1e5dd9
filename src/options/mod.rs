//! Playback options with TOML preset support.
//!
//! Tweakable playback settings (rate, replay policy, boundary holds,
//! direction, morphing) are consolidated here. Options serialize to/from
//! TOML for presets stored alongside a session.

mod morph;
mod playback;

use std::path::Path;

pub use morph::MorphOptions;
pub use playback::PlaybackOptions;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::PlaybackError;

/// Top-level options container. All sub-structs use `#[serde(default)]` so
/// partial TOML files (e.g. only overriding `[morph]`) work correctly.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema,
)]
#[serde(default)]
pub struct Options {
    /// Rate, replay policy and direction.
    pub playback: PlaybackOptions,
    /// Morph interpolation.
    pub morph: MorphOptions,
}

impl Options {
    /// Generate JSON Schema describing the UI-exposed options.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Options)
    }

    /// Load options from a TOML file. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// [`PlaybackError::Io`] if the file cannot be read,
    /// [`PlaybackError::OptionsParse`] if it is not valid options TOML.
    pub fn load(path: &Path) -> Result<Self, PlaybackError> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| PlaybackError::OptionsParse(e.to_string()))
    }

    /// Save options to a TOML file (pretty-printed).
    ///
    /// # Errors
    ///
    /// [`PlaybackError::OptionsParse`] if serialization fails,
    /// [`PlaybackError::Io`] if the file or its directory cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), PlaybackError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| PlaybackError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content).map_err(PlaybackError::Io)
    }

    /// List available preset names (TOML file stems) in a directory.
    #[must_use]
    pub fn list_presets(dir: &Path) -> Vec<String> {
        let mut names = Vec::new();
        if let Ok(entries) = std::fs::read_dir(dir) {
            for entry in entries.flatten() {
                let path = entry.path();
                if path.extension().is_some_and(|ext| ext == "toml") {
                    if let Some(stem) =
                        path.file_stem().and_then(|s| s.to_str())
                    {
                        names.push(stem.to_owned());
                    }
                }
            }
        }
        names.sort();
        names
    }
}
