//! Crate-level error types.

use std::fmt;

/// Errors produced by the molplay crate.
///
/// Only setup paths return these. Playback commands never fail; they clamp
/// or degrade to the stopped state instead.
#[derive(Debug)]
pub enum PlaybackError {
    /// Generic I/O failure.
    Io(std::io::Error),
    /// Failed to spawn the background ticker thread.
    ThreadSpawn(std::io::Error),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
}

impl fmt::Display for PlaybackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::ThreadSpawn(e) => {
                write!(f, "failed to spawn ticker thread: {e}")
            }
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
        }
    }
}

impl std::error::Error for PlaybackError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) | Self::ThreadSpawn(e) => Some(e),
            Self::OptionsParse(_) => None,
        }
    }
}

impl From<std::io::Error> for PlaybackError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

/// Failure reported by the host while applying a frame selection.
///
/// The controller logs these and keeps playing; the frame pointer still
/// advances.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameSelectError {
    /// The model exists in the sequence but is not (yet) available to the
    /// host, e.g. still loading or deleted.
    ModelUnavailable(usize),
    /// Any other host-side fault.
    Host(String),
}

impl fmt::Display for FrameSelectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ModelUnavailable(model) => {
                write!(f, "model {model} is unavailable")
            }
            Self::Host(msg) => write!(f, "host frame selection failed: {msg}"),
        }
    }
}

impl std::error::Error for FrameSelectError {}
