//! Collaborator interfaces consumed by the playback controller.
//!
//! The controller never owns model data or rendering. It queries a
//! [`FrameSource`] for counts and per-frame metadata, asks an
//! [`Interpolator`] for in-between structures while morphing, and tells the
//! [`FrameHost`] which model to show.
//!
//! All three are called from both the command thread and the ticker thread,
//! always with the controller's state lock held, so implementations must be
//! `Send + Sync` and must not call back into the controller.

mod memory;

pub use memory::{MemoryModelSet, MorphedModel};

use crate::error::FrameSelectError;

/// Read-only view of the loaded model set.
pub trait FrameSource: Send + Sync {
    /// Number of models available for playback.
    fn frame_count(&self) -> usize;

    /// Whether `model` is a derived data frame (plot, quaternion frame)
    /// rather than a primary structure.
    fn is_auxiliary_frame(&self, model: usize) -> bool;

    /// Extra per-model hold in milliseconds.
    fn frame_delay_ms(&self, model: usize) -> u32;
}

/// Produces interpolated structures between two models.
pub trait Interpolator: Send + Sync {
    /// Build the structure `fraction` of the way from `model_a` to
    /// `model_b`. Fire-and-forget.
    fn interpolate(&self, model_a: usize, model_b: usize, fraction: f32);
}

/// The renderer / viewer side.
pub trait FrameHost: Send + Sync {
    /// Show `model`, or every visible model in the range when `None`.
    ///
    /// # Errors
    ///
    /// Returns a [`FrameSelectError`] if the host cannot apply the
    /// selection. The controller logs it and keeps going.
    fn select_frame(&self, model: Option<usize>) -> Result<(), FrameSelectError>;

    /// Playback stopped or the frame status otherwise changed.
    fn notify_frame_changed(&self);

    /// Whether there is no surface to animate on.
    fn is_headless(&self) -> bool;
}
