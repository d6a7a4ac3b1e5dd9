//! In-memory model set: coordinates per model plus playback metadata.

use std::sync::{Mutex, PoisonError};

use glam::Vec3;
use rustc_hash::{FxHashMap, FxHashSet};

use super::{FrameSource, Interpolator};

/// The most recent interpolated structure.
#[derive(Debug, Clone, PartialEq)]
pub struct MorphedModel {
    /// Model interpolated from.
    pub from: usize,
    /// Model interpolated toward.
    pub to: usize,
    /// Fraction of the way from `from` to `to`.
    pub fraction: f32,
    /// Interpolated atom positions.
    pub positions: Vec<Vec3>,
}

/// Model coordinates held in memory, e.g. the frames of a loaded
/// trajectory.
#[derive(Debug, Default)]
pub struct MemoryModelSet {
    models: Vec<Vec<Vec3>>,
    auxiliary: FxHashSet<usize>,
    frame_delays: FxHashMap<usize, u32>,
    morphed: Mutex<Option<MorphedModel>>,
}

impl MemoryModelSet {
    /// Model set over per-model atom positions.
    #[must_use]
    pub fn new(models: Vec<Vec<Vec3>>) -> Self {
        Self {
            models,
            ..Self::default()
        }
    }

    /// Flag `model` as an auxiliary data frame.
    #[must_use]
    pub fn with_auxiliary(mut self, model: usize) -> Self {
        let _ = self.auxiliary.insert(model);
        self
    }

    /// Give `model` an extra hold in milliseconds.
    #[must_use]
    pub fn with_frame_delay(mut self, model: usize, delay_ms: u32) -> Self {
        let _ = self.frame_delays.insert(model, delay_ms);
        self
    }

    /// Atom positions of `model`.
    #[must_use]
    pub fn positions(&self, model: usize) -> Option<&[Vec3]> {
        self.models.get(model).map(Vec::as_slice)
    }

    /// The last interpolated structure, if any.
    pub fn morphed(&self) -> Option<MorphedModel> {
        self.morphed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl FrameSource for MemoryModelSet {
    fn frame_count(&self) -> usize {
        self.models.len()
    }

    fn is_auxiliary_frame(&self, model: usize) -> bool {
        self.auxiliary.contains(&model)
    }

    fn frame_delay_ms(&self, model: usize) -> u32 {
        self.frame_delays.get(&model).copied().unwrap_or(0)
    }
}

impl Interpolator for MemoryModelSet {
    fn interpolate(&self, model_a: usize, model_b: usize, fraction: f32) {
        let (Some(a), Some(b)) = (self.models.get(model_a), self.models.get(model_b))
        else {
            log::warn!("cannot morph {model_a} -> {model_b}: model missing");
            return;
        };
        if a.len() != b.len() {
            log::warn!(
                "cannot morph {model_a} -> {model_b}: atom counts differ ({} vs {})",
                a.len(),
                b.len()
            );
            return;
        }
        let positions = a
            .iter()
            .zip(b)
            .map(|(start, end)| start.lerp(*end, fraction))
            .collect();
        *self.morphed.lock().unwrap_or_else(PoisonError::into_inner) =
            Some(MorphedModel {
                from: model_a,
                to: model_b,
                fraction,
                positions,
            });
    }
}
