//! Shared utilities for the playback engine.

pub mod frame_timing;
