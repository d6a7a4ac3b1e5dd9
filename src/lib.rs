// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Complexity limits (thresholds in clippy.toml)
#![deny(clippy::cognitive_complexity)]
#![deny(clippy::too_many_lines)]
#![deny(clippy::excessive_nesting)]
// Function signature hygiene
#![deny(clippy::too_many_arguments)]
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]

//! Frame playback for molecular model sets.
//!
//! molplay decides which model of a multi-model structure (a trajectory, an
//! NMR ensemble, a user-assembled movie) is shown at any moment, and drives
//! timed playback over a range of frames with stop/loop/palindrome replay,
//! optional morph interpolation between models, and per-frame holds.
//!
//! # Key entry points
//!
//! - [`playback::PlaybackController`] - the controller and its command
//!   surface
//! - [`host`] - the traits a viewer implements to feed and follow playback
//! - [`options::Options`] - persisted playback settings (TOML presets)
//! - [`playback::PlaybackCommand`] - the serializable command vocabulary
//!
//! # Architecture
//!
//! Commands mutate the controller synchronously on the caller's thread.
//! While playing, one background ticker thread holds each frame for its
//! resolved delay and then steps. Every start, stop and pause bumps a
//! generation counter; a ticker whose generation is stale never touches
//! state again. Each state change publishes a [`playback::PlaybackSnapshot`]
//! through a lock-free triple buffer so a render thread can follow playback
//! without taking the controller lock.

pub mod error;
pub mod host;
pub mod options;
pub mod playback;
pub mod util;
