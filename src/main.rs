//! Headless playback demo.
//!
//! Builds a synthetic trajectory, plays it through the controller and logs
//! each frame change as the render thread would see it.
//!
//! ```text
//! RUST_LOG=info molplay [FRAMES] [FPS] [once|loop|palindrome] [MORPH]
//! ```

use std::sync::Arc;
use std::time::{Duration, Instant};

use glam::Vec3;
use molplay::error::FrameSelectError;
use molplay::host::{FrameHost, MemoryModelSet};
use molplay::playback::{PlaybackController, ReplayMode};

/// Longest a looping demo runs before it is stopped.
const MAX_RUN: Duration = Duration::from_secs(10);

/// Host that logs what it is asked to show.
struct LoggingHost;

impl FrameHost for LoggingHost {
    fn select_frame(&self, model: Option<usize>) -> Result<(), FrameSelectError> {
        match model {
            Some(model) => log::debug!("select model {model}"),
            None => log::debug!("select all models in range"),
        }
        Ok(())
    }

    fn notify_frame_changed(&self) {
        log::info!("frame status changed");
    }

    fn is_headless(&self) -> bool {
        false
    }
}

/// A short helix whose pitch changes from model to model.
fn synthetic_trajectory(frames: usize) -> Vec<Vec<Vec3>> {
    (0..frames)
        .map(|model| {
            let pitch = 1.5 + model as f32 * 0.1;
            (0..20)
                .map(|atom| {
                    let angle = atom as f32 * 100f32.to_radians();
                    Vec3::new(2.3 * angle.cos(), 2.3 * angle.sin(), atom as f32 * pitch)
                })
                .collect()
        })
        .collect()
}

fn parse_arg<T: std::str::FromStr>(index: usize, default: T) -> T {
    match std::env::args().nth(index) {
        Some(arg) => arg.parse().unwrap_or_else(|_| {
            log::error!("Usage: molplay [FRAMES] [FPS] [once|loop|palindrome] [MORPH]");
            std::process::exit(1);
        }),
        None => default,
    }
}

fn parse_mode(index: usize) -> ReplayMode {
    let Some(arg) = std::env::args().nth(index) else {
        return ReplayMode::Once;
    };
    serde_json::from_value(serde_json::Value::String(arg)).unwrap_or_else(|e| {
        log::error!("bad replay mode: {e}");
        std::process::exit(1);
    })
}

fn main() {
    env_logger::init();

    let frames: usize = parse_arg(1, 12);
    let fps: u32 = parse_arg(2, 10);
    let mode = parse_mode(3);
    let morph: u32 = parse_arg(4, 0);

    let models = Arc::new(MemoryModelSet::new(synthetic_trajectory(frames)));
    let mut controller =
        PlaybackController::new(models.clone(), models.clone(), Arc::new(LoggingHost));
    let Some(mut reader) = controller.take_snapshot_reader() else {
        log::error!("snapshot reader already taken");
        std::process::exit(1);
    };

    controller.set_fps(fps);
    controller.set_mode(mode, 0.0, 0.0);
    controller.set_morph_count(morph);
    log::info!(
        "playing {} frames at {} fps ({mode:?}), about {:.1}s per pass",
        controller.frame_count(),
        controller.fps(),
        controller.estimated_runtime_seconds(),
    );
    controller.set_playing(true);

    let started = Instant::now();
    let mut last_frame = None;
    while controller.is_playing() && started.elapsed() < MAX_RUN {
        if reader.has_update() {
            let snapshot = reader.latest();
            if snapshot.current_frame != last_frame {
                last_frame = snapshot.current_frame;
                log::info!(
                    "frame {:?} (model {:?}, morph {:?}, {:?})",
                    snapshot.current_frame,
                    snapshot.current_model,
                    snapshot.morph_position,
                    snapshot.direction,
                );
                controller.repaint_done();
            }
        }
        std::thread::sleep(Duration::from_millis(5));
    }
    controller.set_playing(false);

    if let Some(morphed) = models.morphed() {
        log::info!(
            "last morph: {} -> {} at {:.2} ({} atoms)",
            morphed.from,
            morphed.to,
            morphed.fraction,
            morphed.positions.len(),
        );
    }
    log::info!("stopped: {:?}", reader.latest());
}
