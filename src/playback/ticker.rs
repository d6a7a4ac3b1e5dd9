//! Background cadence loop that advances playback.
//!
//! One ticker thread per playback session. The thread holds the current
//! frame for its resolved delay, then steps, until the replay mode runs
//! out, it is cancelled, or a newer generation supersedes it. Cancellation
//! wakes an in-progress hold immediately and joins the thread.

use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread::JoinHandle;

use super::core::{Shared, Tick};
use crate::error::PlaybackError;
use crate::util::frame_timing::FrameTiming;

/// Handle to a running ticker thread.
pub(crate) struct Ticker {
    generation: u64,
    cancel_tx: mpsc::Sender<()>,
    thread: Option<JoinHandle<()>>,
}

impl Ticker {
    /// Spawn a ticker bound to `generation`.
    ///
    /// # Errors
    ///
    /// Returns [`PlaybackError::ThreadSpawn`] if the thread fails to spawn.
    pub(crate) fn spawn(
        shared: Arc<Shared>,
        generation: u64,
        nominal_fps: u32,
    ) -> Result<Self, PlaybackError> {
        let (cancel_tx, cancel_rx) = mpsc::channel::<()>();
        let thread = std::thread::Builder::new()
            .name(format!("playback-ticker-{generation}"))
            .spawn(move || {
                run(&shared, generation, nominal_fps, &cancel_rx);
            })
            .map_err(PlaybackError::ThreadSpawn)?;
        Ok(Self {
            generation,
            cancel_tx,
            thread: Some(thread),
        })
    }

    /// Whether the thread has already exited on its own.
    pub(crate) fn is_finished(&self) -> bool {
        self.thread.as_ref().is_none_or(JoinHandle::is_finished)
    }

    /// Wake the thread and wait for it to exit. Idempotent.
    pub(crate) fn cancel(&mut self) {
        let Some(handle) = self.thread.take() else {
            return;
        };
        // The thread may already be gone; a closed channel is fine.
        let _ = self.cancel_tx.send(());
        if handle.join().is_err() {
            log::error!("playback ticker {} panicked", self.generation);
        }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Ticker thread main loop.
fn run(
    shared: &Shared,
    generation: u64,
    nominal_fps: u32,
    cancel_rx: &mpsc::Receiver<()>,
) {
    log::debug!("playback ticker {generation} running");
    let mut timing = FrameTiming::new(nominal_fps);
    let outcome = loop {
        let Some(hold) = shared.hold_for(generation) else {
            break Tick::Superseded;
        };
        match cancel_rx.recv_timeout(timing.schedule(hold)) {
            Err(RecvTimeoutError::Timeout) => {}
            Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                break Tick::Superseded;
            }
        }
        match shared.advance(generation) {
            Tick::Advanced => timing.end_frame(),
            done => break done,
        }
    };
    log::debug!(
        "playback ticker {generation} exiting ({outcome:?}) after {} frames at {:.1} fps",
        timing.frames(),
        timing.fps(),
    );
}
