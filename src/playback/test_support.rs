//! Recording collaborators for playback tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use rustc_hash::{FxHashMap, FxHashSet};

use super::core::{PlaybackCore, Shared};
use super::snapshot::{snapshot_channel, SnapshotReader};
use super::state::PlaybackStatus;
use super::PlaybackController;
use crate::error::FrameSelectError;
use crate::host::{FrameHost, FrameSource, Interpolator};

/// Frame source whose count and metadata tests can change on the fly.
#[derive(Default)]
pub(crate) struct FakeSource {
    count: AtomicUsize,
    auxiliary: Mutex<FxHashSet<usize>>,
    delays: Mutex<FxHashMap<usize, u32>>,
}

impl FakeSource {
    pub(crate) fn new(count: usize) -> Self {
        Self {
            count: AtomicUsize::new(count),
            ..Self::default()
        }
    }

    pub(crate) fn set_count(&self, count: usize) {
        self.count.store(count, Ordering::SeqCst);
    }

    pub(crate) fn mark_auxiliary(&self, model: usize) {
        let _ = self.auxiliary.lock().unwrap().insert(model);
    }

    pub(crate) fn set_delay(&self, model: usize, delay_ms: u32) {
        let _ = self.delays.lock().unwrap().insert(model, delay_ms);
    }
}

impl FrameSource for FakeSource {
    fn frame_count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    fn is_auxiliary_frame(&self, model: usize) -> bool {
        self.auxiliary.lock().unwrap().contains(&model)
    }

    fn frame_delay_ms(&self, model: usize) -> u32 {
        self.delays.lock().unwrap().get(&model).copied().unwrap_or(0)
    }
}

/// Host that records every selection together with the calling thread.
#[derive(Default)]
pub(crate) struct RecordingHost {
    selections: Mutex<Vec<(Option<String>, Option<usize>)>>,
    notifications: AtomicUsize,
    fail: AtomicBool,
    headless: AtomicBool,
}

impl RecordingHost {
    pub(crate) fn selections(&self) -> Vec<Option<usize>> {
        self.selections
            .lock()
            .unwrap()
            .iter()
            .map(|(_, model)| *model)
            .collect()
    }

    /// Names of the threads that made each selection, in order.
    pub(crate) fn selecting_threads(&self) -> Vec<Option<String>> {
        self.selections
            .lock()
            .unwrap()
            .iter()
            .map(|(thread, _)| thread.clone())
            .collect()
    }

    pub(crate) fn notifications(&self) -> usize {
        self.notifications.load(Ordering::SeqCst)
    }

    pub(crate) fn fail_selections(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub(crate) fn set_headless(&self, headless: bool) {
        self.headless.store(headless, Ordering::SeqCst);
    }
}

impl FrameHost for RecordingHost {
    fn select_frame(&self, model: Option<usize>) -> Result<(), FrameSelectError> {
        let thread = std::thread::current().name().map(str::to_owned);
        self.selections.lock().unwrap().push((thread, model));
        if self.fail.load(Ordering::SeqCst) {
            return Err(FrameSelectError::Host("scripted failure".to_owned()));
        }
        Ok(())
    }

    fn notify_frame_changed(&self) {
        let _ = self.notifications.fetch_add(1, Ordering::SeqCst);
    }

    fn is_headless(&self) -> bool {
        self.headless.load(Ordering::SeqCst)
    }
}

/// Interpolator that records its calls.
#[derive(Default)]
pub(crate) struct RecordingInterpolator {
    calls: Mutex<Vec<(usize, usize, f32)>>,
}

impl RecordingInterpolator {
    pub(crate) fn calls(&self) -> Vec<(usize, usize, f32)> {
        self.calls.lock().unwrap().clone()
    }
}

impl Interpolator for RecordingInterpolator {
    fn interpolate(&self, model_a: usize, model_b: usize, fraction: f32) {
        self.calls.lock().unwrap().push((model_a, model_b, fraction));
    }
}

/// A playback core over `n` fake models, without a controller.
pub(crate) struct Fixture {
    pub(crate) shared: Arc<Shared>,
    pub(crate) source: Arc<FakeSource>,
    pub(crate) host: Arc<RecordingHost>,
    pub(crate) interpolator: Arc<RecordingInterpolator>,
    pub(crate) reader: SnapshotReader,
}

impl Fixture {
    pub(crate) fn new(frames: usize) -> Self {
        let source = Arc::new(FakeSource::new(frames));
        let host = Arc::new(RecordingHost::default());
        let interpolator = Arc::new(RecordingInterpolator::default());
        let (writer, reader) = snapshot_channel();
        let core = PlaybackCore::new(
            source.clone(),
            interpolator.clone(),
            host.clone(),
            writer,
        );
        Self {
            shared: Arc::new(Shared::new(core)),
            source,
            host,
            interpolator,
            reader,
        }
    }

    pub(crate) fn update<R>(&self, f: impl FnOnce(&mut PlaybackCore) -> R) -> R {
        self.shared.update(f)
    }

    pub(crate) fn read<R>(&self, f: impl FnOnce(&PlaybackCore) -> R) -> R {
        self.shared.read(f)
    }

    /// Bump the generation and mark the core as playing, as the controller
    /// does before spawning a ticker.
    pub(crate) fn start_session(&self, f: impl FnOnce(&mut PlaybackCore)) -> u64 {
        let (generation, ()) = self.shared.bump_generation(|core| {
            f(core);
            core.state.status = PlaybackStatus::Playing;
        });
        generation
    }

    /// Poll `pred` until it holds or `timeout` elapses.
    pub(crate) fn wait_until(
        &self,
        timeout: Duration,
        pred: impl Fn(&PlaybackCore) -> bool,
    ) -> bool {
        wait_for(timeout, || self.read(&pred))
    }
}

/// A controller over `n` fake models plus handles to its collaborators.
pub(crate) struct ControllerFixture {
    pub(crate) controller: PlaybackController,
    pub(crate) source: Arc<FakeSource>,
    pub(crate) host: Arc<RecordingHost>,
    pub(crate) interpolator: Arc<RecordingInterpolator>,
}

impl ControllerFixture {
    pub(crate) fn new(frames: usize) -> Self {
        let source = Arc::new(FakeSource::new(frames));
        let host = Arc::new(RecordingHost::default());
        let interpolator = Arc::new(RecordingInterpolator::default());
        let controller = PlaybackController::new(
            source.clone(),
            interpolator.clone(),
            host.clone(),
        );
        Self {
            controller,
            source,
            host,
            interpolator,
        }
    }

    /// Poll the controller until `pred` holds or `timeout` elapses.
    pub(crate) fn wait_until(
        &self,
        timeout: Duration,
        pred: impl Fn(&PlaybackController) -> bool,
    ) -> bool {
        wait_for(timeout, || pred(&self.controller))
    }
}

fn wait_for(timeout: Duration, mut done: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    loop {
        if done() {
            return true;
        }
        if Instant::now() >= deadline {
            return false;
        }
        std::thread::sleep(Duration::from_millis(1));
    }
}
