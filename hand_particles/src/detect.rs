//! The detection loop.
//!
//! Runs on its own thread, independent of the render loop: poll the source
//! for a new frame, classify the skeleton, publish a fresh [`HandSnapshot`].
//! A frame whose stamp hasn't changed since the last poll is not analysed
//! twice.  A failed detection leaves the published snapshot untouched.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use particle_field::{
    classify, Gesture, GestureThresholds, HandPosition, HandSnapshot, SnapshotWriter,
    TrackingStatus,
};
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::error::SourceError;
use crate::source::LandmarkSource;

#[derive(Clone, Debug, PartialEq)]
pub struct DetectionSettings {
    pub thresholds:    GestureThresholds,
    /// Publish `1 - x` for the wrist, undoing a mirrored camera image.
    pub mirror_x:      bool,
    pub poll_interval: Duration,
}

impl DetectionSettings {
    pub fn from_config(cfg: &Config) -> Self {
        DetectionSettings {
            thresholds:    cfg.gesture.thresholds,
            mirror_x:      cfg.gesture.mirror_x,
            poll_interval: cfg.source.poll_interval(),
        }
    }
}

/// What one call to [`DetectionLoop::poll_once`] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PollOutcome {
    /// The source has no frame yet.
    NotReady,
    /// The newest frame was already analysed.
    Skipped,
    /// Detection raised an error; nothing was published.
    Failed,
    /// A snapshot with this gesture was published.
    Detected(Gesture),
}

pub struct DetectionLoop {
    source:     Box<dyn LandmarkSource>,
    writer:     SnapshotWriter<HandSnapshot>,
    settings:   DetectionSettings,
    last_frame: Option<Duration>,
}

impl DetectionLoop {
    pub fn new(
        source: Box<dyn LandmarkSource>,
        writer: SnapshotWriter<HandSnapshot>,
        settings: DetectionSettings,
    ) -> Self {
        DetectionLoop { source, writer, settings, last_frame: None }
    }

    /// Open the source and mark tracking live.  On error the snapshot stays
    /// in [`TrackingStatus::Loading`].
    pub fn start(&mut self) -> Result<(), SourceError> {
        self.source.open()?;
        self.writer.update(|s| s.tracking = TrackingStatus::Live);
        info!("landmark source live");
        Ok(())
    }

    pub fn poll_once(&mut self) -> PollOutcome {
        let Some(frame) = self.source.latest_frame() else {
            return PollOutcome::NotReady;
        };
        if self.last_frame == Some(frame) {
            return PollOutcome::Skipped;
        }
        // a frame that fails is not retried
        self.last_frame = Some(frame);

        let landmarks = match self.source.detect(frame) {
            Ok(landmarks) => landmarks,
            Err(e) => {
                warn!(error = %e, ?frame, "detection failed, keeping previous hand state");
                return PollOutcome::Failed;
            }
        };

        let gesture = classify(landmarks.as_ref(), &self.settings.thresholds);
        let hand = landmarks.as_ref().map(|set| {
            let wrist = set.wrist();
            let x = if self.settings.mirror_x { 1.0 - wrist.x } else { wrist.x };
            HandPosition { x, y: wrist.y }
        });

        let previous = self.writer.current().gesture;
        self.writer.update(|s| {
            s.gesture = gesture;
            if let Some(hand) = hand {
                s.hand = hand;
            }
            s.frame += 1;
        });
        if previous != gesture {
            debug!(from = %previous, to = %gesture, "gesture changed");
        }
        PollOutcome::Detected(gesture)
    }

    /// Open the source, then poll until `stop` is raised.
    pub fn run(mut self, stop: &AtomicBool) {
        if let Err(e) = self.start() {
            error!(error = %e, "could not open landmark source; staying in loading state");
            return;
        }
        while !stop.load(Ordering::Relaxed) {
            self.poll_once();
            thread::sleep(self.settings.poll_interval);
        }
        self.source.close();
        info!("detection stopped");
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Thread handle
// ════════════════════════════════════════════════════════════════════════════

/// Owns the detection thread.  Dropping the handle stops it.
pub struct DetectionHandle {
    stop:   Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl DetectionHandle {
    /// Signal the loop and wait for it to close its source.
    pub fn stop(mut self) {
        self.shutdown();
    }

    pub fn is_finished(&self) -> bool {
        self.thread.as_ref().map_or(true, |t| t.is_finished())
    }

    fn shutdown(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                error!("detection thread panicked");
            }
        }
    }
}

impl Drop for DetectionHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Spawn the detection loop.  `make_source` runs on the new thread, so the
/// source itself never crosses threads.
pub fn spawn_detection<F>(
    make_source: F,
    writer: SnapshotWriter<HandSnapshot>,
    settings: DetectionSettings,
) -> std::io::Result<DetectionHandle>
where
    F: FnOnce() -> Box<dyn LandmarkSource> + Send + 'static,
{
    let stop = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&stop);
    let thread = thread::Builder::new()
        .name("detection".into())
        .spawn(move || DetectionLoop::new(make_source(), writer, settings).run(&flag))?;
    Ok(DetectionHandle { stop, thread: Some(thread) })
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use particle_field::{snapshot_cell, LandmarkSet, SnapshotReader};
    use std::collections::VecDeque;
    use std::time::Instant;

    /// Replays a fixed script of frame stamps and detection results.
    #[derive(Default)]
    struct Scripted {
        open_error: Option<String>,
        frames:     VecDeque<Option<Duration>>,
        results:    VecDeque<Result<Option<LandmarkSet>, SourceError>>,
    }

    impl LandmarkSource for Scripted {
        fn open(&mut self) -> Result<(), SourceError> {
            match self.open_error.take() {
                Some(msg) => Err(SourceError::Unavailable(msg)),
                None => Ok(()),
            }
        }

        fn latest_frame(&mut self) -> Option<Duration> {
            self.frames.pop_front().flatten()
        }

        fn detect(&mut self, _frame: Duration) -> Result<Option<LandmarkSet>, SourceError> {
            self.results.pop_front().unwrap_or(Ok(None))
        }
    }

    fn ms(n: u64) -> Option<Duration> { Some(Duration::from_millis(n)) }

    fn settings(mirror_x: bool) -> DetectionSettings {
        DetectionSettings {
            thresholds:    GestureThresholds::default(),
            mirror_x,
            poll_interval: Duration::from_millis(1),
        }
    }

    fn started(source: Scripted, mirror_x: bool) -> (DetectionLoop, SnapshotReader<HandSnapshot>) {
        let (writer, reader) = snapshot_cell(HandSnapshot::default());
        let mut lp = DetectionLoop::new(Box::new(source), writer, settings(mirror_x));
        lp.start().unwrap();
        (lp, reader)
    }

    fn open_hand(x: f32, y: f32) -> Result<Option<LandmarkSet>, SourceError> {
        Ok(Some(LandmarkSet::synthetic(x, y, 0.5)))
    }

    fn fist(x: f32, y: f32) -> Result<Option<LandmarkSet>, SourceError> {
        Ok(Some(LandmarkSet::synthetic(x, y, 0.15)))
    }

    #[test]
    fn start_marks_tracking_live() {
        let (_lp, reader) = started(Scripted::default(), false);
        assert!(reader.load().is_live());
    }

    #[test]
    fn not_ready_before_first_frame() {
        let (mut lp, reader) = started(Scripted::default(), false);
        assert_eq!(lp.poll_once(), PollOutcome::NotReady);
        assert_eq!(reader.load().frame, 0);
    }

    #[test]
    fn unchanged_frame_is_skipped() {
        let src = Scripted {
            frames:  [ms(33), ms(33), ms(66)].into(),
            results: [open_hand(0.5, 0.5), fist(0.5, 0.5)].into(),
            ..Scripted::default()
        };
        let (mut lp, reader) = started(src, false);
        assert_eq!(lp.poll_once(), PollOutcome::Detected(Gesture::Open));
        assert_eq!(lp.poll_once(), PollOutcome::Skipped);
        // the skipped poll didn't consume the fist result
        assert_eq!(lp.poll_once(), PollOutcome::Detected(Gesture::Closed));
        assert_eq!(reader.load().frame, 2);
    }

    #[test]
    fn lost_hand_keeps_last_position() {
        let src = Scripted {
            frames:  [ms(1), ms(2)].into(),
            results: [open_hand(0.2, 0.3), Ok(None)].into(),
            ..Scripted::default()
        };
        let (mut lp, reader) = started(src, false);
        lp.poll_once();
        assert_eq!(reader.load().hand, HandPosition { x: 0.2, y: 0.3 });

        assert_eq!(lp.poll_once(), PollOutcome::Detected(Gesture::None));
        let snap = reader.load();
        assert_eq!(snap.gesture, Gesture::None);
        assert_eq!(snap.hand, HandPosition { x: 0.2, y: 0.3 });
    }

    #[test]
    fn failure_keeps_previous_snapshot() {
        let src = Scripted {
            frames:  [ms(1), ms(2), ms(2)].into(),
            results: [fist(0.4, 0.6), Err(SourceError::Detection("boom".into()))].into(),
            ..Scripted::default()
        };
        let (mut lp, reader) = started(src, false);
        lp.poll_once();
        let before = reader.load();

        assert_eq!(lp.poll_once(), PollOutcome::Failed);
        assert_eq!(reader.load(), before);
        // the failed frame is not retried
        assert_eq!(lp.poll_once(), PollOutcome::Skipped);
    }

    #[test]
    fn mirror_flips_wrist_x() {
        let src = Scripted {
            frames:  [ms(1)].into(),
            results: [open_hand(0.2, 0.7)].into(),
            ..Scripted::default()
        };
        let (mut lp, reader) = started(src, true);
        lp.poll_once();
        let hand = reader.load().hand;
        assert!((hand.x - 0.8).abs() < 1e-6);
        assert_eq!(hand.y, 0.7);
    }

    #[test]
    fn open_failure_stays_loading() {
        let (writer, reader) = snapshot_cell(HandSnapshot::default());
        let handle = spawn_detection(
            || Box::new(Scripted { open_error: Some("denied".into()), ..Scripted::default() }),
            writer,
            settings(false),
        ).unwrap();

        let deadline = Instant::now() + Duration::from_secs(5);
        while !handle.is_finished() && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(1));
        }
        assert!(handle.is_finished());
        assert_eq!(reader.load().tracking, TrackingStatus::Loading);
        handle.stop();
    }

    /// A fresh frame on every poll, always an open hand.
    struct Streaming {
        n:      u64,
        closed: Arc<AtomicBool>,
    }

    impl LandmarkSource for Streaming {
        fn open(&mut self) -> Result<(), SourceError> { Ok(()) }

        fn latest_frame(&mut self) -> Option<Duration> {
            self.n += 1;
            Some(Duration::from_millis(self.n))
        }

        fn detect(&mut self, _frame: Duration) -> Result<Option<LandmarkSet>, SourceError> {
            open_hand(0.5, 0.5)
        }

        fn close(&mut self) {
            self.closed.store(true, Ordering::SeqCst);
        }
    }

    #[test]
    fn spawned_loop_publishes_and_stops() {
        let closed = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&closed);
        let (writer, reader) = snapshot_cell(HandSnapshot::default());
        let handle = spawn_detection(
            move || Box::new(Streaming { n: 0, closed: flag }),
            writer,
            settings(false),
        ).unwrap();

        let deadline = Instant::now() + Duration::from_secs(5);
        while reader.load().frame < 3 && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(1));
        }
        let snap = reader.load();
        assert!(snap.is_live());
        assert_eq!(snap.gesture, Gesture::Open);

        handle.stop();
        assert!(closed.load(Ordering::SeqCst));
    }
}
