//! Landmark sources: anything that can report a 21-point hand skeleton for
//! its latest frame.
//!
//! The detection loop doesn't care whether the skeleton came from real
//! hardware or from the keyboard simulator; it only sees [`LandmarkSource`].
//! Sources are built on the detection thread (see
//! [`crate::detect::spawn_detection`]), so they need not be `Send`.

use std::sync::mpsc::{Receiver, TryRecvError};
use std::time::{Duration, Instant};

use particle_field::LandmarkSet;
use tracing::debug;

use crate::config::{SourceConfig, SourceKind};
use crate::error::SourceError;

// ════════════════════════════════════════════════════════════════════════════
// LandmarkSource trait
// ════════════════════════════════════════════════════════════════════════════

pub trait LandmarkSource {
    /// Acquire the device or model.  Called once before any other method.
    fn open(&mut self) -> Result<(), SourceError>;

    /// Presentation time of the newest frame, or `None` before the first
    /// frame arrives.  Repeated calls return the same value until a new
    /// frame is available.
    fn latest_frame(&mut self) -> Option<Duration>;

    /// Landmarks for the frame stamped `frame`, or `None` when no hand is
    /// visible in it.
    fn detect(&mut self, frame: Duration) -> Result<Option<LandmarkSet>, SourceError>;

    /// Release the device.  Called once when detection stops.
    fn close(&mut self) {}
}

/// Build the source named by `cfg.kind`.
///
/// `sim_rx` feeds the simulator and is dropped for any other kind.  A kind
/// this binary wasn't built with yields a source that fails to open, which
/// leaves the app in its loading state.
pub fn build_source(
    cfg: &SourceConfig,
    mirror_x: bool,
    sim_rx: Receiver<SimInput>,
) -> Box<dyn LandmarkSource> {
    match cfg.kind {
        SourceKind::Sim => Box::new(SimLandmarkSource::new(sim_rx, cfg.camera_fps, mirror_x)),
        #[cfg(feature = "leap")]
        SourceKind::Leap => Box::new(LeapLandmarkSource::new()),
        #[cfg(not(feature = "leap"))]
        SourceKind::Leap => Box::new(UnavailableSource(
            "built without the `leap` feature".to_string(),
        )),
    }
}

/// A source whose `open` always fails.
pub struct UnavailableSource(pub String);

impl LandmarkSource for UnavailableSource {
    fn open(&mut self) -> Result<(), SourceError> {
        Err(SourceError::Unavailable(self.0.clone()))
    }

    fn latest_frame(&mut self) -> Option<Duration> { None }

    fn detect(&mut self, _frame: Duration) -> Result<Option<LandmarkSet>, SourceError> {
        Ok(None)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// SimLandmarkSource — keyboard/mouse simulation (always available)
// ════════════════════════════════════════════════════════════════════════════

/// Raw input from the window, forwarded by the visualizer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SimInput {
    /// Pointer moved; window-normalized coordinates in `[0, 1]`.
    Pointer { x: f32, y: f32 },
    /// Space: the hand enters or leaves the frame.
    ToggleHand,
    /// Z / X / V: snap the fingers to a pose.
    Pose(SimPose),
    /// Scroll wheel: open or close the fingers gradually.
    AdjustReach(f32),
    /// E: make the next detection call fail.
    Glitch,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimPose {
    Fist,
    Relaxed,
    Palm,
}

impl SimPose {
    /// Wrist-to-fingertip distance for this pose.
    pub fn reach(self) -> f32 {
        match self {
            SimPose::Fist    => 0.18,
            SimPose::Relaxed => 0.35,
            SimPose::Palm    => 0.50,
        }
    }
}

const MIN_REACH: f32 = 0.05;
const MAX_REACH: f32 = 0.65;

/// Stamp of the camera frame showing at `elapsed`, for a camera running at
/// `fps`.  Constant within a frame interval.
pub fn frame_stamp(elapsed: Duration, fps: u32) -> Duration {
    let fps = fps.max(1);
    let index = (elapsed.as_secs_f64() * fps as f64).floor();
    Duration::from_secs_f64(index / fps as f64)
}

/// A synthetic camera whose subject is driven by [`SimInput`] events.
///
/// The hand starts out of frame.  While in frame its wrist follows the
/// pointer and its fingers spread to the current reach.
pub struct SimLandmarkSource {
    rx:       Receiver<SimInput>,
    fps:      u32,
    /// Report x flipped, as a front-facing camera would.
    mirrored: bool,
    started:  Instant,
    visible:  bool,
    wrist:    (f32, f32),
    reach:    f32,
    glitch:   bool,
}

impl SimLandmarkSource {
    pub fn new(rx: Receiver<SimInput>, fps: u32, mirrored: bool) -> Self {
        SimLandmarkSource {
            rx,
            fps,
            mirrored,
            started: Instant::now(),
            visible: false,
            wrist:   (0.5, 0.5),
            reach:   SimPose::Relaxed.reach(),
            glitch:  false,
        }
    }

    fn apply(&mut self, input: SimInput) {
        match input {
            SimInput::Pointer { x, y } => {
                let x = x.clamp(0.0, 1.0);
                let x = if self.mirrored { 1.0 - x } else { x };
                self.wrist = (x, y.clamp(0.0, 1.0));
            }
            SimInput::ToggleHand => {
                self.visible = !self.visible;
                debug!(visible = self.visible, "sim hand toggled");
            }
            SimInput::Pose(pose)      => self.reach = pose.reach(),
            SimInput::AdjustReach(d)  => self.reach = (self.reach + d).clamp(MIN_REACH, MAX_REACH),
            SimInput::Glitch          => self.glitch = true,
        }
    }

    /// Apply every queued input.  A closed window just freezes the hand.
    fn drain(&mut self) {
        loop {
            match self.rx.try_recv() {
                Ok(input) => self.apply(input),
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
            }
        }
    }
}

impl LandmarkSource for SimLandmarkSource {
    fn open(&mut self) -> Result<(), SourceError> {
        self.started = Instant::now();
        Ok(())
    }

    fn latest_frame(&mut self) -> Option<Duration> {
        Some(frame_stamp(self.started.elapsed(), self.fps))
    }

    fn detect(&mut self, _frame: Duration) -> Result<Option<LandmarkSet>, SourceError> {
        self.drain();
        if std::mem::take(&mut self.glitch) {
            return Err(SourceError::Detection("simulated glitch".to_string()));
        }
        if !self.visible {
            return Ok(None);
        }
        let (x, y) = self.wrist;
        Ok(Some(LandmarkSet::synthetic(x, y, self.reach)))
    }
}

// ════════════════════════════════════════════════════════════════════════════
// LeapLandmarkSource — real hardware (feature = "leap")
// ════════════════════════════════════════════════════════════════════════════

/// Landmarks from a LeapMotion controller.
///
/// Requires the `leap` feature flag and the LeapC shared library installed.
///
/// Joint positions (millimetres above the device) are projected onto a
/// virtual front-facing camera and reported mirrored, like a webcam image,
/// so `mirror_x` applies the same way as for any other source.
#[cfg(feature = "leap")]
pub struct LeapLandmarkSource {
    connection: Option<leaprs::Connection>,
    started:    Instant,
    latest:     Option<(Duration, Option<LandmarkSet>)>,
}

#[cfg(feature = "leap")]
impl LeapLandmarkSource {
    // Interaction box mapped onto the virtual image
    const HALF_WIDTH_MM: f32 = 200.0;
    const FLOOR_MM:      f32 = 80.0;
    const HEIGHT_MM:     f32 = 320.0;

    pub fn new() -> Self {
        LeapLandmarkSource { connection: None, started: Instant::now(), latest: None }
    }

    /// Depth is relative to the wrist, positive away from the virtual camera.
    fn project(x: f32, y: f32, z: f32, wrist_z: f32) -> particle_field::Landmark {
        particle_field::Landmark::with_depth(
            0.5 - x / (2.0 * Self::HALF_WIDTH_MM),
            1.0 - (y - Self::FLOOR_MM) / Self::HEIGHT_MM,
            (z - wrist_z) / (2.0 * Self::HALF_WIDTH_MM),
        )
    }

    fn landmarks(hand: &leaprs::Hand) -> Option<LandmarkSet> {
        let digits: Vec<_> = hand.digits().collect();
        if digits.len() < 5 { return None; }

        let base = digits[2].metacarpal().prev_joint();
        let wrist = Self::project(base.x, base.y, base.z, base.z);
        let mut points = [wrist; particle_field::LANDMARK_COUNT];
        for (finger, digit) in digits.iter().take(5).enumerate() {
            let joints = [
                digit.metacarpal().next_joint(),
                digit.proximal().next_joint(),
                digit.intermediate().next_joint(),
                digit.distal().next_joint(),
            ];
            for (j, joint) in joints.iter().enumerate() {
                points[1 + finger * 4 + j] = Self::project(joint.x, joint.y, joint.z, base.z);
            }
        }
        Some(LandmarkSet::new(points))
    }
}

#[cfg(feature = "leap")]
impl LandmarkSource for LeapLandmarkSource {
    fn open(&mut self) -> Result<(), SourceError> {
        use leaprs::*;

        let mut connection = Connection::create(ConnectionConfig::default())
            .map_err(|e| SourceError::Unavailable(format!("LeapC connection: {e:?}")))?;
        connection.open()
            .map_err(|e| SourceError::Unavailable(format!("LeapMotion device: {e:?}")))?;
        self.connection = Some(connection);
        self.started = Instant::now();
        Ok(())
    }

    fn latest_frame(&mut self) -> Option<Duration> {
        use leaprs::*;

        if let Some(connection) = self.connection.as_mut() {
            if let Ok(msg) = connection.poll(10) {
                if let Event::Tracking(frame) = msg.event() {
                    let hand = frame.hands().next();
                    let set = hand.as_ref().and_then(Self::landmarks);
                    self.latest = Some((self.started.elapsed(), set));
                }
            }
        }
        self.latest.as_ref().map(|(stamp, _)| *stamp)
    }

    fn detect(&mut self, frame: Duration) -> Result<Option<LandmarkSet>, SourceError> {
        match &self.latest {
            Some((stamp, set)) if *stamp == frame => Ok(set.clone()),
            _ => Err(SourceError::Detection(format!("frame {frame:?} no longer buffered"))),
        }
    }

    fn close(&mut self) {
        self.connection = None;
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
