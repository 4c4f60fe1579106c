//! The particle integrator.
//!
//! [`ParticleField`] owns the particle and target buffers and the cloud's
//! rotation.  Once per rendered frame [`ParticleField::step`] pulls every
//! particle a fraction of the way toward its (gesture-scaled) target and
//! eases the rotation toward the hand, or spins it slowly when nobody is
//! there.  Convergence is asymptotic; targets usually change long before it
//! matters.

use std::f32::consts::{FRAC_PI_2, TAU};

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::FieldError;
use crate::geometry::Point3;
use crate::gesture::Gesture;
use crate::pattern::{self, Pattern};
use crate::snapshot::HandSnapshot;

// ════════════════════════════════════════════════════════════════════════════
// Dynamics — tuning constants
// ════════════════════════════════════════════════════════════════════════════

/// How a gesture shapes the cloud: targets are scaled by `expansion` and
/// particles close `smoothing` of the gap each frame.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub expansion: f32,
    pub smoothing: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Dynamics {
    /// Fist: implode toward the centre.
    pub closed:          Response,
    /// Open palm: burst outward.
    pub open:            Response,
    /// Neutral hand or no hand.
    pub idle:            Response,
    /// Per-frame easing of yaw/pitch toward the hand-driven targets.
    pub rotation_follow: f32,
    /// Yaw added per frame when no hand is visible (radians).
    pub auto_spin:       f32,
    /// Per-frame easing of pitch back to level when no hand is visible.
    pub pitch_relax:     f32,
}

impl Default for Dynamics {
    fn default() -> Self {
        Dynamics {
            closed:          Response { expansion: 0.1, smoothing: 0.1  },
            open:            Response { expansion: 1.5, smoothing: 0.08 },
            idle:            Response { expansion: 1.0, smoothing: 0.05 },
            rotation_follow: 0.1,
            auto_spin:       0.002,
            pitch_relax:     0.05,
        }
    }
}

impl Dynamics {
    pub fn response(&self, gesture: Gesture) -> Response {
        match gesture {
            Gesture::Closed                  => self.closed,
            Gesture::Open                    => self.open,
            Gesture::Neutral | Gesture::None => self.idle,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Rotation
// ════════════════════════════════════════════════════════════════════════════

/// Whole-cloud orientation in radians.  Yaw is not wrapped, so a long
/// autopilot spin keeps accumulating.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rotation {
    pub yaw:   f32,
    pub pitch: f32,
}

impl Rotation {
    fn step(&mut self, snapshot: &HandSnapshot, dynamics: &Dynamics) {
        if snapshot.gesture.is_active() {
            let target_yaw   = (snapshot.hand.x - 0.5) * TAU;
            let target_pitch = (snapshot.hand.y - 0.5) * FRAC_PI_2;
            self.yaw   += (target_yaw   - self.yaw)   * dynamics.rotation_follow;
            self.pitch += (target_pitch - self.pitch) * dynamics.rotation_follow;
        } else {
            self.yaw   += dynamics.auto_spin;
            self.pitch += (0.0 - self.pitch) * dynamics.pitch_relax;
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// ParticleField
// ════════════════════════════════════════════════════════════════════════════

/// Half-width of the cube the particles start scattered in.
const INITIAL_SCATTER: f32 = 50.0;

/// Particle and target buffers of equal, fixed length plus the rotation.
#[derive(Clone, Debug)]
pub struct ParticleField {
    positions: Vec<Point3>,
    targets:   Vec<Point3>,
    pattern:   Pattern,
    rotation:  Rotation,
    dynamics:  Dynamics,
}

impl ParticleField {
    /// `count` particles scattered through a 100-unit cube, heading for
    /// `pattern`.
    pub fn new<R: Rng + ?Sized>(
        count:    usize,
        pattern:  Pattern,
        dynamics: Dynamics,
        rng:      &mut R,
    ) -> Result<Self, FieldError> {
        if count == 0 {
            return Err(FieldError::EmptyField);
        }
        let positions = (0..count)
            .map(|_| Point3::new(
                rng.gen_range(-INITIAL_SCATTER..INITIAL_SCATTER),
                rng.gen_range(-INITIAL_SCATTER..INITIAL_SCATTER),
                rng.gen_range(-INITIAL_SCATTER..INITIAL_SCATTER),
            ))
            .collect();
        let targets = pattern::generate(pattern, count, rng);
        Ok(ParticleField {
            positions,
            targets,
            pattern,
            rotation: Rotation::default(),
            dynamics,
        })
    }

    /// Build a field from explicit buffers.  Lengths must match.
    pub fn from_parts(
        positions: Vec<Point3>,
        targets:   Vec<Point3>,
        pattern:   Pattern,
        dynamics:  Dynamics,
    ) -> Result<Self, FieldError> {
        if positions.is_empty() {
            return Err(FieldError::EmptyField);
        }
        if positions.len() != targets.len() {
            return Err(FieldError::BufferLength {
                particles: positions.len(),
                targets:   targets.len(),
            });
        }
        Ok(ParticleField { positions, targets, pattern, rotation: Rotation::default(), dynamics })
    }

    /// Switch to `pattern`, replacing the whole target buffer.
    pub fn set_pattern<R: Rng + ?Sized>(&mut self, pattern: Pattern, rng: &mut R) {
        self.targets = pattern::generate(pattern, self.positions.len(), rng);
        self.pattern = pattern;
        debug!(pattern = %pattern, particles = self.positions.len(), "targets regenerated");
    }

    /// Advance one render frame.
    pub fn step(&mut self, snapshot: &HandSnapshot) {
        let Response { expansion, smoothing } = self.dynamics.response(snapshot.gesture);
        for (p, &t) in self.positions.iter_mut().zip(&self.targets) {
            p.approach(t.scaled(expansion), smoothing);
        }
        self.rotation.step(snapshot, &self.dynamics);
    }

    pub fn len(&self) -> usize { self.positions.len() }
    pub fn is_empty(&self) -> bool { self.positions.is_empty() }
    pub fn pattern(&self) -> Pattern { self.pattern }
    pub fn positions(&self) -> &[Point3] { &self.positions }
    pub fn targets(&self) -> &[Point3] { &self.targets }
    pub fn rotation(&self) -> Rotation { self.rotation }
    pub fn dynamics(&self) -> &Dynamics { &self.dynamics }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
