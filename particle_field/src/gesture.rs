//! Hand openness classification.
//!
//! One scalar drives everything: the mean planar distance from the wrist to
//! the index, middle, ring and pinky tips.  A fist pulls the tips in, an open
//! palm pushes them out.
//!
//! | Mean reach `d` | Gesture |
//! |---|---|
//! | no hand | `None` |
//! | `d < closed_below` | `Closed` |
//! | `d > open_above` | `Open` |
//! | otherwise | `Neutral` |
//!
//! There is no hysteresis: a hand hovering at a boundary flickers between the
//! two neighbouring states frame by frame.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::landmark::LandmarkSet;

/// Discrete hand state published by the detection loop.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Gesture {
    /// No hand in view.
    #[default]
    None,
    Open,
    Closed,
    Neutral,
}

impl Gesture {
    pub fn label(self) -> &'static str {
        match self {
            Gesture::None    => "NONE",
            Gesture::Open    => "OPEN",
            Gesture::Closed  => "CLOSED",
            Gesture::Neutral => "NEUTRAL",
        }
    }

    /// True whenever a hand is visible.
    pub fn is_active(self) -> bool {
        self != Gesture::None
    }
}

impl fmt::Display for Gesture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Reach thresholds in normalized image units (empirically tuned).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureThresholds {
    /// Mean reach strictly below this is a fist.
    pub closed_below: f32,
    /// Mean reach strictly above this is an open palm.
    pub open_above:   f32,
}

impl Default for GestureThresholds {
    fn default() -> Self {
        GestureThresholds { closed_below: 0.28, open_above: 0.42 }
    }
}

impl GestureThresholds {
    pub fn classify_reach(&self, reach: f32) -> Gesture {
        if reach < self.closed_below {
            Gesture::Closed
        } else if reach > self.open_above {
            Gesture::Open
        } else {
            Gesture::Neutral
        }
    }
}

/// Classify one detector result.
pub fn classify(landmarks: Option<&LandmarkSet>, thresholds: &GestureThresholds) -> Gesture {
    match landmarks {
        None       => Gesture::None,
        Some(hand) => thresholds.classify_reach(hand.mean_fingertip_reach()),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
