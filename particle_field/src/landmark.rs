//! Hand landmarks as delivered by a hand-pose detector.
//!
//! A detector reports zero or one hand per frame.  A hand is 21 keypoints in
//! normalized image coordinates (`x`, `y` in `[0, 1]`, origin top-left) plus
//! an optional relative depth `z`.
//!
//! ```text
//!            8   12  16  20        tips
//!            |   |   |   |
//!   4        7   11  15  19
//!    \       |   |   |   |
//!     3      6   10  14  18
//!      \     |   |   |   |
//!       2    5---9---13--17        knuckles
//!        \   |         /
//!         1  |       /
//!          \ |     /
//!            0                     wrist
//! ```

use crate::error::FieldError;

/// Number of keypoints in one hand.
pub const LANDMARK_COUNT: usize = 21;

pub const WRIST:      usize = 0;
pub const INDEX_TIP:  usize = 8;
pub const MIDDLE_TIP: usize = 12;
pub const RING_TIP:   usize = 16;
pub const PINKY_TIP:  usize = 20;

/// The four fingertips used for the openness measure (thumb excluded).
pub const FINGERTIPS: [usize; 4] = [INDEX_TIP, MIDDLE_TIP, RING_TIP, PINKY_TIP];

/// One detected keypoint.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    /// Relative depth; 0.0 when the detector does not provide one.
    pub z: f32,
}

impl Landmark {
    pub const fn new(x: f32, y: f32) -> Self {
        Landmark { x, y, z: 0.0 }
    }

    pub const fn with_depth(x: f32, y: f32, z: f32) -> Self {
        Landmark { x, y, z }
    }

    /// Distance in the image plane; depth is ignored.
    pub fn planar_distance(&self, other: &Landmark) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx*dx + dy*dy).sqrt()
    }
}

/// Exactly [`LANDMARK_COUNT`] keypoints for one hand.
#[derive(Clone, Debug, PartialEq)]
pub struct LandmarkSet {
    points: [Landmark; LANDMARK_COUNT],
}

impl LandmarkSet {
    pub fn new(points: [Landmark; LANDMARK_COUNT]) -> Self {
        LandmarkSet { points }
    }

    pub fn from_slice(points: &[Landmark]) -> Result<Self, FieldError> {
        let points: [Landmark; LANDMARK_COUNT] = points.try_into()
            .map_err(|_| FieldError::LandmarkCount {
                expected: LANDMARK_COUNT,
                got:      points.len(),
            })?;
        Ok(LandmarkSet { points })
    }

    pub fn wrist(&self) -> &Landmark {
        &self.points[WRIST]
    }

    /// Mean planar distance from the wrist to the four fingertips.
    pub fn mean_fingertip_reach(&self) -> f32 {
        let wrist = self.wrist();
        let total: f32 = FINGERTIPS.iter()
            .map(|&i| self.points[i].planar_distance(wrist))
            .sum();
        total / FINGERTIPS.len() as f32
    }

    /// Synthesise a plausible hand with the wrist at `(wx, wy)` and every
    /// fingertip `reach` away from it.  Used by simulated sources and tests.
    ///
    /// Fingers fan upward (toward smaller `y`) over a 60° arc; intermediate
    /// joints sit evenly along each finger.
    pub fn synthetic(wx: f32, wy: f32, reach: f32) -> Self {
        let mut points = [Landmark::new(wx, wy); LANDMARK_COUNT];
        // finger 0 is the thumb, 1..=4 index..pinky; each has 4 joints
        for finger in 0..5 {
            let spread = (finger as f32 - 2.0) * 15f32.to_radians();
            let (dx, dy) = (spread.sin(), -spread.cos());
            for joint in 0..4 {
                let t = (joint + 1) as f32 / 4.0;
                let len = if finger == 0 { reach * 0.6 } else { reach };
                points[1 + finger * 4 + joint] = Landmark::new(
                    wx + dx * len * t,
                    wy + dy * len * t,
                );
            }
        }
        LandmarkSet { points }
    }
}
