//! Small 3-D point type shared by the pattern generator and the integrator.

use serde::{Deserialize, Serialize};

/// A point (or displacement) in scene space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Point3 {
    pub const ORIGIN: Point3 = Point3 { x: 0.0, y: 0.0, z: 0.0 };

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Point3 { x, y, z }
    }

    pub fn scaled(self, k: f32) -> Self {
        Point3::new(self.x * k, self.y * k, self.z * k)
    }

    /// Move `self` toward `target` by `rate` of the remaining gap.
    pub fn approach(&mut self, target: Point3, rate: f32) {
        self.x += (target.x - self.x) * rate;
        self.y += (target.y - self.y) * rate;
        self.z += (target.z - self.z) * rate;
    }

    pub fn distance(self, other: Point3) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx*dx + dy*dy + dz*dz).sqrt()
    }

    /// Rotate about the Y axis (`yaw`) then the X axis (`pitch`), radians.
    pub fn rotated(self, yaw: f32, pitch: f32) -> Self {
        let (sy, cy) = yaw.sin_cos();
        let x1 =  self.x * cy + self.z * sy;
        let z1 = -self.x * sy + self.z * cy;

        let (sp, cp) = pitch.sin_cos();
        let y2 = self.y * cp - z1 * sp;
        let z2 = self.y * sp + z1 * cp;
        Point3::new(x1, y2, z2)
    }
}
