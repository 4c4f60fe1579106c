//! Target shapes for the particle cloud.
//!
//! Every pattern places each particle independently.  `Sphere` is a
//! deterministic Fibonacci lattice; the others draw from the supplied RNG, so
//! two generations of `Heart` differ point-by-point but share the same
//! silhouette.
//!
//! | Pattern | Placement |
//! |---|---|
//! | `sphere` | Fibonacci sphere, radius 10 |
//! | `heart`  | classic parametric heart, filled toward the outline, thin in depth |
//! | `cake`   | wide bottom tier (60 %), narrow top tier (30 %), candle (10 %) |
//! | `ring`   | flat annulus, radius 12–14 |
//! | `random` | uniform in a 30 × 30 × 30 cube |

use std::f32::consts::{PI, TAU};
use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::FieldError;
use crate::geometry::Point3;

// ════════════════════════════════════════════════════════════════════════════
// Pattern
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pattern {
    #[default]
    Sphere,
    Heart,
    Cake,
    Ring,
    Random,
}

impl Pattern {
    pub const ALL: [Pattern; 5] = [
        Pattern::Sphere, Pattern::Heart, Pattern::Cake, Pattern::Ring, Pattern::Random,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Pattern::Sphere => "sphere",
            Pattern::Heart  => "heart",
            Pattern::Cake   => "cake",
            Pattern::Ring   => "ring",
            Pattern::Random => "random",
        }
    }

    /// Place particle `i` of `n`.
    pub fn point<R: Rng + ?Sized>(self, i: usize, n: usize, rng: &mut R) -> Point3 {
        match self {
            Pattern::Sphere => sphere_point(i, n),
            Pattern::Heart  => heart_point(rng),
            Pattern::Cake   => cake_point(rng),
            Pattern::Ring   => ring_point(rng),
            Pattern::Random => random_point(rng),
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Pattern {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Pattern::ALL.iter()
            .copied()
            .find(|p| p.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| FieldError::UnknownPattern(s.to_string()))
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Generation
// ════════════════════════════════════════════════════════════════════════════

/// Overwrite every slot of `targets` with a fresh placement.
pub fn generate_into<R: Rng + ?Sized>(pattern: Pattern, targets: &mut [Point3], rng: &mut R) {
    let n = targets.len();
    for (i, slot) in targets.iter_mut().enumerate() {
        *slot = pattern.point(i, n, rng);
    }
}

/// Generate a complete target buffer of `n` points.
pub fn generate<R: Rng + ?Sized>(pattern: Pattern, n: usize, rng: &mut R) -> Vec<Point3> {
    let mut targets = vec![Point3::ORIGIN; n];
    generate_into(pattern, &mut targets, rng);
    targets
}

// ── per-shape placement ────────────────────────────────────────────────────

const SPHERE_RADIUS: f32 = 10.0;

fn sphere_point(i: usize, n: usize) -> Point3 {
    let n     = n.max(1) as f32;
    let phi   = (-1.0 + 2.0 * i as f32 / n).clamp(-1.0, 1.0).acos();
    let theta = (n * PI).sqrt() * phi;
    Point3::new(
        SPHERE_RADIUS * theta.cos() * phi.sin(),
        SPHERE_RADIUS * theta.sin() * phi.sin(),
        SPHERE_RADIUS * phi.cos(),
    )
}

fn heart_point<R: Rng + ?Sized>(rng: &mut R) -> Point3 {
    let t      = rng.gen::<f32>() * TAU;
    // sqrt biases the fill toward the outline
    let spread = rng.gen::<f32>().sqrt();
    let scale  = 0.8 * spread;
    let x = 16.0 * t.sin().powi(3);
    let y = 13.0 * t.cos() - 5.0 * (2.0 * t).cos() - 2.0 * (3.0 * t).cos() - (4.0 * t).cos();
    let z = (rng.gen::<f32>() - 0.5) * 5.0 * spread;
    Point3::new(scale * x, scale * y, z)
}

fn cake_point<R: Rng + ?Sized>(rng: &mut R) -> Point3 {
    let layer = rng.gen::<f32>();
    if layer < 0.6 {
        let (x, z) = disc(rng, 8.0);
        Point3::new(x, -5.0 + rng.gen::<f32>() * 4.0, z)
    } else if layer < 0.9 {
        let (x, z) = disc(rng, 6.0);
        Point3::new(x, -1.0 + rng.gen::<f32>() * 3.0, z)
    } else {
        // candle
        let x = (rng.gen::<f32>() - 0.5) * 0.5;
        let z = (rng.gen::<f32>() - 0.5) * 0.5;
        Point3::new(x, 2.0 + rng.gen::<f32>() * 3.0, z)
    }
}

/// Uniform point on a horizontal disc of the given radius.
fn disc<R: Rng + ?Sized>(rng: &mut R, radius: f32) -> (f32, f32) {
    let angle = rng.gen::<f32>() * TAU;
    let r     = radius * rng.gen::<f32>().sqrt();
    (r * angle.cos(), r * angle.sin())
}

fn ring_point<R: Rng + ?Sized>(rng: &mut R) -> Point3 {
    let radius = 12.0 + rng.gen::<f32>() * 2.0;
    let angle  = rng.gen::<f32>() * TAU;
    Point3::new(
        radius * angle.cos(),
        (rng.gen::<f32>() - 0.5) * 2.0,
        radius * angle.sin(),
    )
}

fn random_point<R: Rng + ?Sized>(rng: &mut R) -> Point3 {
    Point3::new(
        (rng.gen::<f32>() - 0.5) * 30.0,
        (rng.gen::<f32>() - 0.5) * 30.0,
        (rng.gen::<f32>() - 0.5) * 30.0,
    )
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
