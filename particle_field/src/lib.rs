//! # particle_field
//!
//! The simulation half of the hand-particle toy, with no windowing or
//! hardware dependencies:
//!
//! * [`landmark`] — the 21-point hand skeleton a detector reports.
//! * [`gesture`] — reduces a skeleton to `None / Open / Closed / Neutral`.
//! * [`pattern`] — five target shapes: sphere, heart, cake, ring, random.
//! * [`field`] — the per-frame integrator that eases particles toward the
//!   gesture-scaled targets and steers the cloud's rotation.
//! * [`snapshot`] — the cell the detection loop publishes hand state through.
//!
//! ## Quick start
//!
//! ```rust
//! use particle_field::{Dynamics, Gesture, HandSnapshot, ParticleField, Pattern};
//! use rand::SeedableRng;
//!
//! let mut rng = rand::rngs::StdRng::seed_from_u64(1);
//! let mut field = ParticleField::new(5000, Pattern::Sphere, Dynamics::default(), &mut rng)
//!     .unwrap();
//!
//! let fist = HandSnapshot { gesture: Gesture::Closed, ..HandSnapshot::default() };
//! for _ in 0..60 {
//!     field.step(&fist);
//! }
//! field.set_pattern(Pattern::Heart, &mut rng);
//! assert_eq!(field.targets().len(), field.positions().len());
//! ```

pub mod color;
pub mod error;
pub mod field;
pub mod geometry;
pub mod gesture;
pub mod landmark;
pub mod pattern;
pub mod snapshot;

pub use color::Rgb;
pub use error::FieldError;
pub use field::{Dynamics, ParticleField, Response, Rotation};
pub use geometry::Point3;
pub use gesture::{classify, Gesture, GestureThresholds};
pub use landmark::{Landmark, LandmarkSet, LANDMARK_COUNT};
pub use pattern::Pattern;
pub use snapshot::{
    snapshot_cell, HandPosition, HandSnapshot, SnapshotReader, SnapshotWriter, TrackingStatus,
};
