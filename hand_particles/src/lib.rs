//! # hand_particles
//!
//! A particle cloud driven by a hand in front of a camera.  A landmark
//! source reports a 21-point hand skeleton; a detection thread reduces it to
//! a gesture and a wrist position; the render loop eases every particle
//! toward its pattern target scaled by the gesture.
//!
//! ## Gesture → Action mapping
//!
//! | Gesture | Detected when | Effect |
//! |---|---|---|
//! | Closed fist | mean fingertip reach < 0.28 | cloud implodes to 0.1× |
//! | Open palm | mean fingertip reach > 0.42 | cloud bursts to 1.5× |
//! | Neutral | in between | cloud rests at 1.0× |
//! | No hand | nothing detected | cloud rests and spins on its own |
//! | Hand position | any hand | yaw follows x, pitch follows y |
//!
//! ## Feature flags
//!
//! * (default) — **Simulation mode**: keyboard and mouse stand in for a hand.
//! * `leap` — **Hardware mode**: reads a LeapMotion controller via LeapC
//!   (select it with `source.kind = "leap"` or `--leap`).
//!
//! ### Keys
//!
//! | Key | Action |
//! |---|---|
//! | `1`–`5` | Sphere / Heart / Cake / Ring / Random |
//! | `C` | Next particle color |
//! | `Left` / `Right` | Rotate the particle hue |
//! | `F` | Toggle fullscreen |
//! | `Q` / `Escape` | Quit |
//! | `Space` | Simulated hand enters / leaves the frame |
//! | `Z` / `X` / `V` | Simulated fist / relaxed / open palm |
//! | wheel | Close or open the simulated fingers gradually |
//! | `E` | Make the next detection fail |

pub mod app;
pub mod cli;
pub mod config;
pub mod detect;
pub mod error;
pub mod source;
pub mod visualizer;
