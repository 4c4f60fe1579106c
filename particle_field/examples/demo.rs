//! Runs the integrator headless through a scripted sequence of gestures and
//! prints how far the cloud sits from its targets.

use particle_field::{
    Dynamics, Gesture, HandPosition, HandSnapshot, ParticleField, Pattern, Point3,
    TrackingStatus,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Mean distance between each particle and its gesture-scaled target.
fn mean_gap(field: &ParticleField, gesture: Gesture) -> f32 {
    let k = field.dynamics().response(gesture).expansion;
    let total: f32 = field.positions().iter()
        .zip(field.targets())
        .map(|(p, t)| p.distance(t.scaled(k)))
        .sum();
    total / field.len() as f32
}

/// Mean distance from the origin, a rough "size" of the cloud.
fn mean_radius(field: &ParticleField) -> f32 {
    let total: f32 = field.positions().iter().map(|p| p.distance(Point3::ORIGIN)).sum();
    total / field.len() as f32
}

fn run(field: &mut ParticleField, label: &str, gesture: Gesture, hand: (f32, f32), frames: usize) {
    let snap = HandSnapshot {
        gesture,
        hand:     HandPosition { x: hand.0, y: hand.1 },
        tracking: TrackingStatus::Live,
        frame:    0,
    };
    for _ in 0..frames { field.step(&snap); }
    let rot = field.rotation();
    println!(
        "   {:<28} gap {:>7.3}  radius {:>6.2}  yaw {:>6.2}  pitch {:>5.2}",
        label, mean_gap(field, gesture), mean_radius(field), rot.yaw, rot.pitch,
    );
}

fn main() {
    println!("\n=== Particle Field Demo ===\n");

    let mut rng = StdRng::seed_from_u64(2024);
    let mut field = ParticleField::new(5000, Pattern::Sphere, Dynamics::default(), &mut rng)
        .expect("5000 particles");

    // ── 1. Settle into the sphere with nobody in view ─────────────────────
    println!("1. Idle — autopilot spin");
    for step in [10, 50, 100] {
        run(&mut field, &format!("{} frames", step), Gesture::None, (0.5, 0.5), step);
    }
    println!();

    // ── 2. Fist implodes, open palm bursts ────────────────────────────────
    println!("2. Gestures");
    run(&mut field, "CLOSED × 60",  Gesture::Closed,  (0.5, 0.5), 60);
    run(&mut field, "OPEN × 60",    Gesture::Open,    (0.5, 0.5), 60);
    run(&mut field, "NEUTRAL × 60", Gesture::Neutral, (0.5, 0.5), 60);
    println!();

    // ── 3. Hand steers the rotation ───────────────────────────────────────
    println!("3. Steering (hand at right edge, near bottom)");
    run(&mut field, "NEUTRAL × 90", Gesture::Neutral, (0.95, 0.8), 90);
    println!();

    // ── 4. Pattern changes ────────────────────────────────────────────────
    println!("4. Patterns");
    for p in Pattern::ALL {
        field.set_pattern(p, &mut rng);
        run(&mut field, &format!("{} × 120", p), Gesture::None, (0.5, 0.5), 120);
    }
}
