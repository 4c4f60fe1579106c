//! Interactive menu for exploring the five target patterns.
//! Prints bounds and an ASCII front view of the generated cloud.

use particle_field::{pattern, Pattern, Point3};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io::{self, Write};

const VIEW_W: usize = 60;
const VIEW_H: usize = 24;
/// Scene half-extent mapped onto the view.
const VIEW_SPAN: f32 = 16.0;

fn main() {
    println!();
    println!("╔══════════════════════════════════════════════════════╗");
    println!("║             Particle Pattern Explorer                ║");
    println!("╚══════════════════════════════════════════════════════╝");
    println!();

    loop {
        print_menu();
        let choice = read_line("Select a pattern (1–5, or q to quit): ");

        if choice.trim().eq_ignore_ascii_case("q") {
            println!("\nGoodbye!\n");
            break;
        }

        let pattern = match choice.trim().parse::<usize>() {
            Ok(i) if (1..=Pattern::ALL.len()).contains(&i) => Pattern::ALL[i - 1],
            _ => match choice.trim().parse::<Pattern>() {
                Ok(p)  => p,
                Err(e) => { println!("  ⚠  {}\n", e); continue; }
            },
        };

        let n: usize = read_line("  How many particles? (default 5000): ")
            .trim().parse().unwrap_or(5000);
        let n = n.clamp(1, 200_000);

        let seed: u64 = read_line("  RNG seed (default 42): ")
            .trim().parse().unwrap_or(42);

        let mut rng = StdRng::seed_from_u64(seed);
        let points = pattern::generate(pattern, n, &mut rng);
        let (lo, hi) = bounds(&points);

        println!();
        println!("  ┌─ {} ({} particles, seed {}) ─", pattern, n, seed);
        println!("  │  x ∈ [{:>7.2}, {:>7.2}]", lo.x, hi.x);
        println!("  │  y ∈ [{:>7.2}, {:>7.2}]", lo.y, hi.y);
        println!("  │  z ∈ [{:>7.2}, {:>7.2}]", lo.z, hi.z);
        println!("  │");
        for row in front_view(&points) {
            println!("  │  {}", row);
        }
        println!("  └─");
        println!();
    }
}

fn print_menu() {
    println!("  ┌──────────────────────────────────────────────────────┐");
    for (i, p) in Pattern::ALL.iter().enumerate() {
        println!("  │  {}. {:48} │", i + 1, p.name());
    }
    println!("  └──────────────────────────────────────────────────────┘");
    println!();
}

fn bounds(points: &[Point3]) -> (Point3, Point3) {
    let mut lo = Point3::new(f32::MAX, f32::MAX, f32::MAX);
    let mut hi = Point3::new(f32::MIN, f32::MIN, f32::MIN);
    for p in points {
        lo = Point3::new(lo.x.min(p.x), lo.y.min(p.y), lo.z.min(p.z));
        hi = Point3::new(hi.x.max(p.x), hi.y.max(p.y), hi.z.max(p.z));
    }
    (lo, hi)
}

/// Orthographic projection onto the x/y plane, shaded by point density.
fn front_view(points: &[Point3]) -> Vec<String> {
    const SHADES: &[u8] = b" .:-=+*#%@";
    let mut counts = vec![0u32; VIEW_W * VIEW_H];
    for p in points {
        let cx = ((p.x + VIEW_SPAN) / (2.0 * VIEW_SPAN) * VIEW_W as f32) as isize;
        let cy = ((VIEW_SPAN - p.y) / (2.0 * VIEW_SPAN) * VIEW_H as f32) as isize;
        if (0..VIEW_W as isize).contains(&cx) && (0..VIEW_H as isize).contains(&cy) {
            counts[cy as usize * VIEW_W + cx as usize] += 1;
        }
    }
    let peak = counts.iter().copied().max().unwrap_or(0).max(1) as f32;
    counts.chunks(VIEW_W)
        .map(|row| row.iter()
            .map(|&c| {
                let level = ((c as f32 / peak).sqrt() * (SHADES.len() - 1) as f32).round();
                SHADES[level as usize] as char
            })
            .collect::<String>())
        .collect()
}

fn read_line(prompt: &str) -> String {
    print!("{}", prompt);
    io::stdout().flush().ok();
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).ok();
    buf
}
