//! Top-level application state machine.
//!
//! `AppState` owns the `ParticleField`, the UI selections and the reading
//! end of the hand snapshot cell.  It processes `UiCommand`s and advances
//! the field once per rendered frame.

use std::sync::mpsc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, warn};

use particle_field::{
    snapshot_cell, FieldError, HandSnapshot, ParticleField, Rgb, SnapshotReader,
};

use crate::config::{Config, SourceKind};
use crate::detect::{spawn_detection, DetectionSettings};
use crate::error::AppError;
use crate::source::{build_source, SimInput};
use crate::visualizer::{FrameView, UiCommand, Visualizer};

// ════════════════════════════════════════════════════════════════════════════
// AppState
// ════════════════════════════════════════════════════════════════════════════

pub struct AppState {
    field:      ParticleField,
    rng:        StdRng,
    color:      Rgb,
    fullscreen: bool,
    quit:       bool,

    // ── hand state from the detection thread ─────────────────────────────
    hand:       SnapshotReader<HandSnapshot>,
    last:       HandSnapshot,
}

impl AppState {
    pub fn new(cfg: &Config, hand: SnapshotReader<HandSnapshot>) -> Result<Self, FieldError> {
        let mut rng = match cfg.field.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None       => StdRng::from_entropy(),
        };
        let field = ParticleField::new(
            cfg.field.particle_count,
            cfg.field.pattern,
            cfg.dynamics,
            &mut rng,
        )?;
        Ok(AppState {
            field,
            rng,
            color:      cfg.field.color,
            fullscreen: false,
            quit:       false,
            hand,
            last:       HandSnapshot::default(),
        })
    }

    // ── process one UiCommand ────────────────────────────────────────────

    pub fn handle_command(&mut self, cmd: UiCommand) {
        match cmd {
            UiCommand::SelectPattern(pattern) => {
                self.field.set_pattern(pattern, &mut self.rng);
                info!(%pattern, "pattern selected");
            }
            UiCommand::NextColor => {
                self.color = self.color.next_in_palette();
                info!(color = %self.color, "color changed");
            }
            UiCommand::ShiftHue(degrees) => {
                self.color = self.color.shift_hue(degrees as f32);
                debug!(color = %self.color, "hue shifted");
            }
            UiCommand::ToggleFullscreen => self.fullscreen = !self.fullscreen,
            UiCommand::Quit             => self.quit = true,
        }
    }

    /// Record the window's real fullscreen state after a failed switch.
    pub fn sync_fullscreen(&mut self, actual: bool) {
        self.fullscreen = actual;
    }

    // ── Per-frame tick ────────────────────────────────────────────────────

    /// Read the newest hand snapshot and advance the field by one frame.
    pub fn tick(&mut self) -> HandSnapshot {
        let snapshot = self.hand.load();
        if snapshot.is_live() && !self.last.is_live() {
            info!("hand tracking ready");
        }
        self.field.step(&snapshot);
        self.last = snapshot;
        snapshot
    }

    // ── Accessors for the render loop ─────────────────────────────────────

    pub fn field(&self)       -> &ParticleField { &self.field }
    pub fn color(&self)       -> Rgb            { self.color }
    pub fn fullscreen(&self)  -> bool           { self.fullscreen }
    pub fn should_quit(&self) -> bool           { self.quit }
    pub fn snapshot(&self)    -> HandSnapshot   { self.last }
}

// ════════════════════════════════════════════════════════════════════════════
// run() — the main application loop
// ════════════════════════════════════════════════════════════════════════════

/// Run the full application.
///
/// Starts the detection thread (simulated hand by default, LeapMotion with
/// `source.kind = "leap"` and the `leap` feature), opens the window and
/// drives the input/step/render loop at ~60 fps.  The detection thread is
/// stopped before returning.
pub fn run(cfg: Config) -> Result<(), AppError> {
    let (writer, reader) = snapshot_cell(HandSnapshot::default());
    let mut app = AppState::new(&cfg, reader)?;

    // ── Detection thread (builds its own source) ─────────────────────────
    let (sim_tx, sim_rx) = mpsc::channel::<SimInput>();
    let source_cfg = cfg.source.clone();
    let mirror_x = cfg.gesture.mirror_x;
    let detection = spawn_detection(
        move || build_source(&source_cfg, mirror_x, sim_rx),
        writer,
        DetectionSettings::from_config(&cfg),
    )?;

    // ── Visualizer (owns the window and the sim input sender) ────────────
    let mut vis = Visualizer::new(&cfg.display, sim_tx)?;
    info!(
        particles = app.field().len(),
        pattern = %app.field().pattern(),
        source = ?cfg.source.kind,
        "window open",
    );

    // ── Main loop ─────────────────────────────────────────────────────────
    while vis.is_open() {
        for cmd in vis.poll_input() {
            app.handle_command(cmd);
        }
        if app.should_quit() { break; }

        if app.fullscreen() != vis.is_fullscreen() {
            if let Err(e) = vis.set_fullscreen(app.fullscreen()) {
                warn!(error = %e, "fullscreen switch failed");
                app.sync_fullscreen(vis.is_fullscreen());
            }
        }

        let snapshot = app.tick();
        let fullscreen = vis.is_fullscreen();
        vis.render(&FrameView {
            field:      app.field(),
            color:      app.color(),
            snapshot,
            fullscreen,
            sim_hints:  cfg.source.kind == SourceKind::Sim,
        })?;
    }

    detection.stop();
    info!("bye");
    Ok(())
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use particle_field::{Gesture, Pattern, Point3, SnapshotWriter, TrackingStatus};

    fn seeded() -> Config {
        let mut cfg = Config::default();
        cfg.field.particle_count = 500;
        cfg.field.seed = Some(7);
        cfg
    }

    fn make_app() -> (AppState, SnapshotWriter<HandSnapshot>) {
        let (writer, reader) = snapshot_cell(HandSnapshot::default());
        (AppState::new(&seeded(), reader).unwrap(), writer)
    }

    #[test]
    fn starts_with_configured_pattern_and_color() {
        let (app, _w) = make_app();
        assert_eq!(app.field().pattern(), Pattern::Sphere);
        assert_eq!(app.field().len(), 500);
        assert_eq!(app.color(), Rgb::CYAN);
        assert!(!app.fullscreen());
    }

    #[test]
    fn zero_particles_is_an_error() {
        let mut cfg = seeded();
        cfg.field.particle_count = 0;
        let (_w, reader) = snapshot_cell(HandSnapshot::default());
        assert!(matches!(AppState::new(&cfg, reader), Err(FieldError::EmptyField)));
    }

    #[test]
    fn same_seed_same_cloud() {
        let (a, _wa) = make_app();
        let (b, _wb) = make_app();
        assert_eq!(a.field().positions(), b.field().positions());
    }

    #[test]
    fn select_pattern_replaces_targets() {
        let (mut app, _w) = make_app();
        let before = app.field().targets().to_vec();
        app.handle_command(UiCommand::SelectPattern(Pattern::Ring));
        assert_eq!(app.field().pattern(), Pattern::Ring);
        assert_eq!(app.field().targets().len(), before.len());
        assert_ne!(app.field().targets(), &before[..]);
    }

    #[test]
    fn pattern_switch_keeps_positions() {
        let (mut app, _w) = make_app();
        let before = app.field().positions().to_vec();
        app.handle_command(UiCommand::SelectPattern(Pattern::Heart));
        assert_eq!(app.field().positions(), &before[..]);
    }

    #[test]
    fn next_color_cycles_palette() {
        let (mut app, _w) = make_app();
        app.handle_command(UiCommand::NextColor);
        assert_eq!(app.color(), Rgb::PALETTE[1]);
        for _ in 1..Rgb::PALETTE.len() {
            app.handle_command(UiCommand::NextColor);
        }
        assert_eq!(app.color(), Rgb::CYAN);
    }

    #[test]
    fn hue_shift_reaches_colours_off_the_palette() {
        let (mut app, _w) = make_app();
        app.handle_command(UiCommand::ShiftHue(180));
        assert_eq!(app.color(), Rgb::new(0xFF, 0x00, 0x00));
        app.handle_command(UiCommand::ShiftHue(-10));
        let c = app.color();
        assert_eq!((c.r, c.g), (0xFF, 0x00));
        assert!(c.b > 0);
        assert!(!Rgb::PALETTE.contains(&c));
    }

    #[test]
    fn fullscreen_toggles_and_syncs() {
        let (mut app, _w) = make_app();
        app.handle_command(UiCommand::ToggleFullscreen);
        assert!(app.fullscreen());
        app.sync_fullscreen(false);
        assert!(!app.fullscreen());
    }

    #[test]
    fn quit_sets_flag() {
        let (mut app, _w) = make_app();
        assert!(!app.should_quit());
        app.handle_command(UiCommand::Quit);
        assert!(app.should_quit());
    }

    #[test]
    fn tick_reads_published_snapshot() {
        let (mut app, writer) = make_app();
        let snap = HandSnapshot {
            gesture:  Gesture::Closed,
            tracking: TrackingStatus::Live,
            frame:    3,
            ..HandSnapshot::default()
        };
        writer.publish(snap);
        assert_eq!(app.tick(), snap);
        assert_eq!(app.snapshot(), snap);
    }

    #[test]
    fn fist_pulls_cloud_inward() {
        let (mut app, writer) = make_app();
        writer.publish(HandSnapshot {
            gesture:  Gesture::Closed,
            tracking: TrackingStatus::Live,
            ..HandSnapshot::default()
        });
        let radius = |app: &AppState| -> f32 {
            app.field().positions().iter().map(|p| p.distance(Point3::ORIGIN)).sum::<f32>()
                / app.field().len() as f32
        };
        let start = radius(&app);
        for _ in 0..120 { app.tick(); }
        assert!(radius(&app) < start * 0.5);
        // sphere radius 10 scaled by 0.1
        assert!(radius(&app) < 1.5);
    }

    #[test]
    fn loading_state_still_animates() {
        let (mut app, _w) = make_app();
        let yaw = app.field().rotation().yaw;
        app.tick();
        assert!(!app.snapshot().is_live());
        assert!(app.field().rotation().yaw > yaw);
    }
}
