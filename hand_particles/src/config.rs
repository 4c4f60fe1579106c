//! TOML configuration.
//!
//! Every section is optional and every field falls back to its default, so
//! an empty file is a valid config.
//!
//! ```toml
//! [field]
//! particle_count = 5000
//! pattern        = "heart"
//! color          = "#ff69b4"
//!
//! [gesture]
//! closed_below = 0.28
//! open_above   = 0.42
//!
//! [dynamics]
//! auto_spin = 0.004
//!
//! [display]
//! width  = 1280
//! height = 720
//!
//! [source]
//! kind       = "sim"
//! camera_fps = 30
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::info;

use particle_field::{Dynamics, GestureThresholds, Pattern, Response, Rgb};

use crate::error::ConfigError;

// ════════════════════════════════════════════════════════════════════════════
// Schema
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub field:    FieldConfig,
    pub gesture:  GestureConfig,
    pub dynamics: Dynamics,
    pub display:  DisplayConfig,
    pub source:   SourceConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    pub particle_count: usize,
    pub pattern:        Pattern,
    pub color:          Rgb,
    /// Fixed RNG seed for reproducible stochastic patterns.
    pub seed:           Option<u64>,
}

impl Default for FieldConfig {
    fn default() -> Self {
        FieldConfig {
            particle_count: 5000,
            pattern:        Pattern::Sphere,
            color:          Rgb::CYAN,
            seed:           None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    #[serde(flatten)]
    pub thresholds: GestureThresholds,
    /// Flip the wrist x coordinate; webcam images are mirrored.
    pub mirror_x:   bool,
}

impl Default for GestureConfig {
    fn default() -> Self {
        GestureConfig { thresholds: GestureThresholds::default(), mirror_x: true }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub width:             usize,
    pub height:            usize,
    pub fullscreen_width:  usize,
    pub fullscreen_height: usize,
    /// Vertical field of view of the perspective camera.
    pub fov_degrees:       f32,
    /// Camera distance from the origin along +z.
    pub camera_distance:   f32,
    /// Particle diameter in scene units.
    pub point_size:        f32,
    /// Additive-blend weight of each particle.
    pub point_alpha:       f32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig {
            width:             960,
            height:            640,
            fullscreen_width:  1920,
            fullscreen_height: 1080,
            fov_degrees:       75.0,
            camera_distance:   30.0,
            point_size:        0.2,
            point_alpha:       0.8,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Keyboard and mouse stand in for a camera.
    #[default]
    Sim,
    /// LeapMotion controller (requires the `leap` feature).
    Leap,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub kind:             SourceKind,
    /// Frame rate of the simulated camera.
    pub camera_fps:       u32,
    /// Sleep between detection polls.
    pub poll_interval_ms: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        SourceConfig { kind: SourceKind::Sim, camera_fps: 30, poll_interval_ms: 4 }
    }
}

impl SourceConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Loading
// ════════════════════════════════════════════════════════════════════════════

/// `<config dir>/hand_particles/config.toml`
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    let dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
    Ok(dir.join("hand_particles").join("config.toml"))
}

pub fn parse(content: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(content)?;
    validate(&config)?;
    Ok(config)
}

pub fn load_from_path(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)
        .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
    let config = parse(&content)?;
    info!("loaded config from {}", path.display());
    Ok(config)
}

/// Load `path` if given, else the platform default if it exists, else
/// built-in defaults.
pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
    if let Some(path) = path {
        return load_from_path(path);
    }
    match default_config_path() {
        Ok(path) if path.exists() => load_from_path(&path),
        _ => {
            info!("no config file, using defaults");
            Ok(Config::default())
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Validation
// ════════════════════════════════════════════════════════════════════════════

fn check_rate(errors: &mut Vec<String>, name: &str, value: f32) {
    if !(value > 0.0 && value <= 1.0) {
        errors.push(format!("{name} = {value} must be in (0, 1]"));
    }
}

fn check_positive(errors: &mut Vec<String>, name: &str, value: f32) {
    if !(value > 0.0) {
        errors.push(format!("{name} = {value} must be positive"));
    }
}

fn check_response(errors: &mut Vec<String>, name: &str, r: &Response) {
    check_positive(errors, &format!("dynamics.{name}.expansion"), r.expansion);
    check_rate(errors, &format!("dynamics.{name}.smoothing"), r.smoothing);
}

/// Collect every out-of-range value, then fail once with all of them.
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    let mut errors = Vec::new();

    if config.field.particle_count == 0 {
        errors.push("field.particle_count must be at least 1".to_string());
    }

    let t = &config.gesture.thresholds;
    check_positive(&mut errors, "gesture.closed_below", t.closed_below);
    if !(t.closed_below < t.open_above) {
        errors.push(format!(
            "gesture.closed_below ({}) must be less than gesture.open_above ({})",
            t.closed_below, t.open_above,
        ));
    }

    let d = &config.dynamics;
    check_response(&mut errors, "closed", &d.closed);
    check_response(&mut errors, "open",   &d.open);
    check_response(&mut errors, "idle",   &d.idle);
    check_rate(&mut errors, "dynamics.rotation_follow", d.rotation_follow);
    check_rate(&mut errors, "dynamics.pitch_relax",     d.pitch_relax);
    if !d.auto_spin.is_finite() {
        errors.push("dynamics.auto_spin must be finite".to_string());
    }

    let v = &config.display;
    for (name, value) in [
        ("display.width",             v.width),
        ("display.height",            v.height),
        ("display.fullscreen_width",  v.fullscreen_width),
        ("display.fullscreen_height", v.fullscreen_height),
    ] {
        if value < 200 {
            errors.push(format!("{name} = {value} must be at least 200"));
        }
    }
    if !(v.fov_degrees > 1.0 && v.fov_degrees < 179.0) {
        errors.push(format!("display.fov_degrees = {} must be in (1, 179)", v.fov_degrees));
    }
    check_positive(&mut errors, "display.camera_distance", v.camera_distance);
    check_positive(&mut errors, "display.point_size",      v.point_size);
    check_rate(&mut errors, "display.point_alpha", v.point_alpha);

    if config.source.camera_fps == 0 {
        errors.push("source.camera_fps must be at least 1".to_string());
    }

    if errors.is_empty() { Ok(()) } else { Err(ConfigError::Validation(errors)) }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_is_defaults() {
        assert_eq!(parse("").unwrap(), Config::default());
    }

    #[test]
    fn defaults_validate() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let cfg = parse(r##"
            [field]
            pattern = "heart"
            color   = "#ff69b4"

            [gesture]
            open_above = 0.5
            mirror_x   = false

            [source]
            kind = "leap"
        "##).unwrap();
        assert_eq!(cfg.field.pattern, Pattern::Heart);
        assert_eq!(cfg.field.color, Rgb::new(0xff, 0x69, 0xb4));
        assert_eq!(cfg.field.particle_count, 5000);
        assert_eq!(cfg.gesture.thresholds.open_above, 0.5);
        assert_eq!(cfg.gesture.thresholds.closed_below, 0.28);
        assert!(!cfg.gesture.mirror_x);
        assert_eq!(cfg.source.kind, SourceKind::Leap);
        assert_eq!(cfg.source.camera_fps, 30);
        assert_eq!(cfg.display, DisplayConfig::default());
    }

    #[test]
    fn unknown_pattern_is_parse_error() {
        let err = parse("[field]\npattern = \"cube\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn inverted_thresholds_rejected() {
        let err = parse("[gesture]\nclosed_below = 0.5\nopen_above = 0.3").unwrap_err();
        match err {
            ConfigError::Validation(msgs) => {
                assert!(msgs.iter().any(|m| m.contains("closed_below")));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn validation_reports_every_problem() {
        let mut cfg = Config::default();
        cfg.field.particle_count = 0;
        cfg.dynamics.open.smoothing = 1.5;
        cfg.display.width = 10;
        cfg.source.camera_fps = 0;
        match validate(&cfg) {
            Err(ConfigError::Validation(msgs)) => assert_eq!(msgs.len(), 4, "{msgs:?}"),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn nan_rates_rejected() {
        let mut cfg = Config::default();
        cfg.dynamics.rotation_follow = f32::NAN;
        assert!(validate(&cfg).is_err());
    }

    #[test]
    fn missing_file_is_read_error() {
        let err = load(Some(Path::new("/definitely/not/here.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn defaults_round_trip_through_toml() {
        let text = toml::to_string(&Config::default()).unwrap();
        assert_eq!(parse(&text).unwrap(), Config::default());
    }

    #[test]
    fn poll_interval_in_millis() {
        assert_eq!(SourceConfig::default().poll_interval(), Duration::from_millis(4));
    }
}
