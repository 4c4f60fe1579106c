//! Command-line flags layered over the config file, and the log filter.

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use particle_field::{Pattern, Rgb};

use crate::config::{self, Config, SourceKind};
use crate::error::ConfigError;

/// Filter used when neither `--log-level` nor `RUST_LOG` gives a usable one.
pub const DEFAULT_LOG: &str = "hand_particles=info,particle_field=info";

/// Hand Particles — a particle cloud steered by hand gestures.
#[derive(Parser, Debug)]
#[command(name = "hand_particles", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Starting pattern (sphere, heart, cake, ring, random).
    #[arg(short, long)]
    pub pattern: Option<Pattern>,

    /// Particle color as hex, e.g. "#ff69b4".
    #[arg(short, long)]
    pub color: Option<Rgb>,

    /// Number of particles.
    #[arg(short = 'n', long)]
    pub particles: Option<usize>,

    /// RNG seed for reproducible clouds.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Use the LeapMotion controller instead of the simulated hand.
    #[arg(long)]
    pub leap: bool,

    /// Log level override (debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,
}

pub fn parse() -> Args {
    Args::parse()
}

/// `--log-level` wins over `RUST_LOG`, which wins over [`DEFAULT_LOG`].
/// A directive that does not parse falls through to the default.
pub fn log_filter(level: Option<&str>) -> EnvFilter {
    match level {
        Some(directive) => EnvFilter::try_new(directive).ok(),
        None            => EnvFilter::try_from_default_env().ok(),
    }
    .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG))
}

impl Args {
    /// Load the config file and apply command-line overrides on top.
    pub fn load_config(&self) -> Result<Config, ConfigError> {
        let cfg = config::load(self.config.as_deref())?;
        self.apply(cfg)
    }

    fn apply(&self, mut cfg: Config) -> Result<Config, ConfigError> {
        if let Some(pattern) = self.pattern   { cfg.field.pattern = pattern; }
        if let Some(color)   = self.color     { cfg.field.color = color; }
        if let Some(n)       = self.particles { cfg.field.particle_count = n; }
        if let Some(seed)    = self.seed      { cfg.field.seed = Some(seed); }
        if self.leap { cfg.source.kind = SourceKind::Leap; }
        config::validate(&cfg)?;
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(argv: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("hand_particles").chain(argv.iter().copied()))
            .unwrap()
    }

    #[test]
    fn no_flags_keep_config() {
        let cfg = args(&[]).apply(Config::default()).unwrap();
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn flags_override_config() {
        let cfg = args(&["--pattern", "heart", "--color", "#ff69b4", "-n", "800", "--seed", "9", "--leap"])
            .apply(Config::default())
            .unwrap();
        assert_eq!(cfg.field.pattern, Pattern::Heart);
        assert_eq!(cfg.field.color, Rgb::new(0xff, 0x69, 0xb4));
        assert_eq!(cfg.field.particle_count, 800);
        assert_eq!(cfg.field.seed, Some(9));
        assert_eq!(cfg.source.kind, SourceKind::Leap);
    }

    #[test]
    fn bad_pattern_rejected_by_parser() {
        let res = Args::try_parse_from(["hand_particles", "--pattern", "cube"]);
        assert!(res.is_err());
    }

    #[test]
    fn zero_particles_fails_validation() {
        let err = args(&["-n", "0"]).apply(Config::default()).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn log_level_flag_sets_filter() {
        assert_eq!(log_filter(Some("debug")).to_string(), "debug");
        assert_eq!(
            log_filter(Some("particle_field=trace")).to_string(),
            "particle_field=trace",
        );
    }

    #[test]
    fn unparsable_log_level_uses_default() {
        let fallback = EnvFilter::new(DEFAULT_LOG).to_string();
        assert_eq!(log_filter(Some("hand_particles=loud")).to_string(), fallback);
    }

    #[test]
    fn log_level_flag_parses() {
        assert_eq!(args(&["--log-level", "warn"]).log_level.as_deref(), Some("warn"));
        assert_eq!(args(&[]).log_level, None);
    }
}
