use std::path::PathBuf;

use particle_field::FieldError;

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The device or model could not be opened.
    #[error("landmark source unavailable: {0}")]
    Unavailable(String),

    /// A single detection call failed; the next frame may succeed.
    #[error("detection failed: {0}")]
    Detection(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path:   PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {}", .0.join("; "))]
    Validation(Vec<String>),

    #[error("no config directory on this platform")]
    NoConfigDir,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Field(#[from] FieldError),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error("window error: {0}")]
    Window(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_joins_messages() {
        let err = ConfigError::Validation(vec!["a is bad".into(), "b is worse".into()]);
        assert_eq!(err.to_string(), "invalid config: a is bad; b is worse");
    }

    #[test]
    fn source_error_display() {
        let err = SourceError::Unavailable("no camera".into());
        assert_eq!(err.to_string(), "landmark source unavailable: no camera");
    }

    #[test]
    fn app_error_is_transparent_over_field_errors() {
        let err: AppError = FieldError::EmptyField.into();
        assert_eq!(err.to_string(), FieldError::EmptyField.to_string());
    }
}
