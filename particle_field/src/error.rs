#[derive(Debug, thiserror::Error, PartialEq)]
pub enum FieldError {
    #[error("expected {expected} hand landmarks, got {got}")]
    LandmarkCount { expected: usize, got: usize },

    #[error("unknown pattern: {0:?} (expected sphere, heart, cake, ring or random)")]
    UnknownPattern(String),

    #[error("invalid colour: {0:?} (expected #rgb or #rrggbb)")]
    InvalidColor(String),

    #[error("a particle field needs at least one particle")]
    EmptyField,

    #[error("particle buffer holds {particles} points but target buffer holds {targets}")]
    BufferLength { particles: usize, targets: usize },
}
