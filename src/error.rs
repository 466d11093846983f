use std::io;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Measure is negative: {0}")]
    NegativeMeasure(f64),

    #[error("Duration is negative: {0}")]
    NegativeDuration(f64),

    #[error("Duration is not positive: {0}")]
    NonPositiveDuration(f64),

    #[error("Delay is negative: {0}")]
    NegativeDelay(f64),

    #[error("BPM is not positive: {0}")]
    NonPositiveBpm(f64),

    #[error("Meter is not positive: {numerator}/{denominator}")]
    InvalidMeter { numerator: i32, denominator: i32 },

    #[error("Invalid button position: {0}")]
    InvalidPosition(u8),

    #[error("Unknown slide pattern: {0}")]
    UnknownPattern(String),

    #[error("Illegal slide: {0}")]
    IllegalSlide(String),

    #[error("Reflected slide is missing its reflection button")]
    MissingReflection,

    #[error("Chart has no BPM events")]
    MissingBpm,

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
