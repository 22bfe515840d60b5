use std::path::PathBuf;
use thiserror::Error;

/// Everything the flock API can refuse. Numeric degeneracy inside a tick is
/// absorbed locally and never surfaces here.
#[derive(Debug, Error)]
pub enum FlockError {
    #[error("invalid flock params: {0}")]
    InvalidParams(String),
    #[error("unknown preset id '{0}'")]
    UnknownPreset(String),
    #[error("pointer ray direction must be non-zero and finite")]
    DegenerateRay,
    #[error("agent seed has non-finite components: position {position:?}, velocity {velocity:?}")]
    NonFiniteSeed {
        position: [f64; 3],
        velocity: [f64; 3],
    },
    #[error("flock was dropped; spawned agent has nowhere to go")]
    FlockClosed,
    #[error("failed to read config {path:?}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, FlockError>;
