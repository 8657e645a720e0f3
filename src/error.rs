/// Startup errors.  The simulation step itself never fails.

use std::path::PathBuf;

/// Failures reading or checking a `GameConfig`.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("IO error reading {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Failures loading the background image or music track.
#[derive(thiserror::Error, Debug)]
pub enum AssetError {
    #[error("IO error reading {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("Audio unavailable: {0}")]
    Audio(String),
}
