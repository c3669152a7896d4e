use std::path::PathBuf;
use thiserror::Error;

/// Errors that end the program before or after the show.
#[derive(Error, Debug)]
pub enum Error {
    #[error("terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not read config file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("invalid hex color {0:?}, expected RRGGBB (e.g. 1a1b26)")]
    InvalidColor(String),

    #[error("{0}")]
    Usage(String),
}

/// Why a play request was refused. Never fatal to the show.
#[derive(Error, Debug)]
pub enum AudioError {
    #[error("no music track configured")]
    NoTrack,

    #[error("audio support not compiled in")]
    Unsupported,

    #[error("could not open {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("audio output unavailable: {0}")]
    Output(String),

    #[error("could not decode track: {0}")]
    Decode(String),
}
