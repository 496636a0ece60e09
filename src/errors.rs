use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShorelineError {
    // Config-related errors
    #[error("Failed to get config directory")]
    ConfigDirNotFound,

    #[error("Failed to create config directory: {0}")]
    ConfigDirCreationFailed(#[from] std::io::Error),

    #[error("Failed to serialize config: {0}")]
    SerializationFailed(#[from] toml::ser::Error),

    #[error("Failed to deserialize config: {0}")]
    DeserializationFailed(#[from] toml::de::Error),

    #[error("Config file not found at path: {path}")]
    ConfigFileNotFound { path: PathBuf },

    #[error("Invalid render settings: {reason}")]
    InvalidRenderSettings { reason: String },

    // World-related errors
    #[error("World file not found at path: {path}")]
    WorldFileNotFound { path: PathBuf },

    #[error("Corrupted world file: {reason}")]
    CorruptedWorldFile { reason: String },

    #[error("Invalid world data: {reason}")]
    InvalidWorldData { reason: String },

    // Output-related errors
    #[error("Failed to export frame: {0}")]
    ImageExportFailed(#[from] image::ImageError),
}

/// Result type alias for all fallible operations
pub type ShorelineResult<T> = Result<T, ShorelineError>;
