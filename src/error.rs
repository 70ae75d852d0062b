//! Error types for bisara.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BisaraError {
    // Configuration errors
    #[error("Configuration file not found at {path}")]
    ConfigFileNotFound { path: String },

    #[error("Failed to parse configuration: {message}")]
    ConfigParse { message: String },

    #[error("Invalid configuration value for {key}: {message}")]
    ConfigInvalidValue { key: String, message: String },

    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    // Frame capture errors
    #[error("Video device not found: {device}")]
    VideoDeviceNotFound { device: String },

    #[error("Frame capture failed: {message}")]
    FrameCapture { message: String },

    // Hand detection errors
    #[error("Hand detector unavailable: {message}")]
    DetectorUnavailable { message: String },

    #[error("Hand detection failed: {message}")]
    Detection { message: String },

    // Classification errors
    #[error("Classifier model not found at {path}")]
    ModelNotFound { path: String },

    #[error("Classifier failed to load: {message}")]
    ClassifierLoad { message: String },

    #[error("Classifier inference failed: {message}")]
    Inference { message: String },

    // Speech synthesis errors
    #[error("Speech synthesis failed: {message}")]
    Speech { message: String },

    // Landmark replay errors
    #[error("Invalid landmark recording: {message}")]
    Replay { message: String },

    // General I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Generic error for cases not covered above
    #[error("{0}")]
    Other(String),
}

// Type alias for convenience
pub type Result<T> = std::result::Result<T, BisaraError>;
