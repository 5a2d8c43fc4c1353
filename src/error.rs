//! Error types for the natter client

use thiserror::Error;

/// Client errors, grouped by failure domain
#[derive(Error, Debug, Clone)]
pub enum NatterError {
    /// Microphone acquisition or capture error
    #[error("Audio device error: {0}")]
    AudioDeviceError(String),

    /// Audio encoding or buffering error
    #[error("Audio processing error: {0}")]
    AudioProcessingError(String),

    /// Network failure reaching the backend (connect, timeout, non-JSON body)
    #[error("Transport error: {0}")]
    TransportError(String),

    /// Channel communication error
    #[error("Channel error: {0}")]
    ChannelError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// File system I/O error
    #[error("IO error: {0}")]
    IOError(String),
}

impl From<std::io::Error> for NatterError {
    fn from(e: std::io::Error) -> Self {
        NatterError::IOError(e.to_string())
    }
}

impl From<reqwest::Error> for NatterError {
    fn from(e: reqwest::Error) -> Self {
        NatterError::TransportError(e.to_string())
    }
}

impl NatterError {
    /// The bare detail string, without the domain prefix `Display` adds.
    ///
    /// Status lines embed this directly (the prefix would read doubled
    /// next to the status text).
    pub fn detail(&self) -> &str {
        match self {
            NatterError::AudioDeviceError(d)
            | NatterError::AudioProcessingError(d)
            | NatterError::TransportError(d)
            | NatterError::ChannelError(d)
            | NatterError::ConfigError(d)
            | NatterError::IOError(d) => d,
        }
    }
}

/// Result type alias for natter operations
pub type Result<T> = std::result::Result<T, NatterError>;
