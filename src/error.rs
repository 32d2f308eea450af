//! Error types and handling for the Skypanel dashboard service

use thiserror::Error;

/// Main error type for the Skypanel application
#[derive(Error, Debug)]
pub enum SkypanelError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Non-success HTTP status from a weather-family endpoint
    #[error("Fetch error ({status}): {message}")]
    Fetch { status: u16, message: String },

    /// Failed AI call or an AI response with no extractable text
    #[error("AI error: {message}")]
    Ai { message: String },

    /// A manual AI submission while another is still in flight
    #[error("AI request already in flight")]
    AiBusy,

    /// A render chain invalidated by a newer trigger before it committed
    #[error("Render superseded by a newer request")]
    Superseded,

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// Transport-level errors from the HTTP client
    #[error("Network error: {source}")]
    Network {
        #[from]
        source: reqwest::Error,
    },
}

impl SkypanelError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new fetch error carrying the HTTP status
    pub fn fetch<S: Into<String>>(status: u16, message: S) -> Self {
        Self::Fetch {
            status,
            message: message.into(),
        }
    }

    /// Create a new AI error
    pub fn ai<S: Into<String>>(message: S) -> Self {
        Self::Ai {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            SkypanelError::Config { .. } => {
                "Configuration error. Please check your environment and API keys.".to_string()
            }
            SkypanelError::Fetch { .. } | SkypanelError::Network { .. } => {
                "Unable to reach the weather service. Please check your internet connection."
                    .to_string()
            }
            SkypanelError::Ai { message } => {
                format!("AI Error: {message}")
            }
            SkypanelError::AiBusy => {
                "An AI request is already running. Please wait for it to finish.".to_string()
            }
            SkypanelError::Superseded => {
                "This request was superseded by a newer one.".to_string()
            }
            SkypanelError::Validation { message } => {
                format!("Invalid input: {message}")
            }
            SkypanelError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
        }
    }
}
