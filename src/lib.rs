pub mod app;
pub mod map;
pub mod nlp;
pub mod speech;

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum VoicemapError {
    #[error("Speech engine error: {0}")]
    EngineError(String),

    #[error("Required permission denied: {0}")]
    PermissionDenied(String),

    #[error("Interpreter error: {0}")]
    InterpreterError(String),

    #[error("Positioning error: {0}")]
    PositioningError(String),

    #[error("IO error: {0}")]
    IOError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Channel error: {0}")]
    ChannelError(String),
}

impl From<std::io::Error> for VoicemapError {
    fn from(e: std::io::Error) -> Self {
        VoicemapError::IOError(e.to_string())
    }
}

impl VoicemapError {
    /// Check if this error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            // A session can always be restarted after an engine failure
            VoicemapError::EngineError(_) => true,
            // A denied permission requires the user to re-launch
            VoicemapError::PermissionDenied(_) => false,
            VoicemapError::InterpreterError(_) => true,
            VoicemapError::PositioningError(_) => true,
            VoicemapError::IOError(_) => false,
            VoicemapError::ConfigError(_) => false,
            VoicemapError::ChannelError(_) => false,
        }
    }

    /// Get a user-friendly description
    pub fn user_message(&self) -> String {
        match self {
            VoicemapError::EngineError(_) => {
                "Speech recognition is unavailable. Please try again.".to_string()
            }
            VoicemapError::PermissionDenied(permission) => {
                format!("Required permission '{}' not granted, exiting", permission)
            }
            VoicemapError::InterpreterError(_) => {
                "Could not understand the command. Please try again.".to_string()
            }
            VoicemapError::PositioningError(_) => {
                "Location updates are unavailable.".to_string()
            }
            VoicemapError::IOError(_) => "File system error occurred.".to_string(),
            VoicemapError::ConfigError(_) => {
                "Configuration error. Please check settings.".to_string()
            }
            VoicemapError::ChannelError(_) => {
                "Internal communication error. Please restart the application.".to_string()
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, VoicemapError>;
