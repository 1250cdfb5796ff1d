//! Speech input lifecycle
//!
//! This module owns the microphone-backed speech engine and the state
//! machine that mediates between the push-to-talk trigger and the
//! engine's asynchronous recognition events.

pub mod config;
pub mod controller;
pub mod engine;
pub mod error;
pub mod handle;

// Re-export commonly used types
pub use config::SpeechConfig;
pub use controller::{ListeningState, RecognitionOutcome, SpeechLifecycleController};
pub use engine::{
    EngineContext, EngineEvent, RecognitionRequest, SessionToken, SpeechEngine,
    SpeechEngineFactory,
};
pub use error::RecognitionErrorKind;
pub use handle::SpeechEngineHandle;
