//! Command interpreter boundary
//!
//! The interpreter turns a transcript into a place search or map
//! command and reports search results back through [`SearchListener`].
//! The actual understanding is an external collaborator; this module
//! only fixes the interface the speech controller and the host talk to.

use crate::map::GeoCoordinate;
use crate::Result;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// Acknowledgement returned by `understand`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterpreterAck {
    Understood,
    NotUnderstood,
}

/// Settings applied when the interpreter is initialized
#[derive(Debug, Clone)]
pub struct InterpreterSettings {
    /// Speak confirmations back to the user
    pub talk_back: bool,

    /// Spoken confirmation volume, 0..=100
    pub speech_volume: u8,

    /// Echo the recognized command before acting on it
    pub repeat_after_me: bool,
}

impl Default for InterpreterSettings {
    fn default() -> Self {
        Self {
            talk_back: true,
            speech_volume: 33,
            repeat_after_me: true,
        }
    }
}

/// What kind of search a transcript resolved to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    /// Search by place category
    Category,
    /// Reverse-geocode a coordinate
    Reverse,
    /// Free-text place search
    Text,
}

/// Search failure reported by the interpreter backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchError(pub String);

impl std::fmt::Display for SearchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One place matching a search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceResult {
    pub id: Uuid,
    pub title: String,
    pub position: GeoCoordinate,
}

impl PlaceResult {
    pub fn new(title: impl Into<String>, position: GeoCoordinate) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            position,
        }
    }
}

/// Completed search delivered to listeners
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub error: Option<SearchError>,
    pub kind: QueryKind,
    pub places: Vec<PlaceResult>,
}

/// Receives search life-cycle notifications from the interpreter
pub trait SearchListener: Send + Sync {
    fn on_search_started(&self, kind: QueryKind);
    fn on_search_complete(&self, outcome: SearchOutcome);
}

/// The external understanding service
pub trait CommandInterpreter: Send + Sync {
    /// Resolve a transcript to a place search or map command
    fn understand(&self, transcript: &str) -> Result<InterpreterAck>;

    /// Attach a listener for search results
    fn add_search_listener(&self, listener: Arc<dyn SearchListener>);
}

/// Interpreter stand-in that logs and acknowledges every transcript.
///
/// A real place-search backend plugs in behind `CommandInterpreter`;
/// this keeps the binary runnable without one.
#[derive(Default)]
pub struct LoggingInterpreter {
    listeners: Mutex<Vec<Arc<dyn SearchListener>>>,
}

impl LoggingInterpreter {
    pub fn new(settings: InterpreterSettings) -> Self {
        info!(
            "Interpreter initialized (talk_back={}, volume={}, repeat_after_me={})",
            settings.talk_back, settings.speech_volume, settings.repeat_after_me
        );
        Self {
            listeners: Mutex::new(Vec::new()),
        }
    }

    /// Deliver a completed search to every attached listener
    pub fn publish(&self, outcome: SearchOutcome) {
        for listener in self.listeners.lock().iter() {
            listener.on_search_complete(outcome.clone());
        }
    }
}

impl CommandInterpreter for LoggingInterpreter {
    fn understand(&self, transcript: &str) -> Result<InterpreterAck> {
        info!("Understanding transcript: '{}'", transcript);
        Ok(InterpreterAck::Understood)
    }

    fn add_search_listener(&self, listener: Arc<dyn SearchListener>) {
        self.listeners.lock().push(listener);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = InterpreterSettings::default();
        assert!(settings.talk_back);
        assert_eq!(settings.speech_volume, 33);
        assert!(settings.repeat_after_me);
    }

    #[test]
    fn test_logging_interpreter_acknowledges() {
        let interpreter = LoggingInterpreter::default();
        let ack = interpreter.understand("set marker at library").unwrap();
        assert_eq!(ack, InterpreterAck::Understood);
    }

    #[test]
    fn test_publish_reaches_listeners() {
        struct Counting(Mutex<usize>);
        impl SearchListener for Counting {
            fn on_search_started(&self, _kind: QueryKind) {}
            fn on_search_complete(&self, _outcome: SearchOutcome) {
                *self.0.lock() += 1;
            }
        }

        let interpreter = LoggingInterpreter::default();
        let listener = Arc::new(Counting(Mutex::new(0)));
        interpreter.add_search_listener(listener.clone());

        interpreter.publish(SearchOutcome {
            error: None,
            kind: QueryKind::Text,
            places: vec![],
        });

        assert_eq!(*listener.0.lock(), 1);
    }
}
