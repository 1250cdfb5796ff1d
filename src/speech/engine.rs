//! Speech engine abstraction
//!
//! The native recognizer sits behind the [`SpeechEngine`] trait: calls
//! submit work and return immediately, and everything the engine has
//! to say comes back asynchronously as [`EngineEvent`]s on a channel
//! owned by the controller. A [`SpeechEngineFactory`] builds engines
//! bound to an [`EngineContext`]; building one claims the system
//! audio-capture resource.

use crate::speech::config::SpeechConfig;
use crate::Result;
use crossbeam_channel::Sender;

/// Identity of the environment an engine resource was created against.
///
/// Compared for equality when `resume` decides whether the resource
/// must be rebuilt.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EngineContext(String);

impl EngineContext {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn id(&self) -> &str {
        &self.0
    }
}

/// Monotonic token identifying one listening session.
///
/// Every `start()` stamps a fresh token; events carrying a token other
/// than the current session are dropped, which makes late terminal
/// callbacks for superseded sessions harmless.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionToken(pub u64);

/// Parameters submitted to the engine for one session
#[derive(Debug, Clone)]
pub struct RecognitionRequest {
    /// BCP-47 tag of the recognition language
    pub locale: String,

    /// Whether partial hypotheses should be streamed
    pub partial_results: bool,

    /// Upper bound on alternative transcripts
    pub max_alternatives: usize,

    /// Session this request belongs to
    pub session: SessionToken,
}

impl RecognitionRequest {
    /// Build a request from the fixed config for the given session
    pub fn from_config(config: &SpeechConfig, session: SessionToken) -> Self {
        Self {
            locale: config.locale.clone(),
            partial_results: config.partial_results,
            max_alternatives: config.max_alternatives,
            session,
        }
    }
}

/// Events delivered by the engine on its callback thread
#[derive(Debug, Clone)]
pub enum EngineEvent {
    /// Engine is ready for the user to start speaking
    ReadyForSpeech { session: SessionToken },

    /// Speech has begun
    BeginningOfSpeech { session: SessionToken },

    /// An audio buffer was captured
    BufferReceived { session: SessionToken },

    /// A partial hypothesis is available
    PartialResults { session: SessionToken },

    /// Speech has ended, final result pending
    EndOfSpeech { session: SessionToken },

    /// Terminal: candidate transcripts, best first
    Results {
        session: SessionToken,
        transcripts: Vec<String>,
    },

    /// Terminal: the engine failed with a raw error code
    Error { session: SessionToken, code: i32 },
}

impl EngineEvent {
    /// Session the event belongs to
    pub fn session(&self) -> SessionToken {
        match self {
            EngineEvent::ReadyForSpeech { session }
            | EngineEvent::BeginningOfSpeech { session }
            | EngineEvent::BufferReceived { session }
            | EngineEvent::PartialResults { session }
            | EngineEvent::EndOfSpeech { session }
            | EngineEvent::Results { session, .. }
            | EngineEvent::Error { session, .. } => *session,
        }
    }

    /// Whether this event resolves the session
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            EngineEvent::Results { .. } | EngineEvent::Error { .. }
        )
    }
}

/// The native recognizer resource.
///
/// All methods submit asynchronously and return immediately; results
/// and errors arrive on the event channel the engine was created with.
pub trait SpeechEngine: Send {
    /// Submit a recognition request and begin capturing audio
    fn start_listening(&mut self, request: &RecognitionRequest) -> Result<()>;

    /// Ask the engine to halt capture; a terminal event may still follow
    fn stop_listening(&mut self) -> Result<()>;

    /// Abandon the in-flight session without producing a result.
    /// Best-effort: a terminal event may or may not still arrive.
    fn cancel(&mut self) -> Result<()>;
}

/// Builds engine instances bound to an owning context.
///
/// Creating an engine allocates the system audio-capture resource, so
/// at most one live engine may exist per factory at a time; the handle
/// enforces that by always tearing down before recreating.
pub trait SpeechEngineFactory: Send + Sync {
    fn create(
        &self,
        context: &EngineContext,
        events: Sender<EngineEvent>,
    ) -> Result<Box<dyn SpeechEngine>>;
}
