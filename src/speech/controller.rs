//! Speech input lifecycle state machine
//!
//! The controller owns the engine handle and serializes every state
//! mutation across the public API and the engine's callback thread. A
//! `start()` stamps a fresh session token; the terminal event carrying
//! that token resolves the session back to idle. Engine failures are
//! classified and logged here and never propagate further.

use crate::nlp::CommandInterpreter;
use crate::speech::config::SpeechConfig;
use crate::speech::engine::{
    EngineContext, EngineEvent, RecognitionRequest, SessionToken, SpeechEngineFactory,
};
use crate::speech::error::RecognitionErrorKind;
use crate::speech::handle::SpeechEngineHandle;
use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Whether a listening session is in flight
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListeningState {
    /// No session in flight
    Idle,
    /// A recognition request has been submitted and not yet resolved
    Listening,
}

/// Result of one listening session, produced by the terminal event
#[derive(Debug, Clone, PartialEq)]
pub enum RecognitionOutcome {
    /// Candidate transcripts, best first
    Transcripts(Vec<String>),
    /// The engine failed; classified and logged
    RecognitionError(RecognitionErrorKind),
    /// The session finished without hearing anything usable
    NoSpeech,
}

struct SessionState {
    listening: ListeningState,
    current: Option<SessionToken>,
}

pub struct SpeechLifecycleController {
    config: SpeechConfig,

    /// Context the engine resource should be bound to
    context: Mutex<EngineContext>,

    /// Exclusive owner of the engine resource
    handle: SpeechEngineHandle,

    /// Receives the best transcript of each session
    interpreter: Arc<dyn CommandInterpreter>,

    /// Listening flag and current session, one critical section for
    /// both the public API and the event path
    state: Mutex<SessionState>,

    /// Monotonic session token source
    next_session: AtomicU64,

    /// Handed to the engine at creation, events come back on `event_rx`
    event_tx: Sender<EngineEvent>,
    event_rx: Receiver<EngineEvent>,

    /// Keeps the event pump thread alive
    pump_running: AtomicBool,
}

impl SpeechLifecycleController {
    pub fn new(
        config: SpeechConfig,
        context: EngineContext,
        factory: Arc<dyn SpeechEngineFactory>,
        interpreter: Arc<dyn CommandInterpreter>,
    ) -> Self {
        let (event_tx, event_rx) = bounded(64);

        Self {
            config,
            context: Mutex::new(context),
            handle: SpeechEngineHandle::new(factory),
            interpreter,
            state: Mutex::new(SessionState {
                listening: ListeningState::Idle,
                current: None,
            }),
            next_session: AtomicU64::new(1),
            event_tx,
            event_rx,
            pump_running: AtomicBool::new(false),
        }
    }

    /// Current listening state
    pub fn state(&self) -> ListeningState {
        self.state.lock().listening
    }

    pub fn is_listening(&self) -> bool {
        self.state() == ListeningState::Listening
    }

    /// Start a listening session.
    ///
    /// A no-op while a session is already in flight; the single
    /// hardware trigger can fire repeatedly before the first session
    /// resolves, and the engine has no synchronous way to be asked.
    /// Creation or submission failures are logged and force a full
    /// teardown; they never propagate.
    ///
    /// Returns whether a new session was started.
    pub fn start(&self) -> bool {
        let mut state = self.state.lock();
        if state.listening == ListeningState::Listening {
            debug!("Already listening, ignoring start");
            return false;
        }

        let context = self.context.lock().clone();
        if let Err(e) = self.handle.ensure_created(&context, self.event_tx.clone()) {
            error!("Failed to create speech engine: {}", e);
            self.destroy_locked(&mut state);
            return false;
        }

        let token = SessionToken(self.next_session.fetch_add(1, Ordering::SeqCst));
        let request = RecognitionRequest::from_config(&self.config, token);

        match self
            .handle
            .with_engine(|engine| engine.start_listening(&request))
        {
            Ok(()) => {
                state.listening = ListeningState::Listening;
                state.current = Some(token);
                info!("Listening started (session {})", token.0);
                true
            }
            Err(e) => {
                error!("Failed to submit recognition request: {}", e);
                self.destroy_locked(&mut state);
                false
            }
        }
    }

    /// Halt capture and return whether a session was active.
    ///
    /// Tolerant of being called while already idle. The session token
    /// is kept: an error for the halted session may still arrive and
    /// must be classified.
    pub fn stop(&self) -> bool {
        let mut state = self.state.lock();
        self.stop_locked(&mut state)
    }

    /// Stop and release the engine resource entirely.
    ///
    /// Afterwards the controller is equivalent to a fresh instance;
    /// any late terminal callback becomes a no-op.
    pub fn destroy(&self) {
        let mut state = self.state.lock();
        self.destroy_locked(&mut state);
    }

    /// Release the resource, not merely suspend it
    pub fn pause(&self) {
        self.destroy();
    }

    /// Rebind the engine to a new owning context.
    ///
    /// No-op when the context is unchanged; otherwise exactly one
    /// teardown followed by exactly one recreate.
    pub fn resume(&self, new_context: EngineContext) {
        let mut state = self.state.lock();
        let mut context = self.context.lock();
        if *context == new_context {
            debug!("Resume with unchanged context '{}', nothing to do", context.id());
            return;
        }

        self.destroy_locked(&mut state);
        *context = new_context;
        if let Err(e) = self.handle.ensure_created(&context, self.event_tx.clone()) {
            error!("Failed to recreate speech engine: {}", e);
        }
    }

    /// Abandon the in-flight session without producing a result.
    ///
    /// Best-effort; only a terminal event moves the state back to idle.
    pub fn cancel(&self) {
        if let Err(e) = self.handle.with_engine(|engine| engine.cancel()) {
            debug!("Cancel with no engine resource: {}", e);
        }
    }

    fn stop_locked(&self, state: &mut SessionState) -> bool {
        if self.handle.is_created() {
            if let Err(e) = self.handle.with_engine(|engine| engine.stop_listening()) {
                warn!("Failed to halt capture: {}", e);
            }
        }
        let was_active = state.listening == ListeningState::Listening;
        state.listening = ListeningState::Idle;
        was_active
    }

    fn destroy_locked(&self, state: &mut SessionState) {
        self.stop_locked(state);
        self.handle.teardown();
        state.current = None;
    }

    /// Apply one engine event to the state machine.
    ///
    /// Events for anything but the current session are dropped, which
    /// covers terminal callbacks arriving after `destroy()` or after a
    /// newer `start()`. Returns the session outcome for terminal
    /// events.
    pub fn handle_event(&self, event: EngineEvent) -> Option<RecognitionOutcome> {
        let mut state = self.state.lock();

        let current = match state.current {
            Some(token) => token,
            None => {
                debug!("Dropping engine event, no session owns the resource");
                return None;
            }
        };
        if event.session() != current {
            debug!(
                "Dropping event for superseded session {} (current {})",
                event.session().0,
                current.0
            );
            return None;
        }

        match event {
            EngineEvent::ReadyForSpeech { .. } => {
                info!("Ready for the user to start speaking");
                None
            }
            EngineEvent::BeginningOfSpeech { .. } => {
                info!("Speech has begun");
                None
            }
            EngineEvent::BufferReceived { .. } => {
                debug!("Audio buffer received");
                None
            }
            EngineEvent::PartialResults { .. } => {
                debug!("Partial results received");
                None
            }
            EngineEvent::EndOfSpeech { .. } => {
                info!("Speech has ended");
                None
            }
            EngineEvent::Results { transcripts, .. } => {
                state.listening = ListeningState::Idle;
                if transcripts.is_empty() {
                    info!("Recognition finished without transcripts");
                    return Some(RecognitionOutcome::NoSpeech);
                }

                debug!("Candidate transcripts: {:?}", transcripts);
                let best = &transcripts[0];
                match self.interpreter.understand(best) {
                    Ok(ack) => info!("Understood '{}': {:?}", best, ack),
                    Err(e) => warn!("Interpreter failed on '{}': {}", best, e),
                }
                Some(RecognitionOutcome::Transcripts(transcripts))
            }
            EngineEvent::Error { code, .. } => {
                let kind = RecognitionErrorKind::classify(code);
                warn!("Recognition listener caught {}", kind);
                state.listening = ListeningState::Idle;
                Some(RecognitionOutcome::RecognitionError(kind))
            }
        }
    }

    /// Spawn the consumer thread draining engine events into
    /// [`handle_event`](Self::handle_event).
    pub fn spawn_event_pump(controller: Arc<Self>) -> JoinHandle<()> {
        controller.pump_running.store(true, Ordering::SeqCst);
        let event_rx = controller.event_rx.clone();

        thread::spawn(move || {
            info!("Engine event pump started");

            loop {
                match event_rx.recv_timeout(Duration::from_millis(50)) {
                    Ok(event) => {
                        controller.handle_event(event);
                    }
                    Err(RecvTimeoutError::Timeout) => {
                        if !controller.pump_running.load(Ordering::SeqCst) {
                            break;
                        }
                    }
                    Err(RecvTimeoutError::Disconnected) => {
                        warn!("Engine event channel disconnected");
                        break;
                    }
                }
            }

            info!("Engine event pump stopped");
        })
    }

    /// Destroy the session and let the event pump wind down
    pub fn shutdown(&self) {
        self.destroy();
        self.pump_running.store(false, Ordering::SeqCst);
    }
}
