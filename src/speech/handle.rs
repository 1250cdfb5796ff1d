//! Exclusive ownership of the speech engine resource
//!
//! The handle creates the engine lazily, at most once per owning
//! context, and releases it explicitly. Creation and teardown share a
//! single critical section because engine callbacks run on a thread of
//! their own.

use crate::speech::engine::{EngineContext, EngineEvent, SpeechEngine, SpeechEngineFactory};
use crate::{Result, VoicemapError};
use crossbeam_channel::Sender;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, info};

struct HandleInner {
    engine: Option<Box<dyn SpeechEngine>>,
    context: Option<EngineContext>,
}

pub struct SpeechEngineHandle {
    factory: Arc<dyn SpeechEngineFactory>,
    inner: Mutex<HandleInner>,
}

impl SpeechEngineHandle {
    pub fn new(factory: Arc<dyn SpeechEngineFactory>) -> Self {
        Self {
            factory,
            inner: Mutex::new(HandleInner {
                engine: None,
                context: None,
            }),
        }
    }

    /// Create the engine resource as needed.
    ///
    /// Idempotent: a no-op whenever a resource already exists. Context
    /// rebinding is `resume`'s job, not this method's.
    pub fn ensure_created(
        &self,
        context: &EngineContext,
        events: Sender<EngineEvent>,
    ) -> Result<()> {
        let mut inner = self.inner.lock();
        if inner.engine.is_some() {
            debug!("Engine resource already exists, skipping creation");
            return Ok(());
        }

        let engine = self.factory.create(context, events)?;
        inner.engine = Some(engine);
        inner.context = Some(context.clone());
        info!("Speech engine created for context '{}'", context.id());
        Ok(())
    }

    /// Release the engine resource unconditionally.
    ///
    /// Safe to call when no resource exists.
    pub fn teardown(&self) {
        let mut inner = self.inner.lock();
        if inner.engine.take().is_some() {
            info!("Speech engine released");
        }
        inner.context = None;
    }

    /// Owning context of the live resource, if any
    pub fn context(&self) -> Option<EngineContext> {
        self.inner.lock().context.clone()
    }

    /// Whether a resource currently exists
    pub fn is_created(&self) -> bool {
        self.inner.lock().engine.is_some()
    }

    /// Run a closure against the live engine under the lock
    pub fn with_engine<T>(
        &self,
        f: impl FnOnce(&mut dyn SpeechEngine) -> Result<T>,
    ) -> Result<T> {
        let mut inner = self.inner.lock();
        match inner.engine.as_deref_mut() {
            Some(engine) => f(engine),
            None => Err(VoicemapError::EngineError(
                "No engine resource exists".to_string(),
            )),
        }
    }
}

impl Drop for SpeechEngineHandle {
    fn drop(&mut self) {
        self.teardown();
    }
}
