use anyhow::Result;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use voicemap::app::permissions::{ensure_granted, GrantAllGate};
use voicemap::app::{ActivityShell, Services};
use voicemap::map::LoggingMapSurface;
use voicemap::nlp::{InterpreterSettings, LoggingInterpreter};
use voicemap::speech::{
    EngineContext, EngineEvent, RecognitionRequest, SpeechConfig, SpeechEngine,
    SpeechEngineFactory, SpeechLifecycleController,
};

/// Engine stand-in until a platform recognizer backend is linked.
/// Accepts every request and never produces events.
struct UnavailableEngine;

impl SpeechEngine for UnavailableEngine {
    fn start_listening(&mut self, request: &RecognitionRequest) -> voicemap::Result<()> {
        info!(
            "Recognition request submitted (locale {}, {} alternatives)",
            request.locale, request.max_alternatives
        );
        Ok(())
    }

    fn stop_listening(&mut self) -> voicemap::Result<()> {
        Ok(())
    }

    fn cancel(&mut self) -> voicemap::Result<()> {
        Ok(())
    }
}

struct UnavailableEngineFactory;

impl SpeechEngineFactory for UnavailableEngineFactory {
    fn create(
        &self,
        _context: &EngineContext,
        _events: crossbeam_channel::Sender<EngineEvent>,
    ) -> voicemap::Result<Box<dyn SpeechEngine>> {
        Ok(Box::new(UnavailableEngine))
    }
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "voicemap=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting voicemap");

    // A denied required permission terminates with a notice
    if let Err(e) = ensure_granted(&GrantAllGate) {
        eprintln!("{}", e.user_message());
        std::process::exit(1);
    }

    let interpreter = Arc::new(LoggingInterpreter::new(InterpreterSettings::default()));
    let services = Arc::new(Services::init(
        Arc::new(LoggingMapSurface),
        interpreter.clone(),
    ));

    let controller = Arc::new(SpeechLifecycleController::new(
        SpeechConfig::default(),
        EngineContext::new("voicemap-main"),
        Arc::new(UnavailableEngineFactory),
        interpreter,
    ));

    let pump = SpeechLifecycleController::spawn_event_pump(controller.clone());

    let shell = ActivityShell::new(services, controller);
    shell.wire();

    info!("Ready, waiting for the trigger key");

    // The host platform delivers key, gesture, and position events
    // here; nothing to drive in a bare process, so shut down cleanly.
    shell.shutdown();
    let _ = pump.join();

    Ok(())
}
