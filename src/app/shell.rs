//! Activity shell
//!
//! Thin glue between the host platform and the speech controller: the
//! hardware trigger key, the follow-then-release camera policy, and
//! marker rendering for search results.

use crate::app::position::{
    LocationMethod, PositionFix, PositionListener, RegistrationHandle,
};
use crate::app::services::Services;
use crate::map::{CameraMove, MapMarker, MapSurface};
use crate::nlp::{QueryKind, SearchListener, SearchOutcome};
use crate::speech::SpeechLifecycleController;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{info, warn};

/// The one hardware key that triggers listening (volume up)
pub const SPEECH_TRIGGER_KEY: u32 = 24;

/// Checks HW keys for the speech recognition trigger
pub fn key_activates_speech(key_code: u32) -> bool {
    key_code == SPEECH_TRIGGER_KEY
}

/// Re-centers the camera on every fix
struct CameraFollowListener {
    map: Arc<dyn MapSurface>,
}

impl PositionListener for CameraFollowListener {
    fn on_position_updated(&self, fix: PositionFix) {
        self.map.set_center(fix.coordinate, CameraMove::Linear);
    }
}

pub struct ActivityShell {
    services: Arc<Services>,
    controller: Arc<SpeechLifecycleController>,

    /// Held while the camera follows the position; released on the
    /// first pan and never re-acquired
    follow_registration: Mutex<Option<RegistrationHandle>>,
}

impl ActivityShell {
    pub fn new(services: Arc<Services>, controller: Arc<SpeechLifecycleController>) -> Arc<Self> {
        Arc::new(Self {
            services,
            controller,
            follow_registration: Mutex::new(None),
        })
    }

    /// Attach listeners and start position following
    pub fn wire(self: &Arc<Self>) {
        self.services
            .interpreter()
            .add_search_listener(self.clone() as Arc<dyn SearchListener>);

        let map = self.services.map();
        map.set_position_indicator(true, true);

        let follow = Arc::new(CameraFollowListener {
            map: self.services.map(),
        });
        let handle = self
            .services
            .positioning()
            .registry()
            .register(follow);
        *self.follow_registration.lock() = Some(handle);

        self.services
            .positioning()
            .start(LocationMethod::GpsNetworkIndoor);
    }

    /// Handle a hardware key release.
    ///
    /// Returns whether the event was consumed.
    pub fn on_key_up(&self, key_code: u32) -> bool {
        if key_activates_speech(key_code) {
            // Consume the event and listen to voice
            self.controller.start();
            true
        } else {
            false
        }
    }

    /// First pan gesture detaches the camera from the position stream
    pub fn on_pan_start(&self) {
        self.services.positioning().stop();
        if let Some(handle) = self.follow_registration.lock().take() {
            handle.deregister();
            info!("Camera follow released after pan");
        }
    }

    /// Release registrations and tear the controller down
    pub fn shutdown(&self) {
        if let Some(handle) = self.follow_registration.lock().take() {
            handle.deregister();
        }
        self.controller.shutdown();
        self.services.shutdown();
    }
}

impl SearchListener for ActivityShell {
    fn on_search_started(&self, kind: QueryKind) {
        info!("Search started ({:?})", kind);
    }

    fn on_search_complete(&self, outcome: SearchOutcome) {
        if let Some(error) = outcome.error {
            warn!("Search error: {}", error);
            return;
        }

        if outcome.places.is_empty() {
            info!("Search finished with no places");
            return;
        }

        let titles: Vec<&str> = outcome.places.iter().map(|p| p.title.as_str()).collect();
        info!("Found places: {}", titles.join(", "));

        let map = self.services.map();
        for place in &outcome.places {
            map.add_marker(MapMarker::at(place.position));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::GeoCoordinate;
    use crate::nlp::{
        CommandInterpreter, InterpreterAck, PlaceResult, SearchError,
    };
    use crate::speech::{
        EngineContext, EngineEvent, RecognitionRequest, SpeechConfig, SpeechEngine,
        SpeechEngineFactory,
    };
    use crate::Result;
    use crossbeam_channel::Sender;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct RecordingSurface {
        markers: Mutex<Vec<MapMarker>>,
        centers: Mutex<Vec<GeoCoordinate>>,
    }

    impl MapSurface for RecordingSurface {
        fn set_center(&self, center: GeoCoordinate, _movement: CameraMove) {
            self.centers.lock().push(center);
        }

        fn add_marker(&self, marker: MapMarker) {
            self.markers.lock().push(marker);
        }

        fn set_position_indicator(&self, _visible: bool, _accuracy_ring: bool) {}
    }

    struct NullEngine;

    impl SpeechEngine for NullEngine {
        fn start_listening(&mut self, _request: &RecognitionRequest) -> Result<()> {
            Ok(())
        }

        fn stop_listening(&mut self) -> Result<()> {
            Ok(())
        }

        fn cancel(&mut self) -> Result<()> {
            Ok(())
        }
    }

    struct NullFactory;

    impl SpeechEngineFactory for NullFactory {
        fn create(
            &self,
            _context: &EngineContext,
            _events: Sender<EngineEvent>,
        ) -> Result<Box<dyn SpeechEngine>> {
            Ok(Box::new(NullEngine))
        }
    }

    #[derive(Default)]
    struct CountingInterpreter {
        understood: AtomicUsize,
    }

    impl CommandInterpreter for CountingInterpreter {
        fn understand(&self, _transcript: &str) -> Result<InterpreterAck> {
            self.understood.fetch_add(1, Ordering::SeqCst);
            Ok(InterpreterAck::Understood)
        }

        fn add_search_listener(&self, _listener: Arc<dyn SearchListener>) {}
    }

    fn shell() -> (Arc<ActivityShell>, Arc<RecordingSurface>) {
        let surface = Arc::new(RecordingSurface::default());
        let interpreter = Arc::new(CountingInterpreter::default());
        let services = Arc::new(Services::init(surface.clone(), interpreter.clone()));
        let controller = Arc::new(SpeechLifecycleController::new(
            SpeechConfig::default(),
            EngineContext::new("shell"),
            Arc::new(NullFactory),
            interpreter,
        ));
        (ActivityShell::new(services, controller), surface)
    }

    fn place(title: &str, lat: f64, lon: f64) -> PlaceResult {
        PlaceResult::new(title, GeoCoordinate::new(lat, lon))
    }

    #[test]
    fn test_only_trigger_key_activates_speech() {
        assert!(key_activates_speech(SPEECH_TRIGGER_KEY));
        assert!(!key_activates_speech(25));
        assert!(!key_activates_speech(0));
    }

    #[test]
    fn test_trigger_key_is_consumed() {
        let (shell, _) = shell();
        assert!(shell.on_key_up(SPEECH_TRIGGER_KEY));
        assert!(!shell.on_key_up(7));
    }

    #[test]
    fn test_one_marker_per_result() {
        let (shell, surface) = shell();

        shell.on_search_complete(SearchOutcome {
            error: None,
            kind: QueryKind::Text,
            places: vec![
                place("Library", 52.5, 13.3),
                place("Library Annex", 52.6, 13.4),
            ],
        });

        assert_eq!(surface.markers.lock().len(), 2);
    }

    #[test]
    fn test_no_markers_for_empty_or_failed_search() {
        let (shell, surface) = shell();

        shell.on_search_complete(SearchOutcome {
            error: None,
            kind: QueryKind::Text,
            places: vec![],
        });
        shell.on_search_complete(SearchOutcome {
            error: Some(SearchError("backend unavailable".to_string())),
            kind: QueryKind::Category,
            places: vec![place("ignored", 0.0, 0.0)],
        });

        assert!(surface.markers.lock().is_empty());
    }

    #[test]
    fn test_follow_then_release() {
        let (shell, surface) = shell();
        shell.wire();

        let positioning = shell.services.positioning();
        positioning.on_fix(PositionFix {
            coordinate: GeoCoordinate::new(52.5, 13.3),
            method: LocationMethod::GpsNetworkIndoor,
        });
        assert_eq!(surface.centers.lock().len(), 1);

        shell.on_pan_start();
        assert!(!positioning.is_running());
        assert!(positioning.registry().is_empty());

        // Fixes after the pan no longer move the camera
        positioning.on_fix(PositionFix {
            coordinate: GeoCoordinate::new(52.6, 13.4),
            method: LocationMethod::GpsNetworkIndoor,
        });
        assert_eq!(surface.centers.lock().len(), 1);
    }

    #[test]
    fn test_shutdown_releases_everything() {
        let (shell, _) = shell();
        shell.wire();

        shell.shutdown();

        assert!(!shell.services.positioning().is_running());
        assert!(shell.services.positioning().registry().is_empty());
        assert!(!shell.controller.is_listening());
    }
}
