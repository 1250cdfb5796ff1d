//! Position fixes and listener registration
//!
//! Listeners are held in a registry that hands out explicit
//! deregistration handles; the host deregisters itself on teardown
//! instead of relying on a non-owning back-reference being reclaimed.

use crate::map::GeoCoordinate;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use tracing::{debug, info};

/// How the fix was acquired
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationMethod {
    Gps,
    Network,
    /// GPS, network, and indoor positioning combined
    GpsNetworkIndoor,
}

/// One position update
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionFix {
    pub coordinate: GeoCoordinate,
    pub method: LocationMethod,
}

pub trait PositionListener: Send + Sync {
    fn on_position_updated(&self, fix: PositionFix);
}

type ListenerMap = Mutex<HashMap<u64, Arc<dyn PositionListener>>>;

/// Registry of position listeners with explicit deregistration
#[derive(Default)]
pub struct PositionListenerRegistry {
    listeners: Arc<ListenerMap>,
    next_id: AtomicU64,
}

impl PositionListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener; the returned handle deregisters it
    pub fn register(&self, listener: Arc<dyn PositionListener>) -> RegistrationHandle {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.listeners.lock().insert(id, listener);
        debug!("Position listener {} registered", id);
        RegistrationHandle {
            id,
            listeners: Arc::downgrade(&self.listeners),
        }
    }

    /// Deliver a fix to every registered listener
    pub fn publish(&self, fix: PositionFix) {
        for listener in self.listeners.lock().values() {
            listener.on_position_updated(fix);
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.lock().is_empty()
    }
}

/// Capability to remove one registered listener.
///
/// Deregistration happens on [`deregister`](Self::deregister) or on
/// drop, whichever comes first.
pub struct RegistrationHandle {
    id: u64,
    listeners: Weak<ListenerMap>,
}

impl RegistrationHandle {
    pub fn deregister(&self) {
        if let Some(listeners) = self.listeners.upgrade() {
            if listeners.lock().remove(&self.id).is_some() {
                debug!("Position listener {} deregistered", self.id);
            }
        }
    }
}

impl Drop for RegistrationHandle {
    fn drop(&mut self) {
        self.deregister();
    }
}

/// Position-fix source with an explicit run lifecycle
#[derive(Default)]
pub struct PositioningService {
    registry: PositionListenerRegistry,
    running: AtomicBool,
    method: Mutex<Option<LocationMethod>>,
}

impl PositioningService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn registry(&self) -> &PositionListenerRegistry {
        &self.registry
    }

    /// Begin acquiring fixes with the given method
    pub fn start(&self, method: LocationMethod) {
        self.running.store(true, Ordering::SeqCst);
        *self.method.lock() = Some(method);
        info!("Positioning started ({:?})", method);
    }

    /// Stop acquiring fixes
    pub fn stop(&self) {
        if self.running.swap(false, Ordering::SeqCst) {
            info!("Positioning stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Method selected by the last `start`
    pub fn method(&self) -> Option<LocationMethod> {
        *self.method.lock()
    }

    /// Feed one fix from the platform location source.
    /// Dropped while the service is stopped.
    pub fn on_fix(&self, fix: PositionFix) {
        if !self.is_running() {
            debug!("Dropping position fix, service stopped");
            return;
        }
        self.registry.publish(fix);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct CountingListener(Mutex<usize>);

    impl PositionListener for CountingListener {
        fn on_position_updated(&self, _fix: PositionFix) {
            *self.0.lock() += 1;
        }
    }

    fn fix() -> PositionFix {
        PositionFix {
            coordinate: GeoCoordinate::new(52.53, 13.38),
            method: LocationMethod::GpsNetworkIndoor,
        }
    }

    #[test]
    fn test_registered_listener_receives_fixes() {
        let registry = PositionListenerRegistry::new();
        let listener = Arc::new(CountingListener(Mutex::new(0)));
        let _handle = registry.register(listener.clone());

        registry.publish(fix());
        registry.publish(fix());

        assert_eq!(*listener.0.lock(), 2);
    }

    #[test]
    fn test_deregistered_listener_is_released() {
        let registry = PositionListenerRegistry::new();
        let listener = Arc::new(CountingListener(Mutex::new(0)));
        let handle = registry.register(listener.clone());

        handle.deregister();
        registry.publish(fix());

        assert_eq!(*listener.0.lock(), 0);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_dropping_handle_deregisters() {
        let registry = PositionListenerRegistry::new();
        {
            let _handle = registry.register(Arc::new(CountingListener(Mutex::new(0))));
            assert_eq!(registry.len(), 1);
        }
        assert!(registry.is_empty());
    }

    #[test]
    fn test_stopped_service_drops_fixes() {
        let service = PositioningService::new();
        let listener = Arc::new(CountingListener(Mutex::new(0)));
        let _handle = service.registry().register(listener.clone());

        service.on_fix(fix());
        assert_eq!(*listener.0.lock(), 0);

        service.start(LocationMethod::GpsNetworkIndoor);
        assert_eq!(service.method(), Some(LocationMethod::GpsNetworkIndoor));
        service.on_fix(fix());
        assert_eq!(*listener.0.lock(), 1);

        service.stop();
        service.on_fix(fix());
        assert_eq!(*listener.0.lock(), 1);
    }
}
