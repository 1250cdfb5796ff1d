//! Process-wide services
//!
//! The map surface, positioning source, and command interpreter are
//! initialized once and injected wherever needed; there is no ambient
//! global lookup.

use crate::app::position::PositioningService;
use crate::map::MapSurface;
use crate::nlp::CommandInterpreter;
use std::sync::Arc;
use tracing::info;

pub struct Services {
    map: Arc<dyn MapSurface>,
    positioning: Arc<PositioningService>,
    interpreter: Arc<dyn CommandInterpreter>,
}

impl Services {
    /// Initialize the service container
    pub fn init(map: Arc<dyn MapSurface>, interpreter: Arc<dyn CommandInterpreter>) -> Self {
        info!("Services initialized");
        Self {
            map,
            positioning: Arc::new(PositioningService::new()),
            interpreter,
        }
    }

    pub fn map(&self) -> Arc<dyn MapSurface> {
        self.map.clone()
    }

    pub fn positioning(&self) -> &PositioningService {
        &self.positioning
    }

    pub fn interpreter(&self) -> Arc<dyn CommandInterpreter> {
        self.interpreter.clone()
    }

    /// Stop everything with a run lifecycle
    pub fn shutdown(&self) {
        self.positioning.stop();
        info!("Services shut down");
    }
}
