//! Map surface boundary
//!
//! Rendering and camera control live in the platform mapping SDK; this
//! crate only talks to it through [`MapSurface`].

use serde::{Deserialize, Serialize};
use tracing::info;

/// A WGS84 coordinate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoCoordinate {
    pub lat: f64,
    pub lon: f64,
}

impl GeoCoordinate {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// A marker to render at a coordinate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapMarker {
    pub position: GeoCoordinate,
}

impl MapMarker {
    pub fn at(position: GeoCoordinate) -> Self {
        Self { position }
    }
}

/// Camera movement style for re-centering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraMove {
    /// Animate linearly to the new center
    Linear,
    /// Jump without animation
    None,
}

/// The rendering surface provided by the mapping SDK
pub trait MapSurface: Send + Sync {
    /// Re-center the camera
    fn set_center(&self, center: GeoCoordinate, movement: CameraMove);

    /// Render one marker
    fn add_marker(&self, marker: MapMarker);

    /// Toggle the own-position indicator and its accuracy ring
    fn set_position_indicator(&self, visible: bool, accuracy_ring: bool);
}

/// Surface stand-in that only logs, used until a real SDK is wired in
pub struct LoggingMapSurface;

impl MapSurface for LoggingMapSurface {
    fn set_center(&self, center: GeoCoordinate, movement: CameraMove) {
        info!(
            "Map center -> ({:.5}, {:.5}) [{:?}]",
            center.lat, center.lon, movement
        );
    }

    fn add_marker(&self, marker: MapMarker) {
        info!(
            "Marker at ({:.5}, {:.5})",
            marker.position.lat, marker.position.lon
        );
    }

    fn set_position_indicator(&self, visible: bool, accuracy_ring: bool) {
        info!(
            "Position indicator visible={} accuracy_ring={}",
            visible, accuracy_ring
        );
    }
}
