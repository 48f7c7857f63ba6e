mod maplibre;

pub use maplibre::MapLibreMap;

use serde_json::Value;

use crate::constants::{DIMMED_LINE_OPACITY, LINE_WIDTH, MAP_CENTER, MAP_ZOOM};

/// Display state of a drawn line layer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerState {
    pub visible: bool,
    pub opacity: f64,
}

impl LayerState {
    pub const SHOWN: Self = Self {
        visible: true,
        opacity: 1.0,
    };
    pub const DIMMED: Self = Self {
        visible: true,
        opacity: DIMMED_LINE_OPACITY,
    };
    pub const HIDDEN: Self = Self {
        visible: false,
        opacity: DIMMED_LINE_OPACITY,
    };

    /// State for a line toggled `on`; toggled-off lines are dimmed or removed
    #[must_use]
    pub fn for_toggle(on: bool, dim_when_off: bool) -> Self {
        match (on, dim_when_off) {
            (true, _) => Self::SHOWN,
            (false, true) => Self::DIMMED,
            (false, false) => Self::HIDDEN,
        }
    }
}

/// A line layer drawing a GeoJSON source, colored by each feature's `color` property
#[derive(Debug, Clone, PartialEq)]
pub struct LineLayer {
    pub id: String,
    pub source: String,
    pub width: f64,
}

impl LineLayer {
    #[must_use]
    pub fn new(id: String, source: String) -> Self {
        Self {
            id,
            source,
            width: LINE_WIDTH,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MarkerSpec {
    /// `[lng, lat]`
    pub position: [f64; 2],
    pub bearing: f64,
    pub popup_text: String,
    pub color: String,
    pub visible: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub center: [f64; 2],
    pub zoom: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            center: MAP_CENTER,
            zoom: MAP_ZOOM,
        }
    }
}

/// Drawing operations the viewer needs from a map widget.
///
/// Implementations are handles onto a map owned elsewhere, so every method
/// takes `&self`.
pub trait MapSurface {
    type Marker: Clone;

    fn has_source(&self, id: &str) -> bool;

    /// Add a GeoJSON source holding `data`
    ///
    /// # Errors
    ///
    /// Returns an error if the map rejects the source
    fn add_geojson_source(&self, id: &str, data: &Value) -> Result<(), String>;

    fn has_layer(&self, id: &str) -> bool;

    /// # Errors
    ///
    /// Returns an error if the map rejects the layer
    fn add_line_layer(&self, layer: &LineLayer) -> Result<(), String>;

    fn set_layer_state(&self, layer_id: &str, state: LayerState);

    /// # Errors
    ///
    /// Returns an error if the marker cannot be created
    fn add_marker(&self, spec: &MarkerSpec) -> Result<Self::Marker, String>;

    fn move_marker(&self, marker: &Self::Marker, position: [f64; 2], bearing: f64);

    fn set_marker_visible(&self, marker: &Self::Marker, visible: bool);

    fn remove_marker(&self, marker: &Self::Marker);

    fn jump_to(&self, camera: Camera);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingMap;

    #[test]
    fn test_default_camera_is_downtown() {
        let map = RecordingMap::default();
        map.jump_to(Camera::default());
        assert_eq!(
            map.camera(),
            Some(Camera {
                center: MAP_CENTER,
                zoom: MAP_ZOOM
            })
        );
    }

    #[test]
    fn test_layer_state_for_toggle() {
        assert_eq!(LayerState::for_toggle(true, true), LayerState::SHOWN);
        assert_eq!(LayerState::for_toggle(true, false), LayerState::SHOWN);
        assert_eq!(LayerState::for_toggle(false, true).opacity, DIMMED_LINE_OPACITY);
        assert!(LayerState::for_toggle(false, true).visible);
        assert!(!LayerState::for_toggle(false, false).visible);
    }
}
