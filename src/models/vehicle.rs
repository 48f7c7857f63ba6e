use super::LineId;
use crate::api::VehicleResource;

/// A live vehicle report with usable coordinates
#[derive(Debug, Clone, PartialEq)]
pub struct Vehicle {
    pub id: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Degrees clockwise from north
    pub bearing: f64,
    pub label: String,
    pub line: Option<LineId>,
}

impl Vehicle {
    /// Returns `None` when the report lacks a finite latitude or longitude
    #[must_use]
    pub fn from_resource(resource: &VehicleResource) -> Option<Self> {
        let attributes = &resource.attributes;
        let latitude = attributes.latitude.filter(|v| v.is_finite())?;
        let longitude = attributes.longitude.filter(|v| v.is_finite())?;

        Some(Self {
            id: resource.id.clone(),
            latitude,
            longitude,
            bearing: attributes.bearing.filter(|b| b.is_finite()).unwrap_or(0.0),
            label: attributes.label.clone().unwrap_or_else(|| resource.id.clone()),
            line: resource.relationships.route.data.as_ref().map(|r| r.id.clone()),
        })
    }

    /// Position as MapLibre expects it
    #[must_use]
    pub fn lng_lat(&self) -> [f64; 2] {
        [self.longitude, self.latitude]
    }
}
