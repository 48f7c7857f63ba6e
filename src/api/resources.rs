//! JSON:API documents returned by the transit API. Only the fields the viewer
//! reads are modelled; everything else is ignored on decode.

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_ROUTE_COLOR;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteResponse {
    pub data: RouteResource,
    #[serde(default)]
    pub included: Vec<IncludedResource>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteResource {
    pub id: String,
    #[serde(default)]
    pub attributes: RouteAttributes,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteAttributes {
    #[serde(default)]
    pub color: Option<String>,
}

impl RouteAttributes {
    /// Route color as `#RRGGBB`, falling back to grey when absent or blank
    #[must_use]
    pub fn css_color(&self) -> String {
        let hex = self
            .color
            .as_deref()
            .map(|c| c.trim().trim_start_matches('#'))
            .filter(|c| !c.is_empty())
            .unwrap_or(DEFAULT_ROUTE_COLOR);
        format!("#{hex}")
    }
}

/// Any entry of `included`: route patterns, trips and shapes arrive mixed together
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncludedResource {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub attributes: ShapeAttributes,
}

impl IncludedResource {
    #[must_use]
    pub fn is_shape(&self) -> bool {
        self.kind == "shape"
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShapeAttributes {
    #[serde(default)]
    pub polyline: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehiclesResponse {
    #[serde(default)]
    pub data: Vec<VehicleResource>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleResource {
    pub id: String,
    #[serde(default)]
    pub attributes: VehicleAttributes,
    #[serde(default)]
    pub relationships: VehicleRelationships,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VehicleAttributes {
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub bearing: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VehicleRelationships {
    #[serde(default)]
    pub route: Relationship,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    #[serde(default)]
    pub data: Option<ResourceRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceRef {
    pub id: String,
}
