use serde_json::{json, Value};
use thiserror::Error;

use super::LineId;
use crate::api::RouteResponse;
use crate::polyline::{self, PolylineError};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeError {
    #[error("route has no shape geometry")]
    NoShapes,
    #[error("shape {shape_id} has an invalid polyline: {source}")]
    Polyline {
        shape_id: String,
        #[source]
        source: PolylineError,
    },
}

/// One decoded shape of a route pattern
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeFeature {
    pub shape_id: String,
    pub color: String,
    /// `[lng, lat]` pairs
    pub coordinates: Vec<[f64; 2]>,
}

/// Drawable geometry for one line. Built once per session and never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteShape {
    pub line: LineId,
    pub color: String,
    pub features: Vec<ShapeFeature>,
}

impl RouteShape {
    /// Decode every shape included with a route document
    ///
    /// # Errors
    ///
    /// Returns an error if the document carries no shape with a polyline, or
    /// if any polyline fails to decode.
    pub fn from_response(line: &str, response: &RouteResponse) -> Result<Self, ShapeError> {
        let color = response.data.attributes.css_color();

        let features = response
            .included
            .iter()
            .filter(|resource| resource.is_shape())
            .filter_map(|resource| {
                resource
                    .attributes
                    .polyline
                    .as_deref()
                    .map(|encoded| (resource.id.as_str(), encoded))
            })
            .map(|(shape_id, encoded)| {
                let coordinates =
                    polyline::decode(encoded).map_err(|source| ShapeError::Polyline {
                        shape_id: shape_id.to_string(),
                        source,
                    })?;
                Ok(ShapeFeature {
                    shape_id: shape_id.to_string(),
                    color: color.clone(),
                    coordinates,
                })
            })
            .collect::<Result<Vec<_>, ShapeError>>()?;

        if features.is_empty() {
            return Err(ShapeError::NoShapes);
        }

        Ok(Self {
            line: line.to_string(),
            color,
            features,
        })
    }

    /// Source id under which the shape's GeoJSON is registered with the map
    #[must_use]
    pub fn source_id(line: &str) -> String {
        format!("route-{line}")
    }

    /// Layer id of the line layer drawing the shape's source
    #[must_use]
    pub fn layer_id(line: &str) -> String {
        format!("route-{line}-line")
    }

    /// GeoJSON `FeatureCollection` with one `LineString` per shape
    #[must_use]
    pub fn to_feature_collection(&self) -> Value {
        let features: Vec<Value> = self
            .features
            .iter()
            .map(|feature| {
                json!({
                    "type": "Feature",
                    "properties": {
                        "color": feature.color,
                        "shape_id": feature.shape_id,
                    },
                    "geometry": {
                        "type": "LineString",
                        "coordinates": feature.coordinates,
                    }
                })
            })
            .collect();

        json!({
            "type": "FeatureCollection",
            "features": features,
        })
    }
}
