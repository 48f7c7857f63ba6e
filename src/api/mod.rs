mod http;
mod resources;

pub use http::HttpTransitApi;
pub use resources::{
    Relationship, ResourceRef, RouteAttributes, RouteResource, RouteResponse, ShapeAttributes,
    IncludedResource, VehicleAttributes, VehicleRelationships, VehicleResource, VehiclesResponse,
};

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// HTTP 429; callers back off or skip the cycle instead of treating it as a failure
    #[error("rate limited by transit API")]
    RateLimited,
    #[error("transit API returned status {0}")]
    Status(u16),
    #[error("request failed: {0}")]
    Request(String),
    #[error("failed to decode response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Map a non-success HTTP status to its error variant
    #[must_use]
    pub fn from_status(status: u16) -> Self {
        if status == 429 {
            Self::RateLimited
        } else {
            Self::Status(status)
        }
    }
}

/// Read access to the transit agency's API
#[allow(async_fn_in_trait)]
pub trait TransitApi {
    /// Fetch a route together with its representative shapes
    async fn fetch_route(&self, line: &str) -> Result<RouteResponse, ApiError>;

    /// Fetch live vehicles for all of `lines` in one request
    async fn fetch_vehicles(&self, lines: &[String]) -> Result<VehiclesResponse, ApiError>;
}
