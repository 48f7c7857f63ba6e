use serde::de::DeserializeOwned;

use super::{ApiError, RouteResponse, TransitApi, VehiclesResponse};
use crate::constants::SHAPE_INCLUDE;

/// `TransitApi` over HTTP; uses the browser's fetch when compiled to wasm
#[derive(Debug, Clone)]
pub struct HttpTransitApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransitApi {
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    #[must_use]
    pub fn route_url(&self, line: &str) -> String {
        format!("{}/routes/{line}", self.base_url)
    }

    #[must_use]
    pub fn vehicles_url(&self) -> String {
        format!("{}/vehicles", self.base_url)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ApiError> {
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::from_status(status.as_u16()));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }
}

impl TransitApi for HttpTransitApi {
    async fn fetch_route(&self, line: &str) -> Result<RouteResponse, ApiError> {
        let request = self
            .client
            .get(self.route_url(line))
            .query(&[("include", SHAPE_INCLUDE)]);
        self.get_json(request).await
    }

    async fn fetch_vehicles(&self, lines: &[String]) -> Result<VehiclesResponse, ApiError> {
        let request = self
            .client
            .get(self.vehicles_url())
            .query(&[("filter[route]", lines.join(","))]);
        self.get_json(request).await
    }
}
