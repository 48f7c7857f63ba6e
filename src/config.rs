use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    API_BASE, MAP_CENTER, MAP_STYLE_URL, MAP_ZOOM, MAX_RETRIES, POLL_INTERVAL, RETRY_BASE_DELAY,
};
use crate::loader::RetryPolicy;
use crate::map::Camera;
use crate::models::{LineId, TransitLine};

/// Runtime settings for one viewer session. Missing fields take the compiled-in defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub api_base: String,
    pub lines: Vec<TransitLine>,
    pub poll_interval_ms: u64,
    pub max_retries: u32,
    pub retry_base_delay_ms: u64,
    pub style_url: String,
    pub center: [f64; 2],
    pub zoom: f64,
    /// Dim toggled-off route shapes instead of hiding them
    pub dim_hidden_lines: bool,
}

impl Default for ViewerConfig {
    #[allow(clippy::cast_possible_truncation)]
    fn default() -> Self {
        Self {
            api_base: API_BASE.to_string(),
            lines: TransitLine::catalogue(),
            poll_interval_ms: POLL_INTERVAL.as_millis() as u64,
            max_retries: MAX_RETRIES,
            retry_base_delay_ms: RETRY_BASE_DELAY.as_millis() as u64,
            style_url: MAP_STYLE_URL.to_string(),
            center: MAP_CENTER,
            zoom: MAP_ZOOM,
            dim_hidden_lines: true,
        }
    }
}

impl ViewerConfig {
    #[must_use]
    pub fn line_ids(&self) -> Vec<LineId> {
        self.lines.iter().map(|line| line.id.clone()).collect()
    }

    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    #[must_use]
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_retries,
            base_delay: Duration::from_millis(self.retry_base_delay_ms),
        }
    }

    #[must_use]
    pub fn camera(&self) -> Camera {
        Camera {
            center: self.center,
            zoom: self.zoom,
        }
    }
}
