use std::time::Duration;

/// Root of the MBTA v3 JSON:API
pub const API_BASE: &str = "https://api-v3.mbta.com";

/// Relationship path that pulls each route's representative shape into `included`
pub const SHAPE_INCLUDE: &str = "route_patterns.representative_trip.shape";

/// Route color used when the API omits one
pub const DEFAULT_ROUTE_COLOR: &str = "888888";

/// Time between live vehicle polls
pub const POLL_INTERVAL: Duration = Duration::from_millis(2_500);

/// Attempts made for a single line's shape before it is abandoned
pub const MAX_RETRIES: u32 = 5;

/// Backoff unit; attempt `n` waits `n * RETRY_BASE_DELAY` before the next try
pub const RETRY_BASE_DELAY: Duration = Duration::from_millis(1_000);

/// Opacity of a toggled-off line when hidden lines are dimmed instead of removed
pub const DIMMED_LINE_OPACITY: f64 = 0.5;

pub const LINE_WIDTH: f64 = 3.0;

/// Downtown Boston, `[lng, lat]`
pub const MAP_CENTER: [f64; 2] = [-71.0589, 42.3601];
pub const MAP_ZOOM: f64 = 11.0;

pub const MAP_STYLE_URL: &str = "https://basemaps.cartocdn.com/gl/positron-gl-style/style.json";

/// DOM id of the element the map is mounted into
pub const MAP_CONTAINER_ID: &str = "transit-map";
