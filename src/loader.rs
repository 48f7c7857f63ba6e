//! Route shape loading: fetch each line's geometry once, decode it and draw it
//! as a static line layer.

use std::rc::Rc;
use std::time::Duration;

use indexmap::IndexMap;
use thiserror::Error;

use crate::api::{ApiError, TransitApi};
use crate::event_loop::EventLoop;
use crate::logging::log;
use crate::map::{LayerState, LineLayer, MapSurface};
use crate::models::{LineId, RouteShape, ShapeError};
use crate::visibility::VisibilitySource;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Shape(#[from] ShapeError),
    #[error("map rejected route layer: {0}")]
    Map(String),
}

/// Linear backoff: failed attempt `n` waits `n * base_delay`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl RetryPolicy {
    #[must_use]
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.base_delay * attempt
    }
}

/// Outcome of a complete load pass, handed to the readiness callback
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub loaded: Vec<LineId>,
    pub abandoned: Vec<LineId>,
}

/// Add the shape's source and line layer unless they already exist.
///
/// Returns `true` if a new layer was added.
///
/// # Errors
///
/// Returns an error if the map rejects the source or the layer
pub fn register_shape<M: MapSurface>(
    map: &M,
    shape: &RouteShape,
    initial: LayerState,
) -> Result<bool, String> {
    let source_id = RouteShape::source_id(&shape.line);
    if !map.has_source(&source_id) {
        map.add_geojson_source(&source_id, &shape.to_feature_collection())?;
    }

    let layer_id = RouteShape::layer_id(&shape.line);
    if map.has_layer(&layer_id) {
        return Ok(false);
    }

    map.add_line_layer(&LineLayer::new(layer_id.clone(), source_id))?;
    map.set_layer_state(&layer_id, initial);
    Ok(true)
}

/// Set each drawn line layer's visibility and opacity from resolved toggles
pub fn apply_shape_visibility<M: MapSurface>(
    map: &M,
    resolved: &[(LineId, bool)],
    dim_hidden_lines: bool,
) {
    for (line, on) in resolved {
        let layer_id = RouteShape::layer_id(line);
        if map.has_layer(&layer_id) {
            map.set_layer_state(&layer_id, LayerState::for_toggle(*on, dim_hidden_lines));
        }
    }
}

pub struct RouteShapeLoader<A, M, E> {
    api: Rc<A>,
    map: M,
    event_loop: E,
    retry: RetryPolicy,
    visibility: VisibilitySource,
    dim_hidden_lines: bool,
    cache: IndexMap<LineId, RouteShape>,
    abandoned: Vec<LineId>,
    completed: bool,
}

impl<A, M, E> RouteShapeLoader<A, M, E>
where
    A: TransitApi,
    M: MapSurface,
    E: EventLoop,
{
    pub fn new(
        api: Rc<A>,
        map: M,
        event_loop: E,
        retry: RetryPolicy,
        visibility: VisibilitySource,
        dim_hidden_lines: bool,
    ) -> Self {
        Self {
            api,
            map,
            event_loop,
            retry,
            visibility,
            dim_hidden_lines,
            cache: IndexMap::new(),
            abandoned: Vec::new(),
            completed: false,
        }
    }

    #[must_use]
    pub fn cached(&self, line: &str) -> Option<&RouteShape> {
        self.cache.get(line)
    }

    #[must_use]
    pub fn abandoned_lines(&self) -> &[LineId] {
        &self.abandoned
    }

    /// Load every line in order, one at a time, then call `on_complete`.
    ///
    /// `on_complete` runs exactly once per loader, even if lines were
    /// abandoned; later calls return without loading or signalling.
    pub async fn load_all(&mut self, lines: &[LineId], on_complete: impl FnOnce(LoadReport)) {
        if self.completed {
            log!("Route shapes already loaded, ignoring repeated load");
            return;
        }

        let mut report = LoadReport::default();
        for line in lines {
            match self.load_line(line).await {
                Ok(()) => report.loaded.push(line.clone()),
                Err(e) => {
                    leptos::logging::error!("Giving up on route shape for {line}: {e}");
                    if !self.abandoned.contains(line) {
                        self.abandoned.push(line.clone());
                    }
                    report.abandoned.push(line.clone());
                }
            }
        }

        self.completed = true;
        log!(
            "Route shapes ready: {} loaded, {} abandoned",
            report.loaded.len(),
            report.abandoned.len()
        );
        on_complete(report);
    }

    /// Fetch, decode, cache and draw one line, retrying with linear backoff.
    ///
    /// A line that is already cached is only re-registered, never re-fetched.
    ///
    /// # Errors
    ///
    /// Returns the last failure once every attempt has been used up
    pub async fn load_line(&mut self, line: &str) -> Result<(), LoadError> {
        if let Some(shape) = self.cache.get(line) {
            return self.register(shape).map(|_| ());
        }

        let max_attempts = self.retry.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            match self.fetch_shape(line).await {
                Ok(shape) => {
                    log!(
                        "Loaded {} shape(s) for {line} on attempt {attempt}",
                        shape.features.len()
                    );
                    let registered = self.register(&shape);
                    self.cache.insert(line.to_string(), shape);
                    return registered.map(|_| ());
                }
                Err(e) => {
                    if matches!(e, LoadError::Api(ApiError::RateLimited)) {
                        leptos::logging::warn!(
                            "Rate limited loading {line} (attempt {attempt}/{max_attempts})"
                        );
                    } else {
                        leptos::logging::warn!(
                            "Failed to load {line} (attempt {attempt}/{max_attempts}): {e}"
                        );
                    }

                    if attempt >= max_attempts {
                        return Err(e);
                    }
                    self.event_loop.sleep(self.retry.delay_after(attempt)).await;
                    attempt += 1;
                }
            }
        }
    }

    async fn fetch_shape(&self, line: &str) -> Result<RouteShape, LoadError> {
        let response = self.api.fetch_route(line).await?;
        Ok(RouteShape::from_response(line, &response)?)
    }

    fn register(&self, shape: &RouteShape) -> Result<bool, LoadError> {
        let visibility = (self.visibility)();
        let initial =
            LayerState::for_toggle(visibility.is_visible(&shape.line), self.dim_hidden_lines);
        register_shape(&self.map, shape, initial).map_err(LoadError::Map)
    }
}
