//! Live vehicle polling and marker reconciliation.

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;

use crate::api::{ApiError, TransitApi, VehiclesResponse};
use crate::constants::DEFAULT_ROUTE_COLOR;
use crate::event_loop::EventLoop;
use crate::logging::log;
use crate::map::{MapSurface, MarkerSpec};
use crate::models::{LineId, TransitLine, Vehicle, VisibilityState};
use crate::visibility::VisibilitySource;

/// A vehicle with a marker on the map
#[derive(Debug, Clone)]
pub struct TrackedVehicle<K> {
    pub marker: K,
    pub line: Option<LineId>,
    pub visible: bool,
}

/// Counts of marker operations performed by one reconcile pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MarkerChanges {
    pub created: usize,
    pub moved: usize,
    pub removed: usize,
    pub skipped: usize,
    /// Markers the map refused to create; retried on the next poll
    pub failed: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// Payload identical to the previous one; no marker was touched
    Unchanged,
    Applied(MarkerChanges),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    RateLimited,
    Failed,
    Processed(ReconcileOutcome),
}

/// Snapshot published after each applied payload
#[derive(Debug, Clone, PartialEq)]
pub struct PollSummary {
    pub counts: IndexMap<LineId, usize>,
    pub total: usize,
    pub updated_at: DateTime<Utc>,
}

/// Markers keyed by vehicle id, plus the last payload seen
#[derive(Debug)]
pub struct VehicleRegistry<K> {
    vehicles: IndexMap<String, TrackedVehicle<K>>,
    last_payload: Option<String>,
}

impl<K> Default for VehicleRegistry<K> {
    fn default() -> Self {
        Self {
            vehicles: IndexMap::new(),
            last_payload: None,
        }
    }
}

impl<K: Clone> VehicleRegistry<K> {
    #[must_use]
    pub fn len(&self) -> usize {
        self.vehicles.len()
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&TrackedVehicle<K>> {
        self.vehicles.get(id)
    }

    /// Upsert markers from a full vehicle payload.
    ///
    /// Known vehicles are moved in place; unseen ones get a new marker whose
    /// visibility follows `visibility`. Vehicles missing from the payload are
    /// removed. A payload that serializes identically to the previous fully
    /// applied one is skipped entirely.
    pub fn reconcile<M: MapSurface<Marker = K>>(
        &mut self,
        map: &M,
        response: &VehiclesResponse,
        visibility: &VisibilityState,
        line_colors: &IndexMap<LineId, String>,
    ) -> ReconcileOutcome {
        let payload = serde_json::to_string(response).ok();
        if payload.is_some() && payload == self.last_payload {
            return ReconcileOutcome::Unchanged;
        }

        let mut changes = MarkerChanges::default();
        let mut present = HashSet::with_capacity(response.data.len());

        for resource in &response.data {
            present.insert(resource.id.as_str());

            let Some(vehicle) = Vehicle::from_resource(resource) else {
                changes.skipped += 1;
                continue;
            };

            if let Some(tracked) = self.vehicles.get(&vehicle.id) {
                map.move_marker(&tracked.marker, vehicle.lng_lat(), vehicle.bearing);
                changes.moved += 1;
                continue;
            }

            let visible = vehicle
                .line
                .as_deref()
                .map_or(true, |line| visibility.is_visible(line));
            let color = vehicle
                .line
                .as_ref()
                .and_then(|line| line_colors.get(line))
                .cloned()
                .unwrap_or_else(|| format!("#{DEFAULT_ROUTE_COLOR}"));

            let spec = MarkerSpec {
                position: vehicle.lng_lat(),
                bearing: vehicle.bearing,
                popup_text: vehicle.label.clone(),
                color,
                visible,
            };
            match map.add_marker(&spec) {
                Ok(marker) => {
                    self.vehicles.insert(
                        vehicle.id,
                        TrackedVehicle {
                            marker,
                            line: vehicle.line,
                            visible,
                        },
                    );
                    changes.created += 1;
                }
                Err(e) => {
                    leptos::logging::warn!("Failed to place vehicle {}: {e}", vehicle.id);
                    changes.failed += 1;
                }
            }
        }

        self.vehicles.retain(|id, tracked| {
            if present.contains(id.as_str()) {
                true
            } else {
                map.remove_marker(&tracked.marker);
                changes.removed += 1;
                false
            }
        });

        self.last_payload = if changes.failed == 0 { payload } else { None };
        ReconcileOutcome::Applied(changes)
    }

    /// Show or hide each marker by its line's toggle; positions are untouched
    pub fn apply_visibility<M: MapSurface<Marker = K>>(&mut self, map: &M, state: &VisibilityState) {
        for tracked in self.vehicles.values_mut() {
            let on = tracked
                .line
                .as_deref()
                .map_or(true, |line| state.is_visible(line));
            if tracked.visible != on {
                map.set_marker_visible(&tracked.marker, on);
                tracked.visible = on;
            }
        }
    }

    #[must_use]
    pub fn counts_by_line(&self) -> IndexMap<LineId, usize> {
        let mut counts = IndexMap::new();
        for tracked in self.vehicles.values() {
            if let Some(line) = &tracked.line {
                *counts.entry(line.clone()).or_insert(0) += 1;
            }
        }
        counts
    }

    #[must_use]
    pub fn summary(&self) -> PollSummary {
        PollSummary {
            counts: self.counts_by_line(),
            total: self.vehicles.len(),
            updated_at: Utc::now(),
        }
    }
}

type SummaryCallback = Rc<dyn Fn(&PollSummary)>;

struct PollerShared<A, M: MapSurface> {
    api: Rc<A>,
    map: M,
    lines: Vec<LineId>,
    line_colors: IndexMap<LineId, String>,
    registry: Rc<RefCell<VehicleRegistry<M::Marker>>>,
    visibility: VisibilitySource,
    on_update: RefCell<Option<SummaryCallback>>,
}

impl<A: TransitApi, M: MapSurface> PollerShared<A, M> {
    async fn poll(self: Rc<Self>) -> PollOutcome {
        let response = match self.api.fetch_vehicles(&self.lines).await {
            Ok(response) => response,
            Err(ApiError::RateLimited) => {
                log!("Vehicle poll rate limited, skipping cycle");
                return PollOutcome::RateLimited;
            }
            Err(e) => {
                leptos::logging::warn!("Vehicle poll failed: {e}");
                return PollOutcome::Failed;
            }
        };

        let visibility = (self.visibility)();
        let outcome = self.registry.borrow_mut().reconcile(
            &self.map,
            &response,
            &visibility,
            &self.line_colors,
        );

        if let ReconcileOutcome::Applied(changes) = outcome {
            log!(
                "Vehicles: {} new, {} moved, {} gone, {} without position",
                changes.created,
                changes.moved,
                changes.removed,
                changes.skipped
            );
            let on_update = self.on_update.borrow().clone();
            if let Some(on_update) = on_update {
                let summary = self.registry.borrow().summary();
                on_update(&summary);
            }
        }

        PollOutcome::Processed(outcome)
    }
}

/// Polls vehicle positions on a fixed interval once started.
///
/// At most one interval is live at a time; `stop` cancels it.
pub struct VehiclePoller<A, M: MapSurface, E: EventLoop> {
    shared: Rc<PollerShared<A, M>>,
    event_loop: E,
    period: Duration,
    interval: RefCell<Option<E::Interval>>,
}

impl<A, M, E> VehiclePoller<A, M, E>
where
    A: TransitApi + 'static,
    M: MapSurface + 'static,
    E: EventLoop,
{
    pub fn new(
        api: Rc<A>,
        map: M,
        event_loop: E,
        lines: &[TransitLine],
        period: Duration,
        visibility: VisibilitySource,
    ) -> Self {
        let shared = PollerShared {
            api,
            map,
            lines: lines.iter().map(|line| line.id.clone()).collect(),
            line_colors: lines
                .iter()
                .map(|line| (line.id.clone(), line.color.clone()))
                .collect(),
            registry: Rc::new(RefCell::new(VehicleRegistry::default())),
            visibility,
            on_update: RefCell::new(None),
        };

        Self {
            shared: Rc::new(shared),
            event_loop,
            period,
            interval: RefCell::new(None),
        }
    }

    /// Register a callback receiving a summary after each applied payload
    #[must_use]
    pub fn with_on_update(self, on_update: impl Fn(&PollSummary) + 'static) -> Self {
        *self.shared.on_update.borrow_mut() = Some(Rc::new(on_update));
        self
    }

    #[must_use]
    pub fn registry(&self) -> Rc<RefCell<VehicleRegistry<M::Marker>>> {
        Rc::clone(&self.shared.registry)
    }

    /// Poll now and then every period. Returns `false` if already running.
    pub fn start(&self) -> bool {
        let mut slot = self.interval.borrow_mut();
        if slot.is_some() {
            log!("Vehicle poller already running");
            return false;
        }

        let shared = Rc::clone(&self.shared);
        self.event_loop.spawn(async move {
            shared.poll().await;
        });

        let shared = Rc::clone(&self.shared);
        let event_loop = self.event_loop.clone();
        let tick = Box::new(move || {
            let shared = Rc::clone(&shared);
            event_loop.spawn(async move {
                shared.poll().await;
            });
        });
        *slot = Some(self.event_loop.interval(self.period, tick));

        log!("Vehicle poller started ({}ms)", self.period.as_millis());
        true
    }

    /// Cancel the interval. Returns `false` if it was not running.
    pub fn stop(&self) -> bool {
        let stopped = self.interval.borrow_mut().take().is_some();
        if stopped {
            log!("Vehicle poller stopped");
        }
        stopped
    }

    /// Run a single poll cycle outside the schedule
    pub async fn poll_once(&self) -> PollOutcome {
        Rc::clone(&self.shared).poll().await
    }

    /// Marker half of the visibility projection
    pub fn apply_visibility(&self, state: &VisibilityState) {
        self.shared
            .registry
            .borrow_mut()
            .apply_visibility(&self.shared.map, state);
    }
}
