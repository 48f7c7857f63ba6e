//! In-memory stand-ins for the map, the transit API and the event loop.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll, Wake, Waker};
use std::time::Duration;

use serde_json::Value;

use crate::api::{ApiError, RouteResponse, TransitApi, VehiclesResponse};
use crate::event_loop::EventLoop;
use crate::map::{Camera, LayerState, LineLayer, MapSurface, MarkerSpec};
use crate::models::{RouteShape, VisibilityState};
use crate::visibility::VisibilitySource;

#[derive(Debug, Clone)]
struct RecordedMarker {
    position: [f64; 2],
    bearing: f64,
    popup: String,
    color: String,
    visible: bool,
    removed: bool,
}

#[derive(Debug, Default)]
struct MapState {
    sources: Vec<String>,
    layers: Vec<String>,
    layer_states: HashMap<String, LayerState>,
    markers: Vec<RecordedMarker>,
    camera: Option<Camera>,
    operations: usize,
    refused_markers: usize,
}

/// Map surface that records every call; markers are indices into its list
#[derive(Debug, Clone, Default)]
pub struct RecordingMap {
    state: Rc<RefCell<MapState>>,
}

impl RecordingMap {
    pub fn layer_ids(&self) -> Vec<String> {
        self.state.borrow().layers.clone()
    }

    pub fn source_count(&self) -> usize {
        self.state.borrow().sources.len()
    }

    pub fn layer_state(&self, id: &str) -> Option<LayerState> {
        self.state.borrow().layer_states.get(id).copied()
    }

    pub fn markers_added(&self) -> usize {
        self.state.borrow().markers.len()
    }

    pub fn marker_position(&self, marker: usize) -> Option<[f64; 2]> {
        self.state.borrow().markers.get(marker).map(|m| m.position)
    }

    pub fn marker_bearing(&self, marker: usize) -> Option<f64> {
        self.state.borrow().markers.get(marker).map(|m| m.bearing)
    }

    pub fn marker_visible(&self, marker: usize) -> Option<bool> {
        self.state.borrow().markers.get(marker).map(|m| m.visible)
    }

    pub fn marker_popup(&self, marker: usize) -> Option<String> {
        self.state.borrow().markers.get(marker).map(|m| m.popup.clone())
    }

    pub fn marker_color(&self, marker: usize) -> Option<String> {
        self.state.borrow().markers.get(marker).map(|m| m.color.clone())
    }

    pub fn marker_removed(&self, marker: usize) -> bool {
        self.state.borrow().markers.get(marker).is_some_and(|m| m.removed)
    }

    pub fn camera(&self) -> Option<Camera> {
        self.state.borrow().camera
    }

    /// Number of mutating calls made so far
    pub fn operation_count(&self) -> usize {
        self.state.borrow().operations
    }

    /// Make the next `count` marker creations fail
    pub fn refuse_markers(&self, count: usize) {
        self.state.borrow_mut().refused_markers = count;
    }

    fn with_marker(&self, marker: usize, f: impl FnOnce(&mut RecordedMarker)) {
        let mut state = self.state.borrow_mut();
        state.operations += 1;
        if let Some(recorded) = state.markers.get_mut(marker) {
            f(recorded);
        }
    }
}

impl MapSurface for RecordingMap {
    type Marker = usize;

    fn has_source(&self, id: &str) -> bool {
        self.state.borrow().sources.iter().any(|s| s == id)
    }

    fn add_geojson_source(&self, id: &str, data: &Value) -> Result<(), String> {
        if data["type"] != "FeatureCollection" {
            return Err(format!("source {id} is not a feature collection"));
        }
        let mut state = self.state.borrow_mut();
        if state.sources.iter().any(|s| s == id) {
            return Err(format!("source {id} already exists"));
        }
        state.operations += 1;
        state.sources.push(id.to_string());
        Ok(())
    }

    fn has_layer(&self, id: &str) -> bool {
        self.state.borrow().layers.iter().any(|l| l == id)
    }

    fn add_line_layer(&self, layer: &LineLayer) -> Result<(), String> {
        let mut state = self.state.borrow_mut();
        if !state.sources.contains(&layer.source) {
            return Err(format!("layer {} references missing source", layer.id));
        }
        if state.layers.contains(&layer.id) {
            return Err(format!("layer {} already exists", layer.id));
        }
        state.operations += 1;
        state.layers.push(layer.id.clone());
        Ok(())
    }

    fn set_layer_state(&self, layer_id: &str, layer_state: LayerState) {
        let mut state = self.state.borrow_mut();
        state.operations += 1;
        state.layer_states.insert(layer_id.to_string(), layer_state);
    }

    fn add_marker(&self, spec: &MarkerSpec) -> Result<usize, String> {
        let mut state = self.state.borrow_mut();
        if state.refused_markers > 0 {
            state.refused_markers -= 1;
            return Err("marker refused".to_string());
        }
        state.operations += 1;
        state.markers.push(RecordedMarker {
            position: spec.position,
            bearing: spec.bearing,
            popup: spec.popup_text.clone(),
            color: spec.color.clone(),
            visible: spec.visible,
            removed: false,
        });
        Ok(state.markers.len() - 1)
    }

    fn move_marker(&self, marker: &usize, position: [f64; 2], bearing: f64) {
        self.with_marker(*marker, |m| {
            m.position = position;
            m.bearing = bearing;
        });
    }

    fn set_marker_visible(&self, marker: &usize, visible: bool) {
        self.with_marker(*marker, |m| m.visible = visible);
    }

    fn remove_marker(&self, marker: &usize) {
        self.with_marker(*marker, |m| m.removed = true);
    }

    fn jump_to(&self, camera: Camera) {
        let mut state = self.state.borrow_mut();
        state.operations += 1;
        state.camera = Some(camera);
    }
}

type Scripted<T> = RefCell<HashMap<String, VecDeque<Result<T, ApiError>>>>;

/// Holds a request open until the test calls `open`
#[derive(Default)]
pub struct Gate {
    open: Cell<bool>,
    waiting: RefCell<Vec<Waker>>,
}

impl Gate {
    pub fn open(&self) {
        self.open.set(true);
        for waker in self.waiting.borrow_mut().drain(..) {
            waker.wake();
        }
    }

    async fn pass(&self) {
        std::future::poll_fn(|cx| {
            if self.open.get() {
                Poll::Ready(())
            } else {
                self.waiting.borrow_mut().push(cx.waker().clone());
                Poll::Pending
            }
        })
        .await;
    }
}

/// Transit API answering from queued responses.
///
/// Each queue yields its entries in order and then keeps repeating the last one.
#[derive(Default)]
pub struct ScriptedApi {
    routes: Scripted<RouteResponse>,
    vehicles: RefCell<VecDeque<Result<VehiclesResponse, ApiError>>>,
    route_requests: RefCell<Vec<String>>,
    vehicle_requests: Cell<usize>,
    route_gates: RefCell<HashMap<String, VecDeque<Rc<Gate>>>>,
    vehicle_gates: RefCell<VecDeque<Rc<Gate>>>,
}

fn next_scripted<T: Clone>(queue: &mut VecDeque<Result<T, ApiError>>) -> Result<T, ApiError> {
    if queue.len() > 1 {
        queue.pop_front().unwrap_or(Err(ApiError::Status(404)))
    } else {
        queue.front().cloned().unwrap_or(Err(ApiError::Status(404)))
    }
}

impl ScriptedApi {
    pub fn route_ok(&self, line: &str, body: &str) {
        let response = serde_json::from_str(body).expect("valid route fixture");
        self.push_route(line, Ok(response));
    }

    pub fn route_err(&self, line: &str, error: ApiError) {
        self.push_route(line, Err(error));
    }

    fn push_route(&self, line: &str, result: Result<RouteResponse, ApiError>) {
        self.routes
            .borrow_mut()
            .entry(line.to_string())
            .or_default()
            .push_back(result);
    }

    pub fn vehicles_ok(&self, body: &str) {
        let response = serde_json::from_str(body).expect("valid vehicles fixture");
        self.vehicles.borrow_mut().push_back(Ok(response));
    }

    pub fn vehicles_err(&self, error: ApiError) {
        self.vehicles.borrow_mut().push_back(Err(error));
    }

    /// The next route request for `line` answers only once the gate opens
    pub fn hold_route(&self, line: &str) -> Rc<Gate> {
        let gate = Rc::new(Gate::default());
        self.route_gates
            .borrow_mut()
            .entry(line.to_string())
            .or_default()
            .push_back(Rc::clone(&gate));
        gate
    }

    /// The next vehicles request takes its response immediately but answers
    /// only once the gate opens
    pub fn hold_vehicles(&self) -> Rc<Gate> {
        let gate = Rc::new(Gate::default());
        self.vehicle_gates.borrow_mut().push_back(Rc::clone(&gate));
        gate
    }

    pub fn route_requests(&self) -> Vec<String> {
        self.route_requests.borrow().clone()
    }

    pub fn vehicle_requests(&self) -> usize {
        self.vehicle_requests.get()
    }
}

impl TransitApi for ScriptedApi {
    async fn fetch_route(&self, line: &str) -> Result<RouteResponse, ApiError> {
        self.route_requests.borrow_mut().push(line.to_string());
        let gate = self
            .route_gates
            .borrow_mut()
            .get_mut(line)
            .and_then(VecDeque::pop_front);
        if let Some(gate) = gate {
            gate.pass().await;
        }
        match self.routes.borrow_mut().get_mut(line) {
            Some(queue) => next_scripted(queue),
            None => Err(ApiError::Status(404)),
        }
    }

    async fn fetch_vehicles(&self, _lines: &[String]) -> Result<VehiclesResponse, ApiError> {
        self.vehicle_requests.set(self.vehicle_requests.get() + 1);
        let result = next_scripted(&mut self.vehicles.borrow_mut());
        let gate = self.vehicle_gates.borrow_mut().pop_front();
        if let Some(gate) = gate {
            gate.pass().await;
        }
        result
    }
}

struct IntervalSlot {
    period: Duration,
    active: Rc<Cell<bool>>,
    tick: Rc<RefCell<Box<dyn FnMut()>>>,
}

/// Dropping the handle deactivates its interval
pub struct ManualInterval {
    active: Rc<Cell<bool>>,
}

impl Drop for ManualInterval {
    fn drop(&mut self) {
        self.active.set(false);
    }
}

type Task = Pin<Box<dyn Future<Output = ()>>>;

#[derive(Default)]
struct WakeFlag(AtomicBool);

impl Wake for WakeFlag {
    fn wake(self: Arc<Self>) {
        self.0.store(true, Ordering::SeqCst);
    }
}

/// Event loop driven by hand: spawned futures queue up until `run_until_idle`,
/// intervals tick only on `fire_intervals`, and sleeps complete immediately.
#[derive(Clone, Default)]
pub struct ManualEventLoop {
    queue: Rc<RefCell<VecDeque<Task>>>,
    parked: Rc<RefCell<Vec<Task>>>,
    intervals: Rc<RefCell<Vec<IntervalSlot>>>,
    sleeps: Rc<RefCell<Vec<Duration>>>,
}

impl ManualEventLoop {
    /// Poll every task until none can make progress. Tasks waiting on a
    /// closed [`Gate`] stay parked for a later call.
    pub fn run_until_idle(&self) {
        let flag = Arc::new(WakeFlag::default());
        let waker = Waker::from(Arc::clone(&flag));
        let mut cx = Context::from_waker(&waker);

        loop {
            flag.0.store(false, Ordering::SeqCst);
            let mut progressed = false;
            let mut tasks = std::mem::take(&mut *self.parked.borrow_mut());
            let spawned: Vec<Task> = self.queue.borrow_mut().drain(..).collect();
            progressed |= !spawned.is_empty();
            tasks.extend(spawned);

            for mut task in tasks {
                match task.as_mut().poll(&mut cx) {
                    Poll::Ready(()) => progressed = true,
                    Poll::Pending => self.parked.borrow_mut().push(task),
                }
            }

            progressed |= flag.0.load(Ordering::SeqCst);
            if !progressed && self.queue.borrow().is_empty() {
                break;
            }
        }
    }

    pub fn parked_tasks(&self) -> usize {
        self.parked.borrow().len()
    }

    pub fn fire_intervals(&self) {
        let ticks: Vec<_> = self
            .intervals
            .borrow()
            .iter()
            .filter(|slot| slot.active.get())
            .map(|slot| Rc::clone(&slot.tick))
            .collect();
        for tick in ticks {
            let mut guard = tick.borrow_mut();
            let tick: &mut Box<dyn FnMut()> = &mut guard;
            tick();
        }
    }

    pub fn live_intervals(&self) -> usize {
        self.intervals
            .borrow()
            .iter()
            .filter(|slot| slot.active.get())
            .count()
    }

    pub fn interval_periods(&self) -> Vec<Duration> {
        self.intervals
            .borrow()
            .iter()
            .filter(|slot| slot.active.get())
            .map(|slot| slot.period)
            .collect()
    }

    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.borrow().clone()
    }
}

impl EventLoop for ManualEventLoop {
    type Interval = ManualInterval;

    fn spawn(&self, future: impl Future<Output = ()> + 'static) {
        self.queue.borrow_mut().push_back(Box::pin(future));
    }

    fn interval(&self, period: Duration, tick: Box<dyn FnMut()>) -> ManualInterval {
        let active = Rc::new(Cell::new(true));
        self.intervals.borrow_mut().push(IntervalSlot {
            period,
            active: Rc::clone(&active),
            tick: Rc::new(RefCell::new(tick)),
        });
        ManualInterval { active }
    }

    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> {
        self.sleeps.borrow_mut().push(duration);
        std::future::ready(())
    }
}

pub fn fixed_visibility(state: VisibilityState) -> VisibilitySource {
    Rc::new(move || state.clone())
}

/// A visibility source backed by state the test can keep changing
pub fn shared_visibility() -> (VisibilitySource, Rc<RefCell<VisibilityState>>) {
    let state = Rc::new(RefCell::new(VisibilityState::new()));
    let reader = Rc::clone(&state);
    (Rc::new(move || reader.borrow().clone()), state)
}

/// Route document with one shape, the canonical three-point polyline
pub fn route_json(line: &str, color: &str) -> String {
    format!(
        r#"{{"data": {{"id": "{line}", "type": "route", "attributes": {{"color": "{color}"}}}},
            "included": [
                {{"id": "{line}-pattern", "type": "route_pattern", "attributes": {{}}}},
                {{"id": "{line}-shape", "type": "shape", "attributes": {{"polyline": "_p~iF~ps|U_ulLnnqC_mqNvxq`@"}}}}
            ]}}"#
    )
}

pub fn route_shape(line: &str) -> RouteShape {
    let response: RouteResponse =
        serde_json::from_str(&route_json(line, "123456")).expect("valid route fixture");
    RouteShape::from_response(line, &response).expect("fixture decodes")
}

pub fn vehicle_json(id: &str, latitude: f64, longitude: f64, line: &str) -> String {
    format!(
        r#"{{"id": "{id}", "type": "vehicle",
             "attributes": {{"latitude": {latitude}, "longitude": {longitude}, "label": "{id} label", "bearing": 45}},
             "relationships": {{"route": {{"data": {{"id": "{line}", "type": "route"}}}}}}}}"#
    )
}

pub fn response_with_vehicles(vehicles: &[String]) -> VehiclesResponse {
    serde_json::from_str(&format!(r#"{{"data": [{}]}}"#, vehicles.join(",")))
        .expect("valid vehicles fixture")
}
