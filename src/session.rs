//! The live pipeline behind one mounted map: route shapes first, then vehicle
//! polling, with toggle changes projected onto both.

use std::cell::Cell;
use std::rc::Rc;

use crate::api::TransitApi;
use crate::event_loop::EventLoop;
use crate::loader::{LoadReport, RouteShapeLoader};
use crate::logging::log;
use crate::map::MapSurface;
use crate::models::{LineId, VisibilityState};
use crate::poller::VehiclePoller;
use crate::visibility::VisibilityController;

pub struct LiveSession<A, M: MapSurface, E: EventLoop> {
    event_loop: E,
    poller: VehiclePoller<A, M, E>,
    controller: VisibilityController<M>,
    torn_down: Cell<bool>,
}

impl<A, M, E> LiveSession<A, M, E>
where
    A: TransitApi + 'static,
    M: MapSurface + 'static,
    E: EventLoop,
{
    pub fn new(
        event_loop: E,
        poller: VehiclePoller<A, M, E>,
        controller: VisibilityController<M>,
    ) -> Rc<Self> {
        Rc::new(Self {
            event_loop,
            poller,
            controller,
            torn_down: Cell::new(false),
        })
    }

    /// Load every line's shape in the background, then start polling.
    ///
    /// Polling never starts before the loader signals completion, and not at
    /// all if the session was torn down in the meantime.
    pub fn launch(self: &Rc<Self>, loader: RouteShapeLoader<A, M, E>, lines: Vec<LineId>) {
        let session = Rc::clone(self);
        self.event_loop.spawn(async move {
            let mut loader = loader;
            let ready = Rc::clone(&session);
            loader
                .load_all(&lines, move |report| ready.shapes_loaded(&report))
                .await;
        });
    }

    fn shapes_loaded(&self, report: &LoadReport) {
        if !report.abandoned.is_empty() {
            leptos::logging::warn!("Route shapes unavailable for: {}", report.abandoned.join(", "));
        }
        if self.torn_down.get() {
            log!("Session closed before route shapes finished loading");
            return;
        }
        self.poller.start();
    }

    pub fn apply_visibility(&self, state: &VisibilityState) {
        self.controller.apply(state);
    }

    /// Stop polling for good. Returns `false` if already torn down.
    pub fn teardown(&self) -> bool {
        if self.torn_down.replace(true) {
            return false;
        }
        self.poller.stop();
        true
    }
}
