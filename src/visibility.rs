use std::cell::RefCell;
use std::rc::Rc;

use crate::loader::apply_shape_visibility;
use crate::map::MapSurface;
use crate::models::{LineId, VisibilityState};
use crate::poller::VehicleRegistry;

/// Reads the current toggle state at the moment it is needed
pub type VisibilitySource = Rc<dyn Fn() -> VisibilityState>;

/// Resolve every line against `state`; lines without an entry are on
#[must_use]
pub fn resolve(lines: &[LineId], state: &VisibilityState) -> Vec<(LineId, bool)> {
    lines
        .iter()
        .map(|line| (line.clone(), state.is_visible(line)))
        .collect()
}

/// Projects toggle changes onto drawn route layers and vehicle markers.
///
/// Never fetches and never touches the shape cache.
pub struct VisibilityController<M: MapSurface> {
    map: M,
    lines: Vec<LineId>,
    vehicles: Rc<RefCell<VehicleRegistry<M::Marker>>>,
    dim_hidden_lines: bool,
}

impl<M: MapSurface> VisibilityController<M> {
    pub fn new(
        map: M,
        lines: Vec<LineId>,
        vehicles: Rc<RefCell<VehicleRegistry<M::Marker>>>,
        dim_hidden_lines: bool,
    ) -> Self {
        Self {
            map,
            lines,
            vehicles,
            dim_hidden_lines,
        }
    }

    pub fn apply(&self, state: &VisibilityState) {
        let resolved = resolve(&self.lines, state);
        apply_shape_visibility(&self.map, &resolved, self.dim_hidden_lines);
        self.vehicles.borrow_mut().apply_visibility(&self.map, state);
    }
}
