mod line;
mod route_shape;
mod vehicle;
mod visibility;

pub use line::{LineId, LineKind, TransitLine};
pub use route_shape::{RouteShape, ShapeError, ShapeFeature};
pub use vehicle::Vehicle;
pub use visibility::VisibilityState;
