pub mod projection;
pub mod scene;
pub mod topology;

pub use projection::{FitProjection, MAX_ZOOM, MIN_ZOOM, Viewport, point_in_ring};
pub use scene::{MapScene, ProjectedRegion, Rgba, blend, status_color};
pub use topology::{LonLatBounds, Region, WorldTopology};
