use crate::map::topology::LonLatBounds;

/// A point in base (projected but untransformed) coordinates.
pub type BasePoint = (f32, f32);

/// Equirectangular projection fitted once to a target rectangle.
/// Lon/lat goes in, base coordinates come out; zoom and pan are applied
/// later as an affine transform, never by re-projecting.
#[derive(Debug, Clone, Copy)]
pub struct FitProjection {
    scale: f64,
    offset_x: f64,
    offset_y: f64,
}

impl FitProjection {
    /// Fit `bounds` into a `width` x `height` rectangle, preserving
    /// aspect ratio and centering the slack axis.
    pub fn fit(bounds: LonLatBounds, width: f32, height: f32) -> Self {
        let span_x = bounds.width().max(f64::EPSILON);
        let span_y = bounds.height().max(f64::EPSILON);
        let scale = (width as f64 / span_x).min(height as f64 / span_y);

        let offset_x = (width as f64 - span_x * scale) / 2.0 - bounds.min_lon * scale;
        // Latitude grows north, screen y grows south.
        let offset_y = (height as f64 - span_y * scale) / 2.0 + bounds.max_lat * scale;

        Self {
            scale,
            offset_x,
            offset_y,
        }
    }

    pub fn project(&self, lon: f64, lat: f64) -> BasePoint {
        (
            (lon * self.scale + self.offset_x) as f32,
            (self.offset_y - lat * self.scale) as f32,
        )
    }
}

/// Maximum zoom factor relative to the fitted view.
pub const MAX_ZOOM: f32 = 8.0;
/// Minimum zoom is the fit itself.
pub const MIN_ZOOM: f32 = 1.0;

/// Ephemeral zoom/pan over the base coordinates. Not persisted; a fresh
/// viewport is the fitted view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub zoom: f32,
    pub pan_x: f32,
    pub pan_y: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            zoom: MIN_ZOOM,
            pan_x: 0.0,
            pan_y: 0.0,
        }
    }
}

impl Viewport {
    /// Scale by `factor` around `anchor` (in screen coordinates), so the
    /// point under the cursor stays put. The resulting zoom is clamped to
    /// [MIN_ZOOM, MAX_ZOOM].
    pub fn zoom_by(&mut self, factor: f32, anchor: (f32, f32)) {
        let new_zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
        let ratio = new_zoom / self.zoom;
        self.pan_x = anchor.0 - (anchor.0 - self.pan_x) * ratio;
        self.pan_y = anchor.1 - (anchor.1 - self.pan_y) * ratio;
        self.zoom = new_zoom;
        if self.zoom == MIN_ZOOM {
            // Fully zoomed out snaps back to the fitted view.
            self.pan_x = 0.0;
            self.pan_y = 0.0;
        }
    }

    pub fn pan_by(&mut self, dx: f32, dy: f32) {
        self.pan_x += dx;
        self.pan_y += dy;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Base -> screen.
    pub fn to_screen(&self, point: BasePoint) -> (f32, f32) {
        (
            point.0 * self.zoom + self.pan_x,
            point.1 * self.zoom + self.pan_y,
        )
    }

    /// Screen -> base, for hit-testing against the projected shapes.
    pub fn to_base(&self, point: (f32, f32)) -> BasePoint {
        (
            (point.0 - self.pan_x) / self.zoom,
            (point.1 - self.pan_y) / self.zoom,
        )
    }
}

/// Ray-casting point-in-ring test. The ring is treated as closed whether
/// or not its last vertex repeats the first.
pub fn point_in_ring(point: BasePoint, ring: &[BasePoint]) -> bool {
    if ring.len() < 3 {
        return false;
    }
    let (px, py) = point;
    let mut inside = false;
    let mut j = ring.len() - 1;
    for i in 0..ring.len() {
        let (xi, yi) = ring[i];
        let (xj, yj) = ring[j];
        if ((yi > py) != (yj > py)) && (px < (xj - xi) * (py - yi) / (yj - yi) + xi) {
            inside = !inside;
        }
        j = i;
    }
    inside
}
