use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::core::status::{CountryStatus, StatusMap, next_in_cycle};
use crate::map::projection::{BasePoint, FitProjection, point_in_ring};
use crate::map::topology::{LonLatBounds, WorldTopology};

/// Base canvas the projection is fitted to once; drawing scales this to
/// the real widget bounds with an affine transform.
pub const BASE_WIDTH: f32 = 1000.0;
pub const BASE_HEIGHT: f32 = 500.0;

/// How long a recolored region fades from its old fill to the new one.
pub const RECOLOR_FADE: Duration = Duration::from_millis(300);

/// Plain RGBA color, independent of any GUI toolkit so the color logic
/// stays testable headless.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const VISITED: Rgba = Rgba::new(0.20, 0.62, 0.37, 1.0);
    pub const WISHLIST: Rgba = Rgba::new(0.93, 0.69, 0.18, 1.0);
    pub const UNMARKED: Rgba = Rgba::new(0.42, 0.45, 0.50, 1.0);
    pub const BORDER: Rgba = Rgba::new(0.12, 0.13, 0.16, 1.0);
    pub const HOVER_STROKE: Rgba = Rgba::new(0.95, 0.96, 0.98, 1.0);
    pub const OCEAN: Rgba = Rgba::new(0.10, 0.14, 0.20, 1.0);
}

/// Fill color as a pure function of status.
pub fn status_color(status: Option<CountryStatus>) -> Rgba {
    match status {
        Some(CountryStatus::Visited) => Rgba::VISITED,
        Some(CountryStatus::Wishlist) => Rgba::WISHLIST,
        None => Rgba::UNMARKED,
    }
}

/// Linear blend between two colors, `t` in [0, 1].
pub fn blend(from: Rgba, to: Rgba, t: f32) -> Rgba {
    let t = t.clamp(0.0, 1.0);
    Rgba::new(
        from.r + (to.r - from.r) * t,
        from.g + (to.g - from.g) * t,
        from.b + (to.b - from.b) * t,
        from.a + (to.a - from.a) * t,
    )
}

#[derive(Debug, Clone)]
pub struct ProjectedPolygon {
    /// First ring is the outline, the rest are holes.
    pub rings: Vec<Vec<BasePoint>>,
}

#[derive(Debug, Clone)]
pub struct ProjectedRegion {
    pub id: String,
    pub name: String,
    pub polygons: Vec<ProjectedPolygon>,
}

impl ProjectedRegion {
    pub fn contains(&self, point: BasePoint) -> bool {
        self.polygons.iter().any(|polygon| {
            let Some(outer) = polygon.rings.first() else {
                return false;
            };
            point_in_ring(point, outer)
                && !polygon.rings[1..].iter().any(|hole| point_in_ring(point, hole))
        })
    }
}

#[derive(Debug, Clone, Copy)]
struct Fade {
    from: Rgba,
    started: Instant,
}

/// The drawable map: regions projected once into base coordinates, plus
/// the renderer's own status snapshot. The snapshot makes the click cycle
/// correct across repeated clicks without asking the view model, and lets
/// `apply_statuses` report exactly which regions need recoloring.
#[derive(Debug)]
pub struct MapScene {
    regions: Vec<ProjectedRegion>,
    statuses: HashMap<String, CountryStatus>,
    fades: HashMap<String, Fade>,
}

impl MapScene {
    /// Project the topology into base coordinates. This is the one-time
    /// expensive step; recoloring and zoom/pan never repeat it.
    pub fn new(topology: &WorldTopology, statuses: &StatusMap) -> Self {
        let bounds = topology.bounds().unwrap_or(LonLatBounds::WORLD);
        let projection = FitProjection::fit(bounds, BASE_WIDTH, BASE_HEIGHT);

        let regions = topology
            .regions
            .iter()
            .map(|region| ProjectedRegion {
                id: region.id.clone(),
                name: region.name.clone(),
                polygons: region
                    .polygons
                    .iter()
                    .map(|polygon| ProjectedPolygon {
                        rings: polygon
                            .rings
                            .iter()
                            .map(|ring| {
                                ring.iter()
                                    .map(|&(lon, lat)| projection.project(lon, lat))
                                    .collect()
                            })
                            .collect(),
                    })
                    .collect(),
            })
            .collect();

        Self {
            regions,
            statuses: statuses.iter().map(|(k, v)| (k.clone(), *v)).collect(),
            fades: HashMap::new(),
        }
    }

    pub fn regions(&self) -> &[ProjectedRegion] {
        &self.regions
    }

    pub fn status_of(&self, region_id: &str) -> Option<CountryStatus> {
        self.statuses.get(region_id).copied()
    }

    /// The status a click on this region should propose, from the scene's
    /// current snapshot.
    pub fn next_status(&self, region_id: &str) -> Option<CountryStatus> {
        next_in_cycle(self.status_of(region_id))
    }

    /// Topmost region under a base-coordinate point, if any.
    pub fn region_at(&self, point: BasePoint) -> Option<&ProjectedRegion> {
        self.regions.iter().find(|region| region.contains(point))
    }

    /// Replace the status snapshot, starting a fade for every region
    /// whose fill actually changes. Returns the ids that changed.
    pub fn apply_statuses(&mut self, statuses: &StatusMap, now: Instant) -> Vec<String> {
        let mut changed = Vec::new();
        for region in &self.regions {
            let old = self.statuses.get(&region.id).copied();
            let new = statuses.get(&region.id).copied();
            if old != new {
                self.fades.insert(
                    region.id.clone(),
                    Fade {
                        from: self.fill_color(&region.id, now),
                        started: now,
                    },
                );
                changed.push(region.id.clone());
            }
        }
        self.statuses = statuses.iter().map(|(k, v)| (k.clone(), *v)).collect();
        changed
    }

    /// Current fill for a region, mid-fade colors included.
    pub fn fill_color(&self, region_id: &str, now: Instant) -> Rgba {
        let target = status_color(self.status_of(region_id));
        match self.fades.get(region_id) {
            Some(fade) => {
                let t = now.duration_since(fade.started).as_secs_f32()
                    / RECOLOR_FADE.as_secs_f32();
                blend(fade.from, target, t)
            }
            None => target,
        }
    }

    /// Whether any fade is still running; drives the redraw subscription.
    pub fn has_active_fades(&self, now: Instant) -> bool {
        self.fades
            .values()
            .any(|fade| now.duration_since(fade.started) < RECOLOR_FADE)
    }

    /// Drop finished fades so the redraw subscription can stop.
    pub fn prune_fades(&mut self, now: Instant) {
        self.fades
            .retain(|_, fade| now.duration_since(fade.started) < RECOLOR_FADE);
    }
}
