//! Tests for topology decoding, projection, and the map scene.
//!
//! Covers:
//! - GeoJSON decoding (polygon, multi-polygon, holes) and the id contract
//!   with the country catalog
//! - Fit projection and viewport zoom/pan math
//! - Hit-testing, the click cycle, and recolor diffing with fades

mod common;

use std::time::Instant;

use common::*;
use travelmarks::core::catalog::Catalog;
use travelmarks::core::status::CountryStatus;
use travelmarks::map::projection::{FitProjection, MAX_ZOOM, MIN_ZOOM, Viewport, point_in_ring};
use travelmarks::map::scene::{
    BASE_HEIGHT, BASE_WIDTH, MapScene, RECOLOR_FADE, Rgba, blend, status_color,
};
use travelmarks::map::topology::WorldTopology;

/// Project a lon/lat point the same way the scene does, for hit-testing
/// against scene coordinates.
fn base_point(topology: &WorldTopology, lon: f64, lat: f64) -> (f32, f32) {
    let projection = FitProjection::fit(topology.bounds().unwrap(), BASE_WIDTH, BASE_HEIGHT);
    projection.project(lon, lat)
}

#[tokio::test]
async fn topology_loads_from_disk() -> anyhow::Result<()> {
    let topology = WorldTopology::load("assets/world-mini.geo.json").await?;
    assert_eq!(topology.regions.len(), 10);
    let japan = topology.regions.iter().find(|r| r.id == "JP").unwrap();
    assert_eq!(japan.name, "Japan");
    assert_eq!(japan.polygons.len(), 2); // MultiPolygon
    Ok(())
}

#[tokio::test]
async fn missing_topology_file_is_an_error() {
    let result = WorldTopology::load("assets/no-such-file.geo.json").await;
    assert!(result.is_err());
}

#[test]
fn region_ids_match_the_catalog() {
    // The topology and the catalog must share one id scheme, otherwise
    // color lookups and click routing silently break.
    let catalog = Catalog::bundled().unwrap();
    for region in &mini_topology().regions {
        assert!(
            catalog.contains(&region.id),
            "region {} not in catalog",
            region.id
        );
    }
}

#[test]
fn point_in_ring_basics() {
    let square = [(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)];
    assert!(point_in_ring((5.0, 5.0), &square));
    assert!(!point_in_ring((15.0, 5.0), &square));
    assert!(!point_in_ring((-1.0, -1.0), &square));
}

#[test]
fn fit_projection_maps_bounds_into_target() {
    let topology = mini_topology();
    let bounds = topology.bounds().unwrap();
    let projection = FitProjection::fit(bounds, BASE_WIDTH, BASE_HEIGHT);

    let (x1, y1) = projection.project(bounds.min_lon, bounds.max_lat);
    let (x2, y2) = projection.project(bounds.max_lon, bounds.min_lat);
    assert!(x1 >= -0.5 && x2 <= BASE_WIDTH + 0.5);
    assert!(y1 >= -0.5 && y2 <= BASE_HEIGHT + 0.5);
    // North is up: higher latitude projects to a smaller y.
    assert!(y1 < y2);
    assert!(x1 < x2);
}

#[test]
fn hit_testing_finds_regions_and_respects_holes() {
    let topology = mini_topology();
    let scene = MapScene::new(&topology, &status_map(&[]));

    let inside_us = base_point(&topology, -100.0, 40.0);
    assert_eq!(scene.region_at(inside_us).map(|r| r.id.as_str()), Some("US"));

    // Mid-Atlantic hits nothing.
    let ocean = base_point(&topology, -30.0, 0.0);
    assert!(scene.region_at(ocean).is_none());

    // Lesotho sits in a hole of the South Africa polygon.
    let inside_lesotho = base_point(&topology, 28.2, -29.6);
    assert_eq!(
        scene.region_at(inside_lesotho).map(|r| r.id.as_str()),
        Some("LS")
    );
    let inside_za = base_point(&topology, 20.0, -30.0);
    assert_eq!(scene.region_at(inside_za).map(|r| r.id.as_str()), Some("ZA"));
}

#[test]
fn scene_click_cycle_tracks_its_own_snapshot() {
    let topology = mini_topology();
    let mut scene = MapScene::new(&topology, &status_map(&[]));
    let now = Instant::now();

    // Repeated clicks must advance from the *current* status each time.
    assert_eq!(scene.next_status("US"), Some(CountryStatus::Visited));
    scene.apply_statuses(&status_map(&[("US", CountryStatus::Visited)]), now);
    assert_eq!(scene.next_status("US"), Some(CountryStatus::Wishlist));
    scene.apply_statuses(&status_map(&[("US", CountryStatus::Wishlist)]), now);
    assert_eq!(scene.next_status("US"), None);
    scene.apply_statuses(&status_map(&[]), now);
    assert_eq!(scene.next_status("US"), Some(CountryStatus::Visited));
}

#[test]
fn apply_statuses_reports_exactly_the_changed_regions() {
    let topology = mini_topology();
    let mut scene = MapScene::new(&topology, &status_map(&[("US", CountryStatus::Visited)]));
    let now = Instant::now();

    let changed = scene.apply_statuses(
        &status_map(&[
            ("US", CountryStatus::Visited), // unchanged
            ("FR", CountryStatus::Wishlist),
        ]),
        now,
    );
    assert_eq!(changed, vec!["FR".to_string()]);

    // Re-applying the same map is a no-op.
    let changed = scene.apply_statuses(
        &status_map(&[
            ("US", CountryStatus::Visited),
            ("FR", CountryStatus::Wishlist),
        ]),
        now,
    );
    assert!(changed.is_empty());
}

#[test]
fn fills_fade_and_then_settle() {
    let topology = mini_topology();
    let mut scene = MapScene::new(&topology, &status_map(&[]));
    let start = Instant::now();

    scene.apply_statuses(&status_map(&[("US", CountryStatus::Visited)]), start);
    assert!(scene.has_active_fades(start));

    // Mid-fade the fill sits between gray and green.
    let mid = scene.fill_color("US", start + RECOLOR_FADE / 2);
    assert!(mid.g > Rgba::UNMARKED.g && mid.g < Rgba::VISITED.g);

    // After the fade the fill is exactly the status color.
    let settled = scene.fill_color("US", start + RECOLOR_FADE * 2);
    assert_eq!(settled, Rgba::VISITED);
    assert!(!scene.has_active_fades(start + RECOLOR_FADE * 2));

    scene.prune_fades(start + RECOLOR_FADE * 2);
    assert_eq!(scene.fill_color("US", start + RECOLOR_FADE * 2), Rgba::VISITED);
}

#[test]
fn status_colors_are_fixed() {
    assert_eq!(status_color(Some(CountryStatus::Visited)), Rgba::VISITED);
    assert_eq!(status_color(Some(CountryStatus::Wishlist)), Rgba::WISHLIST);
    assert_eq!(status_color(None), Rgba::UNMARKED);

    let halfway = blend(Rgba::UNMARKED, Rgba::VISITED, 0.5);
    assert!((halfway.r - (Rgba::UNMARKED.r + Rgba::VISITED.r) / 2.0).abs() < 1e-6);
    assert_eq!(blend(Rgba::UNMARKED, Rgba::VISITED, 0.0), Rgba::UNMARKED);
    assert_eq!(blend(Rgba::UNMARKED, Rgba::VISITED, 1.0), Rgba::VISITED);
    // Out-of-range t clamps instead of overshooting.
    assert_eq!(blend(Rgba::UNMARKED, Rgba::VISITED, 7.0), Rgba::VISITED);
}

#[test]
fn viewport_zoom_is_clamped() {
    let mut viewport = Viewport::default();
    viewport.zoom_by(1000.0, (100.0, 100.0));
    assert_eq!(viewport.zoom, MAX_ZOOM);

    viewport.zoom_by(0.0001, (100.0, 100.0));
    assert_eq!(viewport.zoom, MIN_ZOOM);
    // Fully zoomed out snaps back to the fitted view.
    assert_eq!((viewport.pan_x, viewport.pan_y), (0.0, 0.0));
}

#[test]
fn viewport_transform_round_trips() {
    let mut viewport = Viewport::default();
    viewport.zoom_by(2.0, (300.0, 200.0));
    viewport.pan_by(-40.0, 25.0);

    let base = (123.4, 56.7);
    let screen = viewport.to_screen(base);
    let back = viewport.to_base(screen);
    assert!((back.0 - base.0).abs() < 1e-3);
    assert!((back.1 - base.1).abs() < 1e-3);
}

#[test]
fn zoom_keeps_the_anchor_point_fixed() {
    let mut viewport = Viewport::default();
    let anchor_base = (250.0, 125.0);
    let anchor_screen = viewport.to_screen(anchor_base);

    viewport.zoom_by(3.0, anchor_screen);
    let after = viewport.to_screen(anchor_base);
    assert!((after.0 - anchor_screen.0).abs() < 1e-3);
    assert!((after.1 - anchor_screen.1).abs() < 1e-3);
}

#[test]
fn viewport_reset_restores_the_fit() {
    let mut viewport = Viewport::default();
    viewport.zoom_by(4.0, (10.0, 10.0));
    viewport.pan_by(33.0, -12.0);
    viewport.reset();
    assert_eq!(viewport, Viewport::default());
}
