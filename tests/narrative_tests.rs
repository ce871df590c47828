use std::sync::Arc;

use approx::assert_relative_eq;
use storymap::api::{NarrativeController, PageLayout, StepAnchor, StoryConfig, ViewportMode};
use storymap::core::{GeoCoord, Viewport};
use storymap::data::{PointFeature, Region};
use storymap::render::{LayerKind, RenderFrame};

const SETTLED_MS: f64 = 60_000.0;
const NAMES: [&str; 12] = [
    "Blaenau Gwent",
    "Bridgend",
    "Caerphilly",
    "Cardiff",
    "Merthyr Tydfil",
    "Neath Port Talbot",
    "Rhondda Cynon Taf",
    "Swansea",
    "Vale of Glamorgan",
    "Powys",
    "Ceredigion",
    "Gwynedd",
];

fn cell_origin(index: usize) -> (f64, f64) {
    (-5.0 + (index % 4) as f64 * 0.3, 51.2 + (index / 4) as f64 * 0.3)
}

fn regions() -> Arc<[Region]> {
    NAMES
        .iter()
        .enumerate()
        .map(|(index, name)| {
            let (lon, lat) = cell_origin(index);
            Region::polygon(
                *name,
                vec![
                    GeoCoord::new(lon, lat),
                    GeoCoord::new(lon + 0.3, lat),
                    GeoCoord::new(lon + 0.3, lat + 0.3),
                    GeoCoord::new(lon, lat + 0.3),
                    GeoCoord::new(lon, lat),
                ],
            )
            .expect("valid region")
        })
        .collect()
}

fn point_in(index: usize) -> PointFeature {
    let (lon, lat) = cell_origin(index);
    PointFeature::at(lon + 0.15, lat + 0.15).with_authority(NAMES[index])
}

fn points() -> Vec<PointFeature> {
    vec![
        point_in(6).with_category("C"),
        point_in(3).with_category("D"),
        point_in(10).with_category("c"),
    ]
}

fn layout() -> PageLayout {
    PageLayout {
        window_width: 1024,
        viewport_height: 800.0,
        map_container: Viewport::new(1024, 800),
        step_anchors: (0..4)
            .map(|step| StepAnchor::new(1000.0 + 600.0 * f64::from(step), 500.0))
            .collect(),
        step_containers: vec![Viewport::new(360, 500); 4],
    }
}

/// Scroll offset that puts the trigger line inside `step`.
fn scroll_to(step: usize) -> f64 {
    500.0 + 600.0 * step as f64
}

fn controller(mode: ViewportMode) -> NarrativeController {
    NarrativeController::build(mode, regions(), &points(), &layout(), &StoryConfig::default())
        .expect("controller")
}

fn marker_state(frame: &RenderFrame) -> Vec<(f64, String, f64)> {
    frame
        .points
        .markers
        .iter()
        .map(|m| (m.opacity, m.fill.to_hex(), m.radius))
        .collect()
}

#[test]
fn continuous_mode_starts_with_no_active_step() {
    let controller = controller(ViewportMode::Desktop);
    assert_eq!(controller.mode(), ViewportMode::Desktop);
    assert_eq!(controller.current_step(), 0);
    assert_eq!(controller.active_step(), None);
    assert_eq!(controller.step_active_flags(), vec![false; 4]);
    assert_eq!(controller.frames(0.0).len(), 1);
}

#[test]
fn scrolling_enters_each_step_once() {
    let mut controller = controller(ViewportMode::Desktop);
    assert_eq!(controller.on_scroll(0.0, 0.0), None);
    assert_eq!(controller.on_scroll(scroll_to(0), 10.0), Some(0));
    assert_eq!(controller.on_scroll(scroll_to(0) + 50.0, 20.0), None);
    assert_eq!(controller.on_scroll(scroll_to(2), 30.0), Some(2));
    assert_eq!(controller.current_step(), 2);
    assert_eq!(controller.step_active_flags(), vec![false, false, true, false]);
}

#[test]
fn gap_between_steps_keeps_previous_step_active() {
    let mut controller = controller(ViewportMode::Desktop);
    controller.on_scroll(scroll_to(1), 0.0);
    assert_eq!(controller.on_scroll(scroll_to(1) + 450.0, 10.0), None);
    assert_eq!(controller.active_step(), Some(1));
}

#[test]
fn exactly_one_step_is_active_after_any_entry() {
    let mut controller = controller(ViewportMode::Desktop);
    for (i, step) in [0usize, 3, 1, 2, 2, 0].into_iter().enumerate() {
        controller.enter_step(step, i as f64 * 5.0);
        let flags = controller.step_active_flags();
        assert_eq!(flags.iter().filter(|flag| **flag).count(), 1);
        assert!(flags[step]);
    }
}

#[test]
fn fast_scroll_leaves_only_last_step_visible() {
    let mut fast = controller(ViewportMode::Desktop);
    for (i, step) in [0usize, 2, 3, 1].into_iter().enumerate() {
        fast.on_scroll(scroll_to(step), i as f64 * 16.0);
    }

    let mut direct = controller(ViewportMode::Desktop);
    direct.enter_step(1, 0.0);

    let fast_frame = &fast.frames(SETTLED_MS)[0];
    let direct_frame = &direct.frames(SETTLED_MS)[0];
    assert_eq!(fast.current_step(), 1);
    assert_eq!(marker_state(fast_frame), marker_state(direct_frame));
    assert!(fast_frame.boundaries.transform.is_identity());
    assert!(fast_frame.points.transform.is_identity());
}

#[test]
fn out_of_range_step_is_ignored() {
    let mut controller = controller(ViewportMode::Desktop);
    controller.enter_step(2, 0.0);
    let before = controller.frames(SETTLED_MS);

    assert!(!controller.enter_step(4, 100.0));
    assert!(!controller.enter_step(usize::MAX, 100.0));
    assert_eq!(controller.current_step(), 2);
    assert_eq!(controller.active_step(), Some(2));
    assert_eq!(controller.frames(SETTLED_MS), before);
}

#[test]
fn zoom_transition_is_continuous() {
    let mut controller = controller(ViewportMode::Desktop);
    controller.enter_step(2, 1_000.0);
    let surface = controller.surface().expect("shared surface");
    let start = surface.layer_transform_at(LayerKind::Boundaries, 1_000.0);
    let middle = surface.layer_transform_at(LayerKind::Boundaries, 1_750.0);
    let end = surface.layer_transform_at(LayerKind::Boundaries, 2_500.0);

    assert!(start.is_identity());
    assert!(end.scale > 0.0);
    assert_ne!(end, start);
    let (low, high) = (start.scale.min(end.scale), start.scale.max(end.scale));
    assert!(middle.scale > low && middle.scale < high);
    assert_eq!(end, surface.layer_transform(LayerKind::Boundaries));
}

#[test]
fn discrete_mode_builds_one_static_snapshot_per_step() {
    let controller = controller(ViewportMode::Mobile);
    assert_eq!(controller.mode(), ViewportMode::Mobile);
    assert!(controller.surface().is_none());
    assert_eq!(controller.snapshots().len(), 4);

    for snapshot in controller.snapshots() {
        assert_eq!(snapshot.viewport(), Viewport::new(360, 300));
        assert!(!snapshot.is_animating(0.0));
    }

    let frames = controller.frames(0.0);
    assert!(frames[0].boundaries.transform.is_identity());
    assert!(frames[1].boundaries.transform.is_identity());
    assert!(frames[2].boundaries.transform.scale > 0.0);
    assert!(!frames[2].boundaries.transform.is_identity());
    assert_eq!(frames[2].boundaries.transform, frames[3].boundaries.transform);

    for marker in &frames[0].points.markers {
        assert_relative_eq!(marker.opacity, 0.2);
        assert_relative_eq!(marker.radius, 2.0);
    }
    for marker in &frames[2].points.markers {
        assert_relative_eq!(marker.opacity, 0.6);
        assert_relative_eq!(marker.radius, 1.0);
    }
    let focus: Vec<f64> = frames[3].points.markers.iter().map(|m| m.opacity).collect();
    assert_eq!(focus, vec![0.6, 0.0, 0.0]);
}

#[test]
fn discrete_mode_ignores_scroll_and_step_entry() {
    let mut controller = controller(ViewportMode::Mobile);
    let before = controller.frames(0.0);
    assert_eq!(controller.on_scroll(scroll_to(2), 0.0), None);
    assert!(!controller.enter_step(2, 0.0));
    assert_eq!(controller.frames(0.0), before);
    assert_eq!(controller.step_active_flags(), vec![false; 4]);
}

#[test]
fn same_mode_resize_preserves_step_and_stale_transform() {
    let mut controller = controller(ViewportMode::Desktop);
    controller.enter_step(2, 0.0);
    let zoom_before = controller
        .surface()
        .expect("surface")
        .layer_transform(LayerKind::Points);

    let mut resized = layout();
    resized.map_container = Viewport::new(800, 600);
    resized.viewport_height = 600.0;
    assert!(controller.resize(&resized, 5_000.0).expect("resize"));

    let surface = controller.surface().expect("surface");
    assert_eq!(controller.current_step(), 2);
    assert_eq!(controller.active_step(), Some(2));
    assert_eq!(surface.viewport(), Viewport::new(800, 600));
    assert_eq!(surface.layer_transform(LayerKind::Points), zoom_before);
}

#[test]
fn resize_can_reapply_active_step() {
    let config = StoryConfig {
        reapply_step_on_resize: true,
        ..StoryConfig::default()
    };
    let mut controller =
        NarrativeController::build(ViewportMode::Desktop, regions(), &points(), &layout(), &config)
            .expect("controller");
    controller.enter_step(2, 0.0);
    let zoom_before = controller
        .surface()
        .expect("surface")
        .layer_transform(LayerKind::Points);

    let mut resized = layout();
    resized.map_container = Viewport::new(700, 500);
    controller.resize(&resized, 5_000.0).expect("resize");

    let surface = controller.surface().expect("surface");
    let refit = surface.layer_transform(LayerKind::Points);
    assert_ne!(refit, zoom_before);
    assert!(refit.scale > 0.0);
}

#[test]
fn resize_updates_trigger_geometry() {
    let mut controller = controller(ViewportMode::Desktop);
    let mut resized = layout();
    resized.step_anchors = (0..4)
        .map(|step| StepAnchor::new(2000.0 + 900.0 * f64::from(step), 800.0))
        .collect();
    controller.resize(&resized, 0.0).expect("resize");

    assert_eq!(controller.on_scroll(scroll_to(0), 0.0), None);
    assert_eq!(controller.on_scroll(1500.0, 0.0), Some(0));
}
