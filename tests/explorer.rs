//! End-to-end sessions driven through the command interface on the CPU
//! backend.

use std::cell::RefCell;
use std::rc::Rc;

use arena_atlas::animation::AmbientMode;
use arena_atlas::engine::{Explorer, ExplorerCommand};
use arena_atlas::graph::NodeRef;
use arena_atlas::input::InputEvent;
use arena_atlas::layout::LayoutKind;
use arena_atlas::options::Options;
use arena_atlas::renderer::{HeadlessBackend, RenderBackend};
use arena_atlas::state::{StateKey, StateValue};
use web_time::{Duration, Instant};

/// Three channels, five blocks. `b1` sits in both `c1` and `c2`; `b4`
/// belongs to no channel.
const GRAPH: &str = r#"{
    "meta": { "channelCount": 3, "blockCount": 5 },
    "elements": {
        "nodes": [
            { "data": { "id": "c1", "type": "channel", "label": "Sea" } },
            { "data": { "id": "c2", "type": "channel", "label": "Stone" } },
            { "data": { "id": "c3", "type": "channel", "label": "Sky" } },
            { "data": { "id": "b0", "type": "Image", "label": "wave study",
                        "createdAt": "2020-01-01T00:00:00Z",
                        "autoTags": ["theme:sea", "medium:ink"] } },
            { "data": { "id": "b1", "type": "Text", "label": "tide pool",
                        "createdAt": "2021-01-01T00:00:00Z",
                        "autoTags": ["theme:sea", "theme:stone"] } },
            { "data": { "id": "b2", "type": "Link", "label": "granite quarry",
                        "createdAt": "2022-01-01T00:00:00Z",
                        "autoTags": ["theme:stone"] } },
            { "data": { "id": "b3", "type": "Media", "label": "cloud timelapse",
                        "createdAt": "2023-01-01T00:00:00Z",
                        "thumb": "https://img/b3.png",
                        "autoTags": ["theme:sky", "medium:ink"] } },
            { "data": { "id": "b4", "type": "Text", "label": "loose note" } }
        ],
        "edges": [
            { "data": { "id": "e0", "source": "c1", "target": "b0" } },
            { "data": { "id": "e1", "source": "c1", "target": "b1" } },
            { "data": { "id": "e2", "source": "c2", "target": "b1" } },
            { "data": { "id": "e3", "source": "c2", "target": "b2" } },
            { "data": { "id": "e4", "source": "c3", "target": "b3" } }
        ]
    }
}"#;

const VIEWPORT: (u32, u32) = (800, 600);

fn explorer(now: Instant) -> Explorer<HeadlessBackend> {
    Explorer::from_json(
        HeadlessBackend::new(),
        GRAPH,
        Options::default(),
        VIEWPORT,
        now,
    )
    .unwrap()
}

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

fn is_dimmed(e: &Explorer<HeadlessBackend>, block: usize) -> bool {
    let attrs = e.adapter().blocks().attributes();
    attrs.opacity(block).unwrap() < attrs.base_opacity(block).unwrap()
}

#[test]
fn malformed_payload_is_fatal() {
    let now = Instant::now();
    let result = Explorer::from_json(
        HeadlessBackend::new(),
        "{ not json",
        Options::default(),
        VIEWPORT,
        now,
    );
    assert!(result.is_err());
    let missing = Explorer::from_json(
        HeadlessBackend::new(),
        r#"{ "elements": { "nodes": [] } }"#,
        Options::default(),
        VIEWPORT,
        now,
    );
    assert!(missing.is_err());
}

#[test]
fn hovering_a_cross_linked_block_lights_both_channels() {
    let now = Instant::now();
    let mut e = explorer(now);
    let baseline = e.adapter().clone();

    e.execute(ExplorerCommand::Hover { node: Some(NodeRef::Block(1)) }, now);
    for b in [0, 1, 2] {
        assert!(!is_dimmed(&e, b), "block {b} should stay lit");
    }
    for b in [3, 4] {
        assert!(is_dimmed(&e, b), "block {b} should dim");
    }
    let blocks = e.adapter().blocks().attributes();
    let hover_scale = e.options().interaction.hover_scale;
    assert!(
        (blocks.scale(1).unwrap() - blocks.base_scale(1).unwrap() * hover_scale).abs() < 1e-5
    );
    assert_eq!(e.state().get(StateKey::HighlightCount), &StateValue::Count(5));

    e.execute(ExplorerCommand::Hover { node: None }, now);
    assert_eq!(e.adapter().blocks().attributes(), baseline.blocks().attributes());
    assert_eq!(e.adapter().channels().attributes(), baseline.channels().attributes());
    assert_eq!(e.adapter().edges().attributes(), baseline.edges().attributes());
    assert_eq!(e.state().get(StateKey::HighlightCount), &StateValue::Count(0));
}

#[test]
fn selection_flies_and_survives_hover_changes() {
    let t0 = Instant::now();
    let mut e = explorer(t0);
    e.execute(ExplorerCommand::Select { node: NodeRef::Block(3) }, t0);
    e.execute(ExplorerCommand::Hover { node: Some(NodeRef::Block(0)) }, t0);
    e.execute(ExplorerCommand::Hover { node: None }, t0);
    assert!(!is_dimmed(&e, 3));
    assert!(is_dimmed(&e, 0));
    assert_eq!(e.state().get(StateKey::Gallery).as_indices(), &[3]);

    let target = e.adapter().position(NodeRef::Block(3)).unwrap();
    e.tick(t0 + ms(5_000));
    assert!((e.camera_controller().focus() - target).length() < 1e-3);

    e.execute(ExplorerCommand::ClearSelection, t0 + ms(5_000));
    assert!(!is_dimmed(&e, 0));
    assert!(e.selected().is_none());
}

#[test]
fn selected_block_stays_enlarged_while_another_is_hovered() {
    let now = Instant::now();
    let mut e = explorer(now);
    let selection_scale = e.options().interaction.selection_scale;
    let hover_scale = e.options().interaction.hover_scale;
    e.execute(ExplorerCommand::Select { node: NodeRef::Block(3) }, now);
    e.execute(ExplorerCommand::Hover { node: Some(NodeRef::Block(0)) }, now);

    let blocks = e.adapter().blocks().attributes();
    let enlarged = blocks.base_scale(3).unwrap() * selection_scale;
    assert!((blocks.scale(3).unwrap() - enlarged).abs() < 1e-5);
    assert!(!is_dimmed(&e, 3));
    let hovered = blocks.base_scale(0).unwrap() * hover_scale;
    assert!((blocks.scale(0).unwrap() - hovered).abs() < 1e-5);
    assert!(is_dimmed(&e, 2));

    e.execute(ExplorerCommand::Hover { node: Some(NodeRef::Block(3)) }, now);
    let blocks = e.adapter().blocks().attributes();
    assert!((blocks.scale(3).unwrap() - enlarged).abs() < 1e-5);
}

#[test]
fn non_finite_transition_time_lands_at_once() {
    let t0 = Instant::now();
    let mut e = explorer(t0);
    assert!(Options::from_toml("[layout]\ntransition_ms = inf").is_err());

    for bad in [f32::INFINITY, f32::NAN, f32::MAX, -10.0] {
        let mut options = Options::default();
        options.layout.transition_ms = bad;
        options.camera.fly_duration_ms = bad;
        e.set_options(options);

        e.execute(ExplorerCommand::NextLayout, t0);
        e.execute(ExplorerCommand::Select { node: NodeRef::Block(1) }, t0);
        e.tick(t0);
        assert!(!e.is_transitioning(), "transition_ms = {bad}");
        assert_eq!(e.adapter().current_layout(), e.layout().compute(e.graph()));
    }
}

#[test]
fn second_layout_switch_supersedes_the_first() {
    let t0 = Instant::now();
    let mut e = explorer(t0);
    let galaxy = LayoutKind::Galaxy.compute(e.graph());
    let sphere = LayoutKind::Sphere.compute(e.graph());

    e.execute(ExplorerCommand::SetLayout { kind: LayoutKind::Galaxy }, t0);
    e.tick(t0 + ms(100));
    e.execute(ExplorerCommand::SetLayout { kind: LayoutKind::Sphere }, t0 + ms(100));

    let mut t = t0 + ms(100);
    while e.is_transitioning() {
        t += ms(50);
        e.tick(t);
        assert_ne!(e.adapter().current_layout(), galaxy);
        assert!(t < t0 + ms(10_000), "transition never finished");
    }
    assert_eq!(e.adapter().current_layout(), sphere);
    assert_eq!(e.layout(), LayoutKind::Sphere);
    assert_eq!(
        e.state().get(StateKey::Layout),
        &StateValue::Layout(LayoutKind::Sphere)
    );
}

#[test]
fn next_layout_cycles() {
    let now = Instant::now();
    let mut e = explorer(now);
    for expected in [
        LayoutKind::Galaxy,
        LayoutKind::Sphere,
        LayoutKind::Anatomical,
        LayoutKind::Spiral,
    ] {
        e.execute(ExplorerCommand::NextLayout, now);
        assert_eq!(e.layout(), expected);
    }
}

#[test]
fn full_timeline_filters_nothing_and_a_point_window_does_not_crash() {
    let now = Instant::now();
    let mut e = explorer(now);
    e.execute(ExplorerCommand::SetTimeline { lo: 0.0, hi: 1.0 }, now);
    assert!(e.state().get(StateKey::FilterResult).is_none());
    assert!(e.highlights().is_empty());
    assert!((0..5).all(|b| !is_dimmed(&e, b)));

    e.execute(ExplorerCommand::SetTimeline { lo: 0.5, hi: 0.5 }, now);
    assert_eq!(e.state().get(StateKey::FilterCount).as_count(), 0);
    assert!((0..5).all(|b| is_dimmed(&e, b)));

    // The newest block sits exactly on the window's upper edge.
    e.execute(ExplorerCommand::SetTimeline { lo: 1.0, hi: 1.0 }, now);
    assert_eq!(e.state().get(StateKey::FilterResult).as_indices(), &[3]);
    assert!(!is_dimmed(&e, 3));
    assert!(is_dimmed(&e, 0));

    e.execute(ExplorerCommand::SetTimeline { lo: f32::NAN, hi: f32::INFINITY }, now);
    assert!(e.state().get(StateKey::FilterResult).is_none());

    e.execute(ExplorerCommand::ClearFilters, now);
    assert!(e.highlights().is_empty());
}

#[test]
fn search_is_debounced_and_order_independent() {
    let t0 = Instant::now();
    let mut e = explorer(t0);

    e.execute(ExplorerCommand::Search { query: "sea ink".into() }, t0);
    e.tick(t0 + ms(50));
    assert!(e.state().get(StateKey::SearchResults).is_none());
    e.tick(t0 + ms(200));
    let forward = e.state().get(StateKey::SearchResults).clone();
    assert_eq!(forward.as_indices(), &[0]);

    e.execute(ExplorerCommand::Search { query: "ink sea".into() }, t0 + ms(300));
    e.tick(t0 + ms(500));
    assert_eq!(e.state().get(StateKey::SearchResults), &forward);

    e.execute(ExplorerCommand::Search { query: String::new() }, t0 + ms(600));
    assert!(e.state().get(StateKey::SearchResults).is_none());
}

#[test]
fn filters_combine_by_intersection() {
    let now = Instant::now();
    let mut e = explorer(now);
    e.execute(ExplorerCommand::SetTagFilter { tag: Some("theme:stone".into()) }, now);
    assert_eq!(e.state().get(StateKey::FilterResult).as_indices(), &[1, 2]);
    e.execute(ExplorerCommand::SetChannelFilter { channel: Some(0) }, now);
    assert_eq!(e.state().get(StateKey::FilterResult).as_indices(), &[1]);
    e.execute(ExplorerCommand::SetChannelFilter { channel: None }, now);
    e.execute(
        ExplorerCommand::ToggleType { class: arena_atlas::graph::BlockClass::Link },
        now,
    );
    assert_eq!(e.state().get(StateKey::FilterResult).as_indices(), &[2]);
}

#[test]
fn two_path_points_find_the_shortest_path() {
    let now = Instant::now();
    let mut e = explorer(now);
    e.execute(ExplorerCommand::PathPoint { node: NodeRef::Block(0) }, now);
    e.execute(ExplorerCommand::PathPoint { node: NodeRef::Block(2) }, now);
    assert_eq!(e.state().get(StateKey::PathLength).as_count(), 4);
    assert_eq!(e.state().get(StateKey::Path).as_nodes().len(), 5);
    assert!(is_dimmed(&e, 3));
    assert!(!is_dimmed(&e, 1));

    e.execute(ExplorerCommand::PathPoint { node: NodeRef::Block(4) }, now);
    e.execute(ExplorerCommand::PathPoint { node: NodeRef::Block(0) }, now);
    assert_eq!(e.state().get(StateKey::Path), &StateValue::Nodes(Vec::new()));
    assert_eq!(e.state().get(StateKey::PathLength), &StateValue::Unreachable);

    e.execute(ExplorerCommand::PathPoint { node: NodeRef::Block(2) }, now);
    e.execute(ExplorerCommand::PathPoint { node: NodeRef::Block(2) }, now);
    assert_eq!(e.state().get(StateKey::PathLength), &StateValue::Count(0));

    e.execute(ExplorerCommand::ClearPath, now);
    assert!(e.highlights().is_empty());
}

#[test]
fn similarity_is_deterministic() {
    let now = Instant::now();
    let mut e = explorer(now);
    e.execute(ExplorerCommand::FindSimilar { block: 0 }, now);
    let first = e.state().get(StateKey::SimilarityResults).clone();
    assert_eq!(first.as_scores(), &[(1, 1), (3, 1)]);
    e.execute(ExplorerCommand::ClearSimilar, now);
    e.execute(ExplorerCommand::FindSimilar { block: 0 }, now);
    assert_eq!(e.state().get(StateKey::SimilarityResults), &first);
    assert!(is_dimmed(&e, 2));
}

#[test]
fn ambient_modes_exclude_each_other_and_restore_exactly() {
    let t0 = Instant::now();
    let mut e = explorer(t0);
    let bloom = e.options().post_processing.bloom_strength;
    let relax = e.options().ambient.bloom_relax;
    let baseline = e.adapter().clone();

    e.execute(ExplorerCommand::ToggleLiving, t0);
    e.tick(t0 + ms(700));
    assert_eq!(e.ambient_mode(), AmbientMode::Living);
    assert_ne!(e.adapter().current_layout(), baseline.current_layout());

    e.execute(ExplorerCommand::ToggleAurora, t0 + ms(700));
    e.tick(t0 + ms(1_400));
    assert_eq!(e.ambient_mode(), AmbientMode::Aurora);
    assert!((e.backend().bloom_strength() - bloom * relax).abs() < 1e-5);

    e.execute(ExplorerCommand::SetAmbient { mode: AmbientMode::Off }, t0 + ms(1_400));
    assert_eq!(e.adapter().blocks().attributes(), baseline.blocks().attributes());
    assert_eq!(e.adapter().channels().attributes(), baseline.channels().attributes());
    assert!((e.backend().bloom_strength() - bloom).abs() < 1e-6);
    assert_eq!(
        e.state().get(StateKey::Ambient),
        &StateValue::Ambient(AmbientMode::Off)
    );
}

#[test]
fn layout_switch_stops_ambient() {
    let t0 = Instant::now();
    let mut e = explorer(t0);
    e.execute(ExplorerCommand::ToggleAurora, t0);
    e.execute(ExplorerCommand::SetLayout { kind: LayoutKind::Galaxy }, t0 + ms(10));
    assert_eq!(e.ambient_mode(), AmbientMode::Off);
    assert!(e.is_transitioning());
}

#[test]
fn picking_over_background_and_over_a_node() {
    let t0 = Instant::now();
    let mut e = explorer(t0);

    e.handle_input(InputEvent::CursorMoved { x: 1.0, y: 1.0 }, t0);
    assert_eq!(e.hovered(), None);

    let p = e.adapter().position(NodeRef::Block(4)).unwrap();
    let screen = e.camera().project(p, VIEWPORT).unwrap();
    e.handle_input(
        InputEvent::CursorMoved { x: screen.x, y: screen.y },
        t0 + ms(100),
    );
    assert!(e.hovered().is_some());
    assert!(e.backend().pick_reads() >= 2);
}

#[test]
fn constellation_follows_the_selected_channel() {
    let now = Instant::now();
    let mut e = explorer(now);
    e.execute(ExplorerCommand::ToggleConstellation, now);
    assert_eq!(e.constellation(), None);

    e.execute(ExplorerCommand::Select { node: NodeRef::Channel(1) }, now);
    e.execute(ExplorerCommand::ToggleConstellation, now);
    assert_eq!(e.constellation(), Some(1));
    assert_eq!(e.adapter().edges().constellation_len(), 1);
    assert!(e.state().get(StateKey::Constellation).as_bool());

    e.execute(ExplorerCommand::ToggleConstellation, now);
    assert_eq!(e.constellation(), None);
    assert_eq!(e.adapter().edges().constellation_len(), 0);
}

#[test]
fn keys_map_through_bindings() {
    let now = Instant::now();
    let mut e = explorer(now);
    assert!(e.handle_key("KeyL", now));
    assert_eq!(e.layout(), LayoutKind::Galaxy);
    assert!(!e.handle_key("KeyZ", now));
    // Needs a selected block.
    assert!(!e.handle_key("KeyS", now));
    e.execute(ExplorerCommand::Select { node: NodeRef::Block(1) }, now);
    assert!(e.handle_key("KeyS", now));
    assert!(!e.state().get(StateKey::SimilarityResults).is_none());
    assert!(e.handle_key("KeyO", now));
    assert!(e.state().get(StateKey::Orbiting).as_bool());
}

#[test]
fn listeners_see_whole_batches() {
    let now = Instant::now();
    let mut e = explorer(now);
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let _ = e.subscribe(None, move |change| sink.borrow_mut().push(change.key));

    e.execute(ExplorerCommand::PathPoint { node: NodeRef::Block(0) }, now);
    e.execute(ExplorerCommand::PathPoint { node: NodeRef::Block(1) }, now);
    let seen = seen.borrow();
    assert!(seen.contains(&StateKey::PathStart));
    assert!(seen.contains(&StateKey::PathEnd));
    assert!(seen.contains(&StateKey::PathLength));
}
