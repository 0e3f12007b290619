//! GPU-instanced node, edge and pick rendering over a [`RenderBackend`].
//!
//! [`RenderAdapter`] bundles one [`NodeRenderer`] for blocks, one for
//! channels, the [`EdgeRenderer`] and the [`Picker`]. Block pick IDs are
//! `index + 1`; channel pick IDs follow the last block.

pub mod backend;
pub mod edge;
pub mod headless;
pub mod instances;
pub mod node;
pub mod picking;

pub use backend::{BaseGeometry, MeshHandle, PickView, RenderBackend};
pub use edge::EdgeRenderer;
use glam::{Vec2, Vec3};
pub use headless::HeadlessBackend;
pub use instances::{DimStyle, InstanceAttributes};
pub use node::NodeRenderer;
pub use picking::{PickMap, PickTarget, Picker};
use rustc_hash::FxHashSet;
use web_time::{Duration, Instant};

use crate::camera::core::Camera;
use crate::graph::{GraphIndex, NodeRef};
use crate::interaction::highlight::{Highlight, HighlightEdges, HighlightLayers, LayerKind};
use crate::layout::LayoutResult;

const BLOCK_RADIUS: f32 = 1.0;
const CHANNEL_RADIUS: f32 = 2.5;
const BLOCK_OPACITY: f32 = 0.9;
const CHANNEL_OPACITY: f32 = 1.0;
const EDGE_OPACITY: f32 = 0.22;
const CROSS_LINKED_SCALE: f32 = 1.35;

/// Everything drawn for one graph.
#[derive(Debug, Clone)]
pub struct RenderAdapter {
    blocks: NodeRenderer,
    channels: NodeRenderer,
    edges: EdgeRenderer,
    picker: Picker,
}

impl RenderAdapter {
    /// Allocate every mesh at the graph's fixed counts and upload the
    /// baseline colors. Positions start at the origin.
    pub fn new<B: RenderBackend>(
        backend: &mut B,
        graph: &GraphIndex,
        pick_interval: Duration,
    ) -> Self {
        let block_count = graph.block_count();
        let channel_count = graph.channel_count();
        let map = PickMap::new(block_count, channel_count);

        let block_colors = (0..block_count).map(|i| graph.block_color(i)).collect();
        let block_scales: Vec<f32> = (0..block_count)
            .map(|i| {
                if graph.is_cross_linked(i) {
                    CROSS_LINKED_SCALE
                } else {
                    1.0
                }
            })
            .collect();
        let blocks = NodeRenderer::new(
            backend,
            "blocks",
            BLOCK_RADIUS,
            block_colors,
            BLOCK_OPACITY,
            &block_scales,
            map.block_id(0),
        );

        let max_size = graph
            .channels()
            .iter()
            .map(|c| c.size)
            .fold(1.0_f32, f32::max);
        let channel_colors = (0..channel_count).map(|i| graph.channel_color(i)).collect();
        let channel_scales: Vec<f32> = graph
            .channels()
            .iter()
            .map(|c| 1.0 + (c.size.max(0.0) / max_size).sqrt() * 1.5)
            .collect();
        let channels = NodeRenderer::new(
            backend,
            "channels",
            CHANNEL_RADIUS,
            channel_colors,
            CHANNEL_OPACITY,
            &channel_scales,
            map.channel_id(0),
        );

        let edges = EdgeRenderer::new(backend, graph, EDGE_OPACITY);
        log::debug!(
            "render adapter: {block_count} blocks, {channel_count} channels, {} edges",
            edges.len()
        );
        Self {
            blocks,
            channels,
            edges,
            picker: Picker::new(map, pick_interval),
        }
    }

    /// Block spheres.
    pub fn blocks(&self) -> &NodeRenderer {
        &self.blocks
    }

    /// Block spheres, mutable for staging.
    pub fn blocks_mut(&mut self) -> &mut NodeRenderer {
        &mut self.blocks
    }

    /// Channel spheres.
    pub fn channels(&self) -> &NodeRenderer {
        &self.channels
    }

    /// Channel spheres, mutable for staging.
    pub fn channels_mut(&mut self) -> &mut NodeRenderer {
        &mut self.channels
    }

    /// Edge segments and the constellation overlay.
    pub fn edges(&self) -> &EdgeRenderer {
        &self.edges
    }

    /// Edge segments, mutable.
    pub fn edges_mut(&mut self) -> &mut EdgeRenderer {
        &mut self.edges
    }

    /// The picker.
    pub fn picker(&self) -> &Picker {
        &self.picker
    }

    /// The picker, mutable (throttle changes).
    pub fn picker_mut(&mut self) -> &mut Picker {
        &mut self.picker
    }

    /// Current position of `node`.
    pub fn position(&self, node: NodeRef) -> Option<Vec3> {
        match node {
            NodeRef::Block(i) => self.blocks.position(i),
            NodeRef::Channel(i) => self.channels.position(i),
        }
    }

    /// Stage every position from a layout result.
    pub fn stage_layout(&mut self, layout: &LayoutResult) {
        self.blocks.set_positions(&layout.block_positions);
        self.channels.set_positions(&layout.channel_positions);
    }

    /// Positions as they are right now, which may be mid-transition.
    pub fn current_layout(&self) -> LayoutResult {
        LayoutResult {
            channel_positions: self.channels.attributes().positions().to_vec(),
            block_positions: self.blocks.attributes().positions().to_vec(),
        }
    }

    /// Flush node transforms and move edge endpoints to match.
    pub fn commit_positions<B: RenderBackend>(&mut self, backend: &mut B) {
        self.blocks.commit_positions(backend);
        self.channels.commit_positions(backend);
        self.edges.sync_positions(
            backend,
            self.channels.attributes().positions(),
            self.blocks.attributes().positions(),
        );
    }

    /// Flush node colors, opacities and scales.
    pub fn commit_attributes<B: RenderBackend>(&self, backend: &mut B) {
        self.blocks.commit_attributes(backend);
        self.channels.commit_attributes(backend);
        self.edges.commit_attributes(backend);
    }

    /// Restore every instance and edge from baseline and commit.
    pub fn reset_attributes<B: RenderBackend>(&mut self, backend: &mut B) {
        self.blocks.reset_attributes(backend);
        self.channels.reset_attributes(backend);
        self.edges.reset_attributes(backend);
    }

    /// Flatten the highlight stack into one fade per renderer.
    ///
    /// The top layer's lit set stays at baseline and everything else is
    /// dimmed. Scale boosts from every layer are then applied bottom-up
    /// to nodes the top layer keeps lit. The selected node is kept lit
    /// at its selection scale under any higher layer. With no active
    /// layer this is a plain reset.
    pub fn apply_highlight<B: RenderBackend>(
        &mut self,
        backend: &mut B,
        layers: &HighlightLayers,
        dim: DimStyle,
    ) {
        let Some((top_kind, top)) = layers.top() else {
            self.reset_attributes(backend);
            return;
        };
        let pinned = layers
            .get(LayerKind::Selection)
            .filter(|_| top_kind != LayerKind::Selection);
        let keep_block = |i: usize| {
            top.blocks.contains(&i)
                || pinned.is_some_and(|p| p.block_scales.contains_key(&i))
        };
        let keep_channel = |i: usize| {
            top.channels.contains(&i)
                || pinned.is_some_and(|p| p.channel_scales.contains_key(&i))
        };

        self.blocks.attributes_mut().fade_all_except(keep_block, dim);
        self.channels.attributes_mut().fade_all_except(keep_channel, dim);
        for (_, layer) in layers.iter() {
            self.apply_boosts(layer, keep_block, keep_channel);
        }
        if let Some(selection) = pinned {
            self.apply_boosts(selection, keep_block, keep_channel);
        }
        self.blocks.commit_attributes(backend);
        self.channels.commit_attributes(backend);

        match &top.edges {
            HighlightEdges::None => {
                self.edges.fade_edges_except(backend, |_| false, dim);
            }
            HighlightEdges::FollowBlocks => {
                self.edges
                    .fade_all_except(backend, |b| top.blocks.contains(&b), dim);
            }
            HighlightEdges::Pairs(pairs) => {
                let lit: FxHashSet<usize> = pairs
                    .iter()
                    .filter_map(|&(a, b)| self.edges.edge_between(a, b))
                    .collect();
                self.edges
                    .fade_edges_except(backend, |e| lit.contains(&e), dim);
            }
        }
    }

    fn apply_boosts(
        &mut self,
        layer: &Highlight,
        keep_block: impl Fn(usize) -> bool,
        keep_channel: impl Fn(usize) -> bool,
    ) {
        for (&i, &factor) in &layer.block_scales {
            if !keep_block(i) {
                continue;
            }
            if let Some(base) = self.blocks.attributes().base_scale(i) {
                self.blocks.set_scale(i, base * factor);
            }
        }
        for (&i, &factor) in &layer.channel_scales {
            if !keep_channel(i) {
                continue;
            }
            if let Some(base) = self.channels.attributes().base_scale(i) {
                self.channels.set_scale(i, base * factor);
            }
        }
    }

    /// Pick meshes in draw order.
    pub fn pick_meshes(&self) -> [MeshHandle; 2] {
        [self.blocks.pick_mesh(), self.channels.pick_mesh()]
    }

    /// Throttled pick at `cursor`.
    pub fn pick<B: RenderBackend>(
        &mut self,
        backend: &mut B,
        camera: &Camera,
        cursor: Vec2,
        viewport: (u32, u32),
        now: Instant,
    ) -> PickTarget {
        let meshes = self.pick_meshes();
        self.picker
            .pick(backend, &meshes, camera, cursor, viewport, now)
    }

    /// Unthrottled pick at `cursor`, for clicks.
    pub fn pick_now<B: RenderBackend>(
        &mut self,
        backend: &mut B,
        camera: &Camera,
        cursor: Vec2,
        viewport: (u32, u32),
        now: Instant,
    ) -> PickTarget {
        let meshes = self.pick_meshes();
        self.picker
            .pick_now(backend, &meshes, camera, cursor, viewport, now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::tests::fixture;
    use crate::layout::LayoutKind;

    fn adapter() -> (HeadlessBackend, RenderAdapter, GraphIndex) {
        let graph = fixture();
        let mut backend = HeadlessBackend::new();
        let mut adapter = RenderAdapter::new(&mut backend, &graph, Duration::ZERO);
        adapter.stage_layout(&LayoutKind::Spiral.compute(&graph));
        adapter.commit_positions(&mut backend);
        (backend, adapter, graph)
    }

    #[test]
    fn pick_ids_split_blocks_and_channels() {
        let (_, adapter, graph) = adapter();
        assert_eq!(adapter.blocks().pick_id(0), 1);
        assert_eq!(
            adapter.channels().pick_id(0),
            graph.block_count() as u32 + 1
        );
    }

    #[test]
    fn edges_follow_committed_positions() {
        let (backend, adapter, graph) = adapter();
        let edge = graph.edges()[0];
        let [a, b] = adapter.edges().endpoints(0).unwrap();
        assert_eq!(Some(a), adapter.channels().position(edge.channel));
        assert_eq!(Some(b), adapter.blocks().position(edge.block));
        let mesh = backend.mesh(adapter.edges().mesh()).unwrap();
        assert_eq!(mesh.segments.len(), graph.edges().len());
    }

    #[test]
    fn highlight_then_reset_restores_baseline() {
        let (mut backend, mut adapter, _) = adapter();
        let before = adapter.clone();
        let mut layers = HighlightLayers::default();
        let mut hover = Highlight::blocks([1]);
        hover.boost(NodeRef::Block(1), 1.6);
        layers.set(LayerKind::Hover, hover);
        adapter.apply_highlight(&mut backend, &layers, DimStyle::default());

        let base = before.blocks().scale(1).unwrap();
        assert!((adapter.blocks().scale(1).unwrap() - base * 1.6).abs() < 1e-6);
        assert!(adapter.blocks().opacity(0).unwrap() < before.blocks().opacity(0).unwrap());

        layers.clear_all();
        adapter.apply_highlight(&mut backend, &layers, DimStyle::default());
        assert_eq!(adapter.blocks().attributes(), before.blocks().attributes());
        assert_eq!(adapter.channels().attributes(), before.channels().attributes());
        assert_eq!(adapter.edges().attributes(), before.edges().attributes());
    }

    #[test]
    fn selection_keeps_its_boost_under_hover() {
        let (mut backend, mut adapter, _) = adapter();
        let base = adapter.blocks().scale(3).unwrap();
        let mut layers = HighlightLayers::default();
        let mut selection = Highlight::blocks([3]);
        selection.boost(NodeRef::Block(3), 1.9);
        layers.set(LayerKind::Selection, selection);
        let mut hover = Highlight::blocks([0]);
        hover.boost(NodeRef::Block(0), 1.6);
        layers.set(LayerKind::Hover, hover);
        adapter.apply_highlight(&mut backend, &layers, DimStyle::default());

        let blocks = adapter.blocks().attributes();
        assert!((adapter.blocks().scale(3).unwrap() - base * 1.9).abs() < 1e-6);
        assert_eq!(blocks.opacity(3), blocks.base_opacity(3));
        assert!(blocks.opacity(1) < blocks.base_opacity(1));

        // Hovering the selected node itself keeps the selection scale.
        let mut hover = Highlight::blocks([3]);
        hover.boost(NodeRef::Block(3), 1.6);
        layers.set(LayerKind::Hover, hover);
        adapter.apply_highlight(&mut backend, &layers, DimStyle::default());
        assert!((adapter.blocks().scale(3).unwrap() - base * 1.9).abs() < 1e-6);
    }

    #[test]
    fn pair_edges_light_only_the_named_segments() {
        let (mut backend, mut adapter, graph) = adapter();
        let edge = graph.edges()[0];
        let pair = (NodeRef::Channel(edge.channel), NodeRef::Block(edge.block));
        let mut layers = HighlightLayers::default();
        layers.set(
            LayerKind::Path,
            Highlight {
                edges: HighlightEdges::Pairs(vec![pair]),
                ..Highlight::default()
            },
        );
        adapter.apply_highlight(&mut backend, &layers, DimStyle::default());
        let attrs = adapter.edges().attributes();
        assert_eq!(attrs.opacity(0), attrs.base_opacity(0));
        for i in 1..attrs.len() {
            assert!(attrs.opacity(i) < attrs.base_opacity(i));
        }
    }
}
