//! Instanced channel → block line segments and the constellation overlay.
//!
//! Edge state is addressed two ways: by target block (every edge into a
//! block follows that block's highlight) and by endpoint pair, through a
//! bidirectional index built once so a path `[a, b, c]` maps straight to
//! its segments.

use glam::Vec3;
use rustc_hash::FxHashMap;

use super::backend::{BaseGeometry, MeshHandle, RenderBackend};
use super::instances::{DimStyle, InstanceAttributes};
use crate::graph::{GraphEdge, GraphIndex, NodeRef};

const CONSTELLATION_DASH: f32 = 1.5;
const CONSTELLATION_GAP: f32 = 1.0;

/// Segment mesh for every graph edge plus a dashed overlay mesh.
#[derive(Debug, Clone)]
pub struct EdgeRenderer {
    mesh: MeshHandle,
    overlay: MeshHandle,
    overlay_capacity: usize,
    overlay_len: usize,
    edges: Vec<GraphEdge>,
    attributes: InstanceAttributes,
    endpoints: Vec<[Vec3; 2]>,
    by_block: Vec<Vec<usize>>,
    between: FxHashMap<(NodeRef, NodeRef), usize>,
}

impl EdgeRenderer {
    /// One segment per edge of `graph`, colored by its channel.
    pub fn new<B: RenderBackend>(
        backend: &mut B,
        graph: &GraphIndex,
        opacity: f32,
    ) -> Self {
        let edges = graph.edges().to_vec();
        let colors = edges
            .iter()
            .map(|e| graph.channel_color(e.channel))
            .collect();
        let attributes = InstanceAttributes::new(colors, opacity, &[]);

        let mut by_block = vec![Vec::new(); graph.block_count()];
        let mut between = FxHashMap::default();
        for (i, edge) in edges.iter().enumerate() {
            by_block[edge.block].push(i);
            let c = NodeRef::Channel(edge.channel);
            let b = NodeRef::Block(edge.block);
            let _ = between.insert((c, b), i);
            let _ = between.insert((b, c), i);
        }

        let mesh = backend.create_instanced_mesh(
            "edges",
            BaseGeometry::Segment,
            edges.len(),
        );
        let overlay_capacity = graph.block_count() + graph.channel_count();
        let overlay = backend.create_instanced_mesh(
            "constellation",
            BaseGeometry::DashedSegment {
                dash: CONSTELLATION_DASH,
                gap: CONSTELLATION_GAP,
            },
            overlay_capacity,
        );
        backend.set_instance_count(overlay, 0);
        backend.set_visible(overlay, false);

        let renderer = Self {
            mesh,
            overlay,
            overlay_capacity,
            overlay_len: 0,
            endpoints: vec![[Vec3::ZERO; 2]; edges.len()],
            edges,
            attributes,
            by_block,
            between,
        };
        renderer.commit_attributes(backend);
        renderer
    }

    /// Segment mesh handle.
    pub fn mesh(&self) -> MeshHandle {
        self.mesh
    }

    /// Constellation overlay mesh handle.
    pub fn overlay_mesh(&self) -> MeshHandle {
        self.overlay
    }

    /// Number of edge segments.
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Whether there are no edges.
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Live attribute arrays, one entry per edge.
    pub fn attributes(&self) -> &InstanceAttributes {
        &self.attributes
    }

    /// Current endpoints of edge `i`.
    pub fn endpoints(&self, i: usize) -> Option<[Vec3; 2]> {
        self.endpoints.get(i).copied()
    }

    /// Edges whose target is `block`.
    pub fn edges_of_block(&self, block: usize) -> &[usize] {
        self.by_block
            .get(block)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// The edge joining `a` and `b`, in either order.
    pub fn edge_between(&self, a: NodeRef, b: NodeRef) -> Option<usize> {
        self.between.get(&(a, b)).copied()
    }

    /// Edges joining consecutive nodes of `path`.
    pub fn path_edges(&self, path: &[NodeRef]) -> Vec<usize> {
        path.windows(2)
            .filter_map(|pair| self.edge_between(pair[0], pair[1]))
            .collect()
    }

    /// Recompute endpoints from node positions and upload them.
    pub fn sync_positions<B: RenderBackend>(
        &mut self,
        backend: &mut B,
        channel_positions: &[Vec3],
        block_positions: &[Vec3],
    ) {
        for (slot, edge) in self.endpoints.iter_mut().zip(&self.edges) {
            let (Some(&a), Some(&b)) = (
                channel_positions.get(edge.channel),
                block_positions.get(edge.block),
            ) else {
                continue;
            };
            *slot = [a, b];
        }
        backend.write_segments(self.mesh, &self.endpoints);
    }

    /// Flush colors and opacities.
    pub fn commit_attributes<B: RenderBackend>(&self, backend: &mut B) {
        backend.write_colors(
            self.mesh,
            self.attributes.colors(),
            self.attributes.opacities(),
        );
    }

    /// Keep edges into blocks accepted by `keep_block`, dim the rest,
    /// commit once.
    pub fn fade_all_except<B: RenderBackend>(
        &mut self,
        backend: &mut B,
        keep_block: impl Fn(usize) -> bool,
        dim: DimStyle,
    ) {
        let edges = &self.edges;
        self.attributes.fade_all_except(
            |i| edges.get(i).is_some_and(|e| keep_block(e.block)),
            dim,
        );
        self.commit_attributes(backend);
    }

    /// Keep the edges accepted by `keep_edge`, dim the rest, commit once.
    pub fn fade_edges_except<B: RenderBackend>(
        &mut self,
        backend: &mut B,
        keep_edge: impl Fn(usize) -> bool,
        dim: DimStyle,
    ) {
        self.attributes.fade_all_except(keep_edge, dim);
        self.commit_attributes(backend);
    }

    /// Restore every edge from baseline and commit.
    pub fn reset_attributes<B: RenderBackend>(&mut self, backend: &mut B) {
        self.attributes.restore_all();
        self.commit_attributes(backend);
    }

    /// Replace the overlay with dashed segments through `points` in order.
    /// Extra points beyond the overlay capacity are dropped.
    pub fn show_constellation<B: RenderBackend>(
        &mut self,
        backend: &mut B,
        points: &[Vec3],
        color: [f32; 3],
    ) {
        let segments: Vec<[Vec3; 2]> = points
            .windows(2)
            .map(|pair| [pair[0], pair[1]])
            .take(self.overlay_capacity)
            .collect();
        if segments.is_empty() {
            self.clear_constellation(backend);
            return;
        }
        let colors = vec![color; segments.len()];
        let opacities = vec![0.9; segments.len()];
        backend.write_segments(self.overlay, &segments);
        backend.write_colors(self.overlay, &colors, &opacities);
        backend.set_instance_count(self.overlay, segments.len());
        backend.set_visible(self.overlay, true);
        self.overlay_len = segments.len();
    }

    /// Hide the overlay.
    pub fn clear_constellation<B: RenderBackend>(&mut self, backend: &mut B) {
        backend.set_instance_count(self.overlay, 0);
        backend.set_visible(self.overlay, false);
        self.overlay_len = 0;
    }

    /// Number of overlay segments currently shown.
    pub fn constellation_len(&self) -> usize {
        self.overlay_len
    }
}
