//! Layered highlight requests.
//!
//! Controllers never write instance attributes. Each one owns a layer and
//! replaces it wholesale; the explorer flattens the stack into one
//! `fade_all_except` pass per renderer after every dispatch. The topmost
//! non-empty layer decides which nodes stay lit; scale boosts from every
//! active layer are applied bottom-up so a hovered node inside a
//! similarity result still grows. The selected node is pinned: it stays
//! lit at its selection scale whatever layer sits above it.

use std::collections::BTreeMap;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::graph::NodeRef;

/// Highlight sources, lowest priority first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LayerKind {
    /// Search, type, channel, tag and timeline filters.
    Filter,
    /// Similarity results.
    Similarity,
    /// BFS path between two endpoints.
    Path,
    /// Selected node and its neighborhood.
    Selection,
    /// Hovered node and its neighborhood.
    Hover,
}

/// Which edges stay lit under a layer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum HighlightEdges {
    /// Every edge dims.
    #[default]
    None,
    /// Edges into lit blocks stay lit.
    FollowBlocks,
    /// Exactly the edges joining these node pairs.
    Pairs(Vec<(NodeRef, NodeRef)>),
}

/// One layer's lit set plus optional scale boosts.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Highlight {
    /// Lit block indices.
    pub blocks: FxHashSet<usize>,
    /// Lit channel indices.
    pub channels: FxHashSet<usize>,
    /// Edge policy.
    pub edges: HighlightEdges,
    /// Block scale multipliers over baseline.
    pub block_scales: FxHashMap<usize, f32>,
    /// Channel scale multipliers over baseline.
    pub channel_scales: FxHashMap<usize, f32>,
}

impl Highlight {
    /// Highlight `blocks`, letting their edges follow.
    pub fn blocks(blocks: impl IntoIterator<Item = usize>) -> Self {
        Self {
            blocks: blocks.into_iter().collect(),
            edges: HighlightEdges::FollowBlocks,
            ..Self::default()
        }
    }

    /// Add a node to the lit set.
    pub fn insert(&mut self, node: NodeRef) {
        let _ = match node {
            NodeRef::Block(i) => self.blocks.insert(i),
            NodeRef::Channel(i) => self.channels.insert(i),
        };
    }

    /// Multiply a node's baseline scale by `factor`.
    pub fn boost(&mut self, node: NodeRef, factor: f32) {
        let _ = match node {
            NodeRef::Block(i) => self.block_scales.insert(i, factor),
            NodeRef::Channel(i) => self.channel_scales.insert(i, factor),
        };
    }

    /// Whether `node` is lit.
    pub fn contains(&self, node: NodeRef) -> bool {
        match node {
            NodeRef::Block(i) => self.blocks.contains(&i),
            NodeRef::Channel(i) => self.channels.contains(&i),
        }
    }

    /// Number of lit nodes.
    pub fn len(&self) -> usize {
        self.blocks.len() + self.channels.len()
    }

    /// Whether nothing is lit.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty() && self.channels.is_empty()
    }
}

/// The stack of active highlight layers.
#[derive(Debug, Clone, Default)]
pub struct HighlightLayers {
    layers: BTreeMap<LayerKind, Highlight>,
    dirty: bool,
}

impl HighlightLayers {
    /// Replace `kind` with `highlight`.
    pub fn set(&mut self, kind: LayerKind, highlight: Highlight) {
        let _ = self.layers.insert(kind, highlight);
        self.dirty = true;
    }

    /// Remove `kind`. No-op when it is not active.
    pub fn clear(&mut self, kind: LayerKind) {
        if self.layers.remove(&kind).is_some() {
            self.dirty = true;
        }
    }

    /// Remove every layer.
    pub fn clear_all(&mut self) {
        if !self.layers.is_empty() {
            self.layers.clear();
            self.dirty = true;
        }
    }

    /// The layer for `kind`, if active.
    pub fn get(&self, kind: LayerKind) -> Option<&Highlight> {
        self.layers.get(&kind)
    }

    /// Highest-priority active layer.
    pub fn top(&self) -> Option<(LayerKind, &Highlight)> {
        self.layers.iter().next_back().map(|(k, h)| (*k, h))
    }

    /// Active layers, lowest priority first.
    pub fn iter(
        &self,
    ) -> impl DoubleEndedIterator<Item = (LayerKind, &Highlight)> {
        self.layers.iter().map(|(k, h)| (*k, h))
    }

    /// Whether no layer is active.
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Number of nodes lit by the top layer, 0 when nothing is active.
    pub fn lit_count(&self) -> usize {
        self.top().map_or(0, |(_, h)| h.len())
    }

    /// Returns whether anything changed since the last call, and resets
    /// the flag.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Force a re-apply on the next flush.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }
}
