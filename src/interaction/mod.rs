//! Interaction controllers.
//!
//! Each controller subscribes to [`InteractionState`] changes and answers
//! by writing derived state keys and replacing its own highlight layer.
//! Controllers never touch the renderers; the explorer flattens the
//! [`HighlightLayers`] into instance attributes once per dispatch. The
//! only outward side effect besides state and layers is a
//! [`CameraRequest`] queue the explorer hands to the camera.

pub mod gallery;
pub mod highlight;
pub mod hover_select;
pub mod navigator;
pub mod path_finder;
pub mod search_filter;
pub mod similarity;

use glam::Vec3;
use web_time::Instant;

pub use self::gallery::{GalleryStats, GraphStats};
pub use self::highlight::{Highlight, HighlightEdges, HighlightLayers, LayerKind};
pub use self::hover_select::HoverSelect;
pub use self::navigator::KeyboardNavigator;
pub use self::path_finder::PathFinder;
pub use self::search_filter::SearchFilter;
pub use self::similarity::SimilarityFinder;
use crate::camera::Camera;
use crate::graph::{GraphIndex, NodeRef};
use crate::options::InteractionOptions;
use crate::renderer::RenderAdapter;
use crate::state::{InteractionState, StateChange};

/// Camera moves a controller asks for.
#[derive(Debug, Clone, PartialEq)]
pub enum CameraRequest {
    /// Fly to look at a point.
    FlyTo(Vec3),
}

/// Read-only node positions as currently drawn.
#[derive(Debug, Clone, Copy)]
pub struct NodePositions<'a> {
    adapter: &'a RenderAdapter,
}

impl<'a> NodePositions<'a> {
    /// Positions read from `adapter`.
    pub fn new(adapter: &'a RenderAdapter) -> Self {
        Self { adapter }
    }

    /// Position of `node`.
    pub fn get(&self, node: NodeRef) -> Option<Vec3> {
        self.adapter.position(node)
    }
}

/// Everything a controller may read or write during one dispatch.
#[derive(Debug)]
pub struct ControllerContext<'a> {
    /// The graph.
    pub graph: &'a GraphIndex,
    /// Observable state; writes queue further changes.
    pub state: &'a mut InteractionState,
    /// Highlight stack.
    pub layers: &'a mut HighlightLayers,
    /// Camera requests, drained by the explorer.
    pub camera_requests: &'a mut Vec<CameraRequest>,
    /// Current node positions.
    pub positions: NodePositions<'a>,
    /// Current camera.
    pub camera: &'a Camera,
    /// Interaction tuning.
    pub options: &'a InteractionOptions,
    /// Frame time.
    pub now: Instant,
}

/// A state subscriber.
pub trait Controller {
    /// React to one applied change.
    fn on_change(&mut self, change: &StateChange, ctx: &mut ControllerContext<'_>);

    /// Per-frame hook for time-based work such as debouncing.
    fn tick(&mut self, _ctx: &mut ControllerContext<'_>) {}
}

/// The fixed set of subscribed controllers, in dispatch order.
#[derive(Debug, Clone, Default)]
pub struct Controllers {
    /// Hover and selection highlighting.
    pub hover_select: HoverSelect,
    /// Two-click BFS paths.
    pub path_finder: PathFinder,
    /// Debounced search and filters.
    pub search_filter: SearchFilter,
    /// Shared-tag similarity.
    pub similarity: SimilarityFinder,
    /// Gallery strip; runs last so it sees every layer update.
    pub gallery: GalleryStats,
}

impl Controllers {
    /// Controllers for `graph`.
    pub fn new(graph: &GraphIndex) -> Self {
        Self {
            gallery: GalleryStats::new(graph),
            ..Self::default()
        }
    }

    fn each_mut(&mut self) -> [&mut dyn Controller; 5] {
        [
            &mut self.hover_select,
            &mut self.path_finder,
            &mut self.search_filter,
            &mut self.similarity,
            &mut self.gallery,
        ]
    }

    /// Deliver one change to every controller.
    pub fn dispatch(&mut self, change: &StateChange, ctx: &mut ControllerContext<'_>) {
        for controller in self.each_mut() {
            controller.on_change(change, ctx);
        }
    }

    /// Run every controller's frame hook.
    pub fn tick(&mut self, ctx: &mut ControllerContext<'_>) {
        for controller in self.each_mut() {
            controller.tick(ctx);
        }
    }
}

/// `node` plus its one-hop neighborhood as a highlight.
///
/// A block lights every block sharing one of its channels, plus those
/// channels. A channel lights itself and its blocks, with exactly its own
/// edges.
pub(crate) fn neighborhood(graph: &GraphIndex, node: NodeRef) -> Highlight {
    match node {
        NodeRef::Block(b) => {
            let mut h = Highlight::blocks(graph.block_neighborhood(b));
            h.channels.extend(graph.channels_of_block(b).iter().copied());
            h
        }
        NodeRef::Channel(c) => {
            if c >= graph.channel_count() {
                return Highlight::default();
            }
            let blocks = graph.blocks_of_channel(c);
            let mut h = Highlight::blocks(blocks.iter().copied());
            h.insert(node);
            h.edges = HighlightEdges::Pairs(
                blocks.iter().map(|&b| (node, NodeRef::Block(b))).collect(),
            );
            h
        }
    }
}
