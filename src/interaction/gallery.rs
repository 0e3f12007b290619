//! Graph statistics and the thumbnail gallery strip.

use super::{Controller, ControllerContext, LayerKind};
use crate::graph::{BlockClass, GraphIndex};
use crate::state::{StateChange, StateKey, StateValue};

const TOP_CHANNELS: usize = 5;

/// Whole-graph summary for a stats panel.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GraphStats {
    /// Number of channels.
    pub channels: usize,
    /// Number of blocks.
    pub blocks: usize,
    /// Number of membership edges.
    pub edges: usize,
    /// Blocks in more than one channel.
    pub cross_linked: usize,
    /// Block count per class.
    pub classes: Vec<(BlockClass, usize)>,
    /// Largest channels as `(index, size)`, biggest first.
    pub top_channels: Vec<(usize, f32)>,
}

impl GraphStats {
    /// Summarize `graph`.
    pub fn of(graph: &GraphIndex) -> Self {
        let mut top: Vec<(usize, f32)> = graph
            .channels()
            .iter()
            .enumerate()
            .map(|(i, c)| (i, c.size))
            .collect();
        top.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
        top.truncate(TOP_CHANNELS);
        Self {
            channels: graph.channel_count(),
            blocks: graph.block_count(),
            edges: graph.edges().len(),
            cross_linked: graph.cross_linked_count(),
            classes: graph.class_histogram().to_vec(),
            top_channels: top,
        }
    }
}

/// Keeps the gallery strip in sync with the highlight stack.
///
/// The gallery lists the blocks with thumbnails lit by the highest
/// non-hover layer, so sweeping the cursor over the graph does not
/// reshuffle the strip.
#[derive(Debug, Clone, Default)]
pub struct GalleryStats {
    stats: GraphStats,
}

impl GalleryStats {
    /// Gallery for `graph`, with its stats computed once.
    pub fn new(graph: &GraphIndex) -> Self {
        Self {
            stats: GraphStats::of(graph),
        }
    }

    /// Whole-graph stats.
    pub fn stats(&self) -> &GraphStats {
        &self.stats
    }

    fn refresh(ctx: &mut ControllerContext<'_>) {
        let lit = ctx
            .layers
            .iter()
            .rev()
            .find(|(kind, _)| *kind != LayerKind::Hover)
            .map(|(_, h)| h);
        let Some(lit) = lit else {
            let _ = ctx.state.clear(StateKey::Gallery);
            return;
        };
        let mut thumbs: Vec<usize> = lit
            .blocks
            .iter()
            .copied()
            .filter(|&b| ctx.graph.block(b).is_some_and(|blk| blk.thumb.is_some()))
            .collect();
        thumbs.sort_unstable();
        thumbs.truncate(ctx.options.gallery_limit);
        let _ = ctx.state.set(StateKey::Gallery, StateValue::Indices(thumbs));
    }
}

impl Controller for GalleryStats {
    fn on_change(&mut self, change: &StateChange, ctx: &mut ControllerContext<'_>) {
        if matches!(
            change.key,
            StateKey::Selected
                | StateKey::Path
                | StateKey::PathStart
                | StateKey::FilterResult
                | StateKey::SimilarityTarget
                | StateKey::SimilarityResults
        ) {
            Self::refresh(ctx);
        }
    }
}
