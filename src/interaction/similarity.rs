//! Shared-tag similarity.

use rustc_hash::FxHashMap;

use super::{Controller, ControllerContext, Highlight, LayerKind};
use crate::graph::{GraphIndex, NodeRef};
use crate::state::{StateChange, StateKey, StateValue};

const TARGET_SCALE: f32 = 1.8;

/// Up to `top_n` other blocks ranked by how many tags they share with
/// `block`, best first. Ties keep ascending block order, so the result is
/// a pure function of the tag data.
pub fn similar_blocks(graph: &GraphIndex, block: usize, top_n: usize) -> Vec<(usize, u32)> {
    let Some(target) = graph.block(block) else {
        return Vec::new();
    };
    let mut scores: FxHashMap<usize, u32> = FxHashMap::default();
    for tag in &target.auto_tags {
        for &other in graph.blocks_with_tag(tag) {
            if other != block {
                *scores.entry(other).or_default() += 1;
            }
        }
    }
    let mut ranked: Vec<(usize, u32)> = scores.into_iter().filter(|&(_, s)| s > 0).collect();
    ranked.sort_unstable_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    ranked.truncate(top_n);
    ranked
}

/// Lights a target block and its most similar blocks, scaled by score.
#[derive(Debug, Clone, Default)]
pub struct SimilarityFinder;

impl Controller for SimilarityFinder {
    fn on_change(&mut self, change: &StateChange, ctx: &mut ControllerContext<'_>) {
        if change.key != StateKey::SimilarityTarget {
            return;
        }
        let Some(target) = change.new.as_index() else {
            let _ = ctx.state.clear(StateKey::SimilarityResults);
            ctx.layers.clear(LayerKind::Similarity);
            return;
        };

        let ranked = similar_blocks(ctx.graph, target, ctx.options.similarity_top_n);
        log::debug!("block {target} has {} similar blocks", ranked.len());

        let mut h = Highlight::blocks(ranked.iter().map(|&(b, _)| b));
        if ctx.graph.block(target).is_some() {
            h.insert(NodeRef::Block(target));
            h.boost(NodeRef::Block(target), TARGET_SCALE);
        }
        let best = ranked.first().map_or(1, |&(_, s)| s.max(1)) as f32;
        for &(b, score) in &ranked {
            h.boost(NodeRef::Block(b), 1.0 + 0.8 * score as f32 / best);
        }
        if h.is_empty() {
            ctx.layers.clear(LayerKind::Similarity);
        } else {
            ctx.layers.set(LayerKind::Similarity, h);
        }
        let _ = ctx
            .state
            .set(StateKey::SimilarityResults, StateValue::Scores(ranked));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::tests::fixture;
    use crate::interaction::tests::Harness;

    #[test]
    fn ranks_by_shared_tags() {
        let g = fixture();
        // b0: theme:sea, medium:ink -> b1 shares sea, b3 shares ink.
        assert_eq!(similar_blocks(&g, 0, 20), vec![(1, 1), (3, 1)]);
        assert_eq!(similar_blocks(&g, 1, 20), vec![(0, 1), (2, 1)]);
        assert_eq!(similar_blocks(&g, 0, 1), vec![(1, 1)]);
        assert!(similar_blocks(&g, 4, 20).is_empty());
        assert!(similar_blocks(&g, 99, 20).is_empty());
    }

    #[test]
    fn deterministic_across_calls() {
        let g = fixture();
        let first = similar_blocks(&g, 3, 20);
        for _ in 0..8 {
            assert_eq!(similar_blocks(&g, 3, 20), first);
        }
    }

    #[test]
    fn target_and_results_are_lit() {
        let mut h = Harness::new();
        let mut c = SimilarityFinder;
        let _ = h.state.set(StateKey::SimilarityTarget, StateValue::Index(0));
        h.pump(&mut c);
        assert_eq!(h.state.get(StateKey::SimilarityResults).as_scores(), &[(1, 1), (3, 1)]);
        let layer = h.layers.get(LayerKind::Similarity).unwrap();
        assert_eq!(layer.len(), 3);
        assert_eq!(layer.block_scales.get(&0), Some(&TARGET_SCALE));
        assert!((layer.block_scales[&3] - 1.8).abs() < 1e-6);

        let _ = h.state.clear(StateKey::SimilarityTarget);
        h.pump(&mut c);
        assert!(h.layers.is_empty());
        assert!(h.state.get(StateKey::SimilarityResults).is_none());
    }
}
