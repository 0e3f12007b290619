//! Shortest paths between two picked nodes.

use super::{Controller, ControllerContext, Highlight, HighlightEdges, LayerKind};
use crate::graph::NodeRef;
use crate::state::{StateChange, StateKey, StateValue};

const ENDPOINT_SCALE: f32 = 1.6;

/// Runs BFS once both endpoints are set and lights the path.
///
/// With only a start the start node is lit alone. An unreachable pair
/// publishes an empty path, a `PathLength` of `Unreachable`, and lights
/// nothing but the endpoints.
#[derive(Debug, Clone, Default)]
pub struct PathFinder;

impl PathFinder {
    fn refresh(ctx: &mut ControllerContext<'_>) {
        let start = ctx.state.get(StateKey::PathStart).as_node();
        let end = ctx.state.get(StateKey::PathEnd).as_node();

        let (start, end) = match (start, end) {
            (None, _) => {
                let _ = ctx.state.batch([
                    (StateKey::Path, StateValue::None),
                    (StateKey::PathLength, StateValue::None),
                ]);
                ctx.layers.clear(LayerKind::Path);
                return;
            }
            (Some(start), None) => {
                let mut h = Highlight::default();
                h.insert(start);
                h.boost(start, ENDPOINT_SCALE);
                ctx.layers.set(LayerKind::Path, h);
                let _ = ctx.state.batch([
                    (StateKey::Path, StateValue::None),
                    (StateKey::PathLength, StateValue::None),
                ]);
                return;
            }
            (Some(start), Some(end)) => (start, end),
        };

        let path = ctx.graph.bfs_path(start, end);
        let length = match path.len() {
            0 => StateValue::Unreachable,
            n => StateValue::Count(n - 1),
        };
        log::debug!("path {start:?} -> {end:?}: {length:?}");

        let mut h = Highlight::default();
        for &node in &path {
            h.insert(node);
        }
        for node in [start, end] {
            h.insert(node);
            h.boost(node, ENDPOINT_SCALE);
        }
        h.edges = HighlightEdges::Pairs(
            path.windows(2).map(|pair| (pair[0], pair[1])).collect(),
        );
        ctx.layers.set(LayerKind::Path, h);
        let _ = ctx.state.batch([
            (StateKey::PathLength, length),
            (StateKey::Path, StateValue::Nodes(path)),
        ]);
    }

    /// Next endpoint writes for a click on `node`: first click sets the
    /// start, second the end, a third starts over.
    pub fn capture(
        start: Option<NodeRef>,
        end: Option<NodeRef>,
        node: NodeRef,
    ) -> [(StateKey, StateValue); 2] {
        match (start, end) {
            (Some(s), None) => [
                (StateKey::PathStart, StateValue::Node(s)),
                (StateKey::PathEnd, StateValue::Node(node)),
            ],
            _ => [
                (StateKey::PathStart, StateValue::Node(node)),
                (StateKey::PathEnd, StateValue::None),
            ],
        }
    }
}

impl Controller for PathFinder {
    fn on_change(&mut self, change: &StateChange, ctx: &mut ControllerContext<'_>) {
        if matches!(change.key, StateKey::PathStart | StateKey::PathEnd) {
            Self::refresh(ctx);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interaction::tests::Harness;

    fn click(h: &mut Harness, c: &mut PathFinder, node: NodeRef) {
        let start = h.state.get(StateKey::PathStart).as_node();
        let end = h.state.get(StateKey::PathEnd).as_node();
        let _ = h.state.batch(PathFinder::capture(start, end, node));
        h.pump(c);
    }

    #[test]
    fn two_clicks_find_the_path() {
        let mut h = Harness::new();
        let mut c = PathFinder;
        click(&mut h, &mut c, NodeRef::Block(0));
        assert_eq!(h.layers.lit_count(), 1);
        assert!(h.state.get(StateKey::Path).is_none());

        click(&mut h, &mut c, NodeRef::Block(2));
        let path = h.state.get(StateKey::Path).as_nodes().to_vec();
        assert_eq!(
            path,
            vec![
                NodeRef::Block(0),
                NodeRef::Channel(0),
                NodeRef::Block(1),
                NodeRef::Channel(1),
                NodeRef::Block(2),
            ]
        );
        assert_eq!(h.state.get(StateKey::PathLength).as_count(), 4);
        let layer = h.layers.get(LayerKind::Path).unwrap();
        assert_eq!(layer.len(), 5);
        assert!(matches!(&layer.edges, HighlightEdges::Pairs(p) if p.len() == 4));

        // Third click restarts.
        click(&mut h, &mut c, NodeRef::Block(3));
        assert_eq!(h.state.get(StateKey::PathStart).as_node(), Some(NodeRef::Block(3)));
        assert!(h.state.get(StateKey::PathEnd).is_none());
        assert!(h.state.get(StateKey::Path).is_none());
    }

    #[test]
    fn unreachable_pair_yields_empty_path() {
        let mut h = Harness::new();
        let mut c = PathFinder;
        click(&mut h, &mut c, NodeRef::Block(0));
        click(&mut h, &mut c, NodeRef::Block(4));
        assert_eq!(h.state.get(StateKey::Path), &StateValue::Nodes(Vec::new()));
        assert!(h.state.get(StateKey::PathLength).is_unreachable());
        let layer = h.layers.get(LayerKind::Path).unwrap();
        assert_eq!(layer.len(), 2);
    }

    #[test]
    fn same_node_twice_is_a_zero_hop_path() {
        let mut h = Harness::new();
        let mut c = PathFinder;
        click(&mut h, &mut c, NodeRef::Channel(1));
        click(&mut h, &mut c, NodeRef::Channel(1));
        assert_eq!(h.state.get(StateKey::Path).as_nodes(), &[NodeRef::Channel(1)]);
        assert_eq!(h.state.get(StateKey::PathLength), &StateValue::Count(0));
        assert!(!h.state.get(StateKey::PathLength).is_unreachable());
    }
}
