//! Arrow-key movement between neighboring nodes.

use glam::{Vec2, Vec3};

use super::NodePositions;
use crate::camera::Camera;
use crate::engine::NavDirection;
use crate::graph::{GraphIndex, NodeRef};

/// Picks the neighbor lying furthest in a screen direction.
///
/// Offsets from the current node are projected onto the camera's
/// right/up plane and normalized; the candidate with the largest positive
/// dot product against the pressed direction wins. Ties keep the first
/// candidate in ascending index order.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyboardNavigator;

impl KeyboardNavigator {
    /// The node to move to from `from`, if any neighbor lies that way.
    ///
    /// A block's candidates are the other blocks sharing one of its
    /// channels. A channel's candidates are its blocks.
    pub fn navigate(
        graph: &GraphIndex,
        positions: &NodePositions<'_>,
        camera: &Camera,
        from: NodeRef,
        direction: NavDirection,
    ) -> Option<NodeRef> {
        let origin = positions.get(from)?;
        let mut candidates: Vec<NodeRef> = match from {
            NodeRef::Block(b) => graph
                .block_neighborhood(b)
                .into_iter()
                .filter(|&o| o != b)
                .map(NodeRef::Block)
                .collect(),
            NodeRef::Channel(c) => graph
                .blocks_of_channel(c)
                .iter()
                .map(|&b| NodeRef::Block(b))
                .collect(),
        };
        candidates.sort_unstable();
        let located = candidates
            .into_iter()
            .filter_map(|n| positions.get(n).map(|p| (n, p)));
        best_in_direction(camera, origin, located, direction.screen_axes())
    }
}

/// Candidate whose screen-plane offset from `origin` best matches `dir`.
pub(crate) fn best_in_direction(
    camera: &Camera,
    origin: Vec3,
    candidates: impl IntoIterator<Item = (NodeRef, Vec3)>,
    dir: Vec2,
) -> Option<NodeRef> {
    let right = camera.right();
    let up = camera.screen_up();
    let mut best: Option<(NodeRef, f32)> = None;
    for (node, p) in candidates {
        let d = p - origin;
        let Some(screen) = Vec2::new(d.dot(right), d.dot(up)).try_normalize() else {
            continue;
        };
        let score = screen.dot(dir);
        if score > 0.0 && best.is_none_or(|(_, s)| score > s) {
            best = Some((node, score));
        }
    }
    best.map(|(node, _)| node)
}
