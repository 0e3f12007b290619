//! Unweighted shortest paths over the channel/block adjacency.

use std::collections::VecDeque;

use super::NodeRef;

/// Undirected adjacency over channels and blocks.
///
/// Slots `0..channel_count` are channels, the rest are blocks. Neighbour
/// lists keep edge-list discovery order, which makes BFS tie-breaking
/// deterministic.
#[derive(Debug, Clone, Default)]
pub struct Adjacency {
    channel_count: usize,
    neighbours: Vec<Vec<NodeRef>>,
}

impl Adjacency {
    /// Empty adjacency sized for the given entity counts.
    pub fn new(channel_count: usize, block_count: usize) -> Self {
        Self {
            channel_count,
            neighbours: vec![Vec::new(); channel_count + block_count],
        }
    }

    /// Link a channel and a block in both directions.
    pub fn link(&mut self, channel: usize, block: usize) {
        let c = NodeRef::Channel(channel);
        let b = NodeRef::Block(block);
        if let Some(list) = self.slot_mut(c) {
            list.push(b);
        }
        if let Some(list) = self.slot_mut(b) {
            list.push(c);
        }
    }

    /// Neighbours of `node` in discovery order.
    pub fn neighbours(&self, node: NodeRef) -> &[NodeRef] {
        self.slot(node)
            .and_then(|s| self.neighbours.get(s))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    fn slot(&self, node: NodeRef) -> Option<usize> {
        let s = match node {
            NodeRef::Channel(i) if i < self.channel_count => i,
            NodeRef::Block(i) => self.channel_count + i,
            NodeRef::Channel(_) => return None,
        };
        (s < self.neighbours.len()).then_some(s)
    }

    fn slot_mut(&mut self, node: NodeRef) -> Option<&mut Vec<NodeRef>> {
        let s = self.slot(node)?;
        self.neighbours.get_mut(s)
    }

    fn node_at(&self, slot: usize) -> NodeRef {
        if slot < self.channel_count {
            NodeRef::Channel(slot)
        } else {
            NodeRef::Block(slot - self.channel_count)
        }
    }

    /// Shortest path from `from` to `to`, inclusive of both ends.
    ///
    /// Returns `[from]` when they are equal and an empty vector when `to`
    /// is unreachable or either node is out of range.
    pub fn bfs_path(&self, from: NodeRef, to: NodeRef) -> Vec<NodeRef> {
        let (Some(start), Some(goal)) = (self.slot(from), self.slot(to))
        else {
            return Vec::new();
        };
        if start == goal {
            return vec![from];
        }

        let mut parent: Vec<Option<usize>> = vec![None; self.neighbours.len()];
        let mut visited = vec![false; self.neighbours.len()];
        let mut queue = VecDeque::new();
        visited[start] = true;
        queue.push_back(start);

        while let Some(current) = queue.pop_front() {
            for &next in &self.neighbours[current] {
                let Some(n) = self.slot(next) else { continue };
                if visited[n] {
                    continue;
                }
                visited[n] = true;
                parent[n] = Some(current);
                if n == goal {
                    return self.unwind(&parent, goal);
                }
                queue.push_back(n);
            }
        }
        Vec::new()
    }

    /// Whether `to` can be reached from `from` at all.
    pub fn reachable(&self, from: NodeRef, to: NodeRef) -> bool {
        !self.bfs_path(from, to).is_empty()
    }

    fn unwind(&self, parent: &[Option<usize>], goal: usize) -> Vec<NodeRef> {
        let mut path = vec![self.node_at(goal)];
        let mut cursor = goal;
        while let Some(p) = parent[cursor] {
            path.push(self.node_at(p));
            cursor = p;
        }
        path.reverse();
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // c0 - b0 - c1 - b1 ; c0 - b2 ; b3 isolated
    fn sample() -> Adjacency {
        let mut adj = Adjacency::new(2, 4);
        adj.link(0, 0);
        adj.link(1, 0);
        adj.link(1, 1);
        adj.link(0, 2);
        adj
    }

    #[test]
    fn path_to_self() {
        let adj = sample();
        assert_eq!(
            adj.bfs_path(NodeRef::Block(3), NodeRef::Block(3)),
            vec![NodeRef::Block(3)]
        );
    }

    #[test]
    fn shortest_path_through_channels() {
        let adj = sample();
        assert_eq!(
            adj.bfs_path(NodeRef::Block(2), NodeRef::Block(1)),
            vec![
                NodeRef::Block(2),
                NodeRef::Channel(0),
                NodeRef::Block(0),
                NodeRef::Channel(1),
                NodeRef::Block(1),
            ]
        );
    }

    #[test]
    fn unreachable_is_empty() {
        let adj = sample();
        assert!(adj.bfs_path(NodeRef::Block(0), NodeRef::Block(3)).is_empty());
        assert!(!adj.reachable(NodeRef::Block(3), NodeRef::Channel(0)));
    }

    #[test]
    fn out_of_range_is_empty() {
        let adj = sample();
        assert!(adj.bfs_path(NodeRef::Block(9), NodeRef::Block(0)).is_empty());
        assert!(adj
            .bfs_path(NodeRef::Channel(5), NodeRef::Channel(5))
            .is_empty());
    }

    #[test]
    fn ties_follow_discovery_order() {
        // b0 and b1 both sit in c0 and c1; the path from c0 to c1 must go
        // through whichever block was linked first.
        let mut adj = Adjacency::new(2, 2);
        adj.link(0, 1);
        adj.link(0, 0);
        adj.link(1, 0);
        adj.link(1, 1);
        assert_eq!(
            adj.bfs_path(NodeRef::Channel(0), NodeRef::Channel(1)),
            vec![NodeRef::Channel(0), NodeRef::Block(1), NodeRef::Channel(1)]
        );
    }
}
