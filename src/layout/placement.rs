//! Placement primitives shared by every layout.
//!
//! The common rule: cross-linked blocks are placed first, near the
//! centroid of their channels; singly-linked blocks orbit their one
//! channel; unconnected blocks go to the sparsest directions left over.

use std::f32::consts::PI;

use glam::{Vec2, Vec3};

use super::LayoutResult;
use crate::graph::GraphIndex;

/// π(3 − √5): the angle between successive Fibonacci-lattice points.
pub const GOLDEN_ANGLE: f32 = PI * 0.763_932;

/// Cosine of the cap half-angle used to measure crowding around a
/// candidate direction (about 37°).
const CROWDING_CAP_COS: f32 = 0.8;

/// Point `i` of an `n`-point Fibonacci lattice on the unit sphere.
pub fn fibonacci_sphere(i: usize, n: usize) -> Vec3 {
    if n <= 1 {
        return Vec3::Y;
    }
    let y = 1.0 - 2.0 * (i as f32 + 0.5) / n as f32;
    let r = (1.0 - y * y).max(0.0).sqrt();
    let theta = i as f32 * GOLDEN_ANGLE;
    Vec3::new(r * theta.cos(), y, r * theta.sin())
}

/// Point `i` of an `n`-point Fibonacci lattice on one unit hemisphere.
pub fn fibonacci_hemisphere(i: usize, n: usize, north: bool) -> Vec3 {
    let n = n.max(1);
    let y = 1.0 - (i as f32 + 0.5) / n as f32;
    let r = (1.0 - y * y).max(0.0).sqrt();
    let theta = i as f32 * GOLDEN_ANGLE;
    let y = if north { y } else { -y };
    Vec3::new(r * theta.cos(), y, r * theta.sin())
}

/// Planar golden-angle spiral offset for the `k`-th occupant of an anchor.
/// Radius grows with √k so occupants keep roughly constant density.
pub fn spiral_offset(k: usize, spacing: f32) -> Vec2 {
    let radius = spacing * ((k + 1) as f32).sqrt();
    let angle = k as f32 * GOLDEN_ANGLE;
    Vec2::new(radius * angle.cos(), radius * angle.sin())
}

/// Mean of `points`, or `None` when empty.
pub fn centroid(points: impl IntoIterator<Item = Vec3>) -> Option<Vec3> {
    let (sum, count) = points
        .into_iter()
        .fold((Vec3::ZERO, 0usize), |(s, c), p| (s + p, c + 1));
    (count > 0).then(|| sum / count as f32)
}

/// Distance of the farthest point from `center`, at least 1.
pub fn outer_radius(points: &[Vec3], center: Vec3) -> f32 {
    points
        .iter()
        .map(|p| p.distance(center))
        .fold(1.0_f32, f32::max)
}

/// Blocks split by how many channels link them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Partition {
    /// Blocks with two or more channels, most-connected first, ties by
    /// index.
    pub cross_linked: Vec<usize>,
    /// Per channel, its singly-linked blocks in edge order.
    pub single: Vec<Vec<usize>>,
    /// Blocks with no channel.
    pub unconnected: Vec<usize>,
}

impl Partition {
    /// Classify every block of `graph`.
    pub fn of(graph: &GraphIndex) -> Self {
        let mut partition = Self {
            single: vec![Vec::new(); graph.channel_count()],
            ..Self::default()
        };
        for block in 0..graph.block_count() {
            match graph.channels_of_block(block) {
                [] => partition.unconnected.push(block),
                [only] => partition.single[*only].push(block),
                _ => partition.cross_linked.push(block),
            }
        }
        partition.cross_linked.sort_by_key(|&b| {
            (std::cmp::Reverse(graph.channels_of_block(b).len()), b)
        });
        partition
    }

    /// Connected blocks ranked by connectivity: cross-linked first (most
    /// channels first), then singly-linked by index.
    pub fn connectivity_ranking(&self) -> Vec<usize> {
        let mut singles: Vec<usize> =
            self.single.iter().flatten().copied().collect();
        singles.sort_unstable();
        let mut ranked = self.cross_linked.clone();
        ranked.extend(singles);
        ranked
    }
}

/// Channels ordered by linked block count (descending), ties by index.
pub fn channels_by_size(graph: &GraphIndex) -> Vec<usize> {
    let mut order: Vec<usize> = (0..graph.channel_count()).collect();
    order.sort_by_key(|&c| {
        (std::cmp::Reverse(graph.blocks_of_channel(c).len()), c)
    });
    order
}

/// `count` unit directions around `center`, least crowded first.
///
/// Candidates come from a Fibonacci lattice; crowding is the number of
/// `placed` points inside a fixed cap around each candidate. Ties keep
/// lattice order, so the result is deterministic.
pub fn sparse_directions(
    placed: &[Vec3],
    center: Vec3,
    count: usize,
) -> Vec<Vec3> {
    if count == 0 {
        return Vec::new();
    }
    let placed_dirs: Vec<Vec3> = placed
        .iter()
        .map(|p| (*p - center).normalize_or_zero())
        .filter(|d| *d != Vec3::ZERO)
        .collect();

    let mut scored: Vec<(usize, usize, Vec3)> = (0..count)
        .map(|i| {
            let dir = fibonacci_sphere(i, count.max(2));
            let crowding = placed_dirs
                .iter()
                .filter(|d| d.dot(dir) > CROWDING_CAP_COS)
                .count();
            (crowding, i, dir)
        })
        .collect();
    scored.sort_by_key(|&(crowding, i, _)| (crowding, i));
    scored.into_iter().map(|(_, _, dir)| dir).collect()
}

/// Where the unconnected blocks of a layout go: the sparsest directions
/// around everything already placed.
#[derive(Debug, Clone, PartialEq)]
pub struct Shell {
    /// Centroid of the placed channels and connected blocks.
    pub center: Vec3,
    /// Distance of the farthest placed point from `center`.
    pub radius: f32,
    /// One direction per unconnected block, least crowded first.
    pub directions: Vec<Vec3>,
}

impl Shell {
    /// Measure `result` (ignoring the `unconnected` blocks, which are still
    /// at their initial position) and pick directions for them.
    pub fn around(result: &LayoutResult, unconnected: &[usize]) -> Self {
        let mut loose = vec![false; result.block_positions.len()];
        for &b in unconnected {
            if let Some(flag) = loose.get_mut(b) {
                *flag = true;
            }
        }
        let placed: Vec<Vec3> = result
            .channel_positions
            .iter()
            .copied()
            .chain(
                result
                    .block_positions
                    .iter()
                    .zip(&loose)
                    .filter(|(_, loose)| !**loose)
                    .map(|(p, _)| *p),
            )
            .collect();
        let center = centroid(placed.iter().copied()).unwrap_or(Vec3::ZERO);
        Self {
            center,
            radius: outer_radius(&placed, center),
            directions: sparse_directions(&placed, center, unconnected.len()),
        }
    }

    /// Write `center + dir * (radius * scale + pad)` for every unconnected
    /// block.
    pub fn place(
        &self,
        result: &mut LayoutResult,
        unconnected: &[usize],
        scale: f32,
        pad: f32,
    ) {
        let reach = self.radius * scale + pad;
        for (&block, dir) in unconnected.iter().zip(&self.directions) {
            if let Some(slot) = result.block_positions.get_mut(block) {
                *slot = self.center + *dir * reach;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::tests::fixture;

    #[test]
    fn fibonacci_points_are_unit_length() {
        for n in [1, 2, 7, 100] {
            for i in 0..n {
                let p = fibonacci_sphere(i, n);
                assert!((p.length() - 1.0).abs() < 1e-4);
                let h = fibonacci_hemisphere(i, n, false);
                assert!((h.length() - 1.0).abs() < 1e-4);
                assert!(h.y <= 0.0);
            }
        }
    }

    #[test]
    fn spiral_offsets_grow_outward() {
        let a = spiral_offset(0, 2.0).length();
        let b = spiral_offset(50, 2.0).length();
        assert!(b > a);
    }

    #[test]
    fn partition_classifies_blocks() {
        let g = fixture();
        let p = Partition::of(&g);
        assert_eq!(p.cross_linked, vec![1]);
        assert_eq!(p.single[0], vec![0]);
        assert_eq!(p.single[1], vec![2]);
        assert_eq!(p.single[2], vec![3]);
        assert_eq!(p.unconnected, vec![4]);
        assert_eq!(p.connectivity_ranking(), vec![1, 0, 2, 3]);
    }

    #[test]
    fn sparse_directions_avoid_crowded_side() {
        let placed: Vec<Vec3> =
            (0..20).map(|i| Vec3::new(10.0, i as f32 * 0.1, 0.0)).collect();
        let dirs = sparse_directions(&placed, Vec3::ZERO, 8);
        assert_eq!(dirs.len(), 8);
        // The first pick must not point into the +X cluster.
        assert!(dirs[0].dot(Vec3::X) < CROWDING_CAP_COS);
    }

    #[test]
    fn shell_ignores_unplaced_blocks() {
        let mut result = LayoutResult::with_counts(1, 3);
        result.channel_positions[0] = Vec3::new(10.0, 0.0, 0.0);
        result.block_positions[0] = Vec3::new(-10.0, 0.0, 0.0);
        let shell = Shell::around(&result, &[1, 2]);
        assert_eq!(shell.center, Vec3::ZERO);
        assert_eq!(shell.radius, 10.0);
        shell.place(&mut result, &[1, 2], 1.0, 2.0);
        assert!((result.block_positions[1].length() - 12.0).abs() < 1e-4);
        assert_ne!(result.block_positions[1], result.block_positions[2]);
    }

    #[test]
    fn centroid_of_nothing() {
        assert!(centroid(Vec::new()).is_none());
        assert_eq!(
            centroid(vec![Vec3::X, Vec3::NEG_X]),
            Some(Vec3::ZERO)
        );
    }
}
