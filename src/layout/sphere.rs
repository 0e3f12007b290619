//! Sphere layout.
//!
//! Cross-linked blocks alternate between two opposing Fibonacci
//! hemispheres at the center. Channels, ranked by size, are spread by
//! polar angle over an outer shell, and each channel's own blocks fan out
//! in the plane tangent to the shell at its anchor.

use std::f32::consts::PI;

use glam::Vec3;

use super::placement::{
    channels_by_size, fibonacci_hemisphere, spiral_offset, Partition, Shell,
    GOLDEN_ANGLE,
};
use super::LayoutResult;
use crate::graph::GraphIndex;

const CORE_RADIUS: f32 = 35.0;
const SHELL_RADIUS: f32 = 110.0;
const FAN_SPACING: f32 = 3.5;
const FAN_RISE: f32 = 0.05;

/// Compute the sphere layout.
pub fn compute(graph: &GraphIndex) -> LayoutResult {
    let mut result =
        LayoutResult::with_counts(graph.channel_count(), graph.block_count());
    let partition = Partition::of(graph);

    let cross = partition.cross_linked.len();
    let north_count = cross.div_ceil(2);
    let south_count = cross / 2;
    for (rank, &block) in partition.cross_linked.iter().enumerate() {
        let north = rank % 2 == 0;
        let count = if north { north_count } else { south_count };
        result.block_positions[block] =
            fibonacci_hemisphere(rank / 2, count, north) * CORE_RADIUS;
    }

    let order = channels_by_size(graph);
    for (j, &channel) in order.iter().enumerate() {
        let dir = shell_direction(j, order.len());
        let anchor = dir * SHELL_RADIUS;
        result.channel_positions[channel] = anchor;

        let (u, v) = dir.any_orthonormal_pair();
        for (k, &block) in partition.single[channel].iter().enumerate() {
            let fan = spiral_offset(k, FAN_SPACING);
            result.block_positions[block] =
                anchor + u * fan.x + v * fan.y + dir * (FAN_RISE * k as f32);
        }
    }

    let shell = Shell::around(&result, &partition.unconnected);
    shell.place(&mut result, &partition.unconnected, 1.2, 2.0);
    result
}

/// Unit direction of the `j`-th of `count` channels: evenly spaced polar
/// angle, golden-angle azimuth.
fn shell_direction(j: usize, count: usize) -> Vec3 {
    let polar = PI * (j as f32 + 0.5) / count as f32;
    let azimuth = j as f32 * GOLDEN_ANGLE;
    Vec3::new(
        polar.sin() * azimuth.cos(),
        polar.cos(),
        polar.sin() * azimuth.sin(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::tests::fixture;

    #[test]
    fn channels_lie_on_the_shell() {
        let g = fixture();
        let r = compute(&g);
        for c in &r.channel_positions {
            assert!((c.length() - SHELL_RADIUS).abs() < 1e-3);
        }
    }

    #[test]
    fn hemispheres_alternate() {
        let json = r#"{"elements":{"nodes":[
            {"data":{"id":"c0","type":"channel"}},
            {"data":{"id":"c1","type":"channel"}},
            {"data":{"id":"a","type":"Text"}},
            {"data":{"id":"b","type":"Text"}}
        ],"edges":[
            {"data":{"source":"c0","target":"a"}},
            {"data":{"source":"c1","target":"a"}},
            {"data":{"source":"c0","target":"b"}},
            {"data":{"source":"c1","target":"b"}}
        ]}}"#;
        let g = GraphIndex::from_json(json).unwrap();
        let r = compute(&g);
        assert!(r.block_positions[0].y > 0.0);
        assert!(r.block_positions[1].y < 0.0);
    }

    #[test]
    fn fans_stay_near_their_anchor() {
        let g = fixture();
        let r = compute(&g);
        let d = r.block_positions[2].distance(r.channel_positions[1]);
        assert!(d < FAN_SPACING * 2.0, "distance {d}");
    }
}
