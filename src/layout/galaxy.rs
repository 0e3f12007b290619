//! Galaxy layout: a dense core of cross-linked blocks, channels strung
//! along a logarithmic spiral, and each channel's own blocks trailing
//! outward along a matching arm.

use std::f32::consts::TAU;

use glam::Vec3;

use super::placement::{
    channels_by_size, fibonacci_sphere, spiral_offset, Partition, Shell,
};
use super::LayoutResult;
use crate::graph::GraphIndex;

const CORE_RADIUS: f32 = 30.0;
const ARM_START: f32 = 48.0;
const ARM_END: f32 = 180.0;
const TURNS: f32 = 1.25;
const ARM_TWIST: f32 = 0.035;
const ARM_STEP: f32 = 1.6;
const ARM_WIDTH: f32 = 1.2;
const DISC_WOBBLE: f32 = 4.0;

/// Compute the galaxy layout.
pub fn compute(graph: &GraphIndex) -> LayoutResult {
    let mut result =
        LayoutResult::with_counts(graph.channel_count(), graph.block_count());
    let partition = Partition::of(graph);

    // Most-connected blocks sit deepest in the core.
    let core = partition.cross_linked.len();
    for (rank, &block) in partition.cross_linked.iter().enumerate() {
        let radius = CORE_RADIUS * ((rank + 1) as f32 / core as f32).cbrt();
        result.block_positions[block] = fibonacci_sphere(rank, core) * radius;
    }

    let order = channels_by_size(graph);
    let growth = (ARM_END / ARM_START).ln() / (TURNS * TAU);
    for (j, &channel) in order.iter().enumerate() {
        let theta = TURNS * TAU * j as f32 / order.len() as f32;
        let radius = ARM_START * (growth * theta).exp();
        let height = (1.7 * j as f32).sin() * DISC_WOBBLE;
        result.channel_positions[channel] =
            Vec3::new(radius * theta.cos(), height, radius * theta.sin());

        for (k, &block) in partition.single[channel].iter().enumerate() {
            result.block_positions[block] =
                arm_point(theta, radius, height, k);
        }
    }

    let shell = Shell::around(&result, &partition.unconnected);
    shell.place(&mut result, &partition.unconnected, 1.1, 4.0);
    result
}

/// Position of the `k`-th block trailing a channel at polar `(theta,
/// radius)`: further out and slightly twisted, with a small lateral spread.
fn arm_point(theta: f32, radius: f32, height: f32, k: usize) -> Vec3 {
    let t = (k + 1) as f32;
    let theta = theta + t * ARM_TWIST;
    let radius = radius + t * ARM_STEP;
    let spread = spiral_offset(k, ARM_WIDTH);
    let tangent = Vec3::new(-theta.sin(), 0.0, theta.cos());
    Vec3::new(radius * theta.cos(), height + spread.y * 0.5, radius * theta.sin())
        + tangent * spread.x
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::tests::fixture;

    #[test]
    fn cross_linked_blocks_form_the_core() {
        let g = fixture();
        let r = compute(&g);
        assert!(r.block_positions[1].length() <= CORE_RADIUS + 1e-3);
        for c in &r.channel_positions {
            assert!(c.length() >= ARM_START - DISC_WOBBLE);
        }
    }

    #[test]
    fn channels_spiral_outward() {
        let g = fixture();
        let r = compute(&g);
        let planar = |p: Vec3| Vec3::new(p.x, 0.0, p.z).length();
        // Size order is c1, c2, c3.
        assert!(planar(r.channel_positions[0]) < planar(r.channel_positions[1]));
        assert!(planar(r.channel_positions[1]) < planar(r.channel_positions[2]));
    }

    #[test]
    fn arms_trail_outward() {
        let a = arm_point(0.0, 50.0, 0.0, 0);
        let b = arm_point(0.0, 50.0, 0.0, 40);
        assert!(Vec3::new(b.x, 0.0, b.z).length() > Vec3::new(a.x, 0.0, a.z).length());
    }
}
