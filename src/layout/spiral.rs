//! Spiral layout: three vertical tiers of channels, blocks on golden-angle
//! spirals around their channel anchor.
//!
//! Tier 1 holds the largest channel alone above the origin, tier 2 the
//! next [`SECONDARY_COUNT`] on a middle ring, tier 3 everything else on a
//! wide low ring. Each channel keeps an occupancy counter so successive
//! blocks spiral outward instead of stacking.

use std::f32::consts::TAU;

use glam::Vec3;

use super::placement::{
    centroid, channels_by_size, spiral_offset, Partition, Shell,
};
use super::LayoutResult;
use crate::graph::GraphIndex;

const ROOT_HEIGHT: f32 = 60.0;
const SECONDARY_COUNT: usize = 6;
const SECONDARY_RADIUS: f32 = 90.0;
const OUTER_RADIUS: f32 = 170.0;
const OUTER_HEIGHT: f32 = -60.0;

const BLOCK_SPACING: f32 = 4.0;
const CROSS_SPACING: f32 = 3.0;
const CROSS_LIFT: f32 = 3.0;
const JITTER_STEP: f32 = 0.6;

/// Compute the spiral layout.
pub fn compute(graph: &GraphIndex) -> LayoutResult {
    let mut result =
        LayoutResult::with_counts(graph.channel_count(), graph.block_count());

    let order = channels_by_size(graph);
    for (rank, &channel) in order.iter().enumerate() {
        result.channel_positions[channel] = tier_anchor(rank, order.len());
    }

    let partition = Partition::of(graph);
    let mut occupancy = vec![0usize; graph.channel_count()];

    for &block in &partition.cross_linked {
        let channels = graph.channels_of_block(block);
        let center =
            centroid(channels.iter().map(|&c| result.channel_positions[c]))
                .unwrap_or(Vec3::ZERO);
        // Cross-linked blocks between the same pair of anchors spiral
        // around their shared centroid, keyed by the first channel.
        let k = channels.first().map_or(0, |&c| bump(&mut occupancy, c));
        let offset = spiral_offset(k, CROSS_SPACING);
        result.block_positions[block] =
            center + Vec3::new(offset.x, CROSS_LIFT, offset.y);
    }

    for (channel, blocks) in partition.single.iter().enumerate() {
        let anchor = result.channel_positions[channel];
        for &block in blocks {
            let k = bump(&mut occupancy, channel);
            let offset = spiral_offset(k, BLOCK_SPACING);
            let jitter = ((k % 5) as f32 - 2.0) * JITTER_STEP;
            result.block_positions[block] =
                anchor + Vec3::new(offset.x, jitter, offset.y);
        }
    }

    let shell = Shell::around(&result, &partition.unconnected);
    shell.place(&mut result, &partition.unconnected, 1.15, 2.0);
    result
}

fn bump(counters: &mut [usize], channel: usize) -> usize {
    let k = counters[channel];
    counters[channel] += 1;
    k
}

/// Anchor for the channel of size rank `rank` out of `count`.
fn tier_anchor(rank: usize, count: usize) -> Vec3 {
    if rank == 0 {
        return Vec3::new(0.0, ROOT_HEIGHT, 0.0);
    }
    if rank <= SECONDARY_COUNT {
        let slots = (count - 1).min(SECONDARY_COUNT);
        let angle = (rank - 1) as f32 / slots as f32 * TAU;
        return Vec3::new(
            SECONDARY_RADIUS * angle.cos(),
            0.0,
            SECONDARY_RADIUS * angle.sin(),
        );
    }
    let slots = count - 1 - SECONDARY_COUNT;
    // Half-step stagger so outer anchors sit between secondary ones.
    let angle = ((rank - 1 - SECONDARY_COUNT) as f32 + 0.5) / slots as f32 * TAU;
    Vec3::new(
        OUTER_RADIUS * angle.cos(),
        OUTER_HEIGHT,
        OUTER_RADIUS * angle.sin(),
    )
}
