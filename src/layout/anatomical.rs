//! Anatomical-surface layout.
//!
//! A lumpy closed surface `f(θ, φ)` (a sphere perturbed by a few low
//! harmonics) is the placement manifold. Channels sit at fixed landmark
//! angles just above the surface. Blocks start from Fibonacci-lattice
//! angles, are pulled part of the way toward the nearest landmark of their
//! own channels, and sink inward the more connected they are.

use std::f32::consts::{PI, TAU};

use glam::Vec3;

use super::placement::{
    channels_by_size, fibonacci_sphere, Partition, Shell,
};
use super::LayoutResult;
use crate::graph::GraphIndex;

const BODY_RADIUS: f32 = 80.0;
const CHANNEL_LIFT: f32 = 1.08;
const LANDMARK_PULL: f32 = 0.55;
const INNER_SCALE: f32 = 0.62;
const UNCONNECTED_SCALE: f32 = 1.2;

/// `(θ azimuth, φ polar)` landmarks, largest channel first.
const LANDMARKS: [(f32, f32); 10] = [
    (0.0, 0.35),
    (1.2, 1.1),
    (2.5, 0.9),
    (3.8, 1.3),
    (5.0, 1.0),
    (0.6, 2.0),
    (1.9, 2.3),
    (3.1, 1.9),
    (4.4, 2.4),
    (5.6, 2.8),
];

/// Angular shift applied to each further ring of landmarks once the ten
/// fixed ones are used up.
const RING_SHIFT: (f32, f32) = (0.37, 0.21);
const POLE_MARGIN: f32 = 0.15;

/// Compute the anatomical-surface layout.
pub fn compute(graph: &GraphIndex) -> LayoutResult {
    let mut result =
        LayoutResult::with_counts(graph.channel_count(), graph.block_count());
    let partition = Partition::of(graph);

    let mut landmarks = vec![(0.0, PI / 2.0); graph.channel_count()];
    for (j, &channel) in channels_by_size(graph).iter().enumerate() {
        let angles = landmark(j);
        landmarks[channel] = angles;
        result.channel_positions[channel] =
            surface(angles.0, angles.1) * CHANNEL_LIFT;
    }

    let ranking = partition.connectivity_ranking();
    let last_rank = ranking.len().saturating_sub(1).max(1) as f32;
    let block_count = graph.block_count();
    for (rank, &block) in ranking.iter().enumerate() {
        let (theta, phi) = angles_of(fibonacci_sphere(block, block_count));
        let target = graph
            .channels_of_block(block)
            .iter()
            .map(|&c| landmarks[c])
            .min_by(|a, b| {
                angular_distance((theta, phi), *a)
                    .total_cmp(&angular_distance((theta, phi), *b))
            })
            .unwrap_or((theta, phi));
        let theta = theta + LANDMARK_PULL * wrap_angle(target.0 - theta);
        let phi = phi + LANDMARK_PULL * (target.1 - phi);
        let depth = INNER_SCALE + (1.0 - INNER_SCALE) * rank as f32 / last_rank;
        result.block_positions[block] = surface(theta, phi) * depth;
    }

    let shell = Shell::around(&result, &partition.unconnected);
    for (&block, dir) in partition.unconnected.iter().zip(&shell.directions) {
        let (theta, phi) = angles_of(*dir);
        result.block_positions[block] =
            surface(theta, phi) * UNCONNECTED_SCALE;
    }
    result
}

/// The placement manifold: radius modulated by three harmonics.
pub fn surface(theta: f32, phi: f32) -> Vec3 {
    let r = BODY_RADIUS
        * (1.0
            + 0.16 * (3.0 * theta).sin() * (2.0 * phi).sin()
            + 0.10 * (4.0 * phi).cos()
            + 0.07 * (5.0 * theta + phi).sin());
    Vec3::new(
        r * phi.sin() * theta.cos(),
        r * phi.cos(),
        r * phi.sin() * theta.sin(),
    )
}

fn landmark(j: usize) -> (f32, f32) {
    let (theta, phi) = LANDMARKS[j % LANDMARKS.len()];
    let ring = (j / LANDMARKS.len()) as f32;
    (
        (theta + ring * RING_SHIFT.0).rem_euclid(TAU),
        (phi + ring * RING_SHIFT.1).clamp(POLE_MARGIN, PI - POLE_MARGIN),
    )
}

fn angles_of(dir: Vec3) -> (f32, f32) {
    let theta = dir.z.atan2(dir.x).rem_euclid(TAU);
    let phi = dir.y.clamp(-1.0, 1.0).acos();
    (theta, phi)
}

fn angular_distance(a: (f32, f32), b: (f32, f32)) -> f32 {
    let unit = |(theta, phi): (f32, f32)| {
        Vec3::new(phi.sin() * theta.cos(), phi.cos(), phi.sin() * theta.sin())
    };
    unit(a).dot(unit(b)).clamp(-1.0, 1.0).acos()
}

/// Wrap an angle difference into `(-π, π]`.
fn wrap_angle(a: f32) -> f32 {
    let w = (a + PI).rem_euclid(TAU) - PI;
    if w <= -PI { w + TAU } else { w }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::tests::fixture;

    #[test]
    fn surface_is_bounded() {
        for i in 0..200 {
            let (theta, phi) = angles_of(fibonacci_sphere(i, 200));
            let r = surface(theta, phi).length();
            assert!(r > BODY_RADIUS * 0.6 && r < BODY_RADIUS * 1.4, "{r}");
        }
    }

    #[test]
    fn landmarks_repeat_with_a_shift() {
        assert_eq!(landmark(0), LANDMARKS[0]);
        assert_ne!(landmark(10), landmark(0));
        let (_, phi) = landmark(95);
        assert!((POLE_MARGIN..=PI - POLE_MARGIN).contains(&phi));
    }

    #[test]
    fn wrap_angle_takes_the_short_way() {
        assert!((wrap_angle(TAU - 0.1) + 0.1).abs() < 1e-5);
        assert!((wrap_angle(0.3) - 0.3).abs() < 1e-6);
        assert!((wrap_angle(-PI) - PI).abs() < 1e-6);
    }

    #[test]
    fn most_connected_block_sinks_deepest() {
        let g = fixture();
        let r = compute(&g);
        // b1 is the only cross-linked block, so it ranks first.
        let (theta, phi) = angles_of(r.block_positions[1].normalize());
        let surface_r = surface(theta, phi).length();
        let depth = r.block_positions[1].length() / surface_r;
        assert!((depth - INNER_SCALE).abs() < 1e-3, "{depth}");
    }
}
