//! Frame-driven animation: layout transitions and the two ambient modes.
//!
//! Everything here advances from an explicit `now` passed by the host's
//! frame loop; nothing schedules its own callbacks.
//!
//! Living and Aurora both overwrite the same instance arrays every frame,
//! so they never run together: [`AmbientDirector`] owns whichever one is
//! active and stops (and restores) it before starting the other.

pub mod aurora;
pub mod director;
pub mod living;
pub mod transition;

pub use director::AmbientDirector;
use glam::Vec3;
use serde::{Deserialize, Serialize};
pub use transition::{LayoutTransition, TransitionStatus};

use crate::layout::placement::{centroid, outer_radius};
use crate::renderer::{InstanceAttributes, RenderAdapter, RenderBackend};

/// Which ambient overlay is running.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum AmbientMode {
    /// No ambient animation.
    #[default]
    Off,
    /// Per-instance drift and pulse.
    Living,
    /// Traveling color waves.
    Aurora,
}

impl AmbientMode {
    /// Lowercase display name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Living => "living",
            Self::Aurora => "aurora",
        }
    }
}

/// Node attributes and bloom as they were when an ambient mode started.
///
/// Ambient frames are computed from this snapshot, never from the live
/// arrays, so effects do not compound; stopping copies it back verbatim.
#[derive(Debug, Clone)]
pub struct AmbientSnapshot {
    pub(crate) blocks: InstanceAttributes,
    pub(crate) channels: InstanceAttributes,
    pub(crate) bloom: f32,
    pub(crate) center: Vec3,
    pub(crate) radius: f32,
}

impl AmbientSnapshot {
    /// Capture the adapter's live node arrays and the backend bloom.
    pub fn capture<B: RenderBackend>(adapter: &RenderAdapter, backend: &B) -> Self {
        let blocks = adapter.blocks().attributes().clone();
        let channels = adapter.channels().attributes().clone();
        let all: Vec<Vec3> = blocks
            .positions()
            .iter()
            .chain(channels.positions())
            .copied()
            .collect();
        let center = centroid(all.iter().copied()).unwrap_or(Vec3::ZERO);
        let radius = outer_radius(&all, center);
        Self {
            blocks,
            channels,
            bloom: backend.bloom_strength(),
            center,
            radius,
        }
    }

    /// Bloom strength at capture time.
    pub fn bloom(&self) -> f32 {
        self.bloom
    }

    /// Centroid of every node at capture time.
    pub fn center(&self) -> Vec3 {
        self.center
    }

    /// Distance from the centroid to the farthest node, at least 1.
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Copy the snapshot back into the adapter and backend and commit.
    pub fn restore<B: RenderBackend>(
        &self,
        adapter: &mut RenderAdapter,
        backend: &mut B,
    ) {
        adapter.blocks_mut().attributes_mut().restore_from(&self.blocks);
        adapter.channels_mut().attributes_mut().restore_from(&self.channels);
        adapter.commit_attributes(backend);
        adapter.commit_positions(backend);
        backend.set_bloom_strength(self.bloom);
    }
}

/// Multiply every RGB component, clamped to `[0, 1]`.
pub(crate) fn scale_color(c: [f32; 3], k: f32) -> [f32; 3] {
    c.map(|v| (v * k).clamp(0.0, 1.0))
}
