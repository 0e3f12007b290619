//! Deterministic 3D layouts of the channel/block graph.
//!
//! Every layout is a pure function `GraphIndex -> LayoutResult`: same
//! graph, same positions, bit for bit. Stable output is what lets
//! [`crate::animation::transition::LayoutTransition`] interpolate between
//! layouts without jumps. Results are replaced wholesale on every layout
//! switch, never patched.

pub mod anatomical;
pub mod galaxy;
pub mod placement;
pub mod sphere;
pub mod spiral;

use glam::Vec3;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::graph::GraphIndex;

/// The available spatial layouts.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum LayoutKind {
    /// Three vertical tiers of channels with golden-angle block spirals.
    #[default]
    Spiral,
    /// Cross-linked core with logarithmic channel arms.
    Galaxy,
    /// Opposing hemispheres of cross-linked blocks inside a channel shell.
    Sphere,
    /// Blocks warped over a multi-lobed parametric surface.
    Anatomical,
}

impl LayoutKind {
    /// All layouts in cycling order.
    pub const ALL: [LayoutKind; 4] = [
        LayoutKind::Spiral,
        LayoutKind::Galaxy,
        LayoutKind::Sphere,
        LayoutKind::Anatomical,
    ];

    /// Compute this layout for `graph`.
    pub fn compute(self, graph: &GraphIndex) -> LayoutResult {
        match self {
            Self::Spiral => spiral::compute(graph),
            Self::Galaxy => galaxy::compute(graph),
            Self::Sphere => sphere::compute(graph),
            Self::Anatomical => anatomical::compute(graph),
        }
    }

    /// The next layout in [`LayoutKind::ALL`], wrapping around.
    #[must_use]
    pub fn next(self) -> Self {
        let i = Self::ALL.iter().position(|k| *k == self).unwrap_or(0);
        Self::ALL[(i + 1) % Self::ALL.len()]
    }

    /// Lowercase display name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Spiral => "spiral",
            Self::Galaxy => "galaxy",
            Self::Sphere => "sphere",
            Self::Anatomical => "anatomical",
        }
    }
}

/// Positions for every channel and block, indexed by dense index.
///
/// Dense indices are a fixed bijection onto payload ids for the session,
/// so index-keyed vectors stand in for id-keyed maps.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LayoutResult {
    /// Position of channel `i`.
    pub channel_positions: Vec<Vec3>,
    /// Position of block `i`.
    pub block_positions: Vec<Vec3>,
}

impl LayoutResult {
    /// Every entity at the origin; layouts overwrite from here so no index
    /// is ever left undefined.
    pub fn with_counts(channels: usize, blocks: usize) -> Self {
        Self {
            channel_positions: vec![Vec3::ZERO; channels],
            block_positions: vec![Vec3::ZERO; blocks],
        }
    }

    /// Position of channel `index`.
    pub fn channel_position(&self, index: usize) -> Option<Vec3> {
        self.channel_positions.get(index).copied()
    }

    /// Position of block `index`.
    pub fn block_position(&self, index: usize) -> Option<Vec3> {
        self.block_positions.get(index).copied()
    }

    /// Position of the channel with payload id `id`.
    pub fn channel_position_by_id(
        &self,
        graph: &GraphIndex,
        id: &str,
    ) -> Option<Vec3> {
        graph
            .channel_index(id)
            .and_then(|i| self.channel_position(i))
    }

    /// Uniformly scale every position about the origin.
    #[must_use]
    pub fn scaled(mut self, factor: f32) -> Self {
        for p in self
            .channel_positions
            .iter_mut()
            .chain(self.block_positions.iter_mut())
        {
            *p *= factor;
        }
        self
    }

    /// Whether every coordinate is finite.
    pub fn is_finite(&self) -> bool {
        self.channel_positions
            .iter()
            .chain(&self.block_positions)
            .all(|p| p.is_finite())
    }

    /// All positions, channels first.
    pub fn all_positions(&self) -> Vec<Vec3> {
        self.channel_positions
            .iter()
            .chain(&self.block_positions)
            .copied()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::tests::fixture;

    fn empty() -> GraphIndex {
        GraphIndex::from_json(r#"{"elements":{"nodes":[],"edges":[]}}"#)
            .unwrap()
    }

    fn blocks_only() -> GraphIndex {
        GraphIndex::from_json(
            r#"{"elements":{"nodes":[
                {"data":{"id":"a","type":"Text"}},
                {"data":{"id":"b","type":"Image"}}
            ],"edges":[]}}"#,
        )
        .unwrap()
    }

    #[test]
    fn every_block_has_a_finite_position() {
        let g = fixture();
        for kind in LayoutKind::ALL {
            let r = kind.compute(&g);
            assert_eq!(r.block_positions.len(), g.block_count(), "{kind:?}");
            assert_eq!(r.channel_positions.len(), g.channel_count());
            assert!(r.is_finite(), "{kind:?}");
        }
    }

    #[test]
    fn empty_graph_yields_empty_maps() {
        let g = empty();
        for kind in LayoutKind::ALL {
            let r = kind.compute(&g);
            assert!(r.block_positions.is_empty());
            assert!(r.channel_positions.is_empty());
        }
    }

    #[test]
    fn unconnected_only_graph_is_placed() {
        let g = blocks_only();
        for kind in LayoutKind::ALL {
            let r = kind.compute(&g);
            assert_eq!(r.block_positions.len(), 2);
            assert!(r.is_finite());
            assert_ne!(r.block_positions[0], r.block_positions[1]);
        }
    }

    #[test]
    fn layouts_are_deterministic() {
        let g = fixture();
        for kind in LayoutKind::ALL {
            assert_eq!(kind.compute(&g), kind.compute(&g));
        }
    }

    #[test]
    fn layouts_differ_from_each_other() {
        let g = fixture();
        assert_ne!(
            LayoutKind::Spiral.compute(&g),
            LayoutKind::Galaxy.compute(&g)
        );
        assert_ne!(
            LayoutKind::Sphere.compute(&g),
            LayoutKind::Anatomical.compute(&g)
        );
    }

    #[test]
    fn next_cycles_through_all() {
        let mut k = LayoutKind::Spiral;
        for _ in 0..4 {
            k = k.next();
        }
        assert_eq!(k, LayoutKind::Spiral);
    }

    #[test]
    fn scaling_and_lookup_by_id() {
        let g = fixture();
        let r = LayoutKind::Sphere.compute(&g);
        let c1 = r.channel_position_by_id(&g, "c1").unwrap();
        let scaled = r.scaled(2.0);
        assert_eq!(scaled.channel_position(0), Some(c1 * 2.0));
        assert!(scaled.channel_position_by_id(&g, "nope").is_none());
    }
}
