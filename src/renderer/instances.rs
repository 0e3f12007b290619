//! Flat per-instance attribute arrays with immutable baselines.
//!
//! These arrays are the live state of every instance. Highlighting writes
//! into them and is undone by copying the baseline back, never by
//! recomputing colors from the graph.

use glam::Vec3;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// How non-highlighted instances look while a highlight is active.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct DimStyle {
    /// Opacity multiplier.
    pub opacity: f32,
    /// Scale multiplier.
    pub scale: f32,
    /// RGB multiplier.
    pub color: f32,
}

impl Default for DimStyle {
    fn default() -> Self {
        Self {
            opacity: 0.12,
            scale: 0.7,
            color: 0.35,
        }
    }
}

/// Position, color, opacity, and scale for `len` instances.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct InstanceAttributes {
    positions: Vec<Vec3>,
    colors: Vec<[f32; 3]>,
    opacities: Vec<f32>,
    scales: Vec<f32>,
    base_colors: Vec<[f32; 3]>,
    base_opacities: Vec<f32>,
    base_scales: Vec<f32>,
}

impl InstanceAttributes {
    /// One instance per entry of `colors`. The given colors, opacity, and
    /// per-instance scales become the baseline. `scales` shorter than
    /// `colors` pads with 1.0.
    pub fn new(colors: Vec<[f32; 3]>, opacity: f32, scales: &[f32]) -> Self {
        let len = colors.len();
        let base_scales: Vec<f32> = (0..len)
            .map(|i| scales.get(i).copied().unwrap_or(1.0))
            .collect();
        Self {
            positions: vec![Vec3::ZERO; len],
            colors: colors.clone(),
            opacities: vec![opacity; len],
            scales: base_scales.clone(),
            base_colors: colors,
            base_opacities: vec![opacity; len],
            base_scales,
        }
    }

    /// Number of instances.
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Whether there are no instances.
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Live positions.
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    /// Live colors.
    pub fn colors(&self) -> &[[f32; 3]] {
        &self.colors
    }

    /// Live opacities.
    pub fn opacities(&self) -> &[f32] {
        &self.opacities
    }

    /// Live scales.
    pub fn scales(&self) -> &[f32] {
        &self.scales
    }

    /// Position of instance `i`.
    pub fn position(&self, i: usize) -> Option<Vec3> {
        self.positions.get(i).copied()
    }

    /// Color of instance `i`.
    pub fn color(&self, i: usize) -> Option<[f32; 3]> {
        self.colors.get(i).copied()
    }

    /// Opacity of instance `i`.
    pub fn opacity(&self, i: usize) -> Option<f32> {
        self.opacities.get(i).copied()
    }

    /// Scale of instance `i`.
    pub fn scale(&self, i: usize) -> Option<f32> {
        self.scales.get(i).copied()
    }

    /// Baseline color of instance `i`.
    pub fn base_color(&self, i: usize) -> Option<[f32; 3]> {
        self.base_colors.get(i).copied()
    }

    /// Baseline opacity of instance `i`.
    pub fn base_opacity(&self, i: usize) -> Option<f32> {
        self.base_opacities.get(i).copied()
    }

    /// Baseline scale of instance `i`.
    pub fn base_scale(&self, i: usize) -> Option<f32> {
        self.base_scales.get(i).copied()
    }

    /// Out-of-range writes are ignored.
    pub fn set_position(&mut self, i: usize, p: Vec3) {
        if let Some(slot) = self.positions.get_mut(i) {
            *slot = p;
        }
    }

    /// Out-of-range writes are ignored.
    pub fn set_color(&mut self, i: usize, c: [f32; 3]) {
        if let Some(slot) = self.colors.get_mut(i) {
            *slot = c;
        }
    }

    /// Out-of-range writes are ignored.
    pub fn set_opacity(&mut self, i: usize, o: f32) {
        if let Some(slot) = self.opacities.get_mut(i) {
            *slot = o;
        }
    }

    /// Out-of-range writes are ignored.
    pub fn set_scale(&mut self, i: usize, s: f32) {
        if let Some(slot) = self.scales.get_mut(i) {
            *slot = s;
        }
    }

    /// Copy all of `positions` in, truncating or leaving the tail as is.
    pub fn set_positions(&mut self, positions: &[Vec3]) {
        for (slot, p) in self.positions.iter_mut().zip(positions) {
            *slot = *p;
        }
    }

    /// Restore color, opacity, and scale of instance `i` from baseline.
    pub fn restore(&mut self, i: usize) {
        if i >= self.len() {
            return;
        }
        self.colors[i] = self.base_colors[i];
        self.opacities[i] = self.base_opacities[i];
        self.scales[i] = self.base_scales[i];
    }

    /// Restore every instance from baseline.
    pub fn restore_all(&mut self) {
        self.colors.copy_from_slice(&self.base_colors);
        self.opacities.copy_from_slice(&self.base_opacities);
        self.scales.copy_from_slice(&self.base_scales);
    }

    /// Copy live positions, colors, opacities, and scales from a snapshot
    /// of these same instances. Baselines are untouched. A snapshot with a
    /// different instance count is ignored.
    pub fn restore_from(&mut self, snapshot: &Self) {
        if snapshot.len() != self.len() {
            return;
        }
        self.positions.copy_from_slice(&snapshot.positions);
        self.colors.copy_from_slice(&snapshot.colors);
        self.opacities.copy_from_slice(&snapshot.opacities);
        self.scales.copy_from_slice(&snapshot.scales);
    }

    /// Restore members of `keep` from baseline and dim everyone else.
    ///
    /// Dimming is computed from the baseline, so repeated calls never
    /// compound.
    pub fn fade_all_except(&mut self, keep: impl Fn(usize) -> bool, dim: DimStyle) {
        for i in 0..self.len() {
            if keep(i) {
                self.restore(i);
            } else {
                let [r, g, b] = self.base_colors[i];
                self.colors[i] = [r * dim.color, g * dim.color, b * dim.color];
                self.opacities[i] = self.base_opacities[i] * dim.opacity;
                self.scales[i] = self.base_scales[i] * dim.scale;
            }
        }
    }
}
