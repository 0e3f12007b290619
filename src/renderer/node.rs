//! Instanced spheres for one kind of graph node (blocks or channels).

use glam::Vec3;

use super::backend::{BaseGeometry, MeshHandle, RenderBackend};
use super::instances::{DimStyle, InstanceAttributes};
use super::picking::encode_pick_id;

/// One display mesh plus one pick mesh sharing its transforms.
///
/// Setters stage into the flat attribute arrays; nothing reaches the
/// backend until [`NodeRenderer::commit_positions`] or
/// [`NodeRenderer::commit_attributes`]. Callers commit once per logical
/// update.
#[derive(Debug, Clone)]
pub struct NodeRenderer {
    mesh: MeshHandle,
    pick_mesh: MeshHandle,
    attributes: InstanceAttributes,
    first_pick_id: u32,
}

impl NodeRenderer {
    /// Create the meshes and upload the baseline attributes.
    ///
    /// Instance `i` gets pick ID `first_pick_id + i`.
    pub fn new<B: RenderBackend>(
        backend: &mut B,
        label: &str,
        radius: f32,
        colors: Vec<[f32; 3]>,
        opacity: f32,
        scales: &[f32],
        first_pick_id: u32,
    ) -> Self {
        let attributes = InstanceAttributes::new(colors, opacity, scales);
        let mesh = backend.create_instanced_mesh(
            label,
            BaseGeometry::Sphere { radius },
            attributes.len(),
        );
        let pick_colors: Vec<[u8; 3]> = (0..attributes.len())
            .map(|i| encode_pick_id(first_pick_id + i as u32))
            .collect();
        let pick_mesh = backend.create_pick_mesh(mesh, &pick_colors);
        let renderer = Self {
            mesh,
            pick_mesh,
            attributes,
            first_pick_id,
        };
        renderer.commit_positions(backend);
        renderer.upload_colors(backend);
        renderer
    }

    /// Display mesh handle.
    pub fn mesh(&self) -> MeshHandle {
        self.mesh
    }

    /// Pick mesh handle.
    pub fn pick_mesh(&self) -> MeshHandle {
        self.pick_mesh
    }

    /// Pick ID of instance `i`.
    pub fn pick_id(&self, i: usize) -> u32 {
        self.first_pick_id + i as u32
    }

    /// Number of instances.
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    /// Whether there are no instances.
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Live attribute arrays.
    pub fn attributes(&self) -> &InstanceAttributes {
        &self.attributes
    }

    /// Position of instance `i`.
    pub fn position(&self, i: usize) -> Option<Vec3> {
        self.attributes.position(i)
    }

    /// Color of instance `i`.
    pub fn color(&self, i: usize) -> Option<[f32; 3]> {
        self.attributes.color(i)
    }

    /// Opacity of instance `i`.
    pub fn opacity(&self, i: usize) -> Option<f32> {
        self.attributes.opacity(i)
    }

    /// Scale of instance `i`.
    pub fn scale(&self, i: usize) -> Option<f32> {
        self.attributes.scale(i)
    }

    /// Stage a position.
    pub fn set_position(&mut self, i: usize, p: Vec3) {
        self.attributes.set_position(i, p);
    }

    /// Stage all positions at once.
    pub fn set_positions(&mut self, positions: &[Vec3]) {
        self.attributes.set_positions(positions);
    }

    /// Stage a color.
    pub fn set_color(&mut self, i: usize, c: [f32; 3]) {
        self.attributes.set_color(i, c);
    }

    /// Stage an opacity.
    pub fn set_opacity(&mut self, i: usize, o: f32) {
        self.attributes.set_opacity(i, o);
    }

    /// Stage a scale.
    pub fn set_scale(&mut self, i: usize, s: f32) {
        self.attributes.set_scale(i, s);
    }

    /// Restore instance `i` from baseline (staged).
    pub fn restore(&mut self, i: usize) {
        self.attributes.restore(i);
    }

    /// Flush positions (and scales, which share the transform) to the
    /// backend.
    pub fn commit_positions<B: RenderBackend>(&self, backend: &mut B) {
        backend.write_transforms(
            self.mesh,
            self.attributes.positions(),
            self.attributes.scales(),
        );
    }

    /// Flush color, opacity, and scale to the backend.
    pub fn commit_attributes<B: RenderBackend>(&self, backend: &mut B) {
        self.upload_colors(backend);
        self.commit_positions(backend);
    }

    fn upload_colors<B: RenderBackend>(&self, backend: &mut B) {
        backend.write_colors(
            self.mesh,
            self.attributes.colors(),
            self.attributes.opacities(),
        );
    }

    /// Keep `keep` at baseline, dim everything else, commit once.
    pub fn fade_all_except<B: RenderBackend>(
        &mut self,
        backend: &mut B,
        keep: impl Fn(usize) -> bool,
        dim: DimStyle,
    ) {
        self.attributes.fade_all_except(keep, dim);
        self.commit_attributes(backend);
    }

    /// Restore every instance from baseline and commit.
    pub fn reset_attributes<B: RenderBackend>(&mut self, backend: &mut B) {
        self.attributes.restore_all();
        self.commit_attributes(backend);
    }

    /// Live attribute arrays for bulk staging; commit afterwards.
    pub(crate) fn attributes_mut(&mut self) -> &mut InstanceAttributes {
        &mut self.attributes
    }
}
