//! Boundary between the render adapter and a 3D engine.
//!
//! The adapter never touches the GPU directly. Everything it needs from an
//! engine fits in [`RenderBackend`]: instanced meshes built from a base
//! geometry, per-instance attribute uploads, a one-pixel pick readback,
//! and the bloom strength of the host's post-processing chain.
//!
//! [`crate::gpu::WgpuBackend`] implements it on wgpu;
//! [`super::headless::HeadlessBackend`] implements it on the CPU for tests
//! and offline use.

use glam::{Mat4, Vec3};

use crate::camera::Camera;

/// Opaque handle to an instanced mesh owned by a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshHandle(pub u32);

/// Geometry every instance of a mesh is stamped from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BaseGeometry {
    /// A sphere of the given radius, scaled per instance.
    Sphere {
        /// Unscaled radius in world units.
        radius: f32,
    },
    /// A solid line segment between two endpoints.
    Segment,
    /// A dashed line segment between two endpoints.
    DashedSegment {
        /// Dash length in world units.
        dash: f32,
        /// Gap length in world units.
        gap: f32,
    },
}

/// Camera used for one pick readback.
///
/// `view_proj` already carries the one-pixel view offset: the pixel under
/// the cursor fills the whole clip-space square.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickView {
    /// Offset view-projection matrix.
    pub view_proj: Mat4,
    /// World-space camera position.
    pub eye: Vec3,
    /// World-space camera right vector (unit length).
    pub right: Vec3,
    /// World-space screen-up vector (unit length).
    pub up: Vec3,
}

/// What the render adapter needs from a 3D engine.
pub trait RenderBackend {
    /// Allocate an instanced mesh with room for `capacity` instances. All
    /// instances start visible at the origin, white, opaque, unit scale.
    fn create_instanced_mesh(
        &mut self,
        label: &str,
        geometry: BaseGeometry,
        capacity: usize,
    ) -> MeshHandle;

    /// Allocate a pick mesh that shares `source`'s geometry and instance
    /// transforms, drawn with the given constant per-instance pick colors.
    fn create_pick_mesh(
        &mut self,
        source: MeshHandle,
        pick_colors: &[[u8; 3]],
    ) -> MeshHandle;

    /// Upload instance transforms (translation + uniform scale).
    fn write_transforms(
        &mut self,
        mesh: MeshHandle,
        positions: &[Vec3],
        scales: &[f32],
    );

    /// Upload segment endpoints for a segment mesh.
    fn write_segments(&mut self, mesh: MeshHandle, endpoints: &[[Vec3; 2]]);

    /// Upload instance colors and opacities.
    fn write_colors(
        &mut self,
        mesh: MeshHandle,
        colors: &[[f32; 3]],
        opacities: &[f32],
    );

    /// Draw only the first `count` instances.
    fn set_instance_count(&mut self, mesh: MeshHandle, count: usize);

    /// Show or hide a whole mesh.
    fn set_visible(&mut self, mesh: MeshHandle, visible: bool);

    /// Render `meshes` through `view` into a 1x1 target and read the pixel
    /// back synchronously. `[0, 0, 0, 0]` means nothing was hit.
    fn read_pick_pixel(&mut self, meshes: &[MeshHandle], view: &PickView)
        -> [u8; 4];

    /// Current bloom strength of the host compositor.
    fn bloom_strength(&self) -> f32;

    /// Set the bloom strength of the host compositor.
    fn set_bloom_strength(&mut self, strength: f32);

    /// Camera for the next display frame. Backends without a display pass
    /// ignore it.
    fn set_camera(&mut self, _camera: &Camera) {}
}
