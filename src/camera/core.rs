use glam::{Mat4, Vec2, Vec3, Vec4Swizzles};

use crate::renderer::PickView;

/// Perspective camera defined by eye position, target, and projection
/// parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Eye (camera) position in world space.
    pub eye: Vec3,
    /// Look-at target position.
    pub target: Vec3,
    /// Up direction vector.
    pub up: Vec3,
    /// Viewport aspect ratio (width / height).
    pub aspect: f32,
    /// Vertical field of view in degrees.
    pub fovy: f32,
    /// Near clipping plane distance.
    pub znear: f32,
    /// Far clipping plane distance.
    pub zfar: f32,
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
/// GPU uniform buffer holding the view-projection matrix and billboard axes.
pub struct CameraUniform {
    /// Combined view-projection matrix.
    pub view_proj: [[f32; 4]; 4],
    /// Camera world-space position.
    pub position: [f32; 3],
    /// Viewport aspect ratio.
    pub aspect: f32,
    /// Camera right vector, for billboarding.
    pub right: [f32; 3],
    /// Padding for GPU alignment.
    pub(crate) _pad0: f32,
    /// Camera up vector, for billboarding.
    pub up: [f32; 3],
    /// Padding for GPU alignment.
    pub(crate) _pad1: f32,
}

impl Camera {
    /// View matrix.
    pub fn build_view(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    /// Projection matrix.
    pub fn build_projection(&self) -> Mat4 {
        // perspective_rh already uses [0,1] depth range (wgpu/Vulkan
        // convention)
        Mat4::perspective_rh(
            self.fovy.to_radians(),
            self.aspect,
            self.znear,
            self.zfar,
        )
    }

    /// Build the combined view-projection matrix.
    pub fn build_matrix(&self) -> Mat4 {
        self.build_projection() * self.build_view()
    }

    /// Unit vector from eye toward target.
    pub fn forward(&self) -> Vec3 {
        (self.target - self.eye).normalize_or(Vec3::NEG_Z)
    }

    /// Screen-right in world space.
    pub fn right(&self) -> Vec3 {
        self.forward().cross(self.up).normalize_or(Vec3::X)
    }

    /// Screen-up in world space, orthogonal to forward and right.
    pub fn screen_up(&self) -> Vec3 {
        self.right().cross(self.forward()).normalize_or(Vec3::Y)
    }

    /// Project a world point to pixel coordinates (origin top-left).
    /// `None` when the point is behind the camera.
    pub fn project(&self, world: Vec3, viewport: (u32, u32)) -> Option<Vec2> {
        let clip = self.build_matrix() * world.extend(1.0);
        if clip.w <= 0.0 {
            return None;
        }
        let ndc = clip.xy() / clip.w;
        Some(Vec2::new(
            (ndc.x + 1.0) * 0.5 * viewport.0 as f32,
            (1.0 - ndc.y) * 0.5 * viewport.1 as f32,
        ))
    }

    /// View-projection for a 1x1 render of the pixel under `cursor`.
    ///
    /// The full-viewport projection is followed by a clip-space translate
    /// and scale that maps that one pixel onto the whole `[-1, 1]` square,
    /// the same sub-frustum a view offset of one pixel would give. `None`
    /// when the cursor is outside the viewport.
    pub fn pick_view(
        &self,
        cursor: Vec2,
        viewport: (u32, u32),
    ) -> Option<PickView> {
        let (w, h) = (viewport.0 as f32, viewport.1 as f32);
        if w < 1.0 || h < 1.0 {
            return None;
        }
        if !(0.0..w).contains(&cursor.x) || !(0.0..h).contains(&cursor.y) {
            return None;
        }
        let px = cursor.x.floor() + 0.5;
        let py = cursor.y.floor() + 0.5;
        let center_x = 2.0 * px / w - 1.0;
        let center_y = 1.0 - 2.0 * py / h;
        let offset = Mat4::from_scale(Vec3::new(w, h, 1.0))
            * Mat4::from_translation(Vec3::new(-center_x, -center_y, 0.0));
        Some(PickView {
            view_proj: offset * self.build_matrix(),
            eye: self.eye,
            right: self.right(),
            up: self.screen_up(),
        })
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}

impl CameraUniform {
    /// Create a new camera uniform with identity view-projection.
    pub fn new() -> Self {
        Self {
            view_proj: Mat4::IDENTITY.to_cols_array_2d(),
            position: [0.0; 3],
            aspect: 1.6,
            right: [1.0, 0.0, 0.0],
            _pad0: 0.0,
            up: [0.0, 1.0, 0.0],
            _pad1: 0.0,
        }
    }

    /// Update uniform fields from a view-projection and its camera.
    pub fn update(&mut self, view_proj: Mat4, camera: &Camera) {
        self.view_proj = view_proj.to_cols_array_2d();
        self.position = camera.eye.to_array();
        self.aspect = camera.aspect;
        self.right = camera.right().to_array();
        self.up = camera.screen_up().to_array();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> Camera {
        Camera {
            eye: Vec3::new(0.0, 0.0, 100.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            aspect: 1.0,
            fovy: 45.0,
            znear: 1.0,
            zfar: 1000.0,
        }
    }

    #[test]
    fn target_projects_to_viewport_center() {
        let p = camera().project(Vec3::ZERO, (200, 100)).unwrap();
        assert!((p.x - 100.0).abs() < 1e-3);
        assert!((p.y - 50.0).abs() < 1e-3);
        assert!(camera().project(Vec3::new(0.0, 0.0, 200.0), (200, 100)).is_none());
    }

    #[test]
    fn pick_view_centers_the_cursor_pixel() {
        let cam = camera();
        let viewport = (200, 200);
        let world = Vec3::new(10.0, 5.0, 0.0);
        let cursor = cam.project(world, viewport).unwrap();
        let view = cam.pick_view(cursor, viewport).unwrap();
        let clip = view.view_proj * world.extend(1.0);
        let ndc = clip.xy() / clip.w;
        // Within one pixel of the pixel center, i.e. inside [-1, 1].
        assert!(ndc.x.abs() <= 1.0 && ndc.y.abs() <= 1.0, "{ndc}");
    }

    #[test]
    fn pick_view_rejects_outside_cursor() {
        let cam = camera();
        assert!(cam.pick_view(Vec2::new(-1.0, 5.0), (100, 100)).is_none());
        assert!(cam.pick_view(Vec2::new(5.0, 100.0), (100, 100)).is_none());
        assert!(cam.pick_view(Vec2::ZERO, (0, 0)).is_none());
    }

    #[test]
    fn basis_is_orthonormal() {
        let cam = camera();
        assert!((cam.right() - Vec3::X).length() < 1e-5);
        assert!((cam.screen_up() - Vec3::Y).length() < 1e-5);
    }
}
