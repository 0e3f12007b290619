//! CPU implementation of [`RenderBackend`].
//!
//! Keeps every upload in plain vectors and answers pick readbacks with a
//! software raster of the pick meshes: each sphere instance is projected
//! through the pick view and tested against the center of the single
//! pick pixel, nearest depth wins. Used by tests and by hosts that only
//! need the interaction model.

use glam::{Vec3, Vec3Swizzles, Vec4Swizzles};

use super::backend::{BaseGeometry, MeshHandle, PickView, RenderBackend};

/// Everything a headless mesh has received.
#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessMesh {
    /// Debug label.
    pub label: String,
    /// Base geometry.
    pub geometry: BaseGeometry,
    /// Allocated instance count.
    pub capacity: usize,
    /// Instances currently drawn.
    pub instance_count: usize,
    /// Whether the mesh is drawn at all.
    pub visible: bool,
    /// Instance translations.
    pub positions: Vec<Vec3>,
    /// Instance uniform scales.
    pub scales: Vec<f32>,
    /// Instance colors.
    pub colors: Vec<[f32; 3]>,
    /// Instance opacities.
    pub opacities: Vec<f32>,
    /// Segment endpoints.
    pub segments: Vec<[Vec3; 2]>,
    /// For pick meshes, the display mesh whose transforms are shared.
    pub pick_source: Option<MeshHandle>,
    /// For pick meshes, the constant per-instance pick colors.
    pub pick_colors: Vec<[u8; 3]>,
    /// Number of transform/color/segment uploads received.
    pub uploads: usize,
}

/// In-memory backend with a software pick raster.
#[derive(Debug, Clone)]
pub struct HeadlessBackend {
    meshes: Vec<HeadlessMesh>,
    bloom: f32,
    pick_reads: usize,
}

impl Default for HeadlessBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessBackend {
    /// Empty backend with bloom strength 1.0.
    pub fn new() -> Self {
        Self {
            meshes: Vec::new(),
            bloom: 1.0,
            pick_reads: 0,
        }
    }

    /// Mesh state behind `handle`.
    pub fn mesh(&self, handle: MeshHandle) -> Option<&HeadlessMesh> {
        self.meshes.get(handle.0 as usize)
    }

    /// Number of pick readbacks performed.
    pub fn pick_reads(&self) -> usize {
        self.pick_reads
    }

    fn mesh_mut(&mut self, handle: MeshHandle) -> Option<&mut HeadlessMesh> {
        self.meshes.get_mut(handle.0 as usize)
    }

    /// Nearest pick-mesh instance whose projected disc covers the pick
    /// pixel center, as `(depth, color)`.
    fn raster(&self, handle: MeshHandle, view: &PickView) -> Option<(f32, [u8; 3])> {
        let pick = self.mesh(handle)?;
        let source = self.mesh(pick.pick_source?)?;
        if !source.visible {
            return None;
        }
        let BaseGeometry::Sphere { radius } = source.geometry else {
            return None;
        };
        let count = source.instance_count.min(pick.pick_colors.len());
        let mut best: Option<(f32, [u8; 3])> = None;
        for i in 0..count {
            let (Some(&center), Some(&scale)) =
                (source.positions.get(i), source.scales.get(i))
            else {
                continue;
            };
            let clip = view.view_proj * center.extend(1.0);
            if clip.w <= 0.0 {
                continue;
            }
            let ndc = clip.xyz() / clip.w;
            if !(0.0..=1.0).contains(&ndc.z) {
                continue;
            }
            let rim = view.view_proj
                * (center + view.right * radius * scale).extend(1.0);
            if rim.w <= 0.0 {
                continue;
            }
            let reach = (rim.xy() / rim.w - ndc.xy()).length();
            if ndc.xy().length() > reach {
                continue;
            }
            if best.is_none_or(|(depth, _)| ndc.z < depth) {
                best = Some((ndc.z, pick.pick_colors[i]));
            }
        }
        best
    }
}

impl RenderBackend for HeadlessBackend {
    fn create_instanced_mesh(
        &mut self,
        label: &str,
        geometry: BaseGeometry,
        capacity: usize,
    ) -> MeshHandle {
        let handle = MeshHandle(self.meshes.len() as u32);
        self.meshes.push(HeadlessMesh {
            label: label.to_owned(),
            geometry,
            capacity,
            instance_count: capacity,
            visible: true,
            positions: vec![Vec3::ZERO; capacity],
            scales: vec![1.0; capacity],
            colors: vec![[1.0; 3]; capacity],
            opacities: vec![1.0; capacity],
            segments: Vec::new(),
            pick_source: None,
            pick_colors: Vec::new(),
            uploads: 0,
        });
        handle
    }

    fn create_pick_mesh(
        &mut self,
        source: MeshHandle,
        pick_colors: &[[u8; 3]],
    ) -> MeshHandle {
        let (label, geometry, capacity) = self.mesh(source).map_or_else(
            || ("pick".to_owned(), BaseGeometry::Segment, 0),
            |m| (format!("{} (pick)", m.label), m.geometry, m.capacity),
        );
        let handle = self.create_instanced_mesh(&label, geometry, capacity);
        if let Some(mesh) = self.mesh_mut(handle) {
            mesh.pick_source = Some(source);
            mesh.pick_colors = pick_colors.to_vec();
        }
        handle
    }

    fn write_transforms(
        &mut self,
        mesh: MeshHandle,
        positions: &[Vec3],
        scales: &[f32],
    ) {
        if let Some(m) = self.mesh_mut(mesh) {
            m.positions = positions.to_vec();
            m.scales = scales.to_vec();
            m.uploads += 1;
        }
    }

    fn write_segments(&mut self, mesh: MeshHandle, endpoints: &[[Vec3; 2]]) {
        if let Some(m) = self.mesh_mut(mesh) {
            m.segments = endpoints.to_vec();
            m.uploads += 1;
        }
    }

    fn write_colors(
        &mut self,
        mesh: MeshHandle,
        colors: &[[f32; 3]],
        opacities: &[f32],
    ) {
        if let Some(m) = self.mesh_mut(mesh) {
            m.colors = colors.to_vec();
            m.opacities = opacities.to_vec();
            m.uploads += 1;
        }
    }

    fn set_instance_count(&mut self, mesh: MeshHandle, count: usize) {
        if let Some(m) = self.mesh_mut(mesh) {
            m.instance_count = count.min(m.capacity);
        }
    }

    fn set_visible(&mut self, mesh: MeshHandle, visible: bool) {
        if let Some(m) = self.mesh_mut(mesh) {
            m.visible = visible;
        }
    }

    fn read_pick_pixel(
        &mut self,
        meshes: &[MeshHandle],
        view: &PickView,
    ) -> [u8; 4] {
        self.pick_reads += 1;
        meshes
            .iter()
            .filter_map(|&h| self.raster(h, view))
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map_or([0; 4], |(_, [r, g, b])| [r, g, b, 255])
    }

    fn bloom_strength(&self) -> f32 {
        self.bloom
    }

    fn set_bloom_strength(&mut self, strength: f32) {
        self.bloom = strength;
    }
}
