//! [`RenderBackend`] on wgpu.
//!
//! Spheres are camera-facing billboards read from a storage buffer of
//! [`SphereInstance`]; a pick mesh binds its source's instance buffer
//! plus its own buffer of packed pick IDs, so transforms are uploaded
//! once and shared. Segments are a `LineList` over [`SegmentInstance`]s,
//! two vertices per instance.
//!
//! Pick readback renders into a 1x1 `Rgba8Unorm` target through the
//! offset pick camera, copies the pixel into a staging buffer and blocks
//! on the map.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use glam::Vec3;

use super::dynamic_buffer::TypedBuffer;
use super::render_context::RenderContext;
use crate::camera::core::{Camera, CameraUniform};
use crate::renderer::{BaseGeometry, MeshHandle, PickView, RenderBackend};

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;
const PICK_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;
const CLEAR: wgpu::Color = wgpu::Color {
    r: 0.012,
    g: 0.014,
    b: 0.022,
    a: 1.0,
};

/// Per-instance sphere data. Must match `SphereInstance` in `nodes.wgsl`.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SphereInstance {
    /// xyz = center, w = world radius.
    pub center: [f32; 4],
    /// xyz = RGB, w = opacity.
    pub color: [f32; 4],
}

/// Per-instance segment data. Must match `SegmentInstance` in
/// `edges.wgsl`.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SegmentInstance {
    /// xyz = first endpoint, w = dash length.
    pub a: [f32; 4],
    /// xyz = second endpoint, w = gap length (0 for solid).
    pub b: [f32; 4],
    /// xyz = RGB, w = opacity.
    pub color: [f32; 4],
}

enum MeshData {
    Spheres {
        radius: f32,
        staged: Vec<SphereInstance>,
        buffer: TypedBuffer<SphereInstance>,
    },
    Segments {
        dash: f32,
        gap: f32,
        staged: Vec<SegmentInstance>,
        buffer: TypedBuffer<SegmentInstance>,
    },
    Pick {
        source: MeshHandle,
        ids: TypedBuffer<u32>,
    },
}

struct GpuMesh {
    data: MeshData,
    count: usize,
    visible: bool,
    bind_group: Option<wgpu::BindGroup>,
}

struct DepthTarget {
    _texture: wgpu::Texture,
    view: wgpu::TextureView,
}

struct PickTarget {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    depth: DepthTarget,
    staging: wgpu::Buffer,
}

/// wgpu implementation of the render boundary.
pub struct WgpuBackend {
    context: RenderContext,
    camera: CameraUniform,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    pick_camera_buffer: wgpu::Buffer,
    pick_camera_bind_group: wgpu::BindGroup,
    instance_layout: wgpu::BindGroupLayout,
    pick_layout: wgpu::BindGroupLayout,
    sphere_pipeline: wgpu::RenderPipeline,
    segment_pipeline: wgpu::RenderPipeline,
    pick_pipeline: wgpu::RenderPipeline,
    depth: DepthTarget,
    pick: PickTarget,
    meshes: Vec<GpuMesh>,
    bloom: f32,
}

impl WgpuBackend {
    /// Build pipelines and targets on `context`.
    pub fn new(context: RenderContext) -> Self {
        let device = &context.device;
        let nodes = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Node Shader"),
            source: wgpu::ShaderSource::Wgsl(
                include_str!("../../assets/shaders/nodes.wgsl").into(),
            ),
        });
        let edges = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Edge Shader"),
            source: wgpu::ShaderSource::Wgsl(
                include_str!("../../assets/shaders/edges.wgsl").into(),
            ),
        });

        let camera_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Camera Bind Group Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });
        let (camera_buffer, camera_bind_group) =
            camera_binding(device, &camera_layout, "Camera");
        let (pick_camera_buffer, pick_camera_bind_group) =
            camera_binding(device, &camera_layout, "Pick Camera");

        let instance_layout =
            storage_layout(device, "Instance Bind Group Layout", 1);
        let pick_layout = storage_layout(device, "Pick Bind Group Layout", 2);

        let format = context.format();
        let sphere_pipeline = pipeline(
            device,
            &PipelineSpec {
                label: "Sphere Pipeline",
                module: &nodes,
                vs: "vs_sphere",
                fs: "fs_sphere",
                layouts: &[&camera_layout, &instance_layout],
                format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                topology: wgpu::PrimitiveTopology::TriangleList,
                depth_write: true,
            },
        );
        let segment_pipeline = pipeline(
            device,
            &PipelineSpec {
                label: "Segment Pipeline",
                module: &edges,
                vs: "vs_segment",
                fs: "fs_segment",
                layouts: &[&camera_layout, &instance_layout],
                format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                topology: wgpu::PrimitiveTopology::LineList,
                depth_write: false,
            },
        );
        let pick_pipeline = pipeline(
            device,
            &PipelineSpec {
                label: "Pick Pipeline",
                module: &nodes,
                vs: "vs_pick",
                fs: "fs_pick",
                layouts: &[&camera_layout, &pick_layout],
                format: PICK_FORMAT,
                blend: None,
                topology: wgpu::PrimitiveTopology::TriangleList,
                depth_write: true,
            },
        );

        let (width, height) = context.size();
        let depth = depth_target(device, "Depth Texture", width, height);
        let pick = pick_target(device);

        Self {
            context,
            camera: CameraUniform::new(),
            camera_buffer,
            camera_bind_group,
            pick_camera_buffer,
            pick_camera_bind_group,
            instance_layout,
            pick_layout,
            sphere_pipeline,
            segment_pipeline,
            pick_pipeline,
            depth,
            pick,
            meshes: Vec::new(),
            bloom: 1.0,
        }
    }

    /// The device context.
    pub fn context(&self) -> &RenderContext {
        &self.context
    }

    /// Track a new viewport size.
    pub fn resize(&mut self, width: u32, height: u32) {
        if (width, height) == self.context.size() || width == 0 || height == 0 {
            return;
        }
        self.context.resize(width, height);
        self.depth =
            depth_target(&self.context.device, "Depth Texture", width, height);
    }

    /// Upload the view camera.
    pub fn update_camera(&mut self, camera: &Camera) {
        self.camera.update(camera.build_matrix(), camera);
        self.context.queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::bytes_of(&self.camera),
        );
    }

    /// Draw every visible edge and node mesh into `target`.
    pub fn render(&self, target: &wgpu::TextureView) {
        let mut encoder = self.context.create_encoder("Atlas Encoder");
        {
            let mut pass =
                encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("Atlas Pass"),
                    color_attachments: &[Some(
                        wgpu::RenderPassColorAttachment {
                            view: target,
                            resolve_target: None,
                            ops: wgpu::Operations {
                                load: wgpu::LoadOp::Clear(CLEAR),
                                store: wgpu::StoreOp::Store,
                            },
                            depth_slice: None,
                        },
                    )],
                    depth_stencil_attachment: Some(
                        wgpu::RenderPassDepthStencilAttachment {
                            view: &self.depth.view,
                            depth_ops: Some(wgpu::Operations {
                                load: wgpu::LoadOp::Clear(1.0),
                                store: wgpu::StoreOp::Store,
                            }),
                            stencil_ops: None,
                        },
                    ),
                    ..Default::default()
                });
            pass.set_bind_group(0, &self.camera_bind_group, &[]);

            pass.set_pipeline(&self.segment_pipeline);
            for mesh in self.drawable(|d| matches!(d, MeshData::Segments { .. })) {
                if let Some(bind_group) = &mesh.bind_group {
                    pass.set_bind_group(1, bind_group, &[]);
                    pass.draw(0..2, 0..mesh.count as u32);
                }
            }
            pass.set_pipeline(&self.sphere_pipeline);
            for mesh in self.drawable(|d| matches!(d, MeshData::Spheres { .. })) {
                if let Some(bind_group) = &mesh.bind_group {
                    pass.set_bind_group(1, bind_group, &[]);
                    pass.draw(0..6, 0..mesh.count as u32);
                }
            }
        }
        self.context.submit(encoder);
    }

    fn drawable(
        &self,
        kind: impl Fn(&MeshData) -> bool,
    ) -> impl Iterator<Item = &GpuMesh> {
        self.meshes
            .iter()
            .filter(move |m| m.visible && m.count > 0 && kind(&m.data))
    }

    fn push(&mut self, data: MeshData, count: usize) -> MeshHandle {
        let handle = MeshHandle(self.meshes.len() as u32);
        self.meshes.push(GpuMesh {
            data,
            count,
            visible: true,
            bind_group: None,
        });
        self.rebind(handle.0 as usize);
        handle
    }

    fn bind_group_for(&self, index: usize) -> Option<wgpu::BindGroup> {
        let device = &self.context.device;
        let mesh = self.meshes.get(index)?;
        let label = Some("Instance Bind Group");
        let group = match &mesh.data {
            MeshData::Spheres { buffer, .. } => {
                single_storage(device, &self.instance_layout, buffer.buffer())
            }
            MeshData::Segments { buffer, .. } => {
                single_storage(device, &self.instance_layout, buffer.buffer())
            }
            MeshData::Pick { source, ids } => {
                let MeshData::Spheres { buffer, .. } =
                    &self.meshes.get(source.0 as usize)?.data
                else {
                    return None;
                };
                device.create_bind_group(&wgpu::BindGroupDescriptor {
                    label,
                    layout: &self.pick_layout,
                    entries: &[
                        wgpu::BindGroupEntry {
                            binding: 0,
                            resource: buffer.buffer().as_entire_binding(),
                        },
                        wgpu::BindGroupEntry {
                            binding: 1,
                            resource: ids.buffer().as_entire_binding(),
                        },
                    ],
                })
            }
        };
        Some(group)
    }

    fn rebind(&mut self, index: usize) {
        let group = self.bind_group_for(index);
        if let Some(mesh) = self.meshes.get_mut(index) {
            mesh.bind_group = group;
        }
    }

    /// Re-upload a mesh's staged instances; rebind it and any pick mesh
    /// reading from it when the buffer moved.
    fn upload(&mut self, handle: MeshHandle) {
        let Some(mesh) = self.meshes.get_mut(handle.0 as usize) else {
            return;
        };
        let (device, queue) = (&self.context.device, &self.context.queue);
        let moved = match &mut mesh.data {
            MeshData::Spheres { staged, buffer, .. } => {
                buffer.write(device, queue, staged)
            }
            MeshData::Segments { staged, buffer, .. } => {
                buffer.write(device, queue, staged)
            }
            MeshData::Pick { .. } => false,
        };
        if !moved {
            return;
        }
        for i in 0..self.meshes.len() {
            let reads_it = matches!(
                &self.meshes[i].data,
                MeshData::Pick { source, .. } if *source == handle
            );
            if i == handle.0 as usize || reads_it {
                self.rebind(i);
            }
        }
    }

    fn mesh_data_mut(&mut self, handle: MeshHandle) -> Option<&mut MeshData> {
        self.meshes.get_mut(handle.0 as usize).map(|m| &mut m.data)
    }

    fn encode_pick(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        meshes: &[MeshHandle],
    ) {
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Pick Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &self.pick.view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(
                wgpu::RenderPassDepthStencilAttachment {
                    view: &self.pick.depth.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                },
            ),
            ..Default::default()
        });
        pass.set_pipeline(&self.pick_pipeline);
        pass.set_bind_group(0, &self.pick_camera_bind_group, &[]);
        for handle in meshes {
            let Some(mesh) = self.meshes.get(handle.0 as usize) else {
                continue;
            };
            let MeshData::Pick { source, .. } = &mesh.data else {
                continue;
            };
            let Some(src) = self.meshes.get(source.0 as usize) else {
                continue;
            };
            let count = mesh.count.min(src.count);
            if !src.visible || count == 0 {
                continue;
            }
            if let Some(bind_group) = &mesh.bind_group {
                pass.set_bind_group(1, bind_group, &[]);
                pass.draw(0..6, 0..count as u32);
            }
        }
    }
}

impl RenderBackend for WgpuBackend {
    fn create_instanced_mesh(
        &mut self,
        label: &str,
        geometry: BaseGeometry,
        capacity: usize,
    ) -> MeshHandle {
        let device = &self.context.device;
        let usage = wgpu::BufferUsages::STORAGE;
        let data = match geometry {
            BaseGeometry::Sphere { radius } => {
                let staged = vec![
                    SphereInstance {
                        center: [0.0, 0.0, 0.0, radius],
                        color: [1.0; 4],
                    };
                    capacity
                ];
                let mut buffer =
                    TypedBuffer::with_capacity(device, label, capacity, usage);
                let _ = buffer.write(device, &self.context.queue, &staged);
                MeshData::Spheres {
                    radius,
                    staged,
                    buffer,
                }
            }
            BaseGeometry::Segment | BaseGeometry::DashedSegment { .. } => {
                let (dash, gap) = match geometry {
                    BaseGeometry::DashedSegment { dash, gap } => (dash, gap),
                    _ => (0.0, 0.0),
                };
                let staged = vec![
                    SegmentInstance {
                        a: [0.0, 0.0, 0.0, dash],
                        b: [0.0, 0.0, 0.0, gap],
                        color: [1.0; 4],
                    };
                    capacity
                ];
                let mut buffer =
                    TypedBuffer::with_capacity(device, label, capacity, usage);
                let _ = buffer.write(device, &self.context.queue, &staged);
                MeshData::Segments {
                    dash,
                    gap,
                    staged,
                    buffer,
                }
            }
        };
        self.push(data, capacity)
    }

    fn create_pick_mesh(
        &mut self,
        source: MeshHandle,
        pick_colors: &[[u8; 3]],
    ) -> MeshHandle {
        let device = &self.context.device;
        let packed: Vec<u32> = pick_colors
            .iter()
            .map(|&[r, g, b]| u32::from_le_bytes([r, g, b, 0]))
            .collect();
        let mut ids = TypedBuffer::with_capacity(
            device,
            "Pick IDs",
            packed.len(),
            wgpu::BufferUsages::STORAGE,
        );
        let _ = ids.write(device, &self.context.queue, &packed);
        self.push(MeshData::Pick { source, ids }, packed.len())
    }

    fn write_transforms(
        &mut self,
        mesh: MeshHandle,
        positions: &[Vec3],
        scales: &[f32],
    ) {
        let Some(MeshData::Spheres { radius, staged, .. }) =
            self.mesh_data_mut(mesh)
        else {
            return;
        };
        for (i, slot) in staged.iter_mut().enumerate() {
            if let Some(p) = positions.get(i) {
                slot.center[..3].copy_from_slice(&p.to_array());
            }
            if let Some(s) = scales.get(i) {
                slot.center[3] = *radius * s;
            }
        }
        self.upload(mesh);
    }

    fn write_segments(&mut self, mesh: MeshHandle, endpoints: &[[Vec3; 2]]) {
        let Some(MeshData::Segments {
            dash, gap, staged, ..
        }) = self.mesh_data_mut(mesh)
        else {
            return;
        };
        let (dash, gap) = (*dash, *gap);
        for (slot, [a, b]) in staged.iter_mut().zip(endpoints) {
            slot.a = a.extend(dash).to_array();
            slot.b = b.extend(gap).to_array();
        }
        self.upload(mesh);
    }

    fn write_colors(
        &mut self,
        mesh: MeshHandle,
        colors: &[[f32; 3]],
        opacities: &[f32],
    ) {
        let paint = |slot: &mut [f32; 4], i: usize| {
            if let Some(c) = colors.get(i) {
                slot[..3].copy_from_slice(c);
            }
            if let Some(o) = opacities.get(i) {
                slot[3] = *o;
            }
        };
        match self.mesh_data_mut(mesh) {
            Some(MeshData::Spheres { staged, .. }) => {
                for (i, s) in staged.iter_mut().enumerate() {
                    paint(&mut s.color, i);
                }
            }
            Some(MeshData::Segments { staged, .. }) => {
                for (i, s) in staged.iter_mut().enumerate() {
                    paint(&mut s.color, i);
                }
            }
            Some(MeshData::Pick { .. }) | None => return,
        }
        self.upload(mesh);
    }

    fn set_instance_count(&mut self, mesh: MeshHandle, count: usize) {
        if let Some(m) = self.meshes.get_mut(mesh.0 as usize) {
            let capacity = match &m.data {
                MeshData::Spheres { staged, .. } => staged.len(),
                MeshData::Segments { staged, .. } => staged.len(),
                MeshData::Pick { ids, .. } => ids.count(),
            };
            m.count = count.min(capacity);
        }
    }

    fn set_visible(&mut self, mesh: MeshHandle, visible: bool) {
        if let Some(m) = self.meshes.get_mut(mesh.0 as usize) {
            m.visible = visible;
        }
    }

    fn read_pick_pixel(
        &mut self,
        meshes: &[MeshHandle],
        view: &PickView,
    ) -> [u8; 4] {
        let mut uniform = CameraUniform::new();
        uniform.view_proj = view.view_proj.to_cols_array_2d();
        uniform.position = view.eye.to_array();
        uniform.aspect = 1.0;
        uniform.right = view.right.to_array();
        uniform.up = view.up.to_array();
        self.context.queue.write_buffer(
            &self.pick_camera_buffer,
            0,
            bytemuck::bytes_of(&uniform),
        );

        let mut encoder = self.context.create_encoder("Pick Encoder");
        self.encode_pick(&mut encoder, meshes);
        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                texture: &self.pick.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &self.pick.staging,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(256),
                    rows_per_image: Some(1),
                },
            },
            wgpu::Extent3d {
                width: 1,
                height: 1,
                depth_or_array_layers: 1,
            },
        );
        self.context.submit(encoder);

        let mapped = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&mapped);
        let slice = self.pick.staging.slice(..4);
        slice.map_async(wgpu::MapMode::Read, move |result| {
            if result.is_ok() {
                flag.store(true, Ordering::SeqCst);
            }
        });
        if let Err(e) = self.context.device.poll(wgpu::PollType::Wait) {
            log::warn!("pick readback poll failed: {e}");
        }
        if !mapped.load(Ordering::SeqCst) {
            log::warn!("pick readback did not map");
            return [0; 4];
        }
        let pixel = {
            let data = slice.get_mapped_range();
            [data[0], data[1], data[2], data[3]]
        };
        self.pick.staging.unmap();
        pixel
    }

    fn bloom_strength(&self) -> f32 {
        self.bloom
    }

    fn set_bloom_strength(&mut self, strength: f32) {
        self.bloom = strength;
    }

    fn set_camera(&mut self, camera: &Camera) {
        self.update_camera(camera);
    }
}

struct PipelineSpec<'a> {
    label: &'a str,
    module: &'a wgpu::ShaderModule,
    vs: &'a str,
    fs: &'a str,
    layouts: &'a [&'a wgpu::BindGroupLayout],
    format: wgpu::TextureFormat,
    blend: Option<wgpu::BlendState>,
    topology: wgpu::PrimitiveTopology,
    depth_write: bool,
}

fn pipeline(device: &wgpu::Device, desc: &PipelineSpec<'_>) -> wgpu::RenderPipeline {
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(desc.label),
        bind_group_layouts: desc.layouts,
        push_constant_ranges: &[],
    });
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(desc.label),
        layout: Some(&layout),
        vertex: wgpu::VertexState {
            module: desc.module,
            entry_point: Some(desc.vs),
            buffers: &[],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: desc.module,
            entry_point: Some(desc.fs),
            targets: &[Some(wgpu::ColorTargetState {
                format: desc.format,
                blend: desc.blend,
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: desc.topology,
            cull_mode: None,
            ..Default::default()
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: desc.depth_write,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}

fn camera_binding(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    label: &str,
) -> (wgpu::Buffer, wgpu::BindGroup) {
    let buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size: size_of::<CameraUniform>() as u64,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });
    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(label),
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: buffer.as_entire_binding(),
        }],
    });
    (buffer, bind_group)
}

fn storage_layout(
    device: &wgpu::Device,
    label: &str,
    bindings: u32,
) -> wgpu::BindGroupLayout {
    let entries: Vec<wgpu::BindGroupLayoutEntry> = (0..bindings)
        .map(|binding| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::VERTEX
                | wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Storage { read_only: true },
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        })
        .collect();
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(label),
        entries: &entries,
    })
}

fn single_storage(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    buffer: &wgpu::Buffer,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("Instance Bind Group"),
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: buffer.as_entire_binding(),
        }],
    })
}

fn depth_target(
    device: &wgpu::Device,
    label: &str,
    width: u32,
    height: u32,
) -> DepthTarget {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size: wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    DepthTarget {
        _texture: texture,
        view,
    }
}

fn pick_target(device: &wgpu::Device) -> PickTarget {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Pick Texture"),
        size: wgpu::Extent3d {
            width: 1,
            height: 1,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: PICK_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT
            | wgpu::TextureUsages::COPY_SRC,
        view_formats: &[],
    });
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    let staging = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Pick Staging Buffer"),
        size: 256,
        usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
        mapped_at_creation: false,
    });
    PickTarget {
        texture,
        view,
        depth: depth_target(device, "Pick Depth Texture", 1, 1),
        staging,
    }
}
