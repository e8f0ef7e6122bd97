use crate::shaders;
use bytemuck::{Pod, Zeroable};
use eduverse_scene::mesh::{MeshData, Topology, tessellate};
use eduverse_scene::{Blend, Light, NodeKind, OrbitCamera, SceneGraph, Shading};
use glam::{Mat4, Vec3};
use wgpu::util::DeviceExt;

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Uniforms {
    view_proj: [[f32; 4]; 4],
    stars_model: [[f32; 4]; 4],
    light_dir: [f32; 4],
    light_color: [f32; 4],
    ambient: [f32; 4],
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
struct Vertex {
    position: [f32; 3],
    /// xyz: world normal, w: 1.0 when lit.
    normal: [f32; 4],
    color: [f32; 4],
}

/// CPU-side vertex and index lists for one pipeline.
#[derive(Debug, Default)]
struct BatchData {
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
}

impl BatchData {
    /// Append `mesh` transformed into world space by `model`.
    fn append(&mut self, mesh: &MeshData, model: Mat4, color: [f32; 4], lit: bool) {
        let base = self.vertices.len() as u32;
        let w = if lit { 1.0 } else { 0.0 };
        for (p, n) in mesh.positions.iter().zip(&mesh.normals) {
            let n = model.transform_vector3(*n).normalize_or_zero();
            self.vertices.push(Vertex {
                position: model.transform_point3(*p).to_array(),
                normal: [n.x, n.y, n.z, w],
                color,
            });
        }
        self.indices.extend(mesh.indices.iter().map(|i| base + i));
    }

    fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Scene geometry sorted by how it is drawn.
#[derive(Debug, Default)]
struct SceneBatches {
    lit: BatchData,
    glow: BatchData,
    lines: BatchData,
    /// Star points stay in the starfield's local space; the model matrix is
    /// a uniform so spinning never touches the buffer.
    stars: BatchData,
}

fn collect_batches(scene: &SceneGraph) -> SceneBatches {
    let mut batches = SceneBatches::default();
    for (id, node) in scene.nodes() {
        match &node.kind {
            NodeKind::Mesh { geometry, material } => {
                let mesh = tessellate(geometry);
                let color = material.color.to_rgba(material.opacity);
                let lit = material.shading == Shading::Phong;
                let target = match (mesh.topology, material.blend) {
                    (Topology::Lines, _) => &mut batches.lines,
                    (Topology::Triangles, Blend::Additive) => &mut batches.glow,
                    (Topology::Triangles, Blend::Alpha) => &mut batches.lit,
                };
                target.append(&mesh, scene.world_matrix(id), color, lit);
            }
            NodeKind::Starfield(stars) => {
                let color = stars.color.to_rgba(1.0);
                for p in &stars.points {
                    let index = batches.stars.vertices.len() as u32;
                    batches.stars.vertices.push(Vertex {
                        position: p.to_array(),
                        normal: [0.0, 1.0, 0.0, 0.0],
                        color,
                    });
                    batches.stars.indices.push(index);
                }
            }
            NodeKind::Light(_) => {}
        }
    }
    batches
}

fn frame_uniforms(scene: &SceneGraph, camera: &OrbitCamera) -> Uniforms {
    let mut ambient = Vec3::ZERO;
    let mut light_dir = Vec3::Y;
    let mut light_color = Vec3::ZERO;
    for light in scene.lights() {
        match *light {
            Light::Ambient { color, intensity } => {
                ambient += Vec3::from_slice(&color.to_rgba(1.0)[..3]) * intensity;
            }
            Light::Directional {
                color,
                intensity,
                position,
            } => {
                light_dir = position.normalize_or(Vec3::Y);
                light_color = Vec3::from_slice(&color.to_rgba(1.0)[..3]) * intensity;
            }
        }
    }

    let stars_model = scene
        .nodes()
        .find(|(_, n)| matches!(n.kind, NodeKind::Starfield(_)))
        .map(|(id, _)| scene.world_matrix(id))
        .unwrap_or(Mat4::IDENTITY);

    Uniforms {
        view_proj: camera.view_projection().to_cols_array_2d(),
        stars_model: stars_model.to_cols_array_2d(),
        light_dir: light_dir.extend(0.0).to_array(),
        light_color: light_color.extend(1.0).to_array(),
        ambient: ambient.extend(1.0).to_array(),
    }
}

/// Uploaded vertex and index buffers. Destroyed on drop.
struct GpuBatch {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

impl GpuBatch {
    fn upload(device: &wgpu::Device, label: &str, data: &BatchData) -> Option<Self> {
        if data.is_empty() {
            return None;
        }
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label}_vertex_buffer")),
            contents: bytemuck::cast_slice(&data.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label}_index_buffer")),
            contents: bytemuck::cast_slice(&data.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        Some(Self {
            vertex_buffer,
            index_buffer,
            index_count: data.indices.len() as u32,
        })
    }
}

impl Drop for GpuBatch {
    fn drop(&mut self) {
        self.vertex_buffer.destroy();
        self.index_buffer.destroy();
    }
}

#[derive(Default)]
struct GpuBatches {
    lit: Option<GpuBatch>,
    glow: Option<GpuBatch>,
    lines: Option<GpuBatch>,
    stars: Option<GpuBatch>,
}

struct PipelineDesc {
    label: &'static str,
    vs_entry: &'static str,
    topology: wgpu::PrimitiveTopology,
    blend: wgpu::BlendState,
    depth_write: bool,
    cull_mode: Option<wgpu::Face>,
}

const ADDITIVE: wgpu::BlendState = wgpu::BlendState {
    color: wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::SrcAlpha,
        dst_factor: wgpu::BlendFactor::One,
        operation: wgpu::BlendOperation::Add,
    },
    alpha: wgpu::BlendComponent::OVER,
};

fn create_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    format: wgpu::TextureFormat,
    desc: PipelineDesc,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(desc.label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some(desc.vs_entry),
            compilation_options: Default::default(),
            buffers: &[wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<Vertex>() as u64,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &wgpu::vertex_attr_array![
                    0 => Float32x3,
                    1 => Float32x4,
                    2 => Float32x4,
                ],
            }],
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(desc.blend),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        primitive: wgpu::PrimitiveState {
            topology: desc.topology,
            cull_mode: desc.cull_mode,
            ..Default::default()
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: wgpu::TextureFormat::Depth32Float,
            depth_write_enabled: desc.depth_write,
            depth_compare: wgpu::CompareFunction::LessEqual,
            stencil: Default::default(),
            bias: Default::default(),
        }),
        multisample: Default::default(),
        multiview: None,
        cache: None,
    })
}

/// wgpu-based scene renderer.
pub struct WgpuRenderer {
    lit_pipeline: wgpu::RenderPipeline,
    glow_pipeline: wgpu::RenderPipeline,
    line_pipeline: wgpu::RenderPipeline,
    star_pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    batches: GpuBatches,
    /// Scene revision the batches were built from.
    revision: Option<u64>,
    depth_texture: wgpu::TextureView,
    surface_format: wgpu::TextureFormat,
}

impl WgpuRenderer {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
    ) -> Self {
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("uniform_buffer"),
            contents: bytemuck::bytes_of(&Uniforms::zeroed()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("uniform_bind_group_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("uniform_bind_group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("scene_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::SCENE_SHADER.into()),
        });

        let lit_pipeline = create_pipeline(
            device,
            &layout,
            &shader,
            surface_format,
            PipelineDesc {
                label: "lit_pipeline",
                vs_entry: "vs_main",
                topology: wgpu::PrimitiveTopology::TriangleList,
                blend: wgpu::BlendState::ALPHA_BLENDING,
                depth_write: true,
                cull_mode: Some(wgpu::Face::Back),
            },
        );
        let glow_pipeline = create_pipeline(
            device,
            &layout,
            &shader,
            surface_format,
            PipelineDesc {
                label: "glow_pipeline",
                vs_entry: "vs_main",
                topology: wgpu::PrimitiveTopology::TriangleList,
                blend: ADDITIVE,
                depth_write: false,
                cull_mode: Some(wgpu::Face::Back),
            },
        );
        let line_pipeline = create_pipeline(
            device,
            &layout,
            &shader,
            surface_format,
            PipelineDesc {
                label: "line_pipeline",
                vs_entry: "vs_main",
                topology: wgpu::PrimitiveTopology::LineList,
                blend: wgpu::BlendState::ALPHA_BLENDING,
                depth_write: false,
                cull_mode: None,
            },
        );
        let star_pipeline = create_pipeline(
            device,
            &layout,
            &shader,
            surface_format,
            PipelineDesc {
                label: "star_pipeline",
                vs_entry: "vs_stars",
                topology: wgpu::PrimitiveTopology::PointList,
                blend: wgpu::BlendState::REPLACE,
                depth_write: true,
                cull_mode: None,
            },
        );

        let depth_texture = Self::create_depth_texture(device, width, height);

        Self {
            lit_pipeline,
            glow_pipeline,
            line_pipeline,
            star_pipeline,
            uniform_buffer,
            uniform_bind_group,
            batches: GpuBatches::default(),
            revision: None,
            depth_texture,
            surface_format,
        }
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.depth_texture = Self::create_depth_texture(device, width, height);
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.surface_format
    }

    /// Render one frame of `scene` as seen from `camera`.
    pub fn render(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        view: &wgpu::TextureView,
        scene: &SceneGraph,
        camera: &OrbitCamera,
    ) {
        if self.revision != Some(scene.revision()) {
            self.rebuild(device, scene);
        }

        queue.write_buffer(
            &self.uniform_buffer,
            0,
            bytemuck::bytes_of(&frame_uniforms(scene, camera)),
        );

        let [r, g, b, a] = scene.background().to_rgba(1.0);
        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("render_encoder"),
        });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("main_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: r as f64,
                            g: g as f64,
                            b: b as f64,
                            a: a as f64,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });

            pass.set_bind_group(0, &self.uniform_bind_group, &[]);
            // Opaque-ish first, additive last so glows blend over everything.
            draw_batch(&mut pass, &self.star_pipeline, self.batches.stars.as_ref());
            draw_batch(&mut pass, &self.lit_pipeline, self.batches.lit.as_ref());
            draw_batch(&mut pass, &self.line_pipeline, self.batches.lines.as_ref());
            draw_batch(&mut pass, &self.glow_pipeline, self.batches.glow.as_ref());
        }

        queue.submit(std::iter::once(encoder.finish()));
    }

    fn rebuild(&mut self, device: &wgpu::Device, scene: &SceneGraph) {
        let _span = tracing::info_span!("rebuild_batches", revision = scene.revision()).entered();
        let data = collect_batches(scene);
        // Old buffers are destroyed as the previous batches drop here.
        self.batches = GpuBatches {
            lit: GpuBatch::upload(device, "lit", &data.lit),
            glow: GpuBatch::upload(device, "glow", &data.glow),
            lines: GpuBatch::upload(device, "lines", &data.lines),
            stars: GpuBatch::upload(device, "stars", &data.stars),
        };
        self.revision = Some(scene.revision());
        tracing::debug!(
            lit = data.lit.vertices.len(),
            glow = data.glow.vertices.len(),
            lines = data.lines.vertices.len(),
            stars = data.stars.vertices.len(),
            "scene buffers rebuilt"
        );
    }

    fn create_depth_texture(
        device: &wgpu::Device,
        width: u32,
        height: u32,
    ) -> wgpu::TextureView {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("depth_texture"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Depth32Float,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&Default::default())
    }
}

fn draw_batch(
    pass: &mut wgpu::RenderPass<'_>,
    pipeline: &wgpu::RenderPipeline,
    batch: Option<&GpuBatch>,
) {
    let Some(batch) = batch else {
        return;
    };
    pass.set_pipeline(pipeline);
    pass.set_vertex_buffer(0, batch.vertex_buffer.slice(..));
    pass.set_index_buffer(batch.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
    pass.draw_indexed(0..batch.index_count, 0, 0..1);
}

#[cfg(test)]
mod tests {
    use super::*;
    use eduverse_kernel::{WorldBuilder, card};
    use eduverse_scene::{SceneViewer, ViewerConfig};

    fn viewer_with_card(id: u32) -> SceneViewer {
        let mut viewer = SceneViewer::new(ViewerConfig {
            star_count: 25,
            ..ViewerConfig::default()
        });
        let world = WorldBuilder::new().from_card(card(id).unwrap()).unwrap();
        viewer.show_world(world);
        viewer
    }

    #[test]
    fn empty_scene_has_only_stars() {
        let viewer = SceneViewer::new(ViewerConfig {
            star_count: 25,
            ..ViewerConfig::default()
        });
        let batches = collect_batches(viewer.graph());
        assert!(batches.lit.is_empty());
        assert!(batches.glow.is_empty());
        assert!(batches.lines.is_empty());
        assert_eq!(batches.stars.vertices.len(), 25);
    }

    #[test]
    fn solar_card_routes_meshes_by_blend_and_topology() {
        let viewer = viewer_with_card(1);
        let batches = collect_batches(viewer.graph());
        assert!(!batches.lit.is_empty());
        assert_eq!(batches.lit.vertices.len(), batches.glow.vertices.len());
        // Three rings drawn as closed line loops.
        assert_eq!(batches.lines.indices.len() % 2, 0);
        assert!(!batches.lines.is_empty());
        assert!(batches.lit.vertices.iter().all(|v| v.normal[3] == 1.0));
        assert!(batches.glow.vertices.iter().all(|v| v.normal[3] == 0.0));
    }

    #[test]
    fn indices_stay_in_range() {
        let viewer = viewer_with_card(3);
        let batches = collect_batches(viewer.graph());
        for batch in [&batches.lit, &batches.glow, &batches.lines, &batches.stars] {
            let n = batch.vertices.len() as u32;
            assert!(batch.indices.iter().all(|&i| i < n));
        }
    }

    #[test]
    fn glow_vertices_sit_outside_body() {
        let viewer = viewer_with_card(2);
        let batches = collect_batches(viewer.graph());
        let reach = |b: &BatchData| {
            b.vertices
                .iter()
                .map(|v| Vec3::from(v.position).length())
                .fold(0.0_f32, f32::max)
        };
        assert!(reach(&batches.glow) > reach(&batches.lit));
    }

    #[test]
    fn uniforms_carry_scene_lights() {
        let viewer = SceneViewer::new(ViewerConfig::default());
        let u = frame_uniforms(viewer.graph(), viewer.camera());
        let expected_ambient = 64.0 / 255.0 * 0.6;
        assert!((u.ambient[0] - expected_ambient).abs() < 1e-5);
        assert_eq!(u.light_color[..3], [1.0, 1.0, 1.0]);
        let dir = Vec3::from_slice(&u.light_dir[..3]);
        assert!((dir - Vec3::new(10.0, 10.0, 5.0).normalize()).length() < 1e-5);
    }

    #[test]
    fn star_rotation_goes_through_uniform() {
        let mut viewer = SceneViewer::new(ViewerConfig::default());
        let before = frame_uniforms(viewer.graph(), viewer.camera()).stars_model;
        viewer.frame(1.0);
        let after = frame_uniforms(viewer.graph(), viewer.camera()).stars_model;
        assert_ne!(before, after);
    }
}
