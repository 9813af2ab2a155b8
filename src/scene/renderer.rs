//! Plane renderer
//!
//! Draws the animated plane mesh with depth testing into the window surface.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use wgpu::util::DeviceExt;

use super::camera::OrbitCamera;
use super::vertex::{build_vertices, PlaneVertex};
use crate::plane::MeshAnimator;

pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Key light, shining from below and in front
const KEY_LIGHT: Vec3 = Vec3::new(0.0, -1.0, 1.0);
/// Back light, shining from behind the plane
const BACK_LIGHT: Vec3 = Vec3::new(0.0, 0.0, -1.0);

/// Camera and light uniform buffer data
#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct SceneUniforms {
    view_proj: [[f32; 4]; 4],
    camera_pos: [f32; 4],
    key_light: [f32; 4],
    back_light: [f32; 4],
}

impl SceneUniforms {
    fn new(camera: &OrbitCamera) -> Self {
        Self {
            view_proj: camera.view_projection_matrix().to_cols_array_2d(),
            camera_pos: camera.eye_position().extend(1.0).to_array(),
            key_light: KEY_LIGHT.normalize().extend(1.0).to_array(),
            back_light: BACK_LIGHT.extend(1.0).to_array(),
        }
    }
}

/// GPU mesh buffers for one mesh generation
struct MeshBuffers {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    generation: u64,
}

impl MeshBuffers {
    fn destroy(self) {
        self.vertex_buffer.destroy();
        self.index_buffer.destroy();
    }
}

/// GPU renderer for the plane
pub struct PlaneRenderer {
    pipeline: wgpu::RenderPipeline,
    bind_group: wgpu::BindGroup,
    uniform_buffer: wgpu::Buffer,

    // Recreated when the mesh generation changes
    mesh: Option<MeshBuffers>,
    // Reused staging storage for interleaved vertices
    staging: Vec<PlaneVertex>,

    depth_view: wgpu::TextureView,
    depth_texture: wgpu::Texture,
    width: u32,
    height: u32,
}

impl PlaneRenderer {
    /// Create a new plane renderer targeting `format`
    pub fn new(device: &wgpu::Device, format: wgpu::TextureFormat, width: u32, height: u32) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Plane Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../shaders/plane.wgsl").into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Plane Bind Group Layout"),
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

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Plane Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Plane Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[PlaneVertex::buffer_layout()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                // Double-sided
                cull_mode: None,
                unclipped_depth: false,
                polygon_mode: wgpu::PolygonMode::Fill,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Plane Uniform Buffer"),
            size: std::mem::size_of::<SceneUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Plane Bind Group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let width = width.max(1);
        let height = height.max(1);
        let depth_texture = create_depth_texture(device, width, height);
        let depth_view = depth_texture.create_view(&Default::default());

        Self {
            pipeline,
            bind_group,
            uniform_buffer,
            mesh: None,
            staging: Vec::new(),
            depth_view,
            depth_texture,
            width,
            height,
        }
    }

    /// Recreate the depth buffer for a new surface size
    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        let width = width.max(1);
        let height = height.max(1);
        if self.width == width && self.height == height {
            return;
        }

        self.depth_texture.destroy();
        self.depth_texture = create_depth_texture(device, width, height);
        self.depth_view = self.depth_texture.create_view(&Default::default());
        self.width = width;
        self.height = height;
    }

    /// Upload camera uniforms and any changed mesh data
    pub fn prepare(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        animator: &mut MeshAnimator,
        camera: &OrbitCamera,
    ) {
        let generation = animator.generation();
        let stale = self
            .mesh
            .as_ref()
            .map_or(true, |mesh| mesh.generation != generation);

        if stale {
            // Release the previous generation's buffers before allocating new ones
            if let Some(old) = self.mesh.take() {
                old.destroy();
            }
            self.mesh = Some(self.create_mesh_buffers(device, animator));
            tracing::debug!(
                generation,
                vertices = animator.vertex_count(),
                "Reallocated plane buffers"
            );
        } else if animator.is_dirty() {
            if let Some(mesh) = &self.mesh {
                build_vertices(animator.positions(), animator.colors(), &mut self.staging);
                queue.write_buffer(&mesh.vertex_buffer, 0, bytemuck::cast_slice(&self.staging));
            }
        }
        animator.mark_uploaded();

        let uniforms = SceneUniforms::new(camera);
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&uniforms));
    }

    fn create_mesh_buffers(&mut self, device: &wgpu::Device, animator: &MeshAnimator) -> MeshBuffers {
        build_vertices(animator.positions(), animator.colors(), &mut self.staging);

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Plane Vertex Buffer"),
            contents: bytemuck::cast_slice(&self.staging),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Plane Index Buffer"),
            contents: bytemuck::cast_slice(animator.indices()),
            usage: wgpu::BufferUsages::INDEX,
        });

        MeshBuffers {
            vertex_buffer,
            index_buffer,
            index_count: animator.indices().len() as u32,
            generation: animator.generation(),
        }
    }

    /// Render the plane into `target`, clearing it to black
    pub fn render(&self, encoder: &mut wgpu::CommandEncoder, target: &wgpu::TextureView) {
        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Plane Render Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Discard,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        let Some(mesh) = &self.mesh else {
            return;
        };

        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, &self.bind_group, &[]);
        render_pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
        render_pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        render_pass.draw_indexed(0..mesh.index_count, 0, 0..1);
    }
}

fn create_depth_texture(device: &wgpu::Device, width: u32, height: u32) -> wgpu::Texture {
    device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Plane Depth Texture"),
        size: wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_layout() {
        assert_eq!(std::mem::size_of::<SceneUniforms>(), 112);
    }

    #[test]
    fn test_uniform_lights() {
        let uniforms = SceneUniforms::new(&OrbitCamera::default());
        let key = Vec3::from_slice(&uniforms.key_light[..3]);
        assert!((key.length() - 1.0).abs() < 1e-5);
        assert!(key.y < 0.0 && key.z > 0.0);
        assert_eq!(uniforms.back_light, [0.0, 0.0, -1.0, 1.0]);
        assert!((uniforms.camera_pos[2] - 50.0).abs() < 1e-4);
    }
}
