//! GPU-side resources for the demo scene: a spinning, flat-colored cube.

use super::graphic_context::GraphicsContext;
use crate::core::handlers::Viewport;
use crate::math::{degrees_to_radians, Mat4, Vec3};
use anyhow::Result;
use std::mem;
use std::sync::Arc;
use wgpu::util::DeviceExt;

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct Vertex {
    position: [f32; 3],
    color: [f32; 3],
}

impl Vertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];

    fn buffer_layout<'a>() -> wgpu::VertexBufferLayout<'a> {
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<Vertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Uniform block shared with `shaders/cube.wgsl`.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct SceneUniforms {
    mvp: [[f32; 4]; 4],
}

const fn vertex(position: [f32; 3], color: [f32; 3]) -> Vertex {
    Vertex { position, color }
}

// 24 vertices: 4 per face, each face a solid color.
const CUBE_VERTICES: &[Vertex] = &[
    // Front face (+Z), red
    vertex([-0.5, -0.5, 0.5], [1.0, 0.0, 0.0]),
    vertex([0.5, -0.5, 0.5], [1.0, 0.0, 0.0]),
    vertex([0.5, 0.5, 0.5], [1.0, 0.0, 0.0]),
    vertex([-0.5, 0.5, 0.5], [1.0, 0.0, 0.0]),
    // Back face (-Z), green
    vertex([0.5, -0.5, -0.5], [0.0, 1.0, 0.0]),
    vertex([-0.5, -0.5, -0.5], [0.0, 1.0, 0.0]),
    vertex([-0.5, 0.5, -0.5], [0.0, 1.0, 0.0]),
    vertex([0.5, 0.5, -0.5], [0.0, 1.0, 0.0]),
    // Right face (+X), blue
    vertex([0.5, -0.5, 0.5], [0.0, 0.0, 1.0]),
    vertex([0.5, -0.5, -0.5], [0.0, 0.0, 1.0]),
    vertex([0.5, 0.5, -0.5], [0.0, 0.0, 1.0]),
    vertex([0.5, 0.5, 0.5], [0.0, 0.0, 1.0]),
    // Left face (-X), yellow
    vertex([-0.5, -0.5, -0.5], [1.0, 1.0, 0.0]),
    vertex([-0.5, -0.5, 0.5], [1.0, 1.0, 0.0]),
    vertex([-0.5, 0.5, 0.5], [1.0, 1.0, 0.0]),
    vertex([-0.5, 0.5, -0.5], [1.0, 1.0, 0.0]),
    // Top face (+Y), cyan
    vertex([-0.5, 0.5, 0.5], [0.0, 1.0, 1.0]),
    vertex([0.5, 0.5, 0.5], [0.0, 1.0, 1.0]),
    vertex([0.5, 0.5, -0.5], [0.0, 1.0, 1.0]),
    vertex([-0.5, 0.5, -0.5], [0.0, 1.0, 1.0]),
    // Bottom face (-Y), magenta
    vertex([-0.5, -0.5, -0.5], [1.0, 0.0, 1.0]),
    vertex([0.5, -0.5, -0.5], [1.0, 0.0, 1.0]),
    vertex([0.5, -0.5, 0.5], [1.0, 0.0, 1.0]),
    vertex([-0.5, -0.5, 0.5], [1.0, 0.0, 1.0]),
];

// Two triangles per face.
const CUBE_INDICES: &[u16] = &[
    0, 1, 2, 0, 2, 3, // front
    4, 5, 6, 4, 6, 7, // back
    8, 9, 10, 8, 10, 11, // right
    12, 13, 14, 12, 14, 15, // left
    16, 17, 18, 16, 18, 19, // top
    20, 21, 22, 20, 22, 23, // bottom
];

/// The demo scene: pipeline, geometry buffers and the per-frame MVP uniform.
///
/// The cube is convex and drawn with back-face culling, so no depth buffer is
/// required.
#[derive(Debug)]
pub struct CubeScene {
    render_pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    index_count: u32,
    viewport: Arc<Viewport>,
    rotation: f32,
}

impl CubeScene {
    /// Allocates all GPU resources for the cube.
    ///
    /// Creation runs inside a validation error scope so that backend-reported
    /// resource failures surface as a startup error instead of a delayed
    /// device loss.
    pub fn new(graphics: &GraphicsContext, viewport: Arc<Viewport>) -> Result<Self> {
        log::info!("Creating cube scene resources...");
        let device = graphics.device();
        device.push_error_scope(wgpu::ErrorFilter::Validation);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Cube Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/cube.wgsl").into()),
        });

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Cube Vertex Buffer"),
            contents: bytemuck::cast_slice(CUBE_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Cube Index Buffer"),
            contents: bytemuck::cast_slice(CUBE_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        });

        let uniforms = SceneUniforms {
            mvp: Mat4::IDENTITY.to_cols_array_2d(),
        };
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Cube Uniform Buffer"),
            contents: bytemuck::bytes_of(&uniforms),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Cube Bind Group Layout"),
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

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Cube Bind Group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Cube Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let render_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Cube Render Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[Vertex::buffer_layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: graphics.surface_configuration().format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: Some(wgpu::Face::Back),
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        if let Some(error) = pollster::block_on(device.pop_error_scope()) {
            anyhow::bail!("cube resource creation failed: {error}");
        }

        log::info!(
            "Cube scene created: {} vertices, {} indices.",
            CUBE_VERTICES.len(),
            CUBE_INDICES.len()
        );

        Ok(Self {
            render_pipeline,
            vertex_buffer,
            index_buffer,
            uniform_buffer,
            uniform_bind_group,
            index_count: CUBE_INDICES.len() as u32,
            viewport,
            rotation: 0.0,
        })
    }

    /// Steps the cube rotation to match `elapsed_seconds` since engine start.
    pub fn advance(&mut self, elapsed_seconds: f32) {
        self.rotation = elapsed_seconds;
    }

    /// The combined model-view-projection matrix for the current rotation and
    /// viewport aspect ratio.
    fn mvp(&self) -> Mat4 {
        let model =
            Mat4::from_rotation_y(self.rotation * 0.9) * Mat4::from_rotation_x(self.rotation * 0.45);
        let view = Mat4::look_at_rh(Vec3::new(0.0, 1.2, 3.0), Vec3::ZERO, Vec3::Y);
        let projection = Mat4::perspective_rh_zo(
            degrees_to_radians(45.0),
            self.viewport.aspect_ratio(),
            0.1,
            100.0,
        );
        projection * view * model
    }

    /// Records and submits one frame: clear, then a single indexed draw.
    ///
    /// Surface errors are returned to the caller, which decides between
    /// reconfiguration (`Lost`/`Outdated`) and aborting (`OutOfMemory`).
    pub fn render(&self, graphics: &GraphicsContext) -> Result<(), wgpu::SurfaceError> {
        let uniforms = SceneUniforms {
            mvp: self.mvp().to_cols_array_2d(),
        };
        graphics
            .queue()
            .write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&uniforms));

        let output_frame = graphics.get_current_texture()?;
        let view = output_frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = graphics
            .device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Cube Command Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Cube Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(graphics.clear_color()),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            render_pass.set_pipeline(&self.render_pipeline);
            render_pass.set_bind_group(0, &self.uniform_bind_group, &[]);
            render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
            render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
            render_pass.draw_indexed(0..self.index_count, 0, 0..1);
        }

        graphics.queue().submit(std::iter::once(encoder.finish()));

        // Presentation happens when the acquired frame is dropped.
        drop(output_frame);
        Ok(())
    }
}
