//! # Scene
//!
//! The `Scene` ties the box together: its vertex and index buffers, the uniform ring, the lit render
//! pipeline and the `GameState` driving the spin.
//!
//! ## Frame Flow
//!
//! 1. `update` advances the game state, builds this frame's `Uniforms` from the camera and the box's
//!    model matrix, and writes them into the ring slot owned by the frame.
//! 2. `render` binds that slot through its dynamic offset and draws the box.
//!
//! The block written in step 1 is a throwaway value; only its bytes in the ring survive until the GPU
//! has finished the frame.

use crate::camera::Camera;
use crate::game::GameState;
use crate::gpu::Gpu;
use crate::settings::GameSettings;
use crate::uniform_binding::UniformBinding;
use crate::uniforms::Uniforms;
use crate::vertex::{Mesh, Vertex};
use crate::SHADER_SOURCE;

pub struct Scene {
    pub state: GameState,

    pub camera: Camera,

    pub vertex_buffer: wgpu::Buffer,

    pub index_buffer: wgpu::Buffer,

    pub index_count: u32,

    pub uniform: UniformBinding,

    pub pipeline: wgpu::RenderPipeline,

    /// Frames updated so far; selects the ring slot.
    frame_index: u64,

    /// Dynamic offset of the slot written by the latest `update`.
    uniform_offset: u32,

    /// Block uploaded by the latest `update`, kept for display.
    last_uniforms: Uniforms,
}

impl Scene {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        settings: &GameSettings,
    ) -> Self {
        let mesh = Mesh::cube(settings.box_half_extent);

        let vertex_buffer = wgpu::util::DeviceExt::create_buffer_init(
            device,
            &wgpu::util::BufferInitDescriptor {
                label: Some("Box Vertex Buffer"),
                contents: bytemuck::cast_slice(&mesh.vertices),
                usage: wgpu::BufferUsages::VERTEX,
            },
        );

        let index_buffer = wgpu::util::DeviceExt::create_buffer_init(
            device,
            &wgpu::util::BufferInitDescriptor {
                label: Some("Box Index Buffer"),
                contents: bytemuck::cast_slice(&mesh.indices),
                usage: wgpu::BufferUsages::INDEX,
            },
        );

        let uniform = UniformBinding::new(device, settings.frames_in_flight);

        let pipeline = Self::create_pipeline(device, surface_format, &uniform);

        Self {
            state: GameState::new(settings.rotation_speed),
            camera: settings.camera,
            vertex_buffer,
            index_buffer,
            index_count: mesh.indices.len() as u32,
            uniform,
            pipeline,
            frame_index: 0,
            uniform_offset: 0,
            last_uniforms: Uniforms::identity(),
        }
    }

    pub fn render<'rpass>(&'rpass self, renderpass: &mut wgpu::RenderPass<'rpass>) {
        renderpass.set_pipeline(&self.pipeline);
        renderpass.set_bind_group(0, &self.uniform.bind_group, &[self.uniform_offset]);

        renderpass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        renderpass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);

        renderpass.draw_indexed(0..self.index_count, 0, 0..1);
    }

    pub fn update(&mut self, queue: &wgpu::Queue, aspect_ratio: f32, delta_time: f32) {
        self.state.advance(delta_time);

        let uniforms = self.state.uniforms(&self.camera, aspect_ratio);
        self.uniform_offset = self.uniform.write(queue, self.frame_index, &uniforms);
        self.last_uniforms = uniforms;
        self.frame_index = self.frame_index.wrapping_add(1);
    }

    pub fn last_uniforms(&self) -> &Uniforms {
        &self.last_uniforms
    }

    fn create_pipeline(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        uniform: &UniformBinding,
    ) -> wgpu::RenderPipeline {
        let shader_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Box Shader"),
            source: wgpu::ShaderSource::Wgsl(std::borrow::Cow::Borrowed(SHADER_SOURCE)),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Box Pipeline Layout"),
            bind_group_layouts: &[&uniform.bind_group_layout],
            push_constant_ranges: &[],
        });

        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Box Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader_module,
                entry_point: Some("vertex_main"),
                buffers: &[Vertex::description(&Vertex::vertex_attributes())],
                compilation_options: Default::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Cw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                conservative: false,
                unclipped_depth: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: Gpu::DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader_module,
                entry_point: Some("fragment_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            multiview: None,
            cache: None,
        })
    }
}
