//! # Uniform Binding
//!
//! This module defines `UniformBinding`, the GPU side of the `Uniforms` block. The host may record a
//! new frame while the GPU is still reading the previous ones, so a single uniform slot would be
//! overwritten in use. Instead one buffer holds a ring of slots, one per frame in flight, and each
//! frame binds its own slot through a dynamic offset.
//!
//! ## Buffer Layout
//!
//! ```text
//! | slot 0 | pad | slot 1 | pad | slot 2 | pad |
//! |<---- stride ->|
//! ```
//!
//! Each slot holds exactly `Uniforms::SIZE` bytes. The stride is that size rounded up to the device's
//! `min_uniform_buffer_offset_alignment` (256 bytes on most adapters), because dynamic offsets must be
//! multiples of it.
//!
//! ## Example
//!
//! ```rust,ignore
//! let mut binding = UniformBinding::new(&device, 3);
//! let offset = binding.write(&queue, frame_index, &uniforms);
//! render_pass.set_bind_group(0, &binding.bind_group, &[offset]);
//! ```

use std::num::NonZeroU64;

use crate::uniforms::Uniforms;

/// Ring of uniform slots plus the bind group exposing it to the box shader.
pub struct UniformBinding {
    /// Backing buffer with `frames_in_flight` slots.
    pub buffer: wgpu::Buffer,

    /// Binds one slot-sized window of `buffer` at binding 0; the window moves with the dynamic offset.
    pub bind_group: wgpu::BindGroup,

    pub bind_group_layout: wgpu::BindGroupLayout,

    ring: UniformRing,
}

impl UniformBinding {
    pub fn new(device: &wgpu::Device, frames_in_flight: usize) -> Self {
        let alignment = device.limits().min_uniform_buffer_offset_alignment;
        let ring = UniformRing::new(frames_in_flight, alignment);
        log::debug!(
            "Uniform ring: {} slots, stride {} bytes",
            ring.frames_in_flight(),
            ring.stride()
        );

        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Uniform Ring Buffer"),
            size: ring.buffer_size(),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: NonZeroU64::new(Uniforms::SIZE as u64),
                },
                count: None,
            }],
            label: Some("uniform_bind_group_layout"),
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &buffer,
                    offset: 0,
                    size: NonZeroU64::new(Uniforms::SIZE as u64),
                }),
            }],
            label: Some("uniform_bind_group"),
        });

        Self {
            buffer,
            bind_group,
            bind_group_layout,
            ring,
        }
    }

    /// Writes `uniforms` into the slot owned by `frame_index` and returns the dynamic offset to bind.
    pub fn write(&mut self, queue: &wgpu::Queue, frame_index: u64, uniforms: &Uniforms) -> u32 {
        let offset = self.ring.slot_offset(frame_index);
        queue.write_buffer(&self.buffer, offset, uniforms.as_bytes());
        offset as u32
    }
}

/// Slot arithmetic for the uniform ring, kept apart from the GPU objects.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct UniformRing {
    frames_in_flight: usize,
    stride: wgpu::BufferAddress,
}

impl UniformRing {
    /// A `frames_in_flight` of zero is clamped to one slot.
    pub fn new(frames_in_flight: usize, offset_alignment: u32) -> Self {
        Self {
            frames_in_flight: frames_in_flight.max(1),
            stride: aligned_stride(Uniforms::SIZE as u64, offset_alignment as u64),
        }
    }

    pub fn frames_in_flight(&self) -> usize {
        self.frames_in_flight
    }

    /// Distance in bytes between consecutive slots.
    pub fn stride(&self) -> wgpu::BufferAddress {
        self.stride
    }

    pub fn buffer_size(&self) -> wgpu::BufferAddress {
        self.stride * self.frames_in_flight as u64
    }

    /// Byte offset of the slot used by `frame_index`.
    pub fn slot_offset(&self, frame_index: u64) -> wgpu::BufferAddress {
        (frame_index % self.frames_in_flight as u64) * self.stride
    }
}

/// Rounds `size` up to the next multiple of `alignment`. An alignment of 0 or 1 leaves it unchanged.
pub fn aligned_stride(size: u64, alignment: u64) -> u64 {
    if alignment <= 1 {
        return size;
    }
    size.div_ceil(alignment) * alignment
}
