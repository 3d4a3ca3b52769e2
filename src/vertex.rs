//! # Vertex
//!
//! Vertex format and geometry for the spinning box. Each vertex carries a position and a flat face
//! normal; the normal is what the shader runs through `normal_matrix` for lighting.
//!
//! ## Layout
//!
//! | Location | Attribute  | Format      | Offset |
//! |----------|------------|-------------|--------|
//! | 0        | `position` | `Float32x3` | 0      |
//! | 1        | `normal`   | `Float32x3` | 12     |

/// A single box vertex as laid out in the vertex buffer.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],

    pub normal: [f32; 3],
}

impl Vertex {
    pub fn vertex_attributes() -> Vec<wgpu::VertexAttribute> {
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3].to_vec()
    }

    pub fn description(attributes: &[wgpu::VertexAttribute]) -> wgpu::VertexBufferLayout {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes,
        }
    }
}

/// Outward normal and two in-plane axes for each box face, with `u x v == normal`.
const FACES: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
    ([1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]),
    ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
    ([0.0, 1.0, 0.0], [0.0, 0.0, 1.0], [1.0, 0.0, 0.0]),
    ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
    ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
    ([0.0, 0.0, -1.0], [0.0, 1.0, 0.0], [1.0, 0.0, 0.0]),
];

/// Indexed triangle geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,

    pub indices: Vec<u32>,
}

impl Mesh {
    /// An axis-aligned box centered at the origin with four vertices per face, so every face keeps
    /// its own flat normal. Seen from outside through the left-handed camera, triangles wind
    /// clockwise on screen.
    pub fn cube(half_extent: f32) -> Self {
        let mut vertices = Vec::with_capacity(FACES.len() * 4);
        let mut indices = Vec::with_capacity(FACES.len() * 6);

        for (normal, u, v) in FACES {
            let base = vertices.len() as u32;
            // Corners (-u,-v), (+u,-v), (+u,+v), (-u,+v).
            for (su, sv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
                let position = std::array::from_fn(|axis| {
                    (normal[axis] + su * u[axis] + sv * v[axis]) * half_extent
                });
                vertices.push(Vertex { position, normal });
            }
            indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }

        Self { vertices, indices }
    }
}
