//! # Uniforms
//!
//! This module defines the `Uniforms` struct, the per-draw transform block that the host writes into
//! GPU memory every frame and that the box shader reads back by offset. It carries two matrices:
//!
//! - **Model-view-projection matrix**: maps object-local vertex positions to clip space. It is composed
//!   as `projection * view * model`, so the model transform is applied first.
//! - **Normal matrix**: maps surface normals into view space. Normals do not transform like positions
//!   under non-uniform scaling, so this is the inverse-transpose of the model-view matrix's upper-left
//!   3x3, embedded in a 4x4 with `[0, 0, 0, 1]` as last row and column.
//!
//! ## Memory Layout
//!
//! The WGSL side declares the same block:
//!
//! ```wgsl
//! struct Uniforms {
//!     modelview_projection_matrix: mat4x4<f32>,
//!     normal_matrix: mat4x4<f32>,
//! }
//! ```
//!
//! A `mat4x4<f32>` is four 16-byte aligned `vec4<f32>` columns, 64 bytes total. The host struct matches
//! it exactly:
//!
//! | Field                         | Offset | Size |
//! |-------------------------------|--------|------|
//! | `modelview_projection_matrix` | 0      | 64   |
//! | `normal_matrix`               | 64     | 64   |
//!
//! - `#[repr(C, align(16))]`: fixes field order and the 16-byte column alignment.
//! - `bytemuck::Pod` and `bytemuck::Zeroable`: the struct can be viewed as raw bytes without copying.
//!
//! `nalgebra_glm::Mat4` is column-major, which is also what WGSL expects, so no transposition happens
//! on upload. The size and offsets are checked at compile time below.
//!
//! ## Example
//!
//! ```rust
//! use spinning_box::Uniforms;
//!
//! let model = nalgebra_glm::rotation(0.5, &nalgebra_glm::Vec3::y());
//! let view = nalgebra_glm::translation(&nalgebra_glm::vec3(0.0, 0.0, 5.0));
//! let projection = nalgebra_glm::perspective_lh_zo(16.0 / 9.0, 1.0, 0.1, 100.0);
//!
//! let uniforms = Uniforms::new(&model, &view, &projection);
//! assert_eq!(uniforms.as_bytes().len(), Uniforms::SIZE);
//! ```

use nalgebra_glm::{Mat3, Mat4};

/// The transform block shared by value with the box shader.
///
/// Built fresh each frame, written into the uniform ring, then dropped. Both matrices are always
/// populated together.
#[repr(C, align(16))]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Uniforms {
    /// `projection * view * model`, mapping object space to clip space.
    pub modelview_projection_matrix: Mat4,

    /// Inverse-transpose of the upper-left 3x3 of `view * model`, padded to 4x4.
    pub normal_matrix: Mat4,
}

const _: () = assert!(std::mem::size_of::<Uniforms>() == Uniforms::SIZE);
const _: () = assert!(std::mem::align_of::<Uniforms>() == 16);
const _: () = assert!(std::mem::offset_of!(Uniforms, modelview_projection_matrix) == 0);
const _: () =
    assert!(std::mem::offset_of!(Uniforms, normal_matrix) == Uniforms::NORMAL_MATRIX_OFFSET);

impl Uniforms {
    /// Byte size of the block as seen by the shader.
    pub const SIZE: usize = 128;

    /// Byte offset of `normal_matrix` inside the block.
    pub const NORMAL_MATRIX_OFFSET: usize = 64;

    /// Both matrices set to identity.
    pub fn identity() -> Self {
        Self {
            modelview_projection_matrix: Mat4::identity(),
            normal_matrix: Mat4::identity(),
        }
    }

    /// Composes the block from separate model, view and projection matrices.
    pub fn new(model: &Mat4, view: &Mat4, projection: &Mat4) -> Self {
        Self::from_model_view(&(view * model), projection)
    }

    /// Composes the block from an already multiplied model-view matrix.
    pub fn from_model_view(model_view: &Mat4, projection: &Mat4) -> Self {
        Self {
            modelview_projection_matrix: projection * model_view,
            normal_matrix: normal_matrix(model_view),
        }
    }

    /// The exact bytes uploaded to the GPU.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }
}

impl Default for Uniforms {
    fn default() -> Self {
        Self::identity()
    }
}

/// Returns the inverse-transpose of the upper-left 3x3 of `model_view`, embedded in a 4x4 identity.
///
/// Translation does not affect the result. A singular 3x3 (a collapsed scale axis) has no inverse;
/// the identity is returned so the shader never sees NaNs.
pub fn normal_matrix(model_view: &Mat4) -> Mat4 {
    let upper: Mat3 = nalgebra_glm::mat4_to_mat3(model_view);
    match upper.try_inverse() {
        Some(inverse) => nalgebra_glm::mat3_to_mat4(&inverse.transpose()),
        None => {
            log::trace!("Model-view matrix is singular, using identity normal matrix");
            Mat4::identity()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra_glm as glm;

    fn assert_mat_close(actual: &Mat4, expected: &Mat4) {
        for (a, e) in actual.iter().zip(expected.iter()) {
            assert!((a - e).abs() < 1e-5, "expected {expected}, got {actual}");
        }
    }

    #[test]
    fn layout_matches_shader_block() {
        assert_eq!(std::mem::size_of::<Uniforms>(), 128);
        assert_eq!(std::mem::offset_of!(Uniforms, normal_matrix), 64);
        assert_eq!(std::mem::size_of::<Mat4>(), 16 * std::mem::size_of::<f32>());
    }

    #[test]
    fn each_matrix_holds_sixteen_floats() {
        let uniforms = Uniforms::identity();
        assert_eq!(uniforms.modelview_projection_matrix.shape(), (4, 4));
        assert_eq!(uniforms.normal_matrix.iter().count(), 16);
    }

    #[test]
    fn default_is_identity() {
        let uniforms = Uniforms::default();
        assert_eq!(uniforms.modelview_projection_matrix, Mat4::identity());
        assert_eq!(uniforms.normal_matrix, Mat4::identity());
    }

    #[test]
    fn bytes_are_column_major_in_field_order() {
        let mut mvp = Mat4::zeros();
        mvp[(1, 0)] = 2.0; // row 1, column 0 -> second float of the first column
        let uniforms = Uniforms {
            modelview_projection_matrix: mvp,
            normal_matrix: Mat4::identity(),
        };

        let floats: &[f32] = bytemuck::cast_slice(uniforms.as_bytes());
        assert_eq!(floats.len(), 32);
        assert_eq!(floats[1], 2.0);
        assert_eq!(floats[16], 1.0);
        assert_eq!(floats[16 + 5], 1.0);
        assert_eq!(floats[16 + 1], 0.0);
    }

    #[test]
    fn mvp_is_projection_view_model() {
        let model = glm::translate(
            &glm::rotation(0.7, &glm::vec3(0.0, 1.0, 0.0)),
            &glm::vec3(1.0, -2.0, 0.5),
        );
        let view = glm::look_at_lh(
            &glm::vec3(0.0, 1.0, -4.0),
            &glm::vec3(0.0, 0.0, 0.0),
            &glm::Vec3::y(),
        );
        let projection = glm::perspective_lh_zo(1.5, 1.1, 0.1, 100.0);

        let uniforms = Uniforms::new(&model, &view, &projection);
        assert_mat_close(
            &uniforms.modelview_projection_matrix,
            &(projection * view * model),
        );
    }

    #[test]
    fn normal_matrix_of_rotation_is_the_rotation() {
        let rotation = glm::rotation(1.2, &glm::vec3(1.0, 1.0, 0.0).normalize());
        assert_mat_close(&normal_matrix(&rotation), &rotation);
    }

    #[test]
    fn normal_matrix_inverts_non_uniform_scale() {
        let rotation = glm::rotation(0.4, &glm::vec3(0.0, 0.0, 1.0));
        let model = rotation * glm::scaling(&glm::vec3(2.0, 1.0, 0.5));

        // (R * S)^-T == R * S^-1 for a rotation R and a diagonal scale S.
        let expected = rotation * glm::scaling(&glm::vec3(0.5, 1.0, 2.0));

        let uniforms = Uniforms::new(&model, &Mat4::identity(), &Mat4::identity());
        assert_mat_close(&uniforms.normal_matrix, &expected);
    }

    #[test]
    fn normal_matrix_ignores_translation_and_pads_with_identity() {
        let model =
            glm::translation(&glm::vec3(3.0, 4.0, 5.0)) * glm::scaling(&glm::vec3(4.0, 4.0, 4.0));
        let normal = normal_matrix(&model);

        assert_mat_close(&normal, &glm::scaling(&glm::vec3(0.25, 0.25, 0.25)));
        assert_eq!(normal[(3, 3)], 1.0);
        for i in 0..3 {
            assert_eq!(normal[(3, i)], 0.0);
            assert_eq!(normal[(i, 3)], 0.0);
        }
    }

    #[test]
    fn singular_model_view_falls_back_to_identity() {
        let flattened = glm::scaling(&glm::vec3(1.0, 0.0, 1.0));
        let normal = normal_matrix(&flattened);
        assert!(normal.iter().all(|value| value.is_finite()));
        assert_eq!(normal, Mat4::identity());
    }

    #[test]
    fn normal_matrix_uses_model_view_not_model() {
        let model = glm::scaling(&glm::vec3(2.0, 1.0, 1.0));
        let view = glm::rotation(std::f32::consts::FRAC_PI_2, &glm::Vec3::y());

        let uniforms = Uniforms::new(&model, &view, &Mat4::identity());
        assert_mat_close(&uniforms.normal_matrix, &normal_matrix(&(view * model)));
    }
}
