//! # Camera
//!
//! A fixed look-at camera producing the view and projection halves of the transform chain. The scene
//! uses a left-handed coordinate system with a zero-to-one depth range, which is what `wgpu` clip
//! space expects.

use nalgebra_glm::{Mat4, Vec3};

/// Describes where the viewer sits and how the scene is projected.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Camera {
    /// Position of the viewer in world space.
    pub eye: Vec3,

    /// Point the viewer looks at.
    pub target: Vec3,

    /// World-space up direction.
    pub up: Vec3,

    /// Vertical field of view, in degrees.
    pub fov_y_degrees: f32,

    pub z_near: f32,

    pub z_far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            eye: nalgebra_glm::vec3(0.0, 0.0, 5.0),
            target: nalgebra_glm::vec3(0.0, 0.0, 0.0),
            up: Vec3::y(),
            fov_y_degrees: 65.0,
            z_near: 0.1,
            z_far: 100.0,
        }
    }
}

impl Camera {
    /// World-to-view transform.
    pub fn view(&self) -> Mat4 {
        nalgebra_glm::look_at_lh(&self.eye, &self.target, &self.up)
    }

    /// View-to-clip transform for the given surface aspect ratio.
    ///
    /// A degenerate aspect ratio (zero, negative or non-finite, as seen while a window is minimized)
    /// is replaced by `1.0`.
    pub fn projection(&self, aspect_ratio: f32) -> Mat4 {
        let aspect_ratio = if aspect_ratio.is_finite() && aspect_ratio > 0.0 {
            aspect_ratio
        } else {
            1.0
        };
        nalgebra_glm::perspective_lh_zo(
            aspect_ratio,
            self.fov_y_degrees.to_radians(),
            self.z_near,
            self.z_far,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_moves_eye_to_origin() {
        let camera = Camera::default();
        let eye = camera.view() * nalgebra_glm::vec4(0.0, 0.0, 5.0, 1.0);
        assert!(eye.xyz().norm() < 1e-5);
    }

    #[test]
    fn target_lands_in_front_of_viewer() {
        let camera = Camera::default();
        let target = camera.view() * nalgebra_glm::vec4(0.0, 0.0, 0.0, 1.0);
        // Left-handed: looking down +z in view space.
        assert!((target.z - 5.0).abs() < 1e-5);
    }

    #[test]
    fn degenerate_aspect_ratio_is_square() {
        let camera = Camera::default();
        let square = camera.projection(1.0);
        assert_eq!(camera.projection(0.0), square);
        assert_eq!(camera.projection(f32::NAN), square);
        assert_eq!(camera.projection(-2.0), square);
    }

    #[test]
    fn projection_maps_near_and_far_to_unit_depth() {
        let camera = Camera::default();
        let projection = camera.projection(16.0 / 9.0);

        let near = projection * nalgebra_glm::vec4(0.0, 0.0, camera.z_near, 1.0);
        let far = projection * nalgebra_glm::vec4(0.0, 0.0, camera.z_far, 1.0);

        assert!((near.z / near.w).abs() < 1e-5);
        assert!((far.z / far.w - 1.0).abs() < 1e-4);
    }
}
