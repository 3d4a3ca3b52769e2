//! # Game State
//!
//! The simulation behind the sample game: a single box spinning about a tilted axis. It holds no GPU
//! resources, so the frame-to-frame behavior can be tested without a device.

use std::f32::consts::TAU;

use nalgebra_glm::Mat4;

use crate::camera::Camera;
use crate::uniforms::Uniforms;

/// Rotation state of the box.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GameState {
    /// Current rotation angle in radians, kept in `[0, 2π)`.
    pub rotation: f32,

    /// Angular speed in radians per second.
    pub rotation_speed: f32,

    /// When set, `advance` leaves the rotation untouched.
    pub paused: bool,

    /// Number of frames advanced so far, paused ones included.
    pub frame_count: u64,
}

impl GameState {
    pub fn new(rotation_speed: f32) -> Self {
        Self {
            rotation: 0.0,
            rotation_speed,
            paused: false,
            frame_count: 0,
        }
    }

    /// Steps the simulation by `delta_seconds`.
    pub fn advance(&mut self, delta_seconds: f32) {
        self.frame_count += 1;

        if self.paused || !delta_seconds.is_finite() || delta_seconds < 0.0 {
            return;
        }

        let step = self.rotation_speed * delta_seconds;
        if !step.is_finite() {
            return;
        }

        self.rotation = (self.rotation + step).rem_euclid(TAU);
        // rem_euclid can round up to exactly TAU for tiny negative inputs.
        if self.rotation >= TAU {
            self.rotation = 0.0;
        }
    }

    /// Object-to-world transform of the box.
    pub fn model_matrix(&self) -> Mat4 {
        let axis = nalgebra_glm::vec3(1.0, 1.0, 0.0).normalize();
        nalgebra_glm::rotation(self.rotation, &axis)
    }

    /// Builds this frame's uniform block.
    pub fn uniforms(&self, camera: &Camera, aspect_ratio: f32) -> Uniforms {
        Uniforms::new(
            &self.model_matrix(),
            &camera.view(),
            &camera.projection(aspect_ratio),
        )
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_accumulates_rotation() {
        let mut state = GameState::new(2.0);
        state.advance(0.25);
        state.advance(0.25);
        assert!((state.rotation - 1.0).abs() < 1e-6);
        assert_eq!(state.frame_count, 2);
    }

    #[test]
    fn rotation_wraps_into_full_turn() {
        let mut state = GameState::new(TAU);
        state.advance(1.25);
        assert!((0.0..TAU).contains(&state.rotation));
        assert!((state.rotation - TAU * 0.25).abs() < 1e-4);
    }

    #[test]
    fn negative_speed_stays_in_range() {
        let mut state = GameState::new(-1.0);
        state.advance(0.5);
        assert!((0.0..TAU).contains(&state.rotation));
        assert!((state.rotation - (TAU - 0.5)).abs() < 1e-5);
    }

    #[test]
    fn paused_state_only_counts_frames() {
        let mut state = GameState::new(1.0);
        state.paused = true;
        state.advance(10.0);
        assert_eq!(state.rotation, 0.0);
        assert_eq!(state.frame_count, 1);
    }

    #[test]
    fn bad_deltas_are_ignored() {
        let mut state = GameState::new(1.0);
        state.advance(-1.0);
        state.advance(f32::NAN);
        state.advance(f32::INFINITY);
        assert_eq!(state.rotation, 0.0);
        assert_eq!(state.frame_count, 3);
    }

    #[test]
    fn non_finite_speed_keeps_rotation_finite() {
        let mut state = GameState::new(0.0);
        state.advance(0.5);
        for speed in [f32::NAN, f32::INFINITY, f32::MAX] {
            state.rotation_speed = speed;
            state.advance(2.0);
        }
        assert_eq!(state.rotation, 0.0);
        assert!(state.model_matrix().iter().all(|value| value.is_finite()));
        assert_eq!(state.frame_count, 4);
    }

    #[test]
    fn model_matrix_keeps_rotation_axis_fixed() {
        let mut state = GameState::new(1.0);
        state.advance(0.8);
        let axis = nalgebra_glm::vec4(1.0, 1.0, 0.0, 0.0).normalize();
        let rotated = state.model_matrix() * axis;
        assert!((rotated - axis).norm() < 1e-5);
    }

    #[test]
    fn uniforms_follow_camera_and_model() {
        let camera = Camera::default();
        let mut state = GameState::new(1.5);
        state.advance(0.3);

        let uniforms = state.uniforms(&camera, 2.0);
        let expected = camera.projection(2.0) * camera.view() * state.model_matrix();
        for (a, e) in uniforms
            .modelview_projection_matrix
            .iter()
            .zip(expected.iter())
        {
            assert!((a - e).abs() < 1e-5);
        }
    }
}
