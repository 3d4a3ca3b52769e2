//! # Settings
//!
//! Start-up configuration for the sample game. Everything has a working default; the binary only
//! overrides what it needs.

use crate::camera::Camera;
use crate::logging::LoggingConfig;

/// Tunables read once when the window and renderer are created.
#[derive(Debug, Clone)]
pub struct GameSettings {
    pub window_title: String,

    /// Uniform slots kept in the ring, one per frame the CPU may run ahead of the GPU.
    pub frames_in_flight: usize,

    /// Background color the render pass clears to.
    pub clear_color: wgpu::Color,

    /// Initial spin speed in radians per second.
    pub rotation_speed: f32,

    /// Half the edge length of the box.
    pub box_half_extent: f32,

    pub camera: Camera,

    pub logging: LoggingConfig,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            window_title: "Spinning Box".to_string(),
            frames_in_flight: 3,
            clear_color: wgpu::Color {
                r: 0.65,
                g: 0.65,
                b: 0.65,
                a: 1.0,
            },
            rotation_speed: 0.6,
            box_half_extent: 1.0,
            camera: Camera::default(),
            logging: LoggingConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_triple_buffer_uniforms() {
        let settings = GameSettings::default();
        assert_eq!(settings.frames_in_flight, 3);
        assert!(settings.rotation_speed > 0.0);
    }
}
