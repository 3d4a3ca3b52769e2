//! # Spinning Box
//!
//! A small sample game that renders a lit, spinning box with `wgpu`. Its center is the [`Uniforms`]
//! block: two 4x4 matrices (model-view-projection and normal matrix) built on the host every frame and
//! read by the shader by byte offset. Everything else in the crate exists to produce, upload and
//! consume that block.
//!
//! ## Modules
//!
//! - [`uniforms`]: The shader-visible transform block and normal-matrix math.
//! - [`camera`]: View and projection matrices.
//! - [`game`]: The spin simulation that builds each frame's uniforms.
//! - [`vertex`]: Vertex layout and box geometry.
//! - [`uniform_binding`]: A ring of uniform slots, one per frame in flight.
//! - [`scene`]: Box buffers, pipeline and per-frame update.
//! - [`gpu`]: Device, queue and surface management.
//! - [`renderer`]: Frame recording and presentation, including the egui overlay.
//! - [`app`]: The `winit` application handler.
//! - [`settings`] and [`logging`]: Start-up configuration.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use spinning_box::{App, GameSettings};
//!
//! let event_loop = winit::event_loop::EventLoop::new()?;
//! let mut app = App::new(GameSettings::default());
//! event_loop.run_app(&mut app)?;
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! ## Dependencies
//!
//! - `wgpu`: GPU device, pipelines and buffers.
//! - `winit`: Window and event management.
//! - `egui`, `egui-wgpu`, `egui-winit`: The debug overlay.
//! - `nalgebra-glm`: Matrix and vector math.
//! - `bytemuck`: Safe byte views of GPU data.
//! - `log` and `env_logger`: Logging.
//! - `anyhow`: Error propagation during initialization.

pub mod app;
pub mod camera;
pub mod game;
pub mod gpu;
pub mod logging;
pub mod renderer;
pub mod scene;
pub mod settings;
pub mod uniform_binding;
pub mod uniforms;
pub mod vertex;

pub use crate::app::App;
pub use crate::camera::Camera;
pub use crate::game::GameState;
pub use crate::gpu::{Gpu, SurfaceErrorAction};
pub use crate::renderer::{FrameOutcome, Renderer};
pub use crate::scene::Scene;
pub use crate::settings::GameSettings;
pub use crate::uniform_binding::{UniformBinding, UniformRing};
pub use crate::uniforms::Uniforms;
pub use crate::vertex::{Mesh, Vertex};

/// WGSL source for the box shader.
///
/// Vertex stage: transforms `position` by `modelview_projection_matrix` and lights the vertex with
/// an ambient term plus a diffuse term from the normal transformed by `normal_matrix`.
///
/// Fragment stage: outputs the interpolated color.
///
/// The `Uniforms` struct it declares at `@group(0) @binding(0)` must stay byte-for-byte identical to
/// [`Uniforms`].
pub const SHADER_SOURCE: &str = include_str!("shader_source.wgsl");

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_shader() -> naga::Module {
        let module = naga::front::wgsl::parse_str(SHADER_SOURCE).expect("shader parses");
        naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            naga::valid::Capabilities::all(),
        )
        .validate(&module)
        .expect("shader validates");
        module
    }

    #[test]
    fn shader_uniform_block_matches_host_layout() {
        let module = parse_shader();
        let (members, span) = module
            .types
            .iter()
            .find_map(|(_, ty)| match (&ty.name, &ty.inner) {
                (Some(name), naga::TypeInner::Struct { members, span }) if name == "Uniforms" => {
                    Some((members.clone(), *span))
                }
                _ => None,
            })
            .expect("Uniforms struct in shader");

        assert_eq!(span as usize, Uniforms::SIZE);
        assert_eq!(members.len(), 2);
        assert_eq!(
            members[0].name.as_deref(),
            Some("modelview_projection_matrix")
        );
        assert_eq!(members[0].offset, 0);
        assert_eq!(members[1].name.as_deref(), Some("normal_matrix"));
        assert_eq!(members[1].offset as usize, Uniforms::NORMAL_MATRIX_OFFSET);
    }

    #[test]
    fn shader_entry_points_exist() {
        let module = parse_shader();
        let names: Vec<_> = module
            .entry_points
            .iter()
            .map(|entry| entry.name.as_str())
            .collect();
        assert!(names.contains(&"vertex_main"));
        assert!(names.contains(&"fragment_main"));
    }
}
