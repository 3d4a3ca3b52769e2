//! # App
//!
//! The `App` struct is the `winit` application handler for the sample game. It creates the window on
//! `resumed`, builds the `Renderer` once, and routes window events:
//!
//! - **Escape / close**: exits the event loop.
//! - **Resize**: reconfigures the surface and depth texture.
//! - **Redraw**: runs the egui overlay, renders a frame and requests the next redraw.
//!
//! The overlay exposes the spin controls and a live readout of the uniform block sent to the shader.

use std::sync::Arc;

use web_time::Instant;

use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::WindowEvent,
    event_loop::ActiveEventLoop,
    window::{Theme, Window},
};

use crate::logging::init_logging;
use crate::renderer::{FrameOutcome, Renderer};
use crate::settings::GameSettings;
use crate::uniforms::Uniforms;

#[derive(Default)]
pub struct App {
    settings: GameSettings,

    window: Option<Arc<Window>>,

    renderer: Option<Renderer>,

    gui_state: Option<egui_winit::State>,

    last_render_time: Option<Instant>,

    last_size: (u32, u32),

    show_uniforms: bool,
}

impl App {
    pub fn new(settings: GameSettings) -> Self {
        Self {
            settings,
            ..Default::default()
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        init_logging(&self.settings.logging);

        let attributes = Window::default_attributes().with_title(self.settings.window_title.as_str());

        let window_handle = match event_loop.create_window(attributes) {
            Ok(window) => Arc::new(window),
            Err(error) => {
                log::error!("Failed to create window: {error}");
                event_loop.exit();
                return;
            }
        };
        self.window = Some(window_handle.clone());

        let inner_size = window_handle.inner_size();
        self.last_size = (inner_size.width, inner_size.height);

        let gui_context = egui::Context::default();
        let viewport_id = gui_context.viewport_id();
        let gui_state = egui_winit::State::new(
            gui_context,
            viewport_id,
            &window_handle,
            Some(window_handle.scale_factor() as _),
            Some(Theme::Dark),
            None,
        );

        let (width, height) = self.last_size;
        let settings = &self.settings;
        let renderer = pollster::block_on(async move {
            Renderer::new(window_handle.clone(), width, height, settings).await
        });

        match renderer {
            Ok(renderer) => {
                log::info!("Renderer ready at ({width} x {height})");
                self.renderer = Some(renderer);
                self.gui_state = Some(gui_state);
                self.last_render_time = Some(Instant::now());
            }
            Err(error) => {
                log::error!("Failed to create renderer: {error:#}");
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let (Some(gui_state), Some(renderer), Some(window), Some(last_render_time)) = (
            self.gui_state.as_mut(),
            self.renderer.as_mut(),
            self.window.as_ref(),
            self.last_render_time.as_mut(),
        ) else {
            return;
        };

        if gui_state.on_window_event(window, &event).consumed {
            return;
        }

        match event {
            WindowEvent::KeyboardInput {
                event:
                    winit::event::KeyEvent {
                        physical_key: winit::keyboard::PhysicalKey::Code(key_code),
                        ..
                    },
                ..
            } => {
                if matches!(key_code, winit::keyboard::KeyCode::Escape) {
                    event_loop.exit();
                }
            }
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                log::debug!("Resizing renderer surface to: ({width}, {height})");
                renderer.resize(width, height);
                self.last_size = (width, height);
            }
            WindowEvent::CloseRequested => {
                log::info!("Close requested. Exiting...");
                event_loop.exit();
            }
            WindowEvent::RedrawRequested => {
                let now = Instant::now();
                let delta_time = now - *last_render_time;
                *last_render_time = now;

                let gui_input = gui_state.take_egui_input(window);
                gui_state.egui_ctx().begin_pass(gui_input);

                let uniforms = *renderer.last_uniforms();
                let state = renderer.game_state_mut();
                egui::Window::new("Spinning Box").show(gui_state.egui_ctx(), |ui| {
                    ui.checkbox(&mut state.paused, "Paused");
                    ui.add(
                        egui::Slider::new(&mut state.rotation_speed, -4.0..=4.0)
                            .text("Speed (rad/s)"),
                    );
                    ui.label(format!("Rotation: {:.3} rad", state.rotation));
                    ui.label(format!("Frame: {}", state.frame_count));
                    ui.checkbox(&mut self.show_uniforms, "Show uniforms");
                    if self.show_uniforms {
                        uniforms_grid(ui, &uniforms);
                    }
                });

                let egui::FullOutput {
                    textures_delta,
                    shapes,
                    pixels_per_point,
                    platform_output,
                    ..
                } = gui_state.egui_ctx().end_pass();

                gui_state.handle_platform_output(window, platform_output);

                let paint_jobs = gui_state.egui_ctx().tessellate(shapes, pixels_per_point);

                let screen_descriptor = {
                    let (width, height) = self.last_size;
                    egui_wgpu::ScreenDescriptor {
                        size_in_pixels: [width, height],
                        pixels_per_point: window.scale_factor() as f32,
                    }
                };

                if renderer.render_frame(screen_descriptor, paint_jobs, textures_delta, delta_time)
                    == FrameOutcome::Fatal
                {
                    log::error!("Rendering cannot continue. Exiting...");
                    event_loop.exit();
                    return;
                }
            }
            _ => (),
        }

        window.request_redraw();
    }
}

/// Read-only view of both matrices, row by row.
fn uniforms_grid(ui: &mut egui::Ui, uniforms: &Uniforms) {
    let matrices = [
        ("modelview_projection_matrix", &uniforms.modelview_projection_matrix),
        ("normal_matrix", &uniforms.normal_matrix),
    ];
    for (name, matrix) in matrices {
        ui.monospace(name);
        egui::Grid::new(name).striped(true).show(ui, |ui| {
            for row in matrix.row_iter() {
                for value in row.iter() {
                    ui.monospace(format!("{value:>8.3}"));
                }
                ui.end_row();
            }
        });
    }
}
