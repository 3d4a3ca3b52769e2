use spinning_box::{App, GameSettings};

fn main() -> anyhow::Result<()> {
    let event_loop = winit::event_loop::EventLoop::new()?;
    event_loop.set_control_flow(winit::event_loop::ControlFlow::Poll);

    let mut app = App::new(GameSettings::default());
    event_loop.run_app(&mut app)?;
    Ok(())
}
