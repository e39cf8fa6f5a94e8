use anyhow::Result;
use clap::Parser;
use lava::{App, Config};
use winit::dpi::LogicalSize;
use winit::event::{Event, WindowEvent};
use winit::event_loop::EventLoop;
use winit::window::WindowBuilder;

fn main() -> Result<()> {
    pretty_env_logger::init();

    let config = Config::parse();
    log::debug!("{:?}", config);

    let event_loop = EventLoop::new()?;
    let window = WindowBuilder::new()
        .with_title(config.title.as_str())
        .with_inner_size(LogicalSize::new(config.width, config.height))
        .build(&event_loop)?;

    let mut app = unsafe { App::create(&window, &config)? };

    if config.list {
        if let Err(e) = unsafe { app.print_inventory() } {
            log::warn!("Could not list inventory: {:#}", e);
        }
    }

    let mut failure = None;
    event_loop.run(|event, target| match event {
        Event::AboutToWait => window.request_redraw(),
        Event::WindowEvent { event, .. } => match event {
            WindowEvent::RedrawRequested if !target.exiting() => {
                if let Err(e) = unsafe { app.render(&window) } {
                    log::error!("Frame failed: {:#}", e);
                    failure = Some(e);
                    target.exit();
                }
            }
            WindowEvent::Resized(_) => app.resized = true,
            WindowEvent::CloseRequested => target.exit(),
            _ => {}
        },
        _ => {}
    })?;

    unsafe { app.destroy() };

    match failure {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
