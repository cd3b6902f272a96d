use std::error::Error;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use signal_hook::consts::SIGINT;
use signal_hook::consts::SIGTERM;
use winit::event_loop::EventLoop;

use crate::app::Application;
use crate::config::Configuration;

mod app;
mod background;
mod clock;
mod config;
mod logging;
mod render;
mod session;
mod settings;
mod widget;
mod window;

fn main() -> Result<(), Box<dyn Error>> {
    logging::init();

    let config = Configuration::new().unwrap_or_else(|err| {
        tracing::warn!("failed to load configuration, using defaults: {err}");
        Configuration::default()
    });

    let shutdown = Arc::new(AtomicBool::new(false));
    for signal in [SIGINT, SIGTERM] {
        signal_hook::flag::register(signal, Arc::clone(&shutdown))?;
    }

    let event_loop = EventLoop::new()?;

    let mut app = Application::new(&config, shutdown)?;
    Ok(event_loop.run_app(&mut app)?)
}
