use std::collections::HashMap;
use std::error::Error;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;
use std::time::Instant;

use winit::application::ApplicationHandler;
use winit::event::StartCause;
use winit::event::WindowEvent;
use winit::event_loop::ActiveEventLoop;
use winit::event_loop::ControlFlow;
use winit::keyboard::Key;
use winit::keyboard::ModifiersState;
use winit::keyboard::NamedKey;
use winit::platform::startup_notify::EventLoopExtStartupNotify;
use winit::platform::startup_notify::WindowAttributesExtStartupNotify;
use winit::window::Fullscreen;
use winit::window::WindowAttributes;
use winit::window::WindowId;

use crate::background::Background;
use crate::clock::Clock;
use crate::clock::SystemClock;
use crate::config::Configuration;
use crate::config::Resolution;
use crate::config::SettingsPaths;
use crate::render::Frame;
use crate::session::Session;
use crate::session::APP_VERSION;
use crate::window::WindowState;

pub struct Application {
    windows: HashMap<WindowId, WindowState>,

    background: Background,
    session: Session,
    paths: SettingsPaths,

    clock: SystemClock,
    reference: Resolution,
    frame_interval: Duration,
    next_frame: Instant,

    /// Set from the signal handlers; checked between frames.
    shutdown: Arc<AtomicBool>,
}

impl Application {
    pub fn new(config: &Configuration, shutdown: Arc<AtomicBool>) -> Result<Self, Box<dyn Error>> {
        let background: Background = (&config.background).try_into()?;
        let paths = config.settings_paths()?;
        let session = Session::restore(&paths, APP_VERSION);

        tracing::info!(
            preset = %session.preset,
            widgets = session.widgets.len(),
            "session restored"
        );

        Ok(Self {
            windows: Default::default(),
            background,
            session,
            paths,
            clock: SystemClock,
            reference: config.display.reference(),
            frame_interval: config.display.frame_interval(),
            next_frame: Instant::now(),
            shutdown,
        })
    }

    fn create_window(&mut self, event_loop: &ActiveEventLoop) -> Result<WindowId, Box<dyn Error>> {
        let mut window_attributes = WindowAttributes::default().with_title("kiosk");

        if let Some(token) = event_loop.read_token_from_env() {
            window_attributes = window_attributes.with_activation_token(token);
        }

        let window = event_loop.create_window(window_attributes)?;
        window.set_fullscreen(Some(Fullscreen::Borderless(window.primary_monitor())));
        window.set_cursor_visible(false);

        let size = window.inner_size();
        self.background.resize(size);

        let window_state = WindowState::new(window)?;
        let window_id = window_state.window.id();

        self.windows.insert(window_id, window_state);

        Ok(window_id)
    }

    fn frame(&self) -> Frame {
        Frame {
            now_ms: self.clock.now_millis(),
            reference: self.reference,
        }
    }
}

impl ApplicationHandler for Application {
    fn new_events(&mut self, _event_loop: &ActiveEventLoop, cause: StartCause) {
        if let StartCause::ResumeTimeReached { .. } = cause {
            for window_state in self.windows.values() {
                window_state.window.request_redraw();
            }
            self.next_frame = Instant::now() + self.frame_interval;
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: winit::event::WindowEvent,
    ) {
        let frame = self.frame();

        let window = match self.windows.get_mut(&window_id) {
            Some(window) => window,
            None => return,
        };

        match event {
            WindowEvent::Resized(size) => {
                self.background.resize(size);
                if let Err(err) = window.resize(size) {
                    tracing::error!("failed to resize window: {err}");
                }
            }

            WindowEvent::CloseRequested => {
                self.windows.remove(&window_id);
            }

            WindowEvent::ModifiersChanged(modifiers) => {
                window.modifiers = modifiers.state();
            }

            WindowEvent::RedrawRequested => {
                if let Err(err) = window.draw(&self.background, &self.session.widgets, &frame) {
                    tracing::error!("error drawing window: {err}");
                }
            }

            WindowEvent::KeyboardInput {
                event,
                is_synthetic: false,
                ..
            } => {
                let mods = window.modifiers;

                if event.state.is_pressed() {
                    match event.logical_key.as_ref() {
                        Key::Named(NamedKey::Escape) => event_loop.exit(),
                        Key::Character(ch)
                            if ch.to_uppercase() == "Q" && mods == ModifiersState::SUPER =>
                        {
                            event_loop.exit()
                        }
                        _ => {}
                    }
                }
            }

            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.shutdown.load(Ordering::Relaxed) {
            tracing::info!("shutdown requested");
            event_loop.exit();
            return;
        }

        if self.windows.is_empty() {
            event_loop.exit();
            return;
        }

        event_loop.set_control_flow(ControlFlow::WaitUntil(self.next_frame));
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Err(err) = self.session.persist(&self.paths, APP_VERSION) {
            tracing::error!("failed to save settings: {err}");
        }
    }

    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if !self.windows.is_empty() {
            return;
        }

        if let Err(err) = self.create_window(event_loop) {
            tracing::error!("failed to create window: {err}");
            event_loop.exit();
        }
    }
}
