use std::num::NonZeroU32;
use std::sync::Arc;

use pixels::Pixels;
use pixels::SurfaceTexture;
use thiserror::Error;
use tiny_skia::Pixmap;
use winit::dpi::PhysicalSize;
use winit::keyboard::ModifiersState;
use winit::window::Window;

use crate::background::Background;
use crate::render::Frame;
use crate::render::PixmapCanvas;
use crate::widget::Widget;

pub struct WindowState {
    frame_buffer: Pixels,
    drawing_buffer: Pixmap,

    /// winit Window.
    pub(crate) window: Arc<Window>,

    /// Window modifiers.
    pub(crate) modifiers: ModifiersState,
}

impl WindowState {
    pub fn new(window: Window) -> Result<Self, WindowError> {
        let window = Arc::new(window);
        let size = window.inner_size();

        let surface_texture = SurfaceTexture::new(size.width, size.height, &window);
        let frame_buffer = Pixels::new(size.width, size.height, surface_texture)?;
        let drawing_buffer = new_pixmap(size)?;

        let state = WindowState {
            frame_buffer,
            drawing_buffer,
            window,
            modifiers: Default::default(),
        };

        Ok(state)
    }

    /// Resize the window to the new size.
    pub fn resize(&mut self, size: PhysicalSize<u32>) -> Result<(), WindowError> {
        let (width, height) = match (NonZeroU32::new(size.width), NonZeroU32::new(size.height)) {
            (Some(width), Some(height)) => (width.get(), height.get()),
            _ => return Ok(()),
        };

        self.frame_buffer.resize_surface(width, height)?;
        self.frame_buffer.resize_buffer(width, height)?;
        self.drawing_buffer = new_pixmap(size)?;

        self.window.request_redraw();
        Ok(())
    }

    pub fn draw(
        &mut self,
        background: &Background,
        widgets: &[Widget],
        frame: &Frame,
    ) -> Result<(), WindowError> {
        background.draw(&mut self.drawing_buffer);

        let mut canvas = PixmapCanvas::new(&mut self.drawing_buffer);
        for widget in widgets {
            widget.render(&mut canvas, frame);
        }

        self.frame_buffer
            .frame_mut()
            .copy_from_slice(self.drawing_buffer.data());

        self.window.pre_present_notify();
        self.frame_buffer.render()?;
        Ok(())
    }
}

fn new_pixmap(size: PhysicalSize<u32>) -> Result<Pixmap, WindowError> {
    Pixmap::new(size.width, size.height).ok_or(WindowError::EmptyPixmap(size.width, size.height))
}

#[derive(Debug, Error)]
pub enum WindowError {
    #[error(transparent)]
    Pixels(#[from] pixels::Error),

    #[error(transparent)]
    Texture(#[from] pixels::TextureError),

    #[error("cannot allocate a {0}x{1} drawing buffer")]
    EmptyPixmap(u32, u32),
}
