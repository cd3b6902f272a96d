use tiny_skia::Color;
use tiny_skia::Paint;
use tiny_skia::Pixmap;
use tiny_skia::Rect;
use tiny_skia::Transform;

use crate::config::Resolution;

/// Axis-aligned rectangle in device pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

/// Drawing target handed to widgets once per frame.
///
/// Drawing and status reporting are independent channels: a status line never
/// ends up on the surface.
pub trait Canvas {
    fn fill_rect(&mut self, rect: PixelRect, color: Color);

    fn report(&mut self, status: &str);
}

/// Values shared by every drawable within one frame.
#[derive(Debug, Clone, Copy)]
pub struct Frame {
    /// Epoch milliseconds sampled once at the start of the frame.
    pub now_ms: i64,
    pub reference: Resolution,
}

pub trait Drawable {
    fn draw(&self, canvas: &mut dyn Canvas, frame: &Frame);
}

/// Canvas over the window's drawing buffer. Status lines go to the log.
pub struct PixmapCanvas<'a> {
    pixmap: &'a mut Pixmap,
}

impl<'a> PixmapCanvas<'a> {
    pub fn new(pixmap: &'a mut Pixmap) -> Self {
        Self { pixmap }
    }
}

impl Canvas for PixmapCanvas<'_> {
    fn fill_rect(&mut self, rect: PixelRect, color: Color) {
        let Some(rect) =
            Rect::from_xywh(rect.x as f32, rect.y as f32, rect.width as f32, rect.height as f32)
        else {
            return;
        };

        let mut paint = Paint {
            anti_alias: false,
            ..Default::default()
        };
        paint.set_color(color);

        self.pixmap
            .fill_rect(rect, &paint, Transform::identity(), None);
    }

    fn report(&mut self, status: &str) {
        tracing::info!(target: "kiosk::status", "{status}");
    }
}

#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingCanvas {
    pub rects: Vec<(PixelRect, Color)>,
    pub reports: Vec<String>,
}

#[cfg(test)]
impl Canvas for RecordingCanvas {
    fn fill_rect(&mut self, rect: PixelRect, color: Color) {
        self.rects.push((rect, color));
    }

    fn report(&mut self, status: &str) {
        self.reports.push(status.to_string());
    }
}
