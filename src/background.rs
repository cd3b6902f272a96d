use std::error::Error;

use image::imageops::FilterType;
use image::DynamicImage;
use image::ImageReader;
use image::RgbaImage;
use tiny_skia::Color;
use tiny_skia::Pixmap;
use winit::dpi::PhysicalSize;

use crate::config;

/// Backdrop painted under the widgets on every frame.
pub enum Background {
    Image {
        original: DynamicImage,
        scaled: Option<RgbaImage>,
    },
    SolidColor((u8, u8, u8)),
}

impl Background {
    pub fn new_image(path: impl Into<String>) -> Result<Self, Box<dyn Error>> {
        let path = path.into();
        let original = ImageReader::open(&path)?.decode()?;

        Ok(Self::Image {
            original,
            scaled: None,
        })
    }

    /// Scales the image to cover `size`, cropping what does not fit.
    pub fn resize(&mut self, size: PhysicalSize<u32>) {
        if let Self::Image { original, scaled } = self {
            let resized = original.resize_to_fill(size.width, size.height, FilterType::Nearest);
            *scaled = Some(resized.to_rgba8());
        }
    }

    pub fn draw(&self, pixmap: &mut Pixmap) {
        match self {
            Background::Image {
                scaled: Some(image),
                ..
            } if image.width() == pixmap.width() && image.height() == pixmap.height() => {
                // Opaque pixels are their own premultiplied form.
                for (dst, src) in pixmap.data_mut().chunks_exact_mut(4).zip(image.pixels()) {
                    dst.copy_from_slice(&[src.0[0], src.0[1], src.0[2], 255]);
                }
            }
            Background::Image { .. } => pixmap.fill(Color::BLACK),
            Background::SolidColor((r, g, b)) => pixmap.fill(Color::from_rgba8(*r, *g, *b, 255)),
        }
    }
}

impl TryFrom<&config::Background> for Background {
    type Error = Box<dyn Error>;

    fn try_from(value: &config::Background) -> Result<Self, Self::Error> {
        match value {
            config::Background::Image(path) => Background::new_image(path.as_str()),
            config::Background::Color(rgb) => Ok(Background::SolidColor(*rgb)),
        }
    }
}
