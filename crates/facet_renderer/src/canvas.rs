//! Pixel targets for the renderers.

use std::path::Path;

use facet_core::Color;
use image::{ImageResult, Rgba, RgbaImage};

/// A 2D surface the renderers write `0xAARRGGBB` pixels into.
pub trait Canvas {
    fn width(&self) -> usize;
    fn height(&self) -> usize;
    /// Write one pixel. Out-of-range coordinates are ignored.
    fn set_pixel(&mut self, x: usize, y: usize, argb: u32);
    /// Fill the whole surface with opaque black.
    fn clear(&mut self);
}

/// Row-major `0xAARRGGBB` pixel buffer.
///
/// The layout matches what `minifb::Window::update_with_buffer` expects.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameBuffer {
    width: usize,
    height: usize,
    pixels: Vec<u32>,
}

impl FrameBuffer {
    /// Create a new buffer filled with black.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::BLACK.to_argb(); width * height],
        }
    }

    pub fn get_pixel(&self, x: usize, y: usize) -> u32 {
        self.pixels[y * self.width + x]
    }

    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    /// Resize and clear the buffer.
    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.pixels = vec![Color::BLACK.to_argb(); width * height];
    }

    /// Convert to an opaque RGBA image.
    pub fn to_rgba_image(&self) -> RgbaImage {
        RgbaImage::from_fn(self.width as u32, self.height as u32, |x, y| {
            let color = Color::from_argb(self.get_pixel(x as usize, y as usize));
            Rgba([color.r, color.g, color.b, 255])
        })
    }

    /// Save as an image file. The format follows the extension (PNG).
    pub fn save<P: AsRef<Path>>(&self, path: P) -> ImageResult<()> {
        let path = path.as_ref();
        self.to_rgba_image().save(path)?;
        log::info!("Saved {}x{} frame to {}", self.width, self.height, path.display());
        Ok(())
    }
}

impl Canvas for FrameBuffer {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn set_pixel(&mut self, x: usize, y: usize, argb: u32) {
        if x < self.width && y < self.height {
            self.pixels[y * self.width + x] = argb;
        }
    }

    fn clear(&mut self) {
        self.pixels.fill(Color::BLACK.to_argb());
    }
}

/// Whether a canvas-space point lies on the canvas.
#[inline]
pub fn is_inside_canvas(canvas: &dyn Canvas, x: f32, y: f32) -> bool {
    x >= 0.0 && x < canvas.width() as f32 && y >= 0.0 && y < canvas.height() as f32
}

/// Write `color` at a canvas-space point, truncating the coordinates.
#[inline]
pub fn draw_pixel(canvas: &mut dyn Canvas, x: f32, y: f32, color: Color) {
    canvas.set_pixel(x as usize, y as usize, color.to_argb());
}
