use std::path::Path;

use image::{ImageFormat, Rgba, RgbaImage};
use tracing::trace;

use crate::error::Result;
use crate::pixel::PixelBuffer;

/// Scale-only affine transform from buffer pixels to surface pixels.
/// No rotation, skew, or translation: the buffer is drawn at the origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleTransform {
    pub scale_x: f32,
    pub scale_y: f32,
}

impl ScaleTransform {
    pub fn uniform(scale: f32) -> Self {
        Self {
            scale_x: scale,
            scale_y: scale,
        }
    }

    /// Buffer coordinates to surface coordinates.
    pub fn map(&self, x: f32, y: f32) -> (f32, f32) {
        (x * self.scale_x, y * self.scale_y)
    }

    /// Surface coordinates back to buffer coordinates.
    pub fn invert(&self, x: f32, y: f32) -> (f32, f32) {
        (x / self.scale_x, y / self.scale_y)
    }
}

/// The host's drawing target.
pub trait Surface {
    fn size(&self) -> (u32, u32);
    fn draw_buffer(&mut self, buffer: &PixelBuffer, transform: &ScaleTransform) -> Result<()>;
}

/// Issues the per-frame draw of the last decoded region.
#[derive(Debug, Default)]
pub struct Renderer {
    frames: u64,
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames drawn so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn draw(
        &mut self,
        surface: &mut dyn Surface,
        buffer: &PixelBuffer,
        scale: f32,
    ) -> Result<ScaleTransform> {
        let transform = ScaleTransform::uniform(scale);
        surface.draw_buffer(buffer, &transform)?;
        self.frames += 1;
        let (drawn_w, drawn_h) = transform.map(buffer.width() as f32, buffer.height() as f32);
        trace!(frame = self.frames, scale, drawn_w, drawn_h, "Frame drawn");
        Ok(transform)
    }
}

/// Software surface backed by an RGBA image, sampling nearest neighbour.
pub struct RasterSurface {
    canvas: RgbaImage,
    background: Rgba<u8>,
}

impl RasterSurface {
    pub fn new(width: u32, height: u32) -> Self {
        let background = Rgba([0, 0, 0, 255]);
        Self {
            canvas: RgbaImage::from_pixel(width, height, background),
            background,
        }
    }

    /// Fill colour outside the drawn buffer. Repaints the whole canvas.
    pub fn with_background(mut self, color: [u8; 4]) -> Self {
        self.background = Rgba(color);
        for px in self.canvas.pixels_mut() {
            *px = self.background;
        }
        self
    }

    pub fn image(&self) -> &RgbaImage {
        &self.canvas
    }

    pub fn save_png(&self, path: &Path) -> Result<()> {
        self.canvas.save_with_format(path, ImageFormat::Png)?;
        Ok(())
    }
}

impl Surface for RasterSurface {
    fn size(&self) -> (u32, u32) {
        self.canvas.dimensions()
    }

    fn draw_buffer(&mut self, buffer: &PixelBuffer, transform: &ScaleTransform) -> Result<()> {
        let (bw, bh) = (buffer.width(), buffer.height());
        for (x, y, px) in self.canvas.enumerate_pixels_mut() {
            let (sx, sy) = transform.invert(x as f32 + 0.5, y as f32 + 0.5);
            *px = if sx >= 0.0 && sy >= 0.0 && (sx as u32) < bw && (sy as u32) < bh {
                Rgba(buffer.pixel(sx as u32, sy as u32))
            } else {
                self.background
            };
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pixel::{PixelFormat, SampleLayout};

    #[test]
    fn upscale_repeats_pixels() {
        let mut buf = PixelBuffer::new(2, 1, PixelFormat::Rgba8);
        buf.write_row(0, &[255, 0, 0, 255, 0, 0, 255, 255], SampleLayout::Rgba);

        let mut surface = RasterSurface::new(4, 3);
        let transform = Renderer::new().draw(&mut surface, &buf, 2.0).unwrap();
        assert_eq!(transform.map(1.0, 0.5), (2.0, 1.0));
        assert_eq!(transform.invert(2.0, 1.0), (1.0, 0.5));

        let img = surface.image();
        assert_eq!(img.get_pixel(0, 0).0, [255, 0, 0, 255]);
        assert_eq!(img.get_pixel(1, 1).0, [255, 0, 0, 255]);
        assert_eq!(img.get_pixel(3, 0).0, [0, 0, 255, 255]);
        // Below the scaled buffer only the background remains.
        assert_eq!(img.get_pixel(0, 2).0, [0, 0, 0, 255]);
    }

    #[test]
    fn background_is_painted_before_first_draw() {
        let surface = RasterSurface::new(3, 2).with_background([10, 20, 30, 255]);
        assert!(surface.image().pixels().all(|p| p.0 == [10, 20, 30, 255]));
    }

    #[test]
    fn buffer_edge_maps_to_surface_edge() {
        let buf = PixelBuffer::new(5, 8, PixelFormat::Rgba8);
        let transform = ScaleTransform::uniform(0.5);
        let (w, h) = transform.map(buf.width() as f32, buf.height() as f32);
        assert_eq!((w, h), (2.5, 4.0));
    }
}
