use std::fmt;

use byteorder::{ByteOrder, LittleEndian};
use serde::{Deserialize, Serialize};

use crate::consts::{RGB565_BYTES_PER_PIXEL, RGBA8_BYTES_PER_PIXEL};

/// Storage format of a decoded [`PixelBuffer`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PixelFormat {
    /// 16-bit little-endian RGB 5-6-5, no alpha. Half the memory of RGBA.
    #[default]
    Rgb565,
    /// 8 bits per channel RGBA.
    Rgba8,
}

impl PixelFormat {
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            PixelFormat::Rgb565 => RGB565_BYTES_PER_PIXEL,
            PixelFormat::Rgba8 => RGBA8_BYTES_PER_PIXEL,
        }
    }
}

impl fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PixelFormat::Rgb565 => write!(f, "RGB565"),
            PixelFormat::Rgba8 => write!(f, "RGBA8888"),
        }
    }
}

/// Channel layout of 8-bit samples coming out of a codec.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SampleLayout {
    Gray,
    GrayAlpha,
    Rgb,
    Rgba,
}

impl SampleLayout {
    pub fn channels(self) -> usize {
        match self {
            SampleLayout::Gray => 1,
            SampleLayout::GrayAlpha => 2,
            SampleLayout::Rgb => 3,
            SampleLayout::Rgba => 4,
        }
    }

    fn rgba(self, px: &[u8]) -> [u8; 4] {
        match self {
            SampleLayout::Gray => [px[0], px[0], px[0], 255],
            SampleLayout::GrayAlpha => [px[0], px[0], px[0], px[1]],
            SampleLayout::Rgb => [px[0], px[1], px[2], 255],
            SampleLayout::Rgba => [px[0], px[1], px[2], px[3]],
        }
    }
}

/// Decoded pixels for one region, row-major and tightly packed.
///
/// The backing `Vec` is kept across decodes: [`PixelBuffer::reshape`] only
/// changes its length, so a buffer that was once large enough never
/// reallocates again.
#[derive(Clone, Debug)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    format: PixelFormat,
    data: Vec<u8>,
}

impl PixelBuffer {
    pub fn new(width: u32, height: u32, format: PixelFormat) -> Self {
        Self {
            width,
            height,
            format,
            data: vec![0u8; Self::byte_len(width, height, format)],
        }
    }

    /// Bytes needed for a `width` x `height` buffer in `format`.
    pub fn byte_len(width: u32, height: u32, format: PixelFormat) -> usize {
        width as usize * height as usize * format.bytes_per_pixel()
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Allocated bytes, which may exceed `data().len()` after shrinking.
    pub fn capacity(&self) -> usize {
        self.data.capacity()
    }

    pub fn row_stride(&self) -> usize {
        self.width as usize * self.format.bytes_per_pixel()
    }

    /// Whether this buffer can hold `width` x `height` pixels of `format`
    /// without reallocating.
    pub fn can_hold(&self, width: u32, height: u32, format: PixelFormat) -> bool {
        self.format == format && self.capacity() >= Self::byte_len(width, height, format)
    }

    /// Change the logical size in place. Never shrinks the allocation.
    pub fn reshape(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        let len = Self::byte_len(width, height, self.format);
        self.data.resize(len, 0);
    }

    /// Convert one row of 8-bit samples into row `y` of this buffer.
    ///
    /// `samples` must hold exactly `width` pixels of `layout`.
    pub fn write_row(&mut self, y: u32, samples: &[u8], layout: SampleLayout) {
        let stride = self.row_stride();
        let bpp = self.format.bytes_per_pixel();
        let start = y as usize * stride;
        let row = &mut self.data[start..start + stride];
        let channels = layout.channels();

        for (dst, src) in row.chunks_exact_mut(bpp).zip(samples.chunks_exact(channels)) {
            let [r, g, b, a] = layout.rgba(src);
            match self.format {
                PixelFormat::Rgba8 => dst.copy_from_slice(&[r, g, b, a]),
                PixelFormat::Rgb565 => LittleEndian::write_u16(dst, pack_rgb565(r, g, b)),
            }
        }
    }

    /// Pixel at `(x, y)` expanded to RGBA.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let bpp = self.format.bytes_per_pixel();
        let offset = y as usize * self.row_stride() + x as usize * bpp;
        let px = &self.data[offset..offset + bpp];
        match self.format {
            PixelFormat::Rgba8 => [px[0], px[1], px[2], px[3]],
            PixelFormat::Rgb565 => unpack_rgb565(LittleEndian::read_u16(px)),
        }
    }
}

fn pack_rgb565(r: u8, g: u8, b: u8) -> u16 {
    ((r as u16 >> 3) << 11) | ((g as u16 >> 2) << 5) | (b as u16 >> 3)
}

fn unpack_rgb565(v: u16) -> [u8; 4] {
    let r = ((v >> 11) & 0x1f) as u8;
    let g = ((v >> 5) & 0x3f) as u8;
    let b = (v & 0x1f) as u8;
    [(r << 3) | (r >> 2), (g << 2) | (g >> 4), (b << 3) | (b >> 2), 255]
}
