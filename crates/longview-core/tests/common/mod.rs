#![allow(dead_code)]

use std::io::Write;

use longview_core::io::MemorySource;

/// Red channel of the synthetic RGB pattern.
pub fn pattern_r(x: u32, _y: u32) -> u8 {
    (x % 256) as u8
}

/// Green channel of the synthetic RGB pattern.
pub fn pattern_g(_x: u32, y: u32) -> u8 {
    (y % 256) as u8
}

/// Blue channel of the synthetic RGB pattern.
pub fn pattern_b(x: u32, y: u32) -> u8 {
    ((x + y) % 256) as u8
}

/// Gray pattern used by the single-channel fixtures.
pub fn pattern_gray(x: u32, y: u32) -> u8 {
    ((x + y * 7) % 256) as u8
}

/// Build a binary P6 image filled with the RGB pattern.
pub fn build_ppm(width: u32, height: u32) -> Vec<u8> {
    let mut buf = format!("P6\n# longview fixture\n{width} {height}\n255\n").into_bytes();
    for y in 0..height {
        for x in 0..width {
            buf.extend_from_slice(&[pattern_r(x, y), pattern_g(x, y), pattern_b(x, y)]);
        }
    }
    buf
}

/// Build a binary P5 image filled with the gray pattern.
pub fn build_pgm(width: u32, height: u32) -> Vec<u8> {
    let mut buf = format!("P5 {width} {height} 255\n").into_bytes();
    for y in 0..height {
        for x in 0..width {
            buf.push(pattern_gray(x, y));
        }
    }
    buf
}

/// Build a 16-bit P5 image; each sample is the gray pattern scaled to 16 bits.
pub fn build_pgm16(width: u32, height: u32) -> Vec<u8> {
    let mut buf = format!("P5 {width} {height} 65535\n").into_bytes();
    for y in 0..height {
        for x in 0..width {
            let v = pattern_gray(x, y) as u16 * 257;
            buf.extend_from_slice(&v.to_be_bytes());
        }
    }
    buf
}

/// Encode the RGB pattern as a non-interlaced 8-bit PNG.
pub fn build_png(width: u32, height: u32) -> Vec<u8> {
    let mut out = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut out, width, height);
        encoder.set_color(png::ColorType::Rgb);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header().expect("png header");
        let mut data = Vec::with_capacity((width * height * 3) as usize);
        for y in 0..height {
            for x in 0..width {
                data.extend_from_slice(&[pattern_r(x, y), pattern_g(x, y), pattern_b(x, y)]);
            }
        }
        writer.write_image_data(&data).expect("png data");
    }
    out
}

/// Encode a small JPEG, a format the probe understands but no region
/// decoder handles.
pub fn build_jpeg(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([pattern_r(x, y), pattern_g(x, y), pattern_b(x, y)])
    });
    let mut out = std::io::Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Jpeg)
        .expect("jpeg encode");
    out.into_inner()
}

pub fn memory(data: Vec<u8>) -> MemorySource {
    MemorySource::new(data)
}

/// Write bytes to a temporary file that lives as long as the handle.
pub fn write_temp(data: &[u8]) -> tempfile::NamedTempFile {
    let mut f = tempfile::NamedTempFile::new().expect("create temp file");
    f.write_all(data).expect("write image data");
    f.flush().expect("flush");
    f
}
