use std::io::{BufReader, Read, Seek, SeekFrom};

use byteorder::{BigEndian, ByteOrder};

use crate::error::{Result, ViewerError};
use crate::geometry::{ImageMetrics, Rect};
use crate::io::region::{map_read_error, RegionCodec};
use crate::io::source::SourceHandle;
use crate::pixel::{PixelBuffer, SampleLayout};

/// Parsed header of a binary `P5`/`P6` file.
#[derive(Clone, Debug, PartialEq)]
pub struct PnmHeader {
    pub layout: SampleLayout,
    pub width: u32,
    pub height: u32,
    pub max_value: u16,
    /// Byte offset of the first raster sample.
    pub data_offset: u64,
}

impl PnmHeader {
    /// 1 for `max_value < 256`, 2 (big-endian) otherwise.
    pub fn bytes_per_sample(&self) -> usize {
        if self.max_value < 256 {
            1
        } else {
            2
        }
    }

    pub fn bytes_per_pixel(&self) -> usize {
        self.layout.channels() * self.bytes_per_sample()
    }

    pub fn raster_size(&self) -> u64 {
        self.width as u64 * self.height as u64 * self.bytes_per_pixel() as u64
    }
}

/// Parse a binary PNM header from the start of `reader`.
pub fn read_header<R: Read>(reader: R) -> Result<PnmHeader> {
    let mut bytes = HeaderBytes::new(reader);

    let magic = [bytes.next()?, bytes.next()?];
    let layout = match &magic {
        b"P5" => SampleLayout::Gray,
        b"P6" => SampleLayout::Rgb,
        _ => {
            return Err(ViewerError::UnsupportedFormat(format!(
                "PNM variant {:?} has no random-access raster",
                String::from_utf8_lossy(&magic)
            )))
        }
    };

    let width = bytes.number()?;
    let height = bytes.number()?;
    let max_value = bytes.number()?;
    // Exactly one whitespace byte separates the header from the raster,
    // and `number` has already consumed it.

    if width == 0 || height == 0 {
        return Err(ViewerError::InvalidDimensions { width, height });
    }
    if max_value == 0 || max_value > u16::MAX as u32 {
        return Err(ViewerError::Decode(format!("PNM maxval {max_value} out of range")));
    }

    Ok(PnmHeader {
        layout,
        width,
        height,
        max_value: max_value as u16,
        data_offset: bytes.consumed,
    })
}

struct HeaderBytes<R> {
    inner: R,
    consumed: u64,
}

impl<R: Read> HeaderBytes<R> {
    fn new(inner: R) -> Self {
        Self { inner, consumed: 0 }
    }

    fn next(&mut self) -> Result<u8> {
        let mut b = [0u8; 1];
        self.inner.read_exact(&mut b).map_err(map_read_error)?;
        self.consumed += 1;
        Ok(b[0])
    }

    /// Decimal field, skipping leading whitespace and `#` comments.
    /// Consumes the single delimiter that ends the field.
    fn number(&mut self) -> Result<u32> {
        let mut b = self.next()?;
        loop {
            if b == b'#' {
                while b != b'\n' {
                    b = self.next()?;
                }
            } else if !b.is_ascii_whitespace() {
                break;
            }
            b = self.next()?;
        }

        let mut value: u32 = 0;
        let mut digits = 0;
        while b.is_ascii_digit() {
            value = value
                .checked_mul(10)
                .and_then(|v| v.checked_add((b - b'0') as u32))
                .ok_or_else(|| ViewerError::Decode("PNM header field overflows".into()))?;
            digits += 1;
            b = self.next()?;
        }
        if digits == 0 || !b.is_ascii_whitespace() {
            return Err(ViewerError::Decode(format!(
                "malformed PNM header near byte {}",
                self.consumed
            )));
        }
        Ok(value)
    }
}

/// Binary PNM reader that seeks straight to each row segment of a region.
pub(crate) struct PnmCodec {
    handle: SourceHandle,
    header: PnmHeader,
    scratch: Vec<u8>,
    samples: Vec<u8>,
}

impl PnmCodec {
    pub(crate) fn open(mut handle: SourceHandle) -> Result<Self> {
        handle.seek(SeekFrom::Start(0))?;
        let header = read_header(BufReader::new(&mut handle))?;

        let needed = header.data_offset + header.raster_size();
        if handle.len() < needed {
            return Err(ViewerError::Decode(format!(
                "PNM raster truncated: expected at least {needed} bytes, got {}",
                handle.len()
            )));
        }

        Ok(Self {
            handle,
            header,
            scratch: Vec::new(),
            samples: Vec::new(),
        })
    }

    fn scale_samples(&mut self, count: usize) {
        let max = self.header.max_value as u32;
        self.samples.clear();
        if self.header.bytes_per_sample() == 1 {
            if max == 255 {
                self.samples.extend_from_slice(&self.scratch[..count]);
            } else {
                self.samples.extend(
                    self.scratch[..count]
                        .iter()
                        .map(|&s| ((s as u32).min(max) * 255 / max) as u8),
                );
            }
        } else {
            self.samples.extend(
                self.scratch[..count * 2]
                    .chunks_exact(2)
                    .map(|c| ((BigEndian::read_u16(c) as u32).min(max) * 255 / max) as u8),
            );
        }
    }
}

impl RegionCodec for PnmCodec {
    fn name(&self) -> &'static str {
        "pnm"
    }

    fn metrics(&self) -> ImageMetrics {
        ImageMetrics::new(self.header.width, self.header.height)
    }

    fn decode_rows(&mut self, rect: &Rect, out: &mut PixelBuffer) -> Result<()> {
        let bpp = self.header.bytes_per_pixel() as u64;
        let row_stride = self.header.width as u64 * bpp;
        let span = rect.width() as usize;
        let row_bytes = span * bpp as usize;
        let sample_count = span * self.header.layout.channels();
        self.scratch.resize(row_bytes, 0);

        for (i, y) in (rect.top..rect.bottom).enumerate() {
            let offset = self.header.data_offset + y as u64 * row_stride + rect.left as u64 * bpp;
            self.handle.seek(SeekFrom::Start(offset))?;
            self.handle
                .read_exact(&mut self.scratch)
                .map_err(map_read_error)?;
            self.scale_samples(sample_count);
            out.write_row(i as u32, &self.samples, self.header.layout);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_with_comment() {
        let data = b"P6\n# made by hand\n3 2\n255\n";
        let header = read_header(&data[..]).unwrap();
        assert_eq!(header.layout, SampleLayout::Rgb);
        assert_eq!((header.width, header.height), (3, 2));
        assert_eq!(header.max_value, 255);
        assert_eq!(header.data_offset, data.len() as u64);
    }

    #[test]
    fn sixteen_bit_samples() {
        let header = read_header(&b"P5 4 4 65535\n"[..]).unwrap();
        assert_eq!(header.bytes_per_sample(), 2);
        assert_eq!(header.raster_size(), 32);
    }

    #[test]
    fn ascii_variant_rejected() {
        let err = read_header(&b"P2 4 4 255\n"[..]).unwrap_err();
        assert!(matches!(err, ViewerError::UnsupportedFormat(_)));
    }

    #[test]
    fn missing_dimensions_rejected() {
        assert!(read_header(&b"P5 4\n"[..]).is_err());
    }
}
