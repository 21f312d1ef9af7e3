use std::io::{self, Read};

use image::ImageFormat;
use tracing::{debug, warn};

use crate::error::{Result, ViewerError};
use crate::geometry::{ImageMetrics, Rect};
use crate::io::png_stream::PngCodec;
use crate::io::pnm::PnmCodec;
use crate::io::source::ImageSource;
use crate::pixel::{PixelBuffer, PixelFormat};

/// One region decode: where to read, and optionally which buffer to
/// repopulate instead of allocating a new one.
#[derive(Debug)]
pub struct DecodeRequest {
    pub rect: Rect,
    pub reuse: Option<PixelBuffer>,
}

impl DecodeRequest {
    pub fn new(rect: Rect) -> Self {
        Self { rect, reuse: None }
    }

    pub fn reusing(rect: Rect, buffer: Option<PixelBuffer>) -> Self {
        Self {
            rect,
            reuse: buffer,
        }
    }
}

/// Counters describing how decodes used memory.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DecodeStats {
    pub decodes: u64,
    /// Decodes that had to allocate a fresh buffer.
    pub allocations: u64,
    /// Decodes that repopulated the buffer handed in with the request.
    pub reuses: u64,
}

/// A codec that can produce an arbitrary rectangle of its image.
pub(crate) trait RegionCodec {
    fn name(&self) -> &'static str;
    fn metrics(&self) -> ImageMetrics;
    /// Fill `out`, already shaped to `rect`, with the pixels of `rect`.
    fn decode_rows(&mut self, rect: &Rect, out: &mut PixelBuffer) -> Result<()>;
}

/// Decodes rectangles of one image into reusable pixel buffers.
///
/// Takes `&mut self` for every decode: exactly one decode can be in flight.
pub struct RegionDecoder {
    codec: Box<dyn RegionCodec>,
    format: PixelFormat,
    stats: DecodeStats,
}

impl RegionDecoder {
    /// Build a decoder over its own handle to `source`.
    pub fn open(source: &dyn ImageSource, format: PixelFormat) -> Result<Self> {
        let mut handle = source.open_handle()?;
        let mut signature = [0u8; 16];
        let n = read_prefix(&mut handle, &mut signature)?;

        let codec: Box<dyn RegionCodec> = match image::guess_format(&signature[..n]) {
            Ok(ImageFormat::Png) => Box::new(PngCodec::open(handle)?),
            Ok(ImageFormat::Pnm) => Box::new(PnmCodec::open(handle)?),
            Ok(other) => {
                return Err(ViewerError::UnsupportedFormat(format!(
                    "{}: no region decoder for {other:?}",
                    source.describe()
                )))
            }
            Err(e) => {
                return Err(ViewerError::UnsupportedFormat(format!(
                    "{}: {e}",
                    source.describe()
                )))
            }
        };

        let metrics = codec.metrics();
        debug!(
            codec = codec.name(),
            width = metrics.width,
            height = metrics.height,
            %format,
            "Region decoder ready"
        );
        Ok(Self {
            codec,
            format,
            stats: DecodeStats::default(),
        })
    }

    pub fn metrics(&self) -> ImageMetrics {
        self.codec.metrics()
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub fn stats(&self) -> DecodeStats {
        self.stats
    }

    /// Decode exactly `request.rect`.
    ///
    /// A reuse buffer of the same format and sufficient capacity is
    /// repopulated in place; anything else is dropped and replaced.
    pub fn decode_region(&mut self, request: DecodeRequest) -> Result<PixelBuffer> {
        let DecodeRequest { rect, reuse } = request;
        let mut slot = reuse;
        self.decode_into(rect, &mut slot)?;
        slot.ok_or_else(|| ViewerError::Decode(format!("no buffer produced for {rect}")))
    }

    /// Decode `rect` into the buffer held in `slot`, replacing it only when
    /// it cannot hold the region.
    ///
    /// On error the slot keeps its allocation, so a later decode can still
    /// reuse it; its pixels are unspecified.
    pub fn decode_into(&mut self, rect: Rect, slot: &mut Option<PixelBuffer>) -> Result<()> {
        let metrics = self.codec.metrics();
        if !rect.is_within(metrics.width, metrics.height) {
            warn!(%rect, width = metrics.width, height = metrics.height, "Region request outside image");
            return Err(ViewerError::RegionOutOfBounds {
                rect,
                width: metrics.width,
                height: metrics.height,
            });
        }

        let width = rect.width() as u32;
        let height = rect.height() as u32;
        let buffer = match slot.take() {
            Some(mut buf) if buf.can_hold(width, height, self.format) => {
                buf.reshape(width, height);
                self.stats.reuses += 1;
                buf
            }
            _ => {
                self.stats.allocations += 1;
                PixelBuffer::new(width, height, self.format)
            }
        };
        let buffer = slot.insert(buffer);

        self.codec.decode_rows(&rect, buffer)?;
        self.stats.decodes += 1;
        debug!(%rect, codec = self.codec.name(), "Region decoded");
        Ok(())
    }
}

fn read_prefix(reader: &mut impl Read, buf: &mut [u8]) -> Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..])? {
            0 => break,
            n => filled += n,
        }
    }
    Ok(filled)
}

/// Short reads inside a raster mean the data is corrupt, not that the
/// device failed.
pub(crate) fn map_read_error(err: io::Error) -> ViewerError {
    if err.kind() == io::ErrorKind::UnexpectedEof {
        ViewerError::Decode("unexpected end of image data".into())
    } else {
        ViewerError::Io(err)
    }
}
