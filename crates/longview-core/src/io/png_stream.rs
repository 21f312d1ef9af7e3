use std::io::{BufReader, Seek, SeekFrom};

use png::{ColorType, Decoder, Transformations};

use crate::error::{Result, ViewerError};
use crate::geometry::{ImageMetrics, Rect};
use crate::io::region::RegionCodec;
use crate::io::source::SourceHandle;
use crate::pixel::{PixelBuffer, SampleLayout};

/// Row-streaming PNG reader.
///
/// PNG rows are deflate-compressed as one stream, so a region decode
/// re-inflates from the top of the file, discarding rows above the region
/// and stopping right after its last row. Only one source row is held at a
/// time.
pub(crate) struct PngCodec {
    handle: SourceHandle,
    metrics: ImageMetrics,
}

impl PngCodec {
    pub(crate) fn open(mut handle: SourceHandle) -> Result<Self> {
        handle.seek(SeekFrom::Start(0))?;
        let reader = Decoder::new(BufReader::new(&mut handle))
            .read_info()
            .map_err(map_png_error)?;
        let info = reader.info();

        if info.interlaced {
            return Err(ViewerError::UnsupportedFormat(
                "interlaced PNG cannot be streamed by row".into(),
            ));
        }
        let metrics = ImageMetrics::new(info.width, info.height);
        drop(reader);

        Ok(Self { handle, metrics })
    }
}

impl RegionCodec for PngCodec {
    fn name(&self) -> &'static str {
        "png"
    }

    fn metrics(&self) -> ImageMetrics {
        self.metrics
    }

    fn decode_rows(&mut self, rect: &Rect, out: &mut PixelBuffer) -> Result<()> {
        if rect.is_empty() {
            return Ok(());
        }

        self.handle.seek(SeekFrom::Start(0))?;
        let mut decoder = Decoder::new(BufReader::new(&mut self.handle));
        decoder.set_transformations(Transformations::normalize_to_color8());
        let mut reader = decoder.read_info().map_err(map_png_error)?;

        let layout = match reader.output_color_type().0 {
            ColorType::Grayscale => SampleLayout::Gray,
            ColorType::GrayscaleAlpha => SampleLayout::GrayAlpha,
            ColorType::Rgb | ColorType::Indexed => SampleLayout::Rgb,
            ColorType::Rgba => SampleLayout::Rgba,
        };
        let channels = layout.channels();
        let start = rect.left as usize * channels;
        let end = rect.right as usize * channels;

        let mut y: i32 = 0;
        while y < rect.bottom {
            let row = reader.next_row().map_err(map_png_error)?.ok_or_else(|| {
                ViewerError::Decode(format!("PNG stream ended at row {y}, before {}", rect.bottom))
            })?;
            if y >= rect.top {
                out.write_row((y - rect.top) as u32, &row.data()[start..end], layout);
            }
            y += 1;
        }
        Ok(())
    }
}

fn map_png_error(err: png::DecodingError) -> ViewerError {
    match err {
        png::DecodingError::IoError(e) if e.kind() != std::io::ErrorKind::UnexpectedEof => {
            ViewerError::Io(e)
        }
        other => ViewerError::Decode(other.to_string()),
    }
}
