use std::io::BufReader;

use image::{ImageFormat, ImageReader};
use tracing::info;

use crate::error::{Result, ViewerError};
use crate::geometry::ImageMetrics;
use crate::io::source::ImageSource;

/// Read an image's dimensions from its header, without decoding pixels.
pub fn probe(source: &dyn ImageSource) -> Result<ImageMetrics> {
    probe_with_format(source).map(|(metrics, _)| metrics)
}

/// Like [`probe`], also reporting the container format that was detected.
pub fn probe_with_format(source: &dyn ImageSource) -> Result<(ImageMetrics, ImageFormat)> {
    let handle = source.open_handle()?;
    let reader = ImageReader::new(BufReader::new(handle)).with_guessed_format()?;

    let format = reader.format().ok_or_else(|| {
        ViewerError::UnsupportedFormat(format!(
            "{}: unrecognised image signature",
            source.describe()
        ))
    })?;

    let (width, height) = reader
        .into_dimensions()
        .map_err(|e| ViewerError::UnsupportedFormat(format!("{}: {e}", source.describe())))?;

    if width == 0 || height == 0 {
        return Err(ViewerError::InvalidDimensions { width, height });
    }

    info!(
        source = %source.describe(),
        format = ?format,
        width,
        height,
        "Image bounds probed"
    );
    Ok((ImageMetrics::new(width, height), format))
}
