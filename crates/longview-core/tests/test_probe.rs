mod common;

use image::ImageFormat;
use longview_core::io::{probe, probe_with_format, FileSource};
use longview_core::{ImageMetrics, ViewerError};

use common::{build_jpeg, build_pgm, build_png, build_ppm, memory, write_temp};

#[test]
fn test_probe_ppm_dimensions() {
    let source = memory(build_ppm(30, 90));
    assert_eq!(probe(&source).unwrap(), ImageMetrics::new(30, 90));
}

#[test]
fn test_probe_reports_format() {
    let (metrics, format) = probe_with_format(&memory(build_png(12, 40))).unwrap();
    assert_eq!(metrics, ImageMetrics::new(12, 40));
    assert_eq!(format, ImageFormat::Png);

    let (_, format) = probe_with_format(&memory(build_pgm(3, 3))).unwrap();
    assert_eq!(format, ImageFormat::Pnm);
}

#[test]
fn test_probe_jpeg_without_region_support() {
    // Bounds probing works for any format the image crate knows.
    let metrics = probe(&memory(build_jpeg(16, 48))).unwrap();
    assert_eq!(metrics, ImageMetrics::new(16, 48));
}

#[test]
fn test_probe_from_file() {
    let file = write_temp(&build_ppm(8, 200));
    let source = FileSource::open(file.path()).unwrap();
    assert_eq!(probe(&source).unwrap(), ImageMetrics::new(8, 200));
}

#[test]
fn test_probe_does_not_consume_source() {
    let source = memory(build_ppm(5, 7));
    let first = probe(&source).unwrap();
    let second = probe(&source).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_probe_unknown_bytes() {
    let source = memory(b"definitely not an image".to_vec());
    let err = probe(&source).unwrap_err();
    assert!(matches!(err, ViewerError::UnsupportedFormat(_)), "got {err:?}");
}

#[test]
fn test_probe_truncated_header() {
    let mut data = build_png(10, 10);
    data.truncate(12);
    let err = probe(&memory(data)).unwrap_err();
    assert!(matches!(err, ViewerError::UnsupportedFormat(_)), "got {err:?}");
}

#[test]
fn test_probe_empty_source() {
    let err = probe(&memory(Vec::new())).unwrap_err();
    assert!(matches!(err, ViewerError::UnsupportedFormat(_)), "got {err:?}");
}
