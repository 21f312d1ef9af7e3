use longview_core::config::{FlingConfig, GestureConfig, InitialWindow, PanMode};
use longview_core::pixel::PixelFormat;
use longview_core::{ViewerConfig, ViewerError};

#[test]
fn test_defaults() {
    let config = ViewerConfig::default();
    assert_eq!(config.max_scale_multiple, 3);
    assert_eq!(config.pan_mode, PanMode::Raw);
    assert_eq!(config.initial_window, InitialWindow::ViewSized);
    assert_eq!(config.pixel_format, PixelFormat::Rgb565);
    assert_eq!(config.gestures.touch_slop, 8.0);
    assert_eq!(config.gestures.max_fling_velocity, 8000.0);
    assert!(config.validate().is_ok());
}

#[test]
fn test_display_names() {
    assert_eq!(PanMode::Raw.to_string(), "Raw");
    assert_eq!(PanMode::ScaleCorrected.to_string(), "Scale Corrected");
    assert_eq!(InitialWindow::ViewSized.to_string(), "View Sized");
    assert_eq!(InitialWindow::ScaleFitted.to_string(), "Scale Fitted");
    assert_eq!(PixelFormat::Rgb565.to_string(), "RGB565");
    assert_eq!(PixelFormat::Rgba8.to_string(), "RGBA8888");
}

#[test]
fn test_partial_toml_fills_defaults() {
    let config: ViewerConfig = toml::from_str(
        r#"
        max_scale_multiple = 5
        pan_mode = "ScaleCorrected"

        [fling]
        friction = 2.5
        "#,
    )
    .unwrap();
    assert_eq!(config.max_scale_multiple, 5);
    assert_eq!(config.pan_mode, PanMode::ScaleCorrected);
    assert_eq!(config.pixel_format, PixelFormat::Rgb565);
    assert_eq!(config.fling.friction, 2.5);
    assert_eq!(config.fling.rest_velocity, FlingConfig::default().rest_velocity);
    assert_eq!(config.gestures, GestureConfig::default());
}

#[test]
fn test_empty_toml_is_default() {
    let config: ViewerConfig = toml::from_str("").unwrap();
    assert_eq!(config, ViewerConfig::default());
}

#[test]
fn test_toml_survives_save_and_load() {
    let config = ViewerConfig {
        initial_window: InitialWindow::ScaleFitted,
        pixel_format: PixelFormat::Rgba8,
        ..ViewerConfig::default()
    };
    let text = toml::to_string_pretty(&config).unwrap();
    let back: ViewerConfig = toml::from_str(&text).unwrap();
    assert_eq!(back, config);
}

#[test]
fn test_json_config() {
    let config: ViewerConfig = serde_json::from_str(
        r#"{ "pixel_format": "Rgba8", "gestures": { "double_tap_timeout_ms": 250 } }"#,
    )
    .unwrap();
    assert_eq!(config.pixel_format, PixelFormat::Rgba8);
    assert_eq!(config.gestures.double_tap_timeout_ms, 250);
    assert_eq!(config.gestures.touch_slop, 8.0);
}

#[test]
fn test_unknown_pan_mode_rejected() {
    let result: Result<ViewerConfig, _> = toml::from_str(r#"pan_mode = "Sideways""#);
    assert!(result.is_err());
}

#[test]
fn test_validate_rejects_bad_values() {
    let cases = [
        ViewerConfig {
            max_scale_multiple: 0,
            ..ViewerConfig::default()
        },
        ViewerConfig {
            fling: FlingConfig {
                friction: 0.0,
                ..FlingConfig::default()
            },
            ..ViewerConfig::default()
        },
        ViewerConfig {
            fling: FlingConfig {
                friction: f32::INFINITY,
                ..FlingConfig::default()
            },
            ..ViewerConfig::default()
        },
        ViewerConfig {
            fling: FlingConfig {
                rest_velocity: -1.0,
                ..FlingConfig::default()
            },
            ..ViewerConfig::default()
        },
        ViewerConfig {
            gestures: GestureConfig {
                min_fling_velocity: 9000.0,
                ..GestureConfig::default()
            },
            ..ViewerConfig::default()
        },
        ViewerConfig {
            gestures: GestureConfig {
                max_fling_velocity: f32::NAN,
                ..GestureConfig::default()
            },
            ..ViewerConfig::default()
        },
        ViewerConfig {
            gestures: GestureConfig {
                min_fling_velocity: -5.0,
                max_fling_velocity: -1.0,
                ..GestureConfig::default()
            },
            ..ViewerConfig::default()
        },
        ViewerConfig {
            gestures: GestureConfig {
                touch_slop: f32::NAN,
                ..GestureConfig::default()
            },
            ..ViewerConfig::default()
        },
        ViewerConfig {
            gestures: GestureConfig {
                double_tap_slop: f32::INFINITY,
                ..GestureConfig::default()
            },
            ..ViewerConfig::default()
        },
        ViewerConfig {
            fling: FlingConfig {
                rest_velocity: f32::NAN,
                ..FlingConfig::default()
            },
            ..ViewerConfig::default()
        },
    ];
    for config in cases {
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ViewerError::Config(_)), "{err}");
    }
}

#[test]
fn test_fling_limits_from_toml_are_checked() {
    let config: ViewerConfig = toml::from_str(
        r#"
        [gestures]
        min_fling_velocity = -5.0
        max_fling_velocity = -1.0
        "#,
    )
    .unwrap();
    assert!(matches!(config.validate(), Err(ViewerError::Config(_))));
    assert!(longview_core::LongImageView::new(config).is_err());
}
