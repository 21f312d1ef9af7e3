use std::time::Duration;

use tracing::{debug, info};

use crate::config::ViewerConfig;
use crate::error::{Result, ViewerError};
use crate::geometry::ImageMetrics;
use crate::gesture::{Gesture, GestureController, GestureRecognizer, GestureResponse, PointerEvent};
use crate::io::{probe, DecodeStats, ImageSource, RegionDecoder};
use crate::pixel::PixelBuffer;
use crate::render::{Renderer, Surface};
use crate::viewport::Viewport;

/// A long-image viewer: the state a host widget drives through its image,
/// layout, input, animation and draw callbacks.
///
/// All calls happen on one thread. `draw` decodes the visible region and
/// renders it before returning, and the single pixel buffer is only handed
/// back to the decoder on the following draw.
pub struct LongImageView {
    config: ViewerConfig,
    metrics: Option<ImageMetrics>,
    decoder: Option<RegionDecoder>,
    view_size: Option<(u32, u32)>,
    viewport: Option<Viewport>,
    gestures: GestureController,
    recognizer: GestureRecognizer,
    renderer: Renderer,
    buffer: Option<PixelBuffer>,
    buffer_drawn: bool,
    layout_requested: bool,
    redraw_requested: bool,
}

impl LongImageView {
    pub fn new(config: ViewerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            gestures: GestureController::new(config.pan_mode, config.fling.clone()),
            recognizer: GestureRecognizer::new(config.gestures.clone()),
            config,
            metrics: None,
            decoder: None,
            view_size: None,
            viewport: None,
            renderer: Renderer::new(),
            buffer: None,
            buffer_drawn: false,
            layout_requested: false,
            redraw_requested: false,
        })
    }

    /// Load a new image: probe its bounds, then open a region decoder on a
    /// separate handle. Raises a layout request; the viewport is rebuilt by
    /// the next [`on_layout`](Self::on_layout).
    pub fn set_image(&mut self, source: &dyn ImageSource) -> Result<ImageMetrics> {
        let metrics = probe(source)?;
        let decoder = RegionDecoder::open(source, self.config.pixel_format)?;
        if decoder.metrics() != metrics {
            return Err(ViewerError::Decode(format!(
                "{}: header reports {}x{} but raster is {}x{}",
                source.describe(),
                metrics.width,
                metrics.height,
                decoder.metrics().width,
                decoder.metrics().height
            )));
        }

        info!(
            source = %source.describe(),
            width = metrics.width,
            height = metrics.height,
            "Image set"
        );
        self.gestures.on_down();
        self.metrics = Some(metrics);
        self.decoder = Some(decoder);
        self.buffer_drawn = false;
        self.viewport = None;
        self.layout_requested = true;
        Ok(metrics)
    }

    /// Whether the host should run a layout pass. Clears the request.
    pub fn take_layout_request(&mut self) -> bool {
        std::mem::take(&mut self.layout_requested)
    }

    /// The host resolved the view size. Resets the viewport to the base
    /// scale at the image origin once an image is set.
    pub fn on_layout(&mut self, view_width: u32, view_height: u32) -> Result<()> {
        self.view_size = Some((view_width, view_height));
        let Some(metrics) = self.metrics else {
            debug!(view_width, view_height, "Layout before any image; deferring viewport");
            return Ok(());
        };

        let viewport = Viewport::initialize_layout(
            view_width,
            view_height,
            metrics,
            self.config.max_scale_multiple,
            self.config.initial_window,
        )?;
        self.viewport = Some(viewport);
        self.redraw_requested = true;
        Ok(())
    }

    /// Image metrics and view size are both known.
    pub fn is_ready(&self) -> bool {
        self.viewport.is_some() && self.decoder.is_some()
    }

    /// Decode the visible region and draw it.
    ///
    /// Returns `Ok(false)` without touching the surface until the viewer
    /// is ready.
    pub fn draw(&mut self, surface: &mut dyn Surface) -> Result<bool> {
        let (Some(viewport), Some(decoder)) = (self.viewport.as_ref(), self.decoder.as_mut()) else {
            return Ok(false);
        };

        let rect = viewport.rect();
        let metrics = viewport.image();
        debug_assert!(
            rect.is_within(metrics.width, metrics.height),
            "viewport rect {rect} outside {}x{}",
            metrics.width,
            metrics.height
        );

        // A failed decode leaves its allocation in `self.buffer`.
        self.buffer_drawn = false;
        decoder.decode_into(rect, &mut self.buffer)?;
        if let Some(buffer) = self.buffer.as_ref() {
            self.renderer.draw(surface, buffer, viewport.current_scale())?;
        }
        self.buffer_drawn = true;
        self.redraw_requested = false;
        Ok(true)
    }

    /// Route a raw pointer event through the recognizer.
    pub fn on_pointer(&mut self, event: PointerEvent) -> GestureResponse {
        let mut response = GestureResponse {
            consumed: true,
            redraw: false,
        };
        for gesture in self.recognizer.on_event(event) {
            response.redraw |= self.on_gesture(gesture).redraw;
        }
        response
    }

    /// Apply an already-recognised gesture.
    pub fn on_gesture(&mut self, gesture: Gesture) -> GestureResponse {
        let Some(viewport) = self.viewport.as_mut() else {
            if gesture == Gesture::Down {
                self.gestures.on_down();
            }
            return GestureResponse {
                consumed: true,
                redraw: false,
            };
        };

        let response = self.gestures.handle(viewport, gesture);
        self.redraw_requested |= response.redraw;
        response
    }

    /// Per-frame animation tick. Returns whether the frame needs a redraw.
    pub fn on_animation_frame(&mut self, dt: Duration) -> bool {
        let Some(viewport) = self.viewport.as_mut() else {
            return false;
        };
        let redraw = self.gestures.on_frame(viewport, dt);
        self.redraw_requested |= redraw;
        redraw
    }

    /// A fling is still running; keep the animation driver ticking.
    pub fn is_animating(&self) -> bool {
        self.gestures.is_flinging()
    }

    /// Whether anything changed since the last draw. Clears the request.
    pub fn take_redraw_request(&mut self) -> bool {
        std::mem::take(&mut self.redraw_requested)
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn metrics(&self) -> Option<ImageMetrics> {
        self.metrics
    }

    pub fn view_size(&self) -> Option<(u32, u32)> {
        self.view_size
    }

    pub fn viewport(&self) -> Option<&Viewport> {
        self.viewport.as_ref()
    }

    /// The region drawn by the last `draw`, unless that draw failed.
    pub fn last_buffer(&self) -> Option<&PixelBuffer> {
        self.buffer.as_ref().filter(|_| self.buffer_drawn)
    }

    pub fn decode_stats(&self) -> DecodeStats {
        self.decoder.as_ref().map(RegionDecoder::stats).unwrap_or_default()
    }

    pub fn frames_drawn(&self) -> u64 {
        self.renderer.frames()
    }
}
