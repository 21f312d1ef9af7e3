use tracing::debug;

use crate::config::InitialWindow;
use crate::error::{Result, ViewerError};
use crate::geometry::{ImageMetrics, Rect};

/// The visible window onto the image, in image-space pixels, and the scale
/// it is drawn at.
///
/// Every mutating method leaves the viewport satisfying:
/// - `0 <= left <= right <= image width` (and likewise vertically);
/// - `base_scale <= current_scale <= base_scale * max_scale_multiple`.
#[derive(Clone, Debug, PartialEq)]
pub struct Viewport {
    rect: Rect,
    current_scale: f32,
    base_scale: f32,
    max_scale_multiple: u32,
    view_width: u32,
    view_height: u32,
    image: ImageMetrics,
}

impl Viewport {
    /// Set up the viewport once both the view and image sizes are known.
    ///
    /// The base scale makes the image width fill the view width.
    pub fn initialize_layout(
        view_width: u32,
        view_height: u32,
        image: ImageMetrics,
        max_scale_multiple: u32,
        initial: InitialWindow,
    ) -> Result<Self> {
        if view_width == 0 || view_height == 0 {
            return Err(ViewerError::InvalidDimensions {
                width: view_width,
                height: view_height,
            });
        }
        if image.width == 0 || image.height == 0 {
            return Err(ViewerError::InvalidDimensions {
                width: image.width,
                height: image.height,
            });
        }

        let base_scale = view_width as f32 / image.width as f32;
        let width = match initial {
            InitialWindow::ViewSized => view_width as i32,
            InitialWindow::ScaleFitted => extent(view_width, base_scale),
        };
        let height = extent(view_height, base_scale);

        let mut viewport = Self {
            rect: Rect::new(0, 0, width, height),
            current_scale: base_scale,
            base_scale,
            max_scale_multiple: max_scale_multiple.max(1),
            view_width,
            view_height,
            image,
        };
        viewport.clamp_to_bounds();
        debug!(
            view_width,
            view_height,
            base_scale,
            rect = %viewport.rect,
            "Viewport laid out"
        );
        Ok(viewport)
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn current_scale(&self) -> f32 {
        self.current_scale
    }

    pub fn base_scale(&self) -> f32 {
        self.base_scale
    }

    pub fn max_scale(&self) -> f32 {
        self.base_scale * self.max_scale_multiple as f32
    }

    pub fn max_scale_multiple(&self) -> u32 {
        self.max_scale_multiple
    }

    pub fn view_size(&self) -> (u32, u32) {
        (self.view_width, self.view_height)
    }

    pub fn image(&self) -> ImageMetrics {
        self.image
    }

    /// Offset the window by an image-space delta, then clamp.
    ///
    /// Deltas are limited to the image extent first: any larger move ends
    /// against the same edge, and the edges never leave the `i32` range.
    pub fn translate(&mut self, dx: i32, dy: i32) {
        let (iw, ih) = (self.image.width as i32, self.image.height as i32);
        self.rect.offset(dx.clamp(-iw, iw), dy.clamp(-ih, ih));
        self.clamp_to_bounds();
    }

    /// Move the window's top-left corner, keeping its size, then clamp.
    pub fn set_position(&mut self, x: i32, y: i32) {
        let (iw, ih) = (self.image.width as i32, self.image.height as i32);
        self.rect.move_to(x.clamp(-iw, iw), y.clamp(-ih, ih));
        self.clamp_to_bounds();
    }

    /// Change the zoom, keeping the top-left corner fixed.
    ///
    /// `new_scale` is clamped to `[base_scale, max_scale]`; a NaN request
    /// leaves the scale unchanged.
    pub fn set_scale(&mut self, new_scale: f32) {
        if !new_scale.is_nan() {
            self.current_scale = new_scale.clamp(self.base_scale, self.max_scale());
        }
        self.rect.right = self
            .rect
            .left
            .saturating_add(extent(self.view_width, self.current_scale));
        self.rect.bottom = self
            .rect
            .top
            .saturating_add(extent(self.view_height, self.current_scale));
        self.clamp_to_bounds();
    }

    /// Zoomed in at all: go back to the base scale. Otherwise zoom to the max.
    pub fn toggle_zoom(&mut self) {
        let target = if self.current_scale > self.base_scale {
            self.base_scale
        } else {
            self.max_scale()
        };
        self.set_scale(target);
    }

    /// Slide the window back inside the image without resizing it.
    ///
    /// A window wider (or taller) than the image is the one case that cannot
    /// keep its size; it is pinned to the full image extent on that axis.
    pub fn clamp_to_bounds(&mut self) {
        let r = &mut self.rect;
        let (w, h) = (r.width(), r.height());
        let (iw, ih) = (self.image.width as i32, self.image.height as i32);

        if r.left < 0 {
            r.left = 0;
            r.right = w;
        }
        if r.right > iw {
            r.right = iw;
            r.left = iw - w;
        }
        if r.top < 0 {
            r.top = 0;
            r.bottom = h;
        }
        if r.bottom > ih {
            r.bottom = ih;
            r.top = ih - h;
        }

        // Only reachable when the window is larger than the image.
        r.left = r.left.max(0);
        r.top = r.top.max(0);
    }

    /// Largest top-left corner a fling may reach at the current scale:
    /// `image extent - view extent / current_scale` per axis, floored at 0.
    pub fn scroll_limits(&self) -> (i32, i32) {
        let max_x = self.image.width as i32 - extent(self.view_width, self.current_scale);
        let max_y = self.image.height as i32 - extent(self.view_height, self.current_scale);
        (max_x.max(0), max_y.max(0))
    }
}

/// Image-space pixels covered by `view` screen pixels at `scale`.
fn extent(view: u32, scale: f32) -> i32 {
    ((view as f64 / scale as f64).round() as i32).max(1)
}
