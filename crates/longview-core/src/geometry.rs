use std::fmt;

/// Pixel dimensions of a source image, read once by the probe.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImageMetrics {
    pub width: u32,
    pub height: u32,
}

impl ImageMetrics {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// The whole image as a rectangle.
    pub fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.width as i32, self.height as i32)
    }
}

/// A rectangle in image-space pixel coordinates, `right`/`bottom` exclusive.
///
/// Coordinates are signed so a translation can temporarily move the
/// rectangle past the image origin before it is clamped back.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    pub fn is_empty(&self) -> bool {
        self.width() <= 0 || self.height() <= 0
    }

    /// Shift all four edges by `(dx, dy)`, saturating at the `i32` range.
    pub fn offset(&mut self, dx: i32, dy: i32) {
        self.left = self.left.saturating_add(dx);
        self.right = self.right.saturating_add(dx);
        self.top = self.top.saturating_add(dy);
        self.bottom = self.bottom.saturating_add(dy);
    }

    /// Move the top-left corner to `(x, y)`, keeping the size.
    pub fn move_to(&mut self, x: i32, y: i32) {
        let (w, h) = (self.width(), self.height());
        *self = Rect::new(x, y, x.saturating_add(w), y.saturating_add(h));
    }

    /// `true` when `0 <= left <= right <= width` and likewise vertically.
    pub fn is_within(&self, width: u32, height: u32) -> bool {
        0 <= self.left
            && self.left <= self.right
            && self.right <= width as i32
            && 0 <= self.top
            && self.top <= self.bottom
            && self.bottom <= height as i32
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{},{} {}x{}]",
            self.left,
            self.top,
            self.width(),
            self.height()
        )
    }
}
