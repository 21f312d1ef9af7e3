pub mod config;
pub mod consts;
pub mod error;
pub mod geometry;
pub mod gesture;
pub mod io;
pub mod pixel;
pub mod render;
pub mod view;
pub mod viewport;

pub use config::ViewerConfig;
pub use error::{Result, ViewerError};
pub use geometry::{ImageMetrics, Rect};
pub use view::LongImageView;
pub use viewport::Viewport;
