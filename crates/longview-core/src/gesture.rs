pub mod controller;
pub mod fling;
pub mod recognizer;

pub use controller::{Gesture, GestureController, GestureResponse};
pub use fling::FlingSimulator;
pub use recognizer::{GestureRecognizer, PointerEvent, PointerKind};
