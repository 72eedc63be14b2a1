//! Geometry primitives used across arbor.

/// Error types for geometry operations.
mod error;
/// Width/height size type.
mod expanse;
/// Signed point helpers.
mod point;
/// Rectangle operations and anchors.
mod rect;

pub use error::{Error, Result};
pub use expanse::Expanse;
pub use point::Point;
pub use rect::{Anchor, Rect};
