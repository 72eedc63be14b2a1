/// Keyboard input types.
pub mod key;
/// Mouse input types.
pub mod mouse;

use crate::geom::{Expanse, Point};

/// An input event delivered to the scene by the host loop. Mouse coordinates
/// are in screen space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// A key was pressed.
    KeyDown(key::Key),
    /// A key was released.
    KeyUp(key::Key),
    /// The pointer moved from `start` to `end`.
    MouseMove {
        /// Position before the move.
        start: Point,
        /// Position after the move.
        end: Point,
        /// Buttons held during the move.
        buttons: mouse::Buttons,
    },
    /// A mouse button was pressed.
    MouseDown {
        /// Pointer position.
        pos: Point,
        /// Button pressed.
        button: mouse::Button,
    },
    /// A mouse button was released.
    MouseUp {
        /// Pointer position.
        pos: Point,
        /// Button released.
        button: mouse::Button,
    },
    /// The display was resized.
    Resize(Expanse),
    /// The host asked the application to quit.
    Quit,
}
