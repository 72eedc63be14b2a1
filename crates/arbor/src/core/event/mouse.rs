//! Mouse input primitives.

/// Mouse button codes.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Button {
    /// Left mouse button.
    Left,
    /// Middle mouse button.
    Middle,
    /// Right mouse button.
    Right,
}

/// The set of buttons held during a motion event.
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Buttons {
    /// Left button held.
    pub left: bool,
    /// Middle button held.
    pub middle: bool,
    /// Right button held.
    pub right: bool,
}

impl Buttons {
    /// No buttons held.
    pub const NONE: Self = Self {
        left: false,
        middle: false,
        right: false,
    };

    /// Only the left button held.
    pub const LEFT: Self = Self {
        left: true,
        middle: false,
        right: false,
    };

    /// Is the button held?
    pub fn contains(&self, button: Button) -> bool {
        match button {
            Button::Left => self.left,
            Button::Middle => self.middle,
            Button::Right => self.right,
        }
    }

    /// Record a press or release.
    pub fn set(&mut self, button: Button, held: bool) {
        match button {
            Button::Left => self.left = held,
            Button::Middle => self.middle = held,
            Button::Right => self.right = held,
        }
    }
}
