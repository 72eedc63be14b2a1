//! Keyboard input primitives.
use std::{fmt, ops::Add, str::FromStr};

use crate::error::{Error, Result};

/// Modifier key state.
#[derive(Default, Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Mods {
    /// Shift is active.
    pub shift: bool,
    /// Control is active.
    pub ctrl: bool,
    /// Alt is active.
    pub alt: bool,
}

impl Mods {
    /// Is any modifier active?
    pub fn any(&self) -> bool {
        self.shift || self.ctrl || self.alt
    }
}

/// No modifiers pressed.
#[allow(non_upper_case_globals)]
pub const Empty: Mods = Mods {
    shift: false,
    ctrl: false,
    alt: false,
};

/// Shift-only modifier state.
#[allow(non_upper_case_globals)]
pub const Shift: Mods = Mods {
    shift: true,
    ctrl: false,
    alt: false,
};

/// Control-only modifier state.
#[allow(non_upper_case_globals)]
pub const Ctrl: Mods = Mods {
    shift: false,
    ctrl: true,
    alt: false,
};

/// Alt-only modifier state.
#[allow(non_upper_case_globals)]
pub const Alt: Mods = Mods {
    shift: false,
    ctrl: false,
    alt: true,
};

/// Logical key codes.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum KeyCode {
    /// A printable character. Space is `Char(' ')`.
    Char(char),
    /// Function key F1 through F15.
    F(u8),
    /// Up arrow.
    Up,
    /// Down arrow.
    Down,
    /// Left arrow.
    Left,
    /// Right arrow.
    Right,
    /// Enter/return.
    Enter,
    /// Escape.
    Esc,
    /// Backspace.
    Backspace,
    /// Tab.
    Tab,
}

impl From<char> for KeyCode {
    fn from(c: char) -> Self {
        Self::Char(c)
    }
}

/// A key press with modifiers.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub struct Key {
    /// Active modifiers.
    pub mods: Mods,
    /// Key code.
    pub key: KeyCode,
}

impl Key {
    /// A key with no modifiers.
    pub fn new(key: impl Into<KeyCode>) -> Self {
        Self {
            mods: Empty,
            key: key.into(),
        }
    }
}

impl From<KeyCode> for Key {
    fn from(key: KeyCode) -> Self {
        Self { mods: Empty, key }
    }
}

impl From<char> for Key {
    fn from(c: char) -> Self {
        Self::new(c)
    }
}

impl Add<Self> for Mods {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            shift: self.shift || other.shift,
            ctrl: self.ctrl || other.ctrl,
            alt: self.alt || other.alt,
        }
    }
}

impl Add<KeyCode> for Mods {
    type Output = Key;

    fn add(self, key: KeyCode) -> Key {
        Key { mods: self, key }
    }
}

impl Add<char> for Mods {
    type Output = Key;

    fn add(self, c: char) -> Key {
        Key {
            mods: self,
            key: c.into(),
        }
    }
}

/// Parse a bare key name: a single character, `space`, `enter`, `esc`,
/// `tab`, `backspace`, an arrow name or `f1`..`f15`.
fn parse_code(name: &str) -> Result<KeyCode> {
    let mut chars = name.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return Ok(KeyCode::Char(c));
    }
    let code = match name {
        "space" => KeyCode::Char(' '),
        "enter" | "return" => KeyCode::Enter,
        "esc" | "escape" => KeyCode::Esc,
        "tab" => KeyCode::Tab,
        "backspace" => KeyCode::Backspace,
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        _ => {
            let n = name
                .strip_prefix('f')
                .and_then(|n| n.parse::<u8>().ok())
                .filter(|n| (1..=15).contains(n))
                .ok_or_else(|| Error::Parse(format!("unknown key: {name:?}")))?;
            KeyCode::F(n)
        }
    };
    Ok(code)
}

/// Keys are written as `+`-separated modifiers followed by a key name, for
/// example `esc`, `q`, `ctrl+q` or `shift+f2`.
impl FromStr for Key {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim().to_lowercase();
        let (mods, name) = match s.rsplit_once('+') {
            // A bare "+" or a trailing "+" names the plus key itself.
            Some((mods, "")) => (mods.strip_suffix('+').unwrap_or(mods), "+"),
            Some((mods, name)) => (mods, name),
            None => ("", s.as_str()),
        };
        let mut key = Key::from(parse_code(name)?);
        for m in mods.split('+').filter(|m| !m.is_empty()) {
            match m {
                "shift" => key.mods.shift = true,
                "ctrl" => key.mods.ctrl = true,
                "alt" => key.mods.alt = true,
                _ => return Err(Error::Parse(format!("unknown modifier: {m:?}"))),
            }
        }
        Ok(key)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.mods.ctrl {
            f.write_str("ctrl+")?;
        }
        if self.mods.alt {
            f.write_str("alt+")?;
        }
        if self.mods.shift {
            f.write_str("shift+")?;
        }
        match self.key {
            KeyCode::Char(' ') => f.write_str("space"),
            KeyCode::Char(c) => write!(f, "{c}"),
            KeyCode::F(n) => write!(f, "f{n}"),
            KeyCode::Up => f.write_str("up"),
            KeyCode::Down => f.write_str("down"),
            KeyCode::Left => f.write_str("left"),
            KeyCode::Right => f.write_str("right"),
            KeyCode::Enter => f.write_str("enter"),
            KeyCode::Esc => f.write_str("esc"),
            KeyCode::Backspace => f.write_str("backspace"),
            KeyCode::Tab => f.write_str("tab"),
        }
    }
}
