use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// An RGBA color with straight (non-premultiplied) alpha.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel, 0 is fully transparent.
    pub a: u8,
}

impl Color {
    /// Fully transparent black. Display surfaces are cleared to this before
    /// each refresh.
    pub const CLEAR: Self = Self::rgba(0, 0, 0, 0);
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    /// An opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// A color with an explicit alpha.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// An opaque grey.
    pub const fn grey(v: u8) -> Self {
        Self::rgb(v, v, v)
    }

    /// The same color with a different alpha.
    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// Composite `self` over `dst` (source-over).
    pub fn over(self, dst: Self) -> Self {
        let sa = self.a as u32;
        if sa == 255 {
            return self;
        }
        if sa == 0 {
            return dst;
        }
        let da = dst.a as u32 * (255 - sa) / 255;
        let oa = sa + da;
        if oa == 0 {
            return Self::CLEAR;
        }
        let channel = |s: u8, d: u8| ((s as u32 * sa + d as u32 * da) / oa) as u8;
        Self {
            r: channel(self.r, dst.r),
            g: channel(self.g, dst.g),
            b: channel(self.b, dst.b),
            a: oa as u8,
        }
    }
}

/// Colors are written as `#rrggbb` or `#rrggbbaa`.
impl FromStr for Color {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        let bad = || Error::Parse(format!("invalid color: {s:?}"));
        if !(hex.len() == 6 || hex.len() == 8) || !hex.is_ascii() {
            return Err(bad());
        }
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| bad());
        let a = if hex.len() == 8 { byte(6)? } else { 255 };
        Ok(Self::rgba(byte(0)?, byte(2)?, byte(4)?, a))
    }
}

impl TryFrom<String> for Color {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<Color> for String {
    fn from(c: Color) -> Self {
        c.to_string()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)?;
        if self.a != 255 {
            write!(f, "{:02x}", self.a)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse() -> Result<()> {
        assert_eq!("#1e1e28".parse::<Color>()?, Color::rgb(0x1e, 0x1e, 0x28));
        assert_eq!("ff000080".parse::<Color>()?, Color::rgba(255, 0, 0, 128));
        assert!("#12345".parse::<Color>().is_err());
        assert!("#gg0000".parse::<Color>().is_err());
        assert_eq!(Color::rgba(1, 2, 3, 4).to_string(), "#01020304");
        assert_eq!(Color::WHITE.to_string(), "#ffffff");
        Ok(())
    }

    #[test]
    fn compositing() {
        let red = Color::rgb(255, 0, 0);
        assert_eq!(red.over(Color::BLACK), red);
        assert_eq!(Color::CLEAR.over(red), red);
        let half = Color::rgba(0, 0, 255, 128).over(Color::BLACK);
        assert_eq!(half.a, 255);
        assert_eq!(half.b, 128);
        assert_eq!(Color::CLEAR.over(Color::CLEAR), Color::CLEAR);
    }
}
