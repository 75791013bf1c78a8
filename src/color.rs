//! Canonical color value
//!
//! Every color the driver exchanges with the controller (clear color,
//! default color, color key, palette entries) is expressed as a [`Color`]:
//! a packed 32-bit ARGB8888 value. Registers that only hold 24 bits drop the
//! alpha byte on write and report it as zero on read.
//!
//! | Bits  | Channel |
//! |-------|---------|
//! | 31:24 | alpha   |
//! | 23:16 | red     |
//! | 15:8  | green   |
//! | 7:0   | blue    |
//!
//! ## Example
//!
//! ```
//! use ltdc::Color;
//!
//! let orange = Color::from_argb(0xFF, 0xFF, 0x80, 0x00);
//! assert_eq!(orange.0, 0xFFFF_8000);
//! assert_eq!(orange.green(), 0x80);
//! assert_eq!(orange.rgb(), 0x00FF_8000);
//! ```

use crate::registers::RGB_MASK;

/// Packed ARGB8888 color
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Hash)]
pub struct Color(pub u32);

impl Color {
    /// Fully transparent black
    pub const TRANSPARENT: Self = Self(0x0000_0000);
    /// Opaque black
    pub const BLACK: Self = Self(0xFF00_0000);
    /// Opaque white
    pub const WHITE: Self = Self(0xFFFF_FFFF);
    /// Opaque red
    pub const RED: Self = Self(0xFFFF_0000);
    /// Opaque green
    pub const GREEN: Self = Self(0xFF00_FF00);
    /// Opaque blue
    pub const BLUE: Self = Self(0xFF00_00FF);

    /// Pack individual channels
    pub const fn from_argb(alpha: u8, red: u8, green: u8, blue: u8) -> Self {
        Self(
            ((alpha as u32) << 24) | ((red as u32) << 16) | ((green as u32) << 8) | blue as u32,
        )
    }

    /// Opaque color from red, green and blue channels
    pub const fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        Self::from_argb(0xFF, red, green, blue)
    }

    /// Alpha channel
    pub const fn alpha(self) -> u8 {
        (self.0 >> 24) as u8
    }

    /// Red channel
    pub const fn red(self) -> u8 {
        (self.0 >> 16) as u8
    }

    /// Green channel
    pub const fn green(self) -> u8 {
        (self.0 >> 8) as u8
    }

    /// Blue channel
    pub const fn blue(self) -> u8 {
        self.0 as u8
    }

    /// The 24-bit RGB part, as written to RGB-only registers
    pub const fn rgb(self) -> u32 {
        self.0 & RGB_MASK
    }
}

impl From<u32> for Color {
    fn from(argb: u32) -> Self {
        Self(argb)
    }
}

impl From<Color> for u32 {
    fn from(color: Color) -> Self {
        color.0
    }
}
