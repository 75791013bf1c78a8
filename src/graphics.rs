//! Color interop with embedded-graphics
//!
//! [`Color`] implements [`PixelColor`], and converts to and from the
//! embedded-graphics RGB types. Conversions from `Rgb565` widen the channels
//! exactly like the controller does when it reads an RGB565 frame buffer, so
//! a color picked in embedded-graphics matches what ends up on screen.
//!
//! ## Example
//!
//! ```
//! use embedded_graphics_core::pixelcolor::{Rgb565, Rgb888, RgbColor};
//! use ltdc::Color;
//!
//! let clear: Color = Rgb888::new(0x12, 0x34, 0x56).into();
//! assert_eq!(clear, Color::from_rgb(0x12, 0x34, 0x56));
//!
//! let key: Color = Rgb565::WHITE.into();
//! assert_eq!(key, Color::WHITE);
//! ```

use embedded_graphics_core::pixelcolor::raw::{RawData, RawU16, RawU32};
use embedded_graphics_core::pixelcolor::{IntoStorage, PixelColor, Rgb565, Rgb888, RgbColor};

use crate::color::Color;
use crate::format::PixelFormat;

impl PixelColor for Color {
    type Raw = RawU32;
}

impl From<RawU32> for Color {
    fn from(raw: RawU32) -> Self {
        Self(raw.into_inner())
    }
}

impl From<Color> for RawU32 {
    fn from(color: Color) -> Self {
        Self::new(color.0)
    }
}

impl From<Rgb888> for Color {
    fn from(color: Rgb888) -> Self {
        Self::from_rgb(color.r(), color.g(), color.b())
    }
}

/// Drops alpha
impl From<Color> for Rgb888 {
    fn from(color: Color) -> Self {
        Self::new(color.red(), color.green(), color.blue())
    }
}

impl From<Rgb565> for Color {
    fn from(color: Rgb565) -> Self {
        PixelFormat::Rgb565.to_canonical(u32::from(color.into_storage()))
    }
}

/// Drops alpha and the low bits of each channel
impl From<Color> for Rgb565 {
    fn from(color: Color) -> Self {
        let raw = PixelFormat::Rgb565.from_canonical(color) as u16;
        RawU16::new(raw).into()
    }
}
