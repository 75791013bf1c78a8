//! Pixel format catalogue
//!
//! The controller fetches layer pixels in one of eight packed encodings. This
//! module names them, knows their sizes, and converts between each packed
//! encoding and the canonical ARGB8888 [`Color`].
//!
//! | Format   | Id | Bits | Layout (msb to lsb)       |
//! |----------|----|------|---------------------------|
//! | ARGB8888 | 0  | 32   | A8 R8 G8 B8               |
//! | RGB888   | 1  | 24   | R8 G8 B8                  |
//! | RGB565   | 2  | 16   | R5 G6 B5                  |
//! | ARGB1555 | 3  | 16   | A1 R5 G5 B5               |
//! | ARGB4444 | 4  | 16   | A4 R4 G4 B4               |
//! | L8       | 5  | 8    | L8 (palette index)        |
//! | AL44     | 6  | 8    | A4 L4                     |
//! | AL88     | 7  | 16   | A8 L8                     |
//!
//! Widening conversions are deterministic: a narrow channel that is non-zero
//! has its vacated low bits filled with ones, a zero channel stays zero, and
//! formats without alpha come out opaque. Luminance maps to the low (blue)
//! byte of the canonical value.
//!
//! ## Example
//!
//! ```
//! use ltdc::{Color, PixelFormat};
//!
//! let packed = PixelFormat::Rgb565.from_canonical(Color(0xFF80_4020));
//! assert_eq!(packed, 0x8204);
//! assert_eq!(PixelFormat::Rgb565.to_canonical(packed), Color(0xFF87_4327));
//! ```

use crate::color::Color;
use crate::error::Error;

/// Layer pixel format
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Hash)]
#[repr(u8)]
pub enum PixelFormat {
    /// 32-bit ARGB
    Argb8888 = 0,
    /// 24-bit RGB
    Rgb888 = 1,
    /// 16-bit RGB, 5/6/5
    Rgb565 = 2,
    /// 16-bit ARGB, 1/5/5/5
    Argb1555 = 3,
    /// 16-bit ARGB, 4/4/4/4
    Argb4444 = 4,
    /// 8-bit luminance (palette index)
    #[default]
    L8 = 5,
    /// 8-bit alpha and luminance, 4/4
    Al44 = 6,
    /// 16-bit alpha and luminance, 8/8
    Al88 = 7,
}

impl PixelFormat {
    /// All formats, in identifier order
    pub const ALL: [Self; 8] = [
        Self::Argb8888,
        Self::Rgb888,
        Self::Rgb565,
        Self::Argb1555,
        Self::Argb4444,
        Self::L8,
        Self::Al44,
        Self::Al88,
    ];

    /// Hardware identifier, as written to the pixel format register
    pub const fn id(self) -> u32 {
        self as u32
    }

    /// Size of one pixel in bits
    ///
    /// ```
    /// use ltdc::PixelFormat;
    ///
    /// assert_eq!(PixelFormat::Rgb888.bits_per_pixel(), 24);
    /// assert_eq!(PixelFormat::Al88.bits_per_pixel(), 16);
    /// ```
    pub const fn bits_per_pixel(self) -> u32 {
        match self {
            Self::Argb8888 => 32,
            Self::Rgb888 => 24,
            Self::Rgb565 | Self::Argb1555 | Self::Argb4444 | Self::Al88 => 16,
            Self::L8 | Self::Al44 => 8,
        }
    }

    /// Size of one pixel in bytes
    pub const fn bytes_per_pixel(self) -> u32 {
        self.bits_per_pixel() / 8
    }

    /// Whether pixels are palette indices
    pub const fn uses_palette(self) -> bool {
        matches!(self, Self::L8 | Self::Al44 | Self::Al88)
    }

    /// Widen a packed pixel to canonical ARGB8888
    ///
    /// Bits above the format's width are ignored.
    pub const fn to_canonical(self, raw: u32) -> Color {
        let c = raw;
        let argb = match self {
            Self::Argb8888 => c,
            Self::Rgb888 => (c & 0x00FF_FFFF) | 0xFF00_0000,
            Self::Rgb565 => {
                let mut out = 0xFF00_0000;
                if c & 0x001F != 0 {
                    out |= ((c & 0x001F) << 3) | 0x07;
                }
                if c & 0x07E0 != 0 {
                    out |= ((c & 0x07E0) << 5) | 0x0300;
                }
                if c & 0xF800 != 0 {
                    out |= ((c & 0xF800) << 8) | 0x0007_0000;
                }
                out
            }
            Self::Argb1555 => {
                let mut out = 0;
                if c & 0x001F != 0 {
                    out |= ((c & 0x001F) << 3) | 0x07;
                }
                if c & 0x03E0 != 0 {
                    out |= ((c & 0x03E0) << 6) | 0x0700;
                }
                if c & 0x7C00 != 0 {
                    out |= ((c & 0x7C00) << 9) | 0x0007_0000;
                }
                if c & 0x8000 != 0 {
                    out |= 0xFF00_0000;
                }
                out
            }
            Self::Argb4444 => {
                let mut out = 0;
                if c & 0x000F != 0 {
                    out |= ((c & 0x000F) << 4) | 0x0F;
                }
                if c & 0x00F0 != 0 {
                    out |= ((c & 0x00F0) << 8) | 0x0F00;
                }
                if c & 0x0F00 != 0 {
                    out |= ((c & 0x0F00) << 12) | 0x000F_0000;
                }
                if c & 0xF000 != 0 {
                    out |= ((c & 0xF000) << 16) | 0x0F00_0000;
                }
                out
            }
            Self::L8 => (c & 0xFF) | 0xFF00_0000,
            Self::Al44 => {
                let mut out = 0;
                if c & 0x0F != 0 {
                    out |= ((c & 0x0F) << 4) | 0x0F;
                }
                if c & 0xF0 != 0 {
                    out |= ((c & 0xF0) << 24) | 0x0F00_0000;
                }
                out
            }
            Self::Al88 => (c & 0xFF) | ((c & 0xFF00) << 16),
        };
        Color(argb)
    }

    /// Narrow a canonical color to this format, truncating low bits
    pub const fn from_canonical(self, color: Color) -> u32 {
        let c = color.0;
        match self {
            Self::Argb8888 => c,
            Self::Rgb888 => c & 0x00FF_FFFF,
            Self::Rgb565 => ((c & 0xF8) >> 3) | ((c & 0xFC00) >> 5) | ((c & 0x00F8_0000) >> 8),
            Self::Argb1555 => {
                ((c & 0xF8) >> 3)
                    | ((c & 0xF800) >> 6)
                    | ((c & 0x00F8_0000) >> 9)
                    | ((c & 0x8000_0000) >> 16)
            }
            Self::Argb4444 => {
                ((c & 0xF0) >> 4)
                    | ((c & 0xF000) >> 8)
                    | ((c & 0x00F0_0000) >> 12)
                    | ((c & 0xF000_0000) >> 16)
            }
            Self::L8 => c & 0xFF,
            Self::Al44 => ((c & 0xF0) >> 4) | ((c & 0xF000_0000) >> 24),
            Self::Al88 => (c & 0xFF) | ((c & 0xFF00_0000) >> 16),
        }
    }
}

impl TryFrom<u32> for PixelFormat {
    type Error = Error;

    fn try_from(raw: u32) -> Result<Self, Self::Error> {
        Self::ALL
            .get(raw as usize)
            .copied()
            .ok_or(Error::InvalidPixelFormat(raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifiers_match_table_order() {
        for (id, format) in PixelFormat::ALL.iter().enumerate() {
            assert_eq!(format.id(), id as u32);
            assert_eq!(PixelFormat::try_from(id as u32).unwrap(), *format);
        }
    }

    #[test]
    fn test_unknown_identifier_rejected() {
        assert_eq!(PixelFormat::try_from(8), Err(Error::InvalidPixelFormat(8)));
    }

    #[test]
    fn test_bytes_per_pixel() {
        let bytes: [u32; 8] = PixelFormat::ALL.map(PixelFormat::bytes_per_pixel);
        assert_eq!(bytes, [4, 3, 2, 2, 2, 1, 1, 2]);
    }

    #[test]
    fn test_rgb565_keeps_top_bits() {
        let original = Color(0xFF80_4020);
        let back = PixelFormat::Rgb565.to_canonical(PixelFormat::Rgb565.from_canonical(original));
        assert_eq!(back.red() & 0xF8, original.red() & 0xF8);
        assert_eq!(back.green() & 0xFC, original.green() & 0xFC);
        assert_eq!(back.blue() & 0xF8, original.blue() & 0xF8);
        assert_eq!(back.alpha(), 0xFF);
    }

    #[test]
    fn test_zero_channels_stay_zero() {
        assert_eq!(PixelFormat::Rgb565.to_canonical(0), Color::BLACK);
        assert_eq!(PixelFormat::Argb1555.to_canonical(0), Color::TRANSPARENT);
        assert_eq!(PixelFormat::Argb4444.to_canonical(0), Color::TRANSPARENT);
        assert_eq!(PixelFormat::Al44.to_canonical(0), Color::TRANSPARENT);
    }

    #[test]
    fn test_full_channels_saturate() {
        assert_eq!(PixelFormat::Rgb565.to_canonical(0xFFFF), Color::WHITE);
        assert_eq!(PixelFormat::Argb1555.to_canonical(0xFFFF), Color::WHITE);
        assert_eq!(PixelFormat::Argb4444.to_canonical(0xFFFF), Color::WHITE);
    }

    #[test]
    fn test_argb1555_alpha_bit() {
        assert_eq!(PixelFormat::Argb1555.from_canonical(Color(0x8000_0000)), 0x8000);
        assert_eq!(PixelFormat::Argb1555.from_canonical(Color(0x7FFF_FFFF)), 0x7FFF);
        assert_eq!(PixelFormat::Argb1555.to_canonical(0x8000), Color::BLACK);
    }

    #[test]
    fn test_luminance_formats_use_low_byte() {
        assert_eq!(PixelFormat::L8.from_canonical(Color(0x1234_5678)), 0x78);
        assert_eq!(PixelFormat::L8.to_canonical(0x78), Color(0xFF00_0078));
        assert_eq!(PixelFormat::Al88.from_canonical(Color(0x1234_5678)), 0x1278);
        assert_eq!(PixelFormat::Al88.to_canonical(0x1278), Color(0x1200_0078));
        assert_eq!(PixelFormat::Al44.from_canonical(Color(0xA000_00B0)), 0xAB);
        assert_eq!(PixelFormat::Al44.to_canonical(0xAB), Color(0xAF00_00BF));
    }

    #[test]
    fn test_rgb888_is_opaque() {
        assert_eq!(PixelFormat::Rgb888.from_canonical(Color(0x0011_2233)), 0x11_2233);
        assert_eq!(PixelFormat::Rgb888.to_canonical(0x11_2233), Color(0xFF11_2233));
    }
}
