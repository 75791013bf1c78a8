//! Controller configuration types and builder

pub use crate::error::BuilderError;
use crate::color::Color;
use crate::interrupt::{Callback, Callbacks};
use crate::layer::LayerConfig;
use crate::registers::{
    GCR_DEN, GCR_DEPOL, GCR_FLAGS_MASK, GCR_HSPOL, GCR_LTDCEN, GCR_PCPOL, GCR_VSPOL,
};
use crate::timing::TimingConfig;

/// Global controller flags, as held in the global control register
///
/// Polarity flags describe the panel's signalling; their cleared state is
/// the hardware default (active-low syncs and data enable, pixel data
/// sampled on the rising clock edge).
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Hash)]
pub struct GlobalFlags(u32);

impl GlobalFlags {
    /// Controller enabled. Managed by the driver; ignored in [`Config`].
    pub const ENABLE: Self = Self(GCR_LTDCEN);
    /// Dithering enabled
    pub const DITHER: Self = Self(GCR_DEN);
    /// Pixel clock inverted
    pub const PIXEL_CLOCK_INVERTED: Self = Self(GCR_PCPOL);
    /// Data enable active high
    pub const DATA_ENABLE_ACTIVE_HIGH: Self = Self(GCR_DEPOL);
    /// Vertical sync active high
    pub const VSYNC_ACTIVE_HIGH: Self = Self(GCR_VSPOL);
    /// Horizontal sync active high
    pub const HSYNC_ACTIVE_HIGH: Self = Self(GCR_HSPOL);

    /// No flag set
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Raw register bits
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Keep only the bits that name a flag
    pub const fn from_bits_truncate(bits: u32) -> Self {
        Self(bits & GCR_FLAGS_MASK)
    }

    /// Whether every flag of `other` is set
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// These flags with `other` removed
    pub const fn difference(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }
}

impl core::ops::BitOr for GlobalFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Controller configuration
///
/// Use [`Builder`] to create a Config.
#[derive(Clone, Copy, Debug)]
pub struct Config<'a> {
    /// Panel timing
    pub timing: TimingConfig,
    /// Polarity and dithering flags
    pub flags: GlobalFlags,
    /// Color shown where no layer covers the screen (RGB)
    pub clear_color: Color,
    /// Layer 1 configuration; disabled placeholder when absent
    pub background: Option<LayerConfig<'a>>,
    /// Layer 2 configuration; disabled placeholder when absent
    pub foreground: Option<LayerConfig<'a>>,
    /// Interrupt callbacks
    pub callbacks: Callbacks,
}

/// Builder for constructing controller configuration
///
/// # Example
///
/// ```
/// use ltdc::{Builder, Color, GlobalFlags, TimingConfig};
///
/// fn on_underrun() {}
///
/// let config = match Builder::new()
///     .timing(TimingConfig::new(480, 272).with_sync(41, 10).with_back_porch(13, 2))
///     .flags(GlobalFlags::DITHER)
///     .clear_color(Color::BLUE)
///     .on_fifo_underrun(on_underrun)
///     .build()
/// {
///     Ok(config) => config,
///     Err(_) => return,
/// };
/// assert!(config.background.is_none());
/// ```
#[must_use]
#[derive(Default)]
pub struct Builder<'a> {
    /// Panel timing (required)
    timing: Option<TimingConfig>,
    flags: GlobalFlags,
    clear_color: Color,
    background: Option<LayerConfig<'a>>,
    foreground: Option<LayerConfig<'a>>,
    callbacks: Callbacks,
}

impl<'a> Builder<'a> {
    /// Create a new Builder with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set panel timing (required)
    pub fn timing(mut self, timing: TimingConfig) -> Self {
        self.timing = Some(timing);
        self
    }

    /// Set polarity and dithering flags
    pub fn flags(mut self, flags: GlobalFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Set the clear (background) color
    pub fn clear_color(mut self, color: Color) -> Self {
        self.clear_color = color;
        self
    }

    /// Set the initial background layer configuration
    pub fn background(mut self, config: LayerConfig<'a>) -> Self {
        self.background = Some(config);
        self
    }

    /// Set the initial foreground layer configuration
    pub fn foreground(mut self, config: LayerConfig<'a>) -> Self {
        self.foreground = Some(config);
        self
    }

    /// Call `callback` when the scan reaches the line interrupt position
    pub fn on_line(mut self, callback: Callback) -> Self {
        self.callbacks.line = Some(callback);
        self
    }

    /// Call `callback` when a reload completes
    pub fn on_reload(mut self, callback: Callback) -> Self {
        self.callbacks.reload = Some(callback);
        self
    }

    /// Call `callback` on FIFO underrun
    pub fn on_fifo_underrun(mut self, callback: Callback) -> Self {
        self.callbacks.fifo_underrun = Some(callback);
        self
    }

    /// Call `callback` on transfer error
    pub fn on_transfer_error(mut self, callback: Callback) -> Self {
        self.callbacks.transfer_error = Some(callback);
        self
    }

    /// Build the configuration
    ///
    /// # Errors
    ///
    /// Returns `BuilderError::MissingTiming` if timing was not set
    pub fn build(self) -> Result<Config<'a>, BuilderError> {
        Ok(Config {
            timing: self.timing.ok_or(BuilderError::MissingTiming)?,
            flags: self.flags,
            clear_color: self.clear_color,
            background: self.background,
            foreground: self.foreground,
            callbacks: self.callbacks,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_requires_timing() {
        assert!(matches!(
            Builder::new().build(),
            Err(BuilderError::MissingTiming)
        ));
    }

    #[test]
    fn test_builder_collects_callbacks() {
        fn noop() {}
        let config = Builder::new()
            .timing(TimingConfig::new(100, 100))
            .on_line(noop)
            .on_transfer_error(noop)
            .build()
            .unwrap();
        assert!(config.callbacks.line.is_some());
        assert!(config.callbacks.reload.is_none());
        assert!(config.callbacks.fifo_underrun.is_none());
        assert!(config.callbacks.transfer_error.is_some());
    }

    #[test]
    fn test_global_flags_truncate_unknown_bits() {
        let flags = GlobalFlags::from_bits_truncate(0xFFFF_FFFF);
        assert!(flags.contains(GlobalFlags::DITHER | GlobalFlags::HSYNC_ACTIVE_HIGH));
        assert_eq!(flags.bits() & 0x0000_FFFE, 0);
        assert!(!flags.difference(GlobalFlags::ENABLE).contains(GlobalFlags::ENABLE));
    }
}
