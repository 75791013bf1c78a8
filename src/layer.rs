//! Layer configuration and control
//!
//! The controller blends two layers over the clear color: layer 1
//! ([`Layer::Background`]) and layer 2 ([`Layer::Foreground`]). Both share
//! one register layout at different bases, so a single [`LayerController`]
//! drives either one.
//!
//! Every setter writes *shadow* registers: nothing changes on screen until
//! the driver reloads them (see [`Ltdc::reload`](crate::Ltdc::reload)).
//! Setters validate their input first and touch no register when they
//! return an error.
//!
//! ## Coordinates
//!
//! Windows are given in layer-local coordinates, where `(0, 0)` is the first
//! visible pixel. The controller translates them by the active window start
//! computed from the timing configuration.
//!
//! ## Example
//!
//! ```
//! use ltdc::{BlendFactors, Color, Frame, LayerConfig, LayerFlags, PixelFormat, Window};
//!
//! static FRAMEBUFFER: [u8; 480 * 272 * 2] = [0; 480 * 272 * 2];
//!
//! let frame = match Frame::from_buffer(&FRAMEBUFFER, 480, 272, PixelFormat::Rgb565) {
//!     Ok(frame) => frame,
//!     Err(_) => return,
//! };
//! let config = LayerConfig {
//!     frame,
//!     window: Window::new(0, 479, 0, 271),
//!     default_color: Color::BLACK,
//!     key_color: Color::BLACK,
//!     constant_alpha: 0xFF,
//!     blending: BlendFactors::CONSTANT_ALPHA,
//!     palette: &[],
//!     flags: LayerFlags::ENABLE,
//! };
//! assert_eq!(config.frame.pitch, 960);
//! ```

use core::cell::Cell;

use critical_section::Mutex;

use crate::color::Color;
use crate::error::{
    Error, MAX_FRAME_LINES, MAX_LINE_SIZE, MAX_PALETTE_LENGTH, MAX_PITCH,
};
use crate::format::PixelFormat;
use crate::interface::RegisterInterface;
use crate::registers::*;
use crate::timing::{ActiveWindow, TimingConfig, TimingWindows, inclusive_span};

/// One of the two controller layers
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Layer {
    /// Layer 1, blended directly over the clear color
    Background,
    /// Layer 2, blended over the background layer
    Foreground,
}

impl Layer {
    /// Both layers, bottom first
    pub const ALL: [Self; 2] = [Self::Background, Self::Foreground];

    /// Offset of the layer's register block
    pub const fn base(self) -> u32 {
        match self {
            Self::Background => LAYER1_BASE,
            Self::Foreground => LAYER2_BASE,
        }
    }
}

/// Layer enable flags, as held in the layer control register
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Hash)]
pub struct LayerFlags(u32);

impl LayerFlags {
    /// Layer is composited
    pub const ENABLE: Self = Self(LAYER_CR_LEN);
    /// Pixels equal to the key color are made transparent
    pub const KEYING: Self = Self(LAYER_CR_COLKEN);
    /// Pixels are looked up in the palette
    pub const PALETTE: Self = Self(LAYER_CR_CLUTEN);

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
        Self(bits & LAYER_CR_FLAGS_MASK)
    }

    /// Whether every flag of `other` is set
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Whether no flag is set
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl core::ops::BitOr for LayerFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl core::ops::BitOrAssign for LayerFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// Layer window in layer-local coordinates (inclusive bounds)
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Window {
    /// First column
    pub hstart: u16,
    /// Last column
    pub hstop: u16,
    /// First line
    pub vstart: u16,
    /// Last line
    pub vstop: u16,
}

impl Window {
    /// Single pixel at the origin
    ///
    /// Used as a placeholder before changing frame geometry, so the window
    /// never describes memory beyond a smaller new frame.
    pub const INVALID: Self = Self::new(0, 0, 0, 0);

    /// Create a window from inclusive bounds
    pub const fn new(hstart: u16, hstop: u16, vstart: u16, vstop: u16) -> Self {
        Self {
            hstart,
            hstop,
            vstart,
            vstop,
        }
    }

    /// Window covering a whole `width` x `height` area
    pub const fn full(width: u16, height: u16) -> Self {
        Self::new(0, width.saturating_sub(1), 0, height.saturating_sub(1))
    }

    /// Width in pixels, 0 for an inverted window
    pub const fn width(&self) -> u16 {
        inclusive_span(self.hstart, self.hstop)
    }

    /// Height in lines, 0 for an inverted window
    pub const fn height(&self) -> u16 {
        inclusive_span(self.vstart, self.vstop)
    }

    /// Translate to absolute coordinates, checking it fits the active area
    fn to_absolute(self, geometry: &ScreenGeometry) -> Result<Self, Error> {
        let out_of_bounds = Error::WindowOutOfBounds { window: self };
        if self.hstart > self.hstop
            || self.vstart > self.vstop
            || self.hstop >= geometry.width
            || self.vstop >= geometry.height
        {
            return Err(out_of_bounds);
        }
        let active = geometry.active;
        let absolute = Self {
            hstart: self.hstart + active.hstart,
            hstop: self.hstop + active.hstart,
            vstart: self.vstart + active.vstart,
            vstop: self.vstop + active.vstart,
        };
        if absolute.hstop > active.hstop || absolute.vstop > active.vstop {
            return Err(out_of_bounds);
        }
        Ok(absolute)
    }
}

/// Frame buffer description
///
/// The buffer itself is owned by the caller and addressed by its bus
/// address; the controller reads it for as long as the layer is enabled.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Frame {
    /// Bus address of the first pixel
    pub address: u32,
    /// Distance between the starts of two lines, in bytes
    pub pitch: u32,
    /// Width in pixels
    pub width: u16,
    /// Height in lines
    pub height: u16,
    /// Pixel encoding
    pub format: PixelFormat,
}

impl Frame {
    /// One-pixel L8 frame at address zero, the reset placeholder
    pub const INVALID: Self = Self {
        address: 0,
        pitch: 1,
        width: 1,
        height: 1,
        format: PixelFormat::L8,
    };

    /// Describe a tightly packed frame stored in `buffer`
    ///
    /// # Errors
    ///
    /// Returns [`Error::BufferTooSmall`] if `buffer` cannot hold the frame.
    pub fn from_buffer(
        buffer: &'static [u8],
        width: u16,
        height: u16,
        format: PixelFormat,
    ) -> Result<Self, Error> {
        let pitch = u32::from(width) * format.bytes_per_pixel();
        Self::from_buffer_with_pitch(buffer, pitch, width, height, format)
    }

    /// Describe a frame stored in `buffer` with lines `pitch` bytes apart
    ///
    /// # Errors
    ///
    /// Returns [`Error::BufferTooSmall`] if `buffer` cannot hold the frame.
    pub fn from_buffer_with_pitch(
        buffer: &'static [u8],
        pitch: u32,
        width: u16,
        height: u16,
        format: PixelFormat,
    ) -> Result<Self, Error> {
        let frame = Self {
            address: buffer.as_ptr() as usize as u32,
            pitch,
            width,
            height,
            format,
        };
        let required = frame.required_bytes();
        if buffer.len() < required {
            return Err(Error::BufferTooSmall {
                required,
                provided: buffer.len(),
            });
        }
        Ok(frame)
    }

    /// Bytes of pixel data in one line
    pub const fn line_size(&self) -> u32 {
        self.width as u32 * self.format.bytes_per_pixel()
    }

    /// Bytes the controller reads, from the first pixel to the last
    pub const fn required_bytes(&self) -> usize {
        if self.height == 0 {
            return 0;
        }
        (self.pitch as usize) * (self.height as usize - 1) + self.line_size() as usize
    }

    fn validate(&self, geometry: &ScreenGeometry) -> Result<(), Error> {
        if self.width > geometry.width || self.height > geometry.height {
            return Err(Error::FrameTooLarge {
                width: self.width,
                height: self.height,
            });
        }
        let line_size = self.line_size();
        if line_size > MAX_LINE_SIZE {
            return Err(Error::LineSizeOutOfRange { line_size });
        }
        if self.height > MAX_FRAME_LINES {
            return Err(Error::FrameHeightOutOfRange {
                height: self.height,
            });
        }
        if self.pitch < line_size {
            return Err(Error::PitchTooSmall {
                pitch: self.pitch,
                line_size,
            });
        }
        if self.pitch > MAX_PITCH {
            return Err(Error::PitchOutOfRange { pitch: self.pitch });
        }
        Ok(())
    }
}

impl Default for Frame {
    fn default() -> Self {
        Self::INVALID
    }
}

/// Blending factor applied to the current layer's color
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[repr(u8)]
pub enum CurrentFactor {
    /// Constant alpha
    ConstantAlpha = 4,
    /// Pixel alpha times constant alpha
    PixelAlphaTimesConstantAlpha = 6,
}

/// Blending factor applied to the color underneath the current layer
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[repr(u8)]
pub enum SubjacentFactor {
    /// One minus constant alpha
    OneMinusConstantAlpha = 5,
    /// One minus pixel alpha times constant alpha
    OneMinusPixelAlphaTimesConstantAlpha = 7,
}

/// Pair of blending factors
///
/// The blended color is `current * BF1 + subjacent * BF2`.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct BlendFactors {
    /// BF1, applied to the current layer
    pub current: CurrentFactor,
    /// BF2, applied to the layers below
    pub subjacent: SubjacentFactor,
}

impl BlendFactors {
    /// Blend with the constant alpha only
    pub const CONSTANT_ALPHA: Self = Self {
        current: CurrentFactor::ConstantAlpha,
        subjacent: SubjacentFactor::OneMinusConstantAlpha,
    };

    /// Blend with per-pixel alpha scaled by the constant alpha
    pub const PIXEL_ALPHA: Self = Self {
        current: CurrentFactor::PixelAlphaTimesConstantAlpha,
        subjacent: SubjacentFactor::OneMinusPixelAlphaTimesConstantAlpha,
    };

    /// Register value
    pub const fn bits(self) -> u32 {
        ((self.current as u32) << LAYER_BFCR_BF1_SHIFT) | self.subjacent as u32
    }

    /// Decode a register value
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBlendFactor`] with the offending field.
    pub const fn from_bits(bits: u32) -> Result<Self, Error> {
        let bf1 = (bits & LAYER_BFCR_BF1_MASK) >> LAYER_BFCR_BF1_SHIFT;
        let bf2 = bits & LAYER_BFCR_BF2_MASK;
        let current = match bf1 {
            4 => CurrentFactor::ConstantAlpha,
            6 => CurrentFactor::PixelAlphaTimesConstantAlpha,
            other => return Err(Error::InvalidBlendFactor(other)),
        };
        let subjacent = match bf2 {
            5 => SubjacentFactor::OneMinusConstantAlpha,
            7 => SubjacentFactor::OneMinusPixelAlphaTimesConstantAlpha,
            other => return Err(Error::InvalidBlendFactor(other)),
        };
        Ok(Self { current, subjacent })
    }
}

impl Default for BlendFactors {
    fn default() -> Self {
        Self::CONSTANT_ALPHA
    }
}

/// Complete configuration of one layer
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct LayerConfig<'a> {
    /// Frame buffer
    pub frame: Frame,
    /// Window in layer-local coordinates
    pub window: Window,
    /// Color outside the window (ARGB)
    pub default_color: Color,
    /// Color made transparent when keying is enabled (RGB)
    pub key_color: Color,
    /// Constant alpha
    pub constant_alpha: u8,
    /// Blending factors
    pub blending: BlendFactors,
    /// Palette entries by slot. Empty leaves the palette unmodified.
    pub palette: &'a [Color],
    /// Enable flags
    pub flags: LayerFlags,
}

impl LayerConfig<'_> {
    /// Configuration programmed when none is given: disabled, placeholder geometry
    pub const DISABLED: LayerConfig<'static> = LayerConfig {
        frame: Frame::INVALID,
        window: Window::INVALID,
        default_color: Color::BLACK,
        key_color: Color::BLACK,
        constant_alpha: 0x00,
        blending: BlendFactors::CONSTANT_ALPHA,
        palette: &[],
        flags: LayerFlags::empty(),
    };

    pub(crate) fn validate(&self, geometry: &ScreenGeometry) -> Result<(), Error> {
        self.frame.validate(geometry)?;
        self.window.to_absolute(geometry)?;
        if self.palette.len() > MAX_PALETTE_LENGTH {
            return Err(Error::PaletteTooLong {
                length: self.palette.len(),
            });
        }
        Ok(())
    }
}

impl Default for LayerConfig<'_> {
    fn default() -> Self {
        LayerConfig::DISABLED
    }
}

/// Screen size and active area, fixed when the controller starts
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct ScreenGeometry {
    /// Screen width in pixels
    pub width: u16,
    /// Screen height in lines
    pub height: u16,
    /// Active area in accumulated coordinates
    pub active: ActiveWindow,
}

impl ScreenGeometry {
    /// Geometry produced by `timing`
    pub const fn new(timing: &TimingConfig, windows: &TimingWindows) -> Self {
        Self {
            width: timing.screen_width,
            height: timing.screen_height,
            active: windows.active_window,
        }
    }
}

/// Geometry of the running controller, `None` while stopped
pub(crate) type SharedGeometry = Mutex<Cell<Option<ScreenGeometry>>>;

/// Register-level control of one layer
///
/// Obtained from [`Ltdc::layer`](crate::Ltdc::layer). Geometry-dependent
/// operations (window, frame, whole config) check against the geometry of the
/// current run, so a controller kept across a restart follows the new panel.
/// They fail with [`Error::NotStarted`] while the controller is stopped.
pub struct LayerController<'a, R> {
    regs: &'a R,
    layer: Layer,
    geometry: &'a SharedGeometry,
}

impl<'a, R: RegisterInterface> LayerController<'a, R> {
    pub(crate) const fn new(regs: &'a R, layer: Layer, geometry: &'a SharedGeometry) -> Self {
        Self {
            regs,
            layer,
            geometry,
        }
    }

    /// Which layer this controls
    pub const fn layer(&self) -> Layer {
        self.layer
    }

    fn read(&self, register: u32) -> u32 {
        self.regs.read(self.layer.base() + register)
    }

    fn write(&self, register: u32, value: u32) {
        self.regs.write(self.layer.base() + register, value);
    }

    fn modify(&self, register: u32, mask: u32, value: u32) {
        critical_section::with(|_| {
            self.regs.modify(self.layer.base() + register, mask, value);
        });
    }

    fn geometry(&self) -> Result<ScreenGeometry, Error> {
        critical_section::with(|cs| self.geometry.borrow(cs).get()).ok_or(Error::NotStarted)
    }

    // Enable flags

    /// Current enable flags
    pub fn enable_flags(&self) -> LayerFlags {
        LayerFlags::from_bits_truncate(self.read(LAYER_CR))
    }

    /// Replace all enable flags
    pub fn set_enable_flags(&self, flags: LayerFlags) {
        self.modify(LAYER_CR, LAYER_CR_FLAGS_MASK, flags.bits());
    }

    /// Whether the layer is composited
    pub fn is_enabled(&self) -> bool {
        self.read(LAYER_CR) & LAYER_CR_LEN != 0
    }

    /// Enable the layer
    pub fn enable(&self) {
        self.modify(LAYER_CR, LAYER_CR_LEN, LAYER_CR_LEN);
    }

    /// Disable the layer
    pub fn disable(&self) {
        self.modify(LAYER_CR, LAYER_CR_LEN, 0);
    }

    /// Whether pixels go through the palette
    pub fn is_palette_enabled(&self) -> bool {
        self.read(LAYER_CR) & LAYER_CR_CLUTEN != 0
    }

    /// Look pixels up in the palette
    pub fn enable_palette(&self) {
        self.modify(LAYER_CR, LAYER_CR_CLUTEN, LAYER_CR_CLUTEN);
    }

    /// Stop looking pixels up in the palette
    pub fn disable_palette(&self) {
        self.modify(LAYER_CR, LAYER_CR_CLUTEN, 0);
    }

    /// Whether color keying is active
    pub fn is_keying_enabled(&self) -> bool {
        self.read(LAYER_CR) & LAYER_CR_COLKEN != 0
    }

    /// Make pixels matching the key color transparent
    pub fn enable_keying(&self) {
        self.modify(LAYER_CR, LAYER_CR_COLKEN, LAYER_CR_COLKEN);
    }

    /// Stop color keying
    pub fn disable_keying(&self) {
        self.modify(LAYER_CR, LAYER_CR_COLKEN, 0);
    }

    // Palette

    /// Write one palette slot
    ///
    /// # Errors
    ///
    /// Returns [`Error::LayerEnabled`] if the layer is enabled.
    pub fn set_palette_color(&self, slot: u8, color: Color) -> Result<(), Error> {
        if self.is_enabled() {
            return Err(Error::LayerEnabled);
        }
        self.write_palette_slot(slot, color);
        Ok(())
    }

    /// Write `colors` to slots `0..colors.len()`, in slot order
    ///
    /// # Errors
    ///
    /// - [`Error::PaletteTooLong`] for more than 256 colors
    /// - [`Error::LayerEnabled`] if the layer is enabled
    pub fn set_palette(&self, colors: &[Color]) -> Result<(), Error> {
        if colors.len() > MAX_PALETTE_LENGTH {
            return Err(Error::PaletteTooLong {
                length: colors.len(),
            });
        }
        if self.is_enabled() {
            return Err(Error::LayerEnabled);
        }
        for (slot, color) in colors.iter().enumerate() {
            self.write_palette_slot(slot as u8, *color);
        }
        Ok(())
    }

    fn write_palette_slot(&self, slot: u8, color: Color) {
        self.write(
            LAYER_CLUTWR,
            (u32::from(slot) << LAYER_CLUTWR_SLOT_SHIFT) | color.rgb(),
        );
    }

    // Pixel format and colors

    /// Current pixel format
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPixelFormat`] if the register holds an unknown id.
    pub fn pixel_format(&self) -> Result<PixelFormat, Error> {
        PixelFormat::try_from(self.read(LAYER_PFCR) & LAYER_PFCR_PF_MASK)
    }

    /// Set the pixel format
    pub fn set_pixel_format(&self, format: PixelFormat) {
        self.modify(LAYER_PFCR, LAYER_PFCR_PF_MASK, format.id());
    }

    /// Color key (RGB, alpha reads as zero)
    pub fn keying_color(&self) -> Color {
        Color(self.read(LAYER_CKCR) & RGB_MASK)
    }

    /// Set the color key; alpha is ignored
    pub fn set_keying_color(&self, color: Color) {
        self.modify(LAYER_CKCR, RGB_MASK, color.rgb());
    }

    /// Constant alpha
    pub fn constant_alpha(&self) -> u8 {
        (self.read(LAYER_CACR) & LAYER_CACR_CONSTA_MASK) as u8
    }

    /// Set the constant alpha
    pub fn set_constant_alpha(&self, alpha: u8) {
        self.modify(LAYER_CACR, LAYER_CACR_CONSTA_MASK, u32::from(alpha));
    }

    /// Color drawn outside the window
    pub fn default_color(&self) -> Color {
        Color(self.read(LAYER_DCCR))
    }

    /// Set the color drawn outside the window
    pub fn set_default_color(&self, color: Color) {
        self.write(LAYER_DCCR, color.0);
    }

    /// Blending factors
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBlendFactor`] if the register holds an unknown factor.
    pub fn blend_factors(&self) -> Result<BlendFactors, Error> {
        BlendFactors::from_bits(self.read(LAYER_BFCR))
    }

    /// Set the blending factors
    pub fn set_blend_factors(&self, factors: BlendFactors) {
        self.modify(
            LAYER_BFCR,
            LAYER_BFCR_BF1_MASK | LAYER_BFCR_BF2_MASK,
            factors.bits(),
        );
    }

    // Window

    /// Current window in layer-local coordinates
    pub fn window(&self) -> Result<Window, Error> {
        let active = self.geometry()?.active;
        let whpcr = self.read(LAYER_WHPCR);
        let wvpcr = self.read(LAYER_WVPCR);
        let absolute = Window {
            hstart: (whpcr & LAYER_WHPCR_START_MASK) as u16,
            hstop: ((whpcr & LAYER_WHPCR_STOP_MASK) >> WINDOW_STOP_SHIFT) as u16,
            vstart: (wvpcr & LAYER_WVPCR_START_MASK) as u16,
            vstop: ((wvpcr & LAYER_WVPCR_STOP_MASK) >> WINDOW_STOP_SHIFT) as u16,
        };
        Ok(Window {
            hstart: absolute.hstart.saturating_sub(active.hstart),
            hstop: absolute.hstop.saturating_sub(active.hstart),
            vstart: absolute.vstart.saturating_sub(active.vstart),
            vstop: absolute.vstop.saturating_sub(active.vstart),
        })
    }

    /// Set the window
    ///
    /// # Errors
    ///
    /// - [`Error::NotStarted`] before the controller is started
    /// - [`Error::WindowOutOfBounds`] if the window leaves the active area
    pub fn set_window(&self, window: Window) -> Result<(), Error> {
        let absolute = window.to_absolute(&self.geometry()?)?;
        self.write_window(absolute);
        Ok(())
    }

    /// Shrink the window to a single pixel at the origin
    pub fn invalidate_window(&self) -> Result<(), Error> {
        self.set_window(Window::INVALID)
    }

    fn write_window(&self, absolute: Window) {
        self.modify(
            LAYER_WHPCR,
            LAYER_WHPCR_START_MASK | LAYER_WHPCR_STOP_MASK,
            u32::from(absolute.hstart) | (u32::from(absolute.hstop) << WINDOW_STOP_SHIFT),
        );
        self.modify(
            LAYER_WVPCR,
            LAYER_WVPCR_START_MASK | LAYER_WVPCR_STOP_MASK,
            u32::from(absolute.vstart) | (u32::from(absolute.vstop) << WINDOW_STOP_SHIFT),
        );
    }

    // Frame

    /// Current frame
    ///
    /// The width is derived from the line length and the pixel format, so it
    /// is only as accurate as the format currently programmed.
    pub fn frame(&self) -> Result<Frame, Error> {
        let format = self.pixel_format()?;
        let cfblr = self.read(LAYER_CFBLR);
        let line_length = cfblr & LAYER_CFBLR_CFBLL_MASK;
        Ok(Frame {
            address: self.read(LAYER_CFBAR),
            pitch: (cfblr & LAYER_CFBLR_CFBP_MASK) >> LAYER_CFBLR_CFBP_SHIFT,
            width: (line_length.saturating_sub(LINE_LENGTH_PADDING) / format.bytes_per_pixel())
                as u16,
            height: (self.read(LAYER_CFBLNR) & LAYER_CFBLNR_MASK) as u16,
            format,
        })
    }

    /// Set the frame buffer, format and geometry
    ///
    /// # Errors
    ///
    /// - [`Error::NotStarted`] before the controller is started
    /// - [`Error::FrameTooLarge`], [`Error::LineSizeOutOfRange`],
    ///   [`Error::FrameHeightOutOfRange`], [`Error::PitchTooSmall`] or
    ///   [`Error::PitchOutOfRange`] for a frame the hardware cannot scan
    pub fn set_frame(&self, frame: &Frame) -> Result<(), Error> {
        frame.validate(&self.geometry()?)?;
        self.write_frame(frame);
        Ok(())
    }

    fn write_frame(&self, frame: &Frame) {
        self.set_pixel_format(frame.format);
        self.write(LAYER_CFBAR, frame.address);
        let line_length = frame.line_size() + LINE_LENGTH_PADDING;
        self.modify(
            LAYER_CFBLR,
            LAYER_CFBLR_CFBP_MASK | LAYER_CFBLR_CFBLL_MASK,
            (frame.pitch << LAYER_CFBLR_CFBP_SHIFT) | line_length,
        );
        self.modify(LAYER_CFBLNR, LAYER_CFBLNR_MASK, u32::from(frame.height));
    }

    /// Bus address of the frame buffer
    pub fn frame_address(&self) -> u32 {
        self.read(LAYER_CFBAR)
    }

    /// Point the layer at another buffer of the same geometry
    pub fn set_frame_address(&self, address: u32) {
        self.write(LAYER_CFBAR, address);
    }

    // Whole configuration

    /// Read back the configuration
    ///
    /// The palette cannot be read from hardware and is reported empty.
    pub fn config(&self) -> Result<LayerConfig<'static>, Error> {
        Ok(LayerConfig {
            frame: self.frame()?,
            window: self.window()?,
            default_color: self.default_color(),
            key_color: self.keying_color(),
            constant_alpha: self.constant_alpha(),
            blending: self.blend_factors()?,
            palette: &[],
            flags: self.enable_flags(),
        })
    }

    /// Program a whole configuration
    ///
    /// Order: frame, window, default color, key color, constant alpha,
    /// blending, palette (when non-empty), enable flags. Everything is
    /// validated before the first write.
    ///
    /// # Errors
    ///
    /// Any error of [`set_frame`](Self::set_frame),
    /// [`set_window`](Self::set_window) or [`set_palette`](Self::set_palette).
    pub fn set_config(&self, config: &LayerConfig<'_>) -> Result<(), Error> {
        let geometry = self.geometry()?;
        config.validate(&geometry)?;
        if !config.palette.is_empty() && self.is_enabled() {
            return Err(Error::LayerEnabled);
        }

        self.write_frame(&config.frame);
        self.write_window(config.window.to_absolute(&geometry)?);
        self.set_default_color(config.default_color);
        self.set_keying_color(config.key_color);
        self.set_constant_alpha(config.constant_alpha);
        self.set_blend_factors(config.blending);
        for (slot, color) in config.palette.iter().enumerate() {
            self.write_palette_slot(slot as u8, *color);
        }
        self.set_enable_flags(config.flags);
        log::trace!("{:?} layer configured: {:?}", self.layer, config.frame);
        Ok(())
    }
}
