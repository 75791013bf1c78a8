//! Error types for the driver
//!
//! This module defines error types for configuration building ([`BuilderError`])
//! and controller operations ([`Error`]), together with the hardware limits
//! the driver validates against.
//!
//! Every [`Error`] is returned *before* the offending value reaches a register,
//! so a rejected call leaves the controller untouched.
//!
//! ## Example
//!
//! ```
//! use ltdc::{Builder, BuilderError, Error, TimingConfig};
//!
//! // Missing timing
//! let result = Builder::new().build();
//! assert!(matches!(result, Err(BuilderError::MissingTiming)));
//!
//! // A screen wider than the controller supports
//! let windows = TimingConfig::new(1024, 600).compute();
//! assert!(matches!(windows, Err(Error::TimingOutOfRange { .. })));
//! ```

use crate::interrupt::InterruptCause;
use crate::layer::Window;
use crate::state::{DriverState, Transition};
use crate::timing::TimingParameter;

/// Maximum screen width in pixels
pub const MAX_SCREEN_WIDTH: u16 = 800;
/// Maximum screen height in lines
pub const MAX_SCREEN_HEIGHT: u16 = 600;

/// Maximum accumulated horizontal value (12-bit timing fields, plus one)
pub const MAX_ACCUMULATED_WIDTH: u32 = 1 << 12;
/// Maximum accumulated vertical value (11-bit timing fields, plus one)
pub const MAX_ACCUMULATED_HEIGHT: u32 = 1 << 11;

/// Maximum frame line size in bytes
///
/// The line length field is 13 bits wide and carries the line size plus three.
pub const MAX_LINE_SIZE: u32 = (1 << 13) - 1 - 3;
/// Maximum frame pitch in bytes
pub const MAX_PITCH: u32 = (1 << 13) - 1;
/// Maximum frame height in lines
pub const MAX_FRAME_LINES: u16 = (1 << 11) - 1;
/// Maximum line interrupt position
pub const MAX_LINE_INTERRUPT_POSITION: u16 = (1 << 11) - 1;
/// Number of palette (CLUT) slots per layer
pub const MAX_PALETTE_LENGTH: usize = 256;

/// Errors that can occur when interacting with the controller
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Error {
    /// A timing parameter, raw or accumulated, is outside its hardware bounds
    TimingOutOfRange {
        /// Offending parameter
        parameter: TimingParameter,
        /// Value that was checked
        value: u32,
        /// Inclusive lower bound
        min: u32,
        /// Inclusive upper bound
        max: u32,
    },
    /// Layer window does not fit the active display area
    WindowOutOfBounds {
        /// Window requested, in layer-local coordinates
        window: Window,
    },
    /// Frame is larger than the screen
    FrameTooLarge {
        /// Frame width in pixels
        width: u16,
        /// Frame height in lines
        height: u16,
    },
    /// Frame line size (width times bytes per pixel) is too large
    LineSizeOutOfRange {
        /// Computed line size in bytes
        line_size: u32,
    },
    /// Frame height exceeds the line number field
    FrameHeightOutOfRange {
        /// Frame height in lines
        height: u16,
    },
    /// Frame pitch is smaller than one line of pixels
    PitchTooSmall {
        /// Requested pitch in bytes
        pitch: u32,
        /// Minimum pitch (line size) in bytes
        line_size: u32,
    },
    /// Frame pitch exceeds the pitch field
    PitchOutOfRange {
        /// Requested pitch in bytes
        pitch: u32,
    },
    /// Buffer is too small for the frame it should back
    BufferTooSmall {
        /// Required buffer size in bytes
        required: usize,
        /// Provided buffer size in bytes
        provided: usize,
    },
    /// Raw pixel format identifier does not name a format
    InvalidPixelFormat(u32),
    /// Raw blending factor does not name a factor
    InvalidBlendFactor(u32),
    /// Palette has more entries than the layer has slots
    PaletteTooLong {
        /// Number of colors provided
        length: usize,
    },
    /// Palette can only be written while the layer is disabled
    LayerEnabled,
    /// Line interrupt position is beyond the last addressable line
    LineInterruptPositionOutOfRange {
        /// Requested line
        line: u16,
    },
    /// Operation is not allowed in the current driver state
    InvalidState {
        /// State the driver was in
        state: DriverState,
        /// Transition that was attempted
        transition: Transition,
    },
    /// A reload was requested while another one is still pending
    ReloadInProgress,
    /// Another thread is already blocked waiting for a reload
    AlreadyWaiting,
    /// An interrupt fired (or was enabled) without its callback configured
    MissingCallback(InterruptCause),
    /// Operation needs the screen geometry, which only exists once started
    NotStarted,
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::TimingOutOfRange {
                parameter,
                value,
                min,
                max,
            } => write!(f, "{parameter} out of range: {value} not in {min}..={max}"),
            Self::WindowOutOfBounds { window } => write!(
                f,
                "Window out of bounds: h {}..={}, v {}..={}",
                window.hstart, window.hstop, window.vstart, window.vstop
            ),
            Self::FrameTooLarge { width, height } => {
                write!(f, "Frame {width}x{height} larger than screen")
            }
            Self::LineSizeOutOfRange { line_size } => write!(
                f,
                "Frame line size {line_size} bytes exceeds {MAX_LINE_SIZE}"
            ),
            Self::FrameHeightOutOfRange { height } => {
                write!(f, "Frame height {height} exceeds {MAX_FRAME_LINES} lines")
            }
            Self::PitchTooSmall { pitch, line_size } => write!(
                f,
                "Pitch too small: {pitch} bytes, line needs {line_size}"
            ),
            Self::PitchOutOfRange { pitch } => {
                write!(f, "Pitch {pitch} bytes exceeds {MAX_PITCH}")
            }
            Self::BufferTooSmall { required, provided } => write!(
                f,
                "Buffer too small: required {required} bytes, provided {provided}"
            ),
            Self::InvalidPixelFormat(raw) => write!(f, "Invalid pixel format: {raw}"),
            Self::InvalidBlendFactor(raw) => write!(f, "Invalid blending factor: {raw}"),
            Self::PaletteTooLong { length } => write!(
                f,
                "Palette too long: {length} colors, max {MAX_PALETTE_LENGTH}"
            ),
            Self::LayerEnabled => write!(f, "Palette write while layer enabled"),
            Self::LineInterruptPositionOutOfRange { line } => write!(
                f,
                "Line interrupt position {line} exceeds {MAX_LINE_INTERRUPT_POSITION}"
            ),
            Self::InvalidState { state, transition } => {
                write!(f, "Cannot {transition:?} while {state:?}")
            }
            Self::ReloadInProgress => write!(f, "Reload already in progress"),
            Self::AlreadyWaiting => write!(f, "Another thread is waiting for a reload"),
            Self::MissingCallback(cause) => write!(f, "No callback for {cause:?} interrupt"),
            Self::NotStarted => write!(f, "Controller not started"),
        }
    }
}

impl core::error::Error for Error {}

/// Errors that can occur when building configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BuilderError {
    /// Timing was not specified
    ///
    /// [`Builder::timing()`](crate::config::Builder::timing) must be called before building.
    MissingTiming,
}

impl core::fmt::Display for BuilderError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::MissingTiming => write!(f, "Timing must be specified"),
        }
    }
}

impl core::error::Error for BuilderError {}
