//! LTDC Display Controller Driver
//!
//! A driver for the two-layer LCD-TFT display controller found on STM32F4,
//! STM32F7 and STM32H7 parts, for panels up to 800x600 pixels.
//!
//! ## Features
//!
//! - `no_std` compatible, no allocation
//! - Panel timing validated and converted to the controller's accumulated form
//! - Two blended layers with window, frame buffer, palette and color keying
//! - Tear-free shadow-register reloads at vertical blanking
//! - Interrupt dispatch to plain function callbacks
//! - Shareable from a `static` (`&self` API over `critical-section`)
//! - `embedded-graphics` color interop (with `graphics` feature)
//!
//! ## Usage
//!
//! ```rust
//! use ltdc::{
//!     Builder, Color, Frame, LayerConfig, LayerFlags, Ltdc, NoBusLock, PixelFormat,
//!     PollingScheduler, ReloadTiming, TimingConfig, Window,
//! };
//! # use core::cell::Cell;
//! # struct Regs([Cell<u32>; 0x60]);
//! # impl ltdc::RegisterInterface for Regs {
//! #     fn read(&self, offset: u32) -> u32 {
//! #         if offset == ltdc::registers::SRCR { 0 } else { self.0[offset as usize / 4].get() }
//! #     }
//! #     fn write(&self, offset: u32, value: u32) { self.0[offset as usize / 4].set(value) }
//! # }
//! # struct NoDelay;
//! # impl embedded_hal::delay::DelayNs for NoDelay { fn delay_ns(&mut self, _ns: u32) {} }
//! # fn main() -> Result<(), ltdc::Error> {
//! # let regs = Regs([const { Cell::new(0) }; 0x60]);
//! # let delay = NoDelay;
//!
//! static FRONT: [u8; 480 * 272 * 2] = [0; 480 * 272 * 2];
//! static BACK: [u8; 480 * 272 * 2] = [0; 480 * 272 * 2];
//!
//! let timing = TimingConfig::new(480, 272)
//!     .with_sync(41, 10)
//!     .with_back_porch(13, 2)
//!     .with_front_porch(32, 2);
//! let background = LayerConfig {
//!     frame: Frame::from_buffer(&FRONT, 480, 272, PixelFormat::Rgb565)?,
//!     window: Window::full(480, 272),
//!     flags: LayerFlags::ENABLE,
//!     ..LayerConfig::DISABLED
//! };
//! let config = match Builder::new()
//!     .timing(timing)
//!     .clear_color(Color::BLACK)
//!     .background(background)
//!     .build()
//! {
//!     Ok(config) => config,
//!     Err(_) => return Ok(()),
//! };
//!
//! let ltdc = Ltdc::new(regs, PollingScheduler::new(delay), NoBusLock);
//! ltdc.init()?;
//! ltdc.start(&config)?;
//!
//! // Flip to the other buffer at the next vertical blanking period
//! ltdc.background().set_frame_address(BACK.as_ptr() as u32);
//! ltdc.reload(ReloadTiming::VerticalBlanking)?;
//! # Ok(())
//! # }
//! ```

#![cfg_attr(not(test), no_std)]

#[cfg(any(test, feature = "alloc"))]
extern crate alloc;

/// Canonical ARGB8888 color
pub mod color;
/// Controller configuration types and builder
pub mod config;
/// Controller driver and global operations
pub mod driver;
/// Error types and hardware bounds
pub mod error;
/// Pixel format catalogue and conversions
pub mod format;
/// Register access abstraction
pub mod interface;
/// Interrupt dispatch
pub mod interrupt;
/// Layer configuration and control
pub mod layer;
/// Register map
pub mod registers;
/// Shadow-register reload protocol
pub mod reload;
/// Scheduling and bus-locking capabilities
pub mod runtime;
/// Driver lifecycle state machine
pub mod state;
/// Panel timing calculation
pub mod timing;

/// Color interop with embedded-graphics (requires `graphics` feature)
#[cfg(feature = "graphics")]
pub mod graphics;

#[cfg(test)]
mod testing;

pub use color::Color;
pub use config::{Builder, Config, GlobalFlags};
pub use driver::{BusGuard, Ltdc, ScanPosition};
pub use error::{BuilderError, Error};
pub use format::PixelFormat;
pub use interface::{LTDC_BASE, Mmio, RegisterInterface};
pub use interrupt::{Callback, Callbacks, InterruptCause};
pub use layer::{
    BlendFactors, CurrentFactor, Frame, Layer, LayerConfig, LayerController, LayerFlags,
    ScreenGeometry, SubjacentFactor, Window,
};
pub use reload::ReloadTiming;
pub use runtime::{BusMutex, NoBusLock, PollingScheduler, Scheduler};
pub use state::{DriverState, Transition};
pub use timing::{ActiveWindow, TimingConfig, TimingWindows};
