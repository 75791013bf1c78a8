//! Display timing derivation
//!
//! The controller is programmed with *accumulated* pixel-clock positions: the
//! last pixel of the sync pulse, of the back porch, of the active area, and
//! of the whole line (and the same for lines in a frame). This module turns
//! the declarative [`TimingConfig`] into those four register windows and the
//! resulting [`ActiveWindow`], rejecting any value outside the hardware
//! bounds instead of clamping it.
//!
//! ```text
//!  |<- hsync ->|<- hbp ->|<------ width ------>|<- hfp ->|
//!  0       sync.width   back_porch.width   active.width  total.width
//! ```
//!
//! ## Example
//!
//! ```
//! use ltdc::TimingConfig;
//!
//! let timing = TimingConfig::new(480, 272)
//!     .with_sync(41, 10)
//!     .with_back_porch(13, 2)
//!     .with_front_porch(32, 2);
//! let windows = timing.compute().unwrap();
//!
//! assert_eq!(windows.active_window.hstart, 54);
//! assert_eq!(windows.active_window.hstop, 533);
//! assert_eq!(windows.active_window.vstart, 12);
//! assert_eq!(windows.active_window.vstop, 283);
//! ```

use crate::error::{
    Error, MAX_ACCUMULATED_HEIGHT, MAX_ACCUMULATED_WIDTH, MAX_SCREEN_HEIGHT, MAX_SCREEN_WIDTH,
};
use crate::registers::{TIMING_H_MASK, TIMING_H_SHIFT, TIMING_V_MASK};

/// Names a timing input or derived accumulated value
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TimingParameter {
    /// Active width in pixels
    ScreenWidth,
    /// Active height in lines
    ScreenHeight,
    /// Horizontal sync pulse width
    HsyncWidth,
    /// Vertical sync pulse height
    VsyncHeight,
    /// Horizontal back porch
    HBackPorch,
    /// Vertical back porch
    VBackPorch,
    /// Horizontal front porch
    HFrontPorch,
    /// Vertical front porch
    VFrontPorch,
    /// Sync plus back porch, horizontally
    AccumulatedHBackPorch,
    /// Sync plus back porch, vertically
    AccumulatedVBackPorch,
    /// Sync, back porch and active width
    AccumulatedActiveWidth,
    /// Sync, back porch and active height
    AccumulatedActiveHeight,
    /// Full line length
    TotalWidth,
    /// Full frame height
    TotalHeight,
}

impl core::fmt::Display for TimingParameter {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            Self::ScreenWidth => "screen width",
            Self::ScreenHeight => "screen height",
            Self::HsyncWidth => "hsync width",
            Self::VsyncHeight => "vsync height",
            Self::HBackPorch => "horizontal back porch",
            Self::VBackPorch => "vertical back porch",
            Self::HFrontPorch => "horizontal front porch",
            Self::VFrontPorch => "vertical front porch",
            Self::AccumulatedHBackPorch => "accumulated horizontal back porch",
            Self::AccumulatedVBackPorch => "accumulated vertical back porch",
            Self::AccumulatedActiveWidth => "accumulated active width",
            Self::AccumulatedActiveHeight => "accumulated active height",
            Self::TotalWidth => "total width",
            Self::TotalHeight => "total height",
        };
        f.write_str(name)
    }
}

/// Declarative panel timing
///
/// All values are in pixel clocks (horizontal) or lines (vertical).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimingConfig {
    /// Active width in pixels (1..=800)
    pub screen_width: u16,
    /// Active height in lines (1..=600)
    pub screen_height: u16,
    /// Horizontal sync pulse width (1..=4096)
    pub hsync_width: u16,
    /// Vertical sync pulse height (1..=2048)
    pub vsync_height: u16,
    /// Horizontal back porch (0..=4096)
    pub h_back_porch: u16,
    /// Vertical back porch (0..=2048)
    pub v_back_porch: u16,
    /// Horizontal front porch (0..=4096)
    pub h_front_porch: u16,
    /// Vertical front porch (0..=2048)
    pub v_front_porch: u16,
}

impl TimingConfig {
    /// Timing for a screen of the given size with one-clock sync pulses and no porches
    pub const fn new(screen_width: u16, screen_height: u16) -> Self {
        Self {
            screen_width,
            screen_height,
            hsync_width: 1,
            vsync_height: 1,
            h_back_porch: 0,
            v_back_porch: 0,
            h_front_porch: 0,
            v_front_porch: 0,
        }
    }

    /// Set the sync pulse sizes
    pub const fn with_sync(mut self, hsync_width: u16, vsync_height: u16) -> Self {
        self.hsync_width = hsync_width;
        self.vsync_height = vsync_height;
        self
    }

    /// Set the back porches
    pub const fn with_back_porch(mut self, horizontal: u16, vertical: u16) -> Self {
        self.h_back_porch = horizontal;
        self.v_back_porch = vertical;
        self
    }

    /// Set the front porches
    pub const fn with_front_porch(mut self, horizontal: u16, vertical: u16) -> Self {
        self.h_front_porch = horizontal;
        self.v_front_porch = vertical;
        self
    }

    /// Derive the accumulated register windows
    ///
    /// # Errors
    ///
    /// Returns [`Error::TimingOutOfRange`] for the first raw or accumulated
    /// value found outside its bounds.
    pub fn compute(&self) -> Result<TimingWindows, Error> {
        let mut h = Accumulator::new(MAX_ACCUMULATED_WIDTH);
        let mut v = Accumulator::new(MAX_ACCUMULATED_HEIGHT);

        check(TimingParameter::HsyncWidth, self.hsync_width, 1, MAX_ACCUMULATED_WIDTH)?;
        check(TimingParameter::VsyncHeight, self.vsync_height, 1, MAX_ACCUMULATED_HEIGHT)?;
        h.acc = u32::from(self.hsync_width) - 1;
        v.acc = u32::from(self.vsync_height) - 1;
        let sync = AccumulatedWindow::from_acc(&h, &v);

        check(TimingParameter::HBackPorch, self.h_back_porch, 0, MAX_ACCUMULATED_WIDTH)?;
        check(TimingParameter::VBackPorch, self.v_back_porch, 0, MAX_ACCUMULATED_HEIGHT)?;
        h.add(self.h_back_porch, TimingParameter::AccumulatedHBackPorch)?;
        v.add(self.v_back_porch, TimingParameter::AccumulatedVBackPorch)?;
        let back_porch = AccumulatedWindow::from_acc(&h, &v);

        check(TimingParameter::ScreenWidth, self.screen_width, 1, u32::from(MAX_SCREEN_WIDTH))?;
        check(TimingParameter::ScreenHeight, self.screen_height, 1, u32::from(MAX_SCREEN_HEIGHT))?;
        h.add(self.screen_width, TimingParameter::AccumulatedActiveWidth)?;
        v.add(self.screen_height, TimingParameter::AccumulatedActiveHeight)?;
        let active = AccumulatedWindow::from_acc(&h, &v);

        check(TimingParameter::HFrontPorch, self.h_front_porch, 0, MAX_ACCUMULATED_WIDTH)?;
        check(TimingParameter::VFrontPorch, self.v_front_porch, 0, MAX_ACCUMULATED_HEIGHT)?;
        h.add(self.h_front_porch, TimingParameter::TotalWidth)?;
        v.add(self.v_front_porch, TimingParameter::TotalHeight)?;
        let total = AccumulatedWindow::from_acc(&h, &v);

        let active_window = ActiveWindow {
            hstart: back_porch.width + 1,
            hstop: active.width,
            vstart: back_porch.height + 1,
            vstop: active.height,
        };

        Ok(TimingWindows {
            sync,
            back_porch,
            active,
            total,
            active_window,
        })
    }
}

fn check(parameter: TimingParameter, value: u16, min: u32, max: u32) -> Result<(), Error> {
    let value = u32::from(value);
    if value < min || value > max {
        return Err(Error::TimingOutOfRange {
            parameter,
            value,
            min,
            max,
        });
    }
    Ok(())
}

struct Accumulator {
    acc: u32,
    max: u32,
}

impl Accumulator {
    const fn new(max: u32) -> Self {
        Self { acc: 0, max }
    }

    /// Add a stage and check the accumulated count (`acc + 1`)
    fn add(&mut self, amount: u16, parameter: TimingParameter) -> Result<(), Error> {
        let acc = self.acc + u32::from(amount);
        let count = acc + 1;
        if count > self.max {
            return Err(Error::TimingOutOfRange {
                parameter,
                value: count,
                min: 1,
                max: self.max,
            });
        }
        self.acc = acc;
        Ok(())
    }
}

/// One accumulated timing register: last horizontal and vertical position of a stage
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AccumulatedWindow {
    /// Accumulated pixel clocks, minus one
    pub width: u16,
    /// Accumulated lines, minus one
    pub height: u16,
}

impl AccumulatedWindow {
    fn from_acc(h: &Accumulator, v: &Accumulator) -> Self {
        Self {
            width: h.acc as u16,
            height: v.acc as u16,
        }
    }

    /// Packed register value, `(width << 16) | height`
    pub const fn register(self) -> u32 {
        (((self.width as u32) << TIMING_H_SHIFT) & TIMING_H_MASK)
            | (self.height as u32 & TIMING_V_MASK)
    }
}

/// Visible area in accumulated pixel-clock coordinates (inclusive)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct ActiveWindow {
    /// First visible pixel clock
    pub hstart: u16,
    /// Last visible pixel clock
    pub hstop: u16,
    /// First visible line
    pub vstart: u16,
    /// Last visible line
    pub vstop: u16,
}

impl ActiveWindow {
    /// Visible width in pixels, 0 if `hstop` is before `hstart`
    pub const fn width(&self) -> u16 {
        inclusive_span(self.hstart, self.hstop)
    }

    /// Visible height in lines, 0 if `vstop` is before `vstart`
    pub const fn height(&self) -> u16 {
        inclusive_span(self.vstart, self.vstop)
    }
}

/// Number of positions in `start..=stop`, saturating at `u16::MAX`
pub(crate) const fn inclusive_span(start: u16, stop: u16) -> u16 {
    if stop < start {
        0
    } else {
        (stop - start).saturating_add(1)
    }
}

/// All values derived from a [`TimingConfig`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimingWindows {
    /// Sync pulse (SSCR)
    pub sync: AccumulatedWindow,
    /// Sync plus back porch (BPCR)
    pub back_porch: AccumulatedWindow,
    /// Through the active area (AWCR)
    pub active: AccumulatedWindow,
    /// Whole line / frame (TWCR)
    pub total: AccumulatedWindow,
    /// Visible area
    pub active_window: ActiveWindow,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn panel_480x272() -> TimingConfig {
        TimingConfig::new(480, 272)
            .with_sync(41, 10)
            .with_back_porch(13, 2)
            .with_front_porch(32, 2)
    }

    #[test]
    fn test_accumulated_windows() {
        let windows = panel_480x272().compute().unwrap();
        assert_eq!(windows.sync, AccumulatedWindow { width: 40, height: 9 });
        assert_eq!(windows.back_porch, AccumulatedWindow { width: 53, height: 11 });
        assert_eq!(windows.active, AccumulatedWindow { width: 533, height: 283 });
        assert_eq!(windows.total, AccumulatedWindow { width: 565, height: 285 });
    }

    #[test]
    fn test_active_window() {
        let active = panel_480x272().compute().unwrap().active_window;
        assert_eq!(
            active,
            ActiveWindow {
                hstart: 54,
                hstop: 533,
                vstart: 12,
                vstop: 283
            }
        );
        assert_eq!(active.width(), 480);
        assert_eq!(active.height(), 272);
    }

    #[test]
    fn test_register_packing() {
        let window = AccumulatedWindow { width: 533, height: 283 };
        assert_eq!(window.register(), (533 << 16) | 283);
    }

    #[test]
    fn test_minimal_timing() {
        let windows = TimingConfig::new(1, 1).compute().unwrap();
        assert_eq!(windows.sync, AccumulatedWindow { width: 0, height: 0 });
        assert_eq!(windows.active_window.hstart, 1);
        assert_eq!(windows.active_window.hstop, 1);
    }

    #[test]
    fn test_zero_sync_rejected() {
        let result = TimingConfig::new(480, 272).with_sync(0, 10).compute();
        assert!(matches!(
            result,
            Err(Error::TimingOutOfRange {
                parameter: TimingParameter::HsyncWidth,
                value: 0,
                ..
            })
        ));
    }

    #[test]
    fn test_screen_too_wide_rejected() {
        let result = TimingConfig::new(801, 272).compute();
        assert!(matches!(
            result,
            Err(Error::TimingOutOfRange {
                parameter: TimingParameter::ScreenWidth,
                value: 801,
                min: 1,
                max: 800
            })
        ));
    }

    #[test]
    fn test_accumulated_overflow_rejected() {
        let result = TimingConfig::new(800, 600)
            .with_sync(4000, 1)
            .compute();
        assert!(matches!(
            result,
            Err(Error::TimingOutOfRange {
                parameter: TimingParameter::AccumulatedActiveWidth,
                ..
            })
        ));
    }

    #[test]
    fn test_total_height_bound_is_inclusive() {
        // 2047 + 1 == 2048 fits exactly
        let windows = TimingConfig::new(1, 600)
            .with_sync(1, 1000)
            .with_back_porch(0, 448)
            .compute()
            .unwrap();
        assert_eq!(windows.total.height, 2047);

        let result = TimingConfig::new(1, 600)
            .with_sync(1, 1000)
            .with_back_porch(0, 448)
            .with_front_porch(0, 1)
            .compute();
        assert!(matches!(
            result,
            Err(Error::TimingOutOfRange {
                parameter: TimingParameter::TotalHeight,
                value: 2049,
                ..
            })
        ));
    }

    #[test]
    fn test_inverted_active_window_has_no_size() {
        let active = ActiveWindow {
            hstart: 60,
            hstop: 10,
            vstart: 0,
            vstop: u16::MAX,
        };
        assert_eq!(active.width(), 0);
        assert_eq!(active.height(), u16::MAX);
    }
}
