//! Controller driver
//!
//! [`Ltdc`] owns the register interface, the scheduler used while waiting for
//! reloads and the bus mutex. Every method takes `&self`, so one instance can
//! sit in a `static` shared by threads and the interrupt handlers.

use core::cell::Cell;

use critical_section::{CriticalSection, Mutex};

use crate::color::Color;
use crate::config::{Config, GlobalFlags};
use crate::error::{Error, MAX_LINE_INTERRUPT_POSITION};
use crate::interrupt::{Callbacks, InterruptCause};
use crate::interface::RegisterInterface;
use crate::layer::{
    Layer, LayerConfig, LayerController, LayerFlags, ScreenGeometry, SharedGeometry,
};
use crate::registers::{
    AWCR, BCCR, BPCR, CPSR, CPSR_X_SHIFT, CPSR_Y_MASK, GCR, GCR_DEN, GCR_FLAGS_MASK, GCR_LTDCEN,
    IER, INT_LINE, LIPCR, LIPCR_MASK, RGB_MASK, SSCR, TWCR,
};
use crate::reload::{ReloadTiming, WaitSlot};
use crate::runtime::{BusMutex, NoBusLock, Scheduler};
use crate::state::{DriverState, Transition};

/// Pixel currently being scanned out, in accumulated coordinates
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct ScanPosition {
    /// Horizontal position
    pub x: u16,
    /// Vertical position (line)
    pub y: u16,
}

/// Two-layer display controller driver
///
/// # Example
///
/// ```
/// use ltdc::{Builder, Ltdc, Mmio, NoBusLock, PollingScheduler, TimingConfig, LTDC_BASE};
///
/// # struct NoDelay;
/// # impl embedded_hal::delay::DelayNs for NoDelay { fn delay_ns(&mut self, _ns: u32) {} }
/// #[allow(unsafe_code)]
/// let regs = unsafe { Mmio::new(LTDC_BASE) };
/// let ltdc = Ltdc::new(regs, PollingScheduler::new(NoDelay), NoBusLock);
///
/// let config = match Builder::new()
///     .timing(TimingConfig::new(480, 272).with_sync(41, 10).with_back_porch(13, 2))
///     .build()
/// {
///     Ok(config) => config,
///     Err(_) => return,
/// };
/// # if false {
/// let _ = ltdc.init();
/// let _ = ltdc.start(&config);
/// # }
/// ```
pub struct Ltdc<R, S: Scheduler, M = NoBusLock> {
    pub(crate) regs: R,
    pub(crate) scheduler: S,
    bus: M,
    state: Mutex<Cell<DriverState>>,
    geometry: SharedGeometry,
    callbacks: Mutex<Cell<Callbacks>>,
    pub(crate) waiter: WaitSlot<S::Thread>,
}

impl<R, S, M> Ltdc<R, S, M>
where
    R: RegisterInterface,
    S: Scheduler,
    M: BusMutex,
{
    /// Create a driver in the [`Uninitialized`](DriverState::Uninitialized) state
    ///
    /// No register is touched until [`start`](Self::start).
    pub const fn new(regs: R, scheduler: S, bus: M) -> Self {
        Self {
            regs,
            scheduler,
            bus,
            state: Mutex::new(Cell::new(DriverState::Uninitialized)),
            geometry: Mutex::new(Cell::new(None)),
            callbacks: Mutex::new(Cell::new(Callbacks::NONE)),
            waiter: WaitSlot::new(),
        }
    }

    /// Second construction phase, leaves the driver
    /// [`Stopped`](DriverState::Stopped)
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidState`] when called twice.
    pub fn init(&self) -> Result<(), Error> {
        critical_section::with(|cs| self.transition(cs, Transition::Init))?;
        Ok(())
    }

    /// Current driver state
    pub fn state(&self) -> DriverState {
        critical_section::with(|cs| self.state_in(cs))
    }

    pub(crate) fn state_in(&self, cs: CriticalSection<'_>) -> DriverState {
        self.state.borrow(cs).get()
    }

    pub(crate) fn set_state(&self, cs: CriticalSection<'_>, state: DriverState) {
        self.state.borrow(cs).set(state);
    }

    /// Apply `transition` to the current state and commit the result
    pub(crate) fn transition(
        &self,
        cs: CriticalSection<'_>,
        transition: Transition,
    ) -> Result<DriverState, Error> {
        let current = self.state_in(cs);
        let next = current.next(transition)?;
        self.set_state(cs, next);
        match transition {
            Transition::RequestReload | Transition::CompleteReload => {
                log::trace!("{:?} -> {:?}", current, next);
            }
            _ => log::debug!("{:?} -> {:?}", current, next),
        }
        Ok(next)
    }

    pub(crate) fn callbacks(&self) -> Callbacks {
        critical_section::with(|cs| self.callbacks.borrow(cs).get())
    }

    /// Screen geometry fixed by the last [`start`](Self::start), if running
    pub fn geometry(&self) -> Option<ScreenGeometry> {
        critical_section::with(|cs| self.geometry.borrow(cs).get())
    }

    /// Controller for `layer`
    ///
    /// Geometry-dependent operations of the returned controller fail with
    /// [`Error::NotStarted`] unless the driver is running.
    pub fn layer(&self, layer: Layer) -> LayerController<'_, R> {
        LayerController::new(&self.regs, layer, &self.geometry)
    }

    /// Controller for layer 1
    pub fn background(&self) -> LayerController<'_, R> {
        self.layer(Layer::Background)
    }

    /// Controller for layer 2
    pub fn foreground(&self) -> LayerController<'_, R> {
        self.layer(Layer::Foreground)
    }

    /// Underlying register interface
    pub const fn registers(&self) -> &R {
        &self.regs
    }

    /// Program timing, layers and interrupts, then enable the controller
    ///
    /// Layers absent from `config` are programmed with
    /// [`LayerConfig::DISABLED`]. Everything is validated before the first
    /// register write.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidState`] unless the driver is stopped
    /// - any timing, window, frame or palette error from the configuration
    pub fn start(&self, config: &Config<'_>) -> Result<(), Error> {
        critical_section::with(|cs| self.state_in(cs).next(Transition::Start))?;

        let windows = config.timing.compute()?;
        let geometry = ScreenGeometry::new(&config.timing, &windows);
        let background = config.background.unwrap_or(LayerConfig::DISABLED);
        let foreground = config.foreground.unwrap_or(LayerConfig::DISABLED);
        background.validate(&geometry)?;
        foreground.validate(&geometry)?;

        self.regs.write(GCR, 0);
        self.regs.write(IER, 0);
        self.force_reload();

        self.regs.write(SSCR, windows.sync.register());
        self.regs.write(BPCR, windows.back_porch.register());
        self.regs.write(AWCR, windows.active.register());
        self.regs.write(TWCR, windows.total.register());

        critical_section::with(|cs| {
            self.geometry.borrow(cs).set(Some(geometry));
            self.callbacks.borrow(cs).set(config.callbacks);
        });

        self.regs
            .write(GCR, config.flags.difference(GlobalFlags::ENABLE).bits());
        self.regs.write(BCCR, config.clear_color.rgb());

        for layer in Layer::ALL {
            self.layer(layer).set_enable_flags(LayerFlags::empty());
        }
        let configured = self
            .background()
            .set_config(&background)
            .and_then(|()| self.foreground().set_config(&foreground));
        if let Err(err) = configured {
            self.forget_configuration();
            return Err(err);
        }

        self.regs.write(IER, config.callbacks.enable_mask());
        self.force_reload();
        critical_section::with(|_| self.regs.set_bits(GCR, GCR_LTDCEN));
        self.force_reload();

        critical_section::with(|cs| self.transition(cs, Transition::Start))?;
        log::debug!(
            "started {}x{}, active window {:?}",
            geometry.width,
            geometry.height,
            geometry.active
        );
        Ok(())
    }

    /// Disable the controller and its interrupts
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidState`] unless the driver is
    /// [`Ready`](DriverState::Ready).
    pub fn stop(&self) -> Result<(), Error> {
        critical_section::with(|cs| self.state_in(cs).next(Transition::Stop))?;

        critical_section::with(|_| self.regs.clear_bits(GCR, GCR_LTDCEN));
        self.regs.write(IER, 0);
        self.reload(ReloadTiming::Immediate)?;

        critical_section::with(|cs| self.transition(cs, Transition::Stop))?;
        self.forget_configuration();
        log::debug!("stopped");
        Ok(())
    }

    fn forget_configuration(&self) {
        critical_section::with(|cs| {
            self.geometry.borrow(cs).set(None);
            self.callbacks.borrow(cs).set(Callbacks::NONE);
        });
    }

    // Global flags

    /// Current global flags
    pub fn enable_flags(&self) -> GlobalFlags {
        GlobalFlags::from_bits_truncate(self.regs.read(GCR))
    }

    /// Replace the global flags
    ///
    /// [`GlobalFlags::ENABLE`] is owned by [`start`](Self::start) and
    /// [`stop`](Self::stop) and is left untouched.
    pub fn set_enable_flags(&self, flags: GlobalFlags) {
        let mask = GCR_FLAGS_MASK & !GCR_LTDCEN;
        critical_section::with(|_| self.regs.modify(GCR, mask, flags.bits()));
    }

    /// Whether dithering is on
    pub fn is_dithering_enabled(&self) -> bool {
        self.regs.read(GCR) & GCR_DEN != 0
    }

    /// Turn dithering on
    pub fn enable_dithering(&self) {
        critical_section::with(|_| self.regs.set_bits(GCR, GCR_DEN));
    }

    /// Turn dithering off
    pub fn disable_dithering(&self) {
        critical_section::with(|_| self.regs.clear_bits(GCR, GCR_DEN));
    }

    /// Color shown where no layer is visible (RGB, alpha reads as zero)
    pub fn clear_color(&self) -> Color {
        Color(self.regs.read(BCCR) & RGB_MASK)
    }

    /// Set the color shown where no layer is visible; alpha is ignored
    pub fn set_clear_color(&self, color: Color) {
        self.regs.write(BCCR, color.rgb());
    }

    // Line interrupt

    /// Line at which the line interrupt fires
    pub fn line_interrupt_position(&self) -> u16 {
        (self.regs.read(LIPCR) & LIPCR_MASK) as u16
    }

    /// Set the line at which the line interrupt fires
    ///
    /// # Errors
    ///
    /// Returns [`Error::LineInterruptPositionOutOfRange`] above 2047.
    pub fn set_line_interrupt_position(&self, line: u16) -> Result<(), Error> {
        if line > MAX_LINE_INTERRUPT_POSITION {
            return Err(Error::LineInterruptPositionOutOfRange { line });
        }
        self.regs.write(LIPCR, u32::from(line));
        Ok(())
    }

    /// Whether the line interrupt is enabled
    pub fn is_line_interrupt_enabled(&self) -> bool {
        self.regs.read(IER) & INT_LINE != 0
    }

    /// Enable the line interrupt
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingCallback`] when the running configuration has
    /// no line callback.
    pub fn enable_line_interrupt(&self) -> Result<(), Error> {
        if self.callbacks().line.is_none() {
            return Err(Error::MissingCallback(InterruptCause::Line));
        }
        critical_section::with(|_| self.regs.set_bits(IER, INT_LINE));
        Ok(())
    }

    /// Disable the line interrupt
    pub fn disable_line_interrupt(&self) {
        critical_section::with(|_| self.regs.clear_bits(IER, INT_LINE));
    }

    /// Pixel being scanned out right now
    pub fn current_position(&self) -> ScanPosition {
        let cpsr = self.regs.read(CPSR);
        ScanPosition {
            x: (cpsr >> CPSR_X_SHIFT) as u16,
            y: (cpsr & CPSR_Y_MASK) as u16,
        }
    }

    /// Take the bus mutex until the returned guard is dropped
    ///
    /// Use it to keep several layer edits and their reload together.
    pub fn acquire_bus(&self) -> BusGuard<'_, M> {
        self.bus.lock();
        BusGuard { bus: &self.bus }
    }
}

/// Ownership of the bus mutex, released on drop
#[must_use = "the bus is released as soon as the guard is dropped"]
pub struct BusGuard<'a, M: BusMutex> {
    bus: &'a M,
}

impl<M: BusMutex> Drop for BusGuard<'_, M> {
    fn drop(&mut self) {
        self.bus.unlock();
    }
}
