//! Interrupt dispatch
//!
//! The controller has two interrupt lines: the *event* line (line match,
//! register reload) and the *error* line (FIFO underrun, transfer error).
//! The application's vector handlers call [`Ltdc::on_event_interrupt`] and
//! [`Ltdc::on_error_interrupt`]; the driver does not register vectors itself.
//!
//! Each cause is serviced only when both its status and enable bits are set,
//! and exactly that cause's flag is cleared.
//!
//! ## Example
//!
//! ```rust,ignore
//! #[interrupt]
//! fn LTDC() {
//!     let _ = LTDC_DRIVER.on_event_interrupt();
//! }
//!
//! #[interrupt]
//! fn LTDC_ER() {
//!     let _ = LTDC_DRIVER.on_error_interrupt();
//! }
//! ```

use crate::driver::Ltdc;
use crate::error::Error;
use crate::interface::RegisterInterface;
use crate::registers::{
    ICR, IER, INT_FIFO_UNDERRUN, INT_LINE, INT_RELOAD, INT_TRANSFER_ERROR, ISR,
};
use crate::runtime::{BusMutex, Scheduler};
use crate::state::Transition;

/// Interrupt callback, run in interrupt context
pub type Callback = fn();

/// Reason the controller raised an interrupt
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum InterruptCause {
    /// Scan reached the programmed line
    Line,
    /// Shadow registers were reloaded
    ReloadComplete,
    /// Pixel FIFO ran empty during scan-out
    FifoUnderrun,
    /// Bus error while fetching pixels
    TransferError,
}

impl InterruptCause {
    /// Status / enable / clear bit of this cause
    pub const fn flag(self) -> u32 {
        match self {
            Self::Line => INT_LINE,
            Self::ReloadComplete => INT_RELOAD,
            Self::FifoUnderrun => INT_FIFO_UNDERRUN,
            Self::TransferError => INT_TRANSFER_ERROR,
        }
    }
}

/// Interrupt callbacks
///
/// Line, FIFO-underrun and transfer-error interrupts are only enabled when
/// their callback is present. The reload interrupt is always enabled; its
/// callback is optional.
#[derive(Clone, Copy, Default, Debug)]
pub struct Callbacks {
    /// Scan reached the line interrupt position
    pub line: Option<Callback>,
    /// Reload completed, before any waiting thread is resumed
    pub reload: Option<Callback>,
    /// FIFO underrun
    pub fifo_underrun: Option<Callback>,
    /// Transfer error
    pub transfer_error: Option<Callback>,
}

impl Callbacks {
    /// No callbacks
    pub const NONE: Self = Self {
        line: None,
        reload: None,
        fifo_underrun: None,
        transfer_error: None,
    };

    /// Callback registered for `cause`
    pub const fn get(&self, cause: InterruptCause) -> Option<Callback> {
        match cause {
            InterruptCause::Line => self.line,
            InterruptCause::ReloadComplete => self.reload,
            InterruptCause::FifoUnderrun => self.fifo_underrun,
            InterruptCause::TransferError => self.transfer_error,
        }
    }

    /// Interrupt enable bits implied by these callbacks
    pub const fn enable_mask(&self) -> u32 {
        let mut mask = INT_RELOAD;
        if self.line.is_some() {
            mask |= INT_LINE;
        }
        if self.fifo_underrun.is_some() {
            mask |= INT_FIFO_UNDERRUN;
        }
        if self.transfer_error.is_some() {
            mask |= INT_TRANSFER_ERROR;
        }
        mask
    }
}

impl<R, S, M> Ltdc<R, S, M>
where
    R: RegisterInterface,
    S: Scheduler,
    M: BusMutex,
{
    /// Service the event interrupt line (line match, reload complete)
    ///
    /// # Errors
    ///
    /// - [`Error::MissingCallback`] if a line interrupt fired without a callback
    /// - [`Error::InvalidState`] if a reload completed while stopped
    ///
    /// All pending causes are serviced and cleared even when one fails; the
    /// first error is returned.
    pub fn on_event_interrupt(&self) -> Result<(), Error> {
        let pending = self.pending_interrupts();
        let mut result = Ok(());

        if pending & INT_LINE != 0 {
            result = result.and(self.dispatch(InterruptCause::Line));
        }
        if pending & INT_RELOAD != 0 {
            self.regs.write(ICR, INT_RELOAD);
            if let Some(callback) = self.callbacks().reload {
                callback();
            }
            result = result.and(self.complete_reload());
        }
        result
    }

    /// Service the error interrupt line (FIFO underrun, transfer error)
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingCallback`] if a cause fired without a callback.
    pub fn on_error_interrupt(&self) -> Result<(), Error> {
        let pending = self.pending_interrupts();
        let mut result = Ok(());

        if pending & INT_FIFO_UNDERRUN != 0 {
            log::warn!("FIFO underrun");
            result = result.and(self.dispatch(InterruptCause::FifoUnderrun));
        }
        if pending & INT_TRANSFER_ERROR != 0 {
            log::warn!("transfer error");
            result = result.and(self.dispatch(InterruptCause::TransferError));
        }
        result
    }

    fn pending_interrupts(&self) -> u32 {
        self.regs.read(ISR) & self.regs.read(IER)
    }

    /// Clear `cause` and run its mandatory callback
    ///
    /// The flag is cleared before the callback runs, so a new occurrence
    /// raised while the callback executes stays pending for the next entry
    /// instead of being wiped.
    fn dispatch(&self, cause: InterruptCause) -> Result<(), Error> {
        self.regs.write(ICR, cause.flag());
        match self.callbacks().get(cause) {
            Some(callback) => {
                callback();
                Ok(())
            }
            None => {
                log::error!("{:?} interrupt without callback", cause);
                Err(Error::MissingCallback(cause))
            }
        }
    }

    fn complete_reload(&self) -> Result<(), Error> {
        critical_section::with(|cs| {
            let result = self.transition(cs, Transition::CompleteReload);
            if let Some(thread) = self.waiter.take(cs) {
                self.scheduler.resume(thread);
            }
            match result {
                Ok(_) => {
                    log::trace!("reload completed");
                    Ok(())
                }
                Err(err) => {
                    log::warn!("unexpected reload interrupt: {}", err);
                    Err(err)
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use core::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::LazyLock;

    use super::*;
    use crate::config::{Builder, Config};
    use crate::runtime::NoBusLock;
    use crate::state::DriverState;
    use crate::testing::{FakeRegisters, ThreadScheduler};
    use crate::timing::TimingConfig;

    type TestLtdc<'a> = Ltdc<&'a FakeRegisters, ThreadScheduler, NoBusLock>;

    fn start<'a>(regs: &'a FakeRegisters, config: &Config<'_>) -> TestLtdc<'a> {
        let ltdc = Ltdc::new(regs, ThreadScheduler, NoBusLock);
        ltdc.init().unwrap();
        ltdc.start(config).unwrap();
        regs.set(ISR, 0);
        regs.clear_log();
        ltdc
    }

    fn timing() -> TimingConfig {
        TimingConfig::new(320, 240).with_sync(10, 2)
    }

    #[test]
    fn test_enable_mask_follows_callbacks() {
        fn noop() {}
        assert_eq!(Callbacks::NONE.enable_mask(), INT_RELOAD);
        let callbacks = Callbacks {
            line: Some(noop),
            transfer_error: Some(noop),
            ..Callbacks::NONE
        };
        assert_eq!(
            callbacks.enable_mask(),
            INT_RELOAD | INT_LINE | INT_TRANSFER_ERROR
        );
    }

    #[test]
    fn test_line_interrupt_runs_callback_and_clears_only_its_flag() {
        static HITS: AtomicUsize = AtomicUsize::new(0);
        fn on_line() {
            HITS.fetch_add(1, Ordering::SeqCst);
        }
        let regs = FakeRegisters::new();
        let config = Builder::new().timing(timing()).on_line(on_line).build().unwrap();
        let ltdc = start(&regs, &config);

        regs.raise(INT_LINE | INT_FIFO_UNDERRUN);
        ltdc.on_event_interrupt().unwrap();
        assert_eq!(HITS.load(Ordering::SeqCst), 1);
        assert_eq!(regs.writes_to(ICR), [INT_LINE]);
        assert_eq!(regs.get(ISR), INT_FIFO_UNDERRUN);
    }

    #[test]
    fn test_flag_raised_during_callback_stays_pending() {
        static REGS: LazyLock<FakeRegisters> = LazyLock::new(FakeRegisters::new);
        fn on_line() {
            REGS.raise(INT_LINE);
        }
        let config = Builder::new().timing(timing()).on_line(on_line).build().unwrap();
        let ltdc = start(&REGS, &config);

        REGS.raise(INT_LINE);
        ltdc.on_event_interrupt().unwrap();
        assert_eq!(REGS.writes_to(ICR), [INT_LINE]);
        assert_eq!(REGS.get(ISR), INT_LINE);
    }

    #[test]
    fn test_disabled_cause_ignored() {
        let regs = FakeRegisters::new();
        let config = Builder::new().timing(timing()).build().unwrap();
        let ltdc = start(&regs, &config);

        regs.raise(INT_LINE);
        ltdc.on_event_interrupt().unwrap();
        assert!(regs.writes_to(ICR).is_empty());
    }

    #[test]
    fn test_enabled_cause_without_callback_reported() {
        let regs = FakeRegisters::new();
        let config = Builder::new().timing(timing()).build().unwrap();
        let ltdc = start(&regs, &config);

        regs.set(IER, INT_RELOAD | INT_FIFO_UNDERRUN);
        regs.raise(INT_FIFO_UNDERRUN);
        assert_eq!(
            ltdc.on_error_interrupt(),
            Err(Error::MissingCallback(InterruptCause::FifoUnderrun))
        );
        assert_eq!(regs.get(ISR), 0);
    }

    #[test]
    fn test_error_interrupts_dispatched() {
        static UNDERRUNS: AtomicUsize = AtomicUsize::new(0);
        static TRANSFER_ERRORS: AtomicUsize = AtomicUsize::new(0);
        fn on_underrun() {
            UNDERRUNS.fetch_add(1, Ordering::SeqCst);
        }
        fn on_transfer_error() {
            TRANSFER_ERRORS.fetch_add(1, Ordering::SeqCst);
        }
        let regs = FakeRegisters::new();
        let config = Builder::new()
            .timing(timing())
            .on_fifo_underrun(on_underrun)
            .on_transfer_error(on_transfer_error)
            .build()
            .unwrap();
        let ltdc = start(&regs, &config);

        regs.raise(INT_FIFO_UNDERRUN | INT_TRANSFER_ERROR);
        ltdc.on_error_interrupt().unwrap();
        assert_eq!(UNDERRUNS.load(Ordering::SeqCst), 1);
        assert_eq!(TRANSFER_ERRORS.load(Ordering::SeqCst), 1);
        assert_eq!(
            regs.writes_to(ICR),
            [INT_FIFO_UNDERRUN, INT_TRANSFER_ERROR]
        );
    }

    #[test]
    fn test_reload_interrupt_completes_reload() {
        static RELOADS: AtomicUsize = AtomicUsize::new(0);
        fn on_reload() {
            RELOADS.fetch_add(1, Ordering::SeqCst);
        }
        let regs = FakeRegisters::new();
        let config = Builder::new().timing(timing()).on_reload(on_reload).build().unwrap();
        let ltdc = start(&regs, &config);
        regs.set_auto_reload(false);

        ltdc.start_reload(crate::ReloadTiming::VerticalBlanking).unwrap();
        regs.complete_reload();
        ltdc.on_event_interrupt().unwrap();
        assert_eq!(RELOADS.load(Ordering::SeqCst), 1);
        assert_eq!(ltdc.state(), DriverState::Ready);
        assert_eq!(regs.writes_to(ICR), [INT_RELOAD]);
    }

    #[test]
    fn test_reload_interrupt_while_stopped_reported() {
        let regs = FakeRegisters::new();
        let ltdc: TestLtdc<'_> = Ltdc::new(&regs, ThreadScheduler, NoBusLock);
        ltdc.init().unwrap();
        regs.set(IER, INT_RELOAD);
        regs.raise(INT_RELOAD);
        assert!(matches!(
            ltdc.on_event_interrupt(),
            Err(Error::InvalidState {
                state: DriverState::Stopped,
                transition: Transition::CompleteReload
            })
        ));
        assert_eq!(regs.get(ISR), 0);
    }
}
