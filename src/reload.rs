//! Shadow-register reload protocol
//!
//! Register writes made through the driver are staged in shadow registers.
//! A reload copies them into the active set, either immediately or at the
//! next vertical blanking period (tear-free). Only one reload can be pending
//! at a time; see [`DriverState`] for the state machine.
//!
//! Waiting is cooperative:
//! - an immediate reload is short, so the caller polls the hardware flag and
//!   yields between polls;
//! - a vertical-blanking reload can take a whole frame, so the caller
//!   suspends and the reload interrupt resumes it. At most one thread can be
//!   suspended this way; the slot it occupies is released when the wait ends.

use core::cell::Cell;

use critical_section::{CriticalSection, Mutex};

use crate::driver::Ltdc;
use crate::error::Error;
use crate::interface::RegisterInterface;
use crate::registers::{SRCR, SRCR_IMR, SRCR_VBR};
use crate::runtime::{BusMutex, Scheduler};
use crate::state::{DriverState, Transition};

/// When staged registers become active
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ReloadTiming {
    /// As soon as possible, possibly mid-frame
    Immediate,
    /// At the start of the next vertical blanking period
    VerticalBlanking,
}

impl ReloadTiming {
    const fn request_bit(self) -> u32 {
        match self {
            Self::Immediate => SRCR_IMR,
            Self::VerticalBlanking => SRCR_VBR,
        }
    }
}

/// Holds the one thread allowed to block on a pending reload
///
/// Each claim is numbered, so a ticket only ever empties the slot it filled
/// and never evicts a later waiter.
pub(crate) struct WaitSlot<T> {
    slot: Mutex<Cell<Option<(u32, T)>>>,
    generation: Mutex<Cell<u32>>,
}

impl<T> WaitSlot<T> {
    pub(crate) const fn new() -> Self {
        Self {
            slot: Mutex::new(Cell::new(None)),
            generation: Mutex::new(Cell::new(0)),
        }
    }

    /// Put `thread` in the slot
    ///
    /// The returned ticket empties the slot when dropped, unless the
    /// interrupt handler already took the thread out to resume it.
    pub(crate) fn claim(
        &self,
        cs: CriticalSection<'_>,
        thread: T,
    ) -> Result<WaitTicket<'_, T>, Error> {
        let cell = self.slot.borrow(cs);
        let occupant = cell.take();
        if occupant.is_some() {
            cell.set(occupant);
            return Err(Error::AlreadyWaiting);
        }
        let generation = self.generation.borrow(cs);
        let id = generation.get().wrapping_add(1);
        generation.set(id);
        cell.set(Some((id, thread)));
        Ok(WaitTicket { slot: self, id })
    }

    /// Remove the waiting thread, if any
    pub(crate) fn take(&self, cs: CriticalSection<'_>) -> Option<T> {
        self.slot.borrow(cs).take().map(|(_, thread)| thread)
    }

    /// Remove the waiting thread only if it was put there by claim `id`
    fn release(&self, cs: CriticalSection<'_>, id: u32) {
        let cell = self.slot.borrow(cs);
        let occupant = cell.take();
        if occupant.as_ref().is_some_and(|(owner, _)| *owner != id) {
            cell.set(occupant);
        }
    }

    pub(crate) fn is_occupied(&self, cs: CriticalSection<'_>) -> bool {
        let cell = self.slot.borrow(cs);
        let occupant = cell.take();
        let occupied = occupant.is_some();
        cell.set(occupant);
        occupied
    }
}

/// Proof of occupying a [`WaitSlot`]
#[must_use]
pub(crate) struct WaitTicket<'a, T> {
    slot: &'a WaitSlot<T>,
    id: u32,
}

impl<T> Drop for WaitTicket<'_, T> {
    fn drop(&mut self) {
        critical_section::with(|cs| self.slot.release(cs, self.id));
    }
}

impl<R, S, M> Ltdc<R, S, M>
where
    R: RegisterInterface,
    S: Scheduler,
    M: BusMutex,
{
    /// Request a reload and return without waiting
    ///
    /// # Errors
    ///
    /// - [`Error::ReloadInProgress`] if a reload is already pending
    /// - [`Error::InvalidState`] unless the controller is running
    pub fn start_reload(&self, timing: ReloadTiming) -> Result<(), Error> {
        critical_section::with(|cs| self.begin_reload(cs, timing))
    }

    fn begin_reload(&self, cs: CriticalSection<'_>, timing: ReloadTiming) -> Result<(), Error> {
        self.transition(cs, Transition::RequestReload)?;
        self.regs.write(SRCR, timing.request_bit());
        log::trace!("reload requested: {:?}", timing);
        Ok(())
    }

    /// Request a reload and block until the hardware has performed it
    ///
    /// # Errors
    ///
    /// - [`Error::ReloadInProgress`] if a reload is already pending
    /// - [`Error::AlreadyWaiting`] if another thread is blocked on a reload
    /// - [`Error::InvalidState`] unless the controller is running
    pub fn reload(&self, timing: ReloadTiming) -> Result<(), Error> {
        match timing {
            ReloadTiming::Immediate => {
                self.start_reload(timing)?;
                self.wait_reload_done();
                critical_section::with(|cs| self.transition(cs, Transition::CompleteReload))?;
            }
            ReloadTiming::VerticalBlanking => {
                let _ticket = critical_section::with(|cs| {
                    self.state_in(cs).next(Transition::RequestReload)?;
                    let ticket = self.waiter.claim(cs, self.scheduler.current())?;
                    self.begin_reload(cs, timing)?;
                    Ok::<_, Error>(ticket)
                })?;
                while self.is_reloading() {
                    self.scheduler.suspend();
                }
            }
        }
        Ok(())
    }

    /// Whether the hardware still has a reload pending
    ///
    /// Observing a finished reload while the driver is still
    /// [`Reloading`](DriverState::Reloading) completes the transition, so a
    /// caller can poll this instead of servicing the reload interrupt.
    pub fn is_reloading(&self) -> bool {
        critical_section::with(|cs| {
            let busy = self.regs.read(SRCR) & (SRCR_IMR | SRCR_VBR) != 0;
            if !busy && self.state_in(cs) == DriverState::Reloading {
                self.set_state(cs, DriverState::Ready);
                log::trace!("reload completed (polled)");
            }
            busy
        })
    }

    /// Whether a thread is blocked in [`reload`](Self::reload)
    pub fn has_waiter(&self) -> bool {
        critical_section::with(|cs| self.waiter.is_occupied(cs))
    }

    /// Immediate reload outside the state machine, used while (re)configuring
    pub(crate) fn force_reload(&self) {
        self.regs.write(SRCR, SRCR_IMR);
        self.wait_reload_done();
    }

    fn wait_reload_done(&self) {
        while self.regs.read(SRCR) & (SRCR_IMR | SRCR_VBR) != 0 {
            self.scheduler.yield_now();
        }
    }
}
