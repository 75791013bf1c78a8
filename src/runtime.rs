//! Scheduling and bus-locking capabilities
//!
//! The driver never spins on its own: while waiting for the controller it
//! hands control to a [`Scheduler`]. Callers that serialize multi-step
//! sequences (edit several layer registers, then commit with a reload) do so
//! through a [`BusMutex`].
//!
//! On an RTOS both traits map onto the kernel's thread and mutex primitives.
//! On bare metal, [`PollingScheduler`] turns every wait into a short
//! [`DelayNs`] delay and [`NoBusLock`] makes locking a no-op.

use core::cell::RefCell;

use critical_section::Mutex;
use embedded_hal::delay::DelayNs;

/// Thread scheduling capability
///
/// ## Contract
///
/// A [`resume`](Scheduler::resume) delivered to a thread that has not yet
/// called [`suspend`](Scheduler::suspend) must not be lost: the next
/// `suspend` of that thread returns immediately. `suspend` may also return
/// spuriously; the driver re-checks its state after every wake-up.
pub trait Scheduler {
    /// Handle naming a thread that can be resumed
    type Thread: Send;

    /// Handle of the calling thread
    fn current(&self) -> Self::Thread;

    /// Give other threads a chance to run
    fn yield_now(&self);

    /// Block the calling thread until it is resumed
    fn suspend(&self);

    /// Wake a suspended thread. May be called from interrupt context.
    fn resume(&self, thread: Self::Thread);
}

/// Mutual exclusion over the controller for multi-step sequences
pub trait BusMutex {
    /// Block until the bus is owned by the caller
    fn lock(&self);

    /// Release the bus
    fn unlock(&self);
}

/// Bus lock for firmware with a single context touching the controller
#[derive(Debug, Default, Clone, Copy)]
pub struct NoBusLock;

impl BusMutex for NoBusLock {
    fn lock(&self) {}

    fn unlock(&self) {}
}

impl<T: BusMutex + ?Sized> BusMutex for &T {
    fn lock(&self) {
        T::lock(self);
    }

    fn unlock(&self) {
        T::unlock(self);
    }
}

/// Default polling interval of [`PollingScheduler`] in microseconds
pub const DEFAULT_POLL_INTERVAL_US: u32 = 10;

/// Scheduler for bare-metal use without threads
///
/// Yielding and suspending both delay for the poll interval; resuming is a
/// no-op because the single "thread" re-checks driver state after each
/// delay. The delay provider sits behind a critical-section mutex so the
/// scheduler can be shared like the rest of the driver.
pub struct PollingScheduler<D> {
    delay: Mutex<RefCell<D>>,
    interval_us: u32,
}

impl<D: DelayNs> PollingScheduler<D> {
    /// Create a scheduler polling every [`DEFAULT_POLL_INTERVAL_US`]
    pub const fn new(delay: D) -> Self {
        Self::with_interval(delay, DEFAULT_POLL_INTERVAL_US)
    }

    /// Create a scheduler polling every `interval_us` microseconds
    pub const fn with_interval(delay: D, interval_us: u32) -> Self {
        Self {
            delay: Mutex::new(RefCell::new(delay)),
            interval_us,
        }
    }

    /// Consume the scheduler, returning the delay provider
    pub fn into_inner(self) -> D {
        self.delay.into_inner().into_inner()
    }

    fn pause(&self) {
        critical_section::with(|cs| {
            self.delay.borrow_ref_mut(cs).delay_us(self.interval_us);
        });
    }
}

impl<D: DelayNs> Scheduler for PollingScheduler<D> {
    type Thread = ();

    fn current(&self) -> Self::Thread {}

    fn yield_now(&self) {
        self.pause();
    }

    fn suspend(&self) {
        self.pause();
    }

    fn resume(&self, _thread: Self::Thread) {}
}
