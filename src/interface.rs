//! Register access abstraction
//!
//! This module provides the [`RegisterInterface`] trait, through which every
//! driver operation reaches the controller, and [`Mmio`], the volatile
//! memory-mapped implementation used on hardware.
//!
//! Offsets are byte offsets from the peripheral base, as listed in
//! [`registers`](crate::registers). All accesses are full 32-bit words.
//!
//! ## Example
//!
//! ```rust,no_run
//! use ltdc::interface::{Mmio, RegisterInterface, LTDC_BASE};
//! use ltdc::registers;
//!
//! // SAFETY: LTDC_BASE is the controller's register block on this part
//! let regs = unsafe { Mmio::new(LTDC_BASE) };
//! let enabled = regs.read(registers::GCR) & registers::GCR_LTDCEN != 0;
//! # let _ = enabled;
//! ```

/// Default base address of the LTDC register block on STM32F4/F7 parts
pub const LTDC_BASE: usize = 0x4001_6800;

/// Trait for 32-bit register access to the controller
///
/// Methods take `&self` so that a single instance can be shared between
/// threads and the interrupt handler. Implementations perform each access
/// as one bus transaction; read-modify-write atomicity is the caller's
/// concern (the driver wraps those sequences in a critical section).
pub trait RegisterInterface {
    /// Read the register at `offset`
    fn read(&self, offset: u32) -> u32;

    /// Write `value` to the register at `offset`
    fn write(&self, offset: u32, value: u32);

    /// Replace the bits selected by `mask` with the same bits of `value`
    fn modify(&self, offset: u32, mask: u32, value: u32) {
        let current = self.read(offset);
        self.write(offset, (current & !mask) | (value & mask));
    }

    /// Set the bits in `bits`
    fn set_bits(&self, offset: u32, bits: u32) {
        self.modify(offset, bits, bits);
    }

    /// Clear the bits in `bits`
    fn clear_bits(&self, offset: u32, bits: u32) {
        self.modify(offset, bits, 0);
    }
}

impl<T: RegisterInterface + ?Sized> RegisterInterface for &T {
    fn read(&self, offset: u32) -> u32 {
        (**self).read(offset)
    }

    fn write(&self, offset: u32, value: u32) {
        (**self).write(offset, value);
    }
}

/// Memory-mapped register block
#[derive(Debug)]
pub struct Mmio {
    base: usize,
}

impl Mmio {
    /// Create an accessor for the register block at `base`
    ///
    /// # Safety
    ///
    /// `base` must be the address of an LTDC register block that stays
    /// mapped for the lifetime of the returned value, and no other code may
    /// access that block except through the driver.
    #[allow(unsafe_code)]
    pub const unsafe fn new(base: usize) -> Self {
        Self { base }
    }

    /// Base address of the register block
    pub const fn base(&self) -> usize {
        self.base
    }

    fn ptr(&self, offset: u32) -> *mut u32 {
        (self.base + offset as usize) as *mut u32
    }
}

#[allow(unsafe_code)]
impl RegisterInterface for Mmio {
    fn read(&self, offset: u32) -> u32 {
        // SAFETY: `new` guarantees the block is mapped; offsets come from the
        // register map and are word aligned.
        unsafe { core::ptr::read_volatile(self.ptr(offset)) }
    }

    fn write(&self, offset: u32, value: u32) {
        // SAFETY: as for `read`
        unsafe { core::ptr::write_volatile(self.ptr(offset), value) }
    }
}
