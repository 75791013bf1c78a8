//! Test doubles for the controller and the scheduler

extern crate std;

use alloc::vec::Vec;
use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Condvar, Mutex};
use std::thread::Thread;

use crate::interface::RegisterInterface;
use crate::registers::{ICR, INT_RELOAD, ISR, SRCR};
use crate::runtime::Scheduler;

const WORDS: usize = 0x60;

/// In-memory register file
///
/// Models the two hardware behaviours the driver depends on: reload request
/// bits in SRCR stay set until the reload happens, and ICR is write-1-to-clear
/// on ISR. With `auto_reload` the reload happens on the first read of SRCR
/// after the request, which also raises the reload interrupt flag.
pub struct FakeRegisters {
    words: [AtomicU32; WORDS],
    auto_reload: AtomicBool,
    writes: Mutex<Vec<(u32, u32)>>,
}

impl FakeRegisters {
    pub fn new() -> Self {
        Self {
            words: [const { AtomicU32::new(0) }; WORDS],
            auto_reload: AtomicBool::new(true),
            writes: Mutex::new(Vec::new()),
        }
    }

    /// Reloads only complete through [`complete_reload`](Self::complete_reload)
    pub fn set_auto_reload(&self, enabled: bool) {
        self.auto_reload.store(enabled, Ordering::SeqCst);
    }

    fn word(&self, offset: u32) -> &AtomicU32 {
        &self.words[offset as usize / 4]
    }

    /// Raw register value, bypassing hardware behaviour
    pub fn get(&self, offset: u32) -> u32 {
        self.word(offset).load(Ordering::SeqCst)
    }

    /// Set a raw register value, bypassing hardware behaviour
    pub fn set(&self, offset: u32, value: u32) {
        self.word(offset).store(value, Ordering::SeqCst);
    }

    /// Latch pending shadow registers and raise the reload flag
    pub fn complete_reload(&self) {
        self.word(SRCR).store(0, Ordering::SeqCst);
        self.raise(INT_RELOAD);
    }

    /// Raise interrupt status flags
    pub fn raise(&self, flags: u32) {
        self.word(ISR).fetch_or(flags, Ordering::SeqCst);
    }

    /// Every value written to `offset`, oldest first
    pub fn writes_to(&self, offset: u32) -> Vec<u32> {
        self.writes
            .lock()
            .unwrap()
            .iter()
            .filter(|(o, _)| *o == offset)
            .map(|(_, v)| *v)
            .collect()
    }

    pub fn clear_log(&self) {
        self.writes.lock().unwrap().clear();
    }
}

impl RegisterInterface for FakeRegisters {
    fn read(&self, offset: u32) -> u32 {
        match offset {
            ICR => 0,
            SRCR if self.auto_reload.load(Ordering::SeqCst) => {
                let pending = self.word(SRCR).swap(0, Ordering::SeqCst);
                if pending != 0 {
                    self.raise(INT_RELOAD);
                }
                pending
            }
            _ => self.get(offset),
        }
    }

    fn write(&self, offset: u32, value: u32) {
        self.writes.lock().unwrap().push((offset, value));
        match offset {
            ICR => {
                self.word(ISR).fetch_and(!value, Ordering::SeqCst);
            }
            SRCR => {
                self.word(SRCR).fetch_or(value, Ordering::SeqCst);
            }
            _ => self.set(offset, value),
        }
    }
}

/// Scheduler backed by std threads, park and unpark
pub struct ThreadScheduler;

impl Scheduler for ThreadScheduler {
    type Thread = Thread;

    fn current(&self) -> Self::Thread {
        std::thread::current()
    }

    fn yield_now(&self) {
        std::thread::yield_now();
    }

    fn suspend(&self) {
        std::thread::park();
    }

    fn resume(&self, thread: Self::Thread) {
        thread.unpark();
    }
}

/// Scheduler whose suspended threads only run again once the gate opens
///
/// Unlike `park`, a suspended thread never wakes spuriously, so a test can
/// hold a waiter in place while it changes the driver underneath.
pub struct Gate {
    state: Mutex<GateState>,
    changed: Condvar,
}

#[derive(Default)]
struct GateState {
    open: bool,
    suspended: usize,
}

impl Gate {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(GateState::default()),
            changed: Condvar::new(),
        }
    }

    /// Block until a thread is suspended on the gate
    pub fn wait_suspended(&self) {
        let mut state = self.state.lock().unwrap();
        while state.suspended == 0 {
            state = self.changed.wait(state).unwrap();
        }
    }

    /// Let every suspended thread run, now and later
    pub fn open(&self) {
        self.state.lock().unwrap().open = true;
        self.changed.notify_all();
    }
}

impl Scheduler for &Gate {
    type Thread = ();

    fn current(&self) -> Self::Thread {}

    fn yield_now(&self) {
        std::thread::yield_now();
    }

    fn suspend(&self) {
        let mut state = self.state.lock().unwrap();
        state.suspended += 1;
        self.changed.notify_all();
        while !state.open {
            state = self.changed.wait(state).unwrap();
        }
        state.suspended -= 1;
    }

    fn resume(&self, (): Self::Thread) {
        self.open();
    }
}
