//! Time management module
//!
//! Provides the tick source, the delayed list used for timeouts and
//! delays, and the per-tick kernel processing.

use heapless::Vec;
use portable_atomic::{AtomicU32, Ordering};

use crate::config::{CFG_MAX_TASKS, CFG_TICK_RATE_HZ};
use crate::kernel::Kernel;
use crate::task::{Reply, TaskEntry};
use crate::types::{OsPendOn, OsPendStatus, OsTick, TaskId};
use crate::error::OsError;

/// Convert milliseconds to ticks, rounding down
#[inline]
pub const fn ms_to_ticks(ms: u32) -> OsTick {
    ((ms as u64 * CFG_TICK_RATE_HZ as u64) / 1000) as OsTick
}

/// Has `now` reached `deadline`, allowing for counter wrap
#[inline]
pub fn tick_reached(now: OsTick, deadline: OsTick) -> bool {
    (now.wrapping_sub(deadline) as i32) >= 0
}

/// Tick source shared between an interrupt (or host thread) and the kernel
///
/// The producer side only increments counters, so it is safe to call from
/// the SysTick exception. The kernel drains pending ticks from its run loop.
pub struct TickSource {
    pending: AtomicU32,
    total: AtomicU32,
}

impl TickSource {
    pub const fn new() -> Self {
        Self {
            pending: AtomicU32::new(0),
            total: AtomicU32::new(0),
        }
    }

    /// Record one elapsed tick
    #[inline]
    pub fn tick(&self) {
        self.pending.fetch_add(1, Ordering::AcqRel);
        self.total.fetch_add(1, Ordering::Relaxed);
    }

    /// Take every tick recorded since the last call
    #[inline]
    pub fn take(&self) -> OsTick {
        self.pending.swap(0, Ordering::AcqRel)
    }

    /// Ticks recorded since creation
    #[inline]
    pub fn now(&self) -> OsTick {
        self.total.load(Ordering::Relaxed)
    }
}

impl Default for TickSource {
    fn default() -> Self {
        Self::new()
    }
}

/// Tasks waiting for a tick, ordered by wake-up time
#[derive(Debug, Default)]
pub struct DelayedList {
    entries: Vec<(OsTick, TaskId), CFG_MAX_TASKS>,
}

impl DelayedList {
    pub const fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Insert keeping entries ordered by remaining ticks from `now`
    pub fn insert(&mut self, id: TaskId, wake: OsTick, now: OsTick) {
        let remain = wake.wrapping_sub(now);
        let pos = self
            .entries
            .iter()
            .position(|&(w, _)| w.wrapping_sub(now) > remain)
            .unwrap_or(self.entries.len());
        // One entry per task at most, so the list cannot outgrow the TCB pool
        let _ = self.entries.insert(pos, (wake, id));
    }

    pub fn remove(&mut self, id: TaskId) -> bool {
        match self.entries.iter().position(|&(_, t)| t == id) {
            Some(pos) => {
                self.entries.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Pop the first task whose wake-up time has been reached
    pub fn pop_due(&mut self, now: OsTick) -> Option<TaskId> {
        match self.entries.first() {
            Some(&(wake, id)) if tick_reached(now, wake) => {
                self.entries.remove(0);
                Some(id)
            }
            _ => None,
        }
    }

    /// Earliest wake-up time
    pub fn next_wake(&self) -> Option<OsTick> {
        self.entries.first().map(|&(wake, _)| wake)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl<T: TaskEntry> Kernel<T> {
    /// Current tick count
    #[inline]
    pub fn tick_get(&self) -> OsTick {
        self.tick
    }

    /// Advance time by one tick
    ///
    /// Wakes every delayed task and times out every pend whose deadline
    /// is reached, then fires due software timers.
    pub fn tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);

        while let Some(id) = self.delayed.pop_due(self.tick) {
            self.expire_wait(id);
        }

        self.timers_process();
    }

    /// Deadline reached for a delayed or pending task
    fn expire_wait(&mut self, id: TaskId) {
        let pend_on = self.tasks[id.index()].pend_on;
        self.tasks[id.index()].wake_tick = None;

        let reply = match pend_on {
            OsPendOn::Nothing => return,
            OsPendOn::Delay => Ok(Reply::Done),
            other => {
                self.pend_list_remove(id, other);
                if let OsPendOn::Mutex(mutex) = other {
                    self.mutex_update_inheritance(mutex);
                }
                crate::trace!("task {} timed out", self.tasks[id.index()].name);
                Err(OsError::Timeout)
            }
        };

        self.tasks[id.index()].pend_status = match reply {
            Ok(_) => OsPendStatus::Ok,
            Err(_) => OsPendStatus::Timeout,
        };
        self.make_ready(id, reply);
    }
}
