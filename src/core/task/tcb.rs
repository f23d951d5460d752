//! Task Control Block (TCB) definition
//!
//! The TCB contains all the information needed to manage a task.

use crate::error::OsResult;
use crate::task::Reply;
use crate::types::{OsMsg, OsPendOn, OsPendStatus, OsPrio, OsTaskState, OsTick};

/// Task Control Block
pub struct OsTcb<T> {
    // ============ Task identification ============
    /// Task name
    pub(crate) name: &'static str,
    /// Number that increments each time a TCB is created
    pub(crate) tcb_number: u32,
    /// Loop body, owned by the kernel
    pub(crate) entry: T,

    // ============ Stack information ============
    /// Requested stack size in bytes
    pub(crate) stk_size: usize,

    // ============ Priority ============
    /// Current priority, raised by mutex inheritance
    pub(crate) prio: OsPrio,
    /// Base priority
    pub(crate) base_prio: OsPrio,

    // ============ State ============
    pub(crate) task_state: OsTaskState,

    // ============ Pend state ============
    /// What the task is pending on
    pub(crate) pend_on: OsPendOn,
    /// Result of the last pend
    pub(crate) pend_status: OsPendStatus,
    /// Item a blocked sender is waiting to post
    pub(crate) pend_msg: OsMsg,
    /// Blocked sender wants the front of the queue
    pub(crate) pend_front: bool,
    /// Tick at which the pend times out
    pub(crate) wake_tick: Option<OsTick>,
    /// Outcome of the last kernel call, handed to the next pass
    pub(crate) reply: Option<OsResult<Reply>>,

    // ============ Mutex priority inheritance ============
    /// Number of mutexes currently held
    pub(crate) mutexes_held: u32,

    // ============ Statistics ============
    /// Loop passes executed
    pub(crate) run_ctr: u32,
}

impl<T> OsTcb<T> {
    pub(crate) fn new(
        name: &'static str,
        tcb_number: u32,
        entry: T,
        prio: OsPrio,
        stk_size: usize,
    ) -> Self {
        OsTcb {
            name,
            tcb_number,
            entry,
            stk_size,
            prio,
            base_prio: prio,
            task_state: OsTaskState::Ready,
            pend_on: OsPendOn::Nothing,
            pend_status: OsPendStatus::Ok,
            pend_msg: 0,
            pend_front: false,
            wake_tick: None,
            reply: None,
            mutexes_held: 0,
            run_ctr: 0,
        }
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub fn state(&self) -> OsTaskState {
        self.task_state
    }

    #[inline]
    pub fn prio(&self) -> OsPrio {
        self.prio
    }

    #[inline]
    pub fn entry(&self) -> &T {
        &self.entry
    }

    /// Check if task is ready
    #[inline]
    pub fn is_ready(&self) -> bool {
        self.task_state == OsTaskState::Ready
    }

    /// Check if task is blocked on an object or a delay
    #[inline]
    pub fn is_blocked(&self) -> bool {
        self.task_state.is_blocked()
    }

    /// Clear pend bookkeeping after a wake-up
    pub(crate) fn clear_pend(&mut self) {
        self.pend_on = OsPendOn::Nothing;
        self.pend_msg = 0;
        self.pend_front = false;
        self.wake_tick = None;
    }
}
