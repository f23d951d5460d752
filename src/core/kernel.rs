//! Kernel state and run loop
//!
//! The kernel owns every control block. Nothing is global: the application
//! creates a `Kernel`, populates it, and drives it either tick by tick
//! (`run_for`) or from a `TickSource` fed by an interrupt or host thread
//! (`run`).

use heapless::Vec;
use portable_atomic::{AtomicBool, Ordering};

use crate::config::{
    CFG_MAX_QUEUES, CFG_MAX_SEMS, CFG_MAX_TASKS, CFG_MAX_TIMERS, CFG_SCHED_STEPS_PER_TICK,
};
use crate::error::{OsError, OsResult};
use crate::queue::OsQueue;
use crate::registry::Registry;
use crate::sched::SchedState;
use crate::sem::OsSem;
use crate::task::{OsTcb, Reply, Syscall, TaskEntry};
use crate::time::{DelayedList, TickSource};
use crate::timer::OsTimer;
use crate::types::{
    OsPendOn, OsPendStatus, OsTaskState, OsTick, TaskId, OS_MAX_TIMEOUT, OS_NO_WAIT, OS_WAIT_FOREVER,
};

/// Request for the run loop to stop
///
/// Checked before every task pass. May be set from another thread or an
/// interrupt handler.
pub struct ShutdownSignal {
    requested: AtomicBool,
}

impl ShutdownSignal {
    pub const fn new() -> Self {
        Self {
            requested: AtomicBool::new(false),
        }
    }

    pub fn request(&self) {
        self.requested.store(true, Ordering::Release);
    }

    #[inline]
    pub fn is_requested(&self) -> bool {
        self.requested.load(Ordering::Acquire)
    }
}

impl Default for ShutdownSignal {
    fn default() -> Self {
        Self::new()
    }
}

/// Immediate outcome of a kernel call
pub(crate) enum Pend {
    /// Completed without blocking
    Done(Reply),
    /// Failed without blocking
    Fail(OsError),
    /// Must wait on the given object
    Block(OsPendOn),
}

impl From<OsResult<Reply>> for Pend {
    fn from(res: OsResult<Reply>) -> Self {
        match res {
            Ok(reply) => Pend::Done(reply),
            Err(err) => Pend::Fail(err),
        }
    }
}

/// Kernel instance
pub struct Kernel<T: TaskEntry> {
    pub(crate) tick: OsTick,
    pub(crate) running: bool,
    pub(crate) tcb_created: u32,
    pub(crate) current: Option<TaskId>,
    pub(crate) tasks: Vec<OsTcb<T>, CFG_MAX_TASKS>,
    pub(crate) queues: Vec<OsQueue, CFG_MAX_QUEUES>,
    pub(crate) sems: Vec<OsSem, CFG_MAX_SEMS>,
    pub(crate) timers: Vec<OsTimer, CFG_MAX_TIMERS>,
    pub(crate) registry: Registry,
    pub(crate) sched: SchedState,
    pub(crate) delayed: DelayedList,
}

impl<T: TaskEntry> Kernel<T> {
    pub const fn new() -> Self {
        Self {
            tick: 0,
            running: true,
            tcb_created: 0,
            current: None,
            tasks: Vec::new(),
            queues: Vec::new(),
            sems: Vec::new(),
            timers: Vec::new(),
            registry: Registry::new(),
            sched: SchedState::new(),
            delayed: DelayedList::new(),
        }
    }

    /// False once `shutdown` has run
    #[inline]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Task currently executing a pass, if any
    #[inline]
    pub fn current_task(&self) -> Option<TaskId> {
        self.current
    }

    // ============ Run loop ============

    /// Run ready tasks until none is ready or the per-tick budget is spent
    ///
    /// Returns the number of task passes executed.
    pub fn schedule(&mut self, ctx: &T::Context) -> usize {
        self.schedule_inner(ctx, None)
    }

    fn schedule_inner(&mut self, ctx: &T::Context, shutdown: Option<&ShutdownSignal>) -> usize {
        let mut steps = 0;
        while self.running && steps < CFG_SCHED_STEPS_PER_TICK {
            if shutdown.is_some_and(ShutdownSignal::is_requested) {
                break;
            }
            let Some(id) = self.sched.pick_next() else {
                break;
            };
            self.step_task(ctx, id);
            steps += 1;
        }
        steps
    }

    /// Advance `ticks` ticks, running ready tasks before each one
    pub fn run_for(&mut self, ctx: &T::Context, ticks: OsTick) {
        for _ in 0..ticks {
            if !self.running {
                return;
            }
            self.schedule(ctx);
            self.tick();
        }
        self.schedule(ctx);
    }

    /// Run until `shutdown` is requested, taking time from `ticks`
    ///
    /// On return every task has been deleted.
    pub fn run(&mut self, ctx: &T::Context, ticks: &TickSource, shutdown: &ShutdownSignal) {
        crate::info!("kernel running with {} tasks", self.tasks.len());

        // One scheduling budget per tick, as in `run_for`
        let mut budget = true;
        while !shutdown.is_requested() {
            let pending = ticks.take();
            for _ in 0..pending {
                self.tick();
            }
            if pending > 0 {
                budget = true;
            }

            if budget {
                self.schedule_inner(ctx, Some(shutdown));
                budget = false;
            } else {
                crate::port::cpu_idle();
            }
        }

        self.shutdown();
    }

    /// Abort every pend and delete every task
    pub fn shutdown(&mut self) {
        if !self.running {
            return;
        }

        for id in self.task_ids() {
            let pend_on = self.tasks[id.index()].pend_on;
            if pend_on != OsPendOn::Nothing {
                self.pend_list_remove(id, pend_on);
                self.delayed.remove(id);
                self.tasks[id.index()].pend_status = OsPendStatus::Abort;
                self.tasks[id.index()].reply = Some(Err(OsError::PendAbort));
            }
            let tcb = &mut self.tasks[id.index()];
            tcb.clear_pend();
            tcb.task_state = OsTaskState::Deleted;
        }

        self.sched.clear();
        self.running = false;
        crate::debug!("kernel shut down at tick {}", self.tick);
    }

    // ============ Task passes ============

    fn step_task(&mut self, ctx: &T::Context, id: TaskId) {
        self.current = Some(id);

        let tcb = &mut self.tasks[id.index()];
        tcb.task_state = OsTaskState::Running;
        let last = tcb.reply.take();
        let call = tcb.entry.step(ctx, last);
        tcb.run_ctr = tcb.run_ctr.wrapping_add(1);

        self.dispatch(id, call);
        self.current = None;
    }

    fn dispatch(&mut self, id: TaskId, call: Syscall) {
        let (pend, timeout) = match call {
            Syscall::QueueSend { queue, item, timeout } => {
                (self.queue_send_pend(id, queue, item, false), timeout)
            }
            Syscall::QueueSendToFront { queue, item, timeout } => {
                (self.queue_send_pend(id, queue, item, true), timeout)
            }
            Syscall::QueueReceive { queue, timeout } => (self.queue_recv_pend(id, queue), timeout),
            Syscall::SemTake { sem, timeout } => (self.sem_take_pend(sem), timeout),
            Syscall::SemGive { sem } => (self.sem_give(sem).map(|_| Reply::Done).into(), OS_NO_WAIT),
            Syscall::MutexTake { mutex, timeout } => (self.mutex_take_pend(id, mutex, false), timeout),
            Syscall::MutexGive { mutex } => {
                (self.mutex_give(id, mutex, false).map(|_| Reply::Done).into(), OS_NO_WAIT)
            }
            Syscall::MutexTakeRecursive { mutex, timeout } => {
                (self.mutex_take_pend(id, mutex, true), timeout)
            }
            Syscall::MutexGiveRecursive { mutex } => {
                (self.mutex_give(id, mutex, true).map(|_| Reply::Done).into(), OS_NO_WAIT)
            }
            Syscall::Delay(0) | Syscall::Yield => (Pend::Done(Reply::Done), OS_NO_WAIT),
            Syscall::Delay(ticks) => (Pend::Block(OsPendOn::Delay), ticks),
        };

        match pend {
            Pend::Done(reply) => self.make_ready(id, Ok(reply)),
            Pend::Fail(err) => self.make_ready(id, Err(err)),
            Pend::Block(_) if timeout == OS_NO_WAIT => {
                self.make_ready(id, Err(OsError::PendWouldBlock))
            }
            Pend::Block(pend_on) => self.block(id, pend_on, timeout),
        }
    }

    // ============ Readiness bookkeeping ============

    /// Put a task on its ready list with the outcome of its last call
    pub(crate) fn make_ready(&mut self, id: TaskId, reply: OsResult<Reply>) {
        let tcb = &mut self.tasks[id.index()];
        tcb.clear_pend();
        tcb.reply = Some(reply);
        tcb.task_state = OsTaskState::Ready;
        let prio = tcb.prio;
        self.sched.rdy_list_insert(id, prio);
    }

    /// Wake a pending task before its deadline
    pub(crate) fn wake(&mut self, id: TaskId, reply: OsResult<Reply>) {
        if self.tasks[id.index()].wake_tick.is_some() {
            self.delayed.remove(id);
        }
        self.tasks[id.index()].pend_status = OsPendStatus::Ok;
        self.make_ready(id, reply);
    }

    /// Park the calling task on an object and, if bounded, on the delayed list
    fn block(&mut self, id: TaskId, pend_on: OsPendOn, timeout: OsTick) {
        let now = self.tick;
        let tcb = &mut self.tasks[id.index()];
        let prio = tcb.prio;
        tcb.pend_on = pend_on;
        tcb.pend_status = OsPendStatus::Ok;

        if timeout == OS_WAIT_FOREVER {
            tcb.task_state = OsTaskState::Pend;
            tcb.wake_tick = None;
        } else {
            // Deadlines are compared as signed distances from `now`
            let wake = now.wrapping_add(timeout.min(OS_MAX_TIMEOUT));
            tcb.task_state = if pend_on == OsPendOn::Delay {
                OsTaskState::Delayed
            } else {
                OsTaskState::PendTimeout
            };
            tcb.wake_tick = Some(wake);
            self.delayed.insert(id, wake, now);
        }

        match pend_on {
            OsPendOn::QueueSend(queue) => self.queues[queue.index()].send_waiters.insert_by_prio(id, prio),
            OsPendOn::QueueRecv(queue) => self.queues[queue.index()].recv_waiters.insert_by_prio(id, prio),
            OsPendOn::Semaphore(sem) | OsPendOn::Mutex(sem) => {
                self.sems[sem.index()].pend_list.insert_by_prio(id, prio)
            }
            OsPendOn::Delay | OsPendOn::Nothing => {}
        }

        if let OsPendOn::Mutex(mutex) = pend_on {
            self.mutex_update_inheritance(mutex);
        }
    }

    /// Take a task off the wait list of the object it pends on
    pub(crate) fn pend_list_remove(&mut self, id: TaskId, pend_on: OsPendOn) {
        match pend_on {
            OsPendOn::QueueSend(queue) => {
                self.queues[queue.index()].send_waiters.remove(id);
            }
            OsPendOn::QueueRecv(queue) => {
                self.queues[queue.index()].recv_waiters.remove(id);
            }
            OsPendOn::Semaphore(sem) | OsPendOn::Mutex(sem) => {
                self.sems[sem.index()].pend_list.remove(id);
            }
            OsPendOn::Delay | OsPendOn::Nothing => {}
        }
    }
}

impl<T: TaskEntry> Default for Kernel<T> {
    fn default() -> Self {
        Self::new()
    }
}
