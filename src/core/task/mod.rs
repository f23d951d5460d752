//! Task management module
//!
//! A task is a step machine: every pass of its loop body returns the one
//! blocking kernel call it wants to make next, and receives the outcome of
//! the previous call when it runs again.

mod tcb;

pub use tcb::OsTcb;

use crate::config::{CFG_PRIO_MAX, CFG_STK_SIZE_MIN};
use crate::error::{OsError, OsResult};
use crate::kernel::Kernel;
use crate::types::{OsMsg, OsPrio, OsTaskState, OsTick, QueueId, SemId, TaskId};

/// Successful outcome of a kernel call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Reply {
    /// Call completed
    Done,
    /// Item taken from a queue
    Item(OsMsg),
}

/// Kernel call issued by one pass of a task's loop body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Syscall {
    /// Post to the back of a queue, waiting up to `timeout` for room
    QueueSend { queue: QueueId, item: OsMsg, timeout: OsTick },
    /// Post to the front of a queue, waiting up to `timeout` for room
    QueueSendToFront { queue: QueueId, item: OsMsg, timeout: OsTick },
    /// Take the oldest item, waiting up to `timeout` for one
    QueueReceive { queue: QueueId, timeout: OsTick },
    /// Take a binary or counting semaphore
    SemTake { sem: SemId, timeout: OsTick },
    /// Give a binary or counting semaphore
    SemGive { sem: SemId },
    /// Take a plain mutex
    MutexTake { mutex: SemId, timeout: OsTick },
    /// Release a plain mutex
    MutexGive { mutex: SemId },
    /// Take a recursive mutex; the owner may take it again
    MutexTakeRecursive { mutex: SemId, timeout: OsTick },
    /// Undo one recursive take
    MutexGiveRecursive { mutex: SemId },
    /// Sleep for a number of ticks
    Delay(OsTick),
    /// Go to the back of the ready list
    Yield,
}

/// Loop body of a task
///
/// `step` is one iteration of the task's infinite loop. `last` carries the
/// outcome of the call returned by the previous iteration, `None` on the
/// first pass.
pub trait TaskEntry {
    /// Shared, read-only state handed to every pass
    type Context;

    fn step(&mut self, ctx: &Self::Context, last: Option<OsResult<Reply>>) -> Syscall;
}

impl<T: TaskEntry> Kernel<T> {
    /// Create a new task
    ///
    /// # Arguments
    /// * `name` - Task name for inspection
    /// * `stk_size` - Stack size in bytes (recorded, not allocated)
    /// * `prio` - Task priority (higher number runs first)
    /// * `entry` - Loop body
    ///
    /// # Returns
    /// * `Ok(TaskId)` - Task is ready
    /// * `Err(OsError::TaskNoMoreTcb)` - TCB pool exhausted
    pub fn task_create(
        &mut self,
        name: &'static str,
        stk_size: usize,
        prio: OsPrio,
        entry: T,
    ) -> OsResult<TaskId> {
        if prio as usize >= CFG_PRIO_MAX {
            return Err(OsError::PrioInvalid);
        }

        if stk_size < CFG_STK_SIZE_MIN {
            return Err(OsError::StkSizeInvalid);
        }

        let id = TaskId(self.tasks.len() as u8);
        self.tcb_created = self.tcb_created.wrapping_add(1);
        let tcb = OsTcb::new(name, self.tcb_created, entry, prio, stk_size);
        self.tasks.push(tcb).map_err(|_| OsError::TaskNoMoreTcb)?;

        self.sched.rdy_list_insert(id, prio);

        crate::debug!("task {} created at prio {}", name, prio);
        Ok(id)
    }

    /// Access a task's loop body
    pub fn task_entry(&self, id: TaskId) -> Option<&T> {
        self.tasks.get(id.index()).map(|tcb| &tcb.entry)
    }

    /// Access a task control block
    pub fn tcb(&self, id: TaskId) -> Option<&OsTcb<T>> {
        self.tasks.get(id.index())
    }

    pub fn task_state(&self, id: TaskId) -> OsResult<OsTaskState> {
        self.tasks
            .get(id.index())
            .map(|tcb| tcb.task_state)
            .ok_or(OsError::ObjInvalid)
    }

    /// Find a task by name
    pub fn task_by_name(&self, name: &str) -> Option<TaskId> {
        self.tasks
            .iter()
            .position(|tcb| tcb.name == name)
            .map(|idx| TaskId(idx as u8))
    }

    /// Number of tasks created
    #[inline]
    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    pub(crate) fn task_ids(&self) -> impl Iterator<Item = TaskId> {
        (0..self.tasks.len()).map(|idx| TaskId(idx as u8))
    }

    /// Change a task's current priority, keeping it in the right ready list
    pub(crate) fn task_set_prio(&mut self, id: TaskId, prio: OsPrio) {
        let tcb = &mut self.tasks[id.index()];
        let old_prio = tcb.prio;
        if old_prio == prio {
            return;
        }
        tcb.prio = prio;
        if tcb.task_state == OsTaskState::Ready {
            self.sched.rdy_list_change_prio(id, old_prio, prio);
        }
    }
}
