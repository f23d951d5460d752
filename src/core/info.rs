//! Read-only inspection views
//!
//! Plain snapshots of kernel objects, as a debugger-side inspector would
//! decode them from target memory.

use heapless::Vec;

use crate::config::CFG_MAX_TASKS;
use crate::error::{OsError, OsResult};
use crate::kernel::Kernel;
use crate::registry::KernelObject;
use crate::task::TaskEntry;
use crate::types::{
    OsMsg, OsPendOn, OsPendStatus, OsPrio, OsSemCtr, OsSemKind, OsTaskState, OsTick, OsTmrId, QueueId, SemId,
    TaskId, TimerId,
};

/// Snapshot of a task
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskInfo {
    pub id: TaskId,
    pub name: &'static str,
    /// Creation sequence number, starting at 1
    pub number: u32,
    pub state: OsTaskState,
    pub prio: OsPrio,
    pub base_prio: OsPrio,
    pub pend_on: OsPendOn,
    /// How the last pend ended
    pub pend_status: OsPendStatus,
    pub stk_size: usize,
    pub mutexes_held: u32,
    /// Loop passes executed
    pub run_ctr: u32,
}

/// Snapshot of a queue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueInfo {
    pub id: QueueId,
    pub name: Option<&'static str>,
    pub length: usize,
    pub item_size: usize,
    pub messages_waiting: usize,
    /// Oldest first
    pub items: Vec<OsMsg, { crate::config::CFG_QUEUE_DEPTH_MAX }>,
    pub send_waiters: Vec<TaskId, CFG_MAX_TASKS>,
    pub recv_waiters: Vec<TaskId, CFG_MAX_TASKS>,
}

/// Snapshot of a semaphore or mutex
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SemInfo {
    pub id: SemId,
    pub name: Option<&'static str>,
    pub kind: OsSemKind,
    pub count: OsSemCtr,
    pub max: OsSemCtr,
    pub holder: Option<TaskId>,
    pub recursive_count: u32,
    pub waiters: Vec<TaskId, CFG_MAX_TASKS>,
}

/// Snapshot of a software timer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerInfo {
    pub id: TimerId,
    pub name: &'static str,
    pub period: OsTick,
    pub auto_reload: bool,
    pub active: bool,
    /// Next expiry tick, meaningful while active
    pub expiry: OsTick,
    pub tag: OsTmrId,
    pub fired: u32,
}

impl<T: TaskEntry> Kernel<T> {
    pub fn task_info(&self, id: TaskId) -> OsResult<TaskInfo> {
        let tcb = self.tasks.get(id.index()).ok_or(OsError::ObjInvalid)?;
        Ok(TaskInfo {
            id,
            name: tcb.name,
            number: tcb.tcb_number,
            state: tcb.task_state,
            prio: tcb.prio,
            base_prio: tcb.base_prio,
            pend_on: tcb.pend_on,
            pend_status: tcb.pend_status,
            stk_size: tcb.stk_size,
            mutexes_held: tcb.mutexes_held,
            run_ctr: tcb.run_ctr,
        })
    }

    /// Snapshots of every task, in creation order
    pub fn tasks(&self) -> impl Iterator<Item = TaskInfo> + '_ {
        self.task_ids().filter_map(|id| self.task_info(id).ok())
    }

    pub fn queue_info(&self, id: QueueId) -> OsResult<QueueInfo> {
        let q = self.queue_ref(id)?;
        Ok(QueueInfo {
            id,
            name: self.registry.name_of(KernelObject::Queue(id)),
            length: q.length,
            item_size: self.queue_item_size(),
            messages_waiting: q.messages_waiting(),
            items: q.items.iter().copied().collect(),
            send_waiters: q.send_waiters.iter().collect(),
            recv_waiters: q.recv_waiters.iter().collect(),
        })
    }

    pub fn sem_info(&self, id: SemId) -> OsResult<SemInfo> {
        let s = self.sem_ref(id)?;
        Ok(SemInfo {
            id,
            name: self.registry.name_of(KernelObject::Semaphore(id)),
            kind: s.kind,
            count: s.count,
            max: s.max,
            holder: s.owner,
            recursive_count: s.nesting_ctr,
            waiters: s.pend_list.iter().collect(),
        })
    }

    pub fn timer_info(&self, id: TimerId) -> OsResult<TimerInfo> {
        let t = self.timer_ref(id)?;
        Ok(TimerInfo {
            id,
            name: t.name,
            period: t.period,
            auto_reload: t.auto_reload,
            active: t.active,
            expiry: t.expiry,
            tag: t.id,
            fired: t.fired,
        })
    }
}
