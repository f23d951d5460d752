//! Mutex implementation with priority inheritance
//!
//! Plain and recursive mutexes. A higher-priority task blocking on a held
//! mutex lends its priority to the owner; the owner drops back to its base
//! priority once it holds no mutex.

use crate::error::{OsError, OsResult};
use crate::kernel::{Kernel, Pend};
use crate::sem::OsSem;
use crate::task::{Reply, TaskEntry};
use crate::types::{OsNestingCtr, OsPendOn, OsSemKind, SemId, TaskId};

impl<T: TaskEntry> Kernel<T> {
    /// Create a mutex, initially available
    pub fn mutex_create(&mut self) -> OsResult<SemId> {
        self.sem_alloc(OsSem::new(OsSemKind::Mutex, 1, 1))
    }

    /// Create a recursive mutex, initially available
    pub fn mutex_create_recursive(&mut self) -> OsResult<SemId> {
        self.sem_alloc(OsSem::new(OsSemKind::RecursiveMutex, 1, 1))
    }

    /// Task that holds the mutex
    pub fn mutex_holder(&self, mutex: SemId) -> OsResult<Option<TaskId>> {
        let m = self.sem_ref(mutex)?;
        if !m.kind.is_mutex() {
            return Err(OsError::ObjType);
        }
        Ok(m.owner)
    }

    /// Number of times the holder has taken the mutex
    pub fn mutex_recursive_count(&self, mutex: SemId) -> OsResult<OsNestingCtr> {
        let m = self.sem_ref(mutex)?;
        if !m.kind.is_mutex() {
            return Err(OsError::ObjType);
        }
        Ok(m.nesting_ctr)
    }

    fn mutex_check_kind(m: &OsSem, recursive: bool) -> OsResult<()> {
        match (m.kind, recursive) {
            (OsSemKind::Mutex, false) | (OsSemKind::RecursiveMutex, true) => Ok(()),
            _ => Err(OsError::ObjType),
        }
    }

    /// Acquire the mutex on behalf of task `id`
    pub(crate) fn mutex_take_pend(&mut self, id: TaskId, mutex: SemId, recursive: bool) -> Pend {
        let Some(m) = self.sems.get_mut(mutex.index()) else {
            return Pend::Fail(OsError::ObjInvalid);
        };
        if let Err(err) = Self::mutex_check_kind(m, recursive) {
            return Pend::Fail(err);
        }

        match m.owner {
            None => {
                m.owner = Some(id);
                m.nesting_ctr = 1;
                m.count = 0;
                self.tasks[id.index()].mutexes_held += 1;
                Pend::Done(Reply::Done)
            }
            Some(owner) if owner == id => {
                if !recursive {
                    return Pend::Fail(OsError::MutexOwner);
                }
                match m.nesting_ctr.checked_add(1) {
                    Some(nesting) => {
                        m.nesting_ctr = nesting;
                        Pend::Done(Reply::Done)
                    }
                    None => Pend::Fail(OsError::MutexOvf),
                }
            }
            Some(_) => Pend::Block(OsPendOn::Mutex(mutex)),
        }
    }

    /// Release the mutex on behalf of task `id`
    ///
    /// If the mutex is fully released and tasks are waiting, ownership
    /// passes to the highest-priority waiter.
    pub(crate) fn mutex_give(&mut self, id: TaskId, mutex: SemId, recursive: bool) -> OsResult<()> {
        let m = self.sems.get_mut(mutex.index()).ok_or(OsError::ObjInvalid)?;
        Self::mutex_check_kind(m, recursive)?;

        if m.owner != Some(id) {
            return Err(OsError::MutexNotOwner);
        }

        if m.nesting_ctr > 1 {
            m.nesting_ctr -= 1;
            return Ok(());
        }

        // Unlock completely
        m.nesting_ctr = 0;
        let waiter = m.pend_list.pop();
        match waiter {
            Some(w) => {
                m.owner = Some(w);
                m.nesting_ctr = 1;
            }
            None => {
                m.owner = None;
                m.count = 1;
            }
        }

        let tcb = &mut self.tasks[id.index()];
        tcb.mutexes_held = tcb.mutexes_held.saturating_sub(1);
        if tcb.mutexes_held == 0 {
            let base = tcb.base_prio;
            self.task_set_prio(id, base);
        }

        if let Some(w) = waiter {
            self.tasks[w.index()].mutexes_held += 1;
            self.wake(w, Ok(Reply::Done));
            self.mutex_update_inheritance(mutex);
        }

        Ok(())
    }

    /// Re-derive the owner's priority from its base and the waiters
    pub(crate) fn mutex_update_inheritance(&mut self, mutex: SemId) {
        let m = &self.sems[mutex.index()];
        let Some(owner) = m.owner else {
            return;
        };
        let waiter_prio = m.pend_list.head_prio();

        let tcb = &self.tasks[owner.index()];
        let mut prio = tcb.base_prio;
        if let Some(p) = waiter_prio {
            prio = prio.max(p);
        }
        // Never drop below a priority inherited through another held mutex
        if tcb.mutexes_held > 1 {
            prio = prio.max(tcb.prio);
        }

        if prio != tcb.prio {
            crate::trace!("task {} priority {} -> {}", tcb.name, tcb.prio, prio);
            self.task_set_prio(owner, prio);
        }
    }
}
