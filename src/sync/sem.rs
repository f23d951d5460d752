//! Semaphore implementation
//!
//! Binary and counting semaphores for task synchronization and resource
//! counting. Mutex flavours share the control block and live in `mutex`.

use crate::error::{OsError, OsResult};
use crate::kernel::{Kernel, Pend};
use crate::sync::wait_list::PendList;
use crate::task::{Reply, TaskEntry};
use crate::types::{OsNestingCtr, OsPendOn, OsSemCtr, OsSemKind, SemId, TaskId};

/// Semaphore control block
pub struct OsSem {
    /// Flavour
    pub(crate) kind: OsSemKind,
    /// Current count (1 = mutex available)
    pub(crate) count: OsSemCtr,
    /// Highest count allowed
    pub(crate) max: OsSemCtr,
    /// Task holding the mutex
    pub(crate) owner: Option<TaskId>,
    /// Number of recursive takes by the owner
    pub(crate) nesting_ctr: OsNestingCtr,
    /// List of tasks waiting on this semaphore
    pub(crate) pend_list: PendList,
}

impl OsSem {
    pub(crate) fn new(kind: OsSemKind, count: OsSemCtr, max: OsSemCtr) -> Self {
        OsSem {
            kind,
            count,
            max,
            owner: None,
            nesting_ctr: 0,
            pend_list: PendList::new(),
        }
    }

    #[inline(always)]
    pub fn kind(&self) -> OsSemKind {
        self.kind
    }

    /// Get current semaphore count
    #[inline(always)]
    pub fn count(&self) -> OsSemCtr {
        self.count
    }
}

impl<T: TaskEntry> Kernel<T> {
    /// Create a binary semaphore, initially empty
    pub fn sem_create_binary(&mut self) -> OsResult<SemId> {
        self.sem_alloc(OsSem::new(OsSemKind::Binary, 0, 1))
    }

    /// Create a counting semaphore
    ///
    /// # Arguments
    /// * `max` - Highest count (at least 1)
    /// * `initial` - Starting count, at most `max`
    pub fn sem_create_counting(&mut self, max: OsSemCtr, initial: OsSemCtr) -> OsResult<SemId> {
        if max == 0 || initial > max {
            return Err(OsError::OptInvalid);
        }
        self.sem_alloc(OsSem::new(OsSemKind::Counting, initial, max))
    }

    pub(crate) fn sem_alloc(&mut self, sem: OsSem) -> OsResult<SemId> {
        let id = SemId(self.sems.len() as u8);
        let kind = sem.kind;
        self.sems.push(sem).map_err(|_| OsError::SemNoMoreObj)?;

        crate::debug!("semaphore {} created as {:?}", id.number(), kind);
        Ok(id)
    }

    pub(crate) fn sem_ref(&self, sem: SemId) -> OsResult<&OsSem> {
        self.sems.get(sem.index()).ok_or(OsError::ObjInvalid)
    }

    /// Signal (post) a binary or counting semaphore
    ///
    /// # Returns
    /// * `Ok(())` - A waiter was woken or the count went up
    /// * `Err(OsError::SemOvf)` - Count already at its maximum
    /// * `Err(OsError::ObjType)` - Object is a mutex
    pub fn sem_give(&mut self, sem: SemId) -> OsResult<()> {
        let s = self.sems.get_mut(sem.index()).ok_or(OsError::ObjInvalid)?;
        if s.kind.is_mutex() {
            return Err(OsError::ObjType);
        }

        // The count stays put when a waiter takes the signal directly
        if let Some(waiter) = s.pend_list.pop() {
            self.wake(waiter, Ok(Reply::Done));
            return Ok(());
        }

        if s.count >= s.max {
            return Err(OsError::SemOvf);
        }
        s.count += 1;
        Ok(())
    }

    /// Take a binary or counting semaphore without blocking
    pub fn sem_try_take(&mut self, sem: SemId) -> OsResult<()> {
        match self.sem_take_pend(sem) {
            Pend::Done(_) => Ok(()),
            Pend::Fail(err) => Err(err),
            Pend::Block(_) => Err(OsError::PendWouldBlock),
        }
    }

    pub fn sem_count(&self, sem: SemId) -> OsResult<OsSemCtr> {
        Ok(self.sem_ref(sem)?.count)
    }

    pub(crate) fn sem_take_pend(&mut self, sem: SemId) -> Pend {
        let Some(s) = self.sems.get_mut(sem.index()) else {
            return Pend::Fail(OsError::ObjInvalid);
        };
        if s.kind.is_mutex() {
            return Pend::Fail(OsError::ObjType);
        }

        if s.count > 0 {
            s.count -= 1;
            Pend::Done(Reply::Done)
        } else {
            Pend::Block(OsPendOn::Semaphore(sem))
        }
    }
}
