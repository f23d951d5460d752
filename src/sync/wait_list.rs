//! Wait list for tasks blocked on a kernel object
//!
//! Tasks are kept in priority order, highest first; tasks of equal
//! priority are served in arrival order.

use heapless::Vec;

use crate::config::CFG_MAX_TASKS;
use crate::types::{OsPrio, TaskId};

/// Pend list for tasks waiting on a kernel object
#[derive(Debug, Default)]
pub struct PendList {
    tasks: Vec<(OsPrio, TaskId), CFG_MAX_TASKS>,
}

impl PendList {
    /// Create a new empty pend list
    pub const fn new() -> Self {
        PendList { tasks: Vec::new() }
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Get head of list
    #[inline(always)]
    pub fn head(&self) -> Option<TaskId> {
        self.tasks.first().map(|&(_, id)| id)
    }

    /// Priority of the head of the list
    #[inline]
    pub fn head_prio(&self) -> Option<OsPrio> {
        self.tasks.first().map(|&(prio, _)| prio)
    }

    /// Insert in priority order, behind tasks of the same priority
    pub fn insert_by_prio(&mut self, id: TaskId, prio: OsPrio) {
        let pos = self
            .tasks
            .iter()
            .position(|&(p, _)| prio > p)
            .unwrap_or(self.tasks.len());
        // A task pends on one object at a time, so the list cannot outgrow the TCB pool
        let _ = self.tasks.insert(pos, (prio, id));
    }

    /// Take the head of the list
    pub fn pop(&mut self) -> Option<TaskId> {
        if self.tasks.is_empty() {
            None
        } else {
            Some(self.tasks.remove(0).1)
        }
    }

    /// Remove specific task from list
    pub fn remove(&mut self, id: TaskId) -> bool {
        match self.tasks.iter().position(|&(_, t)| t == id) {
            Some(pos) => {
                self.tasks.remove(pos);
                true
            }
            None => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = TaskId> + '_ {
        self.tasks.iter().map(|&(_, id)| id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_then_fifo() {
        let mut list = PendList::new();
        list.insert_by_prio(TaskId(0), 6);
        list.insert_by_prio(TaskId(1), 6);
        list.insert_by_prio(TaskId(2), 9);
        list.insert_by_prio(TaskId(3), 2);

        assert_eq!(list.head_prio(), Some(9));
        assert_eq!(list.pop(), Some(TaskId(2)));
        assert_eq!(list.pop(), Some(TaskId(0)));
        assert_eq!(list.pop(), Some(TaskId(1)));
        assert_eq!(list.pop(), Some(TaskId(3)));
        assert_eq!(list.pop(), None);
    }

    #[test]
    fn test_remove() {
        let mut list = PendList::new();
        list.insert_by_prio(TaskId(0), 6);
        list.insert_by_prio(TaskId(1), 6);

        assert!(list.remove(TaskId(0)));
        assert!(!list.remove(TaskId(0)));
        assert_eq!(list.head(), Some(TaskId(1)));
        assert_eq!(list.len(), 1);
    }
}
