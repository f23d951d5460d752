//! Ready list - FIFO of tasks at a given priority
//!
//! Each priority level has its own ready list. Tasks are added to the
//! tail (round-robin order) and scheduled from the head.

use heapless::Deque;

use crate::config::CFG_MAX_TASKS;
use crate::types::TaskId;

/// Ready list for a single priority level
#[derive(Debug)]
pub struct ReadyList {
    tasks: Deque<TaskId, CFG_MAX_TASKS>,
}

impl ReadyList {
    /// Create a new empty ready list
    pub const fn new() -> Self {
        ReadyList { tasks: Deque::new() }
    }

    /// Get head of list (first to be scheduled)
    #[inline]
    pub fn head(&self) -> Option<TaskId> {
        self.tasks.front().copied()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Insert at the tail of the list (FIFO order)
    ///
    /// A task is never in more than one ready list, so the list cannot
    /// outgrow the TCB pool.
    pub fn insert_tail(&mut self, id: TaskId) {
        let _ = self.tasks.push_back(id);
    }

    /// Take the head of the list
    pub fn pop_head(&mut self) -> Option<TaskId> {
        self.tasks.pop_front()
    }

    /// Remove a task from anywhere in the list
    pub fn remove(&mut self, id: TaskId) -> bool {
        let len = self.tasks.len();
        let mut found = false;
        for _ in 0..len {
            if let Some(cur) = self.tasks.pop_front() {
                if cur == id && !found {
                    found = true;
                } else {
                    let _ = self.tasks.push_back(cur);
                }
            }
        }
        found
    }

    pub fn iter(&self) -> impl Iterator<Item = TaskId> + '_ {
        self.tasks.iter().copied()
    }
}

impl Default for ReadyList {
    fn default() -> Self {
        Self::new()
    }
}
