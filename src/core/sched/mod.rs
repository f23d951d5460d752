//! Scheduler module
//!
//! Priority-ordered selection with round-robin among tasks of equal
//! priority. Tasks are step machines, so "running" a task means executing
//! one pass of its loop body; there is no context switch.

mod rdy_list;

pub use rdy_list::ReadyList;

use crate::config::CFG_PRIO_MAX;
use crate::prio::PrioTable;
use crate::types::{OsPrio, TaskId};

/// Scheduler state
pub struct SchedState {
    prio_tbl: PrioTable,
    rdy_list: [ReadyList; CFG_PRIO_MAX],
}

impl SchedState {
    pub const fn new() -> Self {
        Self {
            prio_tbl: PrioTable::new(),
            rdy_list: [const { ReadyList::new() }; CFG_PRIO_MAX],
        }
    }

    /// Make a task ready
    pub fn rdy_list_insert(&mut self, id: TaskId, prio: OsPrio) {
        self.rdy_list[prio as usize].insert_tail(id);
        self.prio_tbl.insert(prio);
    }

    /// Remove a task from the ready list
    pub fn rdy_list_remove(&mut self, id: TaskId, prio: OsPrio) -> bool {
        let list = &mut self.rdy_list[prio as usize];
        let found = list.remove(id);
        if list.is_empty() {
            self.prio_tbl.remove(prio);
        }
        found
    }

    /// Move a ready task to a different priority level
    pub fn rdy_list_change_prio(&mut self, id: TaskId, old_prio: OsPrio, new_prio: OsPrio) {
        if old_prio == new_prio {
            return;
        }
        if self.rdy_list_remove(id, old_prio) {
            self.rdy_list_insert(id, new_prio);
        }
    }

    /// Take the next task to run: head of the highest non-empty level
    pub fn pick_next(&mut self) -> Option<TaskId> {
        let prio = self.prio_tbl.get_highest()?;
        let list = &mut self.rdy_list[prio as usize];
        let next = list.pop_head();
        if list.is_empty() {
            self.prio_tbl.remove(prio);
        }
        next
    }

    /// Highest priority with a ready task
    #[inline]
    pub fn highest_ready(&self) -> Option<OsPrio> {
        self.prio_tbl.get_highest()
    }

    #[inline]
    pub fn is_idle(&self) -> bool {
        self.prio_tbl.is_empty()
    }

    /// Ready list for one priority level
    #[inline]
    pub fn rdy_list(&self, prio: OsPrio) -> &ReadyList {
        &self.rdy_list[prio as usize]
    }

    /// Drop every ready entry
    pub fn clear(&mut self) {
        for list in self.rdy_list.iter_mut() {
            while list.pop_head().is_some() {}
        }
        self.prio_tbl = PrioTable::new();
    }
}

impl Default for SchedState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_robin_within_level() {
        let mut sched = SchedState::new();
        sched.rdy_list_insert(TaskId(0), 6);
        sched.rdy_list_insert(TaskId(1), 6);

        assert_eq!(sched.pick_next(), Some(TaskId(0)));
        sched.rdy_list_insert(TaskId(0), 6);
        assert_eq!(sched.pick_next(), Some(TaskId(1)));
        assert_eq!(sched.pick_next(), Some(TaskId(0)));
        assert_eq!(sched.pick_next(), None);
        assert!(sched.is_idle());
    }

    #[test]
    fn test_higher_priority_first() {
        let mut sched = SchedState::new();
        sched.rdy_list_insert(TaskId(0), 3);
        sched.rdy_list_insert(TaskId(1), 9);

        assert_eq!(sched.highest_ready(), Some(9));
        assert_eq!(sched.pick_next(), Some(TaskId(1)));
        assert_eq!(sched.pick_next(), Some(TaskId(0)));
    }

    #[test]
    fn test_change_prio() {
        let mut sched = SchedState::new();
        sched.rdy_list_insert(TaskId(2), 4);
        sched.rdy_list_change_prio(TaskId(2), 4, 8);

        assert!(sched.rdy_list(4).is_empty());
        assert_eq!(sched.rdy_list(8).head(), Some(TaskId(2)));
    }
}
