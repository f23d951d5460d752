//! Priority bitmap for O(1) highest-ready lookup
//!
//! One bit per priority level; a set bit means the level has at least one
//! ready task. Higher numbers are higher priorities, so the highest ready
//! level is the most significant set bit.

use crate::config::CFG_PRIO_MAX;
use crate::types::OsPrio;

/// Priority bitmap table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrioTable {
    bitmap: u32,
}

impl PrioTable {
    pub const fn new() -> Self {
        PrioTable { bitmap: 0 }
    }

    /// Mark a priority level as having ready tasks
    #[inline]
    pub fn insert(&mut self, prio: OsPrio) {
        debug_assert!((prio as usize) < CFG_PRIO_MAX);
        self.bitmap |= 1 << prio;
    }

    /// Clear a priority level
    #[inline]
    pub fn remove(&mut self, prio: OsPrio) {
        debug_assert!((prio as usize) < CFG_PRIO_MAX);
        self.bitmap &= !(1 << prio);
    }

    /// Highest priority with a ready task, if any
    #[inline]
    pub fn get_highest(&self) -> Option<OsPrio> {
        if self.bitmap == 0 {
            None
        } else {
            Some((31 - self.bitmap.leading_zeros()) as OsPrio)
        }
    }

    #[inline]
    pub fn is_set(&self, prio: OsPrio) -> bool {
        (self.bitmap & (1 << prio)) != 0
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bitmap == 0
    }
}

impl Default for PrioTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_table() {
        let table = PrioTable::new();
        assert!(table.is_empty());
        assert_eq!(table.get_highest(), None);
    }

    #[test]
    fn test_insert_remove() {
        let mut table = PrioTable::new();

        table.insert(5);
        assert!(table.is_set(5));
        assert!(!table.is_set(4));
        assert_eq!(table.get_highest(), Some(5));

        table.insert(7);
        assert_eq!(table.get_highest(), Some(7));

        table.remove(7);
        assert_eq!(table.get_highest(), Some(5));

        table.remove(5);
        assert!(table.is_empty());
    }

    #[test]
    fn test_boundary_priorities() {
        let mut table = PrioTable::new();

        table.insert(0);
        assert_eq!(table.get_highest(), Some(0));

        let top = (CFG_PRIO_MAX - 1) as OsPrio;
        table.insert(top);
        assert_eq!(table.get_highest(), Some(top));

        table.remove(top);
        assert_eq!(table.get_highest(), Some(0));
    }
}
