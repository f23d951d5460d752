//! Synchronization primitives
//!
//! Contains queues, semaphores and mutexes, plus the priority-ordered wait
//! list they share.

pub mod wait_list;
pub mod queue;
pub mod sem;
pub mod mutex;
