//! Core kernel modules
//!
//! Contains the kernel state, scheduler, task control, time handling,
//! the object registry and the read-only inspection views.

pub mod config;
pub mod error;
pub mod info;
pub mod kernel;
pub mod prio;
pub mod registry;
pub mod types;
pub mod task;
pub mod sched;
pub mod time;
