//! RTOS kernel-object fixture
//!
//! A small tick-driven kernel model plus the fixture application that
//! populates it, so that debugger-side inspection tools can be checked
//! against known kernel state:
//! - Tasks stepped by a priority-ordered round-robin scheduler
//! - Queues, binary/counting semaphores, mutexes and recursive mutexes
//! - Auto-reload and one-shot software timers
//! - A name registry and read-only inspection views

#![no_std]
#![deny(unsafe_op_in_unsafe_fn)]

// ============ Critical Section ============

#[cfg(target_arch = "arm")]
mod cs_impl {
    use cortex_m::interrupt;
    use cortex_m::register::primask;
    use critical_section::{set_impl, Impl, RawRestoreState};

    struct SingleCoreCriticalSection;
    set_impl!(SingleCoreCriticalSection);

    unsafe impl Impl for SingleCoreCriticalSection {
        unsafe fn acquire() -> RawRestoreState {
            let was_active = primask::read().is_active();
            interrupt::disable();
            was_active
        }

        unsafe fn release(was_active: RawRestoreState) {
            if was_active {
                unsafe { interrupt::enable() }
            }
        }
    }
}

// ============ Modules ============

pub mod log;
mod lang_items;

pub mod core;
pub mod sync;
pub mod timer;
pub mod port;
pub mod fixture;

// ============ Re-exports ============

pub use crate::core::config;
pub use crate::core::config::*;
pub use crate::core::error;
pub use crate::core::error::{OsError, OsResult};
pub use crate::core::info;
pub use crate::core::kernel;
pub use crate::core::kernel::{Kernel, ShutdownSignal};
pub use crate::core::prio;
pub use crate::core::registry;
pub use crate::core::registry::{KernelObject, Registry};
pub use crate::core::sched;
pub use crate::core::task;
pub use crate::core::task::{Reply, Syscall, TaskEntry};
pub use crate::core::time;
pub use crate::core::time::{ms_to_ticks, TickSource};
pub use crate::core::types;
pub use crate::core::types::*;

pub use sync::{mutex, queue, sem};
pub use timer::{OsTmrCallback, TimerCtl};

pub use fixture::{app_main, FixtureConfig, FixtureContext, FixtureTask};
