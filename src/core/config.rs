//! Compile-time configuration for the kernel
//!
//! These constants control the behavior and resource limits of the kernel.
//! All object storage is statically sized from them.

/// Number of priority levels (0 = idle, `CFG_PRIO_MAX - 1` = highest)
pub const CFG_PRIO_MAX: usize = 25;

/// System tick rate in Hz
pub const CFG_TICK_RATE_HZ: u32 = 1000;

/// Maximum number of tasks
pub const CFG_MAX_TASKS: usize = 16;

/// Maximum number of queues
pub const CFG_MAX_QUEUES: usize = 8;

/// Maximum number of semaphores and mutexes
pub const CFG_MAX_SEMS: usize = 8;

/// Maximum number of software timers
pub const CFG_MAX_TIMERS: usize = 8;

/// Deepest queue that can be created
pub const CFG_QUEUE_DEPTH_MAX: usize = 32;

/// Number of name slots in the object registry
pub const CFG_QUEUE_REGISTRY_SIZE: usize = 16;

/// Minimum task stack size
pub const CFG_STK_SIZE_MIN: usize = 256;

/// Task passes the scheduler may run between two ticks
pub const CFG_SCHED_STEPS_PER_TICK: usize = 64;

const _: () = assert!(CFG_PRIO_MAX <= 32, "ready bitmap is a single word");
const _: () = assert!(CFG_MAX_TASKS <= u8::MAX as usize);
