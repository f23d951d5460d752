//! Kernel-object inspection fixture
//!
//! Populates a kernel with a known set of tasks, queues, semaphores,
//! mutexes and timers, all registered by name, so that an inspector reading
//! kernel state from outside can be checked against it.

mod tasks;
mod timers;

pub use tasks::FixtureTask;
pub use timers::{timer_callback, TIMER_MAX_EXPIRY_COUNT};

use heapless::Vec;

use crate::kernel::Kernel;
use crate::types::{OsPrio, OsSemCtr, OsTick, QueueId, SemId, TaskId, TimerId};

/// Number of timers in the bank
pub const NUM_TIMERS: usize = 5;

/// Timer names, in creation order
pub const TIMER_NAMES: [&str; NUM_TIMERS] = ["TIMER0", "TIMER1", "TIMER2", "TIMER3", "TIMER4"];

/// Number of tasks the fixture launches when every object is created
pub const NUM_TASKS: usize = 7;

/// Fixture parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixtureConfig {
    /// Timeout of every blocking call, in ticks
    pub op_delay: OsTick,
    /// Capacity of `queue1` and `queue2`
    pub queue_length: usize,
    /// Priority of every task
    pub task_prio: OsPrio,
    /// Stack size of every task
    pub task_stk_size: usize,
    /// `COUNTING` maximum
    pub counting_max: OsSemCtr,
    /// `COUNTING` initial count
    pub counting_initial: OsSemCtr,
    /// `TIMERn` runs with period `(n + 1) * timer_base_period`
    pub timer_base_period: OsTick,
}

impl Default for FixtureConfig {
    fn default() -> Self {
        Self {
            op_delay: 1000,
            queue_length: 10,
            task_prio: 6,
            task_stk_size: 2046,
            counting_max: 10,
            counting_initial: 5,
            timer_base_period: 100,
        }
    }
}

/// Handles of everything the fixture created
///
/// Shared read-only with every task pass. A `None` handle means creation
/// failed and its dependent tasks were never launched.
#[derive(Debug, Clone, Default)]
pub struct FixtureContext {
    pub config: FixtureConfig,
    pub queue1: Option<QueueId>,
    pub queue2: Option<QueueId>,
    pub binary: Option<SemId>,
    pub counting: Option<SemId>,
    pub mutex: Option<SemId>,
    pub recursive_mutex: Option<SemId>,
    pub timers: [Option<TimerId>; NUM_TIMERS],
    pub tasks: Vec<TaskId, NUM_TASKS>,
}

/// Create and register every fixture object and launch its tasks
///
/// Construction is best effort: an object that cannot be created is
/// skipped together with the tasks that use it. Nothing created earlier is
/// undone and nothing is reported.
pub fn app_main(kernel: &mut Kernel<FixtureTask>, config: FixtureConfig) -> FixtureContext {
    let mut ctx = FixtureContext {
        config,
        ..FixtureContext::default()
    };

    ctx.queue1 = kernel.queue_create(config.queue_length).ok();
    if let Some(queue1) = ctx.queue1 {
        let _ = kernel.registry_add(queue1, "queue1");
        spawn(kernel, &mut ctx, "SENDER1", FixtureTask::sender());
        spawn(kernel, &mut ctx, "SENDER2", FixtureTask::sender());
    }

    ctx.queue2 = kernel.queue_create(config.queue_length).ok();
    if let Some(queue2) = ctx.queue2 {
        let _ = kernel.registry_add(queue2, "queue2");
        spawn(kernel, &mut ctx, "READER1", FixtureTask::reader());
        spawn(kernel, &mut ctx, "READER2", FixtureTask::reader());
    }

    ctx.binary = kernel.sem_create_binary().ok();
    if let Some(binary) = ctx.binary {
        let _ = kernel.registry_add(binary, "BINARY");
        spawn(kernel, &mut ctx, "SEM_BIN1", FixtureTask::sem_bin_take());
        spawn(kernel, &mut ctx, "SEM_BIN2", FixtureTask::sem_bin_take());
    }

    ctx.counting = kernel
        .sem_create_counting(config.counting_max, config.counting_initial)
        .ok();
    if let Some(counting) = ctx.counting {
        let _ = kernel.registry_add(counting, "COUNTING");
    }

    // Never taken by any task
    ctx.mutex = kernel.mutex_create().ok();
    if let Some(mutex) = ctx.mutex {
        let _ = kernel.registry_add(mutex, "MUTEX");
    }

    ctx.recursive_mutex = kernel.mutex_create_recursive().ok();
    if let Some(recursive_mutex) = ctx.recursive_mutex {
        let _ = kernel.registry_add(recursive_mutex, "RECURSIVE_MUTEX");
        spawn(kernel, &mut ctx, "SEM_RECUR", FixtureTask::sem_recur_take());
    }

    for (n, &name) in TIMER_NAMES.iter().enumerate() {
        let period = config.timer_base_period * (n as OsTick + 1);
        let timer = kernel.timer_create(name, period, true, 0, timer_callback).ok();
        if let Some(timer) = timer {
            let _ = kernel.timer_start(timer);
        }
        ctx.timers[n] = timer;
    }

    ctx
}

fn spawn(
    kernel: &mut Kernel<FixtureTask>,
    ctx: &mut FixtureContext,
    name: &'static str,
    entry: FixtureTask,
) {
    let config = ctx.config;
    if let Ok(id) = kernel.task_create(name, config.task_stk_size, config.task_prio, entry) {
        let _ = ctx.tasks.push(id);
    }
}
