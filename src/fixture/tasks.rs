//! Fixture task bodies
//!
//! Each variant is one task's loop. A pass books the outcome of the
//! previous call and issues the next one; failures are counted, never
//! reported.

use crate::error::OsResult;
use crate::task::{Reply, Syscall, TaskEntry};
use crate::types::OsMsg;

use super::FixtureContext;

/// Loop body of a fixture task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FixtureTask {
    /// Posts an increasing counter to `queue1`
    Sender {
        /// Value of the next post
        count: OsMsg,
        sent: u32,
        /// Posts that timed out
        dropped: u32,
    },
    /// Drains `queue2`, discarding every item
    Reader { received: u32, timeouts: u32 },
    /// Takes `BINARY`, which nobody gives
    SemBinTake { attempts: u32, acquired: u32, timeouts: u32 },
    /// Takes `RECURSIVE_MUTEX` again and again, never giving it back
    SemRecurTake { attempts: u32, acquired: u32 },
}

impl FixtureTask {
    pub const fn sender() -> Self {
        FixtureTask::Sender {
            count: 0,
            sent: 0,
            dropped: 0,
        }
    }

    pub const fn reader() -> Self {
        FixtureTask::Reader {
            received: 0,
            timeouts: 0,
        }
    }

    pub const fn sem_bin_take() -> Self {
        FixtureTask::SemBinTake {
            attempts: 0,
            acquired: 0,
            timeouts: 0,
        }
    }

    pub const fn sem_recur_take() -> Self {
        FixtureTask::SemRecurTake {
            attempts: 0,
            acquired: 0,
        }
    }

    /// Calls that completed
    pub fn completed(&self) -> u32 {
        match *self {
            FixtureTask::Sender { sent, .. } => sent,
            FixtureTask::Reader { received, .. } => received,
            FixtureTask::SemBinTake { acquired, .. } => acquired,
            FixtureTask::SemRecurTake { acquired, .. } => acquired,
        }
    }

    /// Calls that failed, timeouts included
    pub fn failed(&self) -> u32 {
        match *self {
            FixtureTask::Sender { dropped, .. } => dropped,
            FixtureTask::Reader { timeouts, .. } => timeouts,
            FixtureTask::SemBinTake { timeouts, .. } => timeouts,
            FixtureTask::SemRecurTake { attempts, acquired } => attempts.wrapping_sub(acquired),
        }
    }
}

impl TaskEntry for FixtureTask {
    type Context = FixtureContext;

    fn step(&mut self, ctx: &FixtureContext, last: Option<OsResult<Reply>>) -> Syscall {
        let timeout = ctx.config.op_delay;

        match self {
            FixtureTask::Sender { count, sent, dropped } => {
                if let Some(res) = last {
                    match res {
                        Ok(_) => *sent = sent.wrapping_add(1),
                        Err(_) => *dropped = dropped.wrapping_add(1),
                    }
                    *count = count.wrapping_add(1);
                }
                match ctx.queue1 {
                    Some(queue) => Syscall::QueueSend {
                        queue,
                        item: *count,
                        timeout,
                    },
                    None => Syscall::Delay(timeout),
                }
            }
            FixtureTask::Reader { received, timeouts } => {
                match last {
                    Some(Ok(Reply::Item(_))) => *received = received.wrapping_add(1),
                    Some(Err(_)) => *timeouts = timeouts.wrapping_add(1),
                    _ => {}
                }
                match ctx.queue2 {
                    Some(queue) => Syscall::QueueReceive { queue, timeout },
                    None => Syscall::Delay(timeout),
                }
            }
            FixtureTask::SemBinTake {
                attempts,
                acquired,
                timeouts,
            } => {
                if let Some(res) = last {
                    *attempts = attempts.wrapping_add(1);
                    match res {
                        Ok(_) => *acquired = acquired.wrapping_add(1),
                        Err(_) => *timeouts = timeouts.wrapping_add(1),
                    }
                }
                match ctx.binary {
                    Some(sem) => Syscall::SemTake { sem, timeout },
                    None => Syscall::Delay(timeout),
                }
            }
            FixtureTask::SemRecurTake { attempts, acquired } => {
                if let Some(res) = last {
                    *attempts = attempts.wrapping_add(1);
                    if res.is_ok() {
                        *acquired = acquired.wrapping_add(1);
                    }
                }
                match ctx.recursive_mutex {
                    Some(mutex) => Syscall::MutexTakeRecursive { mutex, timeout },
                    None => Syscall::Delay(timeout),
                }
            }
        }
    }
}
