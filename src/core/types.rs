//! Core type definitions for the kernel
//!
//! These types provide strong typing for kernel primitives.

/// Task priority (higher number = higher priority, 0 = idle)
pub type OsPrio = u8;

/// Tick counter type
pub type OsTick = u32;

/// Semaphore counter type
pub type OsSemCtr = u32;

/// Recursive-take nesting counter
pub type OsNestingCtr = u32;

/// Queue item. Every queue carries fixed 4-byte integers.
pub type OsMsg = u32;

/// Timer tag value
pub type OsTmrId = u32;

/// Block for the whole timeout without a deadline
pub const OS_WAIT_FOREVER: OsTick = OsTick::MAX;

/// Fail immediately instead of blocking
pub const OS_NO_WAIT: OsTick = 0;

/// Longest finite wait; longer timeouts are clamped to it
pub const OS_MAX_TIMEOUT: OsTick = i32::MAX as OsTick;

macro_rules! handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[cfg_attr(feature = "defmt", derive(defmt::Format))]
        pub struct $name(pub(crate) u8);

        impl $name {
            #[inline(always)]
            pub(crate) fn index(self) -> usize {
                self.0 as usize
            }

            /// Slot number inside the kernel's object pool
            #[inline]
            pub fn number(self) -> u8 {
                self.0
            }
        }
    };
}

handle!(
    /// Handle to a task control block
    TaskId
);
handle!(
    /// Handle to a queue
    QueueId
);
handle!(
    /// Handle to a semaphore or mutex
    SemId
);
handle!(
    /// Handle to a software timer
    TimerId
);

/// Task state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum OsTaskState {
    /// Task is ready to run
    Ready = 0,
    /// Task is executing its current loop pass
    Running = 1,
    /// Task is delayed
    Delayed = 2,
    /// Task is pending on a kernel object without a deadline
    Pend = 3,
    /// Task is pending with timeout
    PendTimeout = 4,
    /// Task was removed by kernel shutdown
    Deleted = 5,
}

impl OsTaskState {
    /// Delayed or pending, i.e. not eligible to run
    #[inline]
    pub fn is_blocked(self) -> bool {
        matches!(self, OsTaskState::Delayed | OsTaskState::Pend | OsTaskState::PendTimeout)
    }
}

/// What the task is pending on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OsPendOn {
    Nothing,
    /// Waiting for the tick count only
    Delay,
    /// Waiting for room in a queue
    QueueSend(QueueId),
    /// Waiting for an item in a queue
    QueueRecv(QueueId),
    /// Waiting for a semaphore count
    Semaphore(SemId),
    /// Waiting for mutex ownership
    Mutex(SemId),
}

/// Pend status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum OsPendStatus {
    /// Pend succeeded
    Ok = 0,
    /// Pend was aborted
    Abort = 1,
    /// Timeout occurred
    Timeout = 3,
}

/// Semaphore flavour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum OsSemKind {
    /// Count in {0, 1}, created empty
    Binary = 0,
    /// Count in [0, max]
    Counting = 1,
    /// Ownership tracked, no re-entry
    Mutex = 2,
    /// Ownership tracked, owner may re-take
    RecursiveMutex = 3,
}

impl OsSemKind {
    #[inline]
    pub fn is_mutex(self) -> bool {
        matches!(self, OsSemKind::Mutex | OsSemKind::RecursiveMutex)
    }
}

/// Kernel object type marker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u32)]
pub enum OsObjType {
    Mutex = 0x4D555458,   // 'MUTX'
    Queue = 0x51554555,   // 'QUEU'
    Sem = 0x53454D41,     // 'SEMA'
    Timer = 0x544D5220,   // 'TMR '
}
