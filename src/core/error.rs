//! Error types for the kernel
//!
//! Uses Rust's Result pattern instead of C-style status codes.

/// Kernel error type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u16)]
pub enum OsError {
    // ============ Mutex errors ============
    /// Caller is not the mutex owner
    MutexNotOwner = 22401,
    /// Task already owns the (non-recursive) mutex
    MutexOwner = 22402,
    /// Mutex nesting overflow
    MutexOvf = 22404,

    // ============ Object errors ============
    /// Handle does not name a live object
    ObjInvalid = 24003,
    /// Wrong object type for this operation
    ObjType = 24004,

    // ============ Option errors ============
    /// Invalid option specified
    OptInvalid = 24101,

    // ============ Pend errors ============
    /// Pend was aborted by kernel shutdown
    PendAbort = 25001,
    /// Pend would block (zero timeout)
    PendWouldBlock = 25008,

    // ============ Priority errors ============
    /// Invalid priority
    PrioInvalid = 25203,

    // ============ Queue errors ============
    /// Queue is full
    QFull = 26001,
    /// Queue is empty
    QEmpty = 26002,
    /// Queue length is zero or exceeds the configured depth
    QMax = 26003,
    /// No more queue control blocks
    QNoMoreObj = 26005,

    // ============ Registry errors ============
    /// No free slot in the object registry
    RegistryFull = 27001,

    // ============ Semaphore errors ============
    /// Semaphore overflow
    SemOvf = 28101,
    /// No more semaphore control blocks
    SemNoMoreObj = 28102,

    // ============ State errors ============
    /// Invalid stack size
    StkSizeInvalid = 28208,

    // ============ Task errors ============
    /// No more TCBs available
    TaskNoMoreTcb = 29008,

    // ============ Timeout ============
    /// Operation timed out
    Timeout = 29401,

    // ============ Timer errors ============
    /// Invalid timer period
    TmrInvalidPeriod = 29504,
    /// No more timer control blocks
    TmrNoMoreObj = 29509,
}

/// Result type alias for kernel operations
pub type OsResult<T> = Result<T, OsError>;

impl OsError {
    /// Numeric code, stable across releases
    #[inline]
    pub fn code(self) -> u16 {
        self as u16
    }

    /// Whether the error is an expected blocking outcome rather than misuse
    #[inline]
    pub fn is_timeout(self) -> bool {
        matches!(self, OsError::Timeout | OsError::PendWouldBlock)
    }
}
