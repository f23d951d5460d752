//! Port layer - CPU-specific implementations
//!
//! The kernel needs two things from the CPU: a periodic tick and a way to
//! wait for the next one. Everything else runs the same on every target.

#[cfg(target_arch = "arm")]
pub mod cortex_m4;

#[cfg(target_arch = "arm")]
pub use cortex_m4::*;

/// Wait for the next interrupt
#[cfg(target_arch = "arm")]
#[inline(always)]
pub fn cpu_idle() {
    cortex_m::asm::wfi();
}

/// Hosted builds have no interrupt to wait for
#[cfg(not(target_arch = "arm"))]
#[inline(always)]
pub fn cpu_idle() {
    core::hint::spin_loop();
}
