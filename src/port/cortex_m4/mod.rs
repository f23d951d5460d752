//! Cortex-M4 port implementation
//!
//! SysTick drives the kernel tick. The handler only counts; the run loop
//! drains the count in thread mode.

use cortex_m::peripheral::syst::SystClkSource;
use cortex_m::peripheral::SYST;

use crate::config::CFG_TICK_RATE_HZ;
use crate::time::TickSource;

/// Tick source fed by the SysTick exception
pub static SYSTICK: TickSource = TickSource::new();

/// Initialize SysTick timer for system tick generation
///
/// # Arguments
/// * `syst` - SysTick peripheral
/// * `core_hz` - Core clock frequency
///
/// # Example
/// For 16MHz clock with 1000Hz tick rate the reload is 16_000_000 / 1000 = 16_000
pub fn systick_init(syst: &mut SYST, core_hz: u32) {
    let cnts = core_hz / CFG_TICK_RATE_HZ;

    syst.set_reload(cnts.saturating_sub(1));
    syst.clear_current();
    syst.set_clock_source(SystClkSource::Core);
    syst.enable_interrupt();
    syst.enable_counter();
}

#[cortex_m_rt::exception]
fn SysTick() {
    SYSTICK.tick();
}
