//! Timer bank callback

use crate::timer::TimerCtl;
use crate::types::OsTmrId;

/// Expiries after which a fixture timer stops itself
pub const TIMER_MAX_EXPIRY_COUNT: OsTmrId = 10;

/// Count expiries in the timer's tag and stop at the limit
pub fn timer_callback(ctl: &mut TimerCtl<'_>) {
    let count = ctl.id().saturating_add(1);
    ctl.set_id(count);

    if count >= TIMER_MAX_EXPIRY_COUNT {
        ctl.stop();
    }
}
