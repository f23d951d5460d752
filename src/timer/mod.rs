//! Software timers
//!
//! Timers are serviced on every kernel tick after pending tasks have been
//! timed out. Each timer carries a tag value that only its own callback can
//! change, through `TimerCtl`.

use crate::error::{OsError, OsResult};
use crate::kernel::Kernel;
use crate::registry::KernelObject;
use crate::task::TaskEntry;
use crate::time::tick_reached;
use crate::types::{OsTick, OsTmrId, TimerId, OS_MAX_TIMEOUT};

/// Timer callback
pub type OsTmrCallback = fn(&mut TimerCtl<'_>);

/// Timer control block
pub struct OsTimer {
    /// Timer name
    pub(crate) name: &'static str,
    /// Expiry period in ticks
    pub(crate) period: OsTick,
    /// Restart automatically after each expiry
    pub(crate) auto_reload: bool,
    /// Tag value, owned by the callback
    pub(crate) id: OsTmrId,
    pub(crate) callback: OsTmrCallback,
    /// Timer is counting towards `expiry`
    pub(crate) active: bool,
    /// Tick of the next expiry
    pub(crate) expiry: OsTick,
    /// Number of times the callback ran
    pub(crate) fired: u32,
}

/// Handle passed to a timer callback
///
/// Gives the callback exclusive access to its own timer's tag and lets it
/// stop the timer.
pub struct TimerCtl<'a> {
    handle: TimerId,
    timer: &'a mut OsTimer,
}

impl TimerCtl<'_> {
    #[inline]
    pub fn handle(&self) -> TimerId {
        self.handle
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.timer.name
    }

    /// Current tag value
    #[inline]
    pub fn id(&self) -> OsTmrId {
        self.timer.id
    }

    /// Replace the tag value
    #[inline]
    pub fn set_id(&mut self, id: OsTmrId) {
        self.timer.id = id;
    }

    #[inline]
    pub fn period(&self) -> OsTick {
        self.timer.period
    }

    /// Stop the timer. It stays allocated and can be restarted.
    pub fn stop(&mut self) {
        self.timer.active = false;
        crate::debug!("timer {} stopped", self.timer.name);
    }
}

impl<T: TaskEntry> Kernel<T> {
    /// Create a dormant timer and register it under `name`
    ///
    /// # Arguments
    /// * `name` - Timer name, also its registry entry
    /// * `period` - Ticks between expiries, in `1..=OS_MAX_TIMEOUT`
    /// * `auto_reload` - Restart after each expiry
    /// * `id` - Initial tag value
    /// * `callback` - Function run on expiry
    pub fn timer_create(
        &mut self,
        name: &'static str,
        period: OsTick,
        auto_reload: bool,
        id: OsTmrId,
        callback: OsTmrCallback,
    ) -> OsResult<TimerId> {
        if period == 0 || period > OS_MAX_TIMEOUT {
            return Err(OsError::TmrInvalidPeriod);
        }
        if self.timers.is_full() {
            return Err(OsError::TmrNoMoreObj);
        }
        if !self.registry.has_room() {
            return Err(OsError::RegistryFull);
        }

        let handle = TimerId(self.timers.len() as u8);
        self.timers
            .push(OsTimer {
                name,
                period,
                auto_reload,
                id,
                callback,
                active: false,
                expiry: 0,
                fired: 0,
            })
            .map_err(|_| OsError::TmrNoMoreObj)?;
        self.registry.add(KernelObject::Timer(handle), name)?;

        crate::debug!("timer {} created, period {}", name, period);
        Ok(handle)
    }

    fn timer_mut(&mut self, timer: TimerId) -> OsResult<&mut OsTimer> {
        self.timers.get_mut(timer.index()).ok_or(OsError::ObjInvalid)
    }

    pub(crate) fn timer_ref(&self, timer: TimerId) -> OsResult<&OsTimer> {
        self.timers.get(timer.index()).ok_or(OsError::ObjInvalid)
    }

    /// Start the timer; the first expiry is one period from now
    pub fn timer_start(&mut self, timer: TimerId) -> OsResult<()> {
        let now = self.tick;
        let t = self.timer_mut(timer)?;
        t.active = true;
        t.expiry = now.wrapping_add(t.period);
        Ok(())
    }

    /// Stop the timer. Stopping a dormant timer is not an error.
    pub fn timer_stop(&mut self, timer: TimerId) -> OsResult<()> {
        self.timer_mut(timer)?.active = false;
        Ok(())
    }

    /// Restart the period from now
    pub fn timer_reset(&mut self, timer: TimerId) -> OsResult<()> {
        self.timer_start(timer)
    }

    /// Change the period and restart the timer
    pub fn timer_change_period(&mut self, timer: TimerId, period: OsTick) -> OsResult<()> {
        if period == 0 || period > OS_MAX_TIMEOUT {
            return Err(OsError::TmrInvalidPeriod);
        }
        self.timer_mut(timer)?.period = period;
        self.timer_start(timer)
    }

    pub fn timer_is_active(&self, timer: TimerId) -> OsResult<bool> {
        Ok(self.timer_ref(timer)?.active)
    }

    /// Current tag value
    pub fn timer_id(&self, timer: TimerId) -> OsResult<OsTmrId> {
        Ok(self.timer_ref(timer)?.id)
    }

    pub fn timer_period(&self, timer: TimerId) -> OsResult<OsTick> {
        Ok(self.timer_ref(timer)?.period)
    }

    /// Find a timer by name
    pub fn timer_by_name(&self, name: &str) -> Option<TimerId> {
        self.timers
            .iter()
            .position(|t| t.name == name)
            .map(|idx| TimerId(idx as u8))
    }

    /// Fire every active timer whose expiry tick has been reached
    pub(crate) fn timers_process(&mut self) {
        let now = self.tick;
        for (idx, timer) in self.timers.iter_mut().enumerate() {
            if !timer.active || !tick_reached(now, timer.expiry) {
                continue;
            }

            if timer.auto_reload {
                timer.expiry = timer.expiry.wrapping_add(timer.period);
            } else {
                timer.active = false;
            }
            timer.fired = timer.fired.wrapping_add(1);

            crate::trace!("timer {} expired at {}", timer.name, now);
            let callback = timer.callback;
            let mut ctl = TimerCtl {
                handle: TimerId(idx as u8),
                timer,
            };
            callback(&mut ctl);
        }
    }
}
