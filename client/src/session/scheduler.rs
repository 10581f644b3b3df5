//! Periodic validity-check scheduler.
//!
//! DESIGN
//! ======
//! The scheduler owns at most one `TimerGuard`. Holding a guard is what
//! "running" means, and dropping it disarms the underlying timer, so a stopped
//! scheduler cannot leak a live interval. `start` and `stop` are both
//! idempotent.

#[cfg(test)]
#[path = "scheduler_test.rs"]
mod scheduler_test;

use std::any::Any;
use std::rc::Rc;
use std::time::Duration;

/// Keeps a recurring timer armed; dropping it cancels the timer.
pub struct TimerGuard {
    _timer: Box<dyn Any>,
}

impl TimerGuard {
    pub fn new<T: 'static>(timer: T) -> Self {
        Self { _timer: Box::new(timer) }
    }
}

/// Arms recurring timers.
pub trait Ticker {
    fn every(&self, period: Duration, on_tick: Rc<dyn Fn()>) -> TimerGuard;
}

/// `gloo-timers` interval in the browser; inert on the server build.
#[derive(Clone, Copy, Debug, Default)]
pub struct IntervalTicker;

impl Ticker for IntervalTicker {
    fn every(&self, period: Duration, on_tick: Rc<dyn Fn()>) -> TimerGuard {
        #[cfg(feature = "hydrate")]
        {
            let millis = u32::try_from(period.as_millis()).unwrap_or(u32::MAX);
            TimerGuard::new(gloo_timers::callback::Interval::new(millis, move || on_tick()))
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (period, on_tick);
            TimerGuard::new(())
        }
    }
}

/// Scheduler lifecycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SchedulerState {
    #[default]
    Stopped,
    Running,
}

/// Two-state machine wrapping a single recurring timer.
pub struct Scheduler {
    ticker: Rc<dyn Ticker>,
    period: Duration,
    timer: Option<TimerGuard>,
}

impl Scheduler {
    pub fn new(ticker: Rc<dyn Ticker>, period: Duration) -> Self {
        Self { ticker, period, timer: None }
    }

    pub fn state(&self) -> SchedulerState {
        if self.timer.is_some() { SchedulerState::Running } else { SchedulerState::Stopped }
    }

    pub fn is_running(&self) -> bool {
        self.timer.is_some()
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Arm the timer. Returns `false` (and arms nothing) if already running.
    pub fn start(&mut self, on_tick: Rc<dyn Fn()>) -> bool {
        if self.timer.is_some() {
            return false;
        }
        self.timer = Some(self.ticker.every(self.period, on_tick));
        true
    }

    /// Disarm the timer. Returns `false` if it was already stopped.
    pub fn stop(&mut self) -> bool {
        self.timer.take().is_some()
    }
}
