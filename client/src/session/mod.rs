//! Client-side session activity tracking and forced expiry.
//!
//! SYSTEM CONTEXT
//! ==============
//! The backend keeps users signed in indefinitely via refresh tokens. This
//! module layers an inactivity rule on top: user interaction stamps a
//! last-activity time, a periodic check compares it against a 30-day window,
//! and an expired session is signed out.
//!
//! ARCHITECTURE
//! ============
//! - `activity`: persisted stamp and the expiry rule.
//! - `scheduler`: the `Stopped`/`Running` timer state machine.
//! - `sync`: pure auth-notification transition function.
//! - `context`: `SessionContext`, which owns all of the above and applies
//!   transition effects.

pub mod activity;
pub mod context;
pub mod scheduler;
pub mod sync;

#[cfg(test)]
pub(crate) mod testing;

use std::rc::Rc;

use async_trait::async_trait;

pub use activity::ActivityTracker;
pub use context::SessionContext;
pub use scheduler::{IntervalTicker, Scheduler, SchedulerState, Ticker, TimerGuard};
pub use sync::{SessionPhase, SyncEffect};

use crate::net::error::ApiResult;
use crate::net::types::AuthUser;

/// The slice of the auth client the session core depends on.
#[async_trait(?Send)]
pub trait AuthProvider {
    /// The signed-in user, or `None` when signed out or unreachable.
    async fn current_user(&self) -> Option<AuthUser>;

    /// End the session locally and remotely.
    async fn sign_out(&self) -> ApiResult<()>;
}

/// Page callbacks fired on login/logout transitions.
#[derive(Clone)]
pub struct UiHooks {
    signed_in: Rc<dyn Fn(&AuthUser)>,
    signed_out: Rc<dyn Fn()>,
}

impl UiHooks {
    pub fn new(signed_in: impl Fn(&AuthUser) + 'static, signed_out: impl Fn() + 'static) -> Self {
        Self { signed_in: Rc::new(signed_in), signed_out: Rc::new(signed_out) }
    }

    pub fn noop() -> Self {
        Self::new(|_| {}, || {})
    }

    pub fn signed_in(&self, user: &AuthUser) {
        (self.signed_in)(user);
    }

    pub fn signed_out(&self) {
        (self.signed_out)();
    }
}
