//! In-memory collaborators for session tests.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use async_trait::async_trait;
use time::OffsetDateTime;
use time::macros::datetime;

use super::{AuthProvider, TimerGuard, Ticker, UiHooks};
use crate::net::error::{ApiError, ApiResult};
use crate::net::types::{AuthSession, AuthUser};
use crate::util::clock::Clock;

pub(crate) const EPOCH: OffsetDateTime = datetime!(2025-06-01 12:00 UTC);

/// Clock that only moves when told to.
#[derive(Clone)]
pub(crate) struct ManualClock {
    now: Rc<Cell<OffsetDateTime>>,
}

impl ManualClock {
    pub(crate) fn new(now: OffsetDateTime) -> Self {
        Self { now: Rc::new(Cell::new(now)) }
    }

    pub(crate) fn advance(&self, by: time::Duration) {
        self.now.set(self.now.get() + by);
    }

    pub(crate) fn set(&self, now: OffsetDateTime) {
        self.now.set(now);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> OffsetDateTime {
        self.now.get()
    }
}

/// Ticker that never fires but counts armed and live timers.
#[derive(Clone, Default)]
pub(crate) struct CountingTicker {
    pub(crate) armed: Rc<Cell<usize>>,
    pub(crate) live: Rc<Cell<usize>>,
    pub(crate) last_period: Rc<Cell<Option<Duration>>>,
}

struct LiveTimer(Rc<Cell<usize>>);

impl Drop for LiveTimer {
    fn drop(&mut self) {
        self.0.set(self.0.get() - 1);
    }
}

impl Ticker for CountingTicker {
    fn every(&self, period: Duration, on_tick: Rc<dyn Fn()>) -> TimerGuard {
        let _ = on_tick;
        self.armed.set(self.armed.get() + 1);
        self.live.set(self.live.get() + 1);
        self.last_period.set(Some(period));
        TimerGuard::new(LiveTimer(Rc::clone(&self.live)))
    }
}

/// Auth provider with a scripted current user that counts sign-outs.
#[derive(Default)]
pub(crate) struct FakeAuth {
    pub(crate) user: RefCell<Option<AuthUser>>,
    pub(crate) sign_outs: Cell<usize>,
    pub(crate) fail_sign_out: Cell<bool>,
}

impl FakeAuth {
    pub(crate) fn with_user(user: AuthUser) -> Self {
        Self { user: RefCell::new(Some(user)), ..Self::default() }
    }
}

#[async_trait(?Send)]
impl AuthProvider for FakeAuth {
    async fn current_user(&self) -> Option<AuthUser> {
        self.user.borrow().clone()
    }

    async fn sign_out(&self) -> ApiResult<()> {
        self.sign_outs.set(self.sign_outs.get() + 1);
        if self.fail_sign_out.get() {
            return Err(ApiError::Network("offline".to_owned()));
        }
        self.user.borrow_mut().take();
        Ok(())
    }
}

/// Records UI hook invocations as `in:<email>` / `out`.
#[derive(Clone, Default)]
pub(crate) struct HookLog {
    pub(crate) calls: Rc<RefCell<Vec<String>>>,
}

impl HookLog {
    pub(crate) fn hooks(&self) -> UiHooks {
        let on_in = Rc::clone(&self.calls);
        let on_out = Rc::clone(&self.calls);
        UiHooks::new(
            move |user: &AuthUser| on_in.borrow_mut().push(format!("in:{}", user.display_name())),
            move || on_out.borrow_mut().push("out".to_owned()),
        )
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub(crate) fn last(&self) -> Option<String> {
        self.calls.borrow().last().cloned()
    }
}

pub(crate) fn user(email: &str) -> AuthUser {
    AuthUser {
        id: format!("id-{email}"),
        email: Some(email.to_owned()),
        email_confirmed_at: None,
        created_at: None,
    }
}

pub(crate) fn session_for(user: AuthUser) -> AuthSession {
    AuthSession {
        access_token: "access".to_owned(),
        refresh_token: "refresh".to_owned(),
        token_type: "bearer".to_owned(),
        expires_in: 3600,
        expires_at: None,
        user,
    }
}
