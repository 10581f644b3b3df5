//! Page-lifetime session context.
//!
//! SYSTEM CONTEXT
//! ==============
//! One `SessionContext` is built by the root component and shared with the
//! auth subscription, the activity listeners and the periodic timer. It owns
//! the current-user handle, the activity tracker and the scheduler, and is
//! the only place those are mutated.
//!
//! TRADE-OFFS
//! ==========
//! Validity checks are "check-and-act": an expired session is signed out as a
//! side effect of being checked. The timer callback holds a weak reference so
//! an armed interval never keeps the context alive on its own.

#[cfg(test)]
#[path = "context_test.rs"]
mod context_test;

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use std::time::Duration;

use super::activity::ActivityTracker;
use super::scheduler::{Scheduler, SchedulerState, Ticker};
use super::sync::{self, SessionPhase, SyncEffect};
use super::{AuthProvider, UiHooks};
use crate::config::SessionSettings;
use crate::net::types::{AuthChange, AuthUser};

struct SessionInner {
    auth: Rc<dyn AuthProvider>,
    tracker: ActivityTracker,
    scheduler: RefCell<Scheduler>,
    phase: RefCell<SessionPhase>,
    /// Bumped on every applied transition.
    transitions: Cell<u64>,
    hooks: UiHooks,
    bootstrap_grace: Duration,
}

/// Shared handle to the page's session state.
#[derive(Clone)]
pub struct SessionContext {
    inner: Rc<SessionInner>,
}

impl SessionContext {
    pub fn new(
        auth: Rc<dyn AuthProvider>,
        tracker: ActivityTracker,
        ticker: Rc<dyn Ticker>,
        settings: &SessionSettings,
        hooks: UiHooks,
    ) -> Self {
        Self {
            inner: Rc::new(SessionInner {
                auth,
                tracker,
                scheduler: RefCell::new(Scheduler::new(ticker, settings.check_interval)),
                phase: RefCell::new(SessionPhase::SignedOut),
                transitions: Cell::new(0),
                hooks,
                bootstrap_grace: settings.bootstrap_grace,
            }),
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.inner.phase.borrow().clone()
    }

    pub fn current_user(&self) -> Option<AuthUser> {
        self.inner.phase.borrow().user().cloned()
    }

    pub fn scheduler_state(&self) -> SchedulerState {
        self.inner.scheduler.borrow().state()
    }

    pub fn tracker(&self) -> &ActivityTracker {
        &self.inner.tracker
    }

    /// Stamp user interaction, whatever the current phase.
    pub fn record_activity(&self) {
        self.inner.tracker.record_activity();
    }

    /// Returns `false` after forcing a sign-out when a signed-in user has been
    /// inactive for the whole activity window.
    pub async fn check_session_validity(&self) -> bool {
        let user = self.inner.auth.current_user().await;
        if user.is_some() && self.inner.tracker.is_expired() {
            log::info!(
                "session expired after {} days of inactivity; signing out",
                self.inner.tracker.window().whole_days()
            );
            if let Err(e) = self.inner.auth.sign_out().await {
                log::warn!("forced sign-out failed: {e}");
            }
            return false;
        }
        true
    }

    /// Apply one auth notification.
    pub fn handle_auth_change(&self, change: &AuthChange) {
        let (next, effects) = sync::transition(&self.phase(), change);
        self.apply(next, effects);
    }

    /// One scheduler tick. Returns whether the session is still valid.
    pub async fn tick(&self) -> bool {
        let seen = self.inner.transitions.get();
        let valid = self.check_session_validity().await;
        if !valid {
            self.settle_signed_out(seen);
        }
        valid
    }

    /// Page-load check without the grace delay.
    pub async fn restore(&self) -> bool {
        let seen = self.inner.transitions.get();
        if !self.check_session_validity().await {
            self.settle_signed_out(seen);
            return false;
        }
        match self.inner.auth.current_user().await {
            Some(user) => {
                let (next, effects) = sync::restored(user);
                self.apply(next, effects);
            }
            None => self.handle_auth_change(&AuthChange::signed_out()),
        }
        true
    }

    /// Page-load bootstrap: wait for the auth client to rehydrate, then restore.
    pub async fn bootstrap(&self) -> bool {
        #[cfg(feature = "hydrate")]
        gloo_timers::future::sleep(self.inner.bootstrap_grace).await;
        self.restore().await
    }

    pub fn bootstrap_grace(&self) -> Duration {
        self.inner.bootstrap_grace
    }

    /// Apply the signed-out transition after a forced expiry unless the auth
    /// client already delivered its own notification during the check.
    fn settle_signed_out(&self, seen: u64) {
        let notified = self.inner.transitions.get() != seen;
        if notified && matches!(*self.inner.phase.borrow(), SessionPhase::SignedOut) {
            return;
        }
        self.handle_auth_change(&AuthChange::signed_out());
    }

    fn apply(&self, next: SessionPhase, effects: Vec<SyncEffect>) {
        *self.inner.phase.borrow_mut() = next;
        self.inner.transitions.set(self.inner.transitions.get() + 1);
        for effect in effects {
            match effect {
                SyncEffect::RenderSignedIn(user) => self.inner.hooks.signed_in(&user),
                SyncEffect::RenderSignedOut => self.inner.hooks.signed_out(),
                SyncEffect::StartScheduler => self.start_scheduler(),
                SyncEffect::StopScheduler => self.stop_scheduler(),
            }
        }
    }

    fn start_scheduler(&self) {
        if self.inner.scheduler.borrow().is_running() {
            return;
        }
        self.inner.tracker.record_activity();
        let on_tick = tick_callback(Rc::downgrade(&self.inner));
        self.inner.scheduler.borrow_mut().start(on_tick);
        log::debug!("session check scheduler started");
    }

    fn stop_scheduler(&self) {
        if self.inner.scheduler.borrow_mut().stop() {
            log::debug!("session check scheduler stopped");
        }
    }
}

fn tick_callback(inner: Weak<SessionInner>) -> Rc<dyn Fn()> {
    Rc::new(move || {
        let Some(inner) = inner.upgrade() else {
            return;
        };
        let session = SessionContext { inner };
        #[cfg(feature = "hydrate")]
        leptos::task::spawn_local(async move {
            session.tick().await;
        });
        // Timers only fire in the browser build.
        #[cfg(not(feature = "hydrate"))]
        drop(session);
    })
}
