//! Page-lifetime service bundle.
//!
//! SYSTEM CONTEXT
//! ==============
//! The root component builds one `Services` in the browser and provides it
//! through Leptos context. Construction subscribes the session context to the
//! auth client, so every sign-in or sign-out drives the scheduler and the UI
//! hooks no matter which page triggered it.
//!
//! The bundle is `!Send` (it holds `Rc`s), so it is stored with
//! `StoredValue::new_local` and only exists in the hydrated build. During SSR
//! `use_services().get()` returns `None` and pages render their signed-out shell.

#[cfg(test)]
#[path = "services_test.rs"]
mod services_test;

use std::rc::Rc;

use leptos::prelude::*;

use crate::config::{BackendConfig, SessionSettings};
use crate::net::auth::{AuthClient, AuthSubscription};
use crate::net::reviews::ReviewStore;
use crate::session::{ActivityTracker, IntervalTicker, SessionContext, UiHooks};
use crate::util::clock::SystemClock;
use crate::util::storage::BrowserStorage;

/// Context handle for [`Services`].
pub type ServicesHandle = StoredValue<Services, LocalStorage>;

/// Backend clients plus the session context, wired together.
#[derive(Clone)]
pub struct Services {
    pub auth: AuthClient,
    pub reviews: ReviewStore,
    pub session: SessionContext,
    _subscription: Rc<AuthSubscription>,
}

impl Services {
    pub fn new(auth: AuthClient, reviews: ReviewStore, session: SessionContext) -> Self {
        let listener = session.clone();
        let subscription = auth.on_auth_state_change(move |change| listener.handle_auth_change(change));
        Self { auth, reviews, session, _subscription: Rc::new(subscription) }
    }

    /// Production wiring: `localStorage`, `fetch`, the wall clock and a
    /// `gloo-timers` interval.
    pub fn browser(config: BackendConfig, hooks: UiHooks) -> Self {
        let settings = SessionSettings::default();
        let auth = AuthClient::browser(config);
        let reviews = ReviewStore::browser(auth.clone());
        let tracker = ActivityTracker::new(Rc::new(BrowserStorage), Rc::new(SystemClock), settings.activity_window);
        let session = SessionContext::new(Rc::new(auth.clone()), tracker, Rc::new(IntervalTicker), &settings, hooks);
        Self::new(auth, reviews, session)
    }
}

/// `Copy + Send` reference to the provided services, safe to capture in
/// callbacks and memos.
#[derive(Clone, Copy)]
pub struct ServicesRef(Option<ServicesHandle>);

impl ServicesRef {
    /// The services, or `None` during SSR or after the root was disposed.
    pub fn get(self) -> Option<Services> {
        self.0.and_then(|handle| handle.try_get_value())
    }
}

pub fn use_services() -> ServicesRef {
    ServicesRef(use_context::<ServicesHandle>())
}
