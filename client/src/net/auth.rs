//! GoTrue auth client.
//!
//! SYSTEM CONTEXT
//! ==============
//! Owns the persisted auth session and is the single source of auth-state
//! notifications for the page. The session context subscribes to it and the
//! review store asks it for the current user and access token.
//!
//! DESIGN
//! ======
//! - The session is persisted as JSON under `sb-<ref>-auth-token`, so a
//!   reload rehydrates it without a network round trip.
//! - Access tokens are refreshed lazily: `session()` swaps in a fresh token
//!   when the stored one expires within `REFRESH_MARGIN_SECS`.
//! - Listeners are called synchronously in subscription order. The list is
//!   snapshotted before dispatch so a callback may subscribe or unsubscribe.
//!
//! ERROR HANDLING
//! ==============
//! Mutating calls return `ApiResult`. `current_user` and `session` log and
//! collapse failures to `None`, since callers only care about presence.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use async_trait::async_trait;
use percent_encoding::percent_decode_str;
use serde_json::json;

use super::error::{ApiError, ApiResult};
use super::http::{self, BrowserTransport, Endpoint, Method, RawResponse, RestRequest, Transport};
use super::types::{AuthChange, AuthEvent, AuthSession, AuthUser, SignUpOutcome};
use crate::config::BackendConfig;
use crate::session::AuthProvider;
use crate::util::clock::{Clock, SystemClock};
use crate::util::storage::{BrowserStorage, KeyValueStore};

/// Refresh the access token when it expires within this many seconds.
pub const REFRESH_MARGIN_SECS: i64 = 10;

type Listener = Rc<dyn Fn(&AuthChange)>;
type ListenerList = RefCell<Vec<(u64, Listener)>>;

struct AuthInner {
    config: BackendConfig,
    transport: Rc<dyn Transport>,
    store: Rc<dyn KeyValueStore>,
    clock: Rc<dyn Clock>,
    listeners: Rc<ListenerList>,
    next_listener: Cell<u64>,
}

/// Shared handle to the page's auth state.
#[derive(Clone)]
pub struct AuthClient {
    inner: Rc<AuthInner>,
}

/// Cancels an auth-state subscription when dropped.
#[must_use = "dropping the subscription cancels it"]
pub struct AuthSubscription {
    id: u64,
    listeners: Weak<ListenerList>,
}

impl AuthSubscription {
    /// Cancel explicitly; equivalent to dropping.
    pub fn unsubscribe(self) {}
}

impl Drop for AuthSubscription {
    fn drop(&mut self) {
        if let Some(listeners) = self.listeners.upgrade() {
            listeners.borrow_mut().retain(|(id, _)| *id != self.id);
        }
    }
}

impl AuthClient {
    pub fn new(
        config: BackendConfig,
        transport: Rc<dyn Transport>,
        store: Rc<dyn KeyValueStore>,
        clock: Rc<dyn Clock>,
    ) -> Self {
        Self {
            inner: Rc::new(AuthInner {
                config,
                transport,
                store,
                clock,
                listeners: Rc::new(RefCell::new(Vec::new())),
                next_listener: Cell::new(0),
            }),
        }
    }

    /// Client wired to `localStorage`, `fetch` and the wall clock.
    pub fn browser(config: BackendConfig) -> Self {
        Self::new(config, Rc::new(BrowserTransport), Rc::new(BrowserStorage), Rc::new(SystemClock))
    }

    pub fn config(&self) -> &BackendConfig {
        &self.inner.config
    }

    // =========================================================================
    // ACCOUNT OPERATIONS
    // =========================================================================

    /// Register a new account. `redirect_to` is where the confirmation link
    /// sends the user back to.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Auth` when the backend rejects the email or
    /// password, and transport errors otherwise.
    pub async fn sign_up(&self, email: &str, password: &str, redirect_to: Option<&str>) -> ApiResult<SignUpOutcome> {
        let resp = self.execute(sign_up_request(&self.inner.config, email, password, redirect_to)).await?;
        http::ensure_success(Endpoint::Auth, &resp)?;
        let outcome = parse_sign_up(&resp.body, self.now_unix())?;
        match &outcome {
            SignUpOutcome::SignedIn(session) => {
                self.persist(session);
                log::info!("signed up and signed in as {}", session.user.display_name());
                self.emit(&AuthChange::signed_in(session.clone()));
            }
            SignUpOutcome::ConfirmationSent(user) => {
                log::info!("confirmation email sent to {}", user.display_name());
            }
        }
        Ok(outcome)
    }

    /// Password sign-in.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Auth` for bad credentials or an unconfirmed
    /// account, and transport errors otherwise.
    pub async fn sign_in(&self, email: &str, password: &str) -> ApiResult<AuthSession> {
        let resp = self.execute(sign_in_request(&self.inner.config, email, password)).await?;
        let session = http::decode_json::<AuthSession>(Endpoint::Auth, &resp)?.with_expiry_from(self.now_unix());
        self.persist(&session);
        log::info!("signed in as {}", session.user.display_name());
        self.emit(&AuthChange::signed_in(session.clone()));
        Ok(session)
    }

    /// End the session. The local session is always cleared and `SignedOut`
    /// always emitted, even when the remote logout fails.
    ///
    /// # Errors
    ///
    /// Returns the remote logout failure, if any, after the local sign-out.
    pub async fn sign_out(&self) -> ApiResult<()> {
        let remote = match self.stored_session() {
            Some(session) => {
                let request = sign_out_request(&self.inner.config, &session.access_token);
                match self.execute(request).await {
                    Ok(resp) if logout_accepted(resp.status) => Ok(()),
                    Ok(resp) => Err(http::error_from_response(Endpoint::Auth, &resp)),
                    Err(e) => Err(e),
                }
            }
            None => Ok(()),
        };
        if let Err(e) = &remote {
            log::warn!("remote logout failed, clearing local session anyway: {e}");
        }
        self.clear_session();
        self.emit(&AuthChange::signed_out());
        remote
    }

    /// The signed-in user as the backend sees it, or `None`.
    pub async fn current_user(&self) -> Option<AuthUser> {
        let session = self.session().await?;
        match self.fetch_user(&session.access_token).await {
            Ok(user) => Some(user),
            Err(e) => {
                log::warn!("could not load current user: {e}");
                None
            }
        }
    }

    /// The persisted session with a usable access token, refreshing it first
    /// when it is about to expire.
    pub async fn session(&self) -> Option<AuthSession> {
        let session = self.stored_session()?;
        if !session.expires_within(self.now_unix(), REFRESH_MARGIN_SECS) {
            return Some(session);
        }
        match self.refresh(&session).await {
            Ok(fresh) => Some(fresh),
            Err(ApiError::Auth(message)) => {
                log::warn!("refresh token rejected, signing out locally: {message}");
                self.clear_session();
                self.emit(&AuthChange::signed_out());
                None
            }
            Err(e) => {
                log::warn!("token refresh failed: {e}");
                None
            }
        }
    }

    /// Bearer token for data requests, if signed in.
    pub async fn access_token(&self) -> Option<String> {
        self.session().await.map(|s| s.access_token)
    }

    /// Exchange the refresh token for a new session and emit `TokenRefreshed`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Auth` when the refresh token is no longer valid.
    pub async fn refresh(&self, session: &AuthSession) -> ApiResult<AuthSession> {
        let resp = self.execute(refresh_request(&self.inner.config, &session.refresh_token)).await?;
        let fresh = http::decode_json::<AuthSession>(Endpoint::Auth, &resp)?.with_expiry_from(self.now_unix());
        self.persist(&fresh);
        log::debug!("access token refreshed");
        self.emit(&AuthChange { event: AuthEvent::TokenRefreshed, session: Some(fresh.clone()) });
        Ok(fresh)
    }

    async fn fetch_user(&self, access_token: &str) -> ApiResult<AuthUser> {
        let resp = self.execute(user_request(&self.inner.config, access_token)).await?;
        http::decode_json(Endpoint::Auth, &resp)
    }

    // =========================================================================
    // SESSION-IN-URL
    // =========================================================================

    /// Adopt a session delivered in a confirmation-link fragment.
    /// Returns `Ok(None)` when the fragment carries no session.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Auth` when the delivered token is rejected.
    pub async fn adopt_session_fragment(&self, fragment: &str) -> ApiResult<Option<AuthUser>> {
        let Some(tokens) = parse_session_fragment(fragment) else {
            return Ok(None);
        };
        let user = self.fetch_user(&tokens.access_token).await?;
        let session = AuthSession {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            token_type: tokens.token_type,
            expires_in: tokens.expires_in,
            expires_at: tokens.expires_at,
            user: user.clone(),
        }
        .with_expiry_from(self.now_unix());
        self.persist(&session);
        log::info!("session restored from confirmation link for {}", user.display_name());
        self.emit(&AuthChange::signed_in(session));
        Ok(Some(user))
    }

    /// Check `location.hash` for a delivered session and strip it from the
    /// address bar once adopted.
    ///
    /// # Errors
    ///
    /// Propagates failures from [`AuthClient::adopt_session_fragment`].
    pub async fn recover_session_from_url(&self) -> ApiResult<Option<AuthUser>> {
        #[cfg(feature = "hydrate")]
        {
            let Some(window) = web_sys::window() else {
                return Ok(None);
            };
            let hash = window.location().hash().unwrap_or_default();
            let adopted = self.adopt_session_fragment(&hash).await?;
            if adopted.is_some() {
                let path = window.location().pathname().unwrap_or_else(|_| "/".to_owned());
                if let Ok(history) = window.history() {
                    let _ = history.replace_state_with_url(&wasm_bindgen::JsValue::NULL, "", Some(&path));
                }
            }
            Ok(adopted)
        }
        #[cfg(not(feature = "hydrate"))]
        {
            Ok(None)
        }
    }

    // =========================================================================
    // SUBSCRIPTIONS
    // =========================================================================

    /// Register `callback` for every later auth-state change.
    pub fn on_auth_state_change(&self, callback: impl Fn(&AuthChange) + 'static) -> AuthSubscription {
        let id = self.inner.next_listener.get();
        self.inner.next_listener.set(id + 1);
        self.inner.listeners.borrow_mut().push((id, Rc::new(callback)));
        AuthSubscription { id, listeners: Rc::downgrade(&self.inner.listeners) }
    }

    pub fn listener_count(&self) -> usize {
        self.inner.listeners.borrow().len()
    }

    pub(crate) fn emit(&self, change: &AuthChange) {
        let snapshot: Vec<Listener> = self.inner.listeners.borrow().iter().map(|(_, l)| Rc::clone(l)).collect();
        for listener in snapshot {
            listener(change);
        }
    }

    // =========================================================================
    // PERSISTENCE
    // =========================================================================

    /// The persisted session without any refresh or validation.
    pub fn stored_session(&self) -> Option<AuthSession> {
        let key = self.inner.config.session_storage_key();
        let raw = self.inner.store.get(&key)?;
        match serde_json::from_str(&raw) {
            Ok(session) => Some(session),
            Err(e) => {
                log::warn!("discarding unreadable stored session: {e}");
                self.inner.store.remove(&key);
                None
            }
        }
    }

    fn persist(&self, session: &AuthSession) {
        match serde_json::to_string(session) {
            Ok(raw) => self.inner.store.set(&self.inner.config.session_storage_key(), &raw),
            Err(e) => log::error!("could not serialize session: {e}"),
        }
    }

    fn clear_session(&self) {
        self.inner.store.remove(&self.inner.config.session_storage_key());
    }

    fn now_unix(&self) -> i64 {
        self.inner.clock.now().unix_timestamp()
    }

    async fn execute(&self, request: RestRequest) -> ApiResult<RawResponse> {
        self.inner.transport.execute(request).await
    }
}

#[async_trait(?Send)]
impl AuthProvider for AuthClient {
    async fn current_user(&self) -> Option<AuthUser> {
        AuthClient::current_user(self).await
    }

    async fn sign_out(&self) -> ApiResult<()> {
        AuthClient::sign_out(self).await
    }
}

// =============================================================================
// REQUESTS
// =============================================================================

pub fn sign_up_request(config: &BackendConfig, email: &str, password: &str, redirect_to: Option<&str>) -> RestRequest {
    let mut request = RestRequest::new(Method::Post, config, "/auth/v1/signup")
        .json(json!({ "email": email.trim(), "password": password }));
    if let Some(target) = redirect_to {
        request = request.query("redirect_to", target);
    }
    request
}

pub fn sign_in_request(config: &BackendConfig, email: &str, password: &str) -> RestRequest {
    RestRequest::new(Method::Post, config, "/auth/v1/token")
        .query("grant_type", "password")
        .json(json!({ "email": email.trim(), "password": password }))
}

pub fn refresh_request(config: &BackendConfig, refresh_token: &str) -> RestRequest {
    RestRequest::new(Method::Post, config, "/auth/v1/token")
        .query("grant_type", "refresh_token")
        .json(json!({ "refresh_token": refresh_token }))
}

pub fn sign_out_request(config: &BackendConfig, access_token: &str) -> RestRequest {
    RestRequest::new(Method::Post, config, "/auth/v1/logout").bearer(access_token)
}

pub fn user_request(config: &BackendConfig, access_token: &str) -> RestRequest {
    RestRequest::new(Method::Get, config, "/auth/v1/user").bearer(access_token)
}

/// Logout statuses meaning the session is gone either way.
pub fn logout_accepted(status: u16) -> bool {
    (200..300).contains(&status) || matches!(status, 401 | 403 | 404)
}

/// Sign-up answers with a full session when the project auto-confirms and
/// with the bare user when a confirmation email went out.
///
/// # Errors
///
/// Returns `ApiError::Decode` when the body is neither shape.
pub fn parse_sign_up(body: &str, now_unix: i64) -> ApiResult<SignUpOutcome> {
    if let Ok(session) = serde_json::from_str::<AuthSession>(body) {
        return Ok(SignUpOutcome::SignedIn(session.with_expiry_from(now_unix)));
    }
    serde_json::from_str::<AuthUser>(body)
        .map(SignUpOutcome::ConfirmationSent)
        .map_err(|e| ApiError::Decode(e.to_string()))
}

// =============================================================================
// URL FRAGMENT
// =============================================================================

/// Tokens carried in a confirmation-link fragment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FragmentTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub expires_at: Option<i64>,
}

/// Parse `#access_token=..&refresh_token=..&expires_in=..`, percent-decoding
/// each value. Returns `None` unless both tokens and a numeric `expires_in`
/// are present.
pub fn parse_session_fragment(fragment: &str) -> Option<FragmentTokens> {
    let fragment = fragment.strip_prefix('#').unwrap_or(fragment);
    let mut access_token = None;
    let mut refresh_token = None;
    let mut token_type = None;
    let mut expires_in = None;
    let mut expires_at = None;
    for pair in fragment.split('&') {
        let Some((key, raw)) = pair.split_once('=') else {
            continue;
        };
        let decoded = percent_decode_str(raw).decode_utf8_lossy();
        let value: &str = &decoded;
        match key {
            "access_token" => access_token = Some(value.to_owned()),
            "refresh_token" => refresh_token = Some(value.to_owned()),
            "token_type" => token_type = Some(value.to_owned()),
            "expires_in" => expires_in = value.parse().ok(),
            "expires_at" => expires_at = value.parse().ok(),
            _ => {}
        }
    }
    Some(FragmentTokens {
        access_token: access_token.filter(|t| !t.is_empty())?,
        refresh_token: refresh_token.filter(|t| !t.is_empty())?,
        token_type: token_type.unwrap_or_else(|| "bearer".to_owned()),
        expires_in: expires_in?,
        expires_at,
    })
}
