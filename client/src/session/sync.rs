//! Auth-state synchronization as a pure transition function.
//!
//! `transition` maps the current phase plus one auth notification to the next
//! phase and the effects the session context must carry out. Keeping it free
//! of I/O lets every notification sequence be tested directly.

#[cfg(test)]
#[path = "sync_test.rs"]
mod sync_test;

use crate::net::types::{AuthChange, AuthEvent, AuthUser};

/// Whether the page currently believes a user is signed in.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum SessionPhase {
    #[default]
    SignedOut,
    SignedIn(AuthUser),
}

impl SessionPhase {
    pub fn user(&self) -> Option<&AuthUser> {
        match self {
            Self::SignedIn(user) => Some(user),
            Self::SignedOut => None,
        }
    }
}

/// Side effects requested by a transition, applied in order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SyncEffect {
    RenderSignedIn(AuthUser),
    RenderSignedOut,
    StartScheduler,
    StopScheduler,
}

/// Transition for a user found already signed in when the page loads.
pub fn restored(user: AuthUser) -> (SessionPhase, Vec<SyncEffect>) {
    (
        SessionPhase::SignedIn(user.clone()),
        vec![SyncEffect::RenderSignedIn(user), SyncEffect::StartScheduler],
    )
}

/// Compute the next phase and effects for one auth notification.
pub fn transition(current: &SessionPhase, change: &AuthChange) -> (SessionPhase, Vec<SyncEffect>) {
    match (change.event, change.user()) {
        (AuthEvent::SignedIn, Some(user)) => restored(user.clone()),
        (AuthEvent::SignedOut, _) => (
            SessionPhase::SignedOut,
            vec![SyncEffect::RenderSignedOut, SyncEffect::StopScheduler],
        ),
        (AuthEvent::UserUpdated, Some(user)) if matches!(current, SessionPhase::SignedIn(_)) => (
            SessionPhase::SignedIn(user.clone()),
            vec![SyncEffect::RenderSignedIn(user.clone())],
        ),
        // Sign-in without a payload, token refreshes, and updates while signed
        // out leave the page as it is.
        _ => (current.clone(), Vec::new()),
    }
}
