//! Auth state for the current browser user.
//!
//! SYSTEM CONTEXT
//! ==============
//! Written only by the session UI hooks, read by the header login link and
//! the pages that need a signed-in user. `loading` stays `true` until the
//! page-load session check has settled.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use crate::net::types::AuthUser;

/// Current user and whether the page-load check is still pending.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthState {
    pub user: Option<AuthUser>,
    pub loading: bool,
}

impl Default for AuthState {
    fn default() -> Self {
        Self { user: None, loading: true }
    }
}

/// Label and target of the header login link.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoginLink {
    pub label: String,
    pub href: &'static str,
}

impl AuthState {
    pub fn signed_in(user: AuthUser) -> Self {
        Self { user: Some(user), loading: false }
    }

    pub fn signed_out() -> Self {
        Self { user: None, loading: false }
    }

    pub fn is_signed_in(&self) -> bool {
        self.user.is_some()
    }

    pub fn login_link(&self) -> LoginLink {
        match &self.user {
            Some(user) => LoginLink { label: format!("Welcome, {}", user.display_name()), href: "/subjects" },
            None => LoginLink { label: "Login".to_owned(), href: "/login" },
        }
    }
}
