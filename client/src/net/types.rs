//! Wire DTOs for the auth (GoTrue) and review (PostgREST) endpoints.
//!
//! DESIGN
//! ======
//! Field names mirror the backend JSON so serde handles both directions
//! without custom glue; only ids get a lenient deserializer because the
//! `comments.id` column may be numeric or a UUID depending on the schema.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

/// Highest value on every star rating.
pub const MAX_RATING: u8 = 5;

/// An authenticated user as returned by `/auth/v1/user`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    /// Unique user identifier (UUID string).
    pub id: String,
    /// Sign-in email, when the account has one.
    #[serde(default)]
    pub email: Option<String>,
    /// Set once the email address has been confirmed.
    #[serde(default)]
    pub email_confirmed_at: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl AuthUser {
    /// Name shown in the page header.
    pub fn display_name(&self) -> &str {
        self.email.as_deref().unwrap_or(&self.id)
    }
}

/// A password-grant or refresh-grant token response, persisted as-is.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    /// Access-token lifetime in seconds.
    pub expires_in: i64,
    /// Access-token expiry in seconds since the Unix epoch.
    #[serde(default)]
    pub expires_at: Option<i64>,
    pub user: AuthUser,
}

fn default_token_type() -> String {
    "bearer".to_owned()
}

impl AuthSession {
    /// Fill in `expires_at` from `expires_in` when the backend omitted it.
    #[must_use]
    pub fn with_expiry_from(mut self, now_unix: i64) -> Self {
        if self.expires_at.is_none() {
            self.expires_at = Some(now_unix + self.expires_in);
        }
        self
    }

    /// Whether the access token expires within `margin_secs` of `now_unix`.
    pub fn expires_within(&self, now_unix: i64, margin_secs: i64) -> bool {
        self.expires_at.is_some_and(|at| at - now_unix <= margin_secs)
    }
}

/// Auth state transitions pushed to subscribers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthEvent {
    SignedIn,
    SignedOut,
    TokenRefreshed,
    UserUpdated,
}

/// One auth notification: the event plus the session it concerns, if any.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthChange {
    pub event: AuthEvent,
    pub session: Option<AuthSession>,
}

impl AuthChange {
    pub fn signed_in(session: AuthSession) -> Self {
        Self { event: AuthEvent::SignedIn, session: Some(session) }
    }

    pub fn signed_out() -> Self {
        Self { event: AuthEvent::SignedOut, session: None }
    }

    pub fn user(&self) -> Option<&AuthUser> {
        self.session.as_ref().map(|s| &s.user)
    }
}

/// What happened after a sign-up request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SignUpOutcome {
    /// The project auto-confirms accounts; the user is now signed in.
    SignedIn(AuthSession),
    /// A confirmation email was sent; sign-in completes after the link is followed.
    ConfirmationSent(AuthUser),
}

/// A stored subject review (`comments` row).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub subject: String,
    pub difficulty: u8,
    pub lecture_style: u8,
    pub engaging_level: u8,
    pub reason: String,
    /// Author, when the row was written by a signed-in client.
    #[serde(default)]
    pub user_id: Option<String>,
    /// RFC 3339 creation timestamp assigned by the database.
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Editable fields of a review, used for both create and update.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewDraft {
    pub subject: String,
    pub difficulty: u8,
    pub lecture_style: u8,
    pub engaging_level: u8,
    pub reason: String,
}

impl ReviewDraft {
    /// Check the draft before it is sent.
    ///
    /// # Errors
    ///
    /// Returns the message to show next to the form.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.subject.trim().is_empty() {
            return Err("Please select a subject.");
        }
        let ratings = [self.difficulty, self.lecture_style, self.engaging_level];
        if ratings.iter().any(|r| !(1..=MAX_RATING).contains(r)) {
            return Err("Please rate all three categories.");
        }
        if self.reason.trim().is_empty() {
            return Err("Please write a reason.");
        }
        Ok(())
    }

    /// Copy with surrounding whitespace removed from the text fields.
    #[must_use]
    pub fn trimmed(&self) -> Self {
        Self {
            subject: self.subject.trim().to_owned(),
            reason: self.reason.trim().to_owned(),
            ..self.clone()
        }
    }
}

impl From<&Review> for ReviewDraft {
    fn from(review: &Review) -> Self {
        Self {
            subject: review.subject.clone(),
            difficulty: review.difficulty,
            lecture_style: review.lecture_style,
            engaging_level: review.engaging_level,
            reason: review.reason.clone(),
        }
    }
}

/// Insert payload: the draft plus the author attached client-side.
#[derive(Debug, Serialize)]
pub struct NewReview<'a> {
    #[serde(flatten)]
    pub draft: &'a ReviewDraft,
    pub user_id: &'a str,
}

fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    match value {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(D::Error::custom(format!("expected string or number id, got {other}"))),
    }
}
