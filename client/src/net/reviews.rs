//! Review store backed by the PostgREST `comments` table.
//!
//! SYSTEM CONTEXT
//! ==============
//! Pages call this for every review read and write. Requests carry the
//! signed-in user's access token when there is one so row-level security
//! sees the real caller, and the anon key otherwise.
//!
//! ERROR HANDLING
//! ==============
//! Drafts are validated before any request and fail with
//! `ApiError::Invalid`. `create` and `get_my_reviews` need a signed-in user
//! and fail with `ApiError::not_authenticated()` without one.

#[cfg(test)]
#[path = "reviews_test.rs"]
mod reviews_test;

use std::rc::Rc;

use super::auth::AuthClient;
use super::error::{ApiError, ApiResult};
use super::http::{self, BrowserTransport, Endpoint, Method, RawResponse, RestRequest, Transport};
use super::types::{NewReview, Review, ReviewDraft};
use crate::config::BackendConfig;

const COMMENTS_PATH: &str = "/rest/v1/comments";

/// Optional narrowing of the public review list.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReviewFilter {
    pub subject: Option<String>,
}

impl ReviewFilter {
    pub fn subject(subject: &str) -> Self {
        let subject = subject.trim();
        Self { subject: (!subject.is_empty()).then(|| subject.to_owned()) }
    }
}

/// CRUD access to reviews.
#[derive(Clone)]
pub struct ReviewStore {
    config: BackendConfig,
    transport: Rc<dyn Transport>,
    auth: AuthClient,
}

impl ReviewStore {
    pub fn new(config: BackendConfig, transport: Rc<dyn Transport>, auth: AuthClient) -> Self {
        Self { config, transport, auth }
    }

    pub fn browser(auth: AuthClient) -> Self {
        Self::new(auth.config().clone(), Rc::new(BrowserTransport), auth)
    }

    /// Insert a review authored by the signed-in user and return the stored row.
    ///
    /// # Errors
    ///
    /// `ApiError::Invalid` for a bad draft, `ApiError::Auth` when signed out,
    /// and backend errors otherwise.
    pub async fn create(&self, draft: &ReviewDraft) -> ApiResult<Review> {
        let draft = validated(draft)?;
        let user = self.auth.current_user().await.ok_or_else(ApiError::not_authenticated)?;
        let token = self.auth.access_token().await;
        let request = create_request(&self.config, &draft, &user.id)?;
        let resp = self.execute(with_token(request, token.as_deref())).await?;
        let row = first_row(&resp)?.ok_or_else(|| ApiError::Decode("insert returned no row".to_owned()))?;
        log::info!("review {} created for {}", row.id, row.subject);
        Ok(row)
    }

    /// Every review visible to the caller, newest first.
    ///
    /// # Errors
    ///
    /// Returns backend errors.
    pub async fn get_all(&self) -> ApiResult<Vec<Review>> {
        self.get_all_public(&ReviewFilter::default()).await
    }

    /// Public review list, optionally limited to one subject.
    ///
    /// # Errors
    ///
    /// Returns backend errors.
    pub async fn get_all_public(&self, filter: &ReviewFilter) -> ApiResult<Vec<Review>> {
        let token = self.auth.access_token().await;
        let resp = self.execute(with_token(list_request(&self.config, filter), token.as_deref())).await?;
        let rows: Vec<Review> = http::decode_json(Endpoint::Data, &resp)?;
        log::debug!("fetched {} reviews (filter: {:?})", rows.len(), filter.subject);
        Ok(rows)
    }

    /// Reviews written by the signed-in user, newest first.
    ///
    /// # Errors
    ///
    /// `ApiError::Auth` when signed out, backend errors otherwise.
    pub async fn get_my_reviews(&self) -> ApiResult<Vec<Review>> {
        let user = self.auth.current_user().await.ok_or_else(ApiError::not_authenticated)?;
        let token = self.auth.access_token().await;
        let resp = self.execute(with_token(my_reviews_request(&self.config, &user.id), token.as_deref())).await?;
        http::decode_json(Endpoint::Data, &resp)
    }

    /// Replace the editable fields of review `id`.
    ///
    /// # Errors
    ///
    /// `ApiError::Invalid` for a bad draft, `ApiError::Backend` with status
    /// 404 when no visible row matched.
    pub async fn update(&self, id: &str, draft: &ReviewDraft) -> ApiResult<Review> {
        let draft = validated(draft)?;
        let token = self.auth.access_token().await;
        let request = update_request(&self.config, id, &draft)?;
        let resp = self.execute(with_token(request, token.as_deref())).await?;
        first_row(&resp)?.ok_or_else(|| ApiError::Backend { status: 404, message: format!("review {id} not found") })
    }

    /// Delete review `id`.
    ///
    /// # Errors
    ///
    /// Returns backend errors.
    pub async fn delete(&self, id: &str) -> ApiResult<()> {
        let token = self.auth.access_token().await;
        let resp = self.execute(with_token(delete_request(&self.config, id), token.as_deref())).await?;
        http::ensure_success(Endpoint::Data, &resp)?;
        log::info!("review {id} deleted");
        Ok(())
    }

    /// Cheap reachability probe against the table.
    pub async fn test_connection(&self) -> bool {
        match self.execute(probe_request(&self.config)).await {
            Ok(resp) if resp.is_success() => {
                log::info!("backend connection ok");
                true
            }
            Ok(resp) => {
                log::error!("backend connection failed: {}", http::error_from_response(Endpoint::Data, &resp));
                false
            }
            Err(e) => {
                log::error!("backend connection failed: {e}");
                false
            }
        }
    }

    async fn execute(&self, request: RestRequest) -> ApiResult<RawResponse> {
        self.transport.execute(request).await
    }
}

fn validated(draft: &ReviewDraft) -> ApiResult<ReviewDraft> {
    let draft = draft.trimmed();
    draft.validate().map_err(|message| ApiError::Invalid(message.to_owned()))?;
    Ok(draft)
}

fn with_token(request: RestRequest, token: Option<&str>) -> RestRequest {
    match token {
        Some(token) => request.bearer(token),
        None => request,
    }
}

fn first_row(resp: &RawResponse) -> ApiResult<Option<Review>> {
    let rows: Vec<Review> = http::decode_json(Endpoint::Data, resp)?;
    Ok(rows.into_iter().next())
}

fn to_json<T: serde::Serialize>(value: &T) -> ApiResult<serde_json::Value> {
    serde_json::to_value(value).map_err(|e| ApiError::Decode(e.to_string()))
}

// =============================================================================
// REQUESTS
// =============================================================================

/// # Errors
///
/// Fails only if the draft cannot be serialized.
pub fn create_request(config: &BackendConfig, draft: &ReviewDraft, user_id: &str) -> ApiResult<RestRequest> {
    let row = to_json(&NewReview { draft, user_id })?;
    Ok(RestRequest::new(Method::Post, config, COMMENTS_PATH)
        .query("select", "*")
        .return_representation()
        .json(serde_json::Value::Array(vec![row])))
}

pub fn list_request(config: &BackendConfig, filter: &ReviewFilter) -> RestRequest {
    let request = RestRequest::new(Method::Get, config, COMMENTS_PATH)
        .query("select", "*")
        .query("order", "created_at.desc");
    match &filter.subject {
        Some(subject) => request.query("subject", format!("eq.{subject}")),
        None => request,
    }
}

pub fn my_reviews_request(config: &BackendConfig, user_id: &str) -> RestRequest {
    RestRequest::new(Method::Get, config, COMMENTS_PATH)
        .query("select", "*")
        .query("user_id", format!("eq.{user_id}"))
        .query("order", "created_at.desc")
}

/// # Errors
///
/// Fails only if the draft cannot be serialized.
pub fn update_request(config: &BackendConfig, id: &str, draft: &ReviewDraft) -> ApiResult<RestRequest> {
    Ok(RestRequest::new(Method::Patch, config, COMMENTS_PATH)
        .query("id", format!("eq.{id}"))
        .query("select", "*")
        .return_representation()
        .json(to_json(draft)?))
}

pub fn delete_request(config: &BackendConfig, id: &str) -> RestRequest {
    RestRequest::new(Method::Delete, config, COMMENTS_PATH).query("id", format!("eq.{id}"))
}

pub fn probe_request(config: &BackendConfig) -> RestRequest {
    RestRequest::new(Method::Get, config, COMMENTS_PATH).query("select", "count").query("limit", "1")
}
