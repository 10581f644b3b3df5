//! Redirects from the old static-page URLs.
//!
//! Bookmarks and confirmation emails sent before the move still point at
//! `/templates/<page>.html`; each known page maps permanently to its route
//! and keeps the query string.

#[cfg(test)]
#[path = "legacy_test.rs"]
mod legacy_test;

use axum::extract::{Path, RawQuery};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};

/// New route for an old page file name.
pub fn target(page: &str) -> Option<&'static str> {
    match page {
        "index.html" => Some("/"),
        "login.html" => Some("/login"),
        "subjects.html" => Some("/subjects"),
        "reviews.html" => Some("/reviews"),
        _ => None,
    }
}

/// Full redirect location including the original query, if any.
pub fn location(page: &str, query: Option<&str>) -> Option<String> {
    let base = target(page)?;
    Some(match query.filter(|q| !q.is_empty()) {
        Some(q) => format!("{base}?{q}"),
        None => base.to_owned(),
    })
}

pub async fn redirect(Path(page): Path<String>, RawQuery(query): RawQuery) -> Response {
    match location(&page, query.as_deref()) {
        Some(to) => Redirect::permanent(&to).into_response(),
        None => {
            tracing::debug!(%page, "unknown legacy page");
            StatusCode::NOT_FOUND.into_response()
        }
    }
}
