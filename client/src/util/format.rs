//! Display formatting for review cards.

#[cfg(test)]
#[path = "format_test.rs"]
mod format_test;

use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;

use crate::net::types::MAX_RATING;

/// Render a rating as filled and empty stars, e.g. `★★★☆☆`.
pub fn stars(rating: u8) -> String {
    let filled = usize::from(rating.min(MAX_RATING));
    let empty = usize::from(MAX_RATING) - filled;
    format!("{}{}", "★".repeat(filled), "☆".repeat(empty))
}

/// Render a database timestamp as `YYYY-MM-DD`; unparseable input is shown as-is.
pub fn review_date(raw: &str) -> String {
    OffsetDateTime::parse(raw, &Rfc3339)
        .ok()
        .and_then(|ts| ts.format(format_description!("[year]-[month]-[day]")).ok())
        .unwrap_or_else(|| raw.to_owned())
}

/// Link to the public review list filtered to `subject`.
pub fn subject_href(subject: &str) -> String {
    let subject = subject.trim();
    if subject.is_empty() {
        return "/reviews".to_owned();
    }
    format!("/reviews?subject={}", utf8_percent_encode(subject, NON_ALPHANUMERIC))
}
