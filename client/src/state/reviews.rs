//! Review form and review-list state.
//!
//! DESIGN
//! ======
//! The form holds raw UI values. `draft()` is the only way out of it, so
//! validation in `ReviewDraft` always sees what was actually on screen.

#[cfg(test)]
#[path = "reviews_test.rs"]
mod reviews_test;

use crate::net::error::ApiResult;
use crate::net::types::{MAX_RATING, Review, ReviewDraft};

/// Subjects offered in the selector and the home menu, grouped by grade.
pub const SUBJECT_GROUPS: &[(&str, &[&str])] = &[
    ("Grade 10", &["Korean", "English", "Mathematics", "Integrated Science", "Integrated Social Studies"]),
    ("Grade 11", &["Literature", "Algebra", "Physics", "Chemistry", "Biology", "World History"]),
    ("Grade 12", &["Reading and Writing", "Calculus", "Statistics", "Earth Science", "Economics", "Ethics"]),
];

/// Every subject in catalog order.
pub fn all_subjects() -> impl Iterator<Item = &'static str> {
    SUBJECT_GROUPS.iter().flat_map(|(_, subjects)| subjects.iter().copied())
}

/// The three rated categories of a review.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RatingField {
    Difficulty,
    LectureStyle,
    EngagingLevel,
}

impl RatingField {
    pub const ALL: [Self; 3] = [Self::Difficulty, Self::LectureStyle, Self::EngagingLevel];

    pub fn label(self) -> &'static str {
        match self {
            Self::Difficulty => "Difficulty",
            Self::LectureStyle => "Lecture Style",
            Self::EngagingLevel => "Engaging",
        }
    }
}

/// Create-or-edit review form.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReviewForm {
    pub subject: String,
    pub difficulty: u8,
    pub lecture_style: u8,
    pub engaging_level: u8,
    pub reason: String,
    /// Id of the review being edited, `None` when creating.
    pub editing: Option<String>,
}

impl ReviewForm {
    pub fn rating(&self, field: RatingField) -> u8 {
        match field {
            RatingField::Difficulty => self.difficulty,
            RatingField::LectureStyle => self.lecture_style,
            RatingField::EngagingLevel => self.engaging_level,
        }
    }

    /// Set a rating, clamped to `0..=MAX_RATING` (0 means unrated).
    pub fn set_rating(&mut self, field: RatingField, value: u8) {
        let value = value.min(MAX_RATING);
        match field {
            RatingField::Difficulty => self.difficulty = value,
            RatingField::LectureStyle => self.lecture_style = value,
            RatingField::EngagingLevel => self.engaging_level = value,
        }
    }

    /// Prefill from an existing review and switch to update mode.
    pub fn start_edit(&mut self, review: &Review) {
        *self = Self {
            subject: review.subject.clone(),
            difficulty: review.difficulty,
            lecture_style: review.lecture_style,
            engaging_level: review.engaging_level,
            reason: review.reason.clone(),
            editing: Some(review.id.clone()),
        };
    }

    /// Clear everything except the selected subject.
    pub fn reset(&mut self) {
        *self = Self { subject: std::mem::take(&mut self.subject), ..Self::default() };
    }

    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    pub fn submit_label(&self) -> &'static str {
        if self.is_editing() { "Update Review" } else { "Submit Review" }
    }

    pub fn draft(&self) -> ReviewDraft {
        ReviewDraft {
            subject: self.subject.clone(),
            difficulty: self.difficulty,
            lecture_style: self.lecture_style,
            engaging_level: self.engaging_level,
            reason: self.reason.clone(),
        }
    }
}

/// A fetched review list with its load status.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReviewList {
    pub reviews: Vec<Review>,
    pub loading: bool,
    pub error: Option<String>,
}

impl ReviewList {
    pub fn loading() -> Self {
        Self { loading: true, ..Self::default() }
    }

    /// Settle a load. Failures are logged and surfaced as the user message.
    pub fn settled(result: ApiResult<Vec<Review>>) -> Self {
        match result {
            Ok(reviews) => Self { reviews, loading: false, error: None },
            Err(e) => {
                log::error!("failed to load reviews: {e}");
                Self { reviews: Vec::new(), loading: false, error: Some(e.user_message()) }
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.reviews.is_empty()
    }

    pub fn find(&self, id: &str) -> Option<&Review> {
        self.reviews.iter().find(|r| r.id == id)
    }
}
