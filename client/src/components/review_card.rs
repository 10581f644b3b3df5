//! Card rendering one stored review.
//!
//! Edit and delete buttons only appear when the owning page passes the
//! matching callbacks, so the public list reuses the card read-only.

use leptos::prelude::*;

use super::star_rating::StarDisplay;
use crate::net::types::Review;
use crate::util::format::review_date;

#[component]
pub fn ReviewCard(
    review: Review,
    #[prop(optional)] on_edit: Option<Callback<String>>,
    #[prop(optional)] on_delete: Option<Callback<String>>,
) -> impl IntoView {
    let date = review.created_at.as_deref().map(review_date).unwrap_or_default();
    let edit_id = review.id.clone();
    let delete_id = review.id.clone();

    view! {
        <div class="comment-item">
            <div class="comment-header">
                <strong>{review.subject.clone()}</strong>
                <span class="comment-date">{date}</span>
            </div>
            <div class="comment-ratings">
                <StarDisplay label="Difficulty" rating=review.difficulty/>
                <StarDisplay label="Lecture Style" rating=review.lecture_style/>
                <StarDisplay label="Engaging" rating=review.engaging_level/>
            </div>
            <div class="comment-reason">{review.reason.clone()}</div>
            {(on_edit.is_some() || on_delete.is_some())
                .then(|| {
                    view! {
                        <div class="comment-actions">
                            {on_edit
                                .map(|cb| {
                                    let id = edit_id.clone();
                                    view! {
                                        <button class="edit-btn" on:click=move |_| cb.run(id.clone())>
                                            "Edit"
                                        </button>
                                    }
                                })}
                            {on_delete
                                .map(|cb| {
                                    let id = delete_id.clone();
                                    view! {
                                        <button class="delete-btn" on:click=move |_| cb.run(id.clone())>
                                            "Delete"
                                        </button>
                                    }
                                })}
                        </div>
                    }
                })}
        </div>
    }
}
