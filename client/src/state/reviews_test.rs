use super::*;
use crate::net::error::ApiError;

fn review() -> Review {
    Review {
        id: "7".to_owned(),
        subject: "Physics".to_owned(),
        difficulty: 4,
        lecture_style: 2,
        engaging_level: 5,
        reason: "Great labs.".to_owned(),
        user_id: Some("u1".to_owned()),
        created_at: None,
    }
}

#[test]
fn catalog_has_unique_subjects() {
    let mut subjects: Vec<_> = all_subjects().collect();
    let total = subjects.len();
    subjects.sort_unstable();
    subjects.dedup();
    assert_eq!(subjects.len(), total);
    assert!(subjects.contains(&"Physics"));
}

#[test]
fn ratings_clamp_to_max() {
    let mut form = ReviewForm::default();
    form.set_rating(RatingField::Difficulty, 9);
    form.set_rating(RatingField::EngagingLevel, 2);
    assert_eq!(form.rating(RatingField::Difficulty), MAX_RATING);
    assert_eq!(form.rating(RatingField::EngagingLevel), 2);
    assert_eq!(form.rating(RatingField::LectureStyle), 0);
}

#[test]
fn edit_prefills_and_switches_label() {
    let mut form = ReviewForm::default();
    assert_eq!(form.submit_label(), "Submit Review");

    form.start_edit(&review());
    assert_eq!(form.editing.as_deref(), Some("7"));
    assert_eq!(form.submit_label(), "Update Review");
    assert_eq!(form.draft(), ReviewDraft::from(&review()));
}

#[test]
fn reset_keeps_subject_only() {
    let mut form = ReviewForm::default();
    form.start_edit(&review());
    form.reset();
    assert_eq!(form, ReviewForm { subject: "Physics".to_owned(), ..ReviewForm::default() });
}

#[test]
fn fresh_form_draft_fails_validation() {
    let form = ReviewForm { subject: "Physics".to_owned(), ..ReviewForm::default() };
    assert_eq!(form.draft().validate(), Err("Please rate all three categories."));
}

#[test]
fn settled_list_keeps_rows_or_user_message() {
    let ok = ReviewList::settled(Ok(vec![review()]));
    assert!(!ok.loading);
    assert_eq!(ok.find("7").map(|r| r.subject.as_str()), Some("Physics"));

    let failed = ReviewList::settled(Err(ApiError::Network("offline".to_owned())));
    assert!(failed.is_empty());
    assert_eq!(failed.error.as_deref(), Some("Network error. Please try again."));
}
