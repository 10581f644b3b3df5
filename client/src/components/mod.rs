//! Reusable UI components.
//!
//! SYSTEM CONTEXT
//! ==============
//! Components render review and header chrome while reading shared state
//! from Leptos context providers; pages own the data loading.

pub mod login_link;
pub mod menu_overlay;
pub mod review_card;
pub mod star_rating;
