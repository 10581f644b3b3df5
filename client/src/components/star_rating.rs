//! Five-star rating input and read-only star display.

use leptos::prelude::*;

use crate::net::types::MAX_RATING;
use crate::util::format::stars;

/// Clickable row of stars bound to a rating signal. `0` means unrated.
#[component]
pub fn StarRating(
    label: &'static str,
    #[prop(into)] value: Signal<u8>,
    on_change: Callback<u8>,
) -> impl IntoView {
    view! {
        <div class="rating-row">
            <span class="rating-row__label">{label}</span>
            <div class="stars" role="radiogroup" aria-label=label>
                {(1..=MAX_RATING)
                    .map(|n| {
                        view! {
                            <button
                                type="button"
                                class="star"
                                class:active=move || n <= value.get()
                                aria-label=format!("{n} of {MAX_RATING}")
                                on:click=move |_| on_change.run(n)
                            >
                                "★"
                            </button>
                        }
                    })
                    .collect_view()}
            </div>
        </div>
    }
}

/// `label: ★★★☆☆` as plain text.
#[component]
pub fn StarDisplay(label: &'static str, rating: u8) -> impl IntoView {
    view! {
        <span class="star-display">
            {label}": "<span class="star-display__stars">{stars(rating)}</span>
        </span>
    }
}
