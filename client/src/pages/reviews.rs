//! Public review list with an optional subject filter.
//!
//! SYSTEM CONTEXT
//! ==============
//! Readable signed in or out. The filter is mirrored in `?subject=` so the
//! home menu can deep-link into one subject.

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::{use_navigate, use_query_map};

use crate::components::login_link::LoginLink;
use crate::components::review_card::ReviewCard;
use crate::net::reviews::ReviewFilter;
use crate::services::use_services;
use crate::state::reviews::{ReviewList, all_subjects};
use crate::util::format::subject_href;

#[component]
pub fn ReviewsPage() -> impl IntoView {
    let services = use_services();
    let query = use_query_map();
    let filter = Memo::new(move |_| ReviewFilter::subject(&query.get().get("subject").unwrap_or_default()));
    let list = RwSignal::new(ReviewList::loading());

    Effect::new(move || {
        let filter = filter.get();
        let Some(svc) = services.get() else {
            return;
        };
        list.set(ReviewList::loading());
        #[cfg(feature = "hydrate")]
        leptos::task::spawn_local(async move {
            list.set(ReviewList::settled(svc.reviews.get_all_public(&filter).await));
        });
        #[cfg(not(feature = "hydrate"))]
        let _ = (svc, filter);
    });

    let navigate = use_navigate();
    let on_filter = move |ev: leptos::ev::Event| {
        let subject = event_target_value(&ev);
        navigate(&subject_href(&subject), NavigateOptions::default());
    };

    view! {
        <div class="reviews-page">
            <header class="site-header">
                <a class="site-title" href="/">"Subject Reviews"</a>
                <LoginLink/>
            </header>
            <main class="main-box">
                <h2>"All Reviews"</h2>
                <select class="dropdown-select" on:change=on_filter>
                    <option value="" selected=move || filter.get().subject.is_none()>"All subjects"</option>
                    {all_subjects()
                        .map(|subject| {
                            view! {
                                <option
                                    value=subject
                                    selected=move || filter.get().subject.as_deref() == Some(subject)
                                >
                                    {subject}
                                </option>
                            }
                        })
                        .collect_view()}
                </select>
                {move || {
                    let state = list.get();
                    if state.loading {
                        return view! { <p class="comments-status">"Loading reviews..."</p> }.into_any();
                    }
                    if let Some(error) = state.error {
                        return view! { <p class="comments-status comments-status--error">{error}</p> }.into_any();
                    }
                    if state.is_empty() {
                        return view! { <p class="comments-status">"No reviews yet."</p> }.into_any();
                    }
                    view! {
                        <div class="comments-list">
                            {state
                                .reviews
                                .into_iter()
                                .map(|review| view! { <ReviewCard review=review/> })
                                .collect_view()}
                        </div>
                    }
                        .into_any()
                }}
            </main>
        </div>
    }
}
