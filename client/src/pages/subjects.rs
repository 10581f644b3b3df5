//! Review authoring page: the create/edit form plus the user's own reviews.
//!
//! SYSTEM CONTEXT
//! ==============
//! Signed-in only; redirects to `/login` once the page-load session check
//! settles without a user. Every write reloads "Your Reviews" from the
//! backend instead of patching the list locally.

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;

use crate::components::login_link::LoginLink;
use crate::components::review_card::ReviewCard;
use crate::components::star_rating::StarRating;
use crate::services::{ServicesRef, use_services};
use crate::state::auth::AuthState;
use crate::state::reviews::{RatingField, ReviewForm, ReviewList, SUBJECT_GROUPS};
use crate::util::dom;

#[component]
pub fn SubjectsPage() -> impl IntoView {
    let services = use_services();
    let auth = expect_context::<RwSignal<AuthState>>();
    let navigate = use_navigate();

    let form = RwSignal::new(ReviewForm::default());
    let mine = RwSignal::new(ReviewList::loading());
    let message = RwSignal::new(String::new());
    let busy = RwSignal::new(false);

    let navigate_login = navigate.clone();
    Effect::new(move || {
        let state = auth.get();
        if !state.loading && state.user.is_none() {
            navigate_login("/login", NavigateOptions::default());
        }
    });

    // Reload whenever the signed-in identity changes.
    let user_id = Memo::new(move |_| auth.get().user.map(|u| u.id));
    Effect::new(move || {
        if user_id.get().is_some() {
            load_my_reviews(services, mine);
        }
    });

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        let current = form.get();
        let draft = current.draft();
        if let Err(problem) = draft.validate() {
            message.set(problem.to_owned());
            return;
        }
        let Some(svc) = services.get() else {
            return;
        };
        busy.set(true);
        message.set(String::new());

        #[cfg(feature = "hydrate")]
        leptos::task::spawn_local(async move {
            let result = match &current.editing {
                Some(id) => svc.reviews.update(id, &draft).await.map(|_| "Review updated!"),
                None => svc.reviews.create(&draft).await.map(|_| "Review submitted!"),
            };
            match result {
                Ok(done) => {
                    form.update(ReviewForm::reset);
                    message.set(done.to_owned());
                    load_my_reviews(services, mine);
                }
                Err(e) => {
                    log::error!("saving review failed: {e}");
                    message.set(e.user_message());
                }
            }
            busy.set(false);
        });
        #[cfg(not(feature = "hydrate"))]
        let _ = (svc, current, draft);
    };

    let on_edit = Callback::new(move |id: String| {
        let list = mine.get_untracked();
        if let Some(review) = list.find(&id) {
            form.update(|f| f.start_edit(review));
            message.set(String::new());
        }
    });

    let on_delete = Callback::new(move |id: String| {
        if !dom::confirm("Are you sure you want to delete this review?") {
            return;
        }
        let Some(svc) = services.get() else {
            return;
        };
        #[cfg(feature = "hydrate")]
        leptos::task::spawn_local(async move {
            match svc.reviews.delete(&id).await {
                Ok(()) => {
                    if form.get_untracked().editing.as_deref() == Some(id.as_str()) {
                        form.update(ReviewForm::reset);
                    }
                    load_my_reviews(services, mine);
                }
                Err(e) => {
                    log::error!("deleting review {id} failed: {e}");
                    dom::alert(&e.user_message());
                }
            }
        });
        #[cfg(not(feature = "hydrate"))]
        let _ = (svc, id);
    });

    let on_logout = move |_: leptos::ev::MouseEvent| {
        if !dom::confirm("Are you sure you want to logout?") {
            return;
        }
        let Some(svc) = services.get() else {
            return;
        };
        let navigate = navigate.clone();
        #[cfg(feature = "hydrate")]
        leptos::task::spawn_local(async move {
            // The local session is gone even when the remote call fails.
            if let Err(e) = svc.auth.sign_out().await {
                log::warn!("logout finished with a remote error: {e}");
            }
            navigate("/login", NavigateOptions::default());
        });
        #[cfg(not(feature = "hydrate"))]
        let _ = (svc, navigate);
    };

    let rating = move |field: RatingField| {
        view! {
            <StarRating
                label=field.label()
                value=Signal::derive(move || form.get().rating(field))
                on_change=Callback::new(move |n: u8| form.update(|f| f.set_rating(field, n)))
            />
        }
    };

    view! {
        <div class="subjects-page">
            <header class="site-header">
                <a class="site-title" href="/">"Subject Reviews"</a>
                <LoginLink/>
                <button class="logout-btn" on:click=on_logout>"Logout"</button>
            </header>
            <main class="main-box">
                <form class="review-form" on:submit=on_submit>
                    <select
                        class="dropdown-select"
                        prop:value=move || form.get().subject
                        on:change=move |ev| form.update(|f| f.subject = event_target_value(&ev))
                    >
                        <option value="">"Select a subject"</option>
                        {SUBJECT_GROUPS
                            .iter()
                            .map(|(grade, subjects)| {
                                view! {
                                    <optgroup label=*grade>
                                        {subjects
                                            .iter()
                                            .map(|subject| view! { <option value=*subject>{*subject}</option> })
                                            .collect_view()}
                                    </optgroup>
                                }
                            })
                            .collect_view()}
                    </select>
                    <div class="rating-content">
                        {RatingField::ALL.into_iter().map(rating).collect_view()}
                    </div>
                    <div class="form-bottom">
                        <div class="reason-box">
                            <textarea
                                placeholder="Why did you give these ratings?"
                                prop:value=move || form.get().reason
                                on:input=move |ev| form.update(|f| f.reason = event_target_value(&ev))
                            ></textarea>
                        </div>
                        <button class="submit-button" type="submit" disabled=move || busy.get()>
                            {move || form.get().submit_label()}
                        </button>
                        <Show when=move || form.get().is_editing()>
                            <button
                                class="cancel-button"
                                type="button"
                                on:click=move |_| form.update(|f| f.editing = None)
                            >
                                "Cancel Edit"
                            </button>
                        </Show>
                    </div>
                </form>
                <Show when=move || !message.get().is_empty()>
                    <p class="form-message">{move || message.get()}</p>
                </Show>
            </main>
            <section class="comments-display">
                <h3>"Your Reviews"</h3>
                {move || {
                    let state = mine.get();
                    if state.loading {
                        return view! { <p class="comments-status">"Loading..."</p> }.into_any();
                    }
                    if let Some(error) = state.error {
                        return view! { <p class="comments-status comments-status--error">{error}</p> }.into_any();
                    }
                    if state.is_empty() {
                        return view! { <p class="comments-status">"You have not written any reviews yet."</p> }
                            .into_any();
                    }
                    view! {
                        <div class="comments-list">
                            {state
                                .reviews
                                .into_iter()
                                .map(|review| view! { <ReviewCard review=review on_edit=on_edit on_delete=on_delete/> })
                                .collect_view()}
                        </div>
                    }
                        .into_any()
                }}
            </section>
        </div>
    }
}

fn load_my_reviews(services: ServicesRef, mine: RwSignal<ReviewList>) {
    let Some(svc) = services.get() else {
        return;
    };
    mine.update(|list| list.loading = true);
    #[cfg(feature = "hydrate")]
    leptos::task::spawn_local(async move {
        mine.set(ReviewList::settled(svc.reviews.get_my_reviews().await));
    });
    #[cfg(not(feature = "hydrate"))]
    let _ = svc;
}
