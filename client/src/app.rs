//! Root application component with routing and context providers.
//!
//! SYSTEM CONTEXT
//! ==============
//! `App` is the only place the page-lifetime services are built. In the
//! browser it wires the session context to the auth signal, binds the
//! activity listeners, and runs the page-load session check. The SSR pass
//! renders the same tree with `AuthState::default()` (loading) and no
//! services.

use leptos::prelude::*;
use leptos_meta::{MetaTags, Stylesheet, Title, provide_meta_context};
use leptos_router::{
    StaticSegment,
    components::{Route, Router, Routes},
};

use crate::pages::{home::HomePage, login::LoginPage, reviews::ReviewsPage, subjects::SubjectsPage};
use crate::state::{auth::AuthState, ui::UiState};

/// HTML shell rendered on the server for SSR + hydration.
pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <AutoReload options=options.clone()/>
                <HydrationScripts options/>
                <MetaTags/>
            </head>
            <body>
                <App/>
            </body>
        </html>
    }
}

/// Root application component.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let auth = RwSignal::new(AuthState::default());
    let ui = RwSignal::new(UiState::default());
    provide_context(auth);
    provide_context(ui);

    #[cfg(feature = "hydrate")]
    start_session(auth);

    view! {
        <Stylesheet id="leptos" href="/pkg/subject-reviews.css"/>
        <Title text="Subject Reviews"/>

        <Router>
            <Routes fallback=|| "Page not found.".into_view()>
                <Route path=StaticSegment("") view=HomePage/>
                <Route path=StaticSegment("login") view=LoginPage/>
                <Route path=StaticSegment("subjects") view=SubjectsPage/>
                <Route path=StaticSegment("reviews") view=ReviewsPage/>
            </Routes>
        </Router>
    }
}

/// Build the services, provide them, and kick off the session lifecycle.
#[cfg(feature = "hydrate")]
fn start_session(auth: RwSignal<AuthState>) {
    use crate::config::BackendConfig;
    use crate::services::{Services, ServicesHandle};
    use crate::session::UiHooks;

    let hooks = UiHooks::new(
        move |user| auth.set(AuthState::signed_in(user.clone())),
        move || auth.set(AuthState::signed_out()),
    );
    let services = Services::browser(BackendConfig::from_build_env(), hooks);
    let handle: ServicesHandle = StoredValue::new_local(services.clone());
    provide_context(handle);

    bind_activity_listeners(handle);

    leptos::task::spawn_local(async move {
        if let Err(e) = services.auth.recover_session_from_url().await {
            log::warn!("could not adopt session from confirmation link: {e}");
        }
        services.session.bootstrap().await;
        if cfg!(debug_assertions) {
            services.reviews.test_connection().await;
        }
    });
}

/// Every qualifying interaction refreshes the last-activity stamp.
#[cfg(feature = "hydrate")]
fn bind_activity_listeners(handle: crate::services::ServicesHandle) {
    use leptos::ev;

    let touch = move || {
        handle.try_with_value(|services| services.session.record_activity());
    };
    // Handles are page-lifetime; the listeners are never removed.
    let _ = window_event_listener(ev::mousemove, move |_| touch());
    let _ = window_event_listener(ev::keypress, move |_| touch());
    let _ = window_event_listener(ev::scroll, move |_| touch());
    let _ = window_event_listener(ev::touchstart, move |_| touch());
    let _ = window_event_listener(ev::click, move |_| touch());
}
