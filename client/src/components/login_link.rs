//! Header link that reads "Login" or "Welcome, <email>".

use leptos::prelude::*;

use crate::state::auth::AuthState;

#[component]
pub fn LoginLink() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let link = Memo::new(move |_| auth.get().login_link());

    view! {
        <a class="login-link-btn" class:login-link-btn--pending=move || auth.get().loading href=move || link.get().href>
            {move || link.get().label}
        </a>
    }
}
