//! Email + password sign-in and sign-up.
//!
//! ERROR HANDLING
//! ==============
//! Input problems are caught before any request. Backend failures show
//! `ApiError::user_message()`: auth errors verbatim, everything else as a
//! generic retry message.

#[cfg(test)]
#[path = "login_test.rs"]
mod login_test;

use leptos::prelude::*;
#[cfg(feature = "hydrate")]
use leptos_router::NavigateOptions;
#[cfg(feature = "hydrate")]
use leptos_router::hooks::use_navigate;

#[cfg(feature = "hydrate")]
use crate::net::types::SignUpOutcome;
use crate::services::use_services;

/// Minimum password length accepted by the auth backend.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Trim and check the credentials before sending them.
///
/// # Errors
///
/// Returns the message to show under the form.
pub fn validate_credentials(email: &str, password: &str) -> Result<(String, String), &'static str> {
    let email = email.trim();
    if email.is_empty() || password.is_empty() {
        return Err("Please enter your email and password.");
    }
    let valid_email = email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.') && !domain.starts_with('.'));
    if !valid_email {
        return Err("Please enter a valid email address.");
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err("Password must be at least 6 characters.");
    }
    Ok((email.to_owned(), password.to_owned()))
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mode {
    SignIn,
    SignUp,
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let services = use_services();
    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let info = RwSignal::new(String::new());
    let busy = RwSignal::new(false);
    let mode = RwSignal::new(Mode::SignIn);
    #[cfg(feature = "hydrate")]
    let navigate = use_navigate();

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        let (email_value, password_value) = match validate_credentials(&email.get(), &password.get()) {
            Ok(creds) => creds,
            Err(message) => {
                info.set(message.to_owned());
                return;
            }
        };
        let Some(svc) = services.get() else {
            return;
        };
        busy.set(true);
        info.set(String::new());

        #[cfg(feature = "hydrate")]
        {
            let navigate = navigate.clone();
            let current = mode.get();
            leptos::task::spawn_local(async move {
                let result = match current {
                    Mode::SignIn => svc.auth.sign_in(&email_value, &password_value).await.map(|_| true),
                    Mode::SignUp => {
                        let redirect = crate::util::dom::site_root();
                        svc.auth
                            .sign_up(&email_value, &password_value, redirect.as_deref())
                            .await
                            .map(|outcome| matches!(outcome, SignUpOutcome::SignedIn(_)))
                    }
                };
                match result {
                    Ok(true) => navigate("/", NavigateOptions::default()),
                    Ok(false) => {
                        info.set("Check your email to confirm your account, then sign in.".to_owned());
                        mode.set(Mode::SignIn);
                    }
                    Err(e) => {
                        log::warn!("authentication failed: {e}");
                        info.set(e.user_message());
                    }
                }
                busy.set(false);
            });
        }
        #[cfg(not(feature = "hydrate"))]
        let _ = (svc, email_value, password_value);
    };

    view! {
        <div class="login-page">
            <div class="login-card">
                <h1>"Subject Reviews"</h1>
                <p class="login-card__subtitle">
                    {move || if mode.get() == Mode::SignIn { "Sign in" } else { "Create an account" }}
                </p>
                <form class="login-form" on:submit=on_submit>
                    <input
                        class="login-input"
                        type="email"
                        autocomplete="email"
                        placeholder="you@example.com"
                        prop:value=move || email.get()
                        on:input=move |ev| email.set(event_target_value(&ev))
                    />
                    <input
                        class="login-input"
                        type="password"
                        autocomplete="current-password"
                        placeholder="Password"
                        prop:value=move || password.get()
                        on:input=move |ev| password.set(event_target_value(&ev))
                    />
                    <button class="login-button" type="submit" disabled=move || busy.get()>
                        {move || if mode.get() == Mode::SignIn { "Login" } else { "Sign Up" }}
                    </button>
                </form>
                <Show when=move || !info.get().is_empty()>
                    <p class="login-message">{move || info.get()}</p>
                </Show>
                <div class="login-divider"></div>
                <button
                    class="login-toggle"
                    type="button"
                    on:click=move |_| {
                        info.set(String::new());
                        mode.update(|m| *m = if *m == Mode::SignIn { Mode::SignUp } else { Mode::SignIn });
                    }
                >
                    {move || {
                        if mode.get() == Mode::SignIn {
                            "No account yet? Sign up"
                        } else {
                            "Already registered? Log in"
                        }
                    }}
                </button>
                <a class="login-back" href="/">"Back to home"</a>
            </div>
        </div>
    }
}
