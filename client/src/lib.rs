//! # review-client
//!
//! Leptos + WASM frontend for the subject review site.
//!
//! This crate contains pages, components, application state, the Supabase
//! REST client, and the session-activity core that force-expires sessions
//! after a long stretch of inactivity.

pub mod app;
pub mod components;
pub mod config;
pub mod net;
pub mod pages;
pub mod services;
pub mod session;
pub mod state;
pub mod util;

/// Browser entry point: installs console logging and hydrates the SSR markup.
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    leptos::mount::hydrate_body(app::App);
}
