//! Landing page with the grade menu and the header login link.

use leptos::prelude::*;

use crate::components::login_link::LoginLink;
use crate::components::menu_overlay::{MenuButton, MenuOverlay};

#[component]
pub fn HomePage() -> impl IntoView {
    view! {
        <div class="home-page">
            <header class="site-header">
                <MenuButton/>
                <a class="site-title" href="/">"Subject Reviews"</a>
                <LoginLink/>
            </header>
            <main class="main-box">
                <h1>"Find out what a class is really like"</h1>
                <p>"Read honest ratings from students who took it, or share your own."</p>
                <div class="home-actions">
                    <a class="primary-btn" href="/reviews">"Browse Reviews"</a>
                    <a class="secondary-btn" href="/subjects">"Write a Review"</a>
                </div>
            </main>
            <MenuOverlay/>
        </div>
    }
}
