//! Grade/subject menu overlay for the home page.
//!
//! Opens from the header menu button, closes from its own close button or a
//! click on the backdrop outside the panel.

use leptos::prelude::*;

use crate::state::reviews::SUBJECT_GROUPS;
use crate::state::ui::UiState;
use crate::util::format::subject_href;

#[component]
pub fn MenuButton() -> impl IntoView {
    let ui = expect_context::<RwSignal<UiState>>();
    view! {
        <button id="menu-btn" class="menu-btn" aria-label="Open menu" on:click=move |_| ui.update(UiState::open_menu)>
            "☰"
        </button>
    }
}

#[component]
pub fn MenuOverlay() -> impl IntoView {
    let ui = expect_context::<RwSignal<UiState>>();
    let close = move || ui.update(UiState::close_menu);

    view! {
        <div
            id="grade-menu-overlay"
            class="menu-overlay"
            class:visible=move || ui.get().menu_open
            on:click=move |ev: leptos::ev::MouseEvent| {
                // Only the backdrop itself closes; clicks inside the panel bubble here too.
                if ev.target() == ev.current_target() {
                    close();
                }
            }
        >
            <nav class="menu-panel">
                <button id="close-menu-btn" class="menu-close" aria-label="Close menu" on:click=move |_| close()>
                    "✕"
                </button>
                {SUBJECT_GROUPS
                    .iter()
                    .map(|(grade, subjects)| {
                        view! {
                            <section class="menu-group">
                                <h3>{*grade}</h3>
                                <ul>
                                    {subjects
                                        .iter()
                                        .map(|subject| {
                                            let href = subject_href(subject);
                                            view! {
                                                <li>
                                                    <a href=href>{*subject}</a>
                                                </li>
                                            }
                                        })
                                        .collect_view()}
                                </ul>
                            </section>
                        }
                    })
                    .collect_view()}
            </nav>
        </div>
    }
}
