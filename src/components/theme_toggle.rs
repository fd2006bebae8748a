//! Light/dark toggle button.

use leptos::prelude::*;

use crate::state::ui::UiState;
use crate::util::i18n::{Msg, t};
use crate::util::theme::{self, ThemeMode};

#[component]
pub fn ThemeToggle() -> impl IntoView {
    let ui = expect_context::<RwSignal<UiState>>();

    let on_toggle = move |_| {
        let next = theme::toggle(ui.with_untracked(|u| u.theme));
        ui.update(|u| u.theme = next);
    };
    let icon = move || match ui.with(|u| u.theme) {
        ThemeMode::Light => "\u{263E}",
        ThemeMode::Dark => "\u{2600}",
    };

    view! {
        <button
            class="theme-toggle"
            type="button"
            title=move || t(ui.with(|u| u.locale), Msg::ToggleTheme)
            on:click=on_toggle
        >
            {icon}
        </button>
    }
}

/// Render the current view in light mode regardless of the stored
/// preference, restoring the preference when the view unmounts.
pub fn force_light_theme(ui: RwSignal<UiState>) {
    theme::apply(ThemeMode::Light);
    on_cleanup(move || theme::apply(ui.with_untracked(|u| u.theme)));
}
