//! Fallback for unknown paths.

use leptos::prelude::*;

use crate::state::ui::UiState;
use crate::util::i18n::{Msg, t};

#[component]
pub fn NotFoundPage() -> impl IntoView {
    let ui = expect_context::<RwSignal<UiState>>();
    let locale = move || ui.with(|u| u.locale);
    view! {
        <section class="not-found">
            <h1>{move || t(locale(), Msg::NotFoundTitle)}</h1>
            <p>{move || t(locale(), Msg::NotFoundText)}</p>
            <a class="not-found__home" href="/">{move || t(locale(), Msg::ReturnHome)}</a>
        </section>
    }
}
