//! Header chrome shared by the protected views.

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;

use crate::components::lang_select::LangSelect;
use crate::components::theme_toggle::ThemeToggle;
use crate::services;
use crate::state::auth::AuthStore;
use crate::state::ui::UiState;
use crate::util::auth::LOGIN_PATH;
use crate::util::i18n::{Msg, t};

#[component]
pub fn Layout(children: Children) -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthStore>>();
    let ui = expect_context::<RwSignal<UiState>>();
    let navigate = use_navigate();

    let display_name = move || auth.with(|s| s.user().map(|u| u.fullname.clone()).unwrap_or_default());
    let locale = move || ui.with(|u| u.locale);

    let on_logout = move |_| {
        services::auth::logout(&auth);
        navigate(LOGIN_PATH, NavigateOptions::default());
    };

    view! {
        <div class="layout">
            <header class="layout__header">
                <a class="layout__brand" href="/">{move || t(locale(), Msg::AppName)}</a>
                <span class="layout__user">{display_name}</span>
                <div class="layout__controls">
                    <LangSelect/>
                    <ThemeToggle/>
                    <button class="layout__logout" type="button" on:click=on_logout>
                        {move || t(locale(), Msg::Logout)}
                    </button>
                </div>
            </header>
            <main class="layout__content">{children()}</main>
        </div>
    }
}
