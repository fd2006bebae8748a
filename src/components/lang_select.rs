//! Language select and the `?lang=` synchronizer.
//!
//! SYSTEM CONTEXT
//! ==============
//! `LocaleSync` is mounted once inside the router. It reconciles the URL
//! parameter with the stored preference on every navigation and keeps the
//! URL carrying the active language. `LangSelect` writes a new choice to
//! both places.

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::{use_location, use_navigate};

use crate::state::ui::UiState;
use crate::util::auth::query_param;
use crate::util::i18n::{self, LANG_PARAM, Locale, resolve_locale, with_lang_param};

fn replace_options() -> NavigateOptions {
    NavigateOptions { replace: true, ..NavigateOptions::default() }
}

/// Keep `UiState::locale`, the stored preference and the URL in agreement.
#[component]
pub fn LocaleSync() -> impl IntoView {
    let ui = expect_context::<RwSignal<UiState>>();
    let location = use_location();
    let navigate = use_navigate();

    Effect::new(move || {
        let search = location.search.get();
        let url_lang = query_param(&search, LANG_PARAM);
        let stored = i18n::read_preference();
        let resolution = resolve_locale(url_lang.as_deref(), stored.as_deref());

        if resolution.persist {
            i18n::save_preference(resolution.locale);
        }
        if ui.with_untracked(|u| u.locale) != resolution.locale {
            ui.update(|u| u.locale = resolution.locale);
        }
        if resolution.rewrite_url {
            let pathname = location.pathname.get_untracked();
            let query = with_lang_param(&search, resolution.locale);
            navigate(&format!("{pathname}?{query}"), replace_options());
        }
    });
}

#[component]
pub fn LangSelect() -> impl IntoView {
    let ui = expect_context::<RwSignal<UiState>>();
    let location = use_location();
    let navigate = use_navigate();

    let on_change = move |ev| {
        let Some(locale) = Locale::from_code(&event_target_value(&ev)) else {
            return;
        };
        i18n::save_preference(locale);
        ui.update(|u| u.locale = locale);
        let pathname = location.pathname.get_untracked();
        let query = with_lang_param(&location.search.get_untracked(), locale);
        navigate(&format!("{pathname}?{query}"), replace_options());
    };

    view! {
        <select class="lang-select" on:change=on_change>
            {Locale::ALL
                .into_iter()
                .map(|locale| {
                    view! {
                        <option
                            value=locale.code()
                            selected=move || ui.with(|u| u.locale) == locale
                        >
                            {locale.label()}
                        </option>
                    }
                })
                .collect_view()}
        </select>
    }
}
