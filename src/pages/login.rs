//! Login page: username + password sign-in.
//!
//! SYSTEM CONTEXT
//! ==============
//! Credentials go through `services::auth::login`, which records the outcome
//! in the auth store. Once the store reports a signed-in user the page
//! navigates to the sanitized `?redirect=` target.

#[cfg(test)]
#[path = "login_test.rs"]
mod login_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::{use_location, use_navigate};

use crate::components::lang_select::LangSelect;
use crate::components::theme_toggle::ThemeToggle;
use crate::net::api::BrowserGateway;
use crate::services;
use crate::services::auth::{LoginOutcome, login};
use crate::state::auth::{AuthStore, now};
use crate::state::ui::{NoticeKind, UiState};
use crate::util::auth::redirect_target;
use crate::util::i18n::{Msg, t};

pub const MIN_PASSWORD_LEN: usize = 6;

/// Inline field errors.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LoginErrors {
    pub username: Option<Msg>,
    pub password: Option<Msg>,
}

/// Trim the username and check both fields. Passwords are never trimmed.
pub fn validate_login_input(username: &str, password: &str) -> Result<(String, String), LoginErrors> {
    let username = username.trim();
    let errors = LoginErrors {
        username: username.is_empty().then_some(Msg::UsernameRequired),
        password: if password.is_empty() {
            Some(Msg::PasswordRequired)
        } else if password.chars().count() < MIN_PASSWORD_LEN {
            Some(Msg::PasswordMin6)
        } else {
            None
        },
    };
    if errors == LoginErrors::default() {
        Ok((username.to_owned(), password.to_owned()))
    } else {
        Err(errors)
    }
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthStore>>();
    let ui = expect_context::<RwSignal<UiState>>();
    let gateway = expect_context::<BrowserGateway>();
    let location = use_location();
    let navigate = use_navigate();

    let username = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let errors = RwSignal::new(LoginErrors::default());

    // A signed-in store whose record is gone or expired is stale: drop it
    // instead of bouncing back to a guard that will deny again.
    Effect::new(move || {
        if !auth.with(|s| s.state().is_authenticated) {
            return;
        }
        if auth.with_untracked(|s| s.has_usable_session(now())) {
            let target = redirect_target(&location.search.get_untracked());
            navigate(&target, NavigateOptions { replace: true, ..NavigateOptions::default() });
        } else {
            services::auth::logout(&auth);
        }
    });

    let loading = move || auth.with(|s| s.state().loading);
    let server_error = move || auth.with(|s| s.state().error.clone());
    let locale = move || ui.with(|u| u.locale);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if auth.with_untracked(|s| s.state().loading) {
            return;
        }
        let (user, pass) = match validate_login_input(&username.get_untracked(), &password.get_untracked()) {
            Ok(values) => values,
            Err(e) => {
                errors.set(e);
                return;
            }
        };
        errors.set(LoginErrors::default());
        let locale = ui.with_untracked(|u| u.locale);
        let gateway = gateway.clone();
        leptos::task::spawn_local(async move {
            if login(&gateway, &auth, locale, &user, &pass).await == LoginOutcome::NetworkError {
                ui.update(|u| {
                    u.notify(NoticeKind::Error, t(locale, Msg::Error), t(locale, Msg::NetworkError));
                });
            }
        });
    };

    let field_error = move |pick: fn(&LoginErrors) -> Option<Msg>| {
        move || pick(&errors.get()).map(|msg| view! { <p class="field-error">{t(locale(), msg)}</p> })
    };

    view! {
        <div class="auth-page">
            <div class="auth-page__prefs">
                <LangSelect/>
                <ThemeToggle/>
            </div>
            <div class="auth-card">
                <h1>{move || t(locale(), Msg::Login)}</h1>
                <form class="auth-form" on:submit=on_submit>
                    <label class="auth-label">
                        {move || t(locale(), Msg::Username)}
                        <input
                            class="auth-input"
                            type="text"
                            autocomplete="username"
                            prop:value=move || username.get()
                            on:input=move |ev| username.set(event_target_value(&ev))
                        />
                    </label>
                    {field_error(|e| e.username)}
                    <label class="auth-label">
                        {move || t(locale(), Msg::Password)}
                        <input
                            class="auth-input"
                            type="password"
                            autocomplete="current-password"
                            prop:value=move || password.get()
                            on:input=move |ev| password.set(event_target_value(&ev))
                        />
                    </label>
                    {field_error(|e| e.password)}
                    <Show when=move || server_error().is_some()>
                        <p class="auth-error">{move || server_error().unwrap_or_default()}</p>
                    </Show>
                    <button class="auth-button" type="submit" disabled=loading>
                        {move || if loading() { t(locale(), Msg::Submitting) } else { t(locale(), Msg::Login) }}
                    </button>
                </form>
                <a class="auth-link" href="/forgot-password">{move || t(locale(), Msg::ForgotPassword)}</a>
                <p class="auth-footer">
                    {move || t(locale(), Msg::NoAccount)}
                    " "
                    <a class="auth-link" href="/register">{move || t(locale(), Msg::SignUp)}</a>
                </p>
            </div>
        </div>
    }
}
