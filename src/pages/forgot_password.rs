//! Forgot-password page: request an emailed reset link.

#[cfg(test)]
#[path = "forgot_password_test.rs"]
mod forgot_password_test;

use leptos::prelude::*;

use crate::components::theme_toggle::force_light_theme;
use crate::net::api::BrowserGateway;
use crate::services::auth::{ResetLinkOutcome, request_reset_link};
use crate::state::ui::{NoticeKind, UiState};
use crate::util::i18n::{Msg, t};

/// What the page shows after a reset-link request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResetLinkFeedback {
    Notice { kind: NoticeKind, title: Msg, text: Msg },
    FieldError(Msg),
}

pub fn validate_username(username: &str) -> Result<String, Msg> {
    let username = username.trim();
    if username.is_empty() { Err(Msg::UsernameRequired) } else { Ok(username.to_owned()) }
}

pub fn feedback_for(outcome: ResetLinkOutcome) -> ResetLinkFeedback {
    match outcome {
        ResetLinkOutcome::Sent => {
            ResetLinkFeedback::Notice { kind: NoticeKind::Success, title: Msg::Success, text: Msg::ResetLinkSent }
        }
        ResetLinkOutcome::UnknownUser => ResetLinkFeedback::FieldError(Msg::IncorrectUsername),
        ResetLinkOutcome::NetworkError => {
            ResetLinkFeedback::Notice { kind: NoticeKind::Error, title: Msg::Error, text: Msg::NetworkError }
        }
    }
}

#[component]
pub fn ForgotPasswordPage() -> impl IntoView {
    let ui = expect_context::<RwSignal<UiState>>();
    let gateway = expect_context::<BrowserGateway>();
    force_light_theme(ui);

    let username = RwSignal::new(String::new());
    let error = RwSignal::new(None::<Msg>);
    let busy = RwSignal::new(false);
    let locale = move || ui.with(|u| u.locale);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get_untracked() {
            return;
        }
        let user = match validate_username(&username.get_untracked()) {
            Ok(user) => user,
            Err(msg) => {
                error.set(Some(msg));
                return;
            }
        };
        error.set(None);
        busy.set(true);
        let gateway = gateway.clone();
        leptos::task::spawn_local(async move {
            let outcome = request_reset_link(&gateway, &user).await;
            match feedback_for(outcome) {
                ResetLinkFeedback::Notice { kind, title, text } => {
                    let locale = ui.with_untracked(|u| u.locale);
                    ui.update(|u| {
                        u.notify(kind, t(locale, title), t(locale, text));
                    });
                }
                ResetLinkFeedback::FieldError(msg) => error.set(Some(msg)),
            }
            busy.set(false);
        });
    };

    view! {
        <div class="auth-page">
            <div class="auth-card">
                <h1>{move || t(locale(), Msg::ResetPassword)}</h1>
                <p class="auth-card__subtitle">{move || t(locale(), Msg::ForgotPasswordHint)}</p>
                <form class="auth-form" on:submit=on_submit>
                    <label class="auth-label">
                        {move || t(locale(), Msg::Username)}
                        <input
                            class="auth-input"
                            type="text"
                            prop:value=move || username.get()
                            on:input=move |ev| username.set(event_target_value(&ev))
                        />
                    </label>
                    {move || error.get().map(|msg| view! { <p class="field-error">{t(locale(), msg)}</p> })}
                    <button class="auth-button" type="submit" disabled=move || busy.get()>
                        {move || if busy.get() { t(locale(), Msg::Submitting) } else { t(locale(), Msg::SendResetLink) }}
                    </button>
                </form>
                <a class="auth-link" href="/login">{move || t(locale(), Msg::BackToLogin)}</a>
            </div>
        </div>
    }
}
