//! Reset-password page reached from the emailed link
//! (`/reset-password?token=…&username=…`).
//!
//! DESIGN
//! ======
//! Form state and outcome handling live in [`ResetPasswordForm`] so the
//! status-coded branches can be tested without a DOM:
//! - `200` signs the user in and goes home
//! - `601` keeps the entered values, swaps in the reissued token and asks
//!   for a different password
//! - `498` tells the user the link expired; nothing else changes

#[cfg(test)]
#[path = "reset_password_test.rs"]
mod reset_password_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::{use_location, use_navigate};

use crate::components::theme_toggle::force_light_theme;
use crate::net::api::BrowserGateway;
use crate::services::auth::{ResetFlowOutcome, reset_password};
use crate::state::auth::AuthStore;
use crate::state::ui::{NoticeKind, UiState};
use crate::util::auth::{HOME_PATH, query_param};
use crate::util::i18n::{Msg, t};

pub const MIN_PASSWORD_LEN: usize = 3;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResetPasswordForm {
    /// Reset token; replaced when the backend reissues one.
    pub token: Option<String>,
    pub username: String,
    pub password: String,
    pub username_error: Option<Msg>,
    pub password_error: Option<Msg>,
}

/// What the page should do next.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResetFollowUp {
    Stay,
    Notify { kind: NoticeKind, title: Msg, text: Msg },
    /// Signed in: show the success notice and go home.
    SignedIn,
}

impl ResetFollowUp {
    fn error(text: Msg) -> Self {
        Self::Notify { kind: NoticeKind::Error, title: Msg::Error, text }
    }
}

/// Values ready to send.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResetSubmission {
    pub token: String,
    pub username: String,
    pub password: String,
}

impl ResetPasswordForm {
    /// Prefill token and username from the link's query string.
    pub fn from_query(search: &str) -> Self {
        Self {
            token: query_param(search, "token").filter(|t| !t.trim().is_empty()),
            username: query_param(search, "username").unwrap_or_default(),
            ..Self::default()
        }
    }

    /// Validate and produce the submission, or the follow-up to show instead.
    /// A missing token is reported before any field checks.
    pub fn prepare(&mut self) -> Result<ResetSubmission, ResetFollowUp> {
        let Some(token) = self.token.clone() else {
            return Err(ResetFollowUp::error(Msg::TokenMissing));
        };
        let username = self.username.trim().to_owned();
        self.username_error = username.is_empty().then_some(Msg::UsernameRequired);
        self.password_error = if self.password.is_empty() {
            Some(Msg::PasswordRequired)
        } else if self.password.chars().count() < MIN_PASSWORD_LEN {
            Some(Msg::PasswordMin3)
        } else {
            None
        };
        if self.username_error.is_some() || self.password_error.is_some() {
            return Err(ResetFollowUp::Stay);
        }
        Ok(ResetSubmission { token, username, password: self.password.clone() })
    }

    /// Fold a flow outcome into the form.
    pub fn apply_outcome(&mut self, outcome: &ResetFlowOutcome) -> ResetFollowUp {
        match outcome {
            ResetFlowOutcome::Completed => ResetFollowUp::SignedIn,
            ResetFlowOutcome::PasswordReused { new_token } => {
                if let Some(token) = new_token {
                    self.token = Some(token.clone());
                }
                self.password_error = Some(Msg::UseDifferentPassword);
                ResetFollowUp::Stay
            }
            ResetFlowOutcome::TokenExpired => ResetFollowUp::Notify {
                kind: NoticeKind::Error,
                title: Msg::TokenExpired,
                text: Msg::TokenExpiredMessage,
            },
            ResetFlowOutcome::Failed => {
                self.username_error = Some(Msg::ResetPasswordError);
                self.password_error = Some(Msg::ResetPasswordError);
                ResetFollowUp::error(Msg::ResetPasswordError)
            }
            ResetFlowOutcome::NetworkError => ResetFollowUp::error(Msg::NetworkError),
            ResetFlowOutcome::Superseded => ResetFollowUp::Stay,
        }
    }
}

#[component]
pub fn ResetPasswordPage() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthStore>>();
    let ui = expect_context::<RwSignal<UiState>>();
    let gateway = expect_context::<BrowserGateway>();
    let location = use_location();
    let navigate = use_navigate();
    force_light_theme(ui);

    let form = RwSignal::new(ResetPasswordForm::from_query(&location.search.get_untracked()));
    let busy = RwSignal::new(false);
    let locale = move || ui.with(|u| u.locale);

    let notify = move |kind: NoticeKind, title: Msg, text: Msg| {
        let locale = ui.with_untracked(|u| u.locale);
        ui.update(|u| {
            u.notify(kind, t(locale, title), t(locale, text));
        });
    };

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get_untracked() {
            return;
        }
        let submission = match form.try_update(ResetPasswordForm::prepare) {
            Some(Ok(submission)) => submission,
            Some(Err(ResetFollowUp::Notify { kind, title, text })) => {
                notify(kind, title, text);
                return;
            }
            _ => return,
        };
        busy.set(true);
        let gateway = gateway.clone();
        let navigate = navigate.clone();
        leptos::task::spawn_local(async move {
            let outcome =
                reset_password(&gateway, &auth, &submission.token, &submission.username, &submission.password).await;
            match form.try_update(|f| f.apply_outcome(&outcome)) {
                Some(ResetFollowUp::SignedIn) => {
                    notify(NoticeKind::Success, Msg::PasswordResetSuccess, Msg::PasswordResetSuccessMessage);
                    navigate(HOME_PATH, NavigateOptions::default());
                }
                Some(ResetFollowUp::Notify { kind, title, text }) => notify(kind, title, text),
                Some(ResetFollowUp::Stay) | None => {}
            }
            busy.set(false);
        });
    };

    let error_line = move |pick: fn(&ResetPasswordForm) -> Option<Msg>| {
        move || form.with(pick).map(|msg| view! { <p class="field-error">{t(locale(), msg)}</p> })
    };

    view! {
        <div class="auth-page">
            <div class="auth-card">
                <h1>{move || t(locale(), Msg::ResetPassword)}</h1>
                <p class="auth-card__subtitle">{move || t(locale(), Msg::ResetPasswordHint)}</p>
                <form class="auth-form" on:submit=on_submit>
                    <label class="auth-label">
                        {move || t(locale(), Msg::Username)}
                        <input
                            class="auth-input"
                            type="text"
                            prop:value=move || form.with(|f| f.username.clone())
                            on:input=move |ev| form.update(|f| f.username = event_target_value(&ev))
                        />
                    </label>
                    {error_line(|f| f.username_error)}
                    <label class="auth-label">
                        {move || t(locale(), Msg::NewPassword)}
                        <input
                            class="auth-input"
                            type="password"
                            autocomplete="new-password"
                            prop:value=move || form.with(|f| f.password.clone())
                            on:input=move |ev| form.update(|f| f.password = event_target_value(&ev))
                        />
                    </label>
                    {error_line(|f| f.password_error)}
                    <button class="auth-button" type="submit" disabled=move || busy.get()>
                        {move || if busy.get() { t(locale(), Msg::Submitting) } else { t(locale(), Msg::Submit) }}
                    </button>
                </form>
                <a class="auth-link" href="/login">{move || t(locale(), Msg::BackToLogin)}</a>
            </div>
        </div>
    }
}
