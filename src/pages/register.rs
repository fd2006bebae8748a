//! Registration page.
//!
//! The backend offers no sign-up endpoint, so registration stops at
//! client-side validation: valid input raises a success notice and points
//! the user back to login.

#[cfg(test)]
#[path = "register_test.rs"]
mod register_test;

use leptos::prelude::*;

use crate::components::lang_select::LangSelect;
use crate::components::theme_toggle::ThemeToggle;
use crate::state::ui::{NoticeKind, UiState};
use crate::util::i18n::{Msg, t};

pub const MIN_USERNAME_LEN: usize = 3;
pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RegisterForm {
    pub fullname: String,
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm: String,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RegisterErrors {
    pub fullname: Option<Msg>,
    pub username: Option<Msg>,
    pub email: Option<Msg>,
    pub password: Option<Msg>,
    pub confirm: Option<Msg>,
}

impl RegisterErrors {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

pub fn validate_registration(form: &RegisterForm) -> RegisterErrors {
    let username = form.username.trim();
    RegisterErrors {
        fullname: form.fullname.trim().is_empty().then_some(Msg::FullNameRequired),
        username: if username.is_empty() {
            Some(Msg::UsernameRequired)
        } else if username.chars().count() < MIN_USERNAME_LEN {
            Some(Msg::UsernameMin3)
        } else if !username.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            Some(Msg::UsernameChars)
        } else {
            None
        },
        email: if form.email.trim().is_empty() {
            Some(Msg::EmailRequired)
        } else if !is_valid_email(form.email.trim()) {
            Some(Msg::EmailInvalid)
        } else {
            None
        },
        password: if form.password.is_empty() {
            Some(Msg::PasswordRequired)
        } else if form.password.chars().count() < MIN_PASSWORD_LEN {
            Some(Msg::PasswordMin6)
        } else {
            None
        },
        confirm: if form.confirm.is_empty() {
            Some(Msg::ConfirmRequired)
        } else if form.confirm != form.password {
            Some(Msg::PasswordsMustMatch)
        } else {
            None
        },
    }
}

/// `local@domain.tld` with no whitespace and a dot inside the domain.
pub fn is_valid_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}

#[component]
pub fn RegisterPage() -> impl IntoView {
    let ui = expect_context::<RwSignal<UiState>>();
    let form = RwSignal::new(RegisterForm::default());
    let errors = RwSignal::new(RegisterErrors::default());
    let registered = RwSignal::new(false);
    let locale = move || ui.with(|u| u.locale);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let found = form.with_untracked(validate_registration);
        errors.set(found);
        if !found.is_empty() {
            return;
        }
        log::info!("registration form accepted for {}", form.with_untracked(|f| f.username.trim().to_owned()));
        registered.set(true);
        let locale = ui.with_untracked(|u| u.locale);
        ui.update(|u| {
            u.notify(NoticeKind::Success, t(locale, Msg::Success), t(locale, Msg::RegistrationSuccess));
        });
    };

    view! {
        <div class="auth-page">
            <div class="auth-page__prefs">
                <LangSelect/>
                <ThemeToggle/>
            </div>
            <div class="auth-card">
                <h1>{move || t(locale(), Msg::Register)}</h1>
                <form class="auth-form" on:submit=on_submit>
                    {form_field(ui, form, errors, FieldSpec {
                        label: Msg::FullName,
                        kind: "text",
                        get: |f| f.fullname.clone(),
                        set: |f, v| f.fullname = v,
                        error: |e| e.fullname,
                    })}
                    {form_field(ui, form, errors, FieldSpec {
                        label: Msg::Username,
                        kind: "text",
                        get: |f| f.username.clone(),
                        set: |f, v| f.username = v,
                        error: |e| e.username,
                    })}
                    {form_field(ui, form, errors, FieldSpec {
                        label: Msg::Email,
                        kind: "email",
                        get: |f| f.email.clone(),
                        set: |f, v| f.email = v,
                        error: |e| e.email,
                    })}
                    {form_field(ui, form, errors, FieldSpec {
                        label: Msg::Password,
                        kind: "password",
                        get: |f| f.password.clone(),
                        set: |f, v| f.password = v,
                        error: |e| e.password,
                    })}
                    {form_field(ui, form, errors, FieldSpec {
                        label: Msg::ConfirmPassword,
                        kind: "password",
                        get: |f| f.confirm.clone(),
                        set: |f, v| f.confirm = v,
                        error: |e| e.confirm,
                    })}
                    <button class="auth-button" type="submit" disabled=move || registered.get()>
                        {move || t(locale(), Msg::SignUp)}
                    </button>
                </form>
                <p class="auth-footer">
                    {move || t(locale(), Msg::HaveAccount)}
                    " "
                    <a class="auth-link" href="/login">{move || t(locale(), Msg::Login)}</a>
                </p>
            </div>
        </div>
    }
}

/// One labelled input bound to a field of [`RegisterForm`].
struct FieldSpec {
    label: Msg,
    kind: &'static str,
    get: fn(&RegisterForm) -> String,
    set: fn(&mut RegisterForm, String),
    error: fn(&RegisterErrors) -> Option<Msg>,
}

fn form_field(
    ui: RwSignal<UiState>,
    form: RwSignal<RegisterForm>,
    errors: RwSignal<RegisterErrors>,
    spec: FieldSpec,
) -> impl IntoView {
    let FieldSpec { label, kind, get, set, error } = spec;
    let locale = move || ui.with(|u| u.locale);
    view! {
        <label class="auth-label">
            {move || t(locale(), label)}
            <input
                class="auth-input"
                type=kind
                prop:value=move || form.with(get)
                on:input=move |ev| form.update(|f| set(f, event_target_value(&ev)))
            />
        </label>
        {move || error(&errors.get()).map(|msg| view! { <p class="field-error">{t(locale(), msg)}</p> })}
    }
}
