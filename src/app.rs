//! Root application component with routing and context providers.

use std::sync::Arc;

use leptos::prelude::*;
use leptos::tachys::view::any_view::IntoAny;
use leptos_meta::{Title, provide_meta_context};
use leptos_router::{
    StaticSegment,
    components::{Route, Router, Routes},
};

use crate::components::lang_select::LocaleSync;
use crate::components::notice_banner::NoticeBanner;
use crate::components::require_auth::RequireAuth;
use crate::config::ApiConfig;
use crate::net::api::BrowserGateway;
use crate::pages::{
    forgot_password::ForgotPasswordPage,
    home::HomePage,
    login::LoginPage,
    not_found::NotFoundPage,
    register::RegisterPage,
    reset_password::ResetPasswordPage,
    role_pages::{AdminPage, ManagerPage, SharedPage},
};
use crate::routes::Page;
use crate::services;
use crate::state::auth::{AuthStore, now};
use crate::state::session::{BrowserSessionStore, SharedSessionStore};
use crate::state::ui::UiState;
use crate::util::i18n::{self, Locale};
use crate::util::theme;

/// Root application component.
///
/// Restores the session from storage, provides the auth store, UI state
/// and gateway as contexts, and sets up client-side routing.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let config = match ApiConfig::from_browser() {
        Ok(config) => config,
        Err(e) => {
            log::error!("cannot start: {e}");
            return view! { <p class="config-error">{e.to_string()}</p> }.into_any();
        }
    };
    log::info!("api base url {}", config.base_url());

    let session: SharedSessionStore = Arc::new(BrowserSessionStore);
    let auth = RwSignal::new(AuthStore::new(Arc::clone(&session)));
    services::auth::restore_session(&auth, now());

    let theme_mode = theme::read_preference();
    theme::apply(theme_mode);
    let locale = i18n::read_preference()
        .as_deref()
        .and_then(Locale::from_code)
        .unwrap_or_default();
    let ui = RwSignal::new(UiState::new(theme_mode, locale));

    provide_context(auth);
    provide_context(ui);
    provide_context(BrowserGateway::for_browser(config, session));

    view! {
        <Title text=move || i18n::t(ui.with(|u| u.locale), i18n::Msg::AppName)/>

        <Router>
            <LocaleSync/>
            <NoticeBanner/>
            <Routes fallback=|| view! { <NotFoundPage/> }>
                <Route path=StaticSegment("login") view=LoginPage/>
                <Route path=StaticSegment("register") view=RegisterPage/>
                <Route path=StaticSegment("forgot-password") view=ForgotPasswordPage/>
                <Route path=StaticSegment("reset-password") view=ResetPasswordPage/>
                <Route
                    path=StaticSegment("")
                    view=|| view! { <RequireAuth page=Page::Home><HomePage/></RequireAuth> }
                />
                <Route
                    path=StaticSegment("admin")
                    view=|| view! { <RequireAuth page=Page::Admin><AdminPage/></RequireAuth> }
                />
                <Route
                    path=StaticSegment("manager")
                    view=|| view! { <RequireAuth page=Page::Manager><ManagerPage/></RequireAuth> }
                />
                <Route
                    path=StaticSegment("shared")
                    view=|| view! { <RequireAuth page=Page::Shared><SharedPage/></RequireAuth> }
                />
            </Routes>
        </Router>
    }
    .into_any()
}
