//! Home page: the authenticated landing route.
//!
//! SYSTEM CONTEXT
//! ==============
//! Links to the role-gated pages (and to a missing page, to exercise the
//! 404 route) and shows the account overview fetched from the backend.

use leptos::prelude::*;

use crate::net::api::BrowserGateway;
use crate::services::auth::{AccountOverview, load_account_overview};
use crate::state::auth::AuthStore;
use crate::state::ui::UiState;
use crate::util::i18n::{Msg, t};

/// Navigation links shown on the home page.
pub const HOME_LINKS: [(&str, Msg); 4] = [
    ("/admin", Msg::AdminTitle),
    ("/manager", Msg::ManagerTitle),
    ("/shared", Msg::SharedTitle),
    ("/missing-page", Msg::NotFoundTitle),
];

#[component]
pub fn HomePage() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthStore>>();
    let ui = expect_context::<RwSignal<UiState>>();
    let gateway = expect_context::<BrowserGateway>();
    let overview = RwSignal::new(None::<AccountOverview>);
    let locale = move || ui.with(|u| u.locale);

    if let Some(user_id) = auth.with_untracked(|s| s.user().map(|u| u.id.clone())) {
        leptos::task::spawn_local(async move {
            match load_account_overview(&gateway, &user_id).await {
                Ok(loaded) => overview.set(Some(loaded)),
                Err(e) => log::warn!("account overview unavailable: {e}"),
            }
        });
    }

    let greeting = move || auth.with(|s| s.user().map(|u| u.fullname.clone()).unwrap_or_default());

    view! {
        <section class="home">
            <h1>{move || t(locale(), Msg::HomeTitle)}</h1>
            <p class="home__greeting">{greeting}</p>
            <nav class="home__links">
                {HOME_LINKS
                    .into_iter()
                    .map(|(href, label)| view! { <a class="home__link" href=href>{move || t(locale(), label)}</a> })
                    .collect_view()}
            </nav>
            {move || {
                overview
                    .get()
                    .map(|o| {
                        let roles = o.roles.iter().map(|r| r.name.clone()).collect::<Vec<_>>().join(", ");
                        view! {
                            <dl class="home__account">
                                <dt>{move || t(locale(), Msg::Username)}</dt>
                                <dd>{o.details.username.clone()}</dd>
                                <dt>{move || t(locale(), Msg::Email)}</dt>
                                <dd>{o.details.email.clone()}</dd>
                                <dt>{move || t(locale(), Msg::Roles)}</dt>
                                <dd>{roles}</dd>
                            </dl>
                        }
                    })
            }}
        </section>
    }
}
