//! Role-gated content pages. Access is enforced by `RequireAuth`; these
//! only render.

use leptos::prelude::*;

use crate::state::ui::UiState;
use crate::util::i18n::{Msg, t};

#[component]
fn RolePage(title: Msg, text: Msg) -> impl IntoView {
    let ui = expect_context::<RwSignal<UiState>>();
    view! {
        <section class="role-page">
            <h1>{move || t(ui.with(|u| u.locale), title)}</h1>
            <p>{move || t(ui.with(|u| u.locale), text)}</p>
            <a class="role-page__home" href="/">{move || t(ui.with(|u| u.locale), Msg::ReturnHome)}</a>
        </section>
    }
}

#[component]
pub fn AdminPage() -> impl IntoView {
    view! { <RolePage title=Msg::AdminTitle text=Msg::AdminText/> }
}

#[component]
pub fn ManagerPage() -> impl IntoView {
    view! { <RolePage title=Msg::ManagerTitle text=Msg::ManagerText/> }
}

#[component]
pub fn SharedPage() -> impl IntoView {
    view! { <RolePage title=Msg::SharedTitle text=Msg::SharedText/> }
}
