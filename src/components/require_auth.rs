//! Route guard wrapper for protected views.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every protected route renders through `RequireAuth`. The guard decision
//! is recomputed whenever the location or the auth store changes; denials
//! redirect to login carrying the return target, and a role mismatch also
//! clears the session before redirecting.

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::{use_location, use_navigate};

use crate::components::layout::Layout;
use crate::routes::{self, Navigation, Page};
use crate::state::auth::{AuthHandle, AuthStore, now};
use crate::util::auth::{GuardDecision, requested_path};

#[component]
pub fn RequireAuth(page: Page, children: ChildrenFn) -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthStore>>();
    let location = use_location();
    let navigate = use_navigate();
    let spec = routes::spec_for(page);

    let decision = Memo::new(move |_| {
        let requested = requested_path(&location.pathname.get(), &location.search.get());
        auth.with(|store| routes::authorize(spec, &requested, store, now()))
    });

    // Returns the last redirect issued so a follow-up decision for the same
    // target (forbidden, then unauthenticated after the logout) is skipped.
    Effect::new(move |last: Option<Option<String>>| {
        let decision = decision.get();
        if decision == GuardDecision::Allow {
            return None;
        }
        let navigation = auth.with_store(|store| routes::apply_decision(page, &decision, store));
        let Some(Navigation::Redirect(url)) = navigation else {
            return None;
        };
        if last.flatten().as_deref() != Some(url.as_str()) {
            navigate(&url, NavigateOptions { replace: true, ..NavigateOptions::default() });
        }
        Some(url)
    });

    let content = StoredValue::new(children);

    view! {
        <Show when=move || decision.get() == GuardDecision::Allow>
            <Layout>{content.with_value(|children| children())}</Layout>
        </Show>
    }
}
