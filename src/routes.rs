//! Static route table and navigation authorization.
//!
//! ARCHITECTURE
//! ============
//! `ROUTES` is the single source of guard requirements. The `App` router
//! mounts one Leptos route per entry and wraps protected pages in
//! `RequireAuth`, which calls [`authorize`] on every navigation.

#[cfg(test)]
#[path = "routes_test.rs"]
mod routes_test;

use time::OffsetDateTime;

use crate::state::auth::AuthStore;
use crate::util::auth::{GuardDecision, evaluate_guard};

/// Route-level screens.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Page {
    Home,
    Login,
    Register,
    ForgotPassword,
    ResetPassword,
    Admin,
    Manager,
    Shared,
}

/// Who may open a route.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Access {
    Public,
    /// Any signed-in user.
    Authenticated,
    /// Signed-in users holding at least one of these roles.
    AnyRole(&'static [&'static str]),
}

impl Access {
    pub fn required_roles(self) -> &'static [&'static str] {
        match self {
            Self::AnyRole(roles) => roles,
            Self::Public | Self::Authenticated => &[],
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RouteSpec {
    pub path: &'static str,
    pub page: Page,
    pub access: Access,
    /// Fixed return target used instead of the requested path.
    pub fallback: Option<&'static str>,
}

pub const ROUTES: &[RouteSpec] = &[
    RouteSpec { path: "/", page: Page::Home, access: Access::Authenticated, fallback: Some("/") },
    RouteSpec { path: "/login", page: Page::Login, access: Access::Public, fallback: None },
    RouteSpec { path: "/register", page: Page::Register, access: Access::Public, fallback: None },
    RouteSpec { path: "/forgot-password", page: Page::ForgotPassword, access: Access::Public, fallback: None },
    RouteSpec { path: "/reset-password", page: Page::ResetPassword, access: Access::Public, fallback: None },
    RouteSpec { path: "/admin", page: Page::Admin, access: Access::AnyRole(&["admin"]), fallback: None },
    RouteSpec { path: "/manager", page: Page::Manager, access: Access::AnyRole(&["manager"]), fallback: None },
    RouteSpec { path: "/shared", page: Page::Shared, access: Access::AnyRole(&["admin", "manager"]), fallback: None },
];

/// Find the route for a path; query and fragment are ignored, as is a
/// trailing `/` on non-root paths.
pub fn resolve(path: &str) -> Option<&'static RouteSpec> {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let path = if path.len() > 1 { path.trim_end_matches('/') } else { path };
    let path = if path.is_empty() { "/" } else { path };
    ROUTES.iter().find(|spec| spec.path == path)
}

pub fn spec_for(page: Page) -> &'static RouteSpec {
    ROUTES
        .iter()
        .find(|spec| spec.page == page)
        .unwrap_or(&ROUTES[0])
}

/// Guard decision for `spec` against the current session, without side
/// effects.
pub fn authorize(spec: &RouteSpec, requested: &str, store: &AuthStore, now: OffsetDateTime) -> GuardDecision {
    if spec.access == Access::Public {
        return GuardDecision::Allow;
    }
    let record = store.session_record();
    evaluate_guard(record.as_ref(), spec.access.required_roles(), requested, spec.fallback, now)
}

/// What the router should do for a navigation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Navigation {
    Render(Page),
    Redirect(String),
    NotFound,
}

/// Resolve and authorize `requested` (path plus query), applying the
/// forbidden-role policy: the session is cleared before redirecting.
pub fn navigate(requested: &str, store: &mut AuthStore, now: OffsetDateTime) -> Navigation {
    let Some(spec) = resolve(requested) else {
        return Navigation::NotFound;
    };
    let decision = authorize(spec, requested, store, now);
    apply_decision(spec.page, &decision, store)
}

/// Turn a guard decision into a navigation. A role mismatch clears the
/// session; so does a denial while the store still holds a user, which
/// means the record expired or was removed underneath it.
pub fn apply_decision(page: Page, decision: &GuardDecision, store: &mut AuthStore) -> Navigation {
    match decision {
        GuardDecision::Forbidden { return_to } => {
            log::info!("role check failed for {return_to}; clearing session");
            store.logout();
        }
        GuardDecision::Unauthenticated { .. } if store.user().is_some() => {
            log::info!("session no longer usable; signing out");
            store.logout();
        }
        _ => {}
    }
    match decision.redirect_url() {
        Some(url) => Navigation::Redirect(url),
        None => Navigation::Render(page),
    }
}
