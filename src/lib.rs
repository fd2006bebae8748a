//! # portal
//!
//! Leptos client-rendered frontend for the account portal: login,
//! registration and password-reset flows, role-gated pages, language
//! selection and light/dark theming.
//!
//! Browser glue is gated behind the `csr` feature. Without it the crate
//! builds natively with inert storage and transport so the auth logic can
//! be unit tested.

pub mod app;
pub mod components;
pub mod config;
pub mod net;
pub mod pages;
pub mod routes;
pub mod services;
pub mod state;
pub mod util;

/// Install console logging and the panic hook, then mount the app.
#[cfg(feature = "csr")]
pub fn start() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    leptos::mount::mount_to_body(app::App);
}
