//! Client state containers provided through Leptos context.
//!
//! DESIGN
//! ======
//! `auth` owns the signed-in user and writes through to `session`; `ui`
//! holds presentation-only state. Neither knows about views.

pub mod auth;
pub mod session;
pub mod ui;
