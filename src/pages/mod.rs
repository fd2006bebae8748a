//! Page modules for route-level screens.
//!
//! ARCHITECTURE
//! ============
//! Each page owns route-scoped orchestration and delegates rendering details
//! to `components`. Input validation lives in plain functions next to the
//! page so it can be tested without a DOM.

pub mod forgot_password;
pub mod home;
pub mod login;
pub mod not_found;
pub mod register;
pub mod reset_password;
pub mod role_pages;
