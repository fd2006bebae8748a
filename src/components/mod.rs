//! Reusable UI component modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Components render shared chrome (header, notices, preference controls)
//! and the route guard wrapper, reading and writing state from Leptos
//! context providers.

pub mod lang_select;
pub mod layout;
pub mod notice_banner;
pub mod require_auth;
pub mod theme_toggle;
