//! Async flows that combine gateway calls with state transitions.

pub mod auth;
