//! Networking modules for the auth backend.
//!
//! SYSTEM CONTEXT
//! ==============
//! `api` maps auth operations to REST calls, `transport` owns the HTTP
//! exchange (and the seam tests replace), and `types` defines the wire
//! schema plus the persisted session shape.

pub mod api;
pub mod transport;
pub mod types;
