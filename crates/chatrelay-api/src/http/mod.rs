//! HTTP API layer for chatrelay.
//!
//! Axum-based JSON API: session creation, chat turns, history lookup and a
//! health check, with CORS and request tracing.

pub mod error;
pub mod handlers;
pub mod router;
