//! Observability for chatrelay: tracing subscriber setup and shutdown.

pub mod tracing_setup;
