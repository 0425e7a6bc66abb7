//! Shared domain types for chatrelay.
//!
//! Sessions, stored messages, LLM request/response shapes, configuration,
//! and the error enums used across the workspace.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror.

pub mod chat;
pub mod config;
pub mod error;
pub mod llm;
