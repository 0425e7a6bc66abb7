//! Session-scoped conversation flow.
//!
//! - `HistoryAssembler`: rebuilds the ordered LLM context for a session
//! - `SessionLocks`: per-session mutual exclusion for chat turns
//! - `ChatService`: validates, provisions, completes and persists a turn

pub mod history;
pub mod lock;
pub mod service;
