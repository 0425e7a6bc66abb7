//! Infrastructure layer for chatrelay.
//!
//! Contains implementations of the ports defined in `chatrelay-core`:
//! SQLite session/message storage, the OpenAI-compatible completion
//! provider, and the configuration loader.

pub mod config;
pub mod llm;
pub mod sqlite;
