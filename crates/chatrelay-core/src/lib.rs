//! Business logic and repository trait definitions for chatrelay.
//!
//! This crate defines the "ports" (repository and provider traits) that the
//! infrastructure layer implements, plus the conversation flow built on top
//! of them. It depends only on `chatrelay-types` -- never on
//! `chatrelay-infra` or any database/HTTP crate.

pub mod chat;
pub mod llm;
pub mod repository;
