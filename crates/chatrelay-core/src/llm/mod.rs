//! LLM provider abstractions for chatrelay.
//!
//! - `LlmProvider`: RPITIT trait for concrete provider implementations
//! - `BoxLlmProvider`: Object-safe wrapper for dynamic dispatch
//! - `CompletionGateway`: turns a conversation history plus a new user turn
//!   into exactly one provider call

pub mod box_provider;
pub mod gateway;
pub mod provider;

#[cfg(test)]
pub(crate) mod fake;
