// ABOUTME: LLM module - client abstraction for language model providers.
// ABOUTME: Defines types, the transport trait, and the OpenRouter implementation.

mod client;
pub mod openai;
mod openrouter;
mod types;

pub use client::*;
pub use openrouter::*;
pub use types::*;
