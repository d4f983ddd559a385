//! Chat-completion fallback for symptom diagnosis.
//!
//! This crate builds the diagnosis prompt, calls an OpenAI-compatible
//! chat-completion endpoint, and extracts the structured JSON diagnosis from
//! the model's reply.

pub mod client;
pub mod extraction;
pub mod prompts;

pub use client::*;
pub use extraction::*;
pub use prompts::*;
