//! Chat-completion clients for careerchat.
//!
//! All clients implement the `careerchat_core::CompletionClient` trait.
//! Ollama, OpenAI, OpenRouter, vLLM and friends all speak the same
//! `/chat/completions` dialect, so one adapter covers them.

pub mod openai_compat;

pub use openai_compat::OpenAiCompatClient;
