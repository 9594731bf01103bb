//! The dialogue engine, the heart of careerchat.
//!
//! Each user turn follows a **Call → Dispatch → Repeat** cycle:
//!
//! 1. **Build context**: system prompt + caller history + the new user message
//! 2. **Call the model** via the configured [`CompletionClient`]
//! 3. **If tool calls**: dispatch each through the registry in order, append
//!    one result per call, loop back to step 2
//! 4. **If a final message**: return it to the caller
//!
//! The loop is capped at a configurable number of model calls; a turn that
//! reaches the cap fails with `ToolLoopExceeded`.
//!
//! [`CompletionClient`]: careerchat_core::CompletionClient

pub mod engine;
pub mod prompt;

pub use engine::{DEFAULT_COMPLETION_TIMEOUT, DEFAULT_MAX_TOOL_ITERATIONS, DialogueEngine};
pub use prompt::PromptBuilder;
