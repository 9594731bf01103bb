//! Knowledge context: the static background text injected into the
//! system prompt.
//!
//! Assembled once at startup from a profile document and a plain-text
//! summary, then shared read-only for the process lifetime.

use serde::{Deserialize, Serialize};

/// Immutable bundle of background text the persona answers from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeContext {
    /// Professional summary (plain text)
    pub summary: String,

    /// Profile transcript (text extracted from the profile document)
    pub profile: String,
}

impl KnowledgeContext {
    pub fn new(summary: impl Into<String>, profile: impl Into<String>) -> Self {
        Self {
            summary: summary.into(),
            profile: profile.into(),
        }
    }

    /// Rough size in tokens (4 chars ≈ 1 token).
    pub fn estimated_tokens(&self) -> usize {
        (self.summary.len() + self.profile.len()) / 4
    }
}
