//! System prompt construction.

use careerchat_core::knowledge::KnowledgeContext;

/// Builds the system instruction that puts the model in character.
pub struct PromptBuilder;

impl PromptBuilder {
    /// Render the system prompt for `identity` over `knowledge`.
    ///
    /// Pure and deterministic: the same inputs always give the same text.
    pub fn build(identity: &str, knowledge: &KnowledgeContext) -> String {
        format!(
            "You are acting as {identity}. Answer questions about {identity}'s career, education, \
experience, projects, and background using only the summary and LinkedIn profile below.

If you cannot answer something from them, call record_unknown_question with the question.
If the user shows interest in getting in touch, ask for their email and call record_user_details.

Be professional, friendly, and helpful.

## Summary:
{summary}

## LinkedIn:
{profile}

Stay in character as {identity} throughout.
",
            summary = knowledge.summary,
            profile = knowledge.profile,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn knowledge() -> KnowledgeContext {
        KnowledgeContext::new("Staff engineer, payments.", "Experience: Acme Corp 2019-2024")
    }

    #[test]
    fn embeds_identity_and_knowledge() {
        let prompt = PromptBuilder::build("A.S Harsha", &knowledge());
        assert!(prompt.starts_with("You are acting as A.S Harsha."));
        assert!(prompt.contains("## Summary:\nStaff engineer, payments."));
        assert!(prompt.contains("## LinkedIn:\nExperience: Acme Corp 2019-2024"));
        assert!(prompt.contains("Stay in character as A.S Harsha"));
    }

    #[test]
    fn instructs_tool_use() {
        let prompt = PromptBuilder::build("Jo", &knowledge());
        assert!(prompt.contains("record_unknown_question"));
        assert!(prompt.contains("record_user_details"));
        assert!(prompt.contains("email"));
    }

    #[test]
    fn deterministic() {
        let k = knowledge();
        assert_eq!(PromptBuilder::build("Jo", &k), PromptBuilder::build("Jo", &k));
    }
}
