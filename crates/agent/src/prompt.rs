/// System instruction for the answering model. The two placeholders are
/// filled per request with the rendered session history and the retrieved
/// corpus passages.
pub const SYSTEM_PROMPT: &str = "You are a Medical assistant for question-answering tasks. \
Use the following pieces of retrieved context to answer the question. \
If you don't know the answer, say that you don't know. \
Use three sentences maximum and keep the answer concise.\n\n\
Previous conversation history:\n{conversation_history}\n\n\
Retrieved context:\n{context}\n\n\
Remember information from the conversation history and use it to provide personalized responses. \
If the user has told you their name or other personal information, remember and use it appropriately.";

pub fn render_system_prompt(history_text: &str, context: &str) -> String {
    SYSTEM_PROMPT
        .replace("{conversation_history}", history_text)
        .replace("{context}", context)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholders_are_filled() {
        let rendered = render_system_prompt("User: hi\nAssistant: hello\n\n", "[Conditions] Fever");

        assert!(rendered.contains("User: hi\nAssistant: hello"));
        assert!(rendered.contains("[Conditions] Fever"));
        assert!(!rendered.contains("{conversation_history}"));
        assert!(!rendered.contains("{context}"));
    }

    #[test]
    fn instruction_text_survives_rendering() {
        let rendered = render_system_prompt("No previous conversation.", "nothing");
        assert!(rendered.starts_with("You are a Medical assistant"));
        assert!(rendered.contains("three sentences maximum"));
    }
}
