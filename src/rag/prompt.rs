//! Prompt construction for grounded question answering.

/// Literal the model is told to emit when the context lacks the answer.
/// Also the answer returned directly when retrieval finds nothing.
pub const FALLBACK_PHRASE: &str = "No information found.";

/// Renders the fixed instruction template around retrieved context.
///
/// Pure and deterministic: the same question and documents always produce
/// the same prompt.
pub struct PromptBuilder;

impl PromptBuilder {
    /// Build the completion prompt for `question` over `documents`.
    ///
    /// Documents are joined with a blank line into one context block. The
    /// instructions confine the model to that context and end with an
    /// "Answer:" cue, so generation stops at the next newline or question
    /// marker.
    pub fn build(question: &str, documents: &[String]) -> String {
        let context = documents.join("\n\n");
        format!(
            "Answer the question using only the context below. \
             Do not add information that is not in the context. \
             If the context does not contain the answer, reply exactly \
             \"{FALLBACK_PHRASE}\" and nothing else.\n\n\
             Context:\n{context}\n\n\
             Question: {question}\n\n\
             Answer:"
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_carries_question_context_and_cue() {
        let documents = vec![
            "Alice called about the invoice.".to_string(),
            "Bob confirmed payment.".to_string(),
        ];
        let prompt = PromptBuilder::build("Who confirmed payment?", &documents);

        assert!(prompt.contains("Question: Who confirmed payment?"));
        assert!(prompt.contains("Alice called about the invoice."));
        assert!(prompt.contains("Bob confirmed payment."));
        assert!(prompt.contains(FALLBACK_PHRASE));
        assert!(prompt.ends_with("Answer:"));
    }

    #[test]
    fn documents_are_separated_by_blank_lines() {
        let documents = vec!["first".to_string(), "second".to_string()];
        let prompt = PromptBuilder::build("q", &documents);
        assert!(prompt.contains("first\n\nsecond"));
    }

    #[test]
    fn same_inputs_build_the_same_prompt() {
        let documents = vec!["doc".to_string()];
        let a = PromptBuilder::build("q", &documents);
        let b = PromptBuilder::build("q", &documents);
        assert_eq!(a, b);
    }
}
