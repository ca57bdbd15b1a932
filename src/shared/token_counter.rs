//! Character-based token estimation for prompt budgeting
//!
//! Approximation: ~4 characters per token, close enough for chat models
//! without pulling in a provider-specific tokenizer.

/// Provider-agnostic token counter
pub struct TokenCounter;

impl TokenCounter {
    /// Estimate token count for text
    pub fn estimate_tokens(text: &str) -> usize {
        if text.is_empty() {
            return 0;
        }
        (text.len() + 3) / 4
    }

    /// Estimate tokens for a message array, including per-message wrapper overhead
    ///
    /// # Arguments
    /// * `messages` - Array of (role, content) tuples
    pub fn estimate_messages_tokens(messages: &[(&str, &str)]) -> usize {
        let base_tokens = messages.len() * 4;
        let content_tokens: usize = messages
            .iter()
            .map(|(role, content)| {
                let full_message = format!("{}: {}", role, content);
                Self::estimate_tokens(&full_message)
            })
            .sum();
        base_tokens + content_tokens
    }

    /// Cut `text` so its estimate stays within `max_tokens`.
    ///
    /// Cuts on a char boundary and appends a marker when anything was dropped.
    pub fn truncate_to_tokens(text: &str, max_tokens: usize) -> String {
        if Self::estimate_tokens(text) <= max_tokens {
            return text.to_string();
        }

        const MARKER: &str = "\n...[truncated]";
        let budget = (max_tokens * 4).saturating_sub(MARKER.len());
        let mut end = budget.min(text.len());
        while end > 0 && !text.is_char_boundary(end) {
            end -= 1;
        }

        format!("{}{}", &text[..end], MARKER)
    }
}
