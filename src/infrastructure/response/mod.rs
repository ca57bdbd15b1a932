use once_cell::sync::Lazy;
use regex::Regex;

static THINK_TAG_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<think>[\s\S]*?</think>|<think\s*/>").unwrap());

static REASONING_TAG_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<reasoning>[\s\S]*?</reasoning>").unwrap());

static MARKDOWN_FENCE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^```(?:markdown|md)?[ \t]*\n([\s\S]*?)\n?```$").unwrap());

static MULTIPLE_NEWLINES_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());

/// Cleans a generated narrative so it can be embedded in the README body
pub fn clean_llm_response(response: &str) -> String {
    let mut cleaned = response.replace("\r\n", "\n");

    // Remove <think>...</think> and <think/> tags
    cleaned = THINK_TAG_PATTERN.replace_all(&cleaned, "").to_string();

    // Remove <reasoning>...</reasoning> tags (some models use this)
    cleaned = REASONING_TAG_PATTERN.replace_all(&cleaned, "").to_string();

    cleaned = cleaned.trim().to_string();

    // Unwrap a response that arrived as one fenced markdown block
    if let Some(caps) = MARKDOWN_FENCE_PATTERN.captures(&cleaned) {
        cleaned = caps[1].trim().to_string();
    }

    // Collapse multiple consecutive newlines into at most two
    cleaned = MULTIPLE_NEWLINES_PATTERN
        .replace_all(&cleaned, "\n\n")
        .to_string();

    cleaned
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_think_tags() {
        let input = "<think>Some reasoning here</think>The actual response";
        assert_eq!(clean_llm_response(input), "The actual response");
    }

    #[test]
    fn test_clean_self_closing_think() {
        let input = "<think />The actual response";
        assert_eq!(clean_llm_response(input), "The actual response");
    }

    #[test]
    fn test_clean_reasoning_tags() {
        let input = "<reasoning>Internal reasoning</reasoning>Final answer";
        assert_eq!(clean_llm_response(input), "Final answer");
    }

    #[test]
    fn test_unwrap_markdown_fence() {
        let input = "```markdown\n## Findings\n\nSales grew.\n```";
        assert_eq!(clean_llm_response(input), "## Findings\n\nSales grew.");
    }

    #[test]
    fn test_inner_fences_kept() {
        let input = "Intro\n\n```\ncode\n```\n\nOutro";
        assert_eq!(clean_llm_response(input), input);
    }

    #[test]
    fn test_clean_multiple_newlines() {
        let input = "Line 1\r\n\r\n\r\n\r\nLine 2";
        assert_eq!(clean_llm_response(input), "Line 1\n\nLine 2");
    }
}
