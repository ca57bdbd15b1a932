use serde::{Deserialize, Serialize};

pub const DEFAULT_API_URL: &str = "https://aiproxy.sanand.workers.dev/openai/v1/chat/completions";

/// Settings for the narrative text-generation service
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LLMConfig {
    pub api_url: String,
    pub model: String,
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    pub timeout_secs: u64,
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            model: "gpt-4o-mini".to_string(),
            api_key: None,
            max_tokens: None,
            temperature: None,
            timeout_secs: 30,
        }
    }
}
