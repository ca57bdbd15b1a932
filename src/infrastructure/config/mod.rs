use crate::domain::error::{AppError, Result};
use crate::domain::llm_config::{LLMConfig, DEFAULT_API_URL};
use crate::infrastructure::csv::encoding;
use encoding_rs::Encoding;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "autolysis.toml";
pub const ENV_PREFIX: &str = "AUTOLYSIS_";

/// Run settings, layered: defaults, then `autolysis.toml`, then `AUTOLYSIS_*` env vars.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api_url: String,
    pub model: String,
    pub timeout_secs: u64,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    /// Name of the environment variable holding the API token
    pub credential_env: String,
    pub output_dir: PathBuf,
    pub image_size: u32,
    pub top_categories: usize,
    pub default_encoding: String,
    pub max_prompt_tokens: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        let llm = LLMConfig::default();
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            model: llm.model,
            timeout_secs: llm.timeout_secs,
            max_tokens: None,
            temperature: None,
            credential_env: "AI_PROXY".to_string(),
            output_dir: PathBuf::from("output"),
            image_size: 512,
            top_categories: 10,
            default_encoding: "windows-1252".to_string(),
            max_prompt_tokens: 6000,
        }
    }
}

impl AppConfig {
    /// Load settings. An explicit `path` must exist; the default file is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(path) => {
                if !path.is_file() {
                    return Err(AppError::ConfigError(format!(
                        "Config file not found: {}",
                        path.display()
                    )));
                }
                path.to_path_buf()
            }
            None => PathBuf::from(CONFIG_FILE),
        };

        let config: Self = Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(&file))
            .merge(Env::prefixed(ENV_PREFIX))
            .extract()
            .map_err(|e| AppError::ConfigError(e.to_string()))?;

        config.validate()?;
        tracing::debug!("Loaded config: {:?}", config);
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.api_url.starts_with("http://") || self.api_url.starts_with("https://")) {
            return Err(AppError::ConfigError(format!(
                "api_url must be an http(s) URL, got '{}'",
                self.api_url
            )));
        }
        if self.model.trim().is_empty() {
            return Err(AppError::ConfigError("model must not be empty".to_string()));
        }
        if self.timeout_secs == 0 {
            return Err(AppError::ConfigError(
                "timeout_secs must be greater than zero".to_string(),
            ));
        }
        if let Some(temperature) = self.temperature {
            if !(0.0..=2.0).contains(&temperature) {
                return Err(AppError::ConfigError(format!(
                    "temperature must be within 0.0..=2.0, got {}",
                    temperature
                )));
            }
        }
        if self.credential_env.trim().is_empty() {
            return Err(AppError::ConfigError(
                "credential_env must name an environment variable".to_string(),
            ));
        }
        if !(64..=4096).contains(&self.image_size) {
            return Err(AppError::ConfigError(format!(
                "image_size must be within 64..=4096, got {}",
                self.image_size
            )));
        }
        if self.top_categories == 0 {
            return Err(AppError::ConfigError(
                "top_categories must be at least 1".to_string(),
            ));
        }
        if self.max_prompt_tokens == 0 {
            return Err(AppError::ConfigError(
                "max_prompt_tokens must be greater than zero".to_string(),
            ));
        }
        self.fallback_encoding()?;
        Ok(())
    }

    /// 8-bit encoding used when a file is neither BOM-marked nor valid UTF-8
    pub fn fallback_encoding(&self) -> Result<&'static Encoding> {
        encoding::resolve_label(&self.default_encoding).map_err(|_| {
            AppError::ConfigError(format!(
                "Unknown default_encoding '{}'",
                self.default_encoding
            ))
        })
    }

    /// Read the API token from the process environment.
    pub fn read_credential(&self) -> Result<String> {
        self.credential_from(|name| std::env::var(name).ok())
    }

    pub fn credential_from<F>(&self, lookup: F) -> Result<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        lookup(&self.credential_env)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .ok_or_else(|| {
                AppError::MissingCredential(format!(
                    "Environment variable {} is not set",
                    self.credential_env
                ))
            })
    }

    pub fn llm_config(&self, api_key: String) -> LLMConfig {
        LLMConfig {
            api_url: self.api_url.clone(),
            model: self.model.clone(),
            api_key: Some(api_key),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            timeout_secs: self.timeout_secs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn temp_file(content: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("autolysis_{}.toml", uuid::Uuid::new_v4()));
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.credential_env, "AI_PROXY");
        assert_eq!(config.output_dir, PathBuf::from("output"));
    }

    #[test]
    fn test_load_from_toml_file() {
        let path = temp_file("model = \"gpt-4o\"\nimage_size = 256\ntop_categories = 5\n");
        let config = AppConfig::load(Some(&path)).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.image_size, 256);
        assert_eq!(config.top_categories, 5);
        // Untouched keys keep their defaults
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_invalid_file_value_rejected() {
        let path = temp_file("timeout_secs = 0\n");
        let result = AppConfig::load(Some(&path));
        fs::remove_file(&path).unwrap();

        assert!(matches!(result, Err(AppError::ConfigError(_))));
    }

    #[test]
    fn test_missing_explicit_file() {
        let path = std::env::temp_dir().join("autolysis_does_not_exist.toml");
        assert!(matches!(
            AppConfig::load(Some(&path)),
            Err(AppError::ConfigError(_))
        ));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let bad_url = AppConfig {
            api_url: "ftp://example.com".to_string(),
            ..AppConfig::default()
        };
        assert!(bad_url.validate().is_err());

        let bad_encoding = AppConfig {
            default_encoding: "klingon".to_string(),
            ..AppConfig::default()
        };
        assert!(matches!(
            bad_encoding.validate(),
            Err(AppError::ConfigError(_))
        ));

        let bad_temperature = AppConfig {
            temperature: Some(3.5),
            ..AppConfig::default()
        };
        assert!(bad_temperature.validate().is_err());
    }

    #[test]
    fn test_credential_lookup() {
        let config = AppConfig::default();

        let key = config
            .credential_from(|name| (name == "AI_PROXY").then(|| " secret ".to_string()))
            .unwrap();
        assert_eq!(key, "secret");

        assert!(matches!(
            config.credential_from(|_| None),
            Err(AppError::MissingCredential(_))
        ));
        assert!(matches!(
            config.credential_from(|_| Some("   ".to_string())),
            Err(AppError::MissingCredential(_))
        ));
    }

    #[test]
    fn test_llm_config_carries_settings() {
        let config = AppConfig {
            max_tokens: Some(800),
            ..AppConfig::default()
        };
        let llm = config.llm_config("token".to_string());

        assert_eq!(llm.api_key.as_deref(), Some("token"));
        assert_eq!(llm.max_tokens, Some(800));
        assert_eq!(llm.api_url, DEFAULT_API_URL);
    }
}
