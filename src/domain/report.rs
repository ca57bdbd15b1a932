use serde::Serialize;
use std::path::PathBuf;

/// Where the README prose came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NarrativeSource {
    Generated,
    /// The service failed and the fixed notice was used instead
    FailureNotice,
}

#[derive(Debug, Clone)]
pub struct Narrative {
    pub text: String,
    pub source: NarrativeSource,
}

impl Narrative {
    pub fn generated(text: String) -> Self {
        Self {
            text,
            source: NarrativeSource::Generated,
        }
    }

    pub fn failure_notice(text: &str) -> Self {
        Self {
            text: text.to_string(),
            source: NarrativeSource::FailureNotice,
        }
    }

    pub fn is_generated(&self) -> bool {
        self.source == NarrativeSource::Generated
    }
}

/// The written README
#[derive(Debug, Clone)]
pub struct NarrativeDocument {
    pub path: PathBuf,
    pub content: String,
    pub source: NarrativeSource,
}
