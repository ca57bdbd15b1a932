use std::fmt;

#[derive(Debug)]
pub enum AppError {
    LoadError(String),
    MissingCredential(String),
    RenderError(String),
    NarrativeError(String),
    ConfigError(String),
    IoError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::LoadError(msg) => write!(f, "Load error: {}", msg),
            AppError::MissingCredential(msg) => write!(f, "Missing credential: {}", msg),
            AppError::RenderError(msg) => write!(f, "Render error: {}", msg),
            AppError::NarrativeError(msg) => write!(f, "Narrative error: {}", msg),
            AppError::ConfigError(msg) => write!(f, "Config error: {}", msg),
            AppError::IoError(msg) => write!(f, "IO error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::IoError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
