use serde::{Deserialize, Serialize};
use std::fmt;

/// Single structured error shape used across every layer of the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppError {
    pub code: String,
    pub message: String,
    pub details: Option<String>,
    pub retryable: bool,
}

/// Coarse error taxonomy, derived from the code prefix.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ErrorClass {
    /// `INPUT_*`: bad path, malformed PDF, empty question or topic.
    Input,
    /// `EXTERNAL_*`: embeddings, language model or CMS failures.
    ExternalService,
    /// `CONFIG_*`: missing credentials or invalid settings.
    Configuration,
    Internal,
}

impl AppError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
            retryable: false,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_retryable(mut self, retryable: bool) -> Self {
        self.retryable = retryable;
        self
    }

    pub fn class(&self) -> ErrorClass {
        if self.code.starts_with("INPUT_") {
            ErrorClass::Input
        } else if self.code.starts_with("EXTERNAL_") {
            ErrorClass::ExternalService
        } else if self.code.starts_with("CONFIG_") {
            ErrorClass::Configuration
        } else {
            ErrorClass::Internal
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(d) = self.details.as_deref() {
            write!(f, " ({d})")?;
        }
        Ok(())
    }
}

impl std::error::Error for AppError {}
