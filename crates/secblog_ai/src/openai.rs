use secblog_core::config::OpenAiSettings;
use secblog_core::error::AppError;

/// Connection details for an OpenAI-compatible API.
#[derive(Clone)]
pub struct OpenAiClient {
    base_url: String,
    api_key: String,
}

impl std::fmt::Debug for OpenAiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl OpenAiClient {
    pub fn new(base_url: &str, api_key: &str) -> Result<Self, AppError> {
        let base_url = base_url.trim().trim_end_matches('/').to_string();

        let rest = base_url
            .strip_prefix("https://")
            .or_else(|| base_url.strip_prefix("http://"));
        let host = rest.and_then(|r| r.split('/').next()).unwrap_or("");
        if host.is_empty() || host.contains('@') {
            return Err(AppError::new(
                "CONFIG_INVALID_URL",
                "OpenAI base URL must be an http(s) URL with a host",
            )
            .with_details(format!("base_url={base_url}")));
        }

        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(AppError::new("CONFIG_MISSING_ENV", "OpenAI API key is empty")
                .with_details("var=OPENAI_API_KEY"));
        }

        Ok(Self {
            base_url,
            api_key: api_key.to_string(),
        })
    }

    pub fn from_settings(settings: &OpenAiSettings) -> Result<Self, AppError> {
        Self::new(&settings.base_url, &settings.api_key)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub(crate) fn authorization(&self) -> String {
        format!("Bearer {}", self.api_key)
    }

    /// Map a ureq failure onto the external-service error taxonomy.
    pub(crate) fn request_error(code: &str, what: &str, err: ureq::Error) -> AppError {
        match err {
            ureq::Error::Status(status, resp) => {
                let body = resp
                    .into_string()
                    .unwrap_or_else(|_| "<body unavailable>".to_string());
                AppError::new(code, format!("{what} request failed"))
                    .with_details(format!("status={status}; body={body}"))
                    .with_retryable(status == 429 || status >= 500)
            }
            other => AppError::new(code, format!("Failed to call {what} endpoint"))
                .with_details(other.to_string())
                .with_retryable(true),
        }
    }
}
