use std::time::Duration;

use serde_json::{json, Value};

use super::{CreatedPost, Publisher};
use crate::config::CmsSettings;
use crate::error::AppError;

const CMS_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct WordPressClient {
    settings: CmsSettings,
}

impl WordPressClient {
    pub fn new(settings: CmsSettings) -> Self {
        Self { settings }
    }

    pub fn from_env() -> Result<Self, AppError> {
        Ok(Self::new(CmsSettings::from_env()?))
    }

    fn post_json(&self, url: &str, body: Value) -> Result<Value, AppError> {
        tracing::debug!(url, "cms request");
        let resp = ureq::post(url)
            .set("Authorization", &format!("Bearer {}", self.settings.api_token))
            .set("Content-Type", "application/json")
            .timeout(CMS_TIMEOUT)
            .send_json(body);

        match resp {
            Ok(r) => r.into_json::<Value>().map_err(|e| {
                AppError::new("EXTERNAL_CMS_FAILED", "Failed to decode CMS response")
                    .with_details(format!("url={url}; err={e}"))
            }),
            Err(ureq::Error::Status(status, r)) => {
                let body = r
                    .into_string()
                    .unwrap_or_else(|_| "<body unavailable>".to_string());
                Err(AppError::new("EXTERNAL_CMS_FAILED", "CMS request failed")
                    .with_details(format!("url={url}; status={status}; body={body}"))
                    .with_retryable(status == 429 || status >= 500))
            }
            Err(e) => Err(AppError::new("EXTERNAL_CMS_FAILED", "Failed to reach CMS")
                .with_details(format!("url={url}; err={e}"))
                .with_retryable(true)),
        }
    }

    fn edit(&self, post_id: u64, body: Value) -> Result<Value, AppError> {
        let url = self.settings.edit_url(post_id);
        self.post_json(&url, body)
    }
}

impl Publisher for WordPressClient {
    fn create_post(&self, title: &str) -> Result<CreatedPost, AppError> {
        let raw = self.post_json(
            &self.settings.create_url,
            json!({ "title": title, "content": "" }),
        )?;
        let post: CreatedPost = serde_json::from_value(raw).map_err(|e| {
            AppError::new("EXTERNAL_CMS_FAILED", "CMS create response missing post ids")
                .with_details(e.to_string())
        })?;
        tracing::info!(post_id = post.id, global_id = %post.global_id, "cms post created");
        Ok(post)
    }

    fn update_content(&self, post_id: u64, content: &str) -> Result<Value, AppError> {
        self.edit(post_id, json!({ "content": content }))
    }

    fn update_title(&self, post_id: u64, title: &str) -> Result<Value, AppError> {
        self.edit(post_id, json!({ "title": title }))
    }

    fn update_tags(&self, post_id: u64, tags_csv: &str) -> Result<Value, AppError> {
        self.edit(post_id, json!({ "tags": tags_csv }))
    }
}
