use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::AppError;

pub mod wordpress;

pub use wordpress::WordPressClient;

/// Identifiers assigned by the CMS to a freshly created post.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(try_from = "RawCreatedPost")]
pub struct CreatedPost {
    pub id: u64,
    pub global_id: String,
}

/// Create response as sent. WordPress.com uses `ID`/`global_ID`; some proxies
/// add lowercase copies alongside, so both spellings are read and the
/// uppercase one wins.
#[derive(Deserialize)]
struct RawCreatedPost {
    #[serde(rename = "ID")]
    upper_id: Option<u64>,
    id: Option<u64>,
    #[serde(rename = "global_ID", default, deserialize_with = "string_or_number")]
    upper_global_id: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    global_id: Option<String>,
}

impl TryFrom<RawCreatedPost> for CreatedPost {
    type Error = String;

    fn try_from(raw: RawCreatedPost) -> Result<Self, Self::Error> {
        let id = raw
            .upper_id
            .or(raw.id)
            .ok_or_else(|| "missing post id (ID or id)".to_string())?;
        let global_id = raw
            .upper_global_id
            .or(raw.global_id)
            .ok_or_else(|| "missing global id (global_ID or global_id)".to_string())?;
        Ok(Self { id, global_id })
    }
}

// WordPress.com returns a string hash; other backends return a number.
fn string_or_number<'de, D>(de: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(de)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected string or number for global id, got {other}"
        ))),
    }
}

/// Remote content-management surface used by the publish workflow.
pub trait Publisher {
    fn create_post(&self, title: &str) -> Result<CreatedPost, AppError>;
    fn update_content(&self, post_id: u64, content: &str) -> Result<Value, AppError>;
    fn update_title(&self, post_id: u64, title: &str) -> Result<Value, AppError>;
    fn update_tags(&self, post_id: u64, tags_csv: &str) -> Result<Value, AppError>;
}
