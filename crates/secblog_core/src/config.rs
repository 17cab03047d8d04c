//! Environment-driven settings.
//!
//! Each collaborator loads its own settings at first use, so a missing CMS
//! token never blocks a RAG query and vice versa. Every loader takes a lookup
//! function so tests can supply variables without touching the process env.

use std::path::PathBuf;
use std::str::FromStr;

use crate::error::AppError;

pub const ENV_OPENAI_API_KEY: &str = "OPENAI_API_KEY";
pub const ENV_OPENAI_BASE_URL: &str = "OPENAI_BASE_URL";
pub const ENV_EMBEDDING_MODEL: &str = "SECBLOG_EMBEDDING_MODEL";
pub const ENV_ANSWER_MODEL: &str = "SECBLOG_ANSWER_MODEL";
pub const ENV_SECTION_MODEL: &str = "SECBLOG_SECTION_MODEL";
pub const ENV_CHUNK_SIZE: &str = "SECBLOG_CHUNK_SIZE";
pub const ENV_CHUNK_OVERLAP: &str = "SECBLOG_CHUNK_OVERLAP";
pub const ENV_TOP_K: &str = "SECBLOG_TOP_K";
pub const ENV_WORDPRESS_API_KEY: &str = "WORDPRESS_API_KEY";
pub const ENV_WORDPRESS_NEW_BLOG_URL: &str = "WORDPRESS_NEW_BLOG_URL";
pub const ENV_WORDPRESS_EDIT_BLOG_URL: &str = "WORDPRESS_EDIT_BLOG_URL";
pub const ENV_STAGING_DIR: &str = "SECBLOG_STAGING_DIR";

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-large";
pub const DEFAULT_ANSWER_MODEL: &str = "gpt-4o";
pub const DEFAULT_SECTION_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_CHUNK_SIZE: usize = 1000;
pub const DEFAULT_CHUNK_OVERLAP: usize = 200;
pub const DEFAULT_TOP_K: usize = 4;
pub const DEFAULT_STAGING_DIR: &str = "./data/blog_content";

/// Placeholder substituted with the post id in the edit URL template.
pub const BLOG_ID_PLACEHOLDER: &str = "{blog_id}";

pub type Lookup<'a> = &'a dyn Fn(&str) -> Option<String>;

pub fn process_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

fn optional(lookup: Lookup<'_>, key: &str) -> Option<String> {
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn required(lookup: Lookup<'_>, key: &str) -> Result<String, AppError> {
    optional(lookup, key).ok_or_else(|| {
        AppError::new("CONFIG_MISSING_ENV", "Required environment variable is not set")
            .with_details(format!("var={key}"))
    })
}

fn parsed_or<T: FromStr>(lookup: Lookup<'_>, key: &str, default: T) -> Result<T, AppError> {
    match optional(lookup, key) {
        None => Ok(default),
        Some(raw) => raw.parse::<T>().map_err(|_| {
            AppError::new("CONFIG_INVALID_VALUE", "Environment variable has an invalid value")
                .with_details(format!("var={key}; value={raw}"))
        }),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenAiSettings {
    pub api_key: String,
    pub base_url: String,
    pub embedding_model: String,
    pub answer_model: String,
    pub section_model: String,
}

impl OpenAiSettings {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(&process_env)
    }

    pub fn from_lookup(lookup: Lookup<'_>) -> Result<Self, AppError> {
        Ok(Self {
            api_key: required(lookup, ENV_OPENAI_API_KEY)?,
            base_url: optional(lookup, ENV_OPENAI_BASE_URL)
                .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string()),
            embedding_model: optional(lookup, ENV_EMBEDDING_MODEL)
                .unwrap_or_else(|| DEFAULT_EMBEDDING_MODEL.to_string()),
            answer_model: optional(lookup, ENV_ANSWER_MODEL)
                .unwrap_or_else(|| DEFAULT_ANSWER_MODEL.to_string()),
            section_model: optional(lookup, ENV_SECTION_MODEL)
                .unwrap_or_else(|| DEFAULT_SECTION_MODEL.to_string()),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RagSettings {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub top_k: usize,
}

impl Default for RagSettings {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_overlap: DEFAULT_CHUNK_OVERLAP,
            top_k: DEFAULT_TOP_K,
        }
    }
}

impl RagSettings {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(&process_env)
    }

    pub fn from_lookup(lookup: Lookup<'_>) -> Result<Self, AppError> {
        Ok(Self {
            chunk_size: parsed_or(lookup, ENV_CHUNK_SIZE, DEFAULT_CHUNK_SIZE)?,
            chunk_overlap: parsed_or(lookup, ENV_CHUNK_OVERLAP, DEFAULT_CHUNK_OVERLAP)?,
            top_k: parsed_or(lookup, ENV_TOP_K, DEFAULT_TOP_K)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CmsSettings {
    pub api_token: String,
    pub create_url: String,
    /// Edit endpoint containing [`BLOG_ID_PLACEHOLDER`].
    pub edit_url_template: String,
}

impl CmsSettings {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(&process_env)
    }

    pub fn from_lookup(lookup: Lookup<'_>) -> Result<Self, AppError> {
        let edit_url_template = required(lookup, ENV_WORDPRESS_EDIT_BLOG_URL)?;
        if !edit_url_template.contains(BLOG_ID_PLACEHOLDER) {
            return Err(AppError::new(
                "CONFIG_INVALID_VALUE",
                "Edit URL must contain the {blog_id} placeholder",
            )
            .with_details(format!("var={ENV_WORDPRESS_EDIT_BLOG_URL}")));
        }
        Ok(Self {
            api_token: required(lookup, ENV_WORDPRESS_API_KEY)?,
            create_url: required(lookup, ENV_WORDPRESS_NEW_BLOG_URL)?,
            edit_url_template,
        })
    }

    pub fn edit_url(&self, blog_id: u64) -> String {
        self.edit_url_template
            .replace(BLOG_ID_PLACEHOLDER, &blog_id.to_string())
    }
}

pub fn staging_dir_from_env() -> PathBuf {
    staging_dir_from_lookup(&process_env)
}

pub fn staging_dir_from_lookup(lookup: Lookup<'_>) -> PathBuf {
    optional(lookup, ENV_STAGING_DIR)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_STAGING_DIR))
}
