use secblog_core::cms::{CreatedPost, Publisher};
use secblog_core::domain::{PublishRequest, BLOG_OUTLINE};
use secblog_core::error::AppError;
use secblog_core::staging::{StagedDraft, StagingArea};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::draft::{stage_sections, SectionGenerator};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PublishOutcome {
    pub post: CreatedPost,
    pub sections: usize,
    pub content_update: Value,
    pub tags_update: Option<Value>,
}

/// Push staged content to post `blog_id`. The staged file is released
/// whether or not the update succeeds.
pub fn post_staged_blog(
    publisher: &dyn Publisher,
    blog_id: u64,
    draft: StagedDraft,
) -> Result<Value, AppError> {
    let global_id = draft.global_id().to_string();
    let res = draft.deliver(|content| publisher.update_content(blog_id, content))?;
    tracing::info!(blog_id, %global_id, "staged content published");
    Ok(res)
}

/// Create the post, generate and stage every outline section, publish the
/// content, then apply tags if any were requested.
pub fn generate_and_publish(
    publisher: &dyn Publisher,
    generator: &dyn SectionGenerator,
    staging: &StagingArea,
    req: &PublishRequest,
) -> Result<PublishOutcome, AppError> {
    if req.topic.trim().is_empty() {
        return Err(AppError::new("INPUT_TOPIC_EMPTY", "Blog topic must not be empty"));
    }

    let post = publisher.create_post(&req.title)?;
    let mut draft = staging.begin(&post.global_id)?;
    let sections = stage_sections(generator, &req.topic, &BLOG_OUTLINE, &mut draft)?;
    let content_update = post_staged_blog(publisher, post.id, draft)?;

    let tags_update = match req.tags.as_deref().map(str::trim) {
        Some(tags) if !tags.is_empty() => Some(publisher.update_tags(post.id, tags)?),
        _ => None,
    };

    Ok(PublishOutcome {
        post,
        sections,
        content_update,
        tags_update,
    })
}
