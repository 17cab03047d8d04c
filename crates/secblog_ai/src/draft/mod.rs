//! Outline-driven blog section generation.

use secblog_core::domain::BLOG_OUTLINE;
use secblog_core::error::AppError;
use secblog_core::staging::StagedDraft;

use crate::guardrails::clean_section_html;
use crate::llm::Llm;

mod prompts;

pub use prompts::blog_section_prompt;

/// Sections are generated deterministically.
pub const SECTION_TEMPERATURE: f32 = 0.0;

pub trait SectionGenerator {
    fn generate_section(&self, section: &str, topic: &str) -> Result<String, AppError>;
}

pub struct LlmSectionGenerator<'a> {
    llm: &'a dyn Llm,
    model: String,
}

impl<'a> LlmSectionGenerator<'a> {
    pub fn new(llm: &'a dyn Llm, model: impl Into<String>) -> Self {
        Self {
            llm,
            model: model.into(),
        }
    }
}

impl SectionGenerator for LlmSectionGenerator<'_> {
    fn generate_section(&self, section: &str, topic: &str) -> Result<String, AppError> {
        let prompt = blog_section_prompt(section, topic);
        let raw = self
            .llm
            .generate(&self.model, &prompt, Some(SECTION_TEMPERATURE))?;
        clean_section_html(section, &raw)
    }
}

fn validate_topic(topic: &str) -> Result<(), AppError> {
    if topic.trim().is_empty() {
        return Err(AppError::new("INPUT_TOPIC_EMPTY", "Blog topic must not be empty"));
    }
    Ok(())
}

/// Generate every outline section in order, appending each to `draft`.
pub fn stage_sections(
    generator: &dyn SectionGenerator,
    topic: &str,
    outline: &[&str],
    draft: &mut StagedDraft,
) -> Result<usize, AppError> {
    validate_topic(topic)?;
    for section in outline {
        let html = generator.generate_section(section, topic)?;
        draft.append_block(&html)?;
        tracing::debug!(section, topic, "section staged");
    }
    tracing::info!(topic, sections = outline.len(), "blog sections staged");
    Ok(outline.len())
}

/// Same as [`stage_sections`] but kept in memory, one block per line ending.
pub fn compose_sections(
    generator: &dyn SectionGenerator,
    topic: &str,
    outline: &[&str],
) -> Result<String, AppError> {
    validate_topic(topic)?;
    let mut out = String::new();
    for section in outline {
        out.push_str(&generator.generate_section(section, topic)?);
        out.push('\n');
    }
    Ok(out)
}

pub fn compose_blog(generator: &dyn SectionGenerator, topic: &str) -> Result<String, AppError> {
    compose_sections(generator, topic, &BLOG_OUTLINE)
}
