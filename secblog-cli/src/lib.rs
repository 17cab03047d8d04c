use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use secblog_ai::draft::{compose_blog, LlmSectionGenerator};
use secblog_ai::llm::openai_chat::OpenAiChat;
use secblog_ai::openai::OpenAiClient;
use secblog_ai::pipeline::RagPipeline;
use secblog_ai::publish::{generate_and_publish, PublishOutcome};
use secblog_core::cms::{Publisher, WordPressClient};
use secblog_core::config::{staging_dir_from_env, OpenAiSettings, RagSettings};
use secblog_core::domain::{PublishRequest, DEFAULT_QUESTION};
use secblog_core::error::AppError;
use secblog_core::staging::StagingArea;
use serde_json::Value;

#[derive(Parser, Debug)]
#[command(
    name = "secblog",
    version,
    about = "Answer questions from security PDFs and publish generated blog posts"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Ingest a PDF and answer one question from it
    Ask {
        #[arg(long)]
        pdf: PathBuf,
        #[arg(long, default_value = DEFAULT_QUESTION)]
        question: String,
        /// Overrides SECBLOG_TOP_K
        #[arg(long)]
        top_k: Option<usize>,
    },
    /// Generate every outline section and print the HTML without publishing
    Draft {
        #[arg(long)]
        topic: String,
    },
    /// Create a post, generate its sections and publish them
    Publish {
        #[arg(long)]
        topic: String,
        /// Defaults to the topic
        #[arg(long)]
        title: Option<String>,
        /// Comma-separated tags
        #[arg(long)]
        tags: Option<String>,
    },
    /// Replace the title of an existing post
    Retitle {
        #[arg(long)]
        post_id: u64,
        #[arg(long)]
        title: String,
    },
    /// Replace the tags of an existing post
    Tag {
        #[arg(long)]
        post_id: u64,
        #[arg(long)]
        tags: String,
    },
}

/// Ingest `pdf` into `pipeline`, then answer `question` from it.
pub fn answer_from_pdf(
    pipeline: &mut RagPipeline,
    pdf: &Path,
    question: &str,
) -> Result<String, AppError> {
    let ingest = pipeline.ingest_document(pdf)?;
    tracing::info!(
        source = %ingest.source,
        pages = ingest.pages,
        chunks = ingest.chunks,
        index_size = ingest.index_size,
        "reference pdf indexed"
    );
    pipeline.answer_question(question)
}

pub fn ask_pdf(pdf: &Path, question: &str, top_k: Option<usize>) -> Result<String, AppError> {
    let openai = OpenAiSettings::from_env()?;
    let mut rag = RagSettings::from_env()?;
    if let Some(k) = top_k {
        rag.top_k = k;
    }

    let mut pipeline = RagPipeline::openai(&openai, rag)?;
    answer_from_pdf(&mut pipeline, pdf, question)
}

fn section_chat() -> Result<(OpenAiChat, String), AppError> {
    let openai = OpenAiSettings::from_env()?;
    let chat = OpenAiChat::new(OpenAiClient::from_settings(&openai)?);
    Ok((chat, openai.section_model))
}

pub fn draft_blog(topic: &str) -> Result<String, AppError> {
    let (chat, model) = section_chat()?;
    let generator = LlmSectionGenerator::new(&chat, model);
    compose_blog(&generator, topic)
}

pub fn publish_blog(req: &PublishRequest) -> Result<PublishOutcome, AppError> {
    let (chat, model) = section_chat()?;
    let generator = LlmSectionGenerator::new(&chat, model);
    let cms = WordPressClient::from_env()?;
    let staging = StagingArea::open(staging_dir_from_env());
    generate_and_publish(&cms, &generator, &staging, req)
}

pub fn retitle_post(post_id: u64, title: &str) -> Result<Value, AppError> {
    WordPressClient::from_env()?.update_title(post_id, title)
}

pub fn tag_post(post_id: u64, tags: &str) -> Result<Value, AppError> {
    WordPressClient::from_env()?.update_tags(post_id, tags)
}

fn to_pretty_json<T: serde::Serialize>(value: &T) -> Result<String, AppError> {
    serde_json::to_string_pretty(value).map_err(|e| {
        AppError::new("CLI_OUTPUT_FAILED", "Failed to serialize command output")
            .with_details(e.to_string())
    })
}

/// Execute one command and return what should be printed to stdout.
pub fn run(command: Command) -> Result<String, AppError> {
    match command {
        Command::Ask {
            pdf,
            question,
            top_k,
        } => ask_pdf(&pdf, &question, top_k),
        Command::Draft { topic } => draft_blog(&topic),
        Command::Publish { topic, title, tags } => {
            let mut req = PublishRequest::for_topic(topic);
            if let Some(title) = title {
                req = req.with_title(title);
            }
            if let Some(tags) = tags {
                req = req.with_tags(tags);
            }
            to_pretty_json(&publish_blog(&req)?)
        }
        Command::Retitle { post_id, title } => to_pretty_json(&retitle_post(post_id, &title)?),
        Command::Tag { post_id, tags } => to_pretty_json(&tag_post(post_id, &tags)?),
    }
}
