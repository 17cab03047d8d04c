//! Query state and the retrieval step.
//!
//! A question moves through three typed stages: [`PendingQuery`] →
//! [`RetrievedQuery`] → [`AnsweredQuery`](crate::answer::AnsweredQuery).
//! Each step consumes the previous stage, so a stage can only be reached in
//! order.

use secblog_core::error::AppError;
use serde::{Deserialize, Serialize};

use crate::index::{EmbeddingIndex, ScoredChunk};
use crate::ingest::Chunk;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PendingQuery {
    pub question: String,
}

impl PendingQuery {
    pub fn new(question: impl Into<String>) -> Result<Self, AppError> {
        let question = question.into();
        if question.trim().is_empty() {
            return Err(AppError::new("INPUT_QUESTION_EMPTY", "Question must not be empty"));
        }
        Ok(Self { question })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RetrievedQuery {
    pub question: String,
    /// Retrieved chunks, most similar first.
    pub context: Vec<ScoredChunk>,
}

impl RetrievedQuery {
    pub fn context_chunks(&self) -> impl Iterator<Item = &Chunk> {
        self.context.iter().map(|s| &s.chunk)
    }
}

/// Populate `context` from the index. Never mutates the index.
pub fn retrieve(
    index: &EmbeddingIndex,
    query: PendingQuery,
    top_k: usize,
) -> Result<RetrievedQuery, AppError> {
    let context = index.search(&query.question, top_k)?;
    tracing::debug!(hits = context.len(), top_k, "retrieval complete");
    Ok(RetrievedQuery {
        question: query.question,
        context,
    })
}
