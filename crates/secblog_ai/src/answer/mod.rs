use secblog_core::error::AppError;
use serde::{Deserialize, Serialize};

use crate::index::ScoredChunk;
use crate::llm::Llm;
use crate::retrieve::RetrievedQuery;

mod prompts;

pub use prompts::rag_answer_prompt;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnsweredQuery {
    pub question: String,
    pub context: Vec<ScoredChunk>,
    pub answer: String,
}

/// Chunk contents in context order, separated by a blank line.
pub fn context_block(query: &RetrievedQuery) -> String {
    query
        .context_chunks()
        .map(|c| c.content.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Render the fixed prompt and take the model's raw reply as the answer.
///
/// Sampling is left at the provider default; a failed call is not retried.
pub fn synthesize(
    llm: &dyn Llm,
    model: &str,
    query: RetrievedQuery,
) -> Result<AnsweredQuery, AppError> {
    let prompt = rag_answer_prompt(&query.question, &context_block(&query));
    let answer = llm.generate(model, &prompt, None)?;
    tracing::debug!(model, answer_chars = answer.len(), "answer synthesized");
    Ok(AnsweredQuery {
        question: query.question,
        context: query.context,
        answer,
    })
}
