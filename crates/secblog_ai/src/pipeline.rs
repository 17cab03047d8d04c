use std::path::Path;

use secblog_core::config::{OpenAiSettings, RagSettings};
use secblog_core::error::AppError;
use serde::{Deserialize, Serialize};

use crate::answer::{synthesize, AnsweredQuery};
use crate::embeddings::openai_embed::OpenAiEmbedder;
use crate::embeddings::Embedder;
use crate::index::EmbeddingIndex;
use crate::ingest::{chunk_documents, load_pdf, ChunkingConfig, Document};
use crate::llm::openai_chat::OpenAiChat;
use crate::llm::Llm;
use crate::openai::OpenAiClient;
use crate::retrieve::{retrieve, PendingQuery};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IngestSummary {
    pub source: String,
    pub pages: usize,
    pub chunks: usize,
    pub index_size: usize,
}

/// Retrieval-augmented question answering over ingested documents.
///
/// Owns the embedding index; share it by passing the pipeline, not by global.
pub struct RagPipeline {
    index: EmbeddingIndex,
    llm: Box<dyn Llm>,
    answer_model: String,
    chunking: ChunkingConfig,
    top_k: usize,
}

impl RagPipeline {
    pub fn new(
        embedder: Box<dyn Embedder>,
        embedding_model: impl Into<String>,
        llm: Box<dyn Llm>,
        answer_model: impl Into<String>,
        settings: RagSettings,
    ) -> Result<Self, AppError> {
        let chunking = ChunkingConfig::new(settings.chunk_size, settings.chunk_overlap)?;
        Ok(Self {
            index: EmbeddingIndex::new(embedder, embedding_model),
            llm,
            answer_model: answer_model.into(),
            chunking,
            top_k: settings.top_k,
        })
    }

    /// Wire OpenAI embeddings and chat from settings.
    pub fn openai(openai: &OpenAiSettings, rag: RagSettings) -> Result<Self, AppError> {
        let client = OpenAiClient::from_settings(openai)?;
        Self::new(
            Box::new(OpenAiEmbedder::new(client.clone())),
            openai.embedding_model.clone(),
            Box::new(OpenAiChat::new(client)),
            openai.answer_model.clone(),
            rag,
        )
    }

    pub fn index(&self) -> &EmbeddingIndex {
        &self.index
    }

    /// Load, chunk and index a PDF.
    pub fn ingest_document(&mut self, path: &Path) -> Result<IngestSummary, AppError> {
        let docs = load_pdf(path)?;
        let mut summary = self.ingest_documents(&docs)?;
        summary.source = path.display().to_string();
        Ok(summary)
    }

    /// Chunk and index already-loaded documents.
    pub fn ingest_documents(&mut self, docs: &[Document]) -> Result<IngestSummary, AppError> {
        let chunks = chunk_documents(docs, &self.chunking);
        let added = self.index.ingest(&chunks)?;
        let source = docs
            .first()
            .map(|d| d.meta.source.clone())
            .unwrap_or_default();
        tracing::info!(%source, pages = docs.len(), chunks = added, "document ingested");
        Ok(IngestSummary {
            source,
            pages: docs.len(),
            chunks: added,
            index_size: self.index.len(),
        })
    }

    /// Retrieve, then synthesize. Returns the full query state.
    pub fn ask(&self, question: &str) -> Result<AnsweredQuery, AppError> {
        let pending = PendingQuery::new(question)?;
        let retrieved = retrieve(&self.index, pending, self.top_k)?;
        synthesize(self.llm.as_ref(), &self.answer_model, retrieved)
    }

    pub fn answer_question(&self, question: &str) -> Result<String, AppError> {
        Ok(self.ask(question)?.answer)
    }
}
