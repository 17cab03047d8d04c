//! In-memory embedding index.
//!
//! The index is an owned value: `ingest` needs `&mut self` and `search` needs
//! `&self`, so callers cannot interleave mutation with reads. Nothing is
//! persisted and entries are never compacted.

use secblog_core::error::AppError;
use serde::{Deserialize, Serialize};

use crate::embeddings::Embedder;
use crate::ingest::Chunk;

mod similarity;

/// Inputs sent per embeddings request.
pub const EMBED_BATCH_SIZE: usize = 64;

#[derive(Debug, Clone)]
pub struct IndexEntry {
    pub vector: Vec<f32>,
    norm: f32,
    pub chunk: Chunk,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoredChunk {
    pub chunk: Chunk,
    pub score: f32,
}

pub struct EmbeddingIndex {
    embedder: Box<dyn Embedder>,
    model: String,
    dims: Option<usize>,
    entries: Vec<IndexEntry>,
}

impl std::fmt::Debug for EmbeddingIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmbeddingIndex")
            .field("model", &self.model)
            .field("dims", &self.dims)
            .field("entries", &self.entries.len())
            .finish()
    }
}

impl EmbeddingIndex {
    pub fn new(embedder: Box<dyn Embedder>, model: impl Into<String>) -> Self {
        Self {
            embedder,
            model: model.into(),
            dims: None,
            entries: Vec::new(),
        }
    }

    pub fn dims(&self) -> Option<usize> {
        self.dims
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    /// Embed and store every chunk. Identical chunks are not deduplicated.
    ///
    /// All-or-nothing: if any batch fails, nothing from this call is kept.
    pub fn ingest(&mut self, chunks: &[Chunk]) -> Result<usize, AppError> {
        let mut dims = self.dims;
        let mut staged: Vec<IndexEntry> = Vec::with_capacity(chunks.len());

        for batch in chunks.chunks(EMBED_BATCH_SIZE) {
            let inputs: Vec<&str> = batch.iter().map(|c| c.content.as_str()).collect();
            let vectors = self.embedder.embed_batch(&self.model, &inputs)?;
            if vectors.len() != batch.len() {
                return Err(AppError::new(
                    "EXTERNAL_EMBEDDINGS_FAILED",
                    "Embedder returned a different number of vectors than inputs",
                )
                .with_details(format!("inputs={}; vectors={}", batch.len(), vectors.len())));
            }

            for (chunk, vector) in batch.iter().zip(vectors) {
                match dims {
                    Some(d) if d != vector.len() => {
                        return Err(AppError::new(
                            "EXTERNAL_EMBEDDINGS_FAILED",
                            "Embedding dimension mismatch across chunks",
                        )
                        .with_details(format!(
                            "expected={}; got={}; chunk_id={}",
                            d,
                            vector.len(),
                            chunk.chunk_id
                        )));
                    }
                    Some(_) => {}
                    None => dims = Some(vector.len()),
                }
                staged.push(IndexEntry {
                    norm: similarity::l2_norm(&vector),
                    vector,
                    chunk: chunk.clone(),
                });
            }
        }

        let added = staged.len();
        self.entries.extend(staged);
        self.dims = dims;
        tracing::info!(added, total = self.entries.len(), "chunks indexed");
        Ok(added)
    }

    /// Up to `k` chunks, most similar first. Ties keep ingestion order.
    pub fn search(&self, query: &str, k: usize) -> Result<Vec<ScoredChunk>, AppError> {
        if self.entries.is_empty() || k == 0 {
            return Ok(Vec::new());
        }

        let qv = self.embedder.embed(&self.model, query)?;
        if let Some(d) = self.dims {
            if qv.len() != d {
                return Err(AppError::new(
                    "EXTERNAL_EMBEDDINGS_FAILED",
                    "Query embedding dims do not match index dims",
                )
                .with_details(format!("index_dims={d}; query_dims={}", qv.len())));
            }
        }
        let qnorm = similarity::l2_norm(&qv);
        if qnorm == 0.0 {
            return Ok(Vec::new());
        }

        let mut hits: Vec<(usize, f32)> = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.norm > 0.0)
            .map(|(i, e)| (i, similarity::cosine(&qv, &e.vector, qnorm, e.norm)))
            .collect();

        // sort_by is stable, so equal scores stay in ingestion order.
        hits.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        hits.truncate(k);

        Ok(hits
            .into_iter()
            .map(|(i, score)| ScoredChunk {
                chunk: self.entries[i].chunk.clone(),
                score,
            })
            .collect())
    }
}
