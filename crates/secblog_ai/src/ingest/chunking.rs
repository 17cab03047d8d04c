use secblog_core::config::{DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE};
use secblog_core::error::AppError;
use sha2::{Digest, Sha256};

use super::model::{Chunk, Document};

/// Fixed-window chunking parameters, in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkingConfig {
    max_size: usize,
    overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            max_size: DEFAULT_CHUNK_SIZE,
            overlap: DEFAULT_CHUNK_OVERLAP,
        }
    }
}

impl ChunkingConfig {
    pub fn new(max_size: usize, overlap: usize) -> Result<Self, AppError> {
        if max_size == 0 || overlap >= max_size {
            return Err(AppError::new(
                "CONFIG_CHUNKING_INVALID",
                "Chunk overlap must be strictly less than a non-zero chunk size",
            )
            .with_details(format!("max_size={max_size}; overlap={overlap}")));
        }
        Ok(Self { max_size, overlap })
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn overlap(&self) -> usize {
        self.overlap
    }

    fn step(&self) -> usize {
        self.max_size - self.overlap
    }
}

pub fn chunk_documents(docs: &[Document], config: &ChunkingConfig) -> Vec<Chunk> {
    let mut out = Vec::new();
    for doc in docs {
        out.extend(chunk_document(doc, config));
    }
    out
}

pub fn chunk_document(doc: &Document, config: &ChunkingConfig) -> Vec<Chunk> {
    let text = doc.content.as_str();
    if text.trim().is_empty() {
        return Vec::new();
    }

    // Byte offset of every char, so windows never split a code point.
    let bounds: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();
    let char_len = bounds.len();
    let byte_at = |ci: usize| if ci >= char_len { text.len() } else { bounds[ci] };

    let mut out = Vec::new();
    let mut start = 0usize;
    loop {
        let end = (start + config.max_size).min(char_len);
        let content = &text[byte_at(start)..byte_at(end)];
        out.push(Chunk {
            chunk_id: chunk_id(doc, start, content),
            content: content.to_string(),
            start_index: start,
            meta: doc.meta.clone(),
        });
        if end == char_len {
            break;
        }
        start += config.step();
    }
    out
}

fn chunk_id(doc: &Document, start: usize, content: &str) -> String {
    let payload = format!(
        "source={}\npage={}\nstart={}\ntext={}",
        doc.meta.source, doc.meta.page, start, content
    );
    hex::encode(Sha256::digest(payload.as_bytes()))
}
