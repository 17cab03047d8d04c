use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SourceMeta {
    /// Path the document was loaded from.
    pub source: String,
    /// 1-based page number.
    pub page: u32,
    pub total_pages: u32,
}

/// One page of ingested text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Document {
    pub content: String,
    pub meta: SourceMeta,
}

impl Document {
    pub fn new(content: impl Into<String>, meta: SourceMeta) -> Self {
        Self {
            content: content.into(),
            meta,
        }
    }
}

/// A window of a [`Document`], the unit of embedding and retrieval.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Chunk {
    pub chunk_id: String,
    pub content: String,
    /// Offset of the first character within the source document, in characters.
    pub start_index: usize,
    pub meta: SourceMeta,
}
