pub mod chunking;
pub mod loader;
pub mod model;

pub use chunking::{chunk_documents, ChunkingConfig};
pub use loader::load_pdf;
pub use model::{Chunk, Document, SourceMeta};
