pub mod answer;
pub mod draft;
pub mod embeddings;
pub mod guardrails;
pub mod index;
pub mod ingest;
pub mod llm;
pub mod openai;
pub mod pipeline;
pub mod publish;
pub mod retrieve;
