use std::time::Duration;

use secblog_core::error::AppError;
use serde::{Deserialize, Serialize};

use super::Embedder;
use crate::openai::OpenAiClient;

const EMBEDDINGS_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Clone)]
pub struct OpenAiEmbedder {
    client: OpenAiClient,
}

impl OpenAiEmbedder {
    pub fn new(client: OpenAiClient) -> Self {
        Self { client }
    }
}

#[derive(Debug, Clone, Serialize)]
struct EmbeddingsRequest<'a> {
    model: &'a str,
    input: &'a [&'a str],
}

#[derive(Debug, Clone, Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Clone, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
    index: usize,
}

impl Embedder for OpenAiEmbedder {
    fn embed(&self, model: &str, input: &str) -> Result<Vec<f32>, AppError> {
        let mut out = self.embed_batch(model, &[input])?;
        out.pop().ok_or_else(|| {
            AppError::new("EXTERNAL_EMBEDDINGS_FAILED", "Embeddings response was empty")
        })
    }

    fn embed_batch(&self, model: &str, inputs: &[&str]) -> Result<Vec<Vec<f32>>, AppError> {
        if inputs.is_empty() {
            return Ok(Vec::new());
        }

        let url = self.client.endpoint("embeddings");
        let req = EmbeddingsRequest { model, input: inputs };
        tracing::debug!(model, inputs = inputs.len(), "embeddings request");
        let resp = ureq::post(&url)
            .set("Authorization", &self.client.authorization())
            .timeout(EMBEDDINGS_TIMEOUT)
            .send_json(req)
            .map_err(|e| {
                OpenAiClient::request_error("EXTERNAL_EMBEDDINGS_FAILED", "Embeddings", e)
            })?;

        let mut parsed: EmbeddingsResponse = resp.into_json().map_err(|e| {
            AppError::new(
                "EXTERNAL_EMBEDDINGS_FAILED",
                "Failed to decode embeddings response",
            )
            .with_details(e.to_string())
        })?;
        if parsed.data.len() != inputs.len() {
            return Err(AppError::new(
                "EXTERNAL_EMBEDDINGS_FAILED",
                "Embeddings response count does not match inputs",
            )
            .with_details(format!(
                "inputs={}; embeddings={}",
                inputs.len(),
                parsed.data.len()
            )));
        }
        parsed.data.sort_by_key(|d| d.index);
        if parsed.data.iter().any(|d| d.embedding.is_empty()) {
            return Err(AppError::new(
                "EXTERNAL_EMBEDDINGS_FAILED",
                "Embeddings response contained an empty vector",
            ));
        }
        Ok(parsed.data.into_iter().map(|d| d.embedding).collect())
    }
}
