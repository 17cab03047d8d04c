use secblog_core::error::AppError;

pub trait Llm {
    /// `temperature: None` leaves sampling at the provider default.
    fn generate(
        &self,
        model: &str,
        prompt: &str,
        temperature: Option<f32>,
    ) -> Result<String, AppError>;
}

pub mod openai_chat;
