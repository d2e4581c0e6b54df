// file: src/llm/mod.rs
// description: language model collaborator used to write the report
// reference: internal module structure

pub mod client;
pub mod prompts;

pub use client::OpenAiClient;
pub use prompts::{PromptStyle, user_prompt};

use crate::error::Result;

/// Anything that turns a system and user prompt into report text.
///
/// Errors surface as `AnalysisError::ExternalCallFailed` and are never
/// retried by the caller.
#[allow(async_fn_in_trait)]
pub trait ReportGenerator {
    async fn generate(&self, system_prompt: &str, user_prompt: &str) -> Result<String>;

    fn model_name(&self) -> &str;
}
