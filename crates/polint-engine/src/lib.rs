//! Translation engine adapters. The orchestrator depends only on the
//! [`TranslationEngine`] trait; concrete variants wrap an OpenAI-compatible
//! HTTP API and the Claude command-line tool.

use thiserror::Error;

mod claude;
mod openai;

pub use claude::ClaudeEngine;
pub use openai::OpenAiEngine;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("invalid response from API: {0}")]
    InvalidResponse(String),
    #[error("command failed: {0}")]
    Command(String),
    #[error("{0}")]
    Unusable(String),
}

/// Uniform translation capability: `translate(text, system_prompt) -> text`.
pub trait TranslationEngine {
    fn translate(&self, text: &str, system_prompt: &str) -> Result<String, EngineError>;

    /// Fails if the engine is unusable: missing credentials, unreachable
    /// tool, invalid key.
    fn verify(&self) -> Result<(), EngineError>;
}

/// Create and verify an OpenAI-compatible engine.
pub fn openai(
    api_key: &str,
    model: &str,
    api_url: Option<&str>,
) -> Result<Box<dyn TranslationEngine>, EngineError> {
    let engine = OpenAiEngine::new(api_key, model, api_url);
    engine.verify()?;
    Ok(Box::new(engine))
}

/// Create and verify a Claude CLI engine.
pub fn claude(model: Option<&str>) -> Result<Box<dyn TranslationEngine>, EngineError> {
    let engine = ClaudeEngine::new(model);
    engine.verify()?;
    Ok(Box::new(engine))
}
