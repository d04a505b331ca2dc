use serde_json::{json, Value};

use crate::{EngineError, TranslationEngine};

const DEFAULT_API_URL: &str = "https://api.openai.com/v1";

/// Chat-completions adapter over a blocking HTTP client. Works against the
/// OpenAI API or any compatible endpoint via a custom base URL.
pub struct OpenAiEngine {
    agent: ureq::Agent,
    api_key: String,
    model: String,
    base_url: String,
}

impl OpenAiEngine {
    pub fn new(api_key: &str, model: &str, api_url: Option<&str>) -> OpenAiEngine {
        OpenAiEngine {
            agent: ureq::agent(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            base_url: api_url
                .unwrap_or(DEFAULT_API_URL)
                .trim_end_matches('/')
                .to_string(),
        }
    }

    fn error_message(body: &Value) -> Option<String> {
        body.get("error")?
            .get("message")?
            .as_str()
            .map(str::to_string)
    }
}

impl TranslationEngine for OpenAiEngine {
    fn translate(&self, text: &str, system_prompt: &str) -> Result<String, EngineError> {
        let body = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": system_prompt },
                { "role": "user", "content": text },
            ],
            "temperature": 0.8,
        });

        tracing::debug!(model = %self.model, "requesting chat completion");
        let response = self
            .agent
            .post(&format!("{}/chat/completions", self.base_url))
            .set("Authorization", &format!("Bearer {}", self.api_key))
            .send_json(body)
            .map_err(|e| EngineError::Transport(e.to_string()))?;

        let data: Value = response
            .into_json()
            .map_err(|e| EngineError::InvalidResponse(e.to_string()))?;

        data["choices"][0]["message"]["content"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| EngineError::InvalidResponse(data.to_string()))
    }

    fn verify(&self) -> Result<(), EngineError> {
        let result = self
            .agent
            .get(&format!("{}/models/{}", self.base_url, self.model))
            .set("Authorization", &format!("Bearer {}", self.api_key))
            .call();

        let data: Value = match result {
            Ok(response) => response
                .into_json()
                .map_err(|e| EngineError::InvalidResponse(e.to_string()))?,
            Err(ureq::Error::Status(_, response)) => {
                let body: Value = response
                    .into_json()
                    .map_err(|e| EngineError::InvalidResponse(e.to_string()))?;
                let message = Self::error_message(&body)
                    .unwrap_or_else(|| "API verification failed".to_string());
                return Err(EngineError::Unusable(message));
            }
            Err(e) => return Err(EngineError::Transport(e.to_string())),
        };

        if let Some(message) = Self::error_message(&data) {
            return Err(EngineError::Unusable(message));
        }
        if data.get("id").is_none() {
            return Err(EngineError::InvalidResponse(data.to_string()));
        }
        Ok(())
    }
}
