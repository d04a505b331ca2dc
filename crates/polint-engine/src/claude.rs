use std::process::Command;

use crate::{EngineError, TranslationEngine};

/// Adapter over the `claude` command-line tool. No credentials handling of
/// its own; the CLI is expected to be installed and authenticated.
pub struct ClaudeEngine {
    model: Option<String>,
}

impl ClaudeEngine {
    pub fn new(model: Option<&str>) -> ClaudeEngine {
        ClaudeEngine {
            model: model.map(str::to_string),
        }
    }

    fn translate_args(&self, text: &str, system_prompt: &str) -> Vec<String> {
        let mut args = vec![
            "-p".to_string(),
            text.to_string(),
            "--system-prompt".to_string(),
            system_prompt.to_string(),
        ];
        if let Some(model) = &self.model {
            args.push("--model".to_string());
            args.push(model.clone());
        }
        args
    }
}

impl TranslationEngine for ClaudeEngine {
    fn translate(&self, text: &str, system_prompt: &str) -> Result<String, EngineError> {
        tracing::debug!(model = ?self.model, "invoking claude CLI");
        let output = Command::new("claude")
            .args(self.translate_args(text, system_prompt))
            .output()
            .map_err(|e| EngineError::Command(format!("failed to run claude: {e}")))?;

        if !output.status.success() {
            let mut detail = String::from_utf8_lossy(&output.stdout).to_string();
            detail.push_str(&String::from_utf8_lossy(&output.stderr));
            return Err(EngineError::Command(format!(
                "Claude command failed: {}",
                detail.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    fn verify(&self) -> Result<(), EngineError> {
        let usable = Command::new("claude")
            .arg("--version")
            .output()
            .map(|output| output.status.success())
            .unwrap_or(false);

        if !usable {
            return Err(EngineError::Unusable(
                "Claude CLI is not installed or not available. \
                 Please install the claude command-line tool first."
                    .to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_prompt_arguments_in_order() {
        let engine = ClaudeEngine::new(None);
        let args = engine.translate_args("Hello world", "Translate to French");
        assert_eq!(
            args,
            [
                "-p",
                "Hello world",
                "--system-prompt",
                "Translate to French"
            ]
        );
    }

    #[test]
    fn appends_model_when_configured() {
        let engine = ClaudeEngine::new(Some("claude-3-5-haiku"));
        let args = engine.translate_args("Hello", "prompt");
        assert_eq!(&args[4..], ["--model", "claude-3-5-haiku"]);
    }
}
