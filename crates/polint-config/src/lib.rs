use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PolintConfig {
    /// Default target language code when none can be detected.
    pub target_lang: Option<String>,
    /// Translation engine kind: "openai" or "claude".
    pub engine: Option<String>,
    pub model: Option<String>,
    /// Custom base URL for OpenAI-compatible endpoints.
    pub api_url: Option<String>,
    /// Path to a glossary CSV overriding the built-in one.
    pub glossary: Option<String>,
    pub no_warnings: Option<bool>,
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("{0}")]
    Other(String),
}

pub fn load_config() -> Result<PolintConfig, ConfigError> {
    // Search order: CWD/polint.toml, $HOME/.config/polint/polint.toml
    let mut merged = PolintConfig::default();
    if let Ok(p) = std::env::current_dir() {
        let path = p.join("polint.toml");
        if let Ok(s) = std::fs::read_to_string(&path) {
            if let Ok(cfg) = toml::from_str::<PolintConfig>(&s) {
                merged = merge(merged, cfg);
            }
        }
    }
    if let Some(base) = dirs::config_dir() {
        let path = base.join("polint").join("polint.toml");
        if let Ok(s) = std::fs::read_to_string(&path) {
            if let Ok(cfg) = toml::from_str::<PolintConfig>(&s) {
                merged = merge(merged, cfg);
            }
        }
    }
    Ok(merged)
}

fn merge(mut a: PolintConfig, b: PolintConfig) -> PolintConfig {
    if a.target_lang.is_none() {
        a.target_lang = b.target_lang;
    }
    if a.engine.is_none() {
        a.engine = b.engine;
    }
    if a.model.is_none() {
        a.model = b.model;
    }
    if a.api_url.is_none() {
        a.api_url = b.api_url;
    }
    if a.glossary.is_none() {
        a.glossary = b.glossary;
    }
    if a.no_warnings.is_none() {
        a.no_warnings = b.no_warnings;
    }
    a
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn earlier_layer_wins_on_conflicts() {
        let cwd = toml::from_str::<PolintConfig>("engine = \"claude\"\n").unwrap();
        let user =
            toml::from_str::<PolintConfig>("engine = \"openai\"\nmodel = \"gpt-4o-mini\"\n")
                .unwrap();
        let merged = merge(cwd, user);
        assert_eq!(merged.engine.as_deref(), Some("claude"));
        assert_eq!(merged.model.as_deref(), Some("gpt-4o-mini"));
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let cfg = toml::from_str::<PolintConfig>("target_lang = \"fr\"\nunrelated = 1\n");
        assert!(cfg.is_ok());
        assert_eq!(cfg.unwrap().target_lang.as_deref(), Some("fr"));
    }
}
