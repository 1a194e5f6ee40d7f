use anyhow::{Context, Result};

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Process configuration, read from the environment (and `.env` if present).
#[derive(Debug, Clone)]
pub struct Config {
    /// Left unset rather than failing startup: every generation then falls back.
    pub gemini_api_key: Option<String>,
    pub gemini_api_base: String,
    pub gemini_model: String,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let port = match lookup("PORT") {
            Some(raw) => raw.parse::<u16>().with_context(|| format!("PORT must be a valid port number, got '{raw}'"))?,
            None => 8080,
        };
        Ok(Config {
            gemini_api_key: lookup("GEMINI_API_KEY").filter(|k| !k.trim().is_empty()),
            gemini_api_base: lookup("GEMINI_API_BASE").unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            gemini_model: lookup("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            port,
        })
    }

    /// First few characters of the key, for startup logs.
    pub fn api_key_hint(&self) -> String {
        match &self.gemini_api_key {
            Some(key) => format!("{}...", key.chars().take(6).collect::<String>()),
            None => "<unset>".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.gemini_api_key, None);
        assert_eq!(config.gemini_api_base, DEFAULT_API_BASE);
        assert_eq!(config.gemini_model, DEFAULT_MODEL);
        assert_eq!(config.port, 8080);
        assert_eq!(config.api_key_hint(), "<unset>");
    }

    #[test]
    fn reads_overrides() {
        let config = config_from(&[
            ("GEMINI_API_KEY", "AIzaSyExample"),
            ("GEMINI_MODEL", "gemini-2.0-flash"),
            ("PORT", "3000"),
        ])
        .unwrap();
        assert_eq!(config.gemini_api_key.as_deref(), Some("AIzaSyExample"));
        assert_eq!(config.gemini_model, "gemini-2.0-flash");
        assert_eq!(config.port, 3000);
        assert_eq!(config.api_key_hint(), "AIzaSy...");
    }

    #[test]
    fn blank_key_counts_as_missing() {
        assert_eq!(config_from(&[("GEMINI_API_KEY", "  ")]).unwrap().gemini_api_key, None);
    }

    #[test]
    fn bad_port_is_an_error() {
        assert!(config_from(&[("PORT", "eighty")]).is_err());
    }
}
