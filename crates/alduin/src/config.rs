use std::fmt::{self, Display};

use alduin_anthropic_model::{AnthropicConfig, AnthropicConfigBuilder};

pub const API_KEY_VAR: &str = "ANTHROPIC_API_KEY";
const MODEL_VAR: &str = "ANTHROPIC_MODEL";
const BASE_URL_VAR: &str = "ANTHROPIC_BASE_URL";
const MAX_TOKENS_VAR: &str = "ANTHROPIC_MAX_TOKENS";

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    MissingApiKey,
    InvalidMaxTokens(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingApiKey => {
                write!(f, "{API_KEY_VAR} environment variable is not set.")
            }
            ConfigError::InvalidMaxTokens(value) => write!(
                f,
                "{MAX_TOKENS_VAR} must be a positive integer, got `{value}`."
            ),
        }
    }
}

/// Reads the provider configuration through `lookup`. Empty values count
/// as unset.
pub fn from_lookup<F>(lookup: F) -> Result<AnthropicConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let var = |name: &str| lookup(name).filter(|v: &String| !v.trim().is_empty());

    let api_key = var(API_KEY_VAR).ok_or(ConfigError::MissingApiKey)?;
    let mut builder = AnthropicConfigBuilder::with_api_key(api_key);
    if let Some(model) = var(MODEL_VAR) {
        builder = builder.with_model(model);
    }
    if let Some(base_url) = var(BASE_URL_VAR) {
        builder = builder.with_base_url(base_url);
    }
    if let Some(max_tokens) = var(MAX_TOKENS_VAR) {
        match max_tokens.trim().parse() {
            Ok(n) if n > 0 => builder = builder.with_max_tokens(n),
            _ => return Err(ConfigError::InvalidMaxTokens(max_tokens)),
        }
    }
    Ok(builder.build())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_missing_api_key() {
        assert_eq!(
            from_lookup(lookup(&[])).unwrap_err(),
            ConfigError::MissingApiKey
        );
        assert_eq!(
            from_lookup(lookup(&[(API_KEY_VAR, "  ")])).unwrap_err(),
            ConfigError::MissingApiKey
        );
    }

    #[test]
    fn test_overrides() {
        let config = from_lookup(lookup(&[
            (API_KEY_VAR, "sk-ant-key"),
            (MODEL_VAR, "claude-haiku-4-5"),
            (MAX_TOKENS_VAR, "2048"),
        ]))
        .unwrap();
        assert_eq!(config.model(), "claude-haiku-4-5");
        assert_eq!(config.max_tokens(), 2048);
        assert_eq!(config.base_url(), "https://api.anthropic.com");
    }

    #[test]
    fn test_invalid_max_tokens() {
        let err = from_lookup(lookup(&[
            (API_KEY_VAR, "sk-ant-key"),
            (MAX_TOKENS_VAR, "lots"),
        ]))
        .unwrap_err();
        assert_eq!(err, ConfigError::InvalidMaxTokens("lots".to_owned()));
    }
}
