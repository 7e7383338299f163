use std::fmt::{self, Debug};

pub(crate) const DEFAULT_MODEL: &str = "claude-sonnet-4-5";
pub(crate) const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
pub(crate) const DEFAULT_MAX_TOKENS: u32 = 4096;
pub(crate) const API_VERSION: &str = "2023-06-01";

/// Builder for [`AnthropicConfig`].
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct AnthropicConfigBuilder {
    api_key: String,
    model: Option<String>,
    base_url: Option<String>,
    max_tokens: Option<u32>,
}

impl AnthropicConfigBuilder {
    /// Creates a builder with the given API key.
    #[inline]
    pub fn with_api_key<S: Into<String>>(api_key: S) -> Self {
        Self {
            api_key: api_key.into(),
            model: None,
            base_url: None,
            max_tokens: None,
        }
    }

    /// Sets the model to use.
    #[inline]
    pub fn with_model<S: Into<String>>(mut self, model: S) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Sets a custom base URL, without the `/v1` suffix.
    #[inline]
    pub fn with_base_url<S: Into<String>>(mut self, base_url: S) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Sets the maximum number of tokens to generate per response.
    #[inline]
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Builds the configuration.
    #[inline]
    pub fn build(self) -> AnthropicConfig {
        let base_url = self
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_owned());
        AnthropicConfig {
            api_key: self.api_key,
            model: self.model.unwrap_or_else(|| DEFAULT_MODEL.to_owned()),
            base_url: base_url.trim_end_matches('/').to_owned(),
            max_tokens: self.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
        }
    }
}

impl Debug for AnthropicConfigBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnthropicConfigBuilder")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

/// Configuration for the Anthropic provider.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct AnthropicConfig {
    pub(crate) api_key: String,
    pub(crate) model: String,
    pub(crate) base_url: String,
    pub(crate) max_tokens: u32,
}

impl AnthropicConfig {
    /// Returns the model name.
    #[inline]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Returns the base URL.
    #[inline]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the maximum number of tokens per response.
    #[inline]
    pub fn max_tokens(&self) -> u32 {
        self.max_tokens
    }

    pub(crate) fn messages_url(&self) -> String {
        format!("{}/v1/messages", self.base_url)
    }
}

impl Debug for AnthropicConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnthropicConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}
