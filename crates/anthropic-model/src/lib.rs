//! A model provider for the Anthropic Messages API.

#[macro_use]
extern crate tracing;

mod config;
mod proto;

use std::error::Error as StdError;
use std::fmt::{self, Display};
use std::sync::Arc;

use alduin_model::{
    ErrorKind, ModelProvider, ModelProviderError, ModelRequest, ModelResponse,
};
use reqwest::{Client, StatusCode, header};

pub use config::{AnthropicConfig, AnthropicConfigBuilder};
use proto::{ErrorResponse, MessagesResponse};

/// Error type for [`AnthropicProvider`].
#[derive(Debug)]
pub struct Error {
    message: String,
    kind: ErrorKind,
}

impl Error {
    fn new(message: impl Into<String>, kind: ErrorKind) -> Self {
        Self {
            message: message.into(),
            kind,
        }
    }

    /// Returns the error message.
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl StdError for Error {}

impl ModelProviderError for Error {
    #[inline]
    fn kind(&self) -> ErrorKind {
        self.kind
    }
}

/// Anthropic model provider.
#[derive(Clone, Debug)]
pub struct AnthropicProvider {
    client: Client,
    config: Arc<AnthropicConfig>,
}

impl AnthropicProvider {
    /// Creates a new `AnthropicProvider` with the given configuration.
    #[inline]
    pub fn new(config: AnthropicConfig) -> Self {
        Self {
            client: Client::new(),
            config: Arc::new(config),
        }
    }

    /// Returns the configuration.
    #[inline]
    pub fn config(&self) -> &AnthropicConfig {
        &self.config
    }
}

impl ModelProvider for AnthropicProvider {
    type Error = Error;

    fn send_request(
        &self,
        req: &ModelRequest,
    ) -> impl Future<Output = Result<ModelResponse, Self::Error>> + Send + 'static
    {
        let body = proto::create_request(req, &self.config);
        let resp_fut = self
            .client
            .post(self.config.messages_url())
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", config::API_VERSION)
            .header(header::CONTENT_TYPE, "application/json")
            .json(&body)
            .send();

        async move {
            let resp = resp_fut
                .await
                .map_err(|err| Error::new(format!("{err}"), ErrorKind::Other))?;

            let status = resp.status();
            if !status.is_success() {
                let text = resp.text().await.unwrap_or_default();
                return Err(error_from_status(status, &text));
            }

            let resp: MessagesResponse = resp.json().await.map_err(|err| {
                Error::new(
                    format!("Failed to decode the response: {err}"),
                    ErrorKind::Other,
                )
            })?;
            debug!(
                "got {} content blocks, usage: {:?}",
                resp.content.len(),
                resp.usage
            );
            Ok(proto::parse_response(resp))
        }
    }
}

fn error_from_status(status: StatusCode, body: &str) -> Error {
    let kind = match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            ErrorKind::Unauthorized
        }
        StatusCode::TOO_MANY_REQUESTS => ErrorKind::RateLimitExceeded,
        _ => ErrorKind::Other,
    };
    let message = match serde_json::from_str::<ErrorResponse>(body) {
        Ok(resp) => format!("{status}: {}", resp.error.message),
        Err(_) if body.is_empty() => format!("{status}"),
        Err(_) => format!("{status}: {body}"),
    };
    warn!("request failed with {message}");
    Error::new(message, kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_from_status() {
        let err = error_from_status(
            StatusCode::TOO_MANY_REQUESTS,
            r#"{"type":"error","error":{"type":"rate_limit_error","message":"Slow down"}}"#,
        );
        assert_eq!(err.kind(), ErrorKind::RateLimitExceeded);
        assert!(err.message().ends_with("Slow down"));

        let err = error_from_status(StatusCode::UNAUTHORIZED, "");
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
        assert_eq!(err.message(), "401 Unauthorized");

        let err = error_from_status(StatusCode::BAD_GATEWAY, "upstream down");
        assert_eq!(err.kind(), ErrorKind::Other);
        assert!(err.message().ends_with("upstream down"));
    }

    #[tokio::test]
    async fn test_unreachable_server() {
        let provider = AnthropicProvider::new(
            AnthropicConfigBuilder::with_api_key("key")
                .with_base_url("http://127.0.0.1:1")
                .build(),
        );
        let err = provider
            .send_request(&ModelRequest::default())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Other);
    }
}
