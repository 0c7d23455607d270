//! HTTP transport for OpenAI-compatible chat-completion endpoints.

use super::{ChatRequest, ChatTransport, CompletionOutcome};
use crate::config::ProviderConfig;
use crate::error::SummaryError;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Error codes providers use for oversized requests.
const TOO_LARGE_CODES: [&str; 2] = ["context_length_exceeded", "request_too_large"];

/// Sends requests to `{base_url}/chat/completions` with bearer auth.
pub struct HttpChatTransport {
    client: reqwest::Client,
    provider: ProviderConfig,
}

impl HttpChatTransport {
    pub fn new(provider: ProviderConfig, timeout_secs: u64) -> Result<Self, SummaryError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| SummaryError::Internal(format!("HTTP client: {e}")))?;
        Ok(Self { client, provider })
    }
}

impl std::fmt::Debug for HttpChatTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpChatTransport")
            .field("provider", &self.provider)
            .finish()
    }
}

#[async_trait]
impl ChatTransport for HttpChatTransport {
    async fn complete(&self, request: &ChatRequest) -> CompletionOutcome {
        let url = self.provider.completions_url();
        debug!("POST {} (model {})", url, request.model);

        let response = match self
            .client
            .post(&url)
            .bearer_auth(&self.provider.api_key)
            .json(request)
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) if e.is_timeout() => {
                return CompletionOutcome::OtherFailure(format!("request timed out: {e}"))
            }
            Err(e) => return CompletionOutcome::OtherFailure(format!("request failed: {e}")),
        };

        let status = response.status();
        match response.text().await {
            Ok(body) => classify_response(status, &body),
            Err(e) => CompletionOutcome::OtherFailure(format!("HTTP {status}: unreadable body: {e}")),
        }
    }
}

/// Map a provider response onto a [`CompletionOutcome`].
pub fn classify_response(status: StatusCode, body: &str) -> CompletionOutcome {
    let json: Option<Value> = serde_json::from_str(body).ok();

    if status.is_success() {
        return match json
            .as_ref()
            .and_then(|v| v.pointer("/choices/0/message/content"))
            .and_then(Value::as_str)
        {
            Some(content) => CompletionOutcome::Success(content.to_string()),
            None => CompletionOutcome::OtherFailure(format!(
                "HTTP {status}: response has no choices"
            )),
        };
    }

    let error = json.as_ref().and_then(|v| v.get("error"));
    let code = error
        .and_then(|e| e.get("code"))
        .and_then(Value::as_str)
        .unwrap_or_default();
    let message = error
        .and_then(|e| e.get("message"))
        .and_then(Value::as_str)
        .unwrap_or(body);

    if status == StatusCode::PAYLOAD_TOO_LARGE || TOO_LARGE_CODES.contains(&code) {
        return CompletionOutcome::PayloadTooLarge;
    }

    if status == StatusCode::TOO_MANY_REQUESTS {
        if message.to_ascii_lowercase().contains("request too large") {
            return CompletionOutcome::PayloadTooLarge;
        }
        return CompletionOutcome::RateLimited;
    }

    CompletionOutcome::OtherFailure(format!("HTTP {status}: {message}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_takes_first_choice() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":"A summary."}},
                      {"message":{"role":"assistant","content":"Other."}}]}"#;
        assert_eq!(
            classify_response(StatusCode::OK, body),
            CompletionOutcome::Success("A summary.".into())
        );
    }

    #[test]
    fn success_without_choices_is_failure() {
        assert!(matches!(
            classify_response(StatusCode::OK, r#"{"choices":[]}"#),
            CompletionOutcome::OtherFailure(_)
        ));
        assert!(matches!(
            classify_response(StatusCode::OK, "<html>"),
            CompletionOutcome::OtherFailure(_)
        ));
    }

    #[test]
    fn plain_429_is_rate_limited() {
        let body = r#"{"error":{"message":"Rate limit reached for model","code":"rate_limit_exceeded"}}"#;
        assert_eq!(
            classify_response(StatusCode::TOO_MANY_REQUESTS, body),
            CompletionOutcome::RateLimited
        );
        assert_eq!(
            classify_response(StatusCode::TOO_MANY_REQUESTS, ""),
            CompletionOutcome::RateLimited
        );
    }

    #[test]
    fn oversized_requests_are_payload_too_large() {
        assert_eq!(
            classify_response(StatusCode::PAYLOAD_TOO_LARGE, ""),
            CompletionOutcome::PayloadTooLarge
        );
        let ctx = r#"{"error":{"message":"too long","code":"context_length_exceeded"}}"#;
        assert_eq!(
            classify_response(StatusCode::BAD_REQUEST, ctx),
            CompletionOutcome::PayloadTooLarge
        );
        let tpm = r#"{"error":{"message":"Request too large for model on tokens per minute","code":"rate_limit_exceeded"}}"#;
        assert_eq!(
            classify_response(StatusCode::TOO_MANY_REQUESTS, tpm),
            CompletionOutcome::PayloadTooLarge
        );
    }

    #[test]
    fn other_errors_keep_the_message() {
        let body = r#"{"error":{"message":"Invalid API key","code":"invalid_api_key"}}"#;
        match classify_response(StatusCode::UNAUTHORIZED, body) {
            CompletionOutcome::OtherFailure(detail) => {
                assert!(detail.contains("401"));
                assert!(detail.contains("Invalid API key"));
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }
}
