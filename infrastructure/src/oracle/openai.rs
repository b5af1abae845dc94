//! OpenAI-compatible chat completions oracle.
//!
//! One `POST {api_url}/chat/completions` per call with `n` set to the
//! requested sample count. Rate limits, timeouts and 5xx responses are
//! retried with exponential backoff (1s, 2s, 4s, …) up to `max_retries`
//! times; everything else fails immediately.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tq_application::{Oracle, OracleError};
use tq_domain::Model;
use tracing::{debug, warn};

/// Connection and sampling settings of one oracle instance
#[derive(Debug, Clone, PartialEq)]
pub struct OpenAiOracleConfig {
    pub model: Model,
    /// Base URL without trailing slash (e.g. "https://api.openai.com/v1")
    pub api_url: String,
    /// Bearer token; omitted from requests when unset
    pub api_key: Option<String>,
    pub temperature: f64,
    pub top_p: Option<f64>,
    pub max_tokens: Option<u32>,
    pub timeout: Duration,
    pub max_retries: u32,
    /// Delay before the first retry; doubled on every further retry
    pub retry_backoff: Duration,
}

impl Default for OpenAiOracleConfig {
    fn default() -> Self {
        Self {
            model: Model::default(),
            api_url: "https://api.openai.com/v1".to_string(),
            api_key: None,
            temperature: 1.0,
            top_p: None,
            max_tokens: None,
            timeout: Duration::from_secs(120),
            max_retries: 2,
            retry_backoff: Duration::from_secs(1),
        }
    }
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    n: usize,
    temperature: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stop: Option<&'a str>,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// A failed attempt and whether another attempt may succeed
struct AttemptError {
    error: OracleError,
    retryable: bool,
}

impl AttemptError {
    fn fatal(error: OracleError) -> Self {
        Self {
            error,
            retryable: false,
        }
    }

    fn transient(error: OracleError) -> Self {
        Self {
            error,
            retryable: true,
        }
    }
}

/// Oracle backed by an OpenAI-compatible HTTP API
pub struct OpenAiOracle {
    config: OpenAiOracleConfig,
    client: Client,
}

impl OpenAiOracle {
    pub fn new(config: OpenAiOracleConfig) -> Result<Self, OracleError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| OracleError::ConnectionError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &OpenAiOracleConfig {
        &self.config
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.config.api_url)
    }

    async fn try_request(
        &self,
        prompt: &str,
        samples: usize,
        stop: Option<&str>,
    ) -> Result<Vec<String>, AttemptError> {
        let request = ChatRequest {
            model: self.config.model.as_str(),
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
            n: samples,
            temperature: self.config.temperature,
            top_p: self.config.top_p,
            max_tokens: self.config.max_tokens,
            stop,
        };

        let mut request_builder = self.client.post(self.endpoint()).json(&request);
        if let Some(api_key) = &self.config.api_key {
            request_builder = request_builder.bearer_auth(api_key);
        }

        let response = request_builder.send().await.map_err(|e| {
            if e.is_timeout() {
                AttemptError::transient(OracleError::Timeout)
            } else {
                AttemptError::fatal(OracleError::ConnectionError(e.to_string()))
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(Self::classify(status, body));
        }

        let body: ChatResponse = response.json().await.map_err(|e| {
            AttemptError::fatal(OracleError::MalformedResponse(e.to_string()))
        })?;
        if body.choices.is_empty() {
            return Err(AttemptError::fatal(OracleError::MalformedResponse(
                "No choices in response".to_string(),
            )));
        }

        Ok(body
            .choices
            .into_iter()
            .map(|c| c.message.content.unwrap_or_default())
            .collect())
    }

    fn classify(status: StatusCode, body: String) -> AttemptError {
        let detail = format!("HTTP {}: {}", status, body);
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                AttemptError::fatal(OracleError::AuthenticationFailed(detail))
            }
            StatusCode::TOO_MANY_REQUESTS => AttemptError::transient(OracleError::RateLimited(detail)),
            s if s.is_server_error() => AttemptError::transient(OracleError::RequestFailed(detail)),
            _ => AttemptError::fatal(OracleError::RequestFailed(detail)),
        }
    }
}

#[async_trait]
impl Oracle for OpenAiOracle {
    fn model(&self) -> &Model {
        &self.config.model
    }

    async fn complete(
        &self,
        prompt: &str,
        samples: usize,
        stop: Option<&str>,
    ) -> Result<Vec<String>, OracleError> {
        if samples == 0 {
            return Ok(Vec::new());
        }

        let mut attempt = 0;
        loop {
            match self.try_request(prompt, samples, stop).await {
                Ok(completions) => {
                    debug!(
                        "{} returned {} completions",
                        self.config.model,
                        completions.len()
                    );
                    return Ok(completions);
                }
                Err(failure) if failure.retryable && attempt < self.config.max_retries => {
                    let delay = self.config.retry_backoff * 2u32.pow(attempt);
                    attempt += 1;
                    warn!(
                        "{} request failed (attempt {}/{}): {}; retrying in {:?}",
                        self.config.model,
                        attempt,
                        self.config.max_retries + 1,
                        failure.error,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(failure) => return Err(failure.error),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    fn completion_body(texts: &[&str]) -> String {
        let choices: Vec<_> = texts
            .iter()
            .enumerate()
            .map(|(i, t)| {
                serde_json::json!({
                    "index": i,
                    "message": {"role": "assistant", "content": t},
                    "finish_reason": "stop"
                })
            })
            .collect();
        serde_json::json!({"id": "chatcmpl-1", "object": "chat.completion", "choices": choices})
            .to_string()
    }

    fn oracle(url: String, max_retries: u32) -> OpenAiOracle {
        OpenAiOracle::new(OpenAiOracleConfig {
            api_url: url,
            api_key: Some("test-key".to_string()),
            max_retries,
            retry_backoff: Duration::ZERO,
            ..OpenAiOracleConfig::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_complete_sends_samples_and_stop() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer test-key")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "model": "gpt-4o-mini",
                "n": 2,
                "stop": "\nPassage:\n",
                "messages": [{"role": "user", "content": "2+2=?"}]
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(completion_body(&["the answer is 4", "4"]))
            .create_async()
            .await;

        let completions = oracle(server.url(), 0)
            .complete("2+2=?", 2, Some("\nPassage:\n"))
            .await
            .unwrap();

        assert_eq!(completions, vec!["the answer is 4", "4"]);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_unauthorized_is_not_retried() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .with_status(401)
            .with_body("invalid api key")
            .expect(1)
            .create_async()
            .await;

        let err = oracle(server.url(), 3).complete("q", 1, None).await.unwrap_err();

        assert!(matches!(err, OracleError::AuthenticationFailed(_)));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_rate_limit_retried_then_surfaced() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .with_status(429)
            .with_body("slow down")
            .expect(3)
            .create_async()
            .await;

        let err = oracle(server.url(), 2).complete("q", 1, None).await.unwrap_err();

        assert!(matches!(err, OracleError::RateLimited(_)));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_connection_refused_is_not_retried() {
        // Reserve a port, then free it so nothing is listening there
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let oracle = OpenAiOracle::new(OpenAiOracleConfig {
            api_url: format!("http://127.0.0.1:{}", port),
            max_retries: 2,
            retry_backoff: Duration::from_secs(30),
            ..OpenAiOracleConfig::default()
        })
        .unwrap();

        let err = tokio::time::timeout(Duration::from_secs(10), oracle.complete("q", 1, None))
            .await
            .expect("a retry would sleep past the deadline")
            .unwrap_err();

        assert!(matches!(err, OracleError::ConnectionError(_)));
    }

    #[tokio::test]
    async fn test_client_error_fails_fast() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .with_status(400)
            .with_body("bad request")
            .expect(1)
            .create_async()
            .await;

        let err = oracle(server.url(), 2).complete("q", 1, None).await.unwrap_err();

        assert!(matches!(err, OracleError::RequestFailed(_)));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_empty_choices_is_malformed() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_body(r#"{"choices": []}"#)
            .create_async()
            .await;

        let err = oracle(server.url(), 0).complete("q", 1, None).await.unwrap_err();
        assert!(matches!(err, OracleError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn test_zero_samples_skips_request() {
        let completions = oracle("http://127.0.0.1:9".to_string(), 0)
            .complete("q", 0, None)
            .await
            .unwrap();
        assert!(completions.is_empty());
    }
}
