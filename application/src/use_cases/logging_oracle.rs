//! Oracle decorator that records every exchange as conversation events.

use crate::ports::conversation_logger::{ConversationEvent, ConversationLogger};
use crate::ports::oracle::{Oracle, OracleError};
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;
use tq_domain::Model;

/// Forwards calls unchanged to `inner` and logs request, response or error.
pub struct LoggingOracle {
    inner: Arc<dyn Oracle>,
    logger: Arc<dyn ConversationLogger>,
    /// Which oracle this is ("search", "verifier")
    role: &'static str,
}

impl LoggingOracle {
    pub fn new(
        inner: Arc<dyn Oracle>,
        logger: Arc<dyn ConversationLogger>,
        role: &'static str,
    ) -> Self {
        Self {
            inner,
            logger,
            role,
        }
    }
}

#[async_trait]
impl Oracle for LoggingOracle {
    fn model(&self) -> &Model {
        self.inner.model()
    }

    async fn complete(
        &self,
        prompt: &str,
        samples: usize,
        stop: Option<&str>,
    ) -> Result<Vec<String>, OracleError> {
        self.logger.log(ConversationEvent::new(
            "oracle_request",
            json!({
                "role": self.role,
                "model": self.inner.model().to_string(),
                "prompt": prompt,
                "samples": samples,
                "stop": stop,
            }),
        ));

        let result = self.inner.complete(prompt, samples, stop).await;
        match &result {
            Ok(completions) => self.logger.log(ConversationEvent::new(
                "oracle_response",
                json!({
                    "role": self.role,
                    "completions": completions,
                }),
            )),
            Err(e) => self.logger.log(ConversationEvent::new(
                "oracle_error",
                json!({
                    "role": self.role,
                    "error": e.to_string(),
                }),
            )),
        }
        result
    }
}
