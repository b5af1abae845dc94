//! Oracle-backed verifier.
//!
//! Asks a dedicated oracle (usually with lower temperature) to review one
//! reasoning trace. The verdict is positive iff the response contains
//! "reasoning is valid"; a response without the phrase is a rejection, not
//! an error.

use crate::ports::oracle::{Oracle, OracleError};
use crate::ports::verifier::{Verdict, Verifier};
use async_trait::async_trait;
use std::sync::Arc;
use tq_domain::{VerifierTemplate, parse_verification};
use tracing::debug;

pub struct OracleVerifier {
    oracle: Arc<dyn Oracle>,
}

impl OracleVerifier {
    pub fn new(oracle: Arc<dyn Oracle>) -> Self {
        Self { oracle }
    }
}

#[async_trait]
impl Verifier for OracleVerifier {
    async fn judge(&self, reasoning: &str, problem: &str) -> Result<Verdict, OracleError> {
        let prompt = VerifierTemplate::verify(problem, reasoning);
        let response = self
            .oracle
            .complete(&prompt, 1, None)
            .await?
            .into_iter()
            .next()
            .unwrap_or_default();

        let (valid, rationale) = parse_verification(&response);
        debug!("Verifier ({}) verdict: {}", self.oracle.model(), valid);
        Ok(Verdict::new(valid, rationale))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tq_domain::Model;

    struct CannedOracle {
        model: Model,
        response: Option<&'static str>,
        prompts: Mutex<Vec<(String, usize)>>,
    }

    impl CannedOracle {
        fn new(response: Option<&'static str>) -> Self {
            Self {
                model: Model::Gpt4o,
                response,
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Oracle for CannedOracle {
        fn model(&self) -> &Model {
            &self.model
        }

        async fn complete(
            &self,
            prompt: &str,
            samples: usize,
            _stop: Option<&str>,
        ) -> Result<Vec<String>, OracleError> {
            self.prompts
                .lock()
                .unwrap()
                .push((prompt.to_string(), samples));
            Ok(self.response.map(String::from).into_iter().collect())
        }
    }

    #[tokio::test]
    async fn test_valid_phrase_any_case() {
        let oracle = Arc::new(CannedOracle::new(Some("Steps check out.\nReasoning is Valid")));
        let verifier = OracleVerifier::new(oracle.clone());

        let verdict = verifier.judge("the answer is 4", "2+2=?").await.unwrap();
        assert!(verdict.valid);
        assert!(verdict.rationale.contains("Steps check out."));

        let prompts = oracle.prompts.lock().unwrap();
        assert_eq!(prompts[0].1, 1);
        assert!(prompts[0].0.contains("Question: 2+2=?"));
        assert!(prompts[0].0.contains("Reasoning to verify:\nthe answer is 4"));
    }

    #[tokio::test]
    async fn test_missing_phrase_is_invalid() {
        let verifier = OracleVerifier::new(Arc::new(CannedOracle::new(Some(
            "The arithmetic in step 2 is wrong. Reasoning is Invalid",
        ))));
        let verdict = verifier.judge("x", "q").await.unwrap();
        assert!(!verdict.valid);
    }

    #[tokio::test]
    async fn test_empty_response_is_invalid() {
        let verifier = OracleVerifier::new(Arc::new(CannedOracle::new(None)));
        let verdict = verifier.judge("x", "q").await.unwrap();
        assert!(!verdict.valid);
        assert_eq!(verdict.rationale, "");
    }
}
