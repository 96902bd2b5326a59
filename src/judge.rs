//! LLM-as-judge protocol for answer correctness.
//!
//! The judge decides whether a produced answer satisfies a natural-language
//! expected-answer constraint. An empty constraint is a vacuous pass and
//! never reaches the model.

use crate::error::{EvalError, Result};
use crate::llm::{ChatOptions, LlmClient, Message, Prompts, extract_json};
use serde::{Deserialize, Serialize};

/// Ruling for a single answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Verdict {
    /// Whether the answer satisfies the constraint.
    pub correct: bool,
    /// Brief explanation from the judge.
    pub reasoning: String,
}

/// Payload sent to the judge as the user message.
#[derive(Debug, Serialize)]
struct JudgePayload<'a> {
    final_answer: &'a str,
    final_answer_should: &'a str,
}

/// LLM-backed answer judge.
pub struct Judge {
    client: LlmClient,
    model: String,
}

impl Judge {
    /// Create a new judge using the given client and judge model.
    pub fn new(client: LlmClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    /// Judge `final_answer` against the `expected` constraint.
    ///
    /// An empty constraint skips the judge entirely and passes. Constraint
    /// semantics are delegated to the model: "or"-phrased constraints are
    /// satisfied by any one alternative, comma-joined fragments each need a
    /// semantic equivalent present.
    pub async fn verdict(&self, final_answer: &str, expected: &str) -> Result<Verdict> {
        if expected.is_empty() {
            return Ok(Verdict {
                correct: true,
                reasoning: "no expected answer constraint".to_string(),
            });
        }

        let payload = serde_json::to_string(&JudgePayload {
            final_answer,
            final_answer_should: expected,
        })?;

        let messages = vec![Message::system(Prompts::judge_system()), Message::user(payload)];

        let response = self
            .client
            .chat(
                messages,
                ChatOptions {
                    model: Some(self.model.clone()),
                    json: true,
                },
            )
            .await?;

        Self::parse_ruling(&response.content)
    }

    /// Parse the judge reply into a typed ruling.
    ///
    /// Missing required keys or malformed JSON are a data-integrity failure,
    /// not retried.
    fn parse_ruling(response: &str) -> Result<Verdict> {
        let json_str = extract_json(response);

        #[derive(Deserialize)]
        struct RawRuling {
            correct: bool,
            reasoning: String,
        }

        let raw: RawRuling = serde_json::from_str(&json_str).map_err(|e| {
            EvalError::JudgeSchema(format!("{}. Response: {}", e, response))
        })?;

        Ok(Verdict {
            correct: raw.correct,
            reasoning: raw.reasoning,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{EmbeddingConfig, LlmConfig};

    fn test_judge() -> Judge {
        let client = LlmClient::new(LlmConfig::default(), EmbeddingConfig::default());
        Judge::new(client, "gpt-4-turbo-preview")
    }

    #[test]
    fn test_parse_ruling() {
        let response = r#"{"correct": true, "reasoning": "The answer contains $10,188 million."}"#;
        let verdict = Judge::parse_ruling(response).unwrap();

        assert!(verdict.correct);
        assert!(verdict.reasoning.contains("$10,188 million"));
    }

    #[test]
    fn test_parse_ruling_missing_key_is_schema_error() {
        let response = r#"{"correct": true}"#;
        let err = Judge::parse_ruling(response).unwrap_err();

        assert!(matches!(err, EvalError::JudgeSchema(_)));
    }

    #[test]
    fn test_parse_ruling_malformed_json_is_schema_error() {
        let err = Judge::parse_ruling("the answer looks right to me").unwrap_err();

        assert!(matches!(err, EvalError::JudgeSchema(_)));
    }

    #[tokio::test]
    async fn test_empty_constraint_is_vacuous_pass() {
        // No LLM call happens: the default config has no reachable endpoint,
        // so anything but the short-circuit path would error.
        let verdict = test_judge().verdict("whatever was answered", "").await.unwrap();

        assert!(verdict.correct);
    }

    #[test]
    fn test_judge_payload_shape() {
        let payload = serde_json::to_string(&JudgePayload {
            final_answer: "NPAT was $10,188 million",
            final_answer_should: "$10,188 million or $10,164 million",
        })
        .unwrap();

        assert!(payload.contains(r#""final_answer":"NPAT was $10,188 million""#));
        assert!(payload.contains(r#""final_answer_should":"$10,188 million or $10,164 million""#));
    }
}
