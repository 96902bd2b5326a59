//! Answer faithfulness: factual consistency of an answer with its context.

use super::mean_or_zero;
use crate::error::Result;
use crate::llm::{LlmClient, Prompts, extract_json};
use serde::Deserialize;
use tracing::warn;

/// One decomposed statement with its inferability verdict.
#[derive(Debug, Deserialize)]
struct StatementVerdict {
    #[allow(dead_code)]
    statement: String,
    verdict: u8,
}

/// Score how faithful each answer is to its retrieved context.
///
/// Each answer is decomposed into atomic factual statements by one LLM call;
/// each statement is labeled 1 if it can be directly inferred from the
/// context, 0 otherwise. The item score is the mean of the verdicts, 0.0
/// when no statements were extracted.
pub async fn answer_faithfulness(
    client: &LlmClient,
    answers: &[String],
    contexts: &[Vec<String>],
) -> Result<Vec<f64>> {
    assert_eq!(answers.len(), contexts.len());

    let mut res = Vec::with_capacity(answers.len());
    for (answer, ctxs) in answers.iter().zip(contexts.iter()) {
        let prompt = Prompts::faithfulness()
            .replace("{answer}", answer)
            .replace("{context}", &ctxs.join("\n"));

        let response = client.complete(None, &prompt).await?;
        res.push(score_statements(&response));
    }

    Ok(res)
}

/// Parse the statement list and reduce to a score.
fn score_statements(response: &str) -> f64 {
    let verdicts: Vec<StatementVerdict> = match serde_json::from_str(&extract_json(response)) {
        Ok(v) => v,
        Err(e) => {
            warn!(error = %e, "failed to parse faithfulness statements, scoring 0");
            return 0.0;
        }
    };

    let scores: Vec<f64> = verdicts.iter().map(|v| v.verdict.min(1) as f64).collect();
    mean_or_zero(&scores)
}
