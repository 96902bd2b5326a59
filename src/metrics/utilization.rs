//! Context utilization: fraction of retrieved chunks useful to the answer.

use crate::error::Result;
use crate::llm::{LlmClient, Prompts};
use tracing::warn;

/// Score what fraction of each item's context chunks were useful.
///
/// Every chunk is judged independently with a binary usefulness verdict;
/// the item score is exactly `useful / total`. Items with no chunks score
/// 0.0. A chunk verdict that cannot be parsed counts as not useful.
pub async fn context_utilization(
    client: &LlmClient,
    questions: &[String],
    answers: &[String],
    contexts: &[Vec<String>],
) -> Result<Vec<f64>> {
    assert_eq!(questions.len(), answers.len());
    assert_eq!(questions.len(), contexts.len());

    let mut res = Vec::with_capacity(questions.len());
    for ((question, answer), ctxs) in questions.iter().zip(answers.iter()).zip(contexts.iter()) {
        if ctxs.is_empty() {
            res.push(0.0);
            continue;
        }

        let mut useful = 0usize;
        for chunk in ctxs {
            let prompt = Prompts::context_utilization()
                .replace("{question}", question)
                .replace("{answer}", answer)
                .replace("{context}", chunk);

            let response = client.complete(None, &prompt).await?;
            useful += parse_verdict(&response);
        }

        res.push(useful as f64 / ctxs.len() as f64);
    }

    Ok(res)
}

/// Parse a bare 0/1 verdict reply.
fn parse_verdict(response: &str) -> usize {
    match response.trim().parse::<i64>() {
        Ok(v) => v.clamp(0, 1) as usize,
        Err(e) => {
            warn!(error = %e, response, "unparseable chunk verdict, counting as not useful");
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_verdict() {
        assert_eq!(parse_verdict("1"), 1);
        assert_eq!(parse_verdict("0"), 0);
        assert_eq!(parse_verdict(" 1\n"), 1);
    }

    #[test]
    fn test_parse_verdict_clamps_and_defaults() {
        assert_eq!(parse_verdict("7"), 1);
        assert_eq!(parse_verdict("-2"), 0);
        assert_eq!(parse_verdict("useful"), 0);
    }

    #[test]
    fn test_fraction_arithmetic() {
        // contexts ["A","B","C"] with verdicts [1,0,1] -> 2/3
        let verdicts = [1usize, 0, 1];
        let useful: usize = verdicts.iter().sum();
        let score = useful as f64 / verdicts.len() as f64;
        assert!((score - 2.0 / 3.0).abs() < 1e-9);
    }
}
