//! Answer relevancy: alignment of an answer with the original question.

use super::{cosine_similarity, mean_or_zero};
use crate::error::Result;
use crate::llm::{LlmClient, Prompts, extract_json};
use serde::Deserialize;
use tracing::warn;

/// Reverse-generated question plus the noncommittal flag.
#[derive(Debug, Deserialize)]
struct GeneratedQuestion {
    question: String,
    noncommittal: u8,
}

/// Score how closely each answer aligns with its question.
///
/// A probable question is reverse-generated from the answer, then compared
/// to the original question by embedding cosine similarity. The similarity
/// mean is weighted by `(1 - noncommittal)`: an evasive answer ("I don't
/// know") scores 0.0 regardless of similarity. Parse failures score the
/// item 0.0.
pub async fn answer_relevancy(
    client: &LlmClient,
    questions: &[String],
    answers: &[String],
) -> Result<Vec<f64>> {
    assert_eq!(questions.len(), answers.len());

    let mut res = Vec::with_capacity(questions.len());
    for (question, answer) in questions.iter().zip(answers.iter()) {
        let prompt = Prompts::answer_relevancy().replace("{given_answer}", answer);
        let response = client.complete(None, &prompt).await?;

        let generated: GeneratedQuestion = match serde_json::from_str(&extract_json(&response)) {
            Ok(g) => g,
            Err(e) => {
                warn!(error = %e, "failed to parse generated question, scoring 0");
                res.push(0.0);
                continue;
            }
        };

        if generated.noncommittal.min(1) == 1 {
            res.push(0.0);
            continue;
        }

        let question_vec = client.embed(std::slice::from_ref(question)).await?;
        let generated_vecs = client.embed(&[generated.question]).await?;

        if question_vec.is_empty() {
            warn!("embedding response carried no vectors, scoring 0");
            res.push(0.0);
            continue;
        }

        let similarities: Vec<f64> = generated_vecs
            .iter()
            .map(|g| cosine_similarity(&question_vec[0], g) as f64)
            .collect();

        res.push(mean_or_zero(&similarities));
    }

    Ok(res)
}
