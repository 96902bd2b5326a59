//! RAG quality metrics.
//!
//! Each metric is a stateless scoring function over parallel input slices:
//! one chat (or embedding) call per item, a parsed JSON or scalar reply,
//! and a reduction to a score in [0,1].
//!
//! Parse-failure policy: a reply that cannot be parsed scores its item 0.0
//! and logs a warning. Result vectors always have the same length as the
//! inputs, and empty verdict lists score 0.0 rather than NaN.

mod faithfulness;
mod relevancy;
mod utilization;

pub use faithfulness::answer_faithfulness;
pub use relevancy::answer_relevancy;
pub use utilization::context_utilization;

use crate::error::Result;
use crate::llm::LlmClient;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Compute cosine similarity between two vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

/// Mean of a verdict list, 0.0 when empty.
pub(crate) fn mean_or_zero(verdicts: &[f64]) -> f64 {
    if verdicts.is_empty() {
        0.0
    } else {
        verdicts.iter().sum::<f64>() / verdicts.len() as f64
    }
}

/// Parallel input lists for a metric run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricInputs {
    /// The original questions.
    pub questions: Vec<String>,
    /// The answers generated by the pipeline under test.
    pub answers: Vec<String>,
    /// Retrieved context chunks, one list per item.
    pub contexts: Vec<Vec<String>>,
}

impl MetricInputs {
    /// Load inputs from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|e| crate::error::EvalError::io(path, e))?;
        let inputs: MetricInputs = serde_json::from_str(&content)?;
        Ok(inputs)
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.answers.len()
    }

    /// Check if there are no items.
    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }
}

/// Per-item scores for all metrics over one input set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricReport {
    pub faithfulness: Vec<f64>,
    pub relevancy: Vec<f64>,
    pub context_utilization: Vec<f64>,
}

impl MetricReport {
    /// Compute all three metrics for the given inputs.
    pub async fn compute(client: &LlmClient, inputs: &MetricInputs) -> Result<Self> {
        Ok(Self {
            faithfulness: answer_faithfulness(client, &inputs.answers, &inputs.contexts).await?,
            relevancy: answer_relevancy(client, &inputs.questions, &inputs.answers).await?,
            context_utilization: context_utilization(
                client,
                &inputs.questions,
                &inputs.answers,
                &inputs.contexts,
            )
            .await?,
        })
    }

    /// Print per-metric means and item scores to stdout.
    pub fn print_summary(&self) {
        println!("\n========== Metric Results ==========");
        Self::print_metric("Faithfulness", &self.faithfulness);
        Self::print_metric("Relevancy", &self.relevancy);
        Self::print_metric("Context utilization", &self.context_utilization);
        println!("====================================\n");
    }

    fn print_metric(name: &str, scores: &[f64]) {
        println!("{:<20} mean {:.3}", name, mean_or_zero(scores));
        for (idx, score) in scores.iter().enumerate() {
            println!("  [{}] {:.3}", idx, score);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_similarity() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![1.0, 0.0, 0.0];
        assert!((cosine_similarity(&a, &b) - 1.0).abs() < 1e-6);

        let c = vec![0.0, 1.0, 0.0];
        assert!(cosine_similarity(&a, &c).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_similarity_zero_vector() {
        let a = vec![0.0, 0.0];
        let b = vec![1.0, 1.0];
        assert_eq!(cosine_similarity(&a, &b), 0.0);
    }

    #[test]
    fn test_mean_or_zero() {
        assert_eq!(mean_or_zero(&[]), 0.0);
        assert!((mean_or_zero(&[1.0, 0.0, 1.0]) - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_metric_inputs_parse() {
        let json = r#"{
            "questions": ["When was the first super bowl?"],
            "answers": ["The first superbowl was held on Jan 15, 1967"],
            "contexts": [["The First AFL-NFL World Championship Game was played on January 15, 1967"]]
        }"#;
        let inputs: MetricInputs = serde_json::from_str(json).unwrap();
        assert_eq!(inputs.len(), 1);
        assert_eq!(inputs.contexts[0].len(), 1);
    }
}
