//! Suite runner: query execution, judging, and reporting.

use crate::agent::AgentRunner;
use crate::config::Config;
use crate::dataset::{DatasetFixture, DatasetSuite, TestCase};
use crate::error::Result;
use crate::judge::{Judge, Verdict};
use crate::knowledge::KnowledgeCli;
use crate::llm::LlmClient;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::info;

/// Outcome of a single test case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseResult {
    /// The question asked.
    pub question: String,
    /// The answer returned by the agent (if the run got that far).
    pub answer: Option<String>,
    /// The expected-answer constraint.
    pub expected: String,
    /// The judge's ruling (if judging completed).
    pub verdict: Option<Verdict>,
    /// Error message if the case could not be completed.
    pub error: Option<String>,
}

impl CaseResult {
    /// A case passes only with an affirmative ruling.
    pub fn passed(&self) -> bool {
        self.verdict.as_ref().is_some_and(|v| v.correct)
    }
}

/// Aggregated results for one dataset suite.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteResult {
    /// Dataset name.
    pub dataset: String,
    /// Per-case outcomes.
    pub cases: Vec<CaseResult>,
    /// Error that prevented the suite from running at all.
    pub setup_error: Option<String>,
}

impl SuiteResult {
    /// Number of passed cases.
    pub fn passed_count(&self) -> usize {
        self.cases.iter().filter(|c| c.passed()).count()
    }

    /// Pass rate as a fraction in [0,1].
    pub fn pass_rate(&self) -> f64 {
        if self.cases.is_empty() {
            0.0
        } else {
            self.passed_count() as f64 / self.cases.len() as f64
        }
    }

    /// Whether every case passed.
    pub fn passed(&self) -> bool {
        self.setup_error.is_none() && self.cases.iter().all(|c| c.passed())
    }
}

/// Aggregated results across all suites.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// Per-suite results.
    pub suites: Vec<SuiteResult>,
    /// Total run time (seconds).
    pub total_time_secs: f64,
}

impl RunReport {
    /// Total number of cases across suites.
    pub fn total_cases(&self) -> usize {
        self.suites.iter().map(|s| s.cases.len()).sum()
    }

    /// Total number of passed cases across suites.
    pub fn passed_cases(&self) -> usize {
        self.suites.iter().map(|s| s.passed_count()).sum()
    }

    /// Whether every suite passed.
    pub fn passed(&self) -> bool {
        self.suites.iter().all(|s| s.passed())
    }

    /// Print summary to stdout.
    pub fn print_summary(&self) {
        println!("\n========== Evaluation Report ==========");
        println!(
            "Cases: {}/{} passed",
            self.passed_cases(),
            self.total_cases()
        );
        println!("---------------------------------------");

        for suite in &self.suites {
            let status = if suite.passed() { "PASS" } else { "FAIL" };
            println!(
                "[{}] {} - {}/{} cases ({:.1}%)",
                status,
                suite.dataset,
                suite.passed_count(),
                suite.cases.len(),
                suite.pass_rate() * 100.0
            );

            if let Some(ref err) = suite.setup_error {
                println!("  Setup error: {}", err);
            }

            for case in &suite.cases {
                if case.passed() {
                    continue;
                }
                println!("  FAILED: {}", case.question);
                println!("    Returned answer: {}", case.answer.as_deref().unwrap_or("(none)"));
                println!("    Expected answer: {}", case.expected);
                if let Some(ref verdict) = case.verdict {
                    println!("    Reason: {}", verdict.reasoning);
                }
                if let Some(ref err) = case.error {
                    println!("    Error: {}", err);
                }
            }
        }

        println!("---------------------------------------");
        println!("Total time: {:.1}s", self.total_time_secs);
        println!("=======================================\n");
    }
}

/// Runs dataset suites: fixture setup, agent queries, judging, teardown.
pub struct Harness {
    knowledge: KnowledgeCli,
    agent: AgentRunner,
    judge: Judge,
}

impl Harness {
    /// Build a harness from configuration.
    pub fn new(config: &Config) -> Self {
        let client = LlmClient::new(config.llm.clone(), config.embedding.clone());
        Self {
            knowledge: KnowledgeCli::from_config(&config.tools),
            agent: AgentRunner::from_config(&config.tools),
            judge: Judge::new(client, config.llm.judge_model.clone()),
        }
    }

    /// Run a single case against an existing dataset.
    pub async fn run_case(&self, dataset: &str, case: &TestCase) -> Result<CaseResult> {
        let answer = self.agent.ask(dataset, &case.question)?;
        let verdict = self.judge.verdict(&answer, &case.expected).await?;

        Ok(CaseResult {
            question: case.question.clone(),
            answer: Some(answer),
            expected: case.expected.clone(),
            verdict: Some(verdict),
            error: None,
        })
    }

    /// Run every case of a suite against a fresh dataset fixture.
    ///
    /// A failing case halts only that case; the rest of the suite still
    /// runs. Fixture teardown happens even when cases error.
    pub async fn run_suite(&self, suite: &DatasetSuite) -> SuiteResult {
        info!(dataset = %suite.dataset, cases = suite.cases.len(), "running suite");

        let fixture =
            match DatasetFixture::create(self.knowledge.clone(), &suite.dataset, &suite.source) {
                Ok(fixture) => fixture,
                Err(e) => {
                    return SuiteResult {
                        dataset: suite.dataset.clone(),
                        cases: Vec::new(),
                        setup_error: Some(e.to_string()),
                    };
                }
            };

        let mut cases = Vec::with_capacity(suite.cases.len());
        for case in &suite.cases {
            let result = match self.run_case(fixture.name(), case).await {
                Ok(result) => result,
                Err(e) => CaseResult {
                    question: case.question.clone(),
                    answer: None,
                    expected: case.expected.clone(),
                    verdict: None,
                    error: Some(e.to_string()),
                },
            };
            cases.push(result);
        }

        fixture.teardown();

        SuiteResult {
            dataset: suite.dataset.clone(),
            cases,
            setup_error: None,
        }
    }

    /// Run all suites sequentially and aggregate a report.
    pub async fn run_all(&self, suites: &[DatasetSuite]) -> RunReport {
        let start_time = Instant::now();

        let mut results = Vec::with_capacity(suites.len());
        for suite in suites {
            results.push(self.run_suite(suite).await);
        }

        RunReport {
            suites: results,
            total_time_secs: start_time.elapsed().as_secs_f64(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn passing_case(question: &str) -> CaseResult {
        CaseResult {
            question: question.to_string(),
            answer: Some("answer".to_string()),
            expected: "constraint".to_string(),
            verdict: Some(Verdict {
                correct: true,
                reasoning: "satisfied".to_string(),
            }),
            error: None,
        }
    }

    fn failing_case(question: &str) -> CaseResult {
        CaseResult {
            question: question.to_string(),
            answer: Some("wrong".to_string()),
            expected: "constraint".to_string(),
            verdict: Some(Verdict {
                correct: false,
                reasoning: "does not satisfy".to_string(),
            }),
            error: None,
        }
    }

    #[test]
    fn test_case_result_passed() {
        assert!(passing_case("q").passed());
        assert!(!failing_case("q").passed());

        let errored = CaseResult {
            question: "q".to_string(),
            answer: None,
            expected: "e".to_string(),
            verdict: None,
            error: Some("agent failed".to_string()),
        };
        assert!(!errored.passed());
    }

    #[test]
    fn test_suite_result_counts() {
        let suite = SuiteResult {
            dataset: "test".to_string(),
            cases: vec![passing_case("a"), failing_case("b"), passing_case("c")],
            setup_error: None,
        };

        assert_eq!(suite.passed_count(), 2);
        assert!((suite.pass_rate() - 2.0 / 3.0).abs() < 1e-9);
        assert!(!suite.passed());
    }

    #[test]
    fn test_empty_suite_pass_rate_is_zero() {
        let suite = SuiteResult {
            dataset: "empty".to_string(),
            cases: Vec::new(),
            setup_error: None,
        };
        assert_eq!(suite.pass_rate(), 0.0);
        assert!(suite.passed());
    }

    #[test]
    fn test_run_report_totals() {
        let report = RunReport {
            suites: vec![
                SuiteResult {
                    dataset: "one".to_string(),
                    cases: vec![passing_case("a"), passing_case("b")],
                    setup_error: None,
                },
                SuiteResult {
                    dataset: "two".to_string(),
                    cases: vec![failing_case("c")],
                    setup_error: None,
                },
            ],
            total_time_secs: 1.0,
        };

        assert_eq!(report.total_cases(), 3);
        assert_eq!(report.passed_cases(), 2);
        assert!(!report.passed());
    }

    #[test]
    fn test_setup_error_fails_suite() {
        let suite = SuiteResult {
            dataset: "broken".to_string(),
            cases: Vec::new(),
            setup_error: Some("knowledge: not found".to_string()),
        };
        assert!(!suite.passed());
    }
}
