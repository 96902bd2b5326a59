//! Dataset fixtures and test case definitions.
//!
//! A dataset exists only for the duration of a suite run: it is created
//! and fed one source document up front, queried by the agent, and deleted
//! on teardown. Teardown is best-effort, matching how the knowledge tool's
//! own fixtures behave.

use crate::error::Result;
use crate::knowledge::KnowledgeCli;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

/// A question with its expected-answer constraint.
///
/// The constraint is natural language: "or"-phrased constraints accept any
/// one alternative, comma-joined fragments each need to be present. An
/// empty constraint means the case passes without judging.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestCase {
    pub question: String,
    pub expected: String,
}

impl TestCase {
    pub fn new(question: impl Into<String>, expected: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            expected: expected.into(),
        }
    }
}

/// A named dataset, its source document, and the cases scoped to it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetSuite {
    /// Dataset name passed to the knowledge CLI.
    pub dataset: String,
    /// Source document ingested into the dataset.
    pub source: PathBuf,
    /// Test cases to run against the dataset.
    pub cases: Vec<TestCase>,
}

impl DatasetSuite {
    pub fn new(dataset: impl Into<String>, source: impl Into<PathBuf>) -> Self {
        Self {
            dataset: dataset.into(),
            source: source.into(),
            cases: Vec::new(),
        }
    }

    pub fn with_case(mut self, question: &str, expected: &str) -> Self {
        self.cases.push(TestCase::new(question, expected));
        self
    }

    /// Load suites from a JSON file.
    pub fn load_json(path: &Path) -> Result<Vec<Self>> {
        let content =
            std::fs::read_to_string(path).map_err(|e| crate::error::EvalError::io(path, e))?;
        let suites: Vec<DatasetSuite> = serde_json::from_str(&content)?;
        Ok(suites)
    }
}

/// A live dataset created through the knowledge CLI.
///
/// Dropping the fixture deletes the dataset; deletion failures are logged,
/// never raised.
pub struct DatasetFixture {
    cli: KnowledgeCli,
    name: String,
    deleted: bool,
}

impl DatasetFixture {
    /// Create the dataset and ingest its source document.
    pub fn create(cli: KnowledgeCli, name: &str, source: &Path) -> Result<Self> {
        cli.create_dataset(name)?;
        cli.ingest(name, source)?;

        Ok(Self {
            cli,
            name: name.to_string(),
            deleted: false,
        })
    }

    /// The dataset name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Delete the dataset now instead of waiting for drop.
    pub fn teardown(mut self) {
        self.delete();
    }

    fn delete(&mut self) {
        if self.deleted {
            return;
        }
        self.deleted = true;

        if let Err(e) = self.cli.delete_dataset(&self.name) {
            warn!(dataset = %self.name, error = %e, "failed to delete dataset");
        }
    }
}

impl Drop for DatasetFixture {
    fn drop(&mut self) {
        self.delete();
    }
}

/// The built-in evaluation suites.
///
/// Source documents are resolved relative to `data_dir`.
pub fn builtin_suites(data_dir: &Path) -> Vec<DatasetSuite> {
    vec![
        DatasetSuite::new("CBA-Spreads", data_dir.join("2023-Annual-Report-Spreads.pdf"))
            .with_case(
                "What is CBA NPAT this year?",
                "$10,188 million or $10,164 million",
            )
            .with_case("What's the address of CBA in Syndey?", "11 Harbour Street")
            .with_case(
                "What are the top 3 holders of CommBank PERLS XV Capital Notes?",
                "BNP, HSBC, Citi",
            )
            .with_case(
                "How much net profit did New Zealand contribute in 2023?",
                "1,356, million",
            )
            .with_case(
                "How much net profit did New Zealand contribute in 2022?",
                "1,265, million",
            )
            .with_case("How did H2O.ai help CBA?", "world-leading talent"),
        DatasetSuite::new("TD-Bank", data_dir.join("2023-td-bank-reports.tar.bz2"))
            .with_case(
                "What were Total Liabilities at the end of First Quarter 2023?",
                "1,816, billion",
            )
            .with_case("How many branches does TD Bank have in Canada?", "1,060")
            .with_case(
                "How many Active U.S. banking mobile users does TD Bank have?",
                "4.8 million",
            ),
        DatasetSuite::new("intel", data_dir.join("intel-q4-2022-financial-and-business-report_F.pdf"))
            .with_case("What was FY22 total revenue?", "63.1 billion")
            .with_case(
                "What was the code name of the 4th gen xeon processors?",
                "Sapphire Rapids",
            )
            .with_case("What's the world record for overclocking?", "9.008 GHz"),
        DatasetSuite::new("Femsa", data_dir.join("Coca-Cola-FEMSA-Results-1Q23-vf-2.pdf"))
            .with_case("What was the revenue of Brazil?", "15,969, million")
            .with_case("What was the revenue of Mexico?", "27,229, million")
            .with_case("How did gross profit change YoY for South America?", "11.0%")
            .with_case("When was the cybersecurity incident announced?", "April 26")
            .with_case("Did inflation affect gross profit?", "inflation affected gross profit.")
            .with_case(
                "What country had the largest revenue and how much was it?",
                "Mexico, 27,229, million",
            ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_suites() {
        let suites = builtin_suites(Path::new("data"));
        assert!(!suites.is_empty());

        let cba = suites.iter().find(|s| s.dataset == "CBA-Spreads").unwrap();
        assert_eq!(cba.source, Path::new("data/2023-Annual-Report-Spreads.pdf"));
        assert!(cba.cases.iter().any(|c| {
            c.question == "What is CBA NPAT this year?"
                && c.expected == "$10,188 million or $10,164 million"
        }));

        for suite in &suites {
            assert!(!suite.cases.is_empty());
            for case in &suite.cases {
                assert!(!case.question.is_empty());
            }
        }
    }

    #[test]
    fn test_suites_json_roundtrip() {
        let suites = vec![
            DatasetSuite::new("docs", "data/docs.pdf").with_case("What is X?", "X is Y"),
        ];
        let json = serde_json::to_string(&suites).unwrap();
        let parsed: Vec<DatasetSuite> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].dataset, "docs");
        assert_eq!(parsed[0].cases[0].expected, "X is Y");
    }
}
