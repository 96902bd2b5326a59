//! Knowledge Evals - a test and evaluation harness for a RAG knowledge tool.
//!
//! The harness ingests documents into named datasets through the external
//! `knowledge` CLI, asks questions against those datasets through a
//! gptscript agent (a root instruction tool plus a `retrieve` tool), and
//! judges the returned answers against expected-answer constraints with an
//! LLM-as-judge protocol. It also computes standalone RAG quality metrics
//! (faithfulness, answer relevancy, context utilization) by prompting a
//! hosted chat model and comparing embeddings.
//!
//! Retrieval, ingestion, embedding, and generation themselves are external
//! collaborators reached through CLI invocations and an OpenAI-compatible
//! HTTP API; this crate only orchestrates them and scores the results.
//!
//! # Quick Start
//!
//! ```no_run
//! use knowledge_evals::{
//!     config::Config,
//!     dataset::builtin_suites,
//!     harness::Harness,
//! };
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     // Load configuration
//!     let config = Config::load()?;
//!     config.validate()?;
//!
//!     // Run the built-in suites
//!     let harness = Harness::new(&config);
//!     let report = harness.run_all(&builtin_suites(Path::new("data"))).await;
//!
//!     report.print_summary();
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - **KnowledgeCli**: argument construction + invocation of the knowledge CLI
//! - **AgentRunner**: two-tool gptscript spec rendering and execution
//! - **Judge**: LLM-backed answer-vs-constraint ruling
//! - **metrics**: faithfulness / relevancy / context-utilization scoring
//! - **Harness**: dataset fixtures, sequential case runs, reporting

pub mod agent;
pub mod config;
pub mod dataset;
pub mod error;
pub mod harness;
pub mod judge;
pub mod knowledge;
pub mod llm;
pub mod metrics;
pub mod output;

// Re-export commonly used types
pub use agent::AgentRunner;
pub use config::Config;
pub use dataset::{DatasetFixture, DatasetSuite, TestCase, builtin_suites};
pub use error::{EvalError, Result};
pub use harness::{CaseResult, Harness, RunReport, SuiteResult};
pub use judge::{Judge, Verdict};
pub use knowledge::KnowledgeCli;
pub use llm::LlmClient;
pub use metrics::{
    MetricInputs, MetricReport, answer_faithfulness, answer_relevancy, context_utilization,
};
pub use output::format_knowledge_output;
