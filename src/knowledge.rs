//! Invocation of the external `knowledge` CLI.
//!
//! Dataset lifecycle and retrieval are delegated to the knowledge tool;
//! this module only constructs argument vectors and runs the binary
//! synchronously, surfacing non-zero exits with captured stderr.

use crate::config::ToolsConfig;
use crate::error::{EvalError, Result};
use std::path::Path;
use std::process::Command;

/// Handle for the `knowledge` command-line tool.
#[derive(Debug, Clone)]
pub struct KnowledgeCli {
    bin: String,
}

impl KnowledgeCli {
    /// Create a handle for a specific binary path.
    pub fn new(bin: impl Into<String>) -> Self {
        Self { bin: bin.into() }
    }

    /// Create a handle from tool configuration.
    pub fn from_config(tools: &ToolsConfig) -> Self {
        Self::new(tools.knowledge_bin.clone())
    }

    /// The binary this handle invokes.
    pub fn bin(&self) -> &str {
        &self.bin
    }

    /// Create a named dataset.
    pub fn create_dataset(&self, name: &str) -> Result<String> {
        self.run(&Self::create_dataset_args(name))
    }

    /// Ingest a source file into a dataset.
    pub fn ingest(&self, name: &str, file: &Path) -> Result<String> {
        self.run(&Self::ingest_args(name, file))
    }

    /// Delete a named dataset.
    pub fn delete_dataset(&self, name: &str) -> Result<String> {
        self.run(&Self::delete_dataset_args(name))
    }

    /// Retrieve context chunks for a query against a dataset.
    pub fn retrieve(&self, name: &str, top_k: usize, query: &str) -> Result<String> {
        self.run(&Self::retrieve_args(name, top_k, query))
    }

    fn create_dataset_args(name: &str) -> Vec<String> {
        vec!["create-dataset".to_string(), name.to_string()]
    }

    fn ingest_args(name: &str, file: &Path) -> Vec<String> {
        vec![
            "ingest".to_string(),
            "-d".to_string(),
            name.to_string(),
            file.display().to_string(),
        ]
    }

    fn delete_dataset_args(name: &str) -> Vec<String> {
        vec!["delete-dataset".to_string(), name.to_string()]
    }

    fn retrieve_args(name: &str, top_k: usize, query: &str) -> Vec<String> {
        vec![
            "retrieve".to_string(),
            "-d".to_string(),
            name.to_string(),
            "-k".to_string(),
            top_k.to_string(),
            query.to_string(),
        ]
    }

    /// Run the binary with the given arguments and return captured stdout.
    fn run(&self, args: &[String]) -> Result<String> {
        let output = Command::new(&self.bin)
            .args(args)
            .output()
            .map_err(|e| EvalError::io(&self.bin, e))?;

        if !output.status.success() {
            return Err(EvalError::CommandFailed {
                program: self.bin.clone(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_create_dataset_args() {
        assert_eq!(
            KnowledgeCli::create_dataset_args("CBA-Spreads"),
            vec!["create-dataset", "CBA-Spreads"]
        );
    }

    #[test]
    fn test_ingest_args() {
        let file = PathBuf::from("data/2023-Annual-Report-Spreads.pdf");
        assert_eq!(
            KnowledgeCli::ingest_args("CBA-Spreads", &file),
            vec![
                "ingest",
                "-d",
                "CBA-Spreads",
                "data/2023-Annual-Report-Spreads.pdf"
            ]
        );
    }

    #[test]
    fn test_retrieve_args() {
        assert_eq!(
            KnowledgeCli::retrieve_args("Femsa", 20, "What was the revenue of Brazil?"),
            vec![
                "retrieve",
                "-d",
                "Femsa",
                "-k",
                "20",
                "What was the revenue of Brazil?"
            ]
        );
    }

    #[test]
    fn test_delete_dataset_args() {
        assert_eq!(
            KnowledgeCli::delete_dataset_args("intel"),
            vec!["delete-dataset", "intel"]
        );
    }
}
