//! Agent-based query execution through gptscript.
//!
//! A question is answered by a two-tool agent: a root tool whose
//! instructions pose the question, and a `retrieve` tool that forwards a
//! query string to the knowledge CLI with a fixed result count. The tool
//! spec is rendered in gptscript's textual format, written to a temp file,
//! and executed synchronously.

use crate::config::ToolsConfig;
use crate::error::{EvalError, Result};
use std::io::Write;
use std::process::Command;

/// Environment variable the gptscript runtime reads its system prompt from.
const SYSTEM_PROMPT_ENV: &str = "GPTSCRIPT_INTERNAL_SYSTEM_PROMPT";

/// Runs retrieval-augmented question answering through the gptscript binary.
#[derive(Debug, Clone)]
pub struct AgentRunner {
    gptscript_bin: String,
    knowledge_bin: String,
    retrieve_top_k: usize,
    system_prompt: String,
}

impl AgentRunner {
    /// Create a runner from tool configuration.
    pub fn from_config(tools: &ToolsConfig) -> Self {
        Self {
            gptscript_bin: tools.gptscript_bin.clone(),
            knowledge_bin: tools.knowledge_bin.clone(),
            retrieve_top_k: tools.retrieve_top_k,
            system_prompt: tools.agent_system_prompt.clone(),
        }
    }

    /// Ask a question against a dataset and return the generated answer.
    ///
    /// The answer has newlines flattened out so it can be embedded in
    /// assertion messages and judge payloads as a single line.
    pub fn ask(&self, dataset: &str, question: &str) -> Result<String> {
        let spec = self.render_tool_spec(dataset, question);

        let mut file = tempfile::Builder::new()
            .prefix("knowledge-eval-")
            .suffix(".gpt")
            .tempfile()
            .map_err(|e| EvalError::AgentRun(format!("failed to create tool file: {}", e)))?;
        file.write_all(spec.as_bytes())
            .map_err(|e| EvalError::AgentRun(format!("failed to write tool file: {}", e)))?;

        let output = Command::new(&self.gptscript_bin)
            .arg("--quiet")
            .arg(file.path())
            // The system prompt travels on the child environment only.
            .env(SYSTEM_PROMPT_ENV, &self.system_prompt)
            .output()
            .map_err(|e| EvalError::io(&self.gptscript_bin, e))?;

        if !output.status.success() {
            return Err(EvalError::CommandFailed {
                program: self.gptscript_bin.clone(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        let answer = String::from_utf8_lossy(&output.stdout).replace('\n', "");
        Ok(answer)
    }

    /// Render the two-tool agent spec in gptscript's textual tool format.
    fn render_tool_spec(&self, dataset: &str, question: &str) -> String {
        format!(
            r#"Tools: retrieve

{question}

---
Name: retrieve
Description: Retrieve information from a Knowledge Base Dataset
Args: query: Query to be executed against the Knowledge Base Dataset

#!{knowledge} retrieve -d {dataset} -k {top_k} ${{query}}
"#,
            question = question,
            knowledge = self.knowledge_bin,
            dataset = dataset,
            top_k = self.retrieve_top_k,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_runner() -> AgentRunner {
        AgentRunner::from_config(&ToolsConfig::default())
    }

    #[test]
    fn test_tool_spec_contains_question_and_retrieve_line() {
        let spec = test_runner().render_tool_spec("CBA-Spreads", "What is CBA NPAT this year?");

        assert!(spec.starts_with("Tools: retrieve"));
        assert!(spec.contains("What is CBA NPAT this year?"));
        assert!(spec.contains("#!knowledge retrieve -d CBA-Spreads -k 20 ${query}"));
    }

    #[test]
    fn test_tool_spec_respects_configured_binary_and_top_k() {
        let tools = ToolsConfig {
            knowledge_bin: "/opt/bin/knowledge".to_string(),
            retrieve_top_k: 5,
            ..Default::default()
        };
        let spec = AgentRunner::from_config(&tools).render_tool_spec("intel", "q");

        assert!(spec.contains("#!/opt/bin/knowledge retrieve -d intel -k 5 ${query}"));
    }
}
