//! LLM integration module.
//!
//! Provides an OpenAI-compatible client for chat and embedding calls and
//! the prompts used for judging and metric scoring.

mod client;
mod prompts;

pub use client::{ChatOptions, LlmClient, LlmResponse, Message, Role, TokenUsage};
pub use prompts::Prompts;

/// Extract a JSON payload from a model reply.
///
/// Models occasionally wrap JSON in markdown code fences or surround it
/// with prose despite instructions not to; strip that before parsing.
pub fn extract_json(response: &str) -> String {
    let response = response.trim();

    if response.starts_with("```json") {
        if let Some(end) = response.rfind("```") {
            let start = "```json".len();
            if end > start {
                return response[start..end].trim().to_string();
            }
        }
    }

    if response.starts_with("```") {
        if let Some(end) = response.rfind("```") {
            let start = response.find('\n').map(|n| n + 1).unwrap_or(3);
            if end > start {
                return response[start..end].trim().to_string();
            }
        }
    }

    if let Some(start) = response.find(['{', '[']) {
        let end = match &response[start..start + 1] {
            "{" => response.rfind('}'),
            _ => response.rfind(']'),
        };
        if let Some(end) = end {
            if end > start {
                return response[start..=end].to_string();
            }
        }
    }

    response.to_string()
}

#[cfg(test)]
mod tests {
    use super::extract_json;

    #[test]
    fn test_extract_json_plain() {
        let raw = r#"{"correct": true, "reasoning": "matches"}"#;
        assert_eq!(extract_json(raw), raw);
    }

    #[test]
    fn test_extract_json_fenced() {
        let raw = "```json\n{\"correct\": false}\n```";
        assert_eq!(extract_json(raw), "{\"correct\": false}");
    }

    #[test]
    fn test_extract_json_array_with_prose() {
        let raw = "Here you go:\n[{\"verdict\": 1}]";
        assert_eq!(extract_json(raw), "[{\"verdict\": 1}]");
    }
}
