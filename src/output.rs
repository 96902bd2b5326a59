//! Formatting of retrieved knowledge for downstream model consumption.

use crate::llm::Prompts;

/// Marker the knowledge tool prints ahead of retrieved content.
const RETRIEVAL_MARKER: &str = "Retrieved the following";

/// Message used when the tool output carries no retrieved content.
pub const NO_DATA_MESSAGE: &str = "No data retrieved from knowledge base.";

/// Wrap a retrieval tool's output in the knowledge instruction template.
///
/// Only the part of the output starting at the retrieval marker is kept;
/// output without the marker yields the fixed no-data message.
pub fn format_knowledge_output(output: &str) -> String {
    match output.find(RETRIEVAL_MARKER) {
        Some(idx) => Prompts::knowledge_wrapper().replace("{output}", &output[idx..]),
        None => NO_DATA_MESSAGE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_with_marker_is_wrapped() {
        let raw = "tool chatter...\nRetrieved the following 3 chunks:\nchunk one\nchunk two";
        let formatted = format_knowledge_output(raw);

        assert!(formatted.contains("<KNOWLEDGE>"));
        assert!(formatted.contains("</KNOWLEDGE>"));
        assert!(formatted.contains("Retrieved the following 3 chunks:\nchunk one\nchunk two"));
        // the prefix before the marker is dropped
        assert!(!formatted.contains("tool chatter"));
    }

    #[test]
    fn test_output_without_marker_is_no_data() {
        assert_eq!(format_knowledge_output("nothing of note"), NO_DATA_MESSAGE);
        assert_eq!(format_knowledge_output(""), NO_DATA_MESSAGE);
    }

    #[test]
    fn test_marker_at_start() {
        let raw = "Retrieved the following source: a.pdf";
        let formatted = format_knowledge_output(raw);
        assert!(formatted.contains("<KNOWLEDGE>\nRetrieved the following source: a.pdf\n</KNOWLEDGE>"));
    }
}
