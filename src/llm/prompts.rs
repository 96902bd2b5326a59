//! LLM prompts for judging and metric scoring.
//!
//! The prompt texts follow the protocol the knowledge tool's evaluation
//! suite uses: a JSONSchema-framed judge instruction and one fixed
//! template per RAG quality metric.

/// Collection of prompts used for answer judging and metric scoring.
pub struct Prompts;

impl Prompts {
    /// System prompt for the answer judge.
    ///
    /// The judge receives a `(final_answer, final_answer_should)` pair as a
    /// JSON user message and must reply with a `ruling` object. "or"-phrased
    /// constraints are satisfied by any one alternative.
    pub fn judge_system() -> &'static str {
        r#"When given JSON objects that conform to the following JSONSchema:
{
    "name": "judge",
    "type": "object",
    "properties": {
        "final_answer": {
            "type": "string",
            "description": "An answer to judge for correctness."
        },
        "final_answer_should": {
            "type": "string",
            "description": "The constraints that final_answer must completely satisfy to be considered correct."
        }
    },
    "required": [
        "final_answer",
        "final_answer_should"
    ]
}

Determine if `final_answer` satisfies the constraints described by `final_answer_should`.
`final_answer` is considered correct if and only if it satisfies the constraints described by `final_answer_should`.
If `final_answer_should` mentioned `or` condition, then if `final_answer` meet one of the condition it should be considered correct.

After making a determination, respond with a JSON object that conforms to the following JSONSchema:

{
    "name": "ruling",
    "type": "object",
    "properties": {
        "correct": {
            "type": "boolean",
            "description": "Set to true if and only if the answer is considered correct."
        },
        "reasoning": {
            "type": "string",
            "description": "A brief summary of the reasoning used to come to the determination."
        }
    },
    "required": [
        "correct",
        "reasoning"
    ]
}

Your responses are concise and include only the json object described above."#
    }

    /// Prompt to decompose an answer into statements and label each against
    /// the context.
    pub fn faithfulness() -> &'static str {
        r#"Given an answer and a context, your task is to:
1. break the answer down to a series of factual statements
2. judge the faithfulness of these statements based on the given context. For each statement you must return verdict as 1 if the statement can be directly inferred based on the context or 0 if the statement can not be directly inferred based on the context.
Return your output as a list of json dict. in each dict contains 2 field: `statement` field with the factual statement, and `verdict` field with value either 0 or 1, integer. Do not include '```json'.

ANSWER:
{answer}

CONTEXT:
{context}"#
    }

    /// Prompt to reverse-generate a question from an answer and flag
    /// noncommittal answers.
    pub fn answer_relevancy() -> &'static str {
        r#"Generate a potential question for the given answer, and identify if answer is noncommittal. Give noncommittal as 1 if the answer is noncommittal and 0 if the answer is committal. A noncommittal answer is one that is evasive, vague, or ambiguous. For example, "I don't know" or "I'm not sure" are noncommittal answers.
Generate your output in json format strictly, includes `question` and `noncommittal` field, don't include ```json.

THE GIVEN ANSWER:
{given_answer}"#
    }

    /// Prompt to label a single context chunk as useful or not for the answer.
    pub fn context_utilization() -> &'static str {
        r#"Given question, answer and context, Verify if the context was useful in arriving at the given answer, if useful, return 1, if not, return 0. You should only return either 0 or 1.

QUESTION:
{question}

ANSWER:
{answer}

CONTEXT:
{context}"#
    }

    /// Template wrapping retrieved knowledge for downstream model consumption.
    pub fn knowledge_wrapper() -> &'static str {
        r#"
Use the content within the following <KNOWLEDGE></KNOWLEDGE> tags as your learned knowledge.
<KNOWLEDGE>
{output}
</KNOWLEDGE>
If this knowledge seems irrelevant to the user query, ignore it.
Avoid mentioning that you retrieved the information from the context or the knowledge tool.
Only provide citations if explicitly asked for it and if the source references are available in the knowledge.
Answer in the language that the user asked the question in.
"#
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompts_are_not_empty() {
        assert!(!Prompts::judge_system().is_empty());
        assert!(!Prompts::faithfulness().is_empty());
        assert!(!Prompts::answer_relevancy().is_empty());
        assert!(!Prompts::context_utilization().is_empty());
        assert!(!Prompts::knowledge_wrapper().is_empty());
    }

    #[test]
    fn test_templates_have_placeholders() {
        assert!(Prompts::faithfulness().contains("{answer}"));
        assert!(Prompts::faithfulness().contains("{context}"));
        assert!(Prompts::answer_relevancy().contains("{given_answer}"));
        assert!(Prompts::context_utilization().contains("{question}"));
        assert!(Prompts::knowledge_wrapper().contains("{output}"));
    }
}
