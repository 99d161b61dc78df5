// Prompt construction for draft extraction.
// The output shape is rendered from DRAFT_SCHEMA, never hand-written here.

use crate::draft::model::{Customer, DraftPayload, ResultEntry};
use crate::draft::schema::{self, DRAFT_SCHEMA};

/// Output discipline; JSON-object mode alone does not stop prose around the object.
const JSON_ONLY_SYSTEM: &str = "You MUST respond ONLY with a valid JSON object. \
    Do NOT include any conversational text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

const ROLE_INSTRUCTION: &str = "You are an expert marketing copywriter specializing in B2B \
    case studies. Your task is to analyze the provided transcript and extract the key \
    information to structure it into a compelling case study.";

/// User message template. Replace `{transcript}` before sending.
const TRANSCRIPT_TEMPLATE: &str = "Here is the transcript:\n\n---\n\n{transcript}";

/// The one illustrative example shown to the model.
pub fn example_draft() -> DraftPayload {
    DraftPayload {
        headline: "Innovatech Boosts Design Velocity by 40% with PixelPerfect".to_string(),
        customer: Customer {
            name: "Innovatech".to_string(),
            description: "A leading provider of enterprise software solutions.".to_string(),
        },
        challenge: "The design team was struggling with a chaotic feedback process across \
            multiple platforms, leading to significant delays."
            .to_string(),
        solution: "By implementing PixelPerfect's centralized dashboard, all feedback and \
            approvals were streamlined into a single, efficient workflow."
            .to_string(),
        results: vec![
            ResultEntry {
                metric: "40% Reduction".to_string(),
                description: "in design approval times.".to_string(),
            },
            ResultEntry {
                metric: "80% Decrease".to_string(),
                description: "in weekly administrative tasks for designers.".to_string(),
            },
        ],
        quote: "PixelPerfect gave us our sanity back.".to_string(),
    }
}

/// Builds the fixed system instruction: role, JSON-only rule, schema skeleton,
/// cardinality rules, and the example.
pub fn draft_system_prompt() -> String {
    let skeleton = serde_json::to_string_pretty(&schema::describe(&DRAFT_SCHEMA))
        .unwrap_or_default();
    let example = serde_json::to_string_pretty(&example_draft()).unwrap_or_default();
    let rules = schema::rules(&DRAFT_SCHEMA)
        .iter()
        .map(|r| format!("- {r}"))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "{ROLE_INSTRUCTION}\n\n\
        {JSON_ONLY_SYSTEM}\n\n\
        The JSON object MUST strictly conform to this structure \
        (each value describes what belongs in that field):\n{skeleton}\n\n\
        HARD RULES:\n{rules}\n\n\
        Example of the required JSON output format:\n{example}"
    )
}

pub fn draft_user_prompt(transcript: &str) -> String {
    TRANSCRIPT_TEMPLATE.replace("{transcript}", transcript)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_example_satisfies_schema() {
        assert!(example_draft().validate().is_ok());
    }

    #[test]
    fn test_system_prompt_embeds_schema_and_example() {
        let prompt = draft_system_prompt();
        assert!(prompt.contains("\"headline\""));
        assert!(prompt.contains("\"results\""));
        assert!(prompt.contains("between 1 and 3 entries"));
        assert!(prompt.contains("PixelPerfect gave us our sanity back."));
        assert!(prompt.contains("valid JSON"));
    }

    #[test]
    fn test_user_prompt_wraps_transcript() {
        let prompt = draft_user_prompt("Customer X loved our product");
        assert_eq!(
            prompt,
            "Here is the transcript:\n\n---\n\nCustomer X loved our product"
        );
    }
}
