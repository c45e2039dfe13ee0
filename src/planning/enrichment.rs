//! Plan enrichment payload
//!
//! The collaborator is asked for a JSON object with `reasoning`, `steps`,
//! `successCriteria` and `motivation`. Replies are tolerated with prose around
//! the object; anything that fails to decode is discarded.

use serde::Deserialize;
use thiserror::Error;

use crate::llm::extract_json_block;
use crate::planning::types::Plan;

/// Fields the collaborator may contribute to a plan
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Enrichment {
    #[serde(default)]
    pub reasoning: Option<String>,

    #[serde(default)]
    pub steps: Option<Vec<String>>,

    #[serde(default, rename = "successCriteria")]
    pub success_criteria: Option<String>,

    #[serde(default)]
    pub motivation: Option<String>,
}

/// Why a reply could not be used as an enrichment
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DecodeError {
    #[error("reply contains no structured block")]
    NoStructuredBlock,

    #[error("structured block is malformed: {0}")]
    Malformed(String),
}

/// Decode the first balanced `{...}` span of `reply`
pub fn decode_enrichment(reply: &str) -> Result<Enrichment, DecodeError> {
    let block = extract_json_block(reply).ok_or(DecodeError::NoStructuredBlock)?;
    serde_json::from_str(block).map_err(|e| DecodeError::Malformed(e.to_string()))
}

impl Enrichment {
    /// Overlay the present, non-blank fields onto `plan`
    pub fn merge_into(self, mut plan: Plan) -> Plan {
        if let Some(reasoning) = non_blank(self.reasoning) {
            plan.reasoning = reasoning;
        }
        if let Some(steps) = self.steps.filter(|steps| !steps.is_empty()) {
            plan.next_steps = steps;
        }
        if let Some(criteria) = non_blank(self.success_criteria) {
            plan.success_criteria = Some(criteria);
        }
        if let Some(motivation) = non_blank(self.motivation) {
            plan.motivation = Some(motivation);
        }
        plan
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planning::types::PlanAction;

    fn base() -> Plan {
        Plan {
            current_focus: "OOP".to_string(),
            action_type: PlanAction::Strengthen,
            reasoning: "base reasoning".to_string(),
            next_steps: vec!["base step".to_string()],
            time_estimate: "3-5 days".to_string(),
            success_criteria: None,
            motivation: None,
        }
    }

    #[test]
    fn test_decode_with_prose() {
        let reply = "Here you go!\n{\"reasoning\": \"r\", \"steps\": [\"a\", \"b\"], \"successCriteria\": \"80%\", \"motivation\": \"go\"}\nCheers";
        let enrichment = decode_enrichment(reply).unwrap();
        assert_eq!(enrichment.steps, Some(vec!["a".to_string(), "b".to_string()]));
        assert_eq!(enrichment.success_criteria.as_deref(), Some("80%"));
    }

    #[test]
    fn test_decode_without_block() {
        assert_eq!(
            decode_enrichment("I cannot help with that."),
            Err(DecodeError::NoStructuredBlock)
        );
    }

    #[test]
    fn test_decode_malformed() {
        let result = decode_enrichment("{\"steps\": \"not a list\"}");
        assert!(matches!(result, Err(DecodeError::Malformed(_))));
    }

    #[test]
    fn test_merge_only_present_fields() {
        let enrichment = Enrichment {
            motivation: Some("You can do it".to_string()),
            steps: Some(vec![]),
            ..Default::default()
        };
        let plan = enrichment.merge_into(base());

        assert_eq!(plan.reasoning, "base reasoning");
        assert_eq!(plan.next_steps, vec!["base step".to_string()]);
        assert_eq!(plan.motivation.as_deref(), Some("You can do it"));
        assert_eq!(plan.success_criteria, None);
        assert_eq!(plan.action_type, PlanAction::Strengthen);
    }
}
