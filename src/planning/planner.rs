//! Planner
//!
//! Two independent deterministic trees:
//! - the plan tree picks a focus topic and a plan kind from the mastery map
//! - the action tree picks the immediate activity from recent records
//!
//! The plan may afterwards be enriched with collaborator prose. Enrichment is
//! best-effort: on any failure the base plan is returned unchanged.

use std::cmp::Ordering;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::llm::GenerationClient;
use crate::planning::enrichment::decode_enrichment;
use crate::planning::types::{ActionDecision, NextAction, Plan, PlanAction};
use crate::topics::{TopicId, TopicRegistry, ADVANCED_PROJECTS};
use crate::types::{InteractionRecord, UserState};

/// Topics below this still need work
pub const NEEDS_WORK_THRESHOLD: f64 = 70.0;

/// Mastery at which the current topic is considered mastered
pub const MASTERED_THRESHOLD: f64 = 85.0;

/// Minimum recent records before the struggling rule applies
const REVIEW_MIN_RECORDS: usize = 5;

/// Incorrect answers that trigger a review
const REVIEW_INCORRECT_COUNT: usize = 3;

/// Correct answers in a row that trigger a celebration
const CELEBRATE_STREAK: usize = 5;

/// Builds learning plans and action decisions
#[derive(Clone)]
pub struct Planner {
    generator: Arc<dyn GenerationClient>,
    registry: TopicRegistry,
}

impl Planner {
    pub fn new(generator: Arc<dyn GenerationClient>) -> Self {
        Self {
            generator,
            registry: TopicRegistry::new(),
        }
    }

    /// Plan for `state`, enriched when the collaborator cooperates
    pub async fn create_learning_plan(&self, state: &UserState) -> Plan {
        let base = self.base_plan(state);
        self.enrich(base, state).await
    }

    /// Deterministic plan; the first matching rule wins
    pub fn base_plan(&self, state: &UserState) -> Plan {
        let needs_work = self.needs_work(state);

        if state.total_interactions == 0 {
            return Plan {
                current_focus: self.registry.first().to_string(),
                action_type: PlanAction::Onboard,
                reasoning: "New learner - starting with fundamentals".to_string(),
                next_steps: steps(&[
                    "Complete Data Structures assessment",
                    "Learn basic array operations",
                    "Practice 5 easy problems",
                ]),
                time_estimate: "1 week".to_string(),
                success_criteria: None,
                motivation: None,
            };
        }

        let Some(&(weakest, score)) = needs_work.first() else {
            return Plan {
                current_focus: ADVANCED_PROJECTS.to_string(),
                action_type: PlanAction::Advance,
                reasoning: "All core topics mastered - ready for real projects".to_string(),
                next_steps: steps(&[
                    "Build a full-stack project",
                    "Contribute to open source",
                    "Prepare for system design interviews",
                ]),
                time_estimate: "2-3 weeks".to_string(),
                success_criteria: None,
                motivation: None,
            };
        };

        let name = self.registry.name(weakest);

        // Focus comes from the below-70 set even though the rule is gated on
        // the below-60 list.
        if !state.weak_topics.is_empty() {
            Plan {
                current_focus: name.to_string(),
                action_type: PlanAction::Strengthen,
                reasoning: format!(
                    "Focusing on weakest area: {} ({}% mastery)",
                    name,
                    score.round()
                ),
                next_steps: vec![
                    format!("Review {} fundamentals", name),
                    "Practice targeted problems".to_string(),
                    "Take assessment to measure improvement".to_string(),
                ],
                time_estimate: "3-5 days".to_string(),
                success_criteria: None,
                motivation: None,
            }
        } else {
            Plan {
                current_focus: name.to_string(),
                action_type: PlanAction::Progress,
                reasoning: format!("Next topic in learning path: {}", name),
                next_steps: vec![
                    format!("Learn {} concepts", name),
                    "Complete practice exercises".to_string(),
                    "Move to next topic after 70% mastery".to_string(),
                ],
                time_estimate: "1 week".to_string(),
                success_criteria: None,
                motivation: None,
            }
        }
    }

    /// Registry topics below 70, lowest first; ties keep topic-id order
    fn needs_work(&self, state: &UserState) -> Vec<(TopicId, f64)> {
        let mut topics: Vec<(TopicId, f64)> = self
            .registry
            .ids()
            .map(|id| (id, state.mastery_of(id)))
            .filter(|(_, score)| *score < NEEDS_WORK_THRESHOLD)
            .collect();

        topics.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal));
        topics
    }

    /// Overlay collaborator prose onto `base`; returns `base` on any failure
    pub async fn enrich(&self, base: Plan, state: &UserState) -> Plan {
        let prompt = enrichment_prompt(&base, state);

        let reply = match self.generator.generate(&prompt).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(error = %e, "Plan enrichment unavailable, using base plan");
                return base;
            }
        };

        match decode_enrichment(&reply) {
            Ok(enrichment) => {
                debug!(focus = %base.current_focus, "Plan enriched");
                enrichment.merge_into(base)
            }
            Err(e) => {
                warn!(error = %e, "Discarding plan enrichment");
                base
            }
        }
    }
}

fn steps(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn enrichment_prompt(base: &Plan, state: &UserState) -> String {
    let mastery = serde_json::to_string(&state.mastery).unwrap_or_default();

    format!(
        r#"You are an expert learning planner for technical interview preparation.

USER STATE:
- Total practice: {total} problems
- Mastery levels: {mastery}
- Goal: {goal}

BASE PLAN:
- Focus: {focus}
- Action: {action}
- Steps: {steps}

YOUR TASK:
Enhance this plan with:
1. Detailed reasoning (WHY this focus?)
2. Specific, actionable steps (WHAT to do?)
3. Success criteria (HOW to know you're ready?)
4. Motivation (encouraging message)

Format as JSON:
{{
  "reasoning": "detailed explanation",
  "steps": ["step1", "step2", "step3"],
  "successCriteria": "when to move on",
  "motivation": "encouraging message"
}}"#,
        total = state.total_interactions,
        mastery = mastery,
        goal = state.goal,
        focus = base.current_focus,
        action = base.action_type,
        steps = base.next_steps.join(", "),
    )
}

/// Immediate action for the learner.
///
/// `recent` is most-recent-first. The struggling rule counts incorrect answers
/// over the whole slice once it holds at least five records.
pub fn decide_next_action(state: &UserState, recent: &[InteractionRecord]) -> ActionDecision {
    let Some(last) = recent.first() else {
        return ActionDecision::new(
            NextAction::Explain,
            "No recent activity - start with explanation",
        );
    };

    let incorrect = recent.iter().filter(|record| !record.correct).count();
    if recent.len() >= REVIEW_MIN_RECORDS && incorrect >= REVIEW_INCORRECT_COUNT {
        return ActionDecision::new(
            NextAction::Review,
            "Struggling with concepts - review needed",
        );
    }

    if correct_streak(recent) >= CELEBRATE_STREAK {
        return ActionDecision::new(
            NextAction::Celebrate,
            "Excellent performance - celebrate success",
        );
    }

    if state.mastery_of(last.topic_id) >= MASTERED_THRESHOLD {
        return ActionDecision::new(NextAction::Project, "Topic mastered - suggest real project");
    }

    ActionDecision::new(NextAction::Practice, "Continue targeted practice")
}

/// Correct answers in a row, counted from the most recent record
pub fn correct_streak(recent: &[InteractionRecord]) -> usize {
    recent.iter().take_while(|record| record.correct).count()
}
