//! Action dispatcher
//!
//! Executes an [`ActionKind`] against an [`ActionContext`]. Collaborator-backed
//! handlers wrap the generated text with a fixed next-step line; any
//! collaborator failure becomes a typed error result rather than an `Err`.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::actions::canned;
use crate::actions::kinds::ActionKind;
use crate::actions::prompts;
use crate::actions::types::{ActionContent, ActionContext, ActionResult, ContentKind};
use crate::llm::GenerationClient;

pub const UNKNOWN_ACTION_MESSAGE: &str = "Unknown action type";

/// Per-kind presentation of a collaborator-backed handler
struct Handler {
    kind: ContentKind,
    with_topic: bool,
    next_action: &'static str,
    failure: &'static str,
}

fn handler_for(kind: ActionKind) -> Option<Handler> {
    let handler = match kind {
        ActionKind::ExplainTopic => Handler {
            kind: ContentKind::Explanation,
            with_topic: true,
            next_action: "Would you like to try some practice problems on this topic?",
            failure: "Failed to generate explanation",
        },
        ActionKind::GivePractice => Handler {
            kind: ContentKind::Practice,
            with_topic: true,
            next_action: "Start with Problem 1 when you're ready!",
            failure: "Failed to generate practice problems",
        },
        ActionKind::RunAssessment => Handler {
            kind: ContentKind::Assessment,
            with_topic: true,
            next_action: "Take your time. This will help measure your understanding!",
            failure: "Failed to create assessment",
        },
        ActionKind::ReviewMistakes => Handler {
            kind: ContentKind::Review,
            with_topic: true,
            next_action: "Let's practice this specific area to build confidence.",
            failure: "Failed to review mistakes",
        },
        ActionKind::SuggestProject => Handler {
            kind: ContentKind::ProjectSuggestion,
            with_topic: false,
            next_action: "Pick a project and let's break it down into steps!",
            failure: "Failed to suggest projects",
        },
        ActionKind::Strengthen => Handler {
            kind: ContentKind::ImprovementPlan,
            with_topic: true,
            next_action: "Let's start Day 1 today!",
            failure: "Failed to create improvement plan",
        },
        ActionKind::CelebrateProgress
        | ActionKind::MotivateUser
        | ActionKind::Onboard
        | ActionKind::Advance => return None,
    };
    Some(handler)
}

fn prompt_for(kind: ActionKind, context: &ActionContext) -> Option<String> {
    match kind {
        ActionKind::ExplainTopic => Some(prompts::explain(context)),
        ActionKind::GivePractice => Some(prompts::practice(context)),
        ActionKind::RunAssessment => Some(prompts::assessment(context)),
        ActionKind::ReviewMistakes => Some(prompts::review(context)),
        ActionKind::SuggestProject => Some(prompts::project(context)),
        ActionKind::Strengthen => Some(prompts::strengthen(context)),
        _ => None,
    }
}

/// Handlers answered from literal text, without the collaborator
fn canned_result(kind: ActionKind, context: &ActionContext) -> Option<ActionResult> {
    let content = match kind {
        ActionKind::CelebrateProgress => canned::celebrate(context, &mut rand::thread_rng()),
        ActionKind::MotivateUser => canned::motivate(&mut rand::thread_rng()),
        ActionKind::Onboard => canned::onboard(),
        ActionKind::Advance => canned::advance(context),
        _ => return None,
    };
    Some(ActionResult::Delivered(content))
}

/// Executes actions for the orchestrator and the chat surface
#[derive(Clone)]
pub struct ActionDispatcher {
    generator: Arc<dyn GenerationClient>,
}

impl ActionDispatcher {
    pub fn new(generator: Arc<dyn GenerationClient>) -> Self {
        Self { generator }
    }

    /// Execute an action given by its wire name
    pub async fn execute_named(&self, name: &str, context: &ActionContext) -> ActionResult {
        match name.parse::<ActionKind>() {
            Ok(kind) => self.execute(kind, context).await,
            Err(e) => {
                warn!(error = %e, "Rejecting action");
                ActionResult::error(UNKNOWN_ACTION_MESSAGE)
            }
        }
    }

    /// Execute an action
    pub async fn execute(&self, kind: ActionKind, context: &ActionContext) -> ActionResult {
        debug!(action = %kind, topic = %context.topic, "Executing action");

        match canned_result(kind, context) {
            Some(result) => result,
            None => self.generate(kind, context).await,
        }
    }

    async fn generate(&self, kind: ActionKind, context: &ActionContext) -> ActionResult {
        let (Some(handler), Some(prompt)) = (handler_for(kind), prompt_for(kind, context)) else {
            return ActionResult::error(UNKNOWN_ACTION_MESSAGE);
        };

        match self.generator.generate(&prompt).await {
            Ok(text) => ActionResult::Delivered(ActionContent {
                kind: handler.kind,
                topic: handler.with_topic.then(|| context.topic.clone()),
                content: text,
                next_action: handler.next_action.to_string(),
                badge: None,
            }),
            Err(e) => {
                warn!(action = %kind, error = %e, "Action generation failed");
                ActionResult::error(handler.failure)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{FailingGenerator, ScriptedGenerator};

    #[tokio::test]
    async fn test_unknown_action_name() {
        let dispatcher = ActionDispatcher::new(Arc::new(ScriptedGenerator::new()));
        let result = dispatcher
            .execute_named("juggle", &ActionContext::for_topic("OOP"))
            .await;
        assert_eq!(result, ActionResult::error("Unknown action type"));
    }

    #[tokio::test]
    async fn test_explain_wraps_generated_text() {
        let generator = Arc::new(ScriptedGenerator::with_replies(["Think of a stack of plates..."]));
        let dispatcher = ActionDispatcher::new(generator.clone());

        let result = dispatcher
            .execute_named("explain_topic", &ActionContext::for_topic("Data Structures"))
            .await;

        let content = result.content().unwrap();
        assert_eq!(content.kind, ContentKind::Explanation);
        assert_eq!(content.topic.as_deref(), Some("Data Structures"));
        assert_eq!(content.content, "Think of a stack of plates...");
        assert_eq!(
            content.next_action,
            "Would you like to try some practice problems on this topic?"
        );
        assert!(generator.prompts()[0].contains("explaining Data Structures"));
    }

    #[tokio::test]
    async fn test_failure_becomes_typed_error() {
        let dispatcher = ActionDispatcher::new(Arc::new(FailingGenerator::timeout()));
        let context = ActionContext::for_topic("OOP");

        assert_eq!(
            dispatcher.execute(ActionKind::GivePractice, &context).await,
            ActionResult::error("Failed to generate practice problems")
        );
        assert_eq!(
            dispatcher.execute(ActionKind::Strengthen, &context).await,
            ActionResult::error("Failed to create improvement plan")
        );
    }

    #[tokio::test]
    async fn test_canned_actions_skip_collaborator() {
        let generator = Arc::new(ScriptedGenerator::new());
        let dispatcher = ActionDispatcher::new(generator.clone());
        let context = ActionContext::for_topic("OOP");

        for kind in ActionKind::ALL.into_iter().filter(ActionKind::is_canned) {
            assert!(!dispatcher.execute(kind, &context).await.is_error());
        }
        assert_eq!(generator.calls(), 0);
    }

    #[tokio::test]
    async fn test_project_has_no_topic() {
        let generator = Arc::new(ScriptedGenerator::with_replies(["1. A URL shortener"]));
        let dispatcher = ActionDispatcher::new(generator);
        let result = dispatcher
            .execute(ActionKind::SuggestProject, &ActionContext::for_topic("OOP"))
            .await;
        let content = result.content().unwrap();
        assert_eq!(content.kind, ContentKind::ProjectSuggestion);
        assert_eq!(content.topic, None);
    }
}
