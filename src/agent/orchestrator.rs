//! Tutor orchestrator - main coordinator
//!
//! Runs one guidance cycle over one state snapshot:
//! - Observe the learner
//! - Plan (with best-effort enrichment)
//! - Decide the immediate action from the snapshot, not from the plan
//! - Act on the decision with the plan focus as context
//! - Evaluate performance
//! - Persist the session context (failures are logged, never surfaced)
//!
//! The same collaborators back the single-purpose operations (plan, report,
//! readiness, patterns, answer grading, chat).

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::actions::{detect_intent, ActionContext, ActionDispatcher, ActionResult, ChatIntent};
use crate::agent::state::CycleStage;
use crate::errors::Result;
use crate::evaluation::{
    analyze_performance, check_readiness, detect_patterns, AnswerEvaluation, EvaluationKind,
    Evaluator, LearningPattern, PerformanceAnalysis, PerformanceReport, ReadinessResult,
};
use crate::llm::GenerationClient;
use crate::observer::{ObserverConfig, StateObserver};
use crate::planning::{
    check_milestones, correct_streak, decide_next_action, Milestone, Plan, Planner,
    MASTERED_THRESHOLD,
};
use crate::store::{ContextStore, InteractionStore};
use crate::topics::TopicRegistry;
use crate::types::{
    ChatMessage, ChatRole, ContextPatch, ConversationContext, InteractionRecord, Level, UserState,
};

/// Session messages included in the mentor prompt
const CONVERSATION_TAIL: usize = 6;

/// Difficulty recorded for graded answers
const GRADED_DIFFICULTY: u8 = 5;

pub const CHAT_FALLBACK: &str =
    "I'm here to help! Let me guide you through your learning journey. What topic would you like to focus on?";

/// Result of one guidance cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Guidance {
    pub plan: Plan,
    pub action: ActionResult,
    pub performance: PerformanceAnalysis,

    /// Reason attached to the action decision
    pub next_action: String,
}

/// Outcome of appending one interaction
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordOutcome {
    /// Lifetime interaction count after the append
    pub total: usize,

    /// Milestone reached by exactly this append
    #[serde(skip_serializing_if = "Option::is_none")]
    pub milestone: Option<Milestone>,
}

/// Reply to a chat message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatReply {
    pub response: String,

    /// Session the exchange was stored under; `None` when persisting failed
    pub session_id: Option<String>,
}

/// Main tutoring coordinator
#[derive(Clone)]
pub struct TutorOrchestrator {
    observer: StateObserver,
    planner: Planner,
    dispatcher: ActionDispatcher,
    evaluator: Evaluator,
    generator: Arc<dyn GenerationClient>,
    interactions: Arc<dyn InteractionStore>,
    contexts: Arc<dyn ContextStore>,
    registry: TopicRegistry,
}

impl TutorOrchestrator {
    pub fn new(
        interactions: Arc<dyn InteractionStore>,
        contexts: Arc<dyn ContextStore>,
        generator: Arc<dyn GenerationClient>,
        observer_config: ObserverConfig,
    ) -> Self {
        Self {
            observer: StateObserver::new(interactions.clone(), observer_config),
            planner: Planner::new(generator.clone()),
            dispatcher: ActionDispatcher::new(generator.clone()),
            evaluator: Evaluator::new(generator.clone()),
            generator,
            interactions,
            contexts,
            registry: TopicRegistry::new(),
        }
    }

    /// Run one Observe → Plan → Decide → Act → Evaluate → Persist cycle
    pub async fn run_cycle(&self, user_id: &str, session_key: &str) -> Guidance {
        let mut stage = CycleStage::Observe;
        let state = self.observer.observe(user_id).await;

        stage = self.advance(stage);
        let plan = self.planner.create_learning_plan(&state).await;

        stage = self.advance(stage);
        let decision = decide_next_action(&state, &state.recent_activity);

        stage = self.advance(stage);
        let context = self.action_context(&state, &plan);
        let action = self.dispatcher.execute(decision.action.into(), &context).await;

        stage = self.advance(stage);
        let performance = analyze_performance(&state);

        stage = self.advance(stage);
        let patch = ContextPatch {
            current_topic: Some(plan.current_focus.clone()),
            current_topic_id: self.registry.id_of(&plan.current_focus),
            user_mastery: Some(state.mastery.clone()),
            overall_score: Some(performance.overall_score),
            last_recommendation: Some(decision.reason.clone()),
            ..Default::default()
        };
        self.persist(session_key, patch).await;
        self.advance(stage);

        info!(
            user_id,
            focus = %plan.current_focus,
            plan = %plan.action_type,
            action = %decision.action,
            "Guidance cycle complete"
        );

        Guidance {
            plan,
            action,
            performance,
            next_action: decision.reason,
        }
    }

    fn advance(&self, stage: CycleStage) -> CycleStage {
        let next = stage.next();
        debug!(from = %stage, to = %next, "Cycle stage");
        next
    }

    /// Current learning plan
    pub async fn learning_plan(&self, user_id: &str) -> Plan {
        let state = self.observer.observe(user_id).await;
        self.planner.create_learning_plan(&state).await
    }

    /// Analysis plus narrative report
    pub async fn performance_report(&self, user_id: &str) -> PerformanceReport {
        let state = self.observer.observe(user_id).await;
        self.evaluator.generate_report(&state).await
    }

    /// Readiness gate for a topic, from its entries in the recent window.
    ///
    /// Names resolve exactly; an unknown name yields a not-ready verdict with zeros.
    pub async fn readiness_for(&self, user_id: &str, topic_name: &str) -> ReadinessResult {
        let Some(topic_id) = self.registry.id_of(topic_name) else {
            warn!(topic = topic_name, "Readiness requested for unknown topic");
            return check_readiness(0.0, 0, 0.0);
        };

        let state = self.observer.observe(user_id).await;
        let activity: Vec<&InteractionRecord> = state
            .recent_activity
            .iter()
            .filter(|record| record.topic_id == topic_id)
            .collect();

        let accuracy = if activity.is_empty() {
            0.0
        } else {
            activity.iter().filter(|record| record.correct).count() as f64 / activity.len() as f64
                * 100.0
        };

        check_readiness(state.mastery_of(topic_id), activity.len(), accuracy)
    }

    /// Learning patterns over the recent window
    pub async fn patterns(&self, user_id: &str) -> LearningPattern {
        let state = self.observer.observe(user_id).await;
        detect_patterns(&state.recent_activity)
    }

    /// Validate and append a record, reporting the milestone it reaches
    pub async fn record_interaction(&self, user_id: &str, record: InteractionRecord) -> Result<RecordOutcome> {
        record.validate(&self.registry)?;
        let total = self.interactions.append(user_id, record).await?;
        let milestone = check_milestones(total);
        if let Some(m) = milestone {
            info!(user_id, total, badge = m.badge, "Milestone reached");
        }

        Ok(RecordOutcome { total, milestone })
    }

    /// Grade an answer and, when graded, record it against the topic
    pub async fn evaluate_answer(
        &self,
        user_id: &str,
        topic: &str,
        problem: &str,
        answer: &str,
    ) -> AnswerEvaluation {
        let evaluation = self.evaluator.evaluate_answer(topic, problem, answer).await;
        if evaluation.kind != EvaluationKind::Evaluation {
            return evaluation;
        }

        match self.registry.id_of(topic) {
            Some(topic_id) => {
                let record = InteractionRecord::new(topic_id, evaluation.is_correct, 0.0, GRADED_DIFFICULTY);
                if let Err(e) = self.interactions.append(user_id, record).await {
                    warn!(user_id, error = %e, "Failed to record graded answer");
                }
            }
            None => warn!(topic, "Graded answer not recorded, topic is not in the registry"),
        }

        evaluation
    }

    /// Execute an action by name around the current plan focus
    pub async fn act(&self, user_id: &str, action_name: &str) -> ActionResult {
        let state = self.observer.observe(user_id).await;
        let plan = self.planner.base_plan(&state);
        let context = self.action_context(&state, &plan);
        self.dispatcher.execute_named(action_name, &context).await
    }

    /// Answer a chat message and append the exchange to the session
    pub async fn chat(&self, user_id: &str, session_key: &str, message: &str) -> ChatReply {
        let state = self.observer.observe(user_id).await;
        let intent = detect_intent(message);
        debug!(user_id, ?intent, "Chat intent");

        let response = match intent {
            ChatIntent::Action(kind) => {
                let plan = self.planner.base_plan(&state);
                let context = self.action_context(&state, &plan);
                self.dispatcher.execute(kind, &context).await.to_chat_text()
            }
            ChatIntent::Plan => {
                let plan = self.planner.create_learning_plan(&state).await;
                plan_summary(&plan)
            }
            ChatIntent::Conversation => self.converse(&state, session_key, message).await,
        };

        let patch = ContextPatch {
            append_messages: vec![ChatMessage::user(message), ChatMessage::tutor(response.clone())],
            ..Default::default()
        };
        let session_id = self.persist(session_key, patch).await.map(|ctx| ctx.session_id);

        ChatReply { response, session_id }
    }

    async fn converse(&self, state: &UserState, session_key: &str, message: &str) -> String {
        let history = match self.contexts.get(session_key).await {
            Ok(Some(context)) => context.recent_messages(CONVERSATION_TAIL).to_vec(),
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(error = %e, "Failed to read session history");
                Vec::new()
            }
        };

        let prompt = format!(
            "{}\n\nUSER MESSAGE: {}\n\nRESPOND:",
            mentor_context(state, &history, &self.registry),
            message
        );

        match self.generator.generate(&prompt).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(error = %e, "Chat reply unavailable, using fallback");
                CHAT_FALLBACK.to_string()
            }
        }
    }

    async fn persist(&self, session_key: &str, patch: ContextPatch) -> Option<ConversationContext> {
        match self.contexts.upsert(session_key, patch).await {
            Ok(context) => Some(context),
            Err(e) => {
                warn!(session_key, error = %e, "Failed to persist session context");
                None
            }
        }
    }

    fn action_context(&self, state: &UserState, plan: &Plan) -> ActionContext {
        let recent_errors = state
            .recent_activity
            .iter()
            .filter(|record| !record.correct)
            .map(|record| self.registry.name(record.topic_id).to_string())
            .collect();

        let mastered_topics = state
            .topics_at_least(MASTERED_THRESHOLD)
            .into_iter()
            .map(|id| self.registry.name(id).to_string())
            .collect();

        let current_mastery = self
            .registry
            .id_of(&plan.current_focus)
            .map(|id| state.mastery_of(id).round() as u32)
            .unwrap_or(0);

        ActionContext {
            topic: plan.current_focus.clone(),
            user_level: state.level,
            recent_errors,
            milestone: check_milestones(state.total_interactions),
            total_interactions: state.total_interactions,
            streak: correct_streak(&state.recent_activity),
            mastered_topics,
            current_mastery,
            difficulty: if state.level == Level::Beginner { "easy" } else { "medium" }.to_string(),
            practice_count: 3,
        }
    }
}

fn plan_summary(plan: &Plan) -> String {
    let steps = plan
        .next_steps
        .iter()
        .enumerate()
        .map(|(i, step)| format!("{}. {}", i + 1, step))
        .collect::<Vec<_>>()
        .join("\n");

    let mut summary = format!(
        "📋 **Current focus: {}** ({})\n\n{}\n\n**Next steps:**\n{}\n\n⏱️ Estimated time: {}",
        plan.current_focus, plan.action_type, plan.reasoning, steps, plan.time_estimate
    );
    if let Some(motivation) = &plan.motivation {
        summary.push_str("\n\n");
        summary.push_str(motivation);
    }
    summary
}

fn mentor_context(state: &UserState, history: &[ChatMessage], registry: &TopicRegistry) -> String {
    let mastery = state
        .mastery
        .iter()
        .map(|(id, score)| format!("{}: {}%", registry.name(*id), score.round()))
        .collect::<Vec<_>>()
        .join(", ");

    let strengths = if state.strengths.is_empty() {
        "Building foundations".to_string()
    } else {
        state.strengths.iter().map(|t| t.name.as_str()).collect::<Vec<_>>().join(", ")
    };
    let weak = if state.weak_topics.is_empty() {
        "None yet".to_string()
    } else {
        state.weak_topics.iter().map(|t| t.name.as_str()).collect::<Vec<_>>().join(", ")
    };

    let conversation = history
        .iter()
        .map(|m| {
            let role = match m.role {
                ChatRole::User => "user",
                ChatRole::Tutor => "tutor",
            };
            format!("{}: {}", role, m.content)
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"You are an autonomous learning guide, not just a chatbot.

USER STATE:
- Level: {level}
- Total practice: {total} problems
- Current mastery: [{mastery}]
- Strengths: {strengths}
- Weak areas: {weak}

RECENT CONVERSATION:
{conversation}

YOUR ROLE:
You are NOT a passive Q&A bot. You are an ACTIVE learning guide who:
✅ Observes patterns in user behavior
✅ Decides what they need next
✅ Guides them proactively
✅ Challenges them appropriately
✅ Celebrates wins and supports struggles

RESPOND AS:
- A mentor who knows their journey
- Someone who plans their next steps
- A guide who asks diagnostic questions
- An agent who takes initiative

Be conversational but purposeful. Guide, don't just answer."#,
        level = state.level,
        total = state.total_interactions,
        mastery = mastery,
        strengths = strengths,
        weak = weak,
        conversation = conversation,
    )
}
