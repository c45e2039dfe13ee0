//! Integration tests for degraded operation and the file-backed store
//!
//! Every collaborator failure must surface as a deterministic fallback value,
//! never as an error.

use std::sync::Arc;

use studybuddy::{
    actions::{ActionResult, UNKNOWN_ACTION_MESSAGE},
    agent::{TutorOrchestrator, CHAT_FALLBACK},
    evaluation::{EvaluationKind, ReportKind, EVALUATION_FALLBACK, REPORT_FALLBACK},
    llm::{FailingGenerator, GenerationClient, ScriptedGenerator},
    observer::{ObserverConfig, StateObserver},
    planning::Planner,
    store::{ContextStore, InMemoryContextStore, InMemoryInteractionStore, InteractionStore, JsonFileStore},
    types::InteractionRecord,
    GenerationError, TutorError,
};
use tempfile::TempDir;

fn rate_limited() -> Arc<dyn GenerationClient> {
    Arc::new(FailingGenerator::new(GenerationError::RateLimited {
        retry_after: Some(30),
        body: Some("quota exceeded".to_string()),
        attempts: 3,
    }))
}

async fn seeded_store() -> InMemoryInteractionStore {
    let store = InMemoryInteractionStore::new();
    let records = (0..30)
        .map(|i| InteractionRecord::new(i % 4, i % 3 == 0, 75.0, 5))
        .collect();
    store.seed("learner", records).await;
    store
}

#[tokio::test]
async fn test_every_surface_degrades_without_collaborator() {
    let interactions = seeded_store().await;
    let tutor = TutorOrchestrator::new(
        Arc::new(interactions.clone()),
        Arc::new(InMemoryContextStore::new()),
        rate_limited(),
        ObserverConfig::default(),
    );

    // Plan falls back to the deterministic tree
    let observer = StateObserver::new(Arc::new(interactions.clone()), ObserverConfig::default());
    let state = observer.observe("learner").await;
    let expected = Planner::new(rate_limited()).base_plan(&state);
    assert_eq!(tutor.learning_plan("learner").await, expected);

    let report = tutor.performance_report("learner").await;
    assert_eq!(report.report, REPORT_FALLBACK);
    assert_eq!(report.kind, ReportKind::Report);

    let evaluation = tutor
        .evaluate_answer("learner", "Algorithms", "Sort [3,1,2]", "[1,2,3]")
        .await;
    assert!(!evaluation.is_correct);
    assert_eq!(evaluation.feedback, EVALUATION_FALLBACK);
    assert_eq!(evaluation.kind, EvaluationKind::Error);
    assert_eq!(interactions.count("learner").await.unwrap(), 30);

    let guidance = tutor.run_cycle("learner", "s1").await;
    assert!(guidance.action.is_error());
    assert_eq!(guidance.plan, expected);

    let reply = tutor.chat("learner", "s1", "hello there").await;
    assert_eq!(reply.response, CHAT_FALLBACK);
    assert!(reply.session_id.is_some());

    let reply = tutor.chat("learner", "s1", "can you explain recursion?").await;
    assert_eq!(
        reply.response,
        "Failed to generate explanation\n\n**What would you like to do next?**"
    );
}

#[tokio::test]
async fn test_unknown_and_canned_actions_by_name() {
    let tutor = TutorOrchestrator::new(
        Arc::new(seeded_store().await),
        Arc::new(InMemoryContextStore::new()),
        rate_limited(),
        ObserverConfig::default(),
    );

    assert_eq!(
        tutor.act("learner", "DANCE").await,
        ActionResult::error(UNKNOWN_ACTION_MESSAGE)
    );

    let motivation = tutor.act("learner", "motivate_user").await;
    assert!(!motivation.is_error());

    assert!(tutor.act("learner", "give_practice").await.is_error());
}

#[tokio::test]
async fn test_file_store_round_trip_through_orchestrator() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("data").join("state.json");

    let store = Arc::new(JsonFileStore::open(&path).unwrap());
    let generator = Arc::new(ScriptedGenerator::with_replies([
        "Hi! Let's pick up where we left off.",
        "Sure, arrays next.",
    ]));
    let tutor = TutorOrchestrator::new(
        store.clone(),
        store.clone(),
        generator.clone(),
        ObserverConfig::default(),
    );

    let mut last = None;
    for i in 0..10 {
        let record = InteractionRecord::new(i % 10, true, 45.0, 3);
        last = Some(tutor.record_interaction("learner", record).await.unwrap());
    }
    let last = last.unwrap();
    assert_eq!(last.total, 10);
    assert_eq!(last.milestone.map(|m| m.badge), Some("🌱 Getting Started"));

    let err = tutor
        .record_interaction("learner", InteractionRecord::new(0, true, 45.0, 11))
        .await
        .unwrap_err();
    assert!(matches!(err, TutorError::InvalidRecord(_)));

    tutor.chat("learner", "s1", "hello").await;
    tutor.chat("learner", "s1", "what about tomorrow?").await;
    assert!(generator.prompts()[1].contains("user: hello"));

    // A fresh handle sees everything written so far
    let reopened = JsonFileStore::open(&path).unwrap();
    assert_eq!(reopened.count("learner").await.unwrap(), 10);
    assert_eq!(reopened.fetch_recent("learner", 3).await.unwrap().len(), 3);

    let context = reopened.get("s1").await.unwrap().unwrap();
    assert_eq!(context.messages.len(), 4);
    assert_eq!(context.messages[1].content, "Hi! Let's pick up where we left off.");
}
