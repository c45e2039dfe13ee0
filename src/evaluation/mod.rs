//! Evaluator
//!
//! Pure analytics over a state snapshot (performance analysis, readiness gate,
//! pattern detection) plus collaborator-backed reports and answer grading.

pub mod analysis;
pub mod evaluator;
pub mod patterns;

pub use analysis::{
    analyze_performance, check_readiness, PerformanceAnalysis, RatedTopic, ReadinessChecks,
    ReadinessRequirements, ReadinessResult,
};
pub use evaluator::{
    judge_correctness, AnswerEvaluation, EvaluationKind, Evaluator, PerformanceReport, ReportKind,
    EVALUATION_FALLBACK, REPORT_FALLBACK,
};
pub use patterns::{detect_patterns, CommonMistake, LearningPattern, PartOfDay};
