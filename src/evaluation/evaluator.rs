//! Collaborator-backed evaluation: performance reports and answer grading

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::evaluation::analysis::{analyze_performance, PerformanceAnalysis};
use crate::llm::GenerationClient;
use crate::types::UserState;

pub const REPORT_FALLBACK: &str = "Performance analysis completed. Check the metrics above!";

pub const EVALUATION_FALLBACK: &str = "Unable to evaluate answer. Please try again.";

/// Whether a report carries collaborator prose
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    PerformanceReport,
    /// Fallback text only
    Report,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerformanceReport {
    pub analysis: PerformanceAnalysis,
    pub report: String,
    #[serde(rename = "type")]
    pub kind: ReportKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationKind {
    Evaluation,
    Error,
}

/// Grading of one learner answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerEvaluation {
    pub is_correct: bool,
    pub feedback: String,
    #[serde(rename = "type")]
    pub kind: EvaluationKind,
}

/// Evaluator front-end over the generation collaborator
#[derive(Clone)]
pub struct Evaluator {
    generator: Arc<dyn GenerationClient>,
}

impl Evaluator {
    pub fn new(generator: Arc<dyn GenerationClient>) -> Self {
        Self { generator }
    }

    /// Analysis plus a personalised narrative; the narrative falls back to fixed text
    pub async fn generate_report(&self, state: &UserState) -> PerformanceReport {
        let analysis = analyze_performance(state);
        let prompt = report_prompt(&analysis, state.total_interactions);

        match self.generator.generate(&prompt).await {
            Ok(report) => PerformanceReport {
                analysis,
                report,
                kind: ReportKind::PerformanceReport,
            },
            Err(e) => {
                warn!(error = %e, "Performance report unavailable, using fallback");
                PerformanceReport {
                    analysis,
                    report: REPORT_FALLBACK.to_string(),
                    kind: ReportKind::Report,
                }
            }
        }
    }

    /// Grade `answer` to `problem`
    pub async fn evaluate_answer(&self, topic: &str, problem: &str, answer: &str) -> AnswerEvaluation {
        let prompt = format!(
            r#"You are evaluating a student's solution.

TOPIC: {topic}
PROBLEM: {problem}
STUDENT ANSWER: {answer}

Provide:
1. ✅/❌ Correctness
2. Feedback (what's good, what's wrong)
3. Correct approach (if wrong)
4. Tips to improve

Be constructive and encouraging. Max 300 words."#
        );

        match self.generator.generate(&prompt).await {
            Ok(feedback) => AnswerEvaluation {
                is_correct: judge_correctness(&feedback),
                feedback,
                kind: EvaluationKind::Evaluation,
            },
            Err(e) => {
                warn!(error = %e, topic, "Answer evaluation unavailable");
                AnswerEvaluation {
                    is_correct: false,
                    feedback: EVALUATION_FALLBACK.to_string(),
                    kind: EvaluationKind::Error,
                }
            }
        }
    }
}

/// Read a verdict out of grading prose.
///
/// Explicit marks win (✅ before ❌); otherwise negative words are checked
/// before positive ones so that "incorrect" never reads as "correct".
pub fn judge_correctness(feedback: &str) -> bool {
    if feedback.contains('✅') {
        return true;
    }
    if feedback.contains('❌') {
        return false;
    }

    let lower = feedback.to_lowercase();
    if lower.contains("incorrect") || lower.contains("wrong") {
        return false;
    }
    lower.contains("correct") || lower.contains("right")
}

fn report_prompt(analysis: &PerformanceAnalysis, total_interactions: usize) -> String {
    let strengths = analysis
        .strengths
        .iter()
        .map(|s| format!("{} ({}%)", s.topic, s.score))
        .collect::<Vec<_>>()
        .join(", ");
    let weaknesses = analysis
        .weaknesses
        .iter()
        .map(|w| format!("{} ({}%)", w.topic, w.score))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        r#"Generate a personalized performance report.

OVERALL SCORE: {overall}%
STRENGTHS: {strengths}
WEAKNESSES: {weaknesses}
TRENDS: {trends}
TOTAL PRACTICE: {total}

Create a motivating report that:
1. Celebrates progress
2. Identifies patterns
3. Gives actionable next steps
4. Sets realistic goals

Be personal, specific, and encouraging. Max 400 words."#,
        overall = analysis.overall_score,
        strengths = strengths,
        weaknesses = weaknesses,
        trends = analysis.trends.join(", "),
        total = total_interactions,
    )
}
