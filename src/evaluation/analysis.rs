//! Performance analysis and the readiness gate

use serde::{Deserialize, Serialize};

use crate::topics::TopicRegistry;
use crate::types::{UserState, STRENGTH_THRESHOLD, WEAK_THRESHOLD};

/// Records examined for trends
pub const TREND_WINDOW: usize = 5;

/// Readiness gate: minimum mastery
pub const READY_MASTERY: u32 = 70;

/// Readiness gate: minimum practice count
pub const READY_PRACTICE: usize = 10;

/// Readiness gate: minimum recent accuracy
pub const READY_ACCURACY: u32 = 60;

pub const TREND_HOT_STREAK: &str = "🔥 Hot streak - high accuracy recently!";
pub const TREND_STRUGGLING: &str = "⚠️ Struggling lately - review needed";
pub const TREND_FAST_SOLVER: &str = "⚡ Fast problem solver!";

/// Topic with a rounded score
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatedTopic {
    pub topic: String,
    pub score: u32,
}

/// Snapshot analysis of a learner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerformanceAnalysis {
    /// Rounded mean of the present mastery entries
    pub overall_score: u32,

    pub strengths: Vec<RatedTopic>,

    pub weaknesses: Vec<RatedTopic>,

    pub trends: Vec<String>,

    pub recommendations: Vec<String>,
}

/// Analyze a state snapshot. Pure.
pub fn analyze_performance(state: &UserState) -> PerformanceAnalysis {
    let registry = TopicRegistry::new();

    let overall_score = if state.mastery.is_empty() {
        0
    } else {
        let sum: f64 = state.mastery.values().sum();
        round_score(sum / state.mastery.len() as f64)
    };

    let rated = |keep: &dyn Fn(f64) -> bool| -> Vec<RatedTopic> {
        state
            .mastery
            .iter()
            .filter(|(_, score)| keep(**score))
            .map(|(id, score)| RatedTopic {
                topic: registry.name(*id).to_string(),
                score: round_score(*score),
            })
            .collect()
    };
    let strengths = rated(&|score| score >= STRENGTH_THRESHOLD);
    let weaknesses = rated(&|score| score < WEAK_THRESHOLD);

    let mut trends = Vec::new();
    if state.recent_activity.len() >= TREND_WINDOW {
        let last = &state.recent_activity[..TREND_WINDOW];
        let correct = last.iter().filter(|record| record.correct).count();
        let accuracy = correct as f64 / TREND_WINDOW as f64 * 100.0;

        if accuracy >= 80.0 {
            trends.push(TREND_HOT_STREAK.to_string());
        } else if accuracy <= 40.0 {
            trends.push(TREND_STRUGGLING.to_string());
        }

        let mean_time = last.iter().map(|record| record.time_spent_seconds).sum::<f64>()
            / TREND_WINDOW as f64;
        if mean_time < 60.0 {
            trends.push(TREND_FAST_SOLVER.to_string());
        }
    }

    let mut recommendations = Vec::new();
    if let Some(weakest) = weaknesses.first() {
        recommendations.push(format!(
            "Focus on {} - your weakest area at {}%",
            weakest.topic, weakest.score
        ));
    }
    if strengths.len() >= 3 {
        recommendations.push("You have strong fundamentals - consider building projects!".to_string());
    }
    if state.total_interactions < 20 {
        recommendations.push("Complete more practice to get accurate skill assessment".to_string());
    }

    PerformanceAnalysis {
        overall_score,
        strengths,
        weaknesses,
        trends,
        recommendations,
    }
}

/// Individual gate outcomes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadinessChecks {
    pub mastery_check: bool,
    pub practice_check: bool,
    pub accuracy_check: bool,
}

/// Gate thresholds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadinessRequirements {
    pub mastery: u32,
    pub practice: usize,
    pub accuracy: u32,
}

impl Default for ReadinessRequirements {
    fn default() -> Self {
        Self {
            mastery: READY_MASTERY,
            practice: READY_PRACTICE,
            accuracy: READY_ACCURACY,
        }
    }
}

/// Verdict of the readiness gate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadinessResult {
    pub is_ready: bool,
    pub checks: ReadinessChecks,
    pub requirements: ReadinessRequirements,

    /// One line per gate, actual vs required
    pub feedback: Vec<String>,
}

/// Ready only when mastery, practice and recent accuracy all pass
pub fn check_readiness(topic_mastery: f64, practice_count: usize, recent_accuracy: f64) -> ReadinessResult {
    let requirements = ReadinessRequirements::default();
    let checks = ReadinessChecks {
        mastery_check: topic_mastery >= requirements.mastery as f64,
        practice_check: practice_count >= requirements.practice,
        accuracy_check: recent_accuracy >= requirements.accuracy as f64,
    };

    let mut feedback = Vec::with_capacity(3);

    let mastery = round_score(topic_mastery);
    feedback.push(if checks.mastery_check {
        format!("✅ Mastery: {}%", mastery)
    } else {
        format!("❌ Mastery: {}% (need {}%)", mastery, requirements.mastery)
    });

    feedback.push(if checks.practice_check {
        format!("✅ Practice: {} problems", practice_count)
    } else {
        format!(
            "❌ Practice: {} problems (need {})",
            practice_count, requirements.practice
        )
    });

    let accuracy = round_score(recent_accuracy);
    feedback.push(if checks.accuracy_check {
        format!("✅ Accuracy: {}%", accuracy)
    } else {
        format!("❌ Accuracy: {}% (need {}%)", accuracy, requirements.accuracy)
    });

    ReadinessResult {
        is_ready: checks.mastery_check && checks.practice_check && checks.accuracy_check,
        checks,
        requirements,
        feedback,
    }
}

fn round_score(score: f64) -> u32 {
    score.round().clamp(0.0, 100.0) as u32
}
