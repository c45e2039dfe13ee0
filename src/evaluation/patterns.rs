//! Learning pattern detection over the recent-activity window

use std::collections::BTreeMap;

use chrono::Timelike;
use serde::{Deserialize, Serialize};

use crate::topics::{TopicId, TopicRegistry};
use crate::types::InteractionRecord;

/// Records required before any pattern is reported
pub const MIN_PATTERN_SAMPLES: usize = 10;

/// Misses on one topic before it counts as a common mistake
const MIN_MISSES: usize = 2;

/// Samples a part of day needs before it can be the best time
const MIN_PART_SAMPLES: usize = 3;

/// Coarse time-of-day bucket (UTC)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartOfDay {
    /// 05:00-11:59
    Morning,
    /// 12:00-16:59
    Afternoon,
    /// 17:00-21:59
    Evening,
    /// 22:00-04:59
    Night,
}

impl PartOfDay {
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            5..=11 => PartOfDay::Morning,
            12..=16 => PartOfDay::Afternoon,
            17..=21 => PartOfDay::Evening,
            _ => PartOfDay::Night,
        }
    }
}

/// A topic missed repeatedly in the window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommonMistake {
    pub topic: String,
    pub misses: usize,
}

/// Behavioural patterns; every field is empty below ten samples
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearningPattern {
    pub learning_style: Option<String>,
    pub difficulty_preference: Option<String>,
    pub common_mistakes: Vec<CommonMistake>,
    pub best_time_to_learn: Option<PartOfDay>,
}

/// Detect patterns in `recent` (most-recent-first)
pub fn detect_patterns(recent: &[InteractionRecord]) -> LearningPattern {
    if recent.len() < MIN_PATTERN_SAMPLES {
        return LearningPattern::default();
    }

    let n = recent.len() as f64;
    let mean_time = recent.iter().map(|r| r.time_spent_seconds).sum::<f64>() / n;
    let accuracy = recent.iter().filter(|r| r.correct).count() as f64 / n * 100.0;
    let mean_difficulty = recent.iter().map(|r| r.difficulty as f64).sum::<f64>() / n;

    LearningPattern {
        learning_style: learning_style(mean_time, accuracy).map(str::to_string),
        difficulty_preference: Some(difficulty_preference(mean_difficulty).to_string()),
        common_mistakes: common_mistakes(recent),
        best_time_to_learn: best_time_to_learn(recent),
    }
}

fn learning_style(mean_time: f64, accuracy: f64) -> Option<&'static str> {
    if mean_time < 60.0 && accuracy > 70.0 {
        Some("Fast and accurate - excellent problem solver!")
    } else if mean_time > 120.0 && accuracy > 80.0 {
        Some("Thoughtful and careful - great attention to detail!")
    } else if mean_time < 60.0 && accuracy < 60.0 {
        Some("Quick but needs accuracy improvement")
    } else {
        None
    }
}

fn difficulty_preference(mean_difficulty: f64) -> &'static str {
    if mean_difficulty > 7.0 {
        "Prefers challenging problems"
    } else if mean_difficulty < 4.0 {
        "Building confidence with easier problems"
    } else {
        "Balanced difficulty progression"
    }
}

/// Topics missed at least twice, most-missed first, ties in topic order
fn common_mistakes(recent: &[InteractionRecord]) -> Vec<CommonMistake> {
    let registry = TopicRegistry::new();
    let mut misses: BTreeMap<TopicId, usize> = BTreeMap::new();
    for record in recent.iter().filter(|r| !r.correct) {
        *misses.entry(record.topic_id).or_insert(0) += 1;
    }

    let mut repeated: Vec<(TopicId, usize)> = misses
        .into_iter()
        .filter(|(_, count)| *count >= MIN_MISSES)
        .collect();
    repeated.sort_by(|a, b| b.1.cmp(&a.1));

    repeated
        .into_iter()
        .map(|(id, count)| CommonMistake {
            topic: registry.name(id).to_string(),
            misses: count,
        })
        .collect()
}

/// Part of day with the best accuracy, among parts with enough samples
fn best_time_to_learn(recent: &[InteractionRecord]) -> Option<PartOfDay> {
    let mut buckets: BTreeMap<PartOfDay, (usize, usize)> = BTreeMap::new();
    for record in recent {
        let slot = buckets
            .entry(PartOfDay::from_hour(record.timestamp.hour()))
            .or_insert((0, 0));
        slot.1 += 1;
        if record.correct {
            slot.0 += 1;
        }
    }

    let mut best: Option<(PartOfDay, f64)> = None;
    for (part, (correct, total)) in buckets {
        if total < MIN_PART_SAMPLES {
            continue;
        }
        let accuracy = correct as f64 / total as f64;
        if best.map_or(true, |(_, top)| accuracy > top) {
            best = Some((part, accuracy));
        }
    }
    best.map(|(part, _)| part)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn record(topic_id: TopicId, correct: bool, time: f64, difficulty: u8, hour: u32) -> InteractionRecord {
        InteractionRecord::new(topic_id, correct, time, difficulty)
            .at(Utc.with_ymd_and_hms(2024, 5, 2, hour, 15, 0).unwrap())
    }

    #[test]
    fn test_too_few_samples_is_empty() {
        let recent: Vec<_> = (0..9).map(|i| record(0, true, 30.0, 5, i)).collect();
        assert_eq!(detect_patterns(&recent), LearningPattern::default());
    }

    #[test]
    fn test_fast_and_accurate() {
        let recent: Vec<_> = (0..10).map(|i| record(0, i != 0, 30.0, 8, 9)).collect();
        let patterns = detect_patterns(&recent);
        assert_eq!(
            patterns.learning_style.as_deref(),
            Some("Fast and accurate - excellent problem solver!")
        );
        assert_eq!(patterns.difficulty_preference.as_deref(), Some("Prefers challenging problems"));
    }

    #[test]
    fn test_thoughtful_and_quick_inaccurate() {
        let careful: Vec<_> = (0..10).map(|_| record(0, true, 200.0, 2, 9)).collect();
        let patterns = detect_patterns(&careful);
        assert_eq!(
            patterns.learning_style.as_deref(),
            Some("Thoughtful and careful - great attention to detail!")
        );
        assert_eq!(
            patterns.difficulty_preference.as_deref(),
            Some("Building confidence with easier problems")
        );

        let hasty: Vec<_> = (0..10).map(|i| record(0, i < 3, 20.0, 5, 9)).collect();
        let patterns = detect_patterns(&hasty);
        assert_eq!(patterns.learning_style.as_deref(), Some("Quick but needs accuracy improvement"));
        assert_eq!(patterns.difficulty_preference.as_deref(), Some("Balanced difficulty progression"));
    }

    #[test]
    fn test_middle_ground_has_no_style() {
        let recent: Vec<_> = (0..10).map(|i| record(0, i % 2 == 0, 90.0, 5, 9)).collect();
        assert_eq!(detect_patterns(&recent).learning_style, None);
    }

    #[test]
    fn test_common_mistakes_most_missed_first() {
        let mut recent = vec![
            record(1, false, 60.0, 5, 9),
            record(4, false, 60.0, 5, 9),
            record(4, false, 60.0, 5, 9),
            record(4, false, 60.0, 5, 9),
            record(1, false, 60.0, 5, 9),
            record(7, false, 60.0, 5, 9),
        ];
        recent.extend((0..4).map(|_| record(2, true, 60.0, 5, 9)));

        let mistakes = detect_patterns(&recent).common_mistakes;
        assert_eq!(
            mistakes,
            vec![
                CommonMistake { topic: "Web Development".to_string(), misses: 3 },
                CommonMistake { topic: "Algorithms".to_string(), misses: 2 },
            ]
        );
    }

    #[test]
    fn test_best_time_needs_three_samples() {
        let mut recent = Vec::new();
        recent.extend((0..2).map(|_| record(0, true, 60.0, 5, 20)));
        recent.extend((0..4).map(|i| record(0, i < 3, 60.0, 5, 8)));
        recent.extend((0..4).map(|i| record(0, i < 1, 60.0, 5, 14)));

        assert_eq!(detect_patterns(&recent).best_time_to_learn, Some(PartOfDay::Morning));
    }

    #[test]
    fn test_part_of_day_boundaries() {
        assert_eq!(PartOfDay::from_hour(4), PartOfDay::Night);
        assert_eq!(PartOfDay::from_hour(5), PartOfDay::Morning);
        assert_eq!(PartOfDay::from_hour(12), PartOfDay::Afternoon);
        assert_eq!(PartOfDay::from_hour(17), PartOfDay::Evening);
        assert_eq!(PartOfDay::from_hour(22), PartOfDay::Night);
    }
}
