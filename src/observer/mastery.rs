//! Mastery and level computation
//!
//! Mastery is the plain accuracy ratio over the observed window:
//! `score = 100 × correct / total`, or 0 for a topic with no records.
//! It is not recency-weighted.

use crate::topics::TopicRegistry;
use crate::types::{InteractionRecord, Level, MasteryMap, TopicScore};

/// Mastery for every registry topic over `records`.
///
/// Records whose topic id is outside the registry are ignored here.
pub fn compute_mastery(records: &[InteractionRecord], registry: &TopicRegistry) -> MasteryMap {
    let mut totals = vec![(0usize, 0usize); registry.len()];

    for record in records {
        if let Some(slot) = totals.get_mut(record.topic_id) {
            slot.1 += 1;
            if record.correct {
                slot.0 += 1;
            }
        }
    }

    registry
        .ids()
        .map(|id| {
            let (correct, total) = totals[id];
            let score = if total > 0 {
                (correct as f64 / total as f64) * 100.0
            } else {
                0.0
            };
            (id, score)
        })
        .collect()
}

/// Mean mastery over the whole registry; topics missing from `mastery` count as 0
pub fn registry_mean(mastery: &MasteryMap, registry: &TopicRegistry) -> f64 {
    if registry.is_empty() {
        return 0.0;
    }
    let sum: f64 = registry
        .ids()
        .map(|id| mastery.get(&id).copied().unwrap_or(0.0))
        .sum();
    sum / registry.len() as f64
}

/// Level for a mastery map
pub fn classify_level(mastery: &MasteryMap, registry: &TopicRegistry) -> Level {
    Level::classify(registry_mean(mastery, registry))
}

/// Topics whose score satisfies `keep`, in topic-id order
pub fn select_topics(
    mastery: &MasteryMap,
    registry: &TopicRegistry,
    keep: impl Fn(f64) -> bool,
) -> Vec<TopicScore> {
    mastery
        .iter()
        .filter(|(_, score)| keep(**score))
        .map(|(id, score)| TopicScore {
            id: *id,
            name: registry.name(*id).to_string(),
            score: *score,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(topic_id: usize, correct: bool) -> InteractionRecord {
        InteractionRecord::new(topic_id, correct, 30.0, 5)
    }

    #[test]
    fn test_mastery_ratio() {
        let registry = TopicRegistry::new();
        let records = vec![record(0, true), record(0, true), record(0, false), record(1, false)];
        let mastery = compute_mastery(&records, &registry);

        assert!((mastery[&0] - 66.666_666).abs() < 1e-3);
        assert_eq!(mastery[&1], 0.0);
        assert_eq!(mastery[&9], 0.0);
        assert_eq!(mastery.len(), registry.len());
    }

    #[test]
    fn test_mastery_stays_in_range() {
        let registry = TopicRegistry::new();
        let records: Vec<_> = (0..37).map(|i| record(i % 10, i % 3 != 0)).collect();
        for score in compute_mastery(&records, &registry).values() {
            assert!((0.0..=100.0).contains(score));
        }
    }

    #[test]
    fn test_out_of_registry_records_ignored() {
        let registry = TopicRegistry::new();
        let mastery = compute_mastery(&[record(12, true)], &registry);
        assert!(mastery.values().all(|score| *score == 0.0));
    }

    #[test]
    fn test_mean_counts_missing_topics_as_zero() {
        let registry = TopicRegistry::new();
        let mut mastery = MasteryMap::new();
        mastery.insert(0, 100.0);
        mastery.insert(1, 100.0);
        mastery.insert(2, 100.0);
        mastery.insert(3, 100.0);

        assert_eq!(registry_mean(&mastery, &registry), 40.0);
        assert_eq!(classify_level(&mastery, &registry), Level::Intermediate);
    }

    #[test]
    fn test_level_at_seventy_is_advanced() {
        let registry = TopicRegistry::new();
        let mastery: MasteryMap = registry.ids().map(|id| (id, 70.0)).collect();
        assert_eq!(classify_level(&mastery, &registry), Level::Advanced);
    }
}
