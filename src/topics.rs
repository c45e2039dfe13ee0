//! Topic registry
//!
//! The fixed, ordered list of curriculum topics. Every other component
//! addresses topics by their index here, and name lookups are exact and
//! case-sensitive: a name that differs in case or wording does not resolve.

/// Stable topic identifier (index into the registry)
pub type TopicId = usize;

/// Curriculum topics, in registry order
pub const TOPICS: [&str; 10] = [
    "Data Structures",
    "Algorithms",
    "OOP",
    "Database Management",
    "Web Development",
    "Software Engineering",
    "Operating Systems",
    "Computer Networks",
    "Machine Learning",
    "Cloud Computing",
];

/// Focus used once every registry topic is mastered. Not a registry entry.
pub const ADVANCED_PROJECTS: &str = "Advanced Projects";

/// Display name for ids outside the registry
pub const UNKNOWN_TOPIC: &str = "Unknown";

/// Lookup surface over [`TOPICS`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TopicRegistry;

impl TopicRegistry {
    pub fn new() -> Self {
        Self
    }

    /// Number of topics
    pub fn len(&self) -> usize {
        TOPICS.len()
    }

    pub fn is_empty(&self) -> bool {
        TOPICS.is_empty()
    }

    /// Name for an id, or `None` when out of range
    pub fn try_name(&self, id: TopicId) -> Option<&'static str> {
        TOPICS.get(id).copied()
    }

    /// Name for an id, falling back to [`UNKNOWN_TOPIC`]
    pub fn name(&self, id: TopicId) -> &'static str {
        self.try_name(id).unwrap_or(UNKNOWN_TOPIC)
    }

    /// Exact, case-sensitive reverse lookup
    pub fn id_of(&self, name: &str) -> Option<TopicId> {
        TOPICS.iter().position(|topic| *topic == name)
    }

    /// Whether an id addresses a registry topic
    pub fn contains(&self, id: TopicId) -> bool {
        id < TOPICS.len()
    }

    /// First topic in the registry (onboarding focus)
    pub fn first(&self) -> &'static str {
        TOPICS[0]
    }

    /// All ids in registry order
    pub fn ids(&self) -> impl Iterator<Item = TopicId> {
        0..TOPICS.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_every_topic() {
        let registry = TopicRegistry::new();
        for id in registry.ids() {
            assert_eq!(registry.id_of(registry.name(id)), Some(id));
        }
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let registry = TopicRegistry::new();
        assert_eq!(registry.id_of("Data Structures"), Some(0));
        assert_eq!(registry.id_of("data structures"), None);
    }

    #[test]
    fn test_divergent_display_names_do_not_resolve() {
        let registry = TopicRegistry::new();
        assert_eq!(registry.id_of("Object-Oriented Programming"), None);
        assert_eq!(registry.id_of(ADVANCED_PROJECTS), None);
    }

    #[test]
    fn test_out_of_range_id() {
        let registry = TopicRegistry::new();
        assert_eq!(registry.try_name(10), None);
        assert_eq!(registry.name(42), UNKNOWN_TOPIC);
        assert!(!registry.contains(10));
    }
}
