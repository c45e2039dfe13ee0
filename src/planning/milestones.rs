//! Milestone table
//!
//! Milestones fire on exact counts only: 25 fires, 26 does not.

use serde::Serialize;

/// A badge awarded at an exact interaction count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Milestone {
    pub count: usize,
    pub badge: &'static str,
    pub message: &'static str,
}

pub const MILESTONES: [Milestone; 6] = [
    Milestone { count: 10, badge: "🌱 Getting Started", message: "10 problems solved!" },
    Milestone { count: 25, badge: "🔥 On Fire", message: "25 problems conquered!" },
    Milestone { count: 50, badge: "⭐ Rising Star", message: "50 problems mastered!" },
    Milestone { count: 100, badge: "🏆 Champion", message: "100 problems destroyed!" },
    Milestone { count: 250, badge: "👑 Legend", message: "250 problems annihilated!" },
    Milestone { count: 500, badge: "🚀 Unstoppable", message: "500 problems obliterated!" },
];

/// Milestone reached at exactly `total` interactions
pub fn check_milestones(total: usize) -> Option<Milestone> {
    MILESTONES.iter().find(|m| m.count == total).copied()
}
