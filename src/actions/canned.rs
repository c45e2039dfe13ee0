//! Literal content for the handlers that never call the collaborator

use rand::seq::SliceRandom;
use rand::Rng;

use crate::actions::types::{ActionContent, ActionContext, ContentKind};
use crate::topics::TopicRegistry;

const DEFAULT_BADGE: &str = "🏆";

const MOTIVATION_MESSAGES: [&str; 4] = [
    "💪 **Don't give up!** Every expert was once a beginner. The fact that you're practicing shows you're already ahead of most people.",
    "🌱 **Growth mindset!** Mistakes are proof you're learning. Each error teaches you something new.",
    "🎯 **Focus on progress, not perfection!** You've come this far - that's already an achievement.",
    "⚡ **Small wins matter!** Even understanding one concept today is progress. Keep going!",
];

fn celebration_messages(context: &ActionContext) -> [String; 4] {
    let total = if context.total_interactions > 0 {
        context.total_interactions.to_string()
    } else {
        "many".to_string()
    };
    let streak = if context.streak > 0 {
        context.streak.to_string()
    } else {
        "Your".to_string()
    };
    let mastered = if context.mastered_topics.is_empty() {
        "this topic".to_string()
    } else {
        context.mastered_topics.join(", ")
    };

    [
        format!("🎉 **Incredible work!** You've solved {} problems! Your dedication is impressive.", total),
        format!("🔥 **You're on fire!** {} correct answers in a row! Keep this momentum going!", streak),
        format!("⭐ **Outstanding!** You've mastered {}. Ready for the next challenge?", mastered),
        "🚀 **Unstoppable!** Your progress is phenomenal. You're interview-ready!".to_string(),
    ]
}

/// Celebration; a reached milestone wins over the random message
pub fn celebrate<R: Rng + ?Sized>(context: &ActionContext, rng: &mut R) -> ActionContent {
    let (content, badge) = match context.milestone {
        Some(milestone) => (milestone.message.to_string(), milestone.badge.to_string()),
        None => {
            let messages = celebration_messages(context);
            let content = messages.choose(rng).cloned().unwrap_or_default();
            (content, DEFAULT_BADGE.to_string())
        }
    };

    ActionContent {
        kind: ContentKind::Celebration,
        topic: None,
        content,
        next_action: "Keep pushing forward - you're doing amazing!".to_string(),
        badge: Some(badge),
    }
}

pub fn motivate<R: Rng + ?Sized>(rng: &mut R) -> ActionContent {
    let content = MOTIVATION_MESSAGES.choose(rng).copied().unwrap_or_default();

    ActionContent {
        kind: ContentKind::Motivation,
        topic: None,
        content: content.to_string(),
        next_action: "Let's tackle this together, one step at a time.".to_string(),
        badge: None,
    }
}

pub fn onboard() -> ActionContent {
    let first = TopicRegistry::new().first();
    let content = format!(
        "👋 **Welcome to your personal learning journey!**

I'm your study companion, here to guide you every step of the way.

**Here's how I'll help you:**
✅ Track your progress across all topics
✅ Identify your strengths and weaknesses
✅ Create personalized learning plans
✅ Provide practice problems and explanations
✅ Celebrate your wins and support you through challenges

**Let's start with {}** - the foundation of everything!

First, let me assess your current level. Ready for a quick diagnostic?",
        first
    );

    ActionContent {
        kind: ContentKind::Onboarding,
        topic: None,
        content,
        next_action: "Start Diagnostic Assessment".to_string(),
        badge: None,
    }
}

pub fn advance(context: &ActionContext) -> ActionContent {
    let mastered = if context.mastered_topics.is_empty() {
        "✅ All topics".to_string()
    } else {
        context
            .mastered_topics
            .iter()
            .map(|topic| format!("✅ {}", topic))
            .collect::<Vec<_>>()
            .join("\n")
    };

    let content = format!(
        "🎓 **Congratulations!** You've mastered all core topics:

{}

**You're now ready for:**
🚀 Advanced system design
🏗️ Building real-world projects
💼 Technical interview preparation
🌟 Contributing to open source

**Your next challenge:** Build a full-stack application that showcases everything you've learned!

Want me to help you plan it?",
        mastered
    );

    ActionContent {
        kind: ContentKind::Advancement,
        topic: None,
        content,
        next_action: "Plan Capstone Project".to_string(),
        badge: None,
    }
}
