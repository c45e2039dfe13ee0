//! Role-specific prompts for collaborator-backed actions

use crate::actions::types::ActionContext;

pub fn explain(context: &ActionContext) -> String {
    format!(
        r#"You are a technical interview coach explaining {topic}.

USER LEVEL: {level}

YOUR TASK:
Explain {topic} in a clear, engaging way:
1. Start with a simple analogy
2. Define the concept
3. Give a practical example
4. Explain why it matters
5. Common use cases

Keep it conversational and encouraging. Max 400 words."#,
        topic = context.topic,
        level = context.user_level,
    )
}

pub fn practice(context: &ActionContext) -> String {
    format!(
        r#"Generate {count} practice problems for {topic}.

DIFFICULTY: {difficulty}

Format each as:
**Problem X:**
[Clear problem statement]

**Hint:** [Subtle hint]

**Key Concepts:** [What this tests]

Make them progressively harder. Be specific and practical."#,
        count = context.practice_count,
        topic = context.topic,
        difficulty = context.difficulty,
    )
}

pub fn assessment(context: &ActionContext) -> String {
    format!(
        r#"Create a 5-question assessment for {}.

Include:
- 3 conceptual questions
- 2 code-based questions

Format:
**Question X:**
[Question]

A) [Option]
B) [Option]
C) [Option]
D) [Option]

Make it challenging but fair."#,
        context.topic
    )
}

pub fn review(context: &ActionContext) -> String {
    let mistakes = if context.recent_errors.is_empty() {
        "General difficulties".to_string()
    } else {
        context
            .recent_errors
            .iter()
            .enumerate()
            .map(|(i, error)| format!("{}. {}", i + 1, error))
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!(
        r#"The user is struggling with {topic}.

RECENT MISTAKES:
{mistakes}

YOUR TASK:
1. Identify the root cause of these mistakes
2. Explain the correct approach
3. Give a memory trick or pattern
4. Suggest targeted practice

Be empathetic but constructive. Max 300 words."#,
        topic = context.topic,
        mistakes = mistakes,
    )
}

pub fn project(context: &ActionContext) -> String {
    let mastered = if context.mastered_topics.is_empty() {
        "core topics".to_string()
    } else {
        context.mastered_topics.join(", ")
    };

    format!(
        r#"The user has mastered: {mastered}.

USER LEVEL: {level}

Suggest 3 real-world projects that:
1. Apply these mastered topics
2. Challenge them appropriately
3. Are portfolio-worthy

For each project:
**Project: [Name]**
[2-sentence description]
**Technologies:** [stack]
**Learning outcomes:** [what they'll gain]

Be inspiring and practical."#,
        mastered = mastered,
        level = context.user_level,
    )
}

pub fn strengthen(context: &ActionContext) -> String {
    format!(
        r#"The user is weak in {topic} ({mastery}% mastery).

Create a targeted 7-day improvement plan:

**Day 1-2:** [Foundation review]
**Day 3-4:** [Guided practice]
**Day 5-6:** [Challenging problems]
**Day 7:** [Assessment]

For each day, give:
- Specific goals
- Practice problems
- Success criteria

Be structured and actionable."#,
        topic = context.topic,
        mastery = context.current_mastery,
    )
}
