//! Command-line argument parsing for StudyBuddy
//!
//! Provides clap-based CLI with subcommands and verbosity control.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// StudyBuddy - adaptive tutoring decisions from a learner's history
#[derive(Parser, Debug)]
#[command(name = "studybuddy")]
#[command(author = "Jerome (Kubashen) Naidoo")]
#[command(version)]
#[command(about = "Observe, plan and guide a learner's next study step", long_about = None)]
pub struct Args {
    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Learner identifier
    #[arg(short, long, global = true, default_value = "default")]
    pub user: String,

    /// Conversation session key
    #[arg(short, long, global = true, default_value = "default")]
    pub session: String,

    /// Verbosity level: -v (debug), -vv (trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Subcommand
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Run a full guidance cycle: plan, next action and performance
    Guidance,

    /// Show the learning plan
    Plan,

    /// Write a performance report
    Performance,

    /// Check readiness to move past a topic
    Readiness {
        /// Topic name, e.g. "Algorithms"
        #[arg(short, long)]
        topic: String,
    },

    /// Detect learning patterns in recent activity
    Patterns,

    /// Record one answered question
    Record {
        /// Topic name
        #[arg(short, long)]
        topic: String,

        /// The answer was correct
        #[arg(long, conflicts_with = "incorrect", required_unless_present = "incorrect")]
        correct: bool,

        /// The answer was incorrect
        #[arg(long)]
        incorrect: bool,

        /// Seconds spent on the question
        #[arg(long, default_value_t = 0.0)]
        time: f64,

        /// Difficulty from 1 to 10
        #[arg(short, long, default_value_t = 5)]
        difficulty: u8,
    },

    /// Grade an answer and record the outcome
    Evaluate {
        #[arg(short, long)]
        topic: String,

        #[arg(short, long)]
        problem: String,

        #[arg(short, long)]
        answer: String,
    },

    /// Send a chat message to the tutor
    Chat {
        /// Message text
        #[arg(value_name = "MESSAGE")]
        message: String,
    },

    /// Execute one named action, e.g. explain_topic or celebrate_progress
    Act {
        #[arg(value_name = "ACTION")]
        action: String,
    },

    /// Display current configuration
    Config {
        /// Write the effective configuration to the config file
        #[arg(long)]
        write: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_guidance_with_globals() {
        let args = Args::try_parse_from(["studybuddy", "guidance", "--user", "u1", "-vv"]).unwrap();
        assert_eq!(args.command, Commands::Guidance);
        assert_eq!(args.user, "u1");
        assert_eq!(args.session, "default");
        assert_eq!(args.verbose, 2);
    }

    #[test]
    fn test_parse_record_incorrect() {
        let args = Args::try_parse_from([
            "studybuddy", "record", "--topic", "Algorithms", "--incorrect", "--time", "42.5",
        ])
        .unwrap();

        match args.command {
            Commands::Record { topic, correct, incorrect, time, difficulty } => {
                assert_eq!(topic, "Algorithms");
                assert!(!correct);
                assert!(incorrect);
                assert_eq!(time, 42.5);
                assert_eq!(difficulty, 5);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_record_requires_outcome() {
        assert!(Args::try_parse_from(["studybuddy", "record", "--topic", "Algorithms"]).is_err());
        assert!(Args::try_parse_from([
            "studybuddy", "record", "--topic", "Algorithms", "--correct", "--incorrect",
        ])
        .is_err());
    }

    #[test]
    fn test_parse_act() {
        let args = Args::try_parse_from(["studybuddy", "act", "celebrate_progress"]).unwrap();
        assert_eq!(args.command, Commands::Act { action: "celebrate_progress".to_string() });
    }

    #[test]
    fn test_parse_config_write() {
        let args = Args::try_parse_from(["studybuddy", "config"]).unwrap();
        assert_eq!(args.command, Commands::Config { write: false });

        let args = Args::try_parse_from(["studybuddy", "-c", "/tmp/sb.toml", "config", "--write"]).unwrap();
        assert_eq!(args.command, Commands::Config { write: true });
        assert_eq!(args.config.as_deref(), Some(std::path::Path::new("/tmp/sb.toml")));
    }
}
