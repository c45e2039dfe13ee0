//! StudyBuddy - Main CLI Entry Point

use std::path::Path;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing::{debug, info};

use studybuddy::{
    agent::TutorOrchestrator,
    cli::{Args, Commands, Config},
    llm::{GenerationClient, HttpGenerator, OfflineGenerator, Provider},
    logging::{effective_level, init_tracing},
    store::JsonFileStore,
    topics::TopicRegistry,
    types::InteractionRecord,
};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = match (&args.command, args.config.as_deref()) {
        // `config --write` may target a file that does not exist yet
        (Commands::Config { write: true }, Some(path)) if !path.exists() => Config::default(),
        (_, path) => Config::load(path).context("Failed to load configuration")?,
    };
    init_tracing(effective_level(&config.logging.level, args.verbose));
    debug!(?config, "Configuration loaded");

    if let Commands::Config { write } = args.command {
        return show_config(&config, write, args.config.as_deref());
    }

    let orchestrator = build_orchestrator(&config)?;
    run_command(&args, &orchestrator).await
}

fn build_orchestrator(config: &Config) -> Result<TutorOrchestrator> {
    let state_file = config.state_file();
    let store = Arc::new(
        JsonFileStore::open(&state_file)
            .with_context(|| format!("Failed to open state file {}", state_file.display()))?,
    );

    let generator: Arc<dyn GenerationClient> = match config.generation.provider {
        Provider::Offline => Arc::new(OfflineGenerator),
        _ => Arc::new(HttpGenerator::new(config.generation.to_settings())?),
    };

    info!(
        provider = ?config.generation.provider,
        state_file = %state_file.display(),
        "Tutor ready"
    );

    Ok(TutorOrchestrator::new(store.clone(), store, generator, config.observer))
}

async fn run_command(args: &Args, tutor: &TutorOrchestrator) -> Result<()> {
    let user = args.user.as_str();

    match &args.command {
        Commands::Guidance => print_json(&tutor.run_cycle(user, &args.session).await),
        Commands::Plan => print_json(&tutor.learning_plan(user).await),
        Commands::Performance => print_json(&tutor.performance_report(user).await),
        Commands::Readiness { topic } => print_json(&tutor.readiness_for(user, topic).await),
        Commands::Patterns => print_json(&tutor.patterns(user).await),
        Commands::Record { topic, correct, time, difficulty, .. } => {
            let topic_id = TopicRegistry::new()
                .id_of(topic)
                .ok_or_else(|| anyhow!("Unknown topic: {}", topic))?;
            let record = InteractionRecord::new(topic_id, *correct, *time, *difficulty);

            let outcome = tutor
                .record_interaction(user, record)
                .await
                .context("Failed to record interaction")?;
            print_json(&outcome)
        }
        Commands::Evaluate { topic, problem, answer } => {
            print_json(&tutor.evaluate_answer(user, topic, problem, answer).await)
        }
        Commands::Chat { message } => print_json(&tutor.chat(user, &args.session, message).await),
        Commands::Act { action } => print_json(&tutor.act(user, action).await),
        Commands::Config { .. } => Ok(()),
    }
}

fn show_config(config: &Config, write: bool, explicit: Option<&Path>) -> Result<()> {
    if write {
        let path = config
            .write_target(explicit)
            .ok_or_else(|| anyhow!("No config path given and no home directory found"))?;
        config
            .save(&path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!(path = %path.display(), "Configuration written");
        println!("# Written to: {}", path.display());
    }

    println!("# Configuration");
    if let Some(path) = Config::default_path() {
        println!("# Default location: {}", path.display());
    }
    println!("# State file: {}", config.state_file().display());
    println!();
    print!("{}", toml::to_string_pretty(config)?);
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
