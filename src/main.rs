//! Talent match: AI-powered freelancer and job matching engine

use clap::Parser;
use log::{error, info};
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;
use std::time::Instant;

use talent_match::cli::{self, Cli, Commands, ConfigAction, ModelAction};
use talent_match::config::{Config, OutputFormat};
use talent_match::error::{Result, TalentMatchError};
use talent_match::matching::embeddings::{Embedder, EmbeddingEngine, HashingEmbedder};
use talent_match::matching::model_manager::EmbeddingModelManager;
use talent_match::models::{MatchCandidatesRequest, MatchJobsRequest};
use talent_match::output::formatter;
use talent_match::output::report::{MatchReport, MatchSet};
use talent_match::MatchEngine;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = match load_config(cli.config.as_ref()) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run_command(cli.command, config).await {
        error!("Command failed: {}", e);
        process::exit(1);
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}

async fn run_command(command: Commands, config: Config) -> Result<()> {
    match command {
        Commands::MatchCandidates {
            request,
            embedding,
            output,
            save,
            hash_embedder,
        } => {
            info!("Matching freelancers against a job posting");

            let request: MatchCandidatesRequest = read_request(&request)?;
            let output_format =
                cli::parse_output_format(&output).map_err(TalentMatchError::InvalidInput)?;

            let embedder = build_embedder(&config, embedding.as_deref(), hash_embedder).await?;
            let engine = MatchEngine::new(embedder);

            let start = Instant::now();
            let matches =
                engine.match_candidates_to_target(&request.job(), &request.freelancers, request.limit)?;

            let report = MatchReport::new(
                engine.embedder().model_id(),
                start.elapsed().as_millis() as u64,
                MatchSet::Candidates(matches),
            );
            emit_report(&report, output_format, save.as_deref(), &config)
        }

        Commands::MatchJobs {
            request,
            embedding,
            output,
            save,
            hash_embedder,
        } => {
            info!("Matching job postings against a freelancer profile");

            let request: MatchJobsRequest = read_request(&request)?;
            let output_format =
                cli::parse_output_format(&output).map_err(TalentMatchError::InvalidInput)?;

            let embedder = build_embedder(&config, embedding.as_deref(), hash_embedder).await?;
            let engine = MatchEngine::new(embedder);

            let start = Instant::now();
            let matches = engine.match_targets_to_candidate(
                &request.freelancer_skills,
                &request.freelancer_bio,
                &request.jobs,
                request.preferred_rate,
                request.limit,
            )?;

            let report = MatchReport::new(
                engine.embedder().model_id(),
                start.elapsed().as_millis() as u64,
                MatchSet::Jobs(matches),
            );
            emit_report(&report, output_format, save.as_deref(), &config)
        }

        Commands::Models { action } => run_models_command(action, &config).await,

        Commands::Config { action } => run_config_command(action, &config),
    }
}

fn read_request<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    cli::validate_file_extension(path, &["json"]).map_err(TalentMatchError::InvalidInput)?;

    let payload = std::fs::read_to_string(path)?;
    serde_json::from_str(&payload).map_err(|e| {
        TalentMatchError::InvalidInput(format!(
            "failed to parse match request {}: {}",
            path.display(),
            e
        ))
    })
}

/// Build the embedding provider once, up front; the engine borrows it
/// for the rest of the run.
async fn build_embedder(
    config: &Config,
    embedding_override: Option<&str>,
    hash_embedder: bool,
) -> Result<Arc<dyn Embedder>> {
    if hash_embedder {
        info!("Using the deterministic hashing embedder");
        return Ok(Arc::new(HashingEmbedder::new()));
    }

    let mut manager = EmbeddingModelManager::new(config.models_dir().clone()).await?;
    let requested = embedding_override.unwrap_or(&config.models.default_embedding_model);
    let model_id = manager
        .resolve_model_id(requested)
        .ok_or_else(|| TalentMatchError::ModelNotFound(requested.to_string()))?;
    let model_path = manager.ensure_model_available(&model_id).await?;

    Ok(Arc::new(EmbeddingEngine::new(&model_path, &model_id)?))
}

fn emit_report(
    report: &MatchReport,
    format: OutputFormat,
    save: Option<&Path>,
    config: &Config,
) -> Result<()> {
    let rendered = formatter::render(report, format, config.output.color_output)?;

    match save {
        Some(path) => {
            std::fs::write(path, &rendered)?;
            println!("Report saved to {}", path.display());
        }
        None => print!("{}", rendered),
    }

    Ok(())
}

async fn run_models_command(action: ModelAction, config: &Config) -> Result<()> {
    let mut manager = EmbeddingModelManager::new(config.models_dir().clone()).await?;

    match action {
        ModelAction::List => {
            println!("Available embedding models:");
            for (id, model) in manager.list_available_models() {
                let marker = if manager.is_model_downloaded(id) {
                    " [downloaded]"
                } else {
                    ""
                };
                println!(
                    "  {:<16} {:<14} {:>4} MB  {} dims  {}{}",
                    id, model.name, model.size_mb, model.dimensions, model.description, marker
                );
            }
        }

        ModelAction::Download { model, force } => {
            let model_id = manager
                .resolve_model_id(&model)
                .ok_or_else(|| TalentMatchError::ModelNotFound(model.clone()))?;

            if force && manager.is_model_downloaded(&model_id) {
                manager.remove_model(&model_id).await?;
            }

            let path = manager.download_model(&model_id).await?;
            println!("Model {} available at {}", model_id, path.display());
        }

        ModelAction::Remove { model } => {
            let model_id = manager
                .resolve_model_id(&model)
                .unwrap_or_else(|| model.clone());
            manager.remove_model(&model_id).await?;
            println!("Model {} removed", model_id);
        }

        ModelAction::Info { model } => {
            let model_id = manager
                .resolve_model_id(&model)
                .ok_or_else(|| TalentMatchError::ModelNotFound(model.clone()))?;
            let info = manager
                .get_model_info(&model_id)
                .ok_or_else(|| TalentMatchError::ModelNotFound(model_id.clone()))?;

            println!("{} ({})", info.name, model_id);
            println!("  repo:       {}", info.repo_id);
            println!("  size:       {} MB", info.size_mb);
            println!("  dimensions: {}", info.dimensions);
            println!("  downloaded: {}", manager.is_model_downloaded(&model_id));
            println!("  {}", info.description);
        }
    }

    Ok(())
}

fn run_config_command(action: Option<ConfigAction>, config: &Config) -> Result<()> {
    match action.unwrap_or(ConfigAction::Show) {
        ConfigAction::Show => {
            let rendered = toml::to_string_pretty(config).map_err(|e| {
                TalentMatchError::Configuration(format!("failed to serialize config: {}", e))
            })?;
            println!("{}", rendered);
        }

        ConfigAction::Reset => {
            Config::default().save()?;
            println!("Configuration reset to defaults");
        }
    }

    Ok(())
}
