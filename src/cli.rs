//! CLI interface for the talent matcher

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "talent-match")]
#[command(about = "AI-powered freelancer and job matching engine")]
#[command(
    long_about = "Rank freelancers against a job (or jobs against a freelancer) by combining exact and semantic skill overlap with rate, experience, and rating signals"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Match freelancers against a job posting
    MatchCandidates {
        /// Path to a JSON match request (job + freelancer profiles)
        #[arg(short, long)]
        request: PathBuf,

        /// Embedding model to use (name, ID, or HuggingFace repo ID)
        #[arg(short, long)]
        embedding: Option<String>,

        /// Output format: console, json
        #[arg(short, long, default_value = "console")]
        output: String,

        /// Save output to file
        #[arg(short, long)]
        save: Option<PathBuf>,

        /// Use the deterministic hashing embedder (offline smoke runs;
        /// no semantic quality)
        #[arg(long)]
        hash_embedder: bool,
    },

    /// Match job postings against a freelancer profile
    MatchJobs {
        /// Path to a JSON match request (freelancer profile + jobs)
        #[arg(short, long)]
        request: PathBuf,

        /// Embedding model to use (name, ID, or HuggingFace repo ID)
        #[arg(short, long)]
        embedding: Option<String>,

        /// Output format: console, json
        #[arg(short, long, default_value = "console")]
        output: String,

        /// Save output to file
        #[arg(short, long)]
        save: Option<PathBuf>,

        /// Use the deterministic hashing embedder (offline smoke runs;
        /// no semantic quality)
        #[arg(long)]
        hash_embedder: bool,
    },

    /// Model management commands
    Models {
        #[command(subcommand)]
        action: ModelAction,
    },

    /// Show configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum ModelAction {
    /// List known and downloaded embedding models
    List,

    /// Download an embedding model
    Download {
        /// Model name or HuggingFace repo ID
        model: String,

        /// Force re-download if the model exists
        #[arg(short, long)]
        force: bool,
    },

    /// Remove a downloaded model
    Remove {
        /// Model name to remove
        model: String,
    },

    /// Show model information
    Info {
        /// Model name
        model: String,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset configuration to defaults
    Reset,
}

/// Parse and validate output format
pub fn parse_output_format(format: &str) -> Result<crate::config::OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" => Ok(crate::config::OutputFormat::Console),
        "json" => Ok(crate::config::OutputFormat::Json),
        _ => Err(format!(
            "Invalid output format: {}. Supported: console, json",
            format
        )),
    }
}

/// Validate file extension
pub fn validate_file_extension(path: &Path, allowed_extensions: &[&str]) -> Result<(), String> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => {
            if allowed_extensions.contains(&ext.to_lowercase().as_str()) {
                Ok(())
            } else {
                Err(format!(
                    "Unsupported file extension: .{}. Allowed: {}",
                    ext,
                    allowed_extensions.join(", ")
                ))
            }
        }
        None => Err("File has no extension".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;

    #[test]
    fn test_parse_output_format() {
        assert_eq!(parse_output_format("console").unwrap(), OutputFormat::Console);
        assert_eq!(parse_output_format("JSON").unwrap(), OutputFormat::Json);
        assert!(parse_output_format("yaml").is_err());
    }

    #[test]
    fn test_validate_file_extension() {
        assert!(validate_file_extension(Path::new("request.json"), &["json"]).is_ok());
        assert!(validate_file_extension(Path::new("request.txt"), &["json"]).is_err());
        assert!(validate_file_extension(Path::new("request"), &["json"]).is_err());
    }
}
