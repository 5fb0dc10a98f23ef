//! CLI command definitions and dispatch.

pub mod config;
pub mod moves;
pub mod tree;

use std::path::Path;

use clap::{Parser, Subcommand};

use crate::output::OutputFormat;
use filecards_core::config::AppConfig;
use filecards_core::error::{AppError, ErrorKind};
use filecards_entity::FileSystemItem;

/// FileCards: card-grid file manager core
#[derive(Debug, Parser)]
#[command(name = "filecards", version, about, long_about = None)]
pub struct Cli {
    /// Path to a configuration file (defaults to config/default.toml plus the env overlay)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Environment overlay to load (config/<env>.toml)
    #[arg(short, long, default_value = "development")]
    pub env: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List the items of a tree snapshot
    Tree(tree::TreeArgs),
    /// Move items into a folder through the remote API
    Move(moves::MoveArgs),
    /// Configuration management
    Config(config::ConfigArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self, config: AppConfig) -> Result<(), AppError> {
        match &self.command {
            Commands::Tree(args) => tree::execute(args, self.format).await,
            Commands::Move(args) => moves::execute(args, &config, self.format).await,
            Commands::Config(args) => config::execute(args, &config, self.format).await,
        }
    }
}

/// Helper: load configuration from an explicit file or the default layering
pub fn load_config(path: Option<&str>, env: &str) -> Result<AppConfig, AppError> {
    let loaded = match path {
        Some(path) => AppConfig::load_file(path),
        None => AppConfig::load(env),
    };
    loaded.map_err(|e| AppError::configuration(format!("Failed to load config: {}", e.message)))
}

/// Helper: read a JSON array of items
pub async fn read_snapshot(path: &str) -> Result<Vec<FileSystemItem>, AppError> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::NotFound, format!("Failed to read {path}"), e))?;
    Ok(serde_json::from_str(&raw)?)
}

/// Helper: write a JSON array of items
pub async fn write_snapshot(path: &str, items: &[&FileSystemItem]) -> Result<(), AppError> {
    if let Some(parent) = Path::new(path).parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    let json = serde_json::to_string_pretty(items)?;
    tokio::fs::write(path, json).await?;
    Ok(())
}
