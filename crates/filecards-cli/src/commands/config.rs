//! Configuration CLI commands.

use clap::{Args, Subcommand};

use crate::output::{self, OutputFormat};
use filecards_core::config::AppConfig;
use filecards_core::error::AppError;

/// Arguments for config commands
#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Config subcommand
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration
    Show,
    /// Print a short summary of the settings that matter most
    Summary,
}

/// Execute config commands
pub async fn execute(args: &ConfigArgs, config: &AppConfig, format: OutputFormat) -> Result<(), AppError> {
    match &args.command {
        ConfigCommand::Show => output::print_record(&masked(config), format),
        ConfigCommand::Summary => {
            output::print_kv("API", &config.api.base_url);
            output::print_kv(
                "Token",
                if config.api.token.is_some() { "set" } else { "not set" },
            );
            output::print_kv("Double click", &format!("{} ms", config.selection.double_click_ms));
            output::print_kv(
                "Drag delay",
                &format!(
                    "{} ms pointer / {} ms touch",
                    config.drag.pointer_delay_ms, config.drag.touch_delay_ms
                ),
            );
            output::print_kv("Root folder", &config.drag.root_folder_id);
            output::print_kv("Log level", &config.logging.level);
        }
    }
    Ok(())
}

/// Copy of the config with the API token hidden
fn masked(config: &AppConfig) -> AppConfig {
    let mut shown = config.clone();
    if shown.api.token.is_some() {
        shown.api.token = Some("********".to_string());
    }
    shown
}
