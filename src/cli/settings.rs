//! Settings subcommand implementation.

use crate::config::{AppSettings, Paths};
use crate::error::{CliError, CliResult};
use crate::output;
use clap::{Parser, Subcommand};
use std::path::Path;

/// Inspect or create the settings file.
#[derive(Parser, Debug)]
pub struct SettingsCommand {
    #[command(subcommand)]
    pub action: SettingsAction,
}

/// Settings actions.
#[derive(Subcommand, Debug)]
pub enum SettingsAction {
    /// Print the effective settings as JSON
    Show,

    /// Write a settings file containing the defaults
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

impl SettingsCommand {
    /// Execute the settings command. `custom` is the global `--config` path.
    pub fn execute(&self, custom: Option<&Path>) -> CliResult<()> {
        match self.action {
            SettingsAction::Show => {
                let settings = AppSettings::resolve(custom)?;
                let json = serde_json::to_string_pretty(&settings)
                    .map_err(|e| CliError::Other(e.to_string()))?;
                println!("{}", json);
                Ok(())
            }
            SettingsAction::Init { force } => {
                let path = match custom {
                    Some(path) => path.to_path_buf(),
                    None => Paths::discover()?.settings_file(),
                };

                if path.exists() && !force {
                    return Err(CliError::Other(format!(
                        "{} already exists (use --force to overwrite)",
                        path.display()
                    )));
                }

                AppSettings::default().save_to(&path)?;
                output::print_success(&format!("Wrote default settings to {}", path.display()));
                Ok(())
            }
        }
    }
}
