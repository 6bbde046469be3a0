use crate::config::toml_config::DEFAULT_STORE_PATH;
use crate::core::import::UnknownTokenPolicy;
use crate::utils::validation::{validate_path, Validate, Validation, Violation};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

#[derive(Debug, Clone, Parser)]
#[command(name = "jail-etl")]
#[command(about = "Import and export tool for the SoftJail prison database")]
pub struct CliConfig {
    /// JSON snapshot file backing the store
    #[arg(long, global = true, default_value = DEFAULT_STORE_PATH)]
    pub store: String,

    #[arg(long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Log time and memory per step")]
    pub monitor: bool,

    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,

    /// What to do with officers whose position or weapon is unknown
    #[arg(long, global = true, value_enum, default_value_t = UnknownTokenPolicy::Abort)]
    pub on_unknown_token: UnknownTokenPolicy,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Import a data file into the store
    #[command(subcommand)]
    Import(ImportCommand),
    /// Export a report from the store
    #[command(subcommand)]
    Export(ExportCommand),
    /// Run a TOML job file
    Run {
        #[arg(long, short)]
        config: PathBuf,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum ImportCommand {
    /// Departments with their cells (JSON)
    Departments { file: PathBuf },
    /// Prisoners with their mails (JSON)
    Prisoners { file: PathBuf },
    /// Officers with their prisoner links (XML)
    Officers { file: PathBuf },
}

#[derive(Debug, Clone, Subcommand)]
pub enum ExportCommand {
    /// Prisoners by id with cell, officers and total salary (JSON)
    ByCells {
        #[arg(long, value_delimiter = ',', required = true)]
        ids: Vec<i32>,
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Prisoners by name with their reversed mail descriptions (XML)
    Inbox {
        #[arg(long)]
        names: String,
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

impl Validate for CliConfig {
    fn validate(&self) -> Validation {
        let mut validation = Validation::new();
        validation.check(validate_path("store", &self.store));

        if let Command::Export(ExportCommand::Inbox { names, .. }) = &self.command {
            if crate::core::export::parse_name_list(names).is_empty() {
                validation.check(Err(Violation::new(
                    "names",
                    "at least one prisoner name is required",
                )));
            }
        }

        validation
    }
}
