use anyhow::Context;
use clap::Parser;
use jail_etl::config::{CliConfig, Command, ExportCommand, ImportCommand, LogFormat};
use jail_etl::core::jobs::StepDetail;
use jail_etl::utils::error::{ErrorSeverity, JailError};
use jail_etl::utils::logger;
use jail_etl::utils::monitor::PhaseMonitor;
use jail_etl::utils::validation::Validate;
use jail_etl::{
    export_prisoners_by_cells, export_prisoners_inbox, import_departments_cells,
    import_officers_prisoners_with, import_prisoners_mails, ImportOptions, JobRunner, JobsConfig,
    JsonFileStore,
};
use std::fs;
use std::path::Path;

fn read_input(path: &Path) -> anyhow::Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read input file {}", path.display()))
}

fn emit(document: String, output: Option<&Path>) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent)?;
                }
            }
            fs::write(path, document)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!("📁 Output saved to: {}", path.display());
        }
        None => println!("{}", document),
    }
    Ok(())
}

fn run(config: &CliConfig) -> anyhow::Result<()> {
    let mut monitor = PhaseMonitor::new(config.monitor);

    match &config.command {
        Command::Import(command) => {
            let mut store = JsonFileStore::open(&config.store)?;
            tracing::debug!("Using store {}", store.path().display());
            let report = match command {
                ImportCommand::Departments { file } => {
                    import_departments_cells(&mut store, &read_input(file)?)?
                }
                ImportCommand::Prisoners { file } => {
                    import_prisoners_mails(&mut store, &read_input(file)?)?
                }
                ImportCommand::Officers { file } => {
                    let options = ImportOptions {
                        unknown_token: config.on_unknown_token,
                    };
                    import_officers_prisoners_with(&mut store, &read_input(file)?, &options)?
                }
            };
            monitor.record("import");
            if !report.is_empty() {
                println!("{}", report);
            }
        }
        Command::Export(command) => {
            let store = JsonFileStore::open(&config.store)?;
            match command {
                ExportCommand::ByCells { ids, output } => {
                    let document = export_prisoners_by_cells(&store, ids)?;
                    emit(document, output.as_deref())?;
                }
                ExportCommand::Inbox { names, output } => {
                    let document = export_prisoners_inbox(&store, names)?;
                    emit(document, output.as_deref())?;
                }
            }
            monitor.record("export");
        }
        Command::Run { config: job_file } => {
            let jobs = JobsConfig::from_file(job_file)?;
            let base_dir = job_file
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_default();
            let enabled = config.monitor || jobs.monitoring_enabled();
            let outcome = JobRunner::new_with_monitoring(jobs, enabled)
                .with_base_dir(base_dir)
                .run()?;

            for step in outcome.steps {
                match step.detail {
                    StepDetail::Imported(report) => {
                        println!("# {}", step.step);
                        if !report.is_empty() {
                            println!("{}", report);
                        }
                    }
                    StepDetail::Written(path) => {
                        println!("# {} -> {}", step.step, path.display())
                    }
                    StepDetail::Document(document) => {
                        println!("# {}", step.step);
                        println!("{}", document);
                    }
                }
            }
        }
    }

    monitor.log_final_stats();
    Ok(())
}

fn main() {
    let config = CliConfig::parse();

    // 初始化日誌
    match config.log_format {
        LogFormat::Compact => logger::init_cli_logger(config.verbose),
        LogFormat::Json => logger::init_json_logger(config.verbose),
    }

    tracing::info!("Starting jail-etl CLI");
    tracing::debug!("CLI config: {:?}", config);

    // 驗證配置
    if let Err(e) = config.validate().into_result() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(2);
    }

    if config.monitor {
        tracing::info!("🔍 System monitoring enabled");
    }

    if let Err(err) = run(&config) {
        let Some(e) = err.downcast_ref::<JailError>() else {
            tracing::error!("❌ jail-etl failed: {:#}", err);
            eprintln!("❌ {:#}", err);
            std::process::exit(3);
        };

        tracing::error!(
            "❌ jail-etl failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 建議: {}", e.recovery_suggestion());

        // 根據錯誤嚴重程度決定退出碼
        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }
}
