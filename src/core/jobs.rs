//! Runs a TOML job file end to end: imports in dependency order, then the
//! configured exports.

use crate::adapters::store::JsonFileStore;
use crate::config::toml_config::{ExportConfig, ExportKind, JobsConfig};
use crate::core::export::{export_prisoners_by_cells, export_prisoners_inbox};
use crate::core::import::{
    import_departments_cells, import_officers_prisoners_with, import_prisoners_mails,
    ImportOptions,
};
use crate::core::report::ImportReport;
use crate::domain::Store;
use crate::utils::error::Result;
use crate::utils::monitor::PhaseMonitor;
use crate::utils::validation::Validate;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepOutcome {
    pub step: String,
    pub detail: StepDetail,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepDetail {
    Imported(ImportReport),
    /// Export written to the given file.
    Written(PathBuf),
    /// Export with no `output`; the encoded document itself.
    Document(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobOutcome {
    pub steps: Vec<StepOutcome>,
}

impl JobOutcome {
    pub fn step(&self, name: &str) -> Option<&StepOutcome> {
        self.steps.iter().find(|s| s.step == name)
    }
}

pub struct JobRunner {
    config: JobsConfig,
    base_dir: PathBuf,
    monitor: PhaseMonitor,
}

impl JobRunner {
    pub fn new(config: JobsConfig) -> Self {
        let enabled = config.monitoring_enabled();
        Self::new_with_monitoring(config, enabled)
    }

    pub fn new_with_monitoring(config: JobsConfig, monitoring_enabled: bool) -> Self {
        Self {
            config,
            base_dir: PathBuf::from("."),
            monitor: PhaseMonitor::new(monitoring_enabled),
        }
    }

    /// Relative paths in the job file resolve against `dir`.
    pub fn with_base_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.base_dir = dir.into();
        self
    }

    pub fn config(&self) -> &JobsConfig {
        &self.config
    }

    pub fn monitor(&self) -> &PhaseMonitor {
        &self.monitor
    }

    fn resolve(&self, path: &str) -> PathBuf {
        let path = Path::new(path);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }

    /// Opens the configured JSON store and runs the job against it.
    pub fn run(&mut self) -> Result<JobOutcome> {
        self.config.validate().into_result()?;
        let mut store = JsonFileStore::open(self.resolve(&self.config.store.path))?;
        self.execute(&mut store)
    }

    pub fn run_with_store<S: Store + ?Sized>(&mut self, store: &mut S) -> Result<JobOutcome> {
        self.config.validate().into_result()?;
        self.execute(store)
    }

    fn execute<S: Store + ?Sized>(&mut self, store: &mut S) -> Result<JobOutcome> {
        tracing::info!("🚀 Starting job '{}'", self.config.job_name());

        let mut outcome = JobOutcome::default();
        let options = ImportOptions {
            unknown_token: self.config.import.on_unknown_token,
        };

        if let Some(path) = self.config.import.departments.clone() {
            let text = fs::read_to_string(self.resolve(&path))?;
            let report = import_departments_cells(store, &text)?;
            self.finish_import("import departments", report, &mut outcome);
        }

        if let Some(path) = self.config.import.prisoners.clone() {
            let text = fs::read_to_string(self.resolve(&path))?;
            let report = import_prisoners_mails(store, &text)?;
            self.finish_import("import prisoners", report, &mut outcome);
        }

        if let Some(path) = self.config.import.officers.clone() {
            let text = fs::read_to_string(self.resolve(&path))?;
            let report = import_officers_prisoners_with(store, &text, &options)?;
            self.finish_import("import officers", report, &mut outcome);
        }

        for export in self.config.export.clone() {
            let step = self.run_export(store, &export)?;
            self.monitor.record(&step.step);
            outcome.steps.push(step);
        }

        self.monitor.log_final_stats();
        tracing::info!(
            "✅ Job '{}' finished with {} steps",
            self.config.job_name(),
            outcome.steps.len()
        );
        Ok(outcome)
    }

    fn finish_import(&mut self, step: &str, report: ImportReport, outcome: &mut JobOutcome) {
        tracing::info!(
            "{}: {} imported, {} rejected",
            step,
            report.imported_count(),
            report.rejected_count()
        );
        self.monitor.record(step);
        outcome.steps.push(StepOutcome {
            step: step.to_string(),
            detail: StepDetail::Imported(report),
        });
    }

    fn run_export<S: Store + ?Sized>(&self, store: &S, export: &ExportConfig) -> Result<StepOutcome> {
        let document = match export.kind {
            ExportKind::ByCells => export_prisoners_by_cells(store, &export.ids)?,
            ExportKind::Inbox => {
                export_prisoners_inbox(store, export.names.as_deref().unwrap_or_default())?
            }
        };

        let detail = match &export.output {
            Some(output) => {
                let path = self.resolve(output);
                if let Some(parent) = path.parent() {
                    fs::create_dir_all(parent)?;
                }
                fs::write(&path, document)?;
                tracing::info!("📁 Wrote {}", path.display());
                StepDetail::Written(path)
            }
            None => StepDetail::Document(document),
        };

        Ok(StepOutcome {
            step: export.display_name(),
            detail,
        })
    }
}
