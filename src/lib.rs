pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::store::{InMemoryStore, JsonFileStore};
pub use config::JobsConfig;
pub use core::{
    export_prisoners_by_cells, export_prisoners_inbox, import_departments_cells,
    import_officers_prisoners, import_officers_prisoners_with, import_prisoners_mails,
    ImportOptions, ImportReport, JobRunner, UnknownTokenPolicy,
};
pub use domain::Store;
pub use utils::error::{JailError, Result};
