pub mod export;
pub mod import;
pub mod jobs;
pub mod projections;
pub mod records;
pub mod report;

pub use export::{
    export_prisoners_by_cells, export_prisoners_inbox, project_prisoners_by_cells,
    project_prisoners_inbox,
};
pub use import::{
    import_departments_cells, import_officers_prisoners, import_officers_prisoners_with,
    import_prisoners_mails, ImportOptions, UnknownTokenPolicy,
};
pub use jobs::{JobOutcome, JobRunner, StepDetail, StepOutcome};
pub use report::ImportReport;
