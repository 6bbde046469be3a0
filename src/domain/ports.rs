use crate::domain::model::{Cell, Department, Officer, Prisoner};
use crate::utils::error::Result;

/// An officer attached to a prisoner, with the officer's department resolved.
#[derive(Debug, Clone, Copy)]
pub struct SupervisingOfficer<'a> {
    pub officer: &'a Officer,
    pub department: Option<&'a Department>,
}

/// A committed prisoner together with the relationships exports traverse.
#[derive(Debug, Clone)]
pub struct PrisonerDetails<'a> {
    pub prisoner: &'a Prisoner,
    pub cell: Option<&'a Cell>,
    pub officers: Vec<SupervisingOfficer<'a>>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommitSummary {
    pub departments: usize,
    pub cells: usize,
    pub prisoners: usize,
    pub mails: usize,
    pub officers: usize,
    pub links: usize,
}

impl CommitSummary {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Persistence collaborator. `add_*` stage a batch; nothing is visible to
/// reads until `commit` succeeds.
pub trait Store {
    fn add_departments(&mut self, departments: Vec<Department>);
    fn add_prisoners(&mut self, prisoners: Vec<Prisoner>);
    fn add_officers(&mut self, officers: Vec<Officer>);

    /// Persists everything staged since the last commit, all or nothing.
    fn commit(&mut self) -> Result<CommitSummary>;

    fn departments(&self) -> &[Department];
    fn prisoners(&self) -> &[Prisoner];
    fn officers(&self) -> &[Officer];

    fn prisoners_matching<'a>(
        &'a self,
        predicate: &dyn Fn(&Prisoner) -> bool,
    ) -> Result<Vec<PrisonerDetails<'a>>>;
}
