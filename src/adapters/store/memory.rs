use crate::domain::{
    CommitSummary, Department, Officer, Prisoner, PrisonerDetails, Store, SupervisingOfficer,
};
use crate::utils::error::{JailError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// All committed collections; also the on-disk format of the file store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub departments: Vec<Department>,
    #[serde(default)]
    pub prisoners: Vec<Prisoner>,
    #[serde(default)]
    pub officers: Vec<Officer>,
}

impl Snapshot {
    fn is_empty(&self) -> bool {
        self.departments.is_empty() && self.prisoners.is_empty() && self.officers.is_empty()
    }
}

#[derive(Debug, Default)]
pub struct InMemoryStore {
    committed: Snapshot,
    staged: Snapshot,
}

fn next_id(ids: impl Iterator<Item = i32>) -> i32 {
    ids.max().unwrap_or(0) + 1
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        Self {
            committed: snapshot,
            staged: Snapshot::default(),
        }
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.committed
    }

    pub fn has_staged(&self) -> bool {
        !self.staged.is_empty()
    }

    /// Assigns ids and checks references for a staged batch without touching
    /// committed state.
    fn prepare(&self, mut batch: Snapshot) -> Result<(Snapshot, CommitSummary)> {
        let mut summary = CommitSummary::default();
        let committed = &self.committed;

        let mut department_id = next_id(committed.departments.iter().map(|d| d.id));
        let mut cell_id = next_id(
            committed
                .departments
                .iter()
                .flat_map(|d| d.cells.iter().map(|c| c.id)),
        );
        for department in &mut batch.departments {
            department.id = department_id;
            department_id += 1;
            for cell in &mut department.cells {
                cell.id = cell_id;
                cell.department_id = department.id;
                cell_id += 1;
                summary.cells += 1;
            }
            summary.departments += 1;
        }

        let known_cells: HashSet<i32> = committed
            .departments
            .iter()
            .chain(batch.departments.iter())
            .flat_map(|d| d.cells.iter().map(|c| c.id))
            .collect();

        let mut prisoner_id = next_id(committed.prisoners.iter().map(|p| p.id));
        let mut mail_id = next_id(
            committed
                .prisoners
                .iter()
                .flat_map(|p| p.mails.iter().map(|m| m.id)),
        );
        for prisoner in &mut batch.prisoners {
            if let Some(cell) = prisoner.cell_id {
                if !known_cells.contains(&cell) {
                    return Err(JailError::persistence(format!(
                        "prisoner '{}' references unknown cell {}",
                        prisoner.full_name, cell
                    )));
                }
            }
            prisoner.id = prisoner_id;
            prisoner_id += 1;
            for mail in &mut prisoner.mails {
                mail.id = mail_id;
                mail.prisoner_id = prisoner.id;
                mail_id += 1;
                summary.mails += 1;
            }
            summary.prisoners += 1;
        }

        let known_departments: HashSet<i32> = committed
            .departments
            .iter()
            .chain(batch.departments.iter())
            .map(|d| d.id)
            .collect();
        let known_prisoners: HashSet<i32> = committed
            .prisoners
            .iter()
            .chain(batch.prisoners.iter())
            .map(|p| p.id)
            .collect();

        let mut officer_id = next_id(committed.officers.iter().map(|o| o.id));
        for officer in &mut batch.officers {
            if !known_departments.contains(&officer.department_id) {
                return Err(JailError::persistence(format!(
                    "officer '{}' references unknown department {}",
                    officer.full_name, officer.department_id
                )));
            }
            officer.id = officer_id;
            officer_id += 1;

            let mut linked = HashSet::new();
            for link in &mut officer.prisoners {
                if !known_prisoners.contains(&link.prisoner_id) {
                    return Err(JailError::persistence(format!(
                        "officer '{}' references unknown prisoner {}",
                        officer.full_name, link.prisoner_id
                    )));
                }
                if !linked.insert(link.prisoner_id) {
                    return Err(JailError::persistence(format!(
                        "officer '{}' links prisoner {} more than once",
                        officer.full_name, link.prisoner_id
                    )));
                }
                link.officer_id = officer.id;
                summary.links += 1;
            }
            summary.officers += 1;
        }

        Ok((batch, summary))
    }
}

impl Store for InMemoryStore {
    fn add_departments(&mut self, departments: Vec<Department>) {
        self.staged.departments.extend(departments);
    }

    fn add_prisoners(&mut self, prisoners: Vec<Prisoner>) {
        self.staged.prisoners.extend(prisoners);
    }

    fn add_officers(&mut self, officers: Vec<Officer>) {
        self.staged.officers.extend(officers);
    }

    fn commit(&mut self) -> Result<CommitSummary> {
        // A failed commit drops the staged batch.
        let batch = std::mem::take(&mut self.staged);
        let (batch, summary) = self.prepare(batch)?;

        self.committed.departments.extend(batch.departments);
        self.committed.prisoners.extend(batch.prisoners);
        self.committed.officers.extend(batch.officers);

        tracing::debug!("Committed batch: {:?}", summary);
        Ok(summary)
    }

    fn departments(&self) -> &[Department] {
        &self.committed.departments
    }

    fn prisoners(&self) -> &[Prisoner] {
        &self.committed.prisoners
    }

    fn officers(&self) -> &[Officer] {
        &self.committed.officers
    }

    fn prisoners_matching<'a>(
        &'a self,
        predicate: &dyn Fn(&Prisoner) -> bool,
    ) -> Result<Vec<PrisonerDetails<'a>>> {
        let departments: HashMap<i32, &Department> = self
            .committed
            .departments
            .iter()
            .map(|d| (d.id, d))
            .collect();
        let cells: HashMap<i32, _> = self
            .committed
            .departments
            .iter()
            .flat_map(|d| d.cells.iter().map(|c| (c.id, c)))
            .collect();

        let mut supervisors: HashMap<i32, Vec<SupervisingOfficer<'a>>> = HashMap::new();
        for officer in &self.committed.officers {
            for link in &officer.prisoners {
                supervisors
                    .entry(link.prisoner_id)
                    .or_default()
                    .push(SupervisingOfficer {
                        officer,
                        department: departments.get(&officer.department_id).copied(),
                    });
            }
        }

        Ok(self
            .committed
            .prisoners
            .iter()
            .filter(|p| predicate(p))
            .map(|prisoner| PrisonerDetails {
                prisoner,
                cell: prisoner.cell_id.and_then(|id| cells.get(&id).copied()),
                officers: supervisors.remove(&prisoner.id).unwrap_or_default(),
            })
            .collect())
    }
}
