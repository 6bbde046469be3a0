//! Decoded input records, before they become domain entities, and the field
//! constraints each one must satisfy.

use crate::domain::{Cell, Department, Mail, Money, OfficerPrisoner};
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_length, validate_non_empty_string, validate_range, Validate, Validation, Violation,
};
use serde::Deserialize;

pub const DEPARTMENT_NAME_LENGTH: (usize, usize) = (3, 25);
pub const CELL_NUMBER_RANGE: (i32, i32) = (1, 1000);
pub const PRISONER_NAME_LENGTH: (usize, usize) = (3, 20);
pub const PRISONER_AGE_RANGE: (i32, i32) = (18, 65);
pub const OFFICER_NAME_LENGTH: (usize, usize) = (3, 30);

fn validate_non_negative(field_name: &str, amount: Money) -> std::result::Result<(), Violation> {
    if amount.is_negative() {
        return Err(Violation::new(
            field_name,
            format!("amount {} cannot be negative", amount),
        ));
    }
    Ok(())
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DepartmentRecord {
    pub name: Option<String>,
    #[serde(default)]
    pub cells: Vec<CellRecord>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CellRecord {
    pub cell_number: Option<i32>,
    #[serde(default)]
    pub has_window: bool,
}

impl Validate for DepartmentRecord {
    fn validate(&self) -> Validation {
        let mut validation = Validation::new();
        if let Some(name) = validation.require("Name", &self.name) {
            let (min, max) = DEPARTMENT_NAME_LENGTH;
            validation.check(validate_length("Name", name, min, max));
        }
        if self.cells.is_empty() {
            validation.check(Err(Violation::new("Cells", "at least one cell is required")));
        }
        for (index, cell) in self.cells.iter().enumerate() {
            validation.nested("Cells", index, cell.validate());
        }
        validation
    }
}

impl Validate for CellRecord {
    fn validate(&self) -> Validation {
        let mut validation = Validation::new();
        if let Some(&number) = validation.require("CellNumber", &self.cell_number) {
            let (min, max) = CELL_NUMBER_RANGE;
            validation.check(validate_range("CellNumber", number, min, max));
        }
        validation
    }
}

impl DepartmentRecord {
    /// Builds the entity; cells keep their input order.
    pub fn into_department(self) -> Department {
        Department {
            id: 0,
            name: self.name.unwrap_or_default(),
            cells: self
                .cells
                .into_iter()
                .map(|cell| Cell {
                    id: 0,
                    department_id: 0,
                    cell_number: cell.cell_number.unwrap_or_default(),
                    has_window: cell.has_window,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PrisonerRecord {
    pub full_name: Option<String>,
    pub nickname: Option<String>,
    pub age: Option<i32>,
    pub bail: Option<Money>,
    pub cell_id: Option<i32>,
    pub release_date: Option<String>,
    pub incarceration_date: Option<String>,
    #[serde(default)]
    pub mails: Vec<MailRecord>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MailRecord {
    pub description: Option<String>,
    pub sender: Option<String>,
    pub address: Option<String>,
}

impl Validate for PrisonerRecord {
    fn validate(&self) -> Validation {
        let mut validation = Validation::new();
        if let Some(name) = validation.require("FullName", &self.full_name) {
            let (min, max) = PRISONER_NAME_LENGTH;
            validation.check(validate_length("FullName", name, min, max));
        }
        if let Some(&age) = validation.require("Age", &self.age) {
            let (min, max) = PRISONER_AGE_RANGE;
            validation.check(validate_range("Age", age, min, max));
        }
        if let Some(bail) = self.bail {
            validation.check(validate_non_negative("Bail", bail));
        }
        if let Some(date) = validation.require("IncarcerationDate", &self.incarceration_date) {
            validation.check(validate_non_empty_string("IncarcerationDate", date));
        }
        for (index, mail) in self.mails.iter().enumerate() {
            validation.nested("Mails", index, mail.validate());
        }
        validation
    }
}

impl Validate for MailRecord {
    fn validate(&self) -> Validation {
        let mut validation = Validation::new();
        for (field, value) in [
            ("Description", &self.description),
            ("Sender", &self.sender),
            ("Address", &self.address),
        ] {
            if let Some(text) = validation.require(field, value) {
                validation.check(validate_non_empty_string(field, text));
            }
        }
        validation
    }
}

impl MailRecord {
    pub fn into_mail(self) -> Mail {
        Mail {
            id: 0,
            prisoner_id: 0,
            description: self.description.unwrap_or_default(),
            sender: self.sender.unwrap_or_default(),
            address: self.address.unwrap_or_default(),
        }
    }
}

/// `<Officer>` element exactly as it appears in the import document.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OfficerElement {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub money: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub weapon: Option<String>,
    #[serde(default)]
    pub department_id: Option<i32>,
    #[serde(default)]
    pub prisoners: PrisonerRefs,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PrisonerRefs {
    #[serde(rename = "Prisoner", default)]
    pub items: Vec<PrisonerRef>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PrisonerRef {
    #[serde(rename = "@id")]
    pub id: i32,
}

/// Officer record with its salary text already parsed.
#[derive(Debug, Clone)]
pub struct OfficerRecord {
    pub name: Option<String>,
    pub salary: Option<Money>,
    pub position: Option<String>,
    pub weapon: Option<String>,
    pub department_id: Option<i32>,
    pub prisoner_ids: Vec<i32>,
}

impl TryFrom<OfficerElement> for OfficerRecord {
    type Error = crate::utils::error::JailError;

    fn try_from(element: OfficerElement) -> Result<Self> {
        // Unparseable amounts are a document format error, not a rejection.
        let salary = element
            .money
            .as_deref()
            .map(str::parse::<Money>)
            .transpose()?;

        Ok(Self {
            name: element.name,
            salary,
            position: element.position,
            weapon: element.weapon,
            department_id: element.department_id,
            prisoner_ids: element.prisoners.items.iter().map(|p| p.id).collect(),
        })
    }
}

impl Validate for OfficerRecord {
    fn validate(&self) -> Validation {
        let mut validation = Validation::new();
        if let Some(name) = validation.require("Name", &self.name) {
            let (min, max) = OFFICER_NAME_LENGTH;
            validation.check(validate_length("Name", name, min, max));
        }
        if let Some(&salary) = validation.require("Money", &self.salary) {
            validation.check(validate_non_negative("Money", salary));
        }
        validation.require("DepartmentId", &self.department_id);
        for (field, value) in [("Position", &self.position), ("Weapon", &self.weapon)] {
            if let Some(token) = validation.require(field, value) {
                validation.check(validate_non_empty_string(field, token));
            }
        }
        validation
    }
}

impl OfficerRecord {
    pub fn links(&self) -> Vec<OfficerPrisoner> {
        self.prisoner_ids
            .iter()
            .map(|&prisoner_id| OfficerPrisoner {
                officer_id: 0,
                prisoner_id,
            })
            .collect()
    }
}
