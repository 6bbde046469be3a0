//! Validation-gated import: decode a batch, accept or reject each record,
//! commit the accepted entities once, report one line per record.

use crate::adapters::codec::{json, xml};
use crate::core::records::{
    DepartmentRecord, OfficerElement, OfficerRecord, PrisonerRecord,
};
use crate::core::report::ImportReport;
use crate::domain::{Officer, Position, Prisoner, Store, Weapon};
use crate::utils::error::{JailError, Result};
use crate::utils::validation::{Validate, Validation};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const DATE_FORMAT: &str = "%d/%m/%Y";
pub const OFFICERS_ROOT: &str = "Officers";

/// What to do with an officer whose position or weapon token is not a known
/// variant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum UnknownTokenPolicy {
    /// Fail the whole call; nothing is committed.
    #[default]
    Abort,
    /// Treat the record as invalid and continue with the next one.
    Reject,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ImportOptions {
    pub unknown_token: UnknownTokenPolicy,
}

fn reject(report: &mut ImportReport, kind: &str, index: usize, validation: &Validation) {
    tracing::debug!(
        "Rejected {} record #{}: {}",
        kind,
        index,
        validation.summary()
    );
    report.rejected();
}

/// Exactly `dd/mm/yyyy`: zero-padded day and month, four-digit year, no
/// surrounding whitespace.
fn has_date_layout(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            2 | 5 => *b == b'/',
            _ => b.is_ascii_digit(),
        })
}

pub fn parse_date(field: &str, value: &str) -> Result<NaiveDate> {
    let invalid = || JailError::InvalidDate {
        field: field.to_string(),
        value: value.to_string(),
    };
    if !has_date_layout(value) {
        return Err(invalid());
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| invalid())
}

pub fn import_departments_cells<S: Store + ?Sized>(store: &mut S, json_text: &str) -> Result<ImportReport> {
    let records: Vec<DepartmentRecord> = json::decode_records(json_text)?;
    tracing::debug!("Decoded {} department records", records.len());

    let mut report = ImportReport::new();
    let mut accepted = Vec::new();

    for (index, record) in records.into_iter().enumerate() {
        let validation = record.validate();
        if !validation.is_valid() {
            reject(&mut report, "department", index, &validation);
            continue;
        }

        let department = record.into_department();
        report.imported(format!(
            "Imported {} with {} cells",
            department.name,
            department.cells.len()
        ));
        accepted.push(department);
    }

    store.add_departments(accepted);
    let summary = store.commit()?;

    tracing::info!(
        "Imported {} departments ({} cells), rejected {}",
        summary.departments,
        summary.cells,
        report.rejected_count()
    );
    Ok(report)
}

pub fn import_prisoners_mails<S: Store + ?Sized>(store: &mut S, json_text: &str) -> Result<ImportReport> {
    let records: Vec<PrisonerRecord> = json::decode_records(json_text)?;
    tracing::debug!("Decoded {} prisoner records", records.len());

    let mut report = ImportReport::new();
    let mut accepted = Vec::new();

    for (index, record) in records.into_iter().enumerate() {
        let validation = record.validate();
        if !validation.is_valid() {
            reject(&mut report, "prisoner", index, &validation);
            continue;
        }

        let incarceration_date = parse_date(
            "IncarcerationDate",
            record.incarceration_date.as_deref().unwrap_or_default(),
        )?;

        // 釋放日期解析失敗時留空，不影響匯入
        let release_date = record.release_date.as_deref().and_then(|text| {
            let parsed = parse_date("ReleaseDate", text).ok();
            if parsed.is_none() {
                tracing::warn!("Ignoring unparseable release date '{}' on record #{}", text, index);
            }
            parsed
        });

        let prisoner = Prisoner {
            id: 0,
            full_name: record.full_name.unwrap_or_default(),
            nickname: record.nickname,
            age: record.age.unwrap_or_default(),
            bail: record.bail,
            cell_id: record.cell_id,
            incarceration_date,
            release_date,
            mails: record.mails.into_iter().map(|mail| mail.into_mail()).collect(),
        };

        report.imported(format!(
            "Imported {} {} years old",
            prisoner.full_name, prisoner.age
        ));
        accepted.push(prisoner);
    }

    store.add_prisoners(accepted);
    let summary = store.commit()?;

    tracing::info!(
        "Imported {} prisoners ({} mails), rejected {}",
        summary.prisoners,
        summary.mails,
        report.rejected_count()
    );
    Ok(report)
}

pub fn import_officers_prisoners<S: Store + ?Sized>(store: &mut S, xml_text: &str) -> Result<ImportReport> {
    import_officers_prisoners_with(store, xml_text, &ImportOptions::default())
}

fn parse_tokens(record: &OfficerRecord) -> Result<(Position, Weapon)> {
    let position = record.position.as_deref().unwrap_or_default().parse()?;
    let weapon = record.weapon.as_deref().unwrap_or_default().parse()?;
    Ok((position, weapon))
}

pub fn import_officers_prisoners_with<S: Store + ?Sized>(
    store: &mut S,
    xml_text: &str,
    options: &ImportOptions,
) -> Result<ImportReport> {
    let elements: Vec<OfficerElement> = xml::decode_records(xml_text, OFFICERS_ROOT)?;
    let records = elements
        .into_iter()
        .map(OfficerRecord::try_from)
        .collect::<Result<Vec<_>>>()?;
    tracing::debug!("Decoded {} officer records", records.len());

    let mut report = ImportReport::new();
    let mut accepted = Vec::new();

    for (index, record) in records.into_iter().enumerate() {
        let validation = record.validate();
        if !validation.is_valid() {
            reject(&mut report, "officer", index, &validation);
            continue;
        }

        let (position, weapon) = match parse_tokens(&record) {
            Ok(tokens) => tokens,
            Err(err) if options.unknown_token == UnknownTokenPolicy::Reject => {
                tracing::debug!("Rejected officer record #{}: {}", index, err);
                report.rejected();
                continue;
            }
            Err(err) => return Err(err),
        };

        let officer = Officer {
            id: 0,
            prisoners: record.links(),
            full_name: record.name.unwrap_or_default(),
            salary: record.salary.unwrap_or_default(),
            department_id: record.department_id.unwrap_or_default(),
            position,
            weapon,
        };

        report.imported(format!(
            "Imported {} ({} prisoners)",
            officer.full_name,
            officer.prisoners.len()
        ));
        accepted.push(officer);
    }

    store.add_officers(accepted);
    let summary = store.commit()?;

    tracing::info!(
        "Imported {} officers ({} prisoner links), rejected {}",
        summary.officers,
        summary.links,
        report.rejected_count()
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::store::InMemoryStore;
    use crate::domain::Money;

    const DEPARTMENTS: &str = r#"[
        {"Name":"Alpha","Cells":[{"CellNumber":1,"HasWindow":true},{"CellNumber":2,"HasWindow":false}]},
        {"Name":"Empty","Cells":[]},
        {"Name":"Beta","Cells":[{"CellNumber":5,"HasWindow":false},{"CellNumber":0,"HasWindow":true}]},
        {"Name":"Gamma","Cells":[{"CellNumber":9,"HasWindow":false}]}
    ]"#;

    fn seeded_store() -> InMemoryStore {
        let mut store = InMemoryStore::new();
        import_departments_cells(&mut store, DEPARTMENTS).unwrap();
        import_prisoners_mails(
            &mut store,
            r#"[
                {"FullName":"Bob Stone","Age":30,"CellId":1,"IncarcerationDate":"01/02/2010","Mails":[]},
                {"FullName":"Alice Rock","Age":40,"CellId":2,"IncarcerationDate":"03/04/2011","Mails":[]}
            ]"#,
        )
        .unwrap();
        store
    }

    fn officer_xml(position: &str, weapon: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="utf-8"?>
<Officers>
  <Officer>
    <Name>Paddy Weiner</Name>
    <Money>5618.91</Money>
    <Position>{}</Position>
    <Weapon>{}</Weapon>
    <DepartmentId>1</DepartmentId>
    <Prisoners>
      <Prisoner id="2" />
      <Prisoner id="1" />
    </Prisoners>
  </Officer>
  <Officer>
    <Name>Ed</Name>
    <Money>100</Money>
    <Position>Guard</Position>
    <Weapon>Knife</Weapon>
    <DepartmentId>1</DepartmentId>
    <Prisoners />
  </Officer>
</Officers>"#,
            position, weapon
        )
    }

    #[test]
    fn test_departments_report_one_line_per_record() {
        let mut store = InMemoryStore::new();
        let report = import_departments_cells(&mut store, DEPARTMENTS).unwrap();

        assert_eq!(
            report.lines(),
            &[
                "Imported Alpha with 2 cells",
                "Invalid Data",
                "Invalid Data",
                "Imported Gamma with 1 cells"
            ]
        );
        assert_eq!(store.departments().len(), 2);
        assert_eq!(store.departments()[1].name, "Gamma");
    }

    #[test]
    fn test_department_with_empty_cells_is_not_persisted() {
        let mut store = InMemoryStore::new();
        let report =
            import_departments_cells(&mut store, r#"[{"Name":"Alpha","Cells":[]}]"#).unwrap();
        assert_eq!(report.to_string(), "Invalid Data");
        assert!(store.departments().is_empty());
    }

    #[test]
    fn test_malformed_json_is_fatal() {
        let mut store = InMemoryStore::new();
        let err = import_departments_cells(&mut store, r#"[{"Name":"Alpha","#).unwrap_err();
        assert!(matches!(err, JailError::Json(_)));
    }

    #[test]
    fn test_prisoner_release_date_is_lenient() {
        let mut store = seeded_store();
        let report = import_prisoners_mails(
            &mut store,
            r#"[
                {"FullName":"Carl Moss","Age":22,"CellId":3,"IncarcerationDate":"05/06/2015","ReleaseDate":"not a date",
                 "Mails":[{"Description":"Hello","Sender":"Mom","Address":"12 Elm str."}]},
                {"FullName":"Dana Wood","Age":23,"IncarcerationDate":"05/06/2015","ReleaseDate":"07/08/2020"}
            ]"#,
        )
        .unwrap();

        assert_eq!(
            report.lines(),
            &["Imported Carl Moss 22 years old", "Imported Dana Wood 23 years old"]
        );
        let carl = &store.prisoners()[2];
        assert!(carl.release_date.is_none());
        assert_eq!(carl.incarceration_date, NaiveDate::from_ymd_opt(2015, 6, 5).unwrap());
        assert_eq!(carl.mails.len(), 1);
        assert_eq!(
            store.prisoners()[3].release_date,
            NaiveDate::from_ymd_opt(2020, 8, 7)
        );
    }

    #[test]
    fn test_parse_date_requires_exact_layout() {
        assert_eq!(
            parse_date("IncarcerationDate", "01/02/2010").unwrap(),
            NaiveDate::from_ymd_opt(2010, 2, 1).unwrap()
        );
        for text in ["1/2/2010", "01/2/2010", " 01/02/2010", "01/02/2010 ", "01/02/10", "31/02/2010"] {
            assert!(
                matches!(parse_date("IncarcerationDate", text), Err(JailError::InvalidDate { .. })),
                "accepted {:?}",
                text
            );
        }
    }

    #[test]
    fn test_unpadded_incarceration_date_aborts_call() {
        let mut store = seeded_store();
        let before = store.prisoners().len();
        let err = import_prisoners_mails(
            &mut store,
            r#"[{"FullName":"Pad Less","Age":30,"IncarcerationDate":"1/2/2010"}]"#,
        )
        .unwrap_err();

        assert!(matches!(err, JailError::InvalidDate { .. }));
        assert_eq!(store.prisoners().len(), before);
    }

    #[test]
    fn test_bail_with_long_fraction_is_rounded() {
        let mut store = seeded_store();
        let report = import_prisoners_mails(
            &mut store,
            r#"[
                {"FullName":"Good One","Age":30,"IncarcerationDate":"01/02/2010"},
                {"FullName":"Odd Bail","Age":31,"Bail":12.34567,"IncarcerationDate":"01/02/2010"}
            ]"#,
        )
        .unwrap();

        assert_eq!(
            report.lines(),
            &["Imported Good One 30 years old", "Imported Odd Bail 31 years old"]
        );
        let odd = store.prisoners().last().unwrap();
        assert_eq!(odd.bail, Some(Money::from_ten_thousandths(123_457)));
    }

    #[test]
    fn test_prisoner_bad_incarceration_date_aborts_call() {
        let mut store = InMemoryStore::new();
        let err = import_prisoners_mails(
            &mut store,
            r#"[
                {"FullName":"Carl Moss","Age":22,"IncarcerationDate":"05/06/2015"},
                {"FullName":"Dana Wood","Age":23,"IncarcerationDate":"2015-06-05"}
            ]"#,
        )
        .unwrap_err();

        assert!(matches!(err, JailError::InvalidDate { .. }));
        assert!(store.prisoners().is_empty());
    }

    #[test]
    fn test_rejected_prisoner_skips_date_parsing() {
        let mut store = InMemoryStore::new();
        let report = import_prisoners_mails(
            &mut store,
            r#"[{"FullName":"Dana Wood","Age":12,"IncarcerationDate":"garbage"}]"#,
        )
        .unwrap();
        assert_eq!(report.to_string(), "Invalid Data");
    }

    #[test]
    fn test_officers_import_links_prisoners() {
        let mut store = seeded_store();
        let report = import_officers_prisoners(&mut store, &officer_xml("Guard", "Sniper")).unwrap();

        assert_eq!(
            report.lines(),
            &["Imported Paddy Weiner (2 prisoners)", "Invalid Data"]
        );
        let officer = &store.officers()[0];
        assert_eq!(officer.position, Position::Guard);
        assert_eq!(officer.weapon, Weapon::Sniper);
        let linked: Vec<i32> = officer.prisoners.iter().map(|l| l.prisoner_id).collect();
        assert_eq!(linked, vec![2, 1]);
        assert!(officer.prisoners.iter().all(|l| l.officer_id == officer.id));
    }

    #[test]
    fn test_unknown_token_aborts_by_default() {
        let mut store = seeded_store();
        let err = import_officers_prisoners(&mut store, &officer_xml("Janitor", "Sniper")).unwrap_err();
        assert!(matches!(err, JailError::UnknownToken { ref token, .. } if token == "Janitor"));
        assert!(store.officers().is_empty());
    }

    #[test]
    fn test_unknown_token_rejects_record_when_configured() {
        let mut store = seeded_store();
        let options = ImportOptions {
            unknown_token: UnknownTokenPolicy::Reject,
        };
        let report =
            import_officers_prisoners_with(&mut store, &officer_xml("Guard", "Bazooka"), &options)
                .unwrap();
        assert_eq!(report.lines(), &["Invalid Data", "Invalid Data"]);
        assert!(store.officers().is_empty());
    }

    #[test]
    fn test_officer_for_unknown_department_fails_commit() {
        let mut store = InMemoryStore::new();
        let err = import_officers_prisoners(
            &mut store,
            r#"<Officers><Officer><Name>Lone Ranger</Name><Money>10</Money><Position>Guard</Position>
               <Weapon>Knife</Weapon><DepartmentId>3</DepartmentId><Prisoners/></Officer></Officers>"#,
        )
        .unwrap_err();
        assert!(matches!(err, JailError::Persistence { .. }));
    }

    #[test]
    fn test_officers_wrong_root_is_fatal() {
        let mut store = InMemoryStore::new();
        let err = import_officers_prisoners(&mut store, "<Guards></Guards>").unwrap_err();
        assert!(matches!(err, JailError::UnexpectedRoot { .. }));
    }
}
