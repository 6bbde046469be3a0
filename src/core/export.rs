//! Filtered-projection export: one store query, a projection per matched
//! prisoner, sorted by name then id, encoded as JSON or XML.

use crate::adapters::codec::{json, xml};
use crate::core::projections::{
    EncryptedMessages, MessageView, OfficerView, PrisonerCellView, PrisonerInboxView,
};
use crate::domain::{Money, PrisonerDetails, RoundingMode, Store};
use crate::utils::error::{JailError, Result};
use std::collections::HashSet;

pub const INBOX_ROOT: &str = "Prisoners";
pub const INBOX_ITEM: &str = "Prisoner";
pub const SALARY_ROUNDING: RoundingMode = RoundingMode::HalfAwayFromZero;

/// Placeholder obfuscation: the text with its characters in reverse order.
pub fn reverse_text(text: &str) -> String {
    text.chars().rev().collect()
}

/// Splits a comma-separated name list, trimming segments and dropping empty ones.
pub fn parse_name_list(names: &str) -> Vec<String> {
    names
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

fn project_cell_view(details: &PrisonerDetails<'_>) -> Result<PrisonerCellView> {
    let mut officers: Vec<OfficerView> = details
        .officers
        .iter()
        .map(|supervisor| OfficerView {
            officer_name: supervisor.officer.full_name.clone(),
            department: supervisor
                .department
                .map(|d| d.name.clone())
                .unwrap_or_default(),
        })
        .collect();
    officers.sort_by(|a, b| a.officer_name.cmp(&b.officer_name));

    let total = Money::checked_sum(details.officers.iter().map(|s| s.officer.salary))
        .ok_or_else(|| JailError::InvalidMoney {
            value: format!(
                "total officer salary of prisoner {} is out of range",
                details.prisoner.id
            ),
        })?;

    Ok(PrisonerCellView {
        id: details.prisoner.id,
        name: details.prisoner.full_name.clone(),
        cell_number: details.cell.map(|c| c.cell_number),
        officers,
        total_officer_salary: total.round_to_cents(SALARY_ROUNDING),
    })
}

fn project_inbox_view(details: &PrisonerDetails<'_>) -> PrisonerInboxView {
    let prisoner = details.prisoner;
    PrisonerInboxView {
        id: prisoner.id,
        name: prisoner.full_name.clone(),
        incarceration_date: prisoner.incarceration_date.format("%Y-%m-%d").to_string(),
        encrypted_messages: EncryptedMessages {
            messages: prisoner
                .mails
                .iter()
                .map(|mail| MessageView {
                    description: reverse_text(&mail.description),
                })
                .collect(),
        },
    }
}

pub fn project_prisoners_by_cells<S: Store + ?Sized>(
    store: &S,
    ids: &[i32],
) -> Result<Vec<PrisonerCellView>> {
    let wanted: HashSet<i32> = ids.iter().copied().collect();
    let matched = store.prisoners_matching(&|p| wanted.contains(&p.id))?;

    let mut views = matched
        .iter()
        .map(project_cell_view)
        .collect::<Result<Vec<_>>>()?;
    views.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
    Ok(views)
}

pub fn project_prisoners_inbox<S: Store + ?Sized>(
    store: &S,
    names: &str,
) -> Result<Vec<PrisonerInboxView>> {
    let names = parse_name_list(names);
    let wanted: HashSet<&str> = names.iter().map(String::as_str).collect();
    let matched = store.prisoners_matching(&|p| wanted.contains(p.full_name.as_str()))?;

    let mut views: Vec<PrisonerInboxView> = matched.iter().map(project_inbox_view).collect();
    views.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
    Ok(views)
}

pub fn export_prisoners_by_cells<S: Store + ?Sized>(store: &S, ids: &[i32]) -> Result<String> {
    let views = project_prisoners_by_cells(store, ids)?;
    tracing::info!("Exported {} prisoners by cells", views.len());
    json::encode_pretty(&views)
}

pub fn export_prisoners_inbox<S: Store + ?Sized>(store: &S, names: &str) -> Result<String> {
    let views = project_prisoners_inbox(store, names)?;
    tracing::info!("Exported inbox for {} prisoners", views.len());
    xml::encode_records(&views, INBOX_ROOT, INBOX_ITEM)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::store::InMemoryStore;
    use crate::core::import::{
        import_departments_cells, import_officers_prisoners, import_prisoners_mails,
    };

    fn populated_store() -> InMemoryStore {
        let mut store = InMemoryStore::new();
        import_departments_cells(
            &mut store,
            r#"[{"Name":"Alpha","Cells":[{"CellNumber":101,"HasWindow":true},{"CellNumber":102}]},
                {"Name":"Beta","Cells":[{"CellNumber":201}]}]"#,
        )
        .unwrap();
        import_prisoners_mails(
            &mut store,
            r#"[
                {"FullName":"Bob","Age":30,"CellId":1,"IncarcerationDate":"01/02/2010",
                 "Mails":[{"Description":"hello there","Sender":"Mom","Address":"1 Elm str."},
                          {"Description":"abc","Sender":"Dad","Address":"1 Elm str."}]},
                {"FullName":"Alice","Age":40,"CellId":3,"IncarcerationDate":"03/04/2011"},
                {"FullName":"Alice","Age":41,"IncarcerationDate":"09/09/2019"}
            ]"#,
        )
        .unwrap();
        import_officers_prisoners(
            &mut store,
            r#"<Officers>
                <Officer><Name>Zora Kent</Name><Money>1000.005</Money><Position>Guard</Position>
                  <Weapon>Knife</Weapon><DepartmentId>2</DepartmentId>
                  <Prisoners><Prisoner id="1"/></Prisoners></Officer>
                <Officer><Name>Adam Reed</Name><Money>2000.5</Money><Position>Overseer</Position>
                  <Weapon>Pistol</Weapon><DepartmentId>1</DepartmentId>
                  <Prisoners><Prisoner id="1"/><Prisoner id="2"/></Prisoners></Officer>
              </Officers>"#,
        )
        .unwrap();
        store
    }

    #[test]
    fn test_reverse_text_is_involutive() {
        for text in ["", "a", "hello there", "Ünïcødé ✓"] {
            assert_eq!(reverse_text(&reverse_text(text)), text);
        }
        assert_eq!(reverse_text("abc"), "cba");
    }

    #[test]
    fn test_parse_name_list_discards_empty_segments() {
        assert_eq!(
            parse_name_list(" Bob , ,Alice,, "),
            vec!["Bob".to_string(), "Alice".to_string()]
        );
        assert!(parse_name_list(" , ").is_empty());
    }

    #[test]
    fn test_by_cells_sorted_by_name_then_id() {
        let store = populated_store();
        let views = project_prisoners_by_cells(&store, &[1, 2, 3, 99]).unwrap();
        let order: Vec<(String, i32)> = views.iter().map(|v| (v.name.clone(), v.id)).collect();
        assert_eq!(
            order,
            vec![
                ("Alice".to_string(), 2),
                ("Alice".to_string(), 3),
                ("Bob".to_string(), 1)
            ]
        );
    }

    #[test]
    fn test_by_cells_officers_sorted_and_salary_rounded() {
        let store = populated_store();
        let views = project_prisoners_by_cells(&store, &[1]).unwrap();
        let bob = &views[0];

        assert_eq!(bob.cell_number, Some(101));
        let names: Vec<&str> = bob.officers.iter().map(|o| o.officer_name.as_str()).collect();
        assert_eq!(names, vec!["Adam Reed", "Zora Kent"]);
        assert_eq!(bob.officers[0].department, "Alpha");
        assert_eq!(bob.officers[1].department, "Beta");
        // 1000.005 + 2000.5 = 3000.505
        assert_eq!(bob.total_officer_salary.to_string(), "3000.51");
    }

    #[test]
    fn test_by_cells_json_shape() {
        let store = populated_store();
        let text = export_prisoners_by_cells(&store, &[2, 3]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();

        assert_eq!(value[0]["Id"], 2);
        assert_eq!(value[0]["Name"], "Alice");
        assert_eq!(value[0]["CellNumber"], 201);
        assert_eq!(value[0]["Officers"][0]["OfficerName"], "Adam Reed");
        assert_eq!(value[0]["TotalOfficerSalary"], serde_json::json!(2000.5));
        assert!(value[1]["CellNumber"].is_null());
        assert!(value[1]["Officers"].as_array().unwrap().is_empty());
        assert!(text.contains("\"TotalOfficerSalary\": 0.00"));
    }

    #[test]
    fn test_inbox_reverses_descriptions() {
        let store = populated_store();
        let views = project_prisoners_inbox(&store, "Bob").unwrap();
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].incarceration_date, "2010-02-01");
        let messages: Vec<&str> = views[0]
            .encrypted_messages
            .messages
            .iter()
            .map(|m| m.description.as_str())
            .collect();
        assert_eq!(messages, vec!["ereht olleh", "cba"]);
    }

    #[test]
    fn test_inbox_xml_document() {
        let store = populated_store();
        let text = export_prisoners_inbox(&store, "Bob, Alice ,Nobody").unwrap();

        assert!(text.starts_with("<?xml"));
        assert!(text.contains("<Prisoners>"));
        assert_eq!(text.matches("<Prisoner>").count(), 3);
        assert!(text.contains("<IncarcerationDate>2011-04-03</IncarcerationDate>"));
        assert!(text.contains("<Description>ereht olleh</Description>"));
        let alice = text.find("<Name>Alice</Name>").unwrap();
        let bob = text.find("<Name>Bob</Name>").unwrap();
        assert!(alice < bob);

        let flat: String = text.lines().map(str::trim).collect();
        assert!(flat.contains(
            "<Prisoner><Id>1</Id><Name>Bob</Name><IncarcerationDate>2010-02-01</IncarcerationDate>\
             <EncryptedMessages><Message><Description>ereht olleh</Description></Message>\
             <Message><Description>cba</Description></Message></EncryptedMessages></Prisoner>"
        ));
        assert!(flat.ends_with("</Prisoners>"));
    }

    #[test]
    fn test_salary_total_overflow_is_an_error() {
        let mut store = InMemoryStore::new();
        import_departments_cells(&mut store, r#"[{"Name":"Alpha","Cells":[{"CellNumber":1}]}]"#)
            .unwrap();
        import_prisoners_mails(
            &mut store,
            r#"[{"FullName":"Rich Guard Ward","Age":30,"IncarcerationDate":"01/02/2010"}]"#,
        )
        .unwrap();
        let officer = |name: &str| {
            format!(
                "<Officer><Name>{}</Name><Money>900000000000000</Money><Position>Guard</Position>\
                 <Weapon>Knife</Weapon><DepartmentId>1</DepartmentId>\
                 <Prisoners><Prisoner id=\"1\"/></Prisoners></Officer>",
                name
            )
        };
        let xml = format!(
            "<Officers>{}{}</Officers>",
            officer("Midas One"),
            officer("Midas Two")
        );
        import_officers_prisoners(&mut store, &xml).unwrap();

        let err = export_prisoners_by_cells(&store, &[1]).unwrap_err();
        assert!(matches!(err, JailError::InvalidMoney { .. }));
    }

    #[test]
    fn test_empty_filters_export_nothing() {
        let store = populated_store();
        assert!(project_prisoners_by_cells(&store, &[]).unwrap().is_empty());
        assert!(project_prisoners_inbox(&store, " , ").unwrap().is_empty());
        assert_eq!(export_prisoners_by_cells(&store, &[]).unwrap(), "[]");
    }
}
