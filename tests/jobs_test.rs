use jail_etl::core::jobs::StepDetail;
use jail_etl::{JobRunner, JobsConfig, JsonFileStore, Store};
use std::fs;
use tempfile::TempDir;

fn write_inputs(dir: &TempDir) {
    fs::write(
        dir.path().join("departments.json"),
        r#"[{"Name":"Alpha","Cells":[{"CellNumber":1,"HasWindow":true},{"CellNumber":2,"HasWindow":false}]}]"#,
    )
    .unwrap();
    fs::write(
        dir.path().join("prisoners.json"),
        r#"[{"FullName":"Bob","Age":30,"CellId":2,"IncarcerationDate":"01/02/2010"},
            {"FullName":"Alice","Age":31,"CellId":1,"IncarcerationDate":"02/02/2010",
             "Mails":[{"Description":"stressed","Sender":"Eve","Address":"2 Oak str."}]}]"#,
    )
    .unwrap();
    fs::write(
        dir.path().join("officers.xml"),
        r#"<Officers>
             <Officer><Name>Wanda Kay</Name><Money>99.995</Money><Position>Watcher</Position>
               <Weapon>FlashPulse</Weapon><DepartmentId>1</DepartmentId>
               <Prisoners><Prisoner id="1"/><Prisoner id="2"/></Prisoners></Officer>
             <Officer><Name>Lost Soul</Name><Money>5</Money><Position>Warden</Position>
               <Weapon>Knife</Weapon><DepartmentId>1</DepartmentId><Prisoners/></Officer>
           </Officers>"#,
    )
    .unwrap();
}

#[test]
fn test_job_file_end_to_end() {
    let temp_dir = TempDir::new().unwrap();
    write_inputs(&temp_dir);

    std::env::set_var("JAIL_ETL_JOBS_TEST_OUT", "reports");
    let job = r#"
[job]
name = "end-to-end"

[store]
path = "state/softjail.json"

[import]
departments = "departments.json"
prisoners = "prisoners.json"
officers = "officers.xml"
on_unknown_token = "reject"

[[export]]
kind = "by-cells"
ids = [1, 2]
output = "${JAIL_ETL_JOBS_TEST_OUT}/by-cells.json"

[[export]]
kind = "inbox"
names = "Alice"
output = "${JAIL_ETL_JOBS_TEST_OUT}/inbox.xml"
"#;
    let job_path = temp_dir.path().join("job.toml");
    fs::write(&job_path, job).unwrap();

    let config = JobsConfig::from_file(&job_path).unwrap();
    let outcome = JobRunner::new(config)
        .with_base_dir(temp_dir.path())
        .run()
        .unwrap();
    assert_eq!(outcome.steps.len(), 5);

    match &outcome.steps[2].detail {
        StepDetail::Imported(report) => {
            assert_eq!(report.to_string(), "Imported Wanda Kay (2 prisoners)\nInvalid Data")
        }
        other => panic!("unexpected detail: {:?}", other),
    }

    let by_cells = fs::read_to_string(temp_dir.path().join("reports/by-cells.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&by_cells).unwrap();
    assert_eq!(value[0]["Name"], "Alice");
    assert_eq!(value[0]["CellNumber"], 1);
    assert_eq!(value[1]["Name"], "Bob");
    assert!(by_cells.contains("\"TotalOfficerSalary\": 100.00"));

    let inbox = fs::read_to_string(temp_dir.path().join("reports/inbox.xml")).unwrap();
    assert!(inbox.contains("<Description>desserts</Description>"));

    let store = JsonFileStore::open(temp_dir.path().join("state/softjail.json")).unwrap();
    assert_eq!(store.prisoners().len(), 2);
    assert_eq!(store.officers().len(), 1);

    std::env::remove_var("JAIL_ETL_JOBS_TEST_OUT");
}

#[test]
fn test_job_aborts_on_unknown_token_by_default() {
    let temp_dir = TempDir::new().unwrap();
    write_inputs(&temp_dir);

    let config = JobsConfig::from_toml_str(
        r#"
[store]
path = "softjail.json"

[import]
departments = "departments.json"
prisoners = "prisoners.json"
officers = "officers.xml"
"#,
    )
    .unwrap();

    let err = JobRunner::new(config)
        .with_base_dir(temp_dir.path())
        .run()
        .unwrap_err();
    assert!(matches!(err, jail_etl::JailError::UnknownToken { .. }));

    // Earlier imports were committed before the officer step failed.
    let store = JsonFileStore::open(temp_dir.path().join("softjail.json")).unwrap();
    assert_eq!(store.departments().len(), 1);
    assert_eq!(store.prisoners().len(), 2);
    assert!(store.officers().is_empty());
}
