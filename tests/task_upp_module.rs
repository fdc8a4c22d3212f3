mod common;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use common::{config_from_yaml, FakeRunner};
use fixprep::config::KeyPath;
use fixprep::driver::DriverKind;
use fixprep::tasks::upp;
use std::fs;
use std::path::Path;

fn cycle() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 7, 15)
        .expect("date")
        .and_hms_opt(18, 0, 0)
        .expect("time")
}

fn upp_config(root: &Path) -> String {
    let rundir = root.join("post/f006");
    format!(
        r#"
workflow:
  CRES: C403
  FIXlam: {fix_lam}
task_run_post:
  upp:
    rundir: {rundir}
    execution:
      executable: /bin/true
  output_file_labels:
    - prslev
    - natlev
  desired_output_name: "{{{{ file_label }}}}.mem{{{{ MEMBER }}}}.{{{{ cycle_ymd }}}}t{{{{ cycle_hh }}}}z.f{{{{ leadtime_hh }}}}.grib2"
"#,
        fix_lam = root.join("fix_lam").display(),
        rundir = rundir.display(),
    )
}

#[test]
fn each_output_label_gets_its_own_dereferenced_link() {
    let temp = tempfile::tempdir().expect("tempdir");
    let config = config_from_yaml(&upp_config(temp.path()));
    let runner = FakeRunner::new()
        .with_artifact(DriverKind::Upp, "PRSLEV.GrbF06")
        .with_artifact(DriverKind::Upp, "NATLEV.GrbF06");
    let key_path = KeyPath::parse("task_run_post").expect("path");

    upp::run(
        &config,
        &key_path,
        cycle(),
        Duration::hours(6) + Duration::minutes(30),
        "002",
        &runner,
    )
    .expect("upp");

    assert_eq!(runner.kinds(), [DriverKind::Upp]);

    let rundir = temp.path().join("post/f006");
    let delivery_dir = temp.path().join("post");
    for (label, upper) in [("prslev", "PRSLEV"), ("natlev", "NATLEV")] {
        let link = delivery_dir.join(format!("{label}.mem002.20240715t18z.f06.grib2"));
        assert_eq!(
            fs::read_link(&link).expect("link"),
            rundir.join(format!("{upper}.GrbF06"))
        );
    }
    assert!(rundir.join("upp_task_complete.txt").is_file());
}

#[test]
fn a_failed_post_processor_publishes_nothing() {
    let temp = tempfile::tempdir().expect("tempdir");
    let config = config_from_yaml(&upp_config(temp.path()));
    let runner = FakeRunner::failing(&[DriverKind::Upp]);
    let key_path = KeyPath::parse("task_run_post").expect("path");

    let result = upp::run(
        &config,
        &key_path,
        cycle(),
        Duration::hours(6),
        "000",
        &runner,
    );
    assert!(result.is_err());
    assert!(!temp
        .path()
        .join("post/prslev.mem000.20240715t18z.f06.grib2")
        .exists());
}
