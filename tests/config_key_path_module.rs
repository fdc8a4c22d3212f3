use fixprep::config::{resolve, resolve_string, resolve_string_sequence, ConfigError, KeyPath};
use serde_yaml::Value;

fn sample() -> Value {
    serde_yaml::from_str(
        r#"
task_make_grid:
  esg_grid:
    rundir: /expt/make_grid
  shave4:
    shave:
      rundir: /expt/make_grid
labels:
  - prslev
  - natlev
scalar: plain
"#,
    )
    .expect("yaml")
}

#[test]
fn resolve_returns_the_exact_sub_mapping() {
    let root = sample();
    let path = KeyPath::parse("task_make_grid.esg_grid").expect("path");
    let block = resolve(&root, &path).expect("resolve");
    assert_eq!(
        block.get("rundir").and_then(Value::as_str),
        Some("/expt/make_grid")
    );

    let nested = KeyPath::parse("task_make_grid.shave4.shave.rundir").expect("path");
    assert_eq!(
        resolve_string(&root, &nested).expect("resolve string"),
        "/expt/make_grid"
    );
}

#[test]
fn missing_key_names_the_full_attempted_prefix() {
    let root = sample();
    let path = KeyPath::parse("task_make_grid.make_hgrid.rundir").expect("path");
    match resolve(&root, &path).unwrap_err() {
        ConfigError::MissingKey { prefix } => {
            assert_eq!(prefix, "task_make_grid.make_hgrid");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn non_mapping_intermediate_names_the_offending_prefix() {
    let root = sample();
    let path = KeyPath::parse("scalar.deeper").expect("path");
    match resolve(&root, &path).unwrap_err() {
        ConfigError::InvalidPath { prefix } => {
            assert_eq!(prefix, "scalar");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn string_sequence_extraction_checks_element_types() {
    let root = sample();
    let labels =
        resolve_string_sequence(&root, &KeyPath::parse("labels").expect("path")).expect("labels");
    assert_eq!(labels, ["prslev", "natlev"]);

    let err =
        resolve_string_sequence(&root, &KeyPath::parse("scalar").expect("path")).unwrap_err();
    assert!(matches!(err, ConfigError::Expected { .. }));
}
