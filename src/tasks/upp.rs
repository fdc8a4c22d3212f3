use super::{base_context, run_driver, write_task_marker, TaskError};
use crate::config::{
    cycle_layer, dereference, leadtime_layer, resolve, resolve_string_sequence, ConfigError,
    ExperimentConfig, KeyPath,
};
use crate::driver::{DriverKind, DriverRunner};
use crate::fixfiles::{publish, LinkSpec};
use crate::shared::logging::append_task_log_line;
use chrono::{Duration, NaiveDateTime};
use serde_yaml::Value;

/// Run the post-processor for one cycle/leadtime/member and deliver its
/// output under the configured names. Each output label gets its own
/// dereference of the task block with a fresh `file_label` layer; the base
/// config is never rebuilt or mutated per label.
pub fn run(
    config: &ExperimentConfig,
    key_path: &KeyPath,
    cycle: NaiveDateTime,
    leadtime: Duration,
    member: &str,
    runner: &dyn DriverRunner,
) -> Result<(), TaskError> {
    let context = base_context(config)
        .layer([("MEMBER", member), ("member", member)])
        .layer(cycle_layer(cycle))
        .layer(leadtime_layer(leadtime));

    let rundir = run_driver(DriverKind::Upp, config, key_path.clone(), &context, runner)?;

    let labels = resolve_string_sequence(config.root(), &key_path.child("output_file_labels"))?;
    let forecast_hour = leadtime.num_seconds() / 3600;
    let mut specs = Vec::with_capacity(labels.len());
    for label in &labels {
        let label_context = context.clone().layer([("file_label", label.as_str())]);
        let block = resolve(config.root(), key_path)?;
        let block = dereference(block, &label_context)?;
        let name = block
            .get("desired_output_name")
            .and_then(Value::as_str)
            .ok_or_else(|| ConfigError::Expected {
                prefix: format!("{key_path}.desired_output_name"),
                expected: "a string".to_string(),
            })?;
        specs.push(LinkSpec {
            name: name.to_string(),
            target: rundir.join(format!("{}.GrbF{forecast_hour:02}", label.to_uppercase())),
        });
    }

    let destination = rundir.parent().ok_or_else(|| {
        TaskError::Config(ConfigError::Expected {
            prefix: format!("{key_path}.upp.rundir"),
            expected: "a path with a parent directory".to_string(),
        })
    })?;
    publish(destination, &specs)?;

    write_task_marker(&rundir, "upp")?;
    let _ = append_task_log_line(&rundir, "info", "upp complete");
    Ok(())
}
