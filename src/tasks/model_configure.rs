use super::{base_context, task_rundir, TaskError};
use crate::config::{
    cycle_layer, dereference, render_template, resolve, ExperimentConfig, KeyPath,
};
use crate::shared::logging::append_task_log_line;
use chrono::NaiveDateTime;
use std::collections::BTreeMap;
use std::fs;

/// Render the forecast model's `model_configure` file for one cycle. No
/// driver runs here: the task block's string scalars are layered over the
/// cycle context and substituted into the configured template, and the
/// result lands in the task's run directory.
pub fn run(
    config: &ExperimentConfig,
    key_path: &KeyPath,
    cycle: NaiveDateTime,
) -> Result<(), TaskError> {
    let context = base_context(config).layer(cycle_layer(cycle));
    let rundir = task_rundir(config, key_path, &context)?;

    let block = resolve(config.root(), key_path)?;
    let block = dereference(block, &context)?;
    let mut overrides = BTreeMap::new();
    if let Some(mapping) = block.as_mapping() {
        for (key, value) in mapping {
            if let (Some(key), Some(value)) = (key.as_str(), value.as_str()) {
                overrides.insert(key.to_string(), value.to_string());
            }
        }
    }
    let context = context.layer(overrides);

    let template_path = config.workflow().require_model_config_template()?;
    let template = fs::read_to_string(template_path).map_err(|source| TaskError::Template {
        path: template_path.display().to_string(),
        source,
    })?;
    let rendered = render_template(&template, &context)?;

    let destination = rundir.join("model_configure");
    let write = || -> std::io::Result<()> {
        fs::create_dir_all(&rundir)?;
        fs::write(&destination, rendered.as_bytes())
    };
    write().map_err(|source| TaskError::Write {
        path: destination.display().to_string(),
        source,
    })?;

    println!("Wrote {}", destination.display());
    let _ = append_task_log_line(&rundir, "info", "create_model_configure complete");
    Ok(())
}
