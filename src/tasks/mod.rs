mod error;
pub mod make_grid;
pub mod make_orog;
pub mod make_sfc_climo;
pub mod model_configure;
pub mod upp;

pub use error::TaskError;

use crate::config::{
    dereference, environment_layer, resolve_string, ConfigError, Context, ExperimentConfig,
    KeyPath,
};
use crate::driver::{self, DriverInvocation, DriverKind, DriverRunner};
use crate::fixfiles::{link_specs, netcdf_files_with_prefix, publish};
use serde_yaml::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// The base dereferencing context for a task: top-level config scalars,
/// then the process environment, then the derived resolution label. Derived
/// values are threaded explicitly instead of being written into the process
/// environment.
pub(crate) fn base_context(config: &ExperimentConfig) -> Context {
    Context::new()
        .layer(config.top_level_strings())
        .layer(environment_layer())
        .layer([("CRES".to_string(), config.workflow().cres.clone())])
}

/// The task block's own `rundir` entry, dereferenced against the task
/// context.
pub(crate) fn task_rundir(
    config: &ExperimentConfig,
    key_path: &KeyPath,
    context: &Context,
) -> Result<PathBuf, ConfigError> {
    let raw = resolve_string(config.root(), &key_path.child("rundir"))?;
    let rendered = dereference(&Value::String(raw), context)?;
    rendered
        .as_str()
        .map(PathBuf::from)
        .ok_or_else(|| ConfigError::Expected {
            prefix: format!("{key_path}.rundir"),
            expected: "a string".to_string(),
        })
}

/// Invoke one driver under the task's key path, fail-fast on a missing
/// completion sentinel, and return its run directory.
pub(crate) fn run_driver(
    kind: DriverKind,
    config: &ExperimentConfig,
    key_path: KeyPath,
    context: &Context,
    runner: &dyn DriverRunner,
) -> Result<PathBuf, TaskError> {
    let invocation = DriverInvocation {
        kind,
        config,
        key_path,
        context,
    };
    Ok(driver::invoke(&invocation, runner)?)
}

/// Publish every `<CRES>*.nc` artifact found in `dir` into the fixed-file
/// directory under its canonical names.
pub(crate) fn deliver_artifacts(config: &ExperimentConfig, dir: &Path) -> Result<(), TaskError> {
    let cres = &config.workflow().cres;
    let files = netcdf_files_with_prefix(dir, cres)?;
    let specs = link_specs(&files, cres);
    publish(&config.workflow().fix_lam, &specs)?;
    Ok(())
}

/// Mark the successful completion of the task on disk. Advisory only; no
/// orchestration logic reads it back.
pub(crate) fn write_task_marker(rundir: &Path, task: &str) -> Result<(), TaskError> {
    let path = rundir.join(format!("{task}_task_complete.txt"));
    let write = || -> std::io::Result<()> {
        fs::create_dir_all(rundir)?;
        fs::write(&path, b"")
    };
    write().map_err(|source| TaskError::Marker {
        path: path.display().to_string(),
        source,
    })
}
