mod runscript;

pub use runscript::RunscriptRunner;

use crate::config::{dereference, resolve, ConfigError, Context, ExperimentConfig, KeyPath};
use crate::shared::logging::append_task_log_line;
use serde::Deserialize;
use std::path::PathBuf;

/// The external data-preparation components this pipeline knows how to
/// sequence. The name doubles as the config block key under the task's key
/// path and as the stem of the completion sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverKind {
    MakeHgrid,
    EsgGrid,
    GlobalEquivResol,
    Shave,
    MakeSoloMosaic,
    Orog,
    OrogGsl,
    FilterTopo,
    SfcClimoGen,
    Upp,
}

impl DriverKind {
    pub fn driver_name(self) -> &'static str {
        match self {
            Self::MakeHgrid => "make_hgrid",
            Self::EsgGrid => "esg_grid",
            Self::GlobalEquivResol => "global_equiv_resol",
            Self::Shave => "shave",
            Self::MakeSoloMosaic => "make_solo_mosaic",
            Self::Orog => "orog",
            Self::OrogGsl => "orog_gsl",
            Self::FilterTopo => "filter_topo",
            Self::SfcClimoGen => "sfc_climo_gen",
            Self::Upp => "upp",
        }
    }

    pub fn sentinel_name(self) -> String {
        format!("runscript.{}.done", self.driver_name())
    }
}

impl std::fmt::Display for DriverKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.driver_name())
    }
}

/// A driver's resolved config block after template dereferencing.
#[derive(Debug, Clone, Deserialize)]
pub struct DriverBlock {
    pub rundir: PathBuf,
    pub execution: ExecutionSpec,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExecutionSpec {
    pub executable: PathBuf,
    #[serde(default)]
    pub args: Vec<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("invalid config block for driver {driver}: {source}")]
    Block {
        driver: &'static str,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("failed to create run directory {path}: {source}")]
    CreateRundir {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to spawn driver {driver} executable {executable}: {source}")]
    Spawn {
        driver: &'static str,
        executable: String,
        #[source]
        source: std::io::Error,
    },
    #[error(
        "error occurred running {driver} in {rundir}; please see component error logs"
    )]
    Execution { driver: &'static str, rundir: String },
}

/// One unit of orchestration work: a driver kind plus everything needed to
/// resolve its config block. Constructed immediately before running and
/// discarded once the sentinel has been checked.
pub struct DriverInvocation<'a> {
    pub kind: DriverKind,
    pub config: &'a ExperimentConfig,
    pub key_path: KeyPath,
    pub context: &'a Context,
}

/// The seam between orchestration and the external world. The production
/// runner spawns the driver's runscript; tests substitute fakes.
pub trait DriverRunner {
    fn run(&self, kind: DriverKind, block: &DriverBlock) -> Result<(), DriverError>;
}

/// Resolve the driver's block, run it, and verify its completion sentinel.
/// A missing sentinel is fatal: downstream steps assume complete, validated
/// inputs, so there is no retry and no partial continuation.
pub fn invoke(
    invocation: &DriverInvocation<'_>,
    runner: &dyn DriverRunner,
) -> Result<PathBuf, DriverError> {
    let block_path = invocation.key_path.child(invocation.kind.driver_name());
    let raw = resolve(invocation.config.root(), &block_path)?;
    let resolved = dereference(raw, invocation.context)?;
    let block: DriverBlock =
        serde_yaml::from_value(resolved).map_err(|source| DriverError::Block {
            driver: invocation.kind.driver_name(),
            source,
        })?;

    println!("Will run {} in {}", invocation.kind, block.rundir.display());
    runner.run(invocation.kind, &block)?;

    let sentinel = block.rundir.join(invocation.kind.sentinel_name());
    if !sentinel.is_file() {
        let err = DriverError::Execution {
            driver: invocation.kind.driver_name(),
            rundir: block.rundir.display().to_string(),
        };
        let _ = append_task_log_line(&block.rundir, "error", &err.to_string());
        return Err(err);
    }
    Ok(block.rundir)
}
