use super::{base_context, deliver_artifacts, run_driver, task_rundir, write_task_marker, TaskError};
use crate::config::{ExperimentConfig, GridGenMethod, KeyPath};
use crate::driver::{DriverKind, DriverRunner};
use crate::shared::logging::append_task_log_line;

/// Halo widths shaved off the unfiltered grid for downstream consumers.
const SHAVE_SUB_STEPS: [&str; 2] = ["shave3", "shave4"];

/// Run the series of drivers that produce the experiment's grid files:
/// one generation driver selected by the validated grid generation method,
/// the equivalent-resolution computation, one shave pass per halo width, and
/// the mosaic assembly. Artifacts are then published into the fixed-file
/// directory.
pub fn run(
    config: &ExperimentConfig,
    key_path: &KeyPath,
    runner: &dyn DriverRunner,
) -> Result<(), TaskError> {
    let context = base_context(config);
    let rundir = task_rundir(config, key_path, &context)?;
    println!("Will run make_grid in {}", rundir.display());
    let _ = append_task_log_line(&rundir, "info", "starting make_grid");

    let first_stage = match config.workflow().require_grid_gen_method()? {
        GridGenMethod::EsgGrid => DriverKind::EsgGrid,
        GridGenMethod::GfdlGrid => DriverKind::MakeHgrid,
    };
    run_driver(first_stage, config, key_path.clone(), &context, runner)?;
    run_driver(
        DriverKind::GlobalEquivResol,
        config,
        key_path.clone(),
        &context,
        runner,
    )?;
    for sub_step in SHAVE_SUB_STEPS {
        run_driver(
            DriverKind::Shave,
            config,
            key_path.child(sub_step),
            &context,
            runner,
        )?;
    }
    run_driver(
        DriverKind::MakeSoloMosaic,
        config,
        key_path.clone(),
        &context,
        runner,
    )?;

    deliver_artifacts(config, &rundir)?;
    write_task_marker(&rundir, "make_grid")?;
    let _ = append_task_log_line(&rundir, "info", "make_grid complete");
    Ok(())
}
