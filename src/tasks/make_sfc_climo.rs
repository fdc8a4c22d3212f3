use super::{base_context, run_driver, write_task_marker, TaskError};
use crate::config::{ExperimentConfig, KeyPath};
use crate::driver::{DriverKind, DriverRunner};
use crate::fixfiles::{link_specs, netcdf_files_with_prefix, publish};
use crate::shared::logging::append_task_log_line;

/// Run sfc_climo_gen and publish every NetCDF file it produces into the
/// fixed-file directory under the canonical halo/tile naming.
pub fn run(
    config: &ExperimentConfig,
    key_path: &KeyPath,
    runner: &dyn DriverRunner,
) -> Result<(), TaskError> {
    let context = base_context(config);
    let rundir = run_driver(
        DriverKind::SfcClimoGen,
        config,
        key_path.clone(),
        &context,
        runner,
    )?;

    let cres = &config.workflow().cres;
    let files = netcdf_files_with_prefix(&rundir, "")?;
    publish(&config.workflow().fix_lam, &link_specs(&files, cres))?;

    write_task_marker(&rundir, "make_sfc_climo")?;
    let _ = append_task_log_line(&rundir, "info", "make_sfc_climo complete");
    Ok(())
}
