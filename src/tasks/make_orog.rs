use super::{base_context, deliver_artifacts, run_driver, task_rundir, write_task_marker, TaskError};
use crate::config::{ExperimentConfig, KeyPath};
use crate::driver::{DriverKind, DriverRunner};
use crate::fixfiles::{link_specs, publish};
use crate::shared::logging::append_task_log_line;

/// Physics suites that use GSL's orographic gravity-wave drag and therefore
/// need the extra orog_gsl stage.
const GRAVITY_WAVE_DRAG_SUITES: [&str; 4] = [
    "FV3_RAP",
    "FV3_HRRR",
    "FV3_GFS_v15_thompson_mynn_lam3km",
    "FV3_GFS_v17_p8",
];

/// Run the series of drivers that produce the fix files related to
/// topography: orog, optionally orog_gsl, filter_topo, and a shave pass for
/// the 0- and 4-cell halos. Shave output lands in the task rundir and is
/// published from there.
pub fn run(
    config: &ExperimentConfig,
    key_path: &KeyPath,
    runner: &dyn DriverRunner,
) -> Result<(), TaskError> {
    let context = base_context(config);
    let rundir = task_rundir(config, key_path, &context)?;
    println!("Will run make_orog in {}", rundir.display());
    let _ = append_task_log_line(&rundir, "info", "starting make_orog");

    run_driver(DriverKind::Orog, config, key_path.clone(), &context, runner)?;

    let suite = config.workflow().require_ccpp_phys_suite()?;
    if GRAVITY_WAVE_DRAG_SUITES.contains(&suite) {
        let gsl_rundir = run_driver(
            DriverKind::OrogGsl,
            config,
            key_path.clone(),
            &context,
            runner,
        )?;
        let cres = &config.workflow().cres;
        let outputs: Vec<_> = ["ss", "ls"]
            .iter()
            .map(|scale| gsl_rundir.join(format!("{cres}_oro_data_{scale}.tile7.halo0.nc")))
            .collect();
        publish(&config.workflow().fix_lam, &link_specs(&outputs, cres))?;
    }

    run_driver(
        DriverKind::FilterTopo,
        config,
        key_path.clone(),
        &context,
        runner,
    )?;
    for sub_step in ["shave0", "shave4"] {
        run_driver(
            DriverKind::Shave,
            config,
            key_path.child(sub_step),
            &context,
            runner,
        )?;
    }

    deliver_artifacts(config, &rundir)?;
    write_task_marker(&rundir, "make_orog")?;
    let _ = append_task_log_line(&rundir, "info", "make_orog complete");
    Ok(())
}
