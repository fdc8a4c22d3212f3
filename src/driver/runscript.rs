use super::{DriverBlock, DriverError, DriverKind, DriverRunner};
use std::fs;
use std::process::Command;

/// Runs a driver's configured runscript synchronously in its run directory.
/// The exit status is advisory only: the completion sentinel checked by the
/// invoker is the success contract, matching how the components report
/// failure through their own error logs.
pub struct RunscriptRunner;

impl DriverRunner for RunscriptRunner {
    fn run(&self, kind: DriverKind, block: &DriverBlock) -> Result<(), DriverError> {
        fs::create_dir_all(&block.rundir).map_err(|source| DriverError::CreateRundir {
            path: block.rundir.display().to_string(),
            source,
        })?;

        let mut command = Command::new(&block.execution.executable);
        command.current_dir(&block.rundir).args(&block.execution.args);
        command.status().map_err(|source| DriverError::Spawn {
            driver: kind.driver_name(),
            executable: block.execution.executable.display().to_string(),
            source,
        })?;
        Ok(())
    }
}
