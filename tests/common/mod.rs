#![allow(dead_code)]

use fixprep::config::ExperimentConfig;
use fixprep::driver::{DriverBlock, DriverError, DriverKind, DriverRunner};
use std::cell::RefCell;
use std::fs;
use std::path::PathBuf;

/// Stand-in for the external components: records every invocation, drops
/// configured artifact files into the run directory, and writes the
/// completion sentinel unless told to fail for that driver kind.
#[derive(Default)]
pub struct FakeRunner {
    pub invoked: RefCell<Vec<(DriverKind, PathBuf)>>,
    pub fail: Vec<DriverKind>,
    pub artifacts: Vec<(DriverKind, String)>,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(kinds: &[DriverKind]) -> Self {
        Self {
            fail: kinds.to_vec(),
            ..Self::default()
        }
    }

    pub fn with_artifact(mut self, kind: DriverKind, name: &str) -> Self {
        self.artifacts.push((kind, name.to_string()));
        self
    }

    pub fn kinds(&self) -> Vec<DriverKind> {
        self.invoked.borrow().iter().map(|(kind, _)| *kind).collect()
    }
}

impl DriverRunner for FakeRunner {
    fn run(&self, kind: DriverKind, block: &DriverBlock) -> Result<(), DriverError> {
        fs::create_dir_all(&block.rundir).expect("create rundir");
        self.invoked.borrow_mut().push((kind, block.rundir.clone()));
        for (artifact_kind, name) in &self.artifacts {
            if *artifact_kind == kind {
                fs::write(block.rundir.join(name), b"").expect("write artifact");
            }
        }
        if !self.fail.contains(&kind) {
            fs::write(block.rundir.join(kind.sentinel_name()), b"").expect("write sentinel");
        }
        Ok(())
    }
}

pub fn config_from_yaml(yaml: &str) -> ExperimentConfig {
    let root = serde_yaml::from_str(yaml).expect("valid yaml");
    ExperimentConfig::from_value(root).expect("valid experiment config")
}

/// A driver block snippet with the given rundir, indented `indent` spaces.
pub fn driver_block(indent: usize, name: &str, rundir: &std::path::Path) -> String {
    let pad = " ".repeat(indent);
    format!(
        "{pad}{name}:\n{pad}  rundir: {rundir}\n{pad}  execution:\n{pad}    executable: /bin/true\n",
        rundir = rundir.display(),
    )
}
