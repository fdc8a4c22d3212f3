use super::{ConfigError, KeyPath};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_yaml::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// How the horizontal grid for the experiment is generated. Resolved once
/// during config validation so an unknown method is rejected before any
/// driver runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridGenMethod {
    EsgGrid,
    GfdlGrid,
}

impl GridGenMethod {
    pub fn parse(raw: &str) -> Result<Self, String> {
        match raw {
            "ESGgrid" => Ok(Self::EsgGrid),
            "GFDLgrid" => Ok(Self::GfdlGrid),
            _ => Err("grid generation method must be one of: ESGgrid, GFDLgrid".to_string()),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::EsgGrid => "ESGgrid",
            Self::GfdlGrid => "GFDLgrid",
        }
    }
}

impl std::fmt::Display for GridGenMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl<'de> Deserialize<'de> for GridGenMethod {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw)
            .map_err(|err| D::Error::custom(format!("invalid grid generation method `{raw}`: {err}")))
    }
}

/// The validated `workflow:` block of the experiment config. `CRES` and
/// `FIXlam` are required for every task; the rest are required only by the
/// tasks that consume them and are checked at the point of use.
#[derive(Debug, Clone, Deserialize)]
pub struct WorkflowSettings {
    #[serde(rename = "CRES")]
    pub cres: String,
    #[serde(rename = "FIXlam")]
    pub fix_lam: PathBuf,
    #[serde(rename = "GRID_GEN_METHOD", default)]
    pub grid_gen_method: Option<GridGenMethod>,
    #[serde(rename = "CCPP_PHYS_SUITE", default)]
    pub ccpp_phys_suite: Option<String>,
    #[serde(rename = "MODEL_CONFIG_TMPL_FP", default)]
    pub model_config_template: Option<PathBuf>,
}

impl WorkflowSettings {
    pub fn require_grid_gen_method(&self) -> Result<GridGenMethod, ConfigError> {
        self.grid_gen_method.ok_or_else(|| {
            ConfigError::Workflow("workflow.GRID_GEN_METHOD is required for make_grid".to_string())
        })
    }

    pub fn require_ccpp_phys_suite(&self) -> Result<&str, ConfigError> {
        self.ccpp_phys_suite.as_deref().ok_or_else(|| {
            ConfigError::Workflow("workflow.CCPP_PHYS_SUITE is required for make_orog".to_string())
        })
    }

    pub fn require_model_config_template(&self) -> Result<&Path, ConfigError> {
        self.model_config_template.as_deref().ok_or_else(|| {
            ConfigError::Workflow(
                "workflow.MODEL_CONFIG_TMPL_FP is required for create_model_configure".to_string(),
            )
        })
    }
}

/// The experiment configuration document: the raw YAML tree plus the typed
/// workflow settings, loaded and validated once per task invocation and
/// immutable for the rest of the run.
#[derive(Debug, Clone)]
pub struct ExperimentConfig {
    root: Value,
    workflow: WorkflowSettings,
}

impl ExperimentConfig {
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let root: Value = serde_yaml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_value(root)
    }

    pub fn from_value(root: Value) -> Result<Self, ConfigError> {
        let workflow_value = super::key_path::resolve(&root, &KeyPath::parse("workflow")?)?;
        let workflow: WorkflowSettings = serde_yaml::from_value(workflow_value.clone())
            .map_err(|err| ConfigError::Workflow(err.to_string()))?;
        Ok(Self { root, workflow })
    }

    pub fn root(&self) -> &Value {
        &self.root
    }

    pub fn workflow(&self) -> &WorkflowSettings {
        &self.workflow
    }

    /// Top-level string scalars, used as the earliest context layer so that
    /// config values can reference one another during dereferencing.
    pub fn top_level_strings(&self) -> BTreeMap<String, String> {
        let mut scalars = BTreeMap::new();
        if let Some(mapping) = self.root.as_mapping() {
            for (key, value) in mapping {
                if let (Some(key), Some(value)) = (key.as_str(), value.as_str()) {
                    scalars.insert(key.to_string(), value.to_string());
                }
            }
        }
        scalars
    }
}
