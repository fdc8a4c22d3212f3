#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid yaml in {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("key path `{prefix}` is not present in the config")]
    MissingKey { prefix: String },
    #[error("key path `{prefix}` does not lead to a mapping")]
    InvalidPath { prefix: String },
    #[error("config value at `{prefix}` is not {expected}")]
    Expected { prefix: String, expected: String },
    #[error("placeholder `{placeholder}` has no value in any context layer")]
    UnresolvedReference { placeholder: String },
    #[error("malformed template expression: {reason}")]
    Template { reason: String },
    #[error("workflow settings validation failed: {0}")]
    Workflow(String),
}
