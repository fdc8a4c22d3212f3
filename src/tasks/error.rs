use crate::config::ConfigError;
use crate::driver::DriverError;
use crate::fixfiles::FixFileError;

#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Driver(#[from] DriverError),
    #[error(transparent)]
    FixFile(#[from] FixFileError),
    #[error("failed to read template {path}: {source}")]
    Template {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write task completion marker {path}: {source}")]
    Marker {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
