mod context;
mod document;
mod error;
mod key_path;

pub use context::{
    cycle_layer, dereference, environment_layer, leadtime_layer, render_template, Context,
};
pub use document::{ExperimentConfig, GridGenMethod, WorkflowSettings};
pub use error::ConfigError;
pub use key_path::{resolve, resolve_string, resolve_string_sequence, KeyPath};
