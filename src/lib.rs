pub mod cli;
pub mod config;
pub mod driver;
pub mod fixfiles;
pub mod shared;
pub mod tasks;
