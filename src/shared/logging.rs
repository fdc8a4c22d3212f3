use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize)]
struct LogRecord<'a> {
    ts: String,
    level: &'a str,
    message: &'a str,
}

pub fn task_log_path(rundir: &Path) -> PathBuf {
    rundir.join("fixprep.log")
}

pub fn append_task_log_line(rundir: &Path, level: &str, message: &str) -> std::io::Result<()> {
    let record = LogRecord {
        ts: chrono::Utc::now().to_rfc3339(),
        level,
        message,
    };
    let line = serde_json::to_string(&record)
        .map_err(|err| std::io::Error::other(err.to_string()))?;
    let path = task_log_path(rundir);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)?;
    writeln!(file, "{line}")
}
