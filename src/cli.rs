use crate::config::KeyPath;
use chrono::{Duration, NaiveDateTime};
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("unknown task `{0}`; expected one of: make-grid, make-orog, make-sfc-climo, create-model-configure, upp")]
    UnknownTask(String),
    #[error("missing required flag {0}")]
    MissingFlag(&'static str),
    #[error("flag {0} requires a value")]
    MissingValue(String),
    #[error("unknown flag {0}")]
    UnknownFlag(String),
    #[error("invalid cycle `{0}`; specify an ISO8601 timestamp such as 2024-07-15T18")]
    BadCycleFormat(String),
    #[error("invalid leadtime `{0}`; specify leadtime as hours[:minutes[:seconds]]")]
    BadLeadTimeFormat(String),
    #[error("invalid key path: {0}")]
    BadKeyPath(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskVerb {
    MakeGrid,
    MakeOrog,
    MakeSfcClimo,
    CreateModelConfigure,
    Upp,
}

impl TaskVerb {
    pub fn parse(raw: &str) -> Result<Self, CliError> {
        match raw {
            "make-grid" => Ok(Self::MakeGrid),
            "make-orog" => Ok(Self::MakeOrog),
            "make-sfc-climo" => Ok(Self::MakeSfcClimo),
            "create-model-configure" => Ok(Self::CreateModelConfigure),
            "upp" => Ok(Self::Upp),
            other => Err(CliError::UnknownTask(other.to_string())),
        }
    }

    fn needs_cycle(self) -> bool {
        matches!(self, Self::CreateModelConfigure | Self::Upp)
    }

    fn needs_leadtime(self) -> bool {
        matches!(self, Self::Upp)
    }
}

#[derive(Debug)]
pub struct TaskArgs {
    pub verb: TaskVerb,
    pub config_file: PathBuf,
    pub key_path: KeyPath,
    pub cycle: Option<NaiveDateTime>,
    pub leadtime: Option<Duration>,
    pub member: String,
}

pub fn parse_args(args: &[String]) -> Result<TaskArgs, CliError> {
    let Some((verb, rest)) = args.split_first() else {
        return Err(CliError::MissingFlag("<task>"));
    };
    let verb = TaskVerb::parse(verb)?;

    let mut config_file = None;
    let mut key_path = None;
    let mut cycle = None;
    let mut leadtime = None;
    let mut member = None;

    let mut cursor = rest.iter();
    while let Some(flag) = cursor.next() {
        let mut value_for = |flag: &str| {
            cursor
                .next()
                .cloned()
                .ok_or_else(|| CliError::MissingValue(flag.to_string()))
        };
        match flag.as_str() {
            "-c" | "--config-file" => config_file = Some(PathBuf::from(value_for(flag)?)),
            "--key-path" => {
                let raw = value_for(flag)?;
                key_path = Some(KeyPath::parse(&raw).map_err(|_| CliError::BadKeyPath(raw))?);
            }
            "--cycle" => cycle = Some(parse_cycle(&value_for(flag)?)?),
            "--leadtime" => leadtime = Some(parse_leadtime(&value_for(flag)?)?),
            "--member" => member = Some(value_for(flag)?),
            other => return Err(CliError::UnknownFlag(other.to_string())),
        }
    }

    let args = TaskArgs {
        verb,
        config_file: config_file.ok_or(CliError::MissingFlag("--config-file"))?,
        key_path: key_path.ok_or(CliError::MissingFlag("--key-path"))?,
        cycle,
        leadtime,
        member: member.unwrap_or_else(|| "000".to_string()),
    };
    if args.verb.needs_cycle() && args.cycle.is_none() {
        return Err(CliError::MissingFlag("--cycle"));
    }
    if args.verb.needs_leadtime() && args.leadtime.is_none() {
        return Err(CliError::MissingFlag("--leadtime"));
    }
    Ok(args)
}

/// Accepts `YYYY-MM-DDTHH`, `YYYY-MM-DDTHH:MM`, or `YYYY-MM-DDTHH:MM:SS`.
pub fn parse_cycle(raw: &str) -> Result<NaiveDateTime, CliError> {
    // The hour-only form needs an explicit minute before chrono will take it.
    let candidates = [
        (raw.to_string(), "%Y-%m-%dT%H:%M:%S"),
        (raw.to_string(), "%Y-%m-%dT%H:%M"),
        (format!("{raw}:00"), "%Y-%m-%dT%H:%M"),
    ];
    for (candidate, format) in &candidates {
        if let Ok(cycle) = NaiveDateTime::parse_from_str(candidate, format) {
            return Ok(cycle);
        }
    }
    Err(CliError::BadCycleFormat(raw.to_string()))
}

/// Parses a leadtime of the form `hours[:minutes[:seconds]]`.
pub fn parse_leadtime(raw: &str) -> Result<Duration, CliError> {
    let parts: Vec<&str> = raw.split(':').collect();
    if parts.is_empty() || parts.len() > 3 {
        return Err(CliError::BadLeadTimeFormat(raw.to_string()));
    }
    let mut fields = [0i64; 3];
    for (idx, part) in parts.iter().enumerate() {
        if part.is_empty() || !part.chars().all(|ch| ch.is_ascii_digit()) {
            return Err(CliError::BadLeadTimeFormat(raw.to_string()));
        }
        fields[idx] = part
            .parse::<i64>()
            .map_err(|_| CliError::BadLeadTimeFormat(raw.to_string()))?;
    }
    let [hours, minutes, seconds] = fields;
    // An hour count past chrono's range is as unusable as a non-numeric one.
    Duration::try_hours(hours)
        .zip(Duration::try_minutes(minutes))
        .zip(Duration::try_seconds(seconds))
        .and_then(|((hours, minutes), seconds)| {
            hours.checked_add(&minutes)?.checked_add(&seconds)
        })
        .ok_or_else(|| CliError::BadLeadTimeFormat(raw.to_string()))
}

pub fn help_lines() -> Vec<String> {
    vec![
        "Tasks:".to_string(),
        "  make-grid      --config-file PATH --key-path KEY[.KEY...]".to_string(),
        "  make-orog      --config-file PATH --key-path KEY[.KEY...]".to_string(),
        "  make-sfc-climo --config-file PATH --key-path KEY[.KEY...]".to_string(),
        "  create-model-configure --config-file PATH --key-path KEY[.KEY...] \\".to_string(),
        "                 --cycle ISO8601".to_string(),
        "  upp            --config-file PATH --key-path KEY[.KEY...] \\".to_string(),
        "                 --cycle ISO8601 --leadtime H[:M[:S]] [--member NNN]".to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn member_defaults_to_three_zeros() {
        let args: Vec<String> = [
            "upp",
            "--config-file",
            "/tmp/expt.yaml",
            "--key-path",
            "task_run_post",
            "--cycle",
            "2024-07-15T18",
            "--leadtime",
            "6",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        let parsed = parse_args(&args).expect("parse");
        assert_eq!(parsed.member, "000");
        assert_eq!(parsed.leadtime, Some(Duration::hours(6)));
    }
}
