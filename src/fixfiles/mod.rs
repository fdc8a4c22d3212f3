use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum FixFileError {
    #[error("link destination {path} exists and is not a symbolic link")]
    DestinationConflict { path: String },
    #[error("failed to remove stale link {path}: {source}")]
    RemoveLink {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to link {link} -> {target}: {source}")]
    CreateLink {
        link: String,
        target: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to create destination directory {path}: {source}")]
    CreateDir {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to read directory {path}: {source}")]
    ReadDir {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// One link to publish: `name` is the canonical file name under the
/// fixed-file directory, `target` the task-local artifact it points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkSpec {
    pub name: String,
    pub target: PathBuf,
}

/// Map a task-local output file name to its canonical fixed-file names.
///
/// One rule set is applied to every artifact type (the historical scripts
/// disagreed among themselves; this is the documented canonical behavior):
/// - a `halo0` name is kept verbatim, with a `tile7`->`tile1` alias when the
///   name encodes tile 7;
/// - any other halo width is rewritten to the 4-cell convention, with a
///   second alias that drops the halo marker entirely;
/// - a name with no halo marker is halo-0 by construction: it gains the
///   resolution label prefix and an explicit `halo0` marker, plus the tile
///   alias when applicable.
///
/// Every returned name maps to the same source file.
pub fn canonical_names(task_local: &str, resolution_label: &str) -> BTreeSet<String> {
    let mut names = BTreeSet::new();
    let segments: Vec<&str> = task_local.split('.').collect();
    let halo = segments
        .iter()
        .position(|segment| is_halo_marker(segment));

    match halo {
        Some(idx) if segments[idx] == "halo0" => {
            names.insert(task_local.to_string());
            if task_local.contains("tile7") {
                names.insert(task_local.replace("tile7", "tile1"));
            }
        }
        Some(idx) => {
            let mut rewritten = segments.clone();
            rewritten[idx] = "halo4";
            names.insert(rewritten.join("."));
            let mut stripped = segments.clone();
            stripped.remove(idx);
            names.insert(stripped.join("."));
        }
        None => {
            let (stem, suffix) = match task_local.strip_suffix(".nc") {
                Some(stem) => (stem, ".nc"),
                None => (task_local, ""),
            };
            let prefixed = format!("{resolution_label}.{stem}.halo0{suffix}");
            if prefixed.contains("tile7") {
                names.insert(prefixed.replace("tile7", "tile1"));
            }
            names.insert(prefixed);
        }
    }
    names
}

fn is_halo_marker(segment: &str) -> bool {
    segment
        .strip_prefix("halo")
        .is_some_and(|rest| !rest.is_empty() && rest.chars().all(|ch| ch.is_ascii_digit()))
}

/// Build link specs for a set of task-local artifacts, one spec per
/// canonical name.
pub fn link_specs(files: &[PathBuf], resolution_label: &str) -> Vec<LinkSpec> {
    let mut specs = Vec::new();
    for file in files {
        let Some(name) = file.file_name().and_then(|name| name.to_str()) else {
            continue;
        };
        for canonical in canonical_names(name, resolution_label) {
            specs.push(LinkSpec {
                name: canonical,
                target: file.clone(),
            });
        }
    }
    specs
}

/// Idempotently publish symbolic links into `destination_dir`. A stale
/// symlink of the same name is replaced; a regular file of the same name is
/// a configuration error and is never removed. File content is never
/// followed or copied.
pub fn publish(destination_dir: &Path, specs: &[LinkSpec]) -> Result<(), FixFileError> {
    fs::create_dir_all(destination_dir).map_err(|source| FixFileError::CreateDir {
        path: destination_dir.display().to_string(),
        source,
    })?;
    for spec in specs {
        let link = destination_dir.join(&spec.name);
        match fs::symlink_metadata(&link) {
            Ok(metadata) if metadata.file_type().is_symlink() => {
                fs::remove_file(&link).map_err(|source| FixFileError::RemoveLink {
                    path: link.display().to_string(),
                    source,
                })?;
            }
            Ok(_) => {
                return Err(FixFileError::DestinationConflict {
                    path: link.display().to_string(),
                });
            }
            Err(_) => {}
        }
        println!("Linking {} -> {}", link.display(), spec.target.display());
        std::os::unix::fs::symlink(&spec.target, &link).map_err(|source| {
            FixFileError::CreateLink {
                link: link.display().to_string(),
                target: spec.target.display().to_string(),
                source,
            }
        })?;
    }
    Ok(())
}

/// The `.nc` artifacts in `dir` whose names start with `prefix`, sorted by
/// name. Replaces shell-style globbing for `<CRES>*.nc`.
pub fn netcdf_files_with_prefix(dir: &Path, prefix: &str) -> Result<Vec<PathBuf>, FixFileError> {
    let entries = fs::read_dir(dir).map_err(|source| FixFileError::ReadDir {
        path: dir.display().to_string(),
        source,
    })?;
    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| FixFileError::ReadDir {
            path: dir.display().to_string(),
            source,
        })?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        if name.starts_with(prefix) && name.ends_with(".nc") {
            files.push(entry.path());
        }
    }
    files.sort();
    Ok(files)
}
