use std::collections::{BTreeMap, BTreeSet};

use tracing::{info, warn};

use super::materialize::materialize_with;
use super::report::{Report, ReportKind};
use crate::core::{FsBackend, utils};
use crate::error::{Result, ScaffoldError};

/// A directory tree expressed as file contents keyed by relative `/`-separated path.
pub type TreeContents = BTreeMap<String, Vec<u8>>;

/// Materializes every entry of `contents`, stopping at the first failure.
///
/// The key set is validated up front: an invalid key or a key that is also a parent
/// directory of another key rejects the whole call before anything is written.
pub(crate) fn populate_with<F: FsBackend>(
    fs: &mut F,
    contents: &TreeContents,
    mode: u32,
) -> Result<Report> {
    let keys = check_keys(contents)?;

    let mut report = Report::new(ReportKind::Populate);
    report.dirs = implied_dirs(&keys).len() as u64;

    for (path, content) in contents {
        if let Err(e) = materialize_with(fs, path, content, mode) {
            warn!(path = %path, error = %e, "populate aborted");
            return Err(e);
        }
        report.add_file(content.len() as u64);
    }

    info!(dirs = report.dirs, files = report.files, bytes = report.bytes, "populated tree");
    Ok(report)
}

/// Normalizes every key and rejects file/directory prefix conflicts.
fn check_keys(contents: &TreeContents) -> Result<BTreeSet<String>> {
    let mut keys = BTreeSet::new();
    for path in contents.keys() {
        let key = utils::relative_key(path)
            .ok_or_else(|| ScaffoldError::InvalidPath(path.clone()))?;
        keys.insert(key.to_string_lossy().into_owned());
    }

    for key in &keys {
        let prefix = format!("{key}/");
        // every key below `prefix` sorts directly after it
        if let Some(nested) = keys.range(prefix.clone()..).next() {
            if nested.starts_with(&prefix) {
                return Err(ScaffoldError::PathConflict {
                    file: key.clone(),
                    nested: nested.clone(),
                });
            }
        }
    }
    Ok(keys)
}

fn implied_dirs(keys: &BTreeSet<String>) -> BTreeSet<&str> {
    let mut dirs = BTreeSet::new();
    for key in keys {
        let mut rest = key.as_str();
        while let Some((parent, _)) = rest.rsplit_once('/') {
            if !dirs.insert(parent) {
                break;
            }
            rest = parent;
        }
    }
    dirs
}
