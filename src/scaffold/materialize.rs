use std::path::Path;

use tracing::debug;

use crate::core::{FsBackend, utils};
use crate::error::{Op, Result, ScaffoldError};

/// Ensures the parent chain of `full_path` exists (created with `mode`), then creates or
/// truncates the file and writes `content` to it.
///
/// No rollback: directories created before a failing write stay in place.
pub(crate) fn materialize_with<F: FsBackend, P: AsRef<Path>>(
    fs: &mut F,
    full_path: P,
    content: &[u8],
    mode: u32,
) -> Result<()> {
    let full_path = full_path.as_ref();
    let key = utils::relative_key(full_path)
        .ok_or_else(|| ScaffoldError::InvalidPath(full_path.display().to_string()))?;

    if let Some(parent) = key.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs.mkdir_all(parent, mode)
            .map_err(|e| ScaffoldError::io(Op::Mkdir, parent, e))?;
    }

    let mut handle = fs
        .create(&key)
        .map_err(|e| ScaffoldError::io(Op::Create, &key, e))?;
    fs.write_all(&mut handle, content)
        .map_err(|e| ScaffoldError::io(Op::Write, &key, e))?;

    debug!(path = %key.display(), bytes = content.len(), "materialized");
    Ok(())
}

/// Joins `parts` with `/` and materializes the result.
pub(crate) fn materialize_parts_with<F: FsBackend>(
    fs: &mut F,
    content: &[u8],
    parts: &[&str],
    mode: u32,
) -> Result<()> {
    materialize_with(fs, &parts.join("/"), content, mode)
}
