use std::path::{Component, Path, PathBuf};

use crate::core::Result;

/// Resolves `.` and `..` components and drops redundant separators.
/// `..` never climbs above the root of an absolute path.
pub fn normalize<P: AsRef<Path>>(path: P) -> PathBuf {
    let mut result = PathBuf::new();
    for component in path.as_ref().components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if let Some(parent) = result.parent() {
                    result = parent.to_path_buf();
                }
            }
            _ => result.push(component),
        }
    }
    result
}

/// Turns any inner path (absolute or relative to the VFS root) into its inner absolute form.
pub fn to_inner<P: AsRef<Path>>(path: P) -> PathBuf {
    normalize(Path::new("/").join(path))
}

pub fn is_virtual_root<P: AsRef<Path>>(path: P) -> bool {
    to_inner(path) == Path::new("/")
}

/// `path` relative to `root`, without a leading `/`. Names are kept byte for byte.
pub fn relative_to(root: &Path, path: &Path) -> PathBuf {
    let stripped = path.strip_prefix(root).unwrap_or(path);
    stripped
        .components()
        .filter_map(|c| match c {
            Component::Normal(name) => Some(name),
            _ => None,
        })
        .collect()
}

/// Normalized relative key of a tree path, or `None` if it is empty or resolves to the root.
pub fn relative_key<P: AsRef<Path>>(path: P) -> Option<PathBuf> {
    let key = relative_to(Path::new("/"), &to_inner(path));
    if key.as_os_str().is_empty() { None } else { Some(key) }
}

/// Removes a file or an empty directory on the host.
pub fn rm_on_host<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();
    let meta = std::fs::symlink_metadata(path)?;
    if meta.is_dir() {
        std::fs::remove_dir(path)?;
    } else {
        std::fs::remove_file(path)?;
    }
    Ok(())
}
