//! This module provides a virtual filesystem (VFS) implementation that maps to a memory storage.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::anyhow;

use crate::core::{FsBackend, Metadata, Result, utils};
use crate::{Entry, EntryType};

/// A virtual file system (VFS) implementation that stores file and directory entries in memory
/// using a hierarchical map structure.
///
/// ### Internal state
///
/// * `entries` - the core storage map that holds all virtual file and directory entries.
///   - Key: `PathBuf` representing **inner absolute normalized paths** (always start with `/`).
///   - Value: `Entry` struct containing type, modification time and (for files) content.
///
/// ### Invariants
///
/// 1. **Root existence**: The path `/` is always present in `entries` and has type `Directory`.
/// 2. **Path normalization**: All keys in `entries` are normalized
///    (no `..`, no `//`, trailing `/` removed except for root).
/// 3. **Parent consistency**: For any entry at `/a/b/c`, there must exist an entry `/a/b` of type
///    `Directory` (except for the root `/`).
///
/// There is no permission model: the directory mode passed to `mkdir_all()` is ignored.
///
/// ### Thread Safety
///
/// This struct is **not thread‑safe**. If concurrent access is required, wrap it in
/// a synchronization primitive (e.g., `Arc<Mutex<MapFS>>`) at the application level.
///
/// ### Example
///
/// ```
/// use vfs_scaffold::{FsBackend, MapFS};
///
/// let mut fs = MapFS::new();
/// fs.mkdir_all("/docs", 0o755).unwrap();
/// let mut file = fs.create("/docs/note.txt").unwrap();
/// fs.write_all(&mut file, b"Hello").unwrap();
///
/// assert_eq!(fs.read("docs/note.txt").unwrap(), b"Hello");
/// ```
#[derive(Debug, Clone)]
pub struct MapFS {
    entries: BTreeMap<PathBuf, Entry>, // inner absolute normalized paths
}

/// Open file of a [`MapFS`]. Holds the inner path only; content lives in the map.
#[derive(Debug)]
pub struct MapHandle {
    path: PathBuf,
}

impl MapHandle {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl MapFS {
    /// Creates new MapFS instance containing only the root directory.
    pub fn new() -> Self {
        let mut entries = BTreeMap::new();
        entries.insert(PathBuf::from("/"), Entry::new(EntryType::Directory));
        Self { entries }
    }

    /// Number of entries, the root included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if only the root directory exists.
    pub fn is_empty(&self) -> bool {
        self.entries.len() == 1
    }

    fn entry(&self, inner: &Path) -> Result<&Entry> {
        self.entries
            .get(inner)
            .ok_or_else(|| anyhow!("{} does not exist", inner.display()))
    }
}

impl Default for MapFS {
    fn default() -> Self {
        Self::new()
    }
}

impl FsBackend for MapFS {
    type Handle = MapHandle;

    /// Checks if a `path` exists in the VFS.
    fn exists<P: AsRef<Path>>(&self, path: P) -> bool {
        self.entries.contains_key(&utils::to_inner(path))
    }

    /// Checks if `path` is a directory.
    fn is_dir<P: AsRef<Path>>(&self, path: P) -> Result<bool> {
        Ok(self.entry(&utils::to_inner(path))?.is_dir())
    }

    /// Checks if `path` is a regular file.
    fn is_file<P: AsRef<Path>>(&self, path: P) -> Result<bool> {
        Ok(self.entry(&utils::to_inner(path))?.is_file())
    }

    /// Lists only the **immediate children** of the given directory.
    ///
    /// # Notes
    /// - **Excludes root:** The input directory itself is not included in the output.
    /// - **Error handling:** If `path` does not exist or is a file, an error is returned.
    fn ls<P: AsRef<Path>>(&self, path: P) -> Result<Vec<PathBuf>> {
        let inner_path = utils::to_inner(path);
        if !self.entry(&inner_path)?.is_dir() {
            return Err(anyhow!("{} is not a directory", inner_path.display()));
        }
        let component_count = inner_path.components().count() + 1;
        Ok(self
            .entries
            .range(inner_path.clone()..)
            .map(|(pb, _)| pb)
            .take_while(|pb| pb.starts_with(&inner_path))
            .filter(|pb| pb.components().count() == component_count)
            .cloned()
            .collect())
    }

    /// Creates directory and all its parents (if needed).
    /// * `path` - inner vfs path.
    /// * `mode` - ignored.
    fn mkdir_all<P: AsRef<Path>>(&mut self, path: P, _mode: u32) -> Result<()> {
        let inner_path = utils::to_inner(path);

        let mut built = PathBuf::new();
        for component in inner_path.components() {
            built.push(component);
            match self.entries.get(&built) {
                Some(entry) if entry.is_dir() => continue,
                Some(_) => {
                    return Err(anyhow!(
                        "path '{}' exists but is not a directory",
                        built.display()
                    ));
                }
                None => {
                    self.entries
                        .insert(built.clone(), Entry::new(EntryType::Directory));
                }
            }
        }

        Ok(())
    }

    /// Opens an existing file or directory.
    fn open<P: AsRef<Path>>(&self, path: P) -> Result<Self::Handle> {
        let inner = utils::to_inner(path);
        self.entry(&inner)?;
        Ok(MapHandle { path: inner })
    }

    /// Creates a new empty file or truncates an existing one.
    /// The parent directory must already exist.
    fn create<P: AsRef<Path>>(&mut self, path: P) -> Result<Self::Handle> {
        let inner = utils::to_inner(path);
        if utils::is_virtual_root(&inner) {
            return Err(anyhow!("invalid path: the root is a directory"));
        }
        if let Some(parent) = inner.parent() {
            match self.entries.get(parent) {
                Some(entry) if entry.is_dir() => {}
                Some(_) => return Err(anyhow!("{} is not a directory", parent.display())),
                None => return Err(anyhow!("{} does not exist", parent.display())),
            }
        }
        match self.entries.get_mut(&inner) {
            Some(entry) if entry.is_dir() => {
                return Err(anyhow!("{} is a directory", inner.display()));
            }
            Some(entry) => entry.truncate(),
            None => {
                self.entries
                    .insert(inner.clone(), Entry::new(EntryType::File));
            }
        }
        Ok(MapHandle { path: inner })
    }

    /// Appends `content` to the file behind `handle`.
    fn write_all(&mut self, handle: &mut Self::Handle, content: &[u8]) -> Result<usize> {
        let entry = self
            .entries
            .get_mut(&handle.path)
            .ok_or_else(|| anyhow!("{} does not exist", handle.path.display()))?;
        if entry.is_dir() {
            return Err(anyhow!("{} is a directory", handle.path.display()));
        }
        entry.append_content(content);
        Ok(content.len())
    }

    /// Reads the entire contents of a file into a byte vector.
    ///
    /// # Returns
    /// * `Ok(Vec<u8>)` - File content; empty for empty files.
    /// * `Err(anyhow::Error)` - If the file does not exist or is a directory.
    fn read<P: AsRef<Path>>(&self, path: P) -> Result<Vec<u8>> {
        let inner = utils::to_inner(path);
        let entry = self.entry(&inner)?;
        if entry.is_dir() {
            return Err(anyhow!("{} is a directory", inner.display()));
        }
        Ok(entry.content().cloned().unwrap_or_default())
    }

    fn stat(&self, handle: &Self::Handle) -> Result<Metadata> {
        let entry = self.entry(&handle.path)?;
        Ok(Metadata {
            size: entry.size(),
            modified: entry.modified(),
            is_dir: entry.is_dir(),
        })
    }
}
