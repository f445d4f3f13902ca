//! This module provides a virtual filesystem (VFS) implementation that maps to a real directory
//! on the host system. It allows file and directory operations (create, read, stat, walk)
//! within a controlled root path.
//!
//! ### Key Features:
//! - **Isolated root**: All operations are confined to a designated root directory (self.root).
//! - **Path normalization**: Automatically resolves . and .. components and removes
//!   trailing slashes. `..` never climbs above the root.
//! - **Host view**: Content that already exists under the root is visible to the VFS.
//! - **Auto‑cleanup**: Optionally removes the artifacts it created on Drop
//!   (when is_auto_clean = true).

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::anyhow;
use tracing::{trace, warn};
use walkdir::WalkDir;

use crate::core::{DirEntry, DirEntryType, FsBackend, Metadata, Result, utils};

/// A virtual filesystem (VFS) implementation that maps to a real directory on the host system.
///
/// `DirFS` provides an isolated, path‑normalized view of a portion of the filesystem, rooted at a
/// designated absolute path (`root`).
///
/// ### Usage notes:
/// - `DirFS` does not follow symlinks; `walk()` skips them along with other special files.
/// - Not thread‑safe (wrap in `Mutex` if needed).
/// - Errors are returned via `anyhow::Result`; host I/O errors keep their `std::io::Error`.
///
/// ### Example:
/// ```
/// use vfs_scaffold::{DirFS, FsBackend};
///
/// let root = std::env::temp_dir().join("vfs_scaffold_doc");
///
/// let mut fs = DirFS::new(&root).unwrap();
/// fs.set_auto_clean(true);
/// fs.mkdir_all("/docs", 0o755).unwrap();
/// let mut file = fs.create("/docs/note.txt").unwrap();
/// fs.write_all(&mut file, b"Hello").unwrap();
/// assert!(fs.exists("/docs/note.txt"));
/// ```
#[derive(Debug)]
pub struct DirFS {
    root: PathBuf,                      // host-related absolute normalized path
    created: Vec<PathBuf>,              // host-related absolute paths, creation order
    created_root_parents: Vec<PathBuf>, // host-related absolute normalized paths
    is_auto_clean: bool,
}

/// Open file of a [`DirFS`].
#[derive(Debug)]
pub struct DirHandle {
    path: PathBuf, // host path
    file: File,
}

impl DirHandle {
    pub fn host_path(&self) -> &Path {
        &self.path
    }
}

impl DirFS {
    /// Creates a new DirFS instance with the root directory at `root`.
    /// * `root` is an absolute host path. If it does not exist it will be created
    ///   together with its missing parents.
    ///
    /// If `root` is empty, not absolute or not a directory, error returns.
    /// By default, the `is_auto_clean` flag is set to `false`.
    pub fn new<P: AsRef<Path>>(root: P) -> Result<Self> {
        let root = root.as_ref();

        if root.as_os_str().is_empty() {
            return Err(anyhow!("invalid root path: empty"));
        }
        if root.is_relative() {
            return Err(anyhow!("the root path must be absolute"));
        }
        if root.exists() && !root.is_dir() {
            return Err(anyhow!("{:?} is not a directory", root));
        }

        let root = utils::normalize(root);

        let mut created_root_parents = Vec::new();
        if !std::fs::exists(&root)? {
            created_root_parents.extend(Self::mkdir_host(&root, crate::DEFAULT_DIR_MODE)?);
        }

        Ok(Self {
            root,
            created: Vec::new(),
            created_root_parents,
            is_auto_clean: false,
        })
    }

    /// Returns root path related to the host file system.
    pub fn root(&self) -> &Path {
        self.root.as_path()
    }

    /// Changes auto-clean flag.
    /// If auto-clean flag is true all artifacts created through this vfs
    /// will be removed on drop. Pre-existing content is never touched.
    pub fn set_auto_clean(&mut self, clean: bool) {
        self.is_auto_clean = clean;
    }

    /// Returns the path on the host system that matches the specified inner path.
    pub fn to_host<P: AsRef<Path>>(&self, inner_path: P) -> PathBuf {
        let inner = utils::to_inner(inner_path);
        match inner.strip_prefix("/") {
            Ok(relative) => self.root.join(relative),
            Err(_) => self.root.clone(),
        }
    }

    /// Removes the artifacts created through this vfs, newest first.
    /// Returns false if some of them could not be removed.
    pub fn cleanup(&mut self) -> bool {
        let mut is_ok = true;
        let mut kept = Vec::new();

        for host in self.created.drain(..).rev() {
            if !host.exists() {
                continue;
            }
            if let Err(e) = utils::rm_on_host(&host) {
                is_ok = false;
                warn!(path = %host.display(), error = %e, "unable to remove");
                kept.push(host);
            }
        }
        kept.reverse();
        self.created = kept;

        is_ok
    }

    /// Make host directories recursively, each missing one with `mode`.
    /// * `path` is an absolute host path.
    /// Returns vector of created directories.
    fn mkdir_host(path: &Path, mode: u32) -> Result<Vec<PathBuf>> {
        let mut created = Vec::new();
        let mut built = PathBuf::new();
        for component in path.components() {
            built.push(component);
            match std::fs::metadata(&built) {
                Ok(meta) if meta.is_dir() => continue,
                Ok(_) => {
                    return Err(anyhow!(
                        "path '{}' exists but is not a directory",
                        built.display()
                    ));
                }
                Err(_) => {
                    dir_builder(mode).create(&built)?;
                    created.push(built.clone());
                }
            }
        }
        Ok(created)
    }

    /// Metadata of the entry itself; links below the root are not followed.
    fn host_metadata(&self, inner: &Path) -> Result<std::fs::Metadata> {
        let host = self.to_host(inner);
        let meta = if utils::is_virtual_root(inner) {
            std::fs::metadata(&host)
        } else {
            std::fs::symlink_metadata(&host)
        };
        meta.map_err(|e| anyhow!(e).context(format!("{} does not exist", inner.display())))
    }
}

#[cfg(unix)]
fn dir_builder(mode: u32) -> std::fs::DirBuilder {
    use std::os::unix::fs::DirBuilderExt;

    let mut builder = std::fs::DirBuilder::new();
    builder.mode(mode);
    builder
}

#[cfg(not(unix))]
fn dir_builder(_mode: u32) -> std::fs::DirBuilder {
    std::fs::DirBuilder::new()
}

impl FsBackend for DirFS {
    type Handle = DirHandle;

    /// Checks if a `path` exists under the root. A link counts even if its target is missing.
    fn exists<P: AsRef<Path>>(&self, path: P) -> bool {
        self.host_metadata(path.as_ref()).is_ok()
    }

    fn is_dir<P: AsRef<Path>>(&self, path: P) -> Result<bool> {
        Ok(self.host_metadata(path.as_ref())?.is_dir())
    }

    fn is_file<P: AsRef<Path>>(&self, path: P) -> Result<bool> {
        Ok(self.host_metadata(path.as_ref())?.is_file())
    }

    /// Lists the immediate children of a directory as inner absolute paths.
    fn ls<P: AsRef<Path>>(&self, path: P) -> Result<Vec<PathBuf>> {
        let inner = utils::to_inner(path);
        if !self.is_dir(&inner)? {
            return Err(anyhow!("{} is not a directory", inner.display()));
        }
        let mut children = Vec::new();
        for entry in std::fs::read_dir(self.to_host(&inner))? {
            children.push(inner.join(entry?.file_name()));
        }
        Ok(children)
    }

    /// Creates directory and all its missing parents with `mode` (unix only).
    fn mkdir_all<P: AsRef<Path>>(&mut self, path: P, mode: u32) -> Result<()> {
        let inner = utils::to_inner(path);
        let mut built = self.root.clone();
        for component in inner.components().skip(1) {
            built.push(component);
            match std::fs::metadata(&built) {
                Ok(meta) if meta.is_dir() => continue,
                Ok(_) => {
                    return Err(anyhow!(
                        "path '{}' exists but is not a directory",
                        utils::relative_to(&self.root, &built).display()
                    ));
                }
                Err(_) => {
                    dir_builder(mode).create(&built)?;
                    self.created.push(built.clone());
                }
            }
        }
        Ok(())
    }

    fn open<P: AsRef<Path>>(&self, path: P) -> Result<Self::Handle> {
        let host = self.to_host(path);
        let file = File::open(&host)?;
        Ok(DirHandle { path: host, file })
    }

    /// Creates a file, truncating it if it exists. The parent must exist.
    fn create<P: AsRef<Path>>(&mut self, path: P) -> Result<Self::Handle> {
        if utils::is_virtual_root(&path) {
            return Err(anyhow!("invalid path: the root is a directory"));
        }
        let host = self.to_host(path);
        let is_new = !host.exists();
        let file = File::create(&host)?;
        if is_new {
            self.created.push(host.clone());
        }
        Ok(DirHandle { path: host, file })
    }

    fn write_all(&mut self, handle: &mut Self::Handle, content: &[u8]) -> Result<usize> {
        handle.file.write_all(content)?;
        Ok(content.len())
    }

    /// Reads the entire contents of a file into a byte vector.
    fn read<P: AsRef<Path>>(&self, path: P) -> Result<Vec<u8>> {
        let inner = utils::to_inner(path);
        if self.is_dir(&inner)? {
            // checks for existence too
            return Err(anyhow!("{} is a directory", inner.display()));
        }
        Ok(std::fs::read(self.to_host(&inner))?)
    }

    fn stat(&self, handle: &Self::Handle) -> Result<Metadata> {
        let meta = handle.file.metadata()?;
        Ok(Metadata {
            size: meta.len(),
            modified: meta.modified()?,
            is_dir: meta.is_dir(),
        })
    }

    /// Walks the host directory with `walkdir`, siblings sorted by file name.
    /// Symbolic links are not followed and, like other special files, not reported.
    fn walk<P: AsRef<Path>>(
        &self,
        root: P,
        visit: &mut dyn FnMut(&DirEntry) -> Result<()>,
    ) -> Result<()> {
        let inner_root = utils::to_inner(root);
        if !self.is_dir(&inner_root)? {
            return Err(anyhow!("{} is not a directory", inner_root.display()));
        }
        let host_root = self.to_host(&inner_root);

        let walker = WalkDir::new(&host_root)
            .min_depth(1)
            .follow_links(false)
            .sort_by_file_name();

        for entry in walker {
            let entry = entry?;
            let file_type = entry.file_type();
            let kind = if file_type.is_dir() {
                DirEntryType::Directory
            } else if file_type.is_file() {
                DirEntryType::File
            } else {
                trace!(path = %entry.path().display(), "skipping special file");
                continue;
            };
            visit(&DirEntry::new(
                utils::relative_to(&host_root, entry.path()),
                kind,
            ))?;
        }
        Ok(())
    }
}

impl Drop for DirFS {
    fn drop(&mut self) {
        if !self.is_auto_clean {
            return;
        }

        self.cleanup();

        let errors: Vec<_> = self
            .created_root_parents
            .iter()
            .rev()
            .filter_map(|p| utils::rm_on_host(p).err())
            .collect();
        if !errors.is_empty() {
            warn!(?errors, "failed to remove root parents");
        }

        self.created_root_parents.clear();
    }
}
