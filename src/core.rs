use std::ffi::OsStr;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

pub(crate) mod utils;

pub type Result<T> = std::result::Result<T, anyhow::Error>;

/// Kind of a directory entry produced by [`FsBackend::walk`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DirEntryType {
    File,
    Directory,
}

/// One entry visited during a walk.
///
/// `path` is relative to the walk root and holds the names exactly as the
/// backend stores them, including names that are not valid UTF-8.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    path: PathBuf,
    kind: DirEntryType,
}

impl DirEntry {
    pub fn new<P: AsRef<Path>>(path: P, kind: DirEntryType) -> DirEntry {
        DirEntry {
            path: path.as_ref().to_path_buf(),
            kind,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Final path segment.
    pub fn name(&self) -> &OsStr {
        self.path.file_name().unwrap_or(self.path.as_os_str())
    }

    pub fn kind(&self) -> DirEntryType {
        self.kind
    }

    pub fn is_file(&self) -> bool {
        self.kind == DirEntryType::File
    }

    pub fn is_dir(&self) -> bool {
        self.kind == DirEntryType::Directory
    }
}

impl fmt::Display for DirEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

/// Result of [`FsBackend::stat`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Metadata {
    pub size: u64,
    pub modified: SystemTime,
    pub is_dir: bool,
}

/// The capability set every backing store exposes.
///
/// Paths passed in are inner VFS paths: `/` separated, either absolute
/// (`/docs/a.txt`) or relative to the VFS root (`docs/a.txt`). Both forms
/// address the same entry.
pub trait FsBackend {
    /// An open file. Released when dropped.
    type Handle;

    /// Checks if a `path` exists in the VFS.
    fn exists<P: AsRef<Path>>(&self, path: P) -> bool;

    /// Checks if `path` is a directory. Errors if `path` does not exist.
    fn is_dir<P: AsRef<Path>>(&self, path: P) -> Result<bool>;

    /// Checks if `path` is a regular file. Errors if `path` does not exist.
    fn is_file<P: AsRef<Path>>(&self, path: P) -> Result<bool>;

    /// Lists the immediate children of the directory `path`, in no particular order.
    /// Yielded paths are inner absolute paths.
    fn ls<P: AsRef<Path>>(&self, path: P) -> Result<Vec<PathBuf>>;

    /// Creates directory `path` and all its missing parents.
    /// Existing directories are left untouched; an existing non-directory on the way is an error.
    fn mkdir_all<P: AsRef<Path>>(&mut self, path: P, mode: u32) -> Result<()>;

    /// Opens an existing entry for reading.
    fn open<P: AsRef<Path>>(&self, path: P) -> Result<Self::Handle>;

    /// Creates a file, truncating it if it already exists. The parent must exist.
    fn create<P: AsRef<Path>>(&mut self, path: P) -> Result<Self::Handle>;

    /// Writes the whole `content` through `handle`. Returns the number of bytes written.
    fn write_all(&mut self, handle: &mut Self::Handle, content: &[u8]) -> Result<usize>;

    /// Reads the entire contents of a file.
    fn read<P: AsRef<Path>>(&self, path: P) -> Result<Vec<u8>>;

    /// Returns metadata of the entry behind `handle`.
    fn stat(&self, handle: &Self::Handle) -> Result<Metadata>;

    /// Visits every entry below `root` depth-first, siblings in lexicographic order
    /// of their names, each directory before its children. `root` itself is not visited.
    ///
    /// The first error returned by `visit` stops the walk and is returned as is.
    fn walk<P: AsRef<Path>>(
        &self,
        root: P,
        visit: &mut dyn FnMut(&DirEntry) -> Result<()>,
    ) -> Result<()> {
        let root = utils::normalize(Path::new("/").join(root));
        if !self.is_dir(&root)? {
            return Err(anyhow::anyhow!("{} is not a directory", root.display()));
        }
        walk_sorted(self, &root, &root, visit)
    }
}

fn walk_sorted<F: FsBackend + ?Sized>(
    fs: &F,
    root: &Path,
    dir: &Path,
    visit: &mut dyn FnMut(&DirEntry) -> Result<()>,
) -> Result<()> {
    let mut children = fs.ls(dir)?;
    children.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    for child in children {
        let is_dir = fs.is_dir(&child)?;
        let kind = if is_dir {
            DirEntryType::Directory
        } else {
            DirEntryType::File
        };
        visit(&DirEntry::new(utils::relative_to(root, &child), kind))?;
        if is_dir {
            walk_sorted(fs, root, &child, visit)?;
        }
    }
    Ok(())
}
