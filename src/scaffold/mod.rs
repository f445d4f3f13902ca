//! Materialize, populate, copy and inspect file trees through any [`FsBackend`].

mod copy;
mod inspect;
mod materialize;
mod populate;
mod report;
mod sink;
#[cfg(test)]
mod testing;

pub use populate::TreeContents;
pub use report::{Report, ReportKind};
pub use sink::{ReportSink, TracingSink};

use crate::config::ScaffoldConfig;
use crate::core::FsBackend;
use crate::error::Result;

/// Mode of directories created while materializing files (`rwxr-xr-x`).
pub const DEFAULT_DIR_MODE: u32 = 0o755;

/// Scaffolding operations with their settings applied.
///
/// ```
/// use vfs_scaffold::{FsBackend, MapFS, Scaffolder, TreeContents};
///
/// let mut contents = TreeContents::new();
/// contents.insert("src/main.rs".into(), b"fn main() {}".to_vec());
///
/// let mut fs = MapFS::new();
/// let report = Scaffolder::new().populate(&mut fs, &contents).unwrap();
/// assert_eq!(report.files, 1);
/// assert!(fs.is_dir("src").unwrap());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scaffolder {
    dir_mode: u32,
    include_contents: bool,
}

impl Default for Scaffolder {
    fn default() -> Self {
        Self {
            dir_mode: DEFAULT_DIR_MODE,
            include_contents: false,
        }
    }
}

impl Scaffolder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &ScaffoldConfig) -> Self {
        Self {
            dir_mode: config.dir_mode,
            include_contents: config.include_contents,
        }
    }

    /// Mode for directories created by `materialize`. Ignored by backends without permissions.
    pub fn with_dir_mode(mut self, mode: u32) -> Self {
        self.dir_mode = mode;
        self
    }

    /// Whether `inspect` reports file contents.
    pub fn with_contents(mut self, include: bool) -> Self {
        self.include_contents = include;
        self
    }

    pub fn dir_mode(&self) -> u32 {
        self.dir_mode
    }

    pub fn include_contents(&self) -> bool {
        self.include_contents
    }

    /// Creates the parent directories of `full_path` and writes `content` to it,
    /// replacing any existing file.
    pub fn materialize<F: FsBackend>(
        &self,
        fs: &mut F,
        full_path: &str,
        content: &[u8],
    ) -> Result<()> {
        materialize::materialize_with(fs, full_path, content, self.dir_mode)
    }

    /// Like [`materialize`](Self::materialize) with the path given as segments.
    pub fn materialize_parts<F: FsBackend>(
        &self,
        fs: &mut F,
        content: &[u8],
        parts: &[&str],
    ) -> Result<()> {
        materialize::materialize_parts_with(fs, content, parts, self.dir_mode)
    }

    /// Materializes every entry of `contents`. Stops at the first failure.
    pub fn populate<F: FsBackend>(&self, fs: &mut F, contents: &TreeContents) -> Result<Report> {
        populate::populate_with(fs, contents, self.dir_mode)
    }

    /// Copies every regular file of `src` to the same path in `dest`.
    pub fn copy_tree<S: FsBackend, D: FsBackend>(&self, src: &S, dest: &mut D) -> Result<Report> {
        copy::copy_tree_with(src, dest, self.dir_mode)
    }

    /// Describes every entry of `fs` to `sink`.
    pub fn inspect<F, K>(&self, fs: &F, sink: &mut K) -> Result<Report>
    where
        F: FsBackend,
        K: ReportSink + ?Sized,
    {
        inspect::inspect_with(fs, sink, self.include_contents)
    }
}

/// Creates the parent directories of `full_path` with [`DEFAULT_DIR_MODE`] and writes
/// `content` to it, replacing any existing file.
pub fn materialize<F: FsBackend>(fs: &mut F, full_path: &str, content: &[u8]) -> Result<()> {
    Scaffolder::new().materialize(fs, full_path, content)
}

/// [`materialize`] with the path given as segments joined by `/`.
pub fn materialize_parts<F: FsBackend>(fs: &mut F, content: &[u8], parts: &[&str]) -> Result<()> {
    Scaffolder::new().materialize_parts(fs, content, parts)
}

/// Materializes every entry of `contents`. Stops at the first failure.
pub fn populate<F: FsBackend>(fs: &mut F, contents: &TreeContents) -> Result<Report> {
    Scaffolder::new().populate(fs, contents)
}

/// Copies every regular file of `src` to the same relative path in `dest`.
pub fn copy_tree<S: FsBackend, D: FsBackend>(src: &S, dest: &mut D) -> Result<Report> {
    Scaffolder::new().copy_tree(src, dest)
}

/// Describes every entry of `fs` to `sink`, optionally with file contents.
pub fn inspect<F, K>(fs: &F, sink: &mut K, include_contents: bool) -> Result<Report>
where
    F: FsBackend,
    K: ReportSink + ?Sized,
{
    Scaffolder::new().with_contents(include_contents).inspect(fs, sink)
}
