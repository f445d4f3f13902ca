//! Run report returned by populate, copy and inspect.

use std::fmt;

/// Operation a [`Report`] belongs to.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ReportKind {
    Populate,
    Copy,
    Inspect,
}

impl ReportKind {
    fn prefix(&self) -> &'static str {
        match self {
            ReportKind::Populate => "[POPULATE]",
            ReportKind::Copy => "[COPY]",
            ReportKind::Inspect => "[INSPECT]",
        }
    }
}

/// Counters of one successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub kind: ReportKind,
    /// Directories visited (copy, inspect) or implied by the written paths (populate).
    pub dirs: u64,
    /// Regular files written (populate, copy) or inspected.
    pub files: u64,
    /// Bytes written (populate, copy) or total size of inspected files.
    pub bytes: u64,
}

impl Report {
    pub fn new(kind: ReportKind) -> Self {
        Self {
            kind,
            dirs: 0,
            files: 0,
            bytes: 0,
        }
    }

    pub(crate) fn add_dir(&mut self) {
        self.dirs += 1;
    }

    pub(crate) fn add_file(&mut self, bytes: u64) {
        self.files += 1;
        self.bytes += bytes;
    }

    /// Human-readable one-line summary.
    pub fn format(&self, prefix: &str) -> String {
        format!(
            "{prefix} dirs={} files={} bytes={}",
            self.dirs, self.files, self.bytes
        )
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format(self.kind.prefix()))
    }
}
