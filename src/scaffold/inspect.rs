use chrono::{DateTime, Utc};
use tracing::{info, warn};

use super::copy::lift;
use super::report::{Report, ReportKind};
use super::sink::ReportSink;
use crate::core::{DirEntry, FsBackend, Metadata};
use crate::error::{Op, Result, ScaffoldError};

/// Walks `fs` and describes every entry to `sink`. Read-only.
///
/// Per entry: a blank record, `is_dir`, `path`, `name`; for files also `size`, `modified`
/// and, with `include_contents`, the content decoded as lossy UTF-8.
/// An open, stat or read failure is emitted as `error = ...` and then returned.
pub(crate) fn inspect_with<F, K>(fs: &F, sink: &mut K, include_contents: bool) -> Result<Report>
where
    F: FsBackend,
    K: ReportSink + ?Sized,
{
    let mut report = Report::new(ReportKind::Inspect);

    let walked = fs.walk("/", &mut |entry| {
        sink.emit(&[]);
        sink.emit(&[&"is_dir =", &entry.is_dir()]);
        sink.emit(&[&"path =", &entry.path().display()]);
        sink.emit(&[&"name =", &entry.name().to_string_lossy()]);

        if entry.is_dir() {
            report.add_dir();
            return Ok(());
        }

        let meta = emitted(&mut *sink, stat_entry(fs, entry))?;
        let modified: DateTime<Utc> = meta.modified.into();
        sink.emit(&[&"size =", &meta.size]);
        sink.emit(&[&"modified =", &modified.to_rfc3339()]);

        if include_contents {
            let content = emitted(
                &mut *sink,
                fs.read(entry.path())
                    .map_err(|e| ScaffoldError::io(Op::Read, entry.path(), e)),
            )?;
            sink.emit(&[&"contents =", &String::from_utf8_lossy(&content)]);
        }

        report.add_file(meta.size);
        Ok(())
    });

    if let Err(e) = walked {
        let e = lift(e, "/");
        warn!(error = %e, "inspect aborted");
        return Err(e);
    }

    info!(dirs = report.dirs, files = report.files, bytes = report.bytes, "inspected tree");
    Ok(report)
}

/// Opens `entry` and stats it; the handle is released before returning.
fn stat_entry<F: FsBackend>(fs: &F, entry: &DirEntry) -> Result<Metadata> {
    let handle = fs
        .open(entry.path())
        .map_err(|e| ScaffoldError::io(Op::Open, entry.path(), e))?;
    fs.stat(&handle)
        .map_err(|e| ScaffoldError::io(Op::Stat, entry.path(), e))
}

fn emitted<K: ReportSink + ?Sized, T>(sink: &mut K, result: Result<T>) -> Result<T> {
    if let Err(e) = &result {
        sink.emit(&[&"error =", e]);
    }
    result
}
