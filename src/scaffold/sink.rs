//! Reporting sinks for the tree inspector.

use std::fmt::Display;

use tracing::info;

/// Destination for human-readable inspection records.
///
/// Each call is one record; an empty `values` slice is a blank separator.
pub trait ReportSink {
    fn emit(&mut self, values: &[&dyn Display]);
}

impl<F> ReportSink for F
where
    F: FnMut(&[&dyn Display]),
{
    fn emit(&mut self, values: &[&dyn Display]) {
        self(values)
    }
}

/// Collects one space-joined line per record.
impl ReportSink for Vec<String> {
    fn emit(&mut self, values: &[&dyn Display]) {
        self.push(join(values));
    }
}

/// Forwards every record to `tracing` at info level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl ReportSink for TracingSink {
    fn emit(&mut self, values: &[&dyn Display]) {
        info!(target: "vfs_scaffold::inspect", "{}", join(values));
    }
}

pub fn join(values: &[&dyn Display]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vec_sink_joins_values() {
        let mut lines: Vec<String> = Vec::new();
        lines.emit(&[]);
        lines.emit(&[&"size =", &42]);
        assert_eq!(lines, vec!["".to_string(), "size = 42".to_string()]);
    }

    #[test]
    fn closure_sink_receives_raw_values() {
        let mut counts = Vec::new();
        let mut sink = |values: &[&dyn Display]| counts.push(values.len());
        sink.emit(&[&"is_dir =", &true]);
        sink.emit(&[]);
        assert_eq!(counts, vec![2, 0]);
    }

    #[test]
    fn tracing_sink_does_not_panic_without_subscriber() {
        TracingSink.emit(&[&"path =", &"dir1/file.txt"]);
    }
}
