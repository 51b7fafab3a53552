use std::fs::File;
use std::path::Path;

use time::{Date, OffsetDateTime};

use crate::error::CheckResult;
use crate::prober::is_valid_status;
use crate::types::{ProbeResult, RunReport, Scheme};

const SEPARATOR: &str = "-----------------------";

/// Default number of lines pushed per notification.
pub const DEFAULT_BATCH_SIZE: usize = 10;

/// Today's local date, or the UTC date when the local offset is unknown.
pub fn today() -> Date {
    OffsetDateTime::now_local()
        .unwrap_or_else(|_| OffsetDateTime::now_utc())
        .date()
}

/// Run banner: the date (`YYYY-MM-DD`) framed by separator rows.
pub fn banner(date: Date) -> String {
    format!("{SEPARATOR}\n{date}\n{SEPARATOR}\n")
}

/// One report line for a reportable probe outcome.
pub fn format_line(scheme: Scheme, name: &str, status: u16) -> String {
    format!("{scheme} {name} {status}\n")
}

/// Banner followed by one line per reportable result, in result order.
pub fn report_lines(date: Date, results: &[ProbeResult]) -> Vec<String> {
    let mut lines = vec![banner(date)];
    lines.extend(results.iter().filter_map(|r| match r.status {
        Some(code) if is_valid_status(code) => Some(format_line(r.scheme, &r.server_name, code)),
        _ => None,
    }));
    lines
}

/// Split `lines` into consecutive groups of at most `size`, preserving order.
///
/// An empty input yields no groups. A `size` of 0 is treated as 1.
pub fn chunk<T: Clone>(lines: &[T], size: usize) -> Vec<Vec<T>> {
    lines.chunks(size.max(1)).map(<[T]>::to_vec).collect()
}

/// Write `report` as pretty JSON to `path`, replacing any existing file.
pub fn write_report_json(path: &Path, report: &RunReport) -> CheckResult<()> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, report)?;
    Ok(())
}
