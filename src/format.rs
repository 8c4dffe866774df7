use itertools::Itertools;

use crate::parse::round_tenth;
use crate::table::{AggregationTable, Stat};

/// `name=min/avg/max`, every number with one fractional digit.
///
/// Names are expected to be UTF-8; invalid bytes render as U+FFFD, so two
/// distinct invalid names may print identically. Ordering still uses raw bytes.
pub fn format_record(name: &[u8], stat: &Stat) -> String {
    format!(
        "{}={:.1}/{:.1}/{:.1}",
        String::from_utf8_lossy(name),
        stat.min,
        round_tenth(stat.mean()),
        stat.max
    )
}

/// One formatted record per station, ascending by name bytes.
pub fn format_records(table: &AggregationTable) -> Vec<String> {
    table
        .iter_sorted()
        .map(|(name, stat)| format_record(name, stat))
        .collect()
}

/// The single output line: `{a=.., b=..}\n`.
pub fn render(records: &[String]) -> String {
    let out = records.iter().join(", ");
    format!("{{{out}}}\n")
}
