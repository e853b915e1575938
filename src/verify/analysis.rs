//! Plain-text verdict summary with remediation guidance.

use std::fmt::Write;

use crate::records::{RecordKind, RecordStatus};

/// Everything the summary needs to know about one checked kind.
#[derive(Debug, Clone)]
pub(crate) struct AnalysisEntry {
    pub kind: RecordKind,
    pub status: RecordStatus,
    pub expected: String,
    pub query_name: String,
    pub raw_values: Vec<String>,
}

/// Build the human-readable analysis for a verification result.
///
/// One header line with the verified count, then one line per kind in
/// request order, with remediation guidance for anything not verified.
pub(crate) fn build_analysis(domain: &str, entries: &[AnalysisEntry]) -> String {
    let verified = entries
        .iter()
        .filter(|e| e.status == RecordStatus::Verified)
        .count();

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{verified} of {} records verified for {domain}.",
        entries.len()
    );

    for entry in entries {
        let _ = writeln!(out, "{}", describe(entry));
    }

    out
}

fn describe(entry: &AnalysisEntry) -> String {
    let record_word = if entry.kind == RecordKind::Mx {
        "an MX record"
    } else {
        "a TXT record"
    };
    match entry.status {
        RecordStatus::Verified => format!("{}: verified.", entry.kind),
        RecordStatus::NotFound => format!(
            "{}: not found; publish {record_word} at {} containing \"{}\".",
            entry.kind, entry.query_name, entry.expected
        ),
        RecordStatus::Unverified => format!(
            "{}: unverified; {} record(s) exist at {} but none contain \"{}\" (saw: {}).",
            entry.kind,
            entry.raw_values.len(),
            entry.query_name,
            entry.expected,
            entry.raw_values.join(", ")
        ),
    }
}
