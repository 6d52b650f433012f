//! Tabular output of requirement records

use std::{
    io,
    path::{Path, PathBuf},
};

use tracing::instrument;

use crate::domain::{Quoting, RequirementRecord};

/// Encodes records as CSV.
///
/// An empty record list encodes to an empty string, without a header.
/// Otherwise the first line is the comma-joined header and each following
/// line holds one record, every value wrapped in double quotes. Lines are
/// joined with `\n` and there is no trailing newline.
///
/// With [`Quoting::Bare`] values are not escaped, so a value containing `"`
/// corrupts its row.
///
/// ```
/// use reqex::{
///     domain::{CandidateRecord, ClauseId, Quoting, RequirementRecord, DEFAULT_HEADER},
///     storage::table::encode_csv,
/// };
///
/// let record = RequirementRecord::new(
///     CandidateRecord {
///         context_line: "Heading".to_string(),
///         identifier: ClauseId::main("40.").unwrap(),
///         body_text: "The operator must comply.".to_string(),
///     },
///     "must".to_string(),
/// );
///
/// let header = DEFAULT_HEADER.map(String::from);
/// assert_eq!(
///     encode_csv(&[record], &header, Quoting::Bare),
///     "section,clause number,text,requirement type\n\
///      \"Heading\",\"40.\",\"The operator must comply.\",\"must\""
/// );
/// ```
#[must_use]
pub fn encode_csv(records: &[RequirementRecord], header: &[String; 4], quoting: Quoting) -> String {
    if records.is_empty() {
        return String::new();
    }

    let mut lines = Vec::with_capacity(records.len() + 1);
    lines.push(header.join(","));
    lines.extend(records.iter().map(|record| {
        record
            .values()
            .iter()
            .map(|value| quote(value, quoting))
            .collect::<Vec<_>>()
            .join(",")
    }));
    lines.join("\n")
}

fn quote(value: &str, quoting: Quoting) -> String {
    match quoting {
        Quoting::Bare => format!("\"{value}\""),
        Quoting::Escaped => {
            let escaped = value.replace('"', "\"\"");
            format!("\"{escaped}\"")
        }
    }
}

/// Encodes records as a pretty-printed JSON array.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn encode_json(records: &[RequirementRecord]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(records)
}

/// Writes the encoded table as the complete content of `path`, replacing any
/// existing file.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
#[instrument(level = "debug", skip(contents), fields(bytes = contents.len()))]
pub fn write_output(path: &Path, contents: &str) -> Result<(), WriteError> {
    std::fs::write(path, contents).map_err(|source| WriteError {
        path: path.to_path_buf(),
        source,
    })
}

/// Error returned when the output file cannot be written.
#[derive(Debug, thiserror::Error)]
#[error("Failed to write {}: {source}", path.display())]
pub struct WriteError {
    path: PathBuf,
    source: io::Error,
}
