//! Freeform pasted mapping lines (`filename<sep>password<sep optional>`).

use super::normalize::clean_field;
use super::{CredentialRecord, RejectedLine};

/// Separators tried in order for each line.
pub const FALLBACK_DELIMITERS: [char; 4] = [';', ',', '\t', '|'];

/// Split one line into `(filename, password)`.
///
/// The line is split on `;` first; when that yields fewer than two non-empty
/// fields the next separator in [`FALLBACK_DELIMITERS`] is tried. The first
/// two non-empty fields win. Returns `None` for a malformed line.
pub fn split_line(line: &str) -> Option<(String, String)> {
    FALLBACK_DELIMITERS.iter().find_map(|&delimiter| {
        let mut fields = line
            .split(delimiter)
            .map(clean_field)
            .filter(|field| !field.is_empty());
        let filename = fields.next()?;
        let password = fields.next()?;
        Some((filename, password))
    })
}

pub(crate) fn parse(text: &str) -> (Vec<CredentialRecord>, Vec<RejectedLine>) {
    let mut records = Vec::new();
    let mut rejected = Vec::new();

    for (index, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        match split_line(line).and_then(|(filename, password)| {
            CredentialRecord::from_fields(&filename, &password)
        }) {
            Some(record) => records.push(record),
            None => {
                tracing::warn!("Skipping malformed mapping line {}: {:?}", index + 1, line);
                rejected.push(RejectedLine {
                    line: index + 1,
                    content: line.to_string(),
                });
            }
        }
    }

    (records, rejected)
}
