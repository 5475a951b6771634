//! Delimited tabular mappings (CSV/TSV uploads).
//!
//! The delimiter is guessed from the first rows, then row 1 is checked for
//! a recognizable header. Without a header every row is positional:
//! filename first, password second.

use super::normalize::clean_field;
use super::{CredentialRecord, RejectedLine};

/// Delimiters considered when guessing, in tie-break order.
const CANDIDATE_DELIMITERS: [char; 4] = [',', ';', '\t', '|'];

/// Rows inspected when guessing the delimiter.
const SNIFF_ROWS: usize = 10;

const FILENAME_LABELS: &[&str] = &[
    "filename",
    "file name",
    "file_name",
    "file",
    "檔名",
    "檔案名稱",
    "文件名",
    "文件名称",
];

const PASSWORD_LABELS: &[&str] = &["password", "passwd", "pwd", "密碼", "密码"];

/// Column positions found in a header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct HeaderColumns {
    filename: Option<usize>,
    password: Option<usize>,
}

pub(crate) fn parse(text: &str) -> (Vec<CredentialRecord>, Vec<RejectedLine>) {
    let lines: Vec<(usize, &str)> = text
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| (index + 1, line))
        .collect();

    if lines.is_empty() {
        return (Vec::new(), Vec::new());
    }

    let sample: Vec<&str> = lines.iter().take(SNIFF_ROWS).map(|(_, line)| *line).collect();
    let delimiter = detect_delimiter(&sample);
    tracing::debug!("Tabular mapping delimiter: {:?}", delimiter);

    let rows: Vec<(usize, &str, Vec<String>)> = lines
        .iter()
        .map(|&(number, line)| (number, line, split_record(line, delimiter)))
        .collect();

    let header = header_columns(&rows[0].2);
    let data_rows = if header.is_some() { &rows[1..] } else { &rows[..] };

    let mut records = Vec::new();
    let mut rejected = Vec::new();

    for (number, line, values) in data_rows {
        let record = match header {
            Some(columns) => {
                let field = |column: Option<usize>| {
                    column
                        .and_then(|index| values.get(index))
                        .map(String::as_str)
                        .unwrap_or_default()
                };
                CredentialRecord::from_fields(field(columns.filename), field(columns.password))
            }
            None if values.len() < 2 => None,
            None => CredentialRecord::from_fields(&values[0], &values[1]),
        };

        match record {
            Some(record) => records.push(record),
            None => {
                tracing::warn!("Skipping incomplete mapping row {}", number);
                rejected.push(RejectedLine {
                    line: *number,
                    content: line.to_string(),
                });
            }
        }
    }

    (records, rejected)
}

/// Whether `line` names both a filename and a password column under any
/// candidate delimiter. A single label is not enough: `file;pw1` is a record.
pub(crate) fn is_header_line(line: &str) -> bool {
    CANDIDATE_DELIMITERS.iter().any(|&delimiter| {
        header_columns(&split_record(line, delimiter))
            .is_some_and(|columns| columns.filename.is_some() && columns.password.is_some())
    })
}

/// Pick the delimiter whose field count is most consistent across rows.
///
/// Candidates that never split a row are ignored. Ties go to the candidate
/// with more fields per row, then to [`CANDIDATE_DELIMITERS`] order.
fn detect_delimiter(sample: &[&str]) -> char {
    let mut best: Option<(char, usize, f64)> = None;

    for &delimiter in &CANDIDATE_DELIMITERS {
        let counts: Vec<usize> = sample
            .iter()
            .map(|line| split_record(line, delimiter).len())
            .collect();
        let average = counts.iter().sum::<usize>() as f64 / counts.len().max(1) as f64;
        if average <= 1.0 {
            continue;
        }

        let delta: usize = counts.windows(2).map(|pair| pair[0].abs_diff(pair[1])).sum();
        let better = match best {
            None => true,
            Some((_, best_delta, best_average)) => {
                delta < best_delta || (delta == best_delta && average > best_average)
            }
        };
        if better {
            best = Some((delimiter, delta, average));
        }
    }

    best.map_or(CANDIDATE_DELIMITERS[0], |(delimiter, _, _)| delimiter)
}

/// Split one record, honoring double-quoted fields with `""` escapes.
fn split_record(line: &str, delimiter: char) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' if field.trim().is_empty() => {
                field.clear();
                in_quotes = true;
            }
            c if c == delimiter && !in_quotes => fields.push(std::mem::take(&mut field)),
            c => field.push(c),
        }
    }
    fields.push(field);

    fields
}

fn header_columns(values: &[String]) -> Option<HeaderColumns> {
    let find = |labels: &[&str]| {
        values.iter().position(|value| {
            let key = clean_field(value).to_lowercase();
            labels.contains(&key.as_str())
        })
    };

    let columns = HeaderColumns {
        filename: find(FILENAME_LABELS),
        password: find(PASSWORD_LABELS),
    };

    (columns.filename.is_some() || columns.password.is_some()).then_some(columns)
}
