//! Text normalization applied before any delimiter detection.

/// Normalize locale-variant punctuation and line endings.
///
/// Full-width semicolons and commas become their ASCII forms, `\r\n` and
/// lone `\r` become `\n`, and a leading byte-order mark is dropped.
pub fn normalize_text(raw: &str) -> String {
    raw.trim_start_matches('\u{feff}')
        .replace('；', ";")
        .replace('，', ",")
        .replace("\r\n", "\n")
        .replace('\r', "\n")
}

/// Remove a trailing run of semicolons (`"a.pdf;;"` → `"a.pdf"`).
pub fn strip_trailing_semicolons(value: &str) -> &str {
    value.trim_end_matches(';')
}

/// Trim a raw field and strip trailing semicolons from it.
pub(crate) fn clean_field(value: &str) -> String {
    strip_trailing_semicolons(value.trim()).trim_end().to_string()
}
