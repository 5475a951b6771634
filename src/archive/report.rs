use crate::pipeline::BatchResult;

/// Render the plain-text summary: one `STATUS\tname\tdetail` line per
/// document in input order, a blank line, then the totals line.
pub fn render_report(result: &BatchResult) -> String {
    let mut report = String::new();

    for outcome in result.outcomes_in_input_order() {
        report.push_str(&format!(
            "{}\t{}\t{}\n",
            outcome.status().label(),
            single_line(outcome.name()),
            single_line(outcome.detail())
        ));
    }

    report.push('\n');
    report.push_str(&totals_line(result));
    report.push('\n');
    report
}

pub fn totals_line(result: &BatchResult) -> String {
    format!(
        "total={} ok={} skipped={} failed={}",
        result.total, result.ok, result.skipped, result.failed
    )
}

// Tabs and line breaks would break the column layout
fn single_line(value: &str) -> String {
    value
        .split(['\t', '\n', '\r'])
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
