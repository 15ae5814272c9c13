//! Markdown summary rendering.
//!
//! Renders a [`Results`] collection into the Markdown digest shown in the
//! CI job's human-facing output. The output is a pure, deterministic
//! function of the results: a header, a severity tally, and one table row
//! per violation in severity-sorted order, bounded so the whole payload
//! stays under the platform's summary size ceiling.

use crate::results::Results;
use crate::violation::Violation;

/// The platform caps the entire summary payload at 1,048,576 characters.
/// Capping the accumulated table rows at 900,000 leaves safe headroom for
/// the fixed header, tally block, and table markup around them.
const TABLE_ROWS_CHAR_LIMIT: usize = 900_000;

/// Marker glyph for a severity level (1 is the most alarming).
fn severity_marker(severity: u8) -> &'static str {
    match severity {
        1 => ":red_circle:",
        2 => ":orange_circle:",
        3 => ":yellow_circle:",
        _ => ":white_circle:",
    }
}

/// Renders the Markdown summary for one analysis run.
///
/// With zero violations the output is a fixed success block and no table.
/// Otherwise the findings table visits violations in
/// [`Results::sorted_by_severity`] order — this function never re-sorts —
/// and stops appending rows once the next row would push the accumulated
/// rows past [`TABLE_ROWS_CHAR_LIMIT`]; a "Showing X of N" line announces
/// the truncation.
pub fn create_summary_markdown(results: &Results) -> String {
    let mut summary = String::from("## Code Analyzer Results\n");
    if results.total_count() == 0 {
        summary.push_str("### :white_check_mark: 0 Violations Found\n");
        return summary;
    }

    summary.push_str(&format!(
        "### :warning: {} Violation(s) Found\n\
         <blockquote>\n\
         {} {} High severity violation(s)<br/>\n\
         {} {} Medium severity violation(s)<br/>\n\
         {} {} Low severity violation(s)\n\
         </blockquote>\n",
        results.total_count(),
        severity_marker(1),
        results.count_for_severity(1),
        severity_marker(2),
        results.count_for_severity(2),
        severity_marker(3),
        results.count_for_severity(3),
    ));

    let violations = results.sorted_by_severity();
    let mut table_rows = String::new();
    let mut num_included = 0;
    for violation in violations {
        let row = render_row(violation);
        if table_rows.len() + row.len() > TABLE_ROWS_CHAR_LIMIT {
            break;
        }
        table_rows.push_str(&row);
        num_included += 1;
    }

    if num_included < violations.len() {
        summary.push_str(&format!(
            "Showing {} of {} violations:\n",
            num_included,
            violations.len()
        ));
    }
    summary.push_str(&format!(
        "<table><tr><th> </th><th>Location</th><th>Rule</th><th>Message</th></tr>\n\
         {table_rows}</table>\n"
    ));

    summary
}

fn render_row(violation: &Violation) -> String {
    let location = make_smaller(&embolden_source_and_sink(&trim_and_break_newlines(
        &escape_html(&violation.location.to_string()),
    )));
    let rule_link = create_rule_link(&violation.rule, violation.url.as_deref());
    let engine_and_rule = make_smaller(&format!("{}:{}", violation.engine, rule_link));
    let message = make_smaller(&trim_and_break_newlines(&escape_html(&violation.message)));
    format!(
        "<tr><td>{}</td><td>{location}</td><td>{engine_and_rule}</td><td>{message}</td></tr>\n",
        severity_marker(violation.severity),
    )
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn trim_and_break_newlines(text: &str) -> String {
    text.trim().replace('\n', "<br/>")
}

fn create_rule_link(rule_name: &str, rule_url: Option<&str>) -> String {
    match rule_url {
        Some(url) => format!("<a href=\"{url}\">{rule_name}</a>"),
        None => rule_name.to_string(),
    }
}

/// Inline font-size styles are not honored in summary Markdown; `<sup>` is
/// the only way to visually shrink text.
fn make_smaller(text: &str) -> String {
    format!("<sup>{text}</sup>")
}

fn embolden_source_and_sink(text: &str) -> String {
    text.replacen("Source: ", "<b>Source</b>: ", 1)
        .replacen("Sink: ", "<b>Sink</b>: ", 1)
}
