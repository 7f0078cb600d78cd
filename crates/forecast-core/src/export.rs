//! HTML and CSV export of forecast reports
//!
//! `render_*` functions build the document in memory (the live preview
//! serves them directly); `export_*` functions write them to disk.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::models::Locale;
use crate::report::{ForecastReport, ReportTable};

const TITLE: &str = "Forecast Report";

const STYLES: &str = r#"<style>
  body { font-family: system-ui, -apple-system, 'Segoe UI', Roboto, Arial, sans-serif; margin: 24px; }
  h1 { font-size: 20px; margin-bottom: 8px; }
  h2 { font-size: 16px; margin-top: 24px; }
  table { border-collapse: collapse; margin: 12px 0; width: 100%; }
  th, td { border: 1px solid #ddd; padding: 6px 8px; font-size: 13px; }
  th { background: #f7f7f7; text-align: left; }
  td.num { text-align: right; font-variant-numeric: tabular-nums; }
  .kv { width: auto; }
  .kv td:first-child { font-weight: 600; width: 220px; }
  .muted { color: #666; }
  .desc { color: #444; font-size: 13px; margin: 0 0 8px; }
  tr.status-ok { background: #e8f5e9; }
  tr.status-warn { background: #fff8e1; }
  tr.status-error { background: #ffebee; }
  .legend { font-size: 12px; color: #444; }
  .legend span { display: inline-block; padding: 3px 6px; margin-right: 8px; border-radius: 3px; }
  .legend .ok { background: #e8f5e9; }
  .legend .warn { background: #fff8e1; }
  .legend .err { background: #ffebee; }
</style>"#;

/// Self-contained HTML page for a report
pub fn render_html(report: &ForecastReport) -> String {
    let locale = report.locale;

    let vacations = if report.vacations.is_empty() {
        r#"<p class="muted">No entries</p>"#.to_string()
    } else {
        let items: String = report
            .vacations
            .iter()
            .map(|d| format!("<li>{d}</li>"))
            .collect();
        format!("<ul>{items}</ul>")
    };

    let budget = report.budget_table();
    let sections: [(ReportTable, &str); 7] = [
        (
            report.summary_table(),
            "Per project: active period, workdays, total assigned capacity, expected revenue and notes.",
        ),
        (
            report.assigned_table(),
            "Monthly capacity assigned by weights_by_month, before limits and budget.",
        ),
        (
            report.assigned_per_day_table(),
            "Assigned hours divided by the project's workdays in that month.",
        ),
        (
            report.required_per_day_table(),
            "Daily average needed to use the full budget by project end, with the budget spread over months in proportion to their assigned capacity.",
        ),
        (
            report.used_table(),
            "Hours actually used per month: min(assigned, monthly limit, remaining budget).",
        ),
        (
            report.unused_table(),
            "Assigned minus used hours; this capacity lapses for the project.",
        ),
        (
            report.used_per_day_table(),
            "Used hours divided by the project's workdays in that month.",
        ),
    ];

    let mut parts = vec![
        "<!DOCTYPE html>".to_string(),
        "<html lang=\"en\">".to_string(),
        "<head>".to_string(),
        "<meta charset=\"utf-8\">".to_string(),
        format!("<title>{}</title>", html_escape(TITLE)),
        STYLES.to_string(),
        "</head>".to_string(),
        "<body>".to_string(),
        format!("<h1>{}</h1>", html_escape(TITLE)),
        "<h2>Overview</h2>".to_string(),
        html_table(&report.overview_table(), locale, Some("kv")),
        "<h2>Vacations and absences</h2>".to_string(),
        "<p class=\"desc\">Vacation days in the planning period. They reduce the available workdays and therefore capacity.</p>".to_string(),
        vacations,
    ];

    for (table, description) in &sections {
        parts.push(format!("<h2>{}</h2>", html_escape(&table.title)));
        parts.push(format!("<p class=\"desc\">{}</p>", html_escape(description)));
        parts.push(table_or_placeholder(table, locale));
    }

    parts.push(format!("<h2>{}</h2>", html_escape(&budget.title)));
    parts.push(
        "<p class=\"desc\">Monthly budget burn. Green: budget used up exactly at project end. Yellow: budget left over. Red: budget exhausted before project end.</p>"
            .to_string(),
    );
    parts.push(
        "<div class=\"legend\"><span class=\"ok\">exact</span><span class=\"warn\">leftover</span><span class=\"err\">early-exhausted</span></div>"
            .to_string(),
    );
    parts.push(table_or_placeholder(&budget, locale));

    parts.push("</body></html>".to_string());
    parts.join("\n")
}

fn table_or_placeholder(table: &ReportTable, locale: Locale) -> String {
    if table.is_empty() {
        r#"<p class="muted">No data</p>"#.to_string()
    } else {
        html_table(table, locale, None)
    }
}

fn html_table(table: &ReportTable, locale: Locale, class: Option<&str>) -> String {
    let mut out = String::new();
    match class {
        Some(c) => out.push_str(&format!("<table class=\"{}\">", html_escape(c))),
        None => out.push_str("<table>"),
    }

    out.push_str("<thead><tr>");
    for header in &table.headers {
        out.push_str(&format!("<th>{}</th>", html_escape(header)));
    }
    out.push_str("</tr></thead><tbody>");

    for row in &table.rows {
        match row.class {
            Some(c) => out.push_str(&format!("<tr class=\"{}\">", html_escape(c))),
            None => out.push_str("<tr>"),
        }
        for cell in &row.cells {
            let numeric = cell.as_f64().is_some();
            let text = html_escape(&cell.render(locale));
            if numeric {
                out.push_str(&format!("<td class=\"num\">{text}</td>"));
            } else {
                out.push_str(&format!("<td>{text}</td>"));
            }
        }
        out.push_str("</tr>");
    }

    out.push_str("</tbody></table>");
    out
}

/// Semicolon-separated rendering of one table, header row first
pub fn render_csv(table: &ReportTable, locale: Locale) -> String {
    let mut out = String::new();
    for row in table.rendered(locale) {
        let line: Vec<String> = row.iter().map(|v| csv_field(v)).collect();
        out.push_str(&line.join(";"));
        out.push('\n');
    }
    out
}

fn csv_field(value: &str) -> String {
    if value.contains([';', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Write the HTML report to `path`, creating parent directories
pub fn export_report_to_html(report: &ForecastReport, path: &Path) -> Result<()> {
    write_document(path, &render_html(report), "HTML")
}

/// Write one table as CSV to `path`, creating parent directories
pub fn export_table_to_csv(table: &ReportTable, locale: Locale, path: &Path) -> Result<()> {
    write_document(path, &render_csv(table, locale), "CSV")
}

fn write_document(path: &Path, content: &str, kind: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let file = File::create(path)
        .with_context(|| format!("Failed to create {} file: {}", kind, path.display()))?;
    let mut writer = BufWriter::new(file);
    writer
        .write_all(content.as_bytes())
        .with_context(|| format!("Failed to write {} file: {}", kind, path.display()))?;
    writer
        .flush()
        .with_context(|| format!("Failed to flush {} writer", kind))?;

    Ok(())
}

/// HTML escape for safe output
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}
