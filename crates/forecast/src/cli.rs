//! Terminal rendering of forecast reports

use comfy_table::{Cell, CellAlignment, Color, ContentArrangement, Table};
use forecast_core::engine::BudgetStatus;
use forecast_core::report::{Cell as ReportCell, ReportTable};
use forecast_core::{ForecastReport, Locale};

/// Overview, per-project results and budget status as text tables
pub fn format_report(report: &ForecastReport, no_color: bool) -> String {
    if report.projects.is_empty() {
        return format!(
            "No projects with workdays in {}.",
            report.overview.planning_period
        );
    }

    let mut sections = vec![
        section(&report.overview_table(), report.locale, no_color),
        section(&report.results_table(), report.locale, no_color),
        section(&report.budget_table(), report.locale, no_color),
    ];

    let notes: Vec<String> = report
        .projects
        .iter()
        .filter(|p| !p.notes.is_empty())
        .map(|p| format!("  {}: {}", p.result.name, p.notes.join(", ")))
        .collect();
    if !notes.is_empty() {
        sections.push(format!("Notes\n{}", notes.join("\n")));
    }

    sections.join("\n\n")
}

fn section(table: &ReportTable, locale: Locale, no_color: bool) -> String {
    format!("{}\n{}", table.title, to_comfy(table, locale, no_color))
}

fn to_comfy(table: &ReportTable, locale: Locale, no_color: bool) -> Table {
    let mut out = Table::new();
    out.set_content_arrangement(ContentArrangement::Dynamic);

    // Apply colors only if enabled
    if no_color {
        out.set_header(table.headers.iter().map(String::as_str));
    } else {
        out.set_header(
            table
                .headers
                .iter()
                .map(|h| Cell::new(h).fg(Color::Cyan)),
        );
    }

    for row in &table.rows {
        let color = row.class.and_then(status_color).filter(|_| !no_color);
        let cells = row.cells.iter().map(|cell| {
            let mut c = Cell::new(cell.render(locale));
            if is_numeric(cell) {
                c = c.set_alignment(CellAlignment::Right);
            }
            if let Some(color) = color {
                c = c.fg(color);
            }
            c
        });
        out.add_row(cells);
    }

    out
}

fn is_numeric(cell: &ReportCell) -> bool {
    !matches!(cell, ReportCell::Text(_))
}

fn status_color(class: &str) -> Option<Color> {
    [
        BudgetStatus::Exact,
        BudgetStatus::Leftover,
        BudgetStatus::EarlyExhausted,
    ]
    .into_iter()
    .find(|s| s.css_class() == class)
    .map(|s| match s {
        BudgetStatus::Exact => Color::Green,
        BudgetStatus::Leftover => Color::Yellow,
        BudgetStatus::EarlyExhausted => Color::Red,
    })
}
