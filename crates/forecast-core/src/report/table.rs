//! Plain row data handed to renderers

use crate::format::{format_currency, format_number};
use crate::models::Locale;
use serde::Serialize;
use std::collections::BTreeMap;

/// One typed table cell; formatting is left to the renderer
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Text(String),
    Count(usize),
    /// Hours or ratios, 2 decimals; `None` renders as `-`
    Number(Option<f64>),
    Currency(Option<f64>),
}

impl Cell {
    pub fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }

    pub fn number(value: impl Into<Option<f64>>) -> Self {
        Cell::Number(value.into())
    }

    pub fn currency(value: impl Into<Option<f64>>) -> Self {
        Cell::Currency(value.into())
    }

    /// Numeric value, if the cell holds one
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Count(n) => Some(*n as f64),
            Cell::Number(v) | Cell::Currency(v) => *v,
            Cell::Text(_) => None,
        }
    }

    pub fn render(&self, locale: Locale) -> String {
        match self {
            Cell::Text(s) => s.clone(),
            Cell::Count(n) => n.to_string(),
            Cell::Number(v) => format_number(*v, 2, locale),
            Cell::Currency(v) => format_currency(*v, locale),
        }
    }
}

/// A row plus an optional CSS class (budget status)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRow {
    pub cells: Vec<Cell>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub class: Option<&'static str>,
}

impl TableRow {
    pub fn new(cells: Vec<Cell>) -> Self {
        Self { cells, class: None }
    }

    pub fn with_class(mut self, class: &'static str) -> Self {
        self.class = Some(class);
        self
    }
}

/// Headers plus rows of equal width
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportTable {
    pub title: String,
    pub headers: Vec<String>,
    pub rows: Vec<TableRow>,
}

impl ReportTable {
    pub fn new(title: impl Into<String>, headers: Vec<String>) -> Self {
        Self {
            title: title.into(),
            headers,
            rows: Vec::new(),
        }
    }

    pub fn push(&mut self, row: TableRow) {
        debug_assert_eq!(row.cells.len(), self.headers.len());
        self.rows.push(row);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn column(&self, header: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == header)
    }

    /// Row `index` as a label→cell record
    pub fn record(&self, index: usize) -> Option<BTreeMap<&str, &Cell>> {
        let row = self.rows.get(index)?;
        Some(
            self.headers
                .iter()
                .map(String::as_str)
                .zip(row.cells.iter())
                .collect(),
        )
    }

    /// Cell under `header` in the row whose first cell reads `key`
    pub fn lookup(&self, key: &str, header: &str) -> Option<&Cell> {
        let col = self.column(header)?;
        self.rows
            .iter()
            .find(|row| matches!(row.cells.first(), Some(Cell::Text(k)) if k == key))
            .and_then(|row| row.cells.get(col))
    }

    /// Every cell rendered for `locale`, header row first
    pub fn rendered(&self, locale: Locale) -> Vec<Vec<String>> {
        let mut out = Vec::with_capacity(self.rows.len() + 1);
        out.push(self.headers.clone());
        out.extend(
            self.rows
                .iter()
                .map(|row| row.cells.iter().map(|c| c.render(locale)).collect()),
        );
        out
    }
}
