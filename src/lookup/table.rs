//! CSV-backed lookup tables.

use std::io::Read;
use std::path::Path;

use crate::error::{Error, Result};

/// An in-memory table loaded from CSV.
///
/// Every cell is a string; blank or missing cells read as `""`.
#[derive(Debug, Clone, Default)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Load a table from a CSV file with a header row.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        let table = Self::from_reader(file)?;
        log::debug!("Loaded {} rows from {}", table.len(), path.display());
        Ok(table)
    }

    /// Load a table from any CSV reader with a header row.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers = csv
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect::<Vec<_>>();

        let mut rows = Vec::new();
        for record in csv.records() {
            let record = record?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        Ok(Self { headers, rows })
    }

    /// Build a table from literal headers and rows.
    pub fn from_rows(headers: &[&str], rows: Vec<Vec<String>>) -> Self {
        Self {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows,
        }
    }

    /// Column names.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of a column, if present.
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Index of a column that must be present.
    pub fn require_column(&self, name: &str) -> Result<usize> {
        self.column(name)
            .ok_or_else(|| Error::Table(format!("missing column '{}'", name)))
    }

    /// Cell value; out-of-range cells read as blank.
    pub fn cell(&self, row: usize, column: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Cell value by column name; a missing column reads as blank.
    pub fn cell_by_name(&self, row: usize, name: &str) -> &str {
        self.column(name).map_or("", |col| self.cell(row, col))
    }

    /// Indices of rows whose `column` cell satisfies `predicate`.
    pub fn rows_where<F>(&self, column: usize, mut predicate: F) -> Vec<usize>
    where
        F: FnMut(&str) -> bool,
    {
        (0..self.rows.len())
            .filter(|&row| predicate(self.cell(row, column)))
            .collect()
    }
}
