//! Tabular view over result feature sets for console display.
//!
//! A [`Table`] holds the attribute columns of a feature set. Commands project
//! the columns they care about with [`Table::select`], optionally filter rows
//! by a numeric code, and print the result with [`Table::render`].

use std::fmt;

use serde_json::Value;
use thiserror::Error;

use crate::features::{Attributes, FeatureSet};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TableError {
    #[error("column '{column}' not in result; available: {available}")]
    MissingColumn { column: String, available: String },
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    /// Builds a table from feature attributes.
    ///
    /// Columns are the union of attribute keys in first-seen order; a row
    /// missing a key gets `null` in that column. Geometry is not included.
    #[must_use]
    pub fn from_features(set: &FeatureSet<Attributes>) -> Self {
        let mut columns: Vec<String> = Vec::new();
        for feature in &set.features {
            for key in feature.attributes.keys() {
                if !columns.iter().any(|c| c == key) {
                    columns.push(key.clone());
                }
            }
        }

        let rows = set
            .features
            .iter()
            .map(|f| {
                columns
                    .iter()
                    .map(|c| f.attributes.get(c).cloned().unwrap_or(Value::Null))
                    .collect()
            })
            .collect();

        Self { columns, rows }
    }

    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    #[must_use]
    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Projects the table onto `columns`, in the order given.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::MissingColumn`] for the first requested column
    /// the table does not have.
    pub fn select(&self, columns: &[&str]) -> Result<Table, TableError> {
        let indices = columns
            .iter()
            .map(|c| self.index_of(c))
            .collect::<Result<Vec<_>, _>>()?;

        let rows = self
            .rows
            .iter()
            .map(|row| indices.iter().map(|&i| row[i].clone()).collect())
            .collect();

        Ok(Table {
            columns: columns.iter().map(|c| (*c).to_string()).collect(),
            rows,
        })
    }

    /// Keeps rows whose numeric value in `column` equals one of `codes`.
    ///
    /// Non-numeric cells never match.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::MissingColumn`] if `column` does not exist.
    pub fn filter_in(&self, column: &str, codes: &[i64]) -> Result<Table, TableError> {
        let idx = self.index_of(column)?;
        #[allow(clippy::cast_precision_loss, clippy::float_cmp)]
        let rows = self
            .rows
            .iter()
            .filter(|row| {
                row[idx]
                    .as_f64()
                    .is_some_and(|v| codes.iter().any(|&c| c as f64 == v))
            })
            .cloned()
            .collect();
        Ok(Table {
            columns: self.columns.clone(),
            rows,
        })
    }

    /// Returns the cells of one column, top to bottom.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::MissingColumn`] if `column` does not exist.
    pub fn column(&self, column: &str) -> Result<Vec<&Value>, TableError> {
        let idx = self.index_of(column)?;
        Ok(self.rows.iter().map(|row| &row[idx]).collect())
    }

    /// Renders the table as right-aligned text columns without a row index.
    #[must_use]
    pub fn render(&self) -> String {
        let cells: Vec<Vec<String>> = self
            .rows
            .iter()
            .map(|row| row.iter().map(format_cell).collect())
            .collect();

        let widths: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, name)| {
                cells
                    .iter()
                    .map(|row| row[i].chars().count())
                    .chain(std::iter::once(name.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let mut out = String::new();
        push_line(&mut out, self.columns.iter().map(String::as_str), &widths);
        if cells.is_empty() {
            out.push_str("(no rows)\n");
        }
        for row in &cells {
            push_line(&mut out, row.iter().map(String::as_str), &widths);
        }
        out
    }

    fn index_of(&self, column: &str) -> Result<usize, TableError> {
        self.columns
            .iter()
            .position(|c| c == column)
            .ok_or_else(|| TableError::MissingColumn {
                column: column.to_string(),
                available: self.columns.join(", "),
            })
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

fn push_line<'a>(out: &mut String, cells: impl Iterator<Item = &'a str>, widths: &[usize]) {
    let line = cells
        .zip(widths)
        .map(|(cell, &w)| format!("{cell:>w$}"))
        .collect::<Vec<_>>()
        .join("  ");
    out.push_str(line.trim_end());
    out.push('\n');
}

/// Formats a cell for display. Whole floats keep one decimal place; other
/// floats print up to six, with trailing zeros trimmed.
fn format_cell(value: &Value) -> String {
    match value {
        Value::Null => "-".to_string(),
        Value::String(s) => s.clone(),
        Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                n.to_string()
            } else {
                let f = n.as_f64().unwrap_or(f64::NAN);
                if f.fract() == 0.0 && f.abs() < 1e15 {
                    format!("{f:.1}")
                } else {
                    let s = format!("{f:.6}");
                    s.trim_end_matches('0').trim_end_matches('.').to_string()
                }
            }
        }
        other => other.to_string(),
    }
}
