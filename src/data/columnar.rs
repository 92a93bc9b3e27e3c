use std::collections::HashMap;

use itertools::Itertools;
use thiserror::Error;

use crate::utils;

#[derive(Debug, Error)]
pub enum ColumnError {
    #[error("missing column: {0}")]
    Missing(String),
    #[error("column \"{column}\" has {len} rows, table has {expected}")]
    LengthMismatch {
        column: String,
        len: usize,
        expected: usize,
    },
}

/// Column-oriented view over an ingested dataset. Every cell is kept as its
/// raw string token; label semantics (binary indicator, one-vs-rest) are
/// applied downstream by the metrics layer.
#[derive(Debug, Clone, Default)]
pub struct LabelTable {
    n_rows: usize,
    names: Vec<String>,
    data: HashMap<String, Vec<String>>,
}

impl LabelTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a column. The first column fixes the row count.
    pub fn push_column(&mut self, name: &str, cells: Vec<String>) -> Result<(), ColumnError> {
        if self.data.is_empty() {
            self.n_rows = cells.len();
        } else if cells.len() != self.n_rows {
            return Err(ColumnError::LengthMismatch {
                column: name.to_string(),
                len: cells.len(),
                expected: self.n_rows,
            });
        }
        if !self.data.contains_key(name) {
            self.names.push(name.to_string());
        }
        self.data.insert(name.to_string(), cells);
        Ok(())
    }

    pub fn from_columns(columns: Vec<(String, Vec<String>)>) -> Result<Self, ColumnError> {
        let mut table = Self::new();
        for (name, cells) in columns {
            table.push_column(&name, cells)?;
        }
        Ok(table)
    }

    pub fn column(&self, name: &str) -> Result<&[String], ColumnError> {
        self.data
            .get(name)
            .map(|v| v.as_slice())
            .ok_or_else(|| ColumnError::Missing(name.to_string()))
    }

    /// Column names in ingestion order.
    pub fn column_names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.n_rows
    }

    pub fn is_empty(&self) -> bool {
        self.n_rows == 0
    }

    /// Distinct values of a column in natural ascending order.
    pub fn distinct_values(&self, name: &str) -> Result<Vec<String>, ColumnError> {
        let mut values: Vec<String> = self.column(name)?.iter().cloned().unique().collect();
        utils::sort_natural(&mut values);
        Ok(values)
    }

    /// Indices of the rows whose `name` cell equals `value`.
    pub fn matching_rows(&self, name: &str, value: &str) -> Result<Vec<usize>, ColumnError> {
        Ok(self
            .column(name)?
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.as_str() == value)
            .map(|(i, _)| i)
            .collect())
    }

    /// Cells of `name` at the given row indices.
    pub fn gather(&self, name: &str, rows: &[usize]) -> Result<Vec<String>, ColumnError> {
        let column = self.column(name)?;
        Ok(rows.iter().map(|&i| column[i].clone()).collect())
    }
}
