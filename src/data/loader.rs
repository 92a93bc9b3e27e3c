use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde_json::Value;

use crate::data::columnar::LabelTable;
use crate::data::sqlite;

/// Load a dataset, serving the SQLite cache when it exists. Fresh ingests
/// are parsed from CSV or a column-oriented JSON table and cached.
pub fn load_dataset(source_path: &str, sqlite_path: &str) -> Result<LabelTable> {
    if Path::new(sqlite_path).exists() {
        println!("[INFO] Loading cached dataset from SQLite ...");
        return sqlite::load_dataset(sqlite_path);
    }

    println!("[INFO] Loading dataset from {} ...", source_path);
    let table = if source_path.ends_with(".json") {
        read_json_table(source_path)?
    } else {
        read_csv(source_path)?
    };

    sqlite::save_dataset(&table, sqlite_path)?;
    Ok(table)
}

/// Parse a CSV file with a header row. Quoted fields may contain commas;
/// embedded newlines are not supported.
pub fn read_csv(path: &str) -> Result<LabelTable> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path))?;
    let mut lines = text.lines().filter(|l| !l.trim().is_empty());

    let header = match lines.next() {
        Some(h) => h,
        None => bail!("empty CSV file: {}", path),
    };
    let names = split_csv_line(header);

    let mut columns: Vec<Vec<String>> = vec![Vec::new(); names.len()];
    for (lineno, line) in lines.enumerate() {
        let cells = split_csv_line(line);
        if cells.len() != names.len() {
            bail!(
                "{}: row {} has {} cells, header has {}",
                path,
                lineno + 2,
                cells.len(),
                names.len()
            );
        }
        for (column, cell) in columns.iter_mut().zip(cells) {
            column.push(cell);
        }
    }

    let mut table = LabelTable::new();
    for (name, cells) in names.iter().zip(columns) {
        table.push_column(name, cells)?;
    }
    Ok(table)
}

fn split_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' => {
                if in_quotes && chars.peek() == Some(&'"') {
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = !in_quotes;
                }
            }
            ',' if !in_quotes => {
                fields.push(current.trim().to_string());
                current = String::new();
            }
            _ => current.push(c),
        }
    }
    fields.push(current.trim().to_string());
    fields
}

/// Parse a column-oriented JSON table: {"columns": [...], "data": [[...]]}.
pub fn read_json_table(path: &str) -> Result<LabelTable> {
    let file = fs::File::open(path).with_context(|| format!("opening {}", path))?;
    let v: Value = serde_json::from_reader(file)?;

    let names: Vec<String> = match v["columns"].as_array() {
        Some(cols) => cols.iter().map(cell_to_string).collect(),
        None => bail!("{}: JSON table has no 'columns' array", path),
    };
    let data = match v["data"].as_array() {
        Some(rows) => rows,
        None => bail!("{}: JSON table has no 'data' array", path),
    };

    let mut columns: Vec<Vec<String>> = vec![Vec::with_capacity(data.len()); names.len()];
    for (rowno, row) in data.iter().enumerate() {
        let cells = match row.as_array() {
            Some(cells) if cells.len() == names.len() => cells,
            Some(cells) => bail!(
                "{}: row {} has {} cells, expected {}",
                path,
                rowno,
                cells.len(),
                names.len()
            ),
            None => bail!("{}: row {} is not an array", path, rowno),
        };
        for (column, cell) in columns.iter_mut().zip(cells) {
            column.push(cell_to_string(cell));
        }
    }

    let mut table = LabelTable::new();
    for (name, cells) in names.iter().zip(columns) {
        table.push_column(name, cells)?;
    }
    Ok(table)
}

fn cell_to_string(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
