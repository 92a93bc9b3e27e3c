use std::fs;
use std::path::Path;

use anyhow::Result;
use rusqlite::{Connection, ToSql};

use crate::data::columnar::LabelTable;

/// Write the whole table into `dataset`, one TEXT column per source column.
/// Any previous cache at `path` is replaced.
pub fn save_dataset(table: &LabelTable, path: &str) -> Result<()> {
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let _ = fs::remove_file(path);

    let mut conn = Connection::open(path)?;
    let names = table.column_names();
    let col_defs: Vec<String> = names.iter().map(|c| format!("\"{}\" TEXT", c)).collect();
    conn.execute(&format!("CREATE TABLE dataset ({})", col_defs.join(", ")), [])?;

    let columns: Vec<&[String]> = names
        .iter()
        .map(|n| table.column(n))
        .collect::<Result<_, _>>()?;

    let tx = conn.transaction()?;
    {
        let insert_cols: Vec<String> = names.iter().map(|c| format!("\"{}\"", c)).collect();
        let placeholders: Vec<String> = (1..=names.len()).map(|i| format!("?{}", i)).collect();
        let mut stmt = tx.prepare(&format!(
            "INSERT INTO dataset ({}) VALUES ({})",
            insert_cols.join(","),
            placeholders.join(",")
        ))?;
        for i in 0..table.len() {
            let row: Vec<&dyn ToSql> = columns.iter().map(|c| &c[i] as &dyn ToSql).collect();
            stmt.execute(row.as_slice())?;
        }
    }
    tx.commit()?;
    Ok(())
}

/// Read a cached dataset back. Column names come from the table schema.
pub fn load_dataset(path: &str) -> Result<LabelTable> {
    let conn = Connection::open(path)?;
    let mut stmt = conn.prepare("SELECT * FROM dataset")?;
    let names: Vec<String> = stmt.column_names().iter().map(|s| s.to_string()).collect();

    let mut columns: Vec<Vec<String>> = vec![Vec::new(); names.len()];
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        for (i, column) in columns.iter_mut().enumerate() {
            column.push(row.get::<_, String>(i)?);
        }
    }

    let mut table = LabelTable::new();
    for (name, cells) in names.iter().zip(columns) {
        table.push_column(name, cells)?;
    }
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(vals: &[&str]) -> Vec<String> {
        vals.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn roundtrip_preserves_columns_and_cells() {
        let table = LabelTable::from_columns(vec![
            ("category".to_string(), strings(&["A", "B"])),
            ("truth".to_string(), strings(&["1", "0"])),
        ])
        .expect("columns share one length");

        let path = std::env::temp_dir().join("clf_metrics_sqlite_roundtrip.sqlite");
        let path = path.to_str().unwrap().to_string();
        save_dataset(&table, &path).unwrap();

        let loaded = load_dataset(&path).unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.column_names(), table.column_names());
        assert_eq!(loaded.column("category").unwrap(), table.column("category").unwrap());
        assert_eq!(loaded.column("truth").unwrap(), table.column("truth").unwrap());

        let _ = std::fs::remove_file(&path);
    }
}
