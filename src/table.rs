//! A minimal string table: header plus rows, read from and written to CSV.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::{Record, ScrapeError};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Outcome of a column rewrite. A missing column is not an error for the
/// callers that use this.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnFix {
    Applied { cells_changed: usize },
    MissingColumn,
}

impl Table {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Columns are the union of record keys in first-seen order; a record
    /// without a key gets an empty cell.
    pub fn from_records(records: &[Record]) -> Self {
        let mut headers: Vec<String> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();
        for record in records {
            for key in record.keys() {
                if !index.contains_key(key) {
                    index.insert(key.clone(), headers.len());
                    headers.push(key.clone());
                }
            }
        }

        let rows = records
            .iter()
            .map(|record| {
                headers
                    .iter()
                    .map(|h| record.get(h).map(cell_text).unwrap_or_default())
                    .collect()
            })
            .collect();
        Self { headers, rows }
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn cell(&self, row: usize, column: &str) -> Option<&str> {
        let idx = self.column_index(column)?;
        self.rows.get(row)?.get(idx).map(String::as_str)
    }

    /// Row-wise union aligned by column name. Column order is first-seen
    /// across `tables`; cells of absent columns are empty.
    pub fn concat(tables: &[Table]) -> Table {
        let mut headers: Vec<String> = Vec::new();
        for table in tables {
            for h in &table.headers {
                if !headers.contains(h) {
                    headers.push(h.clone());
                }
            }
        }

        let mut out = Table::new(headers);
        for table in tables {
            let mapping: Vec<Option<usize>> = out
                .headers
                .iter()
                .map(|h| table.column_index(h))
                .collect();
            for row in &table.rows {
                out.rows.push(
                    mapping
                        .iter()
                        .map(|src| {
                            src.and_then(|i| row.get(i).cloned())
                                .unwrap_or_default()
                        })
                        .collect(),
                );
            }
        }
        out
    }

    pub fn filter(&self, mut keep: impl FnMut(&[String]) -> bool) -> Table {
        Table {
            headers: self.headers.clone(),
            rows: self.rows.iter().filter(|r| keep(r)).cloned().collect(),
        }
    }

    /// Literal substring replacement in every cell of `column`.
    pub fn replace_in_column(&mut self, column: &str, from: &str, to: &str) -> ColumnFix {
        let Some(idx) = self.column_index(column) else {
            return ColumnFix::MissingColumn;
        };
        let mut cells_changed = 0;
        for row in &mut self.rows {
            if let Some(cell) = row.get_mut(idx)
                && cell.contains(from)
            {
                *cell = cell.replace(from, to);
                cells_changed += 1;
            }
        }
        ColumnFix::Applied { cells_changed }
    }

    pub fn read_csv(path: &Path) -> Result<Table, ScrapeError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(path)
            .map_err(|err| ScrapeError::csv(path, err))?;
        let headers = reader
            .headers()
            .map_err(|err| ScrapeError::csv(path, err))?
            .iter()
            .map(str::to_string)
            .collect::<Vec<_>>();

        let width = headers.len();
        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|err| ScrapeError::csv(path, err))?;
            if record.len() > width {
                return Err(ScrapeError::WideRow {
                    path: path.to_path_buf(),
                    line: record.position().map_or(0, |pos| pos.line()),
                    cells: record.len(),
                    width,
                });
            }
            let mut row: Vec<String> = record.iter().map(str::to_string).collect();
            row.resize(width, String::new());
            rows.push(row);
        }
        Ok(Table { headers, rows })
    }

    pub fn to_csv_bytes(&self) -> Result<Vec<u8>, csv::Error> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        if !self.headers.is_empty() {
            writer.write_record(&self.headers)?;
        }
        for row in &self.rows {
            writer.write_record(row)?;
        }
        writer
            .into_inner()
            .map_err(|err| csv::Error::from(err.into_error()))
    }

    /// Writes to a sibling temp file and renames it over `path`, creating
    /// parent directories as needed.
    pub fn write_csv(&self, path: &Path) -> Result<(), ScrapeError> {
        let bytes = self
            .to_csv_bytes()
            .map_err(|err| ScrapeError::csv(path, err))?;
        write_atomic(path, &bytes)
    }
}

pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), ScrapeError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|err| ScrapeError::io(parent, err))?;
    }
    let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(".tmp");
    let tmp = path.with_file_name(tmp_name);
    fs::write(&tmp, bytes).map_err(|err| ScrapeError::io(&tmp, err))?;
    fs::rename(&tmp, path).map_err(|err| ScrapeError::io(path, err))?;
    Ok(())
}

/// Strings verbatim, null as empty, nested values as compact JSON.
fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}
