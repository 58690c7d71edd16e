//! Dynamic table model for qself.
//!
//! The exports this tool reads carry no fixed schema: the activity CSV has
//! whatever columns the tracker was configured with, and the wellness JSON
//! entries have arbitrary per-entry key sets.  Rows are therefore ordered
//! key → value mappings of tagged scalars, and a [`Table`] computes its
//! column set as the union of keys across rows, filling absent keys with
//! [`CellValue::Null`] when tabulated.

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ── CellValue ─────────────────────────────────────────────────────────────────

/// A single tagged scalar cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    /// Absent or explicit-null value.
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl CellValue {
    /// `true` for [`CellValue::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Convert a JSON value into a cell.
    ///
    /// Scalars map directly; integral numbers stay integral.  A nested
    /// array or object that reaches a cell position is carried as its
    /// compact JSON text so no data is dropped silently.
    pub fn from_json(value: &Value) -> CellValue {
        match value {
            Value::Null => CellValue::Null,
            Value::Bool(b) => CellValue::Bool(*b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    CellValue::Int(i)
                } else {
                    CellValue::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            Value::String(s) => CellValue::Text(s.clone()),
            other => CellValue::Text(other.to_string()),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

// ── Row ───────────────────────────────────────────────────────────────────────

/// One table row: an ordered mapping from column name to cell value.
///
/// Insertion order is preserved.  Inserting an existing key replaces the
/// value in place (last write wins) without changing its position.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Row {
    cells: Vec<(String, CellValue)>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a row from a JSON object, keeping the object's key order.
    pub fn from_object(object: &serde_json::Map<String, Value>) -> Self {
        let mut row = Row::new();
        for (key, value) in object {
            row.insert(key.clone(), CellValue::from_json(value));
        }
        row
    }

    /// Insert or replace a cell.
    pub fn insert(&mut self, key: impl Into<String>, value: CellValue) {
        let key = key.into();
        if let Some(slot) = self.cells.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = value;
        } else {
            self.cells.push((key, value));
        }
    }

    /// Remove a cell by key; a no-op when the key is absent.
    pub fn remove(&mut self, key: &str) {
        self.cells.retain(|(k, _)| k != key);
    }

    /// Look up a cell by key.
    pub fn get(&self, key: &str) -> Option<&CellValue> {
        self.cells
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Column names in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

// ── Table ─────────────────────────────────────────────────────────────────────

const NULL_CELL: CellValue = CellValue::Null;

/// An immutable-after-build list of rows with a computed column set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    rows: Vec<Row>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, row: Row) {
        self.rows.push(row);
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The union of row keys, in first-seen order across the whole table.
    pub fn columns(&self) -> Vec<String> {
        let mut columns: Vec<String> = Vec::new();
        for row in &self.rows {
            for key in row.keys() {
                if !columns.iter().any(|c| c == key) {
                    columns.push(key.to_string());
                }
            }
        }
        columns
    }

    /// Cell at `(row, column)`; [`CellValue::Null`] when the row does not
    /// carry that column or the index is out of range.
    pub fn cell(&self, row: usize, column: &str) -> &CellValue {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .unwrap_or(&NULL_CELL)
    }
}

impl FromIterator<Row> for Table {
    fn from_iter<I: IntoIterator<Item = Row>>(iter: I) -> Self {
        Table {
            rows: iter.into_iter().collect(),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
