//! Rows of the year plan grid.
//!
//! A row's `data` is keyed by column id by convention only. Keys may be
//! missing (read as empty) or refer to columns that no longer exist.

use crate::column::{Column, ColumnId};
use crate::reorder::Ordered;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Cell values of a row, keyed by column id.
pub type RowData = BTreeMap<ColumnId, String>;

/// Opaque, backend-assigned row identifier.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowId(pub String);

impl RowId {
    pub fn new(id: impl Into<String>) -> Self {
        RowId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RowId {
    fn from(s: &str) -> Self {
        RowId(s.to_string())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    pub id: RowId,
    #[serde(default)]
    pub data: RowData,
    pub order: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}

impl Row {
    /// Raw stored value for a column; absent keys read as the empty string.
    pub fn value(&self, column: &ColumnId) -> &str {
        self.data.get(column).map(String::as_str).unwrap_or("")
    }

    /// Copy of `data` with exactly one key replaced, all others preserved.
    pub fn merged(&self, column: &ColumnId, value: String) -> RowData {
        let mut data = self.data.clone();
        data.insert(column.clone(), value);
        data
    }
}

/// Initial data for a new row: an empty string for every known column.
pub fn blank_data<'a>(columns: impl IntoIterator<Item = &'a Column>) -> RowData {
    columns
        .into_iter()
        .map(|col| (col.id.clone(), String::new()))
        .collect()
}

impl Ordered for Row {
    type Id = RowId;

    fn id(&self) -> &RowId {
        &self.id
    }

    fn order(&self) -> u32 {
        self.order
    }

    fn set_order(&mut self, order: u32) {
        self.order = order;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::ColumnType;

    fn row(pairs: &[(&str, &str)]) -> Row {
        Row {
            id: RowId::from("r1"),
            data: pairs
                .iter()
                .map(|(k, v)| (ColumnId::from(*k), v.to_string()))
                .collect(),
            order: 0,
            scope: None,
        }
    }

    #[test]
    fn missing_key_reads_as_empty() {
        let r = row(&[("a", "x")]);
        assert_eq!(r.value(&ColumnId::from("a")), "x");
        assert_eq!(r.value(&ColumnId::from("b")), "");
    }

    #[test]
    fn merged_replaces_one_key_and_keeps_the_rest() {
        let r = row(&[("a", "1"), ("b", "2"), ("gone", "orphan")]);
        let data = r.merged(&ColumnId::from("b"), "20".to_string());
        assert_eq!(data.len(), 3);
        assert_eq!(data[&ColumnId::from("a")], "1");
        assert_eq!(data[&ColumnId::from("b")], "20");
        assert_eq!(data[&ColumnId::from("gone")], "orphan");
    }

    #[test]
    fn blank_data_covers_every_column() {
        let cols = vec![
            Column {
                id: ColumnId::from("c1"),
                name: "Subsysteem".into(),
                kind: ColumnType::Text,
                width: 200,
                order: 0,
                scope: None,
            },
            Column {
                id: ColumnId::from("c2"),
                name: "Budget".into(),
                kind: ColumnType::Currency,
                width: 200,
                order: 1,
                scope: None,
            },
        ];
        let data = blank_data(&cols);
        assert_eq!(data.len(), 2);
        assert!(data.values().all(String::is_empty));
    }

    #[test]
    fn row_without_data_field_deserializes_empty() {
        let r: Row = serde_json::from_str(r#"{"id":"r9","order":3}"#).unwrap();
        assert!(r.data.is_empty());
        assert_eq!(r.order, 3);
    }
}
