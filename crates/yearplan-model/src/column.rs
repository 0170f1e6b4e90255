//! Column definitions for the year plan grid.

use crate::reorder::Ordered;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Narrowest width (in pixels) a column may be rendered or persisted with.
pub const MIN_COLUMN_WIDTH: u32 = 100;

/// Width assigned to newly added columns.
pub const DEFAULT_COLUMN_WIDTH: u32 = 200;

/// Clamp a requested width to [`MIN_COLUMN_WIDTH`].
pub fn clamp_width(width: i64) -> u32 {
    width.clamp(MIN_COLUMN_WIDTH as i64, u32::MAX as i64) as u32
}

/// Opaque, backend-assigned column identifier.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnId(pub String);

impl ColumnId {
    pub fn new(id: impl Into<String>) -> Self {
        ColumnId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ColumnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ColumnId {
    fn from(s: &str) -> Self {
        ColumnId(s.to_string())
    }
}

/// Value type of a column. Only two primitives exist.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    /// Free text, stored and displayed verbatim.
    #[default]
    Text,
    /// Monetary amount, stored in canonical decimal-comma form.
    Currency,
}

impl ColumnType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::Text => "text",
            ColumnType::Currency => "currency",
        }
    }

    /// Parse a user-entered type name (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "tekst" => Some(ColumnType::Text),
            "currency" | "valuta" | "money" => Some(ColumnType::Currency),
            _ => None,
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user-defined column of the grid.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub id: ColumnId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ColumnType,
    pub width: u32,
    pub order: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}

impl Column {
    pub fn is_currency(&self) -> bool {
        self.kind == ColumnType::Currency
    }
}

impl Ordered for Column {
    type Id = ColumnId;

    fn id(&self) -> &ColumnId {
        &self.id
    }

    fn order(&self) -> u32 {
        self.order
    }

    fn set_order(&mut self, order: u32) {
        self.order = order;
    }
}
