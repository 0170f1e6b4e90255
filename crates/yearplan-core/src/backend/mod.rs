//! Collaborator backend that persists columns and rows.
//!
//! The grid never trusts its own writes: every mutation is followed by a
//! refetch of the affected list (see [`crate::command`]).

mod http;
mod memory;

pub use http::HttpBackend;
pub use memory::MemoryBackend;

use crate::error::Result;
use serde::{Deserialize, Serialize};
use yearplan_model::{Column, ColumnId, ColumnType, Direction, Row, RowData, RowId};

/// Body of `POST /year-plan/columns`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewColumn {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ColumnType,
    pub order: u32,
    pub width: u32,
}

/// Body of `PATCH /year-plan/columns/{id}`; absent fields are left alone.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<ColumnType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
}

/// Body of `POST /year-plan/rows`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRow {
    pub data: RowData,
    pub order: u32,
}

/// Body of `PATCH /year-plan/rows/{id}`: always the full data map.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowPatch {
    pub data: RowData,
}

/// Body of the reorder endpoints.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReorderRequest {
    pub direction: Direction,
}

/// The HTTP surface the grid consumes, one method per endpoint.
pub trait Backend {
    fn list_columns(&self) -> Result<Vec<Column>>;
    fn create_column(&self, column: &NewColumn) -> Result<()>;
    fn update_column(&self, id: &ColumnId, patch: &ColumnPatch) -> Result<()>;
    fn delete_column(&self, id: &ColumnId) -> Result<()>;
    fn reorder_column(&self, id: &ColumnId, direction: Direction) -> Result<()>;

    fn list_rows(&self) -> Result<Vec<Row>>;
    fn create_row(&self, row: &NewRow) -> Result<()>;
    fn update_row(&self, id: &RowId, patch: &RowPatch) -> Result<()>;
    fn delete_row(&self, id: &RowId) -> Result<()>;
    fn reorder_row(&self, id: &RowId, direction: Direction) -> Result<()>;
}
