//! Row store: the last fetched row list.

use crate::backend::{NewRow, RowPatch};
use crate::command::Command;
use crate::error::{Result, YearPlanError};
use crate::registry::ColumnRegistry;
use yearplan_model::reorder::{self, Direction};
use yearplan_model::{ColumnId, ColumnType, Row, RowId, blank_data, canonicalize};

#[derive(Clone, Debug, Default)]
pub struct RowStore {
    rows: Vec<Row>,
}

impl RowStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace(&mut self, mut rows: Vec<Row>) {
        reorder::sort_by_order(&mut rows);
        self.rows = rows;
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter()
    }

    pub fn get(&self, id: &RowId) -> Option<&Row> {
        self.rows.iter().find(|r| &r.id == id)
    }

    pub fn at(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    pub fn position(&self, id: &RowId) -> Option<usize> {
        reorder::position_of(&self.rows, id)
    }

    /// Raw persisted value of a cell; empty when the row or key is absent.
    pub fn raw_value(&self, row: &RowId, column: &ColumnId) -> &str {
        self.get(row).map(|r| r.value(column)).unwrap_or("")
    }

    /// New row with an empty value for every current column.
    pub fn add_row(&self, columns: &ColumnRegistry) -> Result<Command> {
        if columns.is_empty() {
            return Err(YearPlanError::NoColumns);
        }
        Ok(Command::AddRow(NewRow {
            data: blank_data(columns.iter()),
            order: self.rows.len() as u32,
        }))
    }

    /// Merge one cell into the row's data and persist the whole map.
    ///
    /// Currency columns store the canonical form of `raw`; everything else is
    /// stored unmodified. `None` when the row does not exist.
    pub fn update_cell(
        &self,
        row_id: &RowId,
        column_id: &ColumnId,
        raw: &str,
        columns: &ColumnRegistry,
    ) -> Option<Command> {
        let row = self.get(row_id)?;
        let kind = columns
            .get(column_id)
            .map(|c| c.kind)
            .unwrap_or(ColumnType::Text);
        let value = match kind {
            ColumnType::Currency => canonicalize(raw),
            ColumnType::Text => raw.to_string(),
        };
        Some(Command::UpdateRow {
            id: row_id.clone(),
            patch: RowPatch {
                data: row.merged(column_id, value),
            },
        })
    }

    pub fn delete_row(&self, id: &RowId) -> Result<Command> {
        if self.get(id).is_none() {
            return Err(YearPlanError::UnknownRow(id.clone()));
        }
        Ok(Command::DeleteRow(id.clone()))
    }

    pub fn can_move(&self, id: &RowId, direction: Direction) -> bool {
        reorder::can_move(&self.rows, id, direction)
    }

    /// `None` when `id` is already first (up) or last (down), or unknown.
    pub fn reorder(&self, id: &RowId, direction: Direction) -> Option<Command> {
        self.can_move(id, direction).then(|| Command::ReorderRow {
            id: id.clone(),
            direction,
        })
    }

    /// Data keys that no longer match a live column, per row.
    pub fn orphaned_keys(&self, columns: &ColumnRegistry) -> Vec<(RowId, ColumnId)> {
        self.rows
            .iter()
            .flat_map(|row| {
                row.data
                    .keys()
                    .filter(|key| !columns.contains(key))
                    .map(|key| (row.id.clone(), key.clone()))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use yearplan_model::Column;

    fn columns() -> ColumnRegistry {
        let mut reg = ColumnRegistry::new();
        reg.replace(vec![
            Column {
                id: ColumnId::from("text"),
                name: "Planregel".into(),
                kind: ColumnType::Text,
                width: 200,
                order: 0,
                scope: None,
            },
            Column {
                id: ColumnId::from("money"),
                name: "Begroting".into(),
                kind: ColumnType::Currency,
                width: 200,
                order: 1,
                scope: None,
            },
        ]);
        reg
    }

    fn store() -> RowStore {
        let mut store = RowStore::new();
        store.replace(vec![Row {
            id: RowId::from("r1"),
            data: [
                (ColumnId::from("text"), "Dak".to_string()),
                (ColumnId::from("gone"), "orphan".to_string()),
            ]
            .into_iter()
            .collect(),
            order: 0,
            scope: None,
        }]);
        store
    }

    #[test]
    fn add_row_requires_a_column() {
        let store = RowStore::new();
        assert!(matches!(
            store.add_row(&ColumnRegistry::new()),
            Err(YearPlanError::NoColumns)
        ));
    }

    #[test]
    fn add_row_initializes_every_column_empty() {
        let store = store();
        match store.add_row(&columns()).unwrap() {
            Command::AddRow(new) => {
                assert_eq!(new.order, 1);
                assert_eq!(new.data.len(), 2);
                assert_eq!(new.data[&ColumnId::from("money")], "");
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn update_cell_canonicalizes_currency_columns() {
        let cmd = store()
            .update_cell(&RowId::from("r1"), &ColumnId::from("money"), "€ 15.5", &columns())
            .unwrap();
        match cmd {
            Command::UpdateRow { patch, .. } => {
                assert_eq!(patch.data[&ColumnId::from("money")], "15,50");
                assert_eq!(patch.data[&ColumnId::from("text")], "Dak");
                assert_eq!(patch.data[&ColumnId::from("gone")], "orphan");
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn update_cell_keeps_text_verbatim() {
        let cmd = store()
            .update_cell(&RowId::from("r1"), &ColumnId::from("text"), "  15.5 ", &columns())
            .unwrap();
        match cmd {
            Command::UpdateRow { patch, .. } => {
                assert_eq!(patch.data[&ColumnId::from("text")], "  15.5 ");
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn update_cell_on_missing_row_is_a_no_op() {
        assert!(
            store()
                .update_cell(&RowId::from("nope"), &ColumnId::from("text"), "x", &columns())
                .is_none()
        );
    }

    #[test]
    fn orphaned_keys_are_reported_not_removed() {
        let store = store();
        let orphans = store.orphaned_keys(&columns());
        assert_eq!(orphans, vec![(RowId::from("r1"), ColumnId::from("gone"))]);
        assert_eq!(store.raw_value(&RowId::from("r1"), &ColumnId::from("gone")), "orphan");
    }

    #[test]
    fn single_row_cannot_move() {
        let store = store();
        assert!(store.reorder(&RowId::from("r1"), Direction::Up).is_none());
        assert!(store.reorder(&RowId::from("r1"), Direction::Down).is_none());
    }
}
