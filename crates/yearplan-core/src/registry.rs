//! Column registry: the last fetched column list plus local width overrides.
//!
//! Operations validate and build a [`Command`]; they never change the
//! fetched list. The only local-only state is a per-column width override,
//! used while a resize is being dragged or persisted.

use crate::backend::{ColumnPatch, NewColumn};
use crate::command::Command;
use crate::error::{Result, YearPlanError};
use std::collections::HashMap;
use yearplan_model::reorder::{self, Direction};
use yearplan_model::{Column, ColumnId, ColumnType, DEFAULT_COLUMN_WIDTH, clamp_width};

#[derive(Clone, Debug, Default)]
pub struct ColumnRegistry {
    columns: Vec<Column>,
    width_overrides: HashMap<ColumnId, u32>,
}

impl ColumnRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the contents with a freshly fetched list.
    pub fn replace(&mut self, mut columns: Vec<Column>) {
        reorder::sort_by_order(&mut columns);
        self.columns = columns;
        self.width_overrides.clear();
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Columns in display order.
    pub fn iter(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter()
    }

    pub fn get(&self, id: &ColumnId) -> Option<&Column> {
        self.columns.iter().find(|c| &c.id == id)
    }

    pub fn at(&self, index: usize) -> Option<&Column> {
        self.columns.get(index)
    }

    pub fn position(&self, id: &ColumnId) -> Option<usize> {
        reorder::position_of(&self.columns, id)
    }

    pub fn contains(&self, id: &ColumnId) -> bool {
        self.get(id).is_some()
    }

    /// Rendered width: a local override if one is set, else the fetched width.
    pub fn width(&self, id: &ColumnId) -> Option<u32> {
        self.width_overrides
            .get(id)
            .copied()
            .or_else(|| self.get(id).map(|c| c.width))
    }

    pub fn set_local_width(&mut self, id: &ColumnId, width: u32) {
        if self.contains(id) {
            self.width_overrides.insert(id.clone(), clamp_width(width as i64));
        }
    }

    pub fn clear_local_width(&mut self, id: &ColumnId) {
        self.width_overrides.remove(id);
    }

    pub fn add_column(&self, name: &str, kind: ColumnType) -> Result<Command> {
        let name = name.trim();
        if name.is_empty() {
            return Err(YearPlanError::EmptyColumnName);
        }
        Ok(Command::AddColumn(NewColumn {
            name: name.to_string(),
            kind,
            order: self.columns.len() as u32,
            width: DEFAULT_COLUMN_WIDTH,
        }))
    }

    /// Replace name and type together; order and width are untouched.
    pub fn rename_or_retype(&self, id: &ColumnId, name: &str, kind: ColumnType) -> Result<Command> {
        self.require(id)?;
        let name = name.trim();
        if name.is_empty() {
            return Err(YearPlanError::EmptyColumnName);
        }
        Ok(Command::UpdateColumn {
            id: id.clone(),
            patch: ColumnPatch {
                name: Some(name.to_string()),
                kind: Some(kind),
                width: None,
            },
        })
    }

    pub fn resize(&self, id: &ColumnId, width: i64) -> Result<Command> {
        self.require(id)?;
        Ok(Command::UpdateColumn {
            id: id.clone(),
            patch: ColumnPatch {
                width: Some(clamp_width(width)),
                ..Default::default()
            },
        })
    }

    pub fn can_move(&self, id: &ColumnId, direction: Direction) -> bool {
        reorder::can_move(&self.columns, id, direction)
    }

    /// `None` when `id` is already first (up) or last (down), or unknown.
    pub fn reorder(&self, id: &ColumnId, direction: Direction) -> Option<Command> {
        self.can_move(id, direction).then(|| Command::ReorderColumn {
            id: id.clone(),
            direction,
        })
    }

    /// Row data referencing the column is left as is.
    pub fn delete(&self, id: &ColumnId) -> Result<Command> {
        self.require(id)?;
        Ok(Command::DeleteColumn(id.clone()))
    }

    fn require(&self, id: &ColumnId) -> Result<&Column> {
        self.get(id)
            .ok_or_else(|| YearPlanError::UnknownColumn(id.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn col(id: &str, name: &str, order: u32) -> Column {
        Column {
            id: ColumnId::from(id),
            name: name.to_string(),
            kind: ColumnType::Text,
            width: 200,
            order,
            scope: None,
        }
    }

    fn registry() -> ColumnRegistry {
        let mut reg = ColumnRegistry::new();
        reg.replace(vec![col("b", "Planregel", 1), col("a", "Subsysteem", 0)]);
        reg
    }

    #[test]
    fn replace_sorts_by_order() {
        let reg = registry();
        let names: Vec<&str> = reg.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Subsysteem", "Planregel"]);
    }

    #[test]
    fn add_column_appends_with_default_width() {
        let reg = registry();
        match reg.add_column("Budget", ColumnType::Currency).unwrap() {
            Command::AddColumn(new) => {
                assert_eq!(new.order, 2);
                assert_eq!(new.width, DEFAULT_COLUMN_WIDTH);
                assert_eq!(new.kind, ColumnType::Currency);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn empty_names_are_rejected() {
        let reg = registry();
        assert!(matches!(
            reg.add_column("   ", ColumnType::Text),
            Err(YearPlanError::EmptyColumnName)
        ));
        assert!(matches!(
            reg.rename_or_retype(&ColumnId::from("a"), "", ColumnType::Text),
            Err(YearPlanError::EmptyColumnName)
        ));
    }

    #[test]
    fn rename_touches_only_name_and_type() {
        let reg = registry();
        let cmd = reg
            .rename_or_retype(&ColumnId::from("a"), "Onderdeel", ColumnType::Currency)
            .unwrap();
        match cmd {
            Command::UpdateColumn { patch, .. } => {
                assert_eq!(patch.name.as_deref(), Some("Onderdeel"));
                assert_eq!(patch.kind, Some(ColumnType::Currency));
                assert_eq!(patch.width, None);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn resize_clamps_to_minimum() {
        let reg = registry();
        let cmd = reg.resize(&ColumnId::from("a"), 40).unwrap();
        assert_eq!(
            cmd,
            Command::UpdateColumn {
                id: ColumnId::from("a"),
                patch: ColumnPatch {
                    width: Some(100),
                    ..Default::default()
                },
            }
        );
    }

    #[test]
    fn reorder_at_boundaries_is_none() {
        let reg = registry();
        assert!(reg.reorder(&ColumnId::from("a"), Direction::Up).is_none());
        assert!(reg.reorder(&ColumnId::from("b"), Direction::Down).is_none());
        assert!(reg.reorder(&ColumnId::from("a"), Direction::Down).is_some());
    }

    #[test]
    fn unknown_column_is_reported() {
        let reg = registry();
        assert!(matches!(
            reg.delete(&ColumnId::from("zz")),
            Err(YearPlanError::UnknownColumn(_))
        ));
    }

    #[test]
    fn local_width_overrides_until_replaced() {
        let mut reg = registry();
        let a = ColumnId::from("a");
        reg.set_local_width(&a, 260);
        assert_eq!(reg.width(&a), Some(260));
        reg.clear_local_width(&a);
        assert_eq!(reg.width(&a), Some(200));

        reg.set_local_width(&a, 300);
        reg.replace(vec![col("a", "Subsysteem", 0)]);
        assert_eq!(reg.width(&a), Some(200));
    }
}
