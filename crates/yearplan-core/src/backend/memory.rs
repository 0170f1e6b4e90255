//! In-process stand-in for the collaborator backend.
//!
//! Mirrors the server behavior the grid relies on: id assignment, contiguous
//! `order` per list, adjacent-swap reordering and width clamping. Clones share
//! state, so a test can keep a handle while the grid owns another.

use super::{Backend, ColumnPatch, NewColumn, NewRow, RowPatch};
use crate::error::{Result, YearPlanError};
use std::sync::{Arc, Mutex, MutexGuard};
use yearplan_model::reorder::{self, Ordered};
use yearplan_model::{Column, ColumnId, Direction, Row, RowId, clamp_width};

#[derive(Default)]
struct State {
    columns: Vec<Column>,
    rows: Vec<Row>,
    next_id: u64,
    scope: Option<String>,
    fail_mutations: u32,
    fail_fetches: u32,
    requests: Vec<String>,
}

impl State {
    fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{}-{}", prefix, self.next_id)
    }
}

#[derive(Clone, Default)]
pub struct MemoryBackend {
    state: Arc<Mutex<State>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamp created entities with `scope`.
    pub fn with_scope(self, scope: Option<String>) -> Self {
        self.lock().scope = scope;
        self
    }

    /// Backend pre-filled with a small sample plan.
    pub fn demo() -> Self {
        let backend = Self::new();
        {
            let mut state = backend.lock();
            let names = [
                ("Subsysteem", yearplan_model::ColumnType::Text, 200),
                ("Planregel", yearplan_model::ColumnType::Text, 320),
                ("Begroting", yearplan_model::ColumnType::Currency, 160),
            ];
            for (order, (name, kind, width)) in names.into_iter().enumerate() {
                let id = state.next_id("col");
                state.columns.push(Column {
                    id: ColumnId::new(id),
                    name: name.to_string(),
                    kind,
                    width,
                    order: order as u32,
                    scope: None,
                });
            }
            let samples = [
                ["Dak", "Dakbedekking vervangen gymzaal", "18500,00"],
                ["Verwarming", "Ketel onderhoud", "1250,5"],
                ["Elektra", "Noodverlichting keuren", "640,00"],
            ];
            for (order, values) in samples.into_iter().enumerate() {
                let data = state
                    .columns
                    .iter()
                    .zip(values)
                    .map(|(col, v)| (col.id.clone(), v.to_string()))
                    .collect();
                let id = state.next_id("row");
                state.rows.push(Row {
                    id: RowId::new(id),
                    data,
                    order: order as u32,
                    scope: None,
                });
            }
        }
        backend
    }

    /// Make the next `n` mutating calls fail.
    pub fn fail_mutations(&self, n: u32) {
        self.lock().fail_mutations = n;
    }

    /// Make the next `n` list calls fail.
    pub fn fail_fetches(&self, n: u32) {
        self.lock().fail_fetches = n;
    }

    /// Requests received so far, as `METHOD path` lines.
    pub fn requests(&self) -> Vec<String> {
        self.lock().requests.clone()
    }

    pub fn columns(&self) -> Vec<Column> {
        self.lock().columns.clone()
    }

    pub fn rows(&self) -> Vec<Row> {
        self.lock().rows.clone()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        // A panic while holding the lock leaves plain data behind; keep serving it.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn fetch(&self, request: &str) -> Result<MutexGuard<'_, State>> {
        let mut state = self.lock();
        state.requests.push(request.to_string());
        if state.fail_fetches > 0 {
            state.fail_fetches -= 1;
            return Err(YearPlanError::Unavailable("simulated fetch failure".into()));
        }
        Ok(state)
    }

    fn mutate(&self, request: String) -> Result<MutexGuard<'_, State>> {
        let mut state = self.lock();
        state.requests.push(request);
        if state.fail_mutations > 0 {
            state.fail_mutations -= 1;
            return Err(YearPlanError::Unavailable("simulated mutation failure".into()));
        }
        Ok(state)
    }
}

fn not_found(kind: &str, id: &str) -> YearPlanError {
    YearPlanError::Status {
        status: 404,
        message: format!("{} {} not found", kind, id),
    }
}

/// Insert at the requested position (clamped to the end) and re-index.
fn insert_ordered<T: Ordered>(items: &mut Vec<T>, mut item: T, order: u32) {
    let at = (order as usize).min(items.len());
    item.set_order(order);
    items.insert(at, item);
    reorder::normalize_order(items);
}

impl Backend for MemoryBackend {
    fn list_columns(&self) -> Result<Vec<Column>> {
        Ok(self.fetch("GET columns")?.columns.clone())
    }

    fn create_column(&self, column: &NewColumn) -> Result<()> {
        let mut state = self.mutate("POST columns".into())?;
        let id = ColumnId::new(state.next_id("col"));
        let created = Column {
            id,
            name: column.name.clone(),
            kind: column.kind,
            width: clamp_width(column.width as i64),
            order: column.order,
            scope: state.scope.clone(),
        };
        insert_ordered(&mut state.columns, created, column.order);
        Ok(())
    }

    fn update_column(&self, id: &ColumnId, patch: &ColumnPatch) -> Result<()> {
        let mut state = self.mutate(format!("PATCH columns/{}", id))?;
        let column = state
            .columns
            .iter_mut()
            .find(|c| &c.id == id)
            .ok_or_else(|| not_found("column", id.as_str()))?;
        if let Some(name) = &patch.name {
            column.name = name.clone();
        }
        if let Some(kind) = patch.kind {
            column.kind = kind;
        }
        if let Some(width) = patch.width {
            column.width = clamp_width(width as i64);
        }
        Ok(())
    }

    fn delete_column(&self, id: &ColumnId) -> Result<()> {
        let mut state = self.mutate(format!("DELETE columns/{}", id))?;
        let idx = reorder::position_of(&state.columns, id)
            .ok_or_else(|| not_found("column", id.as_str()))?;
        state.columns.remove(idx);
        reorder::normalize_order(&mut state.columns);
        Ok(())
    }

    fn reorder_column(&self, id: &ColumnId, direction: Direction) -> Result<()> {
        let mut state = self.mutate(format!("POST columns/{}/reorder {}", id, direction.as_str()))?;
        if reorder::position_of(&state.columns, id).is_none() {
            return Err(not_found("column", id.as_str()));
        }
        reorder::swap_adjacent(&mut state.columns, id, direction);
        Ok(())
    }

    fn list_rows(&self) -> Result<Vec<Row>> {
        Ok(self.fetch("GET rows")?.rows.clone())
    }

    fn create_row(&self, row: &NewRow) -> Result<()> {
        let mut state = self.mutate("POST rows".into())?;
        let id = RowId::new(state.next_id("row"));
        let created = Row {
            id,
            data: row.data.clone(),
            order: row.order,
            scope: state.scope.clone(),
        };
        insert_ordered(&mut state.rows, created, row.order);
        Ok(())
    }

    fn update_row(&self, id: &RowId, patch: &RowPatch) -> Result<()> {
        let mut state = self.mutate(format!("PATCH rows/{}", id))?;
        let row = state
            .rows
            .iter_mut()
            .find(|r| &r.id == id)
            .ok_or_else(|| not_found("row", id.as_str()))?;
        row.data = patch.data.clone();
        Ok(())
    }

    fn delete_row(&self, id: &RowId) -> Result<()> {
        let mut state = self.mutate(format!("DELETE rows/{}", id))?;
        let idx =
            reorder::position_of(&state.rows, id).ok_or_else(|| not_found("row", id.as_str()))?;
        state.rows.remove(idx);
        reorder::normalize_order(&mut state.rows);
        Ok(())
    }

    fn reorder_row(&self, id: &RowId, direction: Direction) -> Result<()> {
        let mut state = self.mutate(format!("POST rows/{}/reorder {}", id, direction.as_str()))?;
        if reorder::position_of(&state.rows, id).is_none() {
            return Err(not_found("row", id.as_str()));
        }
        reorder::swap_adjacent(&mut state.rows, id, direction);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use yearplan_model::ColumnType;

    fn add_column(backend: &MemoryBackend, name: &str, order: u32) {
        backend
            .create_column(&NewColumn {
                name: name.into(),
                kind: ColumnType::Text,
                order,
                width: 200,
            })
            .unwrap();
    }

    #[test]
    fn create_assigns_ids_and_keeps_order_contiguous() {
        let backend = MemoryBackend::new();
        add_column(&backend, "A", 0);
        add_column(&backend, "B", 1);
        add_column(&backend, "C", 7);

        let cols = backend.list_columns().unwrap();
        let orders: Vec<u32> = cols.iter().map(|c| c.order).collect();
        assert_eq!(orders, vec![0, 1, 2]);
        assert_eq!(cols[2].name, "C");
        assert_ne!(cols[0].id, cols[1].id);
    }

    #[test]
    fn delete_reindexes_remaining_columns() {
        let backend = MemoryBackend::new();
        add_column(&backend, "A", 0);
        add_column(&backend, "B", 1);
        add_column(&backend, "C", 2);
        let b = backend.columns()[1].id.clone();

        backend.delete_column(&b).unwrap();

        let cols = backend.columns();
        assert_eq!(cols.len(), 2);
        assert_eq!(cols[1].name, "C");
        assert_eq!(cols[1].order, 1);
    }

    #[test]
    fn update_clamps_width() {
        let backend = MemoryBackend::new();
        add_column(&backend, "A", 0);
        let id = backend.columns()[0].id.clone();
        backend
            .update_column(
                &id,
                &ColumnPatch {
                    width: Some(12),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(backend.columns()[0].width, 100);
    }

    #[test]
    fn unknown_ids_are_not_found() {
        let backend = MemoryBackend::new();
        let err = backend.delete_row(&RowId::from("nope")).unwrap_err();
        assert!(matches!(err, YearPlanError::Status { status: 404, .. }));
    }

    #[test]
    fn injected_failures_are_consumed() {
        let backend = MemoryBackend::new();
        backend.fail_mutations(1);
        assert!(backend.create_row(&NewRow { data: Default::default(), order: 0 }).is_err());
        assert!(backend.create_row(&NewRow { data: Default::default(), order: 0 }).is_ok());

        backend.fail_fetches(1);
        assert!(backend.list_rows().is_err());
        assert_eq!(backend.list_rows().unwrap().len(), 1);
    }

    #[test]
    fn demo_has_rows_for_every_column() {
        let backend = MemoryBackend::demo();
        let cols = backend.columns();
        for row in backend.rows() {
            for col in &cols {
                assert!(row.data.contains_key(&col.id));
            }
        }
    }
}
