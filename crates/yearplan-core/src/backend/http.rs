//! HTTP client for the year plan collaborator API.

use super::{Backend, ColumnPatch, NewColumn, NewRow, ReorderRequest, RowPatch};
use crate::error::{Result, YearPlanError};
use reqwest::Method;
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use yearplan_model::{Column, ColumnId, Direction, Row, RowId};

/// Header carrying the owning scope (school) of every request.
pub const SCOPE_HEADER: &str = "X-Scope";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
const MAX_ERROR_MESSAGE_CHARS: usize = 200;

/// Blocking JSON client for `/year-plan/*`.
#[derive(Clone, Debug)]
pub struct HttpBackend {
    base_url: String,
    scope: Option<String>,
    client: Client,
}

impl HttpBackend {
    /// Create a client with the default localhost URL
    pub fn new() -> Result<Self> {
        Self::with_url("http://localhost:8000", DEFAULT_TIMEOUT)
    }

    /// Create a client for `base_url` with a per-request timeout
    pub fn with_url(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            scope: None,
            client,
        })
    }

    /// Send `scope` with every request.
    pub fn with_scope(mut self, scope: Option<String>) -> Self {
        self.scope = scope.filter(|s| !s.trim().is_empty());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}/year-plan/{}", self.base_url, path);
        log::debug!("{} {}", method, url);
        let builder = self.client.request(method, url);
        match &self.scope {
            Some(scope) => builder.header(SCOPE_HEADER, scope),
            None => builder,
        }
    }

    fn send(&self, builder: RequestBuilder) -> Result<Response> {
        let response = builder.send()?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().unwrap_or_default();
        Err(YearPlanError::Status {
            status: status.as_u16(),
            message: truncate_message(body.trim()),
        })
    }

    fn fetch<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let text = self.send(self.request(Method::GET, path))?.text()?;
        Ok(serde_json::from_str(&text)?)
    }

    fn reorder(&self, path: String, direction: Direction) -> Result<()> {
        self.send(
            self.request(Method::POST, &path)
                .json(&ReorderRequest { direction }),
        )?;
        Ok(())
    }
}

fn truncate_message(body: &str) -> String {
    if body.chars().count() <= MAX_ERROR_MESSAGE_CHARS {
        return body.to_string();
    }
    let mut out: String = body.chars().take(MAX_ERROR_MESSAGE_CHARS).collect();
    out.push('…');
    out
}

impl Backend for HttpBackend {
    fn list_columns(&self) -> Result<Vec<Column>> {
        self.fetch("columns")
    }

    fn create_column(&self, column: &NewColumn) -> Result<()> {
        self.send(self.request(Method::POST, "columns").json(column))?;
        Ok(())
    }

    fn update_column(&self, id: &ColumnId, patch: &ColumnPatch) -> Result<()> {
        self.send(
            self.request(Method::PATCH, &format!("columns/{}", id))
                .json(patch),
        )?;
        Ok(())
    }

    fn delete_column(&self, id: &ColumnId) -> Result<()> {
        self.send(self.request(Method::DELETE, &format!("columns/{}", id)))?;
        Ok(())
    }

    fn reorder_column(&self, id: &ColumnId, direction: Direction) -> Result<()> {
        self.reorder(format!("columns/{}/reorder", id), direction)
    }

    fn list_rows(&self) -> Result<Vec<Row>> {
        self.fetch("rows")
    }

    fn create_row(&self, row: &NewRow) -> Result<()> {
        self.send(self.request(Method::POST, "rows").json(row))?;
        Ok(())
    }

    fn update_row(&self, id: &RowId, patch: &RowPatch) -> Result<()> {
        self.send(self.request(Method::PATCH, &format!("rows/{}", id)).json(patch))?;
        Ok(())
    }

    fn delete_row(&self, id: &RowId) -> Result<()> {
        self.send(self.request(Method::DELETE, &format!("rows/{}", id)))?;
        Ok(())
    }

    fn reorder_row(&self, id: &RowId, direction: Direction) -> Result<()> {
        self.reorder(format!("rows/{}/reorder", id), direction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_drops_trailing_slash() {
        let backend = HttpBackend::with_url("http://example.test/api/", DEFAULT_TIMEOUT).unwrap();
        assert_eq!(backend.base_url(), "http://example.test/api");
    }

    #[test]
    fn blank_scope_is_ignored() {
        let backend = HttpBackend::new().unwrap().with_scope(Some("  ".into()));
        assert!(backend.scope.is_none());
    }

    #[test]
    fn long_error_bodies_are_truncated() {
        let body = "x".repeat(500);
        let msg = truncate_message(&body);
        assert_eq!(msg.chars().count(), MAX_ERROR_MESSAGE_CHARS + 1);
        assert!(msg.ends_with('…'));
        assert_eq!(truncate_message("not found"), "not found");
    }
}
