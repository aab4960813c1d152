//! In-memory store.
//!
//! Keeps every table as an ordered map behind a lock, hands out ids from per-table
//! counters and embeds includes by lookup, mirroring what `PgStore` returns. Used for
//! tests and for running the server without a database (`STORE_BACKEND=memory`).

use super::{Row, Store};
use crate::error::AppError;
use crate::schema::{TableDef, CREATED_AT, PK_COLUMN, UPDATED_AT};
use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

#[derive(Clone, Default)]
pub struct MemoryStore {
    data: Arc<RwLock<MemoryData>>,
}

struct MemoryData {
    tables: HashMap<&'static str, BTreeMap<i64, Row>>,
    next_ids: HashMap<&'static str, i64>,
    available: bool,
}

impl Default for MemoryData {
    fn default() -> Self {
        Self {
            tables: HashMap::new(),
            next_ids: HashMap::new(),
            available: true,
        }
    }
}

impl MemoryData {
    fn check_available(&self) -> Result<(), AppError> {
        if self.available {
            Ok(())
        } else {
            Err(AppError::ServiceUnavailable("memory store marked unavailable".into()))
        }
    }

    fn row(&self, table: &str, id: i64) -> Option<&Row> {
        self.tables.get(table).and_then(|t| t.get(&id))
    }

    /// Row as returned to callers: stored columns plus one entry per include.
    fn render(&self, table: &TableDef, row: &Row) -> Value {
        let mut out = row.clone();
        for inc in table.includes {
            let related = row
                .get(inc.column)
                .and_then(Value::as_i64)
                .and_then(|id| self.row(inc.related.table_name, id))
                .map(|r| Value::Object(r.clone()))
                .unwrap_or(Value::Null);
            out.insert(inc.name.to_string(), related);
        }
        Value::Object(out)
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggle availability; while unavailable every operation fails with
    /// `ServiceUnavailable`.
    pub fn set_available(&self, available: bool) {
        self.data.write().available = available;
    }

    /// Number of rows currently stored in `table`.
    pub fn len(&self, table: &TableDef) -> usize {
        self.data
            .read()
            .tables
            .get(table.table_name)
            .map(BTreeMap::len)
            .unwrap_or(0)
    }

    pub fn is_empty(&self, table: &TableDef) -> bool {
        self.len(table) == 0
    }
}

fn now() -> Value {
    Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true))
}

/// Copy writable columns out of `row`, rejecting NULL in required columns like the
/// database's NOT NULL constraints would.
fn writable_columns(table: &TableDef, row: &Row) -> Result<Row, AppError> {
    let mut out = Row::new();
    for c in table.columns {
        let val = row.get(c.name).cloned().unwrap_or(Value::Null);
        if val.is_null() && !c.nullable {
            return Err(AppError::Validation(format!(
                "null value in column \"{}\" of relation \"{}\"",
                c.name, table.table_name
            )));
        }
        out.insert(c.name.to_string(), val);
    }
    Ok(out)
}

#[async_trait]
impl Store for MemoryStore {
    async fn list(&self, table: &TableDef) -> Result<Vec<Value>, AppError> {
        let data = self.data.read();
        data.check_available()?;
        Ok(data
            .tables
            .get(table.table_name)
            .map(|rows| rows.values().map(|r| data.render(table, r)).collect())
            .unwrap_or_default())
    }

    async fn fetch(&self, table: &TableDef, id: i64) -> Result<Option<Value>, AppError> {
        let data = self.data.read();
        data.check_available()?;
        Ok(data.row(table.table_name, id).map(|r| data.render(table, r)))
    }

    async fn insert(&self, table: &TableDef, row: &Row) -> Result<Value, AppError> {
        let mut stored = writable_columns(table, row)?;
        let mut data = self.data.write();
        data.check_available()?;
        let next = data.next_ids.entry(table.table_name).or_insert(1);
        let id = *next;
        *next += 1;
        let ts = now();
        stored.insert(PK_COLUMN.to_string(), Value::from(id));
        stored.insert(CREATED_AT.to_string(), ts.clone());
        stored.insert(UPDATED_AT.to_string(), ts);
        data.tables
            .entry(table.table_name)
            .or_default()
            .insert(id, stored.clone());
        tracing::debug!(table = table.table_name, id, "memory insert");
        Ok(data.render(table, &stored))
    }

    async fn update(&self, table: &TableDef, id: i64, row: &Row) -> Result<Option<Value>, AppError> {
        let replacement = writable_columns(table, row)?;
        let mut data = self.data.write();
        data.check_available()?;
        let Some(existing) = data.tables.get_mut(table.table_name).and_then(|t| t.get_mut(&id)) else {
            return Ok(None);
        };
        for (k, v) in replacement {
            existing.insert(k, v);
        }
        existing.insert(UPDATED_AT.to_string(), now());
        let updated = existing.clone();
        tracing::debug!(table = table.table_name, id, "memory update");
        Ok(Some(data.render(table, &updated)))
    }

    async fn delete(&self, table: &TableDef, id: i64) -> Result<bool, AppError> {
        let mut data = self.data.write();
        data.check_available()?;
        let removed = data
            .tables
            .get_mut(table.table_name)
            .and_then(|t| t.remove(&id))
            .is_some();
        tracing::debug!(table = table.table_name, id, removed, "memory delete");
        Ok(removed)
    }

    async fn count_where(&self, table: &TableDef, column: &str, id: i64) -> Result<u64, AppError> {
        let data = self.data.read();
        data.check_available()?;
        Ok(data
            .tables
            .get(table.table_name)
            .map(|rows| {
                rows.values()
                    .filter(|r| r.get(column).and_then(Value::as_i64) == Some(id))
                    .count() as u64
            })
            .unwrap_or(0))
    }

    async fn ping(&self) -> Result<(), AppError> {
        self.data.read().check_available()
    }
}
