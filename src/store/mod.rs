//! Persistence backends behind the CRUD service.
//!
//! A `Store` deals in untyped JSON rows keyed by static table definitions; typing
//! happens in the service. `PgStore` is the production backend, `MemoryStore` backs
//! development runs and tests.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::{ensure_database_exists, PgStore};

use crate::error::AppError;
use crate::schema::TableDef;
use async_trait::async_trait;
use serde_json::{Map, Value};

pub type Row = Map<String, Value>;

#[async_trait]
pub trait Store: Send + Sync {
    /// Every row ordered by id, includes embedded.
    async fn list(&self, table: &TableDef) -> Result<Vec<Value>, AppError>;

    async fn fetch(&self, table: &TableDef, id: i64) -> Result<Option<Value>, AppError>;

    /// Insert writable columns from `row`; returns the stored row with id and timestamps.
    async fn insert(&self, table: &TableDef, row: &Row) -> Result<Value, AppError>;

    /// Replace writable columns of row `id`. `None` when the id does not exist.
    async fn update(&self, table: &TableDef, id: i64, row: &Row) -> Result<Option<Value>, AppError>;

    /// Remove row `id`. `false` when the id does not exist.
    async fn delete(&self, table: &TableDef, id: i64) -> Result<bool, AppError>;

    /// Number of rows in `table` whose `column` equals `id`.
    async fn count_where(&self, table: &TableDef, column: &str, id: i64) -> Result<u64, AppError>;

    /// Cheap reachability check behind `/ready`.
    async fn ping(&self) -> Result<(), AppError>;
}
