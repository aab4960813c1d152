//! PostgreSQL store: parameterized SQL from the builder, rows decoded to JSON.

use super::{Row, Store};
use crate::error::{AppError, ConfigError};
use crate::schema::TableDef;
use crate::sql::{self, PgBindValue, QueryBuf};
use async_trait::async_trait;
use serde_json::Value;
use sqlx::postgres::PgRow;
use sqlx::{ConnectOptions, PgPool};
use std::str::FromStr;

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
    schema: String,
}

impl PgStore {
    pub fn new(pool: PgPool, schema: impl Into<String>) -> Self {
        Self {
            pool,
            schema: schema.into(),
        }
    }

    async fn query_many(&self, q: &QueryBuf) -> Result<Vec<Value>, AppError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let mut query = sqlx::query(&q.sql);
        for p in &q.params {
            query = query.bind(PgBindValue::from_json(p));
        }
        let rows = query.fetch_all(&self.pool).await?;
        Ok(rows.iter().map(row_to_json).collect())
    }

    async fn query_optional(&self, q: &QueryBuf) -> Result<Option<Value>, AppError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let mut query = sqlx::query(&q.sql);
        for p in &q.params {
            query = query.bind(PgBindValue::from_json(p));
        }
        let row = query.fetch_optional(&self.pool).await?;
        Ok(row.map(|r| row_to_json(&r)))
    }

    /// Runs a statement returning `"id"` and yields that id when a row was affected.
    async fn returning_id(&self, q: &QueryBuf) -> Result<Option<i64>, AppError> {
        Ok(self
            .query_optional(q)
            .await?
            .and_then(|row| row.get("id").and_then(Value::as_i64)))
    }
}

#[async_trait]
impl Store for PgStore {
    async fn list(&self, table: &TableDef) -> Result<Vec<Value>, AppError> {
        self.query_many(&sql::select_list(table, &self.schema)).await
    }

    async fn fetch(&self, table: &TableDef, id: i64) -> Result<Option<Value>, AppError> {
        self.query_optional(&sql::select_by_id(table, &self.schema, id)).await
    }

    async fn insert(&self, table: &TableDef, row: &Row) -> Result<Value, AppError> {
        let id = self
            .returning_id(&sql::insert(table, &self.schema, row))
            .await?
            .ok_or_else(|| AppError::Db(sqlx::Error::RowNotFound))?;
        self.fetch(table, id)
            .await?
            .ok_or_else(|| AppError::Db(sqlx::Error::RowNotFound))
    }

    async fn update(&self, table: &TableDef, id: i64, row: &Row) -> Result<Option<Value>, AppError> {
        match self.returning_id(&sql::update(table, &self.schema, id, row)).await? {
            Some(id) => self.fetch(table, id).await,
            None => Ok(None),
        }
    }

    async fn delete(&self, table: &TableDef, id: i64) -> Result<bool, AppError> {
        Ok(self
            .returning_id(&sql::delete(table, &self.schema, id))
            .await?
            .is_some())
    }

    async fn count_where(&self, table: &TableDef, column: &str, id: i64) -> Result<u64, AppError> {
        let row = self
            .query_optional(&sql::count_where(table, &self.schema, column, id))
            .await?;
        Ok(row
            .and_then(|r| r.get("count").and_then(Value::as_u64))
            .unwrap_or(0))
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").fetch_optional(&self.pool).await?;
        Ok(())
    }
}

fn row_to_json(row: &PgRow) -> Value {
    use sqlx::Column;
    use sqlx::Row;
    let mut map = serde_json::Map::new();
    for col in row.columns() {
        let name = col.name();
        let v = cell_to_value(row, name);
        map.insert(name.to_string(), v);
    }
    Value::Object(map)
}

fn cell_to_value(row: &PgRow, name: &str) -> Value {
    use sqlx::Row;
    if let Ok(Some(n)) = row.try_get::<Option<i64>, _>(name) {
        return Value::Number(n.into());
    }
    if let Ok(Some(n)) = row.try_get::<Option<i32>, _>(name) {
        return Value::Number(n.into());
    }
    if let Ok(Some(n)) = row.try_get::<Option<f64>, _>(name) {
        if let Some(n) = serde_json::Number::from_f64(n) {
            return Value::Number(n);
        }
    }
    if let Ok(Some(b)) = row.try_get::<Option<bool>, _>(name) {
        return Value::Bool(b);
    }
    if let Ok(Some(d)) = row.try_get::<Option<chrono::DateTime<chrono::Utc>>, _>(name) {
        return Value::String(d.to_rfc3339());
    }
    if let Ok(Some(s)) = row.try_get::<Option<String>, _>(name) {
        return Value::String(s);
    }
    if let Ok(Some(j)) = row.try_get::<Option<serde_json::Value>, _>(name) {
        return j;
    }
    Value::Null
}

/// Create the database named in `database_url` when it does not exist yet, connecting
/// through the `postgres` maintenance database.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), AppError> {
    let (admin_url, db_name) = parse_db_name_from_url(database_url)?;
    if db_name.is_empty() || db_name == "postgres" {
        return Ok(());
    }
    let opts = sqlx::postgres::PgConnectOptions::from_str(&admin_url).map_err(|e| database_url_error(e.to_string()))?;
    let mut conn: sqlx::PgConnection = opts.connect().await?;
    let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
        .bind(&db_name)
        .fetch_one(&mut conn)
        .await?;
    if !exists.0 {
        tracing::info!(database = %db_name, "creating database");
        sqlx::query(&format!("CREATE DATABASE {}", sql::quoted(&db_name)))
            .execute(&mut conn)
            .await?;
    }
    Ok(())
}

fn database_url_error(message: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        key: "DATABASE_URL",
        message: message.into(),
    }
}

fn parse_db_name_from_url(url: &str) -> Result<(String, String), ConfigError> {
    let path_start = url.rfind('/').ok_or_else(|| database_url_error("no database path"))? + 1;
    let path_and_query = url.get(path_start..).unwrap_or("");
    let db_name = path_and_query.split('?').next().unwrap_or("").trim();
    let base = url.get(..path_start).unwrap_or(url);
    let admin_url = format!("{}postgres", base);
    Ok((admin_url, db_name.to_string()))
}
