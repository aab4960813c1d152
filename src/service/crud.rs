//! Generic CRUD execution: validate, decode, check references, persist, decode back.

use crate::error::AppError;
use crate::resource::Resource;
use crate::service::RequestValidator;
use crate::store::{Row, Store};
use serde_json::Value;

pub struct CrudService;

impl CrudService {
    /// Every record of `R`, ordered by id.
    pub async fn list<R: Resource>(store: &dyn Store) -> Result<Vec<R::Record>, AppError> {
        let rows = store.list(R::TABLE).await?;
        rows.into_iter().map(decode::<R>).collect()
    }

    /// One record by id, or `NotFound`.
    pub async fn read<R: Resource>(store: &dyn Store, id: i64) -> Result<R::Record, AppError> {
        let row = store
            .fetch(R::TABLE, id)
            .await?
            .ok_or_else(|| not_found::<R>(id))?;
        decode::<R>(row)
    }

    /// Validate the body, resolve references and insert.
    pub async fn create<R: Resource>(store: &dyn Store, body: Value) -> Result<R::Record, AppError> {
        let input = Self::parse_input::<R>(body)?;
        Self::check_references::<R>(store, &input).await?;
        let row = R::into_row(&input)?;
        let created = decode::<R>(store.insert(R::TABLE, &row).await?)?;
        tracing::info!(resource = R::PATH, id = R::id(&created), "created");
        Ok(created)
    }

    /// Full replacement of record `id`. A missing id is `NotFound` whatever the body holds.
    pub async fn update<R: Resource>(store: &dyn Store, id: i64, body: Value) -> Result<R::Record, AppError> {
        if store.fetch(R::TABLE, id).await?.is_none() {
            return Err(not_found::<R>(id));
        }
        let input = Self::parse_input::<R>(body)?;
        Self::check_references::<R>(store, &input).await?;
        let row = R::into_row(&input)?;
        let updated = store
            .update(R::TABLE, id, &row)
            .await?
            .ok_or_else(|| not_found::<R>(id))?;
        tracing::info!(resource = R::PATH, id, "updated");
        decode::<R>(updated)
    }

    /// Remove record `id`. Rejected with `Conflict` while other rows reference it.
    pub async fn delete<R: Resource>(store: &dyn Store, id: i64) -> Result<(), AppError> {
        if store.fetch(R::TABLE, id).await?.is_none() {
            return Err(not_found::<R>(id));
        }
        for (table, column) in R::REFERENCED_BY {
            let count = store.count_where(table, column, id).await?;
            if count > 0 {
                return Err(AppError::Conflict(format!(
                    "{} {} is referenced by {} row(s) in {}",
                    R::LABEL,
                    id,
                    count,
                    table.table_name
                )));
            }
        }
        if !store.delete(R::TABLE, id).await? {
            return Err(not_found::<R>(id));
        }
        tracing::info!(resource = R::PATH, id, "deleted");
        Ok(())
    }

    /// Rule validation on the raw body, then typed decoding.
    fn parse_input<R: Resource>(body: Value) -> Result<R::Input, AppError> {
        let body = body_to_map(body)?;
        RequestValidator::validate(&body, R::RULES)?;
        serde_json::from_value(Value::Object(body))
            .map_err(|e| AppError::Validation(format!("invalid {}: {}", R::LABEL, e)))
    }

    async fn check_references<R: Resource>(store: &dyn Store, input: &R::Input) -> Result<(), AppError> {
        for r in R::references(input) {
            if store.fetch(r.table, r.id).await?.is_none() {
                return Err(AppError::NotFound(format!("{} {}", r.label, r.id)));
            }
        }
        Ok(())
    }
}

fn body_to_map(value: Value) -> Result<Row, AppError> {
    match value {
        Value::Object(m) => Ok(m),
        _ => Err(AppError::Validation("body must be a JSON object".into())),
    }
}

fn decode<R: Resource>(row: Value) -> Result<R::Record, AppError> {
    serde_json::from_value(row).map_err(|e| AppError::Internal(format!("decode {}: {}", R::LABEL, e)))
}

fn not_found<R: Resource>(id: i64) -> AppError {
    AppError::NotFound(format!("{} {}", R::LABEL, id))
}
