//! The `Resource` seam: one implementation per CRUD-exposed entity.

use crate::error::AppError;
use crate::schema::TableDef;
use crate::service::ValidationRule;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use utoipa::ToSchema;

/// A foreign key carried by an input: `label` names the target in error messages.
#[derive(Clone, Debug)]
pub struct Reference {
    pub label: &'static str,
    pub table: &'static TableDef,
    pub id: i64,
}

pub trait Resource: Send + Sync + 'static {
    /// Persisted record as returned by the API.
    type Record: Serialize + DeserializeOwned + ToSchema + Clone + Send + Sync + 'static;
    /// Body accepted by create and update. Field names equal column names.
    type Input: Serialize + DeserializeOwned + ToSchema + Clone + Send + Sync + 'static;

    /// Path segment, e.g. "animais".
    const PATH: &'static str;
    /// Singular label for messages and logs.
    const LABEL: &'static str;
    const TABLE: &'static TableDef;
    const RULES: &'static [(&'static str, ValidationRule)];
    /// (table, column) pairs pointing at this resource; a referenced row cannot be deleted.
    const REFERENCED_BY: &'static [(&'static TableDef, &'static str)] = &[];

    fn id(record: &Self::Record) -> i64;

    fn references(_input: &Self::Input) -> Vec<Reference> {
        Vec::new()
    }

    fn into_row(input: &Self::Input) -> Result<Map<String, Value>, AppError> {
        match serde_json::to_value(input) {
            Ok(Value::Object(m)) => Ok(m),
            Ok(_) => Err(AppError::Internal(format!("{} input is not an object", Self::LABEL))),
            Err(e) => Err(AppError::Internal(e.to_string())),
        }
    }
}

/// Treats an explicit JSON null like an absent field.
pub(crate) fn null_as_default<'de, D, T>(d: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + serde::Deserialize<'de>,
{
    use serde::Deserialize;
    Ok(Option::<T>::deserialize(d)?.unwrap_or_default())
}
