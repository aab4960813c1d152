use super::{EMAIL_MAX, NAME_MAX};
use crate::resource::Resource;
use crate::schema::{ColumnDef, TableDef};
use crate::service::ValidationRule;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const ANIMAL_TABLE: TableDef = TableDef {
    table_name: "animais",
    columns: &[
        ColumnDef::required("nome", "text"),
        ColumnDef::optional("especie", "text"),
        ColumnDef::optional("responsavelNome", "text"),
        ColumnDef::optional("responsavelEmail", "text"),
    ],
    includes: &[],
    checks: &[],
};

/// A patient and its owner's contact.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Animal {
    pub id: i64,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "especie", default)]
    pub species: Option<String>,
    #[serde(rename = "responsavelNome", default)]
    pub owner_name: Option<String>,
    #[serde(rename = "responsavelEmail", default)]
    pub owner_email: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AnimalInput {
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "especie", default)]
    pub species: Option<String>,
    #[serde(rename = "responsavelNome", default)]
    pub owner_name: Option<String>,
    #[serde(rename = "responsavelEmail", default)]
    pub owner_email: Option<String>,
}

pub struct Animals;

impl Resource for Animals {
    type Record = Animal;
    type Input = AnimalInput;

    const PATH: &'static str = "animais";
    const LABEL: &'static str = "animal";
    const TABLE: &'static TableDef = &ANIMAL_TABLE;
    const RULES: &'static [(&'static str, ValidationRule)] = &[
        ("nome", ValidationRule::new().required().max_length(NAME_MAX)),
        ("especie", ValidationRule::new().max_length(NAME_MAX)),
        ("responsavelNome", ValidationRule::new().max_length(NAME_MAX)),
        ("responsavelEmail", ValidationRule::new().format("email").max_length(EMAIL_MAX)),
    ];
    const REFERENCED_BY: &'static [(&'static TableDef, &'static str)] =
        &[(&super::CONSULTATION_TABLE, "AnimalId")];

    fn id(record: &Animal) -> i64 {
        record.id
    }
}
