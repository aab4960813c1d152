use super::{CODE_MAX, NAME_MAX};
use crate::resource::Resource;
use crate::schema::{ColumnDef, TableDef};
use crate::service::ValidationRule;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const VETERINARIAN_TABLE: TableDef = TableDef {
    table_name: "veterinarios",
    columns: &[
        ColumnDef::required("nome", "text"),
        ColumnDef::optional("especialidade", "text"),
        ColumnDef::optional("crmv", "text"),
    ],
    includes: &[],
    checks: &[],
};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Veterinarian {
    pub id: i64,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "especialidade", default)]
    pub specialty: Option<String>,
    /// Regional veterinary council registration (CRMV).
    #[serde(rename = "crmv", default)]
    pub license: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct VeterinarianInput {
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "especialidade", default)]
    pub specialty: Option<String>,
    #[serde(rename = "crmv", default)]
    pub license: Option<String>,
}

pub struct Veterinarians;

impl Resource for Veterinarians {
    type Record = Veterinarian;
    type Input = VeterinarianInput;

    const PATH: &'static str = "veterinarios";
    const LABEL: &'static str = "veterinarian";
    const TABLE: &'static TableDef = &VETERINARIAN_TABLE;
    const RULES: &'static [(&'static str, ValidationRule)] = &[
        ("nome", ValidationRule::new().required().max_length(NAME_MAX)),
        ("especialidade", ValidationRule::new().max_length(NAME_MAX)),
        ("crmv", ValidationRule::new().max_length(CODE_MAX)),
    ];
    const REFERENCED_BY: &'static [(&'static TableDef, &'static str)] =
        &[(&super::CONSULTATION_TABLE, "VeterinarioId")];

    fn id(record: &Veterinarian) -> i64 {
        record.id
    }
}
