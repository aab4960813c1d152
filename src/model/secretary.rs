use super::{CODE_MAX, EMAIL_MAX, NAME_MAX};
use crate::resource::Resource;
use crate::schema::{ColumnDef, TableDef};
use crate::service::ValidationRule;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

const PHONE_PATTERN: &str = r"^[0-9()+\-. ]{8,32}$";

pub const SECRETARY_TABLE: TableDef = TableDef {
    table_name: "secretarios",
    columns: &[
        ColumnDef::required("nome", "text"),
        ColumnDef::optional("email", "text"),
        ColumnDef::optional("telefone", "text"),
    ],
    includes: &[],
    checks: &[],
};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Secretary {
    pub id: i64,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(rename = "telefone", default)]
    pub phone: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SecretaryInput {
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(rename = "telefone", default)]
    pub phone: Option<String>,
}

pub struct Secretaries;

impl Resource for Secretaries {
    type Record = Secretary;
    type Input = SecretaryInput;

    const PATH: &'static str = "secretarios";
    const LABEL: &'static str = "secretary";
    const TABLE: &'static TableDef = &SECRETARY_TABLE;
    const RULES: &'static [(&'static str, ValidationRule)] = &[
        ("nome", ValidationRule::new().required().max_length(NAME_MAX)),
        ("email", ValidationRule::new().format("email").max_length(EMAIL_MAX)),
        ("telefone", ValidationRule::new().pattern(PHONE_PATTERN).max_length(CODE_MAX)),
    ];

    fn id(record: &Secretary) -> i64 {
        record.id
    }
}
