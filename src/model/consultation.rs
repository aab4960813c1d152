use super::{Animal, Veterinarian, ANIMAL_TABLE, TEXT_MAX, VETERINARIAN_TABLE};
use crate::resource::{null_as_default, Reference, Resource};
use crate::schema::{ColumnDef, IncludeDef, TableDef};
use crate::service::ValidationRule;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Largest amount a NUMERIC(12,2) column holds.
const MAX_VALUE: f64 = 9_999_999_999.99;

pub const CONSULTATION_TABLE: TableDef = TableDef {
    table_name: "consultas",
    columns: &[
        ColumnDef::required("dataHora", "timestamptz"),
        ColumnDef::optional("motivo", "text"),
        ColumnDef::required("status", "text"),
        ColumnDef::optional("anotacoes", "text"),
        ColumnDef::optional("valor", "numeric(12,2)"),
        ColumnDef::required("AnimalId", "bigint"),
        ColumnDef::required("VeterinarioId", "bigint"),
    ],
    includes: &[
        IncludeDef {
            name: "Animal",
            column: "AnimalId",
            related: &ANIMAL_TABLE,
        },
        IncludeDef {
            name: "Veterinario",
            column: "VeterinarioId",
            related: &VETERINARIAN_TABLE,
        },
    ],
    checks: &[
        "\"status\" IN ('Agendada', 'Concluída', 'Cancelada', 'Em andamento')",
        "\"valor\" >= 0",
    ],
};

/// Lifecycle of a consultation. Serialized with the clinic's Portuguese labels; the
/// English names are accepted on input.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum ConsultationStatus {
    #[default]
    #[serde(rename = "Agendada", alias = "Scheduled")]
    Scheduled,
    #[serde(rename = "Concluída", alias = "Completed")]
    Completed,
    #[serde(rename = "Cancelada", alias = "Cancelled")]
    Cancelled,
    #[serde(rename = "Em andamento", alias = "InProgress")]
    InProgress,
}

impl ConsultationStatus {
    pub const ALL: [ConsultationStatus; 4] = [
        ConsultationStatus::Scheduled,
        ConsultationStatus::Completed,
        ConsultationStatus::Cancelled,
        ConsultationStatus::InProgress,
    ];

    /// Every spelling accepted on input.
    pub const ACCEPTED: &'static [&'static str] = &[
        "Agendada",
        "Concluída",
        "Cancelada",
        "Em andamento",
        "Scheduled",
        "Completed",
        "Cancelled",
        "InProgress",
    ];

    pub fn label(self) -> &'static str {
        match self {
            ConsultationStatus::Scheduled => "Agendada",
            ConsultationStatus::Completed => "Concluída",
            ConsultationStatus::Cancelled => "Cancelada",
            ConsultationStatus::InProgress => "Em andamento",
        }
    }
}

impl std::fmt::Display for ConsultationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Consultation {
    pub id: i64,
    #[serde(rename = "dataHora")]
    pub scheduled_at: DateTime<Utc>,
    #[serde(rename = "motivo", default)]
    pub reason: Option<String>,
    pub status: ConsultationStatus,
    #[serde(rename = "anotacoes", default)]
    pub notes: Option<String>,
    #[serde(rename = "valor", default)]
    pub value: Option<f64>,
    #[serde(rename = "AnimalId")]
    pub animal_id: i64,
    #[serde(rename = "VeterinarioId")]
    pub veterinarian_id: i64,
    #[serde(rename = "Animal", default, skip_serializing_if = "Option::is_none")]
    pub animal: Option<Animal>,
    #[serde(rename = "Veterinario", default, skip_serializing_if = "Option::is_none")]
    pub veterinarian: Option<Veterinarian>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ConsultationInput {
    #[serde(rename = "dataHora")]
    pub scheduled_at: DateTime<Utc>,
    #[serde(rename = "motivo", default)]
    pub reason: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: ConsultationStatus,
    #[serde(rename = "anotacoes", default)]
    pub notes: Option<String>,
    #[serde(rename = "valor", default)]
    pub value: Option<f64>,
    #[serde(rename = "AnimalId")]
    pub animal_id: i64,
    #[serde(rename = "VeterinarioId")]
    pub veterinarian_id: i64,
}

pub struct Consultations;

impl Resource for Consultations {
    type Record = Consultation;
    type Input = ConsultationInput;

    const PATH: &'static str = "consultas";
    const LABEL: &'static str = "consultation";
    const TABLE: &'static TableDef = &CONSULTATION_TABLE;
    const RULES: &'static [(&'static str, ValidationRule)] = &[
        ("dataHora", ValidationRule::new().required().format("date-time")),
        ("motivo", ValidationRule::new().max_length(TEXT_MAX)),
        ("status", ValidationRule::new().allowed(ConsultationStatus::ACCEPTED)),
        ("anotacoes", ValidationRule::new().max_length(TEXT_MAX)),
        ("valor", ValidationRule::new().minimum(0.0).maximum(MAX_VALUE).decimals(2)),
        ("AnimalId", ValidationRule::new().required().minimum(1.0)),
        ("VeterinarioId", ValidationRule::new().required().minimum(1.0)),
    ];

    fn id(record: &Consultation) -> i64 {
        record.id
    }

    fn references(input: &ConsultationInput) -> Vec<Reference> {
        vec![
            Reference {
                label: "animal",
                table: &ANIMAL_TABLE,
                id: input.animal_id,
            },
            Reference {
                label: "veterinarian",
                table: &VETERINARIAN_TABLE,
                id: input.veterinarian_id,
            },
        ]
    }
}
