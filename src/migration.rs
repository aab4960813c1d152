//! Create the clinic schema and tables: DDL generated from the static table definitions.
//! Tables are created in dependency order so foreign keys resolve.

use crate::error::AppError;
use crate::model::{ANIMAL_TABLE, CONSULTATION_TABLE, SECRETARY_TABLE, VETERINARIAN_TABLE};
use crate::schema::{TableDef, CREATED_AT, PK_COLUMN, UPDATED_AT};
use crate::sql::{qualified_table, quoted};
use sqlx::PgPool;

/// Every table, referenced tables first.
pub const TABLES: [&TableDef; 4] = [
    &ANIMAL_TABLE,
    &VETERINARIAN_TABLE,
    &SECRETARY_TABLE,
    &CONSULTATION_TABLE,
];

/// `CREATE TABLE IF NOT EXISTS` for one table, with foreign keys for its includes.
/// Referenced rows cannot be deleted while a reference exists (`ON DELETE RESTRICT`).
pub fn table_ddl(table: &TableDef, schema: &str) -> String {
    let mut defs = vec![format!("{} BIGSERIAL PRIMARY KEY", quoted(PK_COLUMN))];
    for c in table.columns {
        let mut def = format!("{} {}", quoted(c.name), c.pg_type.to_uppercase());
        if !c.nullable {
            def.push_str(" NOT NULL");
        }
        defs.push(def);
    }
    defs.push(format!("{} TIMESTAMPTZ NOT NULL DEFAULT NOW()", quoted(CREATED_AT)));
    defs.push(format!("{} TIMESTAMPTZ NOT NULL DEFAULT NOW()", quoted(UPDATED_AT)));
    for inc in table.includes {
        defs.push(format!(
            "FOREIGN KEY ({}) REFERENCES {} ({}) ON DELETE RESTRICT",
            quoted(inc.column),
            qualified_table(schema, inc.related.table_name),
            quoted(PK_COLUMN)
        ));
    }
    for check in table.checks {
        defs.push(format!("CHECK ({})", check));
    }
    format!(
        "CREATE TABLE IF NOT EXISTS {} (\n    {}\n)",
        qualified_table(schema, table.table_name),
        defs.join(",\n    ")
    )
}

/// Index per foreign key column so reference checks and embeds stay cheap.
pub fn index_ddl(table: &TableDef, schema: &str) -> Vec<String> {
    table
        .includes
        .iter()
        .map(|inc| {
            format!(
                "CREATE INDEX IF NOT EXISTS {} ON {} ({})",
                quoted(&format!("{}_{}_idx", table.table_name, inc.column)),
                qualified_table(schema, table.table_name),
                quoted(inc.column)
            )
        })
        .collect()
}

/// Create schema and tables if missing. Idempotent.
pub async fn apply_migrations(pool: &PgPool, schema: &str) -> Result<(), AppError> {
    sqlx::query(&format!("CREATE SCHEMA IF NOT EXISTS {}", quoted(schema)))
        .execute(pool)
        .await?;
    for table in TABLES {
        let ddl = table_ddl(table, schema);
        tracing::debug!(sql = %ddl, "migration");
        sqlx::query(&ddl).execute(pool).await?;
        for idx in index_ddl(table, schema) {
            sqlx::query(&idx).execute(pool).await?;
        }
    }
    tracing::info!(schema, tables = TABLES.len(), "schema ready");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn referenced_tables_come_first() {
        let pos = |name: &str| TABLES.iter().position(|t| t.table_name == name).unwrap();
        for table in TABLES {
            for inc in table.includes {
                assert!(pos(inc.related.table_name) < pos(table.table_name));
            }
        }
    }

    #[test]
    fn consultation_ddl_has_restricting_foreign_keys_and_checks() {
        let ddl = table_ddl(&CONSULTATION_TABLE, "clinic");
        assert!(ddl.starts_with("CREATE TABLE IF NOT EXISTS \"clinic\".\"consultas\" ("));
        assert!(ddl.contains("\"id\" BIGSERIAL PRIMARY KEY"));
        assert!(ddl.contains("\"dataHora\" TIMESTAMPTZ NOT NULL"));
        assert!(ddl.contains("\"valor\" NUMERIC(12,2),"));
        assert!(ddl.contains(
            "FOREIGN KEY (\"AnimalId\") REFERENCES \"clinic\".\"animais\" (\"id\") ON DELETE RESTRICT"
        ));
        assert!(ddl.contains("CHECK (\"valor\" >= 0)"));
        assert!(ddl.contains("'Em andamento'"));
    }

    #[test]
    fn plain_tables_have_no_indexes() {
        assert!(index_ddl(&ANIMAL_TABLE, "clinic").is_empty());
        assert_eq!(index_ddl(&CONSULTATION_TABLE, "clinic").len(), 2);
    }
}
