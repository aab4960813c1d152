//! Static table definitions shared by the SQL builder, the stores and the DDL bootstrap.

/// Primary key column of every table.
pub const PK_COLUMN: &str = "id";
/// Store-managed timestamps present on every table.
pub const CREATED_AT: &str = "createdAt";
pub const UPDATED_AT: &str = "updatedAt";

#[derive(Debug)]
pub struct ColumnDef {
    /// Column name; identical to the JSON field name on the wire.
    pub name: &'static str,
    /// PostgreSQL type used for DDL and placeholder casts (e.g. "text", "timestamptz").
    pub pg_type: &'static str,
    pub nullable: bool,
}

impl ColumnDef {
    pub const fn required(name: &'static str, pg_type: &'static str) -> Self {
        ColumnDef { name, pg_type, nullable: false }
    }

    pub const fn optional(name: &'static str, pg_type: &'static str) -> Self {
        ColumnDef { name, pg_type, nullable: true }
    }
}

/// A to-one embed: `column` on this table points at `related.id`, exposed under `name`.
#[derive(Debug)]
pub struct IncludeDef {
    pub name: &'static str,
    pub column: &'static str,
    pub related: &'static TableDef,
}

/// One relational table. `columns` lists only caller-writable columns; `id`, `createdAt`
/// and `updatedAt` are implied.
#[derive(Debug)]
pub struct TableDef {
    pub table_name: &'static str,
    pub columns: &'static [ColumnDef],
    pub includes: &'static [IncludeDef],
    /// CHECK constraint expressions added to the DDL.
    pub checks: &'static [&'static str],
}

impl TableDef {
    pub fn column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.name == name)
    }
}
