//! Builds parameterized INSERT, SELECT, UPDATE, DELETE from static table definitions.

use crate::schema::{TableDef, CREATED_AT, PK_COLUMN, UPDATED_AT};
use serde_json::{Map, Value};

/// Alias of the main table when includes are selected as subqueries.
const MAIN_ALIAS: &str = "main";

/// Quote identifier for PostgreSQL (safe: only from static definitions).
pub(crate) fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

/// Full qualified table name.
pub(crate) fn qualified_table(schema: &str, table: &str) -> String {
    format!("{}.{}", quoted(schema), quoted(table))
}

#[derive(Debug)]
pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<Value>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    fn push_param(&mut self, v: Value) -> usize {
        self.params.push(v);
        self.params.len()
    }
}

/// SELECT list: id, writable columns, timestamps. Numeric columns are read back as float8
/// so they decode as JSON numbers.
fn select_column_list(table: &TableDef, alias: Option<&str>) -> Vec<String> {
    let prefix = alias.map(|a| format!("{}.", a)).unwrap_or_default();
    let mut cols = vec![format!("{}{}", prefix, quoted(PK_COLUMN))];
    for c in table.columns {
        let q = quoted(c.name);
        if c.pg_type.starts_with("numeric") {
            cols.push(format!("{}{}::float8 AS {}", prefix, q, q));
        } else {
            cols.push(format!("{}{}", prefix, q));
        }
    }
    cols.push(format!("{}{}", prefix, quoted(CREATED_AT)));
    cols.push(format!("{}{}", prefix, quoted(UPDATED_AT)));
    cols
}

/// Main columns plus one `row_to_json` scalar subquery per include.
fn select_with_includes(table: &TableDef, schema: &str) -> String {
    let mut parts = select_column_list(table, Some(MAIN_ALIAS));
    for inc in table.includes {
        let rel_table = qualified_table(schema, inc.related.table_name);
        let rel_cols = select_column_list(inc.related, None).join(", ");
        parts.push(format!(
            "(SELECT row_to_json(sub) FROM (SELECT {} FROM {} WHERE {} = {}.{}) sub) AS {}",
            rel_cols,
            rel_table,
            quoted(PK_COLUMN),
            MAIN_ALIAS,
            quoted(inc.column),
            quoted(inc.name)
        ));
    }
    format!(
        "SELECT {} FROM {} {}",
        parts.join(", "),
        qualified_table(schema, table.table_name),
        MAIN_ALIAS
    )
}

/// Placeholder cast to the column type so text values bind into typed columns.
fn placeholder(n: usize, pg_type: &str) -> String {
    format!("${}::{}", n, pg_type)
}

/// SELECT every row ordered by primary key, with includes embedded.
pub fn select_list(table: &TableDef, schema: &str) -> QueryBuf {
    let mut q = QueryBuf::new();
    q.sql = format!(
        "{} ORDER BY {}.{}",
        select_with_includes(table, schema),
        MAIN_ALIAS,
        quoted(PK_COLUMN)
    );
    q
}

/// SELECT by primary key, with includes embedded.
pub fn select_by_id(table: &TableDef, schema: &str, id: i64) -> QueryBuf {
    let mut q = QueryBuf::new();
    let n = q.push_param(Value::from(id));
    q.sql = format!(
        "{} WHERE {}.{} = {}",
        select_with_includes(table, schema),
        MAIN_ALIAS,
        quoted(PK_COLUMN),
        placeholder(n, "bigint")
    );
    q
}

/// INSERT every writable column (missing values become NULL). Returns the new id.
pub fn insert(table: &TableDef, schema: &str, row: &Map<String, Value>) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut cols = Vec::with_capacity(table.columns.len());
    let mut placeholders = Vec::with_capacity(table.columns.len());
    for c in table.columns {
        let val = row.get(c.name).cloned().unwrap_or(Value::Null);
        let n = q.push_param(val);
        cols.push(quoted(c.name));
        placeholders.push(placeholder(n, c.pg_type));
    }
    q.sql = format!(
        "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
        qualified_table(schema, table.table_name),
        cols.join(", "),
        placeholders.join(", "),
        quoted(PK_COLUMN)
    );
    q
}

/// UPDATE by id replacing every writable column and bumping `updatedAt`. Returns the id,
/// or no row when the id does not exist.
pub fn update(table: &TableDef, schema: &str, id: i64, row: &Map<String, Value>) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut sets = Vec::with_capacity(table.columns.len() + 1);
    for c in table.columns {
        let val = row.get(c.name).cloned().unwrap_or(Value::Null);
        let n = q.push_param(val);
        sets.push(format!("{} = {}", quoted(c.name), placeholder(n, c.pg_type)));
    }
    sets.push(format!("{} = NOW()", quoted(UPDATED_AT)));
    let id_param = q.push_param(Value::from(id));
    q.sql = format!(
        "UPDATE {} SET {} WHERE {} = {} RETURNING {}",
        qualified_table(schema, table.table_name),
        sets.join(", "),
        quoted(PK_COLUMN),
        placeholder(id_param, "bigint"),
        quoted(PK_COLUMN)
    );
    q
}

/// DELETE by id, returning the id when a row was removed.
pub fn delete(table: &TableDef, schema: &str, id: i64) -> QueryBuf {
    let mut q = QueryBuf::new();
    let n = q.push_param(Value::from(id));
    q.sql = format!(
        "DELETE FROM {} WHERE {} = {} RETURNING {}",
        qualified_table(schema, table.table_name),
        quoted(PK_COLUMN),
        placeholder(n, "bigint"),
        quoted(PK_COLUMN)
    );
    q
}

/// COUNT rows whose `column` equals `id`. Used for reference checks before delete.
pub fn count_where(table: &TableDef, schema: &str, column: &str, id: i64) -> QueryBuf {
    let mut q = QueryBuf::new();
    let n = q.push_param(Value::from(id));
    q.sql = format!(
        "SELECT COUNT(*) AS count FROM {} WHERE {} = {}",
        qualified_table(schema, table.table_name),
        quoted(column),
        placeholder(n, "bigint")
    );
    q
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ColumnDef, IncludeDef};
    use serde_json::json;

    static OWNER: TableDef = TableDef {
        table_name: "owners",
        columns: &[ColumnDef::required("nome", "text")],
        includes: &[],
        checks: &[],
    };

    static PET: TableDef = TableDef {
        table_name: "pets",
        columns: &[
            ColumnDef::required("nome", "text"),
            ColumnDef::optional("peso", "numeric(12,2)"),
            ColumnDef::required("OwnerId", "bigint"),
        ],
        includes: &[IncludeDef {
            name: "Owner",
            column: "OwnerId",
            related: &OWNER,
        }],
        checks: &[],
    };

    #[test]
    fn quotes_embedded_double_quotes() {
        assert_eq!(quoted("a\"b"), "\"a\"\"b\"");
    }

    #[test]
    fn list_embeds_includes_and_orders_by_id() {
        let q = select_list(&PET, "clinic");
        assert!(q.params.is_empty());
        assert!(q.sql.starts_with("SELECT main.\"id\", main.\"nome\", main.\"peso\"::float8 AS \"peso\""));
        assert!(q.sql.contains(
            "(SELECT row_to_json(sub) FROM (SELECT \"id\", \"nome\", \"createdAt\", \"updatedAt\" FROM \"clinic\".\"owners\" WHERE \"id\" = main.\"OwnerId\") sub) AS \"Owner\""
        ));
        assert!(q.sql.ends_with("FROM \"clinic\".\"pets\" main ORDER BY main.\"id\""));
    }

    #[test]
    fn insert_binds_every_column_with_casts() {
        let mut row = Map::new();
        row.insert("nome".into(), json!("Rex"));
        row.insert("OwnerId".into(), json!(3));
        let q = insert(&PET, "clinic", &row);
        assert_eq!(
            q.sql,
            "INSERT INTO \"clinic\".\"pets\" (\"nome\", \"peso\", \"OwnerId\") VALUES ($1::text, $2::numeric(12,2), $3::bigint) RETURNING \"id\""
        );
        assert_eq!(q.params, vec![json!("Rex"), Value::Null, json!(3)]);
    }

    #[test]
    fn update_replaces_all_columns_and_touches_timestamp() {
        let mut row = Map::new();
        row.insert("nome".into(), json!("Rex"));
        let q = update(&OWNER, "clinic", 7, &row);
        assert_eq!(
            q.sql,
            "UPDATE \"clinic\".\"owners\" SET \"nome\" = $1::text, \"updatedAt\" = NOW() WHERE \"id\" = $2::bigint RETURNING \"id\""
        );
        assert_eq!(q.params, vec![json!("Rex"), json!(7)]);
    }

    #[test]
    fn delete_and_count_bind_id() {
        let q = delete(&OWNER, "clinic", 4);
        assert_eq!(q.params, vec![json!(4)]);
        assert!(q.sql.starts_with("DELETE FROM \"clinic\".\"owners\" WHERE \"id\" = $1::bigint"));

        let q = count_where(&PET, "clinic", "OwnerId", 4);
        assert_eq!(
            q.sql,
            "SELECT COUNT(*) AS count FROM \"clinic\".\"pets\" WHERE \"OwnerId\" = $1::bigint"
        );
    }
}
