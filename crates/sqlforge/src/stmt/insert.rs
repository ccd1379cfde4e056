//! INSERT statement builder.

use super::{FieldValue, Select, Statement, StatementKind};
use crate::error::{SqlError, SqlResult};
use crate::literal::{RenderContext, SqlLiteral};
use crate::platform::Platform;
use crate::value::Value;
use std::sync::Arc;

/// Where the inserted rows come from.
#[derive(Debug, Clone)]
enum Source {
    /// `VALUES (...)`, one value per field
    Values(Vec<FieldValue>),
    /// `INSERT ... SELECT`
    Select(Box<Select>),
}

/// INSERT builder.
///
/// Rows come either from `(field, value)` pairs or from a nested SELECT;
/// choosing one source discards the other.
#[derive(Debug, Clone)]
pub struct Insert {
    platform: Option<Arc<dyn Platform>>,
    table: Option<String>,
    fields: Vec<String>,
    source: Source,
}

impl Default for Insert {
    fn default() -> Self {
        Self {
            platform: None,
            table: None,
            fields: Vec::new(),
            source: Source::Values(Vec::new()),
        }
    }
}

impl Insert {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a platform.
    pub fn with_platform(mut self, platform: Arc<dyn Platform>) -> Self {
        self.platform = Some(platform);
        self
    }

    /// Target table.
    pub fn into(mut self, table: &str) -> Self {
        self.table = Some(table.to_string());
        self
    }

    /// Append one `(field, value)` pair.
    pub fn value(mut self, field: &str, value: impl Into<FieldValue>) -> Self {
        let value = value.into();
        match &mut self.source {
            Source::Values(values) => values.push(value),
            Source::Select(_) => {
                self.fields.clear();
                self.source = Source::Values(vec![value]);
            }
        }
        self.fields.push(field.to_string());
        self
    }

    /// Append a pair only when `value` is `Some`.
    pub fn value_opt<T: Into<Value>>(self, field: &str, value: Option<T>) -> Self {
        match value {
            Some(v) => self.value(field, v.into()),
            None => self,
        }
    }

    /// Append a field whose value is raw SQL (`NOW()`, `DEFAULT`, ...).
    pub fn value_raw(self, field: &str, sql: &str) -> Self {
        self.value(field, SqlLiteral::new(sql))
    }

    /// Replace all pairs.
    pub fn values<I, K, V>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<FieldValue>,
    {
        let (fields, values): (Vec<String>, Vec<FieldValue>) = pairs
            .into_iter()
            .map(|(k, v)| (k.as_ref().to_string(), v.into()))
            .unzip();
        self.fields = fields;
        self.source = Source::Values(values);
        self
    }

    /// Insert the rows produced by `select` into `fields`.
    ///
    /// The select must produce exactly one column per field.
    pub fn from_select<I, S>(mut self, fields: I, select: Select) -> SqlResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let fields: Vec<String> = fields.into_iter().map(|f| f.as_ref().to_string()).collect();
        let (expected, actual) = (fields.len(), select.column_count());
        if expected != actual {
            sql_event!(debug, expected, actual, "rejected INSERT ... SELECT");
            return Err(SqlError::column_count(expected, actual));
        }
        self.fields = fields;
        self.source = Source::Select(Box::new(select));
        Ok(self)
    }

    /// Number of target fields.
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }
}

impl Statement for Insert {
    fn kind(&self) -> StatementKind {
        StatementKind::Insert
    }

    fn platform(&self) -> Option<&Arc<dyn Platform>> {
        self.platform.as_ref()
    }

    fn render_statement(&self, ctx: &mut RenderContext<'_>) -> SqlResult<String> {
        let table = self.table.as_deref().ok_or(SqlError::MissingTable)?;
        if self.fields.is_empty() {
            return Err(SqlError::no_fields("INSERT has no fields"));
        }

        let fields: Vec<String> = self.fields.iter().map(|f| ctx.identifier(f)).collect();
        let mut sql = format!(
            "INSERT INTO {} ({})",
            ctx.identifier_list(table, &[]),
            fields.join(", ")
        );

        match &self.source {
            Source::Values(values) => {
                let mut rendered = Vec::with_capacity(values.len());
                for value in values {
                    rendered.push(value.render("insert", ctx)?);
                }
                sql.push_str(" VALUES (");
                sql.push_str(&rendered.join(", "));
                sql.push(')');
            }
            Source::Select(select) => {
                sql.push(' ');
                sql.push_str(&select.render_statement(ctx)?);
            }
        }

        Ok(sql)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::literal::{SqlFunction, Where};
    use crate::param::ParamContainer;
    use crate::platform::DialectPlatform;

    fn ansi() -> Arc<dyn Platform> {
        DialectPlatform::ansi().into_shared()
    }

    #[test]
    fn test_insert_values() {
        let qb = Insert::new()
            .with_platform(ansi())
            .into("users")
            .value("name", "Bob")
            .value("age", 30)
            .value_opt("nick", None::<String>);
        assert_eq!(
            qb.compile().unwrap(),
            r#"INSERT INTO "users" ("name", "age") VALUES ('Bob', 30)"#
        );
        assert_eq!(qb.field_count(), 2);
    }

    #[test]
    fn test_insert_parameterized() {
        let qb = Insert::new()
            .with_platform(ansi())
            .into("users")
            .value("name", "Bob")
            .value_raw("created_at", "NOW()")
            .value("email", Some("bob@example.com"));
        let mut params = ParamContainer::new();
        let sql = qb.compile_with_parameters(&mut params, true).unwrap();
        assert_eq!(
            sql,
            r#"INSERT INTO "users" ("name", "created_at", "email") VALUES (:insert1, NOW(), :insert2)"#
        );
        assert_eq!(params.names().collect::<Vec<_>>(), vec!["insert1", "insert2"]);
    }

    #[test]
    fn test_values_replaces() {
        let qb = Insert::new()
            .with_platform(ansi())
            .into("t")
            .value("a", 1)
            .values([("b", 2), ("c", 3)]);
        assert_eq!(
            qb.compile().unwrap(),
            r#"INSERT INTO "t" ("b", "c") VALUES (2, 3)"#
        );
    }

    #[test]
    fn test_function_value() {
        let qb = Insert::new()
            .with_platform(ansi())
            .into("t")
            .value("name", SqlFunction::new("upper").value("bob"));
        assert_eq!(
            qb.compile().unwrap(),
            r#"INSERT INTO "t" ("name") VALUES (UPPER('bob'))"#
        );
    }

    #[test]
    fn test_insert_from_select() {
        let select = Select::new()
            .columns(["id", "name"])
            .from("users")
            .and_where(Where::eq("active", false));
        let qb = Insert::new()
            .with_platform(ansi())
            .into("archived_users")
            .from_select(["id", "name"], select)
            .unwrap();

        let mut params = ParamContainer::new();
        assert_eq!(
            qb.compile_with_parameters(&mut params, true).unwrap(),
            r#"INSERT INTO "archived_users" ("id", "name") SELECT "id", "name" FROM "users" WHERE "active" = :where1"#
        );
        assert_eq!(params.get("where1"), Some(&Value::Bool(false)));
    }

    #[test]
    fn test_from_select_arity() {
        let select = Select::new().columns(["id", "name"]).from("users");
        let err = Insert::new().into("t").from_select(["id"], select).unwrap_err();
        assert!(err.is_column_count_mismatch());
    }

    #[test]
    fn test_value_after_select_discards_select() {
        let select = Select::new().column("id").from("users");
        let qb = Insert::new()
            .with_platform(ansi())
            .into("t")
            .from_select(["id"], select)
            .unwrap()
            .value("name", "x");
        assert_eq!(
            qb.compile().unwrap(),
            r#"INSERT INTO "t" ("name") VALUES ('x')"#
        );
    }

    #[test]
    fn test_errors() {
        assert_eq!(
            Insert::new().into("t").value("a", 1).compile().unwrap_err(),
            SqlError::MissingAdapter
        );
        assert_eq!(
            Insert::new().with_platform(ansi()).value("a", 1).compile().unwrap_err(),
            SqlError::MissingTable
        );
        let err = Insert::new().with_platform(ansi()).into("t").compile().unwrap_err();
        assert!(matches!(err, SqlError::NoFieldsDefined(_)));
    }
}
