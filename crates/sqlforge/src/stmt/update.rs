//! UPDATE statement builder.

use super::{FieldValue, Statement, StatementKind};
use crate::error::{SqlError, SqlResult};
use crate::literal::{Expr, Operand, RenderContext, SqlLiteral, Where, render_conditions};
use crate::platform::Platform;
use crate::value::Value;
use std::sync::Arc;

/// UPDATE builder with AND-ed WHERE conditions.
#[derive(Debug, Clone, Default)]
pub struct Update {
    platform: Option<Arc<dyn Platform>>,
    table: Option<String>,
    set_fields: Vec<(String, FieldValue)>,
    wheres: Vec<Where>,
}

impl Update {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a platform.
    pub fn with_platform(mut self, platform: Arc<dyn Platform>) -> Self {
        self.platform = Some(platform);
        self
    }

    /// Target table.
    pub fn table(mut self, table: &str) -> Self {
        self.table = Some(table.to_string());
        self
    }

    /// Append one `field = value` assignment.
    pub fn set(mut self, field: &str, value: impl Into<FieldValue>) -> Self {
        self.set_fields.push((field.to_string(), value.into()));
        self
    }

    /// Append an assignment only when `value` is `Some`.
    pub fn set_opt<T: Into<Value>>(self, field: &str, value: Option<T>) -> Self {
        match value {
            Some(v) => self.set(field, v.into()),
            None => self,
        }
    }

    /// Append an assignment to raw SQL (`"count" + 1`, `NOW()`, ...).
    pub fn set_raw(self, field: &str, sql: &str) -> Self {
        self.set(field, SqlLiteral::new(sql))
    }

    /// Replace all assignments.
    pub fn sets<I, K, V>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<FieldValue>,
    {
        self.set_fields = pairs
            .into_iter()
            .map(|(k, v)| (k.as_ref().to_string(), v.into()))
            .collect();
        self
    }

    /// Add WHERE: field = operand.
    pub fn where_eq(mut self, field: impl Into<Expr>, operand: impl Into<Operand>) -> Self {
        self.wheres.push(Where::eq(field, operand));
        self
    }

    /// Add WHERE with an explicit operator.
    pub fn where_op(
        mut self,
        field: impl Into<Expr>,
        operand: impl Into<Operand>,
        operator: &str,
    ) -> SqlResult<Self> {
        self.wheres.push(Where::new(field, operand, operator)?);
        Ok(self)
    }

    /// Add a prepared WHERE condition.
    pub fn and_where(mut self, condition: Where) -> Self {
        self.wheres.push(condition);
        self
    }
}

impl Statement for Update {
    fn kind(&self) -> StatementKind {
        StatementKind::Update
    }

    fn platform(&self) -> Option<&Arc<dyn Platform>> {
        self.platform.as_ref()
    }

    fn render_statement(&self, ctx: &mut RenderContext<'_>) -> SqlResult<String> {
        let table = self.table.as_deref().ok_or(SqlError::MissingTable)?;
        if self.set_fields.is_empty() {
            return Err(SqlError::no_fields("UPDATE has no SET fields"));
        }

        let mut sets = Vec::with_capacity(self.set_fields.len());
        for (field, value) in &self.set_fields {
            let field = ctx.identifier(field);
            sets.push(format!("{} = {}", field, value.render("update", ctx)?));
        }

        let mut sql = format!(
            "UPDATE {} SET {}",
            ctx.identifier_list(table, &[]),
            sets.join(", ")
        );
        sql.push_str(&render_conditions("WHERE", &self.wheres, ctx)?);
        Ok(sql)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::param::ParamContainer;
    use crate::platform::DialectPlatform;
    use crate::stmt::Select;

    #[test]
    fn test_update_basic() {
        let qb = Update::new()
            .with_platform(DialectPlatform::ansi().into_shared())
            .table("users")
            .set("name", "Bob")
            .set_opt("nick", None::<&str>)
            .set_raw("login_count", r#""login_count" + 1"#)
            .where_eq("id", 7);
        assert_eq!(
            qb.compile().unwrap(),
            r#"UPDATE "users" SET "name" = 'Bob', "login_count" = "login_count" + 1 WHERE "id" = 7"#
        );
    }

    #[test]
    fn test_update_parameter_order() {
        let qb = Update::new()
            .with_platform(DialectPlatform::postgres().into_shared())
            .table("users")
            .set("name", "Bob")
            .set("age", 30)
            .where_op("id", vec![1, 2], "IN")
            .unwrap();
        let mut params = ParamContainer::new();
        let sql = qb.compile_with_parameters(&mut params, true).unwrap();
        assert_eq!(
            sql,
            r#"UPDATE "users" SET "name" = $1, "age" = $2 WHERE "id" IN ($3, $4)"#
        );
        assert_eq!(
            params.names().collect::<Vec<_>>(),
            vec!["update1", "update2", "where3", "where4"]
        );
    }

    #[test]
    fn test_sets_replaces() {
        let qb = Update::new()
            .with_platform(DialectPlatform::mysql().into_shared())
            .table("t")
            .set("a", 1)
            .sets([("b", true)]);
        assert_eq!(qb.compile().unwrap(), "UPDATE `t` SET `b` = 1");
    }

    #[test]
    fn test_update_where_subquery() {
        let vip = Select::new().column("user_id").from("vip");
        let qb = Update::new()
            .with_platform(DialectPlatform::ansi().into_shared())
            .table("users")
            .set("tier", "gold")
            .where_eq("id", vip);
        let mut params = ParamContainer::new();
        assert_eq!(
            qb.compile_with_parameters(&mut params, true).unwrap(),
            r#"UPDATE "users" SET "tier" = :update1 WHERE "id" IN (SELECT "user_id" FROM "vip")"#
        );
    }

    #[test]
    fn test_update_errors() {
        let platform = DialectPlatform::ansi().into_shared();
        assert_eq!(
            Update::new().with_platform(platform.clone()).set("a", 1).compile().unwrap_err(),
            SqlError::MissingTable
        );
        let err = Update::new().with_platform(platform).table("t").compile().unwrap_err();
        assert!(matches!(err, SqlError::NoFieldsDefined(_)));
        assert_eq!(
            Update::new().table("t").set("a", 1).compile().unwrap_err(),
            SqlError::MissingAdapter
        );
    }
}
