//! JOIN clauses.

use super::{Expr, Literal, RenderContext};
use crate::error::{SqlError, SqlResult};
use crate::stmt::{Select, Statement};
use std::fmt;
use std::str::FromStr;

/// Join kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JoinKind {
    Inner,
    Left,
    Right,
    Full,
    Cross,
}

impl JoinKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            JoinKind::Inner => "INNER",
            JoinKind::Left => "LEFT",
            JoinKind::Right => "RIGHT",
            JoinKind::Full => "FULL",
            JoinKind::Cross => "CROSS",
        }
    }
}

impl fmt::Display for JoinKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JoinKind {
    type Err = SqlError;

    /// Accepts the five kinds case-insensitively, with an optional `OUTER`
    /// after LEFT/RIGHT/FULL.
    fn from_str(s: &str) -> SqlResult<Self> {
        let upper = s.trim().to_ascii_uppercase();
        let words: Vec<&str> = upper.split_whitespace().collect();
        let kind = match words.as_slice() {
            ["INNER"] => JoinKind::Inner,
            ["LEFT"] | ["LEFT", "OUTER"] => JoinKind::Left,
            ["RIGHT"] | ["RIGHT", "OUTER"] => JoinKind::Right,
            ["FULL"] | ["FULL", "OUTER"] => JoinKind::Full,
            ["CROSS"] => JoinKind::Cross,
            _ => {
                sql_event!(debug, kind = s, "rejected unknown join kind");
                return Err(SqlError::UnknownJoinKind(s.to_string()));
            }
        };
        Ok(kind)
    }
}

#[derive(Debug, Clone)]
enum JoinSource {
    Table(String),
    Subquery(Box<Select>),
}

/// A JOIN clause: kind, source, optional alias and AND-ed ON conditions.
///
/// # Example
/// ```ignore
/// let join = Join::new("left", "orders")?
///     .alias("o")
///     .on("u.id = o.user_id");
/// // LEFT JOIN "orders" AS "o" ON "u"."id" = "o"."user_id"
/// ```
#[derive(Debug, Clone)]
pub struct Join {
    kind: JoinKind,
    source: JoinSource,
    alias: Option<String>,
    conditions: Vec<Expr>,
}

impl Join {
    /// Join a table, parsing the kind from a string.
    pub fn new(kind: &str, table: &str) -> SqlResult<Self> {
        Ok(Self::with_kind(kind.parse()?, table))
    }

    /// Join a table with an already-typed kind.
    pub fn with_kind(kind: JoinKind, table: &str) -> Self {
        Self {
            kind,
            source: JoinSource::Table(table.to_string()),
            alias: None,
            conditions: Vec::new(),
        }
    }

    /// Join a nested SELECT; the alias is mandatory.
    pub fn subquery(kind: JoinKind, select: Select, alias: &str) -> SqlResult<Self> {
        if alias.trim().is_empty() {
            sql_event!(debug, kind = %kind, "rejected join subquery without alias");
            return Err(SqlError::invalid_alias("a joined subquery requires an alias"));
        }
        Ok(Self {
            kind,
            source: JoinSource::Subquery(Box::new(select)),
            alias: Some(alias.to_string()),
            conditions: Vec::new(),
        })
    }

    /// Set the table alias. An empty alias removes it; a joined subquery then
    /// fails to compile.
    pub fn alias(mut self, alias: &str) -> Self {
        self.alias = (!alias.trim().is_empty()).then(|| alias.to_string());
        self
    }

    /// Add an ON condition; multiple conditions are joined with AND.
    ///
    /// Strings are identifier-quoted token by token; literal nodes render
    /// themselves and may bind parameters.
    pub fn on(mut self, condition: impl Into<Expr>) -> Self {
        self.conditions.push(condition.into());
        self
    }

    pub fn kind(&self) -> JoinKind {
        self.kind
    }
}

impl Literal for Join {
    fn render(&self, ctx: &mut RenderContext<'_>) -> SqlResult<String> {
        let mut sql = format!("{} JOIN ", self.kind);

        match &self.source {
            JoinSource::Table(table) => sql.push_str(&ctx.identifier_list(table, &[])),
            JoinSource::Subquery(select) => {
                if self.alias.is_none() {
                    sql_event!(debug, kind = %self.kind, "rejected join subquery without alias");
                    return Err(SqlError::invalid_alias("a joined subquery requires an alias"));
                }
                sql.push('(');
                sql.push_str(&select.render_statement(ctx)?);
                sql.push(')');
            }
        }

        if let Some(alias) = &self.alias {
            sql.push_str(" AS ");
            sql.push_str(&ctx.identifier(alias));
        }

        if self.kind != JoinKind::Cross && !self.conditions.is_empty() {
            sql.push_str(" ON ");
            for (i, condition) in self.conditions.iter().enumerate() {
                if i > 0 {
                    sql.push_str(" AND ");
                }
                let rendered = match condition {
                    Expr::Identifier(raw) => ctx.identifier_list(raw, &["="]),
                    Expr::Literal(literal) => literal.render(ctx)?,
                };
                sql.push_str(&rendered);
            }
        }

        Ok(sql)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::literal::{SqlLiteral, Where};
    use crate::param::ParamContainer;
    use crate::platform::DialectPlatform;
    use crate::value::Value;

    fn inline(join: &Join) -> String {
        let platform = DialectPlatform::ansi();
        join.render(&mut RenderContext::inline(&platform)).unwrap()
    }

    #[test]
    fn parses_known_kinds() {
        assert_eq!("inner".parse::<JoinKind>().unwrap(), JoinKind::Inner);
        assert_eq!("Left Outer".parse::<JoinKind>().unwrap(), JoinKind::Left);
        assert_eq!("CROSS".parse::<JoinKind>().unwrap(), JoinKind::Cross);
    }

    #[test]
    fn rejects_unknown_kind() {
        let err = Join::new("sideways", "orders").unwrap_err();
        assert_eq!(err, SqlError::UnknownJoinKind("sideways".to_string()));
    }

    #[test]
    fn table_join_with_alias_and_conditions() {
        let join = Join::new("left", "orders")
            .unwrap()
            .alias("o")
            .on("u.id = o.user_id")
            .on(SqlLiteral::new("o.deleted_at IS NULL"));
        assert_eq!(
            inline(&join),
            r#"LEFT JOIN "orders" AS "o" ON "u"."id" = "o"."user_id" AND o.deleted_at IS NULL"#
        );
    }

    #[test]
    fn cross_join_has_no_on() {
        let join = Join::with_kind(JoinKind::Cross, "sizes").on("a = b");
        assert_eq!(inline(&join), r#"CROSS JOIN "sizes""#);
    }

    #[test]
    fn subquery_requires_alias() {
        let sub = Select::new().column("id").from("orders");
        let err = Join::subquery(JoinKind::Inner, sub, "").unwrap_err();
        assert!(matches!(err, SqlError::InvalidAlias(_)));
    }

    #[test]
    fn clearing_subquery_alias_fails_at_render() {
        let platform = DialectPlatform::ansi();
        let sub = Select::new().column("id").from("orders");
        let join = Join::subquery(JoinKind::Inner, sub, "p").unwrap().alias("");
        let err = join.render(&mut RenderContext::inline(&platform)).unwrap_err();
        assert!(matches!(err, SqlError::InvalidAlias(_)));

        let table = Join::with_kind(JoinKind::Left, "orders").alias("o").alias(" ");
        assert_eq!(inline(&table), r#"LEFT JOIN "orders""#);
    }

    #[test]
    fn subquery_shares_container() {
        let platform = DialectPlatform::ansi();
        let mut params = ParamContainer::new();
        let sub = Select::new()
            .column("user_id")
            .from("orders")
            .and_where(Where::eq("status", "paid"));
        let join = Join::subquery(JoinKind::Inner, sub, "p")
            .unwrap()
            .on(Where::new("p.total", 100, ">").unwrap());
        let sql = join
            .render(&mut RenderContext::parameterized(&platform, &mut params))
            .unwrap();
        assert_eq!(
            sql,
            r#"INNER JOIN (SELECT "user_id" FROM "orders" WHERE "status" = :where1) AS "p" ON "p"."total" > :where2"#
        );
        assert_eq!(params.get("where2"), Some(&Value::Int(100)));
    }
}
