//! Statement builders (SELECT / INSERT / UPDATE / DELETE).
//!
//! Builders are owned values: infallible calls return `Self`, calls that can
//! reject their input return `SqlResult<Self>` so misuse surfaces at the call
//! site. Compilation goes through the [`Statement`] trait.
//!
//! ```ignore
//! use sqlforge::prelude::*;
//!
//! let platform = DialectPlatform::ansi().into_shared();
//! let sql = Select::new()
//!     .with_platform(platform)
//!     .columns(["id", "name"])
//!     .from("users")
//!     .where_eq("id", 5)
//!     .compile()?;
//! // SELECT "id", "name" FROM "users" WHERE "id" = 5
//! ```

mod delete;
mod insert;
mod select;
mod update;

pub use delete::Delete;
pub use insert::Insert;
pub use select::{Direction, Select};
pub use update::Update;

use crate::error::{SqlError, SqlResult};
use crate::literal::{IntoLiteral, Literal, RenderContext, SqlFunction, SqlLiteral, impl_from_scalars};
use crate::param::ParamContainer;
use crate::platform::Platform;
use crate::value::Value;
use std::fmt;
use std::sync::Arc;

/// Start a SELECT from `table`. The builder has no platform bound yet.
pub fn select(table: &str) -> Select {
    Select::new().from(table)
}

/// Start an INSERT into `table`.
pub fn insert_into(table: &str) -> Insert {
    Insert::new().into(table)
}

/// Start an UPDATE of `table`.
pub fn update(table: &str) -> Update {
    Update::new().table(table)
}

/// Start a DELETE from `table`.
pub fn delete_from(table: &str) -> Delete {
    Delete::new().from(table)
}

/// Statement kind, reported in log events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatementKind {
    Select,
    Insert,
    Update,
    Delete,
}

impl StatementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatementKind::Select => "select",
            StatementKind::Insert => "insert",
            StatementKind::Update => "update",
            StatementKind::Delete => "delete",
        }
    }
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Compilation entry points shared by all statement builders.
pub trait Statement {
    fn kind(&self) -> StatementKind;

    /// Platform bound to this statement, if any.
    fn platform(&self) -> Option<&Arc<dyn Platform>>;

    /// Render the statement body with an existing context.
    ///
    /// This is the recursion point for nested statements: it never checks for
    /// a bound platform and never resets the container.
    fn render_statement(&self, ctx: &mut RenderContext<'_>) -> SqlResult<String>;

    /// Compile to self-contained SQL with every value inlined.
    fn compile(&self) -> SqlResult<String> {
        let platform = self.platform().ok_or(SqlError::MissingAdapter)?;
        let platform: &dyn Platform = platform.as_ref();
        let sql = self.render_statement(&mut RenderContext::inline(platform))?;
        log_compiled(self.kind(), platform, 0, &sql);
        Ok(sql)
    }

    /// Compile to placeholder SQL, binding values into `params`.
    ///
    /// With `reset_container` the container is cleared first (including its
    /// name counter); pass `false` to keep accumulating into a container
    /// shared with statements compiled earlier.
    fn compile_with_parameters(
        &self,
        params: &mut ParamContainer,
        reset_container: bool,
    ) -> SqlResult<String> {
        let platform = self.platform().ok_or(SqlError::MissingAdapter)?;
        let platform: &dyn Platform = platform.as_ref();
        if reset_container {
            params.clear();
        }
        let sql = self.render_statement(&mut RenderContext::parameterized(platform, params))?;
        log_compiled(self.kind(), platform, params.len(), &sql);
        Ok(sql)
    }
}

fn log_compiled(kind: StatementKind, platform: &dyn Platform, param_count: usize, sql: &str) {
    sql_event!(
        debug,
        statement = %kind,
        dialect = platform.name(),
        param_count,
        sql = %sql,
        "compiled statement"
    );
}

/// Source of a selected column.
#[derive(Debug, Clone)]
enum ColumnSource {
    /// Identifier expression, quoted token by token
    Expr(String),
    Literal(Arc<dyn Literal>),
    Subquery(Box<Select>),
}

/// A selected column with an optional alias.
#[derive(Debug, Clone)]
pub struct Column {
    source: ColumnSource,
    alias: Option<String>,
}

impl Column {
    /// A column expression such as `u.name` or `COUNT(o.id)`.
    pub fn new(expr: &str) -> Self {
        Self {
            source: ColumnSource::Expr(expr.to_string()),
            alias: None,
        }
    }

    /// A self-rendering column (function call, raw SQL, ...).
    pub fn literal(literal: impl IntoLiteral) -> Self {
        Self {
            source: ColumnSource::Literal(literal.into_literal()),
            alias: None,
        }
    }

    /// A scalar subquery; the alias is mandatory and must not be empty.
    pub fn subquery(select: Select, alias: &str) -> SqlResult<Self> {
        if alias.trim().is_empty() {
            sql_event!(debug, "rejected subquery column without alias");
            return Err(SqlError::invalid_alias("a subquery column requires an alias"));
        }
        Ok(Self {
            source: ColumnSource::Subquery(Box::new(select)),
            alias: Some(alias.to_string()),
        })
    }

    /// Set the alias. An empty alias removes it, which a subquery column
    /// then rejects at compile time.
    pub fn alias(mut self, alias: &str) -> Self {
        self.alias = (!alias.trim().is_empty()).then(|| alias.to_string());
        self
    }

    fn render(&self, ctx: &mut RenderContext<'_>) -> SqlResult<String> {
        let mut sql = match &self.source {
            ColumnSource::Expr(expr) => ctx.identifier_list(expr, &[]),
            ColumnSource::Literal(literal) => literal.render(ctx)?,
            ColumnSource::Subquery(select) => {
                if self.alias.is_none() {
                    sql_event!(debug, "rejected subquery column without alias");
                    return Err(SqlError::invalid_alias("a subquery column requires an alias"));
                }
                format!("({})", select.render_statement(ctx)?)
            }
        };
        if let Some(alias) = &self.alias {
            sql.push_str(" AS ");
            sql.push_str(&ctx.identifier(alias));
        }
        Ok(sql)
    }
}

impl From<&str> for Column {
    fn from(expr: &str) -> Self {
        Column::new(expr)
    }
}

impl From<String> for Column {
    fn from(expr: String) -> Self {
        Column::new(&expr)
    }
}

impl From<SqlFunction> for Column {
    fn from(f: SqlFunction) -> Self {
        Column::literal(f)
    }
}

impl From<SqlLiteral> for Column {
    fn from(l: SqlLiteral) -> Self {
        Column::literal(l)
    }
}

/// Table reference: a (possibly schema-qualified) name or a nested SELECT.
#[derive(Debug, Clone)]
pub(crate) enum TableRef {
    Name {
        name: String,
        alias: Option<String>,
    },
    Subquery {
        select: Box<Select>,
        alias: String,
    },
}

impl TableRef {
    pub(crate) fn name(name: &str) -> Self {
        TableRef::Name {
            name: name.to_string(),
            alias: None,
        }
    }

    pub(crate) fn render(&self, ctx: &mut RenderContext<'_>) -> SqlResult<String> {
        let (mut sql, alias) = match self {
            TableRef::Name { name, alias } => (ctx.identifier_list(name, &[]), alias.as_deref()),
            TableRef::Subquery { select, alias } => (
                format!("({})", select.render_statement(ctx)?),
                Some(alias.as_str()),
            ),
        };
        if let Some(alias) = alias {
            sql.push_str(" AS ");
            sql.push_str(&ctx.identifier(alias));
        }
        Ok(sql)
    }
}

/// Value assigned to a field by INSERT or UPDATE.
#[derive(Debug, Clone)]
pub enum FieldValue {
    /// Bound (prefix `insert`/`update`) or inlined
    Value(Value),
    /// Rendered as-is
    Literal(Arc<dyn Literal>),
}

impl FieldValue {
    pub(crate) fn render(&self, prefix: &str, ctx: &mut RenderContext<'_>) -> SqlResult<String> {
        match self {
            FieldValue::Value(value) => Ok(ctx.value(prefix, value)),
            FieldValue::Literal(literal) => literal.render(ctx),
        }
    }
}

impl From<Value> for FieldValue {
    fn from(v: Value) -> Self {
        FieldValue::Value(v)
    }
}

impl_from_scalars!(FieldValue);

impl<T: Into<Value>> From<Option<T>> for FieldValue {
    fn from(v: Option<T>) -> Self {
        FieldValue::Value(v.into())
    }
}

impl From<SqlLiteral> for FieldValue {
    fn from(l: SqlLiteral) -> Self {
        FieldValue::Literal(l.into_literal())
    }
}

impl From<SqlFunction> for FieldValue {
    fn from(f: SqlFunction) -> Self {
        FieldValue::Literal(f.into_literal())
    }
}

impl From<Arc<dyn Literal>> for FieldValue {
    fn from(l: Arc<dyn Literal>) -> Self {
        FieldValue::Literal(l)
    }
}
