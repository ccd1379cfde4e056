//! SELECT statement builder.

use super::{Column, Statement, StatementKind, TableRef};
use crate::error::{SqlError, SqlResult};
use crate::literal::{
    Expr, Having, Join, JoinKind, Literal, Operand, RenderContext, Where, render_conditions,
};
use crate::platform::Platform;
use std::sync::Arc;

/// Sort direction for ORDER BY.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone)]
struct UnionBranch {
    all: bool,
    select: Select,
}

/// SELECT builder.
///
/// Clauses are rendered in SQL order regardless of the order the builder
/// methods were called in. WHERE and HAVING conditions are always joined
/// with AND.
#[derive(Debug, Clone, Default)]
pub struct Select {
    platform: Option<Arc<dyn Platform>>,
    table: Option<TableRef>,
    distinct: bool,
    /// Empty means `*`
    columns: Vec<Column>,
    joins: Vec<Join>,
    wheres: Vec<Where>,
    group_by: Vec<String>,
    havings: Vec<Having>,
    order_by: Vec<(String, Direction)>,
    limit: Option<u64>,
    offset: Option<u64>,
    unions: Vec<UnionBranch>,
}

impl Select {
    /// Create an empty SELECT with no platform bound.
    ///
    /// Unbound selects are fine as subqueries; compiling one directly fails
    /// with [`SqlError::MissingAdapter`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a platform.
    pub fn with_platform(mut self, platform: Arc<dyn Platform>) -> Self {
        self.platform = Some(platform);
        self
    }

    // ==================== FROM ====================

    /// Select from a table (`users`, `public.users`).
    pub fn from(mut self, table: &str) -> Self {
        self.table = Some(TableRef::name(table));
        self
    }

    /// Select from an aliased table.
    pub fn from_as(mut self, table: &str, alias: &str) -> Self {
        self.table = Some(TableRef::Name {
            name: table.to_string(),
            alias: Some(alias.to_string()),
        });
        self
    }

    /// Select from a nested SELECT; the alias is mandatory.
    pub fn from_subquery(mut self, select: Select, alias: &str) -> SqlResult<Self> {
        if alias.trim().is_empty() {
            sql_event!(debug, "rejected FROM subquery without alias");
            return Err(SqlError::invalid_alias("a FROM subquery requires an alias"));
        }
        self.table = Some(TableRef::Subquery {
            select: Box::new(select),
            alias: alias.to_string(),
        });
        Ok(self)
    }

    // ==================== Columns ====================

    /// Toggle `SELECT DISTINCT`.
    pub fn distinct(mut self, distinct: bool) -> Self {
        self.distinct = distinct;
        self
    }

    /// Replace the column list.
    pub fn columns<I, C>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Column>,
    {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Append one column.
    pub fn column(mut self, column: impl Into<Column>) -> Self {
        self.columns.push(column.into());
        self
    }

    /// Append one aliased column.
    pub fn column_as(mut self, column: impl Into<Column>, alias: &str) -> Self {
        self.columns.push(column.into().alias(alias));
        self
    }

    /// Append a scalar subquery column; the alias must not be empty.
    pub fn column_subquery(mut self, select: Select, alias: &str) -> SqlResult<Self> {
        self.columns.push(Column::subquery(select, alias)?);
        Ok(self)
    }

    /// Number of selected columns. `*` (the default) counts as one column.
    pub fn column_count(&self) -> usize {
        self.columns.len().max(1)
    }

    // ==================== JOIN ====================

    /// Append a prepared join.
    pub fn join(mut self, join: Join) -> Self {
        self.joins.push(join);
        self
    }

    /// Append a join whose kind is given as a string.
    pub fn join_kind(self, kind: &str, table: &str, on: impl Into<Expr>) -> SqlResult<Self> {
        Ok(self.join(Join::new(kind, table)?.on(on)))
    }

    /// Add INNER JOIN.
    pub fn inner_join(self, table: &str, on: impl Into<Expr>) -> Self {
        self.join(Join::with_kind(JoinKind::Inner, table).on(on))
    }

    /// Add LEFT JOIN.
    pub fn left_join(self, table: &str, on: impl Into<Expr>) -> Self {
        self.join(Join::with_kind(JoinKind::Left, table).on(on))
    }

    /// Add RIGHT JOIN.
    pub fn right_join(self, table: &str, on: impl Into<Expr>) -> Self {
        self.join(Join::with_kind(JoinKind::Right, table).on(on))
    }

    /// Add FULL JOIN.
    pub fn full_join(self, table: &str, on: impl Into<Expr>) -> Self {
        self.join(Join::with_kind(JoinKind::Full, table).on(on))
    }

    /// Add CROSS JOIN.
    pub fn cross_join(self, table: &str) -> Self {
        self.join(Join::with_kind(JoinKind::Cross, table))
    }

    // ==================== WHERE ====================

    /// Add WHERE: field = operand (`IS NULL` / `IN (...)` depending on shape).
    pub fn where_eq(mut self, field: impl Into<Expr>, operand: impl Into<Operand>) -> Self {
        self.wheres.push(Where::eq(field, operand));
        self
    }

    /// Add WHERE with an explicit operator, checked against the operand shape.
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

    // ==================== GROUP BY / HAVING ====================

    /// Append GROUP BY fields; a comma-separated list is split into fields.
    pub fn group_by(mut self, fields: &str) -> Self {
        self.group_by.extend(split_fields(fields));
        self
    }

    /// Add HAVING with an explicit operator.
    pub fn having(
        mut self,
        field: impl Into<Expr>,
        operand: impl Into<Operand>,
        operator: &str,
    ) -> SqlResult<Self> {
        self.havings.push(Having::new(field, operand, operator)?);
        Ok(self)
    }

    /// Add a prepared HAVING condition.
    pub fn and_having(mut self, condition: Having) -> Self {
        self.havings.push(condition);
        self
    }

    // ==================== ORDER BY / LIMIT ====================

    /// Append ORDER BY fields. Every field of a comma-separated list gets the
    /// same direction; a trailing `ASC`/`DESC` written into a field is dropped
    /// in favour of `direction`.
    pub fn order_by(mut self, fields: &str, direction: Direction) -> Self {
        self.order_by.extend(
            split_fields(fields).map(|field| (strip_direction(&field).to_string(), direction)),
        );
        self
    }

    /// Add ORDER BY fields ASC.
    pub fn order_by_asc(self, fields: &str) -> Self {
        self.order_by(fields, Direction::Asc)
    }

    /// Add ORDER BY fields DESC.
    pub fn order_by_desc(self, fields: &str) -> Self {
        self.order_by(fields, Direction::Desc)
    }

    /// Set LIMIT.
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Set OFFSET. Zero clears it.
    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = (offset > 0).then_some(offset);
        self
    }

    // ==================== UNION ====================

    /// Append `UNION <select>`; both sides must select the same number of columns.
    pub fn union(self, select: Select) -> SqlResult<Self> {
        self.push_union(select, false)
    }

    /// Append `UNION ALL <select>`.
    pub fn union_all(self, select: Select) -> SqlResult<Self> {
        self.push_union(select, true)
    }

    fn push_union(mut self, select: Select, all: bool) -> SqlResult<Self> {
        let (expected, actual) = (self.column_count(), select.column_count());
        if expected != actual {
            sql_event!(debug, expected, actual, "rejected UNION");
            return Err(SqlError::column_count(expected, actual));
        }
        self.unions.push(UnionBranch { all, select });
        Ok(self)
    }
}

/// Split a comma-separated field list, dropping empty entries.
fn split_fields(fields: &str) -> impl Iterator<Item = String> + '_ {
    fields
        .split(',')
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .map(str::to_string)
}

/// `"created_at DESC"` -> `"created_at"`.
fn strip_direction(field: &str) -> &str {
    match field.rsplit_once(char::is_whitespace) {
        Some((head, word))
            if !head.trim().is_empty()
                && (word.eq_ignore_ascii_case("asc") || word.eq_ignore_ascii_case("desc")) =>
        {
            head.trim_end()
        }
        _ => field,
    }
}

impl Statement for Select {
    fn kind(&self) -> StatementKind {
        StatementKind::Select
    }

    fn platform(&self) -> Option<&Arc<dyn Platform>> {
        self.platform.as_ref()
    }

    fn render_statement(&self, ctx: &mut RenderContext<'_>) -> SqlResult<String> {
        let table = self.table.as_ref().ok_or(SqlError::MissingFrom)?;

        let mut sql = String::from("SELECT ");
        if self.distinct {
            sql.push_str("DISTINCT ");
        }

        if self.columns.is_empty() {
            sql.push('*');
        } else {
            for (i, column) in self.columns.iter().enumerate() {
                if i > 0 {
                    sql.push_str(", ");
                }
                sql.push_str(&column.render(ctx)?);
            }
        }

        sql.push_str(" FROM ");
        sql.push_str(&table.render(ctx)?);

        for join in &self.joins {
            sql.push(' ');
            sql.push_str(&join.render(ctx)?);
        }

        sql.push_str(&render_conditions("WHERE", &self.wheres, ctx)?);

        if !self.group_by.is_empty() {
            let fields: Vec<String> = self
                .group_by
                .iter()
                .map(|f| ctx.identifier_list(f, &[]))
                .collect();
            sql.push_str(" GROUP BY ");
            sql.push_str(&fields.join(", "));
        }

        sql.push_str(&render_conditions("HAVING", &self.havings, ctx)?);

        if !self.order_by.is_empty() {
            let fields: Vec<String> = self
                .order_by
                .iter()
                .map(|(f, dir)| format!("{} {}", ctx.identifier_list(f, &[]), dir.as_str()))
                .collect();
            sql.push_str(" ORDER BY ");
            sql.push_str(&fields.join(", "));
        }

        if let Some(limit) = self.limit {
            sql.push_str(&format!(" LIMIT {}", limit));
        }
        if let Some(offset) = self.offset {
            sql.push_str(&format!(" OFFSET {}", offset));
        }

        for branch in &self.unions {
            // Columns may be added to this select after `union()`.
            let (expected, actual) = (self.column_count(), branch.select.column_count());
            if expected != actual {
                sql_event!(debug, expected, actual, "rejected UNION at render");
                return Err(SqlError::column_count(expected, actual));
            }
            sql.push_str(if branch.all { " UNION ALL " } else { " UNION " });
            sql.push_str(&branch.select.render_statement(ctx)?);
        }

        Ok(sql)
    }
}

impl Literal for Select {
    /// Renders the SELECT wrapped in parentheses, as a nested query.
    fn render(&self, ctx: &mut RenderContext<'_>) -> SqlResult<String> {
        sql_event!(trace, "rendering nested select");
        Ok(format!("({})", self.render_statement(ctx)?))
    }
}
