//! DELETE statement builder.

use super::{Statement, StatementKind};
use crate::error::{SqlError, SqlResult};
use crate::literal::{Expr, Operand, RenderContext, Where, render_conditions};
use crate::platform::Platform;
use std::sync::Arc;

/// DELETE builder. Without WHERE conditions every row of the table is deleted.
#[derive(Debug, Clone, Default)]
pub struct Delete {
    platform: Option<Arc<dyn Platform>>,
    table: Option<String>,
    wheres: Vec<Where>,
}

impl Delete {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a platform.
    pub fn with_platform(mut self, platform: Arc<dyn Platform>) -> Self {
        self.platform = Some(platform);
        self
    }

    /// Target table.
    pub fn from(mut self, table: &str) -> Self {
        self.table = Some(table.to_string());
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

impl Statement for Delete {
    fn kind(&self) -> StatementKind {
        StatementKind::Delete
    }

    fn platform(&self) -> Option<&Arc<dyn Platform>> {
        self.platform.as_ref()
    }

    fn render_statement(&self, ctx: &mut RenderContext<'_>) -> SqlResult<String> {
        let table = self.table.as_deref().ok_or(SqlError::MissingTable)?;
        let mut sql = format!("DELETE FROM {}", ctx.identifier_list(table, &[]));
        sql.push_str(&render_conditions("WHERE", &self.wheres, ctx)?);
        Ok(sql)
    }
}
