//! WHERE and HAVING conditions.
//!
//! Both share one algorithm: the operand's shape decides which operators are
//! legal and how the operator is normalized (`= NULL` becomes `IS NULL`,
//! `= (1, 2)` becomes `IN (1, 2)`). Shape/operator mismatches are rejected when
//! the condition is built, never at compile time.

use super::{Expr, IntoLiteral, Literal, RenderContext, SqlFunction, SqlLiteral, impl_from_scalars};
use crate::error::{SqlError, SqlResult};
use crate::stmt::{Select, Statement};
use crate::value::Value;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Comparison operator of a condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Eq,
    NotEq,
    /// `<>`, kept apart from `!=` so the caller's spelling survives
    LtGt,
    Lt,
    Lte,
    Gt,
    Gte,
    Like,
    NotLike,
    Is,
    IsNot,
    In,
    NotIn,
}

impl Operator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::NotEq => "!=",
            Operator::LtGt => "<>",
            Operator::Lt => "<",
            Operator::Lte => "<=",
            Operator::Gt => ">",
            Operator::Gte => ">=",
            Operator::Like => "LIKE",
            Operator::NotLike => "NOT LIKE",
            Operator::Is => "IS",
            Operator::IsNot => "IS NOT",
            Operator::In => "IN",
            Operator::NotIn => "NOT IN",
        }
    }

    /// Whether this operator excludes matches (`!=`, `NOT IN`, ...).
    pub fn is_negated(&self) -> bool {
        matches!(self, Operator::NotEq | Operator::LtGt | Operator::IsNot | Operator::NotIn)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operator {
    type Err = SqlError;

    fn from_str(s: &str) -> SqlResult<Self> {
        let normalized = s.split_whitespace().collect::<Vec<_>>().join(" ").to_ascii_uppercase();
        let op = match normalized.as_str() {
            "=" | "==" => Operator::Eq,
            "!=" => Operator::NotEq,
            "<>" => Operator::LtGt,
            "<" => Operator::Lt,
            "<=" => Operator::Lte,
            ">" => Operator::Gt,
            ">=" => Operator::Gte,
            "LIKE" => Operator::Like,
            "NOT LIKE" => Operator::NotLike,
            "IS" => Operator::Is,
            "IS NOT" => Operator::IsNot,
            "IN" => Operator::In,
            "NOT IN" => Operator::NotIn,
            _ => return Err(SqlError::invalid_operator(format!("unknown operator '{}'", s))),
        };
        Ok(op)
    }
}

/// Right-hand side of a condition.
#[derive(Debug, Clone)]
pub enum Operand {
    Null,
    Scalar(Value),
    List(Vec<Value>),
    /// Nested SELECT, compiled into the same parameter container
    Subquery(Box<Select>),
    /// Self-rendering node, used verbatim
    Literal(Arc<dyn Literal>),
}

impl Operand {
    fn shape(&self) -> &'static str {
        match self {
            Operand::Null => "NULL",
            Operand::Scalar(_) => "scalar",
            Operand::List(_) => "list",
            Operand::Subquery(_) => "subquery",
            Operand::Literal(_) => "literal",
        }
    }

    /// Check `op` against this operand's shape and return the operator to render.
    fn normalize(&self, op: Operator) -> SqlResult<Operator> {
        let normalized = match self {
            Operand::Null => match op {
                Operator::Eq | Operator::Is => Some(Operator::Is),
                Operator::NotEq | Operator::LtGt | Operator::IsNot => Some(Operator::IsNot),
                _ => None,
            },
            Operand::List(_) | Operand::Subquery(_) => match op {
                Operator::Eq | Operator::In => Some(Operator::In),
                Operator::NotEq | Operator::LtGt | Operator::NotIn => Some(Operator::NotIn),
                _ => None,
            },
            Operand::Scalar(_) | Operand::Literal(_) => Some(op),
        };
        normalized.ok_or_else(|| {
            SqlError::invalid_operator(format!(
                "'{}' cannot be used with a {} operand",
                op,
                self.shape()
            ))
        })
    }

    /// Operator `=` normalized for this shape; never fails.
    fn equality(&self) -> Operator {
        match self {
            Operand::Null => Operator::Is,
            Operand::List(_) | Operand::Subquery(_) => Operator::In,
            Operand::Scalar(_) | Operand::Literal(_) => Operator::Eq,
        }
    }
}

impl From<Value> for Operand {
    fn from(v: Value) -> Self {
        match v {
            Value::Null => Operand::Null,
            v => Operand::Scalar(v),
        }
    }
}

impl_from_scalars!(Operand);

impl<T: Into<Value>> From<Option<T>> for Operand {
    fn from(v: Option<T>) -> Self {
        Operand::from(Value::from(v))
    }
}

impl<T: Into<Value>> From<Vec<T>> for Operand {
    fn from(values: Vec<T>) -> Self {
        Operand::List(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>, const N: usize> From<[T; N]> for Operand {
    fn from(values: [T; N]) -> Self {
        Operand::List(values.into_iter().map(Into::into).collect())
    }
}

impl From<Select> for Operand {
    fn from(select: Select) -> Self {
        Operand::Subquery(Box::new(select))
    }
}

impl From<SqlLiteral> for Operand {
    fn from(l: SqlLiteral) -> Self {
        Operand::Literal(l.into_literal())
    }
}

impl From<SqlFunction> for Operand {
    fn from(f: SqlFunction) -> Self {
        Operand::Literal(f.into_literal())
    }
}

impl From<Arc<dyn Literal>> for Operand {
    fn from(l: Arc<dyn Literal>) -> Self {
        Operand::Literal(l)
    }
}

/// The (field, operand, operator) triple shared by WHERE and HAVING.
#[derive(Debug, Clone)]
struct Predicate {
    field: Expr,
    operand: Operand,
    operator: Operator,
}

impl Predicate {
    fn new(field: Expr, operand: Operand, operator: &str) -> SqlResult<Self> {
        let operator = operator
            .parse()
            .and_then(|parsed| operand.normalize(parsed))
            .inspect_err(|err| sql_event!(debug, operator, error = %err, "rejected operator"))?;
        Ok(Self {
            field,
            operand,
            operator,
        })
    }

    fn equals(field: Expr, operand: Operand) -> Self {
        let operator = operand.equality();
        Self {
            field,
            operand,
            operator,
        }
    }

    fn render(&self, prefix: &str, ctx: &mut RenderContext<'_>) -> SqlResult<String> {
        let field = self.field.render(ctx)?;
        let op = self.operator;

        let rhs = match &self.operand {
            Operand::Null => "NULL".to_string(),
            Operand::Scalar(value) => {
                let rendered = ctx.value(prefix, value);
                match op {
                    Operator::In | Operator::NotIn => format!("({})", rendered),
                    _ => rendered,
                }
            }
            Operand::List(values) => {
                let items: Vec<String> = values.iter().map(|v| ctx.value(prefix, v)).collect();
                format!("({})", items.join(", "))
            }
            Operand::Subquery(select) => {
                sql_event!(trace, prefix, "rendering condition subquery");
                format!("({})", select.render_statement(ctx)?)
            }
            Operand::Literal(literal) => literal.render(ctx)?,
        };

        Ok(format!("{} {} {}", field, op, rhs))
    }
}

/// A WHERE condition.
///
/// Conditions attached to one statement are joined with `AND` in insertion
/// order; there is no `OR` or grouping.
///
/// # Example
/// ```ignore
/// Where::new("age", None::<i32>, "=")?;          // "age" IS NULL
/// Where::new("id", vec![1, 2, 3], "!=")?;        // "id" NOT IN (1, 2, 3)
/// Where::new("id", [1, 2], "LIKE");              // Err(InvalidOperator)
/// ```
#[derive(Debug, Clone)]
pub struct Where(Predicate);

impl Where {
    /// Build a condition, checking `operator` against the operand's shape.
    pub fn new(
        field: impl Into<Expr>,
        operand: impl Into<Operand>,
        operator: &str,
    ) -> SqlResult<Self> {
        Predicate::new(field.into(), operand.into(), operator).map(Self)
    }

    /// Build an equality condition (`=`, `IS NULL` or `IN` depending on shape).
    pub fn eq(field: impl Into<Expr>, operand: impl Into<Operand>) -> Self {
        Self(Predicate::equals(field.into(), operand.into()))
    }

    /// The operator after normalization.
    pub fn operator(&self) -> Operator {
        self.0.operator
    }
}

impl Literal for Where {
    fn render(&self, ctx: &mut RenderContext<'_>) -> SqlResult<String> {
        self.0.render("where", ctx)
    }
}

/// A HAVING condition. Same rules as [`Where`], except subquery operands are
/// rejected.
#[derive(Debug, Clone)]
pub struct Having(Predicate);

impl Having {
    pub fn new(
        field: impl Into<Expr>,
        operand: impl Into<Operand>,
        operator: &str,
    ) -> SqlResult<Self> {
        let operand = operand.into();
        if matches!(operand, Operand::Subquery(_)) {
            sql_event!(debug, operator, "rejected HAVING subquery operand");
            return Err(SqlError::invalid_operator(format!(
                "'{}' cannot be used with a subquery operand in HAVING",
                operator
            )));
        }
        Predicate::new(field.into(), operand, operator).map(Self)
    }

    /// The operator after normalization.
    pub fn operator(&self) -> Operator {
        self.0.operator
    }
}

impl Literal for Having {
    fn render(&self, ctx: &mut RenderContext<'_>) -> SqlResult<String> {
        self.0.render("having", ctx)
    }
}

/// Render `conditions` as ` <KEYWORD> c1 AND c2 ...`, or nothing when empty.
pub(crate) fn render_conditions<L: Literal>(
    keyword: &str,
    conditions: &[L],
    ctx: &mut RenderContext<'_>,
) -> SqlResult<String> {
    let mut sql = String::new();
    for (i, condition) in conditions.iter().enumerate() {
        sql.push_str(if i == 0 { " " } else { " AND " });
        if i == 0 {
            sql.push_str(keyword);
            sql.push(' ');
        }
        sql.push_str(&condition.render(ctx)?);
    }
    Ok(sql)
}
