//! Self-rendering SQL fragments.
//!
//! Every clause node implements [`Literal`]: given a [`RenderContext`] it
//! produces its own SQL text and, on the parameterized path, pushes its values
//! into the shared [`ParamContainer`]. Statements implement it too, which is
//! what lets a `Select` appear as a FROM/JOIN source, a column, or a WHERE
//! operand without special-casing.

mod function;
mod join;
mod predicate;

pub use function::SqlFunction;
pub use join::{Join, JoinKind};
pub use predicate::{Having, Operand, Operator, Where};
pub(crate) use predicate::render_conditions;

use crate::error::SqlResult;
use crate::param::ParamContainer;
use crate::platform::{ParameterType, Platform};
use crate::value::Value;
use std::fmt;
use std::sync::Arc;

/// A node that knows how to render itself to SQL.
pub trait Literal: fmt::Debug + Send + Sync {
    /// Render this node, binding any values through `ctx`.
    fn render(&self, ctx: &mut RenderContext<'_>) -> SqlResult<String>;
}

/// Conversion into a shared [`Literal`] handle.
pub trait IntoLiteral {
    fn into_literal(self) -> Arc<dyn Literal>;
}

impl<L: Literal + 'static> IntoLiteral for L {
    fn into_literal(self) -> Arc<dyn Literal> {
        Arc::new(self)
    }
}

/// State threaded through one compilation: the platform and, on the
/// parameterized path, the container collecting bound values.
///
/// Nested statements are rendered with the same context, so they share the
/// container and its name counter.
pub struct RenderContext<'a> {
    platform: &'a dyn Platform,
    params: Option<&'a mut ParamContainer>,
}

impl<'a> RenderContext<'a> {
    /// Context that inlines every value as a quoted literal.
    pub fn inline(platform: &'a dyn Platform) -> Self {
        Self {
            platform,
            params: None,
        }
    }

    /// Context that binds values into `params`.
    ///
    /// Platforms without bind-marker support fall back to inlining and leave
    /// `params` untouched.
    pub fn parameterized(platform: &'a dyn Platform, params: &'a mut ParamContainer) -> Self {
        let params = match platform.parameter_type() {
            ParameterType::NotSupported => None,
            _ => Some(params),
        };
        Self { platform, params }
    }

    /// The platform this context renders for.
    pub fn platform(&self) -> &'a dyn Platform {
        self.platform
    }

    /// Whether values are being bound rather than inlined.
    pub fn is_parameterized(&self) -> bool {
        self.params.is_some()
    }

    /// Render `value`: a bind marker named after `prefix`, or a quoted literal.
    pub fn value(&mut self, prefix: &str, value: &Value) -> String {
        match self.params.as_deref_mut() {
            Some(params) => {
                let (name, position) = params.bind(prefix, value.clone());
                self.platform.format_parameter_name(&name, position)
            }
            None => self.platform.quote_value(value),
        }
    }

    /// Quote a single identifier.
    pub fn identifier(&self, name: &str) -> String {
        self.platform.quote_identifier(name)
    }

    /// Quote every identifier token of an expression.
    pub fn identifier_list(&self, expr: &str, skipped_tokens: &[&str]) -> String {
        self.platform.quote_identifier_list(expr, skipped_tokens)
    }
}

/// Raw SQL rendered exactly as written.
///
/// This is the escape hatch for dialect-specific syntax the builders do not
/// model. Its text is never quoted, parameterized or inspected, so it must
/// never carry untrusted input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlLiteral(String);

impl SqlLiteral {
    pub fn new(sql: impl Into<String>) -> Self {
        Self(sql.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SqlLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Literal for SqlLiteral {
    fn render(&self, _ctx: &mut RenderContext<'_>) -> SqlResult<String> {
        Ok(self.0.clone())
    }
}

/// A field-like expression: a raw identifier expression quoted token by
/// token, or a self-quoting literal node.
#[derive(Debug, Clone)]
pub enum Expr {
    Identifier(String),
    Literal(Arc<dyn Literal>),
}

impl Expr {
    pub(crate) fn render(&self, ctx: &mut RenderContext<'_>) -> SqlResult<String> {
        match self {
            Expr::Identifier(expr) => Ok(ctx.identifier_list(expr, &[])),
            Expr::Literal(literal) => literal.render(ctx),
        }
    }
}

impl From<&str> for Expr {
    fn from(s: &str) -> Self {
        Expr::Identifier(s.to_string())
    }
}

impl From<String> for Expr {
    fn from(s: String) -> Self {
        Expr::Identifier(s)
    }
}

impl From<SqlLiteral> for Expr {
    fn from(l: SqlLiteral) -> Self {
        Expr::Literal(l.into_literal())
    }
}

impl From<SqlFunction> for Expr {
    fn from(f: SqlFunction) -> Self {
        Expr::Literal(f.into_literal())
    }
}

impl From<Where> for Expr {
    fn from(w: Where) -> Self {
        Expr::Literal(w.into_literal())
    }
}

impl From<Arc<dyn Literal>> for Expr {
    fn from(l: Arc<dyn Literal>) -> Self {
        Expr::Literal(l)
    }
}

/// Implements `From<scalar>` for a target that already implements `From<Value>`.
macro_rules! impl_from_scalars {
    ($target:ty) => {
        impl_from_scalars!(
            $target; bool, i8, i16, i32, i64, u8, u16, u32, f32, f64, &str, String, &String,
            chrono::NaiveDate, chrono::NaiveDateTime, chrono::DateTime<chrono::Utc>,
            uuid::Uuid, serde_json::Value
        );
    };
    ($target:ty; $($t:ty),* $(,)?) => {
        $(
            impl From<$t> for $target {
                fn from(v: $t) -> Self {
                    <$target>::from($crate::value::Value::from(v))
                }
            }
        )*
    };
}

pub(crate) use impl_from_scalars;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::{DialectPlatform, PlatformConfig};

    #[test]
    fn sql_literal_is_pass_through() {
        let platform = DialectPlatform::ansi();
        let mut params = ParamContainer::new();
        let lit = SqlLiteral::new("NOW() - INTERVAL '1 day'");
        let mut ctx = RenderContext::parameterized(&platform, &mut params);
        assert_eq!(lit.render(&mut ctx).unwrap(), "NOW() - INTERVAL '1 day'");
        assert!(params.is_empty());
    }

    #[test]
    fn value_binds_or_inlines() {
        let platform = DialectPlatform::ansi();
        let mut inline = RenderContext::inline(&platform);
        assert_eq!(inline.value("where", &Value::from("x")), "'x'");

        let mut params = ParamContainer::new();
        let mut ctx = RenderContext::parameterized(&platform, &mut params);
        assert_eq!(ctx.value("where", &Value::from("x")), ":where1");
        assert_eq!(params.get("where1"), Some(&Value::from("x")));
    }

    #[test]
    fn unsupported_parameters_fall_back_to_inline() {
        let platform = DialectPlatform::new(
            PlatformConfig::ansi().with_parameter_type(ParameterType::NotSupported),
        );
        let mut params = ParamContainer::new();
        let mut ctx = RenderContext::parameterized(&platform, &mut params);
        assert!(!ctx.is_parameterized());
        assert_eq!(ctx.value("where", &Value::Int(3)), "3");
        assert!(params.is_empty());
    }
}
