//! SQL function calls.

use super::{IntoLiteral, Literal, RenderContext};
use crate::error::SqlResult;
use crate::value::Value;
use std::sync::Arc;

/// Tokens left bare inside identifier arguments.
const ARGUMENT_SKIP_TOKENS: &[&str] = &["DISTINCT", "+", "-", "*", "/", "%"];

#[derive(Debug, Clone)]
enum FunctionArg {
    Identifier(String),
    Value(Value),
    Literal(Arc<dyn Literal>),
}

/// A function call such as `COUNT(DISTINCT "user_id")` or `COALESCE("nick", 'anon')`.
///
/// The name is uppercased. Identifier arguments are quoted as identifiers;
/// value arguments are bound (prefix `function`) or inlined.
#[derive(Debug, Clone)]
pub struct SqlFunction {
    name: String,
    args: Vec<FunctionArg>,
}

impl SqlFunction {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.trim().to_ascii_uppercase(),
            args: Vec::new(),
        }
    }

    /// Append an argument; `is_identifier` selects identifier quoting for
    /// text values, otherwise the value is bound or inlined.
    pub fn arg(self, value: impl Into<Value>, is_identifier: bool) -> Self {
        match (value.into(), is_identifier) {
            (Value::Text(name), true) => self.identifier(&name),
            (value, _) => self.value(value),
        }
    }

    /// Append an identifier argument (`o.id`, `DISTINCT user_id`, `price * qty`).
    pub fn identifier(mut self, expr: &str) -> Self {
        self.args.push(FunctionArg::Identifier(expr.to_string()));
        self
    }

    /// Append a value argument.
    pub fn value(mut self, value: impl Into<Value>) -> Self {
        self.args.push(FunctionArg::Value(value.into()));
        self
    }

    /// Append a nested literal argument (another function, raw SQL, ...).
    pub fn literal(mut self, literal: impl IntoLiteral) -> Self {
        self.args.push(FunctionArg::Literal(literal.into_literal()));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// `COUNT(<expr>)`
    pub fn count(expr: &str) -> Self {
        Self::new("COUNT").identifier(expr)
    }

    /// `SUM(<expr>)`
    pub fn sum(expr: &str) -> Self {
        Self::new("SUM").identifier(expr)
    }

    /// `AVG(<expr>)`
    pub fn avg(expr: &str) -> Self {
        Self::new("AVG").identifier(expr)
    }

    /// `MIN(<expr>)`
    pub fn min(expr: &str) -> Self {
        Self::new("MIN").identifier(expr)
    }

    /// `MAX(<expr>)`
    pub fn max(expr: &str) -> Self {
        Self::new("MAX").identifier(expr)
    }
}

impl Literal for SqlFunction {
    fn render(&self, ctx: &mut RenderContext<'_>) -> SqlResult<String> {
        let mut args = Vec::with_capacity(self.args.len());
        for arg in &self.args {
            let rendered = match arg {
                FunctionArg::Identifier(expr) => ctx.identifier_list(expr, ARGUMENT_SKIP_TOKENS),
                FunctionArg::Value(value) => ctx.value("function", value),
                FunctionArg::Literal(literal) => literal.render(ctx)?,
            };
            args.push(rendered);
        }
        Ok(format!("{}({})", self.name, args.join(", ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::literal::SqlLiteral;
    use crate::param::ParamContainer;
    use crate::platform::{DialectPlatform, PlatformConfig};

    #[test]
    fn name_is_uppercased() {
        assert_eq!(SqlFunction::new(" coalesce ").name(), "COALESCE");
    }

    #[test]
    fn identifier_and_value_arguments() {
        let platform = DialectPlatform::ansi();
        let f = SqlFunction::new("coalesce").identifier("u.nick").value("anon");
        assert_eq!(
            f.render(&mut RenderContext::inline(&platform)).unwrap(),
            r#"COALESCE("u"."nick", 'anon')"#
        );

        let mut params = ParamContainer::new();
        let sql = f
            .render(&mut RenderContext::parameterized(&platform, &mut params))
            .unwrap();
        assert_eq!(sql, r#"COALESCE("u"."nick", :function1)"#);
        assert_eq!(params.get("function1"), Some(&Value::from("anon")));
    }

    #[test]
    fn distinct_survives_a_custom_skip_list() {
        let platform = DialectPlatform::new(PlatformConfig::ansi().without_skip_token("DISTINCT"));
        let f = SqlFunction::count("DISTINCT user_id");
        assert_eq!(
            f.render(&mut RenderContext::inline(&platform)).unwrap(),
            r#"COUNT(DISTINCT "user_id")"#
        );
    }

    #[test]
    fn arg_flag_selects_quoting() {
        let platform = DialectPlatform::mysql();
        let f = SqlFunction::new("concat").arg("first", true).arg("-", false);
        assert_eq!(
            f.render(&mut RenderContext::inline(&platform)).unwrap(),
            "CONCAT(`first`, '-')"
        );
    }

    #[test]
    fn nested_literals_and_empty_calls() {
        let platform = DialectPlatform::ansi();
        let f = SqlFunction::new("date").literal(SqlFunction::new("now"));
        assert_eq!(
            f.render(&mut RenderContext::inline(&platform)).unwrap(),
            "DATE(NOW())"
        );
        let raw = SqlFunction::new("greatest").literal(SqlLiteral::new("1")).value(2);
        assert_eq!(
            raw.render(&mut RenderContext::inline(&platform)).unwrap(),
            "GREATEST(1, 2)"
        );
    }
}
