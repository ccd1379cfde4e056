//! Dialect policy: identifier/value quoting and bind-marker formatting.
//!
//! Builders never hard-code quote characters or marker styles; they ask the
//! [`Platform`] bound to them. [`DialectPlatform`] is the reference
//! implementation, driven entirely by a [`PlatformConfig`].
//!
//! | preset | identifiers | markers | booleans |
//! |---|---|---|---|
//! | `ansi` | `"id"` | `:where1` | `TRUE` |
//! | `postgres` | `"id"` | `$1` | `TRUE` |
//! | `mysql` | `` `id` `` | `?` | `1` |
//! | `sqlite` | `"id"` | `:where1` | `1` |
//! | `sql_server` | `[id]` | `@where1` | `1` |

mod config;

pub use config::{BooleanLiterals, DEFAULT_SKIP_TOKENS, IdentifierQuote, ParameterType, PlatformConfig};

use crate::value::Value;
use std::fmt;
use std::sync::Arc;

/// Per-dialect quoting and parameter-style policy.
///
/// Implementations are stateless and shared behind `Arc`. None of the methods
/// fail: malformed input is passed through on a best-effort basis.
pub trait Platform: fmt::Debug + Send + Sync {
    /// Dialect name, used in log events.
    fn name(&self) -> &str;

    /// Quote a single identifier (`users` -> `"users"`).
    fn quote_identifier(&self, name: &str) -> String;

    /// Quote every identifier token in a dotted or functional expression.
    ///
    /// `skipped_tokens` extends the platform's own skip list for this call.
    fn quote_identifier_list(&self, expr: &str, skipped_tokens: &[&str]) -> String;

    /// Render a value as a literal for the inline path.
    fn quote_value(&self, value: &Value) -> String;

    /// Render the bind marker for parameter `name` at 1-based `position`.
    fn format_parameter_name(&self, name: &str, position: usize) -> String;

    /// Bind-marker style supported by the dialect.
    fn parameter_type(&self) -> ParameterType;
}

/// Config-driven [`Platform`] implementation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DialectPlatform {
    config: PlatformConfig,
}

impl DialectPlatform {
    pub fn new(config: PlatformConfig) -> Self {
        Self { config }
    }

    pub fn ansi() -> Self {
        Self::new(PlatformConfig::ansi())
    }

    pub fn postgres() -> Self {
        Self::new(PlatformConfig::postgres())
    }

    pub fn mysql() -> Self {
        Self::new(PlatformConfig::mysql())
    }

    pub fn sqlite() -> Self {
        Self::new(PlatformConfig::sqlite())
    }

    pub fn sql_server() -> Self {
        Self::new(PlatformConfig::sql_server())
    }

    /// The configuration this platform was built from.
    pub fn config(&self) -> &PlatformConfig {
        &self.config
    }

    /// Wrap into the shared handle builders expect.
    pub fn into_shared(self) -> Arc<dyn Platform> {
        Arc::new(self)
    }

    fn quote_string(&self, s: &str) -> String {
        let mut out = String::with_capacity(s.len() + 2);
        out.push('\'');
        for ch in s.chars() {
            match ch {
                '\'' => out.push_str("''"),
                '\\' if self.config.backslash_escapes => out.push_str("\\\\"),
                _ => out.push(ch),
            }
        }
        out.push('\'');
        out
    }

    fn is_skipped(&self, word: &str, skipped_tokens: &[&str]) -> bool {
        self.config.is_skip_token(word) || skipped_tokens.iter().any(|t| t.eq_ignore_ascii_case(word))
    }
}

fn is_word_char(c: char) -> bool {
    c == '_' || c.is_alphanumeric()
}

impl Platform for DialectPlatform {
    fn name(&self) -> &str {
        &self.config.name
    }

    fn quote_identifier(&self, name: &str) -> String {
        if name == "*" {
            return name.to_string();
        }
        let IdentifierQuote { open, close } = self.config.identifier_quote;
        let mut out = String::with_capacity(name.len() + 2);
        out.push(open);
        for ch in name.chars() {
            if ch == close {
                out.push(close);
            }
            out.push(ch);
        }
        out.push(close);
        out
    }

    fn quote_identifier_list(&self, expr: &str, skipped_tokens: &[&str]) -> String {
        let IdentifierQuote { open, close } = self.config.identifier_quote;
        let chars: Vec<char> = expr.chars().collect();
        let mut out = String::with_capacity(expr.len() + 8);
        let mut i = 0;

        while i < chars.len() {
            let c = chars[i];

            // String literal: copy verbatim, honouring '' escapes.
            if c == '\'' {
                let start = i;
                i += 1;
                while i < chars.len() {
                    if chars[i] == '\'' {
                        if chars.get(i + 1) == Some(&'\'') {
                            i += 2;
                            continue;
                        }
                        i += 1;
                        break;
                    }
                    i += 1;
                }
                out.extend(&chars[start..i]);
                continue;
            }

            // Already-quoted identifier.
            if c == open {
                let start = i;
                i += 1;
                while i < chars.len() {
                    if chars[i] == close {
                        if chars.get(i + 1) == Some(&close) {
                            i += 2;
                            continue;
                        }
                        i += 1;
                        break;
                    }
                    i += 1;
                }
                out.extend(&chars[start..i]);
                continue;
            }

            // Bind markers (`:name`, `@name`, `$1`) pass through.
            if matches!(c, ':' | '@' | '$')
                && chars.get(i + 1).is_some_and(|&n| is_word_char(n))
            {
                let start = i;
                i += 1;
                while i < chars.len() && is_word_char(chars[i]) {
                    i += 1;
                }
                out.extend(&chars[start..i]);
                continue;
            }

            if is_word_char(c) {
                let start = i;
                while i < chars.len() && is_word_char(chars[i]) {
                    i += 1;
                }
                let word: String = chars[start..i].iter().collect();

                let next = chars[i..].iter().find(|ch| !ch.is_whitespace());
                let is_number = word.chars().next().is_some_and(|ch| ch.is_ascii_digit());
                let is_call = next == Some(&'(');

                if is_number || is_call || self.is_skipped(&word, skipped_tokens) {
                    out.push_str(&word);
                } else {
                    out.push_str(&self.quote_identifier(&word));
                }
                continue;
            }

            out.push(c);
            i += 1;
        }

        out
    }

    fn quote_value(&self, value: &Value) -> String {
        match value {
            Value::Null => "NULL".to_string(),
            Value::Bool(b) => match (self.config.boolean_literals, b) {
                (BooleanLiterals::Keyword, true) => "TRUE".to_string(),
                (BooleanLiterals::Keyword, false) => "FALSE".to_string(),
                (BooleanLiterals::Numeric, true) => "1".to_string(),
                (BooleanLiterals::Numeric, false) => "0".to_string(),
            },
            Value::Int(n) => n.to_string(),
            Value::Float(f) if f.is_finite() => f.to_string(),
            Value::Float(f) => self.quote_string(&f.to_string()),
            Value::Text(s) => self.quote_string(s),
            Value::Bytes(bytes) => {
                let hex: String = bytes.iter().map(|b| format!("{:02X}", b)).collect();
                format!("X'{}'", hex)
            }
            Value::Date(d) => self.quote_string(&d.format("%Y-%m-%d").to_string()),
            Value::Timestamp(ts) => {
                self.quote_string(&ts.format("%Y-%m-%d %H:%M:%S%.f").to_string())
            }
            Value::TimestampTz(ts) => self.quote_string(&ts.to_rfc3339()),
            Value::Uuid(u) => self.quote_string(&u.hyphenated().to_string()),
            Value::Json(j) => self.quote_string(&j.to_string()),
        }
    }

    fn format_parameter_name(&self, name: &str, position: usize) -> String {
        match self.config.parameter_type {
            ParameterType::NamedBased => format!("{}{}", self.config.named_prefix, name),
            ParameterType::PositionBased => "?".to_string(),
            ParameterType::IndexBased => format!("{}{}", self.config.index_prefix, position),
            ParameterType::NotSupported => name.to_string(),
        }
    }

    fn parameter_type(&self) -> ParameterType {
        self.config.parameter_type
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn quote_identifier_doubles_closing_quote() {
        assert_eq!(DialectPlatform::ansi().quote_identifier("users"), r#""users""#);
        assert_eq!(DialectPlatform::ansi().quote_identifier(r#"we"ird"#), r#""we""ird""#);
        assert_eq!(DialectPlatform::sql_server().quote_identifier("a]b"), "[a]]b]");
        assert_eq!(DialectPlatform::mysql().quote_identifier("*"), "*");
    }

    #[test]
    fn identifier_list_dotted() {
        let p = DialectPlatform::ansi();
        assert_eq!(p.quote_identifier_list("u.id", &[]), r#""u"."id""#);
        assert_eq!(p.quote_identifier_list("u.*", &[]), r#""u".*"#);
    }

    #[test]
    fn identifier_list_functions_and_keywords() {
        let p = DialectPlatform::ansi();
        assert_eq!(
            p.quote_identifier_list("COUNT(o.id) AS total", &[]),
            r#"COUNT("o"."id") AS "total""#
        );
        assert_eq!(
            p.quote_identifier_list("lower(name)", &[]),
            r#"lower("name")"#
        );
        assert_eq!(
            p.quote_identifier_list("u.id = o.user_id", &[]),
            r#""u"."id" = "o"."user_id""#
        );
    }

    #[test]
    fn identifier_list_leaves_literals_and_markers() {
        let p = DialectPlatform::ansi();
        assert_eq!(
            p.quote_identifier_list("status = 'it''s' AND n > 10", &[]),
            r#""status" = 'it''s' AND "n" > 10"#
        );
        assert_eq!(p.quote_identifier_list(r#""Mixed".col"#, &[]), r#""Mixed"."col""#);
        assert_eq!(p.quote_identifier_list("id = :where1", &[]), r#""id" = :where1"#);
    }

    #[test]
    fn identifier_list_extra_skip_tokens() {
        let p = DialectPlatform::ansi();
        assert_eq!(p.quote_identifier_list("price RAW", &["raw"]), r#""price" RAW"#);
    }

    #[test]
    fn quote_value_per_dialect() {
        let ansi = DialectPlatform::ansi();
        let mysql = DialectPlatform::mysql();
        assert_eq!(ansi.quote_value(&Value::from("O'Neil")), "'O''Neil'");
        assert_eq!(mysql.quote_value(&Value::from(r"a\b")), r"'a\\b'");
        assert_eq!(ansi.quote_value(&Value::from(r"a\b")), r"'a\b'");
        assert_eq!(ansi.quote_value(&Value::Bool(true)), "TRUE");
        assert_eq!(mysql.quote_value(&Value::Bool(false)), "0");
        assert_eq!(ansi.quote_value(&Value::Null), "NULL");
        assert_eq!(ansi.quote_value(&Value::Int(-4)), "-4");
        assert_eq!(ansi.quote_value(&Value::Bytes(vec![0xde, 0xad])), "X'DEAD'");
        let date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert_eq!(ansi.quote_value(&Value::Date(date)), "'2024-02-29'");
    }

    #[test]
    fn parameter_markers() {
        assert_eq!(DialectPlatform::ansi().format_parameter_name("where1", 1), ":where1");
        assert_eq!(DialectPlatform::sql_server().format_parameter_name("where1", 1), "@where1");
        assert_eq!(DialectPlatform::mysql().format_parameter_name("where1", 1), "?");
        assert_eq!(DialectPlatform::postgres().format_parameter_name("where7", 3), "$3");
    }
}
