use crate::error::SqlResult;
use serde::{Deserialize, Serialize};

/// Bind-marker style supported by a dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterType {
    /// No bind markers; the parameterized path inlines literals instead.
    NotSupported,
    /// Anonymous `?` markers bound by position.
    PositionBased,
    /// Named markers such as `:where1` or `@where1`.
    #[default]
    NamedBased,
    /// Numbered markers such as `$1`.
    IndexBased,
}

/// Opening and closing identifier quote characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentifierQuote {
    pub open: char,
    pub close: char,
}

impl IdentifierQuote {
    pub const fn new(open: char, close: char) -> Self {
        Self { open, close }
    }
}

impl Default for IdentifierQuote {
    fn default() -> Self {
        Self::new('"', '"')
    }
}

/// How boolean values are written as literals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BooleanLiterals {
    /// `TRUE` / `FALSE`
    #[default]
    Keyword,
    /// `1` / `0`
    Numeric,
}

/// Tokens that identifier-list quoting leaves bare unless a dialect says otherwise.
pub const DEFAULT_SKIP_TOKENS: &[&str] = &[
    "AS", "ASC", "DESC", "AND", "OR", "NOT", "NULL", "IS", "IN", "LIKE", "BETWEEN", "DISTINCT",
    "CASE", "WHEN", "THEN", "ELSE", "END", "TRUE", "FALSE", "ON", "COUNT", "SUM", "AVG", "MIN",
    "MAX",
];

/// Description of a SQL dialect, consumed by [`DialectPlatform`](super::DialectPlatform).
///
/// Missing fields fall back to the ANSI preset when deserializing, so a
/// configuration file only needs to list what differs:
///
/// ```ignore
/// let config = PlatformConfig::from_json(r#"{
///     "name": "mysql-compat",
///     "identifier_quote": { "open": "`", "close": "`" },
///     "parameter_type": "position_based"
/// }"#)?;
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformConfig {
    /// Dialect name, reported in log events.
    pub name: String,
    /// Identifier quote pair.
    pub identifier_quote: IdentifierQuote,
    /// Bind-marker style.
    pub parameter_type: ParameterType,
    /// Marker prefix for named parameters (`:` or `@`).
    pub named_prefix: char,
    /// Marker prefix for numbered parameters (`$`).
    pub index_prefix: char,
    /// Boolean literal style.
    pub boolean_literals: BooleanLiterals,
    /// Whether backslash acts as an escape inside string literals.
    pub backslash_escapes: bool,
    /// Words never quoted by identifier-list quoting (matched case-insensitively).
    pub skip_tokens: Vec<String>,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self::ansi()
    }
}

impl PlatformConfig {
    /// ANSI SQL: double-quoted identifiers, `:name` markers.
    pub fn ansi() -> Self {
        Self {
            name: "ansi".to_string(),
            identifier_quote: IdentifierQuote::default(),
            parameter_type: ParameterType::NamedBased,
            named_prefix: ':',
            index_prefix: '$',
            boolean_literals: BooleanLiterals::Keyword,
            backslash_escapes: false,
            skip_tokens: DEFAULT_SKIP_TOKENS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// PostgreSQL: double-quoted identifiers, `$n` markers.
    pub fn postgres() -> Self {
        Self::ansi()
            .with_name("postgres")
            .with_parameter_type(ParameterType::IndexBased)
            .with_skip_tokens(["ILIKE", "RETURNING"])
    }

    /// MySQL: backtick identifiers, `?` markers, backslash escapes.
    pub fn mysql() -> Self {
        Self::ansi()
            .with_name("mysql")
            .with_identifier_quote('`', '`')
            .with_parameter_type(ParameterType::PositionBased)
            .with_boolean_literals(BooleanLiterals::Numeric)
            .with_backslash_escapes(true)
            .with_skip_tokens(["REGEXP", "DIV"])
    }

    /// SQLite: double-quoted identifiers, `:name` markers, numeric booleans.
    pub fn sqlite() -> Self {
        Self::ansi()
            .with_name("sqlite")
            .with_boolean_literals(BooleanLiterals::Numeric)
            .with_skip_tokens(["GLOB"])
    }

    /// SQL Server: bracketed identifiers, `@name` markers, numeric booleans.
    pub fn sql_server() -> Self {
        let mut config = Self::ansi()
            .with_name("sqlserver")
            .with_identifier_quote('[', ']')
            .with_boolean_literals(BooleanLiterals::Numeric)
            .with_skip_tokens(["TOP"]);
        config.named_prefix = '@';
        config
    }

    /// Parse a configuration from JSON.
    pub fn from_json(json: &str) -> SqlResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Set the dialect name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the identifier quote pair.
    pub fn with_identifier_quote(mut self, open: char, close: char) -> Self {
        self.identifier_quote = IdentifierQuote::new(open, close);
        self
    }

    /// Set the bind-marker style.
    pub fn with_parameter_type(mut self, parameter_type: ParameterType) -> Self {
        self.parameter_type = parameter_type;
        self
    }

    /// Set the boolean literal style.
    pub fn with_boolean_literals(mut self, style: BooleanLiterals) -> Self {
        self.boolean_literals = style;
        self
    }

    /// Enable or disable backslash escaping in string literals.
    pub fn with_backslash_escapes(mut self, enabled: bool) -> Self {
        self.backslash_escapes = enabled;
        self
    }

    /// Add words to the skip list.
    pub fn with_skip_tokens<I, S>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for token in tokens {
            let token = token.into();
            if !self.is_skip_token(&token) {
                self.skip_tokens.push(token);
            }
        }
        self
    }

    /// Remove a word from the skip list, so it is quoted like any identifier.
    pub fn without_skip_token(mut self, token: &str) -> Self {
        self.skip_tokens.retain(|t| !t.eq_ignore_ascii_case(token));
        self
    }

    /// Check whether `token` is on the skip list.
    pub fn is_skip_token(&self, token: &str) -> bool {
        self.skip_tokens.iter().any(|t| t.eq_ignore_ascii_case(token))
    }
}
