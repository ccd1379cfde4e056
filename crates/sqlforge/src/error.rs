//! Error types for sqlforge

use thiserror::Error;

/// Result type alias for sqlforge operations
pub type SqlResult<T> = Result<T, SqlError>;

/// Errors raised while building or compiling a statement.
///
/// Every variant is raised eagerly at the point of misuse. None of them is
/// transient, so callers should never retry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SqlError {
    /// Compile attempted on a statement with no bound platform
    #[error("No platform bound: attach an adapter or platform before compiling")]
    MissingAdapter,

    /// SELECT compiled without a FROM source
    #[error("Missing FROM: call `from()` before compiling a SELECT")]
    MissingFrom,

    /// INSERT/UPDATE/DELETE compiled without a target table
    #[error("Missing table: no target table was set")]
    MissingTable,

    /// INSERT/UPDATE compiled with zero field/value pairs
    #[error("No fields defined: {0}")]
    NoFieldsDefined(String),

    /// Column counts that must agree do not
    #[error("Column count mismatch: expected {expected} column(s), got {actual}")]
    ColumnCountMismatch { expected: usize, actual: usize },

    /// Operator unknown, or incompatible with the operand shape
    #[error("Invalid operator: {0}")]
    InvalidOperator(String),

    /// A nested SELECT was used where an alias is mandatory, or an alias is empty
    #[error("Invalid alias: {0}")]
    InvalidAlias(String),

    /// Join kind outside INNER/LEFT/RIGHT/FULL/CROSS
    #[error("Unknown join kind: '{0}'")]
    UnknownJoinKind(String),

    /// Platform configuration could not be parsed
    #[error("Configuration error: {0}")]
    Config(String),
}

impl SqlError {
    /// Create a no-fields error
    pub fn no_fields(message: impl Into<String>) -> Self {
        Self::NoFieldsDefined(message.into())
    }

    /// Create a column count mismatch error
    pub fn column_count(expected: usize, actual: usize) -> Self {
        Self::ColumnCountMismatch { expected, actual }
    }

    /// Create an invalid operator error
    pub fn invalid_operator(message: impl Into<String>) -> Self {
        Self::InvalidOperator(message.into())
    }

    /// Create an invalid alias error
    pub fn invalid_alias(message: impl Into<String>) -> Self {
        Self::InvalidAlias(message.into())
    }

    /// Check if this is a column count mismatch
    pub fn is_column_count_mismatch(&self) -> bool {
        matches!(self, Self::ColumnCountMismatch { .. })
    }

    /// Check if this is an invalid operator error
    pub fn is_invalid_operator(&self) -> bool {
        matches!(self, Self::InvalidOperator(_))
    }

    /// Check if this error was caused by missing statement state
    /// (platform, table or fields) rather than a bad argument.
    pub fn is_incomplete_statement(&self) -> bool {
        matches!(
            self,
            Self::MissingAdapter | Self::MissingFrom | Self::MissingTable | Self::NoFieldsDefined(_)
        )
    }
}

impl From<serde_json::Error> for SqlError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(err.to_string())
    }
}
