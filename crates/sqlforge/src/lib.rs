//! # sqlforge
//!
//! A portable SQL statement builder.
//!
//! ## Features
//!
//! - **Dialect-neutral builders**: SELECT / INSERT / UPDATE / DELETE, with the
//!   quoting and bind-marker style supplied by a pluggable [`Platform`]
//! - **Two compile paths**: fully inlined SQL, or placeholder SQL plus an
//!   ordered [`ParamContainer`]
//! - **Deterministic parameter names**: `where1`, `having2`, `insert3`, ... from
//!   one counter shared by every nested subquery and UNION branch
//! - **Composable nodes**: conditions, joins, functions, raw SQL and nested
//!   selects all implement [`Literal`]
//!
//! ```ignore
//! use sqlforge::prelude::*;
//!
//! let factory = Factory::new(&DialectPlatform::postgres());
//!
//! let mut params = ParamContainer::new();
//! let sql = factory
//!     .select()
//!     .columns(["id", "name"])
//!     .from("users")
//!     .where_eq("status", "active")
//!     .where_op("age", 18, ">=")?
//!     .order_by_desc("created_at")
//!     .limit(10)
//!     .compile_with_parameters(&mut params, true)?;
//! // SELECT "id", "name" FROM "users" WHERE "status" = $1 AND "age" >= $2
//! //     ORDER BY "created_at" DESC LIMIT 10
//! ```
//!
//! Connection handling is out of scope: a driver integrates by implementing
//! [`Adapter`] and binding [`ParamContainer::values`] in order.
//!
//! With the `tracing` feature enabled, compiled statements and rejected builder
//! input are reported as events under the `sqlforge.sql` target.

#![cfg_attr(not(feature = "tracing"), allow(unused_variables))]

#[cfg(feature = "tracing")]
macro_rules! sql_event {
    ($level:ident, $($arg:tt)+) => {
        ::tracing::$level!(target: "sqlforge.sql", $($arg)+)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! sql_event {
    ($level:ident, $($arg:tt)+) => {{}};
}

pub mod error;
pub mod factory;
pub mod literal;
pub mod param;
pub mod platform;
pub mod prelude;
pub mod stmt;
pub mod value;

pub use error::{SqlError, SqlResult};
pub use factory::{Adapter, Factory};
pub use literal::{
    Expr, Having, IntoLiteral, Join, JoinKind, Literal, Operand, Operator, RenderContext,
    SqlFunction, SqlLiteral, Where,
};
pub use param::ParamContainer;
pub use platform::{
    BooleanLiterals, DialectPlatform, IdentifierQuote, ParameterType, Platform, PlatformConfig,
};
pub use stmt::{
    Column, Delete, Direction, FieldValue, Insert, Select, Statement, StatementKind, Update,
    delete_from, insert_into, select, update,
};
pub use value::Value;
