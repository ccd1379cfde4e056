//! Convenient imports for typical `sqlforge` usage.
//!
//! ```ignore
//! use sqlforge::prelude::*;
//! ```

pub use crate::{
    Adapter, Direction, DialectPlatform, Factory, Having, Join, JoinKind, ParamContainer,
    Platform, PlatformConfig, Select, SqlError, SqlFunction, SqlLiteral, SqlResult, Statement,
    Value, Where,
};
pub use crate::{Delete, Insert, Update};
