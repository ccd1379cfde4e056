//! Per-dialect construction of statement builders.

use crate::platform::{DialectPlatform, Platform};
use crate::stmt::{Delete, Insert, Select, Update};
use std::sync::Arc;

/// The seam to a database connection layer: anything that can report which
/// [`Platform`] its SQL must be written for.
pub trait Adapter {
    fn platform(&self) -> Arc<dyn Platform>;
}

impl Adapter for DialectPlatform {
    fn platform(&self) -> Arc<dyn Platform> {
        Arc::new(self.clone())
    }
}

impl Adapter for Arc<dyn Platform> {
    fn platform(&self) -> Arc<dyn Platform> {
        Arc::clone(self)
    }
}

/// Hands out builders already bound to one platform.
///
/// ```ignore
/// let factory = Factory::new(&DialectPlatform::postgres());
/// let sql = factory.select().from("users").where_eq("id", 1).compile()?;
/// ```
#[derive(Debug, Clone)]
pub struct Factory {
    platform: Arc<dyn Platform>,
}

impl Factory {
    /// Build a factory for the adapter's platform.
    pub fn new(adapter: &impl Adapter) -> Self {
        Self::with_platform(adapter.platform())
    }

    pub fn with_platform(platform: Arc<dyn Platform>) -> Self {
        sql_event!(debug, dialect = platform.name(), "created statement factory");
        Self { platform }
    }

    pub fn platform(&self) -> &Arc<dyn Platform> {
        &self.platform
    }

    pub fn select(&self) -> Select {
        Select::new().with_platform(Arc::clone(&self.platform))
    }

    pub fn insert(&self) -> Insert {
        Insert::new().with_platform(Arc::clone(&self.platform))
    }

    pub fn update(&self) -> Update {
        Update::new().with_platform(Arc::clone(&self.platform))
    }

    pub fn delete(&self) -> Delete {
        Delete::new().with_platform(Arc::clone(&self.platform))
    }
}
