//! Ordered parameter storage shared across nested compilations.

use crate::value::Value;
use indexmap::IndexMap;
use serde::Serialize;

/// An ordered `name -> value` map filled during parameterized compilation.
///
/// Names are generated from a single counter owned by the container and
/// prefixed by the clause kind that requested them (`where1`, `having2`,
/// `insert3`, ...). Because the counter lives here and not in the statement,
/// subqueries built independently and composed later still produce unique
/// names as long as they are compiled into the same container.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ParamContainer {
    entries: IndexMap<String, Value>,
    #[serde(skip)]
    counter: usize,
}

impl ParamContainer {
    /// Create a new empty container.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve the next name for `prefix` and store `value` under it.
    ///
    /// Returns the generated name and the value's 1-based position.
    pub fn bind(&mut self, prefix: &str, value: Value) -> (String, usize) {
        self.counter += 1;
        let name = format!("{}{}", prefix, self.counter);
        self.entries.insert(name.clone(), value);
        (name, self.entries.len())
    }

    /// Look up a value by parameter name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries.get(name)
    }

    /// Check whether a parameter name is present.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Number of stored parameters.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the container is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Current value of the name counter (number of names handed out since
    /// the last [`clear`](Self::clear)).
    pub fn counter(&self) -> usize {
        self.counter
    }

    /// Parameter names in first-use order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Values in first-use order, ready for positional binding.
    pub fn values(&self) -> Vec<&Value> {
        self.entries.values().collect()
    }

    /// Iterate `(name, value)` pairs in first-use order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    /// Remove all parameters and rewind the name counter.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.counter = 0;
    }

    /// Consume the container, returning its entries.
    pub fn into_entries(self) -> Vec<(String, Value)> {
        self.entries.into_iter().collect()
    }
}
