/// Shared types used across the codebase

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

/// Sparse field -> new value mapping for partial updates.
///
/// Backed by an insertion-ordered map; iteration order decides placeholder
/// numbering in the compiled `SET` clause.
pub type UpdateMap = Map<String, Value>;

/// Record `field` in `data` when the request carried it.
///
/// A `Some(None)` from a nullable field lands as JSON `null`.
pub fn set_present<T: Into<Value>>(data: &mut UpdateMap, field: &str, value: Option<T>) {
    if let Some(value) = value {
        data.insert(field.to_string(), value.into());
    }
}

/// Deserialize a field that may be absent, `null` or set.
///
/// Pair with `#[serde(default)]`: absent stays `None`, `null` becomes `Some(None)`.
pub fn nullable<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Translation table from external (camelCase) field names to storage columns.
///
/// Fields without an entry keep their external name as the column name.
#[derive(Debug, Clone, Copy, Default)]
pub struct ColumnMap {
    entries: &'static [(&'static str, &'static str)],
}

impl ColumnMap {
    pub const EMPTY: ColumnMap = ColumnMap { entries: &[] };

    pub const fn new(entries: &'static [(&'static str, &'static str)]) -> Self {
        Self { entries }
    }

    /// Storage column for `field`, falling back to `field` itself.
    pub fn column<'a>(&self, field: &'a str) -> &'a str {
        self.entries
            .iter()
            .find(|(external, _)| *external == field)
            .map(|(_, column)| *column)
            .unwrap_or(field)
    }
}
