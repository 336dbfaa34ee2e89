pub mod company;
pub mod job;
pub mod user;

use serde::Serializer;
use sqlx::types::BigDecimal;

/// Numeric columns go out as strings so no precision is lost in JSON.
pub(crate) fn serialize_decimal<S>(value: &Option<BigDecimal>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value {
        Some(decimal) => serializer.collect_str(decimal),
        None => serializer.serialize_none(),
    }
}
