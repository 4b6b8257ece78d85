// Domain layer - Dashboard model, query extraction and series analysis
pub mod analysis;
pub mod dashboard;
pub mod extraction;
pub mod report;
pub mod series;

use serde::{Deserialize, Deserializer};

/// Read a JSON array that may be absent or `null` as an empty list.
pub(crate) fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
