//! Typed schemas for the backend's JSON documents.
//!
//! Every contract is validated and defaulted here, at the boundary, so the
//! transformations in [`crate::series`] only ever see well-formed values.
//! Malformed values never fail a whole document: they are replaced by the
//! field's default and reported with `tracing::warn!`.

pub mod aggregates;
pub mod listing;
pub mod record;

pub use aggregates::{
    ChartData, CourseSummaryResponse, DailyAggregate, DayPart, DayPartShare, HourlyAggregate,
    HourlyEntry, MonthlyAggregate, SuppliedRange, WeeklyAggregate, WeeklyAggregateEntry,
};
pub use listing::{
    Course, CourseListing, ParticipationEntry, ParticipationResponse, Student, StudentListing,
};
pub use record::{DetailedActivityResponse, GapSummary, TimeOfDayShares, WeekMetrics, WeeklyRecord};

use serde::Deserialize;
use serde::de::{DeserializeOwned, Deserializer};
use serde_json::Value;
use tracing::warn;

/// A value that can be recovered from loosely-typed JSON.
///
/// `from_value` returns `None` when the JSON value has the wrong shape; the
/// boundary helpers then substitute `Default::default()`.
pub trait Lenient: Sized {
    fn from_value(value: &Value) -> Option<Self>;
}

impl Lenient for u64 {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_u64().or_else(|| {
                n.as_f64()
                    .filter(|f| f.is_finite() && *f >= 0.0 && f.fract() == 0.0)
                    .map(|f| f as u64)
            }),
            _ => None,
        }
    }
}

impl Lenient for u32 {
    fn from_value(value: &Value) -> Option<Self> {
        u64::from_value(value).and_then(|v| u32::try_from(v).ok())
    }
}

impl Lenient for f64 {
    fn from_value(value: &Value) -> Option<Self> {
        value.as_f64().filter(|f| f.is_finite())
    }
}

impl Lenient for String {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

impl<T: Lenient> Lenient for Option<T> {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Null => Some(None),
            other => T::from_value(other).map(Some),
        }
    }
}

/// Short description of a JSON value's kind, for log fields.
pub(crate) fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Coerces a JSON array into `Vec<T>`, keeping positions aligned.
///
/// Elements of the wrong type become `T::default()`; a non-array yields an
/// empty vector.
pub(crate) fn coerce_seq<T: Lenient + Default>(field: &str, value: &Value) -> Vec<T> {
    match value {
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                T::from_value(item).unwrap_or_else(|| {
                    warn!(field, index, found = kind(item), "Malformed array element, using default");
                    T::default()
                })
            })
            .collect(),
        Value::Null => Vec::new(),
        other => {
            warn!(field, found = kind(other), "Expected an array, using empty sequence");
            Vec::new()
        }
    }
}

/// Deserializes each element of a JSON array as `T`, dropping the ones that
/// do not match.
pub(crate) fn coerce_records<T: DeserializeOwned>(field: &str, value: Value) -> Vec<T> {
    match value {
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .filter_map(|(index, item)| match serde_json::from_value(item) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!(field, index, error = %e, "Dropping malformed record");
                    None
                }
            })
            .collect(),
        Value::Null => Vec::new(),
        other => {
            warn!(field, found = kind(&other), "Expected an array of records, using empty sequence");
            Vec::new()
        }
    }
}

/// Decodes a nested object section, defaulting when it is `null`, not an
/// object, or does not match `T`.
pub(crate) fn coerce_section<T: DeserializeOwned + Default>(field: &str, value: Value) -> T {
    match value {
        Value::Null => T::default(),
        Value::Object(_) => serde_json::from_value(value).unwrap_or_else(|e| {
            warn!(field, error = %e, "Malformed section, using default");
            T::default()
        }),
        other => {
            warn!(field, found = kind(&other), "Expected an object, using default section");
            T::default()
        }
    }
}

/// `deserialize_with` adapter for [`coerce_section`].
pub(crate) fn section<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(coerce_section(std::any::type_name::<T>(), value))
}

/// Reads an optional scalar, defaulting when it is absent or malformed.
pub(crate) fn coerce_field<T: Lenient + Default>(field: &str, value: Option<&Value>) -> T {
    match value {
        None | Some(Value::Null) => T::default(),
        Some(v) => T::from_value(v).unwrap_or_else(|| {
            warn!(field, found = kind(v), "Malformed field, using default");
            T::default()
        }),
    }
}
