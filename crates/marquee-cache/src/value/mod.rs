//! The cache value model.
//!
//! [`CacheValue`] is the closed set of shapes a cached query result can
//! take. Typed records are converted with [`to_value`] and [`from_value`],
//! which are a serde `Serializer` and `Deserializer` over this tree. Fields
//! annotated with `marquee_core::timestamp` become [`CacheValue::Timestamp`]
//! nodes instead of strings, so the codec can tag them on the wire.

mod de;
mod ser;

use crate::CacheResult;
use chrono::{DateTime, Utc};
use serde::de::{DeserializeOwned, Unexpected};
use serde::Serialize;
use serde_json::Number;
use std::collections::BTreeMap;

/// A cached value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CacheValue {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Timestamp(DateTime<Utc>),
    Sequence(Vec<CacheValue>),
    Mapping(BTreeMap<String, CacheValue>),
}

impl CacheValue {
    /// Returns true for [`CacheValue::Null`].
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the instant if this is a timestamp node.
    #[must_use]
    pub const fn as_timestamp(&self) -> Option<&DateTime<Utc>> {
        match self {
            Self::Timestamp(at) => Some(at),
            _ => None,
        }
    }

    /// Returns the string if this is a string node.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Looks up a field of a mapping node.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&CacheValue> {
        match self {
            Self::Mapping(map) => map.get(field),
            _ => None,
        }
    }

    pub(crate) fn unexpected(&self) -> Unexpected<'_> {
        match self {
            Self::Null => Unexpected::Unit,
            Self::Bool(b) => Unexpected::Bool(*b),
            Self::Number(n) => {
                if let Some(u) = n.as_u64() {
                    Unexpected::Unsigned(u)
                } else if let Some(i) = n.as_i64() {
                    Unexpected::Signed(i)
                } else {
                    Unexpected::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            Self::String(s) => Unexpected::Str(s),
            Self::Timestamp(_) => Unexpected::Other("timestamp"),
            Self::Sequence(_) => Unexpected::Seq,
            Self::Mapping(_) => Unexpected::Map,
        }
    }
}

impl From<bool> for CacheValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for CacheValue {
    fn from(value: i64) -> Self {
        Self::Number(value.into())
    }
}

impl From<u64> for CacheValue {
    fn from(value: u64) -> Self {
        Self::Number(value.into())
    }
}

impl From<f64> for CacheValue {
    /// Non-finite floats have no JSON form and become `Null`.
    fn from(value: f64) -> Self {
        Number::from_f64(value).map_or(Self::Null, Self::Number)
    }
}

impl From<&str> for CacheValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for CacheValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<DateTime<Utc>> for CacheValue {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Timestamp(value)
    }
}

impl<T: Into<CacheValue>> From<Vec<T>> for CacheValue {
    fn from(values: Vec<T>) -> Self {
        Self::Sequence(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<CacheValue>> From<Option<T>> for CacheValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

impl<K: Into<String>, V: Into<CacheValue>> FromIterator<(K, V)> for CacheValue {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::Mapping(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Converts a serializable value into a [`CacheValue`].
pub fn to_value<T>(value: &T) -> CacheResult<CacheValue>
where
    T: Serialize + ?Sized,
{
    value.serialize(ser::ValueSerializer)
}

/// Converts a [`CacheValue`] back into a typed value.
pub fn from_value<T>(value: CacheValue) -> CacheResult<T>
where
    T: DeserializeOwned,
{
    T::deserialize(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde::Deserialize;
    use std::collections::HashMap;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Screening {
        title: String,
        #[serde(with = "marquee_core::timestamp")]
        starts_at: DateTime<Utc>,
        #[serde(with = "marquee_core::timestamp::option")]
        ends_at: Option<DateTime<Utc>>,
        seats: u32,
        price: f64,
        tags: Vec<String>,
        format: Format,
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    enum Format {
        Digital,
        Film { millimetres: u16 },
        Imax(String),
    }

    fn starts_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 19, 30, 0).unwrap()
    }

    fn screening() -> Screening {
        Screening {
            title: "Metropolis".into(),
            starts_at: starts_at(),
            ends_at: None,
            seats: 120,
            price: 9.5,
            tags: vec!["restored".into(), "silent".into()],
            format: Format::Film { millimetres: 35 },
        }
    }

    #[test]
    fn test_timestamp_fields_become_timestamp_nodes() {
        let value = to_value(&screening()).unwrap();

        assert_eq!(
            value.get("startsAt").and_then(CacheValue::as_timestamp),
            Some(&starts_at())
        );
        assert!(value.get("endsAt").unwrap().is_null());
        assert_eq!(value.get("title").and_then(CacheValue::as_str), Some("Metropolis"));
    }

    #[test]
    fn test_typed_round_trip() {
        let original = screening();
        let restored: Screening = from_value(to_value(&original).unwrap()).unwrap();
        assert_eq!(restored, original);
    }

    #[test]
    fn test_enum_variants_round_trip() {
        for format in [
            Format::Digital,
            Format::Film { millimetres: 70 },
            Format::Imax("laser".into()),
        ] {
            let value = to_value(&format).unwrap();
            let restored: Format = from_value(value).unwrap();
            assert_eq!(restored, format);
        }
    }

    #[test]
    fn test_unit_variant_is_a_string() {
        assert_eq!(to_value(&Format::Digital).unwrap(), CacheValue::from("digital"));
    }

    #[test]
    fn test_non_finite_float_becomes_null() {
        assert_eq!(to_value(&f64::NAN).unwrap(), CacheValue::Null);
        assert_eq!(CacheValue::from(f64::INFINITY), CacheValue::Null);
    }

    #[test]
    fn test_numeric_map_keys_are_stringified() {
        let mut ratings = HashMap::new();
        ratings.insert(5_u8, "masterpiece");
        let value = to_value(&ratings).unwrap();
        assert_eq!(value.get("5").and_then(CacheValue::as_str), Some("masterpiece"));
    }

    #[test]
    fn test_plain_chrono_serializes_as_string() {
        let value = to_value(&starts_at()).unwrap();
        assert!(matches!(value, CacheValue::String(_)));
    }

    #[test]
    fn test_timestamp_node_reads_into_string_field() {
        let value: CacheValue = [("title", CacheValue::Timestamp(starts_at()))]
            .into_iter()
            .collect();

        #[derive(Deserialize)]
        struct Titled {
            title: String,
        }

        let titled: Titled = from_value(value).unwrap();
        assert_eq!(titled.title, "2024-05-01T19:30:00Z");
    }

    #[test]
    fn test_shape_mismatch_is_codec_error() {
        let err = from_value::<Screening>(CacheValue::from(42_i64)).unwrap_err();
        assert!(matches!(err, crate::CacheError::Codec(_)));
    }
}
