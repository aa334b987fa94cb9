//! Serde helper that marks `DateTime<Utc>` fields as timestamps.
//!
//! Use with `#[serde(with = "marquee_core::timestamp")]` (or
//! `marquee_core::timestamp::option` for `Option<DateTime<Utc>>`).
//!
//! The value is emitted as a newtype struct named [`TOKEN`] wrapping the
//! ISO-8601 string. Ordinary serializers such as `serde_json` treat a
//! newtype struct transparently, so the wire form is a plain string. The
//! cache value serializer recognises the token and keeps the field as a
//! timestamp node, which is what lets cached records round-trip their
//! dates as dates.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::de::{self, Deserializer, Visitor};
use serde::ser::Serializer;
use serde::Deserialize;
use std::fmt;

/// Newtype struct name that identifies a timestamp to cooperating serializers.
pub const TOKEN: &str = "$marquee::private::Timestamp";

/// Formats an instant as ISO-8601 in UTC with a `Z` suffix.
///
/// Fractional seconds are written only when present, so second-precision
/// values print as `2024-05-01T08:30:00Z` and sub-second precision is kept.
#[must_use]
pub fn format(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// Parses an RFC 3339 / ISO-8601 string into a UTC instant.
pub fn parse(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(raw).map(|dt| dt.with_timezone(&Utc))
}

/// Serializes a timestamp field.
pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_newtype_struct(TOKEN, &format(value))
}

/// Deserializes a timestamp field.
pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_newtype_struct(TOKEN, TimestampVisitor)
}

struct TimestampVisitor;

impl<'de> Visitor<'de> for TimestampVisitor {
    type Value = DateTime<Utc>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an ISO-8601 timestamp")
    }

    fn visit_newtype_struct<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(de::Error::custom)
    }

    fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        parse(value).map_err(E::custom)
    }
}

/// Same as the parent module, for optional fields.
pub mod option {
    use super::TimestampVisitor;
    use chrono::{DateTime, Utc};
    use serde::de::{Deserializer, Visitor};
    use serde::ser::{Serialize, Serializer};
    use std::fmt;

    struct Marked<'a>(&'a DateTime<Utc>);

    impl Serialize for Marked<'_> {
        fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            super::serialize(self.0, serializer)
        }
    }

    /// Serializes an optional timestamp field.
    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(value) => serializer.serialize_some(&Marked(value)),
            None => serializer.serialize_none(),
        }
    }

    /// Deserializes an optional timestamp field.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_option(OptionVisitor)
    }

    struct OptionVisitor;

    impl<'de> Visitor<'de> for OptionVisitor {
        type Value = Option<DateTime<Utc>>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("an optional ISO-8601 timestamp")
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(None)
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(None)
        }

        fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
        where
            D: Deserializer<'de>,
        {
            deserializer
                .deserialize_newtype_struct(super::TOKEN, TimestampVisitor)
                .map(Some)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde::Serialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Stamped {
        #[serde(with = "crate::timestamp")]
        at: DateTime<Utc>,
        #[serde(with = "crate::timestamp::option")]
        maybe: Option<DateTime<Utc>>,
    }

    #[test]
    fn test_format_omits_zero_fraction() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 8, 30, 0).unwrap();
        assert_eq!(format(&at), "2024-05-01T08:30:00Z");
    }

    #[test]
    fn test_format_keeps_millis() {
        let at = Utc.timestamp_millis_opt(1_714_552_200_123).unwrap();
        assert_eq!(format(&at), "2024-05-01T08:30:00.123Z");
    }

    #[test]
    fn test_parse_accepts_offsets() {
        let parsed = parse("2024-05-01T10:30:00+02:00").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 5, 1, 8, 30, 0).unwrap());
    }

    #[test]
    fn test_json_wire_form_is_plain_string() {
        let value = Stamped {
            at: Utc.with_ymd_and_hms(2024, 5, 1, 8, 30, 0).unwrap(),
            maybe: None,
        };
        let json = serde_json::to_string(&value).unwrap();
        assert_eq!(json, r#"{"at":"2024-05-01T08:30:00Z","maybe":null}"#);

        let parsed: Stamped = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, value);
    }

    #[test]
    fn test_json_optional_present() {
        let json = r#"{"at":"2024-05-01T08:30:00Z","maybe":"2023-01-02T03:04:05.5Z"}"#;
        let parsed: Stamped = serde_json::from_str(json).unwrap();
        assert_eq!(
            parsed.maybe,
            Some(Utc.timestamp_millis_opt(1_672_628_645_500).unwrap())
        );
    }

    #[test]
    fn test_invalid_timestamp_is_an_error() {
        let json = r#"{"at":"yesterday","maybe":null}"#;
        assert!(serde_json::from_str::<Stamped>(json).is_err());
    }
}
