//! Wire format for cached values.
//!
//! Values are stored as UTF-8 JSON. JSON has no date type, so every
//! timestamp node is written as a tagged object
//! `{"__type":"Date","value":"2024-05-01T08:30:00Z"}` and turned back into a
//! timestamp when read. Any mapping that carries that tag and a parseable
//! `value` is revived, including one that was written as plain data.

use crate::value::{from_value, to_value, CacheValue};
use crate::CacheResult;
use marquee_core::timestamp;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

/// Field holding the type tag of an encoded value.
pub const TYPE_FIELD: &str = "__type";

/// Field holding the payload of an encoded value.
pub const VALUE_FIELD: &str = "value";

/// Type tag of an encoded timestamp.
pub const DATE_TAG: &str = "Date";

/// Encodes a value into its wire text.
pub fn encode(value: &CacheValue) -> CacheResult<String> {
    Ok(serde_json::to_string(&to_json(value))?)
}

/// Decodes wire text into a value, reviving tagged timestamps.
pub fn decode(raw: &str) -> CacheResult<CacheValue> {
    let json: Value = serde_json::from_str(raw)?;
    Ok(revive(json))
}

/// Encodes a typed value.
pub fn encode_typed<T>(value: &T) -> CacheResult<String>
where
    T: Serialize + ?Sized,
{
    encode(&to_value(value)?)
}

/// Decodes wire text into a typed value.
pub fn decode_typed<T>(raw: &str) -> CacheResult<T>
where
    T: DeserializeOwned,
{
    from_value(decode(raw)?)
}

fn to_json(value: &CacheValue) -> Value {
    match value {
        CacheValue::Null => Value::Null,
        CacheValue::Bool(b) => Value::Bool(*b),
        CacheValue::Number(n) => Value::Number(n.clone()),
        CacheValue::String(s) => Value::String(s.clone()),
        CacheValue::Timestamp(at) => {
            let mut tagged = Map::new();
            tagged.insert(TYPE_FIELD.to_owned(), Value::String(DATE_TAG.to_owned()));
            tagged.insert(VALUE_FIELD.to_owned(), Value::String(timestamp::format(at)));
            Value::Object(tagged)
        }
        CacheValue::Sequence(items) => Value::Array(items.iter().map(to_json).collect()),
        CacheValue::Mapping(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), to_json(v)))
                .collect(),
        ),
    }
}

fn revive(json: Value) -> CacheValue {
    match json {
        Value::Null => CacheValue::Null,
        Value::Bool(b) => CacheValue::Bool(b),
        Value::Number(n) => CacheValue::Number(n),
        Value::String(s) => CacheValue::String(s),
        Value::Array(items) => CacheValue::Sequence(items.into_iter().map(revive).collect()),
        Value::Object(map) => match tagged_date(&map) {
            Some(at) => CacheValue::Timestamp(at),
            None => CacheValue::Mapping(
                map.into_iter()
                    .map(|(k, v)| (k, revive(v)))
                    .collect(),
            ),
        },
    }
}

fn tagged_date(map: &Map<String, Value>) -> Option<chrono::DateTime<chrono::Utc>> {
    if map.get(TYPE_FIELD).and_then(Value::as_str) != Some(DATE_TAG) {
        return None;
    }
    map.get(VALUE_FIELD)
        .and_then(Value::as_str)
        .and_then(|raw| timestamp::parse(raw).ok())
}
