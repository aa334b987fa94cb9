//! Serializer from typed values into [`CacheValue`].

use super::CacheValue;
use crate::{CacheError, CacheResult};
use marquee_core::timestamp;
use serde::ser::{self, Serialize};
use serde_json::Number;
use std::collections::BTreeMap;

pub(crate) struct ValueSerializer;

impl ser::Serializer for ValueSerializer {
    type Ok = CacheValue;
    type Error = CacheError;

    type SerializeSeq = SerializeSequence;
    type SerializeTuple = SerializeSequence;
    type SerializeTupleStruct = SerializeSequence;
    type SerializeTupleVariant = SerializeTupleVariant;
    type SerializeMap = SerializeMapping;
    type SerializeStruct = SerializeMapping;
    type SerializeStructVariant = SerializeStructVariant;

    fn serialize_bool(self, v: bool) -> CacheResult<CacheValue> {
        Ok(CacheValue::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> CacheResult<CacheValue> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_i16(self, v: i16) -> CacheResult<CacheValue> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_i32(self, v: i32) -> CacheResult<CacheValue> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_i64(self, v: i64) -> CacheResult<CacheValue> {
        Ok(CacheValue::Number(v.into()))
    }

    fn serialize_i128(self, v: i128) -> CacheResult<CacheValue> {
        if let Ok(v) = i64::try_from(v) {
            self.serialize_i64(v)
        } else if let Ok(v) = u64::try_from(v) {
            self.serialize_u64(v)
        } else {
            Err(CacheError::codec(format!("integer {v} is out of range")))
        }
    }

    fn serialize_u8(self, v: u8) -> CacheResult<CacheValue> {
        self.serialize_u64(u64::from(v))
    }

    fn serialize_u16(self, v: u16) -> CacheResult<CacheValue> {
        self.serialize_u64(u64::from(v))
    }

    fn serialize_u32(self, v: u32) -> CacheResult<CacheValue> {
        self.serialize_u64(u64::from(v))
    }

    fn serialize_u64(self, v: u64) -> CacheResult<CacheValue> {
        Ok(CacheValue::Number(v.into()))
    }

    fn serialize_u128(self, v: u128) -> CacheResult<CacheValue> {
        u64::try_from(v)
            .map_err(|_| CacheError::codec(format!("integer {v} is out of range")))
            .and_then(|v| self.serialize_u64(v))
    }

    fn serialize_f32(self, v: f32) -> CacheResult<CacheValue> {
        self.serialize_f64(f64::from(v))
    }

    fn serialize_f64(self, v: f64) -> CacheResult<CacheValue> {
        Ok(Number::from_f64(v).map_or(CacheValue::Null, CacheValue::Number))
    }

    fn serialize_char(self, v: char) -> CacheResult<CacheValue> {
        Ok(CacheValue::String(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> CacheResult<CacheValue> {
        Ok(CacheValue::String(v.to_owned()))
    }

    fn serialize_bytes(self, v: &[u8]) -> CacheResult<CacheValue> {
        Ok(CacheValue::Sequence(
            v.iter().map(|b| CacheValue::Number((*b).into())).collect(),
        ))
    }

    fn serialize_none(self) -> CacheResult<CacheValue> {
        Ok(CacheValue::Null)
    }

    fn serialize_some<T>(self, value: &T) -> CacheResult<CacheValue>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> CacheResult<CacheValue> {
        Ok(CacheValue::Null)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> CacheResult<CacheValue> {
        Ok(CacheValue::Null)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> CacheResult<CacheValue> {
        Ok(CacheValue::String(variant.to_owned()))
    }

    fn serialize_newtype_struct<T>(self, name: &'static str, value: &T) -> CacheResult<CacheValue>
    where
        T: ?Sized + Serialize,
    {
        if name != timestamp::TOKEN {
            return value.serialize(self);
        }

        match value.serialize(self)? {
            CacheValue::String(raw) => timestamp::parse(&raw)
                .map(CacheValue::Timestamp)
                .map_err(|e| CacheError::codec(format!("invalid timestamp {raw:?}: {e}"))),
            other => Err(CacheError::codec(format!(
                "timestamp marker must wrap a string, got {other:?}"
            ))),
        }
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> CacheResult<CacheValue>
    where
        T: ?Sized + Serialize,
    {
        let mut map = BTreeMap::new();
        map.insert(variant.to_owned(), value.serialize(ValueSerializer)?);
        Ok(CacheValue::Mapping(map))
    }

    fn serialize_seq(self, len: Option<usize>) -> CacheResult<SerializeSequence> {
        Ok(SerializeSequence {
            items: Vec::with_capacity(len.unwrap_or(0)),
        })
    }

    fn serialize_tuple(self, len: usize) -> CacheResult<SerializeSequence> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        len: usize,
    ) -> CacheResult<SerializeSequence> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> CacheResult<SerializeTupleVariant> {
        Ok(SerializeTupleVariant {
            variant,
            items: Vec::with_capacity(len),
        })
    }

    fn serialize_map(self, _len: Option<usize>) -> CacheResult<SerializeMapping> {
        Ok(SerializeMapping {
            map: BTreeMap::new(),
            next_key: None,
        })
    }

    fn serialize_struct(self, _name: &'static str, len: usize) -> CacheResult<SerializeMapping> {
        self.serialize_map(Some(len))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> CacheResult<SerializeStructVariant> {
        Ok(SerializeStructVariant {
            variant,
            map: BTreeMap::new(),
        })
    }
}

pub(crate) struct SerializeSequence {
    items: Vec<CacheValue>,
}

impl ser::SerializeSeq for SerializeSequence {
    type Ok = CacheValue;
    type Error = CacheError;

    fn serialize_element<T>(&mut self, value: &T) -> CacheResult<()>
    where
        T: ?Sized + Serialize,
    {
        self.items.push(value.serialize(ValueSerializer)?);
        Ok(())
    }

    fn end(self) -> CacheResult<CacheValue> {
        Ok(CacheValue::Sequence(self.items))
    }
}

impl ser::SerializeTuple for SerializeSequence {
    type Ok = CacheValue;
    type Error = CacheError;

    fn serialize_element<T>(&mut self, value: &T) -> CacheResult<()>
    where
        T: ?Sized + Serialize,
    {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> CacheResult<CacheValue> {
        ser::SerializeSeq::end(self)
    }
}

impl ser::SerializeTupleStruct for SerializeSequence {
    type Ok = CacheValue;
    type Error = CacheError;

    fn serialize_field<T>(&mut self, value: &T) -> CacheResult<()>
    where
        T: ?Sized + Serialize,
    {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> CacheResult<CacheValue> {
        ser::SerializeSeq::end(self)
    }
}

pub(crate) struct SerializeTupleVariant {
    variant: &'static str,
    items: Vec<CacheValue>,
}

impl ser::SerializeTupleVariant for SerializeTupleVariant {
    type Ok = CacheValue;
    type Error = CacheError;

    fn serialize_field<T>(&mut self, value: &T) -> CacheResult<()>
    where
        T: ?Sized + Serialize,
    {
        self.items.push(value.serialize(ValueSerializer)?);
        Ok(())
    }

    fn end(self) -> CacheResult<CacheValue> {
        let mut map = BTreeMap::new();
        map.insert(self.variant.to_owned(), CacheValue::Sequence(self.items));
        Ok(CacheValue::Mapping(map))
    }
}

pub(crate) struct SerializeMapping {
    map: BTreeMap<String, CacheValue>,
    next_key: Option<String>,
}

impl ser::SerializeMap for SerializeMapping {
    type Ok = CacheValue;
    type Error = CacheError;

    fn serialize_key<T>(&mut self, key: &T) -> CacheResult<()>
    where
        T: ?Sized + Serialize,
    {
        self.next_key = Some(map_key(key.serialize(ValueSerializer)?)?);
        Ok(())
    }

    fn serialize_value<T>(&mut self, value: &T) -> CacheResult<()>
    where
        T: ?Sized + Serialize,
    {
        let key = self
            .next_key
            .take()
            .ok_or_else(|| CacheError::codec("map value serialized before its key"))?;
        self.map.insert(key, value.serialize(ValueSerializer)?);
        Ok(())
    }

    fn end(self) -> CacheResult<CacheValue> {
        Ok(CacheValue::Mapping(self.map))
    }
}

impl ser::SerializeStruct for SerializeMapping {
    type Ok = CacheValue;
    type Error = CacheError;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> CacheResult<()>
    where
        T: ?Sized + Serialize,
    {
        self.map.insert(key.to_owned(), value.serialize(ValueSerializer)?);
        Ok(())
    }

    fn end(self) -> CacheResult<CacheValue> {
        Ok(CacheValue::Mapping(self.map))
    }
}

pub(crate) struct SerializeStructVariant {
    variant: &'static str,
    map: BTreeMap<String, CacheValue>,
}

impl ser::SerializeStructVariant for SerializeStructVariant {
    type Ok = CacheValue;
    type Error = CacheError;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> CacheResult<()>
    where
        T: ?Sized + Serialize,
    {
        self.map.insert(key.to_owned(), value.serialize(ValueSerializer)?);
        Ok(())
    }

    fn end(self) -> CacheResult<CacheValue> {
        let mut outer = BTreeMap::new();
        outer.insert(self.variant.to_owned(), CacheValue::Mapping(self.map));
        Ok(CacheValue::Mapping(outer))
    }
}

/// Mapping keys are strings on the wire; scalar keys are stringified.
fn map_key(key: CacheValue) -> CacheResult<String> {
    match key {
        CacheValue::String(s) => Ok(s),
        CacheValue::Number(n) => Ok(n.to_string()),
        CacheValue::Bool(b) => Ok(b.to_string()),
        CacheValue::Timestamp(at) => Ok(timestamp::format(&at)),
        other => Err(CacheError::codec(format!(
            "map key must be a string, got {other:?}"
        ))),
    }
}
