//! Deserializer from [`CacheValue`] into typed values.

use super::CacheValue;
use crate::{CacheError, CacheResult};
use marquee_core::timestamp;
use serde::de::value::{MapDeserializer, SeqDeserializer, StringDeserializer};
use serde::de::{
    self, DeserializeSeed, EnumAccess, Error as _, IntoDeserializer, Unexpected, VariantAccess,
    Visitor,
};
use serde::forward_to_deserialize_any;
use std::collections::BTreeMap;

impl<'de> IntoDeserializer<'de, CacheError> for CacheValue {
    type Deserializer = Self;

    fn into_deserializer(self) -> Self {
        self
    }
}

impl<'de> de::Deserializer<'de> for CacheValue {
    type Error = CacheError;

    fn deserialize_any<V>(self, visitor: V) -> CacheResult<V::Value>
    where
        V: Visitor<'de>,
    {
        match self {
            Self::Null => visitor.visit_unit(),
            Self::Bool(b) => visitor.visit_bool(b),
            Self::Number(n) => {
                if let Some(u) = n.as_u64() {
                    visitor.visit_u64(u)
                } else if let Some(i) = n.as_i64() {
                    visitor.visit_i64(i)
                } else {
                    match n.as_f64() {
                        Some(f) => visitor.visit_f64(f),
                        None => Err(CacheError::codec(format!("unrepresentable number {n}"))),
                    }
                }
            }
            Self::String(s) => visitor.visit_string(s),
            // Outside of a marked field a timestamp reads as its ISO-8601 text.
            Self::Timestamp(at) => visitor.visit_string(timestamp::format(&at)),
            Self::Sequence(items) => visit_sequence(items, visitor),
            Self::Mapping(map) => visit_mapping(map, visitor),
        }
    }

    fn deserialize_option<V>(self, visitor: V) -> CacheResult<V::Value>
    where
        V: Visitor<'de>,
    {
        match self {
            Self::Null => visitor.visit_none(),
            other => visitor.visit_some(other),
        }
    }

    fn deserialize_newtype_struct<V>(self, name: &'static str, visitor: V) -> CacheResult<V::Value>
    where
        V: Visitor<'de>,
    {
        match self {
            Self::Timestamp(at) if name == timestamp::TOKEN => {
                visitor.visit_newtype_struct(Self::String(timestamp::format(&at)))
            }
            other => visitor.visit_newtype_struct(other),
        }
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> CacheResult<V::Value>
    where
        V: Visitor<'de>,
    {
        match self {
            Self::String(variant) => visitor.visit_enum(EnumDeserializer {
                variant,
                value: None,
            }),
            Self::Mapping(map) if map.len() == 1 => {
                let mut entries = map.into_iter();
                match entries.next() {
                    Some((variant, value)) => visitor.visit_enum(EnumDeserializer {
                        variant,
                        value: Some(value),
                    }),
                    None => Err(CacheError::invalid_length(0, &"a single-key map")),
                }
            }
            other => Err(CacheError::invalid_type(other.unexpected(), &"an enum")),
        }
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf unit unit_struct seq tuple tuple_struct map struct
        identifier ignored_any
    }
}

fn visit_sequence<'de, V>(items: Vec<CacheValue>, visitor: V) -> CacheResult<V::Value>
where
    V: Visitor<'de>,
{
    let mut deserializer = SeqDeserializer::new(items.into_iter());
    let value = visitor.visit_seq(&mut deserializer)?;
    deserializer.end()?;
    Ok(value)
}

fn visit_mapping<'de, V>(map: BTreeMap<String, CacheValue>, visitor: V) -> CacheResult<V::Value>
where
    V: Visitor<'de>,
{
    let mut deserializer = MapDeserializer::new(map.into_iter());
    let value = visitor.visit_map(&mut deserializer)?;
    deserializer.end()?;
    Ok(value)
}

struct EnumDeserializer {
    variant: String,
    value: Option<CacheValue>,
}

impl<'de> EnumAccess<'de> for EnumDeserializer {
    type Error = CacheError;
    type Variant = VariantDeserializer;

    fn variant_seed<V>(self, seed: V) -> CacheResult<(V::Value, VariantDeserializer)>
    where
        V: DeserializeSeed<'de>,
    {
        let name: StringDeserializer<CacheError> = self.variant.into_deserializer();
        let variant = seed.deserialize(name)?;
        Ok((variant, VariantDeserializer { value: self.value }))
    }
}

struct VariantDeserializer {
    value: Option<CacheValue>,
}

impl<'de> VariantAccess<'de> for VariantDeserializer {
    type Error = CacheError;

    fn unit_variant(self) -> CacheResult<()> {
        match self.value {
            None | Some(CacheValue::Null) => Ok(()),
            Some(other) => Err(CacheError::invalid_type(other.unexpected(), &"unit variant")),
        }
    }

    fn newtype_variant_seed<T>(self, seed: T) -> CacheResult<T::Value>
    where
        T: DeserializeSeed<'de>,
    {
        match self.value {
            Some(value) => seed.deserialize(value),
            None => Err(CacheError::invalid_type(
                Unexpected::UnitVariant,
                &"newtype variant",
            )),
        }
    }

    fn tuple_variant<V>(self, _len: usize, visitor: V) -> CacheResult<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.value {
            Some(CacheValue::Sequence(items)) => visit_sequence(items, visitor),
            Some(other) => Err(CacheError::invalid_type(other.unexpected(), &"tuple variant")),
            None => Err(CacheError::invalid_type(
                Unexpected::UnitVariant,
                &"tuple variant",
            )),
        }
    }

    fn struct_variant<V>(
        self,
        _fields: &'static [&'static str],
        visitor: V,
    ) -> CacheResult<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.value {
            Some(CacheValue::Mapping(map)) => visit_mapping(map, visitor),
            Some(other) => Err(CacheError::invalid_type(other.unexpected(), &"struct variant")),
            None => Err(CacheError::invalid_type(
                Unexpected::UnitVariant,
                &"struct variant",
            )),
        }
    }
}
