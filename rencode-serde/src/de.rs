use serde::Deserialize;
use serde::de::{self, DeserializeSeed, EnumAccess, IntoDeserializer, MapAccess, SeqAccess, VariantAccess, Visitor};
use serde::de::value::BorrowedStrDeserializer;
use rencode::{DecodeError, DecodeOptions, Malformed, Tag};
use std::str::from_utf8;

use crate::error::{DeserializationError, Error, Result};

/// Like a Tag but with the payload of byte strings attached.
/// Containers only carry their length; `None` means the children are followed by `End`.
enum Atom<'de> {
    Null,
    Bool(bool),
    Int(i64),
    Big(&'de str),
    F32(f32),
    F64(f64),
    Bytes(&'de [u8]),
    List(Option<usize>),
    Dict(Option<usize>),
    End,
}

impl<'de> Atom<'de> {
    fn name(&self) -> &'static str {
        match *self {
            Atom::Null => "Null",
            Atom::Bool(_) => "Bool",
            Atom::Int(_) => "Int",
            Atom::Big(_) => "Big",
            Atom::F32(_) => "F32",
            Atom::F64(_) => "F64",
            Atom::Bytes(_) => "Bytes",
            Atom::List(_) => "List",
            Atom::Dict(_) => "Dict",
            Atom::End => "End",
        }
    }
}

pub struct Deserializer<'de> {
    input: &'de [u8],
    pos: usize,
    depth: usize,
    options: DecodeOptions,
}

impl<'de> Deserializer<'de> {

    pub fn from_bytes(input: &'de [u8]) -> Self {
        Self::with_options(input, &DecodeOptions::default())
    }

    pub fn with_options(input: &'de [u8], options: &DecodeOptions) -> Self {
        Deserializer { input, pos: 0, depth: 0, options: *options }
    }

    /// Hand byte strings to `deserialize_any` as text, which must then be valid Utf-8. Types which ask for a string
    /// explicitly always get one.
    pub fn decode_utf8(mut self, decode_utf8: bool) -> Self {
        self.options.decode_utf8 = decode_utf8;
        self
    }

    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.options.max_depth = max_depth;
        self
    }

    /// Deserialize a value which must span the whole input.
    pub fn parse<T: Deserialize<'de>>(mut self) -> std::result::Result<T, DeserializationError> {
        let t = T::deserialize(&mut self).map_err(|e| e.at(self.pos))?;
        if self.input[self.pos..].is_empty() {
            Ok(t)
        } else {
            Err(Error::Trailing.at(self.pos))
        }
    }

}

pub fn from_bytes<'a, T: Deserialize<'a>>(s: &'a [u8]) -> std::result::Result<T, DeserializationError> {
    Deserializer::from_bytes(s).parse()
}

impl<'de> Deserializer<'de> {

    fn decode_atom(&mut self) -> Result<Atom<'de>> {
        let (tag, c) = Tag::decode(&self.input[self.pos..])?;
        self.pos += c;
        Ok(match tag {
            Tag::Null => Atom::Null,
            Tag::True => Atom::Bool(true),
            Tag::False => Atom::Bool(false),
            Tag::Int(v) => Atom::Int(v),
            Tag::Big(v) => Atom::Big(v),
            Tag::F32(v) => Atom::F32(v),
            Tag::F64(v) => Atom::F64(v),
            Tag::Bytes(v) => Atom::Bytes(self.decode_slice(v)?),
            Tag::List(v) => Atom::List(Some(v)),
            Tag::ListStart => Atom::List(None),
            Tag::Dict(v) => Atom::Dict(Some(v)),
            Tag::DictStart => Atom::Dict(None),
            Tag::End => Atom::End,
        })
    }

    fn peek_tag(&self) -> Result<Tag<'de>> {
        Ok(Tag::decode(&self.input[self.pos..])?.0)
    }

    /// Consumes the terminator if it comes next
    fn at_end(&mut self) -> Result<bool> {
        if let Tag::End = self.peek_tag()? {
            self.pos += 1;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    #[inline]
    fn decode_slice(&mut self, len: usize) -> Result<&'de [u8]> {
        if self.input[self.pos..].len() < len {
            Err(Error::Decode(DecodeError::Truncated))
        } else {
            self.pos += len;
            Ok(&self.input[self.pos - len..self.pos])
        }
    }

    fn decode_int(&mut self) -> Result<i128> {
        match self.decode_atom()? {
            Atom::Int(i) => Ok(i128::from(i)),
            Atom::Big(digits) => Ok(digits.parse()?),
            o => Err(Error::UnexpectedTag(&["Int", "Big"], o.name())),
        }
    }

    fn decode_float(&mut self) -> Result<f64> {
        match self.decode_atom()? {
            Atom::F32(v) => Ok(f64::from(v)),
            Atom::F64(v) => Ok(v),
            o => Err(Error::UnexpectedTag(&["F32", "F64"], o.name())),
        }
    }

    fn decode_str(&mut self) -> Result<&'de str> {
        match self.decode_atom()? {
            Atom::Bytes(v) => Ok(from_utf8(v)?),
            o => Err(Error::UnexpectedTag(&["Bytes"], o.name())),
        }
    }

    fn descend(&mut self) -> Result<()> {
        if self.depth == self.options.max_depth {
            Err(Error::Decode(DecodeError::Depth(self.options.max_depth)))
        } else {
            self.depth += 1;
            Ok(())
        }
    }

    fn visit_list<V: Visitor<'de>>(&mut self, len: Option<usize>, visitor: V) -> Result<V::Value> {
        self.descend()?;
        let mut seq = SeqDeserializer::new(self, len);
        let value = visitor.visit_seq(&mut seq)?;
        seq.end()?;
        self.depth -= 1;
        Ok(value)
    }

    fn visit_dict<V: Visitor<'de>>(&mut self, len: Option<usize>, visitor: V) -> Result<V::Value> {
        self.descend()?;
        let mut map = MapDeserializer::new(self, len);
        let value = visitor.visit_map(&mut map)?;
        map.end()?;
        self.depth -= 1;
        Ok(value)
    }

}

impl<'de, 'a> de::Deserializer<'de> for &'a mut Deserializer<'de> {
    type Error = Error;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        match self.decode_atom()? {
            Atom::Null => visitor.visit_unit(),
            Atom::Bool(v) => visitor.visit_bool(v),
            Atom::Int(v) => visitor.visit_i64(v),
            Atom::Big(v) => match (v.parse::<u64>(), v.parse::<i128>()) {
                (Ok(u), _) => visitor.visit_u64(u),
                (_, Ok(i)) => visitor.visit_i128(i),
                // wider than any primitive, self describing consumers get the digits
                _ => visitor.visit_borrowed_str(v),
            },
            Atom::F32(v) => visitor.visit_f32(v),
            Atom::F64(v) => visitor.visit_f64(v),
            Atom::Bytes(v) if self.options.decode_utf8 => visitor.visit_borrowed_str(from_utf8(v)?),
            Atom::Bytes(v) => visitor.visit_borrowed_bytes(v),
            Atom::List(len) => self.visit_list(len, visitor),
            Atom::Dict(len) => self.visit_dict(len, visitor),
            Atom::End => Err(Error::Decode(Malformed::Tag(rencode::CHR_TERM).into())),
        }
    }

    fn deserialize_bool<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        match self.decode_atom()? {
            Atom::Bool(v) => visitor.visit_bool(v),
            o => Err(Error::UnexpectedTag(&["True", "False"], o.name())),
        }
    }

    fn deserialize_i8<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_i8(self.decode_int()?.try_into()?)
    }

    fn deserialize_i16<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_i16(self.decode_int()?.try_into()?)
    }

    fn deserialize_i32<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_i32(self.decode_int()?.try_into()?)
    }

    fn deserialize_i64<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_i64(self.decode_int()?.try_into()?)
    }

    fn deserialize_i128<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_i128(self.decode_int()?)
    }

    fn deserialize_u8<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_u8(self.decode_int()?.try_into()?)
    }

    fn deserialize_u16<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_u16(self.decode_int()?.try_into()?)
    }

    fn deserialize_u32<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_u32(self.decode_int()?.try_into()?)
    }

    fn deserialize_u64<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_u64(self.decode_int()?.try_into()?)
    }

    fn deserialize_u128<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        match self.decode_atom()? {
            Atom::Int(i) => visitor.visit_u128(i.try_into()?),
            Atom::Big(digits) => visitor.visit_u128(digits.parse()?),
            o => Err(Error::UnexpectedTag(&["Int", "Big"], o.name())),
        }
    }

    fn deserialize_f32<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_f32(self.decode_float()? as f32)
    }

    fn deserialize_f64<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_f64(self.decode_float()?)
    }

    fn deserialize_char<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        let v = self.decode_str()?;
        let mut chars = v.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => visitor.visit_char(c),
            _ => Err(de::Error::invalid_value(de::Unexpected::Str(v), &"a single character")),
        }
    }

    fn deserialize_str<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_borrowed_str(self.decode_str()?)
    }

    fn deserialize_string<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.deserialize_str(visitor)
    }

    fn deserialize_bytes<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        match self.decode_atom()? {
            Atom::Bytes(v) => visitor.visit_borrowed_bytes(v),
            o => Err(Error::UnexpectedTag(&["Bytes"], o.name())),
        }
    }

    fn deserialize_byte_buf<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        match self.decode_atom()? {
            Atom::Bytes(v) => visitor.visit_byte_buf(v.to_vec()),
            Atom::List(len) => self.visit_list(len, visitor),
            o => Err(Error::UnexpectedTag(&["Bytes", "List"], o.name())),
        }
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        match self.peek_tag()? {
            Tag::Null => {
                self.pos += 1;
                visitor.visit_none()
            },
            _ => visitor.visit_some(self),
        }
    }

    fn deserialize_unit<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        match self.decode_atom()? {
            Atom::Null => visitor.visit_unit(),
            o => Err(Error::UnexpectedTag(&["Null"], o.name())),
        }
    }

    fn deserialize_unit_struct<V: Visitor<'de>>(self, _name: &'static str, visitor: V) -> Result<V::Value> {
        self.deserialize_unit(visitor)
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(self, _name: &'static str, visitor: V) -> Result<V::Value> {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_seq<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        match self.decode_atom()? {
            Atom::List(len) => self.visit_list(len, visitor),
            o => Err(Error::UnexpectedTag(&["List", "ListStart"], o.name())),
        }
    }

    fn deserialize_tuple<V: Visitor<'de>>(self, _len: usize, visitor: V) -> Result<V::Value> {
        self.deserialize_seq(visitor)
    }

    fn deserialize_tuple_struct<V: Visitor<'de>>(self, _name: &'static str, _len: usize, visitor: V) -> Result<V::Value> {
        self.deserialize_seq(visitor)
    }

    fn deserialize_map<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        match self.decode_atom()? {
            Atom::Dict(len) => self.visit_dict(len, visitor),
            o => Err(Error::UnexpectedTag(&["Dict", "DictStart"], o.name())),
        }
    }

    fn deserialize_struct<V: Visitor<'de>>(self, _name: &'static str, _fields: &'static [&'static str], visitor: V) -> Result<V::Value> {
        self.deserialize_map(visitor)
    }

    fn deserialize_enum<V: Visitor<'de>>(self, _name: &'static str, _variants: &'static [&'static str],  visitor: V) -> Result<V::Value> {
        match self.decode_atom()? {
            Atom::Bytes(v) => visitor.visit_enum(from_utf8(v)?.into_deserializer()),
            Atom::Dict(Some(1)) => {
                self.descend()?;
                let value = visitor.visit_enum(EnumDeserializer::new(self))?;
                self.depth -= 1;
                Ok(value)
            },
            Atom::Dict(None) => {
                self.descend()?;
                let value = visitor.visit_enum(EnumDeserializer::new(self))?;
                if !self.at_end()? {
                    return Err(Error::Count { expected: 1, found: 2 });
                }
                self.depth -= 1;
                Ok(value)
            },
            o => Err(Error::UnexpectedTag(&["Bytes", "Dict"], o.name())),
        }
    }

    fn deserialize_identifier<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_borrowed_str(self.decode_str()?)
    }

    fn deserialize_ignored_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.deserialize_any(visitor)
    }

}

struct SeqDeserializer<'a, 'de: 'a> {
    de: &'a mut Deserializer<'de>,
    len: Option<usize>,
    consumed: usize,
}

impl<'a, 'de> SeqDeserializer<'a, 'de> {
    fn new(de: &'a mut Deserializer<'de>, len: Option<usize>) -> Self {
        Self { de, len, consumed: 0 }
    }

    /// Consumes the next entry unless the container is exhausted
    fn advance(&mut self) -> Result<bool> {
        match self.len {
            Some(len) if self.consumed == len => return Ok(false),
            None if self.de.at_end()? => {
                self.len = Some(self.consumed);
                return Ok(false);
            },
            _ => {},
        }
        self.consumed += 1;
        Ok(true)
    }

    /// Fails if the visitor left entries behind
    fn end(&mut self) -> Result<()> {
        match self.len {
            Some(len) if self.consumed == len => Ok(()),
            Some(len) => Err(Error::Count { expected: len, found: self.consumed }),
            None if self.de.at_end()? => Ok(()),
            None => Err(Error::UnexpectedTag(&["End"], self.de.peek_tag()?.name())),
        }
    }
}

impl<'de, 'a> SeqAccess<'de> for SeqDeserializer<'a, 'de> {
    type Error = Error;

    fn next_element_seed<T: DeserializeSeed<'de>>(&mut self, seed: T) -> Result<Option<T::Value>> {
        if self.advance()? {
            seed.deserialize(&mut *self.de).map(Some)
        } else {
            Ok(None)
        }
    }

    #[inline]
    fn size_hint(&self) -> Option<usize> {
        self.len.map(|len| len - self.consumed)
    }

}

/// Shares the bookkeeping of `SeqDeserializer`, counting keys.
struct MapDeserializer<'a, 'de: 'a>(SeqDeserializer<'a, 'de>);

impl<'a, 'de> MapDeserializer<'a, 'de> {
    fn new(de: &'a mut Deserializer<'de>, len: Option<usize>) -> Self {
        Self(SeqDeserializer::new(de, len))
    }

    fn end(&mut self) -> Result<()> {
        self.0.end()
    }
}

impl<'de, 'a> MapAccess<'de> for MapDeserializer<'a, 'de> {
    type Error = Error;

    fn next_key_seed<K: DeserializeSeed<'de>>(&mut self, seed: K) -> Result<Option<K::Value>> {
        if self.0.advance()? {
            seed.deserialize(&mut *self.0.de).map(Some)
        } else {
            Ok(None)
        }
    }

    fn next_value_seed<V: DeserializeSeed<'de>>(&mut self, seed: V) -> Result<V::Value> {
        if let Tag::End = self.0.de.peek_tag()? {
            return Err(Error::Decode(Malformed::Terminator.into()));
        }
        seed.deserialize(&mut *self.0.de)
    }

    #[inline]
    fn size_hint(&self) -> Option<usize> {
        self.0.size_hint()
    }
}

struct EnumDeserializer<'a, 'de: 'a> {
    de: &'a mut Deserializer<'de>,
}

impl<'a, 'de> EnumDeserializer<'a, 'de> {
    fn new(de: &'a mut Deserializer<'de>) -> Self {
        Self { de }
    }
}

impl<'de, 'a> EnumAccess<'de> for EnumDeserializer<'a, 'de> {
    type Error = Error;
    type Variant = Self;

    fn variant_seed<V: DeserializeSeed<'de>>(self, seed: V) -> Result<(V::Value, Self::Variant)> {
        let deserializer: BorrowedStrDeserializer<'de, Error> = BorrowedStrDeserializer::new(self.de.decode_str()?);
        let variant = seed.deserialize(deserializer)?;
        Ok((variant, self))
    }
}

impl<'de, 'a> VariantAccess<'de> for EnumDeserializer<'a, 'de> {
    type Error = Error;

    fn unit_variant(self) -> Result<()> {
        match self.de.decode_atom()? {
            Atom::Null => Ok(()),
            o => Err(Error::UnexpectedTag(&["Null"], o.name())),
        }
    }

    fn newtype_variant_seed<T: DeserializeSeed<'de>>(self, seed: T) -> Result<T::Value> {
        seed.deserialize(self.de)
    }

    fn tuple_variant<V: Visitor<'de>>(self, _len: usize, visitor: V) -> Result<V::Value> {
        de::Deserializer::deserialize_seq(self.de, visitor)
    }

    fn struct_variant<V: Visitor<'de>>(self, fields: &'static [&'static str], visitor: V) -> Result<V::Value> {
        de::Deserializer::deserialize_struct(self.de, "", fields, visitor)
    }

}
