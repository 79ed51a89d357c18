//! The atom of `rencode` is the `Value`.
//! Values are encoded on wire as a tag and, if necessary, additional bytes which directly follow the tag. The wire
//! format knows a single string type: both `Value::Bytes` and `Value::Str` are written as byte strings and a decoder
//! only hands out `Value::Str` when asked to interpret strings as Utf-8.

use crate::tag::{FloatBits, Tag, CHR_TERM};
use crate::error::{DecodeError, DecoderError, EncodeError, Malformed};
use num_bigint::BigInt;
use num_traits::ToPrimitive;
use std::io::Write;
use std::str::from_utf8;
use std::borrow::Cow;

/// The possible values according to the `rencode` data model.
#[derive(Debug, Clone, PartialEq)]
pub enum Value<'a> {
    Null,
    Bool(bool),
    Int(BigInt),
    F32(f32),
    F64(f64),
    Bytes(Cow<'a, [u8]>),
    Str(Cow<'a, str>),
    List(Vec<Value<'a>>),
    Dict(Vec<(Value<'a>, Value<'a>)>),
}

impl<'a> Value<'a> {

    const PROTECTED_CHARS: [(char, &'static str); 3] = [('\\', "\\\\"), ('"', "\\\""), ('\n', "\\n")];

    /// A float from a source which doesn't know about widths, stored with the requested width
    pub fn float(value: f64, bits: FloatBits) -> Value<'static> {
        match bits {
            FloatBits::F32 => Value::F32(value as f32),
            FloatBits::F64 => Value::F64(value),
        }
    }

    pub fn typename(&self) -> &'static str {
        match *self {
            Self::Null      => "null",
            Self::Bool(_)   => "bool",
            Self::Int(_)    => "integer",
            Self::F32(_)    => "f32",
            Self::F64(_)    => "f64",
            Self::Bytes(_)  => "bytes",
            Self::Str(_)    => "string",
            Self::List(_)   => "list",
            Self::Dict(_)   => "dict",
        }
    }

    /// Detach the value from the buffer it was decoded from
    pub fn into_owned(self) -> Value<'static> {
        match self {
            Value::Null      => Value::Null,
            Value::Bool(v)   => Value::Bool(v),
            Value::Int(v)    => Value::Int(v),
            Value::F32(v)    => Value::F32(v),
            Value::F64(v)    => Value::F64(v),
            Value::Bytes(v)  => Value::Bytes(Cow::Owned(v.into_owned())),
            Value::Str(v)    => Value::Str(Cow::Owned(v.into_owned())),
            Value::List(v)   => Value::List(v.into_iter().map(Value::into_owned).collect()),
            Value::Dict(v)   => Value::Dict(v.into_iter().map(|(k, v)| (k.into_owned(), v.into_owned())).collect()),
        }
    }

    fn escape(input: &str) -> String {
        Self::PROTECTED_CHARS.iter().fold(input.to_string(), |s, (c, r)| s.replace(*c, r))
    }

    fn indent<I: Iterator<Item = String>>(entries: I) -> String {
        entries.flat_map(|entry| entry.lines().map(|line| format!("  {}", line)).collect::<Vec<String>>())
            .collect::<Vec<String>>().join("\n")
    }

}

impl<'a> std::fmt::Display for Value<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null         => f.write_str("null"),
            Value::Bool(true)   => f.write_str("true"),
            Value::Bool(false)  => f.write_str("false"),
            Value::Int(v)       => write!(f, "{}", v),
            Value::F32(v)       => write!(f, "${}", v),
            Value::F64(v)       => write!(f, "$${}", v),
            Value::Bytes(v)     => write!(f, "'{}'", base64::encode(v)),
            Value::Str(v)       => write!(f, "\"{}\"", Self::escape(v)),
            Value::List(v) if v.is_empty() => f.write_str("[]"),
            Value::Dict(v) if v.is_empty() => f.write_str("{}"),
            Value::List(v)      => write!(f, "[\n{}\n]", Self::indent(v.iter().map(|f| format!("{},", f)))),
            Value::Dict(v)      => write!(f, "{{\n{}\n}}", Self::indent(v.iter().map(|(k, f)| format!("{}: {},", k, f)))),
        }
    }
}

macro_rules! from_int {
    ($($t:ty),*) => {
        $(impl<'a> From<$t> for Value<'a> {
            fn from(v: $t) -> Self {
                Value::Int(BigInt::from(v))
            }
        })*
    };
}

from_int!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, BigInt);

impl<'a> From<bool> for Value<'a> {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl<'a> From<f32> for Value<'a> {
    fn from(v: f32) -> Self {
        Value::F32(v)
    }
}

impl<'a> From<f64> for Value<'a> {
    fn from(v: f64) -> Self {
        Value::F64(v)
    }
}

impl<'a> From<&'a [u8]> for Value<'a> {
    fn from(v: &'a [u8]) -> Self {
        Value::Bytes(Cow::Borrowed(v))
    }
}

impl<'a> From<Vec<u8>> for Value<'a> {
    fn from(v: Vec<u8>) -> Self {
        Value::Bytes(Cow::Owned(v))
    }
}

impl<'a> From<&'a str> for Value<'a> {
    fn from(v: &'a str) -> Self {
        Value::Str(Cow::Borrowed(v))
    }
}

impl<'a> From<String> for Value<'a> {
    fn from(v: String) -> Self {
        Value::Str(Cow::Owned(v))
    }
}

impl<'a> From<Vec<Value<'a>>> for Value<'a> {
    fn from(v: Vec<Value<'a>>) -> Self {
        Value::List(v)
    }
}

impl<'a> From<Vec<(Value<'a>, Value<'a>)>> for Value<'a> {
    fn from(v: Vec<(Value<'a>, Value<'a>)>) -> Self {
        Value::Dict(v)
    }
}

/// Configures an [`Encoder`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EncodeOptions {
    /// When set, every float of the encoded value must have this width
    pub float_bits: Option<FloatBits>,
}

/// Configures a [`Decoder`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecodeOptions {
    /// Return byte strings as `Value::Str` after validating them as Utf-8
    pub decode_utf8: bool,
    /// The number of lists and dicts which may enclose each other
    pub max_depth: usize,
}

impl DecodeOptions {
    pub const DEFAULT_MAX_DEPTH: usize = 512;
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self { decode_utf8: false, max_depth: Self::DEFAULT_MAX_DEPTH }
    }
}

/// Used to encode `rencode` values. Every value has exactly one encoding: integers and container lengths always use
/// the smallest form available.
pub struct Encoder<'w, W: Write> {
    writer: &'w mut W,
    float_bits: Option<FloatBits>,
}

impl<'w, W: Write> Encoder<'w, W> {

    /// Encode a value to the given writer. The resulting `usize` is the amount of bytes that got written.
    pub fn encode(value: &Value, writer: &'w mut W) -> Result<usize, EncodeError> {
        Self::encode_with(value, writer, &EncodeOptions::default())
    }

    pub fn encode_with(value: &Value, writer: &'w mut W, options: &EncodeOptions) -> Result<usize, EncodeError> {
        Self { writer, float_bits: options.float_bits }.encode_inner(value)
    }

    fn encode_inner(&mut self, value: &Value) -> Result<usize, EncodeError> {
        let mut c = 0;
        match value {
            Value::Null        => Tag::Null.encode(self.writer),
            Value::Bool(true)  => Tag::True.encode(self.writer),
            Value::Bool(false) => Tag::False.encode(self.writer),
            Value::Int(v)      => match v.to_i64() {
                Some(i) => Tag::Int(i).encode(self.writer),
                None    => Tag::Big(&v.to_string()).encode(self.writer),
            },
            Value::F32(v)      => {
                self.check_width(FloatBits::F32)?;
                Tag::F32(*v).encode(self.writer)
            },
            Value::F64(v)      => {
                self.check_width(FloatBits::F64)?;
                Tag::F64(*v).encode(self.writer)
            },
            Value::Bytes(v)    => self.encode_bytes(v),
            Value::Str(v)      => self.encode_bytes(v.as_bytes()),
            Value::List(inner) => {
                let tag = Tag::list(inner.len());
                c += tag.encode(self.writer)?;
                for element in inner.iter() {
                    c += self.encode_inner(element)?;
                }
                if tag.is_open() {
                    c += Tag::End.encode(self.writer)?;
                }
                Ok(c)
            },
            Value::Dict(inner) => {
                let tag = Tag::dict(inner.len());
                c += tag.encode(self.writer)?;
                for (key, val) in inner.iter() {
                    c += self.encode_inner(key)?;
                    c += self.encode_inner(val)?;
                }
                if tag.is_open() {
                    c += Tag::End.encode(self.writer)?;
                }
                Ok(c)
            },
        }
    }

    fn encode_bytes(&mut self, v: &[u8]) -> Result<usize, EncodeError> {
        let c = Tag::Bytes(v.len()).encode(self.writer)?;
        self.writer.write_all(v)?;
        Ok(c + v.len())
    }

    fn check_width(&self, found: FloatBits) -> Result<(), EncodeError> {
        match self.float_bits {
            Some(expected) if expected != found => Err(EncodeError::FloatWidth { expected, found }),
            _ => Ok(()),
        }
    }

}

/// Used to decode `rencode` values. Every length and terminator is checked against the buffer before it is trusted.
pub struct Decoder<'a> {
    buf: &'a [u8],
    pos: usize,
    depth: usize,
    options: DecodeOptions,
}

impl<'a> Decoder<'a> {

    /// Decode a single value from the given buffer and return it together with the number of consumed bytes. Byte
    /// strings will be borrowed from the buffer instead of copied. This means that the decoded value may only live as
    /// long as the buffer does. However, some allocations still occur: containers and big integers need their own
    /// heap space.
    pub fn decode<B: ?Sized + AsRef<[u8]>>(buf: &'a B, options: &DecodeOptions) -> Result<(Value<'a>, usize), DecoderError> {
        let mut decoder = Self { buf: buf.as_ref(), pos: 0, depth: 0, options: *options };
        let value = decoder.decode_value().map_err(|e| e.at(decoder.pos))?;
        Ok((value, decoder.pos))
    }

    /// Like `decode` but the value must span the whole buffer.
    pub fn decode_all<B: ?Sized + AsRef<[u8]>>(buf: &'a B, options: &DecodeOptions) -> Result<Value<'a>, DecoderError> {
        let buf = buf.as_ref();
        let (value, c) = Self::decode(buf, options)?;
        match buf.len() - c {
            0 => Ok(value),
            trailing => Err(DecodeError::from(Malformed::Trailing(trailing)).at(c)),
        }
    }

    /// Best effort decoding: any input which can not be decoded yields `Value::Null`. This does not conform to the
    /// format and must not be used where independent implementations are expected to agree.
    pub fn decode_lossy<B: ?Sized + AsRef<[u8]>>(buf: &'a B, options: &DecodeOptions) -> Value<'a> {
        Self::decode_all(buf, options).unwrap_or(Value::Null)
    }

    fn decode_value(&mut self) -> Result<Value<'a>, DecodeError> {
        let tag = self.decode_tag()?;
        self.decode_value_inner(tag)
    }

    fn decode_value_inner(&mut self, tag: Tag<'a>) -> Result<Value<'a>, DecodeError> {
        match tag {
            Tag::Null        => Ok(Value::Null),
            Tag::True        => Ok(Value::Bool(true)),
            Tag::False       => Ok(Value::Bool(false)),
            Tag::Int(v)      => Ok(Value::Int(BigInt::from(v))),
            Tag::Big(v)      => Ok(Value::Int(BigInt::parse_bytes(v.as_bytes(), 10).ok_or(Malformed::EmptyInteger)?)),
            Tag::F32(v)      => Ok(Value::F32(v)),
            Tag::F64(v)      => Ok(Value::F64(v)),
            Tag::Bytes(v) if self.options.decode_utf8 => Ok(Value::Str(Cow::Borrowed(from_utf8(self.decode_slice(v)?)?))),
            Tag::Bytes(v)    => Ok(Value::Bytes(Cow::Borrowed(self.decode_slice(v)?))),
            Tag::List(v)     => {
                self.descend()?;
                let mut elements = Vec::with_capacity(v);
                for _ in 0..v {
                    elements.push(self.decode_value()?);
                }
                self.depth -= 1;
                Ok(Value::List(elements))
            },
            Tag::ListStart   => {
                self.descend()?;
                let mut elements = Vec::new();
                loop {
                    match self.decode_tag()? {
                        Tag::End => break,
                        tag      => elements.push(self.decode_value_inner(tag)?),
                    }
                }
                self.depth -= 1;
                Ok(Value::List(elements))
            },
            Tag::Dict(v)     => {
                self.descend()?;
                let mut elements = Vec::with_capacity(v);
                for _ in 0..v {
                    let key = self.decode_value()?;
                    let val = self.decode_value()?;
                    elements.push((key, val));
                }
                self.depth -= 1;
                Ok(Value::Dict(elements))
            },
            Tag::DictStart   => {
                self.descend()?;
                let mut elements = Vec::new();
                loop {
                    let key = match self.decode_tag()? {
                        Tag::End => break,
                        tag      => self.decode_value_inner(tag)?,
                    };
                    let val = match self.decode_tag()? {
                        Tag::End => return Err(Malformed::Terminator.into()),
                        tag      => self.decode_value_inner(tag)?,
                    };
                    elements.push((key, val));
                }
                self.depth -= 1;
                Ok(Value::Dict(elements))
            },
            Tag::End         => Err(Malformed::Tag(CHR_TERM).into()),
        }
    }

    fn decode_tag(&mut self) -> Result<Tag<'a>, DecodeError> {
        let (tag, c) = Tag::decode(&self.buf[self.pos..])?;
        self.pos += c;
        Ok(tag)
    }

    fn decode_slice(&mut self, len: usize) -> Result<&'a [u8], DecodeError> {
        if self.buf[self.pos..].len() < len {
            Err(DecodeError::Truncated)
        } else {
            self.pos += len;
            Ok(&self.buf[self.pos - len .. self.pos])
        }
    }

    fn descend(&mut self) -> Result<(), DecodeError> {
        if self.depth == self.options.max_depth {
            Err(DecodeError::Depth(self.options.max_depth))
        } else {
            self.depth += 1;
            Ok(())
        }
    }

}


#[cfg(test)]
mod test {
    use super::{Value, Encoder, Decoder, DecodeOptions, EncodeOptions};
    use crate::error::{DecodeError, EncodeError, Malformed};
    use crate::tag::FloatBits;
    use num_bigint::BigInt;
    use std::borrow::Cow;

    #[test]
    fn simple_values() {
        let mut buf = Vec::new();
        assert_roundtrip(Value::Null, &mut buf);
        assert_roundtrip(Value::Bool(true), &mut buf);
        assert_roundtrip(Value::Bool(false), &mut buf);
        for i in (i64::MIN..i64::MAX).step_by(3_203_431_780_337) {
            assert_roundtrip(Value::from(i), &mut buf);
        }
        assert_roundtrip(Value::from(u64::MAX), &mut buf);
        assert_roundtrip(Value::from(i128::MIN), &mut buf);
    }

    #[test]
    fn big_integers() {
        let mut buf = Vec::new();
        let n: BigInt = "9".repeat(62).parse().unwrap();
        assert_roundtrip(Value::Int(n.clone()), &mut buf);
        assert_roundtrip(Value::Int(-n), &mut buf);
        let n: BigInt = "9".repeat(64).parse().unwrap();
        assert_roundtrip(Value::Int(-n), &mut buf);
        let too_big: BigInt = "9".repeat(65).parse().unwrap();
        assert!(matches!(Encoder::encode(&Value::Int(too_big), &mut buf), Err(EncodeError::Digits(65))));
    }

    #[test]
    fn first_big_integer() {
        let mut buf = Vec::new();
        let n = BigInt::from(i64::MAX) + 1;
        Encoder::encode(&Value::Int(n), &mut buf).unwrap();
        assert_eq!(buf, b"=9223372036854775808\x7f");
    }

    #[test]
    fn floats() {
        let mut buf = Vec::new();
        assert_roundtrip(Value::F64(f64::MAX), &mut buf);
        assert_roundtrip(Value::F64(f64::MIN), &mut buf);
        assert_roundtrip(Value::F64(std::f64::consts::PI), &mut buf);
        assert_roundtrip(Value::F32(f32::MAX), &mut buf);
        assert_roundtrip(Value::F32(f32::MIN), &mut buf);
        assert_roundtrip(Value::F32(std::f32::consts::PI), &mut buf);
    }

    #[test]
    fn float_width_option() {
        let mut buf = Vec::new();
        let strict = EncodeOptions { float_bits: Some(FloatBits::F64) };
        assert_eq!(9, Encoder::encode_with(&Value::F64(1.5), &mut buf, &strict).unwrap());
        let mixed = Value::List(vec![Value::F64(1.5), Value::F32(1.5)]);
        assert!(matches!(Encoder::encode_with(&mixed, &mut buf, &strict),
                Err(EncodeError::FloatWidth { expected: FloatBits::F64, found: FloatBits::F32 })));
        buf.clear();
        assert_eq!(1 + 9 + 5, Encoder::encode(&mixed, &mut buf).unwrap());
    }

    #[test]
    fn strings() {
        let mut buf = Vec::new();
        let text = "Üben von Xylophon und Querflöte ist ja zweckmäßig.";
        Encoder::encode(&Value::from(text), &mut buf).unwrap();
        let utf8 = DecodeOptions { decode_utf8: true, ..Default::default() };
        assert_eq!(Value::from(text), Decoder::decode(&buf, &utf8).unwrap().0);
        assert_eq!(Value::from(text.as_bytes()), Decoder::decode(&buf, &DecodeOptions::default()).unwrap().0);
    }

    #[test]
    fn bytes() {
        let mut buf = Vec::new();
        assert_roundtrip(Value::Bytes(Cow::Borrowed(&[1, 2, 3, 4, 255])), &mut buf);
        assert_roundtrip(Value::Bytes(Cow::Borrowed(&[0])), &mut buf);
        assert_roundtrip(Value::Bytes(Cow::Owned(vec![b'f'; 255])), &mut buf);
        assert_roundtrip(Value::Bytes(Cow::Owned(vec![0x7f; 70])), &mut buf);
    }

    #[test]
    fn invalid_utf8() {
        let mut buf = Vec::new();
        Encoder::encode(&Value::from(&b"\x56\xe4foo\xc3"[..]), &mut buf).unwrap();
        let utf8 = DecodeOptions { decode_utf8: true, ..Default::default() };
        assert!(matches!(Decoder::decode(&buf, &utf8).unwrap_err().into_inner(), DecodeError::Utf8(_)));
        assert!(Decoder::decode(&buf, &DecodeOptions::default()).is_ok());
    }

    #[test]
    fn list_mixed() {
        let mut buf = Vec::new();
        assert_roundtrip(Value::List(vec![
                Value::from(100),
                Value::F64(-234.01),
                Value::from(&b"foobar"[..]),
                Value::from("bäz".as_bytes()),
                Value::Null,
        ]), &mut buf);
    }

    #[test]
    fn list_long() {
        let mut buf = Vec::new();
        for i in 0..200 {
            assert_roundtrip(Value::List(vec![ Value::from(1); i ]), &mut buf);
        }
    }

    #[test]
    fn dict_long() {
        let mut buf = Vec::new();
        for i in 0..60usize {
            assert_roundtrip(Value::Dict((0..i).map(|k| (Value::from(k), Value::from(1234))).collect()), &mut buf);
        }
    }

    #[test]
    fn dict_keeps_order_and_duplicates() {
        let mut buf = Vec::new();
        let value = Value::Dict(vec![
                (Value::from(&b"second"[..]), Value::from(2)),
                (Value::from(&b"first"[..]),  Value::from(1)),
                (Value::from(&b"second"[..]), Value::from(3)),
                (Value::List(vec![Value::Null]), Value::Bool(true)),
        ]);
        assert_roundtrip(value, &mut buf);
    }

    #[test]
    fn nested() {
        let mut buf = Vec::new();
        let inner = Value::Dict((0u8..36).map(|k| (Value::from(vec![k]), Value::from(vec![b'f'; 120]))).collect());
        assert_roundtrip(Value::Dict(vec![
                (Value::from(&b"foo"[..]), inner.clone()),
                (Value::from(&b"bar"[..]), inner.clone()),
                (Value::from(&b"baz"[..]), Value::List(vec![inner; 70])),
        ]), &mut buf);
    }

    #[test]
    fn errors() {
        let options = DecodeOptions::default();
        let buf: [u8; 0] = [];
        assert_eq!(DecodeError::Truncated, Decoder::decode(&buf, &options).unwrap_err().into_inner());
        let buf = [45u8];
        assert_eq!(DecodeError::Malformed(Malformed::Tag(45)), Decoder::decode(&buf, &options).unwrap_err().into_inner());
        let buf = [127u8];
        assert_eq!(DecodeError::Malformed(Malformed::Tag(127)), Decoder::decode(&buf, &options).unwrap_err().into_inner());
        let buf = [60u8, 1, 127];
        assert_eq!(DecodeError::Malformed(Malformed::Terminator), Decoder::decode(&buf, &options).unwrap_err().into_inner());
        let buf = [59u8, 1, 2];
        assert_eq!(DecodeError::Truncated, Decoder::decode(&buf, &options).unwrap_err().into_inner());
        let buf = [194u8, 1];
        let err = Decoder::decode(&buf, &options).unwrap_err();
        assert_eq!(2, err.position());
        assert_eq!(DecodeError::Truncated, err.into_inner());
        let buf = [1u8, 2];
        assert_eq!(DecodeError::Malformed(Malformed::Trailing(1)), Decoder::decode_all(&buf, &options).unwrap_err().into_inner());
        assert_eq!((Value::from(1), 1), Decoder::decode(&buf, &options).unwrap());
    }

    #[test]
    fn depth_limit() {
        let mut buf = vec![193u8; 10];
        buf.push(69);
        let shallow = DecodeOptions { max_depth: 9, ..Default::default() };
        assert_eq!(DecodeError::Depth(9), Decoder::decode(&buf, &shallow).unwrap_err().into_inner());
        let deep = DecodeOptions { max_depth: 10, ..Default::default() };
        assert!(Decoder::decode(&buf, &deep).is_ok());
        let buf = vec![59u8; 100_000];
        assert_eq!(DecodeError::Depth(DecodeOptions::DEFAULT_MAX_DEPTH),
            Decoder::decode(&buf, &DecodeOptions::default()).unwrap_err().into_inner());
    }

    #[test]
    fn siblings_do_not_add_depth() {
        let value = Value::List(vec![Value::List(vec![Value::Null]); 5]);
        let mut buf = Vec::new();
        Encoder::encode(&value, &mut buf).unwrap();
        let options = DecodeOptions { max_depth: 2, ..Default::default() };
        assert_eq!(value, Decoder::decode(&buf, &options).unwrap().0);
    }

    #[test]
    fn lossy() {
        let options = DecodeOptions::default();
        assert_eq!(Value::Null, Decoder::decode_lossy(&[62u8], &options));
        assert_eq!(Value::Null, Decoder::decode_lossy(&[194u8], &options));
        assert_eq!(Value::from(10), Decoder::decode_lossy(&[10u8], &options));
    }

    #[test]
    fn too_big_lengths() {
        let mut buf = b"18446744073709551615:".to_vec();
        buf.extend_from_slice(&[0u8; 64]);
        assert_eq!(DecodeError::Truncated, Decoder::decode(&buf, &DecodeOptions::default()).unwrap_err().into_inner());
    }

    #[test]
    fn into_owned() {
        let buf = [0xc2u8, 0x83, b'f', b'o', b'o', 0x80];
        let owned = Decoder::decode(&buf[..], &DecodeOptions::default()).unwrap().0.into_owned();
        assert_eq!(Value::List(vec![Value::from(b"foo".to_vec()), Value::from(Vec::<u8>::new())]), owned);
    }

    #[test]
    fn display() {
        let value = Value::Dict(vec![
                (Value::from("key \"quoted\""), Value::List(vec![Value::from(-5), Value::F32(1.5), Value::F64(0.25)])),
                (Value::from(&b"\x00\xff"[..]), Value::List(Vec::new())),
        ]);
        assert_eq!("{\n  \"key \\\"quoted\\\"\": [\n    -5,\n    $1.5,\n    $$0.25,\n  ],\n  'AP8=': [],\n}", format!("{}", &value));
    }

    fn assert_roundtrip(val: Value, buf: &mut Vec<u8>) {
        buf.clear();
        let c = Encoder::encode(&val, buf).unwrap();
        assert_eq!(c, buf.len());
        assert_eq!((val, c), Decoder::decode(buf, &DecodeOptions::default()).unwrap());
    }

}
