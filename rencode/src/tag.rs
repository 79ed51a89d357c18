//! Every `rencode` item starts with a single tag byte. Small integers and the lengths of short strings, lists and
//! dictionaries are embedded directly into the tag; everything else is announced by a dedicated tag and followed by
//! its payload. Integers and floats have a fixed size payload in network byte order. Big integers are written as
//! ascii decimal digits and, like lists and dictionaries of unbounded length, closed by the terminator byte `127`.
//! Long strings have no tag at all: they start with their ascii decimal length followed by a colon.
//!
//! A [`Tag`] contains the tag byte together with its fixed size payload. Raw string bytes and the children of
//! containers follow the tag on wire and are not part of it.

use crate::error::{DecodeError, EncodeError, Malformed};
use std::io::Write;
use std::str::from_utf8;

/// Maximum number of decimal digits of a big integer, not counting the sign
pub const MAX_INT_LENGTH: usize = 64;

pub const CHR_FLOAT64: u8 = 44;
pub const CHR_LIST: u8 = 59;
pub const CHR_DICT: u8 = 60;
pub const CHR_INT: u8 = 61;
pub const CHR_INT1: u8 = 62;
pub const CHR_INT2: u8 = 63;
pub const CHR_INT4: u8 = 64;
pub const CHR_INT8: u8 = 65;
pub const CHR_FLOAT32: u8 = 66;
pub const CHR_TRUE: u8 = 67;
pub const CHR_FALSE: u8 = 68;
pub const CHR_NONE: u8 = 69;
pub const CHR_TERM: u8 = 127;
pub const CHR_COLON: u8 = b':';

// Positive integers with value embedded in the tag
pub const INT_POS_FIXED_START: u8 = 0;
pub const INT_POS_FIXED_COUNT: u8 = 44;
const INT_POS_FIXED_END: u8 = INT_POS_FIXED_START + INT_POS_FIXED_COUNT - 1;
// Negative integers with value embedded in the tag
pub const INT_NEG_FIXED_START: u8 = 70;
pub const INT_NEG_FIXED_COUNT: u8 = 32;
const INT_NEG_FIXED_END: u8 = INT_NEG_FIXED_START + INT_NEG_FIXED_COUNT - 1;
// Dictionaries with length embedded in the tag
pub const DICT_FIXED_START: u8 = 102;
pub const DICT_FIXED_COUNT: u8 = 25;
const DICT_FIXED_END: u8 = DICT_FIXED_START + DICT_FIXED_COUNT - 1;
// Strings with length embedded in the tag
pub const STR_FIXED_START: u8 = 128;
pub const STR_FIXED_COUNT: u8 = 64;
const STR_FIXED_END: u8 = STR_FIXED_START + STR_FIXED_COUNT - 1;
// Lists with length embedded in the tag
pub const LIST_FIXED_START: u8 = STR_FIXED_START + STR_FIXED_COUNT;
pub const LIST_FIXED_COUNT: u8 = 64;

/// The width of a float on wire.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub enum FloatBits {
    #[default]
    F32,
    F64,
}

impl FloatBits {
    pub fn bits(&self) -> u32 {
        match *self {
            FloatBits::F32 => 32,
            FloatBits::F64 => 64,
        }
    }
}

impl TryFrom<u32> for FloatBits {
    type Error = EncodeError;

    fn try_from(bits: u32) -> Result<Self, Self::Error> {
        match bits {
            32 => Ok(FloatBits::F32),
            64 => Ok(FloatBits::F64),
            x => Err(EncodeError::FloatBits(x)),
        }
    }
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Tag<'a> {
    /// Also known as None
    Null,
    /// The boolean value true
    True,
    /// The boolean value false
    False,
    /// Any integer which fits into 64 bits. Encoding picks the smallest fitting form.
    Int(i64),
    /// Decimal digits of an integer, optionally preceded by a minus sign
    Big(&'a str),
    /// An IEEE-754 32-bit floating point number
    F32(f32),
    /// An IEEE-754 64-bit floating point number
    F64(f64),
    /// The value describes the length of a following byte string
    Bytes(usize),
    /// The value describes the number of following list elements
    List(usize),
    /// A list whose elements are followed by `End`
    ListStart,
    /// The value describes the number of following key value pairs
    Dict(usize),
    /// A dictionary whose key value pairs are followed by `End`
    DictStart,
    /// Closes `ListStart`, `DictStart` and big integers
    End,
}

impl<'a> Tag<'a> {

    /// The canonical tag announcing a list of `len` elements
    pub fn list(len: usize) -> Tag<'static> {
        if len < LIST_FIXED_COUNT as usize { Tag::List(len) } else { Tag::ListStart }
    }

    /// The canonical tag announcing a dictionary of `len` pairs
    pub fn dict(len: usize) -> Tag<'static> {
        if len < DICT_FIXED_COUNT as usize { Tag::Dict(len) } else { Tag::DictStart }
    }

    /// Whether the children following this tag are closed by `End`
    pub fn is_open(&self) -> bool {
        matches!(self, Tag::ListStart | Tag::DictStart)
    }

    /// Returns the mnemonic of the tag. This is useful for error messages.
    pub fn name(&self) -> &'static str {
        match *self {
            Tag::Null      => "Null",
            Tag::True      => "True",
            Tag::False     => "False",
            Tag::Int(_)    => "Int",
            Tag::Big(_)    => "Big",
            Tag::F32(_)    => "F32",
            Tag::F64(_)    => "F64",
            Tag::Bytes(_)  => "Bytes",
            Tag::List(_)   => "List",
            Tag::ListStart => "ListStart",
            Tag::Dict(_)   => "Dict",
            Tag::DictStart => "DictStart",
            Tag::End       => "End",
        }
    }

    /// Returns the number of written bytes
    pub fn encode<W: Write>(&self, w: &mut W) -> Result<usize, EncodeError> {
        match *self {
            Tag::Null                => Self::write_byte(CHR_NONE, w),
            Tag::True                => Self::write_byte(CHR_TRUE, w),
            Tag::False               => Self::write_byte(CHR_FALSE, w),
            Tag::Int(i)              => Self::encode_int(i, w),
            Tag::Big(digits)         => {
                debug_assert!(digits.bytes().enumerate().all(|(i, b)| b.is_ascii_digit() || (i == 0 && b == b'-')));
                let len = digits.strip_prefix('-').unwrap_or(digits).len();
                if len > MAX_INT_LENGTH {
                    return Err(EncodeError::Digits(len));
                }
                w.write_all(&[CHR_INT])?;
                w.write_all(digits.as_bytes())?;
                w.write_all(&[CHR_TERM])?;
                Ok(digits.len() + 2)
            },
            Tag::F32(v)              => {
                w.write_all(&[CHR_FLOAT32])?;
                w.write_all(&v.to_be_bytes())?;
                Ok(5)
            },
            Tag::F64(v)              => {
                w.write_all(&[CHR_FLOAT64])?;
                w.write_all(&v.to_be_bytes())?;
                Ok(9)
            },
            Tag::Bytes(len) if len < STR_FIXED_COUNT as usize => Self::write_byte(STR_FIXED_START + len as u8, w),
            Tag::Bytes(len)          => {
                let prefix = len.to_string();
                w.write_all(prefix.as_bytes())?;
                w.write_all(&[CHR_COLON])?;
                Ok(prefix.len() + 1)
            },
            Tag::List(len) if len < LIST_FIXED_COUNT as usize => Self::write_byte(LIST_FIXED_START + len as u8, w),
            Tag::Dict(len) if len < DICT_FIXED_COUNT as usize => Self::write_byte(DICT_FIXED_START + len as u8, w),
            Tag::List(len)
                | Tag::Dict(len)     => Err(EncodeError::Length(len)),
            Tag::ListStart           => Self::write_byte(CHR_LIST, w),
            Tag::DictStart           => Self::write_byte(CHR_DICT, w),
            Tag::End                 => Self::write_byte(CHR_TERM, w),
        }
    }

    /// Returns the decoded tag and the number of consumed bytes
    pub fn decode<B: ?Sized + AsRef<[u8]>>(buf: &'a B) -> Result<(Self, usize), DecodeError> {
        let buf = buf.as_ref();
        let tag = *buf.first().ok_or(DecodeError::Truncated)?;
        match tag {
            INT_POS_FIXED_START..=INT_POS_FIXED_END => Ok((Tag::Int((tag - INT_POS_FIXED_START) as i64), 1)),
            CHR_FLOAT64  => Ok((Tag::F64(<f64>::from_be_bytes(Self::payload(buf)?)), 9)),
            CHR_LIST     => Ok((Tag::ListStart, 1)),
            CHR_DICT     => Ok((Tag::DictStart, 1)),
            CHR_INT      => Self::decode_big(buf),
            CHR_INT1     => Ok((Tag::Int(<i8>::from_be_bytes(Self::payload(buf)?) as i64), 2)),
            CHR_INT2     => Ok((Tag::Int(<i16>::from_be_bytes(Self::payload(buf)?) as i64), 3)),
            CHR_INT4     => Ok((Tag::Int(<i32>::from_be_bytes(Self::payload(buf)?) as i64), 5)),
            CHR_INT8     => Ok((Tag::Int(<i64>::from_be_bytes(Self::payload(buf)?)), 9)),
            CHR_FLOAT32  => Ok((Tag::F32(<f32>::from_be_bytes(Self::payload(buf)?)), 5)),
            CHR_TRUE     => Ok((Tag::True, 1)),
            CHR_FALSE    => Ok((Tag::False, 1)),
            CHR_NONE     => Ok((Tag::Null, 1)),
            INT_NEG_FIXED_START..=INT_NEG_FIXED_END => Ok((Tag::Int(-((tag - INT_NEG_FIXED_START) as i64) - 1), 1)),
            DICT_FIXED_START..=DICT_FIXED_END => Ok((Tag::Dict((tag - DICT_FIXED_START) as usize), 1)),
            CHR_TERM     => Ok((Tag::End, 1)),
            STR_FIXED_START..=STR_FIXED_END => Ok((Tag::Bytes((tag - STR_FIXED_START) as usize), 1)),
            LIST_FIXED_START..=255 => Ok((Tag::List((tag - LIST_FIXED_START) as usize), 1)),
            b'0'..=b'9'  => Self::decode_length(buf),
            x            => Err(Malformed::Tag(x).into()),
        }
    }

    #[inline]
    fn write_byte<W: Write>(byte: u8, w: &mut W) -> Result<usize, EncodeError> {
        w.write_all(&[byte])?;
        Ok(1)
    }

    #[inline]
    fn encode_int<W: Write>(i: i64, w: &mut W) -> Result<usize, EncodeError> {
        if (0..INT_POS_FIXED_COUNT as i64).contains(&i) {
            Self::write_byte(INT_POS_FIXED_START + i as u8, w)
        } else if (-(INT_NEG_FIXED_COUNT as i64)..0).contains(&i) {
            Self::write_byte(INT_NEG_FIXED_START + (-i - 1) as u8, w)
        } else if let Ok(v) = i8::try_from(i) {
            Self::write_tagged(CHR_INT1, &v.to_be_bytes(), w)
        } else if let Ok(v) = i16::try_from(i) {
            Self::write_tagged(CHR_INT2, &v.to_be_bytes(), w)
        } else if let Ok(v) = i32::try_from(i) {
            Self::write_tagged(CHR_INT4, &v.to_be_bytes(), w)
        } else {
            Self::write_tagged(CHR_INT8, &i.to_be_bytes(), w)
        }
    }

    #[inline]
    fn write_tagged<W: Write>(tag: u8, payload: &[u8], w: &mut W) -> Result<usize, EncodeError> {
        w.write_all(&[tag])?;
        w.write_all(payload)?;
        Ok(1 + payload.len())
    }

    /// The `N` bytes directly following the tag byte
    #[inline]
    fn payload<const N: usize>(buf: &[u8]) -> Result<[u8; N], DecodeError> {
        match buf.get(1..=N) {
            Some(bytes) => <[u8; N]>::try_from(bytes).map_err(|_| DecodeError::Truncated),
            None => Err(DecodeError::Truncated),
        }
    }

    fn decode_big(buf: &'a [u8]) -> Result<(Self, usize), DecodeError> {
        let body = &buf[1..];
        let mut digits = 0;
        for (i, &b) in body.iter().enumerate() {
            match b {
                CHR_TERM if digits == 0 => return Err(Malformed::EmptyInteger.into()),
                CHR_TERM => return Ok((Tag::Big(from_utf8(&body[..i])?), i + 2)),
                b'-' if i == 0 => {},
                b'0'..=b'9' => {
                    digits += 1;
                    if digits > MAX_INT_LENGTH {
                        return Err(DecodeError::Digits(digits));
                    }
                },
                x => return Err(Malformed::Digit(x).into()),
            }
        }
        Err(DecodeError::Truncated)
    }

    fn decode_length(buf: &'a [u8]) -> Result<(Self, usize), DecodeError> {
        let mut len: usize = 0;
        for (i, &b) in buf.iter().enumerate() {
            match b {
                CHR_COLON => return Ok((Tag::Bytes(len), i + 1)),
                b'0'..=b'9' => {
                    // no buffer could hold that many bytes
                    len = len.checked_mul(10)
                        .and_then(|l| l.checked_add((b - b'0') as usize))
                        .ok_or(DecodeError::Truncated)?;
                },
                x => return Err(Malformed::Digit(x).into()),
            }
        }
        Err(DecodeError::Truncated)
    }

}
