//! All encoding functions take `&self` and a writer and return the amount of written bytes. All decoding functions take
//! a buffer and return `Self` and the number of consumed bytes.
//!
//! # A note on canonical encodings
//!
//! `rencode` values have exactly one encoding. Integers use the smallest form they fit into, strings, lists and
//! dicts use the form with the length embedded into the tag whenever possible. Independent implementations of the
//! format therefore produce identical bytes for identical values. Decoders accept non-canonical input, such as a
//! small integer in a 64 bit form, but the result re-encodes canonically.
//!
//! # A note on integers
//!
//! `Value::Int` holds a `BigInt`. Integers which don't fit into 64 bits are written as decimal digits, of which there
//! may be at most [`MAX_INT_LENGTH`] not counting the sign. Larger numbers raise `EncodeError::Digits` and
//! `DecodeError::Digits` respectively.
//!
//! # A note on Dicts
//!
//! The variant `Value::Dict` uses a `Vec` of key-value pairs because Rust's floating point types `f32` and `f64`
//! implement neither `Ord` nor `Hash` and thus a `Value` cannot be used as a key in any of the standard library maps.
//! This also means that the order of pairs survives a roundtrip and that duplicate keys are preserved.
//!
//! # Examples
//!
//! ```
//! use rencode::*;
//!
//! let value = Value::List(vec![Value::from(100), Value::Null, Value::from(&b"foobarbaz"[..])]);
//! let buf = encode(&value, 32).unwrap();
//! assert_eq!(buf, [
//!     0xc3, // List of length 3
//!     0x3e, // Int8
//!     0x64, // 100
//!     0x45, // Null
//!     0x89, // String of length 9
//!     0x66, 0x6f, 0x6f, 0x62, 0x61, 0x72, 0x62, 0x61, 0x7a, // 'foobarbaz'
//! ]);
//! assert_eq!(value, decode(&buf, false).unwrap());
//! ```

mod error;
mod tag;
mod value;

pub use value::*;
pub use error::*;
pub use tag::*;

/// The version of this implementation, for comparison with other implementations of the format
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Encode `value` into a new buffer. `float_bits` must be 32 or 64 and every float within `value` must have that
/// width.
pub fn encode(value: &Value, float_bits: u32) -> Result<Vec<u8>, EncodeError> {
    let options = EncodeOptions { float_bits: Some(FloatBits::try_from(float_bits)?) };
    let mut buf = Vec::new();
    Encoder::encode_with(value, &mut buf, &options)?;
    Ok(buf)
}

/// Decode a buffer which contains exactly one value. If `decode_utf8` is set, byte strings are returned as
/// `Value::Str` and must be valid Utf-8.
pub fn decode(buf: &[u8], decode_utf8: bool) -> Result<Value<'_>, DecoderError> {
    Decoder::decode_all(buf, &DecodeOptions { decode_utf8, ..Default::default() })
}
