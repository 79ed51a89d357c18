use crate::tag::{FloatBits, MAX_INT_LENGTH};
use std::fmt::{Display, Formatter, self};

/// The broad class of a failure. Independent implementations of the format are expected to agree on these for every
/// input, even if their messages differ.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ErrorKind {
    /// A number does not fit the format or a configured limit was exceeded
    Overflow,
    /// The buffer ended before the current item did
    Truncated,
    /// The input violates the grammar
    Malformed,
    /// A byte string was requested as text but is not valid Utf-8
    Utf8,
    /// The writer failed
    Io,
}

#[derive(Debug, PartialEq)]
pub struct DecoderError {
    inner: DecodeError,
    at: usize,
}

impl DecoderError {
    pub fn into_inner(self) -> DecodeError {
        self.inner
    }

    /// The input position at which decoding failed
    pub fn position(&self) -> usize {
        self.at
    }

    pub fn kind(&self) -> ErrorKind {
        self.inner.kind()
    }
}

impl std::error::Error for DecoderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
       Some(&self.inner)
    }
}

impl Display for DecoderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{} at input position {}", self.inner, self.at)
    }
}

/// Ways in which the input can violate the grammar.
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Malformed {
    /// No item starts with this byte
    Tag(u8),
    /// A byte other than an ascii digit inside a number
    Digit(u8),
    /// A big integer without any digits
    EmptyInteger,
    /// The terminator appeared where a dictionary value was expected
    Terminator,
    /// Bytes left over after the top level item
    Trailing(usize),
}

impl Display for Malformed {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        match self {
            Malformed::Tag(b) => write!(f, "unknown tag {}", b),
            Malformed::Digit(b) => write!(f, "byte {} is not a decimal digit", b),
            Malformed::EmptyInteger => f.write_str("integer without digits"),
            Malformed::Terminator => f.write_str("terminator in place of a dictionary value"),
            Malformed::Trailing(n) => write!(f, "{} trailing bytes after the encoded value", n),
        }
    }
}

#[derive(Debug, PartialEq)]
pub enum DecodeError {
    Truncated,
    Malformed(Malformed),
    /// The big integer has more digits than the format allows
    Digits(usize),
    /// Containers are nested deeper than the configured limit
    Depth(usize),
    Utf8(std::str::Utf8Error),
}

impl DecodeError {
    pub fn at(self, at: usize) -> DecoderError {
        DecoderError { inner: self, at }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            DecodeError::Truncated => ErrorKind::Truncated,
            DecodeError::Malformed(_) => ErrorKind::Malformed,
            DecodeError::Digits(_) | DecodeError::Depth(_) => ErrorKind::Overflow,
            DecodeError::Utf8(_) => ErrorKind::Utf8,
        }
    }
}

impl From<std::str::Utf8Error> for DecodeError {
    fn from(e: std::str::Utf8Error) -> DecodeError {
        DecodeError::Utf8(e)
    }
}

impl From<Malformed> for DecodeError {
    fn from(e: Malformed) -> DecodeError {
        DecodeError::Malformed(e)
    }
}

impl std::error::Error for DecodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DecodeError::Utf8(e) => Some(e),
            _ => None,
        }
    }
}

impl Display for DecodeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        match self {
            DecodeError::Truncated => f.write_str("Unexpected end of buffer while decoding"),
            DecodeError::Malformed(e) => write!(f, "Malformed input: {}", e),
            DecodeError::Digits(n) => write!(f, "Integer of {} digits exceeds maximum {}", n, MAX_INT_LENGTH),
            DecodeError::Depth(max) => write!(f, "Nesting exceeds maximum depth {}", max),
            DecodeError::Utf8(e) => write!(f, "String slice was not valid Utf-8: {}", e),
        }
    }
}

#[derive(Debug)]
pub enum EncodeError {
    Io(std::io::Error),
    /// The big integer has more digits than the format allows
    Digits(usize),
    /// Only 32 and 64 bit floats exist on wire
    FloatBits(u32),
    /// A float of one width was given while the caller demanded the other one
    FloatWidth { expected: FloatBits, found: FloatBits },
    /// A fixed form tag was asked to carry a length it has no room for
    Length(usize),
}

impl EncodeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            EncodeError::Io(_) => ErrorKind::Io,
            EncodeError::Digits(_)
                | EncodeError::FloatBits(_)
                | EncodeError::FloatWidth { .. }
                | EncodeError::Length(_) => ErrorKind::Overflow,
        }
    }
}

impl From<std::io::Error> for EncodeError {
    fn from(e: std::io::Error) -> EncodeError {
        EncodeError::Io(e)
    }
}

impl std::error::Error for EncodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EncodeError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl Display for EncodeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        match self {
            EncodeError::Io(e) => write!(f, "IO error {}", e),
            EncodeError::Digits(n) => write!(f, "Integer of {} digits exceeds maximum {}", n, MAX_INT_LENGTH),
            EncodeError::FloatBits(bits) => write!(f, "Float bits ({}) is not 32 or 64", bits),
            EncodeError::FloatWidth { expected, found } =>
                write!(f, "Float of {} bits given but {} bits were requested", found.bits(), expected.bits()),
            EncodeError::Length(value) => write!(f, "Length {} does not fit into a fixed form tag", value),
        }
    }
}
