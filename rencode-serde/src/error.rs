use std::fmt::{self, Display};
use std::str::Utf8Error;
use serde::{de, ser};
use rencode::{DecodeError, EncodeError};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub struct DeserializationError {
    inner: Error,
    at: usize,
}

impl DeserializationError {
    pub fn into_inner(self) -> Error {
        self.inner
    }

    /// The input position at which deserialization failed
    pub fn position(&self) -> usize {
        self.at
    }
}

impl std::error::Error for DeserializationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.inner)
    }
}

impl Display for DeserializationError {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(fmt, "{} at input position {}", self.inner, self.at)
    }
}

#[derive(Debug)]
pub enum Error {
    // Decode
    Decode(DecodeError),
    Trailing,
    UnexpectedTag(&'static [&'static str], &'static str),
    Int,
    Utf8(Utf8Error),
    // Encode
    Encode(EncodeError),
    Length,
    Count { expected: usize, found: usize },
    // Both
    Message(String),
}

impl Error {
    pub fn at(self, at: usize) -> DeserializationError {
        DeserializationError { inner: self, at }
    }
}

impl ser::Error for Error {
    fn custom<T: Display>(msg: T) -> Self {
        Error::Message(msg.to_string())
    }
}

impl de::Error for Error {
    fn custom<T: Display>(msg: T) -> Self {
        Error::Message(msg.to_string())
    }
}

impl Display for Error {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Message(msg) => fmt.write_str(msg),
            Error::Encode(e) => write!(fmt, "Encoding error: {}", e),
            Error::Decode(e) => write!(fmt, "Decoding error: {}", e),
            Error::Length => fmt.write_str("Length required"),
            Error::Count { expected, found } => write!(fmt, "Announced {} entries but got {}", expected, found),
            Error::Trailing => fmt.write_str("Trailing characters in input"),
            Error::UnexpectedTag(expected, actual) => write!(fmt, "Unexpected tag: expected one of ({}), found {}", expected.join(", "), actual),
            Error::Utf8(e) => write!(fmt, "Bytes aren't valid Utf-8: {}", e),
            Error::Int => fmt.write_str("Integer didn't fit into target type"),
        }
    }
}

impl From<EncodeError> for Error {
    fn from(e: EncodeError) -> Error {
        Error::Encode(e)
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Error {
        Error::Encode(EncodeError::Io(e))
    }
}

impl From<DecodeError> for Error {
    fn from(e: DecodeError) -> Error {
        Error::Decode(e)
    }
}

impl From<std::num::TryFromIntError> for Error {
    fn from(_e: std::num::TryFromIntError) -> Error {
        Error::Int
    }
}

impl From<std::num::ParseIntError> for Error {
    fn from(_e: std::num::ParseIntError) -> Error {
        Error::Int
    }
}

impl From<Utf8Error> for Error {
    fn from(e: Utf8Error) -> Error {
        Error::Utf8(e)
    }
}

impl std::error::Error for Error {}
