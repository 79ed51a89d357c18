//! Conveniently serialize and deserialize your Rust data structures into the `rencode` wire format.
//!
//! # Data model
//!
//! `rencode` knows a single string type, so `str`, `char` and byte slices all end up as byte strings on wire. Structs
//! become dictionaries keyed by their field names. Unit variants are written as their name while variants carrying
//! data become a dictionary with a single pair which maps the variant name to the payload. Integers of any width use
//! the smallest fitting form and fall back to decimal digits beyond 64 bits. When decoding, integers wider than `i128`
//! and `u64` are handed to self describing types such as `serde_json::Value` as their decimal digits.
//!
//! Floats of type `f64` are narrowed to 32 bits unless the serializer is configured otherwise with
//! [`to_bytes_with`] or [`Serializer::float_bits`]. Deserialization accepts either width.
//!
//! # Examples
//!
//! ```
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! pub enum Species {
//!     PrionailurusViverrinus,
//!     LynxLynx,
//!     FelisCatus,
//! }
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! pub struct Cat<'a> {
//!     name: &'a str,
//!     species: Species,
//! }
//!
//! let cat = Cat { name: "Wantan", species: Species::LynxLynx };
//!
//! let bytes = rencode_serde::to_bytes(&cat).unwrap();
//! assert_eq!(bytes, [
//!   0x68,                                                   // Dict of length 2
//!     0x84,                                                 // String of length 4
//!       0x6e, 0x61, 0x6d, 0x65,                             // 'name'
//!     0x86,                                                 // String of length 6
//!       0x57, 0x61, 0x6e, 0x74, 0x61, 0x6e,                 // 'Wantan'
//!     0x87,                                                 // String of length 7
//!       0x73, 0x70, 0x65, 0x63, 0x69, 0x65, 0x73,           // 'species'
//!     0x88,                                                 // String of length 8
//!       0x4c, 0x79, 0x6e, 0x78, 0x4c, 0x79, 0x6e, 0x78,     // 'LynxLynx'
//! ]);
//!
//! let deserialized = rencode_serde::from_bytes(&bytes).unwrap();
//! assert_eq!(cat, deserialized);
//! ```

mod de;
mod error;
mod ser;

pub use de::{from_bytes, Deserializer};
pub use error::{DeserializationError, Error, Result};
pub use ser::{to_bytes, to_bytes_with, to_writer, Compound, Serializer};
