use serde::{ser, Serialize};
use rencode::{FloatBits, Tag};
use std::io::Write;

use crate::error::{Error, Result};

pub struct Serializer<W> {
    output: W,
    float_bits: FloatBits,
}

/// Serialize `value` with floats of type `f64` narrowed to 32 bits.
pub fn to_bytes<T: ?Sized + Serialize>(value: &T) -> Result<Vec<u8>> {
    to_bytes_with(value, FloatBits::default())
}

/// Serialize `value` writing floats of type `f64` with the given width.
pub fn to_bytes_with<T: ?Sized + Serialize>(value: &T, float_bits: FloatBits) -> Result<Vec<u8>> {
    let mut serializer = Serializer::new(Vec::new()).float_bits(float_bits);
    value.serialize(&mut serializer)?;
    Ok(serializer.into_inner())
}

pub fn to_writer<T: ?Sized + Serialize, W: Write>(writer: W, value: &T) -> Result<()> {
    let mut serializer = Serializer::new(writer);
    value.serialize(&mut serializer)?;
    Ok(())
}

impl<W: Write> Serializer<W> {

    pub fn new(output: W) -> Self {
        Self { output, float_bits: FloatBits::default() }
    }

    /// The width of serialized `f64` values. `f32` values always occupy 32 bits.
    pub fn float_bits(mut self, float_bits: FloatBits) -> Self {
        self.float_bits = float_bits;
        self
    }

    pub fn into_inner(self) -> W {
        self.output
    }

    fn tag(&mut self, tag: Tag) -> Result<()> {
        tag.encode(&mut self.output)?;
        Ok(())
    }

    fn big<T: ToString>(&mut self, v: T) -> Result<()> {
        self.tag(Tag::Big(&v.to_string()))
    }

    fn open(&mut self, tag: Tag<'static>, len: usize) -> Result<Compound<'_, W>> {
        self.tag(tag)?;
        Ok(Compound { ser: self, tag, len, count: 0 })
    }

    /// Opens the single pair dictionary which wraps every variant carrying data
    fn variant(&mut self, variant: &str) -> Result<()> {
        self.tag(Tag::Dict(1))?;
        self.bytes(variant.as_bytes())
    }

    fn bytes(&mut self, v: &[u8]) -> Result<()> {
        self.tag(Tag::Bytes(v.len()))?;
        self.output.write_all(v)?;
        Ok(())
    }

}

/// Tracks a container whose length has been announced on wire
pub struct Compound<'a, W> {
    ser: &'a mut Serializer<W>,
    tag: Tag<'static>,
    len: usize,
    count: usize,
}

impl<'a, W: Write> Compound<'a, W> {

    fn element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        self.count += 1;
        value.serialize(&mut *self.ser)
    }

    /// The announced length chose the form on wire, so it has to hold for general forms as well
    fn finish(self) -> Result<()> {
        if self.count != self.len {
            Err(Error::Count { expected: self.len, found: self.count })
        } else if self.tag.is_open() {
            self.ser.tag(Tag::End)
        } else {
            Ok(())
        }
    }

}

impl<'a, W: Write> ser::Serializer for &'a mut Serializer<W> {

    type Ok = ();
    type Error = Error;
    type SerializeSeq = Compound<'a, W>;
    type SerializeTuple = Compound<'a, W>;
    type SerializeTupleStruct = Compound<'a, W>;
    type SerializeTupleVariant = Compound<'a, W>;
    type SerializeMap = Compound<'a, W>;
    type SerializeStruct = Compound<'a, W>;
    type SerializeStructVariant = Compound<'a, W>;

    fn serialize_bool(self, v: bool) -> Result<()> {
        self.tag(match v { true => Tag::True, false => Tag::False })
    }

    fn serialize_i8(self, v: i8) -> Result<()> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_i16(self, v: i16) -> Result<()> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_i32(self, v: i32) -> Result<()> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_i64(self, v: i64) -> Result<()> {
        self.tag(Tag::Int(v))
    }

    fn serialize_i128(self, v: i128) -> Result<()> {
        match i64::try_from(v) {
            Ok(v) => self.serialize_i64(v),
            Err(_) => self.big(v),
        }
    }

    fn serialize_u8(self, v: u8) -> Result<()> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_u16(self, v: u16) -> Result<()> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_u32(self, v: u32) -> Result<()> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_u64(self, v: u64) -> Result<()> {
        match i64::try_from(v) {
            Ok(v) => self.serialize_i64(v),
            Err(_) => self.big(v),
        }
    }

    fn serialize_u128(self, v: u128) -> Result<()> {
        match i64::try_from(v) {
            Ok(v) => self.serialize_i64(v),
            Err(_) => self.big(v),
        }
    }

    fn serialize_f32(self, v: f32) -> Result<()> {
        self.tag(Tag::F32(v))
    }

    fn serialize_f64(self, v: f64) -> Result<()> {
        match self.float_bits {
            FloatBits::F32 => self.tag(Tag::F32(v as f32)),
            FloatBits::F64 => self.tag(Tag::F64(v)),
        }
    }

    fn serialize_char(self, v: char) -> Result<()> {
        self.serialize_str(v.encode_utf8(&mut [0u8; 4]))
    }

    fn serialize_str(self, v: &str) -> Result<()> {
        self.bytes(v.as_bytes())
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<()> {
        self.bytes(v)
    }

    fn serialize_none(self) -> Result<()> {
        self.tag(Tag::Null)
    }

    fn serialize_some<T: ?Sized + Serialize>(self, value: &T) -> Result<()> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<()> {
        self.tag(Tag::Null)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<()> {
        self.serialize_unit()
    }

    fn serialize_unit_variant(self, _name: &'static str, _index: u32, variant: &'static str) -> Result<()> {
        self.bytes(variant.as_bytes())
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(self, _name: &'static str, value: &T) -> Result<()> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(self, _name: &'static str, _index: u32, variant: &'static str, value: &T) -> Result<()> {
        self.variant(variant)?;
        value.serialize(self)
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<Self::SerializeSeq> {
        match len {
            Some(len) => self.open(Tag::list(len), len),
            None => Err(Error::Length),
        }
    }

    fn serialize_tuple(self, len: usize) -> Result<Self::SerializeTuple> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_struct(self, _name: &'static str, len: usize) -> Result<Self::SerializeTupleStruct> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_variant(self, _name: &'static str, _index: u32, variant: &'static str, len: usize) -> Result<Self::SerializeTupleVariant> {
        self.variant(variant)?;
        self.serialize_seq(Some(len))
    }

    fn serialize_map(self, len: Option<usize>) -> Result<Self::SerializeMap> {
        match len {
            Some(len) => self.open(Tag::dict(len), len),
            None => Err(Error::Length),
        }
    }

    fn serialize_struct(self, _name: &'static str, len: usize) -> Result<Self::SerializeStruct> {
        self.serialize_map(Some(len))
    }

    fn serialize_struct_variant(self, _name: &'static str, _index: u32, variant: &'static str, len: usize) -> Result<Self::SerializeStructVariant> {
        self.variant(variant)?;
        self.serialize_map(Some(len))
    }

}

impl<'a, W: Write> ser::SerializeSeq for Compound<'a, W> {
    type Ok = ();
    type Error = Error;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        self.element(value)
    }

    fn end(self) -> Result<()> {
        self.finish()
    }

}

impl<'a, W: Write> ser::SerializeTuple for Compound<'a, W> {
    type Ok = ();
    type Error = Error;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        self.element(value)
    }

    fn end(self) -> Result<()> {
        self.finish()
    }
}

impl<'a, W: Write> ser::SerializeTupleStruct for Compound<'a, W> {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        self.element(value)
    }

    fn end(self) -> Result<()> {
        self.finish()
    }
}

impl<'a, W: Write> ser::SerializeTupleVariant for Compound<'a, W> {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        self.element(value)
    }

    fn end(self) -> Result<()> {
        self.finish()
    }
}

impl<'a, W: Write> ser::SerializeMap for Compound<'a, W> {
    type Ok = ();
    type Error = Error;

    fn serialize_key<T: ?Sized + Serialize>(&mut self, key: &T) -> Result<()> {
        self.element(key)
    }

    fn serialize_value<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        value.serialize(&mut *self.ser)
    }

    fn end(self) -> Result<()> {
        self.finish()
    }

}

impl<'a, W: Write> ser::SerializeStruct for Compound<'a, W> {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, key: &'static str, value: &T) -> Result<()> {
        self.element(key)?;
        value.serialize(&mut *self.ser)
    }

    fn end(self) -> Result<()> {
        self.finish()
    }

}

impl<'a, W: Write> ser::SerializeStructVariant for Compound<'a, W> {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, key: &'static str, value: &T) -> Result<()> {
        self.element(key)?;
        value.serialize(&mut *self.ser)
    }

    fn end(self) -> Result<()> {
        self.finish()
    }

}

#[cfg(test)]
mod tests {
    use super::{to_bytes, to_bytes_with, to_writer};
    use crate::error::Error;
    use rencode::FloatBits;
    use serde::Serialize;
    use std::collections::BTreeMap;

    #[test]
    fn scalars() {
        assert_eq!(to_bytes(&100u8).unwrap(), [62, 100]);
        assert_eq!(to_bytes(&-10i32).unwrap(), [79]);
        assert_eq!(to_bytes(&true).unwrap(), [67]);
        assert_eq!(to_bytes(&()).unwrap(), [69]);
        assert_eq!(to_bytes(&None::<u8>).unwrap(), [69]);
        assert_eq!(to_bytes(&Some(1u8)).unwrap(), [1]);
        assert_eq!(to_bytes("foobarbaz").unwrap(), b"\x89foobarbaz");
        assert_eq!(to_bytes(&'ä').unwrap(), [130, 195, 164]);
    }

    #[test]
    fn wide_integers() {
        assert_eq!(to_bytes(&u64::MAX).unwrap(), b"=18446744073709551615\x7f");
        assert_eq!(to_bytes(&(i64::MAX as u64)).unwrap()[0], 65);
        assert_eq!(to_bytes(&i128::MIN).unwrap(), b"=-170141183460469231731687303715884105728\x7f");
        assert_eq!(to_bytes(&-5i128).unwrap(), [74]);
    }

    #[test]
    fn float_widths() {
        assert_eq!(to_bytes(&1234.56f32).unwrap(), [66, 68, 154, 81, 236]);
        assert_eq!(to_bytes(&1234.56f64).unwrap(), [66, 68, 154, 81, 236]);
        assert_eq!(to_bytes_with(&1234.56f64, FloatBits::F64).unwrap(), [44, 64, 147, 74, 61, 112, 163, 215, 10]);
        assert_eq!(to_bytes_with(&1234.56f32, FloatBits::F64).unwrap(), [66, 68, 154, 81, 236]);
    }

    #[test]
    fn containers() {
        assert_eq!(to_bytes(&vec![1u8, 2, 3]).unwrap(), [195, 1, 2, 3]);
        let long = vec![(); 64];
        let buf = to_bytes(&long).unwrap();
        assert_eq!(buf.len(), 66);
        assert_eq!((buf[0], buf[65]), (59, 127));
        let map: BTreeMap<u8, bool> = (0..25).map(|k| (k, true)).collect();
        let buf = to_bytes(&map).unwrap();
        assert_eq!((buf[0], buf[1], buf[2], buf[51]), (60, 0, 67, 127));
    }

    #[test]
    fn structs_and_variants() {
        #[derive(Serialize)]
        struct Point { x: i8, y: i8 }
        #[derive(Serialize)]
        enum Shape { Empty, Dot(Point), Line(u8, u8) }
        assert_eq!(to_bytes(&Point { x: 1, y: -1 }).unwrap(), [104, 129, b'x', 1, 129, b'y', 70]);
        assert_eq!(to_bytes(&Shape::Empty).unwrap(), b"\x85Empty");
        assert_eq!(to_bytes(&Shape::Dot(Point { x: 0, y: 0 })).unwrap(),
            [103, 131, b'D', b'o', b't', 104, 129, b'x', 0, 129, b'y', 0]);
        assert_eq!(to_bytes(&Shape::Line(1, 2)).unwrap(), [103, 132, b'L', b'i', b'n', b'e', 194, 1, 2]);
    }

    #[test]
    fn unknown_length() {
        struct Lazy;
        impl Serialize for Lazy {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.collect_seq((0..3).filter(|_| true))
            }
        }
        assert!(matches!(to_bytes(&Lazy), Err(Error::Length)));
    }

    #[test]
    fn miscounted_length() {
        struct Liar;
        impl Serialize for Liar {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                use serde::ser::SerializeSeq;
                let mut seq = serializer.serialize_seq(Some(2))?;
                seq.serialize_element(&1)?;
                seq.end()
            }
        }
        assert!(matches!(to_bytes(&Liar), Err(Error::Count { expected: 2, found: 1 })));
    }

    #[test]
    fn miscounted_open_length() {
        use serde::ser::{SerializeMap, SerializeSeq};
        struct LongSeq;
        impl Serialize for LongSeq {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                let mut seq = serializer.serialize_seq(Some(64))?;
                seq.serialize_element(&1u8)?;
                seq.end()
            }
        }
        struct LongMap;
        impl Serialize for LongMap {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                let mut map = serializer.serialize_map(Some(25))?;
                map.serialize_entry(&0u8, &true)?;
                map.end()
            }
        }
        assert!(matches!(to_bytes(&LongSeq), Err(Error::Count { expected: 64, found: 1 })));
        assert!(matches!(to_bytes(&LongMap), Err(Error::Count { expected: 25, found: 1 })));
    }

    #[test]
    fn writer() {
        let mut buf = Vec::new();
        to_writer(&mut buf, &[Some(true), None]).unwrap();
        assert_eq!(buf, [194, 67, 69]);
    }
}
