//! MessagePack encoder
//!
//! Values are written through a [`Sink`]. A `Vec<u8>` sink grows as needed and
//! cannot fail; [`ValueEncoder`] writes into a caller-provided buffer and
//! reports [`Error::ShortBuffer`] when it runs out of room.
//!
//! Integers take the smallest tag that holds them, with non-negative values
//! always written through the unsigned family.

use alloc::vec::Vec;
use core::convert::Infallible;

use crate::error::{Error, Result};
use crate::marker::{Marker, FIXSTR_MAX, FIX_CONTAINER_MAX};
use crate::value::Value;

/// Encoder settings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EncodeConfig {
    /// Write strings and binaries with the legacy raw family (no str 8, no bin)
    pub compatibility: bool,
}

impl EncodeConfig {
    /// Enable or disable legacy raw encoding
    #[inline]
    pub fn with_compatibility(mut self, compatibility: bool) -> Self {
        self.compatibility = compatibility;
        self
    }
}

/// Destination for encoded bytes
pub trait Sink {
    /// Failure raised when the sink cannot take more bytes
    type Error;

    /// Append raw bytes
    fn put(&mut self, bytes: &[u8]) -> core::result::Result<(), Self::Error>;

    /// Append a single byte
    #[inline]
    fn put_u8(&mut self, byte: u8) -> core::result::Result<(), Self::Error> {
        self.put(&[byte])
    }
}

impl Sink for Vec<u8> {
    type Error = Infallible;

    #[inline]
    fn put(&mut self, bytes: &[u8]) -> core::result::Result<(), Infallible> {
        self.extend_from_slice(bytes);
        Ok(())
    }

    #[inline]
    fn put_u8(&mut self, byte: u8) -> core::result::Result<(), Infallible> {
        self.push(byte);
        Ok(())
    }
}

/// Sink that only counts bytes
#[derive(Debug, Default)]
struct Counter(usize);

impl Sink for Counter {
    type Error = Infallible;

    #[inline]
    fn put(&mut self, bytes: &[u8]) -> core::result::Result<(), Infallible> {
        self.0 += bytes.len();
        Ok(())
    }
}

/// Encoder that writes into a user-provided buffer
pub struct ValueEncoder<'a> {
    buf: &'a mut [u8],
    pos: usize,
    config: EncodeConfig,
}

impl<'a> ValueEncoder<'a> {
    /// Create new encoder with the given buffer
    #[inline]
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self {
            buf,
            pos: 0,
            config: EncodeConfig::default(),
        }
    }

    /// Replace the encoder settings
    #[inline]
    pub fn with_config(mut self, config: EncodeConfig) -> Self {
        self.config = config;
        self
    }

    /// Append one value, returning the number of bytes it took
    ///
    /// On [`Error::ShortBuffer`] the position is rolled back to where the
    /// value started.
    pub fn encode(&mut self, value: &Value) -> Result<usize> {
        let start = self.pos;
        let config = self.config;
        match write_value(self, value, &config) {
            Ok(()) => Ok(self.pos - start),
            Err(e) => {
                self.pos = start;
                Err(e)
            }
        }
    }

    /// Get current position in buffer
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Get remaining buffer capacity
    #[inline]
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// Reset encoder for reuse with the same buffer
    #[inline]
    pub fn reset(&mut self) {
        self.pos = 0;
    }

    /// Get a slice of the encoded data
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.buf[..self.pos]
    }
}

impl Sink for ValueEncoder<'_> {
    type Error = Error;

    #[inline]
    fn put(&mut self, bytes: &[u8]) -> Result<()> {
        if self.pos + bytes.len() > self.buf.len() {
            return Err(Error::ShortBuffer);
        }
        self.buf[self.pos..self.pos + bytes.len()].copy_from_slice(bytes);
        self.pos += bytes.len();
        Ok(())
    }

    #[inline]
    fn put_u8(&mut self, byte: u8) -> Result<()> {
        if self.pos >= self.buf.len() {
            return Err(Error::ShortBuffer);
        }
        self.buf[self.pos] = byte;
        self.pos += 1;
        Ok(())
    }
}

/// Narrow a length or count to the format's 32-bit field
///
/// # Panics
///
/// Panics if `len` exceeds `u32::MAX`, which MessagePack cannot represent.
#[inline]
fn len32(len: usize) -> u32 {
    assert!(
        len <= u32::MAX as usize,
        "length {} exceeds the 32-bit MessagePack limit",
        len
    );
    len as u32
}

#[inline]
fn write_marker<W: Sink>(w: &mut W, marker: Marker) -> core::result::Result<(), W::Error> {
    w.put_u8(marker.to_u8())
}

fn write_uint<W: Sink>(w: &mut W, n: u64) -> core::result::Result<(), W::Error> {
    if n <= 0x7f {
        write_marker(w, Marker::FixPos(n as u8))
    } else if n <= u8::MAX as u64 {
        write_marker(w, Marker::U8)?;
        w.put_u8(n as u8)
    } else if n <= u16::MAX as u64 {
        write_marker(w, Marker::U16)?;
        w.put(&(n as u16).to_be_bytes())
    } else if n <= u32::MAX as u64 {
        write_marker(w, Marker::U32)?;
        w.put(&(n as u32).to_be_bytes())
    } else {
        write_marker(w, Marker::U64)?;
        w.put(&n.to_be_bytes())
    }
}

fn write_int<W: Sink>(w: &mut W, n: i64) -> core::result::Result<(), W::Error> {
    if n >= 0 {
        write_uint(w, n as u64)
    } else if n >= -32 {
        write_marker(w, Marker::FixNeg(n as i8))
    } else if n >= i8::MIN as i64 {
        write_marker(w, Marker::I8)?;
        w.put_u8(n as i8 as u8)
    } else if n >= i16::MIN as i64 {
        write_marker(w, Marker::I16)?;
        w.put(&(n as i16).to_be_bytes())
    } else if n >= i32::MIN as i64 {
        write_marker(w, Marker::I32)?;
        w.put(&(n as i32).to_be_bytes())
    } else {
        write_marker(w, Marker::I64)?;
        w.put(&n.to_be_bytes())
    }
}

fn write_str_header<W: Sink>(
    w: &mut W,
    len: usize,
    config: &EncodeConfig,
) -> core::result::Result<(), W::Error> {
    if len <= FIXSTR_MAX {
        write_marker(w, Marker::FixStr(len as u8))
    } else if len <= u8::MAX as usize && !config.compatibility {
        write_marker(w, Marker::Str8)?;
        w.put_u8(len as u8)
    } else if len <= u16::MAX as usize {
        write_marker(w, Marker::Str16)?;
        w.put(&(len as u16).to_be_bytes())
    } else {
        write_marker(w, Marker::Str32)?;
        w.put(&len32(len).to_be_bytes())
    }
}

fn write_bin_header<W: Sink>(w: &mut W, len: usize) -> core::result::Result<(), W::Error> {
    if len <= u8::MAX as usize {
        write_marker(w, Marker::Bin8)?;
        w.put_u8(len as u8)
    } else if len <= u16::MAX as usize {
        write_marker(w, Marker::Bin16)?;
        w.put(&(len as u16).to_be_bytes())
    } else {
        write_marker(w, Marker::Bin32)?;
        w.put(&len32(len).to_be_bytes())
    }
}

fn write_array_header<W: Sink>(w: &mut W, count: usize) -> core::result::Result<(), W::Error> {
    if count <= FIX_CONTAINER_MAX {
        write_marker(w, Marker::FixArray(count as u8))
    } else if count <= u16::MAX as usize {
        write_marker(w, Marker::Array16)?;
        w.put(&(count as u16).to_be_bytes())
    } else {
        write_marker(w, Marker::Array32)?;
        w.put(&len32(count).to_be_bytes())
    }
}

fn write_map_header<W: Sink>(w: &mut W, count: usize) -> core::result::Result<(), W::Error> {
    if count <= FIX_CONTAINER_MAX {
        write_marker(w, Marker::FixMap(count as u8))
    } else if count <= u16::MAX as usize {
        write_marker(w, Marker::Map16)?;
        w.put(&(count as u16).to_be_bytes())
    } else {
        write_marker(w, Marker::Map32)?;
        w.put(&len32(count).to_be_bytes())
    }
}

fn write_ext_header<W: Sink>(
    w: &mut W,
    code: i8,
    len: usize,
) -> core::result::Result<(), W::Error> {
    match len {
        1 => write_marker(w, Marker::FixExt1)?,
        2 => write_marker(w, Marker::FixExt2)?,
        4 => write_marker(w, Marker::FixExt4)?,
        8 => write_marker(w, Marker::FixExt8)?,
        16 => write_marker(w, Marker::FixExt16)?,
        _ if len <= u8::MAX as usize => {
            write_marker(w, Marker::Ext8)?;
            w.put_u8(len as u8)?;
        }
        _ if len <= u16::MAX as usize => {
            write_marker(w, Marker::Ext16)?;
            w.put(&(len as u16).to_be_bytes())?;
        }
        _ => {
            write_marker(w, Marker::Ext32)?;
            w.put(&len32(len).to_be_bytes())?;
        }
    }
    w.put_u8(code as u8)
}

/// Write one value and all of its children to a sink
///
/// Containers are written in stored order, so map pairs come out in the
/// order they sit in the [`Value`].
pub fn write_value<W: Sink>(
    w: &mut W,
    value: &Value,
    config: &EncodeConfig,
) -> core::result::Result<(), W::Error> {
    match value {
        Value::Nil => write_marker(w, Marker::Nil),
        Value::Bool(false) => write_marker(w, Marker::False),
        Value::Bool(true) => write_marker(w, Marker::True),
        Value::Int(n) => write_int(w, *n),
        Value::UInt(n) => write_uint(w, *n),
        Value::Float(f) => {
            write_marker(w, Marker::F32)?;
            w.put(&f.to_be_bytes())
        }
        Value::Double(f) => {
            write_marker(w, Marker::F64)?;
            w.put(&f.to_be_bytes())
        }
        Value::String(bytes) => {
            write_str_header(w, bytes.len(), config)?;
            w.put(bytes)
        }
        Value::Binary(bytes) => {
            if config.compatibility {
                write_str_header(w, bytes.len(), config)?;
            } else {
                write_bin_header(w, bytes.len())?;
            }
            w.put(bytes)
        }
        Value::Array(items) => {
            write_array_header(w, items.len())?;
            for item in items {
                write_value(w, item, config)?;
            }
            Ok(())
        }
        Value::Map(pairs) => {
            write_map_header(w, pairs.len())?;
            for (key, item) in pairs {
                write_value(w, key, config)?;
                write_value(w, item, config)?;
            }
            Ok(())
        }
        Value::Extension(code, payload) => {
            write_ext_header(w, *code, payload.len())?;
            w.put(payload)
        }
    }
}

/// Append the encoding of `value` to `out`
pub fn encode_to_vec(value: &Value, out: &mut Vec<u8>, config: &EncodeConfig) {
    match write_value(out, value, config) {
        Ok(()) => {}
        Err(never) => match never {},
    }
}

/// Encode a value with explicit settings
pub fn encode_with(value: &Value, config: EncodeConfig) -> Vec<u8> {
    let mut out = Vec::with_capacity(encoded_len_with(value, &config));
    encode_to_vec(value, &mut out, &config);
    out
}

/// Encode a value with default settings
#[inline]
pub fn encode(value: &Value) -> Vec<u8> {
    encode_with(value, EncodeConfig::default())
}

/// Exact encoded size of a value under the given settings
pub fn encoded_len_with(value: &Value, config: &EncodeConfig) -> usize {
    let mut counter = Counter::default();
    match write_value(&mut counter, value, config) {
        Ok(()) => counter.0,
        Err(never) => match never {},
    }
}

/// Exact encoded size of a value with default settings
#[inline]
pub fn encoded_len(value: &Value) -> usize {
    encoded_len_with(value, &EncodeConfig::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::{decode, DecodeConfig, Decoder};
    use crate::source::Contiguous;
    use alloc::vec;

    #[test]
    fn test_encoder_example_map() {
        let value = Value::Map(vec![
            (Value::from("compact"), Value::Bool(true)),
            (Value::from("schema"), Value::Int(0)),
        ]);
        let bytes = encode(&value);

        assert_eq!(
            bytes,
            [
                0x82, 0xa7, 0x63, 0x6f, 0x6d, 0x70, 0x61, 0x63, 0x74, 0xc3, 0xa6, 0x73, 0x63,
                0x68, 0x65, 0x6d, 0x61, 0x00
            ]
        );
        assert_eq!(decode(&bytes).unwrap(), value);
    }

    #[test]
    fn test_encoder_integer_widths() {
        let cases: [(Value, &[u8]); 14] = [
            (Value::UInt(0), &[0x00]),
            (Value::UInt(127), &[0x7f]),
            (Value::UInt(128), &[0xcc, 0x80]),
            (Value::UInt(256), &[0xcd, 0x01, 0x00]),
            (Value::UInt(65536), &[0xce, 0x00, 0x01, 0x00, 0x00]),
            (
                Value::UInt(1 << 32),
                &[0xcf, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00],
            ),
            (Value::Int(5), &[0x05]),
            (Value::Int(-1), &[0xff]),
            (Value::Int(-32), &[0xe0]),
            (Value::Int(-33), &[0xd0, 0xdf]),
            (Value::Int(-129), &[0xd1, 0xff, 0x7f]),
            (Value::Int(-32769), &[0xd2, 0xff, 0xff, 0x7f, 0xff]),
            (
                Value::Int(i64::MIN),
                &[0xd3, 0x80, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00],
            ),
            (Value::Int(300), &[0xcd, 0x01, 0x2c]),
        ];

        for (value, expected) in cases {
            assert_eq!(encode(&value), expected, "value {:?}", value);
        }
    }

    #[test]
    fn test_encoder_length_boundaries() {
        let s31 = Value::String(vec![b'a'; 31]);
        let s32 = Value::String(vec![b'a'; 32]);
        let s256 = Value::String(vec![b'a'; 256]);
        assert_eq!(encode(&s31)[0], 0xbf);
        assert_eq!(&encode(&s32)[..2], &[0xd9, 32]);
        assert_eq!(&encode(&s256)[..3], &[0xda, 0x01, 0x00]);

        let a15 = Value::Array(vec![Value::Nil; 15]);
        let a16 = Value::Array(vec![Value::Nil; 16]);
        assert_eq!(encode(&a15)[0], 0x9f);
        assert_eq!(&encode(&a16)[..3], &[0xdc, 0x00, 0x10]);

        let b0 = Value::Binary(vec![]);
        assert_eq!(encode(&b0), [0xc4, 0x00]);
    }

    #[test]
    fn test_encoder_extensions() {
        assert_eq!(encode(&Value::Extension(1, vec![9])), [0xd4, 0x01, 0x09]);
        assert_eq!(encode(&Value::Extension(-1, vec![0; 16]))[..2], [0xd8, 0xff]);
        assert_eq!(encode(&Value::Extension(2, vec![])), [0xc7, 0x00, 0x02]);
        assert_eq!(encode(&Value::Extension(3, vec![0; 3]))[..3], [0xc7, 0x03, 0x03]);
        assert_eq!(
            encode(&Value::Extension(4, vec![0; 300]))[..4],
            [0xc8, 0x01, 0x2c, 0x04]
        );
    }

    #[test]
    fn test_encoded_len_matches_output() {
        let value = Value::Array(vec![
            Value::from("x"),
            Value::Double(2.5),
            Value::Binary(vec![1; 300]),
            Value::Map(vec![(Value::Int(-100), Value::Extension(7, vec![1, 2, 3]))]),
        ]);
        assert_eq!(encoded_len(&value), encode(&value).len());
    }

    #[test]
    fn test_value_encoder_into_slice() {
        let mut buf = [0u8; 32];
        let mut encoder = ValueEncoder::new(&mut buf);

        let first = encoder.encode(&Value::from("hi")).unwrap();
        let second = encoder.encode(&Value::UInt(1000)).unwrap();
        assert_eq!(first, 3);
        assert_eq!(second, 3);
        assert_eq!(encoder.position(), 6);
        assert_eq!(encoder.as_slice(), &[0xa2, b'h', b'i', 0xcd, 0x03, 0xe8]);
    }

    #[test]
    fn test_value_encoder_short_buffer() {
        let mut buf = [0u8; 4];
        let mut encoder = ValueEncoder::new(&mut buf);

        encoder.encode(&Value::Nil).unwrap();
        assert_eq!(
            encoder.encode(&Value::from("too long")),
            Err(Error::ShortBuffer)
        );
        // failed value leaves no partial output
        assert_eq!(encoder.position(), 1);
        assert_eq!(encoder.remaining(), 3);

        encoder.reset();
        assert_eq!(encoder.position(), 0);
    }

    #[test]
    fn test_compatibility_encoding() {
        let config = EncodeConfig::default().with_compatibility(true);

        let s40 = Value::String(vec![b'z'; 40]);
        assert_eq!(&encode_with(&s40, config)[..3], &[0xda, 0x00, 40]);

        let bin = Value::Binary(vec![1, 2]);
        let bytes = encode_with(&bin, config);
        assert_eq!(bytes, [0xa2, 1, 2]);

        let source = Contiguous::new(&bytes);
        let decode_config = DecodeConfig::default().with_compatibility(true);
        assert_eq!(
            Decoder::with_config(&source, decode_config).decode().unwrap(),
            bin
        );
    }

    #[test]
    fn test_float_tags_preserved() {
        assert_eq!(encode(&Value::Float(1.5)), [0xca, 0x3f, 0xc0, 0x00, 0x00]);
        assert_eq!(encode(&Value::Double(1.5))[0], 0xcb);
        assert_eq!(decode(&encode(&Value::Float(f32::NAN))).unwrap(), Value::Float(f32::NAN));
    }
}
