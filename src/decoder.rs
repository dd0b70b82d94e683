//! Recursive-descent MessagePack decoder
//!
//! The decoder pulls one tag byte from a [`Cursor`], reads whatever length or
//! value field the tag calls for, and recurses into container children. Any
//! failure aborts the whole decode; no partial value is returned.
//!
//! Two failures matter to callers: [`Error::InsufficientData`] means the input
//! is a well-formed prefix that ran out, [`Error::InvalidData`] means the tag
//! byte itself is not a MessagePack format.

use alloc::vec::Vec;

use crate::cursor::Cursor;
use crate::error::{Error, Result};
use crate::marker::Marker;
use crate::source::{ByteSource, Contiguous, Segmented};
use crate::value::Value;
use crate::DEFAULT_MAX_DEPTH;

/// Decoder settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeConfig {
    /// Maximum container nesting; deeper input fails with
    /// [`Error::DepthLimitExceeded`]
    pub max_depth: usize,
    /// Treat every str-family payload as binary (legacy raw format)
    pub compatibility: bool,
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            compatibility: false,
        }
    }
}

impl DecodeConfig {
    /// Set the container nesting limit
    #[inline]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Enable or disable legacy raw decoding
    #[inline]
    pub fn with_compatibility(mut self, compatibility: bool) -> Self {
        self.compatibility = compatibility;
        self
    }
}

/// Value decoder over any [`ByteSource`]
#[derive(Debug)]
pub struct Decoder<'s, S: ByteSource + ?Sized> {
    cursor: Cursor<'s, S>,
    config: DecodeConfig,
}

impl<'s, S: ByteSource + ?Sized> Decoder<'s, S> {
    /// Create a decoder with default settings
    #[inline]
    pub fn new(source: &'s S) -> Self {
        Self::with_config(source, DecodeConfig::default())
    }

    /// Create a decoder with explicit settings
    #[inline]
    pub fn with_config(source: &'s S, config: DecodeConfig) -> Self {
        Self {
            cursor: Cursor::new(source),
            config,
        }
    }

    /// Bytes consumed so far
    #[inline]
    pub fn position(&self) -> usize {
        self.cursor.position()
    }

    /// Check if every byte of the source has been consumed
    #[inline]
    pub fn is_at_end(&self) -> bool {
        self.cursor.is_at_end()
    }

    /// Decode the next complete value
    pub fn decode(&mut self) -> Result<Value> {
        let start = self.cursor.position();
        self.read_value(0).map_err(|e| {
            log::debug!(
                "decode starting at offset {} failed at offset {}: {}",
                start,
                self.cursor.position(),
                e.description()
            );
            e
        })
    }

    fn read_value(&mut self, depth: usize) -> Result<Value> {
        let tag = self.cursor.next_byte().ok_or(Error::InsufficientData)?;

        let value = match Marker::from_u8(tag) {
            Marker::FixPos(n) => Value::UInt(n as u64),
            Marker::FixNeg(n) => Value::Int(n as i64),
            Marker::Nil => Value::Nil,
            Marker::False => Value::Bool(false),
            Marker::True => Value::Bool(true),

            Marker::U8 => Value::UInt(self.cursor.get_u8()? as u64),
            Marker::U16 => Value::UInt(self.cursor.get_u16()? as u64),
            Marker::U32 => Value::UInt(self.cursor.get_u32()? as u64),
            Marker::U64 => Value::UInt(self.cursor.get_u64()?),
            Marker::I8 => Value::Int(self.cursor.get_i8()? as i64),
            Marker::I16 => Value::Int(self.cursor.get_i16()? as i64),
            Marker::I32 => Value::Int(self.cursor.get_i32()? as i64),
            Marker::I64 => Value::Int(self.cursor.get_i64()?),
            Marker::F32 => Value::Float(self.cursor.get_f32()?),
            Marker::F64 => Value::Double(self.cursor.get_f64()?),

            Marker::FixStr(len) => self.read_str(len as usize)?,
            Marker::Str8 => {
                let len = self.cursor.get_u8()? as usize;
                self.read_str(len)?
            }
            Marker::Str16 => {
                let len = self.cursor.get_u16()? as usize;
                self.read_str(len)?
            }
            Marker::Str32 => {
                let len = self.cursor.get_u32()? as usize;
                self.read_str(len)?
            }

            Marker::Bin8 => {
                let len = self.cursor.get_u8()? as usize;
                Value::Binary(self.read_bytes(len)?)
            }
            Marker::Bin16 => {
                let len = self.cursor.get_u16()? as usize;
                Value::Binary(self.read_bytes(len)?)
            }
            Marker::Bin32 => {
                let len = self.cursor.get_u32()? as usize;
                Value::Binary(self.read_bytes(len)?)
            }

            Marker::FixArray(n) => self.read_array(n as usize, depth)?,
            Marker::Array16 => {
                let n = self.cursor.get_u16()? as usize;
                self.read_array(n, depth)?
            }
            Marker::Array32 => {
                let n = self.cursor.get_u32()? as usize;
                self.read_array(n, depth)?
            }

            Marker::FixMap(n) => self.read_map(n as usize, depth)?,
            Marker::Map16 => {
                let n = self.cursor.get_u16()? as usize;
                self.read_map(n, depth)?
            }
            Marker::Map32 => {
                let n = self.cursor.get_u32()? as usize;
                self.read_map(n, depth)?
            }

            Marker::FixExt1 => self.read_ext(1)?,
            Marker::FixExt2 => self.read_ext(2)?,
            Marker::FixExt4 => self.read_ext(4)?,
            Marker::FixExt8 => self.read_ext(8)?,
            Marker::FixExt16 => self.read_ext(16)?,
            Marker::Ext8 => {
                let len = self.cursor.get_u8()? as usize;
                self.read_ext(len)?
            }
            Marker::Ext16 => {
                let len = self.cursor.get_u16()? as usize;
                self.read_ext(len)?
            }
            Marker::Ext32 => {
                let len = self.cursor.get_u32()? as usize;
                self.read_ext(len)?
            }

            Marker::Reserved => {
                log::debug!(
                    "reserved tag {:#04x} at offset {}",
                    tag,
                    self.cursor.position() - 1
                );
                return Err(Error::InvalidData);
            }
        };

        Ok(value)
    }

    #[inline]
    fn read_bytes(&mut self, len: usize) -> Result<Vec<u8>> {
        Ok(self.cursor.next_slice(len)?.into_owned())
    }

    fn read_str(&mut self, len: usize) -> Result<Value> {
        let bytes = self.read_bytes(len)?;
        if self.config.compatibility {
            Ok(Value::Binary(bytes))
        } else {
            Ok(Value::String(bytes))
        }
    }

    fn read_ext(&mut self, len: usize) -> Result<Value> {
        let code = self.cursor.get_i8()?;
        let payload = self.read_bytes(len)?;
        Ok(Value::Extension(code, payload))
    }

    /// Depth for the children of a container opened at `depth`
    #[inline]
    fn enter(&self, depth: usize) -> Result<usize> {
        if depth >= self.config.max_depth {
            log::warn!(
                "container nesting exceeds limit of {} at offset {}",
                self.config.max_depth,
                self.cursor.position()
            );
            return Err(Error::DepthLimitExceeded);
        }
        Ok(depth + 1)
    }

    fn read_array(&mut self, count: usize, depth: usize) -> Result<Value> {
        let depth = self.enter(depth)?;
        // every item takes at least one byte
        let mut items = Vec::with_capacity(count.min(self.cursor.remaining()));
        for _ in 0..count {
            items.push(self.read_value(depth)?);
        }
        Ok(Value::Array(items))
    }

    fn read_map(&mut self, count: usize, depth: usize) -> Result<Value> {
        let depth = self.enter(depth)?;
        // every entry takes at least two bytes
        let mut pairs = Vec::with_capacity(count.min(self.cursor.remaining() / 2));
        for _ in 0..count {
            let key = self.read_value(depth)?;
            let value = self.read_value(depth)?;
            pairs.push((key, value));
        }
        Ok(Value::Map(pairs))
    }
}

/// Decode the first value from any byte source
///
/// Trailing bytes after the first value are ignored.
pub fn decode_from<S: ByteSource + ?Sized>(source: &S) -> Result<Value> {
    Decoder::new(source).decode()
}

/// Decode the first value in a contiguous buffer
#[inline]
pub fn decode(bytes: &[u8]) -> Result<Value> {
    decode_from(&Contiguous::new(bytes))
}

/// Decode the first value spread over ordered regions
#[inline]
pub fn decode_segments(regions: &[&[u8]]) -> Result<Value> {
    decode_from(&Segmented::new(regions.iter().copied()))
}

/// Decode the first value and report how many bytes it occupied
pub fn decode_first(bytes: &[u8]) -> Result<(Value, usize)> {
    let source = Contiguous::new(bytes);
    let mut decoder = Decoder::new(&source);
    let value = decoder.decode()?;
    Ok((value, decoder.position()))
}

/// Decode back-to-back values until the input is exhausted
pub fn decode_all(bytes: &[u8]) -> Result<Vec<Value>> {
    let source = Contiguous::new(bytes);
    let mut decoder = Decoder::new(&source);
    let mut values = Vec::new();
    while !decoder.is_at_end() {
        values.push(decoder.decode()?);
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    /// `{"compact": true, "schema": 0}` in both pair orders
    const COMPACT_FIRST: [u8; 18] = [
        0x82, 0xa7, 0x63, 0x6f, 0x6d, 0x70, 0x61, 0x63, 0x74, 0xc3, 0xa6, 0x73, 0x63, 0x68, 0x65,
        0x6d, 0x61, 0x00,
    ];
    const SCHEMA_FIRST: [u8; 18] = [
        0x82, 0xa6, 0x73, 0x63, 0x68, 0x65, 0x6d, 0x61, 0x00, 0xa7, 0x63, 0x6f, 0x6d, 0x70, 0x61,
        0x63, 0x74, 0xc3,
    ];

    fn example() -> Value {
        Value::Map(vec![
            (Value::from("compact"), Value::Bool(true)),
            (Value::from("schema"), Value::UInt(0)),
        ])
    }

    #[test]
    fn test_decoder_example_map() {
        assert_eq!(decode(&COMPACT_FIRST).unwrap(), example());
        assert_eq!(decode(&SCHEMA_FIRST).unwrap(), example());
    }

    #[test]
    fn test_decoder_preserves_pair_order() {
        let value = decode(&SCHEMA_FIRST).unwrap();
        let pairs = value.as_map().unwrap();
        assert_eq!(pairs[0].0.as_str(), Some("schema"));
        assert_eq!(pairs[1].0.as_str(), Some("compact"));
    }

    #[test]
    fn test_decoder_reserved_tag() {
        assert_eq!(decode(&[0xc1]), Err(Error::InvalidData));
        assert_eq!(decode(&[0xc1, 0x00, 0x01]), Err(Error::InvalidData));
        // nested reserved tag
        assert_eq!(decode(&[0x91, 0xc1]), Err(Error::InvalidData));
    }

    #[test]
    fn test_decoder_truncated_example() {
        assert_eq!(decode(&COMPACT_FIRST[..17]), Err(Error::InsufficientData));
        assert_eq!(decode(&COMPACT_FIRST[..16]), Err(Error::InsufficientData));
        assert_eq!(decode(&[]), Err(Error::InsufficientData));
    }

    #[test]
    fn test_decoder_scalars() {
        let cases: [(&[u8], Value); 16] = [
            (&[0xc0], Value::Nil),
            (&[0xc2], Value::Bool(false)),
            (&[0x7f], Value::UInt(127)),
            (&[0xe0], Value::Int(-32)),
            (&[0xcc, 0xff], Value::UInt(255)),
            (&[0xcd, 0x01, 0x00], Value::UInt(256)),
            (&[0xce, 0x00, 0x01, 0x00, 0x00], Value::UInt(65536)),
            (
                &[0xcf, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff],
                Value::UInt(u64::MAX),
            ),
            (&[0xd0, 0x80], Value::Int(-128)),
            (&[0xd1, 0xff, 0x00], Value::Int(-256)),
            (&[0xd2, 0x80, 0x00, 0x00, 0x00], Value::Int(i32::MIN as i64)),
            (
                &[0xd3, 0x80, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00],
                Value::Int(i64::MIN),
            ),
            (&[0xca, 0x3f, 0xc0, 0x00, 0x00], Value::Float(1.5)),
            (
                &[0xcb, 0x40, 0x09, 0x21, 0xfb, 0x54, 0x44, 0x2d, 0x18],
                Value::Double(core::f64::consts::PI),
            ),
            (&[0xd4, 0x05, 0xaa], Value::Extension(5, vec![0xaa])),
            (&[0xc7, 0x00, 0xfe], Value::Extension(-2, vec![])),
        ];

        for (bytes, expected) in cases {
            assert_eq!(decode(bytes).unwrap(), expected, "input {:02x?}", bytes);
        }
    }

    #[test]
    fn test_decoder_width_tags_keep_float_precision() {
        // float 32 is never widened into Double
        let value = decode(&[0xca, 0x3f, 0xc0, 0x00, 0x00]).unwrap();
        assert!(matches!(value, Value::Float(_)));
    }

    #[test]
    fn test_decoder_strings_and_binary() {
        assert_eq!(decode(&[0xa0]).unwrap(), Value::String(vec![]));
        assert_eq!(
            decode(&[0xd9, 0x02, b'h', b'i']).unwrap(),
            Value::from("hi")
        );
        assert_eq!(
            decode(&[0xda, 0x00, 0x01, b'x']).unwrap(),
            Value::from("x")
        );
        assert_eq!(
            decode(&[0xc4, 0x02, 0x00, 0xff]).unwrap(),
            Value::Binary(vec![0x00, 0xff])
        );
        assert_eq!(
            decode(&[0xc6, 0x00, 0x00, 0x00, 0x01, 0x07]).unwrap(),
            Value::Binary(vec![0x07])
        );
        // invalid UTF-8 is stored as-is
        assert_eq!(
            decode(&[0xa2, 0xff, 0xfe]).unwrap(),
            Value::String(vec![0xff, 0xfe])
        );
    }

    #[test]
    fn test_decoder_containers() {
        let bytes = [0xdc, 0x00, 0x02, 0x01, 0x91, 0xc0];
        assert_eq!(
            decode(&bytes).unwrap(),
            Value::Array(vec![Value::UInt(1), Value::Array(vec![Value::Nil])])
        );

        let bytes = [0xde, 0x00, 0x01, 0xa1, b'k', 0x90];
        assert_eq!(
            decode(&bytes).unwrap(),
            Value::Map(vec![(Value::from("k"), Value::Array(vec![]))])
        );

        assert_eq!(decode(&[0x80]).unwrap(), Value::Map(vec![]));
    }

    #[test]
    fn test_decoder_huge_declared_count_is_insufficient() {
        let array = [0xdd, 0xff, 0xff, 0xff, 0xff, 0xc0];
        assert_eq!(decode(&array), Err(Error::InsufficientData));

        let map = [0xdf, 0xff, 0xff, 0xff, 0xff, 0xc0, 0xc0];
        assert_eq!(decode(&map), Err(Error::InsufficientData));

        let bin = [0xc6, 0xff, 0xff, 0xff, 0xff, 0x00];
        assert_eq!(decode(&bin), Err(Error::InsufficientData));
    }

    #[test]
    fn test_decoder_truncated_length_fields() {
        assert_eq!(decode(&[0xcd, 0x01]), Err(Error::InsufficientData));
        assert_eq!(decode(&[0xda, 0x00]), Err(Error::InsufficientData));
        assert_eq!(decode(&[0xd4]), Err(Error::InsufficientData));
        assert_eq!(decode(&[0xd4, 0x01]), Err(Error::InsufficientData));
        assert_eq!(decode(&[0xc8, 0x00, 0x02, 0x01, 0xaa]), Err(Error::InsufficientData));
    }

    #[test]
    fn test_decoder_segmented_example() {
        let (a, b) = COMPACT_FIRST.split_at(8);
        assert_eq!(decode_segments(&[a, b]).unwrap(), example());

        let regions: Vec<&[u8]> = COMPACT_FIRST.chunks(1).collect();
        assert_eq!(decode_segments(&regions).unwrap(), example());

        let (a, b) = COMPACT_FIRST[..17].split_at(9);
        assert_eq!(decode_segments(&[a, b]), Err(Error::InsufficientData));
    }

    #[test]
    fn test_decoder_depth_limit() {
        let nested = [0x91, 0x91, 0x91, 0xc0];
        let source = Contiguous::new(&nested);

        let config = DecodeConfig::default().with_max_depth(3);
        assert!(Decoder::with_config(&source, config).decode().is_ok());

        let config = DecodeConfig::default().with_max_depth(2);
        assert_eq!(
            Decoder::with_config(&source, config).decode(),
            Err(Error::DepthLimitExceeded)
        );

        // scalars need no depth
        let config = DecodeConfig::default().with_max_depth(0);
        let scalar = Contiguous::new(&[0x01]);
        assert_eq!(
            Decoder::with_config(&scalar, config).decode(),
            Ok(Value::UInt(1))
        );
    }

    #[test]
    fn test_decoder_compatibility_mode() {
        let bytes = [0xa2, b'o', b'k'];
        let source = Contiguous::new(&bytes);
        let config = DecodeConfig::default().with_compatibility(true);

        assert_eq!(
            Decoder::with_config(&source, config).decode().unwrap(),
            Value::Binary(b"ok".to_vec())
        );
    }

    #[test]
    fn test_decode_first_reports_consumed() {
        let mut bytes = COMPACT_FIRST.to_vec();
        bytes.extend_from_slice(&[0xc0, 0xc1]);

        let (value, consumed) = decode_first(&bytes).unwrap();
        assert_eq!(value, example());
        assert_eq!(consumed, COMPACT_FIRST.len());
        assert_eq!(decode(&bytes).unwrap(), example());
    }

    #[test]
    fn test_decode_all() {
        let bytes = [0x01, 0xa1, b'a', 0x90, 0xc3];
        assert_eq!(
            decode_all(&bytes).unwrap(),
            vec![
                Value::UInt(1),
                Value::from("a"),
                Value::Array(vec![]),
                Value::Bool(true)
            ]
        );
        assert!(decode_all(&[]).unwrap().is_empty());
        assert_eq!(decode_all(&[0x01, 0xa2, b'a']), Err(Error::InsufficientData));
    }
}
