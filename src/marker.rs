//! MessagePack format tags
//!
//! Every encoded value starts with a single tag byte. Fixed forms pack a small
//! value or length into the tag itself; the rest are followed by a big-endian
//! length or value field.
//!
//! ```text
//! 0x00..=0x7f  positive fixint      0xc4..=0xc6  bin 8/16/32
//! 0x80..=0x8f  fixmap               0xc7..=0xc9  ext 8/16/32
//! 0x90..=0x9f  fixarray             0xca..=0xcb  float 32/64
//! 0xa0..=0xbf  fixstr               0xcc..=0xcf  uint 8/16/32/64
//! 0xc0         nil                  0xd0..=0xd3  int 8/16/32/64
//! 0xc1         (never used)         0xd4..=0xd8  fixext 1/2/4/8/16
//! 0xc2, 0xc3   false, true          0xd9..=0xdb  str 8/16/32
//!                                   0xdc..=0xdd  array 16/32
//!                                   0xde..=0xdf  map 16/32
//! 0xe0..=0xff  negative fixint
//! ```

/// Tag byte constants for the non-fixed formats
pub mod tags {
    /// Nil
    pub const NIL: u8 = 0xc0;
    /// Reserved, never produced by a conforming encoder
    pub const RESERVED: u8 = 0xc1;
    /// Boolean false
    pub const FALSE: u8 = 0xc2;
    /// Boolean true
    pub const TRUE: u8 = 0xc3;
    /// Binary with 8-bit length
    pub const BIN8: u8 = 0xc4;
    /// Binary with 16-bit length
    pub const BIN16: u8 = 0xc5;
    /// Binary with 32-bit length
    pub const BIN32: u8 = 0xc6;
    /// Extension with 8-bit length
    pub const EXT8: u8 = 0xc7;
    /// Extension with 16-bit length
    pub const EXT16: u8 = 0xc8;
    /// Extension with 32-bit length
    pub const EXT32: u8 = 0xc9;
    /// IEEE 754 single precision
    pub const FLOAT32: u8 = 0xca;
    /// IEEE 754 double precision
    pub const FLOAT64: u8 = 0xcb;
    /// Unsigned 8-bit integer
    pub const UINT8: u8 = 0xcc;
    /// Unsigned 16-bit integer
    pub const UINT16: u8 = 0xcd;
    /// Unsigned 32-bit integer
    pub const UINT32: u8 = 0xce;
    /// Unsigned 64-bit integer
    pub const UINT64: u8 = 0xcf;
    /// Signed 8-bit integer
    pub const INT8: u8 = 0xd0;
    /// Signed 16-bit integer
    pub const INT16: u8 = 0xd1;
    /// Signed 32-bit integer
    pub const INT32: u8 = 0xd2;
    /// Signed 64-bit integer
    pub const INT64: u8 = 0xd3;
    /// Extension with 1-byte payload
    pub const FIXEXT1: u8 = 0xd4;
    /// Extension with 2-byte payload
    pub const FIXEXT2: u8 = 0xd5;
    /// Extension with 4-byte payload
    pub const FIXEXT4: u8 = 0xd6;
    /// Extension with 8-byte payload
    pub const FIXEXT8: u8 = 0xd7;
    /// Extension with 16-byte payload
    pub const FIXEXT16: u8 = 0xd8;
    /// String with 8-bit length
    pub const STR8: u8 = 0xd9;
    /// String with 16-bit length
    pub const STR16: u8 = 0xda;
    /// String with 32-bit length
    pub const STR32: u8 = 0xdb;
    /// Array with 16-bit count
    pub const ARRAY16: u8 = 0xdc;
    /// Array with 32-bit count
    pub const ARRAY32: u8 = 0xdd;
    /// Map with 16-bit count
    pub const MAP16: u8 = 0xde;
    /// Map with 32-bit count
    pub const MAP32: u8 = 0xdf;

    /// Top of the positive fixint range
    pub const POS_FIXINT_MAX: u8 = 0x7f;
    /// Base of the fixmap range (low nibble is the entry count)
    pub const FIXMAP: u8 = 0x80;
    /// Base of the fixarray range (low nibble is the item count)
    pub const FIXARRAY: u8 = 0x90;
    /// Base of the fixstr range (low five bits are the length)
    pub const FIXSTR: u8 = 0xa0;
    /// Base of the negative fixint range
    pub const NEG_FIXINT: u8 = 0xe0;
}

/// Largest entry count a fixmap or fixarray can carry
pub const FIX_CONTAINER_MAX: usize = 15;

/// Largest length a fixstr can carry
pub const FIXSTR_MAX: usize = 31;

/// A decoded format tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    /// 0..=127 stored in the tag
    FixPos(u8),
    /// -32..=-1 stored in the tag
    FixNeg(i8),
    /// Map with up to 15 entries
    FixMap(u8),
    /// Array with up to 15 items
    FixArray(u8),
    /// String with up to 31 bytes
    FixStr(u8),
    /// nil
    Nil,
    /// The single unassigned tag
    Reserved,
    /// false
    False,
    /// true
    True,
    /// bin 8
    Bin8,
    /// bin 16
    Bin16,
    /// bin 32
    Bin32,
    /// ext 8
    Ext8,
    /// ext 16
    Ext16,
    /// ext 32
    Ext32,
    /// float 32
    F32,
    /// float 64
    F64,
    /// uint 8
    U8,
    /// uint 16
    U16,
    /// uint 32
    U32,
    /// uint 64
    U64,
    /// int 8
    I8,
    /// int 16
    I16,
    /// int 32
    I32,
    /// int 64
    I64,
    /// fixext 1
    FixExt1,
    /// fixext 2
    FixExt2,
    /// fixext 4
    FixExt4,
    /// fixext 8
    FixExt8,
    /// fixext 16
    FixExt16,
    /// str 8
    Str8,
    /// str 16
    Str16,
    /// str 32
    Str32,
    /// array 16
    Array16,
    /// array 32
    Array32,
    /// map 16
    Map16,
    /// map 32
    Map32,
}

impl Marker {
    /// Classify a tag byte
    ///
    /// Total over all 256 byte values; `0xc1` maps to [`Marker::Reserved`].
    #[inline]
    pub const fn from_u8(n: u8) -> Marker {
        use self::tags::*;

        match n {
            0x00..=0x7f => Marker::FixPos(n),
            0x80..=0x8f => Marker::FixMap(n & 0x0f),
            0x90..=0x9f => Marker::FixArray(n & 0x0f),
            0xa0..=0xbf => Marker::FixStr(n & 0x1f),
            0xe0..=0xff => Marker::FixNeg(n as i8),
            NIL => Marker::Nil,
            FALSE => Marker::False,
            TRUE => Marker::True,
            BIN8 => Marker::Bin8,
            BIN16 => Marker::Bin16,
            BIN32 => Marker::Bin32,
            EXT8 => Marker::Ext8,
            EXT16 => Marker::Ext16,
            EXT32 => Marker::Ext32,
            FLOAT32 => Marker::F32,
            FLOAT64 => Marker::F64,
            UINT8 => Marker::U8,
            UINT16 => Marker::U16,
            UINT32 => Marker::U32,
            UINT64 => Marker::U64,
            INT8 => Marker::I8,
            INT16 => Marker::I16,
            INT32 => Marker::I32,
            INT64 => Marker::I64,
            FIXEXT1 => Marker::FixExt1,
            FIXEXT2 => Marker::FixExt2,
            FIXEXT4 => Marker::FixExt4,
            FIXEXT8 => Marker::FixExt8,
            FIXEXT16 => Marker::FixExt16,
            STR8 => Marker::Str8,
            STR16 => Marker::Str16,
            STR32 => Marker::Str32,
            ARRAY16 => Marker::Array16,
            ARRAY32 => Marker::Array32,
            MAP16 => Marker::Map16,
            MAP32 => Marker::Map32,
            _ => Marker::Reserved,
        }
    }

    /// Tag byte for this marker
    ///
    /// Payloads of the fixed forms are masked to their field width.
    #[inline]
    pub const fn to_u8(self) -> u8 {
        use self::tags::*;

        match self {
            Marker::FixPos(n) => n & POS_FIXINT_MAX,
            Marker::FixNeg(n) => (n as u8) | NEG_FIXINT,
            Marker::FixMap(n) => FIXMAP | (n & 0x0f),
            Marker::FixArray(n) => FIXARRAY | (n & 0x0f),
            Marker::FixStr(n) => FIXSTR | (n & 0x1f),
            Marker::Nil => NIL,
            Marker::Reserved => RESERVED,
            Marker::False => FALSE,
            Marker::True => TRUE,
            Marker::Bin8 => BIN8,
            Marker::Bin16 => BIN16,
            Marker::Bin32 => BIN32,
            Marker::Ext8 => EXT8,
            Marker::Ext16 => EXT16,
            Marker::Ext32 => EXT32,
            Marker::F32 => FLOAT32,
            Marker::F64 => FLOAT64,
            Marker::U8 => UINT8,
            Marker::U16 => UINT16,
            Marker::U32 => UINT32,
            Marker::U64 => UINT64,
            Marker::I8 => INT8,
            Marker::I16 => INT16,
            Marker::I32 => INT32,
            Marker::I64 => INT64,
            Marker::FixExt1 => FIXEXT1,
            Marker::FixExt2 => FIXEXT2,
            Marker::FixExt4 => FIXEXT4,
            Marker::FixExt8 => FIXEXT8,
            Marker::FixExt16 => FIXEXT16,
            Marker::Str8 => STR8,
            Marker::Str16 => STR16,
            Marker::Str32 => STR32,
            Marker::Array16 => ARRAY16,
            Marker::Array32 => ARRAY32,
            Marker::Map16 => MAP16,
            Marker::Map32 => MAP32,
        }
    }
}
