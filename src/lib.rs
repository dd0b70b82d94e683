//! segpack: MessagePack codec over contiguous and scatter-gather byte sources
//!
//! This crate converts dynamically typed [`Value`] trees to and from the
//! MessagePack wire format. The decoder reads through the [`ByteSource`]
//! abstraction, so input split across several discontiguous regions decodes
//! exactly like the same bytes in one buffer, without first copying them
//! together.
//!
//! # Data Flow
//!
//! ```text
//! bytes ──> ByteSource ──> Cursor ──> Decoder ──> Value
//!           (Contiguous |
//!            Segmented)
//!
//! Value ──> Encoder ──> Sink (Vec<u8> | ValueEncoder over &mut [u8])
//! ```
//!
//! # Features
//!
//! - Zero-copy region lookup; each region is resolved once per sequential scan
//! - Precise failures: truncated input vs. malformed tag
//! - Configurable nesting limit for untrusted input
//! - Allocation-free encoding into user-provided buffers
//! - Legacy raw-format compatibility mode
//! - `no_std` support with `alloc`
//!
//! # Example
//!
//! ```rust
//! use segpack::*;
//!
//! let value = Value::Map(vec![
//!     (Value::from("compact"), Value::from(true)),
//!     (Value::from("schema"), Value::from(0u8)),
//! ]);
//!
//! let bytes = encode(&value);
//! assert_eq!(bytes[0], 0x82); // fixmap with two entries
//!
//! // The same bytes split across two regions decode identically
//! let (head, tail) = bytes.split_at(5);
//! assert_eq!(decode_segments(&[head, tail])?, value);
//!
//! // A truncated buffer is reported as such
//! assert_eq!(decode(&bytes[..bytes.len() - 1]), Err(Error::InsufficientData));
//! # Ok::<(), segpack::Error>(())
//! ```

#![no_std]
#![deny(unsafe_code)]
#![warn(missing_docs)]

#[cfg(feature = "std")]
extern crate std;

extern crate alloc;

pub mod cursor;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod marker;
pub mod source;
pub mod value;

#[cfg(all(feature = "std", test))]
pub mod bench;

// Re-export main types
pub use cursor::Cursor;
pub use decoder::{
    decode, decode_all, decode_first, decode_from, decode_segments, DecodeConfig, Decoder,
};
pub use encoder::{encode, encode_with, encoded_len, EncodeConfig, Sink, ValueEncoder};
pub use error::Error;
pub use marker::Marker;
pub use source::{ByteSource, Contiguous, Segmented};
pub use value::Value;

/// Default maximum container nesting accepted by the decoder
pub const DEFAULT_MAX_DEPTH: usize = 256;
