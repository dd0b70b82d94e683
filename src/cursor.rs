//! Sequential reader over a [`ByteSource`]
//!
//! The cursor caches the region covering the current position and only asks
//! the source to resolve a new one after the position walks off the end of
//! the cached region, so a front-to-back scan resolves each region once.

use alloc::borrow::Cow;
use alloc::vec::Vec;

use crate::error::{Error, Result};
use crate::source::ByteSource;

/// Cursor for reading a byte source with position tracking
#[derive(Debug)]
pub struct Cursor<'s, S: ByteSource + ?Sized> {
    source: &'s S,
    pos: usize,
    region: &'s [u8],
    region_start: usize,
}

impl<'s, S: ByteSource + ?Sized> Cursor<'s, S> {
    /// Create a cursor positioned at the first byte
    #[inline]
    pub fn new(source: &'s S) -> Self {
        Self {
            source,
            pos: 0,
            region: &[],
            region_start: 0,
        }
    }

    /// Current logical read position
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Get remaining bytes in cursor
    #[inline]
    pub fn remaining(&self) -> usize {
        self.source.len().saturating_sub(self.pos)
    }

    /// Check if cursor is at end
    #[inline]
    pub fn is_at_end(&self) -> bool {
        self.pos >= self.source.len()
    }

    /// Make the cached region cover `pos`
    ///
    /// Returns false when the source is exhausted.
    #[inline]
    fn resolve(&mut self) -> bool {
        if self.pos - self.region_start < self.region.len() {
            return true;
        }
        if self.is_at_end() {
            return false;
        }
        match self.source.region_containing(self.pos) {
            Some((start, region)) => {
                self.region_start = start;
                self.region = region;
                true
            }
            None => false,
        }
    }

    /// Read the next byte, or `None` at end of input
    #[inline]
    pub fn next_byte(&mut self) -> Option<u8> {
        if !self.resolve() {
            return None;
        }
        let value = self.region[self.pos - self.region_start];
        self.pos += 1;
        Some(value)
    }

    /// Read the next `count` bytes
    ///
    /// Borrows straight from the source when the range sits inside one
    /// region; a range that crosses a region boundary is gathered into an
    /// owned buffer.
    pub fn next_slice(&mut self, count: usize) -> Result<Cow<'s, [u8]>> {
        if count > self.remaining() {
            return Err(Error::InsufficientData);
        }
        if count == 0 {
            return Ok(Cow::Borrowed(&[]));
        }
        if !self.resolve() {
            return Err(Error::InsufficientData);
        }

        let offset = self.pos - self.region_start;
        if offset + count <= self.region.len() {
            let bytes = &self.region[offset..offset + count];
            self.pos += count;
            return Ok(Cow::Borrowed(bytes));
        }

        let mut gathered = Vec::with_capacity(count);
        while gathered.len() < count {
            if !self.resolve() {
                return Err(Error::InsufficientData);
            }
            let offset = self.pos - self.region_start;
            let take = (self.region.len() - offset).min(count - gathered.len());
            gathered.extend_from_slice(&self.region[offset..offset + take]);
            self.pos += take;
        }
        Ok(Cow::Owned(gathered))
    }

    /// Read exactly `N` bytes into an array
    #[inline]
    fn next_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        if N > self.remaining() {
            return Err(Error::InsufficientData);
        }
        let mut out = [0u8; N];
        for slot in out.iter_mut() {
            *slot = self.next_byte().ok_or(Error::InsufficientData)?;
        }
        Ok(out)
    }

    /// Read a u8 value
    #[inline]
    pub fn get_u8(&mut self) -> Result<u8> {
        self.next_byte().ok_or(Error::InsufficientData)
    }

    /// Read a u16 value (big-endian)
    #[inline]
    pub fn get_u16(&mut self) -> Result<u16> {
        Ok(u16::from_be_bytes(self.next_array()?))
    }

    /// Read a u32 value (big-endian)
    #[inline]
    pub fn get_u32(&mut self) -> Result<u32> {
        Ok(u32::from_be_bytes(self.next_array()?))
    }

    /// Read a u64 value (big-endian)
    #[inline]
    pub fn get_u64(&mut self) -> Result<u64> {
        Ok(u64::from_be_bytes(self.next_array()?))
    }

    /// Read an i8 value
    #[inline]
    pub fn get_i8(&mut self) -> Result<i8> {
        Ok(self.get_u8()? as i8)
    }

    /// Read an i16 value (big-endian)
    #[inline]
    pub fn get_i16(&mut self) -> Result<i16> {
        Ok(i16::from_be_bytes(self.next_array()?))
    }

    /// Read an i32 value (big-endian)
    #[inline]
    pub fn get_i32(&mut self) -> Result<i32> {
        Ok(i32::from_be_bytes(self.next_array()?))
    }

    /// Read an i64 value (big-endian)
    #[inline]
    pub fn get_i64(&mut self) -> Result<i64> {
        Ok(i64::from_be_bytes(self.next_array()?))
    }

    /// Read an IEEE 754 single (big-endian)
    #[inline]
    pub fn get_f32(&mut self) -> Result<f32> {
        Ok(f32::from_be_bytes(self.next_array()?))
    }

    /// Read an IEEE 754 double (big-endian)
    #[inline]
    pub fn get_f64(&mut self) -> Result<f64> {
        Ok(f64::from_be_bytes(self.next_array()?))
    }
}
