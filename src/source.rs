//! Byte sources for the decoder
//!
//! A source is a fixed-length, totally ordered run of bytes. It does not have
//! to be physically contiguous: [`Segmented`] stitches several borrowed
//! regions together without copying them, which is what scatter-gather
//! receive buffers hand back.

use alloc::vec::Vec;

/// Random access to a logical byte sequence by region
pub trait ByteSource {
    /// Total logical length in bytes
    fn len(&self) -> usize;

    /// Check if the source holds no bytes
    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Resolve the region covering logical `index`
    ///
    /// Returns the region's starting logical offset and its bytes, or `None`
    /// when `index >= len()`. Repeated calls with the same index return the
    /// same region.
    fn region_containing(&self, index: usize) -> Option<(usize, &[u8])>;
}

/// A single flat buffer
#[derive(Debug, Clone, Copy)]
pub struct Contiguous<'a> {
    buf: &'a [u8],
}

impl<'a> Contiguous<'a> {
    /// Wrap a borrowed buffer
    #[inline]
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf }
    }

    /// The wrapped buffer
    #[inline]
    pub fn as_slice(&self) -> &'a [u8] {
        self.buf
    }
}

impl<'a> From<&'a [u8]> for Contiguous<'a> {
    fn from(buf: &'a [u8]) -> Self {
        Self::new(buf)
    }
}

impl ByteSource for Contiguous<'_> {
    #[inline]
    fn len(&self) -> usize {
        self.buf.len()
    }

    #[inline]
    fn region_containing(&self, index: usize) -> Option<(usize, &[u8])> {
        if index < self.buf.len() {
            Some((0, self.buf))
        } else {
            None
        }
    }
}

/// Ordered, disjoint regions concatenated into one logical sequence
///
/// Region `k` covers `[offsets[k], offsets[k] + regions[k].len())`. Empty
/// regions are dropped at construction so every stored region owns at least
/// one logical index.
#[derive(Debug, Clone, Default)]
pub struct Segmented<'a> {
    regions: Vec<&'a [u8]>,
    offsets: Vec<usize>,
    len: usize,
}

impl<'a> Segmented<'a> {
    /// Build a source from regions in logical order
    pub fn new<I>(regions: I) -> Self
    where
        I: IntoIterator<Item = &'a [u8]>,
    {
        let mut source = Self::default();
        for region in regions {
            source.push(region);
        }
        log::trace!(
            "segmented source: {} regions, {} bytes",
            source.regions.len(),
            source.len
        );
        source
    }

    /// Append a region after the current end
    pub fn push(&mut self, region: &'a [u8]) {
        if region.is_empty() {
            return;
        }
        self.offsets.push(self.len);
        self.regions.push(region);
        self.len += region.len();
    }

    /// Number of non-empty regions
    #[inline]
    pub fn region_count(&self) -> usize {
        self.regions.len()
    }

    /// The stored regions in logical order
    #[inline]
    pub fn regions(&self) -> &[&'a [u8]] {
        &self.regions
    }

    /// Index of the region covering `index`
    #[inline]
    fn region_index(&self, index: usize) -> Option<usize> {
        if index >= self.len {
            return None;
        }
        // offsets[0] == 0 whenever len > 0, so the partition point is >= 1
        Some(self.offsets.partition_point(|&start| start <= index) - 1)
    }
}

impl<'a> FromIterator<&'a [u8]> for Segmented<'a> {
    fn from_iter<I: IntoIterator<Item = &'a [u8]>>(iter: I) -> Self {
        Self::new(iter)
    }
}

impl ByteSource for Segmented<'_> {
    #[inline]
    fn len(&self) -> usize {
        self.len
    }

    #[inline]
    fn region_containing(&self, index: usize) -> Option<(usize, &[u8])> {
        let k = self.region_index(index)?;
        Some((self.offsets[k], self.regions[k]))
    }
}
