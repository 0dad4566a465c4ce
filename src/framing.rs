//! Block framing.
//!
//! A stream of `L` symbols is cut into `L / k` full blocks followed by at most
//! one shorter remainder block of `L % k` symbols. Every block, whatever its
//! data length, is coded inside a [`BLOCK_SIZE`] container whose first `k`
//! symbols are the data region (zero-padded past the block's data) and whose
//! last `BLOCK_SIZE - k` symbols are the redundancy region.

use std::ops::Range;

use anyhow::{Result, ensure};

use crate::config::BLOCK_SIZE;
use crate::symbol::Symbol;
use crate::types::Degradation;

/// Layout of a data stream and its redundancy stream for one degradation level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Framing {
    len: usize,
    data_symbols: usize,
    redundancy: usize,
}

impl Framing {
    pub fn new(len: usize, level: Degradation) -> Self {
        Self { len, data_symbols: level.data_symbols(), redundancy: level.redundancy() }
    }

    /// Length of the data stream.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Data symbols per full block (`k`).
    #[inline]
    pub fn data_symbols(&self) -> usize {
        self.data_symbols
    }

    /// Redundancy symbols per block (`n - k`).
    #[inline]
    pub fn redundancy(&self) -> usize {
        self.redundancy
    }

    #[inline]
    pub fn full_blocks(&self) -> usize {
        self.len / self.data_symbols
    }

    /// Data length of the trailing short block, zero when there is none.
    #[inline]
    pub fn remainder(&self) -> usize {
        self.len % self.data_symbols
    }

    /// Full blocks plus the remainder block, if any.
    #[inline]
    pub fn block_count(&self) -> usize {
        self.len.div_ceil(self.data_symbols)
    }

    /// Bytes of the redundancy stream: one segment per block.
    #[inline]
    pub fn redundancy_len(&self) -> usize {
        self.block_count() * self.redundancy
    }

    /// Range of block `index` inside the data stream.
    pub fn block_range(&self, index: usize) -> Range<usize> {
        let start = (index * self.data_symbols).min(self.len);
        let end = (start + self.data_symbols).min(self.len);
        start..end
    }

    /// Range of block `index`'s segment inside the redundancy stream.
    pub fn redundancy_range(&self, index: usize) -> Range<usize> {
        let start = index * self.redundancy;
        start..start + self.redundancy
    }
}

/// One coding container of [`BLOCK_SIZE`] symbols.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Block {
    symbols: [Symbol; BLOCK_SIZE],
    data_symbols: usize,
    len: usize,
}

impl Block {
    /// Frames `data` into a zero-padded container with `data_symbols` data
    /// positions and an empty redundancy region.
    pub fn frame(data: &[Symbol], data_symbols: usize) -> Result<Self> {
        ensure!(data_symbols > 0 && data_symbols < BLOCK_SIZE, "data region of {} symbols does not fit a {}-symbol block", data_symbols, BLOCK_SIZE);
        ensure!((BLOCK_SIZE - data_symbols).is_multiple_of(2), "redundancy of {} symbols is odd", BLOCK_SIZE - data_symbols);
        ensure!(data.len() <= data_symbols, "block data of {} symbols exceeds data region of {}", data.len(), data_symbols);

        let mut symbols = [0; BLOCK_SIZE];
        symbols[..data.len()].copy_from_slice(data);

        Ok(Self { symbols, data_symbols, len: data.len() })
    }

    /// Frames `data` and fills the redundancy region from a stored segment.
    pub fn with_redundancy(data: &[Symbol], redundancy: &[Symbol], data_symbols: usize) -> Result<Self> {
        let mut block = Self::frame(data, data_symbols)?;
        ensure!(redundancy.len() == block.redundancy_count(), "redundancy segment of {} symbols, block expects {}", redundancy.len(), block.redundancy_count());

        block.redundancy_mut().copy_from_slice(redundancy);
        Ok(block)
    }

    /// Number of stream symbols carried by this block.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn data_symbols(&self) -> usize {
        self.data_symbols
    }

    #[inline]
    pub fn redundancy_count(&self) -> usize {
        BLOCK_SIZE - self.data_symbols
    }

    /// The block's stream symbols, without zero padding.
    #[inline]
    pub fn data(&self) -> &[Symbol] {
        &self.symbols[..self.len]
    }

    /// The whole data region, including zero padding.
    #[inline]
    pub fn data_region(&self) -> &[Symbol] {
        &self.symbols[..self.data_symbols]
    }

    #[inline]
    pub fn data_region_mut(&mut self) -> &mut [Symbol] {
        &mut self.symbols[..self.data_symbols]
    }

    #[inline]
    pub fn redundancy(&self) -> &[Symbol] {
        &self.symbols[self.data_symbols..]
    }

    #[inline]
    pub fn redundancy_mut(&mut self) -> &mut [Symbol] {
        &mut self.symbols[self.data_symbols..]
    }

    #[inline]
    pub fn symbols(&self) -> &[Symbol; BLOCK_SIZE] {
        &self.symbols
    }
}
