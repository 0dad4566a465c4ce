//! Block codec boundary.
//!
//! The pipeline only needs two operations over a framed [`Block`]: fill its
//! redundancy region, and repair its data region from that redundancy. The
//! Galois-field arithmetic behind them stays inside the implementation.

use thiserror::Error;

use crate::framing::Block;

mod reed_solomon;

pub use self::reed_solomon::ReedSolomon;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// Redundancy count cannot be served by this codec.
    #[error("codec configured for {expected} redundancy symbols, block has {actual}")]
    RedundancyMismatch {
        /// Redundancy the codec was built for.
        expected: usize,
        /// Redundancy region of the block.
        actual: usize,
    },

    /// Redundancy count is zero, odd, or leaves no room for data.
    #[error("invalid redundancy count {0}")]
    InvalidRedundancy(usize),

    /// More symbol errors than half the redundancy.
    #[error("too many errors to correct, capacity is {capacity} symbols")]
    TooManyErrors {
        /// Correction capacity `t`.
        capacity: usize,
    },
}

/// Error-correcting block codec.
///
/// Implementations must be systematic: `encode` never touches the data region,
/// and `decode` only rewrites it when the whole block is repairable.
pub trait Codec: Send + Sync {
    /// Redundancy symbols per block.
    fn redundancy(&self) -> usize;

    /// Correctable symbols per block.
    fn capacity(&self) -> usize {
        self.redundancy() / 2
    }

    /// Fills `block`'s redundancy region from its data region.
    fn encode(&self, block: &mut Block) -> Result<(), CodecError>;

    /// Repairs `block`'s data region in place and returns how many data
    /// symbols were changed.
    fn decode(&self, block: &mut Block) -> Result<usize, CodecError>;
}
