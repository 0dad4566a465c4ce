//! Reed-Solomon block codec over GF(2^8).

use ::reed_solomon::{Decoder, Encoder};

use crate::codec::{Codec, CodecError};
use crate::config::BLOCK_SIZE;
use crate::framing::Block;

/// Reed-Solomon codec for one redundancy count.
///
/// The generator polynomial depends only on the redundancy count, so it is
/// built once and shared by every block.
pub struct ReedSolomon {
    encoder: Encoder,
    decoder: Decoder,
    redundancy: usize,
}

impl ReedSolomon {
    /// Creates a codec appending `redundancy` symbols per block.
    ///
    /// # Arguments
    /// * `redundancy` - Even number of redundancy symbols, below the block size
    pub fn new(redundancy: usize) -> Result<Self, CodecError> {
        if redundancy == 0 || redundancy >= BLOCK_SIZE || !redundancy.is_multiple_of(2) {
            return Err(CodecError::InvalidRedundancy(redundancy));
        }

        Ok(Self { encoder: Encoder::new(redundancy), decoder: Decoder::new(redundancy), redundancy })
    }

    fn check(&self, block: &Block) -> Result<(), CodecError> {
        if block.redundancy_count() == self.redundancy {
            Ok(())
        } else {
            Err(CodecError::RedundancyMismatch { expected: self.redundancy, actual: block.redundancy_count() })
        }
    }
}

impl Codec for ReedSolomon {
    #[inline]
    fn redundancy(&self) -> usize {
        self.redundancy
    }

    fn encode(&self, block: &mut Block) -> Result<(), CodecError> {
        self.check(block)?;

        let codeword = self.encoder.encode(block.data_region());
        block.redundancy_mut().copy_from_slice(codeword.ecc());

        Ok(())
    }

    fn decode(&self, block: &mut Block) -> Result<usize, CodecError> {
        self.check(block)?;

        let capacity = self.capacity();
        let mut received = *block.symbols();
        let corrected = self.decoder.correct(&mut received, None).map_err(|_| CodecError::TooManyErrors { capacity })?;
        let repaired = corrected.data();

        // Padding past the block's data is known to be zero; a decoder that
        // rewrote it converged on the wrong codeword.
        if repaired[block.len()..].iter().any(|&s| s != 0) {
            return Err(CodecError::TooManyErrors { capacity });
        }

        let changed = block.data_region().iter().zip(repaired).filter(|(before, after)| before != after).count();
        if changed > capacity {
            return Err(CodecError::TooManyErrors { capacity });
        }

        block.data_region_mut().copy_from_slice(repaired);

        Ok(changed)
    }
}
