//! In-memory encode, degrade and decode stages.
//!
//! Every stage walks the framed blocks on the rayon pool. Each block owns
//! disjoint chunks of the data and redundancy buffers (`par_chunks_mut`), so
//! results land at their stream offsets without reordering or locking.

use anyhow::{Context, Result, bail};
use rayon::prelude::*;
use tracing::{debug, info};

use crate::codec::{Codec, CodecError, ReedSolomon};
use crate::degrade::{Degrader, Seed};
use crate::error::Error;
use crate::framing::{Block, Framing};
use crate::secret::SecretStream;
use crate::symbol::Symbol;
use crate::types::Degradation;
use crate::ui::progress::Bar;

/// Output of the encode stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encoded {
    /// Data stream, same length as the input.
    pub data: Vec<Symbol>,

    /// One redundancy segment per block, in block order.
    pub redundancy: Vec<Symbol>,

    pub framing: Framing,
}

/// Output of the decode stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    /// Recovered data stream.
    pub data: Vec<Symbol>,

    /// Symbols repaired across all blocks.
    pub corrected: usize,

    pub framing: Framing,
}

/// Block pipeline for one degradation level.
pub struct Pipeline<C: Codec = ReedSolomon> {
    codec: C,
    level: Degradation,
}

impl Pipeline<ReedSolomon> {
    pub fn new(level: Degradation) -> Result<Self> {
        let codec = ReedSolomon::new(level.redundancy()).context("failed to create Reed-Solomon codec")?;
        Ok(Self { codec, level })
    }
}

impl<C: Codec> Pipeline<C> {
    /// Builds a pipeline around a caller-supplied codec.
    pub fn with_codec(level: Degradation, codec: C) -> Result<Self> {
        if codec.redundancy() != level.redundancy() {
            bail!(CodecError::RedundancyMismatch { expected: level.redundancy(), actual: codec.redundancy() });
        }

        Ok(Self { codec, level })
    }

    /// Encodes `data` block by block.
    ///
    /// The data stream of the result is checked against `data` before it is
    /// returned; a difference means the codec touched the data region.
    pub fn encode(&self, data: &[Symbol], progress: Option<&Bar>) -> Result<Encoded> {
        let framing = Framing::new(data.len(), self.level);
        let k = framing.data_symbols();

        info!(degradation = %self.level, bytes = data.len(), blocks = framing.block_count(), remainder = framing.remainder(), "encoding data stream");

        let mut encoded = vec![0; data.len()];
        let mut redundancy = vec![0; framing.redundancy_len()];

        encoded.par_chunks_mut(k).zip(redundancy.par_chunks_mut(framing.redundancy())).zip(data.par_chunks(k)).enumerate().try_for_each(|(index, ((out, parity), input))| -> Result<()> {
            let mut block = Block::frame(input, k)?;
            self.codec.encode(&mut block).with_context(|| format!("failed to encode block {index}"))?;

            out.copy_from_slice(block.data());
            parity.copy_from_slice(block.redundancy());

            if let Some(bar) = progress {
                bar.add(1);
            }

            Ok(())
        })?;

        if let Some(offset) = encoded.iter().zip(data).position(|(out, input)| out != input) {
            bail!(Error::Verification { offset });
        }

        debug!(redundancy = redundancy.len(), "encoded data matches input");

        Ok(Encoded { data: encoded, redundancy, framing })
    }

    /// Degrades an encoded data stream with bytes borrowed from `secret`.
    ///
    /// Returns the number of positions overwritten.
    pub fn degrade(&self, encoded: &mut Encoded, secret: &SecretStream, seed: Seed, progress: Option<&Bar>) -> Result<usize> {
        Degrader::new(self.level, seed).degrade(&mut encoded.data, secret, progress)
    }

    /// Recovers a data stream from its (possibly degraded) copy and the
    /// redundancy stream written at encode time.
    ///
    /// The first block that cannot be repaired aborts the whole decode.
    pub fn decode(&self, data: &[Symbol], redundancy: &[Symbol], progress: Option<&Bar>) -> Result<Decoded> {
        let framing = Framing::new(data.len(), self.level);
        let k = framing.data_symbols();

        if redundancy.len() != framing.redundancy_len() {
            bail!(Error::RedundancyLength { expected: framing.redundancy_len(), actual: redundancy.len(), blocks: framing.block_count() });
        }

        info!(degradation = %self.level, bytes = data.len(), blocks = framing.block_count(), "decoding data stream");

        let mut recovered = vec![0; data.len()];

        let corrected = recovered
            .par_chunks_mut(k)
            .zip(data.par_chunks(k))
            .zip(redundancy.par_chunks(framing.redundancy()))
            .enumerate()
            .map(|(index, ((out, input), parity))| -> Result<usize> {
                let mut block = Block::with_redundancy(input, parity, k)?;

                let corrected = match self.codec.decode(&mut block) {
                    Ok(corrected) => corrected,
                    Err(e @ CodecError::TooManyErrors { capacity }) => return Err(anyhow::Error::new(e).context(Error::Uncorrectable { block: index, capacity })),
                    Err(e) => return Err(anyhow::Error::new(e).context(format!("failed to decode block {index}"))),
                };

                if corrected > 0 {
                    debug!(block = index, corrected, "block repaired");
                }

                out.copy_from_slice(block.data());

                if let Some(bar) = progress {
                    bar.add(1);
                }

                Ok(corrected)
            })
            .try_reduce(|| 0, |a, b| Ok(a + b))?;

        info!(corrected, "data stream recovered");

        Ok(Decoded { data: recovered, corrected, framing })
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use strum::IntoEnumIterator;

    use super::*;
    use crate::config::SEED_LEN;

    fn sample(len: usize) -> Vec<u8> {
        (0..len).map(|i| (i * 131 + 17) as u8).collect()
    }

    fn secret() -> SecretStream {
        SecretStream::from_vec((0..=255).rev().collect())
    }

    /// Codec that scribbles over the data region.
    struct Tampering;

    impl Codec for Tampering {
        fn redundancy(&self) -> usize {
            130
        }

        fn encode(&self, block: &mut Block) -> Result<(), CodecError> {
            block.data_region_mut()[0] ^= 1;
            Ok(())
        }

        fn decode(&self, _block: &mut Block) -> Result<usize, CodecError> {
            Ok(0)
        }
    }

    #[test]
    fn test_encode_layout() {
        let pipeline = Pipeline::new(Degradation::P25).unwrap();
        let data = sample(510);

        let encoded = pipeline.encode(&data, None).unwrap();

        assert_eq!(encoded.data, data);
        assert_eq!(encoded.redundancy.len(), 5 * 130);
        assert_eq!(encoded.framing.block_count(), 5);
    }

    #[test]
    fn test_redundancy_segments_match_per_block_encoding() {
        let pipeline = Pipeline::new(Degradation::P20).unwrap();
        let data = sample(151 * 2 + 9);
        let encoded = pipeline.encode(&data, None).unwrap();
        let rs = ReedSolomon::new(104).unwrap();

        for (index, chunk) in data.chunks(151).enumerate() {
            let mut block = Block::frame(chunk, 151).unwrap();
            rs.encode(&mut block).unwrap();
            assert_eq!(&encoded.redundancy[encoded.framing.redundancy_range(index)], block.redundancy());
        }
    }

    #[test]
    fn test_round_trip_every_level_and_shape() {
        for level in Degradation::iter() {
            let k = level.data_symbols();
            let pipeline = Pipeline::new(level).unwrap();

            for len in [1, k - 1, k, k + 1, 3 * k, 3 * k + 2] {
                let data = sample(len);
                let mut encoded = pipeline.encode(&data, None).unwrap();
                pipeline.degrade(&mut encoded, &secret(), Seed::new([len as u8; SEED_LEN]), None).unwrap();

                let decoded = pipeline.decode(&encoded.data, &encoded.redundancy, None).unwrap();
                assert_eq!(decoded.data, data, "{level} len {len}");
            }
        }
    }

    #[test]
    fn test_undegraded_decode_corrects_nothing() {
        let pipeline = Pipeline::new(Degradation::P10).unwrap();
        let data = sample(1000);
        let encoded = pipeline.encode(&data, None).unwrap();

        let decoded = pipeline.decode(&encoded.data, &encoded.redundancy, None).unwrap();

        assert_eq!(decoded.corrected, 0);
        assert_eq!(decoded.data, data);
    }

    #[test]
    fn test_degraded_decode_reports_corrections() {
        let pipeline = Pipeline::new(Degradation::P25).unwrap();
        let data = vec![0u8; 500];
        let mut encoded = pipeline.encode(&data, None).unwrap();
        let changed = {
            pipeline.degrade(&mut encoded, &SecretStream::from_vec(vec![0xEE; 125]), Seed::new([4; SEED_LEN]), None).unwrap();
            encoded.data.iter().filter(|&&s| s != 0).count()
        };

        let decoded = pipeline.decode(&encoded.data, &encoded.redundancy, None).unwrap();

        assert_eq!(changed, 4 * 65);
        assert_eq!(decoded.corrected, changed);
        assert_eq!(decoded.data, data);
    }

    #[test]
    fn test_over_corrupted_block_fails() {
        let pipeline = Pipeline::new(Degradation::P25).unwrap();
        let data = sample(400);
        let mut encoded = pipeline.encode(&data, None).unwrap();

        for symbol in &mut encoded.data[125..225] {
            *symbol = !*symbol;
        }

        let err = pipeline.decode(&encoded.data, &encoded.redundancy, None).unwrap_err();

        assert_eq!(err.downcast_ref::<Error>(), Some(&Error::Uncorrectable { block: 1, capacity: 65 }));
    }

    #[test]
    fn test_redundancy_length_mismatch() {
        let pipeline = Pipeline::new(Degradation::P5).unwrap();
        let data = sample(300);
        let encoded = pipeline.encode(&data, None).unwrap();

        let err = pipeline.decode(&data, &encoded.redundancy[..26], None).unwrap_err();

        assert_eq!(err.downcast_ref::<Error>(), Some(&Error::RedundancyLength { expected: 52, actual: 26, blocks: 2 }));
    }

    #[test]
    fn test_empty_stream() {
        let pipeline = Pipeline::new(Degradation::P15).unwrap();

        let encoded = pipeline.encode(&[], None).unwrap();
        assert!(encoded.data.is_empty());
        assert!(encoded.redundancy.is_empty());

        let decoded = pipeline.decode(&[], &[], None).unwrap();
        assert!(decoded.data.is_empty());
    }

    #[test]
    fn test_tampering_codec_fails_verification() {
        let pipeline = Pipeline::with_codec(Degradation::P25, Tampering).unwrap();

        let err = pipeline.encode(&sample(300), None).unwrap_err();

        assert_eq!(err.downcast_ref::<Error>(), Some(&Error::Verification { offset: 0 }));
    }

    #[test]
    fn test_with_codec_rejects_mismatch() {
        assert!(Pipeline::with_codec(Degradation::P5, Tampering).is_err());
    }

    #[test]
    fn test_progress_counts_blocks() {
        let pipeline = Pipeline::new(Degradation::P25).unwrap();
        let bar = Bar::new(5, "Encoding...").unwrap();

        pipeline.encode(&sample(510), Some(&bar)).unwrap();

        assert_eq!(bar.position(), 5);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_round_trip_without_degradation(data in prop::collection::vec(any::<u8>(), 0..1500), level in prop::sample::select(Degradation::iter().collect::<Vec<_>>())) {
            let pipeline = Pipeline::new(level).unwrap();
            let encoded = pipeline.encode(&data, None).unwrap();
            let decoded = pipeline.decode(&encoded.data, &encoded.redundancy, None).unwrap();

            prop_assert_eq!(decoded.corrected, 0);
            prop_assert_eq!(decoded.data, data);
        }

        #[test]
        fn prop_round_trip_with_degradation(data in prop::collection::vec(any::<u8>(), 1..1500), secret in prop::collection::vec(any::<u8>(), 125..300), seed in any::<[u8; SEED_LEN]>(), level in prop::sample::select(Degradation::iter().collect::<Vec<_>>())) {
            let pipeline = Pipeline::new(level).unwrap();
            let mut encoded = pipeline.encode(&data, None).unwrap();
            pipeline.degrade(&mut encoded, &SecretStream::from_vec(secret), Seed::new(seed), None).unwrap();

            let decoded = pipeline.decode(&encoded.data, &encoded.redundancy, None).unwrap();

            prop_assert_eq!(decoded.data, data);
        }
    }
}
