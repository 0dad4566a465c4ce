//! Bounded degradation of an encoded data stream.
//!
//! Every block, full or remainder, goes through the same routine: pick
//! `min(t, m)` distinct positions of its `m` data symbols and overwrite each
//! with a byte drawn from the block's slice of the secret stream. At most `t`
//! symbols per block can differ afterwards, which keeps every block inside the
//! codec's correction capacity.
//!
//! Randomness comes from a ChaCha20 generator keyed by a [`Seed`]. Block `i`
//! uses stream `i` of that key, so the result depends only on the seed and the
//! inputs, never on how blocks are scheduled across threads.

use anyhow::{Context, Result, anyhow};
use rand::rngs::OsRng;
use rand::seq::index;
use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;
use rayon::prelude::*;
use tracing::{debug, info};

use crate::config::SEED_LEN;
use crate::secret::{SecretStream, SecretWindow};
use crate::symbol::Symbol;
use crate::types::Degradation;
use crate::ui::progress::Bar;

/// Key of the degradation generator.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Seed([u8; SEED_LEN]);

impl Seed {
    #[inline]
    pub fn new(bytes: [u8; SEED_LEN]) -> Self {
        Self(bytes)
    }

    /// Draws a fresh seed from the operating system.
    pub fn random() -> Result<Self> {
        let mut bytes = [0u8; SEED_LEN];
        OsRng.try_fill_bytes(&mut bytes).context("failed to read system randomness")?;
        Ok(Self(bytes))
    }

    /// Parses a seed written as hexadecimal.
    pub fn from_hex(text: &str) -> Result<Self> {
        let mut bytes = [0u8; SEED_LEN];
        hex::decode_to_slice(text.trim(), &mut bytes).map_err(|e| anyhow!("invalid seed, expected {} hex characters: {}", SEED_LEN * 2, e))?;
        Ok(Self(bytes))
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    fn block_rng(&self, index: usize) -> ChaCha20Rng {
        let mut rng = ChaCha20Rng::from_seed(self.0);
        rng.set_stream(index as u64);
        rng
    }
}

impl std::fmt::Debug for Seed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Seed(..)")
    }
}

/// Overwrites up to `capacity` distinct positions of `block` with bytes
/// picked from `secret`.
///
/// Returns the number of positions written. A written byte may coincide with
/// the original, so the number of changed symbols can be lower.
pub fn corrupt_block<R: Rng + ?Sized>(block: &mut [Symbol], secret: SecretWindow<'_>, capacity: usize, rng: &mut R) -> usize {
    let count = capacity.min(block.len());
    if count == 0 || secret.is_empty() {
        return 0;
    }

    for position in index::sample(rng, block.len(), count) {
        if let Some(byte) = secret.get(rng.gen_range(0..secret.len())) {
            block[position] = byte;
        }
    }

    count
}

/// Degradation engine for one degradation level.
pub struct Degrader {
    level: Degradation,
    seed: Seed,
}

impl Degrader {
    #[inline]
    pub fn new(level: Degradation, seed: Seed) -> Self {
        Self { level, seed }
    }

    /// Degrades `data` in place, block by block.
    ///
    /// # Arguments
    /// * `data` - Encoded data stream (without redundancy)
    /// * `secret` - Source of substitute bytes, at least `t` bytes long
    /// * `progress` - Optional bar advanced once per block
    ///
    /// # Returns
    /// Total number of positions overwritten
    pub fn degrade(&self, data: &mut [Symbol], secret: &SecretStream, progress: Option<&Bar>) -> Result<usize> {
        let capacity = self.level.capacity();
        secret.ensure_width(capacity)?;

        info!(degradation = %self.level, bytes = data.len(), secret = secret.len(), "degrading data stream");

        let written: usize = data
            .par_chunks_mut(self.level.data_symbols())
            .enumerate()
            .map(|(index, block)| {
                let mut rng = self.seed.block_rng(index);
                let written = corrupt_block(block, secret.window(index, capacity), capacity, &mut rng);

                if let Some(bar) = progress {
                    bar.add(1);
                }

                written
            })
            .sum();

        debug!(written, "degradation finished");

        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use strum::IntoEnumIterator;

    use super::*;

    fn differing(a: &[u8], b: &[u8]) -> usize {
        a.iter().zip(b).filter(|(x, y)| x != y).count()
    }

    #[test]
    fn test_corrupt_block_uses_distinct_positions() {
        let mut rng = ChaCha20Rng::from_seed([7; SEED_LEN]);
        let mut block = vec![0u8; 125];

        let written = corrupt_block(&mut block, SecretWindow::new(&[0xFF], 0, 1), 65, &mut rng);

        assert_eq!(written, 65);
        assert_eq!(block.iter().filter(|&&s| s == 0xFF).count(), 65);
    }

    #[test]
    fn test_corrupt_block_caps_at_block_length() {
        let mut rng = ChaCha20Rng::from_seed([1; SEED_LEN]);
        let mut block = vec![0u8; 5];

        assert_eq!(corrupt_block(&mut block, SecretWindow::new(&[0xAA; 125], 0, 125), 125, &mut rng), 5);
        assert_eq!(block, vec![0xAA; 5]);
    }

    #[test]
    fn test_corrupt_block_empty_inputs() {
        let mut rng = ChaCha20Rng::from_seed([1; SEED_LEN]);

        assert_eq!(corrupt_block(&mut [], SecretWindow::new(&[1, 2, 3], 0, 3), 13, &mut rng), 0);
        assert_eq!(corrupt_block(&mut [0; 10], SecretWindow::new(&[], 0, 13), 13, &mut rng), 0);
    }

    #[test]
    fn test_substitutes_come_from_block_window() {
        let secret = SecretStream::from_vec((100..200).collect());
        let degrader = Degrader::new(Degradation::P5, Seed::new([3; SEED_LEN]));
        let mut data = vec![0u8; 229 * 2];

        degrader.degrade(&mut data, &secret, None).unwrap();

        assert!(data[..229].iter().filter(|&&s| s != 0).all(|s| (100..113).contains(s)));
        assert!(data[229..].iter().filter(|&&s| s != 0).all(|s| (113..126).contains(s)));
    }

    #[test]
    fn test_same_seed_same_output() {
        let secret = SecretStream::from_vec(vec![0x5A; 80]);
        let seed = Seed::new([9; SEED_LEN]);
        let original: Vec<u8> = (0..1000).map(|i| i as u8).collect();

        let mut first = original.clone();
        let mut second = original.clone();
        Degrader::new(Degradation::P15, seed).degrade(&mut first, &secret, None).unwrap();
        Degrader::new(Degradation::P15, seed).degrade(&mut second, &secret, None).unwrap();

        assert_eq!(first, second);
        assert_ne!(first, original);
    }

    #[test]
    fn test_short_secret_rejected() {
        let secret = SecretStream::from_vec(vec![1; 64]);
        let degrader = Degrader::new(Degradation::P25, Seed::new([0; SEED_LEN]));
        let mut data = vec![0u8; 500];

        let err = degrader.degrade(&mut data, &secret, None).unwrap_err();

        assert_eq!(err.downcast_ref::<crate::error::Error>(), Some(&crate::error::Error::SecretTooShort { required: 65, actual: 64 }));
        assert_eq!(data, vec![0u8; 500]);
    }

    #[test]
    fn test_seed_hex_round_trip() {
        let seed = Seed::new([0xAB; SEED_LEN]);
        let text = seed.to_hex();

        assert_eq!(text.len(), SEED_LEN * 2);
        assert_eq!(Seed::from_hex(&text).unwrap(), seed);
        assert!(Seed::from_hex("abcd").is_err());
        assert!(Seed::from_hex(&"zz".repeat(SEED_LEN)).is_err());
    }

    #[test]
    fn test_random_seeds_differ() {
        assert_ne!(Seed::random().unwrap(), Seed::random().unwrap());
    }

    proptest! {
        #[test]
        fn prop_changes_stay_within_capacity(
            data in prop::collection::vec(any::<u8>(), 1..3000),
            secret in prop::collection::vec(any::<u8>(), 125..400),
            level in prop::sample::select(Degradation::iter().collect::<Vec<_>>()),
            seed in any::<[u8; SEED_LEN]>(),
        ) {
            let mut degraded = data.clone();
            Degrader::new(level, Seed::new(seed)).degrade(&mut degraded, &SecretStream::from_vec(secret), None).unwrap();

            let k = level.data_symbols();
            for (before, after) in data.chunks(k).zip(degraded.chunks(k)) {
                prop_assert!(differing(before, after) <= level.capacity());
            }
        }
    }
}
