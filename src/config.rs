//! Global Configuration Constants
//!
//! Block geometry, artifact naming and terminal settings shared by the
//! pipeline, the file layer and the command line.
//!
//! The block geometry is fixed by the symbol size: with 8-bit symbols a
//! Reed-Solomon codeword holds at most 255 symbols, so every block carries
//! `k` data symbols and `255 - k` redundancy symbols. The per-percentage
//! choice of `k` lives in [`crate::types::Degradation`].

/// Application name used in user interfaces
pub const APP_NAME: &str = "degrade-rs";

// === Block Geometry ===

/// Total symbols in one coding block (data + redundancy)
///
/// 255 is the longest codeword over GF(2^8). Shorter blocks are zero-padded
/// up to this size before encoding, so every block has the same layout.
pub const BLOCK_SIZE: usize = 255;

// === Artifact Naming ===
// Derived files keep the host file's directory, stem and extension and insert
// `_<suffix>` between stem and extension.

/// Separator placed between the file stem and the artifact suffix
pub const SUFFIX_SEPARATOR: &str = "_";

/// Suffix of the degraded data file written by encode
pub const ENCODED_SUFFIX: &str = "Encoded";

/// Suffix of the redundancy file written by encode
pub const REDUNDANCY_SUFFIX: &str = "Redundancy";

/// Suffix of the recovered file written by decode
pub const DECODED_SUFFIX: &str = "Decoded";

/// Suffix of the hash artifact removed by cleanup
pub const HASH_SUFFIX: &str = "Hash";

// === Randomness ===

/// Length of the degradation seed in bytes
///
/// Matches the ChaCha20 key size, so a seed maps one-to-one onto the
/// generator state.
pub const SEED_LEN: usize = 32;

// === Terminal Output ===

/// Progress bar layout used while blocks are processed
pub const PROGRESS_TEMPLATE: &str = "{msg} [{bar:40.cyan/blue}] {pos}/{len} blocks ({per_sec}, {eta})";

/// Characters used to draw the progress bar
pub const PROGRESS_CHARS: &str = "●○ ";
