//! Domain errors raised by the degradation pipeline.
//!
//! Functions return `anyhow::Result` and attach context on the way up; the
//! variants below stay reachable through `anyhow::Error::downcast_ref`.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Percentage outside the parameter table.
    #[error("unsupported degradation percentage {0}, expected one of 5, 10, 15, 20, 25, 50")]
    UnsupportedPercent(u8),

    /// Encoded data diverged from the input before degradation.
    #[error("encoded data differs from the input at byte {offset}")]
    Verification {
        /// First differing byte.
        offset: usize,
    },

    /// A block held more errors than its redundancy can repair.
    #[error("block {block} has more than {capacity} corrupted symbols")]
    Uncorrectable {
        /// Index of the failing block.
        block: usize,
        /// Correction capacity `t` of the block.
        capacity: usize,
    },

    /// Redundancy stream does not match the data stream and percentage.
    #[error("redundancy stream holds {actual} bytes, expected {expected} for {blocks} block(s)")]
    RedundancyLength {
        /// Bytes required by the framing.
        expected: usize,
        /// Bytes supplied.
        actual: usize,
        /// Number of blocks in the data stream.
        blocks: usize,
    },

    /// Secret stream has no bytes to borrow.
    #[error("secret stream is empty")]
    EmptySecret,

    /// Secret stream is shorter than one per-block slice.
    #[error("secret stream holds {actual} bytes, at least {required} are needed")]
    SecretTooShort {
        /// Minimum length (`t`).
        required: usize,
        /// Supplied length.
        actual: usize,
    },

    /// One or more artifacts could not be removed.
    #[error("failed to erase {}", .0.iter().map(|p| p.display().to_string()).collect::<Vec<_>>().join(", "))]
    Cleanup(Vec<PathBuf>),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uncorrectable_message_names_block() {
        let err = Error::Uncorrectable { block: 7, capacity: 65 };
        assert_eq!(err.to_string(), "block 7 has more than 65 corrupted symbols");
    }

    #[test]
    fn test_cleanup_lists_every_path() {
        let err = Error::Cleanup(vec![PathBuf::from("a_Encoded.bin"), PathBuf::from("a_Hash.bin")]);
        assert_eq!(err.to_string(), "failed to erase a_Encoded.bin, a_Hash.bin");
    }

    #[test]
    fn test_downcast_through_context() {
        use anyhow::Context;

        let result: anyhow::Result<()> = Err(Error::EmptySecret).context("degradation failed");
        let err = result.unwrap_err();
        assert_eq!(err.downcast_ref::<Error>(), Some(&Error::EmptySecret));
    }
}
