//! Common type definitions.
//!
//! # Overview
//!
//! - [`Degradation`]: Supported degradation percentages and their block geometry
//! - [`ProcessorMode`]: Distinguishes between encoding and decoding operations
//! - [`Processing`]: Progress labels of the running stage

use std::fmt::{Display, Formatter, Result};

use strum::EnumIter;

use crate::config::BLOCK_SIZE;
use crate::error::Error;

/// Degradation level, selecting how many symbols of each block are data.
///
/// Higher percentages spend more of every 255-symbol block on redundancy and
/// therefore tolerate (and inject) more corrupted symbols per block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter)]
pub enum Degradation {
    P5,
    P10,
    P15,
    P20,
    P25,
    P50,
}

impl Degradation {
    /// The requested percentage.
    #[inline]
    pub fn percent(self) -> u8 {
        match self {
            Self::P5 => 5,
            Self::P10 => 10,
            Self::P15 => 15,
            Self::P20 => 20,
            Self::P25 => 25,
            Self::P50 => 50,
        }
    }

    /// Data symbols per block (`k`).
    #[inline]
    pub fn data_symbols(self) -> usize {
        match self {
            Self::P5 => 229,
            Self::P10 => 203,
            Self::P15 => 177,
            Self::P20 => 151,
            Self::P25 => 125,
            Self::P50 => 5,
        }
    }

    /// Redundancy symbols per block (`n - k`).
    #[inline]
    pub fn redundancy(self) -> usize {
        BLOCK_SIZE - self.data_symbols()
    }

    /// Correctable symbols per block (`t`).
    #[inline]
    pub fn capacity(self) -> usize {
        self.redundancy() / 2
    }
}

impl TryFrom<u8> for Degradation {
    type Error = Error;

    fn try_from(percent: u8) -> std::result::Result<Self, Self::Error> {
        match percent {
            5 => Ok(Self::P5),
            10 => Ok(Self::P10),
            15 => Ok(Self::P15),
            20 => Ok(Self::P20),
            25 => Ok(Self::P25),
            50 => Ok(Self::P50),
            other => Err(Error::UnsupportedPercent(other)),
        }
    }
}

impl Display for Degradation {
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "{}%", self.percent())
    }
}

/// Represents the type of file operation to perform.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProcessorMode {
    /// Encode and degrade a file.
    Encode,

    /// Recover a degraded file.
    Decode,
}

impl ProcessorMode {
    /// Returns a human-readable label for the mode.
    #[inline]
    pub fn label(self) -> &'static str {
        match self {
            Self::Encode => "Encode",
            Self::Decode => "Decode",
        }
    }
}

impl Display for ProcessorMode {
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        f.write_str(self.label())
    }
}

/// Represents a processing operation in progress.
///
/// Provides display labels for progress indicators and logging.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Processing {
    Encoding,
    Degrading,
    Decoding,
}

impl Processing {
    /// Returns a progress label for the operation.
    #[inline]
    pub fn label(self) -> &'static str {
        match self {
            Self::Encoding => "Encoding...",
            Self::Degrading => "Degrading...",
            Self::Decoding => "Decoding...",
        }
    }
}

impl Display for Processing {
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        f.write_str(self.label())
    }
}
