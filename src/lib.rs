//! degrade-rs - Reversible file degradation with Reed-Solomon coding.
//!
//! A file is cut into blocks of `k` symbols, each block is Reed-Solomon
//! encoded into a 255-symbol codeword, and the redundancy is stored apart from
//! the data. The data copy is then degraded: up to `t = (255 - k) / 2` symbols
//! per block are overwritten with bytes from a secret file. The redundancy
//! stream repairs every block on decode and restores the original file.
//!
//! - [`framing`]: Block layout of data and redundancy streams
//! - [`codec`]: Reed-Solomon block codec behind the [`codec::Codec`] trait
//! - [`degrade`]: Bounded, seeded degradation
//! - [`pipeline`]: Parallel encode, degrade and decode stages
//! - [`processor`]: File-level operations

pub mod app;
pub mod codec;
pub mod config;
pub mod degrade;
pub mod error;
pub mod file;
pub mod framing;
pub mod pipeline;
pub mod processor;
pub mod secret;
pub mod symbol;
pub mod types;
pub mod ui;
