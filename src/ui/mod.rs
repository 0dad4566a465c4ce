//! User interface components for terminal interaction.
//!
//! # Modules
//!
//! - [`display`]: Run summaries, parameter table, success messages
//! - [`progress`]: Progress bar for block processing

pub mod display;
pub mod progress;
