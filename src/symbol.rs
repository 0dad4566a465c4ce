//! Conversion between signed storage bytes and unsigned codec symbols.
//!
//! Files are read as plain bytes, which already are symbols. The signed view
//! exists for callers holding `i8` buffers (for example data handed over from
//! platforms without an unsigned byte type). Both directions are bit-preserving
//! reinterpretations, so they are total and exact inverses.

/// One GF(2^8) symbol.
pub type Symbol = u8;

/// Reinterprets signed bytes as symbols in `0..=255`.
pub fn to_unsigned(bytes: &[i8]) -> Vec<Symbol> {
    bytes.iter().map(|b| b.cast_unsigned()).collect()
}

/// Reinterprets symbols as signed bytes.
///
/// The `0..=255` range precondition is carried by [`Symbol`], so there is no
/// out-of-range input to clamp or reject.
pub fn to_signed(symbols: &[Symbol]) -> Vec<i8> {
    symbols.iter().map(|s| s.cast_signed()).collect()
}
