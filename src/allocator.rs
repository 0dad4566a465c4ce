//! Memory Allocator Configuration
//!
//! The binary uses mimalloc. Every run allocates whole-file buffers plus one
//! 255-symbol block and one secret slice per block on every rayon worker,
//! which mimalloc's thread-local free lists serve well.

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;
