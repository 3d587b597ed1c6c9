//! Block-sorting compressor: RLE + LZP + BWT + context-mixing entropy coding.
//!
//! Data moves through a pipeline of reversible transforms before an adaptive
//! arithmetic coder squeezes out the remaining entropy: an adaptive
//! run-length stage shrinks long runs, Lempel-Ziv prediction collapses long
//! context-matched repeats, the Burrows-Wheeler transform clusters similar
//! contexts, and a context-mixing model drives the final bit coder. Each
//! block records which stages ran and a CRC-32 of its original bytes, so
//! every block round-trips independently or fails loudly.
//!
//! The primary entry points are [`Bz3State`] with its
//! [`encode_block`](Bz3State::encode_block) /
//! [`decode_block`](Bz3State::decode_block) pair for single blocks,
//! [`encode_blocks`] / [`decode_blocks`] for batched parallel work, and the
//! [`io`] module for whole-file streams in the `BZ3v1` container.

pub mod batch;
pub mod block;
pub mod bwt;
pub mod cli;
pub mod cm;
pub mod crc32;
pub mod error;
pub mod io;
pub mod lzp;
pub mod rle;

/// Worst-case encoded size for `n` input bytes; output buffers must be at
/// least this large.
pub use block::bound;
/// Per-stream codec state.
pub use block::Bz3State;
/// Accepted block-size range.
pub use block::{BLOCK_SIZE_MAX, BLOCK_SIZE_MIN};
/// Batched per-block parallel entry points.
pub use batch::{decode_blocks, encode_blocks, MAX_PARALLEL_BLOCKS};
/// Error taxonomy shared by every layer.
pub use error::{Error, Result};

/// Library version string.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
