//! Long-lived codec state: one per logical stream of blocks.

use crate::cm::Cm;
use crate::error::{Error, Result};
use crate::lzp;

/// Smallest accepted block size.
pub const BLOCK_SIZE_MIN: usize = 65_536;
/// Largest accepted block size (511 MiB).
pub const BLOCK_SIZE_MAX: usize = 511 * 1024 * 1024;

/// Worst-case encoded size for an input of `n` bytes. Callers must provide
/// buffers at least this large to [`Bz3State::encode_block`].
#[inline]
pub const fn bound(n: usize) -> usize {
    n + n / 50 + 32
}

/// Buffers, tables and counters for encoding or decoding a sequence of
/// blocks. A state is single-owner: it serves one call at a time, but any
/// number of blocks over its lifetime. All memory is allocated here, once;
/// the per-block hot path allocates nothing beyond the suffix sort's own
/// working set.
#[derive(Debug)]
pub struct Bz3State {
    pub(crate) block_size: usize,
    pub(crate) swap_buffer: Vec<u8>,
    pub(crate) sais_work: Vec<i32>,
    pub(crate) lzp_lut: Vec<i32>,
    pub(crate) cm: Box<Cm>,
    pub(crate) last_error: Option<Error>,
}

impl Bz3State {
    /// Create a state for blocks of at most `block_size` bytes.
    ///
    /// Fails with [`Error::Init`] when the size is outside
    /// [`BLOCK_SIZE_MIN`]..=[`BLOCK_SIZE_MAX`].
    pub fn new(block_size: usize) -> Result<Self> {
        if !(BLOCK_SIZE_MIN..=BLOCK_SIZE_MAX).contains(&block_size) {
            return Err(Error::Init);
        }
        Ok(Bz3State {
            block_size,
            swap_buffer: vec![0u8; bound(block_size)],
            sais_work: vec![0i32; bound(block_size)],
            lzp_lut: vec![0i32; 1 << lzp::HASH_BITS],
            cm: Cm::new(),
            last_error: None,
        })
    }

    /// The block size this state was created with.
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Outcome of the most recent encode or decode call; `None` is success.
    pub fn last_error(&self) -> Option<Error> {
        self.last_error
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_out_of_range_block_sizes() {
        assert_eq!(Bz3State::new(0).unwrap_err(), Error::Init);
        assert_eq!(Bz3State::new(BLOCK_SIZE_MIN - 1).unwrap_err(), Error::Init);
        assert_eq!(Bz3State::new(BLOCK_SIZE_MAX + 1).unwrap_err(), Error::Init);
        assert!(Bz3State::new(BLOCK_SIZE_MIN).is_ok());
    }

    #[test]
    fn bound_grows_monotonically() {
        assert_eq!(bound(0), 32);
        assert_eq!(bound(100), 134);
        let mut prev = 0;
        for n in [0usize, 1, 63, 64, 65, 1 << 16, 1 << 20] {
            assert!(bound(n) > n);
            assert!(bound(n) >= prev);
            prev = bound(n);
        }
    }
}
