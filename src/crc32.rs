//! Thin wrapper around the `crc32fast` crate providing the seed-carrying
//! CRC-32 used for block verification.
//!
//! The checksum is the standard reflected CRC-32 (polynomial 0xEDB88320) in
//! the usual continuation convention: `crc32(crc32(seed, a), b)` equals
//! `crc32(seed, a ++ b)`. Blocks are summed with seed **1**, so the checksum
//! of zero bytes is 1, not 0.

/// Seed every block checksum starts from.
pub const BLOCK_CRC_SEED: u32 = 1;

/// CRC-32 of `data`, continuing from `seed`.
#[inline]
pub fn crc32(seed: u32, data: &[u8]) -> u32 {
    let mut hasher = crc32fast::Hasher::new_with_initial(seed);
    hasher.update(data);
    hasher.finalize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_value() {
        // The classic CRC-32/ISO-HDLC check vector.
        assert_eq!(crc32(0, b"123456789"), 0xCBF43926);
    }

    #[test]
    fn empty_input_returns_seed() {
        assert_eq!(crc32(BLOCK_CRC_SEED, b""), 1);
        assert_eq!(crc32(0xDEADBEEF, b""), 0xDEADBEEF);
    }

    #[test]
    fn continuation() {
        let whole = crc32(BLOCK_CRC_SEED, b"hello world");
        let split = crc32(crc32(BLOCK_CRC_SEED, b"hello "), b"world");
        assert_eq!(whole, split);
    }
}
