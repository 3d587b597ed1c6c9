//! Burrows-Wheeler transform, forward and inverse.
//!
//! The forward transform sorts the suffixes of the block (SA-IS, see
//! [`sais`]) and emits the character preceding each suffix. The ordering
//! treats an implicit end-of-block sentinel as smaller than every byte: the
//! first output byte is the block's last byte (the one preceding the
//! sentinel), and the row where the whole block itself would appear is
//! skipped and returned as the *primary index* instead. The inverse rebuilds
//! the block with the usual counting-table walk.

pub mod sais;

use crate::error::{Error, Result};

/// Forward transform of `input` into `output` (same length). Returns the
/// primary index, which lies in `[1, n]`.
pub fn forward(input: &[u8], output: &mut [u8]) -> Result<i32> {
    let n = input.len();
    if n == 0 || output.len() < n || n > i32::MAX as usize - 1 {
        return Err(Error::Bwt);
    }

    let sa = sais::suffix_array(input);

    output[0] = input[n - 1];
    let mut index = 0i32;
    let mut w = 1usize;
    for (i, &p) in sa[1..].iter().enumerate() {
        if p == 0 {
            index = (i + 1) as i32;
        } else {
            output[w] = input[p as usize - 1];
            w += 1;
        }
    }
    debug_assert_eq!(w, n);
    debug_assert!(index >= 1);
    Ok(index)
}

/// Inverse transform. `work` provides at least `input.len()` scratch entries;
/// `index` is the primary index recorded by [`forward`].
///
/// Fails with [`Error::Bwt`] when the index is out of range or the
/// permutation walk breaks, both signs of a corrupted block.
pub fn inverse(input: &[u8], output: &mut [u8], work: &mut [i32], index: i32) -> Result<()> {
    let n = input.len();
    if n == 0 || index < 1 || index as usize > n {
        return Err(Error::Bwt);
    }
    if output.len() < n || work.len() < n {
        return Err(Error::OutOfBounds);
    }
    let origin = index as usize;

    let mut freq = [0usize; 256];
    for &b in input {
        freq[b as usize] += 1;
    }
    let mut offsets = [0usize; 256];
    let mut sum = 0usize;
    for (c, &f) in freq.iter().enumerate() {
        offsets[c] = sum;
        sum += f;
    }

    // The sentinel virtually occupies row `origin`; positions at or past it
    // shift up by one so the walk below can treat it as nonexistent.
    for (i, &b) in input.iter().enumerate() {
        let c = b as usize;
        work[offsets[c]] = if i < origin { i as i32 } else { (i + 1) as i32 };
        offsets[c] += 1;
    }

    let mut i = origin;
    for out in output[..n].iter_mut() {
        if i == 0 || i > n {
            return Err(Error::Bwt);
        }
        i = work[i - 1] as usize;
        let p = if i > origin { i - 1 } else { i };
        if p >= n {
            return Err(Error::Bwt);
        }
        *out = input[p];
    }
    if i != 0 {
        return Err(Error::Bwt);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_trip(data: &[u8]) {
        let n = data.len();
        let mut transformed = vec![0u8; n];
        let index = forward(data, &mut transformed).expect("forward");
        let mut restored = vec![0u8; n];
        let mut work = vec![0i32; n];
        inverse(&transformed, &mut restored, &mut work, index).expect("inverse");
        assert_eq!(restored, data);
    }

    #[test]
    fn banana() {
        let mut out = vec![0u8; 6];
        let index = forward(b"banana", &mut out).unwrap();
        assert_eq!(&out, b"annbaa");
        assert_eq!(index, 4);
        round_trip(b"banana");
    }

    #[test]
    fn assorted_round_trips() {
        round_trip(b"a");
        round_trip(b"mississippi");
        round_trip(&[0u8; 1000]);
        round_trip(&b"abcab".repeat(200));
        let mut x = 0xCAFEBABEu32;
        let noise: Vec<u8> = (0..4096)
            .map(|_| {
                x ^= x << 13;
                x ^= x >> 17;
                x ^= x << 5;
                (x >> 8) as u8
            })
            .collect();
        round_trip(&noise);
    }

    #[test]
    fn every_short_length_round_trips() {
        let mut x = 0x0BAD_F00Du32;
        for len in 1..128usize {
            let data: Vec<u8> = (0..len)
                .map(|_| {
                    x ^= x << 13;
                    x ^= x >> 17;
                    x ^= x << 5;
                    (x % 7) as u8
                })
                .collect();
            round_trip(&data);
        }
    }

    #[test]
    fn bad_primary_index_is_rejected() {
        let data = b"the rain in spain";
        let mut out = vec![0u8; data.len()];
        let index = forward(data, &mut out).unwrap();
        let mut restored = vec![0u8; data.len()];
        let mut work = vec![0i32; data.len()];
        assert_eq!(
            inverse(&out, &mut restored, &mut work, 0),
            Err(Error::Bwt)
        );
        assert_eq!(
            inverse(&out, &mut restored, &mut work, data.len() as i32 + 1),
            Err(Error::Bwt)
        );
        assert!(inverse(&out, &mut restored, &mut work, index).is_ok());
    }

    #[test]
    fn empty_input_is_rejected() {
        let mut out = vec![0u8; 0];
        assert_eq!(forward(b"", &mut out), Err(Error::Bwt));
        let mut work = vec![0i32; 0];
        assert_eq!(inverse(b"", &mut out, &mut work, 1), Err(Error::Bwt));
    }
}
