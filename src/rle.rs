//! Adaptive run-length transform (Mespotine RLE).
//!
//! Classic RLE hurts whenever a symbol rarely repeats: every lone occurrence
//! of a run-encoded symbol costs an extra length byte. This variant first
//! scans the block and keeps a per-symbol profit counter, then run-encodes
//! only the symbols that come out ahead. A 32-byte bitmap header records the
//! decision for each of the 256 symbols, so the decoder needs no counters.
//!
//! Run lengths use the usual 0..255 cell with 255-valued continuation bytes:
//! a run of length `n` is the symbol followed by `(n - 1) / 255` bytes of 255
//! and a final byte holding `(n - 1) % 255`.

use crate::error::{Error, Result};

/// Run-length encode `input` into `out`.
///
/// Returns the number of bytes written, or `None` when the transform does
/// not fit in `out` (it expanded past the buffer, so it cannot be profitable
/// anyway).
pub fn encode(input: &[u8], out: &mut [u8]) -> Option<usize> {
    // Profit analysis: every repeat of the previous byte earns its symbol a
    // point (except once per 255, where a continuation byte is spent), every
    // run break costs the incoming symbol a point.
    let mut t = [0i32; 256];
    let mut run = 0i32;
    let mut pc: i32 = -1;
    for &b in input {
        let c = b as i32;
        if c == pc {
            run += 1;
            if run % 255 != 0 {
                t[b as usize] += 1;
            }
        } else {
            t[b as usize] -= 1;
            run = 0;
        }
        pc = c;
    }

    if out.len() < 32 {
        return None;
    }
    let mut op = 0;
    for i in 0..32 {
        let mut byte = 0u8;
        for j in 0..8 {
            if t[i * 8 + j] > 0 {
                byte |= 1 << j;
            }
        }
        out[op] = byte;
        op += 1;
    }

    let push = |out: &mut [u8], op: &mut usize, b: u8| -> bool {
        if *op < out.len() {
            out[*op] = b;
            *op += 1;
            true
        } else {
            false
        }
    };

    // Emission: runs are accumulated and flushed on every symbol change, with
    // a final flush driven by the end-of-input sentinel.
    let mut run = 0i32;
    let mut pc: i32 = -1;
    let mut idx = 0usize;
    loop {
        let c: i32 = if idx < input.len() {
            let v = input[idx] as i32;
            idx += 1;
            v
        } else {
            -1
        };
        if c == pc {
            run += 1;
        } else if run > 0 && t[pc as usize] > 0 {
            if !push(out, &mut op, pc as u8) {
                return None;
            }
            while run > 255 {
                if !push(out, &mut op, 255) {
                    return None;
                }
                run -= 255;
            }
            if !push(out, &mut op, (run - 1) as u8) {
                return None;
            }
            run = 1;
        } else {
            for _ in 0..run {
                if !push(out, &mut op, pc as u8) {
                    return None;
                }
            }
            run = 1;
        }
        pc = c;
        if c == -1 {
            break;
        }
    }

    Some(op)
}

/// Expand `input` into `out`, whose length must be the original block length.
///
/// Fails with [`Error::TruncatedData`] when the input runs out mid-stream and
/// [`Error::Crc`] when a run would overshoot the recorded original length;
/// both only happen on corrupted data.
pub fn decode(input: &[u8], out: &mut [u8]) -> Result<()> {
    if input.len() < 32 {
        return Err(Error::TruncatedData);
    }
    let mut t = [false; 256];
    for (i, &c) in input[..32].iter().enumerate() {
        for j in 0..8 {
            t[i * 8 + j] = (c >> j) & 1 == 1;
        }
    }

    let mut ip = 32usize;
    let mut op = 0usize;
    while op < out.len() {
        let c = *input.get(ip).ok_or(Error::TruncatedData)?;
        ip += 1;
        if t[c as usize] {
            let mut run = 0usize;
            loop {
                let l = *input.get(ip).ok_or(Error::TruncatedData)?;
                ip += 1;
                if l == 255 {
                    run += 255;
                } else {
                    run += l as usize + 1;
                    break;
                }
            }
            if op + run > out.len() {
                return Err(Error::Crc);
            }
            for _ in 0..run {
                out[op] = c;
                op += 1;
            }
        } else {
            out[op] = c;
            op += 1;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_trip(data: &[u8]) -> usize {
        let mut enc = vec![0u8; data.len() * 2 + 64];
        let n = encode(data, &mut enc).expect("encode should fit");
        let mut dec = vec![0u8; data.len()];
        decode(&enc[..n], &mut dec).expect("decode should succeed");
        assert_eq!(dec, data);
        n
    }

    #[test]
    fn long_runs_shrink() {
        let mut data = vec![b'A'; 1000];
        data.extend_from_slice(b"trailer");
        let n = round_trip(&data);
        assert!(n < data.len());
    }

    #[test]
    fn run_length_cell_boundaries() {
        for len in [254usize, 255, 256, 257, 510, 511, 512] {
            let mut data = vec![0xAAu8; len];
            data.extend_from_slice(&[1, 2, 3]);
            round_trip(&data);
        }
    }

    #[test]
    fn unrepetitive_data_survives() {
        // No symbol is profitable here; everything goes through literally.
        let data: Vec<u8> = (0u16..1024).map(|i| (i % 251) as u8).collect();
        let n = round_trip(&data);
        assert_eq!(n, data.len() + 32);
    }

    #[test]
    fn mixed_profitable_and_lone_occurrences() {
        // 'A' has one huge run and a few lone occurrences; it stays profitable
        // and the lone occurrences must carry explicit length bytes.
        let mut data = vec![b'A'; 600];
        for _ in 0..10 {
            data.push(b'x');
            data.push(b'A');
        }
        round_trip(&data);
    }

    #[test]
    fn truncated_stream_is_rejected() {
        let data = vec![b'Z'; 500];
        let mut enc = vec![0u8; 1200];
        let n = encode(&data, &mut enc).unwrap();
        let mut dec = vec![0u8; data.len()];
        assert_eq!(decode(&enc[..n - 1], &mut dec), Err(Error::TruncatedData));
        assert_eq!(decode(&enc[..16], &mut dec), Err(Error::TruncatedData));
    }

    #[test]
    fn overlong_run_is_rejected() {
        let data = vec![b'Z'; 500];
        let mut enc = vec![0u8; 1200];
        let n = encode(&data, &mut enc).unwrap();
        // Shrinking the output window makes the recorded run overshoot.
        let mut dec = vec![0u8; data.len() - 100];
        assert_eq!(decode(&enc[..n], &mut dec), Err(Error::Crc));
    }
}
