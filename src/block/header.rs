//! Block payload header.
//!
//! Layout, all integers little-endian regardless of host order:
//!
//! | offset | size | field                                          |
//! |--------|------|------------------------------------------------|
//! | 0      | 4    | CRC-32 of the original block                   |
//! | 4      | 4    | BWT primary index; -1 marks a literal block    |
//! | 8      | 1    | model mask (0x02 = LZP, 0x04 = RLE)            |
//! | 9      | 0..8 | `lzp_size`, then `rle_size`, if their bits set |
//!
//! Literal ("bypass") blocks stop after the first 8 bytes; the rest of the
//! payload is the block verbatim.

use crate::error::{Error, Result};

/// Model-mask bit: the LZP stage ran and `lzp_size` is present.
pub const MODEL_LZP: u8 = 0x02;
/// Model-mask bit: the RLE stage ran and `rle_size` is present.
pub const MODEL_RLE: u8 = 0x04;

#[inline]
pub fn read_u32(buf: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([buf[at], buf[at + 1], buf[at + 2], buf[at + 3]])
}

#[inline]
pub fn read_i32(buf: &[u8], at: usize) -> i32 {
    read_u32(buf, at) as i32
}

#[inline]
pub fn write_u32(buf: &mut [u8], at: usize, v: u32) {
    buf[at..at + 4].copy_from_slice(&v.to_le_bytes());
}

#[inline]
pub fn write_i32(buf: &mut [u8], at: usize, v: i32) {
    write_u32(buf, at, v as u32);
}

/// Parsed block header. `bwt_index == -1` means the payload is literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockHeader {
    pub crc32: u32,
    pub bwt_index: i32,
    pub model: u8,
    pub lzp_size: Option<i32>,
    pub rle_size: Option<i32>,
}

impl BlockHeader {
    pub fn encoded_len(&self) -> usize {
        if self.bwt_index == -1 {
            return 8;
        }
        9 + 4 * (usize::from(self.lzp_size.is_some()) + usize::from(self.rle_size.is_some()))
    }

    /// Serialize into `out`, which must hold [`BlockHeader::encoded_len`] bytes.
    pub fn write(&self, out: &mut [u8]) {
        write_u32(out, 0, self.crc32);
        write_i32(out, 4, self.bwt_index);
        if self.bwt_index == -1 {
            return;
        }
        out[8] = self.model;
        let mut at = 9;
        if let Some(v) = self.lzp_size {
            write_i32(out, at, v);
            at += 4;
        }
        if let Some(v) = self.rle_size {
            write_i32(out, at, v);
        }
    }

    /// Parse the header at the front of `buf`; returns it with its length.
    pub fn parse(buf: &[u8]) -> Result<(BlockHeader, usize)> {
        if buf.len() < 8 {
            return Err(Error::TruncatedData);
        }
        let crc32 = read_u32(buf, 0);
        let bwt_index = read_i32(buf, 4);
        if bwt_index == -1 {
            return Ok((
                BlockHeader {
                    crc32,
                    bwt_index,
                    model: 0,
                    lzp_size: None,
                    rle_size: None,
                },
                8,
            ));
        }
        if buf.len() < 9 {
            return Err(Error::TruncatedData);
        }
        let model = buf[8];
        let mut at = 9usize;
        let mut take = |buf: &[u8]| -> Result<i32> {
            if buf.len() < at + 4 {
                return Err(Error::TruncatedData);
            }
            let v = read_i32(buf, at);
            at += 4;
            Ok(v)
        };
        let lzp_size = if model & MODEL_LZP != 0 {
            Some(take(buf)?)
        } else {
            None
        };
        let rle_size = if model & MODEL_RLE != 0 {
            Some(take(buf)?)
        } else {
            None
        };
        Ok((
            BlockHeader {
                crc32,
                bwt_index,
                model,
                lzp_size,
                rle_size,
            },
            at,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_all_shapes() {
        let shapes = [
            BlockHeader {
                crc32: 0x11223344,
                bwt_index: 77,
                model: 0,
                lzp_size: None,
                rle_size: None,
            },
            BlockHeader {
                crc32: 1,
                bwt_index: 1,
                model: MODEL_LZP,
                lzp_size: Some(123),
                rle_size: None,
            },
            BlockHeader {
                crc32: u32::MAX,
                bwt_index: i32::MAX,
                model: MODEL_LZP | MODEL_RLE,
                lzp_size: Some(123),
                rle_size: Some(456),
            },
        ];
        for h in shapes {
            let mut buf = [0u8; 32];
            h.write(&mut buf);
            let (parsed, len) = BlockHeader::parse(&buf).unwrap();
            assert_eq!(parsed, h);
            assert_eq!(len, h.encoded_len());
        }
    }

    #[test]
    fn bypass_is_eight_bytes() {
        let h = BlockHeader {
            crc32: 5,
            bwt_index: -1,
            model: 0,
            lzp_size: None,
            rle_size: None,
        };
        assert_eq!(h.encoded_len(), 8);
        let mut buf = [0u8; 8];
        h.write(&mut buf);
        let (parsed, len) = BlockHeader::parse(&buf).unwrap();
        assert_eq!(len, 8);
        assert_eq!(parsed.bwt_index, -1);
    }

    #[test]
    fn truncated_header_is_rejected() {
        let h = BlockHeader {
            crc32: 9,
            bwt_index: 4,
            model: MODEL_LZP | MODEL_RLE,
            lzp_size: Some(10),
            rle_size: Some(20),
        };
        let mut buf = [0u8; 32];
        h.write(&mut buf);
        for cut in 0..h.encoded_len() {
            assert_eq!(
                BlockHeader::parse(&buf[..cut]).unwrap_err(),
                Error::TruncatedData
            );
        }
    }

    #[test]
    fn little_endian_on_the_wire() {
        let h = BlockHeader {
            crc32: 0x0A0B0C0D,
            bwt_index: 0x01020304,
            model: 0,
            lzp_size: None,
            rle_size: None,
        };
        let mut buf = [0u8; 9];
        h.write(&mut buf);
        assert_eq!(&buf[..4], &[0x0D, 0x0C, 0x0B, 0x0A]);
        assert_eq!(&buf[4..8], &[0x04, 0x03, 0x02, 0x01]);
    }
}
