//! Per-block decode orchestration: the encode pipeline run backwards.
//!
//! The recorded model mask selects which inverse stages run. Every recorded
//! size is range-checked before any stage trusts it, and the final output is
//! verified against the recorded CRC-32; a block either decodes wholly or is
//! rejected with a typed error.

use log::debug;

use super::header::BlockHeader;
use super::state::{bound, Bz3State};
use crate::cm::InputQueue;
use crate::crc32::{crc32, BLOCK_CRC_SEED};
use crate::error::{Error, Result};
use crate::{bwt, lzp, rle};

impl Bz3State {
    /// Decode one block in place.
    ///
    /// `size` is the encoded length at the front of `buffer`, `orig_size`
    /// the recorded original length. On success the decoded bytes sit at the
    /// front of `buffer` and their count is returned.
    pub fn decode_block(
        &mut self,
        buffer: &mut [u8],
        size: usize,
        orig_size: usize,
    ) -> Result<usize> {
        let result = self.decode_block_inner(buffer, size, orig_size);
        self.last_error = result.err();
        result
    }

    fn decode_block_inner(
        &mut self,
        buffer: &mut [u8],
        size: usize,
        orig_size: usize,
    ) -> Result<usize> {
        if size > buffer.len() {
            return Err(Error::OutOfBounds);
        }
        let (header, header_len) = BlockHeader::parse(&buffer[..size])?;

        if header.bwt_index == -1 {
            let n = size - 8;
            buffer.copy_within(8..size, 0);
            if crc32(BLOCK_CRC_SEED, &buffer[..n]) != header.crc32 {
                return Err(Error::Crc);
            }
            return Ok(n);
        }

        if orig_size > self.block_size {
            return Err(Error::DataTooBig);
        }
        let limit = bound(self.block_size);
        for recorded in [header.lzp_size, header.rle_size].into_iter().flatten() {
            if recorded < 0 || recorded as usize > limit {
                return Err(Error::MalformedHeader);
            }
        }

        let size_src = if let Some(l) = header.lzp_size {
            l as usize
        } else if let Some(r) = header.rle_size {
            r as usize
        } else {
            orig_size
        };
        let cap = buffer.len().min(self.swap_buffer.len());
        if size_src == 0 || size_src > cap {
            return Err(Error::MalformedHeader);
        }

        debug!(
            "decode: {} bytes, {} entropy-coded (rle {}, lzp {})",
            size,
            size_src,
            header.rle_size.is_some(),
            header.lzp_size.is_some()
        );

        let mut b1: &mut [u8] = buffer;
        let mut b2: &mut [u8] = &mut self.swap_buffer[..];
        let mut in_caller = true;

        self.cm.begin();
        let mut input = InputQueue::new(&b1[header_len..size]);
        self.cm.seed(&mut input);
        for slot in b2[..size_src].iter_mut() {
            *slot = self.cm.decode_byte(&mut input);
        }
        core::mem::swap(&mut b1, &mut b2);
        in_caller = !in_caller;

        let mut size_now = size_src;

        bwt::inverse(
            &b1[..size_now],
            &mut b2[..size_now],
            &mut self.sais_work,
            header.bwt_index,
        )?;
        core::mem::swap(&mut b1, &mut b2);
        in_caller = !in_caller;

        if header.lzp_size.is_some() {
            size_now = lzp::decompress(&b1[..size_now], b2, &mut self.lzp_lut)?;
            core::mem::swap(&mut b1, &mut b2);
            in_caller = !in_caller;
        }

        if header.rle_size.is_some() {
            if orig_size > b2.len() {
                return Err(Error::OutOfBounds);
            }
            rle::decode(&b1[..size_now], &mut b2[..orig_size])?;
            size_now = orig_size;
            core::mem::swap(&mut b1, &mut b2);
            in_caller = !in_caller;
        }

        if crc32(BLOCK_CRC_SEED, &b1[..size_now]) != header.crc32 {
            return Err(Error::Crc);
        }

        if !in_caller {
            b2[..size_now].copy_from_slice(&b1[..size_now]);
        }
        Ok(size_now)
    }
}
