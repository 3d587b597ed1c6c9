//! Per-block encode orchestration.
//!
//! Stage order is RLE, LZP, BWT, then the context-mixing coder. Each
//! transform is attempted and kept only when it pays; the model mask in the
//! block header records what actually ran so the decoder can mirror it.
//! Intermediate results ping-pong between the caller's buffer and the
//! state's swap buffer by swapping slice references, never by copying.

use log::debug;

use super::header::{BlockHeader, MODEL_LZP, MODEL_RLE};
use super::state::{bound, Bz3State};
use crate::cm::OutputQueue;
use crate::crc32::{crc32, BLOCK_CRC_SEED};
use crate::error::{Error, Result};
use crate::{bwt, lzp, rle};

impl Bz3State {
    /// Encode one block of `size` bytes in place.
    ///
    /// `buffer` must hold at least [`bound`]`(size)` bytes; on success the
    /// encoded block sits at its front and its length is returned.
    pub fn encode_block(&mut self, buffer: &mut [u8], size: usize) -> Result<usize> {
        let result = self.encode_block_inner(buffer, size);
        self.last_error = result.err();
        result
    }

    fn encode_block_inner(&mut self, buffer: &mut [u8], size: usize) -> Result<usize> {
        if size > self.block_size || buffer.len() < bound(size) {
            return Err(Error::OutOfBounds);
        }

        let crc = crc32(BLOCK_CRC_SEED, &buffer[..size]);

        // Tiny blocks are stored literally: the model never has enough data
        // to earn back the header.
        if size < 64 {
            buffer.copy_within(..size, 8);
            let header = BlockHeader {
                crc32: crc,
                bwt_index: -1,
                model: 0,
                lzp_size: None,
                rle_size: None,
            };
            header.write(&mut buffer[..8]);
            return Ok(size + 8);
        }

        let mut data_size = size;
        let mut model = 0u8;
        let mut lzp_size = 0usize;
        let mut rle_size = 0usize;

        let mut b1: &mut [u8] = buffer;
        let mut b2: &mut [u8] = &mut self.swap_buffer[..];
        let mut in_caller = true;

        if let Some(n) = rle::encode(&b1[..data_size], b2) {
            if n < data_size {
                core::mem::swap(&mut b1, &mut b2);
                in_caller = !in_caller;
                data_size = n;
                rle_size = n;
                model |= MODEL_RLE;
            }
        }

        if let Some(n) = lzp::compress(&b1[..data_size], &mut b2[..data_size], &mut self.lzp_lut)
        {
            core::mem::swap(&mut b1, &mut b2);
            in_caller = !in_caller;
            data_size = n;
            lzp_size = n;
            model |= MODEL_LZP;
        }

        debug!(
            "encode: {} bytes -> {} pre-entropy (rle {}, lzp {})",
            size,
            data_size,
            (model & MODEL_RLE) != 0,
            (model & MODEL_LZP) != 0
        );

        let bwt_index = bwt::forward(&b1[..data_size], &mut b2[..data_size])?;

        let header = BlockHeader {
            crc32: crc,
            bwt_index,
            model,
            lzp_size: ((model & MODEL_LZP) != 0).then_some(lzp_size as i32),
            rle_size: ((model & MODEL_RLE) != 0).then_some(rle_size as i32),
        };
        let header_len = header.encoded_len();

        self.cm.begin();
        let mut out = OutputQueue::new(&mut b1[header_len..bound(size)]);
        for &byte in &b2[..data_size] {
            self.cm.encode_byte(&mut out, byte);
        }
        self.cm.flush(&mut out);
        if out.overflowed() {
            return Err(Error::OutOfBounds);
        }
        let total = header_len + out.written();

        header.write(&mut b1[..header_len]);

        if !in_caller {
            b2[..total].copy_from_slice(&b1[..total]);
        }
        Ok(total)
    }
}
