//! File container framing and stream-level processing.
//!
//! Container layout (all integers little-endian):
//!
//! | offset | size | field                               |
//! |--------|------|-------------------------------------|
//! | 0      | 5    | signature `"BZ3v1"`                 |
//! | 5      | 4    | block size                          |
//! | 9      | ...  | blocks                              |
//!
//! Each block is a 4-byte compressed size, a 4-byte original size and the
//! compressed payload. End of file is legal only at a block boundary: a
//! clean EOF while reading the next compressed size ends the stream, a short
//! read anywhere else is [`Error::TruncatedData`].
//!
//! Serial and batched (`workers > 1`) paths produce byte-identical output;
//! the batched encoder reads up to `workers` blocks ahead, compresses them
//! concurrently and writes the results back in input order.

use std::io::{self, Read, Write};

use anyhow::Context;
use log::debug;

use crate::batch::{self, MAX_PARALLEL_BLOCKS};
use crate::block::{bound, Bz3State, BLOCK_SIZE_MAX, BLOCK_SIZE_MIN};
use crate::error::Error;

/// Leading magic of every container.
pub const SIGNATURE: &[u8; 5] = b"BZ3v1";

/// Read until `buf` is full or EOF; returns how many bytes landed.
fn read_fill(reader: &mut impl Read, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0usize;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

/// Read a little-endian u32; `Ok(None)` on a clean EOF before the first
/// byte, [`Error::TruncatedData`] on a partial read.
fn read_u32_le(reader: &mut impl Read) -> anyhow::Result<Option<u32>> {
    let mut raw = [0u8; 4];
    match read_fill(reader, &mut raw).context("reading block header")? {
        0 => Ok(None),
        4 => Ok(Some(u32::from_le_bytes(raw))),
        _ => Err(Error::TruncatedData.into()),
    }
}

fn write_u32_le(writer: &mut impl Write, v: u32) -> io::Result<()> {
    writer.write_all(&v.to_le_bytes())
}

/// Compress `reader` into `writer` as one container.
///
/// A final short (possibly empty) block marks the end of input; an input
/// that is an exact multiple of the block size therefore ends with an empty
/// block, and an empty input is a single empty block.
pub fn compress_stream<R: Read, W: Write>(
    reader: &mut R,
    writer: &mut W,
    block_size: usize,
    workers: usize,
) -> anyhow::Result<()> {
    writer.write_all(SIGNATURE).context("writing signature")?;
    write_u32_le(writer, block_size as u32).context("writing block size")?;

    let workers = workers.clamp(1, MAX_PARALLEL_BLOCKS);
    if workers == 1 {
        compress_serial(reader, writer, block_size)
    } else {
        compress_batched(reader, writer, block_size, workers)
    }
}

fn compress_serial<R: Read, W: Write>(
    reader: &mut R,
    writer: &mut W,
    block_size: usize,
) -> anyhow::Result<()> {
    let mut state = Bz3State::new(block_size)?;
    let mut buffer = vec![0u8; bound(block_size)];
    loop {
        let orig = read_fill(reader, &mut buffer[..block_size]).context("reading input")?;
        let compressed = state
            .encode_block(&mut buffer, orig)
            .context("encoding block")?;
        write_u32_le(writer, compressed as u32).context("writing block")?;
        write_u32_le(writer, orig as u32).context("writing block")?;
        writer
            .write_all(&buffer[..compressed])
            .context("writing block")?;
        debug!("block: {} -> {} bytes", orig, compressed);
        if orig < block_size {
            return Ok(());
        }
    }
}

fn compress_batched<R: Read, W: Write>(
    reader: &mut R,
    writer: &mut W,
    block_size: usize,
    workers: usize,
) -> anyhow::Result<()> {
    let mut states = (0..workers)
        .map(|_| Bz3State::new(block_size))
        .collect::<Result<Vec<_>, _>>()?;
    let mut buffers = vec![vec![0u8; bound(block_size)]; workers];
    let mut sizes = vec![0usize; workers];
    let mut origs = vec![0usize; workers];

    loop {
        let mut filled = 0usize;
        let mut last = false;
        while filled < workers {
            let n = read_fill(reader, &mut buffers[filled][..block_size])
                .context("reading input")?;
            sizes[filled] = n;
            origs[filled] = n;
            filled += 1;
            if n < block_size {
                last = true;
                break;
            }
        }

        {
            let mut views: Vec<&mut [u8]> =
                buffers[..filled].iter_mut().map(|b| &mut b[..]).collect();
            batch::encode_blocks(&mut states[..filled], &mut views, &mut sizes[..filled])?;
        }
        for i in 0..filled {
            if let Some(e) = states[i].last_error() {
                return Err(e).context("encoding block");
            }
            write_u32_le(writer, sizes[i] as u32).context("writing block")?;
            write_u32_le(writer, origs[i] as u32).context("writing block")?;
            writer
                .write_all(&buffers[i][..sizes[i]])
                .context("writing block")?;
        }
        if last {
            return Ok(());
        }
    }
}

/// Decompress a container from `reader`. With `writer == None` the stream is
/// only verified (test mode): every block is fully decoded and CRC-checked,
/// nothing is written.
pub fn decompress_stream<R: Read, W: Write>(
    reader: &mut R,
    mut writer: Option<&mut W>,
    workers: usize,
) -> anyhow::Result<()> {
    let mut signature = [0u8; 5];
    let got = read_fill(reader, &mut signature).context("reading signature")?;
    if got != signature.len() || &signature != SIGNATURE {
        return Err(Error::MalformedHeader).context("invalid signature");
    }
    let block_size = read_u32_le(reader)?
        .ok_or(Error::MalformedHeader)
        .context("reading block size")? as usize;
    if !(BLOCK_SIZE_MIN..=BLOCK_SIZE_MAX).contains(&block_size) {
        return Err(Error::MalformedHeader).context("invalid block size in header");
    }

    let workers = workers.clamp(1, MAX_PARALLEL_BLOCKS);
    if workers == 1 {
        decompress_serial(reader, writer.as_deref_mut(), block_size)
    } else {
        decompress_batched(reader, writer.as_deref_mut(), block_size, workers)
    }
}

/// Frame fields of one block, validated against the recorded block size.
fn read_block_frame(
    reader: &mut impl Read,
    block_size: usize,
) -> anyhow::Result<Option<(usize, usize)>> {
    let compressed = match read_u32_le(reader)? {
        None => return Ok(None),
        Some(v) => v as usize,
    };
    if compressed < 8 || compressed > bound(block_size) {
        return Err(Error::MalformedHeader).context("invalid compressed size");
    }
    let orig = read_u32_le(reader)?
        .ok_or(Error::TruncatedData)
        .context("reading block header")? as usize;
    if orig > block_size {
        return Err(Error::DataTooBig).context("recorded size exceeds block size");
    }
    Ok(Some((compressed, orig)))
}

fn decompress_serial<R: Read, W: Write>(
    reader: &mut R,
    mut writer: Option<&mut W>,
    block_size: usize,
) -> anyhow::Result<()> {
    let mut state = Bz3State::new(block_size)?;
    let mut buffer = vec![0u8; bound(block_size)];
    while let Some((compressed, orig)) = read_block_frame(reader, block_size)? {
        let got = read_fill(reader, &mut buffer[..compressed]).context("reading block")?;
        if got != compressed {
            return Err(Error::TruncatedData).context("reading block");
        }
        let n = state
            .decode_block(&mut buffer, compressed, orig)
            .context("decoding block")?;
        debug!("block: {} -> {} bytes", compressed, n);
        if let Some(w) = writer.as_deref_mut() {
            w.write_all(&buffer[..n]).context("writing output")?;
        }
    }
    Ok(())
}

fn decompress_batched<R: Read, W: Write>(
    reader: &mut R,
    mut writer: Option<&mut W>,
    block_size: usize,
    workers: usize,
) -> anyhow::Result<()> {
    let mut states = (0..workers)
        .map(|_| Bz3State::new(block_size))
        .collect::<Result<Vec<_>, _>>()?;
    let mut buffers = vec![vec![0u8; bound(block_size)]; workers];
    let mut sizes = vec![0usize; workers];
    let mut origs = vec![0usize; workers];

    loop {
        let mut filled = 0usize;
        let mut last = false;
        while filled < workers {
            match read_block_frame(reader, block_size)? {
                None => {
                    last = true;
                    break;
                }
                Some((compressed, orig)) => {
                    let got = read_fill(reader, &mut buffers[filled][..compressed])
                        .context("reading block")?;
                    if got != compressed {
                        return Err(Error::TruncatedData).context("reading block");
                    }
                    sizes[filled] = compressed;
                    origs[filled] = orig;
                    filled += 1;
                }
            }
        }
        if filled > 0 {
            let mut views: Vec<&mut [u8]> =
                buffers[..filled].iter_mut().map(|b| &mut b[..]).collect();
            batch::decode_blocks(
                &mut states[..filled],
                &mut views,
                &mut sizes[..filled],
                &origs[..filled],
            )?;
            for i in 0..filled {
                if let Some(e) = states[i].last_error() {
                    return Err(e).context("decoding block");
                }
                if let Some(w) = writer.as_deref_mut() {
                    w.write_all(&buffers[i][..sizes[i]]).context("writing output")?;
                }
            }
        }
        if last {
            return Ok(());
        }
    }
}

/// Decode-and-discard integrity check over a whole container.
pub fn test_stream<R: Read>(reader: &mut R, workers: usize) -> anyhow::Result<()> {
    decompress_stream::<R, io::Sink>(reader, None, workers)
}
