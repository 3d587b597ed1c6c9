//! Parallel batch dispatch: N independent block jobs, one worker each.
//!
//! Each worker owns exactly one state/buffer pair for the duration of the
//! call, so the per-state serial contract is untouched. The call returns
//! only after every worker has finished; outputs never reorder relative to
//! their input index. Per-block failures are reported through each state's
//! `last_error` — callers must inspect every state.

use crate::block::Bz3State;
use crate::error::{Error, Result};

/// Upper limit on blocks per batch call.
pub const MAX_PARALLEL_BLOCKS: usize = 16;

fn batch_pool(n: usize) -> Result<rayon::ThreadPool> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(n)
        .build()
        .map_err(|_| Error::Init)
}

fn check_batch(states: usize, buffers: usize, sizes: usize) -> Result<()> {
    if states == 0 || states > MAX_PARALLEL_BLOCKS || states != buffers || states != sizes {
        return Err(Error::Init);
    }
    Ok(())
}

/// Encode `states.len()` blocks concurrently. On success `sizes[i]` holds
/// the compressed length of block `i`; on a per-block failure `sizes[i]` is
/// left untouched and the state's `last_error` is set.
pub fn encode_blocks(
    states: &mut [Bz3State],
    buffers: &mut [&mut [u8]],
    sizes: &mut [usize],
) -> Result<()> {
    check_batch(states.len(), buffers.len(), sizes.len())?;
    let pool = batch_pool(states.len())?;
    pool.scope(|scope| {
        for ((state, buffer), size) in states
            .iter_mut()
            .zip(buffers.iter_mut())
            .zip(sizes.iter_mut())
        {
            scope.spawn(move |_| {
                if let Ok(n) = state.encode_block(buffer, *size) {
                    *size = n;
                }
            });
        }
    });
    Ok(())
}

/// Decode `states.len()` blocks concurrently. `sizes[i]` is the encoded
/// length of block `i` and is overwritten with the decoded length on
/// success; `orig_sizes[i]` is the recorded original length.
pub fn decode_blocks(
    states: &mut [Bz3State],
    buffers: &mut [&mut [u8]],
    sizes: &mut [usize],
    orig_sizes: &[usize],
) -> Result<()> {
    check_batch(states.len(), buffers.len(), sizes.len())?;
    if orig_sizes.len() != states.len() {
        return Err(Error::Init);
    }
    let pool = batch_pool(states.len())?;
    pool.scope(|scope| {
        for (((state, buffer), size), &orig) in states
            .iter_mut()
            .zip(buffers.iter_mut())
            .zip(sizes.iter_mut())
            .zip(orig_sizes.iter())
        {
            scope.spawn(move |_| {
                if let Ok(n) = state.decode_block(buffer, *size, orig) {
                    *size = n;
                }
            });
        }
    });
    Ok(())
}
