// Copyright 2025 Karpeles Lab Inc.
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Shared chunked-transform engine for both filter directions
//!
//! The engine turns the one-shot block transform of the underlying codec
//! into a repeatable, stateful, chunk-at-a-time operation: it owns the
//! codec state, carries unconsumed input over between calls, drains output
//! in fixed-size chunks, and tears the codec down exactly once when the
//! stream ends.

use crate::constants::{MAX_WINDOW_BITS, MIN_WINDOW_BITS, OUTPUT_CHUNK_SIZE};
use crate::error::{Error, Result};

/// Map a window-bits selection onto the container format: positive selects
/// the framed (zlib-wrapped) stream, negative a raw deflate stream.
///
/// The magnitude is validated against zlib's accepted range so that a bad
/// window size faults at construction, never at the first transform.
pub(crate) fn framed_from_window_bits(bits: i32, op: &'static str) -> Result<bool> {
    if (MIN_WINDOW_BITS..=MAX_WINDOW_BITS).contains(&bits) {
        Ok(true)
    } else if (-MAX_WINDOW_BITS..=-MIN_WINDOW_BITS).contains(&bits) {
        Ok(false)
    } else {
        Err(Error::InternalStream(format!(
            "{}: invalid window size {}",
            op, bits
        )))
    }
}

/// Flush directive for the compression direction
///
/// Decompression ignores the directive entirely. When a compressor is
/// called with no directive and no input at all, the call defaults to
/// [`Flush::Finish`]; every other call without a directive defaults to
/// [`Flush::None`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flush {
    /// Keep the stream open, emit output only when the codec is ready
    None,
    /// Emit enough output to decode everything supplied so far
    Sync,
    /// Like sync, but also reset the compression history window
    Full,
    /// End the stream; no further input may follow
    Finish,
}

/// Result of a single `transform` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transform {
    /// Bytes produced by this call (may be empty)
    pub output: Vec<u8>,
    /// True once the stream has ended and the handle has closed
    pub finished: bool,
    /// Total bytes consumed over the handle's lifetime
    pub total_in: u64,
    /// Total bytes produced over the handle's lifetime
    pub total_out: u64,
}

/// Outcome of one codec invocation inside the drain loop
pub(crate) struct Step {
    /// Input bytes consumed by this invocation
    pub consumed: usize,
    /// Output bytes produced by this invocation
    pub produced: usize,
    /// The codec reported end-of-stream
    pub end: bool,
}

/// Seam between the engine and a concrete codec direction
///
/// A "no progress possible" result must be reported as a normal `Step`
/// (zero consumed, zero produced); only fatal conditions are errors.
pub(crate) trait Codec {
    /// Human-readable operation name used in diagnostics
    const NAME: &'static str;

    /// Whether the flush directive applies to this direction
    const USES_FLUSH: bool;

    fn run(&mut self, input: &[u8], output: &mut [u8], flush: Flush) -> Result<Step>;
}

/// Stateful filter handle driving a single codec instance
///
/// `codec` doubles as the liveness flag: `None` is the terminal closed
/// state, and dropping the codec releases the underlying stream state.
#[derive(Debug)]
pub(crate) struct Filter<C: Codec> {
    codec: Option<C>,
    carry: Vec<u8>,
    total_in: u64,
    total_out: u64,
}

impl<C: Codec> Filter<C> {
    pub(crate) fn new(codec: C) -> Self {
        Filter {
            codec: Some(codec),
            carry: Vec::new(),
            total_in: 0,
            total_out: 0,
        }
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.codec.is_none()
    }

    pub(crate) fn total_in(&self) -> u64 {
        self.total_in
    }

    pub(crate) fn total_out(&self) -> u64 {
        self.total_out
    }

    /// Feed the filter `input` bytes (or none, to pump remaining state)
    /// with an optional flush directive.
    pub(crate) fn transform(
        &mut self,
        input: Option<&[u8]>,
        flush: Option<Flush>,
    ) -> Result<Transform> {
        let mut codec = match self.codec.take() {
            Some(codec) => codec,
            None => {
                // Supplying input (even an empty buffer) to a closed handle
                // is illegal reuse; input-less calls are idempotent no-ops
                // so repeated close() never faults.
                if input.is_some() {
                    return Err(Error::IllegalState(C::NAME));
                }
                return Ok(self.result(Vec::new(), false));
            }
        };

        let flush = if C::USES_FLUSH {
            match flush {
                Some(flush) => flush,
                // No directive and no input at all means "compress
                // everything now and end the stream".
                None if input.is_none() => Flush::Finish,
                None => Flush::None,
            }
        } else {
            Flush::None
        };

        let mut effective = std::mem::take(&mut self.carry);
        if let Some(data) = input {
            effective.extend_from_slice(data);
        }

        // Nothing buffered, nothing supplied, nothing to flush.
        if effective.is_empty() && flush == Flush::None {
            self.codec = Some(codec);
            return Ok(self.result(Vec::new(), false));
        }

        let mut output = Vec::new();
        let mut offset = 0usize;
        let mut end = false;
        loop {
            let mut chunk = [0u8; OUTPUT_CHUNK_SIZE];
            let step = codec.run(&effective[offset..], &mut chunk, flush)?;
            offset += step.consumed;
            self.total_in += step.consumed as u64;
            self.total_out += step.produced as u64;
            output.extend_from_slice(&chunk[..step.produced]);
            if step.end {
                end = true;
                break;
            }
            // A saturated chunk means more output may be pending; a partial
            // fill always terminates the loop.
            if step.produced < chunk.len() {
                break;
            }
        }

        // Input the codec did not take this call becomes next call's
        // carryover.
        if offset < effective.len() {
            effective.drain(..offset);
            self.carry = effective;
        }

        if !end {
            self.codec = Some(codec);
        }

        Ok(self.result(output, end))
    }

    /// Close the handle: pump remaining state, then release the codec.
    ///
    /// Equivalent to `transform(None, None)` plus unconditional teardown,
    /// and idempotent.
    pub(crate) fn close(&mut self) -> Result<Transform> {
        let result = self.transform(None, None)?;
        self.codec = None;
        Ok(result)
    }

    fn result(&self, output: Vec<u8>, finished: bool) -> Transform {
        Transform {
            output,
            finished,
            total_in: self.total_in,
            total_out: self.total_out,
        }
    }
}
