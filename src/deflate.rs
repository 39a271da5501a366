// Copyright 2025 Karpeles Lab Inc.
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Forward (compression) filter direction

use flate2::{Compress, Compression, FlushCompress, Status};

use crate::constants::{DEFAULT_COMPRESSION, DEFAULT_WINDOW_BITS};
use crate::error::{classify_compress, Error, Result};
use crate::filter::{framed_from_window_bits, Codec, Filter, Flush, Step, Transform};

#[derive(Debug)]
pub(crate) struct DeflateCodec {
    engine: Compress,
}

impl Codec for DeflateCodec {
    const NAME: &'static str = "deflate";
    const USES_FLUSH: bool = true;

    fn run(&mut self, input: &[u8], output: &mut [u8], flush: Flush) -> Result<Step> {
        let flush = match flush {
            Flush::None => FlushCompress::None,
            Flush::Sync => FlushCompress::Sync,
            Flush::Full => FlushCompress::Full,
            Flush::Finish => FlushCompress::Finish,
        };
        let before_in = self.engine.total_in();
        let before_out = self.engine.total_out();
        let status = self
            .engine
            .compress(input, output, flush)
            .map_err(classify_compress)?;
        Ok(Step {
            consumed: (self.engine.total_in() - before_in) as usize,
            produced: (self.engine.total_out() - before_out) as usize,
            end: matches!(status, Status::StreamEnd),
        })
    }
}

/// Streaming compressor handle
///
/// Each call to [`transform`](Compressor::transform) accepts a chunk of
/// input (or none, to pump remaining state) plus an optional [`Flush`]
/// directive, and returns whatever compressed bytes the codec produced.
/// Once the stream finishes the handle closes irreversibly.
///
/// # Example
///
/// ```
/// use zfilter::{Compressor, Decompressor, Flush};
///
/// let mut c = Compressor::new(None, None).unwrap();
/// let mut out = c
///     .transform(Some(b"hello world".as_slice()), Some(Flush::None))
///     .unwrap()
///     .output;
/// let last = c.transform(None, Some(Flush::Finish)).unwrap();
/// assert!(last.finished);
/// out.extend(last.output);
///
/// let mut d = Decompressor::new(None).unwrap();
/// let round = d.transform(Some(&out[..]), None).unwrap();
/// assert_eq!(round.output, b"hello world");
/// ```
#[derive(Debug)]
pub struct Compressor {
    inner: Filter<DeflateCodec>,
}

impl Compressor {
    /// Create a compressor handle
    ///
    /// `level` defaults to the library's default compression; accepted
    /// values are `-1` and `0..=9`. `window_bits` defaults to the framed
    /// container with the maximum window (`15`); negative values select a
    /// raw deflate stream. Invalid combinations fail here, never at the
    /// first transform.
    pub fn new(level: Option<i32>, window_bits: Option<i32>) -> Result<Compressor> {
        let level = match level.unwrap_or(DEFAULT_COMPRESSION) {
            DEFAULT_COMPRESSION => Compression::default(),
            lv @ 0..=9 => Compression::new(lv as u32),
            lv => {
                return Err(Error::InternalStream(format!(
                    "deflate: invalid compression level {}",
                    lv
                )))
            }
        };
        let framed =
            framed_from_window_bits(window_bits.unwrap_or(DEFAULT_WINDOW_BITS), "deflate")?;
        Ok(Compressor {
            inner: Filter::new(DeflateCodec {
                engine: Compress::new(level, framed),
            }),
        })
    }

    /// Compress a chunk of input, returning output bytes and running totals
    ///
    /// With no input and no directive the call defaults to
    /// [`Flush::Finish`]; supplying input (even empty) without a directive
    /// keeps the stream open awaiting more data.
    pub fn transform(&mut self, input: Option<&[u8]>, flush: Option<Flush>) -> Result<Transform> {
        self.inner.transform(input, flush)
    }

    /// Finish the stream if still open and release the codec state
    ///
    /// Idempotent: repeated calls return an empty no-op result.
    pub fn close(&mut self) -> Result<Transform> {
        self.inner.close()
    }

    /// True once the stream has ended or the handle was closed
    pub fn is_closed(&self) -> bool {
        self.inner.is_closed()
    }

    /// Total bytes consumed over the handle's lifetime
    pub fn total_in(&self) -> u64 {
        self.inner.total_in()
    }

    /// Total bytes produced over the handle's lifetime
    pub fn total_out(&self) -> u64 {
        self.inner.total_out()
    }
}

/// One-shot convenience: compress `data` into a finished framed stream
pub fn compress(data: &[u8], level: Option<i32>) -> Result<Vec<u8>> {
    let mut compressor = Compressor::new(level, None)?;
    let result = compressor.transform(Some(data), Some(Flush::Finish))?;
    Ok(result.output)
}
