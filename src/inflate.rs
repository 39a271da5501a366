// Copyright 2025 Karpeles Lab Inc.
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Inverse (decompression) filter direction

use flate2::{Decompress, FlushDecompress, Status};

use crate::error::{classify_decompress, Error, Result};
use crate::filter::{framed_from_window_bits, Codec, Filter, Flush, Step, Transform};

/// Container format expected on the compressed stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Container {
    /// RFC 1950 zlib-wrapped stream
    Framed,
    /// Raw RFC 1951 deflate stream
    Raw,
    /// Decide from the first supplied bytes
    Auto,
}

/// True when `data` starts with a plausible zlib header: deflate method,
/// window exponent in range, and the FCHECK bytes consistent (RFC 1950).
fn looks_like_zlib(data: &[u8]) -> bool {
    match data {
        [] => true,
        [cmf] => cmf & 0x0f == 8 && cmf >> 4 <= 7,
        [cmf, flg, ..] => {
            cmf & 0x0f == 8
                && cmf >> 4 <= 7
                && (u16::from(*cmf) << 8 | u16::from(*flg)) % 31 == 0
        }
    }
}

pub(crate) struct InflateCodec {
    /// Created lazily so auto-detection can see the first input bytes
    engine: Option<Decompress>,
    container: Container,
}

impl Codec for InflateCodec {
    const NAME: &'static str = "inflate";
    const USES_FLUSH: bool = false;

    fn run(&mut self, input: &[u8], output: &mut [u8], _flush: Flush) -> Result<Step> {
        let framed = match self.container {
            Container::Framed => true,
            Container::Raw => false,
            Container::Auto => looks_like_zlib(input),
        };
        let engine = self.engine.get_or_insert_with(|| Decompress::new(framed));

        let before_in = engine.total_in();
        let before_out = engine.total_out();
        let status = engine
            .decompress(input, output, FlushDecompress::None)
            .map_err(classify_decompress)?;
        Ok(Step {
            consumed: (engine.total_in() - before_in) as usize,
            produced: (engine.total_out() - before_out) as usize,
            end: matches!(status, Status::StreamEnd),
        })
    }
}

/// Streaming decompressor handle
///
/// Feed compressed bytes in arbitrary chunks; decoded bytes come back as
/// they become available. Flush directives are ignored in this direction.
/// When the compressed stream ends the handle closes irreversibly and
/// reports `finished`.
///
/// # Example
///
/// ```
/// use zfilter::{compress, Decompressor};
///
/// let packed = compress(b"chunk by chunk", None).unwrap();
/// let mut d = Decompressor::new(None).unwrap();
/// let mut out = Vec::new();
/// for byte in &packed {
///     let step = d.transform(Some(std::slice::from_ref(byte)), None).unwrap();
///     out.extend(step.output);
/// }
/// assert_eq!(out, b"chunk by chunk");
/// assert!(d.is_closed());
/// ```
pub struct Decompressor {
    inner: Filter<InflateCodec>,
}

impl Decompressor {
    /// Create a decompressor handle
    ///
    /// With no `window_bits` the container format (raw vs framed) is
    /// auto-detected from the first bytes of input. Positive values in
    /// `9..=15` force the framed container, negatives a raw stream; other
    /// values fail here.
    pub fn new(window_bits: Option<i32>) -> Result<Decompressor> {
        let container = match window_bits {
            None => Container::Auto,
            Some(bits) => {
                if framed_from_window_bits(bits, "inflate")? {
                    Container::Framed
                } else {
                    Container::Raw
                }
            }
        };
        Ok(Decompressor {
            inner: Filter::new(InflateCodec {
                engine: None,
                container,
            }),
        })
    }

    /// Decompress a chunk of input, returning output bytes and running
    /// totals; `flush` is accepted for interface symmetry and ignored
    pub fn transform(&mut self, input: Option<&[u8]>, flush: Option<Flush>) -> Result<Transform> {
        self.inner.transform(input, flush)
    }

    /// Release the codec state; idempotent
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

/// One-shot convenience: decompress a complete stream with auto-detection
///
/// Fails with [`Error::InvalidInput`] when the stream is malformed or does
/// not reach its end within `data`.
pub fn decompress(data: &[u8]) -> Result<Vec<u8>> {
    let mut decompressor = Decompressor::new(None)?;
    let result = decompressor.transform(Some(data), None)?;
    if !result.finished {
        return Err(Error::InvalidInput(
            "incomplete or truncated stream".to_string(),
        ));
    }
    Ok(result.output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zlib_header_detection() {
        // Common zlib first bytes for window 32k: 78 01, 78 9c, 78 da
        assert!(looks_like_zlib(&[0x78, 0x9c]));
        assert!(looks_like_zlib(&[0x78, 0x01]));
        assert!(looks_like_zlib(&[0x78, 0xda]));
        // gzip magic is not a zlib header
        assert!(!looks_like_zlib(&[0x1f, 0x8b]));
        // deflate method nibble must be 8
        assert!(!looks_like_zlib(&[0x79, 0x9c]));
        // bad check bytes
        assert!(!looks_like_zlib(&[0x78, 0x9d]));
    }

    #[test]
    fn test_invalid_window_faults_at_construction() {
        for wb in [0, 8, 16, -8, -16] {
            assert!(
                Decompressor::new(Some(wb)).is_err(),
                "window_bits {} should be rejected",
                wb
            );
        }
    }

    #[test]
    fn test_corrupt_input() {
        let mut d = Decompressor::new(Some(15)).unwrap();
        let err = d
            .transform(Some(b"definitely not a zlib stream".as_slice()), None)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_one_shot_truncated() {
        let packed = crate::compress(b"some data to pack", None).unwrap();
        let err = decompress(&packed[..packed.len() - 4]).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }
}
