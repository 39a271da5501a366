// Copyright 2025 Karpeles Lab Inc.
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! # zfilter
//!
//! Incremental DEFLATE compression and decompression filters plus rolling
//! Adler-32/CRC-32 checksums.
//!
//! The crate wraps zlib's block-oriented stream API into chunked,
//! resumable handles: each call feeds some input (or none, to pump
//! remaining state) together with an optional flush directive, and returns
//! the bytes produced so far along with running totals. When the stream
//! ends the handle closes irreversibly and the codec state is released.
//!
//! zfilter provides:
//! - Streaming compression with selectable flush modes (`none`, `sync`,
//!   `full`, `finish`)
//! - Streaming decompression with container auto-detection (raw deflate
//!   vs zlib-framed)
//! - Rolling Adler-32 and CRC-32 accumulators with combine operators for
//!   merging checksums computed out-of-process
//!
//! ## Streaming example
//!
//! ```rust
//! use zfilter::{Compressor, Decompressor, Flush};
//!
//! let mut c = Compressor::new(None, None).unwrap();
//! let mut packed = c
//!     .transform(Some(b"hello world".as_slice()), Some(Flush::None))
//!     .unwrap()
//!     .output;
//! let last = c.transform(None, Some(Flush::Finish)).unwrap();
//! assert!(last.finished);
//! packed.extend(last.output);
//!
//! let mut d = Decompressor::new(None).unwrap();
//! let round = d.transform(Some(&packed[..]), None).unwrap();
//! assert_eq!(round.output, b"hello world");
//! ```
//!
//! ## Checksum example
//!
//! ```rust
//! use zfilter::{Checksum, ChecksumInput, ChecksumKind};
//!
//! let mut sum = Checksum::new(ChecksumKind::Crc32);
//! sum.update(ChecksumInput::Buffer(b"hello ")).unwrap();
//! let (value, total) = sum.update(ChecksumInput::Buffer(b"world")).unwrap();
//! assert_eq!(total, 11);
//! assert_eq!(sum.query(), (value, total));
//! ```

mod checksum;
mod constants;
mod deflate;
mod error;
mod filter;
mod inflate;

pub use checksum::{adler32_combine, combine, crc32_combine, Checksum, ChecksumInput, ChecksumKind};
pub use constants::{
    BEST_COMPRESSION, BEST_SPEED, DEFAULT_COMPRESSION, DEFAULT_WINDOW_BITS, MAX_WINDOW_BITS,
    MIN_WINDOW_BITS, OUTPUT_CHUNK_SIZE,
};
pub use deflate::{compress, Compressor};
pub use error::{Error, Result};
pub use filter::{Flush, Transform};
pub use inflate::{decompress, Decompressor};

/// Version of this library
pub fn library_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
