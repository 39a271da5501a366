// Copyright 2025 Karpeles Lab Inc.
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use std::fmt;

use flate2::{CompressError, DecompressError};

/// Result type for filter and checksum operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for streaming filters and checksums
///
/// `Ok`/stream-end outcomes are not errors; they are reported through
/// [`Transform::finished`](crate::Transform::finished). A "no progress
/// possible" codec result is absorbed by the drain loop and never surfaces
/// here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A closed handle was fed new input; carries the filter name
    IllegalState(&'static str),

    /// The input stream requires a preset dictionary
    RequiresDictionary,

    /// Inconsistent internal stream state (bad init parameters included)
    InternalStream(String),

    /// Input does not conform to the expected format, or a checksum failed
    InvalidInput(String),

    /// The underlying library ran out of memory
    OutOfMemory,

    /// The underlying library version is incompatible
    IncompatibleVersion,

    /// Unrecognized result code from the underlying library
    Unknown { code: i32, msg: String },

    /// A checksum delegate returned the wrong shape
    Argument(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::IllegalState(op) => {
                write!(f, "zfilter: calling {} when stream was previously closed", op)
            }
            Error::RequiresDictionary => {
                write!(f, "zfilter: input stream requires a dictionary")
            }
            Error::InternalStream(msg) => {
                write!(f, "zfilter: inconsistent internal stream state: {}", msg)
            }
            Error::InvalidInput(msg) => write!(f, "zfilter: invalid input: {}", msg),
            Error::OutOfMemory => write!(f, "zfilter: not enough memory"),
            Error::IncompatibleVersion => {
                write!(f, "zfilter: incompatible library version")
            }
            Error::Unknown { code, msg } => {
                write!(f, "zfilter: unknown code {}: {}", code, msg)
            }
            Error::Argument(msg) => write!(f, "zfilter: bad argument: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

/// Classify a compression-side codec failure.
///
/// The deflate direction only fails on inconsistent stream state; data it is
/// given is arbitrary bytes by definition.
pub(crate) fn classify_compress(err: CompressError) -> Error {
    Error::InternalStream(err.to_string())
}

/// Classify a decompression-side codec failure.
pub(crate) fn classify_decompress(err: DecompressError) -> Error {
    if err.needs_dictionary().is_some() {
        Error::RequiresDictionary
    } else {
        Error::InvalidInput(err.to_string())
    }
}
