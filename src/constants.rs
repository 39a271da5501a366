// Copyright 2025 Karpeles Lab Inc.
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

/// Fastest compression level
pub const BEST_SPEED: i32 = 1;

/// Highest compression level
pub const BEST_COMPRESSION: i32 = 9;

/// Let the library pick the compression level
pub const DEFAULT_COMPRESSION: i32 = -1;

/// Default window size exponent (maximum history window)
pub const DEFAULT_WINDOW_BITS: i32 = 15;

/// Smallest accepted window size exponent
pub const MIN_WINDOW_BITS: i32 = 9;

/// Largest accepted window size exponent
pub const MAX_WINDOW_BITS: i32 = 15;

/// Output buffer size used by the drain loop (exposed for diagnostics/tests)
pub const OUTPUT_CHUNK_SIZE: usize = 8 * 1024;
