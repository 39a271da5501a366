// Copyright 2025 Karpeles Lab Inc.
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Rolling Adler-32 / CRC-32 accumulators
//!
//! Both checksums compose: the checksum of a concatenation can be computed
//! from the checksums of the parts and the length of the second part. The
//! delegated update mode exploits this to merge values computed elsewhere
//! (another process, a prior run) without re-reading the data.

use adler2::Adler32;
use crc32fast::Hasher;

use crate::error::{Error, Result};

/// Supported checksum algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChecksumKind {
    /// Adler-32 (RFC 1950); empty-input value is 1
    Adler32,
    /// CRC-32 (IEEE, as used by gzip/zlib); empty-input value is 0
    Crc32,
}

impl ChecksumKind {
    /// The algorithm's defined empty-input value
    fn seed(self) -> u32 {
        match self {
            ChecksumKind::Adler32 => 1,
            ChecksumKind::Crc32 => 0,
        }
    }
}

/// Input to [`Checksum::update`]
///
/// The delegate form wraps a callable expected to report a
/// `(partial_checksum, partial_length)` pair computed elsewhere; returning
/// `None` means the callable could not produce the pair and fails the
/// update with [`Error::Argument`].
pub enum ChecksumInput<'a> {
    /// Fold these bytes into the running value
    Buffer(&'a [u8]),
    /// Merge an externally computed partial checksum via the combine law
    Delegate(&'a mut dyn FnMut() -> Option<(u32, u64)>),
}

/// Stateful running-checksum handle
#[derive(Debug, Clone)]
pub struct Checksum {
    kind: ChecksumKind,
    value: u32,
    total_len: u64,
}

impl Checksum {
    /// Create an accumulator seeded with the algorithm's empty-input value
    pub fn new(kind: ChecksumKind) -> Checksum {
        Checksum {
            kind,
            value: kind.seed(),
            total_len: 0,
        }
    }

    /// The algorithm this handle accumulates
    pub fn kind(&self) -> ChecksumKind {
        self.kind
    }

    /// Fold more input into the running value
    ///
    /// Returns the new `(value, total_len)` pair.
    pub fn update(&mut self, input: ChecksumInput<'_>) -> Result<(u32, u64)> {
        match input {
            ChecksumInput::Buffer(data) => {
                self.value = match self.kind {
                    ChecksumKind::Adler32 => {
                        let mut hasher = Adler32::from_checksum(self.value);
                        hasher.write_slice(data);
                        hasher.checksum()
                    }
                    ChecksumKind::Crc32 => {
                        let mut hasher = Hasher::new_with_initial(self.value);
                        hasher.update(data);
                        hasher.finalize()
                    }
                };
                self.total_len += data.len() as u64;
            }
            ChecksumInput::Delegate(supply) => {
                let (partial, len) = supply().ok_or_else(|| {
                    Error::Argument(
                        "expected delegate to return a checksum and a length".to_string(),
                    )
                })?;
                self.value = combine(self.kind, self.value, partial, len);
                self.total_len += len;
            }
        }
        Ok((self.value, self.total_len))
    }

    /// Current `(value, total_len)` pair; a pure read
    pub fn query(&self) -> (u32, u64) {
        (self.value, self.total_len)
    }
}

/// Combine two partial checksums of the given algorithm
///
/// `combine(checksum(S1), checksum(S2), len(S2))` equals
/// `checksum(S1 ++ S2)`.
pub fn combine(kind: ChecksumKind, sum1: u32, sum2: u32, len2: u64) -> u32 {
    match kind {
        ChecksumKind::Adler32 => adler32_combine(sum1, sum2, len2),
        ChecksumKind::Crc32 => crc32_combine(sum1, sum2, len2),
    }
}

/// Combine two Adler-32 values (mod-65521 arithmetic on both halves)
pub fn adler32_combine(adler1: u32, adler2: u32, len2: u64) -> u32 {
    const BASE: u64 = 65521;

    let rem = len2 % BASE;
    let mut sum1 = u64::from(adler1) & 0xffff;
    let mut sum2 = (rem * sum1) % BASE;
    sum1 += (u64::from(adler2) & 0xffff) + BASE - 1;
    sum2 += (u64::from(adler1) >> 16) + (u64::from(adler2) >> 16) + BASE - rem;
    if sum1 >= BASE {
        sum1 -= BASE;
    }
    if sum1 >= BASE {
        sum1 -= BASE;
    }
    if sum2 >= BASE << 1 {
        sum2 -= BASE << 1;
    }
    if sum2 >= BASE {
        sum2 -= BASE;
    }
    (sum1 | (sum2 << 16)) as u32
}

/// Multiply the GF(2) matrix by the vector
fn gf2_matrix_times(mat: &[u32; 32], mut vec: u32) -> u32 {
    let mut sum = 0;
    let mut i = 0;
    while vec != 0 {
        if vec & 1 != 0 {
            sum ^= mat[i];
        }
        vec >>= 1;
        i += 1;
    }
    sum
}

/// Square a GF(2) matrix into `square`
fn gf2_matrix_square(square: &mut [u32; 32], mat: &[u32; 32]) {
    for n in 0..32 {
        square[n] = gf2_matrix_times(mat, mat[n]);
    }
}

/// Combine two CRC-32 values
///
/// Appending `len2` zero bytes to a stream transforms its CRC linearly over
/// GF(2); the transform for `len2` zeros is built by squaring the one-bit
/// shift operator, then applied to `crc1` before xoring in `crc2`.
pub fn crc32_combine(crc1: u32, crc2: u32, len2: u64) -> u32 {
    if len2 == 0 {
        return crc1;
    }

    let mut even = [0u32; 32];
    let mut odd = [0u32; 32];

    // Operator for one zero bit: the reflected CRC-32 polynomial, then
    // the identity shifted down one row.
    odd[0] = 0xedb8_8320;
    let mut row = 1u32;
    for entry in odd.iter_mut().skip(1) {
        *entry = row;
        row <<= 1;
    }

    // Square to the operators for two and four zero bits.
    gf2_matrix_square(&mut even, &odd);
    gf2_matrix_square(&mut odd, &even);

    let mut crc1 = crc1;
    let mut len2 = len2;
    loop {
        gf2_matrix_square(&mut even, &odd);
        if len2 & 1 != 0 {
            crc1 = gf2_matrix_times(&even, crc1);
        }
        len2 >>= 1;
        if len2 == 0 {
            break;
        }
        gf2_matrix_square(&mut odd, &even);
        if len2 & 1 != 0 {
            crc1 = gf2_matrix_times(&odd, crc1);
        }
        len2 >>= 1;
        if len2 == 0 {
            break;
        }
    }

    crc1 ^ crc2
}

#[cfg(test)]
mod tests {
    use super::*;

    fn oneshot(kind: ChecksumKind, data: &[u8]) -> u32 {
        let mut sum = Checksum::new(kind);
        sum.update(ChecksumInput::Buffer(data)).unwrap().0
    }

    #[test]
    fn test_empty_seeds() {
        assert_eq!(Checksum::new(ChecksumKind::Adler32).query(), (1, 0));
        assert_eq!(Checksum::new(ChecksumKind::Crc32).query(), (0, 0));
        // Updating with an empty buffer leaves the seed untouched
        assert_eq!(oneshot(ChecksumKind::Adler32, b""), 1);
        assert_eq!(oneshot(ChecksumKind::Crc32, b""), 0);
    }

    #[test]
    fn test_known_values() {
        // Reference values from RFC 1950 / zlib
        assert_eq!(oneshot(ChecksumKind::Adler32, b"Wikipedia"), 0x11e6_0398);
        assert_eq!(
            oneshot(ChecksumKind::Crc32, b"The quick brown fox jumps over the lazy dog"),
            0x414f_a339
        );
    }

    #[test]
    fn test_incremental_matches_oneshot() {
        for kind in [ChecksumKind::Adler32, ChecksumKind::Crc32] {
            let mut sum = Checksum::new(kind);
            sum.update(ChecksumInput::Buffer(b"hello ")).unwrap();
            let (value, len) = sum.update(ChecksumInput::Buffer(b"world")).unwrap();
            assert_eq!(value, oneshot(kind, b"hello world"));
            assert_eq!(len, 11);
        }
    }

    #[test]
    fn test_combine_law() {
        let part1: &[u8] = b"first shard of the data";
        let part2: &[u8] = b"and the second shard";
        let mut whole = part1.to_vec();
        whole.extend_from_slice(part2);

        for kind in [ChecksumKind::Adler32, ChecksumKind::Crc32] {
            let combined = combine(
                kind,
                oneshot(kind, part1),
                oneshot(kind, part2),
                part2.len() as u64,
            );
            assert_eq!(combined, oneshot(kind, &whole), "{:?}", kind);
        }
    }

    #[test]
    fn test_combine_with_empty_part() {
        for kind in [ChecksumKind::Adler32, ChecksumKind::Crc32] {
            let value = oneshot(kind, b"payload");
            assert_eq!(combine(kind, value, kind.seed(), 0), value);
        }
    }

    #[test]
    fn test_delegate_merges_shards() {
        for kind in [ChecksumKind::Adler32, ChecksumKind::Crc32] {
            let shard = oneshot(kind, b"remote bytes");
            let mut sum = Checksum::new(kind);
            sum.update(ChecksumInput::Buffer(b"local bytes, ")).unwrap();
            let mut supply = || Some((shard, b"remote bytes".len() as u64));
            let (value, len) = sum.update(ChecksumInput::Delegate(&mut supply)).unwrap();
            assert_eq!(value, oneshot(kind, b"local bytes, remote bytes"));
            assert_eq!(len, 25);
        }
    }

    #[test]
    fn test_delegate_bad_shape() {
        let mut sum = Checksum::new(ChecksumKind::Crc32);
        let mut supply = || None;
        let err = sum.update(ChecksumInput::Delegate(&mut supply)).unwrap_err();
        assert!(matches!(err, Error::Argument(_)));
        // A failed delegate must not disturb the accumulator
        assert_eq!(sum.query(), (0, 0));
    }

    #[test]
    fn test_query_is_pure() {
        let mut sum = Checksum::new(ChecksumKind::Adler32);
        sum.update(ChecksumInput::Buffer(b"abc")).unwrap();
        let first = sum.query();
        assert_eq!(sum.query(), first);
    }
}
