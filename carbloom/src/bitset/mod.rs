// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Fixed-length bit vector backing a [`Filter`](crate::bloom::Filter).
//!
//! Bits are packed most-significant-bit first: bit `i` lives in byte `i / 8`
//! under mask `0x80 >> (i % 8)`. [`BitSet::bytes`] emits exactly
//! `ceil(len / 8)` bytes in that layout and [`BitSet::from_bytes`] reads it back.

use byteorder::BigEndian;
use byteorder::ByteOrder;

use crate::error::Error;

const WORD_BITS: u64 = 64;

/// A bit vector of fixed logical length.
///
/// Storage is a sequence of `u64` words; word `w` holds bits `64 * w ..
/// 64 * w + 63` with the lowest index in the most significant position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitSet {
    num_bits: u64,
    words: Vec<u64>,
}

impl BitSet {
    /// Allocates a zeroed bit vector of `num_bits` bits.
    ///
    /// # Errors
    ///
    /// Returns an [`Allocation`](crate::error::ErrorKind::Allocation) error if the
    /// storage cannot be reserved.
    pub fn new(num_bits: u64) -> Result<Self, Error> {
        let words = alloc_words(num_bits)?;
        Ok(BitSet { num_bits, words })
    }

    /// Builds a bit vector of `num_bits` bits from packed big-endian bytes.
    ///
    /// Missing trailing bytes read as zero and bytes past `ceil(num_bits / 8)`
    /// are ignored. Unaddressable bits in the final byte are kept so that
    /// [`bytes`](Self::bytes) returns them unchanged.
    pub fn from_bytes(num_bits: u64, bytes: &[u8]) -> Result<Self, Error> {
        let mut words = alloc_words(num_bits)?;
        let used = byte_len(num_bits).min(bytes.len());

        for (word, chunk) in words.iter_mut().zip(bytes[..used].chunks(8)) {
            let mut buf = [0u8; 8];
            buf[..chunk.len()].copy_from_slice(chunk);
            *word = BigEndian::read_u64(&buf);
        }

        Ok(BitSet { num_bits, words })
    }

    /// Returns the logical length in bits.
    pub fn bits_count(&self) -> u64 {
        self.num_bits
    }

    /// Sets bit `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not below [`bits_count`](Self::bits_count).
    #[inline]
    pub fn set(&mut self, index: u64) {
        assert!(index < self.num_bits, "bit index {index} out of range");
        let (word, mask) = locate(index);
        self.words[word] |= mask;
    }

    /// Returns whether bit `index` is set.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not below [`bits_count`](Self::bits_count).
    #[inline]
    pub fn test(&self, index: u64) -> bool {
        assert!(index < self.num_bits, "bit index {index} out of range");
        let (word, mask) = locate(index);
        self.words[word] & mask != 0
    }

    /// Counts the set bits among the first [`bits_count`](Self::bits_count) bits.
    pub fn ones_count(&self) -> u64 {
        let Some((last, rest)) = self.words.split_last() else {
            return 0;
        };
        let full: u64 = rest.iter().map(|w| w.count_ones() as u64).sum();
        full + (last & tail_mask(self.num_bits)).count_ones() as u64
    }

    /// Returns the packed big-endian bytes, `ceil(bits_count / 8)` of them.
    pub fn bytes(&self) -> Vec<u8> {
        let len = byte_len(self.num_bits);
        let mut out = Vec::with_capacity(len);
        for word in &self.words {
            let mut buf = [0u8; 8];
            BigEndian::write_u64(&mut buf, *word);
            let take = (len - out.len()).min(8);
            out.extend_from_slice(&buf[..take]);
        }
        out
    }

    /// ORs `other` into this bit vector.
    ///
    /// # Errors
    ///
    /// Returns an [`IncompatibleBitCount`](crate::error::ErrorKind::IncompatibleBitCount)
    /// error, leaving `self` untouched, if the lengths differ.
    pub fn union(&mut self, other: &BitSet) -> Result<(), Error> {
        self.check_len(other)?;
        for (word, other_word) in self.words.iter_mut().zip(&other.words) {
            *word |= *other_word;
        }
        Ok(())
    }

    /// ANDs `other` into this bit vector.
    ///
    /// # Errors
    ///
    /// Returns an [`IncompatibleBitCount`](crate::error::ErrorKind::IncompatibleBitCount)
    /// error, leaving `self` untouched, if the lengths differ.
    pub fn intersect(&mut self, other: &BitSet) -> Result<(), Error> {
        self.check_len(other)?;
        for (word, other_word) in self.words.iter_mut().zip(&other.words) {
            *word &= *other_word;
        }
        Ok(())
    }

    fn check_len(&self, other: &BitSet) -> Result<(), Error> {
        if self.num_bits != other.num_bits {
            return Err(Error::incompatible_bit_count(self.num_bits, other.num_bits));
        }
        Ok(())
    }
}

fn alloc_words(num_bits: u64) -> Result<Vec<u64>, Error> {
    let num_words =
        usize::try_from(num_bits.div_ceil(WORD_BITS)).map_err(|_| Error::allocation(num_bits))?;
    // the byte view built by `bytes` must also fit
    if num_words.checked_mul(8).is_none() {
        return Err(Error::allocation(num_bits));
    }

    let mut words = Vec::new();
    words
        .try_reserve_exact(num_words)
        .map_err(|_| Error::allocation(num_bits))?;
    words.resize(num_words, 0);
    Ok(words)
}

fn byte_len(num_bits: u64) -> usize {
    num_bits.div_ceil(8) as usize
}

#[inline]
fn locate(index: u64) -> (usize, u64) {
    let word = (index / WORD_BITS) as usize;
    let mask = 1u64 << (WORD_BITS - 1 - index % WORD_BITS);
    (word, mask)
}

/// Mask selecting the addressable bits of the final word.
fn tail_mask(num_bits: u64) -> u64 {
    match num_bits % WORD_BITS {
        0 => u64::MAX,
        used => !(u64::MAX >> used),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_sizes() {
        let bits = BitSet::new(1000).unwrap();
        assert_eq!(bits.bits_count(), 1000);
        assert_eq!(bits.bytes().len(), 125);
        assert_eq!(bits.ones_count(), 0);

        let bits = BitSet::new(8).unwrap();
        assert_eq!(bits.bytes(), vec![0]);

        let bits = BitSet::new(9).unwrap();
        assert_eq!(bits.bytes(), vec![0, 0]);
    }

    #[test]
    fn test_big_endian_packing() {
        let mut bits = BitSet::new(16).unwrap();
        bits.set(0);
        bits.set(9);
        bits.set(15);
        assert_eq!(bits.bytes(), vec![0b1000_0000, 0b0100_0001]);
        assert!(bits.test(0));
        assert!(!bits.test(1));
        assert_eq!(bits.ones_count(), 3);
    }

    #[test]
    fn test_from_bytes_keeps_padding() {
        // 10 addressable bits, the low 6 bits of the second byte are padding
        let bits = BitSet::from_bytes(10, &[0xff, 0xff]).unwrap();
        assert_eq!(bits.ones_count(), 10);
        assert!(bits.test(9));
        assert_eq!(bits.bytes(), vec![0xff, 0xff]);
    }

    #[test]
    fn test_from_bytes_short_and_long_input() {
        let bits = BitSet::from_bytes(24, &[0x80]).unwrap();
        assert_eq!(bits.bytes(), vec![0x80, 0, 0]);

        let bits = BitSet::from_bytes(8, &[0x01, 0xff, 0xff]).unwrap();
        assert_eq!(bits.bytes(), vec![0x01]);
        assert!(bits.test(7));
    }

    #[test]
    fn test_from_bytes_partial_last_word() {
        // 70 bits span two words; the second word only gets one byte
        let input: Vec<u8> = (1..=9).collect();
        let bits = BitSet::from_bytes(70, &input).unwrap();
        assert_eq!(bits.bytes(), input);
        assert!(bits.test(7)); // 0x01
        assert!(bits.test(64 + 4)); // 0x09 = 0b0000_1001
        assert!(!bits.test(64 + 5));
    }

    #[test]
    fn test_from_bytes_unrepresentable_size() {
        let err = BitSet::from_bytes(u64::MAX, &[0xff]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Allocation);
    }

    #[test]
    fn test_union_and_intersect() {
        let mut a = BitSet::new(70).unwrap();
        let mut b = BitSet::new(70).unwrap();
        a.set(1);
        a.set(69);
        b.set(2);
        b.set(69);

        let mut u = a.clone();
        u.union(&b).unwrap();
        assert_eq!(u.ones_count(), 3);

        a.intersect(&b).unwrap();
        assert_eq!(a.ones_count(), 1);
        assert!(a.test(69));
    }

    #[test]
    fn test_length_mismatch() {
        let mut a = BitSet::new(64).unwrap();
        a.set(3);
        let b = BitSet::new(128).unwrap();
        let err = a.intersect(&b).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::IncompatibleBitCount);
        assert!(a.test(3));
    }

    #[test]
    fn test_unrepresentable_size() {
        let err = BitSet::new(u64::MAX).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Allocation);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_set_out_of_range() {
        let mut bits = BitSet::new(9).unwrap();
        bits.set(9);
    }
}
