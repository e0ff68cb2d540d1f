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

use std::iter::FusedIterator;

use crate::hash::HashFunction;

/// Derives the bit positions for one item.
///
/// Each hash evaluation uses a fresh seed, starting at 0. The 64-bit hash is
/// masked down to the smallest power-of-two range covering the bit array; a
/// masked value past the end of the array is rejected and the next window of
/// the same hash is tried before a new hash is computed. When the bit count
/// is a power of two the first window always fits.
///
/// A generator yields exactly `hash_count` indices, each in `[0, bit_count)`.
///
/// # Examples
///
/// ```
/// # use carbloom::bloom::IndexGenerator;
/// # use carbloom::hash::Xxh3;
/// let item: &[u8] = b"item";
/// let indices: Vec<u64> = IndexGenerator::new(9, 4, &Xxh3, item).collect();
/// assert_eq!(indices.len(), 4);
/// assert!(indices.iter().all(|&i| i < 9));
/// ```
#[derive(Debug)]
pub struct IndexGenerator<'a, T: ?Sized, H> {
    item: &'a T,
    hasher: &'a H,
    bit_count: u64,
    hash_count: u64,
    bitmask: u64,
    shift: u32,
    seed: u64,
    drawn: u64,
}

impl<'a, T: ?Sized, H: HashFunction<T>> IndexGenerator<'a, T, H> {
    /// Creates a generator for `item`. A `bit_count` of zero is treated as one.
    pub fn new(bit_count: u64, hash_count: u64, hasher: &'a H, item: &'a T) -> Self {
        let bit_count = bit_count.max(1);
        let bitmask = bitmask(bit_count);
        IndexGenerator {
            item,
            hasher,
            bit_count,
            hash_count,
            bitmask,
            shift: bitmask.count_ones(),
            seed: 0,
            drawn: 0,
        }
    }

    /// Returns whether fewer than `hash_count` indices have been drawn.
    #[inline]
    pub fn has_more(&self) -> bool {
        self.drawn < self.hash_count
    }

    /// Returns the number of hash evaluations so far, accepted or rejected.
    pub fn evaluations(&self) -> u64 {
        self.seed
    }

    /// Draws the next index.
    ///
    /// Must only be called while [`has_more`](Self::has_more) is true.
    pub fn next_index(&mut self) -> u64 {
        debug_assert!(self.has_more(), "index generator exhausted");

        let step = self.shift.max(1) as usize;
        loop {
            let mut hash = self.hasher.hash(self.item, self.seed);
            self.seed = self.seed.wrapping_add(1);

            for _ in (0..u64::BITS).step_by(step) {
                let index = hash & self.bitmask;
                if index < self.bit_count {
                    self.drawn += 1;
                    return index;
                }
                hash = hash.checked_shr(self.shift).unwrap_or(0);
            }
        }
    }
}

impl<T: ?Sized, H: HashFunction<T>> Iterator for IndexGenerator<'_, T, H> {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        if self.has_more() {
            Some(self.next_index())
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = usize::try_from(self.hash_count - self.drawn).unwrap_or(usize::MAX);
        (left, Some(left))
    }
}

impl<T: ?Sized, H: HashFunction<T>> ExactSizeIterator for IndexGenerator<'_, T, H> {}

impl<T: ?Sized, H: HashFunction<T>> FusedIterator for IndexGenerator<'_, T, H> {}

/// Low bits covering every index below `bit_count`.
fn bitmask(bit_count: u64) -> u64 {
    bit_count
        .checked_next_power_of_two()
        .map_or(u64::MAX, |p| p - 1)
}
