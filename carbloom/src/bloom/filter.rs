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

use std::f64::consts::LN_2;
use std::fmt;
use std::marker::PhantomData;

use super::IndexGenerator;
use super::estimate_parameters;
use crate::bitset::BitSet;
use crate::error::Error;
use crate::hash::HashFunction;
use crate::hash::Xxh3;

/// A Bloom filter over items of type `T`, hashed with `H`.
///
/// Provides membership queries with:
/// - No false negatives (added items always test `true`)
/// - A false positive rate governed by [`fpp`](Self::fpp)
/// - Fixed size: `bit_count` and `hash_count` never change after construction
///
/// The filter does not count insertions. [`estimate_entries`](Self::estimate_entries)
/// recovers an estimate from the fraction of set bits, which also works for a filter
/// rebuilt from bytes of unknown origin.
///
/// Use [`Filter::new`], [`Filter::new_with_estimates`] or
/// [`super::FilterBuilder`] to construct instances.
pub struct Filter<T: ?Sized = [u8], H = Xxh3> {
    /// Number of bits in the filter (m)
    pub(super) bit_count: u64,
    /// Number of indices drawn per item (k)
    pub(super) hash_count: u64,
    pub(super) bits: BitSet,
    pub(super) hasher: H,
    pub(super) _item: PhantomData<fn(&T)>,
}

impl Filter<[u8], Xxh3> {
    /// Creates a byte-slice filter hashed with seeded XXH3.
    ///
    /// # Examples
    ///
    /// ```
    /// # use carbloom::bloom::Filter;
    /// let mut filter = Filter::new_xxh3(1000, 4).unwrap();
    /// filter.add(b"one");
    /// assert!(filter.test(b"one"));
    /// ```
    pub fn new_xxh3(bit_count: u64, hash_count: u64) -> Result<Self, Error> {
        Filter::new(bit_count, hash_count, Xxh3)
    }

    /// Creates a byte-slice filter hashed with seeded XXH3, sized for `n` items at `fpp`.
    pub fn new_xxh3_with_estimates(n: u64, fpp: f64) -> Result<Self, Error> {
        Filter::new_with_estimates(n, fpp, Xxh3)
    }
}

impl<T: ?Sized, H: HashFunction<T>> Filter<T, H> {
    /// Creates an empty filter with `bit_count` bits and `hash_count` indices per item.
    ///
    /// Counts below one are raised to one. The bit count is used as given; it is
    /// not rounded to a power of two.
    ///
    /// # Errors
    ///
    /// Returns an [`Allocation`](crate::error::ErrorKind::Allocation) error if the
    /// bit vector cannot be allocated.
    pub fn new(bit_count: u64, hash_count: u64, hasher: H) -> Result<Self, Error> {
        let bit_count = bit_count.max(1);
        let hash_count = hash_count.max(1);
        let bits = BitSet::new(bit_count)?;
        log::debug!(
            "created filter m={bit_count} k={hash_count} hash={}",
            hasher.id()
        );
        Ok(Filter {
            bit_count,
            hash_count,
            bits,
            hasher,
            _item: PhantomData,
        })
    }

    /// Creates a filter whose bit vector is initialized from packed big-endian `bytes`.
    ///
    /// Counts are clamped as in [`new`](Self::new). `bytes` should hold
    /// `ceil(bit_count / 8)` bytes; a short input is zero-filled and extra input
    /// is ignored.
    ///
    /// # Errors
    ///
    /// Returns an [`Allocation`](crate::error::ErrorKind::Allocation) error if the
    /// bit vector cannot be allocated.
    pub fn from_bytes(
        bit_count: u64,
        hash_count: u64,
        bytes: &[u8],
        hasher: H,
    ) -> Result<Self, Error> {
        let bit_count = bit_count.max(1);
        let hash_count = hash_count.max(1);
        let bits = BitSet::from_bytes(bit_count, bytes)?;
        log::debug!(
            "restored filter m={bit_count} k={hash_count} hash={} from {} bytes",
            hasher.id(),
            bytes.len()
        );
        Ok(Filter {
            bit_count,
            hash_count,
            bits,
            hasher,
            _item: PhantomData,
        })
    }

    /// Creates an empty filter sized by [`estimate_parameters`](super::estimate_parameters).
    ///
    /// # Examples
    ///
    /// ```
    /// # use carbloom::bloom::Filter;
    /// # use carbloom::hash::Xxh3;
    /// let filter = Filter::<[u8]>::new_with_estimates(1000, 0.001, Xxh3).unwrap();
    /// assert_eq!(filter.bit_count(), 16_384);
    /// assert_eq!(filter.hash_count(), 12);
    /// ```
    pub fn new_with_estimates(n: u64, fpp: f64, hasher: H) -> Result<Self, Error> {
        let (bit_count, hash_count) = estimate_parameters(n, fpp);
        Filter::new(bit_count, hash_count, hasher)
    }

    /// Adds `item` by setting each of its `hash_count` bits.
    ///
    /// Adding the same item again leaves the filter unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// # use carbloom::bloom::Filter;
    /// let mut filter = Filter::new_xxh3(1000, 4).unwrap();
    /// filter.add(b"one").add(b"two");
    /// assert!(filter.test(b"one"));
    /// assert!(filter.test(b"two"));
    /// ```
    pub fn add(&mut self, item: &T) -> &mut Self {
        let indices = IndexGenerator::new(self.bit_count, self.hash_count, &self.hasher, item);
        for index in indices {
            self.bits.set(index);
        }
        self
    }

    /// Returns whether `item` is possibly in the set.
    ///
    /// Returns:
    /// - `true`: Item was **possibly** added (or false positive)
    /// - `false`: Item was **definitely not** added
    pub fn test(&self, item: &T) -> bool {
        IndexGenerator::new(self.bit_count, self.hash_count, &self.hasher, item)
            .all(|index| self.bits.test(index))
    }

    /// Tests and adds an item in a single operation.
    ///
    /// Returns whether the item was possibly present before this call.
    pub fn contains_and_add(&mut self, item: &T) -> bool {
        let indices = IndexGenerator::new(self.bit_count, self.hash_count, &self.hasher, item);
        let mut was_present = true;
        for index in indices {
            was_present &= self.bits.test(index);
            self.bits.set(index);
        }
        was_present
    }

    /// Returns the number of bits in the filter (m).
    pub fn bit_count(&self) -> u64 {
        self.bit_count
    }

    /// Returns the number of indices drawn per item (k).
    pub fn hash_count(&self) -> u64 {
        self.hash_count
    }

    /// Returns the hash function.
    pub fn hash_function(&self) -> &H {
        &self.hasher
    }

    /// Returns the packed big-endian bit vector, `ceil(bit_count / 8)` bytes.
    ///
    /// Together with `bit_count`, `hash_count` and the hash function id this is
    /// everything needed to rebuild the filter with [`from_bytes`](Self::from_bytes).
    pub fn bytes(&self) -> Vec<u8> {
        self.bits.bytes()
    }

    /// Returns an independent copy sharing this filter's hash function.
    pub fn copy(&self) -> Result<Self, Error>
    where
        H: Clone,
    {
        Filter::from_bytes(
            self.bit_count,
            self.hash_count,
            &self.bytes(),
            self.hasher.clone(),
        )
    }

    /// Returns the number of bits set to 1.
    pub fn ones_count(&self) -> u64 {
        self.bits.ones_count()
    }

    /// Returns whether no bit is set.
    pub fn is_empty(&self) -> bool {
        self.ones_count() == 0
    }

    /// Returns the fraction of bits set.
    ///
    /// Values above 0.5 indicate the filter holds more items than it was sized for.
    pub fn load_factor(&self) -> f64 {
        self.ones_count() as f64 / self.bit_count as f64
    }

    /// Returns the expected false positive probability after `n` distinct items were added.
    ///
    /// Formula: `(1 - e^(-k * n / m))^k`.
    pub fn fpp(&self, n: u64) -> f64 {
        if n == 0 {
            return 0.0;
        }
        let m = self.bit_count as f64;
        let k = self.hash_count as f64;
        (1.0 - (-k * n as f64 / m).exp()).powf(k)
    }

    /// Estimates how many distinct items have been added from the fraction of set bits.
    ///
    /// Formula: `-m * ln(1 - ones / m) / k`. Saturates at `u64::MAX` once every
    /// bit is set.
    pub fn estimate_entries(&self) -> u64 {
        let m = self.bit_count as f64;
        let k = self.hash_count as f64;
        let ones = self.ones_count() as f64;
        (-m * (1.0 - ones / m).ln() / k) as u64
    }

    /// Returns the number of items this filter is sized for: `m * ln(2) / k`.
    pub fn estimate_capacity(&self) -> u64 {
        (self.bit_count as f64 * LN_2 / self.hash_count as f64) as u64
    }

    /// Checks whether `other` can be merged into this filter.
    ///
    /// Filters are compatible when they share the hash function id, the hash
    /// count and the bit count. The first mismatch in that order is reported.
    ///
    /// # Errors
    ///
    /// Returns an error of kind [`IncompatibleHashFunction`], [`IncompatibleHashCount`]
    /// or [`IncompatibleBitCount`].
    ///
    /// [`IncompatibleHashFunction`]: crate::error::ErrorKind::IncompatibleHashFunction
    /// [`IncompatibleHashCount`]: crate::error::ErrorKind::IncompatibleHashCount
    /// [`IncompatibleBitCount`]: crate::error::ErrorKind::IncompatibleBitCount
    pub fn check_compatibility(&self, other: &Filter<T, H>) -> Result<(), Error> {
        let (ours, theirs) = (self.hasher.id(), other.hasher.id());
        let result = if ours != theirs {
            Err(Error::incompatible_hash_function(ours, theirs))
        } else if self.hash_count != other.hash_count {
            Err(Error::incompatible_hash_count(self.hash_count, other.hash_count))
        } else if self.bit_count != other.bit_count {
            Err(Error::incompatible_bit_count(self.bit_count, other.bit_count))
        } else {
            Ok(())
        };

        if let Err(err) = &result {
            log::debug!("rejected filter combination: {err}");
        }
        result
    }

    /// Returns whether [`check_compatibility`](Self::check_compatibility) succeeds.
    pub fn is_compatible(&self, other: &Filter<T, H>) -> bool {
        self.check_compatibility(other).is_ok()
    }

    /// Merges `other` into this filter via bitwise OR.
    ///
    /// Afterwards this filter recognizes items from either filter. The false
    /// positive rate of the result is at least that of either input.
    ///
    /// # Errors
    ///
    /// Fails without modifying this filter if the filters are not compatible.
    /// See [`check_compatibility`](Self::check_compatibility).
    ///
    /// # Examples
    ///
    /// ```
    /// # use carbloom::bloom::Filter;
    /// let mut f1 = Filter::new_xxh3_with_estimates(20, 0.01).unwrap();
    /// let mut f2 = Filter::new_xxh3_with_estimates(20, 0.01).unwrap();
    /// f1.add(&[1]);
    /// f2.add(&[2]);
    ///
    /// f1.union(&f2).unwrap();
    /// assert!(f1.test(&[1]));
    /// assert!(f1.test(&[2]));
    /// ```
    pub fn union(&mut self, other: &Filter<T, H>) -> Result<(), Error> {
        self.check_compatibility(other)?;
        self.bits.union(&other.bits)
    }

    /// Intersects this filter with `other` via bitwise AND.
    ///
    /// Items added to both filters still test `true`. Bitwise intersection can
    /// leave bits set by different items in each input, so the result may report
    /// false positives that neither input would have.
    ///
    /// # Errors
    ///
    /// Fails without modifying this filter if the filters are not compatible.
    /// See [`check_compatibility`](Self::check_compatibility).
    pub fn intersect(&mut self, other: &Filter<T, H>) -> Result<(), Error> {
        self.check_compatibility(other)?;
        self.bits.intersect(&other.bits)
    }
}

impl<T: ?Sized, H: Clone> Clone for Filter<T, H> {
    fn clone(&self) -> Self {
        Filter {
            bit_count: self.bit_count,
            hash_count: self.hash_count,
            bits: self.bits.clone(),
            hasher: self.hasher.clone(),
            _item: PhantomData,
        }
    }
}

impl<T: ?Sized, H: fmt::Debug> fmt::Debug for Filter<T, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Filter")
            .field("bit_count", &self.bit_count)
            .field("hash_count", &self.hash_count)
            .field("ones_count", &self.bits.ones_count())
            .field("hasher", &self.hasher)
            .finish()
    }
}
