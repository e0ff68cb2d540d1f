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

use std::marker::PhantomData;

use super::Filter;
use crate::bitset::BitSet;
use crate::codec::FilterBytes;
use crate::codec::FilterSlice;
use crate::error::Error;
use crate::hash::HashFunction;

// Serialization constants
const SERIAL_VERSION: u8 = 1;
const FILTER_FAMILY_ID: u8 = 0xB1;
const EMPTY_FLAG_MASK: u8 = 1 << 2;
const PREAMBLE_BYTES: usize = 20;

/// Largest hash count a serialized filter may carry.
pub const MAX_HASH_COUNT: u64 = i16::MAX as u64;
/// Largest bit count a serialized filter may carry.
pub const MAX_BIT_COUNT: u64 = i32::MAX as u64 * 64;
// An empty-flagged filter carries no bit bytes, so its bit count is not backed by input length.
const MAX_EMPTY_BIT_COUNT: u64 = 1 << 23;

impl<T: ?Sized, H: HashFunction<T>> Filter<T, H> {
    /// Serializes the filter together with its parameters and hash function id.
    ///
    /// Layout (integers little-endian):
    ///
    /// ```text
    /// byte 0       serial version
    /// byte 1       family id
    /// byte 2       flags
    /// byte 3       length of the hash function id
    /// bytes 4..12  hash count
    /// bytes 12..20 bit count
    /// ...          hash function id (UTF-8)
    /// ...          bit vector bytes, omitted when the empty flag is set
    /// ```
    ///
    /// The empty flag is only used for filters of at most 2^23 bits; larger
    /// filters always carry their bit vector.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidArgument`](crate::error::ErrorKind::InvalidArgument) if
    /// the hash function id is longer than 255 bytes, or if the hash count or
    /// bit count exceed [`MAX_HASH_COUNT`] or [`MAX_BIT_COUNT`].
    ///
    /// # Examples
    ///
    /// ```
    /// # use carbloom::bloom::Filter;
    /// # use carbloom::hash::Xxh3;
    /// let mut filter = Filter::new_xxh3(100, 3).unwrap();
    /// filter.add(b"test");
    ///
    /// let bytes = filter.serialize().unwrap();
    /// let restored = Filter::<[u8]>::deserialize(&bytes, Xxh3).unwrap();
    /// assert!(restored.test(b"test"));
    /// ```
    pub fn serialize(&self) -> Result<Vec<u8>, Error> {
        let name = self.hasher.id().name();
        let id = name.as_bytes();
        let id_len = u8::try_from(id.len()).map_err(|_| {
            Error::invalid_argument("hash function id must be at most 255 bytes")
                .with_context("id", name)
                .with_context("len", id.len())
        })?;
        if self.hash_count > MAX_HASH_COUNT || self.bit_count > MAX_BIT_COUNT {
            return Err(
                Error::invalid_argument("filter is too large to serialize")
                    .with_context("hash_count", self.hash_count)
                    .with_context("bit_count", self.bit_count),
            );
        }

        let bits = self.bits.bytes();
        let is_empty = self.bit_count <= MAX_EMPTY_BIT_COUNT && bits.iter().all(|b| *b == 0);

        let capacity = PREAMBLE_BYTES + id.len() + if is_empty { 0 } else { bits.len() };
        let mut bytes = FilterBytes::with_capacity(capacity);

        bytes.write_u8(SERIAL_VERSION);
        bytes.write_u8(FILTER_FAMILY_ID);
        bytes.write_u8(if is_empty { EMPTY_FLAG_MASK } else { 0 });
        bytes.write_u8(id_len);
        bytes.write_u64_le(self.hash_count);
        bytes.write_u64_le(self.bit_count);
        bytes.write(id);
        if !is_empty {
            bytes.write(&bits);
        }

        Ok(bytes.into_bytes())
    }

    /// Deserializes a filter written by [`serialize`](Self::serialize).
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The data is truncated or corrupted
    /// - The family id or serial version doesn't match
    /// - The hash count or bit count is zero or above [`MAX_HASH_COUNT`] / [`MAX_BIT_COUNT`]
    /// - The empty flag is set on a filter larger than 2^23 bits
    /// - `hasher` does not carry the hash function id the filter was written with
    /// - The bit vector cannot be allocated
    pub fn deserialize(bytes: &[u8], hasher: H) -> Result<Self, Error> {
        let result = Self::deserialize_inner(bytes, hasher);
        if let Err(err) = &result {
            log::debug!("failed to deserialize filter: {err}");
        }
        result
    }

    fn deserialize_inner(bytes: &[u8], hasher: H) -> Result<Self, Error> {
        let mut cursor = FilterSlice::new(bytes);

        let serial_version = cursor
            .read_u8()
            .map_err(|_| Error::insufficient_data("serial_version"))?;
        let family_id = cursor
            .read_u8()
            .map_err(|_| Error::insufficient_data("family_id"))?;
        let flags = cursor
            .read_u8()
            .map_err(|_| Error::insufficient_data("flags"))?;
        let id_len = cursor
            .read_u8()
            .map_err(|_| Error::insufficient_data("id_len"))?;

        if family_id != FILTER_FAMILY_ID {
            return Err(Error::invalid_family(FILTER_FAMILY_ID, family_id, "Filter"));
        }
        if serial_version != SERIAL_VERSION {
            return Err(Error::unsupported_serial_version(SERIAL_VERSION, serial_version));
        }

        let hash_count = cursor
            .read_u64_le()
            .map_err(|_| Error::insufficient_data("hash_count"))?;
        let bit_count = cursor
            .read_u64_le()
            .map_err(|_| Error::insufficient_data("bit_count"))?;
        if hash_count == 0 || bit_count == 0 {
            return Err(
                Error::deserial("hash count and bit count must be positive")
                    .with_context("hash_count", hash_count)
                    .with_context("bit_count", bit_count),
            );
        }
        if hash_count > MAX_HASH_COUNT || bit_count > MAX_BIT_COUNT {
            return Err(
                Error::deserial("hash count or bit count out of range")
                    .with_context("hash_count", hash_count)
                    .with_context("bit_count", bit_count),
            );
        }

        let mut id = vec![0u8; id_len as usize];
        cursor
            .read_exact(&mut id)
            .map_err(|_| Error::insufficient_data("hash_function_id"))?;
        let expected = hasher.id();
        if id != expected.name().as_bytes() {
            return Err(Error::incompatible_hash_function(expected, String::from_utf8_lossy(&id)));
        }

        let is_empty = (flags & EMPTY_FLAG_MASK) != 0;
        let bits = if is_empty {
            if bit_count > MAX_EMPTY_BIT_COUNT {
                return Err(
                    Error::deserial("empty flag set on an oversized filter")
                        .with_context("bit_count", bit_count),
                );
            }
            BitSet::new(bit_count)?
        } else {
            let len = bit_count.div_ceil(8);
            if (cursor.remaining() as u64) < len {
                return Err(
                    Error::insufficient_data("bit_array")
                        .with_context("expected", len)
                        .with_context("actual", cursor.remaining()),
                );
            }
            let mut buf = vec![0u8; len as usize];
            cursor
                .read_exact(&mut buf)
                .map_err(|_| Error::insufficient_data("bit_array"))?;
            BitSet::from_bytes(bit_count, &buf)?
        };

        Ok(Filter {
            bit_count,
            hash_count,
            bits,
            hasher,
            _item: PhantomData,
        })
    }
}
