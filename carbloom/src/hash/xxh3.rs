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

use std::hash::Hash;
use std::hash::Hasher;

use xxhash_rust::xxh3::xxh3_64_with_seed;

use super::HashFunction;
use super::HashFunctionId;

/// Seeded XXH3 (64-bit) over raw bytes.
///
/// This is the default hash function for byte-oriented filters. Strings are
/// hashed as their UTF-8 bytes, so `"abc"` and `b"abc"` land on the same bits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Xxh3;

impl Xxh3 {
    /// Identity token shared by every `Xxh3` instance.
    pub const ID: HashFunctionId = HashFunctionId::new("xxh3-64");
}

impl HashFunction<[u8]> for Xxh3 {
    fn id(&self) -> HashFunctionId {
        Self::ID
    }

    #[inline]
    fn hash(&self, item: &[u8], seed: u64) -> u64 {
        xxh3_64_with_seed(item, seed)
    }
}

impl HashFunction<str> for Xxh3 {
    fn id(&self) -> HashFunctionId {
        Self::ID
    }

    #[inline]
    fn hash(&self, item: &str, seed: u64) -> u64 {
        xxh3_64_with_seed(item.as_bytes(), seed)
    }
}

impl HashFunction<Vec<u8>> for Xxh3 {
    fn id(&self) -> HashFunctionId {
        Self::ID
    }

    #[inline]
    fn hash(&self, item: &Vec<u8>, seed: u64) -> u64 {
        xxh3_64_with_seed(item, seed)
    }
}

/// Seeded XXH3 over any [`Hash`] value.
///
/// The value is fed through the streaming XXH3 hasher, so the result depends
/// on the [`Hash`] implementation of `T` rather than on a fixed byte layout.
/// Prefer [`Xxh3`] when filters are exchanged between processes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct XxHashable;

impl XxHashable {
    /// Identity token shared by every `XxHashable` instance.
    pub const ID: HashFunctionId = HashFunctionId::new("xxh3-64-hash");
}

impl<T: Hash + ?Sized> HashFunction<T> for XxHashable {
    fn id(&self) -> HashFunctionId {
        Self::ID
    }

    fn hash(&self, item: &T, seed: u64) -> u64 {
        let mut hasher = xxhash_rust::xxh3::Xxh3::with_seed(seed);
        item.hash(&mut hasher);
        hasher.finish()
    }
}
