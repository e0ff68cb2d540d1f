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

//! Pluggable hash functions used to derive bit indices.
//!
//! A filter never looks inside its hash function: it only calls
//! [`HashFunction::hash`] with an item and a seed, and compares
//! [`HashFunction::id`] tokens when deciding whether two filters can be combined.
//!
//! Two hash functions are treated as the same only when they report the same
//! [`HashFunctionId`]. Functions that happen to produce identical outputs but
//! carry different ids are rejected; outputs are never compared.

mod xxh3;

use std::fmt;

pub use self::xxh3::XxHashable;
pub use self::xxh3::Xxh3;

/// A stable identity token for a hash function.
///
/// Filters built with hash functions whose ids differ cannot be merged, and a
/// serialized filter can only be restored with a hash function carrying the id
/// it was written with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct HashFunctionId(&'static str);

impl HashFunctionId {
    /// Creates an id from a name that uniquely identifies a hash algorithm.
    pub const fn new(name: &'static str) -> Self {
        HashFunctionId(name)
    }

    /// Returns the name of this id.
    pub const fn name(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for HashFunctionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// A seeded 64-bit hash over items of type `T`.
///
/// Implementations must be deterministic for a fixed `(item, seed)` pair and
/// should mix well across all 64 output bits: index generation consumes the
/// hash in several narrow windows before asking for a fresh one.
pub trait HashFunction<T: ?Sized> {
    /// Returns the identity token used for compatibility checks.
    fn id(&self) -> HashFunctionId;

    /// Hashes `item` with the given `seed`.
    fn hash(&self, item: &T, seed: u64) -> u64;
}

impl<T: ?Sized, H: HashFunction<T> + ?Sized> HashFunction<T> for &H {
    fn id(&self) -> HashFunctionId {
        (**self).id()
    }

    fn hash(&self, item: &T, seed: u64) -> u64 {
        (**self).hash(item, seed)
    }
}

/// A hash function backed by a plain function pointer.
///
/// # Examples
///
/// ```
/// # use carbloom::hash::FnHash;
/// # use carbloom::hash::HashFunction;
/// fn fold(item: &u64, seed: u64) -> u64 {
///     (item ^ seed).wrapping_mul(0x9e37_79b9_7f4a_7c15)
/// }
///
/// let hasher = FnHash::new("fold", fold);
/// assert_eq!(hasher.id().name(), "fold");
/// assert_eq!(hasher.hash(&1, 0), 0x9e37_79b9_7f4a_7c15);
/// ```
pub struct FnHash<T: ?Sized> {
    id: HashFunctionId,
    function: fn(&T, u64) -> u64,
}

impl<T: ?Sized> FnHash<T> {
    /// Wraps `function` under the identity `name`.
    pub const fn new(name: &'static str, function: fn(&T, u64) -> u64) -> Self {
        FnHash {
            id: HashFunctionId::new(name),
            function,
        }
    }
}

impl<T: ?Sized> HashFunction<T> for FnHash<T> {
    fn id(&self) -> HashFunctionId {
        self.id
    }

    fn hash(&self, item: &T, seed: u64) -> u64 {
        (self.function)(item, seed)
    }
}

impl<T: ?Sized> Clone for FnHash<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: ?Sized> Copy for FnHash<T> {}

impl<T: ?Sized> fmt::Debug for FnHash<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnHash").field("id", &self.id).finish()
    }
}
