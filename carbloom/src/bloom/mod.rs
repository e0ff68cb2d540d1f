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

//! Bloom filter with seeded, rejection-sampled index generation.
//!
//! A Bloom filter is a space-efficient probabilistic data structure used to test whether
//! an element is a member of a set. False positive matches are possible, but false negatives
//! are not. In other words, a query returns either "possibly in set" or "definitely not in set".
//!
//! # Properties
//!
//! - **No false negatives**: If an item was added, `test()` will always return `true`
//! - **Possible false positives**: `test()` may return `true` for items never added
//! - **Fixed size**: the bit count and hash count never change after construction
//! - **Pluggable hashing**: any [`HashFunction`](crate::hash::HashFunction) can drive the
//!   filter; filters only combine when their hash function ids match
//!
//! # Usage
//!
//! ```rust
//! use carbloom::bloom::Filter;
//!
//! // 1000 bits, 4 indices per item, hashed with seeded XXH3
//! let mut filter = Filter::new_xxh3(1000, 4).unwrap();
//!
//! filter.add(b"apple").add(b"banana");
//!
//! assert!(filter.test(b"apple")); // true - definitely added
//! assert!(!filter.test(b"grape")); // false - never added (probably)
//!
//! println!("Bits set: {}", filter.ones_count());
//! println!("Est. entries: {}", filter.estimate_entries());
//! println!("FPP at 2 items: {:.6}", filter.fpp(2));
//! ```
//!
//! # Index Generation
//!
//! Each item is hashed with seeds `0, 1, 2, ...`. A hash is masked down to the
//! smallest power-of-two range covering the bit array; if the masked value falls
//! past the end of the array, the next window of the same hash is tried before a
//! fresh seed is used. Sizes that are powers of two never reject, which is why
//! [`estimate_parameters`] rounds the bit count up to one.
//!
//! # Set Operations
//!
//! ```rust
//! # use carbloom::bloom::Filter;
//! let mut filter1 = Filter::new_xxh3_with_estimates(100, 0.01).unwrap();
//! let mut filter2 = Filter::new_xxh3_with_estimates(100, 0.01).unwrap();
//!
//! filter1.add(b"a");
//! filter2.add(b"b");
//!
//! // Union: recognizes items from either filter
//! filter1.union(&filter2).unwrap();
//! assert!(filter1.test(b"a"));
//! assert!(filter1.test(b"b"));
//!
//! // Mismatched sizes are rejected and leave the receiver untouched
//! let other = Filter::new_xxh3(64, 2).unwrap();
//! assert!(filter1.union(&other).is_err());
//! ```
//!
//! # Interchange
//!
//! [`Filter::bytes`] returns the bit vector packed big-endian. The bit count, the
//! hash count and the hash function id travel separately and are needed to rebuild
//! the filter with [`Filter::from_bytes`]. [`Filter::serialize`] bundles all four.

mod builder;
mod estimate;
mod filter;
mod index;
mod serialization;

pub use self::builder::FilterBuilder;
pub use self::estimate::estimate_fpp;
pub use self::estimate::estimate_parameters;
pub use self::estimate::next_power_of_two;
pub use self::filter::Filter;
pub use self::index::IndexGenerator;
pub use self::serialization::MAX_BIT_COUNT;
pub use self::serialization::MAX_HASH_COUNT;
