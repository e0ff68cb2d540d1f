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

//! Filter Integration Tests
//!
//! These tests verify the membership behavior of Filter:
//! - No false negatives across random inputs
//! - Exact sizing and count clamping
//! - Rejection sampling for bit counts that are not powers of two
//! - Byte round-trips and independent copies

use carbloom::bloom::Filter;
use carbloom::bloom::IndexGenerator;
use carbloom::hash::XxHashable;
use carbloom::hash::Xxh3;
use googletest::assert_that;
use googletest::prelude::eq;
use googletest::prelude::le;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;

fn random_items(seed: u64, count: usize) -> Vec<[u8; 8]> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| rng.random::<u64>().to_be_bytes())
        .collect()
}

#[test]
fn test_no_false_negatives() {
    let items = random_items(1, 2_000);
    let mut filter = Filter::new_xxh3(8_192, 5).unwrap();

    for (i, item) in items.iter().enumerate() {
        filter.add(item);
        assert!(filter.test(item), "item {i} missing right after add");
    }
    for item in &items {
        assert!(filter.test(item));
    }
}

#[test]
fn test_sized_exactly() {
    let filter = Filter::new_xxh3(1000, 4).unwrap();
    assert_that!(filter.bit_count(), eq(1000));
    assert_that!(filter.bytes().len(), eq(1000_usize.div_ceil(8)));
}

#[test]
fn test_clamping_is_not_rounding() {
    for (bits, hashes, want_bits) in [(0, 0, 1), (2, 0, 2), (3, 0, 3), (1000, 0, 1000)] {
        let filter = Filter::new_xxh3(bits, hashes).unwrap();
        assert_eq!(filter.hash_count(), 1);
        assert_eq!(filter.bit_count(), want_bits);
    }
}

#[test]
fn test_large_not_power_of_two() {
    for trial in 0..50 {
        let mut filter = Filter::new_xxh3(9, 10).unwrap();
        for item in random_items(trial, 8) {
            filter.add(&item);
            assert!(filter.test(&item), "trial {trial}");
        }
    }
}

#[test]
fn test_odd_sizes_stay_in_bounds() {
    for bit_count in [5_u64, 9, 17, 1000, 12_345] {
        let mut filter = Filter::new_xxh3(bit_count, 7).unwrap();
        for item in random_items(bit_count, 300) {
            let indices: Vec<u64> =
                IndexGenerator::new(bit_count, 7, &Xxh3, item.as_slice()).collect();
            assert_eq!(indices.len(), 7);
            assert!(indices.iter().all(|&i| i < bit_count));

            filter.add(&item);
            assert!(filter.test(&item));
        }
        assert_that!(filter.ones_count(), le(bit_count));
    }
}

#[test]
fn test_bytes_round_trip() {
    let items = random_items(7, 200);
    let mut filter = Filter::new_xxh3(3_001, 6).unwrap();
    for item in &items {
        filter.add(item);
    }

    let bytes = filter.bytes();
    let restored =
        Filter::<[u8]>::from_bytes(filter.bit_count(), filter.hash_count(), &bytes, Xxh3)
            .unwrap();
    assert_eq!(restored.bytes(), bytes);
    assert!(restored.is_compatible(&filter));
    for item in &items {
        assert!(restored.test(item));
    }
    for item in random_items(8, 200) {
        assert_eq!(restored.test(&item), filter.test(&item));
    }
}

#[test]
fn test_copy_does_not_alias() {
    let mut original = Filter::<u64, XxHashable>::new(2_048, 4, XxHashable).unwrap();
    for i in 0..50_u64 {
        original.add(&i);
    }
    let snapshot = original.bytes();

    let mut copy = original.copy().unwrap();
    for i in 50..500_u64 {
        copy.add(&i);
    }
    assert_eq!(original.bytes(), snapshot);
    assert!(copy.ones_count() > original.ones_count());
    original.union(&copy).unwrap();
    assert_eq!(original.bytes(), copy.bytes());
}

#[test]
fn test_generic_items() {
    let mut filter = Filter::<str, Xxh3>::new(1_024, 3, Xxh3).unwrap();
    filter.add("apple").add("banana");
    assert!(filter.test("apple"));
    assert!(filter.test("banana"));
    assert!(!filter.test("grape"));

    let mut filter = Filter::<(u32, &str), XxHashable>::new(1_024, 3, XxHashable).unwrap();
    filter.add(&(1, "one"));
    assert!(filter.test(&(1, "one")));
    assert!(!filter.test(&(2, "one")));
}
