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

//! Estimator Integration Tests
//!
//! These tests verify parameter sizing and the FPP, entries and capacity estimators.

use carbloom::bloom::Filter;
use carbloom::bloom::FilterBuilder;
use carbloom::bloom::estimate_fpp;
use carbloom::bloom::estimate_parameters;
use carbloom::hash::Xxh3;
use googletest::assert_that;
use googletest::prelude::le;
use googletest::prelude::near;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;

#[test]
fn test_fpp_bound() {
    let (bits, hashes) = estimate_parameters(1000, 0.001);
    assert!(bits.is_power_of_two());

    let mut filter = Filter::new_xxh3(bits, hashes).unwrap();
    for i in 0..1000_u32 {
        filter.add(&i.to_be_bytes());
    }

    let false_positives = (1000..2000_u32)
        .filter(|i| filter.test(&i.to_be_bytes()))
        .count();
    assert_that!(filter.fpp(1000), le(0.001));
    assert_that!(false_positives, le(10));
}

#[test]
fn test_fpp_grows_with_load() {
    let filter = Filter::new_xxh3(1024, 4).unwrap();
    let mut last = 0.0;
    for n in [1, 10, 100, 500, 1000] {
        let fpp = filter.fpp(n);
        assert!(fpp > last, "fpp({n}) = {fpp} not above {last}");
        last = fpp;
    }
    assert_that!(last, le(1.0));
}

#[test]
fn test_estimate_fpp_heuristic() {
    assert_eq!(estimate_fpp(0), 0.0);
    assert_eq!(estimate_fpp(1_000_000), 1.0 / 1_000_000.0);
    assert_eq!(estimate_fpp(100_000), 1.0 / 100_000.0);
}

#[test]
fn test_estimate_entries_accuracy() {
    let mut rng = StdRng::seed_from_u64(42);
    for count in [50_u64, 100, 200, 300, 400] {
        let mut filter = Filter::new_xxh3(1024, 4).unwrap();
        for _ in 0..count {
            filter.add(&rng.random::<u64>().to_be_bytes());
        }
        let expected = count as f64;
        assert_that!(
            filter.estimate_entries() as f64,
            near(expected, expected * 0.2)
        );
    }
}

#[test]
fn test_estimate_entries_after_restore() {
    let mut filter = Filter::new_xxh3(4096, 3).unwrap();
    for i in 0..500_u32 {
        filter.add(&i.to_le_bytes());
    }
    let restored = Filter::<[u8]>::from_bytes(4096, 3, &filter.bytes(), Xxh3).unwrap();
    assert_eq!(restored.estimate_entries(), filter.estimate_entries());
    assert_that!(restored.estimate_entries() as f64, near(500.0, 100.0));
}

#[test]
fn test_estimate_capacity() {
    let filter: Filter = FilterBuilder::with_accuracy(1000, 0.01).build().unwrap();
    // 16384 * ln 2 / 12
    assert_eq!(filter.estimate_capacity(), 946);

    let filter = Filter::new_xxh3(1024, 4).unwrap();
    assert_eq!(filter.estimate_capacity(), 177);
}
