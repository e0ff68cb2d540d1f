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

use carbloom::bloom::Filter;
use carbloom::bloom::FilterBuilder;
use carbloom::bloom::estimate_fpp;
use carbloom::hash::Xxh3;

fn main() {
    // Size a filter for 10,000 blocks using the order-of-magnitude FPP heuristic
    let n = 10_000;
    let fpp = estimate_fpp(n);
    let mut have: Filter = FilterBuilder::with_accuracy(n, fpp).build().unwrap();

    println!(
        "Created filter for {} items at fpp={}: m={} bits, k={}",
        n,
        fpp,
        have.bit_count(),
        have.hash_count()
    );

    println!("\nAdding {} block ids...", n);
    for i in 0..n {
        have.add(format!("block-{i}").as_bytes());
    }

    println!("Bits set: {}", have.ones_count());
    println!("Estimated entries: {}", have.estimate_entries());
    println!("Estimated capacity: {}", have.estimate_capacity());
    println!("Expected FPP at {}: {:.2e}", n, have.fpp(n));

    // A peer only sends what we probably do not have
    let wanted: Vec<String> = (n - 5..n + 5).map(|i| format!("block-{i}")).collect();
    let missing: Vec<&String> = wanted
        .iter()
        .filter(|id| !have.test(id.as_bytes()))
        .collect();
    println!("\nPeer would send {} of {} wanted blocks", missing.len(), wanted.len());

    // Ship the filter: bytes plus (m, k, hash id) out of band
    let bytes = have.bytes();
    println!("\nRaw filter: {} bytes", bytes.len());
    let remote =
        Filter::<[u8]>::from_bytes(have.bit_count(), have.hash_count(), &bytes, Xxh3).unwrap();
    println!("Remote copy compatible: {}", remote.is_compatible(&have));

    // Or the self-describing form
    let serialized = have.serialize().unwrap();
    let restored = Filter::<[u8]>::deserialize(&serialized, Xxh3).unwrap();
    println!(
        "Serialized: {} bytes, restored estimate: {}",
        serialized.len(),
        restored.estimate_entries()
    );

    // Merge what another peer has seen
    let mut other = have.copy().unwrap();
    other.add(b"block-extra");
    have.union(&other).unwrap();
    println!("\nAfter union, has block-extra: {}", have.test(b"block-extra"));
}
