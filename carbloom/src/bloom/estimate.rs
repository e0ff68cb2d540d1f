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

/// Returns `i` if it is a power of two, otherwise the next power of two above it.
///
/// Zero maps to one and values above `2^63` saturate at `2^63`.
pub fn next_power_of_two(i: u64) -> u64 {
    i.checked_next_power_of_two().unwrap_or(1 << 63)
}

/// Computes `(bit_count, hash_count)` for `n` items at a false positive probability of `fpp`.
///
/// Uses the optimal sizing
///
/// ```text
/// m = ceil(-n * ln(fpp) / ln(2)^2)
/// k = ceil((m / n) * ln(2))
/// ```
///
/// with `m` rounded up to a power of two before `k` is derived, so filters sized
/// this way never need rejection sampling. Both results are at least one.
///
/// # Examples
///
/// ```
/// # use carbloom::bloom::estimate_parameters;
/// let (bits, hashes) = estimate_parameters(1000, 0.001);
/// assert_eq!(bits, 16_384);
/// assert_eq!(hashes, 12);
/// ```
pub fn estimate_parameters(n: u64, fpp: f64) -> (u64, u64) {
    if n == 0 {
        return (1, 1);
    }

    let n = n as f64;
    // `as` saturates: NaN and negatives become zero
    let bits = (-n * fpp.ln() / (LN_2 * LN_2)).ceil() as u64;
    let bit_count = next_power_of_two(bits);
    let hash_count = ((bit_count as f64 / n) * LN_2).ceil() as u64;

    log::trace!("estimated parameters for n={n} fpp={fpp}: m={bit_count} k={hash_count}");
    (bit_count, hash_count.max(1))
}

/// Picks a target false positive probability for `n` items.
///
/// This is an order-of-magnitude heuristic, not an optimum: the result is
/// `10^-round(log10(n))`, so some hundreds of thousands of items target `1e-5`
/// or `1e-6` depending on rounding. Zero items yield `0.0`.
///
/// # Examples
///
/// ```
/// # use carbloom::bloom::estimate_fpp;
/// assert_eq!(estimate_fpp(1_000_000), 1.0 / 1_000_000.0);
/// assert_eq!(estimate_fpp(0), 0.0);
/// ```
pub fn estimate_fpp(n: u64) -> f64 {
    if n == 0 {
        return 0.0;
    }
    let magnitude = (n as f64).log10().round() as i32;
    1.0 / 10f64.powi(magnitude)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_power_of_two() {
        assert_eq!(next_power_of_two(0), 1);
        assert_eq!(next_power_of_two(1), 1);
        assert_eq!(next_power_of_two(3), 4);
        assert_eq!(next_power_of_two(1024), 1024);
        assert_eq!(next_power_of_two(1025), 2048);
        assert_eq!(next_power_of_two(1 << 40), 1 << 40);
        assert_eq!(next_power_of_two((1 << 40) + 1), 1 << 41);
        assert_eq!(next_power_of_two(u64::MAX), 1 << 63);
    }

    #[test]
    fn test_estimate_parameters() {
        assert_eq!(estimate_parameters(1000, 0.001), (16_384, 12));
        // m = ceil(191.7) = 192 -> 256, k = ceil(12.8 * ln 2) = 9
        assert_eq!(estimate_parameters(20, 0.01), (256, 9));

        let (bits, hashes) = estimate_parameters(1_000_000, 0.01);
        assert!(bits.is_power_of_two());
        assert_eq!(bits, 1 << 24);
        assert_eq!(hashes, 12);
    }

    #[test]
    fn test_estimate_parameters_degenerate() {
        assert_eq!(estimate_parameters(0, 0.01), (1, 1));
        assert_eq!(estimate_parameters(10, 1.0), (1, 1));
        assert_eq!(estimate_parameters(10, 2.0), (1, 1));
    }

    #[test]
    fn test_estimate_fpp() {
        assert_eq!(estimate_fpp(0), 0.0);
        assert_eq!(estimate_fpp(1), 1.0);
        assert_eq!(estimate_fpp(3), 1.0);
        assert_eq!(estimate_fpp(4), 0.1);
        assert_eq!(estimate_fpp(1000), 1.0 / 1000.0);
        assert_eq!(estimate_fpp(100_000), 1.0 / 100_000.0);
        assert_eq!(estimate_fpp(300_000), 1.0 / 100_000.0);
        assert_eq!(estimate_fpp(400_000), 1.0 / 1_000_000.0);
        assert_eq!(estimate_fpp(1_000_000), 1.0 / 1_000_000.0);
    }
}
