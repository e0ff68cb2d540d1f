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

use super::Filter;
use super::estimate_fpp;
use super::estimate_parameters;
use crate::error::Error;
use crate::hash::HashFunction;
use crate::hash::Xxh3;

#[derive(Debug, Clone, Copy)]
enum Sizing {
    Size { bit_count: u64, hash_count: u64 },
    Accuracy { max_items: u64, fpp: f64 },
}

/// Builder for creating [`Filter`] instances.
///
/// Provides three construction modes:
/// - [`with_accuracy()`](FilterBuilder::with_accuracy): Specify target items and false
///   positive rate
/// - [`with_estimated_fpp()`](FilterBuilder::with_estimated_fpp): Specify target items only;
///   the rate comes from [`estimate_fpp`]
/// - [`with_size()`](FilterBuilder::with_size): Specify bit count and hash count (manual)
///
/// The hash function defaults to [`Xxh3`]; pick another one with
/// [`hasher()`](Self::hasher).
#[derive(Debug, Clone)]
pub struct FilterBuilder<H = Xxh3> {
    sizing: Sizing,
    hasher: H,
}

impl FilterBuilder<Xxh3> {
    /// Creates a builder sized for `max_items` items at false positive probability `fpp`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use carbloom::bloom::Filter;
    /// # use carbloom::bloom::FilterBuilder;
    /// let filter: Filter = FilterBuilder::with_accuracy(10_000, 0.01).build().unwrap();
    /// assert!(filter.bit_count().is_power_of_two());
    /// ```
    pub fn with_accuracy(max_items: u64, fpp: f64) -> Self {
        FilterBuilder {
            sizing: Sizing::Accuracy { max_items, fpp },
            hasher: Xxh3,
        }
    }

    /// Creates a builder sized for `max_items` items at the heuristic rate of
    /// [`estimate_fpp`].
    pub fn with_estimated_fpp(max_items: u64) -> Self {
        Self::with_accuracy(max_items, estimate_fpp(max_items))
    }

    /// Creates a builder with an explicit bit count and hash count.
    ///
    /// Counts below one are raised to one; the bit count is otherwise used as given.
    ///
    /// # Examples
    ///
    /// ```
    /// # use carbloom::bloom::Filter;
    /// # use carbloom::bloom::FilterBuilder;
    /// let filter: Filter = FilterBuilder::with_size(1000, 4).build().unwrap();
    /// assert_eq!(filter.bit_count(), 1000);
    /// ```
    pub fn with_size(bit_count: u64, hash_count: u64) -> Self {
        FilterBuilder {
            sizing: Sizing::Size {
                bit_count,
                hash_count,
            },
            hasher: Xxh3,
        }
    }
}

impl<H> FilterBuilder<H> {
    /// Sets the hash function.
    ///
    /// **Important**: Filters with different hash functions cannot be merged.
    ///
    /// # Examples
    ///
    /// ```
    /// # use carbloom::bloom::Filter;
    /// # use carbloom::bloom::FilterBuilder;
    /// # use carbloom::hash::XxHashable;
    /// let mut filter: Filter<u64, XxHashable> = FilterBuilder::with_accuracy(100, 0.01)
    ///     .hasher(XxHashable)
    ///     .build()
    ///     .unwrap();
    /// filter.add(&7);
    /// assert!(filter.test(&7));
    /// ```
    pub fn hasher<G>(self, hasher: G) -> FilterBuilder<G> {
        FilterBuilder {
            sizing: self.sizing,
            hasher,
        }
    }

    /// Returns the `(bit_count, hash_count)` the built filter will use.
    ///
    /// # Errors
    ///
    /// Returns an [`InvalidArgument`](crate::error::ErrorKind::InvalidArgument) error
    /// if `max_items` is zero or `fpp` is not in `(0.0, 1.0]`.
    pub fn parameters(&self) -> Result<(u64, u64), Error> {
        match self.sizing {
            Sizing::Size {
                bit_count,
                hash_count,
            } => Ok((bit_count.max(1), hash_count.max(1))),
            Sizing::Accuracy { max_items, fpp } => {
                if max_items == 0 {
                    return Err(Error::invalid_argument("max_items must be greater than 0"));
                }
                if fpp.is_nan() || fpp <= 0.0 || fpp > 1.0 {
                    return Err(
                        Error::invalid_argument("fpp must be in (0.0, 1.0]")
                            .with_context("fpp", fpp),
                    );
                }
                Ok(estimate_parameters(max_items, fpp))
            }
        }
    }

    /// Builds the filter.
    ///
    /// # Errors
    ///
    /// Fails on invalid accuracy inputs (see [`parameters`](Self::parameters)) or
    /// when the bit vector cannot be allocated.
    pub fn build<T: ?Sized>(self) -> Result<Filter<T, H>, Error>
    where
        H: HashFunction<T>,
    {
        let (bit_count, hash_count) = self.parameters()?;
        Filter::new(bit_count, hash_count, self.hasher)
    }
}
