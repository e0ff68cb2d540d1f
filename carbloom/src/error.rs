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

//! Error types for carbloom operations

use std::fmt;

/// ErrorKind is all kinds of Error of carbloom.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The argument provided is invalid.
    InvalidArgument,
    /// The filter data deserializing is malformed.
    InvalidData,
    /// The backing bit vector could not be allocated.
    Allocation,
    /// The two filters were built with different hash functions.
    IncompatibleHashFunction,
    /// The two filters use a different number of hashes per item.
    IncompatibleHashCount,
    /// The two filters have bit arrays of different lengths.
    IncompatibleBitCount,
}

impl ErrorKind {
    /// Convert this error kind instance into static str.
    pub const fn into_static(self) -> &'static str {
        match self {
            ErrorKind::InvalidArgument => "InvalidArgument",
            ErrorKind::InvalidData => "InvalidData",
            ErrorKind::Allocation => "Allocation",
            ErrorKind::IncompatibleHashFunction => "IncompatibleHashFunction",
            ErrorKind::IncompatibleHashCount => "IncompatibleHashCount",
            ErrorKind::IncompatibleBitCount => "IncompatibleBitCount",
        }
    }

    /// Returns whether this kind reports a failed compatibility check between two filters.
    pub const fn is_incompatibility(self) -> bool {
        matches!(
            self,
            ErrorKind::IncompatibleHashFunction
                | ErrorKind::IncompatibleHashCount
                | ErrorKind::IncompatibleBitCount
        )
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.into_static())
    }
}

/// Error is the error struct returned by all carbloom functions.
///
/// # Examples
///
/// ```
/// # use carbloom::error::Error;
/// # use carbloom::error::ErrorKind;
/// let err = Error::new(ErrorKind::InvalidArgument, "bad input");
/// assert_eq!(err.kind(), ErrorKind::InvalidArgument);
/// assert_eq!(err.message(), "bad input");
/// ```
pub struct Error {
    kind: ErrorKind,
    message: String,
    context: Vec<(&'static str, String)>,
}

impl Error {
    /// Create a new Error with error kind and message.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            context: vec![],
        }
    }

    /// Add more context in error.
    pub fn with_context(mut self, key: &'static str, value: impl ToString) -> Self {
        self.context.push((key, value.to_string()));
        self
    }

    /// Return error's kind.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Return error's message.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }
}

// Convenient constructors used within carbloom crate.
impl Error {
    pub(crate) fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidArgument, msg)
    }

    pub(crate) fn deserial(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidData, msg)
    }

    pub(crate) fn insufficient_data(msg: impl fmt::Display) -> Self {
        Self::deserial(format!("insufficient data: {msg}"))
    }

    pub(crate) fn invalid_family(expected: u8, actual: u8, name: &'static str) -> Self {
        Self::deserial(format!(
            "invalid family: expected {expected} ({name}), got {actual}"
        ))
    }

    pub(crate) fn unsupported_serial_version(expected: u8, actual: u8) -> Self {
        Self::deserial(format!(
            "unsupported serial version: expected {expected}, got {actual}"
        ))
    }

    pub(crate) fn allocation(num_bits: u64) -> Self {
        Self::new(ErrorKind::Allocation, "cannot allocate bit vector")
            .with_context("num_bits", num_bits)
    }

    pub(crate) fn incompatible_hash_function(
        ours: impl fmt::Display,
        theirs: impl fmt::Display,
    ) -> Self {
        Self::new(ErrorKind::IncompatibleHashFunction, "incompatible hash functions")
            .with_context("expected", ours)
            .with_context("actual", theirs)
    }

    pub(crate) fn incompatible_hash_count(ours: u64, theirs: u64) -> Self {
        Self::new(ErrorKind::IncompatibleHashCount, "incompatible hash count")
            .with_context("expected", ours)
            .with_context("actual", theirs)
    }

    pub(crate) fn incompatible_bit_count(ours: u64, theirs: u64) -> Self {
        Self::new(ErrorKind::IncompatibleBitCount, "incompatible bit count")
            .with_context("expected", ours)
            .with_context("actual", theirs)
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // If alternate has been specified, we will print like Debug.
        if f.alternate() {
            let mut de = f.debug_struct("Error");
            de.field("kind", &self.kind);
            de.field("message", &self.message);
            de.field("context", &self.context);
            return de.finish();
        }

        write!(f, "{}", self.kind)?;
        if !self.message.is_empty() {
            write!(f, " => {}", self.message)?;
        }
        writeln!(f)?;

        if !self.context.is_empty() {
            writeln!(f)?;
            writeln!(f, "Context:")?;
            for (k, v) in self.context.iter() {
                writeln!(f, "   {k}: {v}")?;
            }
        }

        Ok(())
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;

        if !self.context.is_empty() {
            write!(f, ", context: {{ ")?;
            for (i, (k, v)) in self.context.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}: {}", k, v)?;
            }
            write!(f, " }}")?;
        }

        if !self.message.is_empty() {
            write!(f, " => {}", self.message)?;
        }

        Ok(())
    }
}

impl std::error::Error for Error {}
