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

//! Invertible Bloom filter implementation for set reconciliation.
//!
//! An invertible Bloom filter (IBF) is a fixed-size probabilistic set
//! representation that, unlike a plain Bloom filter, supports removal and
//! exact listing of its contents while the number of represented elements
//! stays within its recoverable capacity. Subtracting one filter from
//! another cancels the shared elements, so two parties can compute the
//! symmetric difference of large sets by exchanging filters whose size
//! depends only on the expected difference.
//!
//! # Properties
//!
//! - **Algebraic cells**: every operation is a group operation on XOR-summed
//!   keys and digests and signed counts, so equal and opposite operations
//!   cancel exactly
//! - **Exact listing within capacity**: draining with [`pop`] recovers the
//!   represented keys themselves, not approximations, while roughly two
//!   thirds of the cells or fewer are in use
//! - **Graceful overload**: a difference too large to decode surfaces as a
//!   distinguishable "no pure cell" condition, not wrong output
//! - **Fixed size**: the cell array never resizes; capacity is chosen at
//!   construction
//!
//! # Usage
//!
//! ```rust
//! use ibf::filter::InvertibleBloomFilter;
//!
//! let mut filter = InvertibleBloomFilter::new(32, 9001);
//!
//! filter.insert(b"apple");
//! assert_eq!(filter.cardinality(), 1);
//!
//! // Listing drains the filter.
//! assert_eq!(filter.pop().unwrap(), b"apple");
//! assert!(filter.is_empty());
//! ```
//!
//! # Reconciliation
//!
//! Both sides build filters with identical configuration (same size, same
//! seed), insert their keys, and one side subtracts the other's filter:
//!
//! ```rust
//! use ibf::filter::InvertibleBloomFilter;
//!
//! let mut ours = InvertibleBloomFilter::new(32, 9001);
//! let mut theirs = InvertibleBloomFilter::new(32, 9001);
//!
//! for key in [&b"shared-1"[..], b"shared-2", b"only-ours"] {
//!     ours.insert(key);
//! }
//! for key in [&b"shared-1"[..], b"shared-2"] {
//!     theirs.insert(key);
//! }
//!
//! ours.subtract(&theirs).unwrap();
//! assert_eq!(ours.pop().unwrap(), b"only-ours");
//! ```
//!
//! Keys present only on the remote side come out of the same subtracted
//! filter after [`invert`]: their cells carry count -1, and inversion flips
//! them to recoverable purity. A drain loop run before and after inversion
//! therefore lists both sides' excess.
//!
//! # Caller responsibilities
//!
//! - Exchange of filters between parties is out of scope; serialize with
//!   [`serialize`] and move the bytes however suits the application
//! - A `NoPureCell` result from a drain loop means the listing is
//!   incomplete, typically because the difference exceeded capacity; retry
//!   with a larger filter rather than treating the partial output as total
//! - Removing a key that was never inserted corrupts counts when the guard
//!   in [`remove`] cannot detect it
//!
//! # References
//!
//! - Eppstein, Goodrich, Uyeda, Varghese (2011). "What's the Difference?
//!   Efficient Set Reconciliation without Prior Context"
//! - Goodrich and Mitzenmacher (2011). "Invertible Bloom Lookup Tables"
//!
//! [`pop`]: InvertibleBloomFilter::pop
//! [`invert`]: InvertibleBloomFilter::invert
//! [`remove`]: InvertibleBloomFilter::remove
//! [`serialize`]: InvertibleBloomFilter::serialize

mod block;
mod cell;
mod serialization;
mod sketch;

pub use self::cell::Cell;
pub use self::sketch::DEFAULT_POSITIONER_COUNT;
pub use self::sketch::InvertibleBloomFilter;
